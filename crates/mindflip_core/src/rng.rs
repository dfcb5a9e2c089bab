//! Random sources for shuffling.
//!
//! Shuffling only ever needs one primitive: "pick an index in `0..=max`".
//! [`RandomSource`] captures exactly that, so a game can run on a seeded
//! [`GameRng`] in production and on a scripted source in tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

/// Supplies uniformly distributed indices to the shuffle.
pub trait RandomSource {
    /// Returns an index uniformly distributed in `0..=max`.
    fn pick_index(&mut self, max: usize) -> usize;
}

/// Deterministic RNG for deck shuffling.
///
/// Uses ChaCha8, so the same seed always produces the same deck order.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Creates an RNG with the given seed.
    #[must_use]
    #[instrument]
    pub fn new(seed: u64) -> Self {
        debug!("Seeding game RNG");
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates an RNG seeded from the thread-local entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Returns the seed this RNG was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for GameRng {
    fn pick_index(&mut self, max: usize) -> usize {
        self.inner.gen_range(0..=max)
    }
}
