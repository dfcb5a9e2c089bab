//! Pure game logic for MindFlip, a memory-matching card game.
//!
//! This crate has no I/O. It deals shuffled boards, validates flips,
//! resolves pairs and detects the win. Timing and presentation live in the
//! `mindflip` application crate.
//!
//! # Example
//!
//! ```
//! use mindflip_core::{CardId, FlipOutcome, PairOutcome, Session, Symbol};
//!
//! let layout: Vec<Symbol> = ["A", "B", "A", "B"].into_iter().map(Symbol::from).collect();
//! let mut session = Session::from_layout(&layout).unwrap();
//!
//! assert_eq!(session.flip(CardId(0)), FlipOutcome::Revealed(CardId(0)));
//! assert_eq!(session.flip(CardId(2)), FlipOutcome::PairPending(CardId(0), CardId(2)));
//! assert_eq!(session.resolve(), Some(PairOutcome::Matched(CardId(0), CardId(2))));
//! assert_eq!(session.move_count(), 1);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod card;
mod deck;
pub mod invariants;
mod rng;
mod session;

pub use card::{Card, CardFace, CardId, Symbol};
pub use deck::{DEFAULT_SYMBOLS, DeckError, build_deck, default_symbols, layout_deck, shuffle};
pub use rng::{GameRng, RandomSource};
pub use session::{FlipOutcome, PairOutcome, Phase, Rejection, Session};
