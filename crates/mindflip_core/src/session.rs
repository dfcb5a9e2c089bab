//! Game session: the flip / resolve state machine.
//!
//! A session moves through three phases while play continues:
//!
//! - `Idle` - no card is waiting for resolution
//! - `OneFlipped` - one card is face up
//! - `Evaluating` - two cards are face up and the session is locked
//!
//! Resolving an evaluating pair returns to `Idle`, or to the terminal `Won`
//! phase when the last pair is found. Invalid flips are never errors: they
//! are reported as [`FlipOutcome::Ignored`] and leave the session untouched.

use crate::card::{Card, CardFace, CardId, Symbol};
use crate::deck::{self, DeckError};
use crate::invariants::{InvariantSet, SessionInvariants};
use crate::rng::RandomSource;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Why a flip request was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Rejection {
    /// A pair is being evaluated.
    Locked,
    /// Two cards are already waiting for resolution.
    PairPending,
    /// No card has this id.
    UnknownCard,
    /// The card is part of a found pair.
    AlreadyMatched,
    /// The card is already showing.
    AlreadyFaceUp,
}

/// Result of a flip request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// First card of a pair turned face up.
    Revealed(CardId),
    /// Second card turned face up; the session is now locked until resolved.
    PairPending(CardId, CardId),
    /// Nothing changed.
    Ignored(Rejection),
}

impl FlipOutcome {
    /// True when the flip left the session unchanged.
    pub fn is_ignored(&self) -> bool {
        matches!(self, FlipOutcome::Ignored(_))
    }
}

/// Result of resolving a pending pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    /// Symbols were equal; both cards are now matched.
    Matched(CardId, CardId),
    /// Symbols differed; both cards are hidden again.
    Mismatched(CardId, CardId),
}

/// Session-level phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Phase {
    /// No card pending.
    Idle,
    /// One card face up.
    OneFlipped,
    /// Two cards face up, locked until resolution.
    Evaluating,
    /// Every pair found.
    Won,
}

/// A single game from deal to win.
///
/// Only [`Session::new_game`] and [`Session::from_layout`] create sessions,
/// so every session satisfies the session invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub(crate) board: Vec<Card>,
    pub(crate) move_count: u32,
    pub(crate) matched_pair_count: usize,
    pub(crate) pending: Vec<CardId>,
    pub(crate) locked: bool,
    pub(crate) won: bool,
}

impl Session {
    /// Deals a new game: every symbol twice, shuffled with `rng`.
    ///
    /// # Errors
    ///
    /// Returns a [`DeckError`] if `symbols` is empty or repeats a symbol.
    #[instrument(skip(symbols, rng), fields(pairs = symbols.len()))]
    pub fn new_game<R: RandomSource + ?Sized>(
        symbols: &[Symbol],
        rng: &mut R,
    ) -> Result<Self, DeckError> {
        let board = deck::build_deck(symbols, rng)?;
        info!(cards = board.len(), "New game dealt");
        Ok(Self::with_board(board))
    }

    /// Creates a game from a board already in its final order.
    ///
    /// # Errors
    ///
    /// Returns a [`DeckError`] unless every symbol appears exactly twice.
    #[instrument(skip(layout), fields(cards = layout.len()))]
    pub fn from_layout(layout: &[Symbol]) -> Result<Self, DeckError> {
        let board = deck::layout_deck(layout)?;
        Ok(Self::with_board(board))
    }

    fn with_board(board: Vec<Card>) -> Self {
        Self {
            board,
            move_count: 0,
            matched_pair_count: 0,
            pending: Vec::with_capacity(2),
            locked: false,
            won: false,
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Transitions
    // ─────────────────────────────────────────────────────────────

    /// Turns a card face up.
    ///
    /// The request is ignored when the session is locked, two cards are
    /// already pending, the id is unknown, or the card is matched or already
    /// face up. The second accepted flip locks the session.
    #[instrument(skip(self), fields(pending = self.pending.len(), locked = self.locked))]
    pub fn flip(&mut self, id: CardId) -> FlipOutcome {
        if let Err(reason) = self.check_flip(id) {
            debug!(%reason, "Flip ignored");
            return FlipOutcome::Ignored(reason);
        }

        self.board[id.index()].set_face(CardFace::FaceUp);
        self.pending.push(id);

        let outcome = match self.pending.as_slice() {
            [first, second] => {
                self.locked = true;
                debug!(%first, %second, "Pair pending");
                FlipOutcome::PairPending(*first, *second)
            }
            _ => FlipOutcome::Revealed(id),
        };

        self.debug_check_invariants();
        outcome
    }

    fn check_flip(&self, id: CardId) -> Result<(), Rejection> {
        if self.locked {
            return Err(Rejection::Locked);
        }
        if self.pending.len() >= 2 {
            return Err(Rejection::PairPending);
        }
        let card = self.board.get(id.index()).ok_or(Rejection::UnknownCard)?;
        match card.face() {
            CardFace::Matched => Err(Rejection::AlreadyMatched),
            CardFace::FaceUp => Err(Rejection::AlreadyFaceUp),
            CardFace::Hidden => Ok(()),
        }
    }

    /// Resolves the two pending cards.
    ///
    /// Equal symbols become matched, unequal ones are hidden again. Either
    /// way the move counter advances by one, the pending list is cleared and
    /// the lock released. Returns `None` without touching the session unless
    /// exactly two cards are pending.
    #[instrument(skip(self), fields(moves = self.move_count))]
    pub fn resolve(&mut self) -> Option<PairOutcome> {
        let (a, b) = match self.pending.as_slice() {
            [a, b] => (*a, *b),
            _ => {
                debug!(pending = self.pending.len(), "Nothing to resolve");
                return None;
            }
        };

        let is_match = self.board[a.index()].symbol() == self.board[b.index()].symbol();
        let (face, outcome) = if is_match {
            self.matched_pair_count += 1;
            (CardFace::Matched, PairOutcome::Matched(a, b))
        } else {
            (CardFace::Hidden, PairOutcome::Mismatched(a, b))
        };
        self.board[a.index()].set_face(face);
        self.board[b.index()].set_face(face);

        self.move_count += 1;
        self.pending.clear();
        self.locked = false;
        if self.matched_pair_count == self.total_pairs() {
            self.won = true;
        }

        info!(
            ?outcome,
            moves = self.move_count,
            pairs = self.matched_pair_count,
            won = self.won,
            "Pair resolved"
        );
        self.debug_check_invariants();
        Some(outcome)
    }

    fn debug_check_invariants(&self) {
        debug_assert!(
            SessionInvariants::check_all(self).is_ok(),
            "session invariants violated: {:?}",
            SessionInvariants::check_all(self).err()
        );
    }

    // ─────────────────────────────────────────────────────────────
    //  Queries
    // ─────────────────────────────────────────────────────────────

    /// Returns the board in id order.
    pub fn cards(&self) -> &[Card] {
        &self.board
    }

    /// Returns the card with the given id, if any.
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.board.get(id.index())
    }

    /// Number of resolved pairs (matched or not).
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Number of pairs found so far.
    pub fn matched_pair_count(&self) -> usize {
        self.matched_pair_count
    }

    /// Number of distinct symbols on the board.
    pub fn total_pairs(&self) -> usize {
        self.board.len() / 2
    }

    /// Ids of face-up cards awaiting resolution, in flip order.
    pub fn pending(&self) -> &[CardId] {
        &self.pending
    }

    /// True while a pair is being evaluated.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// True once every pair has been found. Never reverts within a session.
    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Current session phase.
    pub fn phase(&self) -> Phase {
        if self.won {
            return Phase::Won;
        }
        match self.pending.len() {
            0 => Phase::Idle,
            1 => Phase::OneFlipped,
            _ => Phase::Evaluating,
        }
    }

    /// Percentage of moves that found a pair, rounded: `P / moves * 100`.
    ///
    /// `None` before the first move.
    pub fn accuracy(&self) -> Option<u32> {
        if self.move_count == 0 {
            return None;
        }
        let ratio = self.total_pairs() as f64 / f64::from(self.move_count);
        Some((ratio * 100.0).round() as u32)
    }
}
