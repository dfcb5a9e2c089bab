//! First-class invariants for game sessions.
//!
//! Invariants are logical properties that must hold after every transition.
//! Sessions check them in debug builds; they are also testable on their own.

use crate::card::{CardFace, Symbol};
use crate::session::Session;
use std::collections::HashMap;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
            (I3::holds(state), I3::description()),
        ]
        .into_iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(description))
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Every symbol on the board appears exactly twice.
pub struct PairedSymbolsInvariant;

impl Invariant<Session> for PairedSymbolsInvariant {
    fn holds(session: &Session) -> bool {
        let mut counts: HashMap<&Symbol, usize> = HashMap::new();
        for card in session.cards() {
            *counts.entry(card.symbol()).or_default() += 1;
        }
        session.cards().len() % 2 == 0 && counts.values().all(|&count| count == 2)
    }

    fn description() -> &'static str {
        "Every symbol appears exactly twice"
    }
}

/// Pending cards are exactly the face-up cards, and the lock is held iff two are pending.
pub struct PendingLockInvariant;

impl Invariant<Session> for PendingLockInvariant {
    fn holds(session: &Session) -> bool {
        let pending = session.pending();
        let face_up = session.cards().iter().filter(|c| c.is_face_up()).count();
        pending.len() <= 2
            && face_up == pending.len()
            && pending
                .iter()
                .all(|id| session.card(*id).is_some_and(|c| c.is_face_up()))
            && session.is_locked() == (pending.len() == 2)
    }

    fn description() -> &'static str {
        "Pending flips are the face-up cards and lock iff two are pending"
    }
}

/// The matched pair count agrees with the cards, and the game is won iff all pairs are found.
pub struct WonWhenAllMatchedInvariant;

impl Invariant<Session> for WonWhenAllMatchedInvariant {
    fn holds(session: &Session) -> bool {
        let matched_cards = session
            .cards()
            .iter()
            .filter(|c| c.face() == CardFace::Matched)
            .count();
        matched_cards == session.matched_pair_count() * 2
            && session.is_won() == (session.matched_pair_count() == session.total_pairs())
    }

    fn description() -> &'static str {
        "Won iff every pair is matched"
    }
}

/// All session invariants as a composable set.
pub type SessionInvariants = (
    PairedSymbolsInvariant,
    PendingLockInvariant,
    WonWhenAllMatchedInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardId;

    fn layout() -> Session {
        let symbols: Vec<Symbol> = ["A", "B", "A", "B"].into_iter().map(Symbol::from).collect();
        Session::from_layout(&symbols).unwrap()
    }

    #[test]
    fn test_invariants_hold_for_fresh_session() {
        assert!(SessionInvariants::check_all(&layout()).is_ok());
    }

    #[test]
    fn test_invariants_hold_through_a_pair() {
        let mut session = layout();
        session.flip(CardId(0));
        assert!(SessionInvariants::check_all(&session).is_ok());
        session.flip(CardId(2));
        assert!(SessionInvariants::check_all(&session).is_ok());
        session.resolve();
        assert!(SessionInvariants::check_all(&session).is_ok());
    }

    #[test]
    fn test_detects_lock_without_pair() {
        let mut session = layout();
        session.locked = true;

        let violations = SessionInvariants::check_all(&session).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].description, PendingLockInvariant::description());
    }

    #[test]
    fn test_detects_won_flag_without_pairs() {
        let mut session = layout();
        session.won = true;
        assert!(!WonWhenAllMatchedInvariant::holds(&session));
    }
}
