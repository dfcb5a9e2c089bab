//! Core domain types for the memory-matching board.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Index of a card on the board (`0..2P`), stable for the lifetime of a game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Serialize, Deserialize,
)]
#[display("#{_0}")]
pub struct CardId(pub usize);

impl CardId {
    /// Returns the board index this id refers to.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Opaque token printed on a card face. Two cards match when their symbols are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{_0}")]
pub struct Symbol(String);

impl Symbol {
    /// Creates a symbol from any string-like token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Symbol {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Which side of a card is showing.
///
/// `Matched` is terminal: once a pair is found its cards never change again
/// for the rest of the game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
pub enum CardFace {
    /// Face down.
    #[default]
    Hidden,
    /// Face up, waiting for pair resolution.
    FaceUp,
    /// Part of a found pair.
    Matched,
}

/// A single card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    symbol: Symbol,
    face: CardFace,
}

impl Card {
    /// Creates a face-down card.
    #[instrument(level = "trace")]
    pub fn new(id: CardId, symbol: Symbol) -> Self {
        Self {
            id,
            symbol,
            face: CardFace::Hidden,
        }
    }

    /// Returns the card id.
    pub fn id(&self) -> CardId {
        self.id
    }

    /// Returns the card's symbol.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Returns the current face.
    pub fn face(&self) -> CardFace {
        self.face
    }

    /// True while the card is revealed and not yet part of a found pair.
    pub fn is_face_up(&self) -> bool {
        self.face == CardFace::FaceUp
    }

    /// True once the card belongs to a found pair.
    pub fn is_matched(&self) -> bool {
        self.face == CardFace::Matched
    }

    pub(crate) fn set_face(&mut self, face: CardFace) {
        self.face = face;
    }
}
