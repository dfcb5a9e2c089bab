//! Deck construction and shuffling.

use crate::card::{Card, CardId, Symbol};
use crate::rng::RandomSource;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Symbols used when no custom set is configured.
pub const DEFAULT_SYMBOLS: [&str; 8] = ["🚀", "🍕", "🎮", "🌈", "🎯", "🦁", "🎸", "🛸"];

/// Returns [`DEFAULT_SYMBOLS`] as owned symbols.
pub fn default_symbols() -> Vec<Symbol> {
    DEFAULT_SYMBOLS.iter().copied().map(Symbol::from).collect()
}

/// Errors building a board from a symbol set or an explicit layout.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum DeckError {
    /// No symbols were supplied.
    #[display("Symbol set is empty")]
    Empty,

    /// A symbol set listed the same symbol twice.
    #[display("Symbol {symbol} appears more than once in the symbol set")]
    DuplicateSymbol {
        /// The repeated symbol.
        symbol: Symbol,
    },

    /// A layout did not contain a symbol exactly twice.
    #[display("Symbol {symbol} appears {count} times in the layout, expected 2")]
    UnpairedSymbol {
        /// The offending symbol.
        symbol: Symbol,
        /// How often it appeared.
        count: usize,
    },
}

impl std::error::Error for DeckError {}

/// Shuffles `items` in place with Fisher–Yates.
///
/// Walks from the last index down to 1, swapping each position with one
/// picked uniformly from `0..=i`.
pub fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.pick_index(i);
        items.swap(i, j);
    }
}

/// Builds a shuffled board: every symbol duplicated once, then shuffled.
///
/// Card ids are assigned by final position.
///
/// # Errors
///
/// Returns [`DeckError::Empty`] for an empty set and
/// [`DeckError::DuplicateSymbol`] if a symbol is listed twice.
#[instrument(skip(symbols, rng), fields(pairs = symbols.len()))]
pub fn build_deck<R: RandomSource + ?Sized>(
    symbols: &[Symbol],
    rng: &mut R,
) -> Result<Vec<Card>, DeckError> {
    validate_symbol_set(symbols)?;

    let mut faces: Vec<Symbol> = symbols.iter().chain(symbols.iter()).cloned().collect();
    shuffle(&mut faces, rng);

    debug!(cards = faces.len(), "Deck shuffled");
    Ok(number_cards(faces))
}

/// Builds an unshuffled board from symbols already in their final order.
///
/// # Errors
///
/// Returns [`DeckError::Empty`] for an empty layout and
/// [`DeckError::UnpairedSymbol`] if any symbol does not appear exactly twice.
#[instrument(skip(layout), fields(cards = layout.len()))]
pub fn layout_deck(layout: &[Symbol]) -> Result<Vec<Card>, DeckError> {
    if layout.is_empty() {
        return Err(DeckError::Empty);
    }

    let mut counts: HashMap<&Symbol, usize> = HashMap::new();
    for symbol in layout {
        *counts.entry(symbol).or_default() += 1;
    }
    // Report in layout order so the error is deterministic.
    for symbol in layout {
        let count = counts[symbol];
        if count != 2 {
            return Err(DeckError::UnpairedSymbol {
                symbol: symbol.clone(),
                count,
            });
        }
    }

    Ok(number_cards(layout.to_vec()))
}

fn validate_symbol_set(symbols: &[Symbol]) -> Result<(), DeckError> {
    if symbols.is_empty() {
        return Err(DeckError::Empty);
    }
    for (i, symbol) in symbols.iter().enumerate() {
        if symbols[..i].contains(symbol) {
            return Err(DeckError::DuplicateSymbol {
                symbol: symbol.clone(),
            });
        }
    }
    Ok(())
}

fn number_cards(faces: Vec<Symbol>) -> Vec<Card> {
    faces
        .into_iter()
        .enumerate()
        .map(|(index, symbol)| Card::new(CardId(index), symbol))
        .collect()
}
