//! Tests for deck construction and the Fisher–Yates shuffle.

use mindflip_core::{
    DeckError, GameRng, RandomSource, Session, Symbol, build_deck, default_symbols, layout_deck,
    shuffle,
};
use std::collections::HashMap;

/// Replays a fixed list of picks and records the bounds it was asked for.
struct Scripted {
    picks: Vec<usize>,
    bounds: Vec<usize>,
}

impl Scripted {
    fn new(picks: Vec<usize>) -> Self {
        Self {
            picks,
            bounds: Vec::new(),
        }
    }
}

impl RandomSource for Scripted {
    fn pick_index(&mut self, max: usize) -> usize {
        self.bounds.push(max);
        self.picks.remove(0)
    }
}

fn symbols(tokens: &[&str]) -> Vec<Symbol> {
    tokens.iter().copied().map(Symbol::from).collect()
}

fn tokens(session: &Session) -> Vec<&str> {
    session.cards().iter().map(|c| c.symbol().as_str()).collect()
}

#[test]
fn test_board_has_every_symbol_twice() {
    for seed in 0..20 {
        let deck = build_deck(&default_symbols(), &mut GameRng::new(seed)).unwrap();
        assert_eq!(deck.len(), 16);

        let mut counts: HashMap<&Symbol, usize> = HashMap::new();
        for card in &deck {
            *counts.entry(card.symbol()).or_default() += 1;
        }
        assert_eq!(counts.len(), 8);
        assert!(counts.values().all(|&n| n == 2));
    }
}

#[test]
fn test_ids_follow_position() {
    let deck = build_deck(&default_symbols(), &mut GameRng::new(3)).unwrap();
    for (index, card) in deck.iter().enumerate() {
        assert_eq!(card.id().index(), index);
    }
}

#[test]
fn test_same_seed_same_board() {
    let a = build_deck(&default_symbols(), &mut GameRng::new(42)).unwrap();
    let b = build_deck(&default_symbols(), &mut GameRng::new(42)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_shuffle_walks_down_from_last_index() {
    let mut items = [0, 1, 2, 3];
    let mut rng = Scripted::new(vec![3, 2, 1]);
    shuffle(&mut items, &mut rng);

    assert_eq!(rng.bounds, vec![3, 2, 1]);
    assert_eq!(items, [0, 1, 2, 3]);
}

#[test]
fn test_scripted_identity_shuffle_keeps_duplicated_order() {
    // Picking j == i at every step leaves the symbols-then-symbols order.
    let session = Session::new_game(&symbols(&["A", "B"]), &mut Scripted::new(vec![3, 2, 1]))
        .unwrap();
    assert_eq!(tokens(&session), vec!["A", "B", "A", "B"]);
}

#[test]
fn test_scripted_swaps() {
    // [A, B, A, B] -> swap(3, 0) -> [B, B, A, A]; then no-op swaps.
    let session = Session::new_game(&symbols(&["A", "B"]), &mut Scripted::new(vec![0, 2, 1]))
        .unwrap();
    assert_eq!(tokens(&session), vec!["B", "B", "A", "A"]);
}

#[test]
fn test_single_element_needs_no_randomness() {
    let mut items = [7];
    let mut rng = Scripted::new(Vec::new());
    shuffle(&mut items, &mut rng);
    assert!(rng.bounds.is_empty());
}

#[test]
fn test_empty_symbol_set_rejected() {
    let result = Session::new_game(&[], &mut GameRng::new(0));
    assert_eq!(result.unwrap_err(), DeckError::Empty);
}

#[test]
fn test_duplicate_symbol_rejected() {
    let result = build_deck(&symbols(&["A", "B", "A"]), &mut GameRng::new(0));
    assert_eq!(
        result.unwrap_err(),
        DeckError::DuplicateSymbol {
            symbol: Symbol::from("A")
        }
    );
}

#[test]
fn test_layout_requires_pairs() {
    let err = layout_deck(&symbols(&["A", "B", "A"])).unwrap_err();
    assert_eq!(
        err,
        DeckError::UnpairedSymbol {
            symbol: Symbol::from("B"),
            count: 1
        }
    );
    assert!(err.to_string().contains("expected 2"));

    let err = layout_deck(&symbols(&["A", "A", "A", "A"])).unwrap_err();
    assert!(matches!(err, DeckError::UnpairedSymbol { count: 4, .. }));
}
