//! Tests for the game shell's timing, restart and victory message handling.
//!
//! Time is paused so the dwell timer advances deterministically.

use async_trait::async_trait;
use mindflip::{
    EMPTY_RESPONSE_MESSAGE, GameShell, Generation, LlmError, OfflineMessages, ShellEvent,
    VICTORY_MESSAGE_TIMEOUT, VictoryMessageSource, VictoryState, fallback_message,
};
use mindflip_core::{CardFace, CardId, FlipOutcome, GameRng, PairOutcome, Symbol};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const DWELL: Duration = Duration::from_millis(800);

/// Counts requests and answers with a fixed text.
#[derive(Default)]
struct CountingSource {
    calls: AtomicUsize,
    reply: String,
}

impl CountingSource {
    fn replying(reply: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            reply: reply.to_string(),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VictoryMessageSource for CountingSource {
    async fn victory_message(&self, _moves: u32) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// Never answers.
struct Stalled;

#[async_trait]
impl VictoryMessageSource for Stalled {
    async fn victory_message(&self, _moves: u32) -> Result<String, LlmError> {
        std::future::pending().await
    }
}

fn shell_with(messages: Arc<dyn VictoryMessageSource>) -> GameShell {
    let symbols = ["A", "B"].into_iter().map(Symbol::from).collect();
    GameShell::new(symbols, GameRng::new(7), DWELL, messages).expect("valid symbol set")
}

/// Card ids grouped by symbol, in board order.
fn pairs(shell: &GameShell) -> Vec<(CardId, CardId)> {
    let mut by_symbol: HashMap<&Symbol, Vec<CardId>> = HashMap::new();
    for card in shell.view().cards {
        by_symbol.entry(card.symbol()).or_default().push(card.id());
    }
    let mut pairs: Vec<_> = by_symbol.into_values().map(|ids| (ids[0], ids[1])).collect();
    pairs.sort();
    pairs
}

/// A mismatched pair on the current board.
fn mismatch(shell: &GameShell) -> (CardId, CardId) {
    let pairs = pairs(shell);
    (pairs[0].0, pairs[1].0)
}

/// Finds every pair without a miss and waits for all deferred work.
async fn play_perfect_game(shell: &mut GameShell) {
    for (a, b) in pairs(shell) {
        shell.card_clicked(a);
        shell.card_clicked(b);
        shell.settle().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_pair_stays_up_until_dwell_elapses() {
    let mut shell = shell_with(Arc::new(OfflineMessages));
    let (a, b) = mismatch(&shell);

    assert_eq!(shell.card_clicked(a), FlipOutcome::Revealed(a));
    assert_eq!(shell.card_clicked(b), FlipOutcome::PairPending(a, b));

    let early = tokio::time::timeout(DWELL - Duration::from_millis(1), shell.next_event()).await;
    assert!(early.is_err(), "resolution fired before the dwell elapsed");
    assert!(shell.view().locked);
    assert_eq!(shell.session().card(a).unwrap().face(), CardFace::FaceUp);
    assert_eq!(shell.session().card(b).unwrap().face(), CardFace::FaceUp);

    let event = shell.next_event().await.expect("resolution event");
    assert_eq!(
        event,
        ShellEvent::ResolveDue {
            generation: Generation(0)
        }
    );
    assert_eq!(shell.handle_event(event), Some(PairOutcome::Mismatched(a, b)));
    assert!(!shell.view().locked);
    assert_eq!(shell.view().move_count, 1);
    assert_eq!(shell.session().card(a).unwrap().face(), CardFace::Hidden);
}

#[tokio::test(start_paused = true)]
async fn test_clicks_ignored_during_dwell() {
    let mut shell = shell_with(Arc::new(OfflineMessages));
    let (a, b) = mismatch(&shell);
    let other = pairs(&shell)[0].1;

    shell.card_clicked(a);
    shell.card_clicked(b);
    assert!(shell.card_clicked(other).is_ignored());

    shell.settle().await;
    assert_eq!(shell.session().card(other).unwrap().face(), CardFace::Hidden);
}

#[tokio::test(start_paused = true)]
async fn test_single_flip_schedules_nothing() {
    let mut shell = shell_with(Arc::new(OfflineMessages));
    shell.card_clicked(CardId(0));

    let event = tokio::time::timeout(DWELL * 2, shell.next_event()).await;
    assert!(event.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_restart_cancels_pending_resolution() {
    let mut shell = shell_with(Arc::new(OfflineMessages));
    let (a, b) = mismatch(&shell);
    shell.card_clicked(a);
    shell.card_clicked(b);

    shell.restart().unwrap();
    assert_eq!(shell.generation(), Generation(1));

    let view = shell.view();
    assert_eq!(view.move_count, 0);
    assert_eq!(view.matched_pair_count, 0);
    assert!(!view.locked);
    assert!(!view.won);
    assert!(view.cards.iter().all(|c| c.face() == CardFace::Hidden));

    let event = tokio::time::timeout(DWELL * 2, shell.next_event()).await;
    assert!(event.is_err(), "old timer should not report after restart");
}

#[tokio::test(start_paused = true)]
async fn test_stale_resolution_is_ignored() {
    let mut shell = shell_with(Arc::new(OfflineMessages));
    shell.restart().unwrap();

    let a = pairs(&shell)[0].0;
    shell.card_clicked(a);
    let before = shell.session().clone();

    let outcome = shell.handle_event(ShellEvent::ResolveDue {
        generation: Generation(0),
    });
    assert_eq!(outcome, None);
    assert_eq!(shell.session(), &before);
}

#[tokio::test(start_paused = true)]
async fn test_win_with_failing_source_shows_fallback() {
    let mut shell = shell_with(Arc::new(OfflineMessages));
    play_perfect_game(&mut shell).await;

    let view = shell.view();
    assert!(view.won);
    assert_eq!(view.move_count, 2);
    assert_eq!(view.accuracy, Some(100));
    assert!(!view.message_pending);
    assert_eq!(view.victory_message, Some(fallback_message(2).as_str()));
}

#[tokio::test(start_paused = true)]
async fn test_stalled_source_settles_to_fallback() {
    let mut shell = shell_with(Arc::new(Stalled));

    let settled = tokio::time::timeout(
        VICTORY_MESSAGE_TIMEOUT * 2,
        play_perfect_game(&mut shell),
    )
    .await;
    assert!(settled.is_ok(), "victory message never settled");

    let view = shell.view();
    assert!(view.won);
    assert!(!view.message_pending);
    assert_eq!(view.victory_message, Some(fallback_message(2).as_str()));
}

#[tokio::test(start_paused = true)]
async fn test_victory_message_requested_once_per_win() {
    let source = Arc::new(CountingSource::replying("  Memory of an elephant! 🐘  "));
    let mut shell = shell_with(source.clone());
    play_perfect_game(&mut shell).await;

    assert_eq!(source.calls(), 1);
    assert_eq!(
        shell.victory(),
        &VictoryState::Ready("Memory of an elephant! 🐘".to_string())
    );

    // A duplicate resolution event for the won game must not trigger another request.
    let generation = shell.generation();
    assert_eq!(shell.handle_event(ShellEvent::ResolveDue { generation }), None);
    for id in 0..4 {
        assert!(shell.card_clicked(CardId(id)).is_ignored());
    }
    shell.settle().await;
    assert_eq!(source.calls(), 1);

    // The next win asks again.
    shell.restart().unwrap();
    assert_eq!(shell.victory(), &VictoryState::NotRequested);
    play_perfect_game(&mut shell).await;
    assert_eq!(source.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_empty_victory_text_uses_fixed_message() {
    let mut shell = shell_with(Arc::new(CountingSource::replying("   ")));
    play_perfect_game(&mut shell).await;

    assert_eq!(shell.view().victory_message, Some(EMPTY_RESPONSE_MESSAGE));
}

#[tokio::test(start_paused = true)]
async fn test_restart_discards_message_of_previous_game() {
    let source = Arc::new(CountingSource::replying("Well played!"));
    let mut shell = shell_with(source.clone());

    let all = pairs(&shell);
    let (first, last) = (all[0], all[1]);
    shell.card_clicked(first.0);
    shell.card_clicked(first.1);
    shell.settle().await;

    shell.card_clicked(last.0);
    shell.card_clicked(last.1);
    let event = shell.next_event().await.expect("resolution event");
    shell.handle_event(event);
    assert!(shell.view().won);
    assert!(shell.view().message_pending);

    shell.restart().unwrap();
    let late = shell.next_event().await.expect("victory message event");
    assert_eq!(late.generation(), Generation(0));
    assert_eq!(shell.handle_event(late), None);

    assert_eq!(shell.victory(), &VictoryState::NotRequested);
    assert_eq!(shell.view().victory_message, None);
    assert!(!shell.view().won);
}
