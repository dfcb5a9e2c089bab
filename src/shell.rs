//! Presentation shell: owns the session and drives its timing.
//!
//! The shell forwards clicks to the engine, schedules the delayed pair
//! resolution, and fetches the victory message once per win. Deferred work
//! runs in spawned tasks that report back over a channel; every report is
//! tagged with the [`Generation`] of the game it belongs to, and reports from
//! an older game are dropped. The owner applies events one at a time with
//! [`GameShell::handle_event`], so the session itself needs no lock.

use crate::victory::{VictoryMessageSource, fetch_victory_message};
use derive_more::Display;
use mindflip_core::{Card, CardId, DeckError, FlipOutcome, GameRng, PairOutcome, Session, Symbol};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// Tag distinguishing successive games of one shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display)]
#[display("gen{_0}")]
pub struct Generation(pub u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Deferred work reported back to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// The dwell time of a pending pair has elapsed.
    ResolveDue {
        /// Game the pair belongs to.
        generation: Generation,
    },
    /// The victory message request settled.
    VictoryMessage {
        /// Game that was won.
        generation: Generation,
        /// Message to display (already substituted on failure).
        text: String,
    },
}

impl ShellEvent {
    /// Game this event belongs to.
    pub fn generation(&self) -> Generation {
        match self {
            ShellEvent::ResolveDue { generation } | ShellEvent::VictoryMessage { generation, .. } => {
                *generation
            }
        }
    }
}

/// Progress of the victory message for the current game.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VictoryState {
    /// Game not won yet.
    #[default]
    NotRequested,
    /// Request in flight.
    Pending,
    /// Message available.
    Ready(String),
}

/// Read-only snapshot for rendering.
#[derive(Debug, Clone, Copy)]
pub struct ShellView<'a> {
    /// Cards in id order.
    pub cards: &'a [Card],
    /// Resolved moves so far.
    pub move_count: u32,
    /// Pairs found so far.
    pub matched_pair_count: usize,
    /// Pairs on the board.
    pub total_pairs: usize,
    /// True while a pair is being evaluated.
    pub locked: bool,
    /// True once every pair is found.
    pub won: bool,
    /// True while the victory message is being fetched.
    pub message_pending: bool,
    /// Victory message, once available.
    pub victory_message: Option<&'a str>,
    /// Rounded accuracy percentage, once at least one move was made.
    pub accuracy: Option<u32>,
}

/// Owns a game session and the deferred work around it.
pub struct GameShell {
    session: Session,
    generation: Generation,
    symbols: Vec<Symbol>,
    rng: GameRng,
    dwell: Duration,
    victory: VictoryState,
    messages: Arc<dyn VictoryMessageSource>,
    events_tx: mpsc::UnboundedSender<ShellEvent>,
    events_rx: mpsc::UnboundedReceiver<ShellEvent>,
    resolve_timer: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for GameShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameShell")
            .field("generation", &self.generation)
            .field("phase", &self.session.phase())
            .field("dwell", &self.dwell)
            .field("victory", &self.victory)
            .finish_non_exhaustive()
    }
}

impl GameShell {
    /// Deals the first game.
    ///
    /// # Errors
    ///
    /// Returns a [`DeckError`] if `symbols` cannot form a board.
    #[instrument(skip(symbols, rng, messages), fields(pairs = symbols.len(), seed = rng.seed()))]
    pub fn new(
        symbols: Vec<Symbol>,
        mut rng: GameRng,
        dwell: Duration,
        messages: Arc<dyn VictoryMessageSource>,
    ) -> Result<Self, DeckError> {
        let session = Session::new_game(&symbols, &mut rng)?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        info!("Game shell ready");
        Ok(Self {
            session,
            generation: Generation::default(),
            symbols,
            rng,
            dwell,
            victory: VictoryState::NotRequested,
            messages,
            events_tx,
            events_rx,
            resolve_timer: None,
        })
    }

    /// Current session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current game generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Dwell time between the second flip and resolution.
    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    /// Victory message progress.
    pub fn victory(&self) -> &VictoryState {
        &self.victory
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> ShellView<'_> {
        ShellView {
            cards: self.session.cards(),
            move_count: self.session.move_count(),
            matched_pair_count: self.session.matched_pair_count(),
            total_pairs: self.session.total_pairs(),
            locked: self.session.is_locked(),
            won: self.session.is_won(),
            message_pending: self.victory == VictoryState::Pending,
            victory_message: match &self.victory {
                VictoryState::Ready(text) => Some(text.as_str()),
                _ => None,
            },
            accuracy: self.session.accuracy(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  User intents
    // ─────────────────────────────────────────────────────────────

    /// Forwards a click to the engine and schedules resolution once a pair is up.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(self), fields(generation = %self.generation))]
    pub fn card_clicked(&mut self, id: CardId) -> FlipOutcome {
        let outcome = self.session.flip(id);
        if let FlipOutcome::PairPending(..) = outcome {
            self.schedule_resolve();
        }
        outcome
    }

    /// Discards the current game and deals a new one.
    ///
    /// Any pending resolution or victory message of the old game is
    /// invalidated.
    ///
    /// # Errors
    ///
    /// Returns a [`DeckError`] if the symbol set cannot form a board; the
    /// current game is left untouched in that case.
    #[instrument(skip(self), fields(generation = %self.generation))]
    pub fn restart(&mut self) -> Result<(), DeckError> {
        let session = Session::new_game(&self.symbols, &mut self.rng)?;
        if let Some(timer) = self.resolve_timer.take() {
            timer.abort();
        }
        self.generation = self.generation.next();
        self.session = session;
        self.victory = VictoryState::NotRequested;
        info!(generation = %self.generation, "Game restarted");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Deferred work
    // ─────────────────────────────────────────────────────────────

    fn schedule_resolve(&mut self) {
        let generation = self.generation;
        let dwell = self.dwell;
        let tx = self.events_tx.clone();
        debug!(%generation, ?dwell, "Scheduling pair resolution");
        self.resolve_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(dwell).await;
            // Receiver lives as long as the shell; a send error means it is gone.
            let _ = tx.send(ShellEvent::ResolveDue { generation });
        }));
    }

    fn request_victory_message(&mut self) {
        let generation = self.generation;
        let moves = self.session.move_count();
        let messages = Arc::clone(&self.messages);
        let tx = self.events_tx.clone();
        self.victory = VictoryState::Pending;
        info!(%generation, moves, "Requesting victory message");
        tokio::spawn(async move {
            let text = fetch_victory_message(messages.as_ref(), moves).await;
            let _ = tx.send(ShellEvent::VictoryMessage { generation, text });
        });
    }

    /// Waits for the next deferred event.
    pub async fn next_event(&mut self) -> Option<ShellEvent> {
        self.events_rx.recv().await
    }

    /// Returns a deferred event if one is ready.
    pub fn try_next_event(&mut self) -> Option<ShellEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Applies a deferred event. Events from an older game are ignored.
    ///
    /// Returns the pair outcome when the event resolved a pair.
    #[instrument(skip(self), fields(current = %self.generation))]
    pub fn handle_event(&mut self, event: ShellEvent) -> Option<PairOutcome> {
        if event.generation() != self.generation {
            debug!(stale = %event.generation(), "Dropping event from previous game");
            return None;
        }

        match event {
            ShellEvent::ResolveDue { .. } => {
                self.resolve_timer = None;
                let outcome = self.session.resolve();
                if self.session.is_won() && self.victory == VictoryState::NotRequested {
                    info!(moves = self.session.move_count(), "Game won");
                    self.request_victory_message();
                }
                outcome
            }
            ShellEvent::VictoryMessage { text, .. } => {
                debug!("Victory message stored");
                self.victory = VictoryState::Ready(text);
                None
            }
        }
    }

    /// Waits for and applies events until none is outstanding.
    ///
    /// Returns immediately when no pair is pending and no message is in flight.
    pub async fn settle(&mut self) {
        while self.session.is_locked() || self.victory == VictoryState::Pending {
            match self.next_event().await {
                Some(event) => {
                    self.handle_event(event);
                }
                None => break,
            }
        }
    }
}
