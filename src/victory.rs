//! Victory messages: a single best-effort call to an external generator.
//!
//! [`fetch_victory_message`] always settles to a string. A failed or
//! timed-out call is logged and replaced with a fixed fallback that embeds
//! the move count; it is never retried and never surfaced to the player as
//! an error.

use crate::llm_client::{LlmClient, LlmError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Longest wait for the generator before the fallback is shown.
pub const VICTORY_MESSAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Shown when the generator answers with empty text.
pub const EMPTY_RESPONSE_MESSAGE: &str = "Incredible! Your memory is truly legendary! 🧠✨";

const SYSTEM_PROMPT: &str = "You write short, upbeat one-line cheers for casual game players.";

/// Fallback shown when the generator call fails.
pub fn fallback_message(moves: u32) -> String {
    format!("Fantastic! You cleared the board in {} moves! 🏆", moves)
}

/// Builds the generation prompt for a game won in `moves` moves.
pub fn victory_prompt(moves: u32) -> String {
    format!(
        "Generate a short, enthusiastic, and funny congratulatory message for someone who \
         just won a memory card game in {} moves. Keep it under 15 words. Include an emoji.",
        moves
    )
}

/// Something that can produce a congratulatory message for a finished game.
#[async_trait]
pub trait VictoryMessageSource: Send + Sync {
    /// Produces a message for a game won in `moves` moves.
    async fn victory_message(&self, moves: u32) -> Result<String, LlmError>;
}

#[async_trait]
impl VictoryMessageSource for LlmClient {
    #[instrument(skip(self))]
    async fn victory_message(&self, moves: u32) -> Result<String, LlmError> {
        self.generate(SYSTEM_PROMPT, &victory_prompt(moves)).await
    }
}

/// A source with no backing service. Every request fails, so players see the fallback.
#[derive(Debug, Clone, Default)]
pub struct OfflineMessages;

#[async_trait]
impl VictoryMessageSource for OfflineMessages {
    async fn victory_message(&self, _moves: u32) -> Result<String, LlmError> {
        Err(LlmError::new("No victory message service configured".to_string()))
    }
}

/// Asks `source` for a victory message, substituting fixed text on failure.
///
/// Gives up after [`VICTORY_MESSAGE_TIMEOUT`].
#[instrument(skip(source))]
pub async fn fetch_victory_message(source: &dyn VictoryMessageSource, moves: u32) -> String {
    match tokio::time::timeout(VICTORY_MESSAGE_TIMEOUT, source.victory_message(moves)).await {
        Ok(Ok(text)) if text.trim().is_empty() => {
            info!("Victory message was empty");
            EMPTY_RESPONSE_MESSAGE.to_string()
        }
        Ok(Ok(text)) => {
            info!("Victory message received");
            text.trim().to_string()
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Victory message failed, using fallback");
            fallback_message(moves)
        }
        Err(_) => {
            warn!(
                timeout = ?VICTORY_MESSAGE_TIMEOUT,
                "Victory message timed out, using fallback"
            );
            fallback_message(moves)
        }
    }
}
