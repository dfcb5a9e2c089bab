//! MindFlip - a memory-matching card game for the terminal.
//!
//! The game rules live in [`mindflip_core`]; this crate adds the timing
//! shell, configuration, the LLM-backed victory message and the terminal UI.
//!
//! # Architecture
//!
//! - **Shell**: owns the session, schedules pair resolution after the dwell time
//! - **Victory**: one best-effort LLM call per win, with a fixed fallback
//! - **Config**: TOML game settings and provider credentials from the environment
//! - **TUI**: ratatui rendering of the board, stats and victory modal
//!
//! # Example
//!
//! ```no_run
//! use mindflip::{GameConfig, GameShell, OfflineMessages};
//! use mindflip_core::{CardId, GameRng};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GameConfig::default();
//! let mut shell = GameShell::new(
//!     config.symbol_set(),
//!     GameRng::new(7),
//!     config.dwell(),
//!     Arc::new(OfflineMessages),
//! )?;
//!
//! shell.card_clicked(CardId(0));
//! shell.card_clicked(CardId(1));
//! shell.settle().await;
//! assert_eq!(shell.view().move_count, 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod llm_client;
mod shell;
pub mod tui;
mod victory;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - Shell
pub use shell::{GameShell, Generation, ShellEvent, ShellView, VictoryState};

// Crate-level exports - Victory messages
pub use victory::{
    EMPTY_RESPONSE_MESSAGE, OfflineMessages, VICTORY_MESSAGE_TIMEOUT, VictoryMessageSource,
    fallback_message, fetch_victory_message, victory_prompt,
};
