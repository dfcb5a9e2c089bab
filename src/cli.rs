//! Command-line interface for mindflip.

use clap::{Parser, Subcommand};

/// MindFlip - memory-matching card game
#[derive(Parser, Debug)]
#[command(name = "mindflip")]
#[command(about = "Match the pairs, earn a cheer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Path to the game config (defaults are used if it does not exist)
        #[arg(short, long, default_value = "mindflip.toml")]
        config: std::path::PathBuf,

        /// Fixed shuffle seed
        #[arg(long)]
        seed: Option<u64>,

        /// Milliseconds both cards stay visible before a pair resolves
        #[arg(long)]
        dwell_ms: Option<u64>,

        /// Log file path
        #[arg(long, default_value = "mindflip.log")]
        log_file: std::path::PathBuf,
    },

    /// Fetch one victory message and print it
    Quote {
        /// Move count to congratulate
        #[arg(short, long)]
        moves: u32,

        /// Path to the game config (defaults are used if it does not exist)
        #[arg(short, long, default_value = "mindflip.toml")]
        config: std::path::PathBuf,

        /// Override the configured LLM provider (gemini, openai, anthropic)
        #[arg(long)]
        provider: Option<mindflip::LlmProvider>,
    },
}
