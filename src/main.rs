//! MindFlip - command-line entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use mindflip::{
    GameConfig, GameShell, LlmClient, LlmProvider, OfflineMessages, VictoryMessageSource,
    fetch_victory_message,
};
use mindflip_core::GameRng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            seed,
            dwell_ms,
            log_file,
        } => run_play(config, seed, dwell_ms, log_file).await,
        Command::Quote {
            moves,
            config,
            provider,
        } => run_quote(moves, config, provider).await,
    }
}

/// Play a game in the terminal.
async fn run_play(
    config_path: PathBuf,
    seed: Option<u64>,
    dwell_ms: Option<u64>,
    log_file: PathBuf,
) -> Result<()> {
    mindflip::tui::init_file_logging(&log_file)?;

    let config = load_config(&config_path)?
        .with_seed(seed)
        .with_dwell_ms(dwell_ms);

    let rng = (*config.seed())
        .map(GameRng::new)
        .unwrap_or_else(GameRng::from_entropy);
    info!(seed = rng.seed(), "Dealing first game");
    let shell = GameShell::new(
        config.symbol_set(),
        rng,
        config.dwell(),
        message_source(&config),
    )?;

    mindflip::tui::run_tui(shell).await
}

/// Fetch one victory message and print it.
#[instrument(skip(config_path), fields(config_path = %config_path.display()))]
async fn run_quote(moves: u32, config_path: PathBuf, provider: Option<LlmProvider>) -> Result<()> {
    initialize_tracing();

    let config = load_config(&config_path)?.with_provider(provider);
    let source = message_source(&config);
    let message = fetch_victory_message(source.as_ref(), moves).await;
    println!("{}", message);
    Ok(())
}

#[instrument(skip(config_path))]
fn load_config(config_path: &Path) -> Result<GameConfig> {
    info!("Loading game configuration");
    Ok(GameConfig::load_or_default(config_path)?)
}

/// Picks the victory message source: the configured LLM, or offline when no key is set.
#[instrument(skip(config), fields(provider = %config.llm_provider()))]
fn message_source(config: &GameConfig) -> Arc<dyn VictoryMessageSource> {
    match config.create_llm_config() {
        Ok(llm_config) => Arc::new(LlmClient::new(llm_config)),
        Err(e) => {
            warn!(error = %e, "No LLM credentials, victory messages will use the fallback");
            Arc::new(OfflineMessages)
        }
    }
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn,mindflip=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
