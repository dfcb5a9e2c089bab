//! Game configuration loaded from TOML.

use crate::llm_client::{LlmConfig, LlmProvider};
use derive_getters::Getters;
use derive_more::{Display, Error};
use mindflip_core::{DEFAULT_SYMBOLS, Symbol};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration for a MindFlip game.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Distinct card symbols; each is dealt twice.
    #[serde(default = "default_symbols")]
    symbols: Vec<String>,

    /// How long both cards of a pair stay visible before resolution, in milliseconds.
    #[serde(default = "default_dwell_ms")]
    dwell_ms: u64,

    /// Fixed shuffle seed. Drawn from entropy when absent.
    #[serde(default)]
    seed: Option<u64>,

    /// LLM provider for victory messages.
    #[serde(default = "default_provider")]
    llm_provider: LlmProvider,

    /// LLM model name.
    #[serde(default = "default_model")]
    llm_model: String,

    /// Maximum tokens for the victory message.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    llm_temperature: f32,

    /// Nucleus sampling threshold.
    #[serde(default = "default_top_p")]
    llm_top_p: f32,
}

fn default_symbols() -> Vec<String> {
    DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
}

fn default_dwell_ms() -> u64 {
    800
}

fn default_provider() -> LlmProvider {
    LlmProvider::Gemini
}

fn default_model() -> String {
    default_provider().default_model().to_string()
}

fn default_max_tokens() -> u32 {
    60
}

fn default_temperature() -> f32 {
    0.8
}

fn default_top_p() -> f32 {
    0.95
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            dwell_ms: default_dwell_ms(),
            seed: None,
            llm_provider: default_provider(),
            llm_model: default_model(),
            llm_max_tokens: default_max_tokens(),
            llm_temperature: default_temperature(),
            llm_top_p: default_top_p(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(pairs = config.symbols.len(), "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        if config.dwell_ms == 0 {
            return Err(ConfigError::new("dwell_ms must be greater than zero".to_string()));
        }
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise falls back to defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Overrides the shuffle seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }

    /// Overrides the dwell time.
    pub fn with_dwell_ms(mut self, dwell_ms: Option<u64>) -> Self {
        if let Some(ms) = dwell_ms.filter(|ms| *ms > 0) {
            self.dwell_ms = ms;
        }
        self
    }

    /// Switches to another provider and its default model.
    pub fn with_provider(mut self, provider: Option<LlmProvider>) -> Self {
        if let Some(provider) = provider.filter(|p| *p != self.llm_provider) {
            self.llm_provider = provider;
            self.llm_model = provider.default_model().to_string();
        }
        self
    }

    /// Symbols as game tokens.
    pub fn symbol_set(&self) -> Vec<Symbol> {
        self.symbols.iter().cloned().map(Symbol::from).collect()
    }

    /// Dwell time as a duration.
    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }

    /// Creates LLM configuration from this config.
    ///
    /// Reads the API key from the provider's environment variable(s).
    #[instrument(skip(self), fields(provider = ?self.llm_provider, model = %self.llm_model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");
        let vars = self.llm_provider.api_key_vars();
        let api_key = vars
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|key| !key.is_empty()))
            .ok_or_else(|| {
                ConfigError::new(format!("{} environment variable not set", vars.join(" or ")))
            })?;

        Ok(LlmConfig::new(
            self.llm_provider,
            api_key,
            self.llm_model.clone(),
            self.llm_max_tokens,
        )
        .with_sampling(self.llm_temperature, self.llm_top_p))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
