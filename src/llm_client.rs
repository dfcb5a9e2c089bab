//! LLM API client abstraction for Gemini, OpenAI and Anthropic.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";

/// Per-request limit for provider calls.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// LLM provider selection.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini.
    Gemini,
    /// OpenAI (GPT models).
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

impl LlmProvider {
    /// Environment variables holding the API key, in lookup order.
    pub fn api_key_vars(self) -> &'static [&'static str] {
        match self {
            LlmProvider::Gemini => &["GEMINI_API_KEY", "API_KEY"],
            LlmProvider::OpenAI => &["OPENAI_API_KEY"],
            LlmProvider::Anthropic => &["ANTHROPIC_API_KEY"],
        }
    }

    /// Model used when none is configured for this provider.
    pub fn default_model(self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini-3-flash-preview",
            LlmProvider::OpenAI => "gpt-4o-mini",
            LlmProvider::Anthropic => "claude-3-5-haiku-20241022",
        }
    }
}

/// Configuration for LLM client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    provider: LlmProvider,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

impl LlmConfig {
    /// Creates a new LLM configuration with default sampling (temperature 0.8, top-p 0.95).
    #[instrument(skip(api_key), fields(provider = ?provider, model = %model))]
    pub fn new(provider: LlmProvider, api_key: String, model: String, max_tokens: u32) -> Self {
        debug!("Creating LLM config");
        Self {
            provider,
            api_key,
            model,
            max_tokens,
            temperature: 0.8,
            top_p: 0.95,
        }
    }

    /// Overrides the sampling parameters.
    pub fn with_sampling(mut self, temperature: f32, top_p: f32) -> Self {
        self.temperature = temperature;
        self.top_p = top_p;
        self
    }

    /// Gets the provider.
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Gets the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Gets the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Gets the max tokens.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Gets the sampling temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Gets the nucleus sampling threshold.
    pub fn top_p(&self) -> f32 {
        self.top_p
    }
}

/// LLM client that abstracts over multiple providers.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Creates a new LLM client.
    #[instrument(skip(config), fields(provider = ?config.provider()))]
    pub fn new(config: LlmConfig) -> Self {
        info!("Creating LLM client");
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build HTTP client with timeout, using defaults");
                reqwest::Client::new()
            });
        Self { config, http }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Generates a completion from a system prompt and user message.
    #[instrument(skip(self, system_prompt, user_message), fields(provider = ?self.config.provider, model = %self.config.model))]
    pub async fn generate(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        debug!("Generating completion");
        let content = match self.config.provider {
            LlmProvider::Gemini => self.generate_gemini(system_prompt, user_message).await?,
            LlmProvider::OpenAI => self.generate_openai(system_prompt, user_message).await?,
            LlmProvider::Anthropic => self.generate_anthropic(system_prompt, user_message).await?,
        };
        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }

    /// Generates a completion using Gemini `generateContent`.
    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_gemini(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        let url = format!("{}/{}:generateContent", GEMINI_URL, self.config.model);
        let body = serde_json::json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": [{ "role": "user", "parts": [{ "text": user_message }] }],
            "generationConfig": {
                "temperature": self.config.temperature,
                "topP": self.config.top_p,
                "maxOutputTokens": self.config.max_tokens,
            }
        });

        let request = self
            .http
            .post(url)
            .header("x-goog-api-key", self.config.api_key.clone())
            .json(&body);
        let json = send_json("Gemini", request).await?;

        json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                error!(response = %json, "No text content in Gemini response");
                LlmError::new("No text content in Gemini response".to_string())
            })
    }

    /// Generates a completion using OpenAI chat completions.
    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_openai(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "top_p": self.config.top_p,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_message }
            ]
        });

        let request = self
            .http
            .post(OPENAI_URL)
            .bearer_auth(&self.config.api_key)
            .json(&body);
        let json = send_json("OpenAI", request).await?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                error!(response = %json, "No content in OpenAI response");
                LlmError::new("No content in OpenAI response".to_string())
            })
    }

    /// Generates a completion using Anthropic Claude.
    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_anthropic(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": system_prompt,
            "messages": [
                {
                    "role": "user",
                    "content": user_message
                }
            ]
        });

        let request = self
            .http
            .post(ANTHROPIC_URL)
            .header("x-api-key", self.config.api_key.clone())
            .header("anthropic-version", "2023-06-01")
            .json(&body);
        let json = send_json("Anthropic", request).await?;

        json["content"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                error!(response = %json, "No text content in Anthropic response");
                LlmError::new("No text content in Anthropic response".to_string())
            })
    }
}

/// Sends a request and parses a successful response body as JSON.
#[instrument(skip(request))]
async fn send_json(
    provider: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<serde_json::Value, LlmError> {
    debug!("Sending request");
    let response = request.send().await.map_err(|e| {
        error!(error = ?e, "API request failed");
        LlmError::new(format!("{} API request failed: {}", provider, e))
    })?;

    let status = response.status();
    let response_text = response.text().await.map_err(|e| {
        error!(error = ?e, "Failed to read response");
        LlmError::new(format!("Failed to read {} response: {}", provider, e))
    })?;

    if !status.is_success() {
        error!(status = %status, response = %response_text, "API error");
        return Err(LlmError::new(format!(
            "{} API error {}: {}",
            provider, status, response_text
        )));
    }

    debug!(response_length = response_text.len(), "Parsing response");
    serde_json::from_str(&response_text).map_err(|e| {
        error!(error = ?e, response = %response_text, "Failed to parse response");
        LlmError::new(format!("Failed to parse {} response: {}", provider, e))
    })
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "LLM error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
