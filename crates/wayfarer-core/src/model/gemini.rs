//! Gemini-backed [`TextModel`] implementation.
//!
//! Talks to the `generateContent` REST endpoint. Configuration is read
//! once at startup into [`ModelConfig`] and passed in explicitly; there
//! is no ambient global state.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::TextModel;
use crate::error::Error;

/// Generative-model configuration.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// API key for the Gemini REST endpoint.
    pub api_key: String,
    /// Model identifier (e.g. "gemini-2.5-flash").
    pub model: String,
}

impl ModelConfig {
    /// The model used when `WAYFARER_GEMINI_MODEL` is unset.
    pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

    /// Build a config from the environment.
    ///
    /// `WAYFARER_GEMINI_API_KEY` is required; `WAYFARER_GEMINI_MODEL`
    /// overrides the default model identifier.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = env::var("WAYFARER_GEMINI_API_KEY")
            .map_err(|_| anyhow::anyhow!("WAYFARER_GEMINI_API_KEY is not set"))?;
        let model =
            env::var("WAYFARER_GEMINI_MODEL").unwrap_or_else(|_| Self::DEFAULT_MODEL.to_owned());
        Ok(Self { api_key, model })
    }
}

/// HTTP client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    config: ModelConfig,
    http: Client,
    base_url: String,
}

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

impl GeminiClient {
    pub fn new(config: ModelConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("reqwest client construction");
        Self {
            config,
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the endpoint base URL (used by tests against a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl TextModel for GeminiClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, Error> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.config.model, self.config.api_key
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("{} {}: {detail}", status.as_u16(), self.config.model)));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("malformed model response: {e}")))?;

        let text: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .concat()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::Upstream("model returned no candidates".to_string()));
        }

        Ok(text.trim().to_string())
    }
}
