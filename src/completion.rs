//! Completion provider client.
//!
//! The assembled grounding prompt is the entire request payload; the
//! provider's first candidate text is the answer. Like the embedding client,
//! there is no retry logic: failures propagate to the caller.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::CompletionConfig;

/// Trait for completion backends.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate text from a single rendered prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// A no-op completion client that always returns errors.
pub struct DisabledCompletion;

#[async_trait]
impl CompletionClient for DisabledCompletion {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        bail!("Completion provider is disabled")
    }
}

/// Completion client for the Gemini API.
///
/// Calls `POST /v1beta/models/<model>:generateContent` with the prompt as
/// the single content part. Requires the `GOOGLE_API_KEY` environment
/// variable.
pub struct GeminiCompletion {
    model: String,
    api_key: String,
    http: reqwest::Client,
}

impl GeminiCompletion {
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow!("completion.model required for Gemini provider"))?;

        let api_key = std::env::var("GOOGLE_API_KEY")
            .map_err(|_| anyhow!("GOOGLE_API_KEY environment variable not set"))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            model,
            api_key,
            http,
        })
    }
}

#[async_trait]
impl CompletionClient for GeminiCompletion {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let body = serde_json::json!({
            "contents": [ { "parts": [ { "text": prompt } ] } ],
        });

        let response = self.http.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("completion API error {}: {}", status, body_text);
        }

        let json: serde_json::Value = response.json().await?;
        parse_completion_response(&json)
    }
}

/// Extract the first candidate's text from the provider response.
fn parse_completion_response(json: &serde_json::Value) -> Result<String> {
    json.pointer("/candidates/0/content/parts/0/text")
        .and_then(|t| t.as_str())
        .map(|t| t.to_string())
        .ok_or_else(|| anyhow!("invalid completion response: missing candidate text"))
}

/// Create the appropriate [`CompletionClient`] based on configuration.
pub fn create_client(config: &CompletionConfig) -> Result<Box<dyn CompletionClient>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledCompletion)),
        "gemini" => Ok(Box::new(GeminiCompletion::new(config)?)),
        other => bail!("Unknown completion provider: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_response_takes_first_candidate() {
        let json = serde_json::json!({
            "candidates": [
                { "content": { "parts": [ { "text": "answer one" } ] } },
                { "content": { "parts": [ { "text": "answer two" } ] } },
            ]
        });
        assert_eq!(parse_completion_response(&json).unwrap(), "answer one");
    }

    #[test]
    fn parse_response_missing_text_fails() {
        let json = serde_json::json!({ "candidates": [] });
        assert!(parse_completion_response(&json).is_err());
    }

    #[tokio::test]
    async fn disabled_client_errors() {
        assert!(DisabledCompletion.generate("prompt").await.is_err());
    }
}
