//! Embedding provider abstraction and implementations.
//!
//! Defines the [`EmbeddingClient`] trait and concrete implementations:
//! - **[`DisabledEmbedding`]** — returns errors; used when embeddings are not configured.
//! - **[`GeminiEmbedding`]** — calls the Gemini batch embedding API.
//!
//! Every call carries a [`TaskHint`] distinguishing stored-document requests
//! from search-query requests; the hint is passed through to the provider
//! unchanged and lets it pick a representation strategy.
//!
//! There is no retry logic: a transient provider failure fails the whole
//! index or query operation, and the caller never persists partial results.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::EmbeddingConfig;

/// What the embedded text will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskHint {
    /// The text is a stored document being indexed.
    Document,
    /// The text is a search query.
    Query,
}

impl TaskHint {
    /// Provider wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "RETRIEVAL_DOCUMENT",
            Self::Query => "CODE_RETRIEVAL_QUERY",
        }
    }
}

/// Trait for embedding backends.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Embed a batch of texts, returning one vector per input text in the
    /// same order. An empty batch returns an empty result with no provider
    /// call. A response missing any vector fails the whole call; no
    /// partial results are returned.
    async fn embed(&self, texts: &[String], hint: TaskHint) -> Result<Vec<Vec<f32>>>;
}

/// Embed a single query string.
///
/// Convenience wrapper around [`EmbeddingClient::embed`] for the query
/// pipeline, which issues exactly one call carrying the query text.
pub async fn embed_query(client: &dyn EmbeddingClient, text: &str) -> Result<Vec<f32>> {
    let vectors = client.embed(&[text.to_string()], TaskHint::Query).await?;
    vectors
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("empty embedding response"))
}

// ============ Disabled client ============

/// A no-op embedding client that always returns errors.
///
/// Used when `embedding.provider = "disabled"` in the configuration.
pub struct DisabledEmbedding;

#[async_trait]
impl EmbeddingClient for DisabledEmbedding {
    async fn embed(&self, _texts: &[String], _hint: TaskHint) -> Result<Vec<Vec<f32>>> {
        bail!("Embedding provider is disabled")
    }
}

// ============ Gemini client ============

/// Embedding client for the Gemini API.
///
/// Calls `POST /v1beta/models/<model>:batchEmbedContents` with one request
/// entry per input text. Requires the `GOOGLE_API_KEY` environment variable.
pub struct GeminiEmbedding {
    model: String,
    api_key: String,
    http: reqwest::Client,
}

impl GeminiEmbedding {
    /// Create a new Gemini client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `model` is not set in config or if
    /// `GOOGLE_API_KEY` is not in the environment.
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow!("embedding.model required for Gemini provider"))?;

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
impl EmbeddingClient for GeminiEmbedding {
    async fn embed(&self, texts: &[String], hint: TaskHint) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:batchEmbedContents?key={}",
            self.model, self.api_key
        );

        let requests: Vec<serde_json::Value> = texts
            .iter()
            .map(|text| {
                serde_json::json!({
                    "model": format!("models/{}", self.model),
                    "content": { "parts": [ { "text": text } ] },
                    "taskType": hint.as_str(),
                })
            })
            .collect();

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "requests": requests }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("embedding API error {}: {}", status, body);
        }

        let json: serde_json::Value = response.json().await?;
        parse_embedding_response(&json, texts.len())
    }
}

/// Parse the provider response, requiring one vector per input text,
/// positionally aligned with the submitted batch.
fn parse_embedding_response(json: &serde_json::Value, expected: usize) -> Result<Vec<Vec<f32>>> {
    let embeddings = json
        .get("embeddings")
        .and_then(|e| e.as_array())
        .ok_or_else(|| anyhow!("invalid embedding response: missing embeddings array"))?;

    if embeddings.len() != expected {
        bail!(
            "invalid embedding response: {} texts submitted, {} vectors returned",
            expected,
            embeddings.len()
        );
    }

    let mut vectors = Vec::with_capacity(embeddings.len());
    for item in embeddings {
        let values = item
            .get("values")
            .and_then(|v| v.as_array())
            .ok_or_else(|| anyhow!("invalid embedding response: missing values"))?;

        let vector: Vec<f32> = values
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();

        vectors.push(vector);
    }

    Ok(vectors)
}

/// Create the appropriate [`EmbeddingClient`] based on configuration.
pub fn create_client(config: &EmbeddingConfig) -> Result<Box<dyn EmbeddingClient>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledEmbedding)),
        "gemini" => Ok(Box::new(GeminiEmbedding::new(config)?)),
        other => bail!("Unknown embedding provider: {}", other),
    }
}
