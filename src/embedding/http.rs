//! HTTP inference-endpoint embeddings.

use super::{Embedder, EmbeddingVector};
use crate::config::EmbeddingSettings;
use crate::error::{HivefindError, Provider, Result};
use crate::http::{check_status, create_client_with_timeout};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    inputs: &'a str,
}

/// Feature-extraction endpoints answer either with a single vector or with one
/// row per input.
#[derive(Deserialize)]
#[serde(untagged)]
enum EmbeddingResponse {
    Flat(Vec<f32>),
    Nested(Vec<Vec<f32>>),
}

/// Embedder backed by an HTTP inference endpoint with bearer auth.
pub struct HttpEmbedder {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl HttpEmbedder {
    /// Create a new embedder for the given endpoint.
    pub fn new(api_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(Provider::Embedding, timeout)?,
            api_url: api_url.to_string(),
            api_key,
        })
    }

    /// Create an embedder from configuration.
    pub fn from_settings(settings: &EmbeddingSettings) -> Result<Self> {
        if settings.api_url.is_empty() {
            return Err(HivefindError::Config(
                "embedding.api_url is not set (or export HF_API_URL)".to_string(),
            ));
        }
        Self::new(
            &settings.api_url,
            settings.api_key.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }
}

/// Extract the query vector from a provider response body.
pub(crate) fn parse_embedding(body: serde_json::Value) -> Result<EmbeddingVector> {
    let parsed: EmbeddingResponse = serde_json::from_value(body).map_err(|e| {
        HivefindError::upstream(Provider::Embedding, format!("unexpected response shape: {}", e))
    })?;

    let vector = match parsed {
        EmbeddingResponse::Flat(v) => v,
        EmbeddingResponse::Nested(rows) => rows.into_iter().next().unwrap_or_default(),
    };

    if vector.is_empty() {
        return Err(HivefindError::upstream(
            Provider::Embedding,
            "empty embedding response",
        ));
    }

    Ok(vector)
}

#[async_trait]
impl Embedder for HttpEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        let mut request = self
            .client
            .post(&self.api_url)
            .json(&EmbeddingRequest { inputs: text });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = check_status(Provider::Embedding, request.send().await).await?;
        let body: serde_json::Value = response.json().await.map_err(|e| {
            HivefindError::upstream(Provider::Embedding, format!("invalid JSON body: {}", e))
        })?;

        let vector = parse_embedding(body)?;
        debug!("Embedded query into {} dimensions", vector.len());
        Ok(vector)
    }
}
