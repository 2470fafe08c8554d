//! Hosted vector index client (Zilliz/Milvus REST search).

use super::{RawHit, SearchOutcome, VectorSearch, OUTPUT_FIELDS};
use crate::config::VectorSearchSettings;
use crate::error::{HivefindError, Provider, Result};
use crate::http::{check_status, create_client_with_timeout};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    collection_name: &'a str,
    limit: usize,
    output_fields: [&'static str; 4],
    vector: &'a [f32],
}

/// Vector search over HTTP with bearer auth.
pub struct HttpVectorSearch {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    collection_name: String,
}

impl HttpVectorSearch {
    /// Create a new client for the given endpoint and collection.
    pub fn new(
        api_url: &str,
        api_key: Option<String>,
        collection_name: &str,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(Provider::VectorSearch, timeout)?,
            api_url: api_url.to_string(),
            api_key,
            collection_name: collection_name.to_string(),
        })
    }

    /// Create a client from configuration.
    pub fn from_settings(settings: &VectorSearchSettings) -> Result<Self> {
        if settings.api_url.is_empty() {
            return Err(HivefindError::Config(
                "vector_search.api_url is not set (or export ZZ_API_URL)".to_string(),
            ));
        }
        Self::new(
            &settings.api_url,
            settings.api_key.clone(),
            &settings.collection_name,
            Duration::from_secs(settings.timeout_secs),
        )
    }
}

/// Interpret a search response body.
///
/// No `data` field means the provider declined to answer, which is reported
/// as [`SearchOutcome::Degraded`]. A `data` field holding malformed hits is
/// an upstream error.
pub(crate) fn parse_search_response(body: Value, k: usize) -> Result<SearchOutcome> {
    let data = match body {
        Value::Object(mut map) => map.remove("data"),
        _ => None,
    };

    let data = match data {
        Some(Value::Null) | None => return Ok(SearchOutcome::Degraded),
        Some(data) => data,
    };

    let mut hits: Vec<RawHit> = serde_json::from_value(data).map_err(|e| {
        HivefindError::upstream(Provider::VectorSearch, format!("malformed hit: {}", e))
    })?;
    hits.truncate(k);

    Ok(SearchOutcome::Hits(hits))
}

#[async_trait]
impl VectorSearch for HttpVectorSearch {
    #[instrument(skip(self, vector), fields(dims = vector.len()))]
    async fn search(&self, vector: &[f32], k: usize) -> Result<SearchOutcome> {
        if k == 0 {
            return Err(HivefindError::InvalidInput(
                "search limit must be at least 1".to_string(),
            ));
        }

        let payload = SearchRequest {
            collection_name: &self.collection_name,
            limit: k,
            output_fields: OUTPUT_FIELDS,
            vector,
        };

        let mut request = self.client.post(&self.api_url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = check_status(Provider::VectorSearch, request.send().await).await?;
        let body: Value = response.json().await.map_err(|e| {
            HivefindError::upstream(Provider::VectorSearch, format!("invalid JSON body: {}", e))
        })?;

        let outcome = parse_search_response(body, k)?;
        match &outcome {
            SearchOutcome::Hits(hits) => debug!("Vector search returned {} hits", hits.len()),
            SearchOutcome::Degraded => warn!("Vector search response carried no data"),
        }
        Ok(outcome)
    }
}
