//! Query resolution: embed the query, search the index, normalize the hits.

use crate::config::{Settings, MAX_RESULTS};
use crate::embedding::{Embedder, HttpEmbedder};
use crate::error::{HivefindError, Result};
use crate::normalize::{normalize, DisplayRecord};
use crate::vector_store::{HttpVectorSearch, SearchOutcome, VectorSearch};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Message shown when the index answered without data.
pub const NO_RESULTS_MESSAGE: &str = "At capacity sorry :( Try again later";

/// Result of resolving a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Display records in index order. May be shorter than requested.
    Records(Vec<DisplayRecord>),
    /// The index had no usable payload; render [`NO_RESULTS_MESSAGE`].
    NoResults,
}

impl Resolution {
    /// Records held, or `None` for the no-results marker.
    pub fn records(&self) -> Option<&[DisplayRecord]> {
        match self {
            Resolution::Records(records) => Some(records),
            Resolution::NoResults => None,
        }
    }

    pub fn is_no_results(&self) -> bool {
        matches!(self, Resolution::NoResults)
    }
}

/// Runs the embed, search and normalize pipeline for one (query, limit).
#[derive(Clone)]
pub struct QueryResolver {
    embedder: Arc<dyn Embedder>,
    search: Arc<dyn VectorSearch>,
    max_limit: usize,
}

impl QueryResolver {
    /// Create a resolver over the given providers.
    pub fn new(embedder: Arc<dyn Embedder>, search: Arc<dyn VectorSearch>) -> Self {
        Self {
            embedder,
            search,
            max_limit: MAX_RESULTS,
        }
    }

    /// Build a resolver talking to the configured HTTP providers.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let embedder = Arc::new(HttpEmbedder::from_settings(&settings.embedding)?);
        let search = Arc::new(HttpVectorSearch::from_settings(&settings.vector_search)?);
        Ok(Self::new(embedder, search).with_max_limit(settings.max_limit()))
    }

    /// Set the cap applied to requested limits, bounded to `1..=MAX_RESULTS`.
    pub fn with_max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = max_limit.clamp(1, MAX_RESULTS);
        self
    }

    pub fn max_limit(&self) -> usize {
        self.max_limit
    }

    /// Trim the query and clamp the limit, rejecting inputs that can't be
    /// resolved.
    pub fn prepare<'q>(&self, query: &'q str, limit: usize) -> Result<(&'q str, usize)> {
        let query = query.trim();
        if query.is_empty() {
            return Err(HivefindError::InvalidInput("query is empty".to_string()));
        }
        if limit == 0 {
            return Err(HivefindError::InvalidInput(
                "limit must be at least 1".to_string(),
            ));
        }
        Ok((query, limit.min(self.max_limit)))
    }

    /// Resolve a query into at most `limit` display records.
    ///
    /// Upstream failures propagate. A search answer without data degrades to
    /// [`Resolution::NoResults`].
    #[instrument(skip(self, query))]
    pub async fn resolve(&self, query: &str, limit: usize) -> Result<Resolution> {
        let (query, k) = self.prepare(query, limit)?;
        info!("Querying for: {}", query);

        let vector = self.embedder.embed(query).await?;

        match self.search.search(&vector, k).await? {
            SearchOutcome::Hits(hits) => {
                info!("Resolved {} of {} requested hits", hits.len(), k);
                Ok(Resolution::Records(normalize(&hits, query)))
            }
            SearchOutcome::Degraded => {
                warn!("Vector search degraded for query, returning no-results marker");
                Ok(Resolution::NoResults)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Provider;
    use crate::testing::{CountingEmbedder, ScriptedSearch};
    use std::sync::atomic::Ordering;

    fn setup(available: usize) -> (QueryResolver, Arc<CountingEmbedder>, Arc<ScriptedSearch>) {
        let embedder = Arc::new(CountingEmbedder::default());
        let search = Arc::new(ScriptedSearch::with_available(available));
        let resolver = QueryResolver::new(embedder.clone(), search.clone());
        (resolver, embedder, search)
    }

    #[tokio::test]
    async fn test_resolve_normalizes_hits() {
        let (resolver, embedder, search) = setup(100);

        let resolution = resolver.resolve("  the fox ", 6).await.unwrap();
        let records = resolution.records().unwrap();

        assert_eq!(records.len(), 6);
        assert_eq!(embedder.calls(), 1);
        assert_eq!(search.calls(), 1);
        assert!(records.iter().all(|r| r.query == "the fox"));
        assert!(records[0].video_url.contains("/embed/vid0?start="));
        assert!(records[0]
            .clip_text
            .contains("<span class=\"highlight\">fox</span>"));
    }

    #[tokio::test]
    async fn test_resolve_clamps_limit() {
        let (resolver, _, search) = setup(100);

        let resolution = resolver.resolve("fox", 1000).await.unwrap();
        assert_eq!(search.last_k(), 30);
        assert_eq!(resolution.records().unwrap().len(), 30);

        let resolver = resolver.with_max_limit(12);
        resolver.resolve("fox", 18).await.unwrap();
        assert_eq!(search.last_k(), 12);
    }

    #[tokio::test]
    async fn test_max_limit_is_bounded_by_hard_cap() {
        let (resolver, _, search) = setup(200);
        let resolver = resolver.with_max_limit(100);
        assert_eq!(resolver.max_limit(), MAX_RESULTS);

        let resolution = resolver.resolve("fox", 1000).await.unwrap();
        assert_eq!(search.last_k(), 30);
        assert_eq!(resolution.records().unwrap().len(), 30);
    }

    #[tokio::test]
    async fn test_resolve_degraded_returns_marker() {
        let (resolver, _, search) = setup(100);
        search.degraded.store(true, Ordering::SeqCst);

        let resolution = resolver.resolve("fox", 6).await.unwrap();
        assert_eq!(resolution, Resolution::NoResults);
        assert!(resolution.records().is_none());
    }

    #[tokio::test]
    async fn test_resolve_short_result_is_not_an_error() {
        let (resolver, _, _) = setup(2);
        let resolution = resolver.resolve("fox", 6).await.unwrap();
        assert_eq!(resolution.records().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_resolve_propagates_upstream_errors() {
        let (resolver, embedder, search) = setup(100);

        embedder.fail.store(true, Ordering::SeqCst);
        let err = resolver.resolve("fox", 6).await.unwrap_err();
        assert_eq!(err.provider(), Some(Provider::Embedding));
        assert_eq!(search.calls(), 0);

        embedder.fail.store(false, Ordering::SeqCst);
        search.fail.store(true, Ordering::SeqCst);
        let err = resolver.resolve("fox", 6).await.unwrap_err();
        assert_eq!(err.provider(), Some(Provider::VectorSearch));
    }

    #[tokio::test]
    async fn test_resolve_over_memory_index() {
        use crate::vector_store::{MemoryVectorIndex, RawHit};

        let index = MemoryVectorIndex::new();
        let near = RawHit {
            clip_text: "the   Quick brown fox".to_string(),
            video_title: "Close match".to_string(),
            start: 3725,
            video_url: "https://www.youtube.com/watch?v=near&t=3725s".to_string(),
        };
        let far = RawHit {
            clip_text: "nothing relevant".to_string(),
            video_title: "Far match".to_string(),
            start: 65,
            video_url: "https://www.youtube.com/watch?v=far&t=65s".to_string(),
        };
        // CountingEmbedder always embeds to [0.1, 0.2, 0.3].
        index.insert(far, vec![-0.1, -0.2, -0.3]);
        index.insert(near, vec![0.1, 0.2, 0.3]);

        let resolver = QueryResolver::new(Arc::new(CountingEmbedder::default()), Arc::new(index));
        let resolution = resolver.resolve("quick fox", 6).await.unwrap();
        let records = resolution.records().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].video_title, "Close match");
        assert_eq!(records[0].timestamp(), "1:02:05");
        assert_eq!(records[0].video_url, "https://www.youtube.com/embed/near?start=3725s");
        assert_eq!(
            records[0].clip_text,
            "the <span class=\"highlight\">Quick</span> brown <span class=\"highlight\">fox</span>"
        );
        assert_eq!(records[1].timestamp(), "1:05");
    }

    #[tokio::test]
    async fn test_resolve_rejects_empty_query_without_upstream_calls() {
        let (resolver, embedder, _) = setup(100);

        assert!(matches!(
            resolver.resolve("   ", 6).await,
            Err(HivefindError::InvalidInput(_))
        ));
        assert!(matches!(
            resolver.resolve("fox", 0).await,
            Err(HivefindError::InvalidInput(_))
        ));
        assert_eq!(embedder.calls(), 0);
    }
}
