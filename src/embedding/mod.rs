//! Embedding generation for query text.

mod http;

pub use http::HttpEmbedder;

use crate::error::Result;
use async_trait::async_trait;

/// Embedding of a query, passed through to the vector index untouched.
pub type EmbeddingVector = Vec<f32>;

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single trimmed, non-empty text.
    async fn embed(&self, text: &str) -> Result<EmbeddingVector>;
}
