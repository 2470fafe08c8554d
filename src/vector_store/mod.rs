//! Vector search abstraction for Hivefind.
//!
//! Provides a trait-based interface over the transcript chunk index.

mod memory;
mod remote;

pub use memory::MemoryVectorIndex;
pub use remote::HttpVectorSearch;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// Fields requested from the index for every hit.
pub const OUTPUT_FIELDS: [&str; 4] = ["clip_text", "video_title", "start", "video_url"];

/// A transcript chunk as returned by the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    /// Transcript text of the chunk.
    pub clip_text: String,
    /// Title of the video the chunk belongs to.
    pub video_title: String,
    /// Offset of the chunk in the video (seconds).
    #[serde(deserialize_with = "deserialize_seconds")]
    pub start: u64,
    /// Watch-page URL, usually with a `&t=` offset.
    pub video_url: String,
}

/// Accept integral or fractional second offsets, flooring the latter.
fn deserialize_seconds<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "invalid start offset: {}",
            value
        )));
    }
    Ok(value.floor() as u64)
}

/// Outcome of a vector search call that reached the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Ranked hits in provider order, at most `k` of them.
    Hits(Vec<RawHit>),
    /// The provider answered without a result payload (typically at capacity).
    Degraded,
}

/// Trait for vector search implementations.
#[async_trait]
pub trait VectorSearch: Send + Sync {
    /// Return up to `k` nearest transcript chunks for `vector`.
    async fn search(&self, vector: &[f32], k: usize) -> Result<SearchOutcome>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
