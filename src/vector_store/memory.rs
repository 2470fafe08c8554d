//! In-memory vector index implementation.
//!
//! Useful for testing and for experimenting with a small local corpus.

use super::{cosine_similarity, RawHit, SearchOutcome, VectorSearch};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::RwLock;

struct IndexedChunk {
    hit: RawHit,
    embedding: Vec<f32>,
}

/// In-memory vector index ranking chunks by cosine similarity.
pub struct MemoryVectorIndex {
    chunks: RwLock<Vec<IndexedChunk>>,
}

impl MemoryVectorIndex {
    /// Create a new, empty index.
    pub fn new() -> Self {
        Self {
            chunks: RwLock::new(Vec::new()),
        }
    }

    /// Add a chunk with its embedding.
    pub fn insert(&self, hit: RawHit, embedding: Vec<f32>) {
        let mut chunks = self.chunks.write().unwrap_or_else(|e| e.into_inner());
        chunks.push(IndexedChunk { hit, embedding });
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.chunks.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorSearch for MemoryVectorIndex {
    async fn search(&self, vector: &[f32], k: usize) -> Result<SearchOutcome> {
        let chunks = self.chunks.read().unwrap_or_else(|e| e.into_inner());

        let mut scored: Vec<(f32, &RawHit)> = chunks
            .iter()
            .map(|c| (cosine_similarity(vector, &c.embedding), &c.hit))
            .collect();

        // Stable sort keeps insertion order among ties.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(SearchOutcome::Hits(
            scored.into_iter().map(|(_, hit)| hit.clone()).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(title: &str, start: u64) -> RawHit {
        RawHit {
            clip_text: format!("{} text", title),
            video_title: title.to_string(),
            start,
            video_url: format!("https://www.youtube.com/watch?v={}&t={}s", title, start),
        }
    }

    #[tokio::test]
    async fn test_memory_vector_index() {
        let index = MemoryVectorIndex::new();
        assert!(index.is_empty());

        index.insert(hit("east", 10), vec![1.0, 0.0, 0.0]);
        index.insert(hit("north", 20), vec![0.0, 1.0, 0.0]);
        index.insert(hit("northeast", 30), vec![0.7, 0.7, 0.0]);
        assert_eq!(index.len(), 3);

        let SearchOutcome::Hits(results) = index.search(&[1.0, 0.0, 0.0], 10).await.unwrap()
        else {
            panic!("memory index never degrades");
        };
        let titles: Vec<&str> = results.iter().map(|h| h.video_title.as_str()).collect();
        assert_eq!(titles, vec!["east", "northeast", "north"]);

        let SearchOutcome::Hits(results) = index.search(&[0.0, 1.0, 0.0], 1).await.unwrap()
        else {
            panic!("memory index never degrades");
        };
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].video_title, "north");
    }
}
