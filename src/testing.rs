//! Counting fakes for the upstream providers, shared by unit tests.

use crate::embedding::{Embedder, EmbeddingVector};
use crate::error::{HivefindError, Provider, Result};
use crate::vector_store::{RawHit, SearchOutcome, VectorSearch};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Embedder returning a fixed vector and counting calls.
#[derive(Default)]
pub struct CountingEmbedder {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
}

impl CountingEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for CountingEmbedder {
    async fn embed(&self, _text: &str) -> Result<EmbeddingVector> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(HivefindError::upstream(Provider::Embedding, "HTTP 503"));
        }
        Ok(vec![0.1, 0.2, 0.3])
    }
}

/// Vector search over a corpus of `available` synthetic hits.
pub struct ScriptedSearch {
    pub available: AtomicUsize,
    pub degraded: AtomicBool,
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
    pub last_k: AtomicUsize,
    pub delay: Duration,
}

impl ScriptedSearch {
    pub fn with_available(available: usize) -> Self {
        Self {
            available: AtomicUsize::new(available),
            degraded: AtomicBool::new(false),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            last_k: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_k(&self) -> usize {
        self.last_k.load(Ordering::SeqCst)
    }
}

pub fn sample_hit(i: usize) -> RawHit {
    RawHit {
        clip_text: format!("clip number {} about the fox", i),
        video_title: format!("Episode {}", i),
        start: (i as u64) * 61,
        video_url: format!("https://www.youtube.com/watch?v=vid{}&t={}s", i, i * 61),
    }
}

#[async_trait]
impl VectorSearch for ScriptedSearch {
    async fn search(&self, _vector: &[f32], k: usize) -> Result<SearchOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_k.store(k, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(HivefindError::upstream(Provider::VectorSearch, "connection reset"));
        }
        if self.degraded.load(Ordering::SeqCst) {
            return Ok(SearchOutcome::Degraded);
        }

        let n = k.min(self.available.load(Ordering::SeqCst));
        Ok(SearchOutcome::Hits((0..n).map(sample_hit).collect()))
    }
}
