//! Resolution cache keyed by (query, limit).
//!
//! An entry is only served when it holds exactly as many records as its key's
//! limit. Short pages and no-results markers are never stored, so the next
//! request for the same key re-runs the resolution instead of replaying a
//! degraded answer.

use crate::config::CacheSettings;
use crate::error::Result;
use crate::normalize::DisplayRecord;
use crate::resolver::{QueryResolver, Resolution};
use lru::LruCache;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default number of cached (query, limit) entries.
const DEFAULT_CAPACITY: usize = 1024;

/// Cache size is logged every this many stores.
const SIZE_LOG_INTERVAL: u64 = 100;

/// Cache key: trimmed query and clamped limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub query: String,
    pub limit: usize,
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "find_clip:{}:{}", self.query, self.limit)
    }
}

/// Per-key resolution lock and the number of requests holding it.
struct Flight {
    lock: Arc<tokio::sync::Mutex<()>>,
    holders: usize,
}

/// A request's claim on a key's [`Flight`]; dropping it releases the claim,
/// including when the request future is cancelled.
struct FlightGuard<'a> {
    in_flight: &'a Mutex<HashMap<CacheKey, Flight>>,
    key: CacheKey,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.lock();
        if let Some(flight) = in_flight.get_mut(&self.key) {
            flight.holders = flight.holders.saturating_sub(1);
            if flight.holders == 0 {
                in_flight.remove(&self.key);
            }
        }
    }
}

#[derive(Debug, Clone)]
struct CachedEntry {
    records: Vec<DisplayRecord>,
    cached_at: Instant,
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    /// Requests answered from the cache.
    pub hits: u64,
    /// Requests that had to resolve (or wait on a resolution).
    pub misses: u64,
    /// Requests answered by a concurrent resolution of the same key.
    pub coalesced: u64,
    /// Full pages stored.
    pub stores: u64,
    /// Short pages returned without being stored.
    pub skipped_short: u64,
    /// No-results markers returned without being stored.
    pub degraded: u64,
    /// Entries currently held.
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of requests answered from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Memoizes [`QueryResolver::resolve`] with limit-aware validity.
///
/// Concurrent requests for the same key share one upstream resolution.
pub struct ResolutionCache {
    resolver: QueryResolver,
    entries: Mutex<LruCache<CacheKey, CachedEntry>>,
    in_flight: Mutex<HashMap<CacheKey, Flight>>,
    ttl: Option<Duration>,
    stats: Mutex<CacheStats>,
}

impl ResolutionCache {
    /// Create a cache with default capacity and no expiry.
    pub fn new(resolver: QueryResolver) -> Self {
        Self::with_capacity(resolver, DEFAULT_CAPACITY, None)
    }

    /// Create a cache with a custom capacity and optional entry lifetime.
    pub fn with_capacity(resolver: QueryResolver, capacity: usize, ttl: Option<Duration>) -> Self {
        Self {
            resolver,
            entries: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            in_flight: Mutex::new(HashMap::new()),
            ttl,
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// Create a cache from configuration.
    pub fn from_settings(resolver: QueryResolver, settings: &CacheSettings) -> Self {
        let ttl = (settings.ttl_secs > 0).then(|| Duration::from_secs(settings.ttl_secs));
        Self::with_capacity(resolver, settings.capacity, ttl)
    }

    /// Serve a full cached page for (query, limit), or resolve it.
    ///
    /// The result is stored only when it holds exactly `limit` records after
    /// clamping.
    pub async fn get_or_resolve(&self, query: &str, limit: usize) -> Result<Resolution> {
        let (query, limit) = self.resolver.prepare(query, limit)?;
        let key = CacheKey {
            query: query.to_string(),
            limit,
        };

        if let Some(records) = self.lookup(&key) {
            debug!("Using cached results: {}", key);
            self.stats.lock().hits += 1;
            return Ok(Resolution::Records(records));
        }
        self.stats.lock().misses += 1;

        let flight = self.join_flight(&key);
        let _turn = flight.lock.lock().await;

        // Someone may have filled the entry while we waited.
        if let Some(records) = self.lookup(&key) {
            debug!("Using results resolved concurrently: {}", key);
            self.stats.lock().coalesced += 1;
            return Ok(Resolution::Records(records));
        }

        let result = self.resolver.resolve(query, limit).await;
        if let Ok(resolution) = &result {
            self.record_outcome(&key, resolution);
        }
        result
    }

    /// Store full pages; count everything else.
    fn record_outcome(&self, key: &CacheKey, resolution: &Resolution) {
        let limit = key.limit;
        match resolution {
            Resolution::Records(records) if records.len() == limit => {
                self.store(key.clone(), records.clone());
            }
            Resolution::Records(records) => {
                debug!(
                    "Not caching short page {} ({} of {} records)",
                    key,
                    records.len(),
                    limit
                );
                self.stats.lock().skipped_short += 1;
            }
            Resolution::NoResults => {
                debug!("Not caching no-results marker for {}", key);
                self.stats.lock().degraded += 1;
            }
        }
    }

    /// Current statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.lock().clone();
        stats.entries = self.entries.lock().len();
        stats
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// A valid, unexpired entry for `key`.
    fn lookup(&self, key: &CacheKey) -> Option<Vec<DisplayRecord>> {
        let mut entries = self.entries.lock();
        let usable = {
            let entry = entries.peek(key)?;
            let expired = self.ttl.is_some_and(|ttl| entry.cached_at.elapsed() >= ttl);
            !expired && entry.records.len() == key.limit
        };

        if !usable {
            entries.pop(key);
            return None;
        }

        entries.get(key).map(|entry| entry.records.clone())
    }

    fn store(&self, key: CacheKey, records: Vec<DisplayRecord>) {
        debug!("Caching results: {}", key);
        let size = {
            let mut entries = self.entries.lock();
            entries.put(
                key,
                CachedEntry {
                    records,
                    cached_at: Instant::now(),
                },
            );
            entries.len()
        };

        let stores = {
            let mut stats = self.stats.lock();
            stats.stores += 1;
            stats.stores
        };
        if stores % SIZE_LOG_INTERVAL == 0 {
            info!("Cache size: {}", size);
        }
    }

    /// Claim the per-key lock serializing resolutions of the same key.
    fn join_flight(&self, key: &CacheKey) -> FlightGuard<'_> {
        let mut in_flight = self.in_flight.lock();
        let flight = in_flight.entry(key.clone()).or_insert_with(|| Flight {
            lock: Arc::new(tokio::sync::Mutex::new(())),
            holders: 0,
        });
        flight.holders += 1;

        FlightGuard {
            in_flight: &self.in_flight,
            key: key.clone(),
            lock: flight.lock.clone(),
        }
    }
}
