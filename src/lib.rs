//! Hivefind - semantic search over video transcripts
//!
//! Turns a natural-language query into an embedding, asks a vector index for
//! the closest transcript chunks, and serves them as highlighted records that
//! link into an embeddable player at the right moment.
//!
//! # Architecture
//!
//! - `embedding` - Query embedding clients
//! - `vector_store` - Vector search clients and the raw hit type
//! - `normalize` - Raw hit to display record conversion
//! - `resolver` - Embed, search and normalize for one (query, limit)
//! - `cache` - Limit-aware memoization of resolutions
//! - `config` - Configuration management
//! - `cli` - Command line and HTTP surfaces
//!
//! # Example
//!
//! ```rust,no_run
//! use hivefind::cache::ResolutionCache;
//! use hivefind::config::Settings;
//! use hivefind::resolver::QueryResolver;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let resolver = QueryResolver::from_settings(&settings)?;
//!     let cache = ResolutionCache::from_settings(resolver, &settings.cache);
//!
//!     let page = cache.get_or_resolve("what is a hivemind", 6).await?;
//!     if let Some(records) = page.records() {
//!         for record in records {
//!             println!("{} @ {}", record.video_title, record.timestamp());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod http;
pub mod normalize;
pub mod resolver;
pub mod vector_store;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{HivefindError, Result};
