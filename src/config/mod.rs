//! Configuration module for Hivefind.
//!
//! Handles loading settings from TOML and the environment.

mod settings;

pub use settings::{
    CacheSettings, EmbeddingSettings, GeneralSettings, SearchSettings, ServerSettings, Settings,
    VectorSearchSettings, MAX_RESULTS,
};
