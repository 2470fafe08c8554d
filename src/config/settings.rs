//! Configuration settings for Hivefind.

use crate::error::{HivefindError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Hard cap on results per resolution, whatever the config file says.
pub const MAX_RESULTS: usize = 30;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub embedding: EmbeddingSettings,
    pub vector_search: VectorSearchSettings,
    pub search: SearchSettings,
    pub cache: CacheSettings,
    pub server: ServerSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Embedding provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Inference endpoint that turns `{"inputs": text}` into a vector.
    pub api_url: String,
    /// Bearer token. Usually supplied through `HF_API_KEY` instead.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// Vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorSearchSettings {
    /// Vector search endpoint.
    pub api_url: String,
    /// Bearer token. Usually supplied through `ZZ_API_KEY` instead.
    pub api_key: Option<String>,
    /// Collection holding the transcript chunks.
    pub collection_name: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for VectorSearchSettings {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: None,
            collection_name: "TranscriptChunks".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Result paging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Page size of a fresh search.
    pub default_limit: usize,
    /// Cap on the number of results per resolution (never above 30).
    pub max_limit: usize,
    /// How much "load more" grows the limit by.
    pub page_increment: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_limit: 6,
            max_limit: 30,
            page_increment: 6,
        }
    }
}

/// Resolution cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Maximum number of cached (query, limit) entries.
    pub capacity: usize,
    /// Entry lifetime in seconds (0 disables expiry).
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: 1024,
            ttl_secs: 0,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment overrides are applied on top of the file contents.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Apply `HF_API_URL`, `HF_API_KEY`, `ZZ_API_URL` and `ZZ_API_KEY`.
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("HF_API_URL") {
            self.embedding.api_url = url;
        }
        if let Some(key) = get("HF_API_KEY") {
            self.embedding.api_key = Some(key);
        }
        if let Some(url) = get("ZZ_API_URL") {
            self.vector_search.api_url = url;
        }
        if let Some(key) = get("ZZ_API_KEY") {
            self.vector_search.api_key = Some(key);
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| HivefindError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hivefind")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Configured `max_limit`, bounded to `1..=MAX_RESULTS`.
    pub fn max_limit(&self) -> usize {
        self.search.max_limit.clamp(1, MAX_RESULTS)
    }

    /// Clamp a requested result count into `1..=max_limit`.
    pub fn clamp_limit(&self, limit: usize) -> usize {
        limit.clamp(1, self.max_limit())
    }

    /// The limit a "load more" request should ask for, if more pages exist.
    pub fn next_limit(&self, limit: usize) -> Option<usize> {
        let max = self.max_limit();
        (limit < max).then(|| (limit + self.search.page_increment).min(max))
    }
}
