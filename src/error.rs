//! Error types for Hivefind.

use thiserror::Error;

/// External service a failed call was made to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Embedding,
    VectorSearch,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Embedding => write!(f, "embedding"),
            Provider::VectorSearch => write!(f, "vector-search"),
        }
    }
}

/// Library-level error type for Hivefind operations.
#[derive(Error, Debug)]
pub enum HivefindError {
    #[error("Upstream {provider} call failed: {message}")]
    Upstream { provider: Provider, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl HivefindError {
    /// Build an upstream failure for the given provider.
    pub fn upstream(provider: Provider, message: impl Into<String>) -> Self {
        HivefindError::Upstream {
            provider,
            message: message.into(),
        }
    }

    /// The provider that failed, if this is an upstream error.
    pub fn provider(&self) -> Option<Provider> {
        match self {
            HivefindError::Upstream { provider, .. } => Some(*provider),
            _ => None,
        }
    }
}

/// Result type alias for Hivefind operations.
pub type Result<T> = std::result::Result<T, HivefindError>;
