//! Pre-flight checks before talking to the upstream providers.
//!
//! Validates that endpoints and credentials are configured before a search
//! or the server starts, instead of failing on the first request.

use crate::config::Settings;
use crate::error::{HivefindError, Result};

/// Check that both providers are configured.
pub fn check(settings: &Settings) -> Result<()> {
    check_endpoint("embedding.api_url", "HF_API_URL", &settings.embedding.api_url)?;
    check_api_key("embedding.api_key", "HF_API_KEY", settings.embedding.api_key.as_deref())?;
    check_endpoint(
        "vector_search.api_url",
        "ZZ_API_URL",
        &settings.vector_search.api_url,
    )?;
    check_api_key(
        "vector_search.api_key",
        "ZZ_API_KEY",
        settings.vector_search.api_key.as_deref(),
    )?;
    if settings.vector_search.collection_name.trim().is_empty() {
        return Err(HivefindError::Config(
            "vector_search.collection_name is empty".to_string(),
        ));
    }
    Ok(())
}

fn check_endpoint(key: &str, env: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(HivefindError::Config(format!(
            "{} not set. Set it in the config file or with: export {}='https://...'",
            key, env
        )));
    }

    let url = url::Url::parse(value)
        .map_err(|e| HivefindError::Config(format!("{} is not a valid URL: {}", key, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(HivefindError::Config(format!(
            "{} must use http or https, got '{}'",
            key, other
        ))),
    }
}

fn check_api_key(key: &str, env: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(HivefindError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            key, env
        ))),
    }
}
