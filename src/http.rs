//! Shared HTTP client construction for the upstream providers.

use crate::error::{HivefindError, Provider, Result};
use std::time::Duration;

/// Default timeout for upstream requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Create an HTTP client with a custom timeout.
///
/// A timeout of zero falls back to the default so a misconfigured file can't
/// produce a client that hangs forever.
pub fn create_client_with_timeout(provider: Provider, timeout: Duration) -> Result<reqwest::Client> {
    let timeout = if timeout.is_zero() {
        Duration::from_secs(DEFAULT_TIMEOUT_SECS)
    } else {
        timeout
    };

    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("hivefind/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| HivefindError::upstream(provider, format!("Failed to create HTTP client: {}", e)))
}

/// Map a transport error or non-2xx response into an upstream failure.
pub(crate) async fn check_status(
    provider: Provider,
    response: std::result::Result<reqwest::Response, reqwest::Error>,
) -> Result<reqwest::Response> {
    let response = response.map_err(|e| {
        if e.is_timeout() {
            HivefindError::upstream(provider, format!("request timed out: {}", e))
        } else {
            HivefindError::upstream(provider, format!("request failed: {}", e))
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(HivefindError::upstream(
            provider,
            format!("HTTP {}: {}", status, truncate(&body, 200)),
        ));
    }

    Ok(response)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
