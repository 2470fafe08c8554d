//! HTTP search API.
//!
//! Serves resolved pages as JSON. A "load more" is just another request with
//! a larger limit; each request re-resolves the full page through the cache.

use crate::cache::{CacheStats, ResolutionCache};
use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::error::HivefindError;
use crate::normalize::DisplayRecord;
use crate::resolver::{QueryResolver, Resolution, NO_RESULTS_MESSAGE};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Shared application state.
pub(crate) struct AppState {
    cache: ResolutionCache,
    settings: Settings,
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    preflight::check(&settings)?;

    let resolver = QueryResolver::from_settings(&settings)?;
    let cache = ResolutionCache::from_settings(resolver, &settings.cache);

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let state = Arc::new(AppState { cache, settings });
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    Output::header("Hivefind API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Search", "GET  /search?q=...&limit=...");
    Output::kv("Search", "POST /search");
    Output::kv("Cache stats", "GET  /stats");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/search", get(search_get).post(search_post))
        .route("/stats", get(stats))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Debug, Deserialize)]
struct SearchRequest {
    #[serde(default)]
    query: String,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum PageStatus {
    /// Records resolved (possibly fewer than requested).
    Ok,
    /// The index had no data; show the "try again later" message.
    Degraded,
    /// No query was given, so nothing was resolved.
    Empty,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    query: String,
    limit: usize,
    status: PageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    results: Vec<DisplayRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_limit: Option<usize>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn stats(State(state): State<Arc<AppState>>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

async fn search_get(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> axum::response::Response {
    search_page(&state, &params.q, params.limit).await
}

async fn search_post(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> axum::response::Response {
    search_page(&state, &req.query, req.limit).await
}

async fn search_page(
    state: &AppState,
    query: &str,
    limit: Option<usize>,
) -> axum::response::Response {
    match resolve_page(state, query, limit).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            let status = match &e {
                HivefindError::Upstream { .. } => StatusCode::BAD_GATEWAY,
                HivefindError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            error!("Search failed: {}", e);
            (
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Resolve one page of results for the API.
async fn resolve_page(
    state: &AppState,
    query: &str,
    limit: Option<usize>,
) -> crate::error::Result<SearchResponse> {
    let settings = &state.settings;
    let query = query.trim();
    let limit = settings.clamp_limit(limit.unwrap_or(settings.search.default_limit));

    if query.is_empty() {
        return Ok(SearchResponse {
            query: String::new(),
            limit,
            status: PageStatus::Empty,
            message: None,
            results: Vec::new(),
            next_limit: None,
        });
    }

    let page = match state.cache.get_or_resolve(query, limit).await? {
        Resolution::Records(records) => SearchResponse {
            query: query.to_string(),
            limit,
            status: PageStatus::Ok,
            message: None,
            next_limit: if records.is_empty() {
                None
            } else {
                settings.next_limit(limit)
            },
            results: records,
        },
        Resolution::NoResults => SearchResponse {
            query: query.to_string(),
            limit,
            status: PageStatus::Degraded,
            message: Some(NO_RESULTS_MESSAGE.to_string()),
            results: Vec::new(),
            next_limit: None,
        },
    };

    Ok(page)
}
