//! HTTP API
//!
//! Serves reveal views to the marketplace frontend:
//!
//! - `GET /api/health`
//! - `GET /api/reveal?source=..&phase=..[&mode=..][&resolve=true]`
//! - `POST /api/reveal?phase=..[&mode=..][&resolve=true]` with a metadata body
//! - `GET /api/gateway?uri=..`
//!
//! Errors are returned as `{"error": "<message>"}`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Json, Router};
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use deedreveal_core::media::ipfs_to_http_with_gateway;
use deedreveal_core::{AuctionMetadata, ParsedMetadata, RevealMode, RevealView};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{FetchError, ServerError};
use crate::fetch::{MetadataFetcher, MetadataSource};
use crate::render::resolve_uris;

/// Shared state for request handlers.
#[derive(Debug)]
pub struct AppState {
    /// Effective configuration
    pub config: AppConfig,
    /// Metadata retrieval client
    pub fetcher: MetadataFetcher,
}

impl AppState {
    /// Builds handler state from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client cannot be built.
    pub fn new(config: AppConfig) -> Result<Self, FetchError> {
        let fetcher = MetadataFetcher::new(&config)?;
        Ok(Self { config, fetcher })
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error response with a JSON body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        let status = match &err {
            FetchError::Status { status: 404, .. } | FetchError::NotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            FetchError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            FetchError::Unsupported { .. } | FetchError::Metadata(_) => StatusCode::BAD_REQUEST,
            FetchError::Client(_)
            | FetchError::Request { .. }
            | FetchError::Status { .. }
            | FetchError::Read { .. } => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

/// Builds the API router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = usize::try_from(state.config.max_metadata_bytes).unwrap_or(usize::MAX);

    Router::new()
        .route("/api/health", get(handle_health))
        .route("/api/reveal", get(handle_reveal_source).post(handle_reveal_body))
        .route("/api/gateway", get(handle_gateway))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Binds the API listener.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address cannot be bound.
pub async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })
}

/// Serves the API on `listener` until `cancel` fires.
///
/// # Errors
///
/// Returns [`ServerError::Serve`] if the server stops with an I/O error.
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    cancel: CancellationToken,
) -> Result<(), ServerError> {
    let bound_addr: SocketAddr = listener.local_addr().map_err(ServerError::Serve)?;
    info!(%bound_addr, gateway = %state.config.gateway, "HTTP API listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await
        .map_err(ServerError::Serve)?;

    debug!("HTTP API shut down");
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Debug, Deserialize)]
struct SourceQuery {
    source: String,
    phase: i64,
    #[serde(default)]
    mode: RevealMode,
    #[serde(default)]
    resolve: bool,
}

#[derive(Debug, Deserialize)]
struct PhaseQuery {
    phase: i64,
    #[serde(default)]
    mode: RevealMode,
    #[serde(default)]
    resolve: bool,
}

#[derive(Debug, Deserialize)]
struct GatewayQuery {
    uri: String,
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn handle_reveal_source(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SourceQuery>, QueryRejection>,
) -> Result<Json<RevealView>, ApiError> {
    let Query(query) = query?;
    let source = MetadataSource::parse(&query.source);

    if !source.is_remote() {
        return Err(FetchError::Unsupported {
            source_uri: query.source,
            reason: "only http(s):// and ipfs:// sources are served".to_string(),
        }
        .into());
    }

    let parsed = state.fetcher.fetch(&source).await.map_err(|e| {
        warn!(source = %source, error = %e, "metadata fetch failed");
        ApiError::from(e)
    })?;

    Ok(Json(reveal(
        &state,
        &parsed,
        query.phase,
        query.mode,
        query.resolve,
    )))
}

async fn handle_reveal_body(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PhaseQuery>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<RevealView>, ApiError> {
    let Query(query) = query?;
    let body = body?;
    let parsed = AuctionMetadata::from_json_slice(&body)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    for item in &parsed.skipped {
        warn!(location = %item.location, reason = %item.reason, "skipped metadata item");
    }

    Ok(Json(reveal(
        &state,
        &parsed,
        query.phase,
        query.mode,
        query.resolve,
    )))
}

async fn handle_gateway(
    State(state): State<Arc<AppState>>,
    query: Result<Query<GatewayQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Query(query) = query?;
    let url = ipfs_to_http_with_gateway(&query.uri, &state.config.gateway);
    Ok(Json(json!({ "url": url })))
}

fn reveal(
    state: &AppState,
    parsed: &ParsedMetadata,
    phase: i64,
    mode: RevealMode,
    resolve: bool,
) -> RevealView {
    let mut view = RevealView::compute(&parsed.metadata, phase, mode);
    if resolve {
        resolve_uris(&mut view, &state.config.gateway);
    }
    debug!(
        phase = %view.phase,
        ?mode,
        revealed = view.revealed_sections().count(),
        "reveal view computed"
    );
    view
}
