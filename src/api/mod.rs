//! REST API for playback synchronization
//!
//! Clients poll `GET /state` for the shared playback record and push changes
//! with `POST /sync`. Every response allows cross-origin access so browser
//! players on any host can talk to the server.
//! Default port: 3000

mod error;


pub use error::ApiError;

use crate::state::{PlaybackState, PlaybackUpdate, SyncStore};
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};
use tracing::{debug, info};

/// Default API port
pub const DEFAULT_API_PORT: u16 = 3000;

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept";
const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

/// Shared state for API handlers
pub struct ApiState {
    /// The session's playback record
    pub store: SyncStore,
}

impl ApiState {
    pub fn new(store: SyncStore) -> Self {
        Self { store }
    }
}

/// Response for an accepted submit
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub success: bool,
}

/// Build the API router
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/state", get(fetch_state).options(preflight))
        .route("/sync", post(submit_state).options(preflight))
        .route("/health", get(health_check).options(preflight))
        .fallback(fallback)
        .with_state(state)
        .layer(cors_layer())
        // CorsLayer only lists methods and headers on preflights; plain
        // responses carry them too.
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::ORIGIN,
            X_REQUESTED_WITH,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
}

/// GET /state - Current playback record
async fn fetch_state(State(state): State<Arc<ApiState>>) -> Json<PlaybackState> {
    Json(state.store.get())
}

/// POST /sync - Merge a partial update into the playback record
async fn submit_state(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> Result<Json<SyncResponse>, ApiError> {
    let update = decode_update(&body)?;
    let updated = state.store.merge(update);

    info!(
        current_time = updated.current_time,
        is_playing = updated.is_playing,
        duration = updated.duration,
        video_path = %updated.video_path,
        "Video state updated"
    );

    Ok(Json(SyncResponse { success: true }))
}

/// GET /health - Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// OPTIONS on a known route; headers come from the CORS layers
async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn fallback(method: Method) -> StatusCode {
    if method == Method::OPTIONS {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Decode a submit body into a partial update
///
/// The body is parsed whatever its Content-Type. An empty body is an empty
/// update. Anything else must be a JSON object whose recognised keys have the
/// right types; `currentTime` and `duration` must not be negative.
pub fn decode_update(body: &[u8]) -> Result<PlaybackUpdate, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        debug!("Empty sync body, treating as empty update");
        return Ok(PlaybackUpdate::default());
    }

    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::MalformedRequest(format!("body is not valid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(ApiError::MalformedRequest(
            "body must be a JSON object".to_string(),
        ));
    }

    let update: PlaybackUpdate = serde_json::from_value(value)
        .map_err(|e| ApiError::MalformedRequest(e.to_string()))?;

    check_non_negative("currentTime", update.current_time)?;
    check_non_negative("duration", update.duration)?;

    Ok(update)
}

fn check_non_negative(field: &str, value: Option<Option<f64>>) -> Result<(), ApiError> {
    match value {
        Some(Some(seconds)) if seconds < 0.0 => Err(ApiError::MalformedRequest(format!(
            "{} must not be negative (got {})",
            field, seconds
        ))),
        _ => Ok(()),
    }
}

/// Start the API server on `addr`, running until `shutdown` resolves
pub async fn start_server<F>(state: Arc<ApiState>, addr: SocketAddr, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind sync server to {}", addr))?;

    serve(listener, state, shutdown).await
}

/// Serve the API on an already bound listener
pub async fn serve<F>(listener: TcpListener, state: Arc<ApiState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = build_router(state);

    let addr = listener
        .local_addr()
        .context("Failed to read sync server address")?;
    info!("Sync server running on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Sync server error")?;

    info!("Sync server stopped");
    Ok(())
}
