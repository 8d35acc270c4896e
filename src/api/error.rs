//! Error responses for the sync API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Failure surfaced to a client. Handled at the HTTP boundary, never fatal.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body was not JSON, not an object, or a field had the wrong type or range
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

/// JSON body sent back with an error status
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
        };
        warn!("Rejected sync request: {}", self);

        let body = ErrorBody {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
