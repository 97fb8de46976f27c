//! Error types for qradio-server
//!
//! `ApiError` maps handler failures onto the JSON bodies browsers already
//! understand (`{"error": ..., "details": ...}`). `ServerError` covers
//! binding and serving.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use qradio_common::StationError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::upstream::UpstreamError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// `/api/audio` called without `url` (400)
    #[error("Missing url query parameter")]
    MissingAudioUrl,

    /// `url` is not an absolute http(s) URL (400)
    #[error("Invalid url query parameter: {0}")]
    InvalidAudioUrl(String),

    /// JSON relay failed (500)
    #[error("Proxy error: {0}")]
    Proxy(UpstreamError),

    /// Audio relay could not reach the origin (500)
    #[error("Audio proxy error: {0}")]
    AudioProxy(UpstreamError),

    /// Station requested without both ids (400)
    #[error("Select both a riwayah and a reciter")]
    MissingSelection,

    /// Selection has no playable station (404)
    #[error(transparent)]
    Station(#[from] StationError),

    /// Upstream failed while building a station (502)
    #[error("Upstream error: {0}")]
    Upstream(UpstreamError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::MissingAudioUrl => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Missing url query parameter" }),
            ),
            ApiError::InvalidAudioUrl(details) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid url query parameter", "details": details }),
            ),
            ApiError::Proxy(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Proxy error", "details": err.to_string() }),
            ),
            ApiError::AudioProxy(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Audio proxy error", "details": err.to_string() }),
            ),
            ApiError::MissingSelection => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Select both a riwayah and a reciter" }),
            ),
            ApiError::Station(err) => (
                StatusCode::NOT_FOUND,
                json!({ "error": err.to_string(), "code": err.code() }),
            ),
            ApiError::Upstream(err) => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": "Upstream error", "details": err.to_string() }),
            ),
        };

        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Startup and serving errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Both {primary} and {fallback} are in use. Please free a port.")]
    PortsInUse { primary: u16, fallback: u16 },

    #[error("Failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}
