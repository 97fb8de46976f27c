//! Audio relay
//!
//! Browsers cannot always play recitation files directly (CORS, referrer
//! checks on the CDN), so the client points its `<audio>` element here and
//! the bytes are piped through chunk by chunk.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use futures::TryStreamExt;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::upstream::UpstreamError;
use crate::AppState;

/// Content type used when the origin does not send one
pub const DEFAULT_AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Query parameters for GET /api/audio
#[derive(Debug, Deserialize)]
pub struct AudioQuery {
    /// Absolute URL of the audio file
    pub url: Option<String>,
}

/// Build audio relay routes
pub fn audio_routes() -> Router<AppState> {
    Router::new().route("/api/audio", get(stream_audio))
}

/// GET /api/audio?url=
pub async fn stream_audio(
    State(state): State<AppState>,
    Query(query): Query<AudioQuery>,
) -> ApiResult<Response> {
    let url = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or(ApiError::MissingAudioUrl)?;

    let origin = state
        .upstream
        .open_audio(&url)
        .await
        .map_err(|e| match e {
            UpstreamError::InvalidUrl(msg) => ApiError::InvalidAudioUrl(msg),
            other => ApiError::AudioProxy(other),
        })?;

    // reqwest and axum sit on different `http` versions; convert by value
    let status = StatusCode::from_u16(origin.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = origin
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok())
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_AUDIO_CONTENT_TYPE));
    let content_length = origin.content_length();

    debug!(
        url = %url,
        status = status.as_u16(),
        content_length = ?content_length,
        "Relaying audio stream"
    );

    let stream = origin
        .bytes_stream()
        .inspect_err(|e| warn!("Audio stream interrupted: {}", e));

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = status;
    response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    if let Some(len) = content_length {
        response
            .headers_mut()
            .insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }

    Ok(response)
}
