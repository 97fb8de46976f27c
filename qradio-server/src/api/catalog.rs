//! Catalog relay endpoints
//!
//! Each handler forwards one request to the content API and relays the JSON
//! body and status unchanged.

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::error::{ApiError, ApiResult};
use crate::upstream::{UpstreamError, UpstreamJson};
use crate::AppState;

/// Build catalog relay routes
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/riwayahs", get(list_riwayahs))
        .route("/api/reciters", get(list_reciters))
        .route("/api/recitations", get(search_recitations))
        .route("/api/recitations/:id", get(recitation_tracks))
}

/// GET /api/riwayahs
pub async fn list_riwayahs(State(state): State<AppState>) -> ApiResult<Response> {
    relay(state.upstream.riwayahs().await)
}

/// GET /api/reciters
pub async fn list_reciters(State(state): State<AppState>) -> ApiResult<Response> {
    relay(state.upstream.reciters().await)
}

/// GET /api/recitations?...
///
/// The query string goes upstream as-is (typically `reciter_id` and
/// `riwayah_id`).
pub async fn search_recitations(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResult<Response> {
    relay(state.upstream.recitations(query.as_deref()).await)
}

/// GET /api/recitations/:id
///
/// Track list of one recitation asset.
pub async fn recitation_tracks(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    relay(state.upstream.recitation(&id).await)
}

fn relay(result: Result<UpstreamJson, UpstreamError>) -> ApiResult<Response> {
    let json = result.map_err(ApiError::Proxy)?;
    let status = StatusCode::from_u16(json.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(json.body)).into_response())
}
