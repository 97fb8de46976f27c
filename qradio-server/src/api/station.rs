//! Station endpoint
//!
//! Builds a playable station for a riwayah + reciter: looks up the matching
//! recitations, takes the first asset, fetches its track list and cleans it.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use qradio_common::catalog::{recitations_query, Page, Recitation};
use qradio_common::station::{select_recitation, Station};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::upstream::UpstreamError;
use crate::AppState;

/// Query parameters for GET /api/station
#[derive(Debug, Deserialize)]
pub struct StationQuery {
    pub riwayah_id: Option<String>,
    pub reciter_id: Option<String>,
}

/// Build station routes
pub fn station_routes() -> Router<AppState> {
    Router::new().route("/api/station", get(build_station))
}

/// GET /api/station?riwayah_id=&reciter_id=
pub async fn build_station(
    State(state): State<AppState>,
    Query(query): Query<StationQuery>,
) -> ApiResult<Json<Station>> {
    let riwayah_id = selected(query.riwayah_id).ok_or(ApiError::MissingSelection)?;
    let reciter_id = selected(query.reciter_id).ok_or(ApiError::MissingSelection)?;

    let recitations = state
        .upstream
        .recitations(Some(&recitations_query(&reciter_id, &riwayah_id)))
        .await
        .and_then(|json| json.into_success())
        .map_err(ApiError::Upstream)?;
    let recitations: Page<Recitation> = decode(recitations)?;

    let recitation = select_recitation(&recitations)?;

    let tracks = state
        .upstream
        .recitation(&recitation.id.to_string())
        .await
        .and_then(|json| json.into_success())
        .map_err(ApiError::Upstream)?;
    let tracks: Page<Value> = decode(tracks)?;

    let station = Station::from_tracks(
        riwayah_id,
        reciter_id,
        recitation.id.clone(),
        tracks.results,
    )?;

    info!(
        riwayah_id = %station.riwayah_id,
        reciter_id = %station.reciter_id,
        recitation_id = %station.recitation_id,
        tracks = station.count,
        "Station built"
    );

    Ok(Json(station))
}

fn selected(id: Option<String>) -> Option<String> {
    id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn decode<T: serde::de::DeserializeOwned>(body: Value) -> ApiResult<T> {
    serde_json::from_value(body)
        .map_err(|e| ApiError::Upstream(UpstreamError::Decode(e.to_string())))
}
