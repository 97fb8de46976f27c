//! qradio-server library
//!
//! Reverse proxy in front of the Itqan CMS developers API, plus the embedded
//! browser radio client. Exposed as a library so integration tests can drive
//! the router directly.

use axum::http::{header, HeaderValue};
use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cli;
pub mod error;
pub mod server;
pub mod upstream;

pub use crate::error::{ApiError, ApiResult, ServerError};
pub use crate::upstream::UpstreamClient;

/// Cache policy for `/api` responses
pub const API_CACHE_CONTROL: &str = "public, max-age=3600";

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Content API client
    pub upstream: UpstreamClient,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self {
            upstream,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    // Handlers that set their own Cache-Control keep it
    let api = Router::new()
        .merge(api::catalog_routes())
        .merge(api::station_routes())
        .merge(api::audio_routes())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static(API_CACHE_CONTROL),
        ));

    Router::new()
        .merge(api)
        .merge(api::ui_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
