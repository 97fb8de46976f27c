//! HTTP API handlers for qradio-server

pub mod audio;
pub mod catalog;
pub mod health;
pub mod station;
pub mod ui;

pub use audio::audio_routes;
pub use catalog::catalog_routes;
pub use health::health_routes;
pub use station::station_routes;
pub use ui::ui_routes;
