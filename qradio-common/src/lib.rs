//! # Quran Radio Common Library
//!
//! Shared code for the Quran Radio proxy and its tests:
//! - Configuration loading and resolution
//! - Upstream catalog models (paginated listings, recitations, tracks)
//! - Station building (track cleaning, display names)
//! - Radio playback state machine
//! - Time formatting

pub mod catalog;
pub mod config;
pub mod error;
pub mod radio;
pub mod station;
pub mod surah_names;
pub mod time;

pub use error::{Error, Result};
pub use radio::{Radio, RadioAction, RadioState};
pub use station::{Station, StationError, StationTrack, Track};
