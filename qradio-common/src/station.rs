//! Station building
//!
//! A station is the playlist the radio plays: the track list of the first
//! recitation matching a riwayah + reciter, cleaned up so every entry can be
//! played and the chapters run in order.

use crate::catalog::{CatalogId, Page, Recitation};
use crate::surah_names;
use crate::time::format_duration_ms;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Path of the audio relay endpoint tracks are streamed through
pub const AUDIO_PROXY_PATH: &str = "/api/audio";

/// Reasons a station cannot be built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StationError {
    #[error("No recitations available for this selection")]
    NoRecitations,

    #[error("No valid surahs in this recitation")]
    NoValidTracks,
}

impl StationError {
    /// Stable identifier for API clients
    pub fn code(&self) -> &'static str {
        match self {
            StationError::NoRecitations => "no_recitations",
            StationError::NoValidTracks => "no_valid_tracks",
        }
    }
}

/// One entry of an upstream recitation track list
///
/// Numeric fields accept numbers or numeric strings; anything else reads as
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Track {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub chapter_number: Option<u32>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub surah_name_ar: Option<String>,
    #[serde(default)]
    pub surah_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub surah_number: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub duration_ms: Option<u64>,
}

impl Track {
    /// Chapter number, if present and non-zero
    fn playable_chapter(&self) -> Option<u32> {
        self.chapter_number.filter(|n| *n > 0)
    }

    /// Audio URL, if present and non-empty
    fn playable_url(&self) -> Option<&str> {
        self.audio_url.as_deref().filter(|u| !u.is_empty())
    }

    /// Name shown to the listener
    ///
    /// Resolution order: `surah_name_ar`, then `surah_name`, then the local
    /// Arabic table keyed by `surah_number` (or `chapter_number`).
    pub fn display_name(&self) -> String {
        if let Some(name) = non_empty(&self.surah_name_ar) {
            return name.to_string();
        }
        if let Some(name) = non_empty(&self.surah_name) {
            return name.to_string();
        }

        self.surah_number
            .filter(|n| *n > 0)
            .or(self.chapter_number)
            .and_then(surah_names::arabic_name)
            .unwrap_or_default()
            .to_string()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_u64(deserializer)?.and_then(|n| u32::try_from(n).ok()))
}

/// Parse raw track list entries, skipping anything that is not a track object
pub fn parse_tracks(raw: Vec<Value>) -> Vec<Track> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value::<Track>(value) {
            Ok(track) => Some(track),
            Err(e) => {
                debug!("Skipping malformed track entry: {}", e);
                None
            }
        })
        .collect()
}

/// Clean a raw track list into a playable playlist
///
/// - drops entries without a chapter number (or chapter 0) or audio URL
/// - drops repeated `(chapter, url)` pairs, keeping the first
/// - sorts by chapter number, keeping upstream order for equal chapters
pub fn clean_tracks(raw: Vec<Track>) -> Vec<Track> {
    let mut seen: HashSet<(u32, String)> = HashSet::new();
    let mut cleaned: Vec<Track> = raw
        .into_iter()
        .filter(|track| {
            let (Some(chapter), Some(url)) = (track.playable_chapter(), track.playable_url())
            else {
                return false;
            };
            seen.insert((chapter, url.to_string()))
        })
        .collect();

    cleaned.sort_by_key(|t| t.chapter_number);
    cleaned
}

/// Pick the recitation asset a station is built from (the first result)
pub fn select_recitation(page: &Page<Recitation>) -> Result<&Recitation, StationError> {
    page.results.first().ok_or(StationError::NoRecitations)
}

/// Relative URL streaming `audio_url` through the proxy
pub fn proxied_stream_url(audio_url: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("url", audio_url)
        .finish();
    format!("{}?{}", AUDIO_PROXY_PATH, query)
}

/// A playlist entry as served to the browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationTrack {
    /// Position in the station
    pub index: usize,
    pub chapter_number: u32,
    pub name: String,
    /// Upstream audio URL
    pub audio_url: String,
    /// Same audio through the relay
    pub stream_url: String,
    pub duration_ms: Option<u64>,
    /// `M:SS`
    pub duration: String,
}

/// A ready-to-play station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub riwayah_id: String,
    pub reciter_id: String,
    pub recitation_id: CatalogId,
    pub count: usize,
    pub tracks: Vec<StationTrack>,
}

impl Station {
    /// Build a station from the raw track list of `recitation_id`
    pub fn from_tracks(
        riwayah_id: impl Into<String>,
        reciter_id: impl Into<String>,
        recitation_id: CatalogId,
        raw_tracks: Vec<Value>,
    ) -> Result<Self, StationError> {
        let cleaned = clean_tracks(parse_tracks(raw_tracks));
        if cleaned.is_empty() {
            return Err(StationError::NoValidTracks);
        }

        let tracks: Vec<StationTrack> = cleaned
            .into_iter()
            .enumerate()
            .filter_map(|(index, track)| {
                let name = track.display_name();
                let chapter_number = track.playable_chapter()?;
                let audio_url = track.audio_url?;
                Some(StationTrack {
                    index,
                    chapter_number,
                    name,
                    stream_url: proxied_stream_url(&audio_url),
                    audio_url,
                    duration_ms: track.duration_ms,
                    duration: format_duration_ms(track.duration_ms),
                })
            })
            .collect();

        Ok(Self {
            riwayah_id: riwayah_id.into(),
            reciter_id: reciter_id.into(),
            recitation_id,
            count: tracks.len(),
            tracks,
        })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn track(&self, index: usize) -> Option<&StationTrack> {
        self.tracks.get(index)
    }
}
