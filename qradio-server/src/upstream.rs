//! Upstream content API client
//!
//! Thin wrapper over `reqwest` for the Itqan CMS developers API. JSON
//! endpoints come back as raw `serde_json::Value` plus the upstream status so
//! the proxy can relay them untouched; audio comes back as a live response
//! for streaming.

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("qradio/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Listing parameters the upstream catalog endpoints are queried with
const LIST_ORDERING: &str = "name";
const LIST_PAGE: &str = "1";
const LIST_PAGE_SIZE: &str = "100";

/// Upstream client errors
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Upstream returned status {0}")]
    Status(u16),
}

/// A JSON response from the upstream, relayed as-is
#[derive(Debug, Clone)]
pub struct UpstreamJson {
    pub status: u16,
    pub body: Value,
}

impl UpstreamJson {
    /// Body of a 2xx response; any other status is an error
    pub fn into_success(self) -> Result<Value, UpstreamError> {
        if (200..300).contains(&self.status) {
            Ok(self.body)
        } else {
            Err(UpstreamError::Status(self.status))
        }
    }
}

/// Content API client
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
    request_timeout: Duration,
}

impl UpstreamClient {
    /// Create a client for `base_url` (no trailing slash needed)
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, UpstreamError> {
        let base_url =
            Url::parse(base_url).map_err(|e| UpstreamError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(format!(
                "'{}' cannot be used as a base URL",
                base_url
            )));
        }

        // No total timeout on the client: audio bodies stream for as long as
        // the surah lasts. JSON requests set their own.
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            request_timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET `/riwayahs/` sorted by name, first page of 100
    pub async fn riwayahs(&self) -> Result<UpstreamJson, UpstreamError> {
        let url = self.listing_endpoint("riwayahs")?;
        self.get_json(url).await
    }

    /// GET `/reciters/` sorted by name, first page of 100
    pub async fn reciters(&self) -> Result<UpstreamJson, UpstreamError> {
        let url = self.listing_endpoint("reciters")?;
        self.get_json(url).await
    }

    /// GET `/recitations/` with the caller's query string forwarded unchanged
    pub async fn recitations(&self, raw_query: Option<&str>) -> Result<UpstreamJson, UpstreamError> {
        let mut url = self.endpoint(&["recitations"])?;
        if let Some(query) = raw_query.filter(|q| !q.is_empty()) {
            url.set_query(Some(query));
        }
        self.get_json(url).await
    }

    /// GET `/recitations/{id}/`: the track list of one recitation asset
    pub async fn recitation(&self, id: &str) -> Result<UpstreamJson, UpstreamError> {
        let url = self.endpoint(&["recitations", id])?;
        self.get_json(url).await
    }

    /// Open an audio file for streaming
    ///
    /// Only absolute `http`/`https` URLs are accepted.
    pub async fn open_audio(&self, raw_url: &str) -> Result<reqwest::Response, UpstreamError> {
        let url = parse_audio_url(raw_url)?;

        debug!(url = %url, "Opening upstream audio");

        self.http
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))
    }

    /// `{base}/{segments...}/` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty().extend(segments).push("");
        }
        Ok(url)
    }

    fn listing_endpoint(&self, collection: &str) -> Result<Url, UpstreamError> {
        let mut url = self.endpoint(&[collection])?;
        url.query_pairs_mut()
            .append_pair("ordering", LIST_ORDERING)
            .append_pair("page", LIST_PAGE)
            .append_pair("page_size", LIST_PAGE_SIZE);
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<UpstreamJson, UpstreamError> {
        debug!(url = %url, "Querying upstream API");

        let response = self
            .http
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let body: Value =
            serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Decode(e.to_string()))?;

        Ok(UpstreamJson { status, body })
    }
}

/// Validate an audio URL supplied by the browser
pub fn parse_audio_url(raw: &str) -> Result<Url, UpstreamError> {
    let url = Url::parse(raw.trim()).map_err(|e| UpstreamError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UpstreamError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            other
        ))),
    }
}
