//! Upstream catalog models
//!
//! Typed views over the paginated JSON returned by the content API. The proxy
//! relays upstream bodies verbatim; these types are only used where the
//! server needs to look inside a response (station building, tests).
//!
//! Every field is lenient: missing fields default, unknown fields are ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a catalog entry
///
/// The upstream uses integer ids, but string ids are accepted so a schema
/// change does not break station building.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CatalogId {
    Number(u64),
    Text(String),
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogId::Number(n) => write!(f, "{}", n),
            CatalogId::Text(s) => f.write_str(s),
        }
    }
}

/// One page of a paginated upstream listing
///
/// `T` needs no `Default`: a missing `results` reads as an empty list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: None,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

/// Recitation asset (a reciter + riwayah pairing owning a track list)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Recitation {
    pub id: CatalogId,
    #[serde(default)]
    pub name: Option<String>,
}

/// Query string selecting the recitations of one reciter in one riwayah
pub fn recitations_query(reciter_id: &str, riwayah_id: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("reciter_id", reciter_id)
        .append_pair("riwayah_id", riwayah_id)
        .finish()
}
