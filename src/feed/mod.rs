//! Release feed: the records a product page is rendered from.
//!
//! A feed comes from one of two sources, tried in order by [`FeedLoader`]:
//! a local static `releases.json` and the GitHub releases API.

mod github;
mod loader;
mod local;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

pub use github::GitHubFeed;
pub use loader::FeedLoader;
pub use local::{DEFAULT_LOCAL_FEED, FeedLocation, LocalFeed};

/// One release as shown on the page.
///
/// Deserialization is lenient: `null` or mistyped fields fall back to their
/// defaults so a hand-edited feed never loses a whole release.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ReleaseRecord {
    /// Version without the leading `v` (e.g. "1.2.0")
    #[serde(default, deserialize_with = "lenient::string")]
    pub version: String,
    /// Release date (`YYYY-MM-DD`), empty when unknown
    #[serde(default, deserialize_with = "lenient::string")]
    pub date: String,
    /// Download link per asset key (`windows_vst3`, ...)
    #[serde(default, deserialize_with = "lenient::assets")]
    pub assets: BTreeMap<String, AssetLink>,
    /// Checksums per asset key. Reserved, never populated.
    #[serde(default, deserialize_with = "lenient::string_map")]
    pub sha256: BTreeMap<String, String>,
    /// One-line release note
    #[serde(default, deserialize_with = "lenient::string")]
    pub notes: String,
}

impl ReleaseRecord {
    /// Parse the entries of a feed array. Entries that are not objects
    /// become empty records rather than failing the feed.
    pub fn from_entries(entries: Vec<Value>) -> Vec<ReleaseRecord> {
        entries
            .into_iter()
            .map(|entry| serde_json::from_value::<ReleaseRecord>(entry).unwrap_or_default())
            .collect()
    }
}

/// The value stored for an asset key.
///
/// GitHub always yields a URL. A local feed may hold anything, and whatever
/// it holds is kept so the renderer can tell "no asset" from "asset without
/// a usable URL".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetLink {
    Url(String),
    Other(Value),
}

impl AssetLink {
    /// Whether the feed names an asset at all. Empty strings, `null`,
    /// `false` and `0` do not.
    pub fn is_present(&self) -> bool {
        match self {
            AssetLink::Url(url) => !url.is_empty(),
            AssetLink::Other(Value::Null | Value::Bool(false)) => false,
            AssetLink::Other(Value::Number(n)) => n.as_f64() != Some(0.0),
            AssetLink::Other(_) => true,
        }
    }

    /// The asset as a direct download URL, if it is one.
    pub fn http_url(&self) -> Option<&str> {
        match self {
            AssetLink::Url(url) if url.starts_with("http") => Some(url),
            _ => None,
        }
    }
}

impl From<Value> for AssetLink {
    fn from(value: Value) -> Self {
        match value {
            Value::String(url) => AssetLink::Url(url),
            other => AssetLink::Other(other),
        }
    }
}

impl fmt::Display for AssetLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetLink::Url(url) => write!(f, "{}", url),
            AssetLink::Other(value) => write!(f, "{}", value),
        }
    }
}

mod lenient {
    use super::AssetLink;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::collections::BTreeMap;

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        })
    }

    pub fn assets<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<BTreeMap<String, AssetLink>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Object(map) => map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            _ => BTreeMap::new(),
        })
    }

    pub fn string_map<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<BTreeMap<String, String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Object(map) => map
                .into_iter()
                .filter_map(|(k, v)| match v {
                    Value::String(s) => Some((k, s)),
                    _ => None,
                })
                .collect(),
            _ => BTreeMap::new(),
        })
    }
}

/// Where a feed came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    Local,
    Remote,
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedKind::Local => write!(f, "local"),
            FeedKind::Remote => write!(f, "remote"),
        }
    }
}

/// Outcome of loading the release feed.
///
/// `Local` and `Remote` always hold at least one record; a source that
/// yields nothing is reported as `Empty`.
#[derive(Debug, Clone, PartialEq)]
pub enum Feed {
    Local(Vec<ReleaseRecord>),
    Remote(Vec<ReleaseRecord>),
    Empty,
}

impl Feed {
    /// Wrap records fetched from `kind`, collapsing an empty list to `Empty`.
    pub fn from_records(kind: FeedKind, records: Vec<ReleaseRecord>) -> Self {
        if records.is_empty() {
            return Feed::Empty;
        }
        match kind {
            FeedKind::Local => Feed::Local(records),
            FeedKind::Remote => Feed::Remote(records),
        }
    }

    pub fn kind(&self) -> Option<FeedKind> {
        match self {
            Feed::Local(_) => Some(FeedKind::Local),
            Feed::Remote(_) => Some(FeedKind::Remote),
            Feed::Empty => None,
        }
    }

    /// Records in feed order.
    pub fn records(&self) -> &[ReleaseRecord] {
        match self {
            Feed::Local(records) | Feed::Remote(records) => records,
            Feed::Empty => &[],
        }
    }

    /// The first record. The source order is trusted, no sorting is done.
    pub fn latest(&self) -> Option<&ReleaseRecord> {
        self.records().first()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Feed::Empty)
    }
}

/// A place release records can be fetched from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Which kind of source this is.
    fn kind(&self) -> FeedKind;

    /// Fetch all release records, newest first.
    async fn fetch(&self) -> Result<Vec<ReleaseRecord>>;
}
