//! Local static `releases.json` feed.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::http::HttpClient;
use crate::runtime::Runtime;

use super::{FeedKind, FeedSource, ReleaseRecord};

/// Location of the local feed relative to the site root when not configured.
pub const DEFAULT_LOCAL_FEED: &str = "downloads/releases.json";

/// Where the local feed lives: a file under the site root, or a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedLocation {
    Path(PathBuf),
    Url(String),
}

impl FeedLocation {
    /// Resolve a configured feed location.
    ///
    /// `http://` and `https://` values are fetched as-is. Anything else is a
    /// site path; a leading `/` refers to the site root, not the file system root.
    pub fn resolve(value: &str, site_root: &Path) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            FeedLocation::Url(value.to_string())
        } else {
            FeedLocation::Path(site_root.join(value.trim_start_matches('/')))
        }
    }
}

impl fmt::Display for FeedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedLocation::Path(path) => write!(f, "{}", path.display()),
            FeedLocation::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Feed read from a pre-generated JSON array of [`ReleaseRecord`]s.
pub struct LocalFeed<R: Runtime> {
    runtime: Arc<R>,
    http_client: HttpClient,
    location: FeedLocation,
}

impl<R: Runtime> LocalFeed<R> {
    pub fn new(runtime: Arc<R>, http_client: HttpClient, location: FeedLocation) -> Self {
        Self {
            runtime,
            http_client,
            location,
        }
    }

    fn read_file(&self, path: &Path) -> Result<Vec<ReleaseRecord>> {
        if !self.runtime.exists(path) {
            bail!("Local feed {} does not exist", path.display());
        }
        let content = self.runtime.read_to_string(path)?;
        let entries = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse local feed {}", path.display()))?;
        Ok(ReleaseRecord::from_entries(entries))
    }
}

#[async_trait]
impl<R: Runtime + 'static> FeedSource for LocalFeed<R> {
    fn kind(&self) -> FeedKind {
        FeedKind::Local
    }

    #[tracing::instrument(skip(self))]
    async fn fetch(&self) -> Result<Vec<ReleaseRecord>> {
        debug!("Reading local feed from {}...", self.location);
        match &self.location {
            FeedLocation::Path(path) => self.read_file(path),
            FeedLocation::Url(url) => Ok(ReleaseRecord::from_entries(
                self.http_client.get_json(url).await?,
            )),
        }
    }
}
