//! GitHub releases API feed.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use std::collections::BTreeMap;

use crate::http::{GITHUB_JSON, HttpClient};
use crate::platform::Platform;

use super::{AssetLink, FeedKind, FeedSource, ReleaseRecord};

/// GitHub API response types (internal).
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Default)]
    pub struct Release {
        #[serde(default)]
        pub tag_name: Option<String>,
        #[serde(default)]
        pub published_at: Option<String>,
        #[serde(default)]
        pub body: Option<String>,
        #[serde(default)]
        pub assets: Vec<Asset>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Asset {
        pub name: String,
        pub browser_download_url: String,
    }
}

/// Feed backed by a GitHub `releases` endpoint, e.g.
/// `https://api.github.com/repos/owner/repo/releases`.
pub struct GitHubFeed {
    http_client: HttpClient,
    endpoint: String,
}

impl GitHubFeed {
    pub fn new(http_client: HttpClient, endpoint: &str) -> Self {
        Self {
            http_client,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl FeedSource for GitHubFeed {
    fn kind(&self) -> FeedKind {
        FeedKind::Remote
    }

    #[tracing::instrument(skip(self))]
    async fn fetch(&self) -> Result<Vec<ReleaseRecord>> {
        debug!("Fetching releases from {}...", self.endpoint);
        let releases: Vec<api::Release> = self
            .http_client
            .get_json_accept(&self.endpoint, GITHUB_JSON)
            .await?;
        Ok(releases.into_iter().map(|r| r.into()).collect())
    }
}

impl From<api::Release> for ReleaseRecord {
    fn from(r: api::Release) -> Self {
        let tag = r.tag_name.unwrap_or_default();
        ReleaseRecord {
            version: tag.strip_prefix('v').unwrap_or(&tag).to_string(),
            date: r
                .published_at
                .map(|ts| ts.chars().take(10).collect())
                .unwrap_or_default(),
            assets: asset_map(&r.assets),
            sha256: BTreeMap::new(),
            notes: r
                .body
                .as_deref()
                .and_then(|body| body.lines().next())
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// Map each asset to its platform key, dropping assets with no platform.
fn asset_map(assets: &[api::Asset]) -> BTreeMap<String, AssetLink> {
    let mut map = BTreeMap::new();
    for asset in assets {
        match Platform::from_asset_name(&asset.name) {
            Some(platform) => {
                map.insert(
                    platform.asset_key(),
                    AssetLink::Url(asset.browser_download_url.clone()),
                );
            }
            None => debug!("Skipping asset {} (no platform)", asset.name),
        }
    }
    map
}
