//! Service factory for building command dependencies.
//!
//! This module separates the construction of services (HTTP client, feed
//! sources, loader) from the configuration they are built from.

use std::sync::Arc;

use anyhow::Result;
use log::debug;
use reqwest::Client;

use crate::feed::{DEFAULT_LOCAL_FEED, FeedLoader, FeedLocation, FeedSource, GitHubFeed, LocalFeed};
use crate::http::HttpClient;
use crate::page::PageConfig;
use crate::runtime::Runtime;

use super::config::Config;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("relpage/", env!("RELPAGE_VERSION"));

/// Build an HTTP client
pub fn build_http_client() -> Result<HttpClient> {
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    Ok(HttpClient::new(client))
}

/// Where the local feed of a page lives
pub fn local_feed_location(config: &Config, page: &PageConfig) -> FeedLocation {
    let value = page
        .local_feed
        .as_deref()
        .filter(|feed| !feed.is_empty())
        .unwrap_or(DEFAULT_LOCAL_FEED);
    FeedLocation::resolve(value, &config.site_root)
}

/// Build the feed loader for a page: local feed first, then the remote
/// endpoint when one is configured.
pub fn build_loader<R: Runtime + 'static>(
    runtime: Arc<R>,
    http_client: HttpClient,
    config: &Config,
    page: &PageConfig,
) -> FeedLoader {
    let location = local_feed_location(config, page);
    debug!("Local feed: {}", location);
    let local = LocalFeed::new(runtime, http_client.clone(), location);

    let remote = page
        .releases_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .map(|endpoint| {
            debug!("Remote feed: {}", endpoint);
            Box::new(GitHubFeed::new(http_client, endpoint)) as Box<dyn FeedSource>
        });

    FeedLoader::new(Box::new(local), remote)
}
