//! Per-page configuration provided by the hosting page.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::runtime::Runtime;

/// Configuration of one product page.
///
/// Field names follow the camelCase object the page generator injects,
/// e.g. `{"name": "Echo", "slug": "echo", "releasesPage": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    /// Display name of the product
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    /// Local feed location, relative to the site root or an absolute URL
    #[serde(default)]
    pub local_feed: Option<String>,
    /// Remote releases API endpoint
    #[serde(default)]
    pub releases_url: Option<String>,
    /// Human-facing releases page
    #[serde(default)]
    pub releases_page: Option<String>,
    #[serde(default)]
    pub discussions: Option<String>,
    #[serde(default)]
    pub issues_url: Option<String>,
}

impl PageConfig {
    /// Load a page configuration from a JSON file.
    pub fn load<R: Runtime + ?Sized>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime.read_to_string(path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse page config {}", path.display()))
    }

    /// Releases page link, or `#` when none is configured or it is empty.
    pub fn releases_page_or_default(&self) -> &str {
        self.releases_page
            .as_deref()
            .filter(|page| !page.is_empty())
            .unwrap_or("#")
    }
}
