use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::feed::{Feed, FeedKind};
use crate::page::PageConfig;
use crate::runtime::Runtime;

use super::config::Config;
use super::services::{build_http_client, build_loader, local_feed_location};

/// Options for the `show` command
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    pub config: Option<PathBuf>,
    pub site_root: Option<PathBuf>,
    /// Print the records as JSON
    pub json: bool,
}

/// Load the release feed of a page and print it
#[tracing::instrument(skip(runtime))]
pub async fn show<R: Runtime + 'static>(runtime: R, options: ShowOptions) -> Result<()> {
    let config = Config::load(
        &runtime,
        options.config.as_deref(),
        options.site_root.clone(),
        None,
    )?;
    let Some(page) = config.page.clone() else {
        anyhow::bail!("No page configuration given. Use --config or RELPAGE_CONFIG.");
    };

    let loader = build_loader(Arc::new(runtime), build_http_client()?, &config, &page);
    let feed = loader.load_releases().await;

    let mut stdout = std::io::stdout().lock();
    if options.json {
        serde_json::to_writer_pretty(&mut stdout, feed.records())
            .context("Failed to serialize releases")?;
        writeln!(stdout)?;
    } else {
        print_feed(&mut stdout, &config, &page, &feed)?;
    }
    Ok(())
}

/// Human-readable summary of a loaded feed.
pub(crate) fn print_feed<W: Write>(
    out: &mut W,
    config: &Config,
    page: &PageConfig,
    feed: &Feed,
) -> Result<()> {
    match (&page.owner, &page.repo) {
        (Some(owner), Some(repo)) => writeln!(out, "{} ({}/{})", page.name, owner, repo)?,
        _ => writeln!(out, "{}", page.name)?,
    }

    let source = match feed.kind() {
        Some(FeedKind::Local) => local_feed_location(config, page).to_string(),
        Some(FeedKind::Remote) => page.releases_url.clone().unwrap_or_default(),
        None => {
            writeln!(out, "No releases found.")?;
            return Ok(());
        }
    };
    writeln!(out, "Source: {}", source)?;

    for record in feed.records() {
        writeln!(out)?;
        write!(out, "v{}", record.version)?;
        if !record.date.is_empty() {
            write!(out, " ({})", record.date)?;
        }
        writeln!(out)?;
        if !record.notes.is_empty() {
            writeln!(out, "  {}", record.notes)?;
        }
        for (key, url) in &record.assets {
            writeln!(out, "  {}: {}", key, url)?;
        }
    }
    Ok(())
}
