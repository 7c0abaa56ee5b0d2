//! Writes release information into a product page.

use std::collections::BTreeMap;

use anyhow::Result;
use log::{debug, info};
use minijinja::{AutoEscape, Environment, context};
use serde::Serialize;

use crate::feed::{AssetLink, Feed, FeedKind, FeedLoader, ReleaseRecord};
use crate::platform::{Platform, platform_name_from_key};

use super::config::PageConfig;
use super::document::Document;
use super::ids;

const DOWNLOAD_CARDS: &str = r#"{% for card in cards %}
<div class="dl-card">
  <h3>{{ card.label }}</h3>
  <p>Version <strong>{{ version or "—" }}</strong> · {{ date }}</p>
  <a class="dl-btn" href="{{ card.url }}" rel="noopener">Download</a>
</div>
{%- endfor %}
"#;

const NO_DOWNLOADS: &str = r#"<p>No releases yet. Check back soon or visit <a href="{{ releases_page }}">GitHub Releases</a>.</p>"#;

const CHANGELOG: &str = r#"{% for release in releases %}
<div class="changelog-entry">
  <h3>v{{ release.version or "?" }}</h3>
  <p class="date">{{ release.date }}</p>
  <p>{{ release.notes or "No notes." }}</p>
</div>
{%- endfor %}
"#;

const NO_CHANGELOG: &str = "<p>No releases yet.</p>";

/// What a render pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// No page configuration; nothing was written and nothing fetched.
    Skipped,
    /// Release data was rendered from the given feed.
    Rendered { source: FeedKind, releases: usize },
    /// No feed was available; fallback content was rendered.
    NoReleases,
}

/// Render a product page.
///
/// `site` pairs the page configuration with the loader for its feed. Without
/// it the page is left untouched and nothing is fetched. Feed failures never
/// surface: they render the fallback state.
#[tracing::instrument(skip_all)]
pub async fn render_page<D: Document + ?Sized>(
    doc: &mut D,
    site: Option<(&PageConfig, &FeedLoader)>,
    year: i32,
) -> Result<RenderOutcome> {
    let Some((config, loader)) = site else {
        debug!("No page configuration, skipping release rendering");
        return Ok(RenderOutcome::Skipped);
    };

    wire_links(doc, config, year);

    let feed = loader.load_releases().await;
    let outcome = render_feed(doc, config, &feed)?;
    info!("Rendered {}: {:?}", config.slug, outcome);
    Ok(outcome)
}

/// Render an already loaded feed.
pub fn render_feed<D: Document + ?Sized>(
    doc: &mut D,
    config: &PageConfig,
    feed: &Feed,
) -> Result<RenderOutcome> {
    let releases_page = config.releases_page_or_default();

    let (Some(kind), Some(latest)) = (feed.kind(), feed.latest()) else {
        set_hero_buttons(doc, &fallback_buttons(releases_page));
        doc.set_text(
            ids::LOADING_MSG,
            "No releases found yet. Check GitHub Releases.",
        );
        doc.set_html(ids::DOWNLOAD_CARDS, &download_cards_html(&[], releases_page)?);
        doc.set_html(ids::CHANGELOG_ENTRIES, &changelog_html(&[])?);
        return Ok(RenderOutcome::NoReleases);
    };

    doc.set_text(
        ids::HERO_VERSION,
        &format!("Latest: v{} — {}", latest.version, latest.date),
    );

    let buttons = hero_buttons(latest, releases_page);
    if buttons.is_empty() {
        set_hero_buttons(doc, &fallback_buttons(releases_page));
    } else {
        set_hero_buttons(doc, &buttons);
    }

    doc.set_html(
        ids::DOWNLOAD_CARDS,
        &download_cards_html(feed.records(), releases_page)?,
    );
    doc.set_html(ids::CHANGELOG_ENTRIES, &changelog_html(feed.records())?);

    Ok(RenderOutcome::Rendered {
        source: kind,
        releases: feed.records().len(),
    })
}

/// Point the community links at the configured URLs and stamp the footer year.
pub fn wire_links<D: Document + ?Sized>(doc: &mut D, config: &PageConfig, year: i32) {
    let links = [
        (ids::LINK_DISCUSSIONS, &config.discussions),
        (ids::LINK_RELEASES, &config.releases_page),
        (ids::LINK_FOOTER_DISCUSSIONS, &config.discussions),
        (ids::LINK_FOOTER_ISSUES, &config.issues_url),
    ];
    for (id, url) in links {
        if let Some(url) = url {
            doc.set_href(id, url);
        }
    }

    doc.set_text(ids::FOOTER_YEAR, &year.to_string());
}

/// Hero button targets for the latest release, keyed by platform name.
///
/// Asset values that are not absolute URLs point at the latest release page.
pub fn hero_buttons(latest: &ReleaseRecord, releases_page: &str) -> BTreeMap<String, String> {
    latest
        .assets
        .iter()
        .map(|(key, asset)| {
            (
                platform_name_from_key(key),
                download_url(asset, releases_page),
            )
        })
        .collect()
}

fn fallback_buttons(releases_page: &str) -> BTreeMap<String, String> {
    Platform::ALL
        .iter()
        .map(|p| (p.to_string(), releases_page.to_string()))
        .collect()
}

fn set_hero_buttons<D: Document + ?Sized>(doc: &mut D, buttons: &BTreeMap<String, String>) {
    for (platform, url) in buttons {
        if !url.is_empty() {
            doc.set_href(&ids::hero_button(platform), url);
        }
    }
}

fn download_url(asset: &AssetLink, releases_page: &str) -> String {
    match asset.http_url() {
        Some(url) => url.to_string(),
        None => format!("{}/latest", releases_page),
    }
}

#[derive(Serialize)]
struct Card {
    label: &'static str,
    url: String,
}

/// Download cards for the latest release, one per platform.
pub fn download_cards_html(records: &[ReleaseRecord], releases_page: &str) -> Result<String> {
    let Some(latest) = records.first() else {
        return render_fragment(NO_DOWNLOADS, context! { releases_page });
    };

    let cards: Vec<Card> = Platform::ALL
        .iter()
        .map(|platform| {
            let url = match latest
                .assets
                .get(&platform.asset_key())
                .filter(|asset| asset.is_present())
            {
                Some(asset) => download_url(asset, releases_page),
                None => releases_page.to_string(),
            };
            Card {
                label: platform.label(),
                url,
            }
        })
        .collect();

    render_fragment(
        DOWNLOAD_CARDS,
        context! {
            cards,
            version => &latest.version,
            date => &latest.date,
        },
    )
}

/// Changelog entries in feed order.
pub fn changelog_html(records: &[ReleaseRecord]) -> Result<String> {
    if records.is_empty() {
        return Ok(NO_CHANGELOG.to_string());
    }
    render_fragment(CHANGELOG, context! { releases => records })
}

/// Render a fragment with HTML autoescaping.
fn render_fragment<S: Serialize>(source: &str, ctx: S) -> Result<String> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    Ok(env.render_str(source, ctx)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedKind, MockFeedSource};
    use crate::page::document::MockDocument;
    use crate::page::template::HtmlTemplate;
    use serde_json::Value;

    const PAGE: &str = r##"<html><body>
<section id="hero">
  <span id="hero-version">Loading…</span>
  <a id="dl-windows" href="#">Windows</a>
  <a id="dl-macos" href="#">macOS</a>
  <a id="dl-linux" href="#">Linux</a>
  <p id="loading-msg">Loading releases…</p>
</section>
<a id="link-discussions">Discussions</a>
<a id="link-releases">Releases</a>
<div id="download-cards"></div>
<div id="changelog-entries"></div>
<footer>
  <a id="link-footer-discussions">Discuss</a>
  <a id="link-footer-issues">Issues</a>
  <span id="footer-year"></span>
</footer>
</body></html>
"##;

    /// HTML autoescaping writes `/` as `&#x2f;`.
    fn unescaped(html: &str) -> String {
        html.replace("&#x2f;", "/")
    }

    fn page() -> HtmlTemplate {
        HtmlTemplate::parse(PAGE).unwrap()
    }

    fn config() -> PageConfig {
        PageConfig {
            name: "Echo".into(),
            slug: "echo".into(),
            owner: Some("sunbeam".into()),
            repo: Some("echo".into()),
            releases_url: Some("https://api.github.com/repos/sunbeam/echo/releases".into()),
            releases_page: Some("https://github.com/sunbeam/echo/releases".into()),
            discussions: Some("https://github.com/sunbeam/echo/discussions".into()),
            issues_url: Some("https://github.com/sunbeam/echo/issues".into()),
            ..Default::default()
        }
    }

    fn record(version: &str, assets: &[(&str, &str)]) -> ReleaseRecord {
        ReleaseRecord {
            version: version.into(),
            date: "2024-03-01".into(),
            assets: assets
                .iter()
                .map(|(k, v)| (k.to_string(), AssetLink::Url(v.to_string())))
                .collect(),
            notes: format!("Release {}", version),
            ..Default::default()
        }
    }

    fn loader(local: Vec<ReleaseRecord>) -> FeedLoader {
        let mut source = MockFeedSource::new();
        source.expect_kind().return_const(FeedKind::Local);
        source
            .expect_fetch()
            .returning(move || Ok(local.clone()));
        FeedLoader::new(Box::new(source), None)
    }

    #[tokio::test]
    async fn test_no_config_touches_nothing() {
        let mut doc = MockDocument::new();
        doc.expect_set_href().never();
        doc.expect_set_text().never();
        doc.expect_set_html().never();

        let outcome = render_page(&mut doc, None, 2026).await.unwrap();
        assert_eq!(outcome, RenderOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_render_latest_release() {
        let mut page = page();
        let records = vec![
            record(
                "1.2.0",
                &[
                    ("windows_vst3", "https://example.com/win.zip"),
                    ("macos_vst3", "downloads/mac.zip"),
                ],
            ),
            record("1.1.0", &[]),
        ];

        let outcome = render_page(&mut page, Some((&config(), &loader(records))), 2026)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            RenderOutcome::Rendered {
                source: FeedKind::Local,
                releases: 2
            }
        );
        assert_eq!(
            page.content("hero-version"),
            Some("Latest: v1.2.0 — 2024-03-01")
        );
        assert_eq!(
            page.href("dl-windows").as_deref(),
            Some("https://example.com/win.zip")
        );
        assert_eq!(
            page.href("dl-macos").as_deref(),
            Some("https://github.com/sunbeam/echo/releases/latest")
        );
        // no linux asset: the button keeps its original target
        assert_eq!(page.href("dl-linux").as_deref(), Some("#"));
        assert_eq!(page.content("loading-msg"), None);

        let html = page.to_html().unwrap();
        assert!(html.contains(r#"<p id="loading-msg">Loading releases…</p>"#));
        assert_eq!(html.matches(r#"class="changelog-entry""#).count(), 2);
    }

    #[tokio::test]
    async fn test_render_wires_links_and_year() {
        let mut page = page();
        render_page(&mut page, Some((&config(), &loader(vec![]))), 2026)
            .await
            .unwrap();

        assert_eq!(
            page.href("link-discussions").as_deref(),
            Some("https://github.com/sunbeam/echo/discussions")
        );
        assert_eq!(
            page.href("link-releases").as_deref(),
            Some("https://github.com/sunbeam/echo/releases")
        );
        assert_eq!(
            page.href("link-footer-discussions").as_deref(),
            Some("https://github.com/sunbeam/echo/discussions")
        );
        assert_eq!(
            page.href("link-footer-issues").as_deref(),
            Some("https://github.com/sunbeam/echo/issues")
        );
        assert_eq!(page.content("footer-year"), Some("2026"));
    }

    #[test]
    fn test_unset_links_are_skipped() {
        let mut page = page();
        let config = PageConfig {
            name: "Echo".into(),
            slug: "echo".into(),
            ..Default::default()
        };

        wire_links(&mut page, &config, 2026);

        assert_eq!(page.href("link-discussions"), None);
        assert_eq!(page.href("link-footer-issues"), None);
        assert_eq!(page.content("footer-year"), Some("2026"));
    }

    #[tokio::test]
    async fn test_render_empty_feed_fallback() {
        let mut page = page();

        let outcome = render_page(&mut page, Some((&config(), &loader(vec![]))), 2026)
            .await
            .unwrap();

        assert_eq!(outcome, RenderOutcome::NoReleases);
        for id in ["dl-windows", "dl-macos", "dl-linux"] {
            assert_eq!(
                page.href(id).as_deref(),
                Some("https://github.com/sunbeam/echo/releases")
            );
        }
        assert_eq!(
            page.content("loading-msg"),
            Some("No releases found yet. Check GitHub Releases.")
        );
        assert_eq!(
            page.content("download-cards").map(unescaped).as_deref(),
            Some(
                "<p>No releases yet. Check back soon or visit <a href=\"https://github.com/sunbeam/echo/releases\">GitHub Releases</a>.</p>"
            )
        );
        assert_eq!(
            page.content("changelog-entries"),
            Some("<p>No releases yet.</p>")
        );
        assert_eq!(page.content("hero-version"), None);
    }

    #[test]
    fn test_render_without_assets_points_buttons_at_releases_page() {
        let mut page = page();
        let feed = Feed::from_records(FeedKind::Remote, vec![record("0.1.0", &[])]);

        render_feed(&mut page, &config(), &feed).unwrap();

        for id in ["dl-windows", "dl-macos", "dl-linux"] {
            assert_eq!(
                page.href(id).as_deref(),
                Some("https://github.com/sunbeam/echo/releases")
            );
        }
    }

    #[test]
    fn test_releases_page_defaults_to_hash() {
        let mut page = page();
        let config = PageConfig {
            name: "Echo".into(),
            slug: "echo".into(),
            ..Default::default()
        };
        let feed = Feed::from_records(
            FeedKind::Local,
            vec![record("1.0.0", &[("linux_vst3", "linux.zip")])],
        );

        render_feed(&mut page, &config, &feed).unwrap();

        assert_eq!(page.href("dl-linux").as_deref(), Some("#/latest"));
    }

    #[test]
    fn test_empty_releases_page_fallback_uses_hash() {
        let mut page = page();
        let config = PageConfig {
            name: "Echo".into(),
            slug: "echo".into(),
            releases_page: Some(String::new()),
            ..Default::default()
        };

        render_feed(&mut page, &config, &Feed::Empty).unwrap();

        for id in ["dl-windows", "dl-macos", "dl-linux"] {
            assert_eq!(page.href(id).as_deref(), Some("#"));
        }
        assert!(page.content("download-cards").unwrap().contains(r##"href="#""##));
    }

    #[test]
    fn test_download_cards_always_three_in_order() {
        let records = vec![record(
            "2.0.0",
            &[("linux_vst3", "https://example.com/linux.zip")],
        )];

        let cards = download_cards_html(&records, "https://example.com/releases").unwrap();
        let html = unescaped(&cards);

        assert_eq!(html.matches("class=\"dl-card\"").count(), 3);
        let windows = html.find("Windows VST3").unwrap();
        let macos = html.find("macOS VST3").unwrap();
        let linux = html.find("Linux VST3").unwrap();
        assert!(windows < macos && macos < linux);

        assert!(html.contains(r#"href="https://example.com/linux.zip""#));
        assert_eq!(
            html.matches(r#"href="https://example.com/releases" rel"#)
                .count(),
            2
        );
        assert_eq!(html.matches("Version <strong>2.0.0</strong> · 2024-03-01").count(), 3);
    }

    #[test]
    fn test_download_cards_empty_asset_is_missing() {
        let records = vec![record(
            "2.0.0",
            &[("windows_vst3", ""), ("macos_vst3", "downloads/mac.zip")],
        )];

        let cards = download_cards_html(&records, "https://example.com/releases").unwrap();
        let html = unescaped(&cards);

        // windows and linux have no asset, macos has one without a URL
        assert_eq!(
            html.matches(r#"href="https://example.com/releases" rel"#)
                .count(),
            2
        );
        assert_eq!(
            html.matches(r#"href="https://example.com/releases/latest" rel"#)
                .count(),
            1
        );
    }

    #[test]
    fn test_non_string_assets() {
        let mut latest = record("1.0.0", &[]);
        latest
            .assets
            .insert("windows_vst3".into(), AssetLink::Other(Value::Null));
        latest
            .assets
            .insert("linux_vst3".into(), AssetLink::Other(Value::from(42)));

        let buttons = hero_buttons(&latest, "https://example.com/releases");
        assert_eq!(buttons["windows"], "https://example.com/releases/latest");
        assert_eq!(buttons["linux"], "https://example.com/releases/latest");

        let cards = download_cards_html(&[latest], "https://example.com/releases").unwrap();
        let html = unescaped(&cards);
        assert_eq!(
            html.matches(r#"href="https://example.com/releases/latest" rel"#)
                .count(),
            1
        );
    }

    #[test]
    fn test_download_cards_missing_version() {
        let records = vec![ReleaseRecord::default()];
        let html = download_cards_html(&records, "#").unwrap();
        assert!(html.contains("Version <strong>—</strong> · </p>"));
    }

    #[test]
    fn test_changelog_in_feed_order() {
        let records = vec![
            record("3.0.0", &[]),
            record("2.0.0", &[]),
            ReleaseRecord::default(),
        ];

        let html = changelog_html(&records).unwrap();

        assert_eq!(html.matches("class=\"changelog-entry\"").count(), 3);
        let v3 = html.find("<h3>v3.0.0</h3>").unwrap();
        let v2 = html.find("<h3>v2.0.0</h3>").unwrap();
        let unknown = html.find("<h3>v?</h3>").unwrap();
        assert!(v3 < v2 && v2 < unknown);
        assert!(html.contains("<p>Release 3.0.0</p>"));
        assert!(html.contains("<p>No notes.</p>"));
    }

    #[test]
    fn test_changelog_escapes_notes() {
        let records = vec![ReleaseRecord {
            version: "1.0.0".into(),
            notes: "Fix <b> tags & more".into(),
            ..Default::default()
        }];
        let html = changelog_html(&records).unwrap();
        assert!(html.contains("<p>Fix &lt;b&gt; tags &amp; more</p>"));
    }

    #[test]
    fn test_hero_buttons_strip_suffix() {
        let latest = record(
            "1.0.0",
            &[
                ("windows_vst3", "https://example.com/w.zip"),
                ("linux_vst3", "linux.zip"),
            ],
        );

        let buttons = hero_buttons(&latest, "https://example.com/releases");

        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons["windows"], "https://example.com/w.zip");
        assert_eq!(buttons["linux"], "https://example.com/releases/latest");
    }
}
