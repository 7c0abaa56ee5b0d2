//! Element ids the renderer writes to.

pub const LINK_DISCUSSIONS: &str = "link-discussions";
pub const LINK_RELEASES: &str = "link-releases";
pub const LINK_FOOTER_DISCUSSIONS: &str = "link-footer-discussions";
pub const LINK_FOOTER_ISSUES: &str = "link-footer-issues";
pub const FOOTER_YEAR: &str = "footer-year";
pub const HERO_VERSION: &str = "hero-version";
pub const DOWNLOAD_CARDS: &str = "download-cards";
pub const CHANGELOG_ENTRIES: &str = "changelog-entries";
pub const LOADING_MSG: &str = "loading-msg";

/// Id of the hero download button for a platform, e.g. `dl-windows`.
pub fn hero_button(platform: &str) -> String {
    format!("dl-{}", platform)
}
