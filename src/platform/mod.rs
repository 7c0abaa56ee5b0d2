//! Platform keys for release assets.
//!
//! Release assets are sorted into the three desktop platforms the page offers
//! downloads for. The platform is inferred from the asset file name, e.g.
//! `"MyPlugin_Windows_VST3_v1.0.0.zip"` belongs to [`Platform::Windows`].

use std::fmt;

/// Suffix appended to the platform name to form an asset key (`windows_vst3`).
pub const ASSET_SUFFIX: &str = "_vst3";

/// A platform the page offers a download for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// All platforms in display order.
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::MacOs, Platform::Linux];

    /// Guess the platform from an asset file name.
    ///
    /// Matching is a case-insensitive substring check, tried in the order
    /// windows, macos, linux. Returns `None` when no keyword is present.
    pub fn from_asset_name(name: &str) -> Option<Self> {
        let n = name.to_lowercase();
        if n.contains("windows") || n.contains("win") {
            Some(Platform::Windows)
        } else if n.contains("macos") || n.contains("mac") {
            Some(Platform::MacOs)
        } else if n.contains("linux") {
            Some(Platform::Linux)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::MacOs => "macos",
            Platform::Linux => "linux",
        }
    }

    /// Key under which this platform's download URL is stored in a release record.
    pub fn asset_key(&self) -> String {
        format!("{}{}", self.as_str(), ASSET_SUFFIX)
    }

    /// Label shown on the download card.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Windows => "⊞ Windows VST3",
            Platform::MacOs => "⌘ macOS VST3",
            Platform::Linux => "🐧 Linux VST3",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform name of an asset key: `"macos_vst3"` -> `"macos"`.
///
/// Keys are taken as-is from the feed, so the result is not necessarily one
/// of the known platforms.
pub fn platform_name_from_key(key: &str) -> String {
    key.replacen(ASSET_SUFFIX, "", 1)
}
