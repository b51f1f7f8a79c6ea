//! The GUI application distributed only as a downloadable archive.
use serde::Deserialize;

/// Default depth searched for the application bundle inside the archive.
pub const DEFAULT_SEARCH_DEPTH: usize = 3;

const fn default_search_depth() -> usize {
    DEFAULT_SEARCH_DEPTH
}

/// Where to fetch the application and what to look for inside the archive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteApp {
    /// Application name; the archive must contain `<name>.app`.
    pub name: String,
    /// Archive download URL.
    pub url: String,
    /// Optional pinned SHA-256 of the archive (lowercase hex).
    #[serde(default)]
    pub sha256: Option<String>,
    /// Maximum directory depth searched for the bundle after unpacking.
    #[serde(default = "default_search_depth")]
    pub search_depth: usize,
}

impl RemoteApp {
    /// Bundle directory name, e.g. `Hammerspoon.app`.
    #[must_use]
    pub fn bundle_name(&self) -> String {
        format!("{}.app", self.name)
    }

    /// File name used for the downloaded archive in the scratch directory.
    #[must_use]
    pub fn archive_name(&self) -> String {
        self.url
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .map_or_else(|| format!("{}.zip", self.name), String::from)
    }
}
