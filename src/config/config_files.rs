//! Static configuration files copied into per-user locations.
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A repository file copied, overwriting, to a fixed destination under `~`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfigFile {
    /// Source path, relative to the repository root until [`resolve`](Self::resolve)d.
    pub source: PathBuf,
    /// Destination, written with a leading `~/`.
    pub destination: String,
}

impl ConfigFile {
    /// Anchor a relative `source` at `root`.
    #[must_use]
    pub fn resolve(mut self, root: &Path) -> Self {
        if self.source.is_relative() {
            self.source = root.join(&self.source);
        }
        self
    }

    /// Destination path with `~` expanded to `home`.
    #[must_use]
    pub fn destination_in(&self, home: &Path) -> PathBuf {
        expand_home(&self.destination, home)
    }
}

/// Expand a leading `~` or `~/` in `path` to `home`.
#[must_use]
pub fn expand_home(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}
