//! Preference bundle imports.
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A saved preference bundle to import into one application domain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PreferenceImport {
    /// Preferences domain (e.g. `com.googlecode.iterm2`).
    pub domain: String,
    /// Bundle path, relative to the repository root until [`resolve`](Self::resolve)d.
    pub source: PathBuf,
}

impl PreferenceImport {
    /// Anchor a relative `source` at `root`.
    #[must_use]
    pub fn resolve(mut self, root: &Path) -> Self {
        if self.source.is_relative() {
            self.source = root.join(&self.source);
        }
        self
    }
}
