//! Filesystem checks behind a trait for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that tool resolution can be
//! unit-tested without the checked paths existing on the test host.
//! Production code uses [`SystemFileSystemOps`]; tests use
//! `MockFileSystemOps`.

use std::path::Path;

/// Abstraction over the filesystem checks used to locate installed tools.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` is a regular file (following symlinks).
    fn is_file(&self, path: &Path) -> bool;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Mock [`FileSystemOps`] answering from a fixed list of files.
///
/// ```ignore
/// let fs = MockFileSystemOps::new().with_file("/opt/homebrew/bin/brew");
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    files: Vec<std::path::PathBuf>,
}

#[cfg(test)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` as a regular file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        let p = path.into();
        if !self.files.contains(&p) {
            self.files.push(p);
        }
        self
    }
}

#[cfg(test)]
impl FileSystemOps for MockFileSystemOps {
    fn is_file(&self, path: &Path) -> bool {
        self.files.iter().any(|p| p == path)
    }
}
