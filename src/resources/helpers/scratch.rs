//! Scoped scratch directories that are removed on every exit path.
//!
//! A [`ScratchDir`] deletes itself when dropped, which covers normal return,
//! early `?` return and unwinding. Live scratch directories are also kept in
//! a process-wide registry so that the Ctrl-C handler installed by
//! [`install_interrupt_cleanup`] can remove them before the process exits.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Exit status used after an interrupt (128 + SIGINT).
const EXIT_INTERRUPTED: i32 = 130;

static ACTIVE: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());

/// A temporary directory that is deleted when dropped.
#[derive(Debug)]
pub struct ScratchDir {
    dir: tempfile::TempDir,
}

impl ScratchDir {
    /// Create a new scratch directory under the system temp dir.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(prefix: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .context("creating scratch directory")?;
        register(&ACTIVE, dir.path());
        Ok(Self { dir })
    }

    /// Path of the scratch directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        unregister(&ACTIVE, self.dir.path());
    }
}

fn register(registry: &Mutex<Vec<PathBuf>>, path: &Path) {
    registry
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(path.to_path_buf());
}

fn unregister(registry: &Mutex<Vec<PathBuf>>, path: &Path) {
    registry
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .retain(|p| p != path);
}

/// Remove every registered directory, returning how many were removed.
fn remove_all(registry: &Mutex<Vec<PathBuf>>) -> usize {
    let paths = std::mem::take(&mut *registry.lock().unwrap_or_else(PoisonError::into_inner));
    paths
        .iter()
        .filter(|p| std::fs::remove_dir_all(p).is_ok())
        .count()
}

/// Install a Ctrl-C handler that removes live scratch directories and exits
/// with status 130. Call once at startup.
///
/// # Errors
///
/// Returns an error if a handler is already installed.
pub fn install_interrupt_cleanup() -> Result<()> {
    ctrlc::set_handler(|| {
        let removed = remove_all(&ACTIVE);
        tracing::warn!("interrupted; removed {removed} scratch director(ies)");
        std::process::exit(EXIT_INTERRUPTED);
    })
    .context("installing Ctrl-C handler")
}

/// Whether `path` is currently registered for interrupt cleanup.
#[cfg(test)]
pub(crate) fn is_registered(path: &Path) -> bool {
    ACTIVE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .any(|p| p == path)
}
