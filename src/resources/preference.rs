//! Preference bundle import resource.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// Imports one saved preference bundle with `defaults import`.
#[derive(Debug)]
pub struct PreferenceImportResource {
    /// Preferences domain.
    pub domain: String,
    /// Bundle to import.
    pub source: PathBuf,
    executor: Arc<dyn Executor>,
}

impl PreferenceImportResource {
    /// Create a new preference import.
    #[must_use]
    pub fn new(domain: String, source: PathBuf, executor: Arc<dyn Executor>) -> Self {
        Self {
            domain,
            source,
            executor,
        }
    }
}

impl Applicable for PreferenceImportResource {
    fn description(&self) -> String {
        self.domain.clone()
    }

    fn apply(&self) -> Result<ResourceChange> {
        if !self.source.exists() {
            return Ok(ResourceChange::Skipped {
                reason: format!("source not found: {}", self.source.display()),
            });
        }
        let source = self.source.to_string_lossy();
        self.executor
            .run("defaults", &["import", &self.domain, &source])
            .with_context(|| format!("importing {} into {}", self.source.display(), self.domain))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for PreferenceImportResource {
    /// A present bundle is always re-imported: the preferences store offers no
    /// cheap way to compare its contents with the bundle.
    fn current_state(&self) -> Result<ResourceState> {
        if self.source.exists() {
            Ok(ResourceState::Missing)
        } else {
            Ok(ResourceState::Invalid {
                reason: format!("source not found: {}", self.source.display()),
            })
        }
    }
}

/// Outcome of asking the preferences daemon to drop its cache.
///
/// The request is fire-and-forget; callers may log the outcome or ignore it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheFlush {
    /// The daemon was signalled.
    Requested,
    /// The signal could not be delivered (e.g. the daemon was not running).
    Failed(String),
}

/// Ask `cfprefsd` to reload by terminating it; launchd restarts it on demand.
pub fn flush_preference_cache(executor: &dyn Executor) -> CacheFlush {
    match executor.run_unchecked("killall", &["cfprefsd"]) {
        Ok(result) if result.success => CacheFlush::Requested,
        Ok(result) => CacheFlush::Failed(format!(
            "killall exited {}: {}",
            result.code.unwrap_or(-1),
            result.stderr.trim()
        )),
        Err(e) => CacheFlush::Failed(e.to_string()),
    }
}
