//! Static configuration file copy resource.
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::helpers::fs::ensure_parent_dir;
use super::{Applicable, Resource, ResourceChange, ResourceState};

/// Copies a repository file to a fixed destination, overwriting what is there.
#[derive(Debug, Clone)]
pub struct ConfigFileResource {
    /// File in the repository.
    pub source: PathBuf,
    /// Absolute destination.
    pub target: PathBuf,
}

impl ConfigFileResource {
    /// Create a new config file copy.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl Applicable for ConfigFileResource {
    fn description(&self) -> String {
        self.target.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        if !self.source.exists() {
            return Ok(ResourceChange::Skipped {
                reason: format!("source not found: {}", self.source.display()),
            });
        }
        ensure_parent_dir(&self.target)?;
        std::fs::copy(&self.source, &self.target).with_context(|| {
            format!(
                "copying {} to {}",
                self.source.display(),
                self.target.display()
            )
        })?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for ConfigFileResource {
    /// An existing destination is reported as `Incorrect` without comparing
    /// contents; it is overwritten on every run.
    fn current_state(&self) -> Result<ResourceState> {
        if !self.source.exists() {
            return Ok(ResourceState::Invalid {
                reason: format!("source not found: {}", self.source.display()),
            });
        }
        if self.target.exists() {
            Ok(ResourceState::Incorrect {
                current: "existing file".to_string(),
            })
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
