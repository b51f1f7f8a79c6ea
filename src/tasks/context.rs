use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::Result;

use crate::config::Config;
use crate::error::StepError;
use crate::exec::Executor;
use crate::fetch::Fetcher;
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::platform::Platform;

/// Where application bundles are installed.
pub const APPLICATIONS_DIR: &str = "/Applications";

/// Shared context for step execution.
pub struct Context {
    /// Configuration loaded from `conf/provision.toml`.
    pub config: Arc<Config>,
    /// Detected platform information.
    pub platform: Arc<Platform>,
    /// Logger for output and step recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// User's home directory path.
    pub home: PathBuf,
    /// Directory application bundles are copied into.
    pub applications_dir: PathBuf,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Archive downloader (for testing or real network access).
    pub fetcher: Arc<dyn Fetcher>,
    /// Filesystem checks (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
    pub(super) brew: OnceLock<PathBuf>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &"<Config>")
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("home", &self.home)
            .field("applications_dir", &self.applications_dir)
            .field("executor", &"<dyn Executor>")
            .field("fetcher", &"<dyn Fetcher>")
            .field("fs_ops", &"<dyn FileSystemOps>")
            .field("brew", &self.brew.get())
            .finish()
    }
}

impl Context {
    /// Creates a new context for step execution.
    ///
    /// # Errors
    ///
    /// Returns an error if the HOME environment variable is not set.
    pub fn new(
        config: Arc<Config>,
        platform: Arc<Platform>,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self> {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable is not set"))?;

        Ok(Self {
            config,
            platform,
            log,
            dry_run,
            home: PathBuf::from(home),
            applications_dir: PathBuf::from(APPLICATIONS_DIR),
            executor,
            fetcher,
            fs_ops: Arc::new(SystemFileSystemOps),
            brew: OnceLock::new(),
        })
    }

    /// Root directory of the provisioning repository.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Replace the home directory.
    #[must_use]
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = home;
        self
    }

    /// Replace the applications directory.
    #[must_use]
    pub fn with_applications_dir(mut self, dir: PathBuf) -> Self {
        self.applications_dir = dir;
        self
    }

    /// Replace the [`FileSystemOps`] implementation.
    #[must_use]
    pub fn with_fs_ops(mut self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        self.fs_ops = fs_ops;
        self
    }

    /// Locate the Homebrew executable.
    ///
    /// The fixed install locations are checked native architecture first,
    /// then `PATH`. Only a successful lookup is cached, so a lookup made
    /// before Homebrew is installed does not hide it afterwards.
    #[must_use]
    pub fn resolve_brew(&self) -> Option<PathBuf> {
        if let Some(path) = self.brew.get() {
            return Some(path.clone());
        }
        let found = self
            .platform
            .homebrew_candidates()
            .into_iter()
            .find(|candidate| self.fs_ops.is_file(candidate))
            .or_else(|| self.executor.which("brew").then(|| PathBuf::from("brew")))?;
        self.log
            .debug(&format!("using brew at {}", found.display()));
        Some(self.brew.get_or_init(|| found).clone())
    }

    /// The Homebrew executable, or an error if it cannot be located.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::ToolNotResolved`] when no candidate exists.
    pub fn brew(&self) -> Result<PathBuf> {
        self.resolve_brew().ok_or_else(|| {
            StepError::ToolNotResolved {
                tool: "brew".to_string(),
            }
            .into()
        })
    }
}
