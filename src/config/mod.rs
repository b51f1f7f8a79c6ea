//! Repository configuration: `conf/provision.toml` plus the data files it names.
pub mod brewfile;
pub mod config_files;
pub mod extensions;
pub mod preferences;
pub mod remote_app;
pub mod toml_loader;
pub mod validation;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Location of the main configuration file relative to the root.
pub const CONFIG_FILE: &str = "conf/provision.toml";

fn default_brewfile() -> PathBuf {
    PathBuf::from("Brewfile")
}

fn default_extensions() -> PathBuf {
    PathBuf::from("vscode/extensions.txt")
}

/// On-disk shape of `conf/provision.toml`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default = "default_brewfile")]
    brewfile: PathBuf,
    #[serde(default = "default_extensions")]
    extensions: PathBuf,
    #[serde(default)]
    preferences: Vec<preferences::PreferenceImport>,
    #[serde(default)]
    config_files: Vec<config_files::ConfigFile>,
    remote_app: remote_app::RemoteApp,
}

/// All loaded configuration, with every repository path made absolute.
///
/// The Brewfile and extension list are only located here; they are parsed by
/// the steps that consume them so that "absent" can be handled per step.
#[derive(Debug, Clone)]
pub struct Config {
    /// Repository root.
    pub root: PathBuf,
    /// Path to the Homebrew Bundle manifest.
    pub brewfile: PathBuf,
    /// Path to the VS Code extension list.
    pub extensions: PathBuf,
    /// Preference bundles to import, in order.
    pub preferences: Vec<preferences::PreferenceImport>,
    /// Static files to copy, in order.
    pub config_files: Vec<config_files::ConfigFile>,
    /// The archive-distributed application.
    pub remote_app: remote_app::RemoteApp,
}

impl Config {
    /// Load `conf/provision.toml` under `root`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is missing, unreadable, or not
    /// valid configuration.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml_loader::load_config(&root.join(CONFIG_FILE))?;
        Ok(Self::from_raw(root, raw))
    }

    fn from_raw(root: &Path, raw: RawConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            brewfile: root.join(raw.brewfile),
            extensions: root.join(raw.extensions),
            preferences: raw
                .preferences
                .into_iter()
                .map(|p| p.resolve(root))
                .collect(),
            config_files: raw
                .config_files
                .into_iter()
                .map(|c| c.resolve(root))
                .collect(),
            remote_app: raw.remote_app,
        }
    }

    /// Run every validator and collect non-fatal warnings.
    #[must_use]
    pub fn validate(&self) -> Vec<validation::ValidationWarning> {
        validation::validate_all(self)
    }
}
