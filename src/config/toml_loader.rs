//! TOML configuration file parsing.
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Read and deserialize a TOML file.
///
/// Unlike the line-oriented data files, the main configuration is required:
/// a missing file is reported as [`ConfigError::NotFound`] rather than an
/// empty default.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if `path` does not exist,
/// [`ConfigError::Io`] if it cannot be read, and [`ConfigError::Toml`] if it
/// does not deserialize into `T`.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = read_required(path)?;
    toml::from_str(&content).map_err(|e| ConfigError::Toml {
        file: display_name(path),
        message: e.message().to_string(),
    })
}

/// Read a required text file, distinguishing "absent" from "unreadable".
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if `path` does not exist and
/// [`ConfigError::Io`] for any other read failure.
pub fn read_required(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// File name used in diagnostics (falls back to the full path).
#[must_use]
pub fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}
