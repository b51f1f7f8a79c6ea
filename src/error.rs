//! Domain-specific error types for the provisioning pipeline.
//!
//! Internal modules return typed errors (e.g. [`ConfigError`], [`StepError`])
//! or [`anyhow::Error`] with context; the CLI boundary turns a
//! [`PipelineError`] into a single `ERROR:` line and an exit code.
//!
//! # Error hierarchy
//!
//! ```text
//! ProvisionError
//! ├── Config(ConfigError)      — provision.toml, Brewfile, extension list
//! ├── Pipeline(PipelineError)  — a FATAL step aborted the run
//! └── Platform(PlatformError)  — not running on macOS
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Exit code used when a step aborts the pipeline.
pub const EXIT_FATAL: u8 = 1;

/// Exit code used when an interactive installer was launched and the
/// operator has to re-run once it completes.
pub const EXIT_AWAITING_INSTALLER: u8 = 2;

/// Top-level error type for the provisioning engine.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A FATAL step aborted the pipeline.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The host platform is not supported.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

impl ProvisionError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Pipeline(e) => e.exit_code(),
            Self::Config(_) | Self::Platform(_) => EXIT_FATAL,
        }
    }
}

/// Exit code for any error reaching the CLI boundary.
///
/// Typed pipeline errors carry their own code; anything else is FATAL.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    if let Some(e) = err.downcast_ref::<ProvisionError>() {
        return e.exit_code();
    }
    err.downcast_ref::<PipelineError>()
        .map_or(EXIT_FATAL, PipelineError::exit_code)
}

/// Errors that arise from loading the repository's static data files.
///
/// "File absent" and "file present but malformed" are separate variants so
/// that callers can apply different policies to each.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required file does not exist.
    #[error("file not found: {}", path.display())]
    NotFound {
        /// Path that was expected to exist.
        path: PathBuf,
    },

    /// A line-oriented file contains a malformed line.
    #[error("{file}:{line}: {message}")]
    Parse {
        /// File name used in the diagnostic.
        file: String,
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// A TOML file could not be deserialized.
    #[error("invalid TOML in {file}: {message}")]
    Toml {
        /// File name used in the diagnostic.
        file: String,
        /// Deserializer message.
        message: String,
    },

    /// An I/O error occurred while reading a config file.
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The repository root could not be located.
    #[error("cannot determine provisioning root: {0}")]
    RootNotFound(String),
}

/// Typed step failures whose kind changes how the driver reports them.
#[derive(Error, Debug)]
pub enum StepError {
    /// An interactive GUI installer was launched; completion cannot be
    /// verified synchronously.
    #[error("{tool} is not installed; its interactive installer has been requested")]
    AwaitingInteractiveInstall {
        /// Tool being installed.
        tool: String,
    },

    /// A tool that an earlier step should have provided cannot be found.
    #[error("{tool} could not be located after installation")]
    ToolNotResolved {
        /// Tool that could not be located.
        tool: String,
    },
}

/// Error returned by the pipeline driver when a FATAL step aborts the run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The step failed and nothing after it ran.
    #[error("step {index}/{total} '{step}' failed: {reason}. {remedy}")]
    StepFailed {
        /// 1-based step index.
        index: usize,
        /// Number of steps in the pipeline.
        total: usize,
        /// Step name.
        step: String,
        /// Full cause chain.
        reason: String,
        /// What the operator should do before re-running.
        remedy: String,
    },

    /// The step launched an interactive installer and the run must be
    /// repeated once it completes.
    #[error("step {index}/{total} '{step}' is waiting on an interactive installer: {reason}. {remedy}")]
    AwaitingInstaller {
        /// 1-based step index.
        index: usize,
        /// Number of steps in the pipeline.
        total: usize,
        /// Step name.
        step: String,
        /// Full cause chain.
        reason: String,
        /// What the operator should do before re-running.
        remedy: String,
    },
}

impl PipelineError {
    /// Process exit code for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::StepFailed { .. } => EXIT_FATAL,
            Self::AwaitingInstaller { .. } => EXIT_AWAITING_INSTALLER,
        }
    }

    /// Name of the step that aborted the run.
    #[must_use]
    pub fn step(&self) -> &str {
        match self {
            Self::StepFailed { step, .. } | Self::AwaitingInstaller { step, .. } => step,
        }
    }
}

/// Errors that arise from platform detection.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The requested operation is not supported on the current platform.
    #[error("provisioning is only supported on macOS (detected {platform})")]
    Unsupported {
        /// Name of the detected platform.
        platform: String,
    },
}
