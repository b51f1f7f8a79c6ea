//! Typed error variants for resource operations.
//!
//! This module provides [`ResourceError`], a structured error type for
//! resource check and apply operations.  Resource code returns these variants
//! directly; callers convert to [`anyhow::Error`] via `?`.

use thiserror::Error;

/// Errors that arise from resource checks and apply operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A command invoked by a resource failed with a non-zero exit code.
    #[error("command '{program}' failed (exit {exit_code}): {stderr}")]
    ExecutionFailed {
        /// Name of the program that was invoked.
        program: String,
        /// Exit code returned by the process.
        exit_code: i32,
        /// Captured standard error output.
        stderr: String,
    },

    /// A privileged operation was refused.
    #[error("permission denied: {path}")]
    PermissionDenied {
        /// Path for which permission was denied.
        path: String,
    },

    /// An HTTP download did not complete.
    #[error("download of {url} failed: {reason}")]
    Download {
        /// Requested URL.
        url: String,
        /// Transport or status error.
        reason: String,
    },

    /// The downloaded archive does not match its pinned digest.
    #[error("checksum mismatch: expected sha256 {expected}, got {actual}")]
    ChecksumMismatch {
        /// Pinned digest.
        expected: String,
        /// Digest of the downloaded file.
        actual: String,
    },

    /// The expected entry was not found in the unpacked archive.
    #[error("archive layout changed: {entry} not found within {depth} levels of {root}")]
    EntryNotFound {
        /// Entry that was searched for.
        entry: String,
        /// Directory the archive was unpacked into.
        root: String,
        /// Maximum depth searched.
        depth: usize,
    },
}
