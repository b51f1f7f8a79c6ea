//! Archive fetching: HTTP download and unpacking.
//!
//! [`Fetcher`] is the seam between the remote-archive resource and the
//! network; [`HttpFetcher`] is the production implementation.
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::exec::Executor;
use crate::resources::error::ResourceError;

/// Download and unpack operations used by the remote-archive installer and
/// the Homebrew bootstrap.
#[cfg_attr(test, mockall::automock)]
pub trait Fetcher: Send + Sync {
    /// Download `url` to the file at `dest`, replacing it if present.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-success HTTP status, or if
    /// `dest` cannot be written.
    fn download(&self, url: &str, dest: &Path) -> Result<()>;

    /// Unpack the archive at `archive` into the directory `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive is corrupt or cannot be read.
    fn unpack(&self, archive: &Path, dest: &Path) -> Result<()>;
}

/// Production [`Fetcher`]: `ureq` for HTTP, `ditto` for unpacking.
///
/// `ditto -x -k` is used rather than `unzip` because it preserves the
/// extended attributes and symlinks inside application bundles.
#[derive(Debug)]
pub struct HttpFetcher {
    executor: Arc<dyn Executor>,
}

impl HttpFetcher {
    /// Create a fetcher that unpacks through `executor`.
    #[must_use]
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }
}

impl Fetcher for HttpFetcher {
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let response = ureq::get(url)
            .call()
            .map_err(|e| ResourceError::Download {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        let mut reader = response.into_body().into_reader();
        let mut file =
            File::create(dest).with_context(|| format!("creating {}", dest.display()))?;
        io::copy(&mut reader, &mut file).map_err(|e| ResourceError::Download {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    fn unpack(&self, archive: &Path, dest: &Path) -> Result<()> {
        let archive_arg = archive.to_string_lossy();
        let dest_arg = dest.to_string_lossy();
        self.executor
            .run("ditto", &["-x", "-k", &archive_arg, &dest_arg])
            .with_context(|| format!("unpacking {}", archive.display()))?;
        Ok(())
    }
}
