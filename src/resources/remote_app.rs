//! Archive-distributed application resource.
//!
//! Lifecycle of one install: download into a scratch directory, verify the
//! pinned digest (if any), unpack, locate `<name>.app`, and copy it into the
//! applications directory with elevated privileges. The scratch directory is
//! removed however the install ends.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::error::ResourceError;
use super::helpers::fs::{find_entry, sha256_file};
use super::helpers::scratch::ScratchDir;
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::config::remote_app::RemoteApp;
use crate::exec::Executor;
use crate::fetch::Fetcher;

/// Installs one application bundle from a remote archive.
pub struct RemoteAppResource {
    app: RemoteApp,
    applications_dir: PathBuf,
    fetcher: Arc<dyn Fetcher>,
    executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for RemoteAppResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteAppResource")
            .field("app", &self.app)
            .field("applications_dir", &self.applications_dir)
            .field("fetcher", &"<dyn Fetcher>")
            .field("executor", &self.executor)
            .finish()
    }
}

impl RemoteAppResource {
    /// Create a new remote application install.
    #[must_use]
    pub fn new(
        app: RemoteApp,
        applications_dir: PathBuf,
        fetcher: Arc<dyn Fetcher>,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            app,
            applications_dir,
            fetcher,
            executor,
        }
    }

    /// Where the bundle ends up, e.g. `/Applications/Hammerspoon.app`.
    #[must_use]
    pub fn destination(&self) -> PathBuf {
        self.applications_dir.join(self.app.bundle_name())
    }

    fn verify(&self, archive: &Path) -> Result<()> {
        let Some(expected) = &self.app.sha256 else {
            return Ok(());
        };
        let actual = sha256_file(archive)?;
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(ResourceError::ChecksumMismatch {
                expected: expected.clone(),
                actual,
            }
            .into());
        }
        Ok(())
    }

    fn copy_privileged(&self, bundle: &Path) -> Result<()> {
        let bundle_arg = bundle.to_string_lossy();
        let dest_arg = self.applications_dir.to_string_lossy();
        self.executor
            .run("sudo", &["cp", "-R", &bundle_arg, &dest_arg])
            .map_err(|e| ResourceError::PermissionDenied {
                path: format!("{} ({e})", self.destination().display()),
            })?;
        Ok(())
    }
}

impl Applicable for RemoteAppResource {
    fn description(&self) -> String {
        self.app.bundle_name()
    }

    fn apply(&self) -> Result<ResourceChange> {
        let scratch = ScratchDir::new("provision-")?;
        let archive = scratch.path().join(self.app.archive_name());

        self.fetcher
            .download(&self.app.url, &archive)
            .with_context(|| format!("downloading {}", self.app.bundle_name()))?;
        self.verify(&archive)?;

        let unpacked = scratch.path().join("unpacked");
        std::fs::create_dir_all(&unpacked)
            .with_context(|| format!("creating {}", unpacked.display()))?;
        self.fetcher.unpack(&archive, &unpacked)?;

        let bundle_name = self.app.bundle_name();
        let bundle = find_entry(&unpacked, &bundle_name, self.app.search_depth)?.ok_or_else(
            || ResourceError::EntryNotFound {
                entry: bundle_name.clone(),
                root: self.app.url.clone(),
                depth: self.app.search_depth,
            },
        )?;

        if self.destination().exists() {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        self.copy_privileged(&bundle)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for RemoteAppResource {
    fn current_state(&self) -> Result<ResourceState> {
        if self.destination().exists() {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::remote_app::DEFAULT_SEARCH_DEPTH;
    use crate::fetch::MockFetcher;
    use crate::resources::test_helpers::MockExecutor;

    fn app(sha256: Option<String>) -> RemoteApp {
        RemoteApp {
            name: "Hammerspoon".to_string(),
            url: "https://example.com/Hammerspoon-1.0.0.zip".to_string(),
            sha256,
            search_depth: DEFAULT_SEARCH_DEPTH,
        }
    }

    /// A fetcher that writes `b"archive"` and unpacks a bundle at `layout`.
    fn fetcher_with_layout(layout: &'static str) -> MockFetcher {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_download()
            .times(1)
            .returning(|_url: &str, dest: &Path| {
                std::fs::write(dest, b"archive")?;
                Ok(())
            });
        fetcher
            .expect_unpack()
            .times(1)
            .returning(move |_archive: &Path, dest: &Path| {
                std::fs::create_dir_all(dest.join(layout).join("Contents"))?;
                Ok(())
            });
        fetcher
    }

    #[test]
    fn present_destination_is_correct_and_fetches_nothing() {
        let apps = tempfile::tempdir().unwrap();
        std::fs::create_dir(apps.path().join("Hammerspoon.app")).unwrap();
        let mut fetcher = MockFetcher::new();
        fetcher.expect_download().never();
        fetcher.expect_unpack().never();
        let r = RemoteAppResource::new(
            app(None),
            apps.path().to_path_buf(),
            Arc::new(fetcher),
            Arc::new(MockExecutor::new()),
        );
        assert_eq!(r.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn install_downloads_unpacks_and_copies_once() {
        let apps = tempfile::tempdir().unwrap();
        let exec = Arc::new(MockExecutor::new());
        let r = RemoteAppResource::new(
            app(None),
            apps.path().to_path_buf(),
            Arc::new(fetcher_with_layout("Hammerspoon.app")),
            Arc::clone(&exec) as Arc<dyn Executor>,
        );
        assert_eq!(r.current_state().unwrap(), ResourceState::Missing);
        assert_eq!(r.apply().unwrap(), ResourceChange::Applied);
        let copies = exec.calls_matching("sudo cp -R");
        assert_eq!(copies.len(), 1);
        assert!(copies[0].ends_with(&format!("Hammerspoon.app {}", apps.path().display())));
    }

    #[test]
    fn nested_bundle_within_depth_is_found() {
        let apps = tempfile::tempdir().unwrap();
        let r = RemoteAppResource::new(
            app(None),
            apps.path().to_path_buf(),
            Arc::new(fetcher_with_layout("Hammerspoon-1.0.0/dist/Hammerspoon.app")),
            Arc::new(MockExecutor::new()),
        );
        assert_eq!(r.apply().unwrap(), ResourceChange::Applied);
    }

    #[test]
    fn missing_bundle_reports_layout_change() {
        let apps = tempfile::tempdir().unwrap();
        let exec = Arc::new(MockExecutor::new());
        let r = RemoteAppResource::new(
            app(None),
            apps.path().to_path_buf(),
            Arc::new(fetcher_with_layout("Other.app")),
            Arc::clone(&exec) as Arc<dyn Executor>,
        );
        let err = r.apply().unwrap_err();
        assert!(err.to_string().starts_with("archive layout changed"), "got: {err}");
        assert_eq!(exec.call_count(), 0, "nothing may be copied");
    }

    #[test]
    fn checksum_mismatch_aborts_before_unpack() {
        let apps = tempfile::tempdir().unwrap();
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_download()
            .times(1)
            .returning(|_url: &str, dest: &Path| {
                std::fs::write(dest, b"archive")?;
                Ok(())
            });
        fetcher.expect_unpack().never();
        let r = RemoteAppResource::new(
            app(Some("0".repeat(64))),
            apps.path().to_path_buf(),
            Arc::new(fetcher),
            Arc::new(MockExecutor::new()),
        );
        let err = r.apply().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResourceError>(),
            Some(ResourceError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn matching_checksum_proceeds() {
        let apps = tempfile::tempdir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let sample = tmp.path().join("sample");
        std::fs::write(&sample, b"archive").unwrap();
        let digest = sha256_file(&sample).unwrap().to_uppercase();
        let r = RemoteAppResource::new(
            app(Some(digest)),
            apps.path().to_path_buf(),
            Arc::new(fetcher_with_layout("Hammerspoon.app")),
            Arc::new(MockExecutor::new()),
        );
        assert_eq!(r.apply().unwrap(), ResourceChange::Applied);
    }

    #[test]
    fn download_failure_propagates_and_skips_copy() {
        let apps = tempfile::tempdir().unwrap();
        let mut fetcher = MockFetcher::new();
        fetcher.expect_download().times(1).returning(|url: &str, _dest: &Path| {
            Err(ResourceError::Download {
                url: url.to_string(),
                reason: "status code 404".to_string(),
            }
            .into())
        });
        fetcher.expect_unpack().never();
        let exec = Arc::new(MockExecutor::new());
        let r = RemoteAppResource::new(
            app(None),
            apps.path().to_path_buf(),
            Arc::new(fetcher),
            Arc::clone(&exec) as Arc<dyn Executor>,
        );
        let err = r.apply().unwrap_err();
        assert!(format!("{err:#}").contains("404"));
        assert_eq!(exec.call_count(), 0);
    }

    #[test]
    fn privileged_copy_failure_is_permission_denied() {
        let apps = tempfile::tempdir().unwrap();
        let r = RemoteAppResource::new(
            app(None),
            apps.path().to_path_buf(),
            Arc::new(fetcher_with_layout("Hammerspoon.app")),
            Arc::new(MockExecutor::new().fail_on("sudo")),
        );
        let err = r.apply().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResourceError>(),
            Some(ResourceError::PermissionDenied { .. })
        ));
    }
}
