// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed provisioning repository, a fake home
// and applications directory, and recording stand-ins for every external
// collaborator so the full pipeline can run without touching the host.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use mac_provision::config::{CONFIG_FILE, Config};
use mac_provision::exec::{ExecResult, Executor};
use mac_provision::fetch::Fetcher;
use mac_provision::logging::{Log, Logger};
use mac_provision::operations::FileSystemOps;
use mac_provision::platform::{Arch, HOMEBREW_ARM64, Os, Platform};
use mac_provision::tasks::Context;

/// Preference bundles declared by the test repository, domain and file name.
pub const PREFERENCE_FILES: [(&str, &str); 3] = [
    ("com.googlecode.iterm2", "iterm2.plist"),
    ("com.apple.dock", "dock.plist"),
    ("com.apple.finder", "finder.plist"),
];

/// Extensions listed by the test repository, in order.
pub const EXTENSIONS: [&str; 3] = [
    "editorconfig.editorconfig",
    "rust-lang.rust-analyzer",
    "vscodevim.vim",
];

/// Name of the archive-distributed application.
pub const APP_NAME: &str = "Hammerspoon";

fn provision_toml() -> String {
    let mut out = String::from("brewfile = \"Brewfile\"\nextensions = \"vscode/extensions.txt\"\n");
    for (domain, file) in PREFERENCE_FILES {
        out.push_str(&format!(
            "\n[[preferences]]\ndomain = \"{domain}\"\nsource = \"preferences/{file}\"\n"
        ));
    }
    out.push_str(
        "\n[[config_files]]\nsource = \"karabiner/karabiner.json\"\ndestination = \"~/.config/karabiner/karabiner.json\"\n",
    );
    out.push_str(
        "\n[[config_files]]\nsource = \"vscode/settings.json\"\ndestination = \"~/Library/Application Support/Code/User/settings.json\"\n",
    );
    out.push_str(&format!(
        "\n[remote_app]\nname = \"{APP_NAME}\"\nurl = \"https://example.com/{APP_NAME}-1.0.0.zip\"\n"
    ));
    out
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write repo file");
}

/// An isolated repository plus fake home and applications directories.
///
/// All three directories are deleted when dropped.
pub struct TestRepo {
    /// Repository root containing `conf/provision.toml`.
    pub root: tempfile::TempDir,
    /// Stand-in for `~`.
    pub home: tempfile::TempDir,
    /// Stand-in for `/Applications`.
    pub apps: tempfile::TempDir,
}

impl TestRepo {
    /// A complete repository: every data file and preference bundle present.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create repo dir");
        let r = root.path();
        write(r, CONFIG_FILE, &provision_toml());
        write(r, "Brewfile", "tap \"homebrew/bundle\"\nbrew \"git\"\ncask \"iterm2\"\n");
        write(r, "vscode/extensions.txt", &format!("# editor\n{}\n", EXTENSIONS.join("\n")));
        write(r, "vscode/settings.json", "{\"editor.fontSize\": 13}\n");
        write(r, "karabiner/karabiner.json", "{\"profiles\": []}\n");
        for (_, file) in PREFERENCE_FILES {
            write(r, &format!("preferences/{file}"), "<plist version=\"1.0\"><dict/></plist>\n");
        }
        Self {
            root,
            home: tempfile::tempdir().expect("create home dir"),
            apps: tempfile::tempdir().expect("create applications dir"),
        }
    }

    /// Delete `rel` from the repository.
    pub fn without(self, rel: &str) -> Self {
        std::fs::remove_file(self.root.path().join(rel)).expect("remove repo file");
        self
    }

    /// Pretend the application is already installed.
    pub fn with_app_installed(self) -> Self {
        std::fs::create_dir_all(self.app_path().join("Contents")).expect("create app bundle");
        self
    }

    /// Where the application bundle is installed.
    pub fn app_path(&self) -> PathBuf {
        self.apps.path().join(format!("{APP_NAME}.app"))
    }

    /// Path of `rel` under the fake home directory.
    pub fn home_path(&self, rel: &str) -> PathBuf {
        self.home.path().join(rel)
    }

    /// Load the repository configuration.
    pub fn config(&self) -> Config {
        Config::load(self.root.path()).expect("load config")
    }
}

/// A collaborator harness: recording executor, fake fetcher, fake filesystem
/// and a logger whose summary can be inspected.
pub struct Harness {
    pub executor: Arc<RecordingExecutor>,
    pub fetcher: Arc<FakeFetcher>,
    pub fs: Arc<FakeFs>,
    pub log: Arc<Logger>,
    pub platform: Platform,
    pub dry_run: bool,
}

impl Harness {
    /// Tools installed, `code` on `PATH`, brew at the Apple Silicon location.
    pub fn provisioned_host() -> Self {
        Self {
            executor: Arc::new(RecordingExecutor::new().with_program("code")),
            fetcher: Arc::new(FakeFetcher::new(APP_NAME)),
            fs: Arc::new(FakeFs::new().with_file(HOMEBREW_ARM64)),
            log: Arc::new(Logger::with_log_file(None)),
            platform: Platform::new(Os::MacOs, Arch::AppleSilicon),
            dry_run: false,
        }
    }

    /// Same collaborators with a fresh logger, for a second run.
    pub fn rerun(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            fetcher: Arc::clone(&self.fetcher),
            fs: Arc::clone(&self.fs),
            log: Arc::new(Logger::with_log_file(None)),
            platform: self.platform,
            dry_run: self.dry_run,
        }
    }

    /// Build a fresh context over `repo`. Each call starts with an
    /// unresolved brew location, as a new process would.
    pub fn context(&self, repo: &TestRepo) -> Context {
        Context::new(
            Arc::new(repo.config()),
            Arc::new(self.platform),
            Arc::clone(&self.log) as Arc<dyn Log>,
            self.dry_run,
            Arc::clone(&self.executor) as Arc<dyn Executor>,
            Arc::clone(&self.fetcher) as Arc<dyn Fetcher>,
        )
        .expect("create context")
        .with_home(repo.home.path().to_path_buf())
        .with_applications_dir(repo.apps.path().to_path_buf())
        .with_fs_ops(Arc::clone(&self.fs) as Arc<dyn FileSystemOps>)
    }
}

/// An [`Executor`] that records every command line and never spawns.
///
/// Lines starting with a prefix registered via [`fail_on`](Self::fail_on)
/// fail. `sudo cp -R <src> <dir>` is carried out for real so that a second
/// run observes the installed bundle.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<String>>,
    failures: Vec<String>,
    programs: Vec<String>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(mut self, prefix: &str) -> Self {
        self.failures.push(prefix.to_string());
        self
    }

    pub fn with_program(mut self, program: &str) -> Self {
        self.programs.push(program.to_string());
        self
    }

    /// All recorded command lines, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded command lines starting with `prefix`.
    pub fn calls_matching(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, program: &str, args: &[&str]) -> ExecResult {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        let success = !self.failures.iter().any(|p| line.starts_with(p.as_str()));
        if success
            && program == "sudo"
            && let ["cp", "-R", src, dir] = args
        {
            copy_tree(Path::new(src), Path::new(dir));
        }
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
        ExecResult {
            stdout: if program == "xcode-select" {
                "/Library/Developer/CommandLineTools\n".to_string()
            } else {
                String::new()
            },
            stderr: if success { String::new() } else { "simulated failure".to_string() },
            success,
            code: Some(i32::from(!success)),
        }
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        let result = self.record(program, args);
        if !result.success {
            anyhow::bail!("{program} failed (exit 1): simulated failure");
        }
        Ok(result)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        Ok(self.record(program, args))
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> anyhow::Result<bool> {
        Ok(self.record(program, args).success)
    }

    fn which(&self, program: &str) -> bool {
        self.programs.iter().any(|p| p == program)
    }
}

/// Copy `src` into `dir`, like `cp -R src dir`.
fn copy_tree(src: &Path, dir: &Path) {
    let target = dir.join(src.file_name().expect("source has a name"));
    copy_recursive(src, &target);
}

fn copy_recursive(src: &Path, dest: &Path) {
    if src.is_dir() {
        std::fs::create_dir_all(dest).expect("create dir");
        for entry in std::fs::read_dir(src).expect("read dir") {
            let entry = entry.expect("dir entry");
            copy_recursive(&entry.path(), &dest.join(entry.file_name()));
        }
    } else {
        std::fs::copy(src, dest).expect("copy file");
    }
}

/// A [`Fetcher`] that writes a placeholder archive and "unpacks" it into a
/// bundle named `<app>.app`, counting each call.
#[derive(Debug)]
pub struct FakeFetcher {
    app: String,
    downloads: Mutex<Vec<String>>,
    unpacks: Mutex<usize>,
}

impl FakeFetcher {
    pub fn new(app: &str) -> Self {
        Self {
            app: app.to_string(),
            downloads: Mutex::new(Vec::new()),
            unpacks: Mutex::new(0),
        }
    }

    /// URLs downloaded so far.
    pub fn downloads(&self) -> Vec<String> {
        self.downloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of archives unpacked so far.
    pub fn unpack_count(&self) -> usize {
        *self.unpacks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Fetcher for FakeFetcher {
    fn download(&self, url: &str, dest: &Path) -> anyhow::Result<()> {
        self.downloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
        std::fs::write(dest, b"PK\x03\x04")?;
        Ok(())
    }

    fn unpack(&self, _archive: &Path, dest: &Path) -> anyhow::Result<()> {
        *self.unpacks.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        let contents = dest.join(format!("{}.app", self.app)).join("Contents");
        std::fs::create_dir_all(&contents)?;
        std::fs::write(contents.join("Info.plist"), "<plist/>")?;
        Ok(())
    }
}

/// [`FileSystemOps`] answering from a fixed list of regular files.
#[derive(Debug, Default)]
pub struct FakeFs {
    files: Vec<PathBuf>,
}

impl FakeFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }
}

impl FileSystemOps for FakeFs {
    fn is_file(&self, path: &Path) -> bool {
        self.files.iter().any(|f| f == path)
    }
}
