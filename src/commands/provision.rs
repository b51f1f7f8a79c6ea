//! The `provision` command entry point.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{Cli, VERSION};
use crate::config::{CONFIG_FILE, Config};
use crate::error::{ConfigError, PlatformError, ProvisionError};
use crate::exec::{Executor, SystemExecutor};
use crate::fetch::HttpFetcher;
use crate::logging::{Log, Logger};
use crate::platform::Platform;
use crate::tasks::{self, Context};

/// Environment variable naming the provisioning root.
pub const ROOT_ENV: &str = "PROVISION_ROOT";

/// Run the provisioning pipeline.
///
/// # Errors
///
/// Returns a [`ProvisionError`] if the host is not macOS, the root or its
/// configuration cannot be loaded, or a FATAL step aborts the run.
pub fn run(cli: &Cli, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("provision {VERSION}"));

    let platform = Platform::detect();
    if !platform.is_macos() {
        return Err(ProvisionError::from(PlatformError::Unsupported {
            platform: platform.os.to_string(),
        })
        .into());
    }

    let root = resolve_root(cli.root.as_deref()).map_err(ProvisionError::from)?;
    log.stage("Loading configuration");
    let config = Config::load(&root).map_err(ProvisionError::from)?;
    log.info(&format!("root: {}", root.display()));
    log.debug(&format!("{} preference imports", config.preferences.len()));
    log.debug(&format!("{} config files", config.config_files.len()));
    log.debug(&format!("remote app: {}", config.remote_app.bundle_name()));
    report_warnings(&config, log);

    let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);
    let fetcher = Arc::new(HttpFetcher::new(Arc::clone(&executor)));
    let ctx = Context::new(
        Arc::new(config),
        Arc::new(platform),
        Arc::clone(log) as Arc<dyn Log>,
        cli.dry_run,
        executor,
        fetcher,
    )?;

    let steps = tasks::all_steps();
    let selected = super::select_steps(&steps, &cli.skip, &cli.only);
    if selected.len() < steps.len() {
        log.debug(&format!("running {} of {} steps", selected.len(), steps.len()));
    }
    super::run_pipeline(&selected, &ctx, log).map_err(ProvisionError::from)?;

    let warnings = log.warning_count();
    if warnings > 0 {
        log.warn(&format!(
            "provisioning finished with {warnings} step warning(s); see the summary above"
        ));
    }
    Ok(())
}

fn report_warnings(config: &Config, log: &Logger) {
    let warnings = config.validate();
    if warnings.is_empty() {
        return;
    }
    log.warn(&format!(
        "found {} configuration warning(s):",
        warnings.len()
    ));
    for warning in &warnings {
        log.warn(&format!(
            "  {} [{}]: {}",
            warning.source, warning.item, warning.message
        ));
    }
}

/// Resolve the provisioning root directory.
///
/// In order: `explicit` (from `--root`), `$PROVISION_ROOT`, the binary's
/// directory and up to two parents (covers `target/release/`), then the
/// current directory. The result must contain `conf/provision.toml`.
///
/// # Errors
///
/// Returns [`ConfigError::RootNotFound`] when no candidate qualifies.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let env = std::env::var_os(ROOT_ENV).map(PathBuf::from);
    let exe = std::env::current_exe().ok();
    let cwd = std::env::current_dir().ok();
    find_root(explicit, env.as_deref(), exe.as_deref(), cwd.as_deref())
}

fn find_root(
    explicit: Option<&Path>,
    env: Option<&Path>,
    exe: Option<&Path>,
    cwd: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    if let Some(root) = explicit.or(env) {
        if is_root(root) {
            return Ok(canonical(root));
        }
        return Err(ConfigError::RootNotFound(format!(
            "{} does not contain {CONFIG_FILE}",
            root.display()
        )));
    }

    exe.and_then(Path::parent)
        .into_iter()
        .flat_map(|dir| [dir.to_path_buf(), dir.join(".."), dir.join("../..")])
        .chain(cwd.map(Path::to_path_buf))
        .find(|candidate| is_root(candidate))
        .map(|candidate| canonical(&candidate))
        .ok_or_else(|| {
            ConfigError::RootNotFound(format!(
                "no {CONFIG_FILE} found; use --root or set {ROOT_ENV}"
            ))
        })
}

fn is_root(dir: &Path) -> bool {
    dir.join(CONFIG_FILE).is_file()
}

fn canonical(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
