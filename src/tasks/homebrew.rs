use anyhow::{Context as _, Result};

use super::{Context, FailurePolicy, Precondition, Task, TaskResult};
use crate::error::StepError;
use crate::resources::helpers::scratch::ScratchDir;

/// Official Homebrew bootstrap script.
pub const INSTALL_SCRIPT_URL: &str =
    "https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh";

/// Ensure Homebrew is installed and resolve its location for later steps.
#[derive(Debug)]
pub struct EnsureHomebrew;

impl Task for EnsureHomebrew {
    fn name(&self) -> &'static str {
        "Homebrew"
    }

    fn policy(&self) -> FailurePolicy {
        FailurePolicy::Fatal
    }

    fn remedy(&self) -> &'static str {
        "Install Homebrew from https://brew.sh, then re-run provision."
    }

    fn check(&self, ctx: &Context) -> Result<Precondition> {
        Ok(ctx.resolve_brew().map_or(Precondition::Unsatisfied, |path| {
            Precondition::Satisfied(format!("found at {}", path.display()))
        }))
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would run the Homebrew installer from {INSTALL_SCRIPT_URL}"));
            return Ok(TaskResult::DryRun);
        }

        let scratch = ScratchDir::new("provision-brew-")?;
        let script = scratch.path().join("install.sh");
        ctx.fetcher
            .download(INSTALL_SCRIPT_URL, &script)
            .context("downloading the Homebrew installer")?;

        ctx.log.info("running the Homebrew installer");
        let script_arg = script.to_string_lossy();
        let completed = ctx
            .executor
            .run_interactive("/bin/bash", &[&script_arg])
            .context("starting the Homebrew installer")?;
        if !completed {
            ctx.log.warn("Homebrew installer exited non-zero");
        }

        let brew = ctx.resolve_brew().ok_or_else(|| StepError::ToolNotResolved {
            tool: "brew".to_string(),
        })?;
        ctx.log.info(&format!("brew resolved at {}", brew.display()));
        Ok(TaskResult::Ok)
    }
}
