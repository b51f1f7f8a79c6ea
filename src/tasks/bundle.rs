use anyhow::{Context as _, Result};

use super::{Context, FailurePolicy, Precondition, Task, TaskResult};
use crate::config::brewfile;

/// Install everything the Brewfile declares with `brew bundle`.
#[derive(Debug)]
pub struct ApplyBrewfile;

impl Task for ApplyBrewfile {
    fn name(&self) -> &'static str {
        "Brewfile bundle"
    }

    fn policy(&self) -> FailurePolicy {
        FailurePolicy::Fatal
    }

    fn remedy(&self) -> &'static str {
        "Fix the Brewfile or the failing package, then re-run provision."
    }

    fn check(&self, ctx: &Context) -> Result<Precondition> {
        let path = &ctx.config.brewfile;
        if !path.exists() {
            return Ok(Precondition::Blocked(format!(
                "Brewfile not found at {}",
                path.display()
            )));
        }
        let manifest = brewfile::load(path)?;
        ctx.log
            .debug(&format!("Brewfile declares {}", manifest.describe()));
        Ok(Precondition::Unsatisfied)
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let file = ctx.config.brewfile.to_string_lossy();
        if ctx.dry_run {
            ctx.log.dry_run("would run brew update");
            ctx.log
                .dry_run(&format!("would run brew bundle --file {file}"));
            return Ok(TaskResult::DryRun);
        }

        let brew = ctx.brew()?;
        let brew = brew.to_string_lossy();

        ctx.log.info("updating Homebrew");
        ctx.executor
            .run(&brew, &["update"])
            .context("brew update")?;

        ctx.log.info(&format!("bundling {file}"));
        ctx.executor
            .run(&brew, &["bundle", "--file", &file])
            .context("brew bundle")?;
        Ok(TaskResult::Ok)
    }
}
