use anyhow::Result;

use super::{Context, FailurePolicy, Precondition, Task, TaskResult};
use crate::error::StepError;

/// Ensure the Xcode Command Line Tools are installed.
///
/// The installer is a GUI dialog whose completion cannot be awaited, so a
/// missing toolchain always ends the run; the operator re-runs once the
/// dialog finishes.
#[derive(Debug)]
pub struct EnsureCommandLineTools;

impl Task for EnsureCommandLineTools {
    fn name(&self) -> &'static str {
        "Xcode Command Line Tools"
    }

    fn policy(&self) -> FailurePolicy {
        FailurePolicy::Fatal
    }

    fn remedy(&self) -> &'static str {
        "Re-run after completing the GUI installer."
    }

    fn check(&self, ctx: &Context) -> Result<Precondition> {
        let result = ctx.executor.run_unchecked("xcode-select", &["-p"])?;
        if result.success {
            return Ok(Precondition::Satisfied(format!(
                "installed at {}",
                result.stdout.trim()
            )));
        }
        Ok(Precondition::Unsatisfied)
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.dry_run {
            ctx.log
                .dry_run("would launch the Command Line Tools installer");
            return Ok(TaskResult::DryRun);
        }

        ctx.log.info("launching the Command Line Tools installer");
        match ctx.executor.run_interactive("xcode-select", &["--install"]) {
            Ok(true) => {}
            Ok(false) => ctx.log.debug("xcode-select --install exited non-zero"),
            Err(e) => ctx
                .log
                .debug(&format!("xcode-select --install did not start: {e:#}")),
        }
        Err(StepError::AwaitingInteractiveInstall {
            tool: "Command Line Tools".to_string(),
        }
        .into())
    }
}
