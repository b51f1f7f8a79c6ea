//! Named, ordered provisioning steps and the driver that executes one.
/// Step 3: `brew update` and `brew bundle`.
pub mod bundle;
/// Step 6: static config file copies.
pub mod config_files;
mod context;
/// Step 2: Homebrew.
pub mod homebrew;
/// Step 4: preference bundle imports.
pub mod preferences;
mod processing;
/// Step 5: the archive-distributed application.
pub mod remote_app;
/// Step 7: VS Code extensions.
pub mod vscode_extensions;
/// Step 1: Xcode Command Line Tools.
pub mod xcode;

pub use context::{APPLICATIONS_DIR, Context};
pub use processing::{
    ProcessOpts, TaskResult, TaskStats, apply_resources, collect_applied, collect_resources,
    process_resources,
};

use anyhow::Result;

use crate::error::{PipelineError, StepError};
use crate::logging::TaskStatus;

/// What happens to the run when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the pipeline; nothing after the step runs.
    Fatal,
    /// Log the failure and continue with the next step.
    Warn,
}

/// Outcome of a step's precondition check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// Already done; the reason is logged and the action is not run.
    Satisfied(String),
    /// Not done yet; run the action.
    Unsatisfied,
    /// Cannot run; treated as a failure under the step's policy.
    Blocked(String),
}

/// A named provisioning step.
pub trait Task: Send + Sync {
    /// Human-readable step name.
    fn name(&self) -> &'static str;

    /// Failure policy for this step.
    fn policy(&self) -> FailurePolicy;

    /// What the operator should do before re-running after a failure.
    fn remedy(&self) -> &'static str;

    /// Decide whether the action needs to run.
    ///
    /// Checks are cheap existence tests and never change the system.
    ///
    /// # Errors
    ///
    /// Returns an error if the check itself cannot be performed, such as an
    /// input file that exists but does not parse.
    fn check(&self, ctx: &Context) -> Result<Precondition>;

    /// Execute the step.
    ///
    /// # Errors
    ///
    /// Returns an error if the step fails, such as when system commands
    /// fail, a download is rejected, or a file cannot be written.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// Every step, in the order the pipeline runs them.
#[must_use]
pub fn all_steps() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(xcode::EnsureCommandLineTools),
        Box::new(homebrew::EnsureHomebrew),
        Box::new(bundle::ApplyBrewfile),
        Box::new(preferences::ImportPreferences),
        Box::new(remote_app::InstallRemoteApp),
        Box::new(config_files::CopyConfigFiles),
        Box::new(vscode_extensions::InstallVsCodeExtensions),
    ]
}

/// Execute step `index` of `total`, recording the result in the logger.
///
/// # Errors
///
/// Returns a [`PipelineError`] when a [`FailurePolicy::Fatal`] step fails;
/// the caller must not run any further step.
pub fn execute(
    task: &dyn Task,
    index: usize,
    total: usize,
    ctx: &Context,
) -> Result<(), PipelineError> {
    let name = task.name();
    ctx.log.stage(&format!("[{index}/{total}] {name}"));

    let outcome = task.check(ctx).and_then(|pre| match pre {
        Precondition::Satisfied(reason) => Ok(TaskResult::Skipped(reason)),
        Precondition::Unsatisfied => task.run(ctx),
        Precondition::Blocked(reason) => Err(anyhow::anyhow!(reason)),
    });

    match outcome {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(name, TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skip: {reason}"));
            ctx.log
                .record_task(name, TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(name, TaskStatus::DryRun, None);
        }
        Ok(TaskResult::Warned(reason)) => {
            ctx.log
                .record_task(name, TaskStatus::Warned, Some(&reason));
        }
        Err(e) => {
            let reason = format!("{e:#}").replace('\n', " ");
            if task.policy() == FailurePolicy::Warn {
                ctx.log.warn(&format!("{name}: {reason}"));
                ctx.log
                    .record_task(name, TaskStatus::Warned, Some(&reason));
                return Ok(());
            }
            ctx.log.error(&format!("{name}: {reason}"));
            ctx.log
                .record_task(name, TaskStatus::Failed, Some(&reason));
            let awaiting = e.chain().any(|cause| {
                matches!(
                    cause.downcast_ref::<StepError>(),
                    Some(StepError::AwaitingInteractiveInstall { .. })
                )
            });
            let (step, remedy) = (name.to_string(), task.remedy().to_string());
            return Err(if awaiting {
                PipelineError::AwaitingInstaller {
                    index,
                    total,
                    step,
                    reason,
                    remedy,
                }
            } else {
                PipelineError::StepFailed {
                    index,
                    total,
                    step,
                    reason,
                    remedy,
                }
            });
        }
    }
    Ok(())
}
