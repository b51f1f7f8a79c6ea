use anyhow::Result;

use std::sync::Arc;

use super::{Context, FailurePolicy, Precondition, ProcessOpts, Task, TaskResult, collect_applied};
use crate::config::extensions;
use crate::error::StepError;
use crate::resources::vscode_extension::{VsCodeExtensionResource, find_code_command};

/// Install VS Code extensions.
#[derive(Debug)]
pub struct InstallVsCodeExtensions;

impl Task for InstallVsCodeExtensions {
    fn name(&self) -> &'static str {
        "VS Code extensions"
    }

    fn policy(&self) -> FailurePolicy {
        FailurePolicy::Warn
    }

    fn remedy(&self) -> &'static str {
        "Install the 'code' command, then re-run provision."
    }

    fn check(&self, ctx: &Context) -> Result<Precondition> {
        if find_code_command(&*ctx.executor).is_none() {
            return Ok(Precondition::Blocked(
                "'code' not on PATH; in VS Code run \"Shell Command: Install 'code' command in PATH\""
                    .to_string(),
            ));
        }
        let list = &ctx.config.extensions;
        if !list.exists() {
            return Ok(Precondition::Blocked(format!(
                "extension list not found at {}",
                list.display()
            )));
        }
        Ok(Precondition::Unsatisfied)
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(cmd) = find_code_command(&*ctx.executor) else {
            return Err(StepError::ToolNotResolved {
                tool: "code".to_string(),
            }
            .into());
        };
        let list = extensions::load(&ctx.config.extensions)?;
        ctx.log
            .debug(&format!("{} extensions listed", list.ids.len()));
        for rejected in &list.rejected {
            ctx.log.warn(&format!("skip {}", rejected.reason));
        }

        let mut stats = collect_applied(
            ctx,
            list.ids.iter().map(|id| {
                VsCodeExtensionResource::new(
                    id.as_str().to_string(),
                    cmd.clone(),
                    Arc::clone(&ctx.executor),
                )
            }),
            &ProcessOpts::install_missing("install extension"),
        )?;
        stats.skipped += u32::try_from(list.rejected.len()).unwrap_or(u32::MAX);
        Ok(stats.finish(ctx))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::ContextBuilder;

    fn repo_with_list(content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("vscode")).unwrap();
        std::fs::write(dir.path().join("vscode/extensions.txt"), content).unwrap();
        dir
    }

    #[test]
    fn missing_code_is_blocked_with_instructions() {
        let dir = repo_with_list("golang.go\n");
        let ctx = ContextBuilder::new().root(dir.path()).build();
        let Precondition::Blocked(reason) = InstallVsCodeExtensions.check(&ctx).unwrap() else {
            panic!("expected Blocked");
        };
        assert!(reason.contains("Shell Command: Install 'code' command in PATH"));
    }

    #[test]
    fn missing_list_is_blocked() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ContextBuilder::new()
            .root(dir.path())
            .executor(MockExecutor::new().with_program("code"))
            .build();
        assert!(matches!(
            InstallVsCodeExtensions.check(&ctx).unwrap(),
            Precondition::Blocked(_)
        ));
    }

    #[test]
    fn ready_when_code_and_list_present() {
        let dir = repo_with_list("golang.go\n");
        let ctx = ContextBuilder::new()
            .root(dir.path())
            .executor(MockExecutor::new().with_program("code"))
            .build();
        assert_eq!(
            InstallVsCodeExtensions.check(&ctx).unwrap(),
            Precondition::Unsatisfied
        );
    }

    #[test]
    fn every_extension_is_attempted_despite_failure() {
        let dir = repo_with_list("# editors\ngolang.go\nbad.ext\n\nrust-lang.rust-analyzer\n");
        let exec = Arc::new(
            MockExecutor::new()
                .with_program("code")
                .fail_on("code --install-extension bad.ext"),
        );
        let ctx = ContextBuilder::new()
            .root(dir.path())
            .shared_executor(&exec)
            .build();
        assert_eq!(
            InstallVsCodeExtensions.run(&ctx).unwrap(),
            TaskResult::Warned("1 failed".to_string())
        );
        assert_eq!(
            exec.calls(),
            vec![
                "code --install-extension golang.go",
                "code --install-extension bad.ext",
                "code --install-extension rust-lang.rust-analyzer",
            ]
        );
    }

    #[test]
    fn invalid_line_is_skipped_and_the_rest_installed() {
        let dir = repo_with_list("golang.go\nnot-an-id\nms-vscode.cpptools@1.17.5\nrust-lang.rust-analyzer\n");
        let exec = Arc::new(MockExecutor::new().with_program("code"));
        let ctx = ContextBuilder::new()
            .root(dir.path())
            .shared_executor(&exec)
            .build();
        assert_eq!(InstallVsCodeExtensions.run(&ctx).unwrap(), TaskResult::Ok);
        assert_eq!(
            exec.calls(),
            vec![
                "code --install-extension golang.go",
                "code --install-extension ms-vscode.cpptools@1.17.5",
                "code --install-extension rust-lang.rust-analyzer",
            ]
        );
    }

    #[test]
    fn dry_run_installs_nothing() {
        let dir = repo_with_list("golang.go\n");
        let exec = Arc::new(MockExecutor::new().with_program("code"));
        let ctx = ContextBuilder::new()
            .root(dir.path())
            .shared_executor(&exec)
            .dry_run(true)
            .build();
        assert_eq!(InstallVsCodeExtensions.run(&ctx).unwrap(), TaskResult::DryRun);
        assert_eq!(exec.call_count(), 0);
    }
}
