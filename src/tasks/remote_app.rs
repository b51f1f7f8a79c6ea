use std::sync::Arc;

use anyhow::Result;

use super::{Context, FailurePolicy, Precondition, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::remote_app::RemoteAppResource;

/// Install the application distributed only as a downloadable archive.
#[derive(Debug)]
pub struct InstallRemoteApp;

fn resource(ctx: &Context) -> RemoteAppResource {
    RemoteAppResource::new(
        ctx.config.remote_app.clone(),
        ctx.applications_dir.clone(),
        Arc::clone(&ctx.fetcher),
        Arc::clone(&ctx.executor),
    )
}

impl Task for InstallRemoteApp {
    fn name(&self) -> &'static str {
        "Remote application"
    }

    fn policy(&self) -> FailurePolicy {
        FailurePolicy::Fatal
    }

    fn remedy(&self) -> &'static str {
        "Check the [remote_app] URL and archive layout in conf/provision.toml, then re-run provision."
    }

    fn check(&self, ctx: &Context) -> Result<Precondition> {
        let destination = resource(ctx).destination();
        if destination.exists() {
            return Ok(Precondition::Satisfied(format!(
                "{} already installed",
                destination.display()
            )));
        }
        Ok(Precondition::Unsatisfied)
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        process_resources(ctx, [resource(ctx)], &ProcessOpts::apply_all("install"))
    }
}
