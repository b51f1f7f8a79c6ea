use anyhow::Result;

use super::{Context, FailurePolicy, Precondition, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::config_file::ConfigFileResource;

/// Copy static configuration files to their fixed destinations.
#[derive(Debug)]
pub struct CopyConfigFiles;

impl Task for CopyConfigFiles {
    fn name(&self) -> &'static str {
        "Config files"
    }

    fn policy(&self) -> FailurePolicy {
        FailurePolicy::Warn
    }

    fn remedy(&self) -> &'static str {
        "Check the [[config_files]] entries in conf/provision.toml."
    }

    fn check(&self, ctx: &Context) -> Result<Precondition> {
        if ctx.config.config_files.is_empty() {
            return Ok(Precondition::Satisfied(
                "no config files configured".to_string(),
            ));
        }
        Ok(Precondition::Unsatisfied)
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        process_resources(
            ctx,
            ctx.config.config_files.iter().map(|file| {
                ConfigFileResource::new(file.source.clone(), file.destination_in(&ctx.home))
            }),
            &ProcessOpts::apply_all("copy").no_bail(),
        )
    }
}
