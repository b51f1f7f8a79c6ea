use anyhow::Result;

use super::{Context, FailurePolicy, Precondition, ProcessOpts, Task, TaskResult, collect_resources};
use crate::resources::preference::{CacheFlush, PreferenceImportResource, flush_preference_cache};

/// Import saved application preference bundles.
#[derive(Debug)]
pub struct ImportPreferences;

impl Task for ImportPreferences {
    fn name(&self) -> &'static str {
        "Preference imports"
    }

    fn policy(&self) -> FailurePolicy {
        FailurePolicy::Warn
    }

    fn remedy(&self) -> &'static str {
        "Check the preference bundles under preferences/."
    }

    fn check(&self, ctx: &Context) -> Result<Precondition> {
        if ctx.config.preferences.is_empty() {
            return Ok(Precondition::Satisfied(
                "no preference bundles configured".to_string(),
            ));
        }
        Ok(Precondition::Unsatisfied)
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let stats = collect_resources(
            ctx,
            ctx.config.preferences.iter().map(|spec| {
                PreferenceImportResource::new(
                    spec.domain.clone(),
                    spec.source.clone(),
                    std::sync::Arc::clone(&ctx.executor),
                )
            }),
            &ProcessOpts::apply_all("import").no_bail(),
        )?;

        if stats.changed > 0 && !ctx.dry_run {
            match flush_preference_cache(&*ctx.executor) {
                CacheFlush::Requested => ctx.log.debug("preference cache flushed"),
                CacheFlush::Failed(reason) => ctx
                    .log
                    .debug(&format!("preference cache not flushed: {reason}")),
            }
        }
        Ok(stats.finish(ctx))
    }
}
