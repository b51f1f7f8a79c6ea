//! Top-level orchestration: the pipeline loop and the `provision` entry point.
pub mod provision;

use crate::error::PipelineError;
use crate::logging::Logger;
use crate::tasks::{self, Context, Task};

/// Execute `steps` in order, stopping at the first fatal failure, then print
/// the summary.
///
/// # Errors
///
/// Returns the [`PipelineError`] of the step that aborted the run.
pub fn run_pipeline(steps: &[&dyn Task], ctx: &Context, log: &Logger) -> Result<(), PipelineError> {
    let total = steps.len();
    let result = steps
        .iter()
        .enumerate()
        .try_for_each(|(i, step)| tasks::execute(*step, i + 1, total, ctx));

    log.print_summary();
    result
}

/// Select the steps to run according to `--skip` / `--only`.
///
/// Filters match as case-insensitive substrings of the step name. The
/// relative order of the selected steps is unchanged.
#[must_use]
pub fn select_steps<'a>(
    steps: &'a [Box<dyn Task>],
    skip: &[String],
    only: &[String],
) -> Vec<&'a dyn Task> {
    let matches = |name: &str, filters: &[String]| {
        filters
            .iter()
            .any(|f| name.contains(&f.to_lowercase()))
    };
    steps
        .iter()
        .filter(|t| {
            let name = t.name().to_lowercase();
            if !only.is_empty() {
                return matches(&name, only);
            }
            !matches(&name, skip)
        })
        .map(AsRef::as_ref)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tasks::all_steps;

    fn names(steps: &[&dyn Task]) -> Vec<&'static str> {
        steps.iter().map(|t| t.name()).collect()
    }

    #[test]
    fn no_filter_keeps_all_in_order() {
        let steps = all_steps();
        let selected = select_steps(&steps, &[], &[]);
        assert_eq!(selected.len(), steps.len());
        assert_eq!(names(&selected)[0], "Xcode Command Line Tools");
    }

    #[test]
    fn skip_is_case_insensitive() {
        let steps = all_steps();
        let selected = select_steps(&steps, &["VS CODE".to_string(), "homebrew".to_string()], &[]);
        assert!(!names(&selected).contains(&"VS Code extensions"));
        assert!(!names(&selected).contains(&"Homebrew"));
        assert_eq!(selected.len(), steps.len() - 2);
    }

    #[test]
    fn only_selects_matching() {
        let steps = all_steps();
        let selected = select_steps(&steps, &[], &["config".to_string()]);
        assert_eq!(names(&selected), vec!["Config files"]);
    }

    #[test]
    fn only_with_no_match_selects_nothing() {
        let steps = all_steps();
        assert!(select_steps(&steps, &[], &["nope".to_string()]).is_empty());
    }
}
