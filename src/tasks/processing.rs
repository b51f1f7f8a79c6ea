use anyhow::Result;

use super::context::Context;
use crate::resources::{Applicable, Resource, ResourceChange, ResourceState};

/// Result of a single step action.
///
/// # Examples
///
/// ```
/// use mac_provision::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let skipped = TaskResult::Skipped("no preference bundles configured".into());
/// let warned = TaskResult::Warned("1 failed".into());
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// assert!(matches!(warned, TaskResult::Warned(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Step completed successfully.
    Ok,
    /// Step had nothing to do.
    Skipped(String),
    /// Step ran in dry-run mode.
    DryRun,
    /// Step completed but some items failed and were logged.
    Warned(String),
}

/// Counters for steps that process many items.
///
/// # Examples
///
/// ```
/// use mac_provision::tasks::TaskStats;
///
/// let mut stats = TaskStats::new();
/// stats.changed = 3;
/// stats.already_ok = 1;
///
/// assert_eq!(stats.summary(false), "3 changed, 1 already ok");
/// assert_eq!(stats.summary(true), "3 would change, 1 already ok");
/// ```
///
/// Skipped and failed items are only mentioned when present:
///
/// ```
/// use mac_provision::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 1, already_ok: 0, skipped: 2, failed: 1 };
/// assert_eq!(stats.summary(false), "1 changed, 0 already ok, 2 skipped, 1 failed");
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of items changed or applied.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
    /// Number of items skipped (e.g. source file absent).
    pub skipped: u32,
    /// Number of items whose action failed and was logged.
    pub failed: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 skipped").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        let mut out = format!("{} {verb}, {} already ok", self.changed, self.already_ok);
        if self.skipped > 0 {
            out.push_str(&format!(", {} skipped", self.skipped));
        }
        if self.failed > 0 {
            out.push_str(&format!(", {} failed", self.failed));
        }
        out
    }

    /// Log the summary and return the appropriate [`TaskResult`].
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        ctx.log.info(&self.summary(ctx.dry_run));
        if self.failed > 0 {
            TaskResult::Warned(format!("{} failed", self.failed))
        } else if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        }
    }
}

impl std::ops::AddAssign for TaskStats {
    fn add_assign(&mut self, other: Self) {
        self.changed += other.changed;
        self.already_ok += other.already_ok;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Configuration for the generic resource processing loop.
///
/// # Examples
///
/// ```
/// use mac_provision::tasks::ProcessOpts;
///
/// // Fix everything, bail on errors (strict):
/// let opts = ProcessOpts::apply_all("install");
/// assert!(opts.fix_incorrect && opts.fix_missing && opts.bail_on_error);
///
/// // Fix everything, warn on errors (lenient):
/// let opts = ProcessOpts::apply_all("copy").no_bail();
/// assert!(opts.fix_incorrect && opts.fix_missing && !opts.bail_on_error);
///
/// // Install only missing resources (lenient):
/// let opts = ProcessOpts::install_missing("install");
/// assert!(!opts.fix_incorrect && opts.fix_missing && !opts.bail_on_error);
/// ```
#[derive(Debug)]
pub struct ProcessOpts<'a> {
    /// Verb for log messages (e.g. "import", "copy", "install").
    pub verb: &'a str,
    /// Treat `Incorrect` as fixable (apply the change). If `false`, skip it.
    pub fix_incorrect: bool,
    /// Treat `Missing` as fixable (apply the change). If `false`, skip it.
    pub fix_missing: bool,
    /// Propagate errors from `apply()`. If `false`, warn and count as failed.
    pub bail_on_error: bool,
}

impl<'a> ProcessOpts<'a> {
    /// Fix both missing and incorrect resources, bailing on errors.
    #[must_use]
    pub const fn apply_all(verb: &'a str) -> Self {
        Self {
            verb,
            fix_incorrect: true,
            fix_missing: true,
            bail_on_error: true,
        }
    }

    /// Install only missing resources, warning on errors instead of bailing.
    #[must_use]
    pub const fn install_missing(verb: &'a str) -> Self {
        Self {
            verb,
            fix_incorrect: false,
            fix_missing: true,
            bail_on_error: false,
        }
    }

    /// Warn on errors instead of bailing.
    #[must_use]
    pub const fn no_bail(mut self) -> Self {
        self.bail_on_error = false;
        self
    }
}

/// Check each resource's state, apply as needed, and log the summary.
///
/// # Errors
///
/// Returns an error if a state check fails, or if an apply fails while
/// `opts.bail_on_error` is set.
pub fn process_resources<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    opts: &ProcessOpts,
) -> Result<TaskResult> {
    Ok(collect_resources(ctx, resources, opts)?.finish(ctx))
}

/// Like [`process_resources`] but returns the raw counters so the caller
/// can act on them before finishing.
///
/// # Errors
///
/// Same as [`process_resources`].
pub fn collect_resources<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    opts: &ProcessOpts,
) -> Result<TaskStats> {
    let mut stats = TaskStats::new();
    for resource in resources {
        let current = resource.current_state()?;
        stats += process_single(ctx, &resource, current, opts)?;
    }
    Ok(stats)
}

/// Apply every item unconditionally, for resources with no observable state.
///
/// # Errors
///
/// Returns an error if an apply fails while `opts.bail_on_error` is set.
pub fn apply_resources<A: Applicable>(
    ctx: &Context,
    items: impl IntoIterator<Item = A>,
    opts: &ProcessOpts,
) -> Result<TaskResult> {
    Ok(collect_applied(ctx, items, opts)?.finish(ctx))
}

/// Like [`apply_resources`] but returns the raw counters so the caller can
/// add its own before finishing.
///
/// # Errors
///
/// Same as [`apply_resources`].
pub fn collect_applied<A: Applicable>(
    ctx: &Context,
    items: impl IntoIterator<Item = A>,
    opts: &ProcessOpts,
) -> Result<TaskStats> {
    let mut stats = TaskStats::new();
    for item in items {
        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would {}: {}", opts.verb, item.description()));
            stats.changed += 1;
            continue;
        }
        stats += apply_resource(ctx, &item, opts)?;
    }
    Ok(stats)
}

/// Process a single resource given its current state, returning a stats delta.
fn process_single<R: Resource>(
    ctx: &Context,
    resource: &R,
    resource_state: ResourceState,
    opts: &ProcessOpts,
) -> Result<TaskStats> {
    let desc = resource.description();
    ctx.log
        .debug(&format!("{desc} state={resource_state:?}"));
    let mut delta = TaskStats::new();
    match resource_state {
        ResourceState::Correct => {
            ctx.log.debug(&format!("ok: {desc}"));
            delta.already_ok += 1;
        }
        ResourceState::Invalid { reason } => {
            ctx.log.warn(&format!("skip {desc}: {reason}"));
            delta.skipped += 1;
        }
        ResourceState::Missing if !opts.fix_missing => {
            delta.skipped += 1;
        }
        ResourceState::Incorrect { .. } if !opts.fix_incorrect => {
            ctx.log.debug(&format!("skipping {desc} (unexpected state)"));
            delta.skipped += 1;
        }
        resource_state @ (ResourceState::Missing | ResourceState::Incorrect { .. }) => {
            if ctx.dry_run {
                let msg = if let ResourceState::Incorrect { ref current } = resource_state {
                    format!("would {} {desc} (currently {current})", opts.verb)
                } else {
                    format!("would {}: {desc}", opts.verb)
                };
                ctx.log.dry_run(&msg);
                delta.changed += 1;
                return Ok(delta);
            }
            delta += apply_resource(ctx, resource, opts)?;
        }
    }
    Ok(delta)
}

/// Apply a single resource change, returning a stats delta.
fn apply_resource<A: Applicable + ?Sized>(
    ctx: &Context,
    resource: &A,
    opts: &ProcessOpts,
) -> Result<TaskStats> {
    let desc = resource.description();
    let mut delta = TaskStats::new();
    let change = match resource.apply() {
        Ok(change) => change,
        Err(e) => {
            if opts.bail_on_error {
                return Err(e);
            }
            ctx.log
                .warn(&format!("failed to {} {desc}: {e:#}", opts.verb));
            delta.failed += 1;
            return Ok(delta);
        }
    };

    match change {
        ResourceChange::Applied => {
            ctx.log.info(&format!("{}: {desc}", opts.verb));
            delta.changed += 1;
        }
        ResourceChange::AlreadyCorrect => {
            ctx.log.debug(&format!("ok: {desc}"));
            delta.already_ok += 1;
        }
        ResourceChange::Skipped { reason } => {
            ctx.log.warn(&format!("skip {desc}: {reason}"));
            delta.skipped += 1;
        }
    }
    Ok(delta)
}
