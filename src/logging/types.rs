//! Core logging types: step entries, status, and the [`Log`] trait.

/// Step execution result for summary reporting.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Human-readable step name.
    pub name: String,
    /// Final status of the step.
    pub status: TaskStatus,
    /// Optional detail message (e.g. skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Step performed its action successfully.
    Ok,
    /// Step was already satisfied, or had nothing to do.
    Skipped,
    /// Step failed under a warn-and-continue policy.
    Warned,
    /// Step ran in dry-run mode; no changes were applied.
    DryRun,
    /// Step failed under a fatal policy and aborted the run.
    Failed,
}

impl TaskStatus {
    /// Summary glyph and its ANSI colour.
    #[must_use]
    pub const fn marker(self) -> (&'static str, &'static str) {
        match self {
            Self::Ok => ("✓", "\x1b[32m"),
            Self::Skipped => ("○", "\x1b[2m"),
            Self::Warned => ("!", "\x1b[33m"),
            Self::DryRun => ("~", "\x1b[37m"),
            Self::Failed => ("✗", "\x1b[31m"),
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Ok => 0,
            Self::Skipped => 1,
            Self::Warned => 2,
            Self::DryRun => 3,
            Self::Failed => 4,
        }
    }
}

/// Per-status step counts for the end-of-run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally([usize; 5]);

impl Tally {
    /// Count `entries` by status.
    #[must_use]
    pub fn of(entries: &[TaskEntry]) -> Self {
        let mut tally = Self::default();
        for entry in entries {
            if let Some(n) = tally.0.get_mut(entry.status.slot()) {
                *n += 1;
            }
        }
        tally
    }

    /// Number of steps recorded with `status`.
    #[must_use]
    pub fn get(&self, status: TaskStatus) -> usize {
        self.0.get(status.slot()).copied().unwrap_or(0)
    }

    /// Number of steps recorded.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

/// Abstraction over logging backends.
///
/// Step code logs through this trait so that tests can swap in a logger that
/// is not bound to the global subscriber.
pub trait Log: Send + Sync {
    /// Log a stage header (one per pipeline step).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (suppressed on console unless verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a step result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
