//! VS Code extension resource.
use std::sync::Arc;

use anyhow::Result;

use super::error::ResourceError;
use super::{Applicable, ResourceChange};
use crate::exec::Executor;

/// Name of the VS Code command-line launcher.
pub const CODE_COMMAND: &str = "code";

/// A VS Code extension installed with `code --install-extension`.
///
/// The installer is itself idempotent, so no installed-state query is made.
#[derive(Debug)]
pub struct VsCodeExtensionResource {
    /// Extension identifier (e.g. `esbenp.prettier-vscode`).
    pub id: String,
    /// VS Code CLI command to use.
    pub code_cmd: String,
    executor: Arc<dyn Executor>,
}

impl VsCodeExtensionResource {
    /// Create a new VS Code extension resource.
    #[must_use]
    pub fn new(id: String, code_cmd: String, executor: Arc<dyn Executor>) -> Self {
        Self {
            id,
            code_cmd,
            executor,
        }
    }
}

impl Applicable for VsCodeExtensionResource {
    fn description(&self) -> String {
        self.id.clone()
    }

    fn apply(&self) -> Result<ResourceChange> {
        let result = self
            .executor
            .run_unchecked(&self.code_cmd, &["--install-extension", &self.id])?;
        if result.success {
            Ok(ResourceChange::Applied)
        } else {
            Err(ResourceError::ExecutionFailed {
                program: self.code_cmd.clone(),
                exit_code: result.code.unwrap_or(-1),
                stderr: result.stderr.trim().to_string(),
            }
            .into())
        }
    }
}

/// Find the VS Code CLI command on `PATH`.
#[must_use]
pub fn find_code_command(executor: &dyn Executor) -> Option<String> {
    executor
        .which(CODE_COMMAND)
        .then(|| CODE_COMMAND.to_string())
}
