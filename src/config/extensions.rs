//! VS Code extension list: one `publisher.name[@version]` identifier per line.
//!
//! Lines are validated one at a time. A line that is not an identifier is
//! reported alongside the valid ones rather than failing the whole list.
use std::fmt;
use std::path::Path;

use super::toml_loader::{display_name, read_required};
use crate::error::ConfigError;

/// A validated marketplace identifier (e.g. `esbenp.prettier-vscode`), with
/// an optional pinned version (`ms-vscode.cpptools@1.17.5`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionId(String);

fn is_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl ExtensionId {
    /// Validate `raw` as `publisher.name` or `publisher.name@version`.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if `raw` is not exactly two
    /// non-empty segments of ASCII letters, digits, `-` or `_` joined by a
    /// dot, optionally followed by `@` and a non-empty version made of
    /// letters, digits, `.`, `-` or `+`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let (id, version) = match raw.split_once('@') {
            Some((id, version)) => (id, Some(version)),
            None => (raw, None),
        };
        let Some((publisher, name)) = id.split_once('.') else {
            return Err(format!("'{raw}' is not in publisher.name form"));
        };
        for (label, part) in [("publisher", publisher), ("name", name)] {
            if part.is_empty() {
                return Err(format!("'{raw}' has an empty {label}"));
            }
            if let Some(bad) = part.chars().find(|&c| !is_segment_char(c)) {
                return Err(format!("'{raw}' contains invalid character '{bad}'"));
            }
        }
        if let Some(version) = version {
            if version.is_empty() {
                return Err(format!("'{raw}' has an empty version"));
            }
            if let Some(bad) = version
                .chars()
                .find(|&c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+')))
            {
                return Err(format!("'{raw}' has invalid character '{bad}' in its version"));
            }
        }
        Ok(Self(raw.to_string()))
    }

    /// The identifier as passed to `code --install-extension`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A list line that is not a valid identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number.
    pub line: usize,
    /// What is wrong with it.
    pub reason: String,
}

/// Parsed extension list: valid identifiers and rejected lines, each in
/// file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionList {
    /// Identifiers to install.
    pub ids: Vec<ExtensionId>,
    /// Lines that could not be used.
    pub rejected: Vec<RejectedLine>,
}

/// Load and parse the extension list at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if the file is absent and
/// [`ConfigError::Io`] if it cannot be read. Invalid lines are not errors;
/// they are returned in [`ExtensionList::rejected`].
pub fn load(path: &Path) -> Result<ExtensionList, ConfigError> {
    let content = read_required(path)?;
    Ok(parse(&content, &display_name(path)))
}

/// Parse extension list `content`; `file` prefixes rejection reasons.
#[must_use]
pub fn parse(content: &str, file: &str) -> ExtensionList {
    let mut list = ExtensionList::default();
    let lines = content
        .lines()
        .enumerate()
        .map(|(idx, raw)| (idx + 1, raw.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));
    for (line, text) in lines {
        match ExtensionId::parse(text) {
            Ok(id) => list.ids.push(id),
            Err(message) => list.rejected.push(RejectedLine {
                line,
                reason: format!("{file}:{line}: {message}"),
            }),
        }
    }
    list
}
