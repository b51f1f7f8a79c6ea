//! Typed parser for the Homebrew Bundle manifest (`Brewfile`).
//!
//! The pipeline hands the file to `brew bundle` as a whole; parsing only
//! gives an early, line-numbered diagnostic for lines that are not
//! declarations at all, and a summary for the log.
//!
//! ```text
//! tap  "homebrew/cask-fonts"
//! brew 'git'
//! cask "iterm2", greedy: true
//! mas  "Xcode", id: 497799835
//! cask_args appdir: "/Applications"
//! ```
//!
//! `tap`, `brew` and `cask` are recognised; any other keyword is carried as
//! [`EntryKind::Other`]. Names may use either quote style. Anything after the
//! name and a comma is kept verbatim as options. Blank lines and `#` comments
//! are ignored.
use std::fmt;
use std::path::Path;

use super::toml_loader::{display_name, read_required};
use crate::error::ConfigError;

/// Kind of a manifest declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Third-party formula repository.
    Tap,
    /// Command-line formula.
    Brew,
    /// GUI application.
    Cask,
    /// Any other Bundle keyword (`mas`, `vscode`, `cask_args`, ...).
    Other(String),
}

impl EntryKind {
    fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "tap" => Self::Tap,
            "brew" => Self::Brew,
            "cask" => Self::Cask,
            other => Self::Other(other.to_string()),
        }
    }

    const fn requires_name(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tap => write!(f, "tap"),
            Self::Brew => write!(f, "brew"),
            Self::Cask => write!(f, "cask"),
            Self::Other(keyword) => f.write_str(keyword),
        }
    }
}

/// A single manifest declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Declaration kind.
    pub kind: EntryKind,
    /// Quoted name, without the quotes. Empty for keyword-only settings
    /// such as `cask_args`.
    pub name: String,
    /// Arguments after the name (or after the keyword when there is no
    /// quoted name), verbatim.
    pub options: Option<String>,
}

/// Ordered list of manifest declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    /// Entries in file order.
    pub entries: Vec<ManifestEntry>,
}

impl PackageManifest {
    /// Number of entries of the given kind.
    #[must_use]
    pub fn count(&self, kind: &EntryKind) -> usize {
        self.entries.iter().filter(|e| &e.kind == kind).count()
    }

    /// Number of entries with a keyword other than `tap`/`brew`/`cask`.
    #[must_use]
    pub fn other_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.kind, EntryKind::Other(_)))
            .count()
    }

    /// One-line description such as `2 taps, 14 formulae, 9 casks, 1 other`.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = format!(
            "{} taps, {} formulae, {} casks",
            self.count(&EntryKind::Tap),
            self.count(&EntryKind::Brew),
            self.count(&EntryKind::Cask)
        );
        let other = self.other_count();
        if other > 0 {
            out.push_str(&format!(", {other} other"));
        }
        out
    }
}

/// Load and parse the Brewfile at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if the file is absent,
/// [`ConfigError::Io`] if it cannot be read, and [`ConfigError::Parse`] for
/// the first line that is not a declaration.
pub fn load(path: &Path) -> Result<PackageManifest, ConfigError> {
    let content = read_required(path)?;
    parse(&content, &display_name(path))
}

/// Parse Brewfile `content`; `file` is used in diagnostics.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for the first line that is not a
/// declaration.
pub fn parse(content: &str, file: &str) -> Result<PackageManifest, ConfigError> {
    let mut entries = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let entry = parse_line(line).map_err(|message| ConfigError::Parse {
            file: file.to_string(),
            line: idx + 1,
            message,
        })?;
        entries.push(entry);
    }
    Ok(PackageManifest { entries })
}

fn is_keyword_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn parse_line(line: &str) -> Result<ManifestEntry, String> {
    let end = line
        .find(|c: char| !is_keyword_char(c))
        .unwrap_or(line.len());
    let (keyword, rest) = line.split_at(end);
    if !keyword.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(format!("expected a declaration keyword, found '{line}'"));
    }
    let kind = EntryKind::from_keyword(keyword);
    let rest = rest.trim_start();

    let Some((quote, quoted)) = ['"', '\'']
        .into_iter()
        .find_map(|q| rest.strip_prefix(q).map(|r| (q, r)))
    else {
        if kind.requires_name() {
            return Err(format!("expected a quoted name after '{keyword}'"));
        }
        let args = strip_comment(rest);
        return Ok(ManifestEntry {
            kind,
            name: String::new(),
            options: (!args.is_empty()).then(|| args.to_string()),
        });
    };

    let Some((name, after)) = quoted.split_once(quote) else {
        return Err("unterminated quoted name".to_string());
    };
    if name.trim().is_empty() {
        return Err(format!("empty name in '{keyword}' declaration"));
    }

    let after = strip_comment(after);
    let options = if after.is_empty() {
        None
    } else if let Some(opts) = after.strip_prefix(',') {
        let opts = opts.trim();
        if opts.is_empty() {
            return Err("trailing comma without options".to_string());
        }
        Some(opts.to_string())
    } else {
        return Err(format!("unexpected text after name: '{after}'"));
    };

    Ok(ManifestEntry {
        kind,
        name: name.to_string(),
        options,
    })
}

/// Drop a trailing `# comment` that is not inside quotes.
fn strip_comment(text: &str) -> &str {
    let mut open: Option<char> = None;
    for (i, c) in text.char_indices() {
        match (open, c) {
            (None, '"' | '\'') => open = Some(c),
            (Some(q), _) if c == q => open = None,
            (None, '#') => return text.split_at(i).0.trim(),
            _ => {}
        }
    }
    text.trim()
}
