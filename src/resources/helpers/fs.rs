//! File-system resource helpers.
use anyhow::{Context as _, Result};
use sha2::{Digest as _, Sha256};
use std::io;
use std::path::{Path, PathBuf};

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Breadth-first search for an entry named `name` under `root`.
///
/// `root` itself is depth 0; its children are depth 1. Entries deeper than
/// `max_depth` are not visited, and matched bundles are not descended into.
/// Symlinked directories are not followed.
///
/// # Errors
///
/// Returns an error if a directory within the search range cannot be read.
pub fn find_entry(root: &Path, name: &str, max_depth: usize) -> Result<Option<PathBuf>> {
    let mut level = vec![root.to_path_buf()];
    for _depth in 1..=max_depth {
        let mut next = Vec::new();
        for dir in level {
            let mut entries = std::fs::read_dir(&dir)
                .with_context(|| format!("reading directory {}", dir.display()))?
                .collect::<io::Result<Vec<_>>>()
                .with_context(|| format!("reading entry in {}", dir.display()))?;
            entries.sort_by_key(std::fs::DirEntry::file_name);
            for entry in entries {
                if entry.file_name() == name {
                    return Ok(Some(entry.path()));
                }
                if entry.file_type().is_ok_and(|t| t.is_dir()) {
                    next.push(entry.path());
                }
            }
        }
        if next.is_empty() {
            break;
        }
        level = next;
    }
    Ok(None)
}

/// Lowercase hex SHA-256 of the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).with_context(|| format!("hashing {}", path.display()))?;
    Ok(hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect())
}
