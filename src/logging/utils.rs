//! Log file location and ANSI stripping.
use std::path::{Path, PathBuf};

/// Subdirectory of `~/Library/Logs` holding the run log.
const LOG_SUBDIR: &str = "Library/Logs/provision";

/// Remove ANSI escape sequences from `s`.
///
/// Only CSI sequences (`ESC [ ... final`) are recognised; a bare `ESC` and
/// the byte after it are dropped.
pub(super) fn strip_ansi(s: &str) -> String {
    enum State {
        Text,
        Escape,
        Csi,
    }

    let mut state = State::Text;
    s.chars()
        .filter(|&c| match state {
            State::Text if c == '\x1b' => {
                state = State::Escape;
                false
            }
            State::Text => true,
            State::Escape => {
                state = if c == '[' { State::Csi } else { State::Text };
                false
            }
            State::Csi => {
                if ('@'..='~').contains(&c) {
                    state = State::Text;
                }
                false
            }
        })
        .collect()
}

/// The run log for `command` under `home`, e.g.
/// `~/Library/Logs/provision/provision.log`.
pub(super) fn log_file_in(home: &Path, command: &str) -> PathBuf {
    home.join(LOG_SUBDIR).join(format!("{command}.log"))
}

/// The run log for `command` under `$HOME`, creating its directory.
///
/// Returns `None` when `HOME` is unset or the directory cannot be created.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from)?;
    let path = log_file_in(&home, command);
    std::fs::create_dir_all(path.parent()?).ok()?;
    Some(path)
}
