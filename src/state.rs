//! Persisted reconciler state.
//!
//! One JSON document per user records what the last run deployed: the
//! resolved source tree, the active theme (name plus a full snapshot), and
//! every target path currently under management. It is what makes repeated
//! installs idempotent and `clean` possible at all.
//!
//! Absence of the file is a fresh start, never an error; a file that exists
//! but does not parse is fatal — silently discarding it would orphan every
//! previously deployed target.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::Theme;
use crate::error::StateError;
use crate::paths;

/// Reconciler state, loaded once per invocation and persisted at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct State {
    /// Source tree used by the last install; fallback when none is given.
    pub source: String,
    /// Active theme name.
    pub theme: String,
    /// Full snapshot of the resolved active theme, for `query` without
    /// re-reading the config.
    pub active_theme: Option<Theme>,
    /// Target paths deployed by this tool and not yet removed by it.
    ///
    /// Unordered; duplicates are tolerated because removal is idempotent.
    pub managed_files: Vec<String>,
}

/// Resolve the state file location: `$DOTFILE_STATE_FILE` (itself subject to
/// `~`/env expansion) when set, else `<state home>/dotfiles/state.json`.
#[must_use]
pub fn state_file() -> PathBuf {
    if let Ok(override_path) = std::env::var("DOTFILE_STATE_FILE")
        && !override_path.is_empty()
    {
        return paths::resolve_path(&override_path);
    }
    state_home().join("dotfiles").join("state.json")
}

/// Platform state directory (`$XDG_STATE_HOME` on Linux), with a
/// `~/.local/state` fallback where the platform has no native notion.
fn state_home() -> PathBuf {
    dirs::state_dir().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".local")
            .join("state")
    })
}

/// Load state from `file`. An absent file yields the default empty state.
///
/// # Errors
///
/// Returns [`StateError`] when the file exists but cannot be read or parsed.
pub fn load(file: &Path) -> Result<State, StateError> {
    if !file.exists() {
        return Ok(State::default());
    }
    let data = std::fs::read_to_string(file).map_err(|source| StateError::Io {
        file: file.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| StateError::Parse {
        file: file.to_path_buf(),
        source,
    })
}

/// Persist `state` to `file`, creating parent directories first.
///
/// Serialization is deterministic: struct fields in declaration order,
/// maps in insertion order.
///
/// # Errors
///
/// Returns [`StateError`] when the directory cannot be created or the file
/// cannot be written.
pub fn save(file: &Path, state: &State) -> Result<(), StateError> {
    paths::ensure_parent_dir(file).map_err(|source| StateError::Io {
        file: file.to_path_buf(),
        source,
    })?;
    let data = serde_json::to_string_pretty(state).map_err(|source| StateError::Parse {
        file: file.to_path_buf(),
        source,
    })?;
    std::fs::write(file, data).map_err(|source| StateError::Io {
        file: file.to_path_buf(),
        source,
    })
}

/// Write the `source-dir` and `current-theme` companion files next to the
/// state file, for shell scripts that cannot parse JSON.
///
/// # Errors
///
/// Returns [`StateError`] on any write failure.
pub fn write_companions(state_file: &Path, source: &str, theme: &str) -> Result<(), StateError> {
    let dir = state_file.parent().unwrap_or_else(|| Path::new("."));
    for (name, content) in [("source-dir", source), ("current-theme", theme)] {
        let path = dir.join(name);
        std::fs::write(&path, content).map_err(|source| StateError::Io { file: path, source })?;
    }
    Ok(())
}
