//! Path resolution utilities.
//!
//! Targets and shell commands in the configuration may reference the home
//! directory (`~`) and environment variables (`$VAR` / `${VAR}`); source
//! paths inside a directory spec are resolved relative to the source tree
//! unless rooted. All of that lives here so the rest of the engine only ever
//! sees absolute, expanded paths.

use std::path::{Path, PathBuf};

/// Expand a single leading `~` to the home directory, then expand all
/// environment-variable references.
///
/// Undefined variables expand to the empty string rather than failing, so a
/// target like `$XDG_CONFIG_HOME/foo` degrades predictably on a bare
/// environment.
#[must_use]
pub fn expand(input: &str) -> String {
    expand_with(input, |var| std::env::var(var).ok())
}

/// [`expand`] with an injectable variable lookup. Unit tests use this to
/// avoid mutating the process environment.
pub(crate) fn expand_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    shellexpand::full_with_context_no_errors(input, home_dir_string, |var| {
        Some(lookup(var).unwrap_or_default())
    })
    .into_owned()
}

/// Expand `input` (see [`expand`]) and return it as a path.
#[must_use]
pub fn resolve_path(input: &str) -> PathBuf {
    PathBuf::from(expand(input))
}

/// Resolve a directory-spec path against the source tree.
///
/// Rooted paths pass through unchanged; everything else is joined under
/// `source`. An empty path resolves to an empty (never-existing) path so the
/// caller falls through to the declared alternates.
#[must_use]
pub fn full_path(source: &Path, path: &str) -> PathBuf {
    if path.is_empty() {
        return PathBuf::new();
    }
    let candidate = Path::new(path);
    if candidate.has_root() {
        candidate.to_path_buf()
    } else {
        source.join(candidate)
    }
}

/// Pick the source directory for a directory spec: the primary `path` if it
/// exists on disk, else the first existing entry of `alternates`.
///
/// Returns `None` when nothing exists — a dotfiles tree legitimately omits
/// optional sections, so the caller skips the spec instead of failing.
#[must_use]
pub fn candidate_dir(source: &Path, primary: &str, alternates: &[String]) -> Option<PathBuf> {
    let first = full_path(source, primary);
    if first.exists() {
        return Some(first);
    }
    alternates
        .iter()
        .map(|alt| full_path(source, alt))
        .find(|p| p.exists())
}

/// Create the parent directory tree of `path` if it does not already exist.
///
/// # Errors
///
/// Returns an error if directory creation fails (e.g. permissions).
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Home directory as a string, for tilde expansion.
fn home_dir_string() -> Option<String> {
    dirs::home_dir().map(|p| p.to_string_lossy().into_owned())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn no_vars(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn expand_leading_tilde() {
        let home = dirs::home_dir().expect("home dir available in test env");
        let expanded = expand_with("~/dotfiles", no_vars);
        assert_eq!(PathBuf::from(expanded), home.join("dotfiles"));
    }

    #[test]
    fn expand_env_variable() {
        let expanded = expand_with("$CFG_DIR/alacritty", |var| {
            (var == "CFG_DIR").then(|| "/etc/cfg".to_string())
        });
        assert_eq!(expanded, "/etc/cfg/alacritty");
    }

    #[test]
    fn expand_undefined_variable_to_empty() {
        let expanded = expand_with("$DOES_NOT_EXIST/x", no_vars);
        assert_eq!(expanded, "/x");
    }

    #[test]
    fn expand_plain_path_unchanged() {
        assert_eq!(expand_with("/usr/share", no_vars), "/usr/share");
    }

    #[test]
    fn full_path_joins_relative() {
        assert_eq!(
            full_path(Path::new("/src"), "config/nvim"),
            PathBuf::from("/src/config/nvim")
        );
    }

    #[test]
    fn full_path_passes_rooted_through() {
        assert_eq!(
            full_path(Path::new("/src"), "/etc/skel"),
            PathBuf::from("/etc/skel")
        );
    }

    #[test]
    fn full_path_empty_never_exists() {
        let p = full_path(Path::new("/src"), "");
        assert!(!p.exists());
    }

    #[test]
    fn candidate_dir_prefers_primary() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("primary")).unwrap();
        std::fs::create_dir(dir.path().join("alt")).unwrap();

        let picked = candidate_dir(dir.path(), "primary", &["alt".to_string()]);
        assert_eq!(picked, Some(dir.path().join("primary")));
    }

    #[test]
    fn candidate_dir_falls_back_to_first_existing_alternate() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("second")).unwrap();

        let picked = candidate_dir(
            dir.path(),
            "missing",
            &["also-missing".to_string(), "second".to_string()],
        );
        assert_eq!(picked, Some(dir.path().join("second")));
    }

    #[test]
    fn candidate_dir_none_when_nothing_exists() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(candidate_dir(dir.path(), "a", &["b".to_string()]), None);
    }

    #[test]
    fn ensure_parent_dir_creates_tree() {
        let dir = tempfile::tempdir().unwrap();
        let deep = dir.path().join("a/b/c/file.txt");
        ensure_parent_dir(&deep).unwrap();
        assert!(dir.path().join("a/b/c").is_dir());
    }
}
