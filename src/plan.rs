//! Deployment plan construction.
//!
//! Turns the configuration plus the filesystem into an ordered list of
//! [`FileEntry`] triples (source, target, template flag). Directories are
//! processed in declaration order; within a directory the regular tree walk
//! comes first (in whatever order the filesystem yields), theme-variant
//! entries are appended after it, and rule filtering runs last over the
//! combined list.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::{Config, DirSpec, RuleContext, Theme, rules};
use crate::error::ConfigError;
use crate::paths;

/// One planned materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute source path.
    pub source: PathBuf,
    /// Absolute target path.
    pub target: PathBuf,
    /// Whether this file must be template-rendered rather than copied/linked.
    pub is_template: bool,
}

/// Build the full deployment plan across all directory specs.
///
/// # Errors
///
/// Returns [`ConfigError`] when a rule expression fails to evaluate; a
/// missing or unreadable source directory is not an error (the spec is
/// skipped with a log line).
pub fn build(
    config: &Config,
    source: &Path,
    active_theme: Option<&Theme>,
    ctx: &RuleContext,
) -> Result<Vec<FileEntry>, ConfigError> {
    let mut plan = Vec::new();

    for spec in &config.directories {
        let Some(dir) = paths::candidate_dir(source, &spec.path, &spec.paths) else {
            info!(path = %spec.path, "source directory does not exist, skipping");
            continue;
        };

        let files = match collect_files(&dir) {
            Ok(files) => files,
            Err(e) => {
                info!(dir = %dir.display(), error = %e, "cannot walk source directory, skipping");
                continue;
            }
        };

        let target_dir = paths::resolve_path(&spec.target);
        let mut entries = Vec::with_capacity(files.len() + spec.theme_files.len());

        for file in files {
            let Ok(rel) = file.strip_prefix(&dir).map(Path::to_path_buf) else {
                continue; // walk only yields paths under `dir`
            };
            let declared = Path::new(&spec.path).join(&rel);
            entries.push(FileEntry {
                source: file,
                target: target_dir.join(&rel),
                is_template: is_template_file(spec, &declared),
            });
        }

        for theme_file in &spec.theme_files {
            let Some(raw) = resolve_theme_source(&theme_file.sources, active_theme) else {
                continue;
            };
            let is_template = is_template_file(spec, Path::new(&raw));
            let src = if Path::new(&raw).has_root() {
                PathBuf::from(&raw)
            } else {
                dir.join(&raw)
            };
            entries.push(FileEntry {
                source: src,
                target: paths::resolve_path(&theme_file.target),
                is_template,
            });
        }

        for entry in entries {
            let file_str = entry.source.to_string_lossy();
            if rules::evaluate(&spec.rules, ctx, &file_str)? {
                plan.push(entry);
            } else {
                debug!(source = %file_str, "rejected by rules");
            }
        }
    }

    Ok(plan)
}

/// Literal membership check against the spec's `templateFiles` list.
fn is_template_file(spec: &DirSpec, candidate: &Path) -> bool {
    spec.template_files
        .iter()
        .any(|t| Path::new(t) == candidate)
}

/// Pick the source override for a theme-variant file: exact active theme
/// name, then exact color-scheme identifier, then the first declared entry.
/// `None` when nothing usable is declared.
fn resolve_theme_source(
    sources: &IndexMap<String, String>,
    theme: Option<&Theme>,
) -> Option<String> {
    if let Some(theme) = theme {
        for key in [&theme.name, &theme.color_scheme] {
            if !key.is_empty()
                && let Some(src) = sources.get(key)
                && !src.is_empty()
            {
                return Some(src.clone());
            }
        }
    }
    sources.values().find(|s| !s.is_empty()).cloned()
}

/// Recursively enumerate everything under `dir` that is not a directory.
fn collect_files(dir: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        files.push(entry.into_path());
    }
    Ok(files)
}
