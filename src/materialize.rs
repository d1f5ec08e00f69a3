//! File materialization: copy, template-render, or symlink.
//!
//! The one rule that makes repeated installs cheap: an existing target stops
//! copy and template modes cold (deployed content is never refreshed in
//! place), while symlink mode always reconciles — a symlink has to be
//! *correct*, a copy only has to *exist*.

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{ConfigError, LinkError};
use crate::paths;

/// Materialization mode for a planned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Byte-for-byte copy.
    Copy,
    /// Symbolic link pointing at the source.
    Symlink,
    /// Template render of the source with the theme property map.
    ///
    /// Never selected on the command line; the plan forces it per file.
    Template,
}

impl Mode {
    /// Parse the user-facing mode string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMode`] naming the value for anything
    /// but `copy` or `symlink`.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "copy" => Ok(Self::Copy),
            "symlink" => Ok(Self::Symlink),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Copy => "copy",
            Self::Symlink => "symlink",
            Self::Template => "template",
        })
    }
}

/// Materialize `source` at `target`.
///
/// Dry-run touches nothing and always succeeds. Otherwise the parent
/// directory tree is created, then:
///
/// - **copy**/**template**: a pre-existing target (any type, dangling
///   symlinks included) is left untouched and reported as success;
/// - **symlink**: an existing correct link is a no-op, anything else at the
///   target is removed and replaced.
///
/// # Errors
///
/// Returns [`LinkError`] on filesystem failures or template parse/render
/// failures; both are fatal for the file.
pub fn link(
    source: &Path,
    target: &Path,
    dry_run: bool,
    mode: Mode,
    properties: &IndexMap<String, String>,
) -> Result<(), LinkError> {
    if dry_run {
        return Ok(());
    }

    paths::ensure_parent_dir(target).map_err(|e| io_error(target, e))?;

    if mode != Mode::Symlink && target.symlink_metadata().is_ok() {
        return Ok(());
    }

    match mode {
        Mode::Copy => copy_file(source, target),
        Mode::Template => render_template(source, target, properties),
        Mode::Symlink => create_or_update_symlink(source, target),
    }
}

fn io_error(target: &Path, source: std::io::Error) -> LinkError {
    LinkError::Io {
        target: target.to_path_buf(),
        source,
    }
}

fn copy_file(source: &Path, target: &Path) -> Result<(), LinkError> {
    std::fs::copy(source, target).map_err(|e| io_error(target, e))?;
    propagate_executable_bit(source, target)
}

fn render_template(
    source: &Path,
    target: &Path,
    properties: &IndexMap<String, String>,
) -> Result<(), LinkError> {
    let content = std::fs::read_to_string(source).map_err(|e| io_error(target, e))?;

    let mut context = tera::Context::new();
    for (key, value) in properties {
        context.insert(key, value);
    }

    let rendered =
        tera::Tera::one_off(&content, &context, false).map_err(|e| LinkError::Template {
            source_file: source.to_path_buf(),
            message: error_chain(&e),
        })?;

    std::fs::write(target, rendered).map_err(|e| io_error(target, e))?;
    propagate_executable_bit(source, target)
}

/// Flatten a tera error chain into one line; the top-level message alone
/// ("Failed to render ...") hides the actual diagnostic.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        current = cause.source();
    }
    message
}

fn create_or_update_symlink(source: &Path, target: &Path) -> Result<(), LinkError> {
    if let Ok(meta) = std::fs::symlink_metadata(target) {
        if meta.file_type().is_symlink() {
            if std::fs::read_link(target).is_ok_and(|existing| existing == source) {
                return Ok(());
            }
            std::fs::remove_file(target).map_err(|e| io_error(target, e))?;
        } else if meta.is_dir() {
            std::fs::remove_dir_all(target).map_err(|e| io_error(target, e))?;
        } else {
            std::fs::remove_file(target).map_err(|e| io_error(target, e))?;
        }
    }
    create_symlink(source, target)
}

#[cfg(unix)]
fn create_symlink(source: &Path, target: &Path) -> Result<(), LinkError> {
    std::os::unix::fs::symlink(source, target).map_err(|e| io_error(target, e))
}

#[cfg(windows)]
fn create_symlink(source: &Path, target: &Path) -> Result<(), LinkError> {
    let result = if source.is_dir() {
        std::os::windows::fs::symlink_dir(source, target)
    } else {
        std::os::windows::fs::symlink_file(source, target)
    };
    result.map_err(|e| io_error(target, e))
}

/// If the source carries the owner-execute bit, set it on the target too.
#[cfg(unix)]
fn propagate_executable_bit(source: &Path, target: &Path) -> Result<(), LinkError> {
    use std::os::unix::fs::PermissionsExt;

    let source_mode = std::fs::metadata(source)
        .map_err(|e| io_error(target, e))?
        .permissions()
        .mode();
    if source_mode & 0o100 == 0 {
        return Ok(());
    }

    let mut perms = std::fs::metadata(target)
        .map_err(|e| io_error(target, e))?
        .permissions();
    perms.set_mode(perms.mode() | 0o100);
    std::fs::set_permissions(target, perms).map_err(|e| io_error(target, e))
}

#[cfg(not(unix))]
fn propagate_executable_bit(_source: &Path, _target: &Path) -> Result<(), LinkError> {
    Ok(())
}
