//! Configuration model and loading.
//!
//! The whole deployment is driven by one YAML file, `dotfiles.yaml`, at the
//! root of the source tree. It declares rule-governed directories to deploy,
//! selectable themes, and activation commands, and may pull in further files
//! via `includes` (merged by concatenation, resolved relative to the
//! including file).

pub mod rules;
pub mod theme;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use indexmap::IndexMap;
pub use rules::{Rule, RuleContext};
pub use theme::Theme;

/// An activation command, global or theme-scoped.
///
/// Commands run through the shell after a successful deployment. `condition`
/// gates on an expression over environment variables; `on_change` restricts
/// the command to runs where the active theme actually changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivationCommand {
    /// Shell text to execute (may reference `~` and env vars).
    pub command: String,
    /// Only run when the active theme differs from the previous run.
    pub on_change: bool,
    /// Optional boolean expression over environment variables.
    pub condition: Option<String>,
}

/// A theme-variant file: one target served by per-theme source overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeFile {
    /// Target path (may use `~`/env placeholders).
    pub target: String,
    /// Theme identifier (name or color scheme) → source override.
    ///
    /// Declaration order is preserved; the first entry doubles as the
    /// last-resort default when no identifier matches.
    pub sources: IndexMap<String, String>,
}

/// A directory of files to deploy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirSpec {
    /// Primary source directory, relative to the source tree.
    pub path: String,
    /// Ordered alternate source directories; the first that exists wins.
    pub paths: Vec<String>,
    /// Target directory (may use `~`/env placeholders).
    pub target: String,
    /// Rules gating each file in this directory; empty means always deploy.
    pub rules: Vec<Rule>,
    /// Files (as `path`-relative paths joined onto the declared `path`)
    /// forced into template mode.
    pub template_files: Vec<String>,
    /// Theme-variant files, appended after the directory walk.
    pub theme_files: Vec<ThemeFile>,
}

/// Root configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Directories to deploy, in declaration order.
    pub directories: Vec<DirSpec>,
    /// Selectable themes.
    pub themes: Vec<Theme>,
    /// Global activation commands, run before the active theme's own.
    pub activation_commands: Vec<ActivationCommand>,
    /// Further config files to merge, relative to this file.
    pub includes: Vec<String>,
}

impl Config {
    /// Load a configuration file, recursively merging its `includes`.
    ///
    /// A missing root file is an error; missing included files are skipped,
    /// matching a source tree that only carries some optional sections.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a file cannot be read or parsed.
    pub fn load(file: &Path) -> Result<Self, ConfigError> {
        Self::load_inner(file, true)
    }

    fn load_inner(file: &Path, required: bool) -> Result<Self, ConfigError> {
        if !file.exists() {
            if required {
                return Err(ConfigError::Io {
                    file: file.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "config file not found",
                    ),
                });
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(file).map_err(|source| ConfigError::Io {
            file: file.to_path_buf(),
            source,
        })?;
        let mut config: Self =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                file: file.to_path_buf(),
                source,
            })?;

        let base_dir = file.parent().map_or_else(PathBuf::new, Path::to_path_buf);
        for include in std::mem::take(&mut config.includes) {
            let include_path = if Path::new(&include).has_root() {
                PathBuf::from(&include)
            } else {
                base_dir.join(&include)
            };
            debug!(file = %include_path.display(), "including config file");
            let included = Self::load_inner(&include_path, false)?;
            config.merge(included);
        }

        Ok(config)
    }

    /// Concatenate another document onto this one.
    fn merge(&mut self, other: Self) {
        self.directories.extend(other.directories);
        self.themes.extend(other.themes);
        self.activation_commands.extend(other.activation_commands);
    }

    /// Look up a theme by exact name.
    #[must_use]
    pub fn get_theme(&self, name: &str) -> Option<&Theme> {
        if name.is_empty() {
            return None;
        }
        self.themes.iter().find(|t| t.name == name)
    }
}
