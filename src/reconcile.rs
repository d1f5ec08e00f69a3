//! The reconciler: load state → clean → plan → materialize → persist →
//! activate.
//!
//! Everything the run needs travels through an explicit [`Reconciler`] value
//! — state-file location, dry-run flag, command runner — so there are no
//! process-wide singletons and the whole pipeline is drivable from tests.
//!
//! State is loaded once, mutated in place, and persisted before the
//! invocation ends: on the success path persisting is mandatory (losing
//! track of managed files would orphan them), on the failure path it is
//! best-effort so that files deployed before the error are still recorded
//! for the next cleanup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::activate;
use crate::config::{Config, RuleContext, Theme, theme};
use crate::error::{ConfigError, DeployError, StateError};
use crate::exec::{CommandRunner, SystemRunner};
use crate::materialize::{self, Mode};
use crate::paths;
use crate::plan;
use crate::state::{self, State};

/// Options for one install run.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Source tree; falls back to the persisted one when absent.
    pub source: Option<PathBuf>,
    /// Materialization mode for non-template files.
    pub mode: Mode,
    /// Theme selection override (from `DOTFILE_THEME`); wins over state.
    pub theme_override: Option<String>,
}

/// Outcome of an install run.
#[derive(Debug, Clone)]
pub struct InstallReport {
    /// Files materialized (or, on dry-run, that would have been).
    pub deployed: usize,
    /// Activation commands that ran successfully.
    pub activated: usize,
    /// Name of the active theme, when one resolved.
    pub theme: Option<String>,
}

/// Outcome of a clean run.
#[derive(Debug, Clone)]
pub struct CleanReport {
    /// Files removed this run.
    pub removed: usize,
    /// Files still tracked: failed removals, or everything on dry-run.
    pub kept: usize,
}

/// Sequential, single-invocation reconciler.
pub struct Reconciler {
    state_file: PathBuf,
    dry_run: bool,
    runner: Arc<dyn CommandRunner>,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("state_file", &self.state_file)
            .field("dry_run", &self.dry_run)
            .field("runner", &"<dyn CommandRunner>")
            .finish()
    }
}

impl Reconciler {
    /// Create a reconciler with an injected command runner.
    #[must_use]
    pub fn new(state_file: PathBuf, dry_run: bool, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            state_file,
            dry_run,
            runner,
        }
    }

    /// Create a reconciler backed by the real system shell.
    #[must_use]
    pub fn with_system_runner(state_file: PathBuf, dry_run: bool) -> Self {
        Self::new(state_file, dry_run, Arc::new(SystemRunner))
    }

    /// Install: remove the previous deployment, materialize the new plan,
    /// persist state, activate the theme.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError`] on configuration, state, or materialization
    /// failures. File-removal failures during the cleanup phase and
    /// activation failures are logged, never returned.
    pub fn install(&self, opts: &InstallOptions) -> Result<InstallReport, DeployError> {
        let mut state = self.load_state()?;

        let source = match &opts.source {
            Some(dir) => dir.clone(),
            None if !state.source.is_empty() => PathBuf::from(&state.source),
            None => return Err(ConfigError::NoSourceDirectory.into()),
        };
        let source = std::path::absolute(&source).map_err(|e| ConfigError::Io {
            file: source.clone(),
            source: e,
        })?;
        let previous_theme = state.theme.clone();
        state.source = source.to_string_lossy().into_owned();

        let theme_name = match &opts.theme_override {
            Some(name) if !name.is_empty() => {
                state.theme.clone_from(name);
                name.clone()
            }
            _ => state.theme.clone(),
        };

        let config = Config::load(&source.join("dotfiles.yaml"))?;
        let active_theme = config.get_theme(&theme_name).cloned();
        state.active_theme = active_theme.clone();

        info!(
            dry_run = self.dry_run,
            mode = %opts.mode,
            source = %source.display(),
            theme = %theme_name,
            "installing dotfiles"
        );

        let deploy_result = self.deploy(&mut state, &config, &source, active_theme.as_ref(), opts);

        if self.dry_run {
            debug!("dry-run: state not persisted");
        } else {
            match &deploy_result {
                Ok(_) => {
                    state::save(&self.state_file, &state)?;
                    state::write_companions(&self.state_file, &state.source, &state.theme)?;
                }
                Err(_) => {
                    // Best-effort: files deployed before the failure must
                    // still be tracked for the next cleanup.
                    if let Err(e) = state::save(&self.state_file, &state) {
                        warn!(error = %e, "failed to persist state after aborted run");
                    }
                }
            }
        }

        let deployed = deploy_result?;

        let mut activated = 0;
        if let Some(active) = &active_theme
            && !self.dry_run
        {
            let mut commands = config.activation_commands.clone();
            commands.extend(active.commands.iter().cloned());
            let theme_changed = previous_theme != state.theme;
            activated = activate::run_commands(&commands, theme_changed, self.runner.as_ref());
        }

        Ok(InstallReport {
            deployed,
            activated,
            theme: active_theme.map(|t| t.name),
        })
    }

    /// Remove everything from the previous run, then materialize the new
    /// plan, appending each successful target to the managed set as it
    /// lands.
    fn deploy(
        &self,
        state: &mut State,
        config: &Config,
        source: &Path,
        active_theme: Option<&Theme>,
        opts: &InstallOptions,
    ) -> Result<usize, DeployError> {
        state.managed_files = remove_managed_files(&state.managed_files, self.dry_run);

        let active_name = active_theme.map(|t| t.name.as_str()).unwrap_or_default();
        let ctx = RuleContext::detect(active_name);
        let entries = plan::build(config, source, active_theme, &ctx)?;

        let properties =
            active_theme.map_or_else(theme::empty_template_properties, Theme::template_properties);

        let mut deployed = 0;
        for entry in &entries {
            let mode = if entry.is_template {
                Mode::Template
            } else {
                opts.mode
            };
            materialize::link(&entry.source, &entry.target, self.dry_run, mode, &properties)?;
            trace!(
                source = %entry.source.display(),
                target = %entry.target.display(),
                %mode,
                "processed file"
            );
            state
                .managed_files
                .push(entry.target.to_string_lossy().into_owned());
            deployed += 1;
        }
        Ok(deployed)
    }

    /// Clean: remove every managed file, persist the surviving set.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError`] only for state load/save failures; removal
    /// failures are collected and retried on the next run.
    pub fn clean(&self) -> Result<CleanReport, DeployError> {
        let mut state = self.load_state()?;

        let before = state.managed_files.len();
        state.managed_files = remove_managed_files(&state.managed_files, self.dry_run);
        let kept = state.managed_files.len();

        if !self.dry_run {
            state::save(&self.state_file, &state)?;
        }

        Ok(CleanReport {
            removed: before - kept,
            kept,
        })
    }

    fn load_state(&self) -> Result<State, DeployError> {
        paths::ensure_parent_dir(&self.state_file).map_err(|e| StateError::Io {
            file: self.state_file.clone(),
            source: e,
        })?;
        Ok(state::load(&self.state_file)?)
    }
}

/// Delete the given managed paths, returning the ones still tracked
/// afterwards: failed removals — or all of them on dry-run, which removes
/// nothing but must still report what it would do.
///
/// Already-absent paths count as cleaned; duplicate entries therefore cost
/// nothing beyond a second look.
fn remove_managed_files(files: &[String], dry_run: bool) -> Vec<String> {
    let mut kept = Vec::new();

    for file in files {
        debug!(%file, "removing file");

        if dry_run {
            info!(%file, "would remove");
            kept.push(file.clone());
            continue;
        }

        let path = Path::new(file);
        // symlink_metadata so dangling managed symlinks are still removed.
        if path.symlink_metadata().is_err() {
            trace!(%file, "already absent");
            continue;
        }

        if let Err(e) = std::fs::remove_file(path) {
            warn!(%file, error = %e, "failed to remove file");
            kept.push(file.clone());
        }
    }

    kept
}
