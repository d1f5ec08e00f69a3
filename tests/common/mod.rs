// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed source tree, target directory, and
// state file so each integration test can drive the reconciler through the
// public library API against an isolated environment.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use dotfiles_deploy::error::DeployError;
use dotfiles_deploy::exec::{CommandRunner, ExecResult};
use dotfiles_deploy::materialize::Mode;
use dotfiles_deploy::reconcile::{CleanReport, InstallOptions, InstallReport, Reconciler};
use dotfiles_deploy::state::{self, State};

/// A [`CommandRunner`] that accepts everything without spawning processes,
/// recording the commands it was asked to run.
#[derive(Debug, Default)]
pub struct NullRunner {
    calls: std::sync::Mutex<Vec<String>>,
}

impl NullRunner {
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl CommandRunner for NullRunner {
    fn run_shell(&self, command: &str) -> Result<ExecResult> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(command.to_string());
        Ok(ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success: true,
            code: Some(0),
        })
    }
}

/// An isolated deployment environment backed by a [`tempfile::TempDir`]:
/// a source tree at `src/`, a deploy target at `home/`, and a state file
/// under `state/`.
#[derive(Debug)]
pub struct TestRepo {
    tmp: tempfile::TempDir,
    pub runner: Arc<NullRunner>,
}

impl TestRepo {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(tmp.path().join("src")).expect("create source dir");
        std::fs::create_dir_all(tmp.path().join("home")).expect("create target dir");
        Self {
            tmp,
            runner: Arc::new(NullRunner::default()),
        }
    }

    /// Create a repo and write `dotfiles.yaml` in one go.
    pub fn with_config(yaml: &str) -> Self {
        let repo = Self::new();
        repo.write_config(yaml);
        repo
    }

    pub fn source(&self) -> PathBuf {
        self.tmp.path().join("src")
    }

    pub fn target(&self) -> PathBuf {
        self.tmp.path().join("home")
    }

    pub fn state_file(&self) -> PathBuf {
        self.tmp.path().join("state").join("state.json")
    }

    /// Write `dotfiles.yaml` into the source tree; `{target}` expands to the
    /// deploy target directory.
    pub fn write_config(&self, yaml: &str) {
        let rendered = yaml.replace("{target}", &self.target().to_string_lossy());
        std::fs::write(self.source().join("dotfiles.yaml"), rendered).expect("write config");
    }

    /// Write a file (with parents) into the source tree.
    pub fn write_source_file(&self, rel: &str, content: &str) {
        let path = self.source().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create source parents");
        }
        std::fs::write(path, content).expect("write source file");
    }

    fn reconciler(&self, dry_run: bool) -> Reconciler {
        Reconciler::new(
            self.state_file(),
            dry_run,
            Arc::clone(&self.runner) as Arc<dyn CommandRunner>,
        )
    }

    pub fn install(&self, mode: Mode, dry_run: bool) -> Result<InstallReport, DeployError> {
        self.install_with_theme(mode, dry_run, None)
    }

    pub fn install_with_theme(
        &self,
        mode: Mode,
        dry_run: bool,
        theme: Option<&str>,
    ) -> Result<InstallReport, DeployError> {
        self.reconciler(dry_run).install(&InstallOptions {
            source: Some(self.source()),
            mode,
            theme_override: theme.map(ToString::to_string),
        })
    }

    /// Install from an explicit source tree (for convergence tests that
    /// switch trees between runs).
    pub fn install_from(
        &self,
        source: PathBuf,
        mode: Mode,
    ) -> Result<InstallReport, DeployError> {
        self.reconciler(false).install(&InstallOptions {
            source: Some(source),
            mode,
            theme_override: None,
        })
    }

    pub fn clean(&self, dry_run: bool) -> Result<CleanReport, DeployError> {
        self.reconciler(dry_run).clean()
    }

    /// The persisted state, loaded fresh from disk.
    pub fn state(&self) -> State {
        state::load(&self.state_file()).expect("load state")
    }

    /// The persisted managed-file set, sorted for comparison.
    pub fn managed_files(&self) -> Vec<String> {
        let mut files = self.state().managed_files;
        files.sort();
        files
    }
}
