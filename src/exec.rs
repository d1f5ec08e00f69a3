//! Shell command execution behind an injectable seam.
//!
//! Theme activation runs user-supplied shell strings. The engine only ever
//! talks to the [`CommandRunner`] trait so the reconciler core stays testable
//! without spawning real processes; [`SystemRunner`] is the one production
//! implementation.

use std::process::{Command, Output};

use anyhow::{Context as _, Result};

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Raw exit code, when the process exited normally.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Capability to run a shell command string.
///
/// One method on purpose: activation commands are opaque shell text, and the
/// reconciler needs nothing richer than "ran, succeeded or not".
pub trait CommandRunner: Send + Sync {
    /// Run `command` through the platform shell and return its result.
    ///
    /// A non-zero exit is *not* an `Err` — callers decide whether failure
    /// matters. `Err` means the shell itself could not be spawned.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell process could not be started.
    fn run_shell(&self, command: &str) -> Result<ExecResult>;
}

/// [`CommandRunner`] backed by the real system shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run_shell(&self, command: &str) -> Result<ExecResult> {
        #[cfg(windows)]
        let output = Command::new("cmd").args(["/C", command]).output();
        #[cfg(not(windows))]
        let output = Command::new("sh").args(["-c", command]).output();

        let output = output.with_context(|| format!("failed to spawn shell for: {command}"))?;
        Ok(ExecResult::from(output))
    }
}
