//! Domain-specific error types for the deployment engine.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors (e.g., [`ConfigError`],
//! [`StateError`], [`LinkError`]) while command handlers at the CLI boundary
//! convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DeployError
//! ├── Config(ConfigError) — YAML parsing, rule expressions, source resolution
//! ├── State(StateError)   — state file load/save
//! └── Link(LinkError)     — per-file materialization failures
//! ```
//!
//! The three branches correspond to the three ways a run can abort: before
//! anything was mutated (config), while tracking what was mutated (state),
//! and while mutating (link).

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the deployment engine.
///
/// Aggregates domain-specific sub-errors and is convertible to
/// [`anyhow::Error`] for use at CLI command boundaries.
#[derive(Error, Debug)]
pub enum DeployError {
    /// Configuration-related error (parsing, rule evaluation, missing source).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// State persistence error (corrupt state file, failed save).
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// Materialization error (copy, template render, symlink).
    #[error("Link error: {0}")]
    Link(#[from] LinkError),
}

/// Errors that arise from configuration loading and rule evaluation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The YAML config file could not be parsed.
    #[error("Invalid YAML in {file}: {source}")]
    Parse {
        /// Path of the file that failed to parse.
        file: PathBuf,
        /// Underlying deserialization error.
        source: serde_yaml::Error,
    },

    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {file}: {source}")]
    Io {
        /// Path of the file that could not be read.
        file: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A rule expression failed to evaluate (syntax or type error).
    #[error("Failed to evaluate rule '{rule}': {message}")]
    Rule {
        /// The offending expression text.
        rule: String,
        /// Evaluator diagnostic.
        message: String,
    },

    /// The materialization mode string is not one of the valid values.
    #[error("Invalid mode '{0}' (valid values: copy, symlink)")]
    InvalidMode(String),

    /// No source directory was given and none is recorded in state.
    #[error("No source directory: provide one as the first argument")]
    NoSourceDirectory,
}

/// Errors that arise from state file load/save.
#[derive(Error, Debug)]
pub enum StateError {
    /// The state file exists but is not valid JSON for the state schema.
    #[error("Corrupt state file {file}: {source}")]
    Parse {
        /// Path of the state file.
        file: PathBuf,
        /// Underlying deserialization error.
        source: serde_json::Error,
    },

    /// An I/O error occurred while reading or writing state.
    #[error("IO error on state file {file}: {source}")]
    Io {
        /// Path of the state file (or companion file).
        file: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise while materializing a single planned file.
#[derive(Error, Debug)]
pub enum LinkError {
    /// A filesystem operation on the target failed.
    #[error("Failed to materialize {target}: {source}")]
    Io {
        /// Target path being produced.
        target: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The source file could not be parsed or rendered as a template.
    #[error("Template render failed for {source_file}: {message}")]
    Template {
        /// Source template path.
        source_file: PathBuf,
        /// Engine diagnostic.
        message: String,
    },
}
