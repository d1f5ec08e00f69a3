//! Top-level subcommand orchestration.
//!
//! Handlers here are deliberately thin: resolve the state-file location,
//! build a [`Reconciler`](crate::reconcile::Reconciler) or read state
//! directly, and report. All real behavior lives in the library layers.

pub mod clean;
pub mod install;
pub mod list_themes;
pub mod query;
