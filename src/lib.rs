//! Declarative dotfiles deployment engine.
//!
//! Given a source tree of configuration files organized under rule-governed
//! directories and optional theme variants, compute and apply a mapping from
//! source files to target filesystem locations — by copy, symlink, or
//! template render — and persist enough state to make repeated runs
//! idempotent and fully reversible.
//!
//! The public API is organised in layers:
//!
//! - **[`config`]** — the `dotfiles.yaml` model: directories, rules, themes,
//!   activation commands, include merging
//! - **[`plan`]** / **[`materialize`]** — turn config + filesystem into an
//!   ordered plan and apply it idempotently
//! - **[`state`]** — the persisted record of everything under management
//! - **[`reconcile`]** — the sequential pipeline tying it all together
//! - **[`commands`]** — top-level subcommand orchestration (`install`,
//!   `clean`, `query`, `list-themes`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod activate;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod materialize;
pub mod paths;
pub mod plan;
pub mod reconcile;
pub mod state;
