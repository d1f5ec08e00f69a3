use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the dotfiles deployment engine.
#[derive(Parser, Debug)]
#[command(
    name = "dotfiles",
    about = "Declarative dotfiles deployment and theming engine",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Deploy dotfiles from a source tree
    Install(InstallOpts),
    /// Remove every file deployed by a previous install
    Clean(CleanOpts),
    /// Query the configuration or persisted state
    Query(QueryOpts),
    /// List all available themes
    ListThemes(ListThemesOpts),
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InstallOpts {
    /// Source directory (falls back to the one recorded in state)
    pub source: Option<PathBuf>,

    /// Materialization mode: copy or symlink
    #[arg(long, default_value = "copy")]
    pub mode: String,

    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,
}

/// Options for the `clean` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CleanOpts {
    /// Report removals without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,
}

/// Options for the `query` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct QueryOpts {
    /// Key to query (e.g. theme, colorScheme, fontFamily, properties, themes)
    pub key: String,

    /// Theme name for themeOverview (defaults to the active theme)
    pub theme: Option<String>,
}

/// Options for the `list-themes` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ListThemesOpts {
    /// Source directory (falls back to the one recorded in state)
    pub source: Option<PathBuf>,
}
