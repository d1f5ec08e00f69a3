use std::process::exit;

use clap::Parser;
use tracing::error;

use dotfiles_deploy::{cli, commands, logging};

fn main() {
    let args = cli::Cli::parse();

    if let Err(e) = logging::init(args.verbose) {
        eprintln!("failed to initialize logging: {e}");
        exit(1);
    }

    if let Err(e) = run(args) {
        error!("{e:#}");
        exit(1);
    }
}

fn run(args: cli::Cli) -> anyhow::Result<()> {
    match args.command {
        cli::Command::Install(opts) => commands::install::run(&opts),
        cli::Command::Clean(opts) => commands::clean::run(&opts),
        cli::Command::Query(opts) => commands::query::run(&opts),
        cli::Command::ListThemes(opts) => commands::list_themes::run(&opts),
    }
}
