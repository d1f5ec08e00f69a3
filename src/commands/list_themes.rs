use anyhow::Result;

use crate::cli::ListThemesOpts;
use crate::config::Config;
use crate::error::ConfigError;
use crate::state;

/// Run the list-themes command.
///
/// # Errors
///
/// Returns an error when no source directory is known or the configuration
/// cannot be loaded.
pub fn run(opts: &ListThemesOpts) -> Result<()> {
    let state = state::load(&state::state_file())?;

    let source = match &opts.source {
        Some(dir) => dir.clone(),
        None if !state.source.is_empty() => std::path::PathBuf::from(&state.source),
        None => return Err(ConfigError::NoSourceDirectory.into()),
    };

    let config = Config::load(&source.join("dotfiles.yaml"))?;
    println!("NAME");
    for theme in config.themes {
        println!("{}", theme.name);
    }
    Ok(())
}
