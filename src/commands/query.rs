use anyhow::{Context as _, Result, bail};

use crate::cli::QueryOpts;
use crate::config::theme::normalize_key;
use crate::config::{Config, Theme};
use crate::paths;
use crate::state::{self, State};

/// Run the query command: print a single value or an enumerated table.
///
/// Keys are normalized (case and `-`/`_` insensitive). `source`, `theme`,
/// the fixed theme fields, and free-form properties come from persisted
/// state; `themes` and `themeOverview <name>` read the configuration of the
/// recorded source tree.
///
/// # Errors
///
/// Returns an error for an unknown key, a missing active theme where one is
/// required, or unreadable state/config.
pub fn run(opts: &QueryOpts) -> Result<()> {
    let state = state::load(&state::state_file())?;
    let key = normalize_key(&opts.key);

    match key.as_str() {
        "themes" => {
            for theme in load_config(&state)?.themes {
                println!("{}", theme.name);
            }
        }
        "themeoverview" => {
            let theme = match &opts.theme {
                Some(name) => load_config(&state)?
                    .get_theme(name)
                    .cloned()
                    .with_context(|| format!("theme not found: {name}"))?,
                None => active_theme(&state)?.clone(),
            };
            print_overview(&theme);
        }
        "source" => println!("{}", state.source),
        "theme" => println!("{}", active_theme(&state)?.name),
        "properties" => {
            for (name, value) in &active_theme(&state)?.properties {
                println!("{name}\t{value}");
            }
        }
        // Resolved so consumers get a usable absolute directory.
        "wallpaperdir" => println!("{}", paths::expand(&active_theme(&state)?.wallpaper_dir)),
        _ => match active_theme(&state)?.lookup(&key) {
            Some(value) => println!("{value}"),
            None => bail!("property not found: {}", opts.key),
        },
    }
    Ok(())
}

fn active_theme(state: &State) -> Result<&Theme> {
    state
        .active_theme
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("active theme not set"))
}

fn load_config(state: &State) -> Result<Config> {
    if state.source.is_empty() {
        bail!("no source directory recorded, run install first");
    }
    let file = std::path::Path::new(&state.source).join("dotfiles.yaml");
    Ok(Config::load(&file)?)
}

fn print_overview(theme: &Theme) {
    println!("Name\t{}", theme.name);
    println!("ColorScheme\t{}", theme.color_scheme);
    println!("WallpaperDir\t{}", theme.wallpaper_dir);
    println!("FontFamily\t{}", theme.font_family);
    println!("FontSize\t{}", theme.font_size);
    println!("CosmicTheme\t{}", theme.cosmic_theme);
    println!("GtkTheme\t{}", theme.gtk_theme);
    println!("IconTheme\t{}", theme.icon_theme);
    println!("CursorTheme\t{}", theme.cursor_theme);
}
