use anyhow::Result;
use tracing::info;

use crate::cli::InstallOpts;
use crate::materialize::Mode;
use crate::reconcile::{InstallOptions, Reconciler};
use crate::state;

/// Run the install command.
///
/// # Errors
///
/// Returns an error on configuration, state, or materialization failures.
pub fn run(opts: &InstallOpts) -> Result<()> {
    let mode = Mode::parse(&opts.mode)?;
    let theme_override = std::env::var("DOTFILE_THEME")
        .ok()
        .filter(|name| !name.is_empty());

    let reconciler = Reconciler::with_system_runner(state::state_file(), opts.dry_run);
    let report = reconciler.install(&InstallOptions {
        source: opts.source.clone(),
        mode,
        theme_override,
    })?;

    info!(
        deployed = report.deployed,
        activated = report.activated,
        theme = report.theme.as_deref().unwrap_or("<none>"),
        dry_run = opts.dry_run,
        "install finished"
    );
    Ok(())
}
