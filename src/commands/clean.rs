use anyhow::Result;
use tracing::{info, warn};

use crate::cli::CleanOpts;
use crate::reconcile::Reconciler;
use crate::state;

/// Run the clean command.
///
/// # Errors
///
/// Returns an error when state cannot be loaded or saved; individual
/// removal failures are warnings and stay tracked for the next run.
pub fn run(opts: &CleanOpts) -> Result<()> {
    let reconciler = Reconciler::with_system_runner(state::state_file(), opts.dry_run);
    let report = reconciler.clean()?;

    if report.kept > 0 && !opts.dry_run {
        warn!(kept = report.kept, "some files could not be removed");
    }
    info!(
        removed = report.removed,
        kept = report.kept,
        dry_run = opts.dry_run,
        "clean finished"
    );
    Ok(())
}
