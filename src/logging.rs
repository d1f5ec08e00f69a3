//! Logging setup.
//!
//! One global [`tracing`] subscriber, initialized once from `main`. The
//! default level is `info`, raised to `debug` by `--verbose`; `RUST_LOG`
//! overrides both when set.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if a subscriber was already installed or the filter
/// directive fails to parse.
pub fn init(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;
    let layer = fmt::layer().compact().with_target(false).without_time();

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_at_most_once() {
        // First call installs (unless another test got there first); a second
        // call must report the conflict instead of panicking.
        let _ = init(false);
        assert!(init(true).is_err());
    }
}
