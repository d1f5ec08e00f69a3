//! Theme activation.
//!
//! After a successful deployment the engine runs the configured activation
//! commands: the global list first, then the active theme's own. Activation
//! is strictly best-effort — a broken condition or a failing command is a
//! warning, never a reason to abort a run whose files are already in place.

use evalexpr::ContextWithMutableVariables as _;
use tracing::{debug, warn};

use crate::config::ActivationCommand;
use crate::exec::CommandRunner;
use crate::paths;

/// Run `commands` in order through `runner`.
///
/// Per command: an unsatisfied or unevaluable `condition` (checked against
/// the process environment) skips it; `on_change` commands are skipped
/// unless `theme_changed`; the command text gets `~`/env expansion before
/// execution. Returns the number of commands that ran successfully.
pub fn run_commands(
    commands: &[ActivationCommand],
    theme_changed: bool,
    runner: &dyn CommandRunner,
) -> usize {
    let env: Vec<(String, String)> = std::env::vars().collect();
    run_with_env(commands, theme_changed, runner, &env)
}

fn run_with_env(
    commands: &[ActivationCommand],
    theme_changed: bool,
    runner: &dyn CommandRunner,
    env: &[(String, String)],
) -> usize {
    let mut context = evalexpr::HashMapContext::new();
    for (key, value) in env {
        // Variables whose names the grammar cannot express are simply not
        // referenceable from conditions.
        let _ = context.set_value(key.clone(), evalexpr::Value::from(value.as_str()));
    }

    let mut succeeded = 0;
    for command in commands {
        if let Some(condition) = &command.condition {
            match evalexpr::eval_boolean_with_context(condition, &context) {
                Ok(true) => {}
                Ok(false) => {
                    debug!(command = %command.command, %condition, "condition not met, skipping");
                    continue;
                }
                Err(e) => {
                    warn!(
                        command = %command.command,
                        %condition,
                        error = %e,
                        "condition failed to evaluate, skipping"
                    );
                    continue;
                }
            }
        }

        if command.on_change && !theme_changed {
            debug!(command = %command.command, "theme unchanged, skipping");
            continue;
        }

        let text = paths::expand(&command.command);
        debug!(command = %text, "executing activation command");
        match runner.run_shell(&text) {
            Ok(result) if result.success => succeeded += 1,
            Ok(result) => {
                warn!(
                    command = %text,
                    code = ?result.code,
                    stderr = %result.stderr.trim(),
                    "activation command failed"
                );
            }
            Err(e) => {
                warn!(command = %text, error = %e, "failed to spawn activation command");
            }
        }
    }
    succeeded
}
