//! Rule evaluation.
//!
//! A directory spec may carry rules gating which files get deployed. Each
//! rule is a boolean expression (evaluated by `evalexpr` — its grammar is not
//! ours) plus an `exclude` list of literal paths/filenames that forces a
//! non-match. Across rules the semantics are OR: the first expression that
//! evaluates true accepts the file, an exclude hit rejects it outright.

use serde::Deserialize;

use crate::error::ConfigError;

/// A single deployment rule.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rule {
    /// Boolean expression over the rule context.
    pub rule: String,
    /// Literal paths or filenames that force a non-match.
    pub exclude: Vec<String>,
}

/// Values the rule expressions may reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleContext {
    /// Current OS user name.
    pub user: String,
    /// Active theme name, empty when none.
    pub theme: String,
    /// Whether the process runs inside a WSL distribution.
    pub wsl: bool,
}

impl RuleContext {
    /// Build the context from the process environment.
    #[must_use]
    pub fn detect(theme: &str) -> Self {
        let user = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_default();
        let wsl = std::env::var("WSL_DISTRO_NAME").is_ok_and(|v| !v.is_empty());
        Self {
            user,
            theme: theme.to_string(),
            wsl,
        }
    }
}

/// Decide whether `rules` permit deploying `file`.
///
/// - Empty rule list: always permit.
/// - Per rule, in declaration order: an exclude hit rejects the file for
///   good; otherwise a true expression accepts it and remaining rules are
///   not consulted.
/// - No rule matched: reject.
///
/// # Errors
///
/// Returns [`ConfigError::Rule`] when an expression fails to evaluate to a
/// boolean — that is a misconfiguration, not a runtime condition.
pub fn evaluate(rules: &[Rule], ctx: &RuleContext, file: &str) -> Result<bool, ConfigError> {
    if rules.is_empty() {
        return Ok(true);
    }

    let context = expression_context(ctx, file)?;
    for rule in rules {
        if rule.exclude.iter().any(|entry| is_excluded(file, entry)) {
            return Ok(false);
        }
        let matched = evalexpr::eval_boolean_with_context(&rule.rule, &context).map_err(|e| {
            ConfigError::Rule {
                rule: rule.rule.clone(),
                message: e.to_string(),
            }
        })?;
        if matched {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Literal match: exact string, or a trailing path component sequence on a
/// separator boundary (so `exclude: [alacritty.toml]` matches the absolute
/// source path the evaluator is handed).
fn is_excluded(file: &str, entry: &str) -> bool {
    if entry.is_empty() {
        return false;
    }
    if file == entry {
        return true;
    }
    file.strip_suffix(entry)
        .is_some_and(|rest| rest.ends_with(['/', '\\']))
}

/// Variable bindings for one evaluation: `user`, `theme`, `wsl`, `file`.
fn expression_context(
    ctx: &RuleContext,
    file: &str,
) -> Result<evalexpr::HashMapContext, ConfigError> {
    use evalexpr::ContextWithMutableVariables as _;

    let mut context = evalexpr::HashMapContext::new();
    for (key, value) in [
        ("user", evalexpr::Value::from(ctx.user.as_str())),
        ("theme", evalexpr::Value::from(ctx.theme.as_str())),
        ("wsl", evalexpr::Value::from(ctx.wsl)),
        ("file", evalexpr::Value::from(file)),
    ] {
        context
            .set_value(key.to_string(), value)
            .map_err(|e| ConfigError::Rule {
                rule: format!("<context variable {key}>"),
                message: e.to_string(),
            })?;
    }
    Ok(context)
}
