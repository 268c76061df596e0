//! Handlers of the `argtree` binary and the dispatch loop.

use std::collections::BTreeSet;

use tracing::instrument;

use crate::application::{run, RunOutcome};
use crate::cli::error::CliResult;
use crate::cli::{output, render};
use crate::config::Settings;
use crate::domain::{classify as classify_token, coerce as coerce_value};
use crate::domain::{Bindings, CommandTree, HandlerError, ValueKind};

/// Run `argv` against the binary's own tree and print the result.
#[instrument(level = "debug", skip(tree, settings))]
pub fn execute(tree: &CommandTree, argv: &[String], settings: &Settings) -> CliResult<()> {
    match run(tree, argv)? {
        RunOutcome::Executed { .. } => {}
        RunOutcome::Help { command } => {
            output::info(&render::render_help(tree, command, settings));
        }
        RunOutcome::Version(version) => {
            output::info(&format!(
                "{} {}",
                tree[tree.root()].name(),
                version.as_deref().unwrap_or("unknown")
            ));
        }
    }
    Ok(())
}

pub fn coerce(bindings: &Bindings) -> Result<(), HandlerError> {
    output::info(&coerce_report(bindings)?);
    Ok(())
}

/// JSON rendering of the coerced value.
pub fn coerce_report(bindings: &Bindings) -> Result<String, HandlerError> {
    let kind: ValueKind = argument_str(bindings, "kind")?.parse()?;
    let raw = argument_str(bindings, "raw")?;
    let choices: BTreeSet<String> = bindings
        .option("choices")
        .and_then(|v| v.as_array())
        .map(|items| items.iter().map(ToString::to_string).collect())
        .unwrap_or_default();

    let value = coerce_value(kind, raw, &choices)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn classify(bindings: &Bindings) -> Result<(), HandlerError> {
    output::info(&classify_report(bindings)?);
    Ok(())
}

pub fn classify_report(bindings: &Bindings) -> Result<String, HandlerError> {
    let token = classify_token(argument_str(bindings, "token")?);
    Ok(serde_json::to_string_pretty(&token)?)
}

pub fn config_show(settings: &Settings) -> Result<(), HandlerError> {
    output::info(&settings.to_toml()?);
    Ok(())
}

pub fn config_template() -> Result<(), HandlerError> {
    output::info(&Settings::template());
    Ok(())
}

fn argument_str<'b>(bindings: &'b Bindings, name: &str) -> Result<&'b str, HandlerError> {
    bindings
        .argument(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing argument '{}'", name).into())
}
