//! Command tree of the `argtree` binary, declared with the engine itself.

use crate::cli::commands;
use crate::config::Settings;
use crate::domain::{ArgumentDef, CommandTree, OptionDef, ScalarKind, SchemaResult};

/// Every kind name accepted by `argtree coerce`.
pub fn kind_names() -> Vec<String> {
    ScalarKind::ALL
        .iter()
        .flat_map(|k| [k.to_string(), k.array().to_string()])
        .collect()
}

/// Build the `argtree` command tree.
pub fn build_cli(settings: Settings) -> SchemaResult<CommandTree> {
    let mut tree = CommandTree::new("argtree").with_version(env!("CARGO_PKG_VERSION"));
    tree.root_mut()
        .describe("Inspect how argtree classifies tokens and coerces values");

    tree.root_mut()
        .subcommand("coerce")?
        .describe("Coerce a raw value to a kind and print it as JSON")
        .argument(
            "kind",
            ArgumentDef::new(ScalarKind::Choice)
                .choices(kind_names())
                .describe("Value kind, e.g. size or numberArray"),
        )?
        .argument(
            "raw",
            ArgumentDef::new(ScalarKind::String).describe("Raw input text"),
        )?
        .option(
            "choices",
            OptionDef::new(ScalarKind::String.array())
                .alias("c")
                .optional()
                .describe("Allowed values for choice kinds"),
        )?
        .handler(commands::coerce)?;

    tree.root_mut()
        .subcommand("classify")?
        .describe("Show how a single argv token is classified")
        .argument(
            "token",
            ArgumentDef::new(ScalarKind::String).describe("Token; put flag-shaped tokens after --"),
        )?
        .handler(commands::classify)?;

    let root = tree.root();
    let config_id = tree.add_subcommand(root, "config")?;
    tree.set_description(config_id, "Manage settings");

    let shown = settings.clone();
    tree.command_mut(config_id)
        .subcommand("show")?
        .describe("Show effective configuration")
        .handler(move |_| commands::config_show(&shown))?;

    tree.command_mut(config_id)
        .subcommand("template")?
        .describe("Print a config file template")
        .handler(|_| commands::config_template())?;

    Ok(tree)
}
