//! Text rendering of diagnostics and help.
//!
//! The engine hands over structured data only; everything user-facing is
//! formatted here.

use std::fmt::Write;

use colored::Colorize;
use itertools::Itertools;
use termtree::Tree;

use crate::application::{Diagnostic, HintPolicy, ResolveError};
use crate::config::Settings;
use crate::domain::{CommandId, CommandTree, Definition};

/// Render a resolution failure.
pub fn render_diagnostic(diagnostic: &Diagnostic, settings: &Settings) -> String {
    let mut out = format!("{}: {}\n", "error".red().bold(), diagnostic.error);
    let _ = writeln!(out, "  {} {}", "usage:".dimmed(), diagnostic.usage);

    if !settings.hints {
        return out;
    }

    match &diagnostic.error {
        ResolveError::UnknownOption { known, .. } if !known.is_empty() => {
            let listed = known.iter().map(|k| format!("--{}", k)).join(", ");
            let _ = writeln!(out, "  known options: {}", listed);
        }
        ResolveError::InvalidValue { source, .. } => {
            if !source.inferred.is_empty() {
                let _ = writeln!(
                    out,
                    "  received: looks like {}",
                    source.inferred.iter().join(" or ")
                );
            }
        }
        _ => {}
    }

    match diagnostic.hint {
        HintPolicy::Help => {
            let _ = writeln!(
                out,
                "  see '{} --help'",
                diagnostic.error.command().cyan()
            );
        }
        HintPolicy::Examples if !diagnostic.examples().is_empty() => {
            let _ = writeln!(out, "  expected e.g.: {}", diagnostic.examples().join(", "));
        }
        _ => {}
    }
    out
}

/// Render help for one command of the tree.
pub fn render_help(tree: &CommandTree, id: CommandId, settings: &Settings) -> String {
    let node = &tree[id];
    let path = tree.display_path(id);
    let mut out = String::new();

    match node.description() {
        Some(text) => {
            let _ = writeln!(out, "{} - {}\n", path.bold(), text);
        }
        None => {
            let _ = writeln!(out, "{}\n", path.bold());
        }
    }
    let _ = writeln!(out, "{} {} {}", "Usage:".cyan().bold(), path, node.usage());

    if !node.arguments().is_empty() {
        let _ = writeln!(out, "\n{}", "Arguments:".cyan().bold());
        for (name, def) in node.arguments() {
            let _ = writeln!(out, "  {:<20} {}", name, describe(def));
        }
    }

    if !node.options().is_empty() {
        let _ = writeln!(out, "\n{}", "Options:".cyan().bold());
        for (name, def) in node.options() {
            let flags = std::iter::once(format!("--{}", name))
                .chain(def.aliases.iter().map(|a| format!("-{}", a)))
                .join(", ");
            let _ = writeln!(out, "  {:<20} {}", flags, describe(def));
        }
    }

    if node.child_names().next().is_some() {
        let _ = writeln!(out, "\n{}", "Commands:".cyan().bold());
        if settings.help_tree {
            let _ = write!(out, "{}", command_tree(tree, id));
        } else {
            for child in node.child_names() {
                let _ = writeln!(out, "  {}", child);
            }
        }
    }
    out
}

/// The subcommands below `id` as a `termtree` tree.
pub fn command_tree(tree: &CommandTree, id: CommandId) -> Tree<String> {
    let node = &tree[id];
    let label = match node.description() {
        Some(text) => format!("{}  {}", node.name(), text.dimmed()),
        None => node.name().to_string(),
    };
    let leaves = node
        .child_names()
        .filter_map(|name| tree.child(id, name))
        .map(|child| command_tree(tree, child));
    Tree::new(label).with_leaves(leaves)
}

fn describe<D: Definition>(def: &D) -> String {
    let mut parts = vec![format!("<{}>", def.kind())];
    if let Some(text) = def.description() {
        parts.push(text.to_string());
    }
    if !def.choices().is_empty() {
        parts.push(format!("[choices: {}]", def.choices().iter().join(", ")));
    }
    if let Some(raw) = def.default_raw() {
        parts.push(format!("[default: {}]", raw));
    } else if def.is_optional() {
        parts.push("[optional]".to_string());
    }
    parts.join(" ")
}
