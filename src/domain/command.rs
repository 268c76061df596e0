//! Command schema: argument/option descriptors and command nodes.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use generational_arena::Index;

use crate::domain::kind::ValueKind;
use crate::domain::value::Value;

/// Names intercepted by the resolver before any schema lookup.
pub const RESERVED_FLAGS: [&str; 4] = ["help", "h", "version", "v"];

/// Shared view over positional and option descriptors.
pub trait Definition {
    fn kind(&self) -> ValueKind;
    fn is_optional(&self) -> bool;
    fn default_raw(&self) -> Option<&str>;
    fn choices(&self) -> &BTreeSet<String>;
    fn description(&self) -> Option<&str>;

    /// Neither optional nor defaulted.
    fn is_required(&self) -> bool {
        !self.is_optional() && self.default_raw().is_none()
    }
}

/// Positional argument descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentDef {
    pub kind: ValueKind,
    pub optional: bool,
    /// Raw default, coerced like user input
    pub default: Option<String>,
    pub choices: BTreeSet<String>,
    pub description: Option<String>,
}

impl ArgumentDef {
    pub fn new(kind: impl Into<ValueKind>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn default_value(mut self, raw: impl Into<String>) -> Self {
        self.default = Some(raw.into());
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }
}

impl Definition for ArgumentDef {
    fn kind(&self) -> ValueKind {
        self.kind
    }
    fn is_optional(&self) -> bool {
        self.optional
    }
    fn default_raw(&self) -> Option<&str> {
        self.default.as_deref()
    }
    fn choices(&self) -> &BTreeSet<String> {
        &self.choices
    }
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Option (flag) descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionDef {
    pub kind: ValueKind,
    pub optional: bool,
    pub default: Option<String>,
    pub choices: BTreeSet<String>,
    pub description: Option<String>,
    /// Short or alternate names, e.g. `m` for `--minify`
    pub aliases: BTreeSet<String>,
}

impl OptionDef {
    pub fn new(kind: impl Into<ValueKind>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Boolean option that is `false` unless given.
    pub fn flag() -> Self {
        Self::default().default_value("false")
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn default_value(mut self, raw: impl Into<String>) -> Self {
        self.default = Some(raw.into());
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.insert(alias.into());
        self
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }
}

impl Definition for OptionDef {
    fn kind(&self) -> ValueKind {
        self.kind
    }
    fn is_optional(&self) -> bool {
        self.optional
    }
    fn default_raw(&self) -> Option<&str> {
        self.default.as_deref()
    }
    fn choices(&self) -> &BTreeSet<String> {
        &self.choices
    }
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Values bound by a successful resolution, keyed by declared name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    pub arguments: BTreeMap<String, Value>,
    pub options: BTreeMap<String, Value>,
}

impl Bindings {
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    /// Boolean option, `false` when unbound.
    pub fn flag(&self, name: &str) -> bool {
        self.option(name).and_then(Value::as_bool).unwrap_or(false)
    }
}

/// Error type handlers may return; kept intact by the runner.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Callback invoked with the bound values of the matched command.
pub type Handler = Box<dyn Fn(&Bindings) -> Result<(), HandlerError>>;

/// One command or subcommand in the tree.
pub struct CommandNode {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) aliases: BTreeSet<String>,
    /// Insertion order is matching order
    pub(crate) arguments: Vec<(String, ArgumentDef)>,
    pub(crate) options: BTreeMap<String, OptionDef>,
    pub(crate) children: BTreeMap<String, Index>,
    pub(crate) handler: Option<Handler>,
    pub(crate) parent: Option<Index>,
}

impl CommandNode {
    pub(crate) fn new(name: impl Into<String>, parent: Option<Index>) -> Self {
        Self {
            name: name.into(),
            description: None,
            aliases: BTreeSet::new(),
            arguments: Vec::new(),
            options: BTreeMap::new(),
            children: BTreeMap::new(),
            handler: None,
            parent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn aliases(&self) -> &BTreeSet<String> {
        &self.aliases
    }

    pub fn arguments(&self) -> &[(String, ArgumentDef)] {
        &self.arguments
    }

    pub fn options(&self) -> &BTreeMap<String, OptionDef> {
        &self.options
    }

    pub fn child_names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub(crate) fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentDef> {
        self.arguments
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, def)| def)
    }

    /// Look up an option by canonical name, then by alias.
    /// Returns the canonical name with the definition.
    pub fn find_option(&self, key: &str) -> Option<(&str, &OptionDef)> {
        if let Some((name, def)) = self.options.get_key_value(key) {
            return Some((name.as_str(), def));
        }
        self.options
            .iter()
            .find(|(_, def)| def.aliases.contains(key))
            .map(|(name, def)| (name.as_str(), def))
    }

    /// True when `name` is taken as a canonical option name or alias.
    pub(crate) fn option_name_taken(&self, name: &str) -> bool {
        self.find_option(name).is_some()
    }

    /// Short usage line, e.g. `<name> <url> [branch] [options]`.
    pub fn usage(&self) -> String {
        let mut parts: Vec<String> = self
            .arguments
            .iter()
            .map(|(name, def)| {
                if def.is_required() {
                    format!("<{}>", name)
                } else {
                    format!("[{}]", name)
                }
            })
            .collect();
        if !self.children.is_empty() {
            parts.insert(0, "<command>".to_string());
        }
        if !self.options.is_empty() {
            parts.push("[options]".to_string());
        }
        parts.join(" ")
    }
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("arguments", &self.arguments)
            .field("options", &self.options)
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .field("handler", &self.handler.is_some())
            .finish()
    }
}
