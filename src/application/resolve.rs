//! Resolution engine: argv + command tree → bound values or a diagnostic.

use tracing::{debug, instrument, trace};

use crate::application::diagnostic::{Diagnostic, ResolveError, Slot};
use crate::domain::{
    classify, coerce, Bindings, CommandId, CommandNode, CommandTree, Definition, OptionDef,
    ParsedToken, Value,
};

/// Successful end of a resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Active command and its bound values; the caller runs the handler.
    Matched {
        command: CommandId,
        bindings: Bindings,
    },
    /// `--help`/`-h` was given, or the active command has no handler.
    Help { command: CommandId },
    /// `--version`/`-v` was given.
    Version(Option<String>),
}

/// Resolve `argv` (already stripped of interpreter/program entries).
#[instrument(level = "debug", skip_all, fields(argc = argv.len()))]
pub fn resolve<S: AsRef<str>>(tree: &CommandTree, argv: &[S]) -> Result<Outcome, Diagnostic> {
    let tokens: Vec<&str> = argv.iter().map(AsRef::as_ref).collect();

    let (command, consumed) = descend(tree, &tokens);
    debug!(command = %tree.display_path(command), consumed, "active command");

    let mut resolver = Resolver {
        tree,
        command,
        node: &tree[command],
        bindings: Bindings::default(),
        positional: 0,
        end_of_flags: false,
    };
    resolver.run(&tokens[consumed..])
}

/// Follow exact child names from the root. Returns the deepest node reached
/// and how many tokens were consumed.
fn descend(tree: &CommandTree, tokens: &[&str]) -> (CommandId, usize) {
    let mut current = tree.root();
    let mut consumed = 0;
    for token in tokens {
        match tree.child(current, token) {
            Some(child) => {
                current = child;
                consumed += 1;
            }
            None => break,
        }
    }
    (current, consumed)
}

struct Resolver<'a> {
    tree: &'a CommandTree,
    command: CommandId,
    node: &'a CommandNode,
    bindings: Bindings,
    /// Index of the next positional definition to fill
    positional: usize,
    end_of_flags: bool,
}

impl<'a> Resolver<'a> {
    fn run(&mut self, tokens: &[&str]) -> Result<Outcome, Diagnostic> {
        let node: &'a CommandNode = self.node;
        let mut i = 0;
        while i < tokens.len() {
            let token = classify(tokens[i]);
            i += 1;

            if token.is_flag && !self.end_of_flags {
                match token.key.as_str() {
                    "version" | "v" => {
                        return Ok(Outcome::Version(self.tree.version().map(str::to_string)))
                    }
                    "help" | "h" => {
                        return Ok(Outcome::Help {
                            command: self.command,
                        })
                    }
                    _ => {}
                }
            }
            if token.is_end_of_flags {
                self.end_of_flags = true;
                continue;
            }

            let flag_shaped = token.is_flag && !self.end_of_flags;
            let mut yielded = false;

            if let Some((name, def)) = node.arguments.get(self.positional) {
                if flag_shaped {
                    if def.is_required() {
                        return Err(self.fail(ResolveError::UnexpectedOption {
                            command: self.command_name(),
                            token: token.original,
                            pending: Some(name.clone()),
                        }));
                    }
                    trace!(argument = %name, token = %token.original, "optional argument yields to flag");
                    yielded = true;
                } else {
                    let value = self.coerce_as(Slot::Argument, name, def, &token.original)?;
                    debug!(argument = %name, %value, "bound argument");
                    self.bindings.arguments.insert(name.clone(), value);
                    self.positional += 1;
                    continue;
                }
            }

            if flag_shaped {
                if self.node.options.is_empty() && !yielded {
                    return Err(self.fail(ResolveError::UnexpectedOption {
                        command: self.command_name(),
                        token: token.original,
                        pending: None,
                    }));
                }
                let consumed_next = self.bind_option(&token, tokens.get(i).copied())?;
                if consumed_next {
                    i += 1;
                }
                continue;
            }

            return Err(self.fail(ResolveError::UnexpectedArgument {
                command: self.command_name(),
                token: token.original,
                declared: self.node.arguments.len(),
            }));
        }

        self.apply_defaults()?;
        self.check_required()?;

        if !self.node.has_handler() {
            debug!(command = %self.command_name(), "no handler, requesting help");
            return Ok(Outcome::Help {
                command: self.command,
            });
        }
        Ok(Outcome::Matched {
            command: self.command,
            bindings: std::mem::take(&mut self.bindings),
        })
    }

    /// Bind one flag token. Returns true when the following token was
    /// consumed as its value.
    fn bind_option(&mut self, token: &ParsedToken, next: Option<&str>) -> Result<bool, Diagnostic> {
        let (name, def, negated) = self.lookup_option(token)?;

        if def.kind.is_boolean() {
            let value = match &token.value {
                Some(inline) => self.coerce_as(Slot::Option, &name, def, inline)?,
                None => Value::Bool(!negated),
            };
            debug!(option = %name, %value, "bound flag");
            self.bindings.options.insert(name, value);
            return Ok(false);
        }

        if negated {
            return Err(self.fail(ResolveError::UnexpectedOption {
                command: self.command_name(),
                token: token.original.clone(),
                pending: None,
            }));
        }

        let (raw, consumed_next) = match (&token.value, next) {
            (Some(inline), _) => (inline.as_str(), false),
            (None, Some(next)) => (next, true),
            (None, None) => {
                return Err(self.fail(ResolveError::MissingOptionValue {
                    command: self.command_name(),
                    option: name,
                }))
            }
        };

        let value = self.coerce_as(Slot::Option, &name, def, raw)?;
        debug!(option = %name, %value, "bound option");
        self.insert_option(name, value);
        Ok(consumed_next)
    }

    /// Canonical name, definition and effective negation for a flag token.
    fn lookup_option(&self, token: &ParsedToken) -> Result<(String, &'a OptionDef, bool), Diagnostic> {
        let node: &'a CommandNode = self.node;
        if let Some((name, def)) = node.find_option(&token.key) {
            return Ok((name.to_string(), def, token.is_negation));
        }
        // `--no-cache` may name an option literally called `no-cache`
        if token.is_negation {
            let literal = format!("no-{}", token.key);
            if let Some((name, def)) = node.find_option(&literal) {
                return Ok((name.to_string(), def, false));
            }
        }
        Err(self.fail(ResolveError::UnknownOption {
            command: self.command_name(),
            token: token.original.clone(),
            known: self.node.options.keys().cloned().collect(),
        }))
    }

    /// Array options accumulate across occurrences; scalars are overwritten.
    fn insert_option(&mut self, name: String, value: Value) {
        match (self.bindings.options.get_mut(&name), value) {
            (Some(Value::Array(existing)), Value::Array(more)) => existing.extend(more),
            (_, value) => {
                self.bindings.options.insert(name, value);
            }
        }
    }

    fn apply_defaults(&mut self) -> Result<(), Diagnostic> {
        let node: &'a CommandNode = self.node;
        for (name, def) in &node.arguments {
            if self.bindings.arguments.contains_key(name) {
                continue;
            }
            if let Some(raw) = def.default_raw() {
                let value = self.coerce_as(Slot::Argument, name, def, raw)?;
                self.bindings.arguments.insert(name.clone(), value);
            }
        }
        for (name, def) in &node.options {
            if self.bindings.options.contains_key(name) {
                continue;
            }
            if let Some(raw) = def.default_raw() {
                let value = self.coerce_as(Slot::Option, name, def, raw)?;
                self.bindings.options.insert(name.clone(), value);
            }
        }
        Ok(())
    }

    fn check_required(&self) -> Result<(), Diagnostic> {
        let missing_argument = self
            .node
            .arguments
            .iter()
            .find(|(name, def)| def.is_required() && !self.bindings.arguments.contains_key(name))
            .map(|(name, _)| (Slot::Argument, name));
        let missing_option = || {
            self.node
                .options
                .iter()
                .find(|(name, def)| def.is_required() && !self.bindings.options.contains_key(*name))
                .map(|(name, _)| (Slot::Option, name))
        };

        match missing_argument.or_else(missing_option) {
            Some((slot, name)) => Err(self.fail(ResolveError::MissingRequiredArgument {
                command: self.command_name(),
                slot,
                name: name.clone(),
            })),
            None => Ok(()),
        }
    }

    fn coerce_as<D: Definition>(
        &self,
        slot: Slot,
        name: &str,
        def: &D,
        raw: &str,
    ) -> Result<Value, Diagnostic> {
        coerce(def.kind(), raw, def.choices()).map_err(|source| {
            self.fail(ResolveError::InvalidValue {
                command: self.command_name(),
                slot,
                name: name.to_string(),
                source,
            })
        })
    }

    fn command_name(&self) -> String {
        self.tree.display_path(self.command)
    }

    fn fail(&self, error: ResolveError) -> Diagnostic {
        debug!(%error, "resolution failed");
        let usage = format!("{} {}", self.command_name(), self.node.usage());
        Diagnostic::new(error, usage.trim_end().to_string())
    }
}
