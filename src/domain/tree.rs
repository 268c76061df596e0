//! Arena-backed command tree.
//!
//! Nodes live in a generational arena and are addressed by [`CommandId`].
//! The tree is mutated only while the CLI is declared; resolution borrows it
//! immutably.

use std::ops;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::coerce::coerce;
use crate::domain::command::{
    ArgumentDef, Bindings, CommandNode, Definition, HandlerError, OptionDef, RESERVED_FLAGS,
};
use crate::domain::error::{DefinitionKind, SchemaError, SchemaResult};

/// Handle to a node of one [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(Index);

/// The schema: a root command and its descendants.
#[derive(Debug)]
pub struct CommandTree {
    arena: Arena<CommandNode>,
    root: Index,
    version: Option<String>,
}

impl CommandTree {
    pub fn new(name: impl Into<String>) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(CommandNode::new(name, None));
        Self {
            arena,
            root,
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn root(&self) -> CommandId {
        CommandId(self.root)
    }

    pub fn node(&self, id: CommandId) -> Option<&CommandNode> {
        self.arena.get(id.0)
    }

    /// Fluent builder for the root command.
    pub fn root_mut(&mut self) -> CommandBuilder<'_> {
        let id = self.root();
        self.command_mut(id)
    }

    pub fn command_mut(&mut self, id: CommandId) -> CommandBuilder<'_> {
        CommandBuilder { tree: self, id }
    }

    /// Exact-name child lookup. Aliases are not consulted.
    pub fn child(&self, id: CommandId, name: &str) -> Option<CommandId> {
        self.node(id)?.children.get(name).copied().map(CommandId)
    }

    /// Names from the root down to `id`.
    pub fn path(&self, id: CommandId) -> Vec<String> {
        let mut names = Vec::new();
        let mut current = Some(id.0);
        while let Some(idx) = current {
            match self.arena.get(idx) {
                Some(node) => {
                    names.push(node.name.clone());
                    current = node.parent;
                }
                None => break,
            }
        }
        names.reverse();
        names
    }

    pub fn display_path(&self, id: CommandId) -> String {
        self.path(id).join(" ")
    }

    /// Pre-order traversal with depth, children in name order.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn depth(&self) -> usize {
        self.iter().map(|(_, depth, _)| depth + 1).max().unwrap_or(0)
    }

    fn node_mut(&mut self, id: CommandId) -> &mut CommandNode {
        &mut self.arena[id.0]
    }

    #[instrument(level = "debug", skip(self, def))]
    pub fn add_option(&mut self, id: CommandId, name: &str, def: OptionDef) -> SchemaResult<()> {
        let node = &self[id];
        let command = node.name.clone();

        for candidate in std::iter::once(name).chain(def.aliases.iter().map(String::as_str)) {
            if RESERVED_FLAGS.contains(&candidate) {
                return Err(SchemaError::ReservedName {
                    command,
                    name: candidate.to_string(),
                });
            }
            if node.option_name_taken(candidate) {
                return Err(SchemaError::DuplicateDefinition {
                    command,
                    what: DefinitionKind::Option,
                    name: candidate.to_string(),
                });
            }
        }
        if def.aliases.contains(name) {
            return Err(SchemaError::DuplicateDefinition {
                command,
                what: DefinitionKind::Option,
                name: name.to_string(),
            });
        }
        validate_definition(&command, DefinitionKind::Option, name, &def)?;

        debug!(command = %command, option = name, kind = %def.kind, "option added");
        self.node_mut(id).options.insert(name.to_string(), def);
        Ok(())
    }

    #[instrument(level = "debug", skip(self, def))]
    pub fn add_argument(&mut self, id: CommandId, name: &str, def: ArgumentDef) -> SchemaResult<()> {
        let node = &self[id];
        let command = node.name.clone();

        if node.argument(name).is_some() {
            return Err(SchemaError::DuplicateDefinition {
                command,
                what: DefinitionKind::Argument,
                name: name.to_string(),
            });
        }
        if def.is_required() {
            if let Some((after, _)) = node.arguments.iter().find(|(_, d)| !d.is_required()) {
                return Err(SchemaError::OrderingViolation {
                    command,
                    argument: name.to_string(),
                    after: after.clone(),
                });
            }
        }
        validate_definition(&command, DefinitionKind::Argument, name, &def)?;

        debug!(command = %command, argument = name, kind = %def.kind, "argument added");
        self.node_mut(id).arguments.push((name.to_string(), def));
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_subcommand(&mut self, id: CommandId, name: &str) -> SchemaResult<CommandId> {
        self.ensure_child_free(id, name)?;
        let child = self.arena.insert(CommandNode::new(name, Some(id.0)));
        self.node_mut(id).children.insert(name.to_string(), child);
        Ok(CommandId(child))
    }

    /// Attach a separately built tree as subcommand `name`.
    /// The subtree's root is renamed to `name`; its version is dropped.
    #[instrument(level = "debug", skip(self, subtree))]
    pub fn graft(&mut self, id: CommandId, name: &str, subtree: CommandTree) -> SchemaResult<CommandId> {
        self.ensure_child_free(id, name)?;
        let CommandTree {
            arena: mut source,
            root,
            ..
        } = subtree;
        let root_node = source
            .remove(root)
            .unwrap_or_else(|| CommandNode::new(name, None));
        let child = self.transplant(&mut source, root_node, id.0);
        self.arena[child].name = name.to_string();
        self.node_mut(id).children.insert(name.to_string(), child);
        Ok(CommandId(child))
    }

    fn transplant(
        &mut self,
        source: &mut Arena<CommandNode>,
        mut node: CommandNode,
        parent: Index,
    ) -> Index {
        let children = std::mem::take(&mut node.children);
        node.parent = Some(parent);
        let new_idx = self.arena.insert(node);
        for (name, child) in children {
            if let Some(child_node) = source.remove(child) {
                let new_child = self.transplant(source, child_node, new_idx);
                self.arena[new_idx].children.insert(name, new_child);
            }
        }
        new_idx
    }

    fn ensure_child_free(&self, id: CommandId, name: &str) -> SchemaResult<()> {
        let node = &self[id];
        if node.children.contains_key(name) {
            return Err(SchemaError::DuplicateDefinition {
                command: node.name.clone(),
                what: DefinitionKind::Subcommand,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Record alternate names. Not validated and not used for descent.
    pub fn add_alias<I, S>(&mut self, id: CommandId, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.node_mut(id)
            .aliases
            .extend(names.into_iter().map(Into::into));
    }

    pub fn set_handler<F>(&mut self, id: CommandId, handler: F) -> SchemaResult<()>
    where
        F: Fn(&Bindings) -> Result<(), HandlerError> + 'static,
    {
        let node = self.node_mut(id);
        if node.handler.is_some() {
            return Err(SchemaError::HandlerAlreadySet {
                command: node.name.clone(),
            });
        }
        node.handler = Some(Box::new(handler));
        Ok(())
    }

    pub fn set_description(&mut self, id: CommandId, text: impl Into<String>) {
        self.node_mut(id).description = Some(text.into());
    }
}

impl ops::Index<CommandId> for CommandTree {
    type Output = CommandNode;

    /// Panics if `id` was issued by a different tree.
    fn index(&self, id: CommandId) -> &CommandNode {
        &self.arena[id.0]
    }
}

/// Choice kinds need choices; a declared default must coerce.
fn validate_definition<D: Definition>(
    command: &str,
    what: DefinitionKind,
    name: &str,
    def: &D,
) -> SchemaResult<()> {
    if def.kind().needs_choices() && def.choices().is_empty() {
        return Err(SchemaError::EmptyChoices {
            command: command.to_string(),
            what,
            name: name.to_string(),
        });
    }
    if let Some(raw) = def.default_raw() {
        coerce(def.kind(), raw, def.choices()).map_err(|e| SchemaError::InvalidDefault {
            command: command.to_string(),
            what,
            name: name.to_string(),
            raw: raw.to_string(),
            reason: e.reason,
        })?;
    }
    Ok(())
}

/// Fluent declaration handle for one command.
pub struct CommandBuilder<'t> {
    tree: &'t mut CommandTree,
    id: CommandId,
}

impl<'t> CommandBuilder<'t> {
    pub fn id(&self) -> CommandId {
        self.id
    }

    pub fn option(&mut self, name: &str, def: OptionDef) -> SchemaResult<&mut Self> {
        self.tree.add_option(self.id, name, def)?;
        Ok(self)
    }

    pub fn argument(&mut self, name: &str, def: ArgumentDef) -> SchemaResult<&mut Self> {
        self.tree.add_argument(self.id, name, def)?;
        Ok(self)
    }

    pub fn alias<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tree.add_alias(self.id, names);
        self
    }

    pub fn describe(&mut self, text: impl Into<String>) -> &mut Self {
        self.tree.set_description(self.id, text);
        self
    }

    pub fn handler<F>(&mut self, handler: F) -> SchemaResult<&mut Self>
    where
        F: Fn(&Bindings) -> Result<(), HandlerError> + 'static,
    {
        self.tree.set_handler(self.id, handler)?;
        Ok(self)
    }

    /// Declare a new empty subcommand and return its builder.
    pub fn subcommand(&mut self, name: &str) -> SchemaResult<CommandBuilder<'_>> {
        let child = self.tree.add_subcommand(self.id, name)?;
        Ok(CommandBuilder {
            tree: &mut *self.tree,
            id: child,
        })
    }

    pub fn graft(&mut self, name: &str, subtree: CommandTree) -> SchemaResult<CommandId> {
        self.tree.graft(self.id, name, subtree)
    }
}

/// Pre-order iterator yielding `(id, depth, node)`.
pub struct TreeIterator<'a> {
    tree: &'a CommandTree,
    stack: Vec<(Index, usize)>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a CommandTree) -> Self {
        Self {
            tree,
            stack: vec![(tree.root, 0)],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (CommandId, usize, &'a CommandNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, depth)) = self.stack.pop() {
            if let Some(node) = self.tree.arena.get(idx) {
                // Reverse so children come out in name order
                for &child in node.children.values().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some((CommandId(idx), depth, node));
            }
        }
        None
    }
}
