//! # Named commands
//!
//! ## Overview
//!
//! This module contains [CommandMachine], a registry of named, documented commands. Keymaps can
//! then bind chords to names with [CommandRef::Named](keychord::CommandRef::Named), and the
//! [ChordDispatcher](keychord::ChordDispatcher) resolves them through the machine each time a
//! binding is triggered, so that redefining a command also changes every chord bound to it.
//!
use std::rc::Rc;

use radix_trie::{Trie, TrieCommon};

use keychord::{CommandContext, CommandError, CommandFn, CommandRegistry, CommandResult, InputKey};

use crate::util::completion_keys;

/// A command that can be registered with a [CommandMachine].
pub struct Command<K: InputKey> {
    name: String,
    aliases: Vec<String>,
    doc: String,
    func: CommandFn<K>,
}

impl<K: InputKey> Command<K> {
    /// Create a new command.
    pub fn new<N, D, F>(name: N, doc: D, func: F) -> Self
    where
        N: Into<String>,
        D: Into<String>,
        F: Fn(&CommandContext<'_, K>) -> CommandResult + 'static,
    {
        Command {
            name: name.into(),
            aliases: vec![],
            doc: doc.into(),
            func: Rc::new(func),
        }
    }

    /// Also map this command under `alias`.
    pub fn alias<T: Into<String>>(mut self, alias: T) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// The primary name this command is mapped under.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Additional names this command is mapped under.
    pub fn aliases(&self) -> &[String] {
        self.aliases.as_slice()
    }

    /// A description of what this command does.
    pub fn doc(&self) -> &str {
        self.doc.as_str()
    }

    /// The function that runs this command.
    pub fn func(&self) -> CommandFn<K> {
        self.func.clone()
    }
}

impl<K: InputKey> Clone for Command<K> {
    fn clone(&self) -> Self {
        Command {
            name: self.name.clone(),
            aliases: self.aliases.clone(),
            doc: self.doc.clone(),
            func: self.func.clone(),
        }
    }
}

/// A collection of default commands.
pub trait DefaultCommands<K: InputKey>: Default {
    /// Insert the commands contained by this object into a [CommandMachine].
    fn setup(self, machine: &mut CommandMachine<K>);
}

/// Track named commands so that they can be looked up, completed and documented.
pub struct CommandMachine<K: InputKey> {
    names: Trie<String, Command<K>>,
    aliases: Trie<String, Command<K>>,
}

impl<K: InputKey> CommandMachine<K> {
    /// Create a new instance.
    pub fn new() -> Self {
        let names = Trie::new();
        let aliases = Trie::new();

        CommandMachine { names, aliases }
    }

    /// Create a new instance that contains the commands provided by `D`.
    pub fn from_defaults<D: DefaultCommands<K>>() -> Self {
        let mut machine = CommandMachine::new();

        D::default().setup(&mut machine);

        machine
    }

    /// Map a command under its names, replacing any command previously mapped under them.
    ///
    /// Replacing a command also drops the aliases of the command it replaces.
    pub fn add_command(&mut self, cmd: Command<K>) {
        if let Some(old) = self.names.remove(&cmd.name) {
            for alias in old.aliases.iter() {
                if self.aliases.get(alias).map(Command::name) == Some(old.name()) {
                    self.aliases.remove(alias);
                }
            }
        }

        for alias in cmd.aliases.iter() {
            self.aliases.insert(alias.clone(), cmd.clone());
        }

        self.names.insert(cmd.name.clone(), cmd);
    }

    /// Generate a list of completion candidates for command names.
    pub fn complete_name(&self, prefix: &str) -> Vec<String> {
        completion_keys(&self.names, prefix)
    }

    /// Generate a list of completion candidates for command aliases.
    pub fn complete_aliases(&self, prefix: &str) -> Vec<String> {
        completion_keys(&self.aliases, prefix)
    }

    /// Get the command mapped under a name or alias.
    pub fn get(&self, name: &str) -> Result<&Command<K>, CommandError> {
        if let Some(m) = self.names.get(name) {
            Ok(m)
        } else if let Some(m) = self.aliases.get(name) {
            Ok(m)
        } else {
            Err(CommandError::NoSuchCommand(name.into()))
        }
    }

    /// Get the documentation for the command mapped under a name or alias.
    pub fn doc(&self, name: &str) -> Option<&str> {
        self.get(name).ok().map(Command::doc)
    }

    /// The number of commands mapped under primary names.
    pub fn len(&self) -> usize {
        self.names.len()
    }
}

impl<K: InputKey> Default for CommandMachine<K> {
    fn default() -> Self {
        CommandMachine::new()
    }
}

impl<K: InputKey> CommandRegistry<K> for CommandMachine<K> {
    fn get_command(&self, name: &str) -> Result<CommandFn<K>, CommandError> {
        self.get(name).map(Command::func)
    }
}
