//! # Command references and invocation
//!
//! ## Overview
//!
//! Keymaps bind key sequences to a [CommandRef], which is either a callable or the name of a
//! command to resolve through a [CommandRegistry] at the time it gets invoked.
//!
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::prefix::PrefixArgument;
use crate::redirect::EventRedirector;
use crate::InputKey;

/// Errors that can be encountered while resolving or running a command.
#[derive(thiserror::Error, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum CommandError {
    /// Error for names that aren't present in the command registry.
    #[error("No such command: {0}")]
    NoSuchCommand(String),

    /// Error for commands that can't make sense of the current prefix argument or chord.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Generic failure while running a command.
    #[error("Error: {0}")]
    Failure(String),
}

/// Result type for running a command.
pub type CommandResult = Result<(), CommandError>;

/// A callable command.
pub type CommandFn<K> = Rc<dyn Fn(&CommandContext<'_, K>) -> CommandResult>;

/// What a key sequence is bound to.
pub enum CommandRef<K: InputKey> {
    /// Call this function directly.
    Func(CommandFn<K>),

    /// Look this name up in the [CommandRegistry] when the binding is triggered.
    Named(String),
}

impl<K: InputKey> CommandRef<K> {
    /// Wrap a closure as a command.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&CommandContext<'_, K>) -> CommandResult + 'static,
    {
        CommandRef::Func(Rc::new(f))
    }

    /// Refer to a command by name.
    pub fn named<T: Into<String>>(name: T) -> Self {
        CommandRef::Named(name.into())
    }

    /// Find the function to call for this command.
    pub fn resolve(
        &self,
        registry: Option<&dyn CommandRegistry<K>>,
    ) -> Result<CommandFn<K>, CommandError> {
        match self {
            CommandRef::Func(f) => Ok(f.clone()),
            CommandRef::Named(name) => {
                match registry {
                    Some(registry) => registry.get_command(name),
                    None => Err(CommandError::NoSuchCommand(name.clone())),
                }
            },
        }
    }
}

impl<K: InputKey> Clone for CommandRef<K> {
    fn clone(&self) -> Self {
        match self {
            CommandRef::Func(f) => CommandRef::Func(f.clone()),
            CommandRef::Named(name) => CommandRef::Named(name.clone()),
        }
    }
}

impl<K: InputKey> fmt::Debug for CommandRef<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandRef::Func(_) => write!(f, "Func(..)"),
            CommandRef::Named(name) => f.debug_tuple("Named").field(name).finish(),
        }
    }
}

impl<K: InputKey> From<&str> for CommandRef<K> {
    fn from(name: &str) -> Self {
        CommandRef::Named(name.to_string())
    }
}

impl<K: InputKey> From<String> for CommandRef<K> {
    fn from(name: String) -> Self {
        CommandRef::Named(name)
    }
}

/// Resolves command names to callables.
pub trait CommandRegistry<K: InputKey> {
    /// Fetch the command mapped under `name`.
    ///
    /// Implementations should return [CommandError::NoSuchCommand] for unknown names.
    fn get_command(&self, name: &str) -> Result<CommandFn<K>, CommandError>;
}

impl<K: InputKey> CommandRegistry<K> for HashMap<String, CommandFn<K>> {
    fn get_command(&self, name: &str) -> Result<CommandFn<K>, CommandError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| CommandError::NoSuchCommand(name.to_string()))
    }
}

/// Information available to a command while it runs.
pub struct CommandContext<'a, K: InputKey> {
    keys: &'a [K],
    prefix: Option<PrefixArgument>,
    redirector: &'a EventRedirector<K>,
}

impl<'a, K: InputKey> CommandContext<'a, K> {
    pub(crate) fn new(
        keys: &'a [K],
        prefix: Option<PrefixArgument>,
        redirector: &'a EventRedirector<K>,
    ) -> Self {
        CommandContext { keys, prefix, redirector }
    }

    /// The chord that triggered this command.
    pub fn keys(&self) -> &[K] {
        self.keys
    }

    /// The key that completed the chord.
    pub fn last_key(&self) -> Option<&K> {
        self.keys.last()
    }

    /// The prefix argument entered before the chord, if there was one.
    pub fn prefix_arg(&self) -> Option<PrefixArgument> {
        self.prefix
    }

    /// How many times a repeatable command should run.
    ///
    /// This is the numeric value of the prefix argument, or 1 when there isn't one.
    pub fn count(&self) -> usize {
        self.prefix.map(|p| p.count()).unwrap_or(1)
    }

    /// Deliver a press and release of `key` to the object that received the last key event.
    ///
    /// Returns `false` if that object has gone away.
    pub fn send_key(&self, key: &K) -> bool {
        self.redirector.send_key(key)
    }

    /// Deliver the key that completed the chord back to the object that originally received it.
    pub fn forward_key(&self) -> bool {
        match self.keys.last() {
            Some(key) => self.redirector.send_key(key),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_func() {
        let cmd: CommandRef<char> = CommandRef::func(|_| Ok(()));
        let redirector = EventRedirector::default();
        let ctx = CommandContext::new(&['a'], None, &redirector);

        let f = cmd.resolve(None).unwrap();
        assert_eq!(f(&ctx), Ok(()));
    }

    fn scroll_top(ctx: &CommandContext<'_, char>) -> CommandResult {
        if ctx.count() > 1 {
            Err(CommandError::InvalidArgument(ctx.count().to_string()))
        } else {
            Ok(())
        }
    }

    #[test]
    fn test_resolve_named() {
        let mut registry: HashMap<String, CommandFn<char>> = HashMap::new();
        registry.insert("scroll-top".into(), Rc::new(scroll_top));
        let registry: &dyn CommandRegistry<char> = &registry;

        let redirector = EventRedirector::default();
        let cmd = CommandRef::<char>::from("scroll-top");

        let f = cmd.resolve(Some(registry)).unwrap();
        let ctx = CommandContext::new(&['g', 'g'], None, &redirector);
        assert_eq!(f(&ctx), Ok(()));

        let prefix = Some(PrefixArgument::Multiplier(4));
        let ctx = CommandContext::new(&['g', 'g'], prefix, &redirector);
        assert_eq!(f(&ctx), Err(CommandError::InvalidArgument("4".into())));

        // Unknown names are an error, with or without a registry.
        let cmd = CommandRef::<char>::named("no-such-thing");
        assert_eq!(
            cmd.resolve(Some(registry)).err(),
            Some(CommandError::NoSuchCommand("no-such-thing".into()))
        );
        assert_eq!(
            cmd.resolve(None).err(),
            Some(CommandError::NoSuchCommand("no-such-thing".into()))
        );
    }

    #[test]
    fn test_context() {
        let redirector = EventRedirector::default();
        let ctx = CommandContext::new(&['g', 'h'], Some(PrefixArgument::Number(12)), &redirector);

        assert_eq!(ctx.keys(), &['g', 'h']);
        assert_eq!(ctx.last_key(), Some(&'h'));
        assert_eq!(ctx.prefix_arg(), Some(PrefixArgument::Number(12)));
        assert_eq!(ctx.count(), 12);

        // Nobody has received any key events yet.
        assert_eq!(ctx.forward_key(), false);
    }
}
