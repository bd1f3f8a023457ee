//! # keychord
//!
//! ## Overview
//!
//! This crate provides toolkit-agnostic interfaces for dispatching Emacs-style key chords to
//! commands.
//!
//! The [ChordDispatcher] component consumes keys one at a time, accumulates them into a pending
//! chord, and queries an ordered set of active [Keymap]s with it: first the local keymap (owned by
//! whatever currently holds input focus), and then the global keymap. When a keymap reports a
//! [LookupResult::Complete] match, the bound command is invoked and the chord starts over. When a
//! keymap reports a [LookupResult::Partial] match, the dispatcher waits for more keys.
//!
//! A reserved universal key (like Emacs' `C-u`) opens a [PrefixArgument], which digits can then
//! extend. The argument is readable by the next command that runs, and is cleared on the
//! keypress after that command.
//!
//! ## Customization
//!
//! Most consumers only need a key type and some keymaps. More complex setups might require doing
//! one or more of the following:
//!
//! * Implementing [InputKey] for the environment's key input (see `chordkit::KeyPress`)
//! * Implementing [Keymap] for a custom keymap structure instead of using [KeymapTree]
//! * Implementing [CommandRegistry] so that commands can be bound by name
//! * Implementing [EchoArea] to show in-progress chords to the user
//!
//! ## Example
//!
//! Here is a program that binds "gg" to a scrolling command, and uses 'u' as its universal key.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use keychord::{ChordDispatcher, CommandRef, KeymapTree, PrefixArgument};
//!
//! let scrolled = Rc::new(Cell::new(0));
//! let counter = scrolled.clone();
//!
//! let mut global: KeymapTree<char> = KeymapTree::new("global");
//! global
//!     .define_key("g g", CommandRef::func(move |ctx| {
//!         counter.set(ctx.count());
//!         Ok(())
//!     }))
//!     .unwrap();
//!
//! let mut dispatcher = ChordDispatcher::new('u');
//! dispatcher.set_global_keymap(Rc::new(global));
//!
//! // A single "g" is the start of a chord.
//! assert_eq!(dispatcher.input_key('g'), true);
//! assert_eq!(dispatcher.pending_keys(), &['g']);
//!
//! // A second "g" runs the command.
//! assert_eq!(dispatcher.input_key('g'), true);
//! assert_eq!(scrolled.get(), 1);
//! assert!(dispatcher.pending_keys().is_empty());
//!
//! // "u12" sets up a prefix argument for the next command.
//! dispatcher.input_key('u');
//! dispatcher.input_key('1');
//! dispatcher.input_key('2');
//! assert_eq!(dispatcher.current_prefix_argument(), Some(PrefixArgument::Number(12)));
//!
//! dispatcher.input_key('g');
//! dispatcher.input_key('g');
//! assert_eq!(scrolled.get(), 12);
//!
//! // Unbound keys aren't consumed, and the prefix argument is now gone.
//! assert_eq!(dispatcher.input_key('x'), false);
//! assert_eq!(dispatcher.current_prefix_argument(), None);
//! ```

// Require docs for public APIs, and disable the more annoying clippy lints.
#![deny(missing_docs)]
#![allow(clippy::bool_to_int_with_if)]
#![allow(clippy::field_reassign_with_default)]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::match_like_matches_macro)]
#![allow(clippy::needless_return)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::rc::Rc;

pub mod commands;
pub mod dispatch;
pub mod keymap;
pub mod prefix;
pub mod redirect;

pub use self::commands::{
    CommandContext,
    CommandError,
    CommandFn,
    CommandRef,
    CommandRegistry,
    CommandResult,
};
pub use self::dispatch::{ChordDispatcher, EchoArea};
pub use self::keymap::{KeyBindings, KeymapError, KeymapTree};
pub use self::prefix::PrefixArgument;
pub use self::redirect::{EventRedirector, EventTarget};

/// Whether a synthesized key event represents pressing or releasing the key.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum KeyPhase {
    /// The key went down.
    Press,
    /// The key came back up.
    Release,
}

/// Trait for keys that can be used with [ChordDispatcher].
pub trait InputKey: Clone + Debug + Display + Hash + Eq + 'static {
    /// The raw event type delivered by the UI toolkit.
    type Event: 'static;

    /// The error type returned when parsing a chord description fails.
    type Error;

    /// Convert a raw toolkit event into a key, if it represents a key press.
    fn from_event(event: &Self::Event) -> Option<Self>;

    /// Synthesize a raw toolkit event for this key.
    fn to_event(&self, phase: KeyPhase) -> Self::Event;

    /// Parse a string describing a sequence of keys, such as `"C-x C-f"`.
    fn from_chord_str(desc: &str) -> Result<Vec<Self>, Self::Error>;

    /// If this is one of the ten digit keys pressed without any modifiers, return its value.
    fn get_digit(&self) -> Option<u32>;
}

/// Keys are plain characters, and whitespace separates them in chord descriptions.
///
/// Characters have no press/release distinction, so [InputKey::to_event] produces the same
/// character for both phases.
impl InputKey for char {
    type Event = char;
    type Error = std::convert::Infallible;

    fn from_event(event: &char) -> Option<Self> {
        Some(*event)
    }

    fn to_event(&self, _: KeyPhase) -> char {
        *self
    }

    fn from_chord_str(desc: &str) -> Result<Vec<Self>, Self::Error> {
        Ok(desc.chars().filter(|c| !c.is_whitespace()).collect())
    }

    fn get_digit(&self) -> Option<u32> {
        self.to_digit(10)
    }
}

/// The result of looking up a sequence of keys in a [Keymap].
#[derive(Clone, Debug)]
pub enum LookupResult<K: InputKey> {
    /// Nothing is bound to this sequence or any sequence starting with it.
    NoMatch,

    /// This sequence is a strict prefix of at least one bound sequence.
    Partial,

    /// This exact sequence is bound to a command.
    Complete(CommandRef<K>),
}

impl<K: InputKey> LookupResult<K> {
    /// Whether this result is a [LookupResult::Complete] match.
    pub fn is_complete(&self) -> bool {
        matches!(self, LookupResult::Complete(_))
    }
}

/// A mapping from key sequences to commands.
///
/// Implementations must be pure: looking up the same keys in the same keymap always produces the
/// same result, and has no side effects.
pub trait Keymap<K: InputKey> {
    /// Look up the full pending chord.
    fn lookup(&self, keys: &[K]) -> LookupResult<K>;

    /// A name to identify this keymap in log messages.
    fn name(&self) -> &str {
        "anonymous"
    }
}

/// Something that has a local keymap slot which can be switched as focus moves around.
pub trait SetLocalKeymap<K: InputKey> {
    /// Replace the current local keymap.
    fn set_local_keymap(&mut self, keymap: Option<Rc<dyn Keymap<K>>>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_key() {
        assert_eq!(char::from_chord_str("g g").unwrap(), vec!['g', 'g']);
        assert_eq!(char::from_chord_str("gg").unwrap(), vec!['g', 'g']);
        assert_eq!(char::from_event(&'a'), Some('a'));
        assert_eq!('a'.to_event(KeyPhase::Release), 'a');

        assert_eq!('0'.get_digit(), Some(0));
        assert_eq!('7'.get_digit(), Some(7));
        assert_eq!('a'.get_digit(), None);
    }
}
