//! # chordkit
//!
//! ## Overview
//!
//! This crate connects the chord dispatching in [keychord] to terminal applications built on
//! [crossterm], in the manner of an Emacs-style browser or editor.
//!
//! - [key::KeyPress] is the [keychord::InputKey] for crossterm events, and can be parsed from
//!   descriptions like `"C-x C-f"`.
//! - [commands::CommandMachine] maps command names to functions, so that keymaps can bind chords
//!   to names.
//! - [focus::KeymapContextSwitcher] watches views and input overlays gain and lose focus, and
//!   decides which keymap is local.
//! - [hooks::Hook] lets the application announce lifecycle changes, like views being created or
//!   closed, to whoever wants to hear about them.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//!
//! use chordkit::commands::{Command, CommandMachine};
//! use chordkit::crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
//! use chordkit::key::KeyPress;
//! use chordkit::keychord::{ChordDispatcher, EventTarget, KeymapTree};
//!
//! struct Terminal;
//!
//! impl EventTarget<Event> for Terminal {
//!     fn post_event(&self, _: Event) {}
//! }
//!
//! let mut commands = CommandMachine::new();
//! commands.add_command(Command::new("quit", "Exit the program.", |_| Ok(())));
//!
//! let mut global = KeymapTree::<KeyPress>::new("global");
//! global.define_key("C-x C-c", "quit".into()).unwrap();
//!
//! let mut dispatcher = ChordDispatcher::new(KeyPress::universal());
//! dispatcher.set_global_keymap(Rc::new(global));
//! dispatcher.set_command_registry(Rc::new(commands));
//!
//! let source: Rc<dyn EventTarget<Event>> = Rc::new(Terminal);
//! let ctl_x = Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL));
//! let ctl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
//!
//! assert_eq!(dispatcher.feed(&ctl_x, &source), true);
//! assert_eq!(dispatcher.pending_keys().len(), 1);
//! assert_eq!(dispatcher.feed(&ctl_c, &source), true);
//! assert!(dispatcher.pending_keys().is_empty());
//!
//! // Anything that isn't a key press is left for the application.
//! assert_eq!(dispatcher.feed(&Event::FocusGained, &source), false);
//! ```

// Require docs for public APIs, and disable the more annoying clippy lints.
#![deny(missing_docs)]
#![allow(clippy::bool_to_int_with_if)]
#![allow(clippy::field_reassign_with_default)]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::match_like_matches_macro)]
#![allow(clippy::needless_return)]
#![allow(clippy::new_without_default)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]

#[macro_use]
mod util;

pub mod commands;
pub mod focus;
pub mod hooks;
pub mod key;

pub use crossterm;
pub use keychord;
