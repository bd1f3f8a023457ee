//! # Chord dispatching
//!
//! ## Overview
//!
//! [ChordDispatcher] is the state machine that turns individual keys into command invocations.
//!
//! Each key is handled in one of three ways:
//!
//! * The universal key opens (or multiplies) a [PrefixArgument]
//! * While a prefix argument is open, unmodified digit keys extend it
//! * Any other key is appended to the pending chord, which is then looked up in every active
//!   keymap, local keymap first
//!
//! The pending chord is kept while some keymap still reports a partial match, and is cleared once
//! a command runs or no keymap knows the chord. The prefix argument survives the command it was
//! typed for, so that the command can read it, and is dropped on the next keypress.
//!
use std::rc::Rc;

use tracing::{debug, error};

use crate::commands::{CommandContext, CommandError, CommandRef, CommandRegistry};
use crate::prefix::PrefixArgument;
use crate::redirect::{EventRedirector, EventTarget};
use crate::{InputKey, Keymap, LookupResult, SetLocalKeymap};

/// Somewhere to show the keys typed so far, like a minibuffer or status line.
pub trait EchoArea {
    /// Display an informational message.
    fn show_info(&mut self, msg: &str);
}

impl<F: FnMut(&str)> EchoArea for F {
    fn show_info(&mut self, msg: &str) {
        self(msg)
    }
}

/// Process keys, and run the commands bound to them.
pub struct ChordDispatcher<K: InputKey> {
    /// Keys typed since the last command or unmapped chord.
    keys: Vec<K>,

    /// Keys that built the current prefix argument, shown ahead of the chord.
    trail: Vec<K>,

    prefix: Option<PrefixArgument>,
    reset_prefix: bool,
    universal_key: K,

    local: Option<Rc<dyn Keymap<K>>>,
    global: Option<Rc<dyn Keymap<K>>>,
    use_global: bool,

    commands: Option<Rc<dyn CommandRegistry<K>>>,
    echo: Option<Box<dyn EchoArea>>,
    redirector: EventRedirector<K>,
}

impl<K: InputKey> ChordDispatcher<K> {
    /// Create a new dispatcher that treats `universal_key` as the key for starting a prefix
    /// argument.
    pub fn new(universal_key: K) -> Self {
        ChordDispatcher {
            keys: Vec::new(),
            trail: Vec::new(),
            prefix: None,
            reset_prefix: false,
            universal_key,
            local: None,
            global: None,
            use_global: true,
            commands: None,
            echo: None,
            redirector: EventRedirector::default(),
        }
    }

    /// Set the keymap that is consulted after the local keymap.
    pub fn set_global_keymap(&mut self, keymap: Rc<dyn Keymap<K>>) {
        debug!(keymap = keymap.name(), "global keymap installed");
        self.global = Some(keymap);
    }

    /// Enable or disable lookups in the global keymap.
    pub fn set_global_keymap_enabled(&mut self, enabled: bool) {
        self.use_global = enabled;
    }

    /// Whether lookups currently include the global keymap.
    pub fn global_keymap_enabled(&self) -> bool {
        self.use_global
    }

    /// Replace the local keymap.
    pub fn set_local_keymap(&mut self, keymap: Option<Rc<dyn Keymap<K>>>) {
        match &keymap {
            Some(keymap) => debug!(keymap = keymap.name(), "local keymap activated"),
            None => debug!("local keymap cleared"),
        }

        self.local = keymap;
    }

    /// The current local keymap.
    pub fn local_keymap(&self) -> Option<&Rc<dyn Keymap<K>>> {
        self.local.as_ref()
    }

    /// The keymaps that lookups go through, in the order they are consulted.
    pub fn active_keymaps(&self) -> impl Iterator<Item = &Rc<dyn Keymap<K>>> + '_ {
        let global = self.global.iter().filter(move |_| self.use_global);

        self.local.iter().chain(global)
    }

    /// Set the registry used to resolve commands that are bound by name.
    pub fn set_command_registry(&mut self, commands: Rc<dyn CommandRegistry<K>>) {
        self.commands = Some(commands);
    }

    /// Set where the keys typed so far get displayed.
    pub fn set_echo_area(&mut self, echo: Box<dyn EchoArea>) {
        self.echo = Some(echo);
    }

    /// The key that starts a prefix argument.
    pub fn universal_key(&self) -> &K {
        &self.universal_key
    }

    /// The keys of the chord typed so far.
    pub fn pending_keys(&self) -> &[K] {
        self.keys.as_slice()
    }

    /// The current prefix argument.
    ///
    /// Reading it doesn't clear it. It stays around after the command it was typed for has run,
    /// and goes away on the following keypress.
    pub fn current_prefix_argument(&self) -> Option<PrefixArgument> {
        self.prefix
    }

    /// The redirector that remembers which object received the last key event.
    pub fn redirector(&self) -> &EventRedirector<K> {
        &self.redirector
    }

    /// Abandon the pending chord and any prefix argument.
    pub fn reset(&mut self) {
        self.keys.clear();
        self.trail.clear();
        self.prefix = None;
        self.reset_prefix = false;
    }

    /// Process a raw toolkit event that was delivered to `source`.
    ///
    /// Returns `true` if the event was consumed. Events that aren't key presses are never
    /// consumed, and don't change any state. When this returns `false` the toolkit's default
    /// handling should apply.
    pub fn feed(&mut self, event: &K::Event, source: &Rc<dyn EventTarget<K::Event>>) -> bool {
        let Some(key) = K::from_event(event) else {
            return false;
        };

        self.redirector.set_target(source);

        return self.input_key(key);
    }

    /// Process a typed key.
    ///
    /// Returns `true` if a command ran, the key went towards a prefix argument, or the chord
    /// needs more keys. Returns `false` when the chord isn't bound in any active keymap.
    pub fn input_key(&mut self, key: K) -> bool {
        if self.reset_prefix {
            self.reset_prefix = false;
            self.prefix = None;
            self.trail.clear();
        }

        if key == self.universal_key {
            match self.prefix {
                Some(prefix @ PrefixArgument::Multiplier(_)) => {
                    self.prefix = Some(prefix.repeat());
                },
                _ => {
                    self.prefix = Some(PrefixArgument::universal());
                    self.keys.clear();
                    self.trail.clear();
                },
            }

            self.trail.push(key);
            self.show_keys();

            return true;
        }

        if let (Some(prefix), Some(digit)) = (self.prefix, key.get_digit()) {
            self.prefix = Some(prefix.push_digit(digit));
            self.trail.push(key);
            self.show_keys();

            return true;
        }

        self.keys.push(key);
        self.show_keys();

        let keymaps: Vec<Rc<dyn Keymap<K>>> = self.active_keymaps().cloned().collect();
        let mut called = false;
        let mut incomplete = false;

        // Every active keymap gets looked up, even after one of them has run a command.
        for keymap in keymaps {
            match keymap.lookup(&self.keys) {
                LookupResult::NoMatch => {},
                LookupResult::Partial => {
                    if !called {
                        incomplete = true;
                    }
                },
                LookupResult::Complete(command) => {
                    if let Err(e) = self.call_command(&command) {
                        error!(keymap = keymap.name(), "Error calling command: {e}");
                    }

                    called = true;
                },
            }
        }

        if called || !incomplete {
            self.keys.clear();
        }

        if called {
            self.reset_prefix = true;
        }

        return called || incomplete;
    }

    /// Resolve and run a command with the current chord and prefix argument.
    ///
    /// Commands bound by name are looked up in the command registry, and unknown names produce
    /// [CommandError::NoSuchCommand].
    pub fn call_command(&self, command: &CommandRef<K>) -> Result<(), CommandError> {
        let f = command.resolve(self.commands.as_deref())?;
        let ctx = CommandContext::new(self.keys.as_slice(), self.prefix, &self.redirector);

        f(&ctx)
    }

    fn show_keys(&mut self) {
        let desc = self
            .trail
            .iter()
            .chain(self.keys.iter())
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");

        debug!(keys = desc.as_str(), "keychord");

        if let Some(echo) = self.echo.as_mut() {
            echo.show_info(desc.as_str());
        }
    }
}

impl<K: InputKey> SetLocalKeymap<K> for ChordDispatcher<K> {
    fn set_local_keymap(&mut self, keymap: Option<Rc<dyn Keymap<K>>>) {
        ChordDispatcher::set_local_keymap(self, keymap)
    }
}
