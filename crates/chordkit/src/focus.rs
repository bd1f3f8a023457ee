//! # Focus-driven keymap switching
//!
//! ## Overview
//!
//! The [KeymapContextSwitcher] watches lifecycle events for the views and modal inputs that it
//! has been told about, and decides which keymap should be the local keymap of a
//! [ChordDispatcher](keychord::ChordDispatcher), or of anything else that implements
//! [SetLocalKeymap].
//!
//! The switcher never keeps the objects it tracks alive. When an object goes away, the
//! application should send [UiEvent::Destroyed] for it; if it forgets to, the next event that
//! mentions the object is handled as its destruction.
//!
//! ```
//! use std::rc::Rc;
//!
//! use chordkit::focus::{KeymapContext, KeymapContextSwitcher, UiEvent, View};
//! use chordkit::key::KeyPress;
//! use chordkit::keychord::{ChordDispatcher, Keymap, KeymapTree};
//!
//! struct Page {
//!     keymap: Rc<dyn Keymap<KeyPress>>,
//!     edit: Rc<dyn Keymap<KeyPress>>,
//! }
//!
//! impl View<KeyPress> for Page {
//!     fn keymap(&self) -> Rc<dyn Keymap<KeyPress>> {
//!         self.keymap.clone()
//!     }
//!
//!     fn content_edit_keymap(&self) -> Rc<dyn Keymap<KeyPress>> {
//!         self.edit.clone()
//!     }
//! }
//!
//! let page = Rc::new(Page {
//!     keymap: Rc::new(KeymapTree::<KeyPress>::new("page")),
//!     edit: Rc::new(KeymapTree::<KeyPress>::new("page-edit")),
//! });
//!
//! let mut dispatcher = ChordDispatcher::new(KeyPress::universal());
//! let mut switcher = KeymapContextSwitcher::new();
//! let id = switcher.register_view(&page);
//!
//! switcher.handle_event(id, UiEvent::WindowActivate, &mut dispatcher);
//! assert_eq!(switcher.current_context(), Some(KeymapContext::View(id)));
//! assert_eq!(dispatcher.local_keymap().map(|k| k.name().to_string()), Some("page".into()));
//!
//! switcher.content_edit_focus_changed(id, true, &mut dispatcher);
//! assert_eq!(dispatcher.local_keymap().map(|k| k.name().to_string()), Some("page-edit".into()));
//! ```
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use bitflags::bitflags;
use tracing::{debug, warn};

use keychord::{InputKey, Keymap, SetLocalKeymap};

use crate::util::IdGenerator;

/// A foreground view, such as a browser buffer, that owns a keymap.
pub trait View<K: InputKey> {
    /// The keymap to use while this view is active.
    fn keymap(&self) -> Rc<dyn Keymap<K>>;

    /// The keymap to use while an editable region inside this view has focus.
    fn content_edit_keymap(&self) -> Rc<dyn Keymap<K>>;
}

/// An input overlay, such as a command or search prompt, that temporarily takes focus from a view.
pub trait ModalInput<K: InputKey> {
    /// The keymap to use while this input has focus.
    fn keymap(&self) -> Rc<dyn Keymap<K>>;

    /// Whether this input's completion popup is currently showing.
    ///
    /// Focus moves to the popup while it's visible, so losing focus then doesn't mean that the
    /// input is done.
    fn popup_visible(&self) -> bool;

    /// The registered view whose keymap should come back when this input loses focus.
    fn owner_view(&self) -> Option<ObjectId>;
}

/// Identifies an object registered with a [KeymapContextSwitcher].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ObjectId(u64);

bitflags! {
    /// The kinds of lifecycle events that a registered object is observed for.
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub struct EventKinds: u8 {
        /// The object became the foreground window.
        const ACTIVATE = 0b0001;

        /// The object gained input focus.
        const FOCUS_IN = 0b0010;

        /// The object lost input focus.
        const FOCUS_OUT = 0b0100;

        /// The object was destroyed.
        const DESTROY = 0b1000;
    }
}

/// Lifecycle events reported by the UI toolkit.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum UiEvent {
    /// The object became the foreground window.
    WindowActivate,

    /// The object gained input focus.
    FocusIn,

    /// The object lost input focus.
    FocusOut,

    /// The object was destroyed or closed.
    Destroyed,
}

impl UiEvent {
    /// The flag that an object needs to be registered with to observe this event.
    pub fn kind(&self) -> EventKinds {
        match self {
            UiEvent::WindowActivate => EventKinds::ACTIVATE,
            UiEvent::FocusIn => EventKinds::FOCUS_IN,
            UiEvent::FocusOut => EventKinds::FOCUS_OUT,
            UiEvent::Destroyed => EventKinds::DESTROY,
        }
    }
}

/// Which registered object supplied the current local keymap.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum KeymapContext {
    /// A view's normal keymap.
    View(ObjectId),

    /// The keymap for editing content inside a view.
    ContentEdit(ObjectId),

    /// A modal input's keymap.
    ModalInput(ObjectId),
}

impl KeymapContext {
    /// The object that supplied the keymap.
    pub fn object(&self) -> ObjectId {
        match self {
            KeymapContext::View(id) => *id,
            KeymapContext::ContentEdit(id) => *id,
            KeymapContext::ModalInput(id) => *id,
        }
    }
}

enum Registered<K: InputKey> {
    View(Weak<dyn View<K>>),
    ModalInput(Weak<dyn ModalInput<K>>),
}

impl<K: InputKey> Clone for Registered<K> {
    fn clone(&self) -> Self {
        match self {
            Registered::View(v) => Registered::View(v.clone()),
            Registered::ModalInput(i) => Registered::ModalInput(i.clone()),
        }
    }
}

struct Registration<K: InputKey> {
    object: Registered<K>,
    events: EventKinds,
}

/// Decides which keymap is local based on UI focus and activation events.
pub struct KeymapContextSwitcher<K: InputKey> {
    idgen: IdGenerator,
    objects: HashMap<ObjectId, Registration<K>>,
    current: Option<KeymapContext>,
    focused_input: Option<ObjectId>,
    fallback_view: Option<ObjectId>,
}

impl<K: InputKey> KeymapContextSwitcher<K> {
    /// Create a new switcher that isn't tracking anything.
    pub fn new() -> Self {
        KeymapContextSwitcher {
            idgen: IdGenerator::default(),
            objects: HashMap::new(),
            current: None,
            focused_input: None,
            fallback_view: None,
        }
    }

    fn register(&mut self, object: Registered<K>, events: EventKinds) -> ObjectId {
        let id = ObjectId(self.idgen.next());

        self.objects.insert(id, Registration { object, events });

        id
    }

    /// Start observing activation and destruction of a view.
    pub fn register_view<V: View<K> + 'static>(&mut self, view: &Rc<V>) -> ObjectId {
        let weak: Weak<V> = Rc::downgrade(view);
        let weak: Weak<dyn View<K>> = weak;
        let id = self.register(Registered::View(weak), EventKinds::ACTIVATE | EventKinds::DESTROY);

        debug!(?id, "registered view");

        id
    }

    /// Start observing focus changes and destruction of a modal input.
    pub fn register_modal_input<I: ModalInput<K> + 'static>(&mut self, input: &Rc<I>) -> ObjectId {
        let weak: Weak<I> = Rc::downgrade(input);
        let weak: Weak<dyn ModalInput<K>> = weak;
        let events = EventKinds::FOCUS_IN | EventKinds::FOCUS_OUT | EventKinds::DESTROY;
        let id = self.register(Registered::ModalInput(weak), events);

        debug!(?id, "registered modal input");

        id
    }

    /// Whether `id` is still being observed.
    pub fn is_registered(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// The event kinds that `id` is observed for, if it's registered.
    pub fn subscriptions(&self, id: ObjectId) -> Option<EventKinds> {
        self.objects.get(&id).map(|r| r.events)
    }

    /// Which object supplied the current local keymap.
    pub fn current_context(&self) -> Option<KeymapContext> {
        self.current
    }

    /// The modal input that currently holds focus, if any.
    pub fn focused_input(&self) -> Option<ObjectId> {
        self.focused_input
    }

    /// Process a lifecycle event for a registered object, updating the local keymap in `target`.
    ///
    /// Events for unknown objects, and events that the object isn't observed for, are ignored.
    pub fn handle_event(
        &mut self,
        id: ObjectId,
        event: UiEvent,
        target: &mut dyn SetLocalKeymap<K>,
    ) {
        let Some(reg) = self.objects.get(&id) else {
            debug!(?id, ?event, "ignoring event for unregistered object");
            return;
        };

        if !reg.events.contains(event.kind()) {
            return;
        }

        if event == UiEvent::Destroyed {
            self.unregister(id, target);
            return;
        }

        match reg.object.clone() {
            Registered::View(view) => {
                let Some(view) = view.upgrade() else {
                    warn!(?id, ?event, "view was dropped without being unregistered");
                    self.unregister(id, target);
                    return;
                };

                // Views are only observed for activation.
                self.activate(KeymapContext::View(id), view.keymap(), target);
            },
            Registered::ModalInput(input) => {
                let Some(input) = input.upgrade() else {
                    warn!(?id, ?event, "modal input was dropped without being unregistered");
                    self.unregister(id, target);
                    return;
                };

                match event {
                    UiEvent::FocusIn => {
                        self.focused_input = Some(id);
                        self.fallback_view = input.owner_view();
                        self.activate(KeymapContext::ModalInput(id), input.keymap(), target);
                    },
                    UiEvent::FocusOut => {
                        if input.popup_visible() {
                            debug!(?id, "input lost focus to its popup");
                            return;
                        }

                        if self.focused_input == Some(id) {
                            self.focused_input = None;
                        }

                        self.activate_view(input.owner_view(), target);
                    },
                    UiEvent::WindowActivate | UiEvent::Destroyed => {},
                }
            },
        }
    }

    /// Process the editable content inside view `id` gaining (`enabled`) or losing focus.
    ///
    /// When it loses focus, the view's normal keymap comes back, unless another object has
    /// supplied the local keymap or a modal input has taken focus in the meantime.
    pub fn content_edit_focus_changed(
        &mut self,
        id: ObjectId,
        enabled: bool,
        target: &mut dyn SetLocalKeymap<K>,
    ) {
        let Some(view) = self.get_view(id) else {
            debug!(?id, "ignoring content edit focus for unknown view");
            return;
        };

        if enabled {
            self.activate(KeymapContext::ContentEdit(id), view.content_edit_keymap(), target);
        } else if !matches!(
            self.current,
            Some(KeymapContext::ContentEdit(cid) | KeymapContext::View(cid)) if cid == id
        ) {
            debug!(?id, current = ?self.current, "content edit ended in a background view");
        } else if let Some(input) = self.focused_input {
            debug!(?id, ?input, "content edit ended while an input has focus");
        } else {
            self.activate(KeymapContext::View(id), view.keymap(), target);
        }
    }

    fn get_view(&self, id: ObjectId) -> Option<Rc<dyn View<K>>> {
        match &self.objects.get(&id)?.object {
            Registered::View(view) => view.upgrade(),
            Registered::ModalInput(_) => None,
        }
    }

    fn activate(
        &mut self,
        context: KeymapContext,
        keymap: Rc<dyn Keymap<K>>,
        target: &mut dyn SetLocalKeymap<K>,
    ) {
        debug!(?context, keymap = keymap.name(), "switching local keymap");

        self.current = Some(context);
        target.set_local_keymap(Some(keymap));
    }

    fn activate_view(&mut self, id: Option<ObjectId>, target: &mut dyn SetLocalKeymap<K>) {
        match id.and_then(|id| Some((id, self.get_view(id)?))) {
            Some((id, view)) => {
                self.activate(KeymapContext::View(id), view.keymap(), target);
            },
            None => {
                warn!(?id, "no live view to return to; clearing local keymap");
                self.deactivate(target);
            },
        }
    }

    fn deactivate(&mut self, target: &mut dyn SetLocalKeymap<K>) {
        self.current = None;
        target.set_local_keymap(None);
    }

    fn unregister(&mut self, id: ObjectId, target: &mut dyn SetLocalKeymap<K>) {
        self.objects.remove(&id);

        if self.focused_input == Some(id) {
            self.focused_input = None;
        }

        debug!(?id, "unregistered object");

        match self.current {
            Some(KeymapContext::View(cid) | KeymapContext::ContentEdit(cid)) if cid == id => {
                self.deactivate(target);
            },
            Some(KeymapContext::ModalInput(cid)) if cid == id => {
                self.activate_view(self.fallback_view, target);
            },
            _ => {},
        }
    }
}

impl<K: InputKey> Default for KeymapContextSwitcher<K> {
    fn default() -> Self {
        KeymapContextSwitcher::new()
    }
}
