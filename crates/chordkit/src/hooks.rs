//! # Lifecycle hooks
//!
//! ## Overview
//!
//! A [Hook] is an ordered list of callbacks that get run when the application announces that
//! something happened, like a view being created or closed. This is how the pieces of an
//! application can react to each other without the announcer knowing who's listening.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use chordkit::hooks::Hook;
//!
//! let opened = Rc::new(RefCell::new(vec![]));
//! let mut view_created: Hook<String> = Hook::default();
//!
//! let log = opened.clone();
//! let id = view_created.add(move |name: &String| log.borrow_mut().push(name.clone()));
//!
//! view_created.call(&"*scratch*".to_string());
//! assert_eq!(opened.borrow().as_slice(), &["*scratch*".to_string()]);
//!
//! assert_eq!(view_created.remove_if_exists(id), true);
//! view_created.call(&"*messages*".to_string());
//! assert_eq!(opened.borrow().len(), 1);
//! ```
use crate::util::IdGenerator;

/// Identifies a callback added to a [Hook].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct HookId(u64);

/// An ordered list of callbacks that receive a `&A` when called.
pub struct Hook<A> {
    idgen: IdGenerator,
    callbacks: Vec<(HookId, Box<dyn Fn(&A)>)>,
}

impl<A> Hook<A> {
    /// Create a hook without any callbacks.
    pub fn new() -> Self {
        Hook { idgen: IdGenerator::default(), callbacks: vec![] }
    }

    /// Add a callback to run after the ones already present.
    pub fn add<F: Fn(&A) + 'static>(&mut self, callback: F) -> HookId {
        let id = HookId(self.idgen.next());

        self.callbacks.push((id, Box::new(callback)));

        id
    }

    /// Remove a callback, returning whether it was present.
    pub fn remove_if_exists(&mut self, id: HookId) -> bool {
        let len = self.callbacks.len();

        self.callbacks.retain(|(cid, _)| *cid != id);

        self.callbacks.len() != len
    }

    /// Run every callback, in the order they were added.
    pub fn call(&self, arg: &A) {
        for (_, callback) in self.callbacks.iter() {
            callback(arg);
        }
    }

    /// The number of callbacks in this hook.
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Whether this hook has no callbacks.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<A> Default for Hook<A> {
    fn default() -> Self {
        Hook::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::focus::{KeymapContextSwitcher, UiEvent, View};
    use crate::key::KeyPress;
    use keychord::{ChordDispatcher, Keymap, KeymapTree};

    #[test]
    fn test_call_order() {
        let seen = Rc::new(RefCell::new(vec![]));
        let mut hook = Hook::new();

        for n in 0..3usize {
            let seen = seen.clone();
            hook.add(move |arg: &usize| seen.borrow_mut().push(n * 10 + *arg));
        }

        assert_eq!(hook.len(), 3);
        hook.call(&1);
        assert_eq!(seen.borrow().as_slice(), &[1, 11, 21]);
    }

    #[test]
    fn test_remove() {
        let count = Rc::new(Cell::new(0));
        let mut hook = Hook::<()>::new();

        let c = count.clone();
        let a = hook.add(move |_| c.set(c.get() + 1));
        let c = count.clone();
        let b = hook.add(move |_| c.set(c.get() + 10));

        assert_ne!(a, b);
        assert_eq!(hook.remove_if_exists(a), true);
        assert_eq!(hook.remove_if_exists(a), false);

        hook.call(&());
        assert_eq!(count.get(), 10);

        assert_eq!(hook.remove_if_exists(b), true);
        assert_eq!(hook.is_empty(), true);

        hook.call(&());
        assert_eq!(count.get(), 10);
    }

    struct Buffer {
        keymap: Rc<dyn Keymap<KeyPress>>,
    }

    impl View<KeyPress> for Buffer {
        fn keymap(&self) -> Rc<dyn Keymap<KeyPress>> {
            self.keymap.clone()
        }

        fn content_edit_keymap(&self) -> Rc<dyn Keymap<KeyPress>> {
            self.keymap.clone()
        }
    }

    #[test]
    fn test_switcher_hooks() {
        type Shared<T> = Rc<RefCell<T>>;

        let switcher: Shared<KeymapContextSwitcher<KeyPress>> = Shared::default();
        let dispatcher = Rc::new(RefCell::new(ChordDispatcher::new(KeyPress::universal())));
        let ids = Rc::new(RefCell::new(vec![]));

        let mut view_created: Hook<Rc<Buffer>> = Hook::new();
        let mut view_closed: Hook<usize> = Hook::new();

        let (s, i) = (switcher.clone(), ids.clone());
        view_created.add(move |view| i.borrow_mut().push(s.borrow_mut().register_view(view)));

        let (s, d, i) = (switcher.clone(), dispatcher.clone(), ids.clone());
        view_closed.add(move |idx| {
            let id = i.borrow()[*idx];
            s.borrow_mut().handle_event(id, UiEvent::Destroyed, &mut *d.borrow_mut());
        });

        let buffer = Rc::new(Buffer { keymap: Rc::new(KeymapTree::<KeyPress>::new("buffer")) });
        view_created.call(&buffer);

        let id = ids.borrow()[0];
        assert_eq!(switcher.borrow().is_registered(id), true);

        switcher
            .borrow_mut()
            .handle_event(id, UiEvent::WindowActivate, &mut *dispatcher.borrow_mut());
        assert!(dispatcher.borrow().local_keymap().is_some());

        view_closed.call(&0);
        assert_eq!(switcher.borrow().is_registered(id), false);
        assert!(dispatcher.borrow().local_keymap().is_none());
    }
}
