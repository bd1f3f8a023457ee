//! # Event redirection
//!
//! Commands sometimes intercept a key that the focused UI object should have seen after all. The
//! [EventRedirector] remembers which object received the most recent key event, without keeping
//! it alive, and can replay keys to it.
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::{InputKey, KeyPhase};

/// A UI object that can have raw events posted to it through the toolkit's event queue.
pub trait EventTarget<E> {
    /// Queue an event for delivery to this object.
    fn post_event(&self, event: E);
}

/// Replays keys to the object that received the last key event.
pub struct EventRedirector<K: InputKey> {
    target: Option<Weak<dyn EventTarget<K::Event>>>,
}

impl<K: InputKey> EventRedirector<K> {
    /// Remember `target` as the object that received the most recent key event.
    pub fn set_target(&mut self, target: &Rc<dyn EventTarget<K::Event>>) {
        self.target = Some(Rc::downgrade(target));
    }

    /// Forget the current target.
    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Whether there is a target that is still alive.
    pub fn has_target(&self) -> bool {
        self.target.as_ref().map(|t| t.strong_count() > 0).unwrap_or(false)
    }

    /// Post a press and then a release of `key` to the target.
    ///
    /// If the target has been destroyed, or there never was one, this does nothing and returns
    /// `false`.
    pub fn send_key(&self, key: &K) -> bool {
        let Some(target) = self.target.as_ref().and_then(Weak::upgrade) else {
            debug!(%key, "no live target for redirected key");
            return false;
        };

        target.post_event(key.to_event(KeyPhase::Press));
        target.post_event(key.to_event(KeyPhase::Release));

        return true;
    }
}

impl<K: InputKey> Default for EventRedirector<K> {
    fn default() -> Self {
        EventRedirector { target: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<char>>,
    }

    impl EventTarget<char> for Recorder {
        fn post_event(&self, event: char) {
            self.events.borrow_mut().push(event);
        }
    }

    #[test]
    fn test_send_key() {
        let recorder = Rc::new(Recorder::default());
        let target: Rc<dyn EventTarget<char>> = recorder.clone();
        let mut redirector = EventRedirector::<char>::default();

        assert_eq!(redirector.has_target(), false);
        assert_eq!(redirector.send_key(&'a'), false);

        redirector.set_target(&target);
        assert_eq!(redirector.has_target(), true);
        assert_eq!(redirector.send_key(&'a'), true);
        assert_eq!(recorder.events.borrow().as_slice(), &['a', 'a']);

        redirector.clear_target();
        assert_eq!(redirector.send_key(&'b'), false);
        assert_eq!(recorder.events.borrow().len(), 2);
    }

    #[test]
    fn test_expired_target() {
        let mut redirector = EventRedirector::<char>::default();

        {
            let target: Rc<dyn EventTarget<char>> = Rc::new(Recorder::default());
            redirector.set_target(&target);
            assert_eq!(redirector.has_target(), true);
        }

        // The redirector doesn't keep its target alive.
        assert_eq!(redirector.has_target(), false);
        assert_eq!(redirector.send_key(&'a'), false);
    }
}
