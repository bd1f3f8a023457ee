//! # Keymaps
//!
//! ## Overview
//!
//! [KeymapTree] is a prefix tree of key sequences, where each node can hold a [CommandRef]. It
//! implements the [Keymap] lookup contract used by the [ChordDispatcher](crate::ChordDispatcher),
//! and can inherit bindings from a parent keymap.
//!
use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

use crate::commands::CommandRef;
use crate::{InputKey, Keymap, LookupResult};

/// Errors that occur while adding bindings to a keymap.
#[derive(thiserror::Error, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum KeymapError {
    /// A binding needs at least one key.
    #[error("Empty key sequence")]
    EmptySequence,

    /// Failure to interpret a key sequence description.
    #[error("Invalid key sequence {0:?}: {1}")]
    InvalidKeys(String, String),
}

/// A collection of bindings that can be added to a [KeymapTree].
pub trait KeyBindings<K: InputKey> {
    /// Add new bindings to a [KeymapTree] instance.
    fn setup(&self, keymap: &mut KeymapTree<K>) -> Result<(), KeymapError>;
}

#[derive(Debug, Default)]
struct IdGenerator {
    next_id: u64,
}

impl IdGenerator {
    pub fn next(&mut self) -> NodeId {
        let id = self.next_id;

        if self.next_id == u64::MAX {
            panic!("no more node IDs available!");
        }

        self.next_id += 1;

        return NodeId(id);
    }
}

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
struct NodeId(u64);

/// A named tree of key sequences.
pub struct KeymapTree<K: InputKey> {
    name: String,
    idgen: IdGenerator,
    root: NodeId,
    edges: HashMap<NodeId, HashMap<K, NodeId>>,
    commands: HashMap<NodeId, CommandRef<K>>,
    parent: Option<Rc<dyn Keymap<K>>>,
}

impl<K: InputKey> KeymapTree<K> {
    /// Create a new keymap without any bindings.
    pub fn new<T: Into<String>>(name: T) -> Self {
        let mut idgen = IdGenerator::default();
        let root = idgen.next();

        KeymapTree {
            name: name.into(),
            idgen,
            root,
            edges: HashMap::new(),
            commands: HashMap::new(),
            parent: None,
        }
    }

    /// Create a keymap that contains the bindings provided by `B`.
    pub fn from_bindings<B: KeyBindings<K> + Default, T: Into<String>>(
        name: T,
    ) -> Result<Self, KeymapError> {
        let mut keymap = KeymapTree::new(name);

        B::default().setup(&mut keymap)?;

        Ok(keymap)
    }

    /// Consult `parent` for sequences that this keymap doesn't bind.
    pub fn with_parent(mut self, parent: Rc<dyn Keymap<K>>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Bind a sequence of keys to a command.
    ///
    /// Binding a sequence that's already bound replaces the previous command. A bound sequence
    /// takes precedence over any longer sequences that start with it.
    pub fn bind(&mut self, keys: &[K], command: CommandRef<K>) -> Result<(), KeymapError> {
        if keys.is_empty() {
            return Err(KeymapError::EmptySequence);
        }

        let mut curr = self.root;

        for key in keys {
            curr = match self.get_edge(curr, key) {
                Some(id) => id,
                None => {
                    let id = self.idgen.next();
                    self.edges.entry(curr).or_default().insert(key.clone(), id);
                    id
                },
            };
        }

        self.commands.insert(curr, command);

        Ok(())
    }

    /// Remove the command bound to a sequence of keys, returning whether there was one.
    pub fn unbind(&mut self, keys: &[K]) -> bool {
        match self.walk(keys) {
            Some(id) => self.commands.remove(&id).is_some(),
            None => false,
        }
    }

    fn get_edge(&self, id: NodeId, key: &K) -> Option<NodeId> {
        self.edges.get(&id).and_then(|m| m.get(key)).copied()
    }

    fn has_edges(&self, id: NodeId) -> bool {
        self.edges.get(&id).map(|es| !es.is_empty()).unwrap_or(false)
    }

    fn walk(&self, keys: &[K]) -> Option<NodeId> {
        let mut curr = self.root;

        for key in keys {
            curr = self.get_edge(curr, key)?;
        }

        Some(curr)
    }

    fn lookup_own(&self, keys: &[K]) -> LookupResult<K> {
        if keys.is_empty() {
            return LookupResult::NoMatch;
        }

        match self.walk(keys) {
            None => LookupResult::NoMatch,
            Some(id) => {
                if let Some(cmd) = self.commands.get(&id) {
                    LookupResult::Complete(cmd.clone())
                } else if self.has_edges(id) {
                    LookupResult::Partial
                } else {
                    LookupResult::NoMatch
                }
            },
        }
    }
}

impl<K> KeymapTree<K>
where
    K: InputKey,
    K::Error: Display,
{
    fn parse_keys(desc: &str) -> Result<Vec<K>, KeymapError> {
        K::from_chord_str(desc).map_err(|e| KeymapError::InvalidKeys(desc.into(), e.to_string()))
    }

    /// Bind the keys described by `desc`, such as `"C-x C-f"`, to a command.
    pub fn define_key(&mut self, desc: &str, command: CommandRef<K>) -> Result<(), KeymapError> {
        let keys = Self::parse_keys(desc)?;

        self.bind(&keys, command)
    }

    /// Remove the command bound to the keys described by `desc`.
    pub fn undefine_key(&mut self, desc: &str) -> Result<bool, KeymapError> {
        let keys = Self::parse_keys(desc)?;

        Ok(self.unbind(&keys))
    }
}

impl<K: InputKey> Keymap<K> for KeymapTree<K> {
    fn lookup(&self, keys: &[K]) -> LookupResult<K> {
        match (self.lookup_own(keys), &self.parent) {
            (LookupResult::NoMatch, Some(parent)) => parent.lookup(keys),
            (res, _) => res,
        }
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(keymap: &KeymapTree<char>, keys: &str) -> Option<String> {
        let keys: Vec<char> = keys.chars().collect();

        match keymap.lookup(&keys) {
            LookupResult::Complete(CommandRef::Named(name)) => Some(name),
            _ => None,
        }
    }

    fn is_partial(keymap: &dyn Keymap<char>, keys: &str) -> bool {
        let keys: Vec<char> = keys.chars().collect();

        matches!(keymap.lookup(&keys), LookupResult::Partial)
    }

    fn is_miss(keymap: &dyn Keymap<char>, keys: &str) -> bool {
        let keys: Vec<char> = keys.chars().collect();

        matches!(keymap.lookup(&keys), LookupResult::NoMatch)
    }

    #[derive(Default)]
    struct TestBindings {}

    impl KeyBindings<char> for TestBindings {
        fn setup(&self, keymap: &mut KeymapTree<char>) -> Result<(), KeymapError> {
            keymap.define_key("g g", "scroll-top".into())?;
            keymap.define_key("G", "scroll-bottom".into())?;
            keymap.define_key("x b", "switch-buffer".into())?;
            keymap.define_key("x k", "kill-buffer".into())?;

            Ok(())
        }
    }

    #[test]
    fn test_lookup() {
        let keymap = KeymapTree::from_bindings::<TestBindings, _>("test").unwrap();

        assert_eq!(keymap.name(), "test");

        assert!(is_partial(&keymap, "g"));
        assert_eq!(named(&keymap, "gg"), Some("scroll-top".into()));
        assert_eq!(named(&keymap, "G"), Some("scroll-bottom".into()));
        assert!(is_partial(&keymap, "x"));
        assert_eq!(named(&keymap, "xb"), Some("switch-buffer".into()));
        assert_eq!(named(&keymap, "xk"), Some("kill-buffer".into()));

        assert!(is_miss(&keymap, "q"));
        assert!(is_miss(&keymap, "xq"));
        assert!(is_miss(&keymap, "ggg"));
        assert!(is_miss(&keymap, ""));
    }

    #[test]
    fn test_rebind() {
        let mut keymap = KeymapTree::from_bindings::<TestBindings, _>("test").unwrap();

        keymap.define_key("g g", "goto-top".into()).unwrap();
        assert_eq!(named(&keymap, "gg"), Some("goto-top".into()));

        // Binding a prefix shadows the longer sequences.
        keymap.define_key("x", "execute".into()).unwrap();
        assert_eq!(named(&keymap, "x"), Some("execute".into()));

        // Removing it exposes them again.
        assert_eq!(keymap.undefine_key("x"), Ok(true));
        assert_eq!(keymap.undefine_key("x"), Ok(false));
        assert!(is_partial(&keymap, "x"));

        // Removing the only binding below a node leaves nothing to match.
        assert_eq!(keymap.undefine_key("G"), Ok(true));
        assert!(is_miss(&keymap, "G"));
    }

    #[test]
    fn test_empty_binding() {
        let mut keymap = KeymapTree::<char>::new("test");

        assert_eq!(keymap.define_key("", "nothing".into()), Err(KeymapError::EmptySequence));
        assert_eq!(keymap.define_key("  ", "nothing".into()), Err(KeymapError::EmptySequence));
    }

    #[test]
    fn test_parent() {
        let parent = KeymapTree::from_bindings::<TestBindings, _>("parent").unwrap();
        let mut child = KeymapTree::<char>::new("child").with_parent(Rc::new(parent));

        child.define_key("G", "end-of-page".into()).unwrap();
        child.define_key("x f", "find-file".into()).unwrap();

        // The child's bindings take precedence.
        assert_eq!(named(&child, "G"), Some("end-of-page".into()));
        assert_eq!(named(&child, "xf"), Some("find-file".into()));

        // Unmapped sequences fall back to the parent.
        assert!(is_partial(&child, "g"));
        assert_eq!(named(&child, "gg"), Some("scroll-top".into()));

        // Sequences under a shared prefix that the child doesn't bind still reach the parent.
        assert!(is_partial(&child, "x"));
        assert_eq!(named(&child, "xb"), Some("switch-buffer".into()));
        assert!(is_miss(&child, "q"));
    }
}
