use std::borrow::Borrow;

use radix_trie::{SubTrie, Trie, TrieCommon, TrieKey};

#[allow(unused_macros)]
macro_rules! key {
    ($ch: literal) => {
        $crate::key::KeyPress::from(::crossterm::event::KeyCode::Char($ch))
    };
    ($kc: expr) => {
        $crate::key::KeyPress::from($kc)
    };
    ($ch: literal, $km: expr) => {
        $crate::key::KeyPress::new(::crossterm::event::KeyCode::Char($ch), $km)
    };
    ($kc: expr, $km: expr) => {
        $crate::key::KeyPress::new($kc, $km)
    };
}

#[allow(unused_macros)]
macro_rules! ctl {
    ($ch: literal) => {
        key!($ch, ::crossterm::event::KeyModifiers::CONTROL)
    };
}

#[allow(unused_macros)]
macro_rules! strs {
    ( $( $ss: expr ),* ) => {
        vec![ $( String::from($ss), )* ]
    };
}

#[derive(Debug, Default)]
pub(crate) struct IdGenerator {
    next_id: u64,
}

impl IdGenerator {
    pub fn next(&mut self) -> u64 {
        let id = self.next_id;

        if self.next_id == u64::MAX {
            panic!("no more IDs available!");
        }

        self.next_id += 1;

        return id;
    }
}

/// Internal upper limit on number of completions to return.
pub(crate) const MAX_COMPLETIONS: usize = 500;

#[inline]
pub(crate) fn subtrie_keys<K, V>(subtrie: SubTrie<K, V>) -> Vec<K>
where
    K: Clone + TrieKey,
{
    subtrie.keys().take(MAX_COMPLETIONS).cloned().collect()
}

#[inline]
pub(crate) fn completion_keys<K, V>(trie: &Trie<K, V>, prefix: &str) -> Vec<K>
where
    K: Borrow<str> + Clone + TrieKey,
{
    trie.get_raw_descendant(prefix).map(subtrie_keys).unwrap_or_default()
}
