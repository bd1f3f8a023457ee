//! # Input keys
//!
//! ## Overview
//!
//! This module contains [KeyPress], which represents a key read from the terminal, and implements
//! [InputKey] for it so that it can drive a [ChordDispatcher](keychord::ChordDispatcher).
//!
//! Keys are written the way Emacs writes them: modifier prefixes (`C-`, `M-`, `S-`, `s-` and `H-`)
//! followed by a character, an uppercase key name (`RET`, `TAB`, `SPC`, `ESC`, `DEL`) or a function
//! key name in angle brackets (`<f1>`, `<left>`, `<prior>`, ...). A chord is written as a
//! whitespace-separated sequence of keys, like `"C-x C-f"`.
//!
//! ```
//! use chordkit::crossterm::event::{KeyCode, KeyModifiers};
//! use chordkit::key::KeyPress;
//! use chordkit::keychord::InputKey;
//!
//! let keys = KeyPress::from_chord_str("C-x <left>").unwrap();
//!
//! assert_eq!(keys, vec![
//!     KeyPress::new(KeyCode::Char('x'), KeyModifiers::CONTROL),
//!     KeyPress::from(KeyCode::Left),
//! ]);
//! assert_eq!(keys[0].to_string(), "C-x");
//! ```
use std::fmt;
use std::str::FromStr;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use keychord::{InputKey, KeyPhase};

use self::parse::{parse_chord_str, parse_key_str};

mod parse;

/// Errors that occur while interpreting key descriptions.
#[derive(thiserror::Error, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ChordParseError {
    /// Failure to interpret a key description.
    #[error("Invalid key chord: {0:?}")]
    InvalidChord(String),

    /// A description that doesn't contain any keys.
    #[error("Empty key chord")]
    EmptyChord,
}

const MODIFIER_PREFIXES: [(KeyModifiers, &str); 5] = [
    (KeyModifiers::CONTROL, "C-"),
    (KeyModifiers::ALT, "M-"),
    (KeyModifiers::SHIFT, "S-"),
    (KeyModifiers::SUPER, "s-"),
    (KeyModifiers::HYPER, "H-"),
];

/// A key pressed in a terminal.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct KeyPress {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl KeyPress {
    /// Create a new key, normalizing its modifiers so that equivalent presses compare equal.
    ///
    /// Shifted characters are represented by their uppercase form without [KeyModifiers::SHIFT],
    /// Shift+Tab becomes [KeyCode::BackTab], and Meta is folded into Alt.
    pub fn new(mut code: KeyCode, mut modifiers: KeyModifiers) -> Self {
        if modifiers.contains(KeyModifiers::META) {
            modifiers -= KeyModifiers::META;
            modifiers |= KeyModifiers::ALT;
        }

        match code {
            KeyCode::Char(c) => {
                if modifiers.contains(KeyModifiers::SHIFT) {
                    code = KeyCode::Char(c.to_ascii_uppercase());
                }

                // SHIFT only shows up for some characters on some platforms, so it gets removed
                // to keep hashing and comparisons consistent.
                modifiers -= KeyModifiers::SHIFT;
            },
            KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => {
                code = KeyCode::BackTab;
                modifiers -= KeyModifiers::SHIFT;
            },
            KeyCode::BackTab => {
                modifiers -= KeyModifiers::SHIFT;
            },
            _ => {},
        }

        Self { code, modifiers }
    }

    /// The `C-u` key, which Emacs uses to start a prefix argument.
    pub fn universal() -> Self {
        KeyPress::new(KeyCode::Char('u'), KeyModifiers::CONTROL)
    }

    /// The key that was pressed.
    pub fn code(&self) -> KeyCode {
        self.code
    }

    /// The modifiers held down while the key was pressed.
    pub fn modifiers(&self) -> KeyModifiers {
        self.modifiers
    }

    /// Return the character this key types, if it's an unmodified character key.
    pub fn get_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if self.modifiers.is_empty() => Some(c),
            _ => None,
        }
    }
}

impl FromStr for KeyPress {
    type Err = ChordParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.trim().is_empty() {
            return Err(ChordParseError::EmptyChord);
        } else if let Ok((_, key)) = parse_key_str(input) {
            return Ok(key);
        } else {
            return Err(ChordParseError::InvalidChord(input.to_string()));
        }
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, prefix) in MODIFIER_PREFIXES {
            if self.modifiers.contains(flag) {
                f.write_str(prefix)?;
            }
        }

        let name = match self.code {
            KeyCode::Char(' ') => "SPC",
            KeyCode::Char('\n') => "LFD",
            KeyCode::Char(c) => return write!(f, "{c}"),
            KeyCode::F(n) => return write!(f, "<f{n}>"),
            KeyCode::Enter => "RET",
            KeyCode::Tab => "TAB",
            KeyCode::Esc => "ESC",
            KeyCode::Backspace => "DEL",
            KeyCode::Null => "NUL",
            KeyCode::Left => "<left>",
            KeyCode::Right => "<right>",
            KeyCode::Up => "<up>",
            KeyCode::Down => "<down>",
            KeyCode::Home => "<home>",
            KeyCode::End => "<end>",
            KeyCode::PageUp => "<prior>",
            KeyCode::PageDown => "<next>",
            KeyCode::KeypadBegin => "<begin>",
            KeyCode::Insert => "<insert>",
            KeyCode::Delete => "<delete>",
            KeyCode::BackTab => "<backtab>",
            KeyCode::CapsLock => "<capslock>",
            KeyCode::ScrollLock => "<scrolllock>",
            KeyCode::NumLock => "<numlock>",
            KeyCode::PrintScreen => "<print>",
            KeyCode::Pause => "<pause>",
            KeyCode::Menu => "<menu>",
            KeyCode::Media(mc) => return write!(f, "<{mc:?}>"),
            KeyCode::Modifier(mc) => return write!(f, "<{mc:?}>"),
        };

        f.write_str(name)
    }
}

impl InputKey for KeyPress {
    type Event = Event;
    type Error = ChordParseError;

    fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::Key(ke) => {
                if ke.kind == KeyEventKind::Release {
                    return None;
                }

                if let KeyCode::Modifier(_) = ke.code {
                    // Pressing Ctrl or Shift by itself isn't part of a chord.
                    return None;
                }

                Some(KeyPress::from(*ke))
            },
            _ => None,
        }
    }

    fn to_event(&self, phase: KeyPhase) -> Event {
        let kind = match phase {
            KeyPhase::Press => KeyEventKind::Press,
            KeyPhase::Release => KeyEventKind::Release,
        };

        Event::Key(KeyEvent::new_with_kind(self.code, self.modifiers, kind))
    }

    fn from_chord_str(input: &str) -> Result<Vec<Self>, ChordParseError> {
        if input.trim().is_empty() {
            return Err(ChordParseError::EmptyChord);
        } else if let Ok((_, keys)) = parse_chord_str(input) {
            return Ok(keys);
        } else {
            return Err(ChordParseError::InvalidChord(input.to_string()));
        }
    }

    fn get_digit(&self) -> Option<u32> {
        self.get_char()?.to_digit(10)
    }
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        KeyPress::new(code, KeyModifiers::NONE)
    }
}

impl From<KeyEvent> for KeyPress {
    fn from(ke: KeyEvent) -> Self {
        KeyPress::new(ke.code, ke.modifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, ModifierKeyCode};

    fn parse(s: &str) -> KeyPress {
        KeyPress::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        assert_eq!(parse("a"), key!('a'));
        assert_eq!(parse("A"), key!('A'));
        assert_eq!(parse("-"), key!('-'));
        assert_eq!(parse("<"), key!('<'));
        assert_eq!(parse("5"), key!('5'));

        // Named keys.
        assert_eq!(parse("RET"), key!(KeyCode::Enter));
        assert_eq!(parse("TAB"), key!(KeyCode::Tab));
        assert_eq!(parse("SPC"), key!(' '));
        assert_eq!(parse("ESC"), key!(KeyCode::Esc));
        assert_eq!(parse("DEL"), key!(KeyCode::Backspace));
        assert_eq!(parse("LFD"), key!('\n'));

        // Function keys.
        assert_eq!(parse("<f1>"), key!(KeyCode::F(1)));
        assert_eq!(parse("<f12>"), key!(KeyCode::F(12)));
        assert_eq!(parse("<left>"), key!(KeyCode::Left));
        assert_eq!(parse("<prior>"), key!(KeyCode::PageUp));
        assert_eq!(parse("<next>"), key!(KeyCode::PageDown));
        assert_eq!(parse("<delete>"), key!(KeyCode::Delete));
        assert_eq!(parse("<backspace>"), key!(KeyCode::Backspace));
        assert_eq!(parse("<return>"), key!(KeyCode::Enter));
    }

    #[test]
    fn test_parse_modifiers() {
        assert_eq!(parse("C-u"), ctl!('u'));
        assert_eq!(parse("C-u"), KeyPress::universal());
        assert_eq!(parse("M-x"), key!('x', KeyModifiers::ALT));
        assert_eq!(parse("C-M-x"), key!('x', KeyModifiers::CONTROL | KeyModifiers::ALT));
        assert_eq!(parse("M-C-x"), parse("C-M-x"));
        assert_eq!(parse("s-a"), key!('a', KeyModifiers::SUPER));
        assert_eq!(parse("H-a"), key!('a', KeyModifiers::HYPER));
        assert_eq!(parse("C--"), ctl!('-'));

        // Shifted characters are uppercase.
        assert_eq!(parse("S-a"), key!('A'));
        assert_eq!(parse("C-S-a"), ctl!('A'));

        // Modifiers can go inside or outside of the brackets.
        assert_eq!(parse("C-<left>"), key!(KeyCode::Left, KeyModifiers::CONTROL));
        assert_eq!(parse("<C-left>"), key!(KeyCode::Left, KeyModifiers::CONTROL));
        assert_eq!(parse("S-<left>"), key!(KeyCode::Left, KeyModifiers::SHIFT));

        // Shift+Tab is BackTab.
        assert_eq!(parse("S-TAB"), key!(KeyCode::BackTab));
        assert_eq!(parse("<backtab>"), key!(KeyCode::BackTab));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(KeyPress::from_str(""), Err(ChordParseError::EmptyChord));
        assert_eq!(KeyPress::from_str("   "), Err(ChordParseError::EmptyChord));
        assert_eq!(KeyPress::from_str("C-"), Err(ChordParseError::InvalidChord("C-".into())));
        assert_eq!(KeyPress::from_str("ab"), Err(ChordParseError::InvalidChord("ab".into())));
        assert_eq!(
            KeyPress::from_str("<nosuchkey>"),
            Err(ChordParseError::InvalidChord("<nosuchkey>".into()))
        );
        assert_eq!(KeyPress::from_str("<f256>").is_err(), true);
    }

    #[test]
    fn test_chord_str() {
        let keys = KeyPress::from_chord_str("C-x C-f").unwrap();
        assert_eq!(keys, vec![ctl!('x'), ctl!('f')]);

        let keys = KeyPress::from_chord_str("  g   g ").unwrap();
        assert_eq!(keys, vec![key!('g'), key!('g')]);

        let keys = KeyPress::from_chord_str("C-u C-u 3 7").unwrap();
        assert_eq!(keys, vec![ctl!('u'), ctl!('u'), key!('3'), key!('7')]);

        let keys = KeyPress::from_chord_str("M-g <f1> RET").unwrap();
        assert_eq!(keys, vec![
            key!('g', KeyModifiers::ALT),
            key!(KeyCode::F(1)),
            key!(KeyCode::Enter)
        ]);

        assert_eq!(KeyPress::from_chord_str(""), Err(ChordParseError::EmptyChord));
        assert_eq!(
            KeyPress::from_chord_str("C-x <lft>"),
            Err(ChordParseError::InvalidChord("C-x <lft>".into()))
        );
    }

    #[test]
    fn test_display() {
        let descs = [
            "a", "A", "C-u", "C-M-x", "M-<", "s-a", "H-a", "RET", "TAB", "SPC", "ESC", "DEL",
            "<f5>", "<left>", "C-<home>", "S-<right>", "<prior>", "<next>", "<backtab>", "<",
        ];

        for desc in descs {
            assert_eq!(parse(desc).to_string(), desc);
        }

        // Alternate spellings are written in their canonical form.
        assert_eq!(parse("<C-left>").to_string(), "C-<left>");
        assert_eq!(parse("<return>").to_string(), "RET");
        assert_eq!(parse("S-TAB").to_string(), "<backtab>");
    }

    #[test]
    fn test_from_event() {
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE));
        assert_eq!(KeyPress::from_event(&ev), Some(key!('g')));

        // Shifted characters match their descriptions.
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT));
        assert_eq!(KeyPress::from_event(&ev), Some(parse("G")));

        let ev = Event::Key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(KeyPress::from_event(&ev), Some(parse("S-TAB")));

        let ev = Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::META));
        assert_eq!(KeyPress::from_event(&ev), Some(parse("M-x")));

        // Repeats count as presses.
        let ev = Event::Key(KeyEvent::new_with_kind(
            KeyCode::Char('j'),
            KeyModifiers::NONE,
            KeyEventKind::Repeat,
        ));
        assert_eq!(KeyPress::from_event(&ev), Some(key!('j')));

        // Releases, lone modifiers and non-key events are ignored.
        let ev = Event::Key(KeyEvent::new_with_kind(
            KeyCode::Char('j'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        assert_eq!(KeyPress::from_event(&ev), None);

        let ev = Event::Key(KeyEvent {
            code: KeyCode::Modifier(ModifierKeyCode::LeftControl),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        });
        assert_eq!(KeyPress::from_event(&ev), None);

        assert_eq!(KeyPress::from_event(&Event::FocusGained), None);
        assert_eq!(KeyPress::from_event(&Event::Resize(80, 24)), None);
    }

    #[test]
    fn test_to_event() {
        let key = parse("C-x");

        match key.to_event(KeyPhase::Press) {
            Event::Key(ke) => {
                assert_eq!(ke.code, KeyCode::Char('x'));
                assert_eq!(ke.modifiers, KeyModifiers::CONTROL);
                assert_eq!(ke.kind, KeyEventKind::Press);
            },
            ev => panic!("unexpected event: {ev:?}"),
        }

        let ev = key.to_event(KeyPhase::Release);
        assert_eq!(KeyPress::from_event(&ev), None);

        let ev = key.to_event(KeyPhase::Press);
        assert_eq!(KeyPress::from_event(&ev), Some(key));
    }

    #[test]
    fn test_get_digit() {
        assert_eq!(key!('7').get_digit(), Some(7));
        assert_eq!(key!('0').get_digit(), Some(0));
        assert_eq!(key!('a').get_digit(), None);
        assert_eq!(key!('7', KeyModifiers::ALT).get_digit(), None);
        assert_eq!(ctl!('3').get_digit(), None);
        assert_eq!(key!(KeyCode::F(7)).get_digit(), None);
    }
}
