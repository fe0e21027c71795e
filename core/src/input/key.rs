use crate::error::{Error, KeyNotationSnafu, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A single key press, as bound in a mode's keymap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Key {
    /// Special named keys
    Named(NamedKey),

    /// Modified keys like Ctrl+A
    Modified(ModifiedKey),

    /// Single character
    Char(char),
}

/// Special keys that have names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum NamedKey {
    Esc,
    Enter,
    Tab,
    Space,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Modified key combinations
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ModifiedKey {
    Ctrl(char),
    Alt(char),
    Shift(char),
}

impl NamedKey {
    /// Look up a key by any of its accepted names, e.g. `Esc`, `Escape`, `CR`, `PgUp`.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "Esc" | "Escape" => NamedKey::Esc,
            "Enter" | "Return" | "CR" => NamedKey::Enter,
            "Tab" => NamedKey::Tab,
            "Space" => NamedKey::Space,
            "Backspace" | "BS" => NamedKey::Backspace,
            "Delete" | "Del" => NamedKey::Delete,
            "Up" => NamedKey::Up,
            "Down" => NamedKey::Down,
            "Left" => NamedKey::Left,
            "Right" => NamedKey::Right,
            "Home" => NamedKey::Home,
            "End" => NamedKey::End,
            "PageUp" | "PgUp" => NamedKey::PageUp,
            "PageDown" | "PgDn" => NamedKey::PageDown,
            _ => return None,
        };
        Some(key)
    }
}

impl Key {
    /// The key a terminal or browser sends as this character. Control characters map to their
    /// named keys.
    pub fn from_char(ch: char) -> Self {
        match ch {
            '\r' | '\n' => Key::Named(NamedKey::Enter),
            '\t' => Key::Named(NamedKey::Tab),
            '\u{1b}' => Key::Named(NamedKey::Esc),
            '\u{8}' | '\u{7f}' => Key::Named(NamedKey::Backspace),
            ' ' => Key::Named(NamedKey::Space),
            ch => Key::Char(ch),
        }
    }
}

impl From<char> for Key {
    fn from(ch: char) -> Self {
        Key::from_char(ch)
    }
}

impl From<NamedKey> for Key {
    fn from(named: NamedKey) -> Self {
        Key::Named(named)
    }
}

impl From<ModifiedKey> for Key {
    fn from(modified: ModifiedKey) -> Self {
        Key::Modified(modified)
    }
}

/// Accepts a single character (`l`), a bare key name (`Esc`) or one key in vim notation
/// (`<Esc>`, `<C-a>`).
impl FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (None, _) => KeyNotationSnafu {
                notation: s,
                reason: "empty key",
            }
            .fail(),
            (Some(ch), None) => Ok(Key::from_char(ch)),
            _ => {
                if let Some(named) = NamedKey::from_name(s) {
                    return Ok(named.into());
                }
                match super::notation::parse_keys(s)?.as_slice() {
                    [key] => Ok(key.clone()),
                    _ => KeyNotationSnafu {
                        notation: s,
                        reason: "expected a single key",
                    }
                    .fail(),
                }
            },
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Named(named) => write!(f, "{named}"),
            Key::Modified(modified) => write!(f, "{modified}"),
        }
    }
}

impl fmt::Display for NamedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NamedKey::Esc => "Esc",
            NamedKey::Enter => "Enter",
            NamedKey::Tab => "Tab",
            NamedKey::Space => "Space",
            NamedKey::Backspace => "Backspace",
            NamedKey::Delete => "Delete",
            NamedKey::Up => "Up",
            NamedKey::Down => "Down",
            NamedKey::Left => "Left",
            NamedKey::Right => "Right",
            NamedKey::Home => "Home",
            NamedKey::End => "End",
            NamedKey::PageUp => "PgUp",
            NamedKey::PageDown => "PgDn",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for ModifiedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModifiedKey::Ctrl(c) => write!(f, "<C-{c}>"),
            ModifiedKey::Alt(c) => write!(f, "<A-{c}>"),
            ModifiedKey::Shift(c) => write!(f, "<S-{c}>"),
        }
    }
}
