use super::key::{Key, ModifiedKey, NamedKey};
use crate::error::{KeyNotationSnafu, Result};

/// Parse vim-like key notation into keys.
///
/// ```text
/// "hjk"       -> [Char('h'), Char('j'), Char('k')]
/// "l<Esc>"    -> [Char('l'), Named(Esc)]
/// "<C-a><S-/>" -> [Modified(Ctrl('a')), Modified(Shift('/'))]
/// ```
pub fn parse_keys(notation: &str) -> Result<Vec<Key>> {
    let mut keys = Vec::new();
    let mut chars = notation.chars();

    while let Some(ch) = chars.next() {
        if ch != '<' {
            keys.push(Key::from_char(ch));
            continue;
        }

        let mut special = String::new();
        let mut closed = false;
        for ch in chars.by_ref() {
            if ch == '>' {
                closed = true;
                break;
            }
            special.push(ch);
        }

        if !closed {
            return KeyNotationSnafu {
                notation,
                reason: format!("unclosed `<{special}`"),
            }
            .fail();
        }
        keys.push(parse_special(notation, &special)?);
    }

    Ok(keys)
}

fn parse_special(notation: &str, special: &str) -> Result<Key> {
    let Some((modifier, key)) = special.split_once('-') else {
        return NamedKey::from_name(special)
            .map(Key::Named)
            .ok_or_else(|| unknown(notation, format!("unknown key `<{special}>`")));
    };

    let mut key_chars = key.chars();
    let (Some(key), None) = (key_chars.next(), key_chars.next()) else {
        return Err(unknown(
            notation,
            format!("modifier needs a single character in `<{special}>`"),
        ));
    };

    let modified = match modifier {
        "C" | "Ctrl" => ModifiedKey::Ctrl(key),
        "S" | "Shift" => ModifiedKey::Shift(key),
        "A" | "Alt" | "M" | "Meta" => ModifiedKey::Alt(key),
        _ => return Err(unknown(notation, format!("unknown modifier `{modifier}`"))),
    };
    Ok(Key::Modified(modified))
}

fn unknown(notation: &str, reason: String) -> crate::Error {
    KeyNotationSnafu { notation, reason }.build()
}
