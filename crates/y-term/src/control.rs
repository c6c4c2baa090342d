// SPDX-License-Identifier: MIT
//
// Control-character escaping.
//
// Raw control bytes must never reach the terminal: an ESC inside a YAML
// string would otherwise be interpreted as the start of a command. Each
// control character is replaced by exactly one visible character so column
// and rune counts of the rendered text match the source.
//
//   U+0000..U+001F  →  U+2400..U+241F   (control pictures, ␀ .. ␟)
//   U+007F (DEL)    →  U+2421           (␡)
//   U+0080..U+009F  →  U+FFFD           (replacement character)

use std::borrow::Cow;

/// Whether `ch` is a character [`escape_char`] would replace.
#[inline]
#[must_use]
pub const fn is_control(ch: char) -> bool {
    matches!(ch, '\u{0}'..='\u{1f}' | '\u{7f}'..='\u{9f}')
}

/// The visible stand-in for a control character, or `ch` itself.
#[must_use]
pub const fn escape_char(ch: char) -> char {
    match ch {
        '\u{0}'..='\u{1f}' => match char::from_u32(0x2400 + ch as u32) {
            Some(pic) => pic,
            None => char::REPLACEMENT_CHARACTER,
        },
        '\u{7f}' => '\u{2421}',
        '\u{80}'..='\u{9f}' => char::REPLACEMENT_CHARACTER,
        _ => ch,
    }
}

/// Replace every control character in `s`. Borrows when nothing changes.
///
/// ```
/// use y_term::control::escape;
///
/// assert_eq!(escape("a\x1bb\x00c"), "a␛b␀c");
/// assert_eq!(escape("plain"), "plain");
/// ```
#[must_use]
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_control) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.chars().map(escape_char).collect())
}
