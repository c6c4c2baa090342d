// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write SGR sequences to any `impl Write`. No state, no
// decisions about when to emit; that is the `StyleWriter`'s job. This module
// only knows the byte-level encoding.
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to `OutputBuffer` (backed by a Vec).
use std::io::{self, Write};

use crate::color::{CellColor, ColorDepth};
use crate::style::{Attr, Style};

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Foreground Color ────────────────────────────────────────────────────────

/// Set the foreground (text) color.
///
/// Uses compact SGR codes for standard colors (30-37, 90-97), the 256-color
/// extended format for palette indices 16-255, and 24-bit `TrueColor` for RGB.
pub fn fg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Default => w.write_all(b"\x1b[39m"),
        CellColor::Ansi256(idx) => {
            if idx < 8 {
                write!(w, "\x1b[{}m", 30 + u16::from(idx))
            } else if idx < 16 {
                write!(w, "\x1b[{}m", 82 + u16::from(idx))
            } else {
                write!(w, "\x1b[38;5;{idx}m")
            }
        }
        CellColor::Rgb(r, g, b) => write!(w, "\x1b[38;2;{r};{g};{b}m"),
    }
}

// ─── Background Color ────────────────────────────────────────────────────────

/// Set the background color. Same encoding strategy as [`fg`].
pub fn bg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Default => w.write_all(b"\x1b[49m"),
        CellColor::Ansi256(idx) => {
            if idx < 8 {
                write!(w, "\x1b[{}m", 40 + u16::from(idx))
            } else if idx < 16 {
                write!(w, "\x1b[{}m", 92 + u16::from(idx))
            } else {
                write!(w, "\x1b[48;5;{idx}m")
            }
        }
        CellColor::Rgb(r, g, b) => write!(w, "\x1b[48;2;{r};{g};{b}m"),
    }
}

// ─── Text Attributes ─────────────────────────────────────────────────────────

/// Emit SGR codes for text attributes as a single CSI sequence.
///
/// Multiple attributes are semicolon-separated: `\x1b[1;3;9m` for
/// bold + italic + strikethrough. Does nothing if no attributes are set.
pub fn attrs(w: &mut impl Write, attr: Attr) -> io::Result<()> {
    const CODES: [(Attr, &[u8]); 6] = [
        (Attr::BOLD, b"1"),
        (Attr::DIM, b"2"),
        (Attr::ITALIC, b"3"),
        (Attr::UNDERLINE, b"4"),
        (Attr::INVERSE, b"7"),
        (Attr::STRIKETHROUGH, b"9"),
    ];

    if attr.is_empty() {
        return Ok(());
    }

    w.write_all(b"\x1b[")?;
    let mut first = true;
    for (flag, code) in CODES {
        if attr.contains(flag) {
            if !first {
                w.write_all(b";")?;
            }
            w.write_all(code)?;
            first = false;
        }
    }
    w.write_all(b"m")
}

/// Emit everything a style needs, from a reset terminal state.
///
/// Absent and transparent colors emit nothing.
pub fn style(w: &mut impl Write, style: &Style, depth: ColorDepth) -> io::Result<()> {
    attrs(w, style.attributes())?;
    if let Some(c) = style.foreground() {
        fg(w, c.to_cell_color().downgrade(depth))?;
    }
    if let Some(c) = style.background() {
        bg(w, c.to_cell_color().downgrade(depth))?;
    }
    Ok(())
}

// ─── Stripping ───────────────────────────────────────────────────────────────

/// Remove CSI escape sequences (`ESC [ params final`) from `s`.
///
/// Used to measure rendered output: after stripping, only the visible runes
/// remain. Control pictures produced by escaping are untouched because the
/// escaper never lets a raw ESC through.
#[must_use]
pub fn strip(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // Parameter and intermediate bytes, then one final byte in @..~.
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        } else {
            out.push(ch);
        }
    }
    out
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Colors ──────────────────────────────────────────────────────────

    #[test]
    fn fg_default() {
        assert_eq!(emit(|w| fg(w, CellColor::Default)), "\x1b[39m");
    }

    #[test]
    fn fg_standard_and_bright() {
        assert_eq!(emit(|w| fg(w, CellColor::Ansi256(1))), "\x1b[31m");
        assert_eq!(emit(|w| fg(w, CellColor::Ansi256(9))), "\x1b[91m");
    }

    #[test]
    fn fg_palette_and_rgb() {
        assert_eq!(emit(|w| fg(w, CellColor::Ansi256(202))), "\x1b[38;5;202m");
        assert_eq!(
            emit(|w| fg(w, CellColor::Rgb(1, 2, 3))),
            "\x1b[38;2;1;2;3m"
        );
    }

    #[test]
    fn bg_variants() {
        assert_eq!(emit(|w| bg(w, CellColor::Default)), "\x1b[49m");
        assert_eq!(emit(|w| bg(w, CellColor::Ansi256(4))), "\x1b[44m");
        assert_eq!(emit(|w| bg(w, CellColor::Ansi256(12))), "\x1b[104m");
        assert_eq!(
            emit(|w| bg(w, CellColor::Rgb(9, 8, 7))),
            "\x1b[48;2;9;8;7m"
        );
    }

    // ── Attributes ──────────────────────────────────────────────────────

    #[test]
    fn attrs_empty_emits_nothing() {
        assert_eq!(emit(|w| attrs(w, Attr::empty())), "");
    }

    #[test]
    fn attrs_are_joined() {
        let a = Attr::BOLD | Attr::UNDERLINE | Attr::STRIKETHROUGH;
        assert_eq!(emit(|w| attrs(w, a)), "\x1b[1;4;9m");
    }

    #[test]
    fn style_skips_transparent_colors() {
        let s = Style::new().fg(Color::TRANSPARENT).italic();
        assert_eq!(emit(|w| style(w, &s, ColorDepth::TrueColor)), "\x1b[3m");
    }

    #[test]
    fn style_downgrades_colors() {
        let s = Style::new().fg(Color::rgb8(255, 0, 0));
        assert_eq!(emit(|w| style(w, &s, ColorDepth::Ansi16)), "\x1b[91m");
    }

    // ── Strip ───────────────────────────────────────────────────────────

    #[test]
    fn strip_removes_sgr() {
        assert_eq!(strip("\x1b[1;38;2;1;2;3mkey\x1b[0m: v"), "key: v");
    }

    #[test]
    fn strip_keeps_plain_text() {
        assert_eq!(strip("a␛b␀c"), "a␛b␀c");
    }

    #[test]
    fn strip_keeps_lone_escape() {
        assert_eq!(strip("a\x1bb"), "a\x1bb");
    }
}
