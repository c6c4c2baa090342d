// SPDX-License-Identifier: MIT
//
// Output buffering and stateful style rendering.
//
// Two components work together to keep emitted text small:
//
//   OutputBuffer — accumulates rendered bytes in memory so a whole listing
//   is assembled once and handed back as a single string.
//
//   StyleWriter — tracks the SGR state the terminal is in (colors and
//   attributes) and skips redundant escape sequences. If the previous run
//   was red and bold and the next one is too, only the text is written.
//
// Lines always start and end in the reset state: `finish_line` emits SGR 0
// only if something was set, so unstyled lines contain no escapes at all.

use std::io::{self, Write};

use crate::ansi;
use crate::color::{CellColor, ColorDepth};
use crate::style::{Attr, Style};

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A byte buffer that accumulates ANSI output.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 4096;

impl OutputBuffer {
    /// Create a buffer with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes currently buffered.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The buffered bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append a string verbatim.
    #[inline]
    pub fn push_str(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
    }

    /// Append one character.
    #[inline]
    pub fn push(&mut self, ch: char) {
        let mut tmp = [0u8; 4];
        self.buf
            .extend_from_slice(ch.encode_utf8(&mut tmp).as_bytes());
    }

    /// Discard all buffered bytes, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Consume the buffer as a string.
    ///
    /// Only UTF-8 is ever written, so the lossy path is never taken in
    /// practice.
    #[must_use]
    pub fn into_string(self) -> String {
        String::from_utf8(self.buf)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── StyleWriter ─────────────────────────────────────────────────────────────

/// Stateful SGR emitter that skips sequences which would change nothing.
///
/// # Optimization decisions
///
/// - **Attributes**: On change, reset (SGR 0) + re-emit. This invalidates
///   color tracking, forcing re-emit. When going from no-attrs to attrs,
///   the reset is skipped (nothing to clear).
/// - **Colors**: Skipped if unchanged since last emit. Absent colors are the
///   terminal default.
#[allow(clippy::struct_field_names)]
pub struct StyleWriter {
    depth: ColorDepth,
    last_fg: CellColor,
    last_bg: CellColor,
    last_attrs: Attr,
}

impl StyleWriter {
    /// A writer that assumes the terminal is in the reset state.
    #[must_use]
    pub const fn new(depth: ColorDepth) -> Self {
        Self {
            depth,
            last_fg: CellColor::Default,
            last_bg: CellColor::Default,
            last_attrs: Attr::empty(),
        }
    }

    /// Whether the tracked state differs from the reset state.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        !self.last_fg.is_default() || !self.last_bg.is_default() || !self.last_attrs.is_empty()
    }

    /// Switch the terminal to `style`, then write `text`.
    pub fn write_run(&mut self, out: &mut OutputBuffer, style: &Style, text: &str) {
        self.apply(out, style);
        out.push_str(text);
    }

    /// Return to the reset state if anything is set.
    pub fn finish_line(&mut self, out: &mut OutputBuffer) {
        if self.is_dirty() {
            ansi::reset(out).ok();
            self.last_fg = CellColor::Default;
            self.last_bg = CellColor::Default;
            self.last_attrs = Attr::empty();
        }
    }

    fn apply(&mut self, out: &mut OutputBuffer, style: &Style) {
        let fg = style
            .foreground()
            .map_or(CellColor::Default, |c| c.to_cell_color().downgrade(self.depth));
        let bg = style
            .background()
            .map_or(CellColor::Default, |c| c.to_cell_color().downgrade(self.depth));
        let attrs = style.attributes();

        if attrs != self.last_attrs {
            if !self.last_attrs.is_empty() {
                // SGR 0 clears everything.
                ansi::reset(out).ok();
                self.last_fg = CellColor::Default;
                self.last_bg = CellColor::Default;
            }
            self.last_attrs = attrs;
            ansi::attrs(out, attrs).ok();
        }

        if fg != self.last_fg {
            ansi::fg(out, fg).ok();
            self.last_fg = fg;
        }

        if bg != self.last_bg {
            ansi::bg(out, bg).ok();
            self.last_bg = bg;
        }
    }
}

impl Default for StyleWriter {
    fn default() -> Self {
        Self::new(ColorDepth::TrueColor)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use pretty_assertions::assert_eq;

    fn run(runs: &[(&Style, &str)]) -> String {
        let mut out = OutputBuffer::new();
        let mut w = StyleWriter::default();
        for (style, text) in runs {
            w.write_run(&mut out, style, text);
        }
        w.finish_line(&mut out);
        out.into_string()
    }

    #[test]
    fn unstyled_text_has_no_escapes() {
        let plain = Style::new();
        assert_eq!(run(&[(&plain, "a"), (&plain, "b")]), "ab");
    }

    #[test]
    fn repeated_style_is_emitted_once() {
        let red = Style::new().fg(Color::BLACK);
        assert_eq!(
            run(&[(&red, "a"), (&red, "b")]),
            "\x1b[38;2;0;0;0mab\x1b[0m"
        );
    }

    #[test]
    fn returning_to_plain_resets_color() {
        let dark = Style::new().fg(Color::BLACK);
        let plain = Style::new();
        assert_eq!(
            run(&[(&dark, "a"), (&plain, "b")]),
            "\x1b[38;2;0;0;0ma\x1b[39mb"
        );
    }

    #[test]
    fn attribute_change_resets_first() {
        let bold = Style::new().bold();
        let italic = Style::new().italic();
        assert_eq!(
            run(&[(&bold, "a"), (&italic, "b")]),
            "\x1b[1ma\x1b[0m\x1b[3mb\x1b[0m"
        );
    }

    #[test]
    fn buffer_collects_chars() {
        let mut out = OutputBuffer::new();
        out.push('é');
        out.push_str("x");
        assert_eq!(out.len(), 3);
        assert_eq!(out.into_string(), "éx");
    }
}
