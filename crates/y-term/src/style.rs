// SPDX-License-Identifier: MIT
//
// Style — the visual attributes applied to a run of text.
//
// A Style is a bundle of an optional foreground, an optional background,
// attribute flags, and an optional text transform. Colors that are fully
// transparent behave exactly like absent colors: they never win an override,
// never take part in a blend, and never produce an SGR sequence.
//
// Transforms are shared closures. Two styles are equal only if they point at
// the same transform closure, so equality stays cheap and predictable.

use std::fmt;
use std::sync::Arc;

use crate::ansi;
use crate::color::Color;

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes stored as a compact bitfield.
    ///
    /// These map directly to SGR (Select Graphic Rendition) parameters:
    ///
    /// ```
    /// use y_term::style::Attr;
    ///
    /// let flags = Attr::BOLD | Attr::ITALIC;
    /// assert!(flags.contains(Attr::BOLD));
    /// assert!(!flags.contains(Attr::UNDERLINE));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1 — increased intensity.
        const BOLD          = 1 << 0;
        /// SGR 2 — decreased intensity (faint).
        const DIM           = 1 << 1;
        /// SGR 3 — italic or oblique.
        const ITALIC        = 1 << 2;
        /// SGR 4 — single underline.
        const UNDERLINE     = 1 << 3;
        /// SGR 7 — swap foreground and background.
        const INVERSE       = 1 << 4;
        /// SGR 9 — crossed-out text.
        const STRIKETHROUGH = 1 << 5;
    }
}

// ─── Transform ───────────────────────────────────────────────────────────────

/// A shared content → content function attached to a style.
///
/// ```
/// use y_term::style::Transform;
///
/// let shout = Transform::new(|s| s.to_uppercase());
/// assert_eq!(shout.apply("hey"), "HEY");
/// ```
#[derive(Clone)]
pub struct Transform(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl Transform {
    /// Wrap a closure.
    pub fn new(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Run the transform.
    #[inline]
    #[must_use]
    pub fn apply(&self, input: &str) -> String {
        (self.0)(input)
    }

    /// `outer(self(x))`. The receiver runs first.
    #[must_use]
    pub fn then(&self, outer: &Self) -> Self {
        let inner = Arc::clone(&self.0);
        let outer = Arc::clone(&outer.0);
        Self(Arc::new(move |s: &str| outer(&inner(s))))
    }

    /// Whether both handles share one closure.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transform({:p})", Arc::as_ptr(&self.0).cast::<()>())
    }
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// Visual attributes for a run of text.
///
/// ```
/// use y_term::color::Color;
/// use y_term::style::Style;
///
/// let s = Style::new().fg(Color::rgb8(200, 80, 80)).bold();
/// assert!(s.foreground().is_some());
/// assert!(s.is_bold());
/// ```
#[derive(Clone, Default)]
pub struct Style {
    fg: Option<Color>,
    bg: Option<Color>,
    attrs: Attr,
    transform: Option<Transform>,
}

impl Style {
    /// An empty style: no colors, no flags, no transform.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: Attr::empty(),
            transform: None,
        }
    }

    // ─── Builder ─────────────────────────────────────────────────────────

    #[must_use]
    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    #[must_use]
    pub fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Set foreground and background from options in one go.
    #[must_use]
    pub fn colors(mut self, fg: Option<Color>, bg: Option<Color>) -> Self {
        self.fg = fg;
        self.bg = bg;
        self
    }

    #[must_use]
    pub fn attrs(mut self, attrs: Attr) -> Self {
        self.attrs = attrs;
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.attrs |= Attr::BOLD;
        self
    }

    #[must_use]
    pub fn italic(mut self) -> Self {
        self.attrs |= Attr::ITALIC;
        self
    }

    #[must_use]
    pub fn underline(mut self) -> Self {
        self.attrs |= Attr::UNDERLINE;
        self
    }

    #[must_use]
    pub fn dim(mut self) -> Self {
        self.attrs |= Attr::DIM;
        self
    }

    #[must_use]
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Builder shorthand for [`Transform::new`].
    #[must_use]
    pub fn map(self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.transform(Transform::new(f))
    }

    // ─── Getters ─────────────────────────────────────────────────────────

    /// Foreground, only if it would actually paint.
    #[inline]
    #[must_use]
    pub fn foreground(&self) -> Option<Color> {
        self.fg.filter(|c| c.is_visible())
    }

    /// Background, only if it would actually paint.
    #[inline]
    #[must_use]
    pub fn background(&self) -> Option<Color> {
        self.bg.filter(|c| c.is_visible())
    }

    #[inline]
    #[must_use]
    pub const fn attributes(&self) -> Attr {
        self.attrs
    }

    #[inline]
    #[must_use]
    pub const fn transformer(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }

    #[inline]
    #[must_use]
    pub const fn is_bold(&self) -> bool {
        self.attrs.contains(Attr::BOLD)
    }

    #[inline]
    #[must_use]
    pub const fn is_italic(&self) -> bool {
        self.attrs.contains(Attr::ITALIC)
    }

    #[inline]
    #[must_use]
    pub const fn is_underline(&self) -> bool {
        self.attrs.contains(Attr::UNDERLINE)
    }

    /// True when applying this style changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foreground().is_none()
            && self.background().is_none()
            && self.attrs.is_empty()
            && self.transform.is_none()
    }

    /// Whether any SGR would be emitted for this style.
    #[must_use]
    pub fn has_sgr(&self) -> bool {
        self.foreground().is_some() || self.background().is_some() || !self.attrs.is_empty()
    }

    /// Apply the transform, if any.
    #[must_use]
    pub fn apply_transform(&self, text: &str) -> String {
        self.transform
            .as_ref()
            .map_or_else(|| text.to_owned(), |t| t.apply(text))
    }

    /// Render `text` standalone: transform, SGR prefix, text, reset.
    #[must_use]
    pub fn render(&self, text: &str) -> String {
        let body = self.apply_transform(text);
        if !self.has_sgr() {
            return body;
        }
        let mut out = Vec::with_capacity(body.len() + 32);
        // Writing into a Vec cannot fail.
        let _ = ansi::style(&mut out, self, crate::color::ColorDepth::TrueColor);
        out.extend_from_slice(body.as_bytes());
        let _ = ansi::reset(&mut out);
        String::from_utf8_lossy(&out).into_owned()
    }
}

impl PartialEq for Style {
    fn eq(&self, other: &Self) -> bool {
        let same_transform = match (&self.transform, &other.transform) {
            (None, None) => true,
            (Some(a), Some(b)) => a.ptr_eq(b),
            _ => false,
        };
        self.foreground() == other.foreground()
            && self.background() == other.background()
            && self.attrs == other.attrs
            && same_transform
    }
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Style");
        if let Some(fg) = self.foreground() {
            d.field("fg", &fg.to_hex());
        }
        if let Some(bg) = self.background() {
            d.field("bg", &bg.to_hex());
        }
        if !self.attrs.is_empty() {
            d.field("attrs", &self.attrs);
        }
        if let Some(t) = &self.transform {
            d.field("transform", t);
        }
        d.finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_style_is_empty() {
        assert!(Style::new().is_empty());
        assert!(!Style::new().has_sgr());
    }

    #[test]
    fn transparent_colors_are_absent() {
        let s = Style::new().fg(Color::TRANSPARENT).bg(Color::TRANSPARENT);
        assert!(s.foreground().is_none());
        assert!(s.background().is_none());
        assert!(s.is_empty());
        assert_eq!(s, Style::new());
    }

    #[test]
    fn builder_flags_accumulate() {
        let s = Style::new().bold().italic().underline();
        assert!(s.is_bold() && s.is_italic() && s.is_underline());
        assert_eq!(s.attributes(), Attr::BOLD | Attr::ITALIC | Attr::UNDERLINE);
    }

    #[test]
    fn transform_equality_is_by_identity() {
        let t = Transform::new(|s| s.to_uppercase());
        let a = Style::new().transform(t.clone());
        let b = Style::new().transform(t);
        let c = Style::new().map(|s| s.to_uppercase());
        assert_eq!(a, b);
        assert!(a != c);
    }

    #[test]
    fn transform_then_runs_receiver_first() {
        let inner = Transform::new(|s| format!("[{s}]"));
        let outer = Transform::new(|s| s.to_uppercase());
        assert_eq!(inner.then(&outer).apply("x"), "[X]");
        assert_eq!(outer.then(&inner).apply("x"), "[X]");
        let wrap = Transform::new(|s| format!("<{s}>"));
        assert_eq!(inner.then(&wrap).apply("x"), "<[x]>");
    }

    #[test]
    fn render_plain_is_untouched() {
        assert_eq!(Style::new().render("abc"), "abc");
    }

    #[test]
    fn render_bold_wraps_in_sgr() {
        assert_eq!(Style::new().bold().render("abc"), "\x1b[1mabc\x1b[0m");
    }

    #[test]
    fn render_applies_transform() {
        let s = Style::new().map(|s| s.repeat(2));
        assert_eq!(s.render("ab"), "abab");
    }
}
