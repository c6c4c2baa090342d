//! Style composition — override, blend, and the identity-preserving cache.
//!
//! Two ways to lay one style over another:
//!
//! - [`override_style`]: each visible overlay color replaces the base color.
//! - [`blend_style`]: when both sides have a visible color, the result is
//!   their even Oklab mix; otherwise whichever side is visible wins.
//!
//! Both union attribute flags and compose transforms so the overlay wraps
//! the base: `overlay(base(text))`.
//!
//! The [`Composer`] memoizes results per `(styles, base, overlay, mode)` and
//! hands back the *same* `Arc` every time, so callers can compare resolved
//! styles by pointer when run-length encoding a line.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use y_term::{Color, Style};

use crate::styles::Styles;

/// Mix ratio used when two visible colors meet.
pub const BLEND_RATIO: f32 = 0.5;

// ---------------------------------------------------------------------------
// Pure composition
// ---------------------------------------------------------------------------

/// Lay `overlay` over `base`, overlay colors winning where visible.
#[must_use]
pub fn override_style(base: &Style, overlay: &Style) -> Style {
    combine(base, overlay, |_, top| top)
}

/// Lay `overlay` over `base`, mixing colors both sides define.
#[must_use]
pub fn blend_style(base: &Style, overlay: &Style) -> Style {
    combine(base, overlay, |bottom, top| bottom.blend_lab(&top, BLEND_RATIO))
}

fn combine(base: &Style, overlay: &Style, mix: impl Fn(Color, Color) -> Color) -> Style {
    let pick = |bottom: Option<Color>, top: Option<Color>| match (bottom, top) {
        (Some(b), Some(t)) => Some(mix(b, t)),
        (b, t) => t.or(b),
    };

    let transform = match (base.transformer(), overlay.transformer()) {
        (Some(inner), Some(outer)) => Some(inner.then(outer)),
        (inner, outer) => outer.or(inner).cloned(),
    };

    let style = Style::new()
        .colors(
            pick(base.foreground(), overlay.foreground()),
            pick(base.background(), overlay.background()),
        )
        .attrs(base.attributes() | overlay.attributes());

    match transform {
        Some(t) => style.transform(t),
        None => style,
    }
}

// ---------------------------------------------------------------------------
// Composer
// ---------------------------------------------------------------------------

type Key = (u64, usize, usize, bool);

/// A cached composition. The input handles are kept alive alongside the
/// result so their addresses cannot be reused by unrelated styles while the
/// entry exists.
struct Entry {
    _base: Arc<Style>,
    _overlay: Arc<Style>,
    result: Arc<Style>,
}

/// Memoizing style composer, safe to share between threads.
///
/// ```
/// use std::sync::Arc;
/// use y_term::{Color, Style};
/// use y_theme::{Composer, Styles};
///
/// let styles = Styles::default();
/// let composer = Composer::new();
/// let a = Arc::new(Style::new().fg(Color::rgb8(10, 200, 10)));
/// let b = Arc::new(Style::new().fg(Color::rgb8(200, 10, 10)));
///
/// let first = composer.blend(&styles, Some(&a), Some(&b), false).unwrap();
/// let again = composer.blend(&styles, Some(&a), Some(&b), false).unwrap();
/// assert!(Arc::ptr_eq(&first, &again));
/// ```
#[derive(Default)]
pub struct Composer {
    cache: Mutex<HashMap<Key, Entry>>,
}

impl Composer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose `overlay` onto `base` under the palette of `styles`.
    ///
    /// `override_colors` selects [`override_style`] instead of
    /// [`blend_style`]. A missing side returns the other side unchanged, and
    /// an empty overlay returns `base` itself.
    #[must_use]
    pub fn blend(
        &self,
        styles: &Styles,
        base: Option<&Arc<Style>>,
        overlay: Option<&Arc<Style>>,
        override_colors: bool,
    ) -> Option<Arc<Style>> {
        let (base, overlay) = match (base, overlay) {
            (None, None) => return None,
            (Some(x), None) | (None, Some(x)) => return Some(Arc::clone(x)),
            (Some(b), Some(o)) => (b, o),
        };
        if overlay.is_empty() {
            return Some(Arc::clone(base));
        }
        if base.is_empty() {
            return Some(Arc::clone(overlay));
        }

        let key = (
            styles.id(),
            Arc::as_ptr(base) as usize,
            Arc::as_ptr(overlay) as usize,
            override_colors,
        );

        let mut cache = self.cache.lock();
        let entry = cache.entry(key).or_insert_with(|| {
            let result = if override_colors {
                override_style(base, overlay)
            } else {
                blend_style(base, overlay)
            };
            Entry {
                _base: Arc::clone(base),
                _overlay: Arc::clone(overlay),
                result: Arc::new(result),
            }
        });
        Some(Arc::clone(&entry.result))
    }

    /// Number of cached compositions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Whether nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Drop every cached composition.
    pub fn clear(&self) {
        self.cache.lock().clear();
    }
}

impl fmt::Debug for Composer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composer")
            .field("entries", &self.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use y_term::{Attr, Transform};

    fn green() -> Color {
        Color::rgb8(20, 200, 60)
    }

    fn red() -> Color {
        Color::rgb8(220, 30, 30)
    }

    // ── Pure composition ────────────────────────────────────────────

    #[test]
    fn override_takes_visible_overlay_colors() {
        let base = Style::new().fg(green()).bg(Color::BLACK);
        let overlay = Style::new().fg(red()).bg(Color::TRANSPARENT);
        let out = override_style(&base, &overlay);
        assert_eq!(out.foreground(), Some(red()));
        assert_eq!(out.background(), Some(Color::BLACK));
    }

    #[test]
    fn blend_mixes_when_both_visible() {
        let out = blend_style(&Style::new().fg(green()), &Style::new().fg(red()));
        assert_eq!(out.foreground(), Some(green().blend_lab(&red(), 0.5)));
    }

    #[test]
    fn blend_keeps_lone_colors() {
        let out = blend_style(&Style::new().fg(green()), &Style::new().bg(red()));
        assert_eq!(out.foreground(), Some(green()));
        assert_eq!(out.background(), Some(red()));
    }

    #[test]
    fn flags_are_unioned() {
        let out = override_style(&Style::new().bold(), &Style::new().underline());
        assert_eq!(out.attributes(), Attr::BOLD | Attr::UNDERLINE);
    }

    #[test]
    fn overlay_transform_wraps_base() {
        let base = Style::new().transform(Transform::new(|s| format!("[{s}]")));
        let overlay = Style::new().transform(Transform::new(|s| s.to_uppercase()));
        let out = blend_style(&base, &overlay);
        assert_eq!(out.apply_transform("a"), "[A]");

        let wrap = Style::new().transform(Transform::new(|s| format!("<{s}>")));
        assert_eq!(blend_style(&base, &wrap).apply_transform("a"), "<[a]>");
    }

    #[test]
    fn empty_overlay_is_identity() {
        let x = Style::new().fg(green()).italic();
        assert_eq!(blend_style(&x, &Style::new()), x);
        assert_eq!(override_style(&x, &Style::new()), x);
    }

    // ── Composer ────────────────────────────────────────────────────

    #[test]
    fn missing_sides() {
        let styles = Styles::default();
        let c = Composer::new();
        let x = Arc::new(Style::new().bold());
        assert!(c.blend(&styles, None, None, false).is_none());
        assert!(Arc::ptr_eq(&c.blend(&styles, None, Some(&x), false).unwrap(), &x));
        assert!(Arc::ptr_eq(&c.blend(&styles, Some(&x), None, false).unwrap(), &x));
    }

    #[test]
    fn empty_overlay_returns_base_handle() {
        let styles = Styles::default();
        let c = Composer::new();
        let x = Arc::new(Style::new().fg(green()));
        let empty = Arc::new(Style::new());
        let out = c.blend(&styles, Some(&x), Some(&empty), false).unwrap();
        assert!(Arc::ptr_eq(&out, &x));
        assert!(c.is_empty());
    }

    #[test]
    fn results_are_reference_stable() {
        let styles = Styles::default();
        let c = Composer::new();
        let a = Arc::new(Style::new().fg(green()));
        let b = Arc::new(Style::new().fg(red()));

        let first = c.blend(&styles, Some(&a), Some(&b), false).unwrap();
        let second = c.blend(&styles, Some(&a), Some(&b), false).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let overridden = c.blend(&styles, Some(&a), Some(&b), true).unwrap();
        assert!(!Arc::ptr_eq(&first, &overridden));
        assert_eq!(overridden.foreground(), Some(red()));
        assert_eq!(c.len(), 2);
        assert_eq!(format!("{c:?}"), "Composer { entries: 2 }");
    }

    #[test]
    fn cache_is_keyed_by_styles_identity() {
        let one = Styles::default();
        let two = Styles::default();
        let c = Composer::new();
        let a = Arc::new(Style::new().fg(green()));
        let b = Arc::new(Style::new().fg(red()));

        let x = c.blend(&one, Some(&a), Some(&b), false).unwrap();
        let y = c.blend(&two, Some(&a), Some(&b), false).unwrap();
        assert!(!Arc::ptr_eq(&x, &y));
        assert_eq!(*x, *y);
    }

    #[test]
    fn concurrent_blends_agree() {
        let styles = Styles::default();
        let c = Composer::new();
        let a = Arc::new(Style::new().fg(green()));
        let b = Arc::new(Style::new().fg(red()));

        let results: Vec<Arc<Style>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| c.blend(&styles, Some(&a), Some(&b), false).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for r in &results[1..] {
            assert!(Arc::ptr_eq(r, &results[0]));
        }
    }
}
