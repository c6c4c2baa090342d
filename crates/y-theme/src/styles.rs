//! The `Styles` map: category → resolved style, O(1) lookup.
//!
//! A map is built from a base style plus per-category overrides. At
//! construction every category is resolved once, walking the inheritance
//! tree top-down:
//!
//! - a category without an override shares its parent's `Arc<Style>`;
//! - a category with an override gets its override laid over the parent's
//!   resolved style with [`override_style`]: the override's visible colors
//!   win, attribute flags accumulate down the tree, and transforms nest.
//!
//! So an override only has to name what differs from its parent. A bold
//! `Literal` with an italic `LiteralString` renders strings bold and italic
//! in the `Literal` color; the builtin palettes rely on this (an underlined
//! `GenericErrorInvalid` keeps the `GenericError` color).
//!
//! Maps are immutable; [`Styles::with`] derives a new one. Each map carries a
//! process-unique id so blend caches can tell palettes apart even when two
//! maps happen to share style allocations.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use y_term::Style;

use crate::category::Category;
use crate::compose::override_style;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A resolved category → style table.
#[derive(Clone)]
pub struct Styles {
    id: u64,
    base: Style,
    overrides: Vec<Option<Style>>,
    resolved: Vec<Arc<Style>>,
}

impl Styles {
    /// Build a map from a base style and per-category overrides.
    ///
    /// Later overrides for the same category replace earlier ones.
    ///
    /// ```
    /// use y_term::{Color, Style};
    /// use y_theme::{Category, Styles};
    ///
    /// let styles = Styles::new(
    ///     Style::new(),
    ///     [(Category::Literal, Style::new().fg(Color::rgb8(200, 120, 40)))],
    /// );
    /// // Undefined children look like their parent.
    /// assert_eq!(
    ///     styles.get(Category::LiteralNumberHex),
    ///     styles.get(Category::Literal),
    /// );
    /// ```
    #[must_use]
    pub fn new(base: Style, overrides: impl IntoIterator<Item = (Category, Style)>) -> Self {
        let mut table = vec![None; Category::COUNT];
        for (category, style) in overrides {
            table[category.index()] = Some(style);
        }
        Self::resolve(base, table)
    }

    fn resolve(base: Style, overrides: Vec<Option<Style>>) -> Self {
        let mut resolved: Vec<Arc<Style>> = Vec::with_capacity(Category::COUNT);
        for &category in Category::ALL {
            let parent = if category.is_root() {
                None
            } else {
                Some(&resolved[category.parent().index()])
            };
            let style = match (parent, &overrides[category.index()]) {
                (Some(parent), None) => Arc::clone(parent),
                (Some(parent), Some(own)) => Arc::new(override_style(parent, own)),
                (None, Some(own)) => Arc::new(override_style(&base, own)),
                (None, None) => Arc::new(base.clone()),
            };
            resolved.push(style);
        }

        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            base,
            overrides,
            resolved,
        }
    }

    /// Derive a new map with additional overrides. `self` is unchanged.
    #[must_use]
    pub fn with(&self, overrides: impl IntoIterator<Item = (Category, Style)>) -> Self {
        let mut table = self.overrides.clone();
        for (category, style) in overrides {
            table[category.index()] = Some(style);
        }
        Self::resolve(self.base.clone(), table)
    }

    /// The resolved style handle for `category`.
    ///
    /// Handles are stable for the lifetime of the map; inherited categories
    /// return the very same `Arc` as their parent.
    #[inline]
    #[must_use]
    pub fn style(&self, category: Category) -> &Arc<Style> {
        &self.resolved[category.index()]
    }

    /// The resolved style for `category`.
    #[inline]
    #[must_use]
    pub fn get(&self, category: Category) -> &Style {
        &self.resolved[category.index()]
    }

    /// Whether `category` carries its own override.
    #[inline]
    #[must_use]
    pub fn is_defined(&self, category: Category) -> bool {
        self.overrides[category.index()].is_some()
    }

    /// Process-unique identity of this map.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// The base style everything inherits from.
    #[inline]
    #[must_use]
    pub const fn base(&self) -> &Style {
        &self.base
    }
}

impl Default for Styles {
    /// A map with no styling at all.
    fn default() -> Self {
        Self::new(Style::new(), [])
    }
}

impl fmt::Debug for Styles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let defined: Vec<_> = Category::ALL
            .iter()
            .filter(|c| self.is_defined(**c))
            .map(|c| c.name())
            .collect();
        f.debug_struct("Styles")
            .field("id", &self.id)
            .field("defined", &defined)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use y_term::{Attr, Color};

    fn red() -> Color {
        Color::rgb8(220, 40, 40)
    }

    fn sample() -> Styles {
        Styles::new(
            Style::new().fg(Color::WHITE),
            [
                (Category::Literal, Style::new().fg(red())),
                (Category::LiteralString, Style::new().italic()),
            ],
        )
    }

    #[test]
    fn undefined_categories_share_parent_handle() {
        let styles = sample();
        for &c in Category::ALL {
            if !c.is_root() && !styles.is_defined(c) {
                assert!(Arc::ptr_eq(styles.style(c), styles.style(c.parent())));
                assert_eq!(styles.get(c), styles.get(c.parent()));
            }
        }
    }

    #[test]
    fn overrides_cascade_over_parent() {
        let styles = sample();
        let s = styles.get(Category::LiteralStringDouble);
        assert_eq!(s.foreground(), Some(red()));
        assert_eq!(s.attributes(), Attr::ITALIC);
    }

    #[test]
    fn override_attributes_accumulate() {
        let styles = Styles::new(
            Style::new(),
            [
                (Category::Literal, Style::new().bold()),
                (Category::LiteralString, Style::new().italic()),
            ],
        );
        assert_eq!(
            styles.get(Category::LiteralString).attributes(),
            Attr::BOLD | Attr::ITALIC
        );
        assert_eq!(styles.get(Category::LiteralNumber).attributes(), Attr::BOLD);
        assert_eq!(styles.get(Category::Literal).attributes(), Attr::BOLD);
    }

    #[test]
    fn root_takes_base() {
        let styles = sample();
        assert_eq!(styles.get(Category::Text).foreground(), Some(Color::WHITE));
        assert_eq!(styles.get(Category::NameTag).foreground(), Some(Color::WHITE));
    }

    #[test]
    fn with_derives_without_mutation() {
        let styles = sample();
        let derived = styles.with([(Category::NameTag, Style::new().bold())]);

        assert!(!styles.is_defined(Category::NameTag));
        assert!(derived.is_defined(Category::NameTag));
        assert!(derived.get(Category::NameTag).is_bold());
        assert!(!styles.get(Category::NameTag).is_bold());
        assert_ne!(styles.id(), derived.id());
        // Earlier overrides survive derivation.
        assert_eq!(derived.get(Category::Literal).foreground(), Some(red()));
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Styles::default().id(), Styles::default().id());
    }
}
