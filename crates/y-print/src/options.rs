//! Printer configuration.

use std::fmt;
use std::sync::Arc;

use y_term::ColorDepth;
use y_theme::Styles;
use y_theme::builtin::{DEFAULT_THEME, default_styles};
use y_theme::registry;

use crate::gutter::Gutter;

/// Default visible width of a TAB when control escaping is off.
pub const DEFAULT_TAB_WIDTH: usize = 8;

#[derive(Clone)]
pub struct PrinterOptions {
    /// Styles used to resolve categories. Default: the built-in dark theme.
    pub styles: Arc<Styles>,
    /// Called once per rendered line; its output prefixes the line.
    pub gutter: Option<Arc<dyn Gutter>>,
    /// Show control characters as control pictures (`␛`, `␀`, `␉`, ...).
    pub control_escape: bool,
    /// Tab stop interval, used only when `control_escape` is off.
    pub tab_width: usize,
    pub color_depth: ColorDepth,
    /// Text of the line emitted between non-adjacent spans in
    /// [`Printer::print_spans`](crate::Printer::print_spans).
    pub span_separator: String,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            styles: registry::lookup(DEFAULT_THEME).unwrap_or_else(|| Arc::new(default_styles())),
            gutter: None,
            control_escape: true,
            tab_width: DEFAULT_TAB_WIDTH,
            color_depth: ColorDepth::TrueColor,
            span_separator: String::new(),
        }
    }
}

impl PrinterOptions {
    #[must_use]
    pub fn with_styles(mut self, styles: Arc<Styles>) -> Self {
        self.styles = styles;
        self
    }

    #[must_use]
    pub fn with_gutter(mut self, gutter: impl Gutter + 'static) -> Self {
        self.gutter = Some(Arc::new(gutter));
        self
    }

    #[must_use]
    pub fn with_control_escape(mut self, on: bool) -> Self {
        self.control_escape = on;
        self
    }

    /// Tab stop interval; 0 is treated as 1.
    #[must_use]
    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width.max(1);
        self
    }

    #[must_use]
    pub fn with_color_depth(mut self, depth: ColorDepth) -> Self {
        self.color_depth = depth;
        self
    }

    #[must_use]
    pub fn with_span_separator(mut self, separator: impl Into<String>) -> Self {
        self.span_separator = separator.into();
        self
    }
}

impl fmt::Debug for PrinterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrinterOptions")
            .field("styles", &self.styles)
            .field("gutter", &self.gutter.is_some())
            .field("control_escape", &self.control_escape)
            .field("tab_width", &self.tab_width)
            .field("color_depth", &self.color_depth)
            .field("span_separator", &self.span_separator)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = PrinterOptions::default();
        assert!(opts.control_escape);
        assert_eq!(opts.tab_width, 8);
        assert!(opts.gutter.is_none());
        assert!(Arc::ptr_eq(&opts.styles, &registry::lookup("dark").unwrap()));
    }

    #[test]
    fn zero_tab_width_is_clamped() {
        assert_eq!(PrinterOptions::default().with_tab_width(0).tab_width, 1);
    }
}
