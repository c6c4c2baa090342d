//! Line gutters.
//!
//! A [`Gutter`] is called once per rendered line with the line's number in
//! the source being printed and returns the text to put in front of it.
//! Numbers are always the source's own, even when printing a slice.
//!
//! Two gutters ship with the crate: [`LineNumbers`] and [`DiffMarkers`].
//! Any `Fn(usize, &GutterContext) -> String` is a gutter too.

use y_source::{DiffLine, DiffView, LineKind, Source};
use y_term::output::{OutputBuffer, StyleWriter};
use y_term::{ColorDepth, Style};
use y_theme::{Category, Styles};

/// What a gutter may consult while rendering.
#[derive(Debug, Clone, Copy)]
pub struct GutterContext<'a> {
    pub source: &'a Source,
    pub styles: &'a Styles,
    pub color_depth: ColorDepth,
}

impl GutterContext<'_> {
    /// `text` in `style`, as SGR-wrapped terminal text.
    #[must_use]
    pub fn paint(&self, style: &Style, text: &str) -> String {
        let mut out = OutputBuffer::new();
        let mut writer = StyleWriter::new(self.color_depth);
        writer.write_run(&mut out, style, text);
        writer.finish_line(&mut out);
        out.into_string()
    }

    /// `text` in the style of `category`.
    #[must_use]
    pub fn paint_category(&self, category: Category, text: &str) -> String {
        self.paint(self.styles.get(category), text)
    }
}

pub trait Gutter: Send + Sync {
    fn render(&self, line: usize, ctx: &GutterContext<'_>) -> String;
}

impl<F> Gutter for F
where
    F: Fn(usize, &GutterContext<'_>) -> String + Send + Sync,
{
    fn render(&self, line: usize, ctx: &GutterContext<'_>) -> String {
        self(line, ctx)
    }
}

/// Columns needed for right-aligned numbers up to `line_count`, plus one
/// separator space.
#[must_use]
pub fn gutter_width(line_count: usize) -> usize {
    // At least 1, so ilog10 doesn't panic on 0.
    let digits = line_count.max(1).ilog10() as usize + 1;
    digits + 1
}

// ---------------------------------------------------------------------------
// Line numbers
// ---------------------------------------------------------------------------

/// Right-aligned line numbers sized to the source, in `TextSubtleDim`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineNumbers;

impl Gutter for LineNumbers {
    fn render(&self, line: usize, ctx: &GutterContext<'_>) -> String {
        let digits = gutter_width(ctx.source.line_count()) - 1;
        let number = format!("{line:>digits$}");
        format!("{} ", ctx.paint_category(Category::TextSubtleDim, &number))
    }
}

// ---------------------------------------------------------------------------
// Diff markers
// ---------------------------------------------------------------------------

/// `-`/`+` markers for the lines of a [`DiffView`], optionally preceded by
/// the origin and tip line numbers.
#[derive(Debug, Clone)]
pub struct DiffMarkers {
    lines: Vec<DiffLine>,
    numbers: bool,
    width: usize,
}

impl DiffMarkers {
    #[must_use]
    pub fn new(view: &DiffView) -> Self {
        let widest = view
            .lines()
            .iter()
            .flat_map(|l| l.origin.into_iter().chain(l.tip))
            .max()
            .unwrap_or(1);
        Self {
            lines: view.lines().to_vec(),
            numbers: false,
            width: gutter_width(widest) - 1,
        }
    }

    /// Also show origin and tip line numbers.
    #[must_use]
    pub fn with_numbers(mut self, on: bool) -> Self {
        self.numbers = on;
        self
    }
}

impl Gutter for DiffMarkers {
    fn render(&self, line: usize, ctx: &GutterContext<'_>) -> String {
        let Some(info) = line.checked_sub(1).and_then(|i| self.lines.get(i)) else {
            return String::new();
        };
        let (marker, category) = match info.kind {
            LineKind::Deleted => ("-", Category::GenericDeleted),
            LineKind::Inserted => ("+", Category::GenericInserted),
            LineKind::Unchanged => (" ", Category::TextSubtle),
            LineKind::Separator => ("⋯", Category::TextSubtleDim),
        };

        let mut out = String::new();
        if self.numbers {
            let width = self.width;
            let num = |n: Option<usize>| n.map_or_else(|| " ".repeat(width), |n| format!("{n:>width$}"));
            let numbers = format!("{} {}", num(info.origin), num(info.tip));
            out.push_str(&ctx.paint_category(Category::TextSubtleDim, &numbers));
            out.push(' ');
        }
        out.push_str(&ctx.paint_category(category, marker));
        out.push(' ');
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use y_source::{SourceOptions, full_diff};
    use y_term::ansi::strip;
    use y_theme::builtin::default_styles;

    fn source(text: &str) -> Source {
        Source::from_string(text, SourceOptions::default())
    }

    // ── gutter_width ──

    #[test]
    fn width_grows_with_digits() {
        assert_eq!(gutter_width(0), 2);
        assert_eq!(gutter_width(9), 2);
        assert_eq!(gutter_width(10), 3);
        assert_eq!(gutter_width(999), 4);
        assert_eq!(gutter_width(1000), 5);
    }

    // ── LineNumbers ──

    #[test]
    fn numbers_are_right_aligned() {
        let src = Source::from_lines(vec!["x"; 12], SourceOptions::default());
        let styles = default_styles();
        let ctx = GutterContext { source: &src, styles: &styles, color_depth: ColorDepth::TrueColor };
        assert_eq!(strip(&LineNumbers.render(3, &ctx)), " 3 ");
        assert_eq!(strip(&LineNumbers.render(12, &ctx)), "12 ");
    }

    #[test]
    fn closures_are_gutters() {
        let src = source("a\n");
        let styles = default_styles();
        let ctx = GutterContext { source: &src, styles: &styles, color_depth: ColorDepth::TrueColor };
        fn gutter_fn<F: Fn(usize, &GutterContext<'_>) -> String + Send + Sync>(f: F) -> F {
            f
        }
        let g = gutter_fn(|n, _| format!("{n}|"));
        assert_eq!(g.render(7, &ctx), "7|");
    }

    // ── DiffMarkers ──

    #[test]
    fn diff_markers() {
        let view = full_diff(&source("a\nb\n"), &source("a\nB\n"));
        let styles = default_styles();
        let ctx = GutterContext {
            source: view.source(),
            styles: &styles,
            color_depth: ColorDepth::TrueColor,
        };
        let plain = DiffMarkers::new(&view);
        let rendered: Vec<String> = (1..=3).map(|n| strip(&plain.render(n, &ctx))).collect();
        assert_eq!(rendered, ["  ", "- ", "+ "]);

        let numbered = DiffMarkers::new(&view).with_numbers(true);
        assert_eq!(strip(&numbered.render(2, &ctx)), "2   - ");
        assert_eq!(strip(&numbered.render(3, &ctx)), "  2 + ");
        assert_eq!(numbered.render(9, &ctx), "");
    }
}
