//! Styled emission of sources.
//!
//! # Per-line pipeline
//!
//! ```text
//!  classified segments ──▶ per-char Arc<Style> ──▶ overlays folded in
//!                                                  (insertion order, blended)
//!            ──▶ runs of identical Arc ──▶ escape / expand tabs ──▶ SGR
//! ```
//!
//! Every character starts with the `Text` style; segments replace it with
//! their category's style; then each overlay touching the character is
//! blended on top through the [`Composer`], whose cache hands back the same
//! `Arc` for the same pair. Runs are split wherever the `Arc` changes, so a
//! line costs one SGR switch per visual change, not per character.

use std::sync::Arc;

use log::trace;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;
use y_source::{Source, Span};
use y_term::Style;
use y_term::control::escape_char;
use y_term::output::{OutputBuffer, StyleWriter};
use y_theme::{Category, Composer};

use crate::gutter::GutterContext;
use crate::options::PrinterOptions;

/// Renders sources to ANSI text. Holds the options and a composer whose
/// cache lives as long as the printer.
#[derive(Debug, Default)]
pub struct Printer {
    options: PrinterOptions,
    composer: Composer,
}

impl Printer {
    #[must_use]
    pub fn new(options: PrinterOptions) -> Self {
        Self {
            options,
            composer: Composer::new(),
        }
    }

    #[must_use]
    pub const fn options(&self) -> &PrinterOptions {
        &self.options
    }

    #[must_use]
    pub const fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Every line, joined with `\n`, with a final `\n` if the source text
    /// had one.
    #[must_use]
    pub fn print(&self, source: &Source) -> String {
        let mut out = self.render_lines(source, 1, source.line_count());
        if source.ends_with_newline() && !source.is_empty() {
            out.push('\n');
        }
        out
    }

    /// Lines `first..=last` (1-based). Out-of-range bounds are clipped; an
    /// empty range renders nothing.
    #[must_use]
    pub fn print_slice(&self, source: &Source, first: usize, last: usize) -> String {
        self.render_lines(source, first.max(1), last.min(source.line_count()))
    }

    /// The lines touched by `spans`. Spans are merged when their lines touch
    /// or overlap; separate groups are joined by one separator line.
    #[must_use]
    pub fn print_spans(&self, source: &Source, spans: impl IntoIterator<Item = Span>) -> String {
        let blocks: Vec<String> = Span::union_adjacent_or_overlapping(spans)
            .into_iter()
            .filter_map(|span| {
                let first = span.first_line().max(1);
                let last = span.last_line().min(source.line_count());
                (first <= last).then(|| self.render_lines(source, first, last))
            })
            .collect();
        blocks.join(&format!("\n{}\n", self.options.span_separator))
    }

    fn render_lines(&self, source: &Source, first: usize, last: usize) -> String {
        if first > last {
            return String::new();
        }
        let mut out = OutputBuffer::new();
        for n in first..=last {
            if n > first {
                out.push('\n');
            }
            self.render_line(source, n, &mut out);
        }
        out.into_string()
    }

    // -- One line ------------------------------------------------------------

    fn render_line(&self, source: &Source, n: usize, out: &mut OutputBuffer) {
        let styles = &*self.options.styles;
        let text = source.line(n).unwrap_or_default();
        let chars: Vec<char> = text.chars().collect();
        trace!("rendering line {n} ({} chars)", chars.len());

        if let Some(gutter) = &self.options.gutter {
            let ctx = GutterContext {
                source,
                styles,
                color_depth: self.options.color_depth,
            };
            out.push_str(&gutter.render(n, &ctx));
        }

        // Base classification.
        let mut cells: Vec<Arc<Style>> = vec![Arc::clone(styles.style(Category::Text)); chars.len()];
        let mut inserts: Vec<(usize, Arc<Style>)> = Vec::new();
        for segment in source.segments(n) {
            let style = styles.style(segment.category);
            if segment.is_empty() {
                if style.transformer().is_some() {
                    inserts.push((segment.start, Arc::clone(style)));
                }
                continue;
            }
            for cell in cells_in(&mut cells, segment.start, segment.end) {
                *cell = Arc::clone(style);
            }
        }

        // Overlays, in insertion order.
        for (category, span) in source.overlays_on_line(n) {
            let overlay = styles.style(category);
            let start = if span.start().line < n { 1 } else { span.start().column };
            let end = if span.end().line > n {
                chars.len() + 1
            } else {
                span.end().column
            };
            for cell in cells_in(&mut cells, start, end) {
                if let Some(blended) = self.composer.blend(styles, Some(cell), Some(overlay), false) {
                    *cell = blended;
                }
            }
        }

        let mut writer = StyleWriter::new(self.options.color_depth);
        let mut emitter = Emitter {
            options: &self.options,
            writer: &mut writer,
            out,
            display_col: 0,
        };

        let mut inserts = inserts.into_iter().peekable();
        let mut i = 0;
        while i < chars.len() || inserts.peek().is_some() {
            while let Some((_, style)) = inserts.next_if(|(col, _)| *col <= i + 1) {
                emitter.emit(&style, "");
            }
            if i >= chars.len() {
                break;
            }
            let style = &cells[i];
            let next_insert = inserts.peek().map_or(usize::MAX, |(col, _)| col - 1);
            let mut j = i + 1;
            while j < chars.len() && j < next_insert && Arc::ptr_eq(&cells[j], style) {
                j += 1;
            }
            let run: String = chars[i..j].iter().collect();
            emitter.emit(style, &run);
            i = j;
        }
        writer.finish_line(out);
    }
}

/// The cells for 1-based columns `start..end`, clipped to the line.
fn cells_in(cells: &mut [Arc<Style>], start: usize, end: usize) -> &mut [Arc<Style>] {
    let len = cells.len();
    let from = start.saturating_sub(1).min(len);
    let to = end.saturating_sub(1).clamp(from, len);
    &mut cells[from..to]
}

/// Writes runs of one line, tracking the display column for tab stops.
struct Emitter<'a> {
    options: &'a PrinterOptions,
    writer: &'a mut StyleWriter,
    out: &'a mut OutputBuffer,
    display_col: usize,
}

impl Emitter<'_> {
    fn emit(&mut self, style: &Style, run: &str) {
        let visible = if self.options.control_escape {
            run.chars().map(escape_char).collect()
        } else {
            self.expand_tabs(run)
        };
        let text = style.apply_transform(&visible);
        self.writer.write_run(self.out, style, &text);
    }

    /// Replace each TAB with spaces up to the next tab stop. Widths are
    /// measured per grapheme cluster.
    fn expand_tabs(&mut self, run: &str) -> String {
        let tab = self.options.tab_width.max(1);
        let mut expanded = String::with_capacity(run.len());
        for grapheme in run.graphemes(true) {
            if grapheme == "\t" {
                let pad = tab - self.display_col % tab;
                expanded.extend(std::iter::repeat_n(' ', pad));
                self.display_col += pad;
            } else {
                expanded.push_str(grapheme);
                self.display_col += grapheme.width();
            }
        }
        expanded
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
