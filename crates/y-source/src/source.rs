//! Line-addressed text with classification and overlays.
//!
//! A [`Source`] is an ordered list of lines (no terminators) plus:
//!
//! - per-line classified segments, attached once by [`Source::classify`];
//! - overlays, `(category, span)` pairs appended in order, which the printer
//!   layers over the classification in insertion order.
//!
//! Lines are numbered `1..=line_count()` and never change after
//! construction. Overlays are clipped to the lines that exist.

use std::fmt;

use log::debug;
use y_theme::Category;

use crate::classify::{Classify, Segment};
use crate::error::SourceError;
use crate::position::{Position, Span};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Construction options for a [`Source`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceOptions {
    pub name: Option<String>,
}

impl SourceOptions {
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Per-line data
// ---------------------------------------------------------------------------

/// A classified stretch of one line: columns `start..end`, 1-based, end
/// exclusive. `start == end` marks a zero-width segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub start: usize,
    pub end: usize,
    pub category: Category,
}

impl LineSegment {
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub fn span(&self, line: usize) -> Span {
        Span::on_line(line, self.start, self.end)
    }
}

/// A category layered over a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    pub category: Category,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Source {
    name: Option<String>,
    lines: Vec<String>,
    /// Whether the text this came from ended with a line terminator.
    trailing_newline: bool,
    segments: Vec<Vec<LineSegment>>,
    classified: bool,
    overlays: Vec<Overlay>,
}

impl Source {
    /// Split `text` on LF. A final LF terminates the last line rather than
    /// starting an empty one; a CR before each LF is dropped.
    #[must_use]
    pub fn from_string(text: &str, options: SourceOptions) -> Self {
        let trailing_newline = text.ends_with('\n');
        let body = text.strip_suffix('\n').unwrap_or(text);
        let lines = if text.is_empty() {
            Vec::new()
        } else {
            body.split('\n')
                .map(|l| l.strip_suffix('\r').unwrap_or(l).to_owned())
                .collect()
        };
        let mut source = Self::from_lines(lines, options);
        source.trailing_newline = trailing_newline;
        source
    }

    #[must_use]
    pub fn from_lines<I, S>(lines: I, options: SourceOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let segments = vec![Vec::new(); lines.len()];
        Self {
            name: options.name,
            lines,
            trailing_newline: false,
            segments,
            classified: false,
            overlays: Vec::new(),
        }
    }

    /// An empty source that the diff engine fills line by line.
    pub(crate) fn builder(name: Option<String>) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub(crate) fn push_line(&mut self, text: String, segments: Vec<LineSegment>) {
        self.classified |= !segments.is_empty();
        self.lines.push(text);
        self.segments.push(segments);
    }

    // -- Accessors -----------------------------------------------------------

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line `n` (1-based), or `None` if out of range.
    #[must_use]
    pub fn line(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    /// Line `n`, or [`SourceError::LineOutOfRange`].
    ///
    /// # Errors
    ///
    /// If `n` is 0 or past the last line.
    pub fn try_line(&self, n: usize) -> Result<&str, SourceError> {
        self.line(n).ok_or(SourceError::LineOutOfRange {
            line: n,
            count: self.line_count(),
        })
    }

    pub fn lines(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.lines.iter().map(String::as_str)
    }

    #[must_use]
    pub const fn ends_with_newline(&self) -> bool {
        self.trailing_newline
    }

    /// The whole text, terminated the way it was given.
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        if self.trailing_newline {
            text.push('\n');
        }
        text
    }

    /// The text covered by `span`, lines joined with `\n`. Parts of the span
    /// outside the source are ignored.
    #[must_use]
    pub fn substring(&self, span: &Span) -> String {
        let last = span.last_line().min(self.line_count());
        let mut parts = Vec::new();
        for n in span.first_line().max(1)..=last {
            let Some(clip) = span.clip_to_line(n) else {
                continue;
            };
            let Some(line) = self.line(n) else {
                continue;
            };
            let from = clip.start().column.saturating_sub(1);
            let part: String = if clip.end().line > n {
                line.chars().skip(from).collect()
            } else {
                let to = clip.end().column.saturating_sub(1);
                line.chars().skip(from).take(to.saturating_sub(from)).collect()
            };
            parts.push(part);
        }
        parts.join("\n")
    }

    // -- Classification ------------------------------------------------------

    /// Classify the text and attach the resulting segments.
    ///
    /// # Errors
    ///
    /// [`SourceError::OverlappingSegments`] if the classifier produced
    /// overlapping segments. That is a classifier bug, so debug builds also
    /// assert.
    pub fn classify(&mut self, classifier: &impl Classify) -> Result<(), SourceError> {
        let segments = classifier.classify(&self.lines.join("\n"));
        let result = self.attach_segments(segments);
        debug_assert!(result.is_ok(), "classifier produced overlapping segments: {result:?}");
        result
    }

    /// Attach externally classified segments, replacing any previous ones.
    /// Multi-line segments are split per line; parts beyond the last line
    /// are dropped.
    ///
    /// # Errors
    ///
    /// [`SourceError::OverlappingSegments`] if two segments claim the same
    /// column. On error the source keeps its previous classification.
    pub fn attach_segments(
        &mut self,
        segments: impl IntoIterator<Item = Segment>,
    ) -> Result<(), SourceError> {
        let mut per_line: Vec<Vec<LineSegment>> = vec![Vec::new(); self.line_count()];
        let mut total = 0usize;

        for segment in segments {
            let span = segment.span;
            let whole_empty = span.is_empty();
            for n in span.line_range() {
                let Some(slot) = n.checked_sub(1).and_then(|i| per_line.get_mut(i)) else {
                    continue;
                };
                let Some(clip) = span.clip_to_line(n) else {
                    continue;
                };
                let width = self.lines[n - 1].chars().count();
                let start = clip.start().column;
                let end = if clip.end().line > n {
                    width + 1
                } else {
                    clip.end().column
                };
                if start == end && !whole_empty {
                    continue;
                }
                slot.push(LineSegment {
                    start,
                    end,
                    category: segment.category,
                });
                total += 1;
            }
        }

        for (idx, line) in per_line.iter_mut().enumerate() {
            line.sort_by_key(|s| (s.start, s.end));
            if let Some(pair) = line.windows(2).find(|w| w[0].end > w[1].start) {
                return Err(SourceError::OverlappingSegments {
                    line: idx + 1,
                    first: (pair[0].start, pair[0].end),
                    second: (pair[1].start, pair[1].end),
                });
            }
        }

        debug!("attached {total} segments to {} lines", self.line_count());
        self.segments = per_line;
        self.classified = true;
        Ok(())
    }

    #[must_use]
    pub const fn is_classified(&self) -> bool {
        self.classified
    }

    /// Classified segments of line `n`, sorted; empty if unclassified or
    /// out of range.
    #[must_use]
    pub fn segments(&self, n: usize) -> &[LineSegment] {
        n.checked_sub(1)
            .and_then(|i| self.segments.get(i))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    // -- Overlays ------------------------------------------------------------

    fn bounds(&self) -> Span {
        Span::ordered(
            Position::START,
            Position::line_start(self.line_count() + 1),
        )
    }

    /// Append an overlay, clipped to the source's lines. An overlay that
    /// lies entirely outside is dropped.
    pub fn add_overlay(&mut self, category: Category, span: Span) {
        if let Some(span) = span.clip_to(&self.bounds()) {
            self.overlays.push(Overlay { category, span });
        }
    }

    /// Append one overlay per span, in order.
    pub fn add_overlays(&mut self, category: Category, spans: impl IntoIterator<Item = Span>) {
        for span in spans {
            self.add_overlay(category, span);
        }
    }

    /// All overlays in insertion order.
    #[must_use]
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// The per-line parts of the overlays touching line `n`, in insertion
    /// order.
    pub fn overlays_on_line(&self, n: usize) -> impl Iterator<Item = (Category, Span)> + '_ {
        self.overlays
            .iter()
            .filter_map(move |o| o.span.clip_to_line(n).map(|s| (o.category, s)))
    }

    // -- Slicing -------------------------------------------------------------

    /// Lines `first..=last` as a new source, renumbered from 1. Bounds are
    /// clamped; overlays are clipped and shifted.
    #[must_use]
    pub fn slice(&self, first: usize, last: usize) -> Self {
        let first = first.max(1);
        let last = last.min(self.line_count());
        if first > last {
            return Self::builder(self.name.clone());
        }

        let range = Span::lines(first, last);
        let delta = -isize::try_from(first - 1).unwrap_or(isize::MAX);
        let overlays = self
            .overlays
            .iter()
            .filter_map(|o| {
                o.span.clip_to(&range).map(|span| Overlay {
                    category: o.category,
                    span: span.shift_lines(delta),
                })
            })
            .collect();

        Self {
            name: self.name.clone(),
            lines: self.lines[first - 1..last].to_vec(),
            trailing_newline: false,
            segments: self.segments[first - 1..last].to_vec(),
            classified: self.classified,
            overlays,
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("name", &self.name)
            .field("lines", &self.lines.len())
            .field("classified", &self.classified)
            .field("overlays", &self.overlays.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::lexer::Lexer;
    use pretty_assertions::assert_eq;

    fn source(text: &str) -> Source {
        Source::from_string(text, SourceOptions::default())
    }

    fn span(a: (usize, usize), b: (usize, usize)) -> Span {
        Span::new(a, b).unwrap()
    }

    // ── Construction ──

    #[test]
    fn trailing_newline_is_a_terminator() {
        let s = source("a\nb\n");
        assert_eq!(s.line_count(), 2);
        assert!(s.ends_with_newline());
        assert_eq!(s.text(), "a\nb\n");
    }

    #[test]
    fn empty_and_blank_inputs() {
        assert_eq!(source("").line_count(), 0);
        assert_eq!(source("\n").line_count(), 1);
        assert_eq!(source("a\n\n").lines().collect::<Vec<_>>(), ["a", ""]);
    }

    #[test]
    fn crlf_is_normalized() {
        let s = source("a\r\nb\r\n");
        assert_eq!(s.lines().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn line_lookup() {
        let s = Source::from_lines(["x", "y"], SourceOptions::default().with_name("f.yaml"));
        assert_eq!(s.name(), Some("f.yaml"));
        assert_eq!(s.line(2), Some("y"));
        assert_eq!(s.line(0), None);
        assert_eq!(
            s.try_line(3),
            Err(SourceError::LineOutOfRange { line: 3, count: 2 })
        );
    }

    #[test]
    fn substring_within_and_across_lines() {
        let s = source("héllo\nworld\n");
        assert_eq!(s.substring(&span((1, 2), (1, 4))), "él");
        assert_eq!(s.substring(&span((1, 4), (2, 3))), "lo\nwo");
        assert_eq!(s.substring(&Span::line(2)), "world");
    }

    // ── Classification ──

    #[test]
    fn classify_splits_per_line() {
        let mut s = source("a: 1\nb: x\n");
        s.classify(&Classifier::<Lexer>::default()).unwrap();
        assert!(s.is_classified());
        assert_eq!(
            s.segments(1),
            [
                LineSegment { start: 1, end: 2, category: Category::NameTag },
                LineSegment { start: 2, end: 3, category: Category::PunctuationMappingValue },
                LineSegment { start: 4, end: 5, category: Category::LiteralNumberInteger },
            ]
        );
        assert!(s.segments(9).is_empty());
    }

    #[test]
    fn multi_line_segment_is_split() {
        let mut s = source("k: \"a\n  b\"\n");
        s.classify(&Classifier::<Lexer>::default()).unwrap();
        assert_eq!(s.segments(1)[2].start, 4);
        assert_eq!(s.segments(1)[2].end, 6);
        assert_eq!(s.segments(2)[0].start, 1);
        assert_eq!(s.segments(2)[0].end, 5);
    }

    #[test]
    fn overlapping_segments_are_rejected() {
        let mut s = source("abcdef");
        let err = s
            .attach_segments([
                Segment::new(span((1, 1), (1, 4)), Category::Text, "abc"),
                Segment::new(span((1, 3), (1, 5)), Category::Comment, "cd"),
            ])
            .unwrap_err();
        assert_eq!(
            err,
            SourceError::OverlappingSegments { line: 1, first: (1, 4), second: (3, 5) }
        );
        assert!(!s.is_classified());
    }

    #[test]
    fn zero_width_segment_survives() {
        let mut s = source("k:");
        s.classify(&Classifier::<Lexer>::default()).unwrap();
        let last = s.segments(1).last().copied().unwrap();
        assert_eq!((last.start, last.end), (3, 3));
        assert_eq!(last.category, Category::LiteralNullImplicit);
    }

    // ── Overlays ──

    #[test]
    fn overlays_are_clipped_to_lines() {
        let mut s = source("a\nb\n");
        s.add_overlay(Category::Highlight, Span::lines(2, 5));
        s.add_overlay(Category::Highlight, Span::line(7));
        assert_eq!(s.overlays().len(), 1);
        assert_eq!(s.overlays()[0].span, Span::line(2));
    }

    #[test]
    fn overlays_on_line_keep_insertion_order() {
        let mut s = source("abc\ndef\n");
        s.add_overlay(Category::GenericDeleted, span((1, 2), (2, 3)));
        s.add_overlay(Category::Highlight, span((2, 1), (2, 2)));
        let on_two: Vec<_> = s.overlays_on_line(2).collect();
        assert_eq!(
            on_two,
            [
                (Category::GenericDeleted, span((2, 1), (2, 3))),
                (Category::Highlight, span((2, 1), (2, 2))),
            ]
        );
    }

    // ── Slicing ──

    #[test]
    fn slice_renumbers_and_translates_overlays() {
        let mut s = source("1\n2\n3\n4\n");
        s.add_overlay(Category::Highlight, span((2, 1), (3, 2)));
        s.add_overlay(Category::Highlight, Span::line(1));
        let sliced = s.slice(3, 10);
        assert_eq!(sliced.lines().collect::<Vec<_>>(), ["3", "4"]);
        assert!(!sliced.ends_with_newline());
        assert_eq!(sliced.overlays().len(), 1);
        assert_eq!(sliced.overlays()[0].span, span((1, 1), (1, 2)));
    }

    #[test]
    fn empty_slice() {
        assert!(source("a\n").slice(3, 2).is_empty());
    }
}
