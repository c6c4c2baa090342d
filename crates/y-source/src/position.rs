//! Position and span types.
//!
//! All coordinates are **1-based**. Line 1 is the first line, column 1 is the
//! first character. Columns count Unicode scalar values (chars), not bytes or
//! grapheme clusters, so a control picture that replaces a control character
//! sits in the same column as the character it replaces.
//!
//! A span covering a whole line ends at column 1 of the *next* line; that
//! sentinel is how "to end of line, including the terminator" is spelled.

use std::fmt;
use std::ops::RangeInclusive;

use crate::error::SourceError;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A position in a source: (line, column), both 1-based.
///
/// # Ordering
///
/// Lexicographic: line first, then column.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// The first character of the first line.
    pub const START: Self = Self { line: 1, column: 1 };

    #[inline]
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Column 1 of `line`.
    #[inline]
    #[must_use]
    pub const fn line_start(line: usize) -> Self {
        Self { line, column: 1 }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.column)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl From<(usize, usize)> for Position {
    fn from((line, column): (usize, usize)) -> Self {
        Self { line, column }
    }
}

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// A half-open range `[start, end)` of positions.
///
/// `start <= end` always holds: [`Span::new`] rejects anything else.
/// Ordering is lexicographic on `(start, end)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    start: Position,
    end: Position,
}

impl Span {
    /// Create a span.
    ///
    /// # Errors
    ///
    /// [`SourceError::InvalidSpan`] if `start > end`.
    pub fn new(start: impl Into<Position>, end: impl Into<Position>) -> Result<Self, SourceError> {
        let (start, end) = (start.into(), end.into());
        if start > end {
            return Err(SourceError::InvalidSpan { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build from two positions in either order.
    #[must_use]
    pub fn ordered(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// All of line `n`: `(n,1)..(n+1,1)`.
    #[inline]
    #[must_use]
    pub const fn line(n: usize) -> Self {
        Self {
            start: Position::line_start(n),
            end: Position::line_start(n + 1),
        }
    }

    /// All of lines `first..=last`. The bounds may come in either order.
    #[must_use]
    pub fn lines(first: usize, last: usize) -> Self {
        let (first, last) = (first.min(last), first.max(last));
        Self {
            start: Position::line_start(first),
            end: Position::line_start(last + 1),
        }
    }

    /// Columns `start_col..end_col` of one line. The bounds may come in
    /// either order.
    #[must_use]
    pub fn on_line(line: usize, start_col: usize, end_col: usize) -> Self {
        Self {
            start: Position::new(line, start_col.min(end_col)),
            end: Position::new(line, start_col.max(end_col)),
        }
    }

    /// A zero-width span at `at`.
    #[inline]
    #[must_use]
    pub const fn empty(at: Position) -> Self {
        Self { start: at, end: at }
    }

    #[inline]
    #[must_use]
    pub const fn start(&self) -> Position {
        self.start
    }

    #[inline]
    #[must_use]
    pub const fn end(&self) -> Position {
        self.end
    }

    // -- Predicates --------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `pos` lies in `[start, end)`.
    #[inline]
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Whether `other` lies entirely within `self`.
    #[inline]
    #[must_use]
    pub fn contains_span(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two spans share at least one position.
    #[inline]
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    // -- Lines -------------------------------------------------------------

    /// First line the span touches.
    #[inline]
    #[must_use]
    pub const fn first_line(&self) -> usize {
        self.start.line
    }

    /// Last line the span touches. A span ending at column 1 does not touch
    /// its end line (unless it is empty and starts there).
    #[must_use]
    pub const fn last_line(&self) -> usize {
        if self.end.column <= 1 && self.end.line > self.start.line {
            self.end.line - 1
        } else {
            self.end.line
        }
    }

    /// Lines touched, inclusive.
    #[must_use]
    pub const fn line_range(&self) -> RangeInclusive<usize> {
        self.first_line()..=self.last_line()
    }

    /// Number of lines touched.
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.last_line() + 1 - self.first_line()
    }

    /// The part of this span on line `n`, or `None` if it does not touch
    /// line `n`.
    ///
    /// The result may end at `(n+1, 1)`, meaning "through the end of line n".
    #[must_use]
    pub fn clip_to_line(&self, n: usize) -> Option<Self> {
        if n < self.first_line() || n > self.last_line() {
            return None;
        }
        let start = self.start.max(Position::line_start(n));
        let end = self.end.min(Position::line_start(n + 1));
        Some(Self { start, end })
    }

    /// The part of this span inside `bounds`, or `None` if they are disjoint.
    /// Empty spans survive if they sit inside `bounds`.
    #[must_use]
    pub fn clip_to(&self, bounds: &Self) -> Option<Self> {
        let start = self.start.max(bounds.start);
        let end = self.end.min(bounds.end);
        (start < end || (start == end && bounds.contains(start))).then_some(Self { start, end })
    }

    /// Move every line number by `delta`, saturating at line 1.
    #[must_use]
    pub fn shift_lines(&self, delta: isize) -> Self {
        let shift = |p: Position| {
            let line = p.line.saturating_add_signed(delta);
            Position::new(if line == 0 { 1 } else { line }, p.column)
        };
        Self {
            start: shift(self.start),
            end: shift(self.end),
        }
    }

    /// Sort spans and merge those whose line ranges touch or overlap.
    ///
    /// ```
    /// use y_source::Span;
    ///
    /// let merged = Span::union_adjacent_or_overlapping([
    ///     Span::line(5),
    ///     Span::line(1),
    ///     Span::line(2),
    /// ]);
    /// assert_eq!(merged, vec![Span::lines(1, 2), Span::line(5)]);
    /// ```
    #[must_use]
    pub fn union_adjacent_or_overlapping(spans: impl IntoIterator<Item = Self>) -> Vec<Self> {
        let mut spans: Vec<Self> = spans.into_iter().collect();
        spans.sort_unstable();

        let mut merged: Vec<Self> = Vec::with_capacity(spans.len());
        for span in spans {
            match merged.last_mut() {
                Some(last) if span.first_line() <= last.last_line() + 1 => {
                    last.end = last.end.max(span.end);
                }
                _ => merged.push(span),
            }
        }
        merged
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn span(a: (usize, usize), b: (usize, usize)) -> Span {
        Span::new(a, b).unwrap()
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn new_rejects_reversed() {
        let err = Span::new((2, 1), (1, 5)).unwrap_err();
        assert_eq!(
            err,
            SourceError::InvalidSpan {
                start: Position::new(2, 1),
                end: Position::new(1, 5)
            }
        );
    }

    #[test]
    fn new_accepts_empty() {
        assert!(span((3, 4), (3, 4)).is_empty());
    }

    #[test]
    fn line_sentinel() {
        let s = Span::line(4);
        assert_eq!(s.start(), Position::new(4, 1));
        assert_eq!(s.end(), Position::new(5, 1));
        assert_eq!(s.line_range(), 4..=4);
    }

    #[test]
    fn lines_orders_bounds() {
        assert_eq!(Span::lines(3, 2), Span::lines(2, 3));
        assert_eq!(Span::lines(2, 3).line_count(), 2);
    }

    // -- Predicates ---------------------------------------------------------

    #[test]
    fn contains_is_half_open() {
        let s = span((1, 2), (1, 5));
        assert!(!s.contains(Position::new(1, 1)));
        assert!(s.contains(Position::new(1, 2)));
        assert!(s.contains(Position::new(1, 4)));
        assert!(!s.contains(Position::new(1, 5)));
    }

    #[test]
    fn contains_span_and_intersects() {
        let outer = Span::lines(1, 3);
        let inner = span((2, 3), (2, 7));
        let touching = span((1, 5), (4, 1));
        let after = span((4, 1), (4, 3));
        assert!(outer.contains_span(&inner));
        assert!(!inner.contains_span(&outer));
        assert!(outer.intersects(&touching));
        assert!(!outer.intersects(&after));
    }

    #[test]
    fn ordering_is_lexicographic() {
        let mut v = vec![span((2, 1), (2, 3)), span((1, 4), (1, 5)), span((1, 4), (1, 4))];
        v.sort();
        assert_eq!(v[0], span((1, 4), (1, 4)));
        assert_eq!(v[2], span((2, 1), (2, 3)));
    }

    // -- Lines --------------------------------------------------------------

    #[test]
    fn last_line_excludes_sentinel() {
        assert_eq!(span((1, 3), (3, 1)).last_line(), 2);
        assert_eq!(span((1, 3), (3, 2)).last_line(), 3);
        assert_eq!(span((2, 1), (2, 1)).last_line(), 2);
    }

    #[test]
    fn clip_multiline_span() {
        let s = span((1, 3), (3, 4));
        assert_eq!(s.clip_to_line(1), Some(span((1, 3), (2, 1))));
        assert_eq!(s.clip_to_line(2), Some(Span::line(2)));
        assert_eq!(s.clip_to_line(3), Some(span((3, 1), (3, 4))));
        assert_eq!(s.clip_to_line(4), None);
    }

    #[test]
    fn clip_to_bounds() {
        let s = span((1, 3), (9, 1));
        assert_eq!(s.clip_to(&Span::lines(2, 4)), Some(Span::lines(2, 4)));
        assert_eq!(s.clip_to(&Span::line(12)), None);
    }

    #[test]
    fn shift_lines_both_ways() {
        assert_eq!(Span::line(5).shift_lines(-3), Span::line(2));
        assert_eq!(Span::line(1).shift_lines(4), Span::line(5));
    }

    // -- Union --------------------------------------------------------------

    #[test]
    fn union_merges_touching_and_overlapping() {
        let merged = Span::union_adjacent_or_overlapping([
            Span::lines(7, 9),
            Span::line(3),
            Span::lines(1, 2),
            Span::lines(8, 12),
        ]);
        assert_eq!(merged, vec![Span::lines(1, 3), Span::lines(7, 12)]);
    }

    #[test]
    fn union_of_nothing_is_empty() {
        assert!(Span::union_adjacent_or_overlapping([]).is_empty());
    }
}
