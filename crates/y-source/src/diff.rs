//! Line diffs between two sources.
//!
//! [`diff_lines`] runs Myers' O(ND) algorithm over whole lines and returns
//! an edit script. Within every run of changes, deletions are moved ahead of
//! insertions so a replaced line reads as "old, then new".
//!
//! When several longest common subsequences exist, Myers keeps whichever its
//! search meets first, which depends on argument order. The search therefore
//! always runs from the lesser side to the greater and the script is mirrored
//! back, so `diff(a, b)` and `diff(b, a)` keep the same common lines.
//!
//! The two views wrap that script in a synthetic [`Source`] the printer can
//! render like any other: deleted lines carry a `GenericDeleted` overlay,
//! inserted lines a `GenericInserted` one, and every line keeps the
//! classification it had in its own revision.

use std::cmp::Ordering;

use log::debug;
use y_theme::Category;

use crate::position::Span;
use crate::source::Source;

// ---------------------------------------------------------------------------
// Edit script
// ---------------------------------------------------------------------------

/// One step of an edit script. Line numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffEvent {
    Equal { origin: usize, tip: usize },
    Delete { origin: usize },
    Insert { tip: usize },
}

impl DiffEvent {
    #[inline]
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Equal { .. })
    }

    /// The same step seen from the other side: deletes become inserts.
    #[must_use]
    pub const fn mirror(self) -> Self {
        match self {
            Self::Equal { origin, tip } => Self::Equal { origin: tip, tip: origin },
            Self::Delete { origin } => Self::Insert { tip: origin },
            Self::Insert { tip } => Self::Delete { origin: tip },
        }
    }
}

/// Shortest edit script turning `a` into `b`.
#[must_use]
pub fn diff_lines<T: PartialOrd>(a: &[T], b: &[T]) -> Vec<DiffEvent> {
    if a.partial_cmp(b) != Some(Ordering::Greater) {
        return shortest_script(a, b);
    }
    let mut events: Vec<DiffEvent> = shortest_script(b, a)
        .into_iter()
        .map(DiffEvent::mirror)
        .collect();
    deletes_first(&mut events);
    events
}

fn shortest_script<T: PartialEq>(a: &[T], b: &[T]) -> Vec<DiffEvent> {
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let mut events: Vec<DiffEvent> = (0..prefix)
        .map(|i| DiffEvent::Equal { origin: i + 1, tip: i + 1 })
        .collect();

    let (a_mid, b_mid) = (&a[prefix..a.len() - suffix], &b[prefix..b.len() - suffix]);
    events.extend(myers(a_mid, b_mid).into_iter().map(|event| match event {
        DiffEvent::Equal { origin, tip } => DiffEvent::Equal {
            origin: origin + prefix,
            tip: tip + prefix,
        },
        DiffEvent::Delete { origin } => DiffEvent::Delete { origin: origin + prefix },
        DiffEvent::Insert { tip } => DiffEvent::Insert { tip: tip + prefix },
    }));

    let (a_tail, b_tail) = (a.len() - suffix, b.len() - suffix);
    events.extend((0..suffix).map(|i| DiffEvent::Equal {
        origin: a_tail + i + 1,
        tip: b_tail + i + 1,
    }));

    deletes_first(&mut events);
    events
}

/// Forward Myers search with a saved frontier per edit distance, then a
/// backtrack through the saved frontiers.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn myers<T: PartialEq>(a: &[T], b: &[T]) -> Vec<DiffEvent> {
    let (n, m) = (a.len() as isize, b.len() as isize);
    let max = n + m;
    if max == 0 {
        return Vec::new();
    }
    let at = |k: isize| (k + max) as usize;

    let mut v = vec![0isize; 2 * max as usize + 2];
    let mut trace: Vec<Vec<isize>> = Vec::new();

    'search: for d in 0..=max {
        trace.push(v.clone());
        for k in (-d..=d).step_by(2) {
            let mut x = if k == -d || (k != d && v[at(k - 1)] < v[at(k + 1)]) {
                v[at(k + 1)]
            } else {
                v[at(k - 1)] + 1
            };
            let mut y = x - k;
            while x < n && y < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }
            v[at(k)] = x;
            if x >= n && y >= m {
                break 'search;
            }
        }
    }

    let mut events = Vec::new();
    let (mut x, mut y) = (n, m);
    for (d, v) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let k = x - y;
        let prev_k = if k == -d || (k != d && v[at(k - 1)] < v[at(k + 1)]) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = v[at(prev_k)];
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            events.push(DiffEvent::Equal {
                origin: x as usize,
                tip: y as usize,
            });
            x -= 1;
            y -= 1;
        }
        if d > 0 {
            if x == prev_x {
                events.push(DiffEvent::Insert { tip: y as usize });
            } else {
                events.push(DiffEvent::Delete { origin: x as usize });
            }
        }
        x = prev_x;
        y = prev_y;
    }
    events.reverse();
    events
}

/// Within each run of changes, move deletions ahead of insertions, keeping
/// relative order within each kind.
fn deletes_first(events: &mut [DiffEvent]) {
    let mut i = 0;
    while i < events.len() {
        if !events[i].is_change() {
            i += 1;
            continue;
        }
        let end = events[i..]
            .iter()
            .position(|e| !e.is_change())
            .map_or(events.len(), |p| i + p);
        events[i..end].sort_by_key(|e| matches!(e, DiffEvent::Insert { .. }));
        i = end;
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Where a line of a diff view came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Unchanged,
    Deleted,
    Inserted,
    /// The empty line between two summary hunks.
    Separator,
}

/// Provenance of one line of a diff view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: LineKind,
    /// Line number in the origin, for unchanged and deleted lines.
    pub origin: Option<usize>,
    /// Line number in the tip, for unchanged and inserted lines.
    pub tip: Option<usize>,
}

/// A rendered comparison: a synthetic source plus, for summaries, the
/// changed range of each hunk in that source's coordinates.
#[derive(Debug, Clone, Default)]
pub struct DiffView {
    source: Source,
    highlight_ranges: Vec<Span>,
    lines: Vec<DiffLine>,
    edit_distance: usize,
}

impl DiffView {
    #[must_use]
    pub const fn source(&self) -> &Source {
        &self.source
    }

    /// The source, for adding overlays of your own before printing.
    pub const fn source_mut(&mut self) -> &mut Source {
        &mut self.source
    }

    #[must_use]
    pub fn into_source(self) -> Source {
        self.source
    }

    /// One span per summary hunk covering its changed lines. Empty for a
    /// full diff.
    #[must_use]
    pub fn highlight_ranges(&self) -> &[Span] {
        &self.highlight_ranges
    }

    /// Provenance of each line of [`source`](Self::source), in order.
    #[must_use]
    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }

    /// Number of deleted plus inserted lines.
    #[must_use]
    pub const fn edit_distance(&self) -> usize {
        self.edit_distance
    }

    #[must_use]
    pub const fn is_identical(&self) -> bool {
        self.edit_distance == 0
    }

    fn new(origin: &Source, tip: &Source) -> Self {
        let name = match (origin.name(), tip.name()) {
            (Some(a), Some(b)) => Some(format!("{a} → {b}")),
            _ => None,
        };
        Self {
            source: Source::builder(name),
            ..Self::default()
        }
    }

    /// Append the line an event refers to; returns its line number in the
    /// view.
    fn push_event(&mut self, origin: &Source, tip: &Source, event: DiffEvent) -> usize {
        let (kind, from, line, diff_line) = match event {
            DiffEvent::Equal { origin: o, tip: t } => (
                LineKind::Unchanged,
                origin,
                o,
                DiffLine { kind: LineKind::Unchanged, origin: Some(o), tip: Some(t) },
            ),
            DiffEvent::Delete { origin: o } => (
                LineKind::Deleted,
                origin,
                o,
                DiffLine { kind: LineKind::Deleted, origin: Some(o), tip: None },
            ),
            DiffEvent::Insert { tip: t } => (
                LineKind::Inserted,
                tip,
                t,
                DiffLine { kind: LineKind::Inserted, origin: None, tip: Some(t) },
            ),
        };

        let text = from.line(line).unwrap_or_default().to_owned();
        self.source.push_line(text, from.segments(line).to_vec());
        self.lines.push(diff_line);
        let n = self.source.line_count();
        match kind {
            LineKind::Deleted => self.source.add_overlay(Category::GenericDeleted, Span::line(n)),
            LineKind::Inserted => self.source.add_overlay(Category::GenericInserted, Span::line(n)),
            LineKind::Unchanged | LineKind::Separator => {}
        }
        n
    }

    fn push_separator(&mut self) {
        self.source.push_line(String::new(), Vec::new());
        self.lines.push(DiffLine {
            kind: LineKind::Separator,
            origin: None,
            tip: None,
        });
    }
}

fn script(origin: &Source, tip: &Source) -> Vec<DiffEvent> {
    let a: Vec<&str> = origin.lines().collect();
    let b: Vec<&str> = tip.lines().collect();
    let events = diff_lines(&a, &b);
    debug!(
        "diffed {} against {} lines: edit distance {}",
        a.len(),
        b.len(),
        events.iter().filter(|e| e.is_change()).count()
    );
    events
}

/// Every line of both revisions in script order.
#[must_use]
pub fn full_diff(origin: &Source, tip: &Source) -> DiffView {
    let mut view = DiffView::new(origin, tip);
    for event in script(origin, tip) {
        view.edit_distance += usize::from(event.is_change());
        view.push_event(origin, tip, event);
    }
    view
}

/// Only the changed lines, each run padded with `context` unchanged lines
/// on both sides. Hunks whose windows overlap or touch are merged; the rest
/// are separated by one empty separator line.
#[must_use]
pub fn summary_diff(origin: &Source, tip: &Source, context: usize) -> DiffView {
    let events = script(origin, tip);
    let mut view = DiffView::new(origin, tip);
    view.edit_distance = events.iter().filter(|e| e.is_change()).count();

    for (i, hunk) in hunks(&events, context).into_iter().enumerate() {
        if i > 0 {
            view.push_separator();
        }
        let mut changed: Option<(usize, usize)> = None;
        for event in &events[hunk.start..=hunk.end] {
            let n = view.push_event(origin, tip, *event);
            if event.is_change() {
                changed = Some(changed.map_or((n, n), |(first, _)| (first, n)));
            }
        }
        if let Some((first, last)) = changed {
            view.highlight_ranges.push(Span::lines(first, last));
        }
    }
    view
}

/// An inclusive window of event indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Hunk {
    start: usize,
    end: usize,
}

fn hunks(events: &[DiffEvent], context: usize) -> Vec<Hunk> {
    let last = events.len().saturating_sub(1);
    let mut out: Vec<Hunk> = Vec::new();
    for (i, _) in events.iter().enumerate().filter(|(_, e)| e.is_change()) {
        let window = Hunk {
            start: i.saturating_sub(context),
            end: (i + context).min(last),
        };
        match out.last_mut() {
            Some(prev) if window.start <= prev.end + 1 => prev.end = prev.end.max(window.end),
            _ => out.push(window),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
