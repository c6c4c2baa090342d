//! Folded substring search.
//!
//! [`Finder::load`] normalizes every line of a source and records, for each
//! byte of the normalized text, the source column it came from. A query is
//! normalized the same way, matched against each line, and every hit is
//! mapped back to a [`Span`] in the original coordinates.
//!
//! The finder keeps only a weak reference to the source it indexed; once the
//! source is dropped, searches return nothing.

use std::sync::{Arc, Weak};

use log::debug;

use crate::normalize::Normalizer;
use crate::position::Span;
use crate::source::Source;

#[derive(Debug, Clone, Default)]
pub struct FinderOptions {
    pub normalizer: Normalizer,
}

impl FinderOptions {
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }
}

/// One normalized line.
#[derive(Debug, Clone, Default)]
struct LineIndex {
    text: String,
    /// `columns[i]` is the 1-based source column of normalized byte `i`.
    columns: Vec<usize>,
}

impl LineIndex {
    fn build(line: &str, normalizer: &Normalizer) -> Self {
        let mut index = Self::default();
        for (i, c) in line.chars().enumerate() {
            let folded = normalizer.normalize_char(c);
            index.columns.extend(std::iter::repeat_n(i + 1, folded.len()));
            index.text.push_str(&folded);
        }
        index
    }
}

#[derive(Debug, Default)]
pub struct Finder {
    normalizer: Normalizer,
    source: Weak<Source>,
    index: Vec<LineIndex>,
}

impl Finder {
    #[must_use]
    pub fn new(options: FinderOptions) -> Self {
        Self {
            normalizer: options.normalizer,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Index `source`, replacing whatever was loaded before.
    pub fn load(&mut self, source: &Arc<Source>) {
        self.source = Arc::downgrade(source);
        self.reindex();
    }

    /// Swap the normalizer. A loaded source is indexed again so queries and
    /// index always fold the same way.
    pub fn set_normalizer(&mut self, normalizer: Normalizer) {
        self.normalizer = normalizer;
        self.reindex();
    }

    /// Whether the indexed source is still alive.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.source.strong_count() > 0
    }

    fn reindex(&mut self) {
        self.index = self.source.upgrade().map_or_else(Vec::new, |source| {
            source
                .lines()
                .map(|line| LineIndex::build(line, &self.normalizer))
                .collect()
        });
        debug!(
            "finder indexed {} lines, {} normalized bytes",
            self.index.len(),
            self.index.iter().map(|l| l.text.len()).sum::<usize>()
        );
    }

    /// Every leftmost, non-overlapping match of `query`, in source order.
    /// An empty query (after normalization) matches nothing.
    #[must_use]
    pub fn find(&self, query: &str) -> Vec<Span> {
        let needle = self.normalizer.normalize(query);
        if needle.is_empty() || !self.is_loaded() {
            return Vec::new();
        }

        let mut spans = Vec::new();
        for (idx, line) in self.index.iter().enumerate() {
            let mut last_end = 0;
            for (offset, hit) in line.text.match_indices(&needle) {
                let start = line.columns[offset];
                let end = line.columns[offset + hit.len() - 1] + 1;
                // Several normalized bytes can share a column (ß → ss); a hit
                // starting inside the previous one's columns is dropped.
                if start < last_end {
                    continue;
                }
                last_end = end;
                spans.push(Span::on_line(idx + 1, start, end));
            }
        }
        spans
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NormalizerOptions;
    use crate::source::SourceOptions;
    use pretty_assertions::assert_eq;

    fn loaded(text: &str) -> (Arc<Source>, Finder) {
        let source = Arc::new(Source::from_string(text, SourceOptions::default()));
        let mut finder = Finder::default();
        finder.load(&source);
        (source, finder)
    }

    #[test]
    fn folds_case_and_diacritics() {
        let (_source, finder) = loaded("Café\ncafé CAFE\n");
        assert_eq!(
            finder.find("cafe"),
            [
                Span::on_line(1, 1, 5),
                Span::on_line(2, 1, 5),
                Span::on_line(2, 6, 10),
            ]
        );
    }

    #[test]
    fn empty_query_matches_nothing() {
        let (_source, finder) = loaded("abc\n");
        assert!(finder.find("").is_empty());
        assert!(finder.find("\u{301}").is_empty());
    }

    #[test]
    fn overlapping_hits_resume_after_match() {
        let (_source, finder) = loaded("aaa\n");
        assert_eq!(finder.find("aa"), [Span::on_line(1, 1, 3)]);
    }

    #[test]
    fn expanding_fold_maps_back_to_one_column() {
        let (source, finder) = loaded("Straße\n");
        let spans = finder.find("SS");
        assert_eq!(spans, [Span::on_line(1, 5, 6)]);
        assert_eq!(source.substring(&spans[0]), "ß");
        assert_eq!(finder.find("s"), [Span::on_line(1, 1, 2), Span::on_line(1, 5, 6)]);
    }

    #[test]
    fn matches_round_trip_through_substring() {
        let (source, finder) = loaded("Ünïcödé ünicode\nUNICODE!\n");
        let n = finder.normalizer();
        for span in finder.find("unicode") {
            assert!(n.normalize(&source.substring(&span)).contains(&n.normalize("unicode")));
        }
        assert_eq!(finder.find("unicode").len(), 3);
    }

    #[test]
    fn dropped_source_yields_nothing() {
        let (source, finder) = loaded("abc\n");
        drop(source);
        assert!(!finder.is_loaded());
        assert!(finder.find("a").is_empty());
    }

    #[test]
    fn changing_normalizer_reindexes() {
        let (_source, mut finder) = loaded("ＡＢＣ\n");
        assert!(finder.find("abc").is_empty());
        finder.set_normalizer(Normalizer::new(
            NormalizerOptions::default().with_width_fold(true),
        ));
        assert_eq!(finder.find("abc"), [Span::on_line(1, 1, 4)]);
    }

    #[test]
    fn spans_are_strictly_increasing() {
        let (_source, finder) = loaded("ab ab\nab\n");
        let spans = finder.find("AB");
        for pair in spans.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(spans.len(), 3);
    }
}
