//! End-to-end rendering: lex, classify, overlay, diff, search and print.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use y_print::{DiffMarkers, LineNumbers, Printer, PrinterOptions};
use y_source::{
    Classifier, Finder, FinderOptions, Lexer, LineKind, Source, SourceOptions, Span, full_diff,
    summary_diff,
};
use y_term::ColorDepth;
use y_term::ansi::{self, strip};
use y_term::output::OutputBuffer;
use y_theme::{Category, Styles};
use y_theme::builtin::default_styles;

fn source(text: &str) -> Source {
    Source::from_string(text, SourceOptions::default())
}

fn classified(text: &str) -> Source {
    let mut s = source(text);
    s.classify(&Classifier::new(Lexer)).unwrap();
    s
}

fn rune_count(s: &str) -> usize {
    s.chars().count()
}

/// The SGR prefix a style gets when it opens a line.
fn opening_sgr(styles: &Styles, category: Category) -> String {
    let mut out = OutputBuffer::new();
    ansi::style(&mut out, styles.get(category), ColorDepth::TrueColor).unwrap();
    out.into_string()
}

// ── Syntax print ──

#[test]
fn key_value_is_highlighted() {
    let styles = Arc::new(default_styles());
    let printer = Printer::new(PrinterOptions::default().with_styles(Arc::clone(&styles)));
    let src = classified("key: value\n");

    let cats: Vec<Category> = src.segments(1).iter().map(|s| s.category).collect();
    assert_eq!(
        cats,
        [Category::NameTag, Category::PunctuationMappingValue, Category::LiteralString]
    );

    let out = printer.print(&src);
    assert!(out.starts_with(&format!("{}key", opening_sgr(&styles, Category::NameTag))), "{out:?}");
    assert!(out.ends_with('\n'));
    assert_eq!(strip(&out), "key: value\n");
    assert_eq!(rune_count(&strip(&out)), 11);
}

// ── Control escaping ──

#[test]
fn controls_become_pictures() {
    let out = Printer::default().print(&source("a\x1bb\x00c"));
    let visible = strip(&out);
    assert_eq!(visible, "a␛b␀c");
    assert_eq!(rune_count(&visible), 5);
}

#[test]
fn rune_count_is_preserved() {
    let printer = Printer::default();
    for text in [
        "",
        "plain",
        "a\tb\x07c\x7f",
        "k: v\n- [1, 2]\n# note\n",
        "s: \"unterminated\n",
        "日本: 語\r\n",
        "anchors: &a {x: *a}\n",
    ] {
        let src = classified(text);
        let expected: usize = src.lines().map(|l| rune_count(l)).sum::<usize>()
            + src.line_count().saturating_sub(1)
            + usize::from(src.ends_with_newline() && !src.is_empty());
        assert_eq!(rune_count(&strip(&printer.print(&src))), expected, "{text:?}");
    }
}

// ── Overlays ──

#[test]
fn disjoint_overlays_commute() {
    let printer = Printer::default();
    let build = |first: (Category, Span), second: (Category, Span)| {
        let mut s = classified("name: prism\nkind: yaml\n");
        s.add_overlay(first.0, first.1);
        s.add_overlay(second.0, second.1);
        printer.print(&s)
    };
    let a = (Category::Highlight, Span::on_line(1, 1, 5));
    let b = (Category::GenericInserted, Span::line(2));
    assert_eq!(build(a, b), build(b, a));
}

// ── Full diff ──

#[test]
fn full_diff_shows_every_line() {
    let view = full_diff(&source("a\nb\nc\n"), &source("a\nB\nc\n"));
    let src = view.source();
    assert_eq!(src.lines().collect::<Vec<_>>(), ["a", "b", "B", "c"]);
    assert!(view.highlight_ranges().is_empty());

    let overlays: Vec<(Category, Span)> = src.overlays().iter().map(|o| (o.category, o.span)).collect();
    assert_eq!(
        overlays,
        [
            (Category::GenericDeleted, Span::line(2)),
            (Category::GenericInserted, Span::line(3)),
        ]
    );

    let printer = Printer::new(PrinterOptions::default().with_gutter(DiffMarkers::new(&view)));
    assert_eq!(strip(&printer.print(src)), "  a\n- b\n+ B\n  c");
}

#[test]
fn full_diff_is_symmetric() {
    let mirror = |kind: LineKind| match kind {
        LineKind::Deleted => LineKind::Inserted,
        LineKind::Inserted => LineKind::Deleted,
        other => other,
    };
    let unchanged = |view: &y_source::DiffView| -> Vec<String> {
        view.lines()
            .iter()
            .zip(view.source().lines())
            .filter(|(l, _)| l.kind == LineKind::Unchanged)
            .map(|(_, text)| text.to_owned())
            .collect()
    };
    let count = |view: &y_source::DiffView, kind: LineKind| {
        view.lines().iter().filter(|l| mirror(l.kind) == kind).count()
    };

    let pairs = [
        ("one\ntwo\nthree\nfour\n", "one\n2\nthree\nfive\nsix\n"),
        // Several common subsequences of equal length.
        ("x\ny\n", "y\nx\n"),
        ("a: 1\nb: 2\nc: 3\n", "c: 3\nb: 2\na: 1\n"),
        ("k\nx\ny\nk\n", "k\ny\nx\nk\n"),
    ];
    for (a, b) in pairs {
        let forward = full_diff(&source(a), &source(b));
        let backward = full_diff(&source(b), &source(a));

        assert_eq!(unchanged(&forward), unchanged(&backward), "{a:?} vs {b:?}");
        for kind in [LineKind::Deleted, LineKind::Inserted] {
            let forward_count = forward.lines().iter().filter(|l| l.kind == kind).count();
            assert_eq!(forward_count, count(&backward, kind));
        }
        assert_eq!(forward.edit_distance(), backward.edit_distance());
    }
}

// ── Summary diff ──

#[test]
fn summary_diff_with_one_line_of_context() {
    let view = summary_diff(&source("a\nb\nc\n"), &source("a\nB\nc\n"), 1);
    assert_eq!(view.source().lines().collect::<Vec<_>>(), ["a", "b", "B", "c"]);
    assert_eq!(view.highlight_ranges(), [Span::lines(2, 3)]);
}

#[test]
fn identical_sources_have_no_changes() {
    let text = "a: 1\nb: [2, 3]\n";
    let full = full_diff(&classified(text), &classified(text));
    assert!(full.is_identical());
    assert!(full.lines().iter().all(|l| l.kind == LineKind::Unchanged));
    for k in [0, 1, 5] {
        let summary = summary_diff(&classified(text), &classified(text), k);
        assert!(summary.highlight_ranges().is_empty());
        assert_eq!(summary.source().line_count(), 0);
    }
}

#[test]
fn summary_keeps_classification_of_each_side() {
    let view = summary_diff(&classified("a: 1\n"), &classified("a: two\n"), 0);
    let src = view.source();
    assert_eq!(src.segments(1).last().map(|s| s.category), Some(Category::LiteralNumberInteger));
    assert_eq!(src.segments(2).last().map(|s| s.category), Some(Category::LiteralString));
}

// ── Finder ──

#[test]
fn finder_folds_case_and_diacritics() {
    let src = Arc::new(source("Café\ncafé CAFE\n"));
    let mut finder = Finder::new(FinderOptions::default());
    finder.load(&src);
    let spans = finder.find("cafe");
    assert_eq!(
        spans,
        [Span::on_line(1, 1, 5), Span::on_line(2, 1, 5), Span::on_line(2, 6, 10)]
    );

    // Every hit folds back to the query, in increasing order.
    let folded = finder.normalizer().normalize("cafe");
    for span in &spans {
        assert!(finder.normalizer().normalize(&src.substring(span)).contains(&folded));
    }
    assert!(spans.windows(2).all(|w| (w[0].start().line, w[0].start().column)
        < (w[1].start().line, w[1].start().column)));
}

#[test]
fn finder_hits_render_as_highlight_overlays() {
    let src = Arc::new(classified("name: Café\n"));
    let mut finder = Finder::new(FinderOptions::default());
    finder.load(&src);
    let hits = finder.find("CAFE");

    let mut overlaid = (*src).clone();
    overlaid.add_overlays(Category::Highlight, hits);
    let printer = Printer::default();
    let out = printer.print(&overlaid);
    assert_ne!(out, printer.print(&src));
    assert_eq!(strip(&out), "name: Café\n");
}

// ── Print slice ──

#[test]
fn slice_passes_original_numbers_to_gutter() {
    let text: String = (1..=10).map(|i| format!("k{i}: {i}\n")).collect();
    let src = classified(&text);
    let printer = Printer::new(PrinterOptions::default().with_gutter(LineNumbers));
    assert_eq!(strip(&printer.print_slice(&src, 2, 3)), " 2 k2: 2\n 3 k3: 3");
}
