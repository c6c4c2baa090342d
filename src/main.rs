// SPDX-License-Identifier: MIT
//
// y-prism — render YAML as styled terminal output.
//
// This is the binary that wires the crates together:
//
//   y-source → lexing, classification, diffs, folded search
//   y-theme  → builtin themes plus the one a config file may define
//   y-print  → gutters and ANSI emission
//
// Each run flows through:
//
//   file → Source → classify ─┬─────────────────────┬→ find overlays → Printer → stdout
//                             └→ Revisions → DiffView ┘
//
// Logging goes to stderr (see logging.rs) so it never mixes with output.

mod cli;
mod config;
mod logging;

use std::fs;
use std::io::{self, ErrorKind, Read, Write};
use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use y_print::{DiffMarkers, LineNumbers, Printer, PrinterOptions};
use y_source::{Classifier, Finder, FinderOptions, Lexer, Revisions, Source, SourceOptions, Span};
use y_theme::{Category, registry};

use crate::cli::{Cli, LogLevelArg};
use crate::config::Config;

/// Separator line between match groups with `--only-matches`.
const MATCH_SEPARATOR: &str = "⋯";

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_level.map(LogLevelArg::to_level_filter));

    if let Err(e) = run(&cli) {
        eprintln!("y-prism: {e:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    if cli.list_themes {
        config.register_palette()?;
        return write_stdout(&theme_list());
    }

    let Some(path) = cli.file.as_deref() else {
        anyhow::bail!("no input file; see --help");
    };

    let options = PrinterOptions::default()
        .with_styles(config.styles(cli.theme.as_deref())?)
        .with_control_escape(config.control_escape && !cli.no_escape)
        .with_tab_width(cli.tab_width.unwrap_or(config.tab_width))
        .with_color_depth(cli.color_depth.into());

    let origin = load_source(path)?;
    let rendered = match cli.diff.as_deref() {
        Some(other) => render_diff(cli, &config, options, origin, load_source(other)?)?,
        None => render_source(cli, &config, options, origin),
    };
    write_stdout(&rendered)
}

// ─── Input ──────────────────────────────────────────────────────────────────

/// Read and classify `path` (`-` is stdin).
fn load_source(path: &Path) -> Result<Source> {
    let stdin = path == Path::new("-");
    let text = if stdin {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        text
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    };

    let name = if stdin { "<stdin>".to_owned() } else { path.display().to_string() };
    let mut source = Source::from_string(&text, SourceOptions::default().with_name(name));
    source
        .classify(&Classifier::new(Lexer))
        .with_context(|| format!("failed to classify {}", path.display()))?;
    debug!("loaded {} ({} lines)", path.display(), source.line_count());
    Ok(source)
}

// ─── Rendering ──────────────────────────────────────────────────────────────

fn render_source(cli: &Cli, config: &Config, options: PrinterOptions, source: Source) -> String {
    let options = if cli.line_numbers || config.line_numbers {
        options.with_gutter(LineNumbers)
    } else {
        options
    };
    let printer = Printer::new(options.with_span_separator(MATCH_SEPARATOR));
    let (source, hits) = highlight(source, cli.find.as_deref());
    emit(cli, &printer, &source, hits)
}

fn render_diff(
    cli: &Cli,
    config: &Config,
    options: PrinterOptions,
    origin: Source,
    tip: Source,
) -> Result<String> {
    let mut revisions = Revisions::new();
    revisions.push(origin);
    revisions.push(tip);

    let view = match cli.summary {
        Some(context) => revisions.summary_diff(context.unwrap_or(config.context)),
        None => revisions.full_diff(),
    }
    .context("a diff needs two revisions")?;
    info!("{} lines changed", view.edit_distance());

    let gutter = DiffMarkers::new(&view).with_numbers(cli.line_numbers || config.line_numbers);
    let printer = Printer::new(
        options
            .with_gutter(gutter)
            .with_span_separator(MATCH_SEPARATOR),
    );
    let (source, hits) = highlight(view.into_source(), cli.find.as_deref());
    Ok(emit(cli, &printer, &source, hits))
}

/// Overlay `Highlight` on every match of `query`.
fn highlight(source: Source, query: Option<&str>) -> (Source, Vec<Span>) {
    let Some(query) = query else {
        return (source, Vec::new());
    };
    let source = Arc::new(source);
    let mut finder = Finder::new(FinderOptions::default());
    finder.load(&source);
    let hits = finder.find(query);
    info!("{} matches for {query:?}", hits.len());

    let mut source = Arc::unwrap_or_clone(source);
    source.add_overlays(Category::Highlight, hits.iter().copied());
    (source, hits)
}

/// Print the whole source, a line range, or only the matched lines.
fn emit(cli: &Cli, printer: &Printer, source: &Source, hits: Vec<Span>) -> String {
    if cli.only_matches {
        return terminated(printer.print_spans(source, hits));
    }
    match cli.lines {
        Some(range) => {
            let (first, last) = range.bounds(source.line_count());
            terminated(printer.print_slice(source, first, last))
        }
        None => terminated(printer.print(source)),
    }
}

/// End non-empty output with exactly one newline.
fn terminated(mut out: String) -> String {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn theme_list() -> String {
    registry::names()
        .into_iter()
        .map(|name| match registry::mode(&name) {
            Some(mode) => format!("{name} ({mode})\n"),
            None => format!("{name}\n"),
        })
        .collect()
}

// ─── Output ─────────────────────────────────────────────────────────────────

fn write_stdout(text: &str) -> Result<()> {
    let mut out = io::stdout().lock();
    match out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        // `y-prism big.yaml | head` closes the pipe early; that is fine.
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        result => result.context("failed to write to stdout"),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use y_term::ansi::strip;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("y-prism").chain(args.iter().copied()))
    }

    fn classified(text: &str) -> Source {
        let mut source = Source::from_string(text, SourceOptions::default());
        source.classify(&Classifier::new(Lexer)).unwrap();
        source
    }

    fn render(args: &[&str], text: &str) -> String {
        let out = render_source(&cli(args), &Config::default(), PrinterOptions::default(), classified(text));
        strip(&out)
    }

    // ── Plain ──

    #[test]
    fn renders_whole_file() {
        assert_eq!(render(&["f.yaml"], "a: 1\nb: 2\n"), "a: 1\nb: 2\n");
    }

    #[test]
    fn line_range_and_numbers() {
        let text = "a: 1\nb: 2\nc: 3\n";
        assert_eq!(render(&["f.yaml", "--lines", "2:3", "-n"], text), "2 b: 2\n3 c: 3\n");
        assert_eq!(render(&["f.yaml", "--lines", "3:"], text), "c: 3\n");
        assert_eq!(render(&["f.yaml", "--lines", "7:9"], text), "");
    }

    // ── Find ──

    #[test]
    fn find_adds_highlight_overlays() {
        let (source, hits) = highlight(classified("name: Zoë\nalias: zoe\n"), Some("ZOE"));
        assert_eq!(hits, [Span::on_line(1, 7, 10), Span::on_line(2, 8, 11)]);
        assert_eq!(source.overlays().len(), 2);
        assert!(source.overlays().iter().all(|o| o.category == Category::Highlight));
    }

    #[test]
    fn only_matches_prints_matching_lines() {
        let text = "a: x\nb: y\nc: y\nd: z\ne: y\n";
        assert_eq!(
            render(&["f.yaml", "--find", "y", "--only-matches"], text),
            "b: y\nc: y\n⋯\ne: y\n"
        );
    }

    // ── Diff ──

    #[test]
    fn summary_diff_uses_config_context() {
        let config = Config { context: 0, ..Config::default() };
        let out = render_diff(
            &cli(&["a.yaml", "--diff", "b.yaml", "--summary"]),
            &config,
            PrinterOptions::default(),
            classified("a: 1\nb: 2\nc: 3\n"),
            classified("a: 1\nb: 4\nc: 3\n"),
        )
        .unwrap();
        assert_eq!(strip(&out), "- b: 2\n+ b: 4\n");
    }

    #[test]
    fn theme_list_names_builtins() {
        let list = theme_list();
        assert!(list.contains("dark (dark)\n"));
        assert!(list.contains("light (light)\n"));
    }
}
