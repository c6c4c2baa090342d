//! # y-print — styled emission of y-prism sources
//!
//! Takes a [`Source`](y_source::Source), classified or not, with or without
//! overlays, and writes it as ANSI-styled UTF-8:
//!
//! - **[`printer`]** — whole sources, line slices and span groups
//! - **[`gutter`]** — per-line prefixes: line numbers and diff markers
//! - **[`options`]** — styles, gutter, control escaping, tab width, color depth
//!
//! ```
//! use y_print::{LineNumbers, Printer, PrinterOptions};
//! use y_source::{Classifier, Lexer, Source, SourceOptions};
//!
//! let mut source = Source::from_string("a: 1\nb: 2\n", SourceOptions::default());
//! source.classify(&Classifier::new(Lexer)).unwrap();
//!
//! let printer = Printer::new(PrinterOptions::default().with_gutter(LineNumbers));
//! let out = y_term::ansi::strip(&printer.print_slice(&source, 2, 2));
//! assert_eq!(out, "2 b: 2");
//! ```

pub mod gutter;
pub mod options;
pub mod printer;

pub use gutter::{DiffMarkers, Gutter, GutterContext, LineNumbers, gutter_width};
pub use options::{DEFAULT_TAB_WIDTH, PrinterOptions};
pub use printer::Printer;
