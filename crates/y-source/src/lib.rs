//! # y-source — the data side of y-prism
//!
//! Everything that turns YAML text into something the printer can render,
//! and everything that compares or searches it:
//!
//! - **[`position`]** — `Position` (line, column) and `Span`, 1-based
//! - **[`token`]** / **[`lexer`]** — the tokenizer interface and the in-tree YAML lexer
//! - **[`classify`]** — tokens to categorized segments, with implicit-null detection
//! - **[`source`]** — line-addressed text with classification and overlays
//! - **[`revision`]** — chains of sources with an origin and a tip
//! - **[`diff`]** — Myers line diff, as full and summary views
//! - **[`normalize`]** / **[`finder`]** — Unicode folding and folded search
//!
//! ```
//! use y_source::{Classifier, Lexer, Source, SourceOptions};
//!
//! let mut source = Source::from_string("key: value\n", SourceOptions::default());
//! source.classify(&Classifier::new(Lexer)).unwrap();
//! assert_eq!(source.segments(1).len(), 3);
//! ```

pub mod classify;
pub mod diff;
pub mod error;
pub mod finder;
pub mod lexer;
pub mod normalize;
pub mod position;
pub mod revision;
pub mod source;
pub mod token;

pub use classify::{Classifier, Classify, Segment};
pub use diff::{DiffEvent, DiffLine, DiffView, LineKind, full_diff, summary_diff};
pub use error::SourceError;
pub use finder::{Finder, FinderOptions};
pub use lexer::Lexer;
pub use normalize::{Normalizer, NormalizerOptions, Transformer};
pub use position::{Position, Span};
pub use revision::{Revision, Revisions};
pub use source::{LineSegment, Overlay, Source, SourceOptions};
pub use token::{Token, TokenKind, Tokenize};
