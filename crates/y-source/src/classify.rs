//! Token classification.
//!
//! Turns a token stream into [`Segment`]s: spans of source text tagged with a
//! [`Category`]. Classification is a single forward pass with one token of
//! lookahead, which is enough to tell mapping keys from values and to spot
//! mapping values that were left empty (implicit nulls).
//!
//! Segments come out sorted by start position and never overlap. Implicit
//! nulls are zero-width segments placed just after their `:`.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use y_theme::Category;

use crate::lexer::Lexer;
use crate::position::{Position, Span};
use crate::token::{ScalarStyle, Token, TokenKind, Tokenize};

/// A classified stretch of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub span: Span,
    pub category: Category,
    /// The text the span covers; empty for zero-width segments.
    pub raw: String,
}

impl Segment {
    #[must_use]
    pub fn new(span: Span, category: Category, raw: impl Into<String>) -> Self {
        Self {
            span,
            category,
            raw: raw.into(),
        }
    }
}

/// Anything that can split YAML text into classified segments.
pub trait Classify {
    fn classify(&self, text: &str) -> Vec<Segment>;
}

impl<F> Classify for F
where
    F: Fn(&str) -> Vec<Segment>,
{
    fn classify(&self, text: &str) -> Vec<Segment> {
        self(text)
    }
}

/// The standard classifier, generic over its tokenizer.
#[derive(Debug, Clone, Default)]
pub struct Classifier<T = Lexer> {
    tokenizer: T,
}

impl<T: Tokenize> Classifier<T> {
    #[must_use]
    pub const fn new(tokenizer: T) -> Self {
        Self { tokenizer }
    }
}

impl<T: Tokenize> Classify for Classifier<T> {
    fn classify(&self, text: &str) -> Vec<Segment> {
        classify_tokens(&self.tokenizer.tokenize(text))
    }
}

/// Classify an already-tokenized stream.
#[must_use]
pub fn classify_tokens(tokens: &[Token]) -> Vec<Segment> {
    let mut out = Vec::with_capacity(tokens.len() + tokens.len() / 4);
    let mut flow_depth = 0usize;

    for (idx, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::SequenceStart | TokenKind::MappingStart => flow_depth += 1,
            TokenKind::SequenceEnd | TokenKind::MappingEnd => {
                flow_depth = flow_depth.saturating_sub(1);
            }
            TokenKind::DocumentHeader | TokenKind::DocumentEnd => flow_depth = 0,
            _ => {}
        }

        let category = category_of(tokens, idx);
        out.push(Segment::new(
            Span::ordered(token.position.position(), token.end()),
            category,
            token.raw.clone(),
        ));

        if token.kind == TokenKind::MappingValue {
            out.extend(implicit_null(tokens, idx, flow_depth > 0));
        }
    }

    debug!("classified {} tokens into {} segments", tokens.len(), out.len());
    out
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

fn category_of(tokens: &[Token], idx: usize) -> Category {
    let token = &tokens[idx];
    match token.kind {
        TokenKind::Directive => {
            let word = token.raw.split_whitespace().next().unwrap_or_default();
            if matches!(word, "%YAML" | "%TAG") {
                Category::CommentPreproc
            } else {
                Category::GenericErrorUnknown
            }
        }
        TokenKind::DocumentHeader | TokenKind::DocumentEnd => Category::PunctuationHeading,
        TokenKind::Comment => Category::Comment,
        TokenKind::SequenceEntry => Category::PunctuationSequenceEntry,
        TokenKind::MappingKey => Category::Punctuation,
        TokenKind::MappingValue => Category::PunctuationMappingValue,
        TokenKind::CollectEntry => Category::PunctuationCollectEntry,
        TokenKind::SequenceStart => Category::PunctuationSequenceStart,
        TokenKind::SequenceEnd => Category::PunctuationSequenceEnd,
        TokenKind::MappingStart => Category::PunctuationMappingStart,
        TokenKind::MappingEnd => Category::PunctuationMappingEnd,
        TokenKind::Anchor => Category::NameAnchor,
        TokenKind::Alias => Category::NameAlias,
        TokenKind::Tag => Category::NameDecorator,
        TokenKind::MergeKey => Category::NameAliasMerge,
        TokenKind::BlockLiteral => Category::PunctuationBlockLiteral,
        TokenKind::BlockFolded => Category::PunctuationBlockFolded,
        TokenKind::BlockContent => Category::LiteralString,
        TokenKind::Invalid => Category::GenericErrorInvalid,
        TokenKind::Unknown => Category::GenericErrorUnknown,
        TokenKind::Scalar(_) if is_key(tokens, idx) => Category::NameTag,
        TokenKind::Scalar(ScalarStyle::DoubleQuoted) => Category::LiteralStringDouble,
        TokenKind::Scalar(ScalarStyle::SingleQuoted) => Category::LiteralStringSingle,
        TokenKind::Scalar(ScalarStyle::Plain) => plain_category(&token.raw),
    }
}

/// A scalar is a key if a `:` follows it on the same line, or a `?`
/// precedes it.
fn is_key(tokens: &[Token], idx: usize) -> bool {
    let token = &tokens[idx];
    let followed = tokens.get(idx + 1).is_some_and(|next| {
        next.kind == TokenKind::MappingValue && next.position.line == token.end().line
    });
    let preceded = idx
        .checked_sub(1)
        .and_then(|p| tokens.get(p))
        .is_some_and(|prev| prev.kind == TokenKind::MappingKey);
    followed || preceded
}

static PLAIN_RULES: LazyLock<Vec<(Regex, Category)>> = LazyLock::new(|| {
    [
        (r"^(~|null|Null|NULL)$", Category::LiteralNull),
        (r"^(true|True|TRUE|false|False|FALSE)$", Category::LiteralBoolean),
        (r"^[-+]?0b[01_]+$", Category::LiteralNumberBin),
        (r"^[-+]?0o[0-7_]+$", Category::LiteralNumberOct),
        (r"^[-+]?0x[0-9a-fA-F_]+$", Category::LiteralNumberHex),
        (r"^[-+]?[0-9][0-9_]*$", Category::LiteralNumberInteger),
        (
            r"^[-+]?(\.[0-9]+|[0-9][0-9_]*(\.[0-9_]*)?)([eE][-+]?[0-9]+)?$",
            Category::LiteralNumberFloat,
        ),
        (r"^[-+]?\.(inf|Inf|INF)$", Category::LiteralNumberInfinity),
        (r"^\.(nan|NaN|NAN)$", Category::LiteralNumberNaN),
    ]
    .into_iter()
    .map(|(pattern, category)| {
        (
            Regex::new(pattern).expect("plain scalar patterns are valid static regexes"),
            category,
        )
    })
    .collect()
});

/// Category of a plain (unquoted, non-key) scalar.
#[must_use]
pub fn plain_category(text: &str) -> Category {
    PLAIN_RULES
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map_or(Category::LiteralString, |&(_, category)| category)
}

// ---------------------------------------------------------------------------
// Implicit nulls
// ---------------------------------------------------------------------------

/// A zero-width null after the `:` at `idx`, if its value is missing.
fn implicit_null(tokens: &[Token], idx: usize, in_flow: bool) -> Option<Segment> {
    let colon = &tokens[idx];
    let line = colon.position.line;
    let key_column = idx
        .checked_sub(1)
        .map(|p| &tokens[p])
        .filter(|key| key.end().line == line)
        .map_or(colon.position.column, |key| key.position.column);

    let next = tokens[idx + 1..]
        .iter()
        .find(|t| t.kind != TokenKind::Comment);

    let empty = match next {
        None => true,
        Some(next) => match next.kind {
            TokenKind::DocumentHeader | TokenKind::DocumentEnd => true,
            TokenKind::CollectEntry | TokenKind::MappingEnd | TokenKind::SequenceEnd if in_flow => {
                true
            }
            _ if in_flow || next.position.line == line => false,
            TokenKind::SequenceEntry => next.position.column < key_column,
            _ => next.position.column <= key_column,
        },
    };

    empty.then(|| {
        Segment::new(
            Span::empty(Position::new(line, colon.position.column + 1)),
            Category::LiteralNullImplicit,
            "",
        )
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
