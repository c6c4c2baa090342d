//! Token types produced by a YAML tokenizer.
//!
//! The classifier treats tokens as read-only input. Anything that can turn
//! YAML text into this token stream can drive the pipeline through the
//! [`Tokenize`] trait; [`Lexer`](crate::lexer::Lexer) is the in-tree
//! implementation.

use std::fmt;

use crate::position::Position;

// ---------------------------------------------------------------------------
// Kind
// ---------------------------------------------------------------------------

/// Quoting style of a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
}

/// What a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `%YAML`, `%TAG`, or any other `%` line.
    Directive,
    /// `---`
    DocumentHeader,
    /// `...`
    DocumentEnd,
    /// `# ...` through end of line.
    Comment,
    /// `-` before a block sequence entry.
    SequenceEntry,
    /// `?` before an explicit mapping key.
    MappingKey,
    /// `:` between a key and its value.
    MappingValue,
    /// `,` inside a flow collection.
    CollectEntry,
    SequenceStart,
    SequenceEnd,
    MappingStart,
    MappingEnd,
    /// `&name`
    Anchor,
    /// `*name`
    Alias,
    /// `!tag`, `!!tag`, `!<uri>`
    Tag,
    /// `<<`
    MergeKey,
    /// `|` header, with optional chomping and indentation indicators.
    BlockLiteral,
    /// `>` header, with optional chomping and indentation indicators.
    BlockFolded,
    /// One line of block scalar content, indentation excluded.
    BlockContent,
    Scalar(ScalarStyle),
    /// Malformed input: unterminated quotes, stray closing brackets.
    Invalid,
    /// Reserved indicators YAML does not define (`@`, `` ` ``).
    Unknown,
}

/// The YAML indicator class of a token's leading character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Indicator {
    /// Not introduced by an indicator: plain scalars and block content.
    #[default]
    None,
    /// `-`, `?`, `:`
    BlockStructure,
    /// `[`, `]`, `{`, `}`, `,`
    FlowCollection,
    /// `#`
    Comment,
    /// `&`, `*`, `!`
    NodeProperty,
    /// `|`, `>`
    BlockScalar,
    /// `'`, `"`
    QuotedScalar,
    /// `%`, `---`, `...`
    Directive,
    /// `@`, `` ` ``
    Reserved,
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// Where a token starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenPosition {
    /// 1-based line.
    pub line: usize,
    /// 1-based column, in chars.
    pub column: usize,
    /// Byte offset from the start of the text.
    pub offset: usize,
    /// Leading spaces on the token's line.
    pub indent_num: usize,
    /// Block nesting depth of the token's line, 0 at top level.
    pub indent_level: usize,
}

impl TokenPosition {
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// One lexical token.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Exactly the source text the token covers. May contain `\n` for
    /// multi-line quoted scalars.
    pub raw: String,
    /// Interpreted value: unquoted and unescaped for scalars, the name for
    /// anchors and aliases, the body for comments, `raw` otherwise.
    pub value: String,
    pub indicator: Indicator,
    pub position: TokenPosition,
}

impl Token {
    /// Position one past the token's last character.
    #[must_use]
    pub fn end(&self) -> Position {
        let start = self.position.position();
        match self.raw.rfind('\n') {
            None => Position::new(start.line, start.column + self.raw.chars().count()),
            Some(idx) => {
                let lines = self.raw.matches('\n').count();
                let tail = self.raw[idx + 1..].chars().count();
                Position::new(start.line + lines, tail + 1)
            }
        }
    }

    /// Whether this is a scalar of any style.
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self.kind, TokenKind::Scalar(_))
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}@{}:{} {:?}",
            self.kind, self.position.line, self.position.column, self.raw
        )
    }
}

// ---------------------------------------------------------------------------
// Tokenize
// ---------------------------------------------------------------------------

/// Turns YAML text into tokens in source order.
pub trait Tokenize {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

impl<F> Tokenize for F
where
    F: Fn(&str) -> Vec<Token>,
{
    fn tokenize(&self, text: &str) -> Vec<Token> {
        self(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(raw: &str, line: usize, column: usize) -> Token {
        Token {
            kind: TokenKind::Scalar(ScalarStyle::DoubleQuoted),
            raw: raw.to_owned(),
            value: String::new(),
            indicator: Indicator::QuotedScalar,
            position: TokenPosition {
                line,
                column,
                ..TokenPosition::default()
            },
        }
    }

    #[test]
    fn end_of_single_line_token() {
        assert_eq!(token("\"héllo\"", 2, 3).end(), Position::new(2, 10));
    }

    #[test]
    fn end_of_multi_line_token() {
        assert_eq!(token("\"a\n  bc\"", 1, 5).end(), Position::new(2, 6));
    }
}
