//! A line-oriented YAML lexer.
//!
//! Produces the token stream the classifier consumes. It is a highlighter's
//! lexer, not a parser: it never fails, it recognizes just enough structure
//! to tell keys from values and block scalars from plain text, and anything
//! it cannot make sense of becomes an [`Invalid`](TokenKind::Invalid) or
//! [`Unknown`](TokenKind::Unknown) token carrying the raw text.
//!
//! State carried across lines:
//!
//! - flow depth (`[`/`{` nesting), which changes what `,` `:` and brackets mean;
//! - an open block scalar, whose content lines are swallowed whole;
//! - an open quoted scalar, which may span lines until its closing quote;
//! - the stack of block indents, used for `indent_level`.

use log::{debug, warn};

use crate::token::{Indicator, ScalarStyle, Token, TokenKind, TokenPosition, Tokenize};

/// The in-tree YAML tokenizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lexer;

impl Lexer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Tokenize for Lexer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let tokens = Scanner::default().run(text);
        debug!("lexed {} tokens from {} bytes", tokens.len(), text.len());
        tokens
    }
}

// ---------------------------------------------------------------------------
// Scanner state
// ---------------------------------------------------------------------------

struct BlockScalar {
    /// Indent of the line holding the `|`/`>` header.
    parent_indent: usize,
    /// Indent of the content, fixed by the first non-blank content line
    /// unless the header gave it explicitly.
    content_indent: Option<usize>,
}

struct OpenQuote {
    quote: char,
    raw: String,
    start: TokenPosition,
}

struct Scanner {
    tokens: Vec<Token>,
    flow_depth: usize,
    block: Option<BlockScalar>,
    open_quote: Option<OpenQuote>,
    indents: Vec<usize>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            tokens: Vec::new(),
            flow_depth: 0,
            block: None,
            open_quote: None,
            indents: vec![0],
        }
    }
}

/// One line of input with char ↔ byte bookkeeping.
struct Line<'a> {
    number: usize,
    offset: usize,
    text: &'a str,
    chars: Vec<(usize, char)>,
    indent: usize,
    level: usize,
}

impl Line<'_> {
    fn byte(&self, i: usize) -> usize {
        self.chars.get(i).map_or(self.text.len(), |&(b, _)| b)
    }

    fn slice(&self, from: usize, to: usize) -> &str {
        &self.text[self.byte(from)..self.byte(to)]
    }

    fn char_at(&self, i: usize) -> Option<char> {
        self.chars.get(i).map(|&(_, c)| c)
    }

    /// Whether char `i` is followed by whitespace or the end of the line.
    fn separated_after(&self, i: usize) -> bool {
        self.char_at(i + 1).is_none_or(char::is_whitespace)
    }

    fn is_blank(&self) -> bool {
        self.chars.iter().all(|&(_, c)| c.is_whitespace())
    }

    fn position(&self, i: usize) -> TokenPosition {
        TokenPosition {
            line: self.number,
            column: i + 1,
            offset: self.offset + self.byte(i),
            indent_num: self.indent,
            indent_level: self.level,
        }
    }
}

const fn is_flow_indicator(c: char) -> bool {
    matches!(c, ',' | '[' | ']' | '{' | '}')
}

const fn indicator_for(kind: TokenKind) -> Indicator {
    match kind {
        TokenKind::Directive | TokenKind::DocumentHeader | TokenKind::DocumentEnd => {
            Indicator::Directive
        }
        TokenKind::Comment => Indicator::Comment,
        TokenKind::SequenceEntry | TokenKind::MappingKey | TokenKind::MappingValue => {
            Indicator::BlockStructure
        }
        TokenKind::CollectEntry
        | TokenKind::SequenceStart
        | TokenKind::SequenceEnd
        | TokenKind::MappingStart
        | TokenKind::MappingEnd => Indicator::FlowCollection,
        TokenKind::Anchor | TokenKind::Alias | TokenKind::Tag => Indicator::NodeProperty,
        TokenKind::BlockLiteral | TokenKind::BlockFolded => Indicator::BlockScalar,
        TokenKind::Scalar(ScalarStyle::SingleQuoted | ScalarStyle::DoubleQuoted) => {
            Indicator::QuotedScalar
        }
        TokenKind::Unknown => Indicator::Reserved,
        TokenKind::MergeKey
        | TokenKind::BlockContent
        | TokenKind::Scalar(ScalarStyle::Plain)
        | TokenKind::Invalid => Indicator::None,
    }
}

impl Scanner {
    fn run(mut self, text: &str) -> Vec<Token> {
        let mut offset = 0;
        for (idx, line_text) in text.split('\n').enumerate() {
            self.lex_line(idx + 1, offset, line_text);
            offset += line_text.len() + 1;
        }

        if let Some(open) = self.open_quote.take() {
            warn!(
                "unterminated quoted scalar starting at {}:{}",
                open.start.line, open.start.column
            );
            let raw = open.raw.trim_end_matches('\n').to_owned();
            self.tokens.push(Token {
                kind: TokenKind::Invalid,
                value: raw.clone(),
                raw,
                indicator: Indicator::QuotedScalar,
                position: open.start,
            });
        }
        self.tokens
    }

    fn push(&mut self, line: &Line<'_>, kind: TokenKind, from: usize, to: usize) {
        let raw = line.slice(from, to).to_owned();
        self.push_valued(line, kind, from, raw.clone(), raw);
    }

    fn push_valued(&mut self, line: &Line<'_>, kind: TokenKind, from: usize, raw: String, value: String) {
        self.tokens.push(Token {
            kind,
            raw,
            value,
            indicator: indicator_for(kind),
            position: line.position(from),
        });
    }

    fn current_level(&self) -> usize {
        self.indents.len() - 1
    }

    fn level_for(&mut self, indent: usize) -> usize {
        while self.indents.len() > 1 && self.indents.last().is_some_and(|&top| top > indent) {
            self.indents.pop();
        }
        if self.indents.last().is_some_and(|&top| top < indent) {
            self.indents.push(indent);
        }
        self.current_level()
    }

    // -- Lines ---------------------------------------------------------------

    fn lex_line(&mut self, number: usize, offset: usize, text: &str) {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let indent = chars.iter().take_while(|&&(_, c)| c == ' ').count();
        let mut line = Line {
            number,
            offset,
            text,
            chars,
            indent,
            level: self.current_level(),
        };

        let mut i = 0;
        if let Some(open) = self.open_quote.take() {
            match self.continue_quote(open, &line) {
                Some(next) => i = next,
                None => return,
            }
        } else if self.in_block_scalar(&line) {
            return;
        }

        let first = line.chars.iter().position(|&(_, c)| !c.is_whitespace());
        let comment_only = first.is_some_and(|f| line.chars[f].1 == '#');
        if i == 0 && self.flow_depth == 0 && !line.is_blank() && !comment_only {
            line.level = self.level_for(indent);
        }

        if i == 0 {
            i = self.line_start_markers(&line);
        }
        self.lex_tokens(&line, i);
    }

    /// Handles content lines of an open block scalar. Returns true if the
    /// line was consumed.
    fn in_block_scalar(&mut self, line: &Line<'_>) -> bool {
        let Some(block) = self.block.as_mut() else {
            return false;
        };
        if line.is_blank() {
            return true;
        }
        if block.content_indent.is_none() && line.indent > block.parent_indent {
            block.content_indent = Some(line.indent);
        }
        match block.content_indent {
            Some(content) if line.indent >= content => {
                self.push(line, TokenKind::BlockContent, content, line.chars.len());
                true
            }
            _ => {
                self.block = None;
                false
            }
        }
    }

    /// Directives and document markers, which only count at column 1.
    /// Returns the char index to continue from.
    fn line_start_markers(&mut self, line: &Line<'_>) -> usize {
        let text = line.text;
        let is_marker = |m: &str| {
            text.starts_with(m) && text[m.len()..].chars().next().is_none_or(char::is_whitespace)
        };

        if text.starts_with('%') {
            let end = (1..line.chars.len())
                .find(|&j| line.chars[j].1 == '#' && line.chars[j - 1].1.is_whitespace())
                .unwrap_or(line.chars.len());
            let raw = line.slice(0, end).trim_end().to_owned();
            let width = raw.chars().count();
            self.push(line, TokenKind::Directive, 0, width);
            return end;
        }
        if is_marker("---") {
            self.push(line, TokenKind::DocumentHeader, 0, 3);
            self.flow_depth = 0;
            self.block = None;
            self.indents = vec![0];
            return 3;
        }
        if is_marker("...") {
            self.push(line, TokenKind::DocumentEnd, 0, 3);
            self.flow_depth = 0;
            self.block = None;
            return 3;
        }
        0
    }

    // -- Tokens --------------------------------------------------------------

    #[allow(clippy::too_many_lines)]
    fn lex_tokens(&mut self, line: &Line<'_>, mut i: usize) {
        let len = line.chars.len();
        while i < len {
            let c = line.chars[i].1;
            if c.is_whitespace() {
                i += 1;
                continue;
            }
            let in_flow = self.flow_depth > 0;
            let next = line.char_at(i + 1);
            let flow_next = in_flow && next.is_some_and(is_flow_indicator);

            match c {
                '#' if i == 0 || line.chars[i - 1].1.is_whitespace() => {
                    let raw = line.slice(i, len).trim_end().to_owned();
                    let value = raw[1..].trim().to_owned();
                    self.push_valued(line, TokenKind::Comment, i, raw, value);
                    return;
                }
                '[' | '{' => {
                    let kind = if c == '[' {
                        TokenKind::SequenceStart
                    } else {
                        TokenKind::MappingStart
                    };
                    self.flow_depth += 1;
                    self.push(line, kind, i, i + 1);
                    i += 1;
                }
                ']' | '}' => {
                    let kind = if !in_flow {
                        warn!("stray {c:?} at {}:{}", line.number, i + 1);
                        TokenKind::Invalid
                    } else if c == ']' {
                        TokenKind::SequenceEnd
                    } else {
                        TokenKind::MappingEnd
                    };
                    self.flow_depth = self.flow_depth.saturating_sub(1);
                    self.push(line, kind, i, i + 1);
                    i += 1;
                }
                ',' if in_flow => {
                    self.push(line, TokenKind::CollectEntry, i, i + 1);
                    i += 1;
                }
                '-' if !in_flow && line.separated_after(i) => {
                    self.push(line, TokenKind::SequenceEntry, i, i + 1);
                    i += 1;
                }
                '?' if line.separated_after(i) || flow_next => {
                    self.push(line, TokenKind::MappingKey, i, i + 1);
                    i += 1;
                }
                ':' if line.separated_after(i) || flow_next || (in_flow && self.follows_json_key()) => {
                    self.push(line, TokenKind::MappingValue, i, i + 1);
                    i += 1;
                }
                '&' | '*' | '!' => {
                    let end = scan_property(line, i + 1, in_flow);
                    let kind = match c {
                        '&' => TokenKind::Anchor,
                        '*' => TokenKind::Alias,
                        _ => TokenKind::Tag,
                    };
                    let raw = line.slice(i, end).to_owned();
                    let value = if kind == TokenKind::Tag {
                        raw.clone()
                    } else {
                        raw[1..].to_owned()
                    };
                    self.push_valued(line, kind, i, raw, value);
                    i = end;
                }
                '|' | '>' if !in_flow => {
                    let end = (i + 1..len)
                        .find(|&j| !matches!(line.chars[j].1, '0'..='9' | '+' | '-'))
                        .unwrap_or(len);
                    let explicit = line.slice(i + 1, end).chars().find_map(|d| d.to_digit(10));
                    let kind = if c == '|' {
                        TokenKind::BlockLiteral
                    } else {
                        TokenKind::BlockFolded
                    };
                    self.push(line, kind, i, end);
                    self.block = Some(BlockScalar {
                        parent_indent: line.indent,
                        content_indent: explicit.map(|d| line.indent + d as usize),
                    });
                    i = end;
                }
                '"' | '\'' => match scan_quote(line, i + 1, c) {
                    Some(close) => {
                        let raw = line.slice(i, close + 1).to_owned();
                        let value = unquote(&raw, c);
                        let style = if c == '"' {
                            ScalarStyle::DoubleQuoted
                        } else {
                            ScalarStyle::SingleQuoted
                        };
                        self.push_valued(line, TokenKind::Scalar(style), i, raw, value);
                        i = close + 1;
                    }
                    None => {
                        self.open_quote = Some(OpenQuote {
                            quote: c,
                            raw: line.slice(i, len).to_owned(),
                            start: line.position(i),
                        });
                        return;
                    }
                },
                '@' | '`' => {
                    let end = (i + 1..len)
                        .find(|&j| line.chars[j].1.is_whitespace())
                        .unwrap_or(len);
                    warn!("reserved indicator {c:?} at {}:{}", line.number, i + 1);
                    self.push(line, TokenKind::Unknown, i, end);
                    i = end;
                }
                '<' if next == Some('<')
                    && line
                        .char_at(i + 2)
                        .is_none_or(|n| n.is_whitespace() || n == ':') =>
                {
                    self.push(line, TokenKind::MergeKey, i, i + 2);
                    i += 2;
                }
                _ => {
                    let end = scan_plain(line, i, in_flow);
                    self.push(line, TokenKind::Scalar(ScalarStyle::Plain), i, end);
                    i = end;
                }
            }
        }
    }

    /// `{"a":1}`: a `:` directly after a quoted key is a value indicator.
    fn follows_json_key(&self) -> bool {
        self.tokens.last().is_some_and(|t| {
            matches!(
                t.kind,
                TokenKind::Scalar(ScalarStyle::SingleQuoted | ScalarStyle::DoubleQuoted)
                    | TokenKind::SequenceEnd
                    | TokenKind::MappingEnd
            )
        })
    }

    /// Continue a quoted scalar opened on an earlier line. Returns the char
    /// index after the closing quote, or `None` if the line did not close it.
    fn continue_quote(&mut self, mut open: OpenQuote, line: &Line<'_>) -> Option<usize> {
        open.raw.push('\n');
        if let Some(close) = scan_quote(line, 0, open.quote) {
            open.raw.push_str(line.slice(0, close + 1));
            let value = unquote(&open.raw, open.quote);
            let style = if open.quote == '"' {
                ScalarStyle::DoubleQuoted
            } else {
                ScalarStyle::SingleQuoted
            };
            let kind = TokenKind::Scalar(style);
            self.tokens.push(Token {
                kind,
                raw: open.raw,
                value,
                indicator: indicator_for(kind),
                position: open.start,
            });
            Some(close + 1)
        } else {
            open.raw.push_str(line.text);
            self.open_quote = Some(open);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Scanning helpers
// ---------------------------------------------------------------------------

/// End (exclusive) of an anchor, alias or tag name starting at `from`.
fn scan_property(line: &Line<'_>, from: usize, in_flow: bool) -> usize {
    (from..line.chars.len())
        .find(|&j| {
            let c = line.chars[j].1;
            c.is_whitespace() || (in_flow && is_flow_indicator(c))
        })
        .unwrap_or(line.chars.len())
}

/// Index of the closing quote, scanning from `from`.
fn scan_quote(line: &Line<'_>, from: usize, quote: char) -> Option<usize> {
    let mut j = from;
    while j < line.chars.len() {
        let c = line.chars[j].1;
        if quote == '"' && c == '\\' {
            j += 2;
            continue;
        }
        if c == quote {
            if quote == '\'' && line.char_at(j + 1) == Some('\'') {
                j += 2;
                continue;
            }
            return Some(j);
        }
        j += 1;
    }
    None
}

/// End (exclusive, trailing whitespace trimmed) of a plain scalar.
fn scan_plain(line: &Line<'_>, from: usize, in_flow: bool) -> usize {
    let len = line.chars.len();
    let mut j = from;
    while j < len {
        let c = line.chars[j].1;
        let stop = match c {
            ':' => line.char_at(j + 1).is_none_or(|n| n.is_whitespace() || (in_flow && is_flow_indicator(n))),
            '#' => j > from && line.chars[j - 1].1.is_whitespace(),
            _ => in_flow && is_flow_indicator(c),
        };
        if stop {
            break;
        }
        j += 1;
    }
    while j > from && line.chars[j - 1].1.is_whitespace() {
        j -= 1;
    }
    j
}

/// Interpret a quoted scalar's raw text.
///
/// Line breaks fold to a single space; double-quoted escapes are decoded;
/// `''` in single-quoted scalars is one quote.
fn unquote(raw: &str, quote: char) -> String {
    let inner = raw
        .strip_prefix(quote)
        .and_then(|s| s.strip_suffix(quote))
        .unwrap_or(raw);
    let folded = inner
        .split('\n')
        .enumerate()
        .map(|(n, part)| if n == 0 { part.trim_end() } else { part.trim() })
        .collect::<Vec<_>>()
        .join(" ");

    if quote == '\'' {
        return folded.replace("''", "'");
    }

    let mut out = String::with_capacity(folded.len());
    let mut chars = folded.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(esc) = chars.next() else {
            out.push('\\');
            break;
        };
        let hex = |n: usize, chars: &mut std::str::Chars<'_>| {
            let digits: String = chars.by_ref().take(n).collect();
            u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
        };
        let decoded = match esc {
            '0' => Some('\0'),
            'a' => Some('\x07'),
            'b' => Some('\x08'),
            't' | '\t' => Some('\t'),
            'n' => Some('\n'),
            'v' => Some('\x0b'),
            'f' => Some('\x0c'),
            'r' => Some('\r'),
            'e' => Some('\x1b'),
            ' ' => Some(' '),
            '"' => Some('"'),
            '/' => Some('/'),
            '\\' => Some('\\'),
            'N' => Some('\u{85}'),
            '_' => Some('\u{a0}'),
            'L' => Some('\u{2028}'),
            'P' => Some('\u{2029}'),
            'x' => hex(2, &mut chars),
            'u' => hex(4, &mut chars),
            'U' => hex(8, &mut chars),
            _ => None,
        };
        match decoded {
            Some(ch) => out.push(ch),
            None => {
                out.push('\\');
                out.push(esc);
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
