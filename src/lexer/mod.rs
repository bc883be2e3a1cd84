// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements the lexer on top of the [`logos`] scanner.
//!
//! The wrapper adds what the raw scanner cannot provide: line/column
//! tracking, keyword resolution through the table in [`keywords`], a
//! diagnostic message on error tokens, and an endless `Eof` tail once the
//! input is exhausted.

mod keywords;
mod token;

use logos::Logos;
use serde::Serialize;
use text_size::{TextRange, TextSize};

pub use keywords::keyword_kind;
pub use token::TokenKind;

/// Position of the first byte of a token in the source text.
///
/// Carried by value in every AST node; nodes never borrow the source
/// buffer, so they outlive it.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Pos {
    pub offset: u32,
    /// 1-based.
    pub line: u32,
    /// 1-based, counted in characters.
    pub column: u32,
}

/// Represents a single token of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
    pub pos: Pos,
    /// Set for identifiers written in back-ticks or double quotes. The
    /// quotation has no semantic effect; later passes use it to preserve
    /// the original spelling.
    pub quoted: bool,
    /// Diagnostic text for `Error` tokens.
    pub diagnostic: Option<&'static str>,
}

impl Token<'_> {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Case-insensitive lexeme comparison, the dispatcher's lookahead tool.
    pub fn text_is(&self, word: &str) -> bool {
        self.text.eq_ignore_ascii_case(word)
    }
}

/// Wrapper for the actual [`Logos`] scanner.
#[derive(Debug)]
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
            line: 1,
            column: 1,
        }
    }

    /// Emits the next token; once the input is exhausted, emits `Eof`
    /// indefinitely.
    pub fn next_token(&mut self) -> Token<'a> {
        let Some(result) = self.inner.next() else {
            return self.eof_token();
        };

        let text = self.inner.slice();
        let (kind, diagnostic) = match result {
            Ok(kind) => (kind, None),
            Err(()) => (TokenKind::Error, Some(classify_error(text))),
        };

        let range = {
            let std::ops::Range { start, end } = self.inner.span();
            let start = TextSize::try_from(start).unwrap();
            let end = TextSize::try_from(end).unwrap();
            TextRange::new(start, end)
        };

        let pos = Pos {
            offset: range.start().into(),
            line: self.line,
            column: self.column,
        };
        self.track_position(text);

        let (kind, quoted) = match kind {
            TokenKind::Ident => (keyword_kind(text).unwrap_or(TokenKind::Ident), false),
            TokenKind::QuotedIdent => (TokenKind::QuotedIdent, true),
            other => (other, false),
        };

        Token {
            kind,
            text,
            range,
            pos,
            quoted,
            diagnostic,
        }
    }

    fn eof_token(&self) -> Token<'a> {
        let end = TextSize::of(self.inner.source());
        Token {
            kind: TokenKind::Eof,
            text: "",
            range: TextRange::empty(end),
            pos: Pos {
                offset: end.into(),
                line: self.line,
                column: self.column,
            },
            quoted: false,
            diagnostic: None,
        }
    }

    fn track_position(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

/// Decodes a quoted token (string literal or quoted identifier): strips
/// the delimiters and resolves backslash escapes and doubled delimiters.
pub(crate) fn decode_text(raw: &str) -> String {
    let mut chars = raw.chars();
    let Some(delim) = chars.next() else {
        return String::new();
    };
    if !matches!(delim, '\'' | '"' | '`') {
        return raw.to_owned();
    }

    let inner: String = chars.collect();
    let inner = inner.strip_suffix(delim).unwrap_or(&inner);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('0') => out.push('\0'),
                Some('b') => out.push('\u{8}'),
                Some('f') => out.push('\u{c}'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else if c == delim && chars.peek() == Some(&delim) {
            chars.next();
            out.push(delim);
        } else {
            out.push(c);
        }
    }
    out
}

fn classify_error(slice: &str) -> &'static str {
    if slice.starts_with("/*") {
        "unterminated block comment"
    } else if slice.starts_with('\'') {
        "unterminated string literal"
    } else if slice.starts_with('"') || slice.starts_with('`') {
        "unterminated quoted identifier"
    } else {
        "unexpected character"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .filter(|t| !t.kind.is_trivia())
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn keywords_are_resolved() {
        assert_eq!(
            kinds("SELECT 1 FROM t"),
            vec![
                TokenKind::SelectKw,
                TokenKind::Number,
                TokenKind::FromKw,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn quoted_keyword_stays_an_identifier() {
        let mut lexer = Lexer::new("`select`");
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::QuotedIdent);
        assert!(token.quoted);
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let mut lexer = Lexer::new("SELECT\n  x");
        let select = lexer.next_token();
        assert_eq!(select.pos, Pos { offset: 0, line: 1, column: 1 });

        let _ws = lexer.next_token();
        let x = lexer.next_token();
        assert_eq!(x.pos, Pos { offset: 9, line: 2, column: 3 });
    }

    #[test]
    fn eof_repeats_forever() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().kind, TokenKind::Ident);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn dotted_number_after_identifier() {
        assert_eq!(
            kinds("t.1"),
            vec![TokenKind::Ident, TokenKind::Number]
        );
    }

    #[test]
    fn comments_are_trivia() {
        assert_eq!(kinds("-- hi\n1 /* x */ + 2"), vec![
            TokenKind::Number,
            TokenKind::Plus,
            TokenKind::Number,
        ]);
    }
}
