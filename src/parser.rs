// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements the parser driver: the token pump, error accumulation and
//! the statement loop.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ast::Statement;
use crate::grammar;
use crate::lexer::{Lexer, Pos, Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("{message} at line {line}, column {column}")]
    Lexical {
        message: String,
        line: u32,
        column: u32,
    },
    #[error("expected {expected}, got {found} at line {line}, column {column}")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        line: u32,
        column: u32,
    },
    #[error("unexpected {found} in {context} at line {line}, column {column}")]
    Unexpected {
        context: String,
        found: TokenKind,
        line: u32,
        column: u32,
    },
    #[error("unexpected end of input in {context} at line {line}, column {column}")]
    Truncated {
        context: String,
        line: u32,
        column: u32,
    },
    #[error("parsing cancelled")]
    Cancelled,
}

/// All diagnostics of one parser run, joined for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrors(pub Vec<ParseError>);

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {}

/// The result of a parser run: whatever statements could be built, plus
/// the accumulated diagnostics. Callers always receive both.
#[derive(Debug, Clone, PartialEq)]
pub struct Parse {
    pub statements: Vec<Statement>,
    pub errors: Vec<ParseError>,
}

impl Parse {
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<Vec<Statement>, ParseErrors> {
        if self.errors.is_empty() {
            Ok(self.statements)
        } else {
            Err(ParseErrors(self.errors))
        }
    }
}

/// Cooperative cancellation flag, observed between statements only.
#[derive(Debug, Default, Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// A parser instance owns its token buffer (one current, one peek) and its
/// pending-errors vector, nothing else. Many parsers may run in parallel
/// on independent inputs.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token<'a>,
    peek: Token<'a>,
    pub(crate) errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = Self::pump(&mut lexer);
        let peek = Self::pump(&mut lexer);
        Self {
            lexer,
            current,
            peek,
            errors: Vec::new(),
        }
    }

    fn pump(lexer: &mut Lexer<'a>) -> Token<'a> {
        loop {
            let token = lexer.next_token();
            if !token.kind.is_trivia() {
                return token;
            }
        }
    }

    pub(crate) fn current(&self) -> &Token<'a> {
        &self.current
    }

    pub(crate) fn peek(&self) -> &Token<'a> {
        &self.peek
    }

    pub(crate) fn kind(&self) -> TokenKind {
        self.current.kind
    }

    pub(crate) fn pos(&self) -> Pos {
        self.current.pos
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    pub(crate) fn at_end(&self) -> bool {
        self.current.kind == TokenKind::Eof
    }

    /// Case-insensitive lexeme test on the current token; bare identifiers
    /// and keywords only.
    pub(crate) fn at_word(&self, word: &str) -> bool {
        (self.current.kind == TokenKind::Ident || self.current.kind.is_keyword())
            && self.current.text_is(word)
    }

    pub(crate) fn peek_word(&self, word: &str) -> bool {
        (self.peek.kind == TokenKind::Ident || self.peek.kind.is_keyword())
            && self.peek.text_is(word)
    }

    /// Consumes the current token and returns it.
    pub(crate) fn bump(&mut self) -> Token<'a> {
        let next = Self::pump(&mut self.lexer);
        let peek = std::mem::replace(&mut self.peek, next);
        std::mem::replace(&mut self.current, peek)
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_word(&mut self, word: &str) -> bool {
        if self.at_word(word) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consumes the expected kind or records an error; never advances on a
    /// miss.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            self.expected(kind);
            false
        }
    }

    pub(crate) fn error(&mut self, error: ParseError) {
        tracing::trace!(%error, "recording parse error");
        self.errors.push(error);
    }

    pub(crate) fn expected(&mut self, kind: TokenKind) {
        let error = if self.at_end() {
            ParseError::Truncated {
                context: format!("expecting {kind}"),
                line: self.current.pos.line,
                column: self.current.pos.column,
            }
        } else {
            ParseError::UnexpectedToken {
                expected: kind,
                found: self.current.kind,
                line: self.current.pos.line,
                column: self.current.pos.column,
            }
        };
        self.error(error);
    }

    pub(crate) fn unexpected(&mut self, context: &str) {
        let error = if self.at_end() {
            ParseError::Truncated {
                context: context.to_owned(),
                line: self.current.pos.line,
                column: self.current.pos.column,
            }
        } else if self.current.kind == TokenKind::Error {
            ParseError::Lexical {
                message: self
                    .current
                    .diagnostic
                    .unwrap_or("invalid token")
                    .to_owned(),
                line: self.current.pos.line,
                column: self.current.pos.column,
            }
        } else {
            ParseError::Unexpected {
                context: context.to_owned(),
                found: self.current.kind,
                line: self.current.pos.line,
                column: self.current.pos.column,
            }
        };
        self.error(error);
    }

    /// Runs the statement loop to completion. Cancellation is observed
    /// between statements only; a cancelled run returns the statements
    /// parsed so far.
    pub fn parse_statements(mut self, cancel: &CancelToken) -> Parse {
        let mut statements = Vec::new();

        loop {
            if cancel.is_cancelled() {
                self.error(ParseError::Cancelled);
                break;
            }

            while self.eat(TokenKind::SemiColon) {}
            if self.at_end() {
                break;
            }

            let before = self.current.pos.offset;
            match grammar::parse_statement(&mut self) {
                Some(statement) => statements.push(statement),
                None => {
                    // Resynchronise at the next statement boundary.
                    while !self.at_end() && !self.at(TokenKind::SemiColon) {
                        self.bump();
                    }
                }
            }

            // Forward progress even on a handler that consumed nothing.
            if self.current.pos.offset == before && !self.at_end() {
                self.bump();
            }
        }

        Parse {
            statements,
            errors: self.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pump_skips_trivia() {
        let mut parser = Parser::new("-- c\n  SELECT /* x */ 1");
        assert_eq!(parser.kind(), TokenKind::SelectKw);
        parser.bump();
        assert_eq!(parser.kind(), TokenKind::Number);
    }

    #[test]
    fn expect_records_error_without_advancing() {
        let mut parser = Parser::new("SELECT");
        assert!(!parser.expect(TokenKind::FromKw));
        assert_eq!(parser.kind(), TokenKind::SelectKw);
        assert_eq!(parser.errors.len(), 1);
    }

    #[test]
    fn error_message_shape() {
        let error = ParseError::UnexpectedToken {
            expected: TokenKind::RParen,
            found: TokenKind::Comma,
            line: 3,
            column: 7,
        };
        assert_eq!(error.to_string(), "expected RParen, got Comma at line 3, column 7");
    }
}
