// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Hand-written lexer and parser for the ClickHouse SQL dialect.
//!
//! The parser turns a stream of SQL text into strongly-typed statement
//! trees; [`explain`] renders a tree dump comparable with the reference
//! engine's `EXPLAIN AST` output. Parsing always returns both the
//! statements that could be built and the accumulated diagnostics.

pub mod ast;
mod explain;
mod grammar;
pub mod lexer;
mod parser;

use std::io;
use std::path::Path;

pub use explain::{explain, explain_all};
pub use lexer::{Lexer, Pos, Token, TokenKind};
pub use parser::{CancelToken, Parse, ParseError, ParseErrors, Parser};

/// Parses a (possibly multi-statement) SQL text. Cancellation is observed
/// between statements; a cancelled run returns the statements parsed so
/// far plus a [`ParseError::Cancelled`] diagnostic.
pub fn parse(text: &str, cancel: &CancelToken) -> Parse {
    tracing::trace!(bytes = text.len(), "parsing statement stream");
    Parser::new(text).parse_statements(cancel)
}

pub fn parse_string(text: impl AsRef<str>, cancel: &CancelToken) -> Parse {
    parse(text.as_ref(), cancel)
}

pub fn parse_file(path: impl AsRef<Path>, cancel: &CancelToken) -> io::Result<Parse> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse(&text, cancel))
}
