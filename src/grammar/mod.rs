// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements grammar parsing on top of the token pump.
//!
//! One routine per statement kind, a Pratt parser for expressions, and the
//! shared identifier/list helpers. The dispatcher performs one-token
//! lookahead on the lexeme for the multi-word statement heads.

mod alter;
mod ddl;
mod dml;
mod expressions;
mod query;
mod statements;

pub(crate) use expressions::{parse_data_type, parse_expr, parse_subexpr, PREC_MUL};

use crate::ast::*;
use crate::lexer::{decode_text, TokenKind};
use crate::parser::Parser;

/// Top-level statement dispatcher.
pub(crate) fn parse_statement(p: &mut Parser) -> Option<Statement> {
    match p.kind() {
        TokenKind::Error => {
            p.unexpected("statement");
            p.bump();
            None
        }
        TokenKind::SelectKw | TokenKind::WithKw | TokenKind::LParen => {
            query::parse_select_with_union(p)
        }
        TokenKind::InsertKw => dml::parse_insert(p),
        TokenKind::CreateKw => ddl::parse_create(p),
        TokenKind::AlterKw => alter::parse_alter(p),
        TokenKind::DropKw => statements::parse_drop(p),
        TokenKind::TruncateKw => statements::parse_truncate(p),
        TokenKind::UseKw => statements::parse_use(p),
        TokenKind::DescribeKw | TokenKind::DescKw => statements::parse_describe(p),
        TokenKind::ShowKw => statements::parse_show(p),
        TokenKind::ExplainKw => statements::parse_explain(p),
        TokenKind::SetKw => statements::parse_set(p),
        TokenKind::OptimizeKw => statements::parse_optimize(p),
        TokenKind::SystemKw => statements::parse_system(p),
        TokenKind::RenameKw => statements::parse_rename(p),
        TokenKind::ExchangeKw => statements::parse_exchange(p),
        TokenKind::ExistsKw => statements::parse_exists(p),
        TokenKind::DetachKw => statements::parse_detach(p),
        TokenKind::AttachKw => statements::parse_attach(p),
        TokenKind::CheckKw => statements::parse_check(p),
        TokenKind::GrantKw => statements::parse_grant(p),
        TokenKind::BeginKw | TokenKind::CommitKw | TokenKind::RollbackKw => {
            statements::parse_transaction(p)
        }
        _ => {
            p.unexpected("statement");
            p.bump();
            None
        }
    }
}

/// Keywords that terminate an identifier run or a bare table alias. This
/// closed list is the only place such exclusions live.
pub(crate) fn is_clause_keyword(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::FromKw
            | TokenKind::PrewhereKw
            | TokenKind::WhereKw
            | TokenKind::GroupKw
            | TokenKind::HavingKw
            | TokenKind::QualifyKw
            | TokenKind::WindowKw
            | TokenKind::OrderKw
            | TokenKind::LimitKw
            | TokenKind::OffsetKw
            | TokenKind::FetchKw
            | TokenKind::SettingsKw
            | TokenKind::FormatKw
            | TokenKind::IntoKw
            | TokenKind::UnionKw
            | TokenKind::IntersectKw
            | TokenKind::ExceptKw
            | TokenKind::WithKw
            | TokenKind::OnKw
            | TokenKind::UsingKw
            | TokenKind::JoinKw
            | TokenKind::InnerKw
            | TokenKind::LeftKw
            | TokenKind::RightKw
            | TokenKind::FullKw
            | TokenKind::CrossKw
            | TokenKind::GlobalKw
            | TokenKind::AnyKw
            | TokenKind::AllKw
            | TokenKind::AsofKw
            | TokenKind::SemiKw
            | TokenKind::AntiKw
            | TokenKind::PasteKw
            | TokenKind::ArrayKw
            | TokenKind::FinalKw
            | TokenKind::SampleKw
            | TokenKind::AsKw
            | TokenKind::AscKw
            | TokenKind::DescKw
            | TokenKind::AscendingKw
            | TokenKind::DescendingKw
            | TokenKind::NullsKw
            | TokenKind::CollateKw
            | TokenKind::ByKw
            | TokenKind::TotalsKw
            | TokenKind::ValuesKw
            | TokenKind::SelectKw
            | TokenKind::WhenKw
            | TokenKind::ThenKw
            | TokenKind::ElseKw
            | TokenKind::EndKw
            | TokenKind::AndKw
            | TokenKind::OrKw
    )
}

/// Window-frame keywords are never implicit aliases.
fn is_window_frame_keyword(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::RowsKw
            | TokenKind::RangeKw
            | TokenKind::GroupsKw
            | TokenKind::UnboundedKw
            | TokenKind::PrecedingKw
            | TokenKind::FollowingKw
            | TokenKind::CurrentKw
    )
}

/// Whether the current token may attach as an implicit (`AS`-less) alias
/// to a column expression.
pub(crate) fn at_implicit_alias(p: &Parser) -> bool {
    let kind = p.kind();
    if kind == TokenKind::Ident || kind == TokenKind::QuotedIdent {
        return true;
    }
    kind.is_keyword()
        && !is_clause_keyword(kind)
        && !is_window_frame_keyword(kind)
        && kind != TokenKind::IntersectKw
}

/// A single name: bare identifier, quoted identifier, or any keyword.
pub(crate) fn parse_ident(p: &mut Parser) -> Option<IdentPart> {
    if !p.kind().is_name() {
        p.expected(TokenKind::Ident);
        return None;
    }
    let token = p.bump();
    let name = if token.quoted {
        decode_text(token.text)
    } else {
        token.text.to_owned()
    };
    Some(IdentPart::new(name, token.quoted))
}

/// A dotted identifier run, e.g. `db.table.column`.
pub(crate) fn parse_identifier(p: &mut Parser) -> Option<Identifier> {
    let pos = p.pos();
    let mut parts = vec![parse_ident(p)?];
    while p.at(TokenKind::Dot) && p.peek().kind.is_name() {
        p.bump();
        parts.push(parse_ident(p)?);
    }
    Some(Identifier {
        pos,
        parts,
        alias: None,
    })
}

/// `[database.]table`; longer runs are rejected.
pub(crate) fn parse_table_identifier(p: &mut Parser) -> Option<TableIdentifier> {
    let pos = p.pos();
    let first = parse_ident(p)?;
    if p.at(TokenKind::Dot) && p.peek().kind.is_name() {
        p.bump();
        let table = parse_ident(p)?;
        Some(TableIdentifier {
            pos,
            database: Some(first),
            table,
            alias: None,
        })
    } else {
        Some(TableIdentifier {
            pos,
            database: None,
            table: first,
            alias: None,
        })
    }
}

/// `ON CLUSTER name`; the name may be an identifier or a string literal.
pub(crate) fn parse_on_cluster(p: &mut Parser) -> Option<String> {
    if !(p.at(TokenKind::OnKw) && p.peek().kind == TokenKind::ClusterKw) {
        return None;
    }
    p.bump();
    p.bump();
    if p.at(TokenKind::String) {
        let token = p.bump();
        Some(decode_text(token.text))
    } else {
        parse_ident(p).map(|part| part.name)
    }
}

pub(crate) fn parse_string_literal(p: &mut Parser) -> Option<String> {
    if p.at(TokenKind::String) {
        let token = p.bump();
        Some(decode_text(token.text))
    } else {
        p.expected(TokenKind::String);
        None
    }
}

/// `name = value [, …]` as used by `SETTINGS` and `SET`.
pub(crate) fn parse_settings_list(p: &mut Parser) -> Option<Vec<SettingExpr>> {
    let mut settings = Vec::new();
    loop {
        let pos = p.pos();
        let name = parse_ident(p)?;
        if !p.expect(TokenKind::Eq) {
            return None;
        }
        let value = parse_expr(p)?;
        settings.push(SettingExpr {
            pos,
            name: name.name,
            value,
        });
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    Some(settings)
}

/// Optional `PARTITION …` payload shared by ALTER and OPTIMIZE.
pub(crate) fn parse_partition(p: &mut Parser) -> Option<Partition> {
    let pos = p.pos();
    if p.eat(TokenKind::AllKw) {
        return Some(Partition::All { pos });
    }
    if p.at_word("ID") {
        p.bump();
        let id = parse_string_literal(p)?;
        return Some(Partition::Id { pos, id });
    }
    let expr = parse_expr(p)?;
    Some(Partition::Expr {
        pos,
        expr: Box::new(expr),
    })
}
