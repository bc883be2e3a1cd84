// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements the `CREATE` statement family and the table schema nodes
//! shared with `ALTER`.

use serde::Serialize;

use crate::ast::expressions::{Expr, IdentPart, TableIdentifier};
use crate::ast::query::SettingExpr;
use crate::ast::Statement;
use crate::lexer::Pos;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Create {
    Table(CreateTable),
    Database(CreateDatabase),
    View(CreateView),
    Dictionary(CreateDictionary),
    Function(CreateFunction),
    User(CreateUser),
    Index(CreateIndex),
    NamedCollection(CreateNamedCollection),
}

impl Create {
    pub fn pos(&self) -> Pos {
        match self {
            Self::Table(n) => n.pos,
            Self::Database(n) => n.pos,
            Self::View(n) => n.pos,
            Self::Dictionary(n) => n.pos,
            Self::Function(n) => n.pos,
            Self::User(n) => n.pos,
            Self::Index(n) => n.pos,
            Self::NamedCollection(n) => n.pos,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum ColumnDefaultKind {
    Default,
    Materialized,
    Alias,
    Ephemeral,
}

impl ColumnDefaultKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Materialized => "MATERIALIZED",
            Self::Alias => "ALIAS",
            Self::Ephemeral => "EPHEMERAL",
        }
    }
}

/// One column of a table schema. The type may be absent when a default
/// expression supplies it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDecl {
    pub pos: Pos,
    pub name: IdentPart,
    pub data_type: Option<Box<Expr>>,
    /// `NULL` / `NOT NULL` wrapper around the type.
    pub nullable: Option<bool>,
    pub default_kind: Option<ColumnDefaultKind>,
    pub default_expr: Option<Box<Expr>>,
    pub comment: Option<String>,
    pub codec: Option<Box<Expr>>,
    pub ttl: Option<Box<Expr>>,
    pub primary_key: bool,
}

/// `INDEX name expr TYPE kind(…) [GRANULARITY n]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexDef {
    pub pos: Pos,
    pub name: IdentPart,
    pub expr: Box<Expr>,
    pub index_type: Box<Expr>,
    pub granularity: Option<Box<Expr>>,
}

/// `CONSTRAINT name CHECK (expr)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintDef {
    pub pos: Pos,
    pub name: IdentPart,
    pub expr: Box<Expr>,
}

/// `PROJECTION name (SELECT …)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionDef {
    pub pos: Pos,
    pub name: IdentPart,
    pub select: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TableElement {
    Column(ColumnDecl),
    Index(IndexDef),
    Constraint(ConstraintDef),
    Projection(ProjectionDef),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Engine {
    pub pos: Pos,
    pub name: String,
    pub params: Vec<Expr>,
}

/// `TTL expr [GROUP BY exprs SET assignments] [WHERE cond]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TtlClause {
    pub pos: Pos,
    pub expr: Box<Expr>,
    pub group_by: Option<Vec<Expr>>,
    pub set: Option<Vec<TtlSetItem>>,
    pub where_clause: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TtlSetItem {
    pub pos: Pos,
    pub column: IdentPart,
    pub value: Expr,
}

/// The repeatable option block after the column list (and again after
/// `AS …` for `CREATE TABLE x AS y ENGINE=z ORDER BY …`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableOptions {
    pub engine: Option<Engine>,
    pub partition_by: Option<Box<Expr>>,
    pub primary_key: Option<Box<Expr>>,
    pub order_by: Option<Box<Expr>>,
    pub sample_by: Option<Box<Expr>>,
    pub ttl: Option<TtlClause>,
    pub settings: Option<Vec<SettingExpr>>,
}

impl TableOptions {
    pub fn is_empty(&self) -> bool {
        self.engine.is_none()
            && self.partition_by.is_none()
            && self.primary_key.is_none()
            && self.order_by.is_none()
            && self.sample_by.is_none()
            && self.ttl.is_none()
            && self.settings.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateTable {
    pub pos: Pos,
    pub or_replace: bool,
    pub if_not_exists: bool,
    pub temporary: bool,
    pub table: TableIdentifier,
    pub uuid: Option<String>,
    pub on_cluster: Option<String>,
    pub elements: Vec<TableElement>,
    pub options: TableOptions,
    pub as_select: Option<Box<Statement>>,
    pub as_table: Option<TableIdentifier>,
    pub as_function: Option<Box<Expr>>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateDatabase {
    pub pos: Pos,
    pub if_not_exists: bool,
    pub name: IdentPart,
    pub on_cluster: Option<String>,
    pub engine: Option<Engine>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateView {
    pub pos: Pos,
    pub materialized: bool,
    pub or_replace: bool,
    pub if_not_exists: bool,
    pub table: TableIdentifier,
    pub on_cluster: Option<String>,
    pub to: Option<TableIdentifier>,
    pub options: TableOptions,
    pub populate: bool,
    pub select: Option<Box<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DictionaryAttribute {
    pub pos: Pos,
    pub name: IdentPart,
    pub data_type: Box<Expr>,
    pub default: Option<Box<Expr>>,
    pub expression: Option<Box<Expr>>,
    pub hierarchical: bool,
    pub injective: bool,
}

/// The `SOURCE`/`LAYOUT`/`LIFETIME`/`RANGE` clauses keep their call-like
/// shape as expressions; the oracle treats them opaquely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateDictionary {
    pub pos: Pos,
    pub or_replace: bool,
    pub if_not_exists: bool,
    pub name: TableIdentifier,
    pub on_cluster: Option<String>,
    pub attributes: Vec<DictionaryAttribute>,
    pub primary_key: Option<Vec<Expr>>,
    pub source: Option<Box<Expr>>,
    pub layout: Option<Box<Expr>>,
    pub lifetime: Option<Box<Expr>>,
    pub range: Option<Box<Expr>>,
    pub settings: Option<Vec<SettingExpr>>,
}

/// `CREATE FUNCTION name AS (params) -> body`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateFunction {
    pub pos: Pos,
    pub or_replace: bool,
    pub if_not_exists: bool,
    pub name: IdentPart,
    pub on_cluster: Option<String>,
    pub body: Box<Expr>,
}

/// Only the naming payload is kept; the authentication and host clauses
/// are skipped (see the access-control note in the statements grammar).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateUser {
    pub pos: Pos,
    pub or_replace: bool,
    pub if_not_exists: bool,
    pub names: Vec<IdentPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateIndex {
    pub pos: Pos,
    pub if_not_exists: bool,
    pub name: IdentPart,
    pub table: TableIdentifier,
    pub expr: Box<Expr>,
    pub index_type: Option<Box<Expr>>,
    pub granularity: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateNamedCollection {
    pub pos: Pos,
    pub if_not_exists: bool,
    pub name: IdentPart,
    pub on_cluster: Option<String>,
    pub pairs: Vec<SettingExpr>,
}
