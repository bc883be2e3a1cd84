// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements the `SELECT` statement tree and its clause fragments.

use serde::Serialize;

use crate::ast::expressions::{Expr, IdentPart};
use crate::ast::Statement;
use crate::lexer::Pos;

/// The operator joining `selects[i]` to `selects[i+1]` of a
/// [`SelectWithUnion`]. `INTERSECT ALL` and `EXCEPT ALL` flatten here;
/// the DISTINCT set operations group into [`SelectIntersectExcept`]
/// instead.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum UnionMode {
    Union,
    UnionAll,
    UnionDistinct,
    IntersectAll,
    ExceptAll,
}

impl UnionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::UnionAll => "UNION ALL",
            Self::UnionDistinct => "UNION DISTINCT",
            Self::IntersectAll => "INTERSECT ALL",
            Self::ExceptAll => "EXCEPT ALL",
        }
    }
}

/// Chain of selects joined by `UNION`-family operators. Always the root of
/// a parsed `SELECT`, even for a single select without set operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectWithUnion {
    pub pos: Pos,
    pub selects: Vec<Statement>,
    pub modes: Vec<UnionMode>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum SetOp {
    Intersect,
    IntersectDistinct,
    Except,
    ExceptDistinct,
}

/// Grouped `INTERSECT`/`EXCEPT` tree. `INTERSECT` binds tighter than
/// `EXCEPT`: consecutive intersections fuse into one node, the remaining
/// `EXCEPT`s fold left-associatively.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectIntersectExcept {
    pub pos: Pos,
    pub op: SetOp,
    pub selects: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Select {
    pub pos: Pos,
    pub with: Option<Vec<Expr>>,
    pub distinct: bool,
    pub top: Option<Box<Expr>>,
    pub columns: Vec<Expr>,
    pub from: Option<TablesInSelect>,
    pub prewhere: Option<Box<Expr>>,
    pub where_clause: Option<Box<Expr>>,
    pub group_by: Option<GroupBy>,
    pub with_totals: bool,
    pub having: Option<Box<Expr>>,
    pub qualify: Option<Box<Expr>>,
    pub windows: Option<Vec<WindowDef>>,
    pub order_by: Option<Vec<OrderExpr>>,
    pub limit_by: Option<LimitBy>,
    pub limit: Option<Limit>,
    pub offset: Option<Box<Expr>>,
    pub settings: Option<Vec<SettingExpr>>,
    pub into_outfile: Option<IntoOutfile>,
    pub format: Option<IdentPart>,
}

/// `FROM` and `ARRAY JOIN` collapse into one clause; each element carries a
/// table expression (with an optional join) or an array join.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablesInSelect {
    pub pos: Pos,
    pub elements: Vec<TablesElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablesElement {
    pub pos: Pos,
    pub table: Option<TableExpression>,
    pub join: Option<TableJoin>,
    pub array_join: Option<ArrayJoin>,
}

/// A table in `FROM` position: identifier, subquery or table function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableExpression {
    pub pos: Pos,
    pub expr: Box<Expr>,
    pub final_modifier: bool,
    pub sample: Option<Box<Expr>>,
    pub sample_offset: Option<Box<Expr>>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
    Paste,
    /// Implicit cross join written with a comma.
    Comma,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum JoinStrictness {
    Unspecified,
    Any,
    All,
    Asof,
    Semi,
    Anti,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableJoin {
    pub pos: Pos,
    pub global: bool,
    pub strictness: JoinStrictness,
    pub kind: JoinKind,
    pub on: Option<Box<Expr>>,
    pub using: Option<Vec<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayJoin {
    pub pos: Pos,
    pub left: bool,
    pub expressions: Vec<Expr>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum GroupByKind {
    Exprs,
    All,
    Rollup,
    Cube,
    GroupingSets,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupBy {
    pub pos: Pos,
    pub kind: GroupByKind,
    pub exprs: Vec<Expr>,
    /// Populated for `GROUPING SETS ((…), (…))`.
    pub sets: Vec<Vec<Expr>>,
    pub with_rollup: bool,
    pub with_cube: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowDef {
    pub pos: Pos,
    pub name: String,
    pub spec: WindowSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSpec {
    pub pos: Pos,
    pub partition_by: Option<Vec<Expr>>,
    pub order_by: Option<Vec<OrderExpr>>,
    pub frame: Option<WindowFrame>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum WindowFrameKind {
    Rows,
    Range,
    Groups,
}

impl WindowFrameKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rows => "ROWS",
            Self::Range => "RANGE",
            Self::Groups => "GROUPS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FrameBound {
    CurrentRow,
    UnboundedPreceding,
    UnboundedFollowing,
    Preceding(Box<Expr>),
    Following(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowFrame {
    pub pos: Pos,
    pub kind: WindowFrameKind,
    pub begin: FrameBound,
    pub end: Option<FrameBound>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum OrderDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderExpr {
    pub pos: Pos,
    pub expr: Box<Expr>,
    pub direction: Option<OrderDirection>,
    pub nulls: Option<NullsOrder>,
    pub collate: Option<String>,
    pub fill: Option<WithFill>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithFill {
    pub pos: Pos,
    pub from: Option<Box<Expr>>,
    pub to: Option<Box<Expr>>,
    pub step: Option<Box<Expr>>,
}

/// `LIMIT n [OFFSET m] [WITH TIES]`; `LIMIT n, m` is canonicalised to
/// offset `n`, limit `m` before this node is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Limit {
    pub pos: Pos,
    pub limit: Box<Expr>,
    pub offset: Option<Box<Expr>>,
    pub with_ties: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitBy {
    pub pos: Pos,
    pub limit: Box<Expr>,
    pub offset: Option<Box<Expr>>,
    pub by: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingExpr {
    pub pos: Pos,
    pub name: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntoOutfile {
    pub pos: Pos,
    pub path: String,
    pub truncate: bool,
}
