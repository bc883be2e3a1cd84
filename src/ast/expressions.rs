// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements the typed AST nodes for SQL expressions.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::ast::query::{SettingExpr, WindowSpec};
use crate::ast::Statement;
use crate::lexer::Pos;

/// One segment of a (possibly dotted, possibly quoted) identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentPart {
    pub name: String,
    pub quoted: bool,
}

impl IdentPart {
    pub fn new<S>(name: S, quoted: bool) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            quoted,
        }
    }
}

impl fmt::Display for IdentPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Column or scalar reference; `parts` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub pos: Pos,
    pub parts: Vec<IdentPart>,
    pub alias: Option<String>,
}

impl Identifier {
    pub fn name(&self) -> String {
        let mut out = String::new();
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(&part.name);
        }
        out
    }
}

/// `[database.]table [AS alias]` in table position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableIdentifier {
    pub pos: Pos,
    pub database: Option<IdentPart>,
    pub table: IdentPart,
    pub alias: Option<String>,
}

impl TableIdentifier {
    pub fn name(&self) -> String {
        match &self.database {
            Some(db) => format!("{}.{}", db.name, self.table.name),
            None => self.table.name.clone(),
        }
    }
}

fn serialize_float<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if value.is_infinite() {
        serializer.serialize_str(if value.is_sign_positive() { "+Inf" } else { "-Inf" })
    } else {
        serializer.serialize_f64(*value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LiteralValue {
    String(String),
    /// The `negative` marker preserves `-0` vs `0`; the magnitude always
    /// fits the unsigned field.
    Int { value: u64, negative: bool },
    /// `source` keeps the original lexeme so `0.0` and `0` print
    /// differently.
    Float {
        #[serde(serialize_with = "serialize_float")]
        value: f64,
        source: Option<String>,
    },
    Bool(bool),
    Null,
    Array(Vec<Expr>),
    Tuple(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    pub pos: Pos,
    pub value: LiteralValue,
}

/// `REPLACE(expr AS column)` item of a columns transformer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaceItem {
    pub pos: Pos,
    pub expr: Box<Expr>,
    pub column: IdentPart,
}

/// `EXCEPT`/`REPLACE`/`APPLY` attached to `*` or `COLUMNS(…)`; source order
/// among transformers is preserved and significant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColumnsTransformer {
    Except {
        pos: Pos,
        columns: Vec<IdentPart>,
        pattern: Option<String>,
    },
    Replace {
        pos: Pos,
        items: Vec<ReplaceItem>,
    },
    Apply {
        pos: Pos,
        func: IdentPart,
    },
}

impl ColumnsTransformer {
    pub fn pos(&self) -> Pos {
        match self {
            Self::Except { pos, .. } | Self::Replace { pos, .. } | Self::Apply { pos, .. } => *pos,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asterisk {
    pub pos: Pos,
    /// Set for the `table.*` form.
    pub qualifier: Option<Vec<IdentPart>>,
    pub transformers: Vec<ColumnsTransformer>,
}

/// `COLUMNS('pattern')` or `COLUMNS(a, b)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnsMatcher {
    pub pos: Pos,
    pub pattern: Option<String>,
    pub columns: Vec<IdentPart>,
    pub transformers: Vec<ColumnsTransformer>,
}

/// `OVER window_name` or `OVER (spec)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverClause {
    pub pos: Pos,
    pub window_name: Option<String>,
    pub spec: Option<WindowSpec>,
}

/// A non-empty `parameters` list denotes a parametric aggregate
/// `f(p…)(a…)`; otherwise this is an ordinary call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub pos: Pos,
    pub name: String,
    pub parameters: Option<Vec<Expr>>,
    pub arguments: Vec<Expr>,
    pub distinct: bool,
    pub over: Option<OverClause>,
    pub settings: Option<Vec<SettingExpr>>,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryExpr {
    pub pos: Pos,
    pub op: String,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    /// Set when the whole expression was written in parentheses, so later
    /// passes can tell `(a OR b) OR c` from `a OR b OR c`.
    pub parenthesized: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryExpr {
    pub pos: Pos,
    pub op: String,
    pub operand: Box<Expr>,
}

/// `cond ? then : else`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TernaryExpr {
    pub pos: Pos,
    pub condition: Box<Expr>,
    pub then_branch: Box<Expr>,
    pub else_branch: Box<Expr>,
}

/// A parenthesised `SELECT` in expression or table position. The inner
/// statement is always a `SelectWithUnion`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subquery {
    pub pos: Pos,
    pub select: Box<Statement>,
    pub alias: Option<String>,
}

/// One element of a `WITH` clause; `name` is absent for `WITH 1 SELECT 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithElement {
    pub pos: Pos,
    pub name: Option<String>,
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseBranch {
    pub condition: Expr,
    pub result: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseExpr {
    pub pos: Pos,
    pub operand: Option<Box<Expr>>,
    pub branches: Vec<CaseBranch>,
    pub else_branch: Option<Box<Expr>>,
}

/// Which spelling produced a cast; the tree shape is identical.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum CastSyntax {
    /// `expr :: Type`
    Operator,
    /// `CAST(expr, 'Type')`
    Function,
    /// `CAST(expr AS Type)`
    Keyword,
}

/// Exactly one of `ty` (statically-known type) and `type_expr` (dynamic,
/// e.g. an `if(…)` choosing a type string) is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastExpr {
    pub pos: Pos,
    pub expr: Box<Expr>,
    pub ty: Option<Box<Expr>>,
    pub type_expr: Option<Box<Expr>>,
    pub syntax: CastSyntax,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractExpr {
    pub pos: Pos,
    /// Upper-cased field name (`YEAR`, `MONTH`, …).
    pub field: String,
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalExpr {
    pub pos: Pos,
    pub value: Box<Expr>,
    /// Upper-cased unit (`DAY`, `WEEK`, …).
    pub unit: String,
}

/// `expr[index]`; `index` is `None` for the JSON-array-path form `arr[]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayAccess {
    pub pos: Pos,
    pub object: Box<Expr>,
    pub index: Option<Box<Expr>>,
}

/// `expr.N` with a 1-based element index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TupleAccess {
    pub pos: Pos,
    pub object: Box<Expr>,
    pub index: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lambda {
    pub pos: Pos,
    pub params: Vec<String>,
    pub body: Box<Expr>,
    /// A parenthesised lambda refuses the multi-parameter merge.
    pub parenthesized: bool,
}

/// `{name:Type}` or the positional `?`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub pos: Pos,
    pub name: Option<String>,
    pub ty: Option<String>,
    pub positional: bool,
}

/// Wrapper for nodes that do not own an alias slot themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AliasedExpr {
    pub pos: Pos,
    pub expr: Box<Expr>,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetweenExpr {
    pub pos: Pos,
    pub negated: bool,
    pub expr: Box<Expr>,
    pub low: Box<Expr>,
    pub high: Box<Expr>,
}

/// `expr [GLOBAL] [NOT] IN target`; the target is a tuple literal, a
/// subquery, or a single expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InExpr {
    pub pos: Pos,
    pub negated: bool,
    pub global: bool,
    pub expr: Box<Expr>,
    pub target: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsNullExpr {
    pub pos: Pos,
    pub negated: bool,
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LikeExpr {
    pub pos: Pos,
    pub negated: bool,
    pub case_insensitive: bool,
    pub expr: Box<Expr>,
    pub pattern: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExistsExpr {
    pub pos: Pos,
    pub subquery: Box<Expr>,
}

/// A type name with optional parameters, e.g. `Decimal(18, 4)` or
/// `Array(Nullable(String))`. Parameters may be types, literals or
/// name/type pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataType {
    pub pos: Pos,
    pub name: IdentPart,
    pub params: Vec<Expr>,
    /// Distinguishes `DateTime()` from `DateTime`.
    pub has_parens: bool,
}

/// `name Type` inside a composite type, e.g. `Tuple(a UInt8, b String)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameTypePair {
    pub pos: Pos,
    pub name: IdentPart,
    pub ty: Box<Expr>,
}

/// Wrapper for JSON/OBJECT type arguments, e.g. `Object('json')`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectTypeArgument {
    pub pos: Pos,
    pub arg: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Identifier(Identifier),
    TableIdentifier(TableIdentifier),
    Literal(Literal),
    Asterisk(Asterisk),
    ColumnsMatcher(ColumnsMatcher),
    Function(FunctionCall),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Ternary(TernaryExpr),
    Subquery(Subquery),
    With(WithElement),
    Case(CaseExpr),
    Cast(CastExpr),
    Extract(ExtractExpr),
    Interval(IntervalExpr),
    ArrayAccess(ArrayAccess),
    TupleAccess(TupleAccess),
    Lambda(Lambda),
    Parameter(Parameter),
    Aliased(AliasedExpr),
    Between(BetweenExpr),
    In(InExpr),
    IsNull(IsNullExpr),
    Like(LikeExpr),
    Exists(ExistsExpr),
    DataType(DataType),
    NameTypePair(NameTypePair),
    ObjectTypeArg(ObjectTypeArgument),
}

impl Expr {
    pub fn pos(&self) -> Pos {
        match self {
            Self::Identifier(n) => n.pos,
            Self::TableIdentifier(n) => n.pos,
            Self::Literal(n) => n.pos,
            Self::Asterisk(n) => n.pos,
            Self::ColumnsMatcher(n) => n.pos,
            Self::Function(n) => n.pos,
            Self::Binary(n) => n.pos,
            Self::Unary(n) => n.pos,
            Self::Ternary(n) => n.pos,
            Self::Subquery(n) => n.pos,
            Self::With(n) => n.pos,
            Self::Case(n) => n.pos,
            Self::Cast(n) => n.pos,
            Self::Extract(n) => n.pos,
            Self::Interval(n) => n.pos,
            Self::ArrayAccess(n) => n.pos,
            Self::TupleAccess(n) => n.pos,
            Self::Lambda(n) => n.pos,
            Self::Parameter(n) => n.pos,
            Self::Aliased(n) => n.pos,
            Self::Between(n) => n.pos,
            Self::In(n) => n.pos,
            Self::IsNull(n) => n.pos,
            Self::Like(n) => n.pos,
            Self::Exists(n) => n.pos,
            Self::DataType(n) => n.pos,
            Self::NameTypePair(n) => n.pos,
            Self::ObjectTypeArg(n) => n.pos,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Identifier(_) => "Identifier",
            Self::TableIdentifier(_) => "TableIdentifier",
            Self::Literal(_) => "Literal",
            Self::Asterisk(_) => "Asterisk",
            Self::ColumnsMatcher(_) => "ColumnsMatcher",
            Self::Function(_) => "Function",
            Self::Binary(_) => "BinaryExpr",
            Self::Unary(_) => "UnaryExpr",
            Self::Ternary(_) => "TernaryExpr",
            Self::Subquery(_) => "Subquery",
            Self::With(_) => "WithElement",
            Self::Case(_) => "CaseExpr",
            Self::Cast(_) => "CastExpr",
            Self::Extract(_) => "ExtractExpr",
            Self::Interval(_) => "IntervalExpr",
            Self::ArrayAccess(_) => "ArrayAccess",
            Self::TupleAccess(_) => "TupleAccess",
            Self::Lambda(_) => "Lambda",
            Self::Parameter(_) => "Parameter",
            Self::Aliased(_) => "AliasedExpr",
            Self::Between(_) => "BetweenExpr",
            Self::In(_) => "InExpr",
            Self::IsNull(_) => "IsNullExpr",
            Self::Like(_) => "LikeExpr",
            Self::Exists(_) => "ExistsExpr",
            Self::DataType(_) => "DataType",
            Self::NameTypePair(_) => "NameTypePair",
            Self::ObjectTypeArg(_) => "ObjectTypeArgument",
        }
    }

    /// Attaches an alias per the grammar rule: set directly on nodes that
    /// own an alias slot, wrap everything else in [`AliasedExpr`].
    pub(crate) fn with_alias(self, alias: String) -> Expr {
        match self {
            Expr::Identifier(mut n) => {
                n.alias = Some(alias);
                Expr::Identifier(n)
            }
            Expr::TableIdentifier(mut n) => {
                n.alias = Some(alias);
                Expr::TableIdentifier(n)
            }
            Expr::Function(mut n) => {
                n.alias = Some(alias);
                Expr::Function(n)
            }
            Expr::Subquery(mut n) => {
                n.alias = Some(alias);
                Expr::Subquery(n)
            }
            other => {
                let pos = other.pos();
                Expr::Aliased(AliasedExpr {
                    pos,
                    expr: Box::new(other),
                    alias,
                })
            }
        }
    }

    /// The alias attached to this node, wherever it lives.
    pub fn alias(&self) -> Option<&str> {
        match self {
            Expr::Identifier(n) => n.alias.as_deref(),
            Expr::TableIdentifier(n) => n.alias.as_deref(),
            Expr::Function(n) => n.alias.as_deref(),
            Expr::Subquery(n) => n.alias.as_deref(),
            Expr::Aliased(n) => Some(&n.alias),
            _ => None,
        }
    }
}
