// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements the remaining statement kinds: DML, administrative and
//! access-control statements.

use serde::Serialize;

use crate::ast::alter::Partition;
use crate::ast::expressions::{Expr, Identifier, IdentPart, TableIdentifier};
use crate::ast::query::SettingExpr;
use crate::ast::Statement;
use crate::lexer::Pos;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InsertColumns {
    /// `INSERT INTO t (*)`.
    Star,
    List(Vec<Identifier>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Infile {
    pub pos: Pos,
    pub path: String,
    pub compression: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InsertSource {
    Values { pos: Pos, rows: Vec<Vec<Expr>> },
    Select(Box<Statement>),
    /// Inline data after `FORMAT <name>` is discarded to `;`/EOF.
    Format { pos: Pos, name: IdentPart },
    /// `FROM INFILE` without an inline source.
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insert {
    pub pos: Pos,
    pub table: Option<TableIdentifier>,
    /// `INSERT INTO FUNCTION fn(…)`, kept apart from the table pair.
    pub function: Option<Box<Expr>>,
    pub columns: Option<InsertColumns>,
    pub partition_by: Option<Box<Expr>>,
    pub settings: Option<Vec<SettingExpr>>,
    pub infile: Option<Infile>,
    pub source: InsertSource,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum DropTarget {
    Table,
    Database,
    View,
    Dictionary,
    Function,
    User,
    NamedCollection,
    Index,
}

impl DropTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::Database => "DATABASE",
            Self::View => "VIEW",
            Self::Dictionary => "DICTIONARY",
            Self::Function => "FUNCTION",
            Self::User => "USER",
            Self::NamedCollection => "NAMED COLLECTION",
            Self::Index => "INDEX",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drop {
    pub pos: Pos,
    pub target: DropTarget,
    pub if_exists: bool,
    pub temporary: bool,
    pub names: Vec<TableIdentifier>,
    pub on_cluster: Option<String>,
    pub sync: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Truncate {
    pub pos: Pos,
    pub database: bool,
    /// `TRUNCATE ALL TABLES FROM db`.
    pub all_tables: bool,
    pub if_exists: bool,
    pub target: Option<TableIdentifier>,
    pub on_cluster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Use {
    pub pos: Pos,
    pub database: IdentPart,
}

/// `DESCRIBE` keeps a table function apart from the database/table pair;
/// both shapes are preserved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Describe {
    pub pos: Pos,
    pub table: Option<TableIdentifier>,
    pub function: Option<Box<Expr>>,
    pub format: Option<IdentPart>,
    pub settings: Option<Vec<SettingExpr>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ShowType {
    Databases,
    Tables,
    Dictionaries,
    ProcessList,
    Clusters,
    Cluster(String),
    Settings,
    Engines,
    Functions,
    Users,
    Roles,
    Quotas,
    Policies,
    Profiles,
    CreateTable,
    CreateDatabase,
    CreateView,
    CreateDictionary,
}

impl ShowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Databases => "DATABASES",
            Self::Tables => "TABLES",
            Self::Dictionaries => "DICTIONARIES",
            Self::ProcessList => "PROCESSLIST",
            Self::Clusters => "CLUSTERS",
            Self::Cluster(_) => "CLUSTER",
            Self::Settings => "SETTINGS",
            Self::Engines => "ENGINES",
            Self::Functions => "FUNCTIONS",
            Self::Users => "USERS",
            Self::Roles => "ROLES",
            Self::Quotas => "QUOTAS",
            Self::Policies => "POLICIES",
            Self::Profiles => "PROFILES",
            Self::CreateTable => "CREATE TABLE",
            Self::CreateDatabase => "CREATE DATABASE",
            Self::CreateView => "CREATE VIEW",
            Self::CreateDictionary => "CREATE DICTIONARY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowLike {
    pub negated: bool,
    pub case_insensitive: bool,
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Show {
    pub pos: Pos,
    pub ty: ShowType,
    pub temporary: bool,
    pub full: bool,
    pub changed: bool,
    pub target: Option<TableIdentifier>,
    pub from: Option<IdentPart>,
    pub like: Option<ShowLike>,
    pub where_clause: Option<Box<Expr>>,
    pub limit: Option<Box<Expr>>,
    pub format: Option<IdentPart>,
    pub settings: Option<Vec<SettingExpr>>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum ShowAccessKind {
    Privileges,
    Grants,
    CreateUser,
    CreateRole,
    CreateRowPolicy,
    CreateQuota,
    CreateSettingsProfile,
}

impl ShowAccessKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Privileges => "PRIVILEGES",
            Self::Grants => "GRANTS",
            Self::CreateUser => "CREATE USER",
            Self::CreateRole => "CREATE ROLE",
            Self::CreateRowPolicy => "CREATE ROW POLICY",
            Self::CreateQuota => "CREATE QUOTA",
            Self::CreateSettingsProfile => "CREATE SETTINGS PROFILE",
        }
    }
}

/// First-class `SHOW` statements of the access-control family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowAccess {
    pub pos: Pos,
    pub kind: ShowAccessKind,
    pub names: Vec<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum ExplainKind {
    Ast,
    Syntax,
    Plan,
    Pipeline,
    Estimate,
    QueryTree,
    CurrentTransaction,
}

impl ExplainKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ast => "AST",
            Self::Syntax => "SYNTAX",
            Self::Plan => "PLAN",
            Self::Pipeline => "PIPELINE",
            Self::Estimate => "ESTIMATE",
            Self::QueryTree => "QUERY TREE",
            Self::CurrentTransaction => "CURRENT TRANSACTION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explain {
    pub pos: Pos,
    pub kind: ExplainKind,
    /// `name = value` pairs before the explained statement, pre-rendered.
    pub options: Option<String>,
    /// Absent for `EXPLAIN CURRENT TRANSACTION`.
    pub statement: Option<Box<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Set {
    pub pos: Pos,
    pub settings: Vec<SettingExpr>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum SetRoleKind {
    Default,
    None,
    All,
    Roles,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetRole {
    pub pos: Pos,
    pub kind: SetRoleKind,
    pub roles: Vec<IdentPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Optimize {
    pub pos: Pos,
    pub table: TableIdentifier,
    pub on_cluster: Option<String>,
    pub partition: Option<Partition>,
    pub final_modifier: bool,
    pub deduplicate: bool,
    pub deduplicate_by: Option<Vec<Expr>>,
}

/// The command is a multi-word phrase from a closed whitelist, joined with
/// single spaces and upper-cased.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct System {
    pub pos: Pos,
    pub command: String,
    pub target: Option<TableIdentifier>,
    pub on_cluster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenamePair {
    pub from: TableIdentifier,
    pub to: TableIdentifier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rename {
    pub pos: Pos,
    pub database: bool,
    pub dictionary: bool,
    pub pairs: Vec<RenamePair>,
    pub on_cluster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exchange {
    pub pos: Pos,
    pub dictionaries: bool,
    pub left: TableIdentifier,
    pub right: TableIdentifier,
    pub on_cluster: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum ObjectKind {
    Table,
    Database,
    View,
    Dictionary,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::Database => "DATABASE",
            Self::View => "VIEW",
            Self::Dictionary => "DICTIONARY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exists {
    pub pos: Pos,
    pub kind: ObjectKind,
    pub temporary: bool,
    pub target: TableIdentifier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detach {
    pub pos: Pos,
    pub kind: ObjectKind,
    pub if_exists: bool,
    pub target: TableIdentifier,
    pub permanently: bool,
    pub sync: bool,
    pub on_cluster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attach {
    pub pos: Pos,
    pub kind: ObjectKind,
    pub if_not_exists: bool,
    pub target: TableIdentifier,
    pub on_cluster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Check {
    pub pos: Pos,
    pub table: TableIdentifier,
    pub partition: Option<Partition>,
}

/// The privilege list is recorded as written; resolution is out of scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grant {
    pub pos: Pos,
    pub current_grants: bool,
    pub privileges: Vec<String>,
    pub on: Option<String>,
    pub grantees: Vec<IdentPart>,
    pub with_grant_option: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum TransactionKind {
    Begin,
    Commit,
    Rollback,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Begin => "BEGIN",
            Self::Commit => "COMMIT",
            Self::Rollback => "ROLLBACK",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub pos: Pos,
    pub kind: TransactionKind,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum AccessAction {
    Create,
    Alter,
    Drop,
}

impl AccessAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Alter => "ALTER",
            Self::Drop => "DROP",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum AccessEntity {
    Role,
    RowPolicy,
    Quota,
    SettingsProfile,
    Resource,
    Workload,
}

impl AccessEntity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Role => "ROLE",
            Self::RowPolicy => "ROW POLICY",
            Self::Quota => "QUOTA",
            Self::SettingsProfile => "SETTINGS PROFILE",
            Self::Resource => "RESOURCE",
            Self::Workload => "WORKLOAD",
        }
    }
}

/// Shallow shell for the access-control statements: only the naming
/// payload is recorded, the body is skipped to `;`/EOF/`FORMAT`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessControl {
    pub pos: Pos,
    pub action: AccessAction,
    pub entity: AccessEntity,
    pub names: Vec<String>,
    pub if_exists: bool,
    pub if_not_exists: bool,
    pub or_replace: bool,
}
