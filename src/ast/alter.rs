// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements the `ALTER TABLE` command variants.

use serde::Serialize;

use crate::ast::ddl::{ColumnDecl, ConstraintDef, IndexDef, ProjectionDef, TtlClause};
use crate::ast::expressions::{Expr, IdentPart, TableIdentifier};
use crate::ast::query::SettingExpr;
use crate::lexer::Pos;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alter {
    pub pos: Pos,
    pub table: TableIdentifier,
    pub on_cluster: Option<String>,
    pub commands: Vec<AlterCommand>,
    pub settings: Option<Vec<SettingExpr>>,
}

/// `PARTITION expr`, `PARTITION ID 'x'` or `PARTITION ALL`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Partition {
    Expr { pos: Pos, expr: Box<Expr> },
    Id { pos: Pos, id: String },
    All { pos: Pos },
}

impl Partition {
    pub fn pos(&self) -> Pos {
        match self {
            Self::Expr { pos, .. } | Self::Id { pos, .. } | Self::All { pos } => *pos,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateAssignment {
    pub pos: Pos,
    pub column: IdentPart,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AlterCommand {
    AddColumn {
        pos: Pos,
        column: ColumnDecl,
        if_not_exists: bool,
        first: bool,
        after: Option<IdentPart>,
    },
    DropColumn {
        pos: Pos,
        name: IdentPart,
        if_exists: bool,
    },
    ModifyColumn {
        pos: Pos,
        column: ColumnDecl,
        if_exists: bool,
        /// `MODIFY COLUMN c REMOVE DEFAULT|TTL|…`.
        remove: Option<String>,
    },
    RenameColumn {
        pos: Pos,
        from: IdentPart,
        to: IdentPart,
        if_exists: bool,
    },
    ClearColumn {
        pos: Pos,
        name: IdentPart,
        if_exists: bool,
        partition: Option<Partition>,
    },
    CommentColumn {
        pos: Pos,
        name: IdentPart,
        comment: String,
        if_exists: bool,
    },
    MaterializeColumn {
        pos: Pos,
        name: IdentPart,
        partition: Option<Partition>,
    },
    AddIndex {
        pos: Pos,
        index: IndexDef,
        if_not_exists: bool,
        first: bool,
        after: Option<IdentPart>,
    },
    DropIndex {
        pos: Pos,
        name: IdentPart,
        if_exists: bool,
    },
    ClearIndex {
        pos: Pos,
        name: IdentPart,
        partition: Option<Partition>,
    },
    MaterializeIndex {
        pos: Pos,
        name: IdentPart,
        partition: Option<Partition>,
    },
    AddConstraint {
        pos: Pos,
        constraint: ConstraintDef,
        if_not_exists: bool,
    },
    DropConstraint {
        pos: Pos,
        name: IdentPart,
        if_exists: bool,
    },
    AddProjection {
        pos: Pos,
        projection: ProjectionDef,
        if_not_exists: bool,
        first: bool,
        after: Option<IdentPart>,
    },
    DropProjection {
        pos: Pos,
        name: IdentPart,
        if_exists: bool,
    },
    ClearProjection {
        pos: Pos,
        name: IdentPart,
        partition: Option<Partition>,
    },
    MaterializeProjection {
        pos: Pos,
        name: IdentPart,
        partition: Option<Partition>,
    },
    AddStatistics {
        pos: Pos,
        columns: Vec<IdentPart>,
        types: Vec<IdentPart>,
        if_not_exists: bool,
    },
    ModifyStatistics {
        pos: Pos,
        columns: Vec<IdentPart>,
        types: Vec<IdentPart>,
    },
    DropStatistics {
        pos: Pos,
        columns: Vec<IdentPart>,
        if_exists: bool,
    },
    ClearStatistics {
        pos: Pos,
        columns: Vec<IdentPart>,
    },
    MaterializeStatistics {
        pos: Pos,
        columns: Vec<IdentPart>,
    },
    DetachPartition {
        pos: Pos,
        partition: Partition,
    },
    AttachPartition {
        pos: Pos,
        partition: Partition,
        from: Option<TableIdentifier>,
    },
    DropPartition {
        pos: Pos,
        partition: Partition,
        detached: bool,
    },
    ReplacePartition {
        pos: Pos,
        partition: Partition,
        from: TableIdentifier,
    },
    FreezePartition {
        pos: Pos,
        partition: Option<Partition>,
        with_name: Option<String>,
    },
    FetchPartition {
        pos: Pos,
        partition: Partition,
        from: String,
    },
    Delete {
        pos: Pos,
        in_partition: Option<Partition>,
        where_clause: Box<Expr>,
    },
    Update {
        pos: Pos,
        assignments: Vec<UpdateAssignment>,
        in_partition: Option<Partition>,
        where_clause: Box<Expr>,
    },
    ModifyTtl {
        pos: Pos,
        ttl: TtlClause,
    },
    RemoveTtl {
        pos: Pos,
    },
    ModifySettings {
        pos: Pos,
        settings: Vec<SettingExpr>,
    },
}

impl AlterCommand {
    pub fn pos(&self) -> Pos {
        match self {
            Self::AddColumn { pos, .. }
            | Self::DropColumn { pos, .. }
            | Self::ModifyColumn { pos, .. }
            | Self::RenameColumn { pos, .. }
            | Self::ClearColumn { pos, .. }
            | Self::CommentColumn { pos, .. }
            | Self::MaterializeColumn { pos, .. }
            | Self::AddIndex { pos, .. }
            | Self::DropIndex { pos, .. }
            | Self::ClearIndex { pos, .. }
            | Self::MaterializeIndex { pos, .. }
            | Self::AddConstraint { pos, .. }
            | Self::DropConstraint { pos, .. }
            | Self::AddProjection { pos, .. }
            | Self::DropProjection { pos, .. }
            | Self::ClearProjection { pos, .. }
            | Self::MaterializeProjection { pos, .. }
            | Self::AddStatistics { pos, .. }
            | Self::ModifyStatistics { pos, .. }
            | Self::DropStatistics { pos, .. }
            | Self::ClearStatistics { pos, .. }
            | Self::MaterializeStatistics { pos, .. }
            | Self::DetachPartition { pos, .. }
            | Self::AttachPartition { pos, .. }
            | Self::DropPartition { pos, .. }
            | Self::ReplacePartition { pos, .. }
            | Self::FreezePartition { pos, .. }
            | Self::FetchPartition { pos, .. }
            | Self::Delete { pos, .. }
            | Self::Update { pos, .. }
            | Self::ModifyTtl { pos, .. }
            | Self::RemoveTtl { pos }
            | Self::ModifySettings { pos, .. } => *pos,
        }
    }

    /// Command name as printed in the tree dump.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddColumn { .. } => "ADD_COLUMN",
            Self::DropColumn { .. } => "DROP_COLUMN",
            Self::ModifyColumn { .. } => "MODIFY_COLUMN",
            Self::RenameColumn { .. } => "RENAME_COLUMN",
            Self::ClearColumn { .. } => "CLEAR_COLUMN",
            Self::CommentColumn { .. } => "COMMENT_COLUMN",
            Self::MaterializeColumn { .. } => "MATERIALIZE_COLUMN",
            Self::AddIndex { .. } => "ADD_INDEX",
            Self::DropIndex { .. } => "DROP_INDEX",
            Self::ClearIndex { .. } => "CLEAR_INDEX",
            Self::MaterializeIndex { .. } => "MATERIALIZE_INDEX",
            Self::AddConstraint { .. } => "ADD_CONSTRAINT",
            Self::DropConstraint { .. } => "DROP_CONSTRAINT",
            Self::AddProjection { .. } => "ADD_PROJECTION",
            Self::DropProjection { .. } => "DROP_PROJECTION",
            Self::ClearProjection { .. } => "CLEAR_PROJECTION",
            Self::MaterializeProjection { .. } => "MATERIALIZE_PROJECTION",
            Self::AddStatistics { .. } => "ADD_STATISTICS",
            Self::ModifyStatistics { .. } => "MODIFY_STATISTICS",
            Self::DropStatistics { .. } => "DROP_STATISTICS",
            Self::ClearStatistics { .. } => "CLEAR_STATISTICS",
            Self::MaterializeStatistics { .. } => "MATERIALIZE_STATISTICS",
            Self::DetachPartition { .. } => "DETACH_PARTITION",
            Self::AttachPartition { .. } => "ATTACH_PARTITION",
            Self::DropPartition { .. } => "DROP_PARTITION",
            Self::ReplacePartition { .. } => "REPLACE_PARTITION",
            Self::FreezePartition { .. } => "FREEZE_PARTITION",
            Self::FetchPartition { .. } => "FETCH_PARTITION",
            Self::Delete { .. } => "DELETE",
            Self::Update { .. } => "UPDATE",
            Self::ModifyTtl { .. } => "MODIFY_TTL",
            Self::RemoveTtl { .. } => "REMOVE_TTL",
            Self::ModifySettings { .. } => "MODIFY_SETTING",
        }
    }
}
