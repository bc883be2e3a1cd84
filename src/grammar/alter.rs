// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements parsing of `ALTER TABLE` and its command list.

use crate::ast::*;
use crate::grammar::{self, ddl, parse_expr, statements};
use crate::lexer::TokenKind;
use crate::parser::Parser;

pub(crate) fn parse_alter(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    p.bump(); // ALTER

    match p.kind() {
        TokenKind::TableKw => {}
        TokenKind::RoleKw => {
            p.bump();
            return statements::parse_access_tail(
                p,
                pos,
                AccessAction::Alter,
                AccessEntity::Role,
                false,
            );
        }
        TokenKind::RowKw if p.peek().kind == TokenKind::PolicyKw => {
            p.bump();
            p.bump();
            return statements::parse_access_tail(
                p,
                pos,
                AccessAction::Alter,
                AccessEntity::RowPolicy,
                false,
            );
        }
        TokenKind::PolicyKw => {
            p.bump();
            return statements::parse_access_tail(
                p,
                pos,
                AccessAction::Alter,
                AccessEntity::RowPolicy,
                false,
            );
        }
        TokenKind::QuotaKw => {
            p.bump();
            return statements::parse_access_tail(
                p,
                pos,
                AccessAction::Alter,
                AccessEntity::Quota,
                false,
            );
        }
        TokenKind::SettingsKw if p.peek().kind == TokenKind::ProfileKw => {
            p.bump();
            p.bump();
            return statements::parse_access_tail(
                p,
                pos,
                AccessAction::Alter,
                AccessEntity::SettingsProfile,
                false,
            );
        }
        TokenKind::ProfileKw => {
            p.bump();
            return statements::parse_access_tail(
                p,
                pos,
                AccessAction::Alter,
                AccessEntity::SettingsProfile,
                false,
            );
        }
        TokenKind::ResourceKw => {
            p.bump();
            return statements::parse_access_tail(
                p,
                pos,
                AccessAction::Alter,
                AccessEntity::Resource,
                false,
            );
        }
        TokenKind::WorkloadKw => {
            p.bump();
            return statements::parse_access_tail(
                p,
                pos,
                AccessAction::Alter,
                AccessEntity::Workload,
                false,
            );
        }
        _ => {
            p.unexpected("ALTER statement");
            return None;
        }
    }

    p.bump(); // TABLE
    let table = grammar::parse_table_identifier(p)?;
    let on_cluster = grammar::parse_on_cluster(p);

    let parenthesized = p.eat(TokenKind::LParen);
    let mut commands = Vec::new();
    loop {
        commands.push(parse_alter_command(p)?);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    if parenthesized {
        p.expect(TokenKind::RParen);
    }

    let settings = if p.eat(TokenKind::SettingsKw) {
        Some(grammar::parse_settings_list(p)?)
    } else {
        None
    };

    Some(Statement::Alter(Alter {
        pos,
        table,
        on_cluster,
        commands,
        settings,
    }))
}

fn parse_alter_command(p: &mut Parser) -> Option<AlterCommand> {
    let pos = p.pos();
    match p.kind() {
        TokenKind::AddKw => {
            p.bump();
            match p.kind() {
                TokenKind::ColumnKw => {
                    p.bump();
                    let if_not_exists = ddl::eat_if_not_exists(p);
                    let column = ddl::parse_column_decl(p)?;
                    let (first, after) = parse_first_after(p)?;
                    Some(AlterCommand::AddColumn {
                        pos,
                        column,
                        if_not_exists,
                        first,
                        after,
                    })
                }
                TokenKind::IndexKw => {
                    let (index, if_not_exists) = ddl::parse_index_def(p)?;
                    let (first, after) = parse_first_after(p)?;
                    Some(AlterCommand::AddIndex {
                        pos,
                        index,
                        if_not_exists,
                        first,
                        after,
                    })
                }
                TokenKind::ConstraintKw => {
                    p.bump();
                    let if_not_exists = ddl::eat_if_not_exists(p);
                    let constraint_pos = p.pos();
                    let name = grammar::parse_ident(p)?;
                    p.expect(TokenKind::CheckKw);
                    let expr = parse_expr(p)?;
                    Some(AlterCommand::AddConstraint {
                        pos,
                        constraint: ConstraintDef {
                            pos: constraint_pos,
                            name,
                            expr: Box::new(expr),
                        },
                        if_not_exists,
                    })
                }
                TokenKind::ProjectionKw => {
                    p.bump();
                    let if_not_exists = ddl::eat_if_not_exists(p);
                    let projection_pos = p.pos();
                    let name = grammar::parse_ident(p)?;
                    p.expect(TokenKind::LParen);
                    let select = crate::grammar::query::parse_select_with_union(p)?;
                    p.expect(TokenKind::RParen);
                    let (first, after) = parse_first_after(p)?;
                    Some(AlterCommand::AddProjection {
                        pos,
                        projection: ProjectionDef {
                            pos: projection_pos,
                            name,
                            select: Box::new(select),
                        },
                        if_not_exists,
                        first,
                        after,
                    })
                }
                TokenKind::StatisticsKw => {
                    p.bump();
                    let if_not_exists = ddl::eat_if_not_exists(p);
                    let columns = parse_ident_list(p)?;
                    let types = if p.eat_word("TYPE") {
                        parse_ident_list(p)?
                    } else {
                        Vec::new()
                    };
                    Some(AlterCommand::AddStatistics {
                        pos,
                        columns,
                        types,
                        if_not_exists,
                    })
                }
                _ => {
                    p.unexpected("ALTER ADD command");
                    None
                }
            }
        }
        TokenKind::DropKw => {
            p.bump();
            match p.kind() {
                TokenKind::ColumnKw => {
                    p.bump();
                    let if_exists = ddl::eat_if_exists(p);
                    let name = grammar::parse_ident(p)?;
                    Some(AlterCommand::DropColumn {
                        pos,
                        name,
                        if_exists,
                    })
                }
                TokenKind::IndexKw => {
                    p.bump();
                    let if_exists = ddl::eat_if_exists(p);
                    let name = grammar::parse_ident(p)?;
                    Some(AlterCommand::DropIndex {
                        pos,
                        name,
                        if_exists,
                    })
                }
                TokenKind::ConstraintKw => {
                    p.bump();
                    let if_exists = ddl::eat_if_exists(p);
                    let name = grammar::parse_ident(p)?;
                    Some(AlterCommand::DropConstraint {
                        pos,
                        name,
                        if_exists,
                    })
                }
                TokenKind::ProjectionKw => {
                    p.bump();
                    let if_exists = ddl::eat_if_exists(p);
                    let name = grammar::parse_ident(p)?;
                    Some(AlterCommand::DropProjection {
                        pos,
                        name,
                        if_exists,
                    })
                }
                TokenKind::StatisticsKw => {
                    p.bump();
                    let if_exists = ddl::eat_if_exists(p);
                    let columns = parse_ident_list(p)?;
                    Some(AlterCommand::DropStatistics {
                        pos,
                        columns,
                        if_exists,
                    })
                }
                TokenKind::PartitionKw => {
                    p.bump();
                    let partition = grammar::parse_partition(p)?;
                    Some(AlterCommand::DropPartition {
                        pos,
                        partition,
                        detached: false,
                    })
                }
                _ if p.at_word("DETACHED") && p.peek().kind == TokenKind::PartitionKw => {
                    p.bump();
                    p.bump();
                    let partition = grammar::parse_partition(p)?;
                    Some(AlterCommand::DropPartition {
                        pos,
                        partition,
                        detached: true,
                    })
                }
                _ => {
                    p.unexpected("ALTER DROP command");
                    None
                }
            }
        }
        TokenKind::ModifyKw => {
            p.bump();
            match p.kind() {
                TokenKind::ColumnKw => {
                    p.bump();
                    let if_exists = ddl::eat_if_exists(p);
                    let column = ddl::parse_column_decl(p)?;
                    let remove = if p.eat(TokenKind::RemoveKw) {
                        Some(p.bump().text.to_uppercase())
                    } else {
                        None
                    };
                    Some(AlterCommand::ModifyColumn {
                        pos,
                        column,
                        if_exists,
                        remove,
                    })
                }
                TokenKind::TtlKw => {
                    let ttl = ddl::parse_ttl_clause(p)?;
                    Some(AlterCommand::ModifyTtl { pos, ttl })
                }
                // The singular spelling is accepted.
                TokenKind::SettingKw | TokenKind::SettingsKw => {
                    p.bump();
                    let settings = grammar::parse_settings_list(p)?;
                    Some(AlterCommand::ModifySettings { pos, settings })
                }
                TokenKind::StatisticsKw => {
                    p.bump();
                    let columns = parse_ident_list(p)?;
                    let types = if p.eat_word("TYPE") {
                        parse_ident_list(p)?
                    } else {
                        Vec::new()
                    };
                    Some(AlterCommand::ModifyStatistics {
                        pos,
                        columns,
                        types,
                    })
                }
                _ => {
                    p.unexpected("ALTER MODIFY command");
                    None
                }
            }
        }
        TokenKind::RenameKw => {
            p.bump();
            p.expect(TokenKind::ColumnKw);
            let if_exists = ddl::eat_if_exists(p);
            let from = grammar::parse_ident(p)?;
            p.expect(TokenKind::ToKw);
            let to = grammar::parse_ident(p)?;
            Some(AlterCommand::RenameColumn {
                pos,
                from,
                to,
                if_exists,
            })
        }
        TokenKind::ClearKw => {
            p.bump();
            match p.kind() {
                TokenKind::ColumnKw => {
                    p.bump();
                    let if_exists = ddl::eat_if_exists(p);
                    let name = grammar::parse_ident(p)?;
                    let partition = parse_in_partition(p)?;
                    Some(AlterCommand::ClearColumn {
                        pos,
                        name,
                        if_exists,
                        partition,
                    })
                }
                TokenKind::IndexKw => {
                    p.bump();
                    let name = grammar::parse_ident(p)?;
                    let partition = parse_in_partition(p)?;
                    Some(AlterCommand::ClearIndex {
                        pos,
                        name,
                        partition,
                    })
                }
                TokenKind::ProjectionKw => {
                    p.bump();
                    let name = grammar::parse_ident(p)?;
                    let partition = parse_in_partition(p)?;
                    Some(AlterCommand::ClearProjection {
                        pos,
                        name,
                        partition,
                    })
                }
                TokenKind::StatisticsKw => {
                    p.bump();
                    let columns = parse_ident_list(p)?;
                    Some(AlterCommand::ClearStatistics { pos, columns })
                }
                _ => {
                    p.unexpected("ALTER CLEAR command");
                    None
                }
            }
        }
        TokenKind::MaterializeKw => {
            p.bump();
            match p.kind() {
                TokenKind::ColumnKw => {
                    p.bump();
                    let name = grammar::parse_ident(p)?;
                    let partition = parse_in_partition(p)?;
                    Some(AlterCommand::MaterializeColumn {
                        pos,
                        name,
                        partition,
                    })
                }
                TokenKind::IndexKw => {
                    p.bump();
                    let name = grammar::parse_ident(p)?;
                    let partition = parse_in_partition(p)?;
                    Some(AlterCommand::MaterializeIndex {
                        pos,
                        name,
                        partition,
                    })
                }
                TokenKind::ProjectionKw => {
                    p.bump();
                    let name = grammar::parse_ident(p)?;
                    let partition = parse_in_partition(p)?;
                    Some(AlterCommand::MaterializeProjection {
                        pos,
                        name,
                        partition,
                    })
                }
                TokenKind::StatisticsKw => {
                    p.bump();
                    let columns = parse_ident_list(p)?;
                    Some(AlterCommand::MaterializeStatistics { pos, columns })
                }
                _ => {
                    p.unexpected("ALTER MATERIALIZE command");
                    None
                }
            }
        }
        TokenKind::CommentKw => {
            p.bump();
            p.expect(TokenKind::ColumnKw);
            let if_exists = ddl::eat_if_exists(p);
            let name = grammar::parse_ident(p)?;
            let comment = grammar::parse_string_literal(p)?;
            Some(AlterCommand::CommentColumn {
                pos,
                name,
                comment,
                if_exists,
            })
        }
        TokenKind::DetachKw => {
            p.bump();
            p.expect(TokenKind::PartitionKw);
            let partition = grammar::parse_partition(p)?;
            Some(AlterCommand::DetachPartition { pos, partition })
        }
        TokenKind::AttachKw => {
            p.bump();
            p.expect(TokenKind::PartitionKw);
            let partition = grammar::parse_partition(p)?;
            let from = if p.eat(TokenKind::FromKw) {
                Some(grammar::parse_table_identifier(p)?)
            } else {
                None
            };
            Some(AlterCommand::AttachPartition {
                pos,
                partition,
                from,
            })
        }
        TokenKind::ReplaceKw => {
            p.bump();
            p.expect(TokenKind::PartitionKw);
            let partition = grammar::parse_partition(p)?;
            p.expect(TokenKind::FromKw);
            let from = grammar::parse_table_identifier(p)?;
            Some(AlterCommand::ReplacePartition {
                pos,
                partition,
                from,
            })
        }
        TokenKind::FreezeKw => {
            p.bump();
            let partition = if p.eat(TokenKind::PartitionKw) {
                Some(grammar::parse_partition(p)?)
            } else {
                None
            };
            let with_name = if p.at(TokenKind::WithKw) && p.peek_word("NAME") {
                p.bump();
                p.bump();
                Some(grammar::parse_string_literal(p)?)
            } else {
                None
            };
            Some(AlterCommand::FreezePartition {
                pos,
                partition,
                with_name,
            })
        }
        TokenKind::FetchKw => {
            p.bump();
            p.expect(TokenKind::PartitionKw);
            let partition = grammar::parse_partition(p)?;
            p.expect(TokenKind::FromKw);
            let from = grammar::parse_string_literal(p)?;
            Some(AlterCommand::FetchPartition {
                pos,
                partition,
                from,
            })
        }
        TokenKind::DeleteKw => {
            p.bump();
            let in_partition = parse_in_partition(p)?;
            p.expect(TokenKind::WhereKw);
            let where_clause = parse_expr(p)?;
            Some(AlterCommand::Delete {
                pos,
                in_partition,
                where_clause: Box::new(where_clause),
            })
        }
        TokenKind::UpdateKw => {
            p.bump();
            let mut assignments = Vec::new();
            loop {
                let assignment_pos = p.pos();
                let column = grammar::parse_ident(p)?;
                p.expect(TokenKind::Eq);
                let value = parse_expr(p)?;
                assignments.push(UpdateAssignment {
                    pos: assignment_pos,
                    column,
                    value,
                });
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
            let in_partition = parse_in_partition(p)?;
            p.expect(TokenKind::WhereKw);
            let where_clause = parse_expr(p)?;
            Some(AlterCommand::Update {
                pos,
                assignments,
                in_partition,
                where_clause: Box::new(where_clause),
            })
        }
        TokenKind::RemoveKw => {
            p.bump();
            p.expect(TokenKind::TtlKw);
            Some(AlterCommand::RemoveTtl { pos })
        }
        _ => {
            p.unexpected("ALTER command");
            None
        }
    }
}

fn parse_first_after(p: &mut Parser) -> Option<(bool, Option<IdentPart>)> {
    if p.eat(TokenKind::FirstKw) {
        return Some((true, None));
    }
    if p.eat(TokenKind::AfterKw) {
        let after = grammar::parse_ident(p)?;
        return Some((false, Some(after)));
    }
    Some((false, None))
}

fn parse_in_partition(p: &mut Parser) -> Option<Option<Partition>> {
    if p.at(TokenKind::InKw) && p.peek().kind == TokenKind::PartitionKw {
        p.bump();
        p.bump();
        Some(Some(grammar::parse_partition(p)?))
    } else {
        Some(None)
    }
}

fn parse_ident_list(p: &mut Parser) -> Option<Vec<IdentPart>> {
    let mut idents = vec![grammar::parse_ident(p)?];
    while p.eat(TokenKind::Comma) {
        idents.push(grammar::parse_ident(p)?);
    }
    Some(idents)
}
