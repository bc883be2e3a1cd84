// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements the administrative statements: DROP, SHOW, SYSTEM, EXPLAIN,
//! SET and the remaining single-purpose kinds, plus the shallow
//! access-control shells.

use crate::ast::*;
use crate::grammar::{self, ddl, expressions, parse_expr, query};
use crate::lexer::TokenKind;
use crate::parser::Parser;

/// The closed whitelist of words allowed inside the multi-word `SYSTEM`
/// command phrase.
static SYSTEM_COMMAND_WORDS: &[&str] = &[
    "CACHE",
    "COMPILED",
    "CONFIG",
    "DATABASE",
    "DICTIONARIES",
    "DICTIONARY",
    "DISABLE",
    "DISTRIBUTED",
    "DNS",
    "DROP",
    "ENABLE",
    "EXPRESSION",
    "FAILPOINT",
    "FETCHES",
    "FILESYSTEM",
    "FLUSH",
    "FOR",
    "JEMALLOC",
    "LOGS",
    "MARK",
    "MERGES",
    "MOVES",
    "MUTATIONS",
    "PAGE",
    "PREWARM",
    "PULLING",
    "QUERY",
    "QUEUES",
    "RELOAD",
    "REPLICA",
    "REPLICAS",
    "REPLICATED",
    "REPLICATION",
    "RESET",
    "RESTART",
    "SENDS",
    "SHUTDOWN",
    "START",
    "STOP",
    "SYNC",
    "TTL",
    "UNCOMPRESSED",
    "UNFREEZE",
    "WAIT",
];

fn is_system_command_word(word: &str) -> bool {
    SYSTEM_COMMAND_WORDS.contains(&word)
}

/// Skips everything up to the next statement boundary; used by the
/// shallowly-parsed statements. A trailing `FORMAT <name>` is consumed
/// and discarded.
pub(crate) fn skip_to_statement_end(p: &mut Parser) {
    while !p.at(TokenKind::SemiColon) && !p.at(TokenKind::FormatKw) && !p.at_end() {
        p.bump();
    }
    if p.eat(TokenKind::FormatKw) && p.kind().is_name() {
        p.bump();
    }
}

/// Common tail of the six access-control statement kinds: optional
/// existence flags and the name list are recorded, the rest of the body is
/// skipped. The entity keywords are already consumed.
pub(crate) fn parse_access_tail(
    p: &mut Parser,
    pos: Pos,
    action: AccessAction,
    entity: AccessEntity,
    or_replace: bool,
) -> Option<Statement> {
    let if_exists = ddl::eat_if_exists(p);
    let if_not_exists = if if_exists {
        false
    } else {
        ddl::eat_if_not_exists(p)
    };

    let mut names = Vec::new();
    if p.kind().is_name() {
        loop {
            names.push(grammar::parse_ident(p)?.name);
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
    }
    skip_to_statement_end(p);

    Some(Statement::AccessControl(AccessControl {
        pos,
        action,
        entity,
        names,
        if_exists,
        if_not_exists,
        or_replace,
    }))
}

pub(crate) fn parse_drop(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    p.bump(); // DROP
    let temporary = p.eat(TokenKind::TemporaryKw);

    let target = match p.kind() {
        TokenKind::TableKw => {
            p.bump();
            DropTarget::Table
        }
        TokenKind::DatabaseKw => {
            p.bump();
            DropTarget::Database
        }
        TokenKind::ViewKw => {
            p.bump();
            DropTarget::View
        }
        TokenKind::DictionaryKw => {
            p.bump();
            DropTarget::Dictionary
        }
        TokenKind::FunctionKw => {
            p.bump();
            DropTarget::Function
        }
        TokenKind::UserKw => {
            p.bump();
            DropTarget::User
        }
        TokenKind::IndexKw => {
            p.bump();
            DropTarget::Index
        }
        TokenKind::NamedKw if p.peek().kind == TokenKind::CollectionKw => {
            p.bump();
            p.bump();
            DropTarget::NamedCollection
        }
        TokenKind::RoleKw => {
            p.bump();
            return parse_access_tail(p, pos, AccessAction::Drop, AccessEntity::Role, false);
        }
        TokenKind::RowKw if p.peek().kind == TokenKind::PolicyKw => {
            p.bump();
            p.bump();
            return parse_access_tail(p, pos, AccessAction::Drop, AccessEntity::RowPolicy, false);
        }
        TokenKind::PolicyKw => {
            p.bump();
            return parse_access_tail(p, pos, AccessAction::Drop, AccessEntity::RowPolicy, false);
        }
        TokenKind::QuotaKw => {
            p.bump();
            return parse_access_tail(p, pos, AccessAction::Drop, AccessEntity::Quota, false);
        }
        TokenKind::SettingsKw if p.peek().kind == TokenKind::ProfileKw => {
            p.bump();
            p.bump();
            return parse_access_tail(
                p,
                pos,
                AccessAction::Drop,
                AccessEntity::SettingsProfile,
                false,
            );
        }
        TokenKind::ProfileKw => {
            p.bump();
            return parse_access_tail(
                p,
                pos,
                AccessAction::Drop,
                AccessEntity::SettingsProfile,
                false,
            );
        }
        TokenKind::ResourceKw => {
            p.bump();
            return parse_access_tail(p, pos, AccessAction::Drop, AccessEntity::Resource, false);
        }
        TokenKind::WorkloadKw => {
            p.bump();
            return parse_access_tail(p, pos, AccessAction::Drop, AccessEntity::Workload, false);
        }
        _ => {
            p.unexpected("DROP statement");
            return None;
        }
    };

    let if_exists = ddl::eat_if_exists(p);
    let mut names = Vec::new();
    loop {
        names.push(grammar::parse_table_identifier(p)?);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    if target == DropTarget::Index && p.eat(TokenKind::OnKw) {
        // The indexed table is not represented in the tree dump.
        let _ = grammar::parse_table_identifier(p);
    }
    let on_cluster = grammar::parse_on_cluster(p);
    let sync = p.eat(TokenKind::SyncKw);

    Some(Statement::Drop(Drop {
        pos,
        target,
        if_exists,
        temporary,
        names,
        on_cluster,
        sync,
    }))
}

pub(crate) fn parse_truncate(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    p.bump(); // TRUNCATE
    p.eat(TokenKind::TemporaryKw);

    let mut database = false;
    let mut all_tables = false;
    if p.eat(TokenKind::DatabaseKw) {
        database = true;
    } else if p.at(TokenKind::AllKw) && p.peek().kind == TokenKind::TablesKw {
        p.bump();
        p.bump();
        p.expect(TokenKind::FromKw);
        all_tables = true;
    } else {
        p.eat(TokenKind::TableKw);
    }

    let if_exists = ddl::eat_if_exists(p);
    let target = Some(grammar::parse_table_identifier(p)?);
    let on_cluster = grammar::parse_on_cluster(p);

    Some(Statement::Truncate(Truncate {
        pos,
        database,
        all_tables,
        if_exists,
        target,
        on_cluster,
    }))
}

pub(crate) fn parse_use(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    p.bump();
    let database = grammar::parse_ident(p)?;
    Some(Statement::Use(Use { pos, database }))
}

pub(crate) fn parse_describe(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    p.bump(); // DESCRIBE | DESC
    p.eat(TokenKind::TableKw);

    let id_pos = p.pos();
    let id = grammar::parse_identifier(p)?;

    let mut table = None;
    let mut function = None;
    if p.at(TokenKind::LParen) {
        function = Some(Box::new(expressions::parse_call_body(
            p,
            id_pos,
            id.name(),
            None,
        )?));
    } else {
        let mut parts = id.parts.into_iter();
        let first = parts.next().expect("identifier parts are non-empty");
        table = Some(match parts.next() {
            Some(name) => TableIdentifier {
                pos: id_pos,
                database: Some(first),
                table: name,
                alias: None,
            },
            None => TableIdentifier {
                pos: id_pos,
                database: None,
                table: first,
                alias: None,
            },
        });
    }

    let format = if p.eat(TokenKind::FormatKw) {
        Some(grammar::parse_ident(p)?)
    } else {
        None
    };
    let settings = if p.eat(TokenKind::SettingsKw) {
        Some(grammar::parse_settings_list(p)?)
    } else {
        None
    };

    Some(Statement::Describe(Describe {
        pos,
        table,
        function,
        format,
        settings,
    }))
}

pub(crate) fn parse_show(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    p.bump(); // SHOW

    if p.at(TokenKind::PrivilegesKw) {
        p.bump();
        return Some(Statement::ShowAccess(ShowAccess {
            pos,
            kind: ShowAccessKind::Privileges,
            names: Vec::new(),
        }));
    }
    if p.at(TokenKind::GrantsKw) {
        p.bump();
        let mut names = Vec::new();
        if p.eat(TokenKind::ForKw) {
            loop {
                names.push(grammar::parse_ident(p)?.name);
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        return Some(Statement::ShowAccess(ShowAccess {
            pos,
            kind: ShowAccessKind::Grants,
            names,
        }));
    }

    if p.at(TokenKind::CreateKw) {
        match p.peek().kind {
            TokenKind::QuotaKw => {
                p.bump();
                p.bump();
                return parse_show_access_names(p, pos, ShowAccessKind::CreateQuota);
            }
            TokenKind::RoleKw => {
                p.bump();
                p.bump();
                return parse_show_access_names(p, pos, ShowAccessKind::CreateRole);
            }
            TokenKind::RowKw => {
                p.bump();
                p.bump();
                p.expect(TokenKind::PolicyKw);
                return parse_show_access_names(p, pos, ShowAccessKind::CreateRowPolicy);
            }
            TokenKind::PolicyKw => {
                p.bump();
                p.bump();
                return parse_show_access_names(p, pos, ShowAccessKind::CreateRowPolicy);
            }
            TokenKind::SettingsKw => {
                p.bump();
                p.bump();
                p.expect(TokenKind::ProfileKw);
                return parse_show_access_names(p, pos, ShowAccessKind::CreateSettingsProfile);
            }
            TokenKind::ProfileKw => {
                p.bump();
                p.bump();
                return parse_show_access_names(p, pos, ShowAccessKind::CreateSettingsProfile);
            }
            TokenKind::UserKw => {
                p.bump();
                p.bump();
                return parse_show_access_names(p, pos, ShowAccessKind::CreateUser);
            }
            _ => {
                p.bump(); // CREATE
                let ty = match p.kind() {
                    TokenKind::TableKw => {
                        p.bump();
                        ShowType::CreateTable
                    }
                    TokenKind::DatabaseKw => {
                        p.bump();
                        ShowType::CreateDatabase
                    }
                    TokenKind::ViewKw => {
                        p.bump();
                        ShowType::CreateView
                    }
                    TokenKind::DictionaryKw => {
                        p.bump();
                        ShowType::CreateDictionary
                    }
                    _ => ShowType::CreateTable,
                };
                let target = Some(grammar::parse_table_identifier(p)?);
                return parse_show_tail(p, pos, ty, false, false, false, target);
            }
        }
    }

    let temporary = p.eat(TokenKind::TemporaryKw);
    let full = p.eat_word("FULL");
    let changed = p.eat_word("CHANGED");

    let ty = match p.kind() {
        TokenKind::DatabasesKw => {
            p.bump();
            ShowType::Databases
        }
        TokenKind::TablesKw => {
            p.bump();
            ShowType::Tables
        }
        TokenKind::DictionariesKw => {
            p.bump();
            ShowType::Dictionaries
        }
        TokenKind::SettingsKw => {
            p.bump();
            ShowType::Settings
        }
        _ if p.at_word("PROCESSLIST") => {
            p.bump();
            ShowType::ProcessList
        }
        _ if p.at_word("CLUSTERS") => {
            p.bump();
            ShowType::Clusters
        }
        TokenKind::ClusterKw => {
            p.bump();
            let name = if p.at(TokenKind::String) {
                grammar::parse_string_literal(p)?
            } else {
                grammar::parse_ident(p)?.name
            };
            ShowType::Cluster(name)
        }
        _ if p.at_word("ENGINES") => {
            p.bump();
            ShowType::Engines
        }
        _ if p.at_word("FUNCTIONS") => {
            p.bump();
            ShowType::Functions
        }
        _ if p.at_word("USERS") => {
            p.bump();
            ShowType::Users
        }
        _ if p.at_word("ROLES") => {
            p.bump();
            ShowType::Roles
        }
        _ if p.at_word("QUOTAS") => {
            p.bump();
            ShowType::Quotas
        }
        _ if p.at_word("POLICIES") => {
            p.bump();
            ShowType::Policies
        }
        _ if p.at_word("PROFILES") => {
            p.bump();
            ShowType::Profiles
        }
        _ => {
            p.unexpected("SHOW statement");
            return None;
        }
    };

    parse_show_tail(p, pos, ty, temporary, full, changed, None)
}

fn parse_show_access_names(
    p: &mut Parser,
    pos: Pos,
    kind: ShowAccessKind,
) -> Option<Statement> {
    let mut names = Vec::new();
    while p.kind().is_name() {
        names.push(grammar::parse_ident(p)?.name);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    Some(Statement::ShowAccess(ShowAccess { pos, kind, names }))
}

fn parse_show_tail(
    p: &mut Parser,
    pos: Pos,
    ty: ShowType,
    temporary: bool,
    full: bool,
    changed: bool,
    target: Option<TableIdentifier>,
) -> Option<Statement> {
    let from = if p.eat(TokenKind::FromKw) || p.eat(TokenKind::InKw) {
        Some(grammar::parse_ident(p)?)
    } else {
        None
    };

    let like = {
        let negated = if p.at(TokenKind::NotKw)
            && matches!(p.peek().kind, TokenKind::LikeKw | TokenKind::IlikeKw)
        {
            p.bump();
            true
        } else {
            false
        };
        if p.at(TokenKind::LikeKw) || p.at(TokenKind::IlikeKw) {
            let case_insensitive = p.at(TokenKind::IlikeKw);
            p.bump();
            let pattern = grammar::parse_string_literal(p)?;
            Some(ShowLike {
                negated,
                case_insensitive,
                pattern,
            })
        } else {
            None
        }
    };

    let where_clause = if p.eat(TokenKind::WhereKw) {
        Some(Box::new(parse_expr(p)?))
    } else {
        None
    };
    let limit = if p.eat(TokenKind::LimitKw) {
        Some(Box::new(parse_expr(p)?))
    } else {
        None
    };
    let format = if p.eat(TokenKind::FormatKw) {
        Some(grammar::parse_ident(p)?)
    } else {
        None
    };
    let settings = if p.eat(TokenKind::SettingsKw) {
        Some(grammar::parse_settings_list(p)?)
    } else {
        None
    };

    Some(Statement::Show(Show {
        pos,
        ty,
        temporary,
        full,
        changed,
        target,
        from,
        like,
        where_clause,
        limit,
        format,
        settings,
    }))
}

pub(crate) fn parse_explain(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    p.bump(); // EXPLAIN

    let kind = if p.eat_word("AST") {
        ExplainKind::Ast
    } else if p.eat_word("SYNTAX") {
        ExplainKind::Syntax
    } else if p.eat_word("PLAN") {
        ExplainKind::Plan
    } else if p.eat_word("PIPELINE") {
        ExplainKind::Pipeline
    } else if p.eat_word("ESTIMATE") {
        ExplainKind::Estimate
    } else if p.at_word("QUERY") && p.peek_word("TREE") {
        p.bump();
        p.bump();
        ExplainKind::QueryTree
    } else if p.at(TokenKind::CurrentKw) && p.peek().kind == TokenKind::TransactionKw {
        p.bump();
        p.bump();
        return Some(Statement::Explain(Explain {
            pos,
            kind: ExplainKind::CurrentTransaction,
            options: None,
            statement: None,
        }));
    } else {
        ExplainKind::Plan
    };

    // `name = value` option pairs before the explained statement.
    let mut options = Vec::new();
    while p.at(TokenKind::Ident) && p.peek().kind == TokenKind::Eq {
        let name = p.bump().text.to_owned();
        p.bump(); // =
        let value = p.bump().text.to_owned();
        options.push(format!("{name} = {value}"));
        p.eat(TokenKind::Comma);
    }
    let options = if options.is_empty() {
        None
    } else {
        Some(options.join(", "))
    };

    let statement = grammar::parse_statement(p)?;
    Some(Statement::Explain(Explain {
        pos,
        kind,
        options,
        statement: Some(Box::new(statement)),
    }))
}

pub(crate) fn parse_set(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    p.bump(); // SET

    if p.at(TokenKind::RoleKw) || (p.at(TokenKind::DefaultKw) && p.peek().kind == TokenKind::RoleKw)
    {
        let default_spelling = p.eat(TokenKind::DefaultKw);
        p.bump(); // ROLE

        if !default_spelling {
            if p.eat(TokenKind::DefaultKw) {
                return Some(Statement::SetRole(SetRole {
                    pos,
                    kind: SetRoleKind::Default,
                    roles: Vec::new(),
                }));
            }
            if p.eat_word("NONE") {
                return Some(Statement::SetRole(SetRole {
                    pos,
                    kind: SetRoleKind::None,
                    roles: Vec::new(),
                }));
            }
            if p.eat(TokenKind::AllKw) {
                return Some(Statement::SetRole(SetRole {
                    pos,
                    kind: SetRoleKind::All,
                    roles: Vec::new(),
                }));
            }
        }

        let mut roles = Vec::new();
        loop {
            roles.push(grammar::parse_ident(p)?);
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
        // `SET DEFAULT ROLE r TO user` - the grantee list is not part of
        // the tree dump.
        if p.eat(TokenKind::ToKw) {
            while p.kind().is_name() {
                p.bump();
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        let kind = if default_spelling {
            SetRoleKind::Default
        } else {
            SetRoleKind::Roles
        };
        return Some(Statement::SetRole(SetRole { pos, kind, roles }));
    }

    let settings = grammar::parse_settings_list(p)?;
    Some(Statement::Set(Set { pos, settings }))
}

pub(crate) fn parse_optimize(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    p.bump(); // OPTIMIZE
    p.expect(TokenKind::TableKw);
    let table = grammar::parse_table_identifier(p)?;
    let on_cluster = grammar::parse_on_cluster(p);

    let partition = if p.eat(TokenKind::PartitionKw) {
        Some(grammar::parse_partition(p)?)
    } else {
        None
    };
    let final_modifier = p.eat(TokenKind::FinalKw);
    let deduplicate = p.eat(TokenKind::DeduplicateKw);
    let deduplicate_by = if deduplicate && p.eat(TokenKind::ByKw) {
        Some(query::parse_expr_list(p)?)
    } else {
        None
    };

    Some(Statement::Optimize(Optimize {
        pos,
        table,
        on_cluster,
        partition,
        final_modifier,
        deduplicate,
        deduplicate_by,
    }))
}

pub(crate) fn parse_system(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    p.bump(); // SYSTEM

    let mut words: Vec<String> = Vec::new();
    loop {
        if !(p.at(TokenKind::Ident) || p.kind().is_keyword()) {
            break;
        }
        let word = p.current().text.to_uppercase();
        let after_name_word = matches!(words.last(), Some(w) if w == "FAILPOINT" || w == "FOR");

        if !is_system_command_word(&word) && !after_name_word {
            // Not a phrase word: this token introduces the target.
            break;
        }
        if p.peek().kind == TokenKind::Dot {
            // A qualified name is always the target, whatever the word.
            break;
        }
        p.bump();
        words.push(word);
    }

    if words.is_empty() {
        p.unexpected("SYSTEM command");
        return None;
    }

    let on_cluster = grammar::parse_on_cluster(p);
    let target = if p.kind().is_name() {
        Some(grammar::parse_table_identifier(p)?)
    } else {
        None
    };

    Some(Statement::System(System {
        pos,
        command: words.join(" "),
        target,
        on_cluster,
    }))
}

pub(crate) fn parse_rename(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    p.bump(); // RENAME
    let database = p.eat(TokenKind::DatabaseKw);
    let dictionary = if database {
        false
    } else {
        p.eat(TokenKind::DictionaryKw)
    };
    if !database && !dictionary {
        p.eat(TokenKind::TableKw);
    }

    let mut pairs = Vec::new();
    loop {
        let from = grammar::parse_table_identifier(p)?;
        p.expect(TokenKind::ToKw);
        let to = grammar::parse_table_identifier(p)?;
        pairs.push(RenamePair { from, to });
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    let on_cluster = grammar::parse_on_cluster(p);

    Some(Statement::Rename(Rename {
        pos,
        database,
        dictionary,
        pairs,
        on_cluster,
    }))
}

pub(crate) fn parse_exchange(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    p.bump(); // EXCHANGE
    let dictionaries = if p.eat(TokenKind::DictionariesKw) {
        true
    } else {
        p.expect(TokenKind::TablesKw);
        false
    };

    let left = grammar::parse_table_identifier(p)?;
    p.expect(TokenKind::AndKw);
    let right = grammar::parse_table_identifier(p)?;
    let on_cluster = grammar::parse_on_cluster(p);

    Some(Statement::Exchange(Exchange {
        pos,
        dictionaries,
        left,
        right,
        on_cluster,
    }))
}

fn parse_object_kind(p: &mut Parser) -> ObjectKind {
    match p.kind() {
        TokenKind::DatabaseKw => {
            p.bump();
            ObjectKind::Database
        }
        TokenKind::ViewKw => {
            p.bump();
            ObjectKind::View
        }
        TokenKind::DictionaryKw => {
            p.bump();
            ObjectKind::Dictionary
        }
        _ => {
            p.eat(TokenKind::TableKw);
            ObjectKind::Table
        }
    }
}

pub(crate) fn parse_exists(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    p.bump(); // EXISTS
    let temporary = p.eat(TokenKind::TemporaryKw);
    let kind = parse_object_kind(p);
    let target = grammar::parse_table_identifier(p)?;

    Some(Statement::Exists(Exists {
        pos,
        kind,
        temporary,
        target,
    }))
}

pub(crate) fn parse_detach(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    p.bump(); // DETACH
    let kind = parse_object_kind(p);
    let if_exists = ddl::eat_if_exists(p);
    let target = grammar::parse_table_identifier(p)?;
    let on_cluster = grammar::parse_on_cluster(p);
    let permanently = p.eat(TokenKind::PermanentlyKw);
    let sync = p.eat(TokenKind::SyncKw);

    Some(Statement::Detach(Detach {
        pos,
        kind,
        if_exists,
        target,
        permanently,
        sync,
        on_cluster,
    }))
}

pub(crate) fn parse_attach(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    p.bump(); // ATTACH
    let kind = parse_object_kind(p);
    let if_not_exists = ddl::eat_if_not_exists(p);
    let target = grammar::parse_table_identifier(p)?;
    let on_cluster = grammar::parse_on_cluster(p);

    Some(Statement::Attach(Attach {
        pos,
        kind,
        if_not_exists,
        target,
        on_cluster,
    }))
}

pub(crate) fn parse_check(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    p.bump(); // CHECK
    p.eat(TokenKind::TableKw);
    let table = grammar::parse_table_identifier(p)?;
    let partition = if p.eat(TokenKind::PartitionKw) {
        Some(grammar::parse_partition(p)?)
    } else {
        None
    };

    Some(Statement::Check(Check {
        pos,
        table,
        partition,
    }))
}

/// The privilege list and the `ON` target are recorded as written;
/// resolving them is out of scope.
pub(crate) fn parse_grant(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    p.bump(); // GRANT

    let current_grants = if p.at(TokenKind::CurrentKw) && p.peek().kind == TokenKind::GrantsKw {
        p.bump();
        p.bump();
        true
    } else {
        false
    };

    let mut privileges = Vec::new();
    let mut current = String::new();
    while !matches!(
        p.kind(),
        TokenKind::OnKw | TokenKind::ToKw | TokenKind::SemiColon | TokenKind::Eof
    ) {
        if p.at(TokenKind::Comma) {
            p.bump();
            if !current.is_empty() {
                privileges.push(std::mem::take(&mut current));
            }
            continue;
        }
        let token = p.bump();
        if !current.is_empty() && !matches!(token.kind, TokenKind::LParen | TokenKind::RParen) {
            current.push(' ');
        }
        current.push_str(token.text);
    }
    if !current.is_empty() {
        privileges.push(current);
    }

    let on = if p.eat(TokenKind::OnKw) {
        let mut target = String::new();
        while !matches!(p.kind(), TokenKind::ToKw | TokenKind::SemiColon | TokenKind::Eof) {
            target.push_str(p.bump().text);
        }
        Some(target)
    } else {
        None
    };

    p.expect(TokenKind::ToKw);
    let mut grantees = Vec::new();
    loop {
        grantees.push(grammar::parse_ident(p)?);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }

    let with_grant_option = if p.at(TokenKind::WithKw) && p.peek().kind == TokenKind::GrantKw {
        p.bump();
        p.bump();
        p.eat_word("OPTION");
        true
    } else {
        false
    };

    Some(Statement::Grant(Grant {
        pos,
        current_grants,
        privileges,
        on,
        grantees,
        with_grant_option,
    }))
}

pub(crate) fn parse_transaction(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    let kind = match p.kind() {
        TokenKind::BeginKw => {
            p.bump();
            p.eat(TokenKind::TransactionKw);
            TransactionKind::Begin
        }
        TokenKind::CommitKw => {
            p.bump();
            TransactionKind::Commit
        }
        _ => {
            p.bump(); // ROLLBACK
            TransactionKind::Rollback
        }
    };
    Some(Statement::Transaction(Transaction { pos, kind }))
}
