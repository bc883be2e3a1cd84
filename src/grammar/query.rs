// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements parsing of `SELECT` statements: the strict clause order, the
//! `WITH` clause families, joins, and the set-operation grouping rules.

use crate::ast::*;
use crate::grammar::{self, expressions};
use crate::grammar::{parse_expr, parse_subexpr, PREC_MUL};
use crate::lexer::TokenKind;
use crate::parser::Parser;

/// A set operator as written, before grouping: the UNION family (and the
/// `ALL` variants of INTERSECT/EXCEPT) flatten, the rest group with
/// INTERSECT-over-EXCEPT precedence.
enum RawSetOp {
    Flatten(UnionMode),
    Group(SetOp),
}

pub(crate) fn parse_select_with_union(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();
    let mut operands = vec![parse_select_atom(p)?];
    let mut ops = Vec::new();

    loop {
        let op = if p.at(TokenKind::UnionKw) {
            p.bump();
            if p.eat(TokenKind::AllKw) {
                RawSetOp::Flatten(UnionMode::UnionAll)
            } else if p.eat(TokenKind::DistinctKw) {
                RawSetOp::Flatten(UnionMode::UnionDistinct)
            } else {
                RawSetOp::Flatten(UnionMode::Union)
            }
        } else if p.at(TokenKind::IntersectKw) {
            p.bump();
            if p.eat(TokenKind::AllKw) {
                RawSetOp::Flatten(UnionMode::IntersectAll)
            } else if p.eat(TokenKind::DistinctKw) {
                RawSetOp::Group(SetOp::IntersectDistinct)
            } else {
                RawSetOp::Group(SetOp::Intersect)
            }
        } else if p.at(TokenKind::ExceptKw) {
            p.bump();
            if p.eat(TokenKind::AllKw) {
                RawSetOp::Flatten(UnionMode::ExceptAll)
            } else if p.eat(TokenKind::DistinctKw) {
                RawSetOp::Group(SetOp::ExceptDistinct)
            } else {
                RawSetOp::Group(SetOp::Except)
            }
        } else {
            break;
        };
        ops.push(op);
        operands.push(parse_select_atom(p)?);
    }

    Some(group_set_ops(pos, operands, ops))
}

fn parse_select_atom(p: &mut Parser) -> Option<Statement> {
    if p.at(TokenKind::LParen) {
        p.bump();
        let inner = parse_select_with_union(p)?;
        p.expect(TokenKind::RParen);
        Some(inner)
    } else {
        parse_select_body(p)
    }
}

/// Splits the operand chain at the flattening operators, then groups each
/// segment: consecutive `INTERSECT` runs fuse into one node, the remaining
/// `EXCEPT`s fold left-associatively.
fn group_set_ops(pos: Pos, operands: Vec<Statement>, ops: Vec<RawSetOp>) -> Statement {
    let mut operands = operands.into_iter();
    let mut selects = Vec::new();
    let mut modes = Vec::new();

    let mut segment = vec![operands.next().expect("at least one operand")];
    let mut segment_ops = Vec::new();

    for op in ops {
        let next = operands.next().expect("one operand per operator");
        match op {
            RawSetOp::Flatten(mode) => {
                selects.push(fuse_segment(segment, segment_ops));
                modes.push(mode);
                segment = vec![next];
                segment_ops = Vec::new();
            }
            RawSetOp::Group(set_op) => {
                segment.push(next);
                segment_ops.push(set_op);
            }
        }
    }
    selects.push(fuse_segment(segment, segment_ops));

    Statement::SelectWithUnion(SelectWithUnion {
        pos,
        selects,
        modes,
    })
}

fn fuse_segment(operands: Vec<Statement>, ops: Vec<SetOp>) -> Statement {
    if ops.is_empty() {
        return operands.into_iter().next().expect("non-empty segment");
    }

    let mut operands = operands.into_iter();
    // `open` marks an intersect run built here, still extendable; a
    // parenthesised operand that happens to be an intersect node is not.
    let mut items: Vec<(Statement, bool)> = vec![(operands.next().unwrap(), false)];
    let mut excepts = Vec::new();

    for op in ops {
        let rhs = operands.next().unwrap();
        if matches!(op, SetOp::Intersect | SetOp::IntersectDistinct) {
            let (last, open) = items.pop().unwrap();
            let fused = if open {
                match last {
                    Statement::SelectIntersectExcept(mut node) => {
                        node.selects.push(rhs);
                        Statement::SelectIntersectExcept(node)
                    }
                    _ => unreachable!("open runs are intersect nodes"),
                }
            } else {
                let run_pos = last.pos();
                Statement::SelectIntersectExcept(SelectIntersectExcept {
                    pos: run_pos,
                    op,
                    selects: vec![last, rhs],
                })
            };
            items.push((fused, true));
        } else {
            excepts.push(op);
            items.push((rhs, false));
        }
    }

    let mut items = items.into_iter().map(|(statement, _)| statement);
    let mut acc = items.next().unwrap();
    for (op, rhs) in excepts.into_iter().zip(items) {
        let acc_pos = acc.pos();
        acc = Statement::SelectIntersectExcept(SelectIntersectExcept {
            pos: acc_pos,
            op,
            selects: vec![acc, rhs],
        });
    }
    acc
}

fn parse_select_body(p: &mut Parser) -> Option<Statement> {
    let pos = p.pos();

    let with = if p.at(TokenKind::WithKw) {
        Some(parse_with_clause(p)?)
    } else {
        None
    };

    if !p.expect(TokenKind::SelectKw) {
        return None;
    }

    let distinct = if p.eat(TokenKind::DistinctKw) {
        true
    } else {
        p.eat(TokenKind::AllKw);
        false
    };

    // MUL precedence keeps `TOP 3 *` from eating the asterisk.
    let top = if p.eat(TokenKind::TopKw) {
        Some(Box::new(parse_subexpr(p, PREC_MUL)?))
    } else {
        None
    };

    let columns = parse_column_list(p)?;

    let from = if p.eat(TokenKind::FromKw) {
        Some(parse_tables(p)?)
    } else {
        None
    };

    let prewhere = if p.eat(TokenKind::PrewhereKw) {
        Some(Box::new(parse_expr(p)?))
    } else {
        None
    };
    let where_clause = if p.eat(TokenKind::WhereKw) {
        Some(Box::new(parse_expr(p)?))
    } else {
        None
    };

    let mut group_by = if p.at(TokenKind::GroupKw) {
        Some(parse_group_by(p)?)
    } else {
        None
    };

    let mut with_totals = false;
    while p.at(TokenKind::WithKw)
        && matches!(
            p.peek().kind,
            TokenKind::RollupKw | TokenKind::CubeKw | TokenKind::TotalsKw
        )
    {
        p.bump();
        match p.kind() {
            TokenKind::RollupKw => {
                p.bump();
                if let Some(group_by) = group_by.as_mut() {
                    group_by.with_rollup = true;
                }
            }
            TokenKind::CubeKw => {
                p.bump();
                if let Some(group_by) = group_by.as_mut() {
                    group_by.with_cube = true;
                }
            }
            _ => {
                p.bump();
                with_totals = true;
            }
        }
    }

    let having = if p.eat(TokenKind::HavingKw) {
        Some(Box::new(parse_expr(p)?))
    } else {
        None
    };
    let mut qualify = if p.eat(TokenKind::QualifyKw) {
        Some(Box::new(parse_expr(p)?))
    } else {
        None
    };

    let windows = if p.eat(TokenKind::WindowKw) {
        let mut defs = Vec::new();
        loop {
            let def_pos = p.pos();
            let name = grammar::parse_ident(p)?;
            p.expect(TokenKind::AsKw);
            let spec = parse_window_spec(p)?;
            defs.push(WindowDef {
                pos: def_pos,
                name: name.name,
                spec,
            });
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
        Some(defs)
    } else {
        None
    };

    let order_by = if p.at(TokenKind::OrderKw) {
        p.bump();
        p.expect(TokenKind::ByKw);
        Some(parse_order_list(p)?)
    } else {
        None
    };

    let mut limit = None;
    let mut limit_by = None;
    while p.at(TokenKind::LimitKw) {
        let clause_pos = p.pos();
        p.bump();
        let first = parse_expr(p)?;
        let (length, offset_expr) = if p.eat(TokenKind::Comma) {
            // `LIMIT n, m` is offset `n`, limit `m`.
            (parse_expr(p)?, Some(first))
        } else if p.eat(TokenKind::OffsetKw) {
            (first, Some(parse_expr(p)?))
        } else {
            (first, None)
        };

        if p.eat(TokenKind::ByKw) {
            let by = parse_expr_list(p)?;
            limit_by = Some(LimitBy {
                pos: clause_pos,
                limit: Box::new(length),
                offset: offset_expr.map(Box::new),
                by,
            });
        } else {
            let with_ties = if p.at(TokenKind::WithKw) && p.peek().kind == TokenKind::TiesKw {
                p.bump();
                p.bump();
                true
            } else {
                false
            };
            limit = Some(Limit {
                pos: clause_pos,
                limit: Box::new(length),
                offset: offset_expr.map(Box::new),
                with_ties,
            });
            break;
        }
    }

    let offset = if p.eat(TokenKind::OffsetKw) {
        let expr = parse_expr(p)?;
        if !p.eat(TokenKind::RowsKw) {
            p.eat(TokenKind::RowKw);
        }
        Some(Box::new(expr))
    } else {
        None
    };

    if p.at(TokenKind::FetchKw) {
        let clause_pos = p.pos();
        p.bump();
        if !p.eat(TokenKind::FirstKw) {
            p.eat(TokenKind::NextKw);
        }
        let length = parse_expr(p)?;
        if !p.eat(TokenKind::RowsKw) {
            p.eat(TokenKind::RowKw);
        }
        let with_ties = if p.eat(TokenKind::OnlyKw) {
            false
        } else if p.at(TokenKind::WithKw) && p.peek().kind == TokenKind::TiesKw {
            p.bump();
            p.bump();
            true
        } else {
            false
        };
        limit = Some(Limit {
            pos: clause_pos,
            limit: Box::new(length),
            offset: None,
            with_ties,
        });
    }

    loop {
        if p.at(TokenKind::WithKw) && p.peek().kind == TokenKind::TotalsKw {
            p.bump();
            p.bump();
            with_totals = true;
            continue;
        }
        if p.eat(TokenKind::QualifyKw) {
            qualify = Some(Box::new(parse_expr(p)?));
            continue;
        }
        break;
    }

    let mut settings = if p.eat(TokenKind::SettingsKw) {
        Some(grammar::parse_settings_list(p)?)
    } else {
        None
    };

    let into_outfile = if p.at(TokenKind::IntoKw) && p.peek().kind == TokenKind::OutfileKw {
        let clause_pos = p.pos();
        p.bump();
        p.bump();
        let path = grammar::parse_string_literal(p)?;
        let truncate = p.eat(TokenKind::TruncateKw);
        Some(IntoOutfile {
            pos: clause_pos,
            path,
            truncate,
        })
    } else {
        None
    };

    let format = if p.eat(TokenKind::FormatKw) {
        Some(grammar::parse_ident(p)?)
    } else {
        None
    };

    if p.eat(TokenKind::SettingsKw) {
        let trailing = grammar::parse_settings_list(p)?;
        match settings.as_mut() {
            Some(settings) => settings.extend(trailing),
            None => settings = Some(trailing),
        }
    }

    Some(Statement::Select(Box::new(Select {
        pos,
        with,
        distinct,
        top,
        columns,
        from,
        prewhere,
        where_clause,
        group_by,
        with_totals,
        having,
        qualify,
        windows,
        order_by,
        limit_by,
        limit,
        offset,
        settings,
        into_outfile,
        format,
    })))
}

/// Three syntactic families share the `AS` keyword here: `name AS
/// (SELECT …)`, `expr AS name`, and `(SELECT …) AS name`. The bound name
/// may be omitted entirely (`WITH 1 SELECT 1`).
fn parse_with_clause(p: &mut Parser) -> Option<Vec<Expr>> {
    p.bump(); // WITH
    let mut elements = Vec::new();
    loop {
        elements.push(parse_with_element(p)?);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    Some(elements)
}

fn parse_with_element(p: &mut Parser) -> Option<Expr> {
    let pos = p.pos();

    if p.kind().is_name() && p.peek().kind == TokenKind::AsKw {
        let name = grammar::parse_ident(p)?;
        p.bump(); // AS

        if p.at(TokenKind::LParen)
            && matches!(p.peek().kind, TokenKind::SelectKw | TokenKind::WithKw)
        {
            p.bump();
            let statement = parse_select_with_union(p)?;
            p.expect(TokenKind::RParen);
            let subquery = Expr::Subquery(Subquery {
                pos,
                select: Box::new(statement),
                alias: None,
            });
            return Some(Expr::With(WithElement {
                pos,
                name: Some(name.name),
                expr: Box::new(subquery),
            }));
        }

        if p.at(TokenKind::LParen) {
            // `name AS (expr)` keeps the name as the binding.
            let value = parse_expr(p)?;
            return Some(value.with_alias(name.name));
        }

        // `a AS b` reads as expression `a` bound to `b`.
        let alias = grammar::parse_ident(p)?;
        return Some(
            Expr::Identifier(Identifier {
                pos,
                parts: vec![name],
                alias: None,
            })
            .with_alias(alias.name),
        );
    }

    // Scalar (`1 AS x`) and parenthesised-subquery (`(SELECT 1) AS x`)
    // elements; the expression parser attaches the alias.
    parse_expr(p)
}

fn parse_column_list(p: &mut Parser) -> Option<Vec<Expr>> {
    let mut columns = Vec::new();
    loop {
        let mut expr = parse_expr(p)?;
        if expr.alias().is_none() && grammar::at_implicit_alias(p) {
            let alias = grammar::parse_ident(p)?;
            expr = expr.with_alias(alias.name);
        }
        columns.push(expr);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    Some(columns)
}

pub(crate) fn parse_expr_list(p: &mut Parser) -> Option<Vec<Expr>> {
    let mut exprs = Vec::new();
    loop {
        exprs.push(parse_expr(p)?);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    Some(exprs)
}

fn at_join_start(p: &Parser) -> bool {
    matches!(
        p.kind(),
        TokenKind::JoinKw
            | TokenKind::GlobalKw
            | TokenKind::AnyKw
            | TokenKind::AllKw
            | TokenKind::AsofKw
            | TokenKind::SemiKw
            | TokenKind::AntiKw
            | TokenKind::InnerKw
            | TokenKind::LeftKw
            | TokenKind::RightKw
            | TokenKind::FullKw
            | TokenKind::CrossKw
            | TokenKind::PasteKw
    )
}

fn parse_tables(p: &mut Parser) -> Option<TablesInSelect> {
    let pos = p.pos();
    let mut elements = Vec::new();

    let first = parse_table_expression(p)?;
    elements.push(TablesElement {
        pos: first.pos,
        table: Some(first),
        join: None,
        array_join: None,
    });

    loop {
        let element_pos = p.pos();

        let left_array = p.at(TokenKind::LeftKw) && p.peek().kind == TokenKind::ArrayKw;
        if left_array || (p.at(TokenKind::ArrayKw) && p.peek().kind == TokenKind::JoinKw) {
            if left_array {
                p.bump();
            }
            p.bump(); // ARRAY
            p.expect(TokenKind::JoinKw);
            let expressions = parse_column_list(p)?;
            elements.push(TablesElement {
                pos: element_pos,
                table: None,
                join: None,
                array_join: Some(ArrayJoin {
                    pos: element_pos,
                    left: left_array,
                    expressions,
                }),
            });
            continue;
        }

        if p.eat(TokenKind::Comma) {
            let table = parse_table_expression(p)?;
            // The empty marker mirrors the reference tree shape for
            // comma-joined plain tables.
            let join = if matches!(*table.expr, Expr::Subquery(_)) {
                None
            } else {
                Some(TableJoin {
                    pos: element_pos,
                    global: false,
                    strictness: JoinStrictness::Unspecified,
                    kind: JoinKind::Comma,
                    on: None,
                    using: None,
                })
            };
            elements.push(TablesElement {
                pos: element_pos,
                table: Some(table),
                join,
                array_join: None,
            });
            continue;
        }

        if at_join_start(p) {
            let mut join = parse_join_prefix(p)?;
            let table = parse_table_expression(p)?;
            if p.eat(TokenKind::OnKw) {
                join.on = Some(Box::new(parse_expr(p)?));
            } else if p.eat(TokenKind::UsingKw) {
                let using = if p.eat(TokenKind::LParen) {
                    let list = parse_expr_list(p)?;
                    p.expect(TokenKind::RParen);
                    list
                } else {
                    parse_expr_list(p)?
                };
                join.using = Some(using);
            }
            elements.push(TablesElement {
                pos: element_pos,
                table: Some(table),
                join: Some(join),
                array_join: None,
            });
            continue;
        }

        break;
    }

    Some(TablesInSelect { pos, elements })
}

/// Recognises `GLOBAL`, strictness and type in either order, then `JOIN`.
fn parse_join_prefix(p: &mut Parser) -> Option<TableJoin> {
    let pos = p.pos();
    let mut global = false;
    let mut strictness = JoinStrictness::Unspecified;
    let mut kind = JoinKind::Inner;

    loop {
        match p.kind() {
            TokenKind::GlobalKw => {
                global = true;
                p.bump();
            }
            TokenKind::AnyKw => {
                strictness = JoinStrictness::Any;
                p.bump();
            }
            TokenKind::AllKw => {
                strictness = JoinStrictness::All;
                p.bump();
            }
            TokenKind::AsofKw => {
                strictness = JoinStrictness::Asof;
                p.bump();
            }
            TokenKind::SemiKw => {
                strictness = JoinStrictness::Semi;
                p.bump();
            }
            TokenKind::AntiKw => {
                strictness = JoinStrictness::Anti;
                p.bump();
            }
            TokenKind::InnerKw => {
                kind = JoinKind::Inner;
                p.bump();
            }
            TokenKind::LeftKw => {
                kind = JoinKind::Left;
                p.bump();
                p.eat(TokenKind::OuterKw);
            }
            TokenKind::RightKw => {
                kind = JoinKind::Right;
                p.bump();
                p.eat(TokenKind::OuterKw);
            }
            TokenKind::FullKw => {
                kind = JoinKind::Full;
                p.bump();
                p.eat(TokenKind::OuterKw);
            }
            TokenKind::CrossKw => {
                kind = JoinKind::Cross;
                p.bump();
            }
            TokenKind::PasteKw => {
                kind = JoinKind::Paste;
                p.bump();
            }
            TokenKind::JoinKw => {
                p.bump();
                break;
            }
            _ => {
                p.expected(TokenKind::JoinKw);
                return None;
            }
        }
    }

    Some(TableJoin {
        pos,
        global,
        strictness,
        kind,
        on: None,
        using: None,
    })
}

fn parse_table_expression(p: &mut Parser) -> Option<TableExpression> {
    let pos = p.pos();

    let mut expr = if p.at(TokenKind::LParen) {
        p.bump();
        if matches!(p.kind(), TokenKind::SelectKw | TokenKind::WithKw) {
            let statement = parse_select_with_union(p)?;
            p.expect(TokenKind::RParen);
            Expr::Subquery(Subquery {
                pos,
                select: Box::new(statement),
                alias: None,
            })
        } else {
            p.unexpected("table expression");
            return None;
        }
    } else if p.kind().is_name() {
        let id = grammar::parse_identifier(p)?;
        if p.at(TokenKind::LParen) {
            expressions::parse_call_body(p, pos, id.name(), None)?
        } else if id.parts.len() > 2 {
            p.unexpected("table name");
            return None;
        } else {
            let mut parts = id.parts.into_iter();
            let first = parts.next().expect("identifier parts are non-empty");
            match parts.next() {
                Some(table) => Expr::TableIdentifier(TableIdentifier {
                    pos,
                    database: Some(first),
                    table,
                    alias: None,
                }),
                None => Expr::TableIdentifier(TableIdentifier {
                    pos,
                    database: None,
                    table: first,
                    alias: None,
                }),
            }
        }
    } else {
        p.unexpected("table expression");
        return None;
    };

    if p.eat(TokenKind::AsKw) {
        let alias = grammar::parse_ident(p)?;
        expr = expr.with_alias(alias.name);
    } else if p.at(TokenKind::Ident)
        || p.at(TokenKind::QuotedIdent)
        || (p.kind().is_keyword() && !grammar::is_clause_keyword(p.kind()))
    {
        let alias = grammar::parse_ident(p)?;
        expr = expr.with_alias(alias.name);
    }

    let final_modifier = p.eat(TokenKind::FinalKw);

    let mut sample = None;
    let mut sample_offset = None;
    if p.eat(TokenKind::SampleKw) {
        sample = Some(Box::new(parse_expr(p)?));
        if p.eat(TokenKind::OffsetKw) {
            sample_offset = Some(Box::new(parse_expr(p)?));
        }
    }

    Some(TableExpression {
        pos,
        expr: Box::new(expr),
        final_modifier,
        sample,
        sample_offset,
    })
}

fn parse_group_by(p: &mut Parser) -> Option<GroupBy> {
    let pos = p.pos();
    p.bump(); // GROUP
    p.expect(TokenKind::ByKw);

    if p.at(TokenKind::GroupingKw) && p.peek_word("SETS") {
        p.bump();
        p.bump();
        p.expect(TokenKind::LParen);
        let mut sets = Vec::new();
        loop {
            if p.eat(TokenKind::LParen) {
                if p.eat(TokenKind::RParen) {
                    sets.push(Vec::new());
                } else {
                    let exprs = parse_expr_list(p)?;
                    p.expect(TokenKind::RParen);
                    sets.push(exprs);
                }
            } else {
                sets.push(vec![parse_expr(p)?]);
            }
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
        p.expect(TokenKind::RParen);
        return Some(GroupBy {
            pos,
            kind: GroupByKind::GroupingSets,
            exprs: Vec::new(),
            sets,
            with_rollup: false,
            with_cube: false,
        });
    }

    if p.eat(TokenKind::RollupKw) {
        p.expect(TokenKind::LParen);
        let exprs = parse_expr_list(p)?;
        p.expect(TokenKind::RParen);
        return Some(GroupBy {
            pos,
            kind: GroupByKind::Rollup,
            exprs,
            sets: Vec::new(),
            with_rollup: false,
            with_cube: false,
        });
    }
    if p.eat(TokenKind::CubeKw) {
        p.expect(TokenKind::LParen);
        let exprs = parse_expr_list(p)?;
        p.expect(TokenKind::RParen);
        return Some(GroupBy {
            pos,
            kind: GroupByKind::Cube,
            exprs,
            sets: Vec::new(),
            with_rollup: false,
            with_cube: false,
        });
    }
    if p.eat(TokenKind::AllKw) {
        return Some(GroupBy {
            pos,
            kind: GroupByKind::All,
            exprs: Vec::new(),
            sets: Vec::new(),
            with_rollup: false,
            with_cube: false,
        });
    }

    let exprs = parse_expr_list(p)?;
    Some(GroupBy {
        pos,
        kind: GroupByKind::Exprs,
        exprs,
        sets: Vec::new(),
        with_rollup: false,
        with_cube: false,
    })
}

pub(crate) fn parse_window_spec(p: &mut Parser) -> Option<WindowSpec> {
    let pos = p.pos();
    p.expect(TokenKind::LParen);

    let partition_by = if p.at(TokenKind::PartitionKw) {
        p.bump();
        p.expect(TokenKind::ByKw);
        Some(parse_expr_list(p)?)
    } else {
        None
    };
    let order_by = if p.at(TokenKind::OrderKw) {
        p.bump();
        p.expect(TokenKind::ByKw);
        Some(parse_order_list(p)?)
    } else {
        None
    };
    let frame = if matches!(
        p.kind(),
        TokenKind::RowsKw | TokenKind::RangeKw | TokenKind::GroupsKw
    ) {
        Some(parse_window_frame(p)?)
    } else {
        None
    };

    p.expect(TokenKind::RParen);
    Some(WindowSpec {
        pos,
        partition_by,
        order_by,
        frame,
    })
}

fn parse_window_frame(p: &mut Parser) -> Option<WindowFrame> {
    let pos = p.pos();
    let kind = match p.kind() {
        TokenKind::RowsKw => WindowFrameKind::Rows,
        TokenKind::RangeKw => WindowFrameKind::Range,
        _ => WindowFrameKind::Groups,
    };
    p.bump();

    if p.eat(TokenKind::BetweenKw) {
        let begin = parse_frame_bound(p)?;
        p.expect(TokenKind::AndKw);
        let end = parse_frame_bound(p)?;
        Some(WindowFrame {
            pos,
            kind,
            begin,
            end: Some(end),
        })
    } else {
        let begin = parse_frame_bound(p)?;
        Some(WindowFrame {
            pos,
            kind,
            begin,
            end: None,
        })
    }
}

fn parse_frame_bound(p: &mut Parser) -> Option<FrameBound> {
    if p.eat(TokenKind::CurrentKw) {
        p.expect(TokenKind::RowKw);
        return Some(FrameBound::CurrentRow);
    }
    if p.eat(TokenKind::UnboundedKw) {
        if p.eat(TokenKind::PrecedingKw) {
            return Some(FrameBound::UnboundedPreceding);
        }
        p.expect(TokenKind::FollowingKw);
        return Some(FrameBound::UnboundedFollowing);
    }

    let expr = parse_expr(p)?;
    if p.eat(TokenKind::PrecedingKw) {
        Some(FrameBound::Preceding(Box::new(expr)))
    } else {
        p.expect(TokenKind::FollowingKw);
        Some(FrameBound::Following(Box::new(expr)))
    }
}

pub(crate) fn parse_order_list(p: &mut Parser) -> Option<Vec<OrderExpr>> {
    let mut exprs = Vec::new();
    loop {
        exprs.push(parse_order_expr(p)?);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    Some(exprs)
}

fn parse_order_expr(p: &mut Parser) -> Option<OrderExpr> {
    let pos = p.pos();
    let expr = parse_expr(p)?;

    let direction = if p.eat(TokenKind::AscKw) || p.eat(TokenKind::AscendingKw) {
        Some(OrderDirection::Ascending)
    } else if p.eat(TokenKind::DescKw) || p.eat(TokenKind::DescendingKw) {
        Some(OrderDirection::Descending)
    } else {
        None
    };

    let nulls = if p.eat(TokenKind::NullsKw) {
        if p.eat(TokenKind::FirstKw) {
            Some(NullsOrder::First)
        } else {
            p.expect(TokenKind::LastKw);
            Some(NullsOrder::Last)
        }
    } else {
        None
    };

    let collate = if p.eat(TokenKind::CollateKw) {
        Some(grammar::parse_string_literal(p)?)
    } else {
        None
    };

    let fill = if p.at(TokenKind::WithKw) && p.peek().kind == TokenKind::FillKw {
        let fill_pos = p.pos();
        p.bump();
        p.bump();
        let from = if p.eat(TokenKind::FromKw) {
            Some(Box::new(parse_expr(p)?))
        } else {
            None
        };
        let to = if p.eat(TokenKind::ToKw) {
            Some(Box::new(parse_expr(p)?))
        } else {
            None
        };
        let step = if p.eat(TokenKind::StepKw) {
            Some(Box::new(parse_expr(p)?))
        } else {
            None
        };
        Some(WithFill {
            pos: fill_pos,
            from,
            to,
            step,
        })
    } else {
        None
    };

    Some(OrderExpr {
        pos,
        expr: Box::new(expr),
        direction,
        nulls,
        collate,
        fill,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{CancelToken, Parser};

    fn single(input: &str) -> Statement {
        let parse = Parser::new(input).parse_statements(&CancelToken::new());
        assert!(parse.errors.is_empty(), "{:?}", parse.errors);
        assert_eq!(parse.statements.len(), 1);
        parse.statements.into_iter().next().unwrap()
    }

    fn union_parts(statement: Statement) -> (Vec<Statement>, Vec<UnionMode>) {
        match statement {
            Statement::SelectWithUnion(swu) => (swu.selects, swu.modes),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bare_select_is_wrapped() {
        let (selects, modes) = union_parts(single("SELECT 1"));
        assert_eq!(selects.len(), 1);
        assert!(modes.is_empty());
        assert!(matches!(selects[0], Statement::Select(_)));
    }

    #[test]
    fn intersect_all_flattens() {
        let (selects, modes) = union_parts(single("SELECT 1 INTERSECT ALL SELECT 2"));
        assert_eq!(selects.len(), 2);
        assert_eq!(modes, vec![UnionMode::IntersectAll]);
    }

    #[test]
    fn intersect_binds_tighter_than_except() {
        // a EXCEPT b INTERSECT c == a EXCEPT (b INTERSECT c)
        let (selects, _) = union_parts(single("SELECT 1 EXCEPT SELECT 2 INTERSECT SELECT 3"));
        assert_eq!(selects.len(), 1);
        match &selects[0] {
            Statement::SelectIntersectExcept(except) => {
                assert_eq!(except.op, SetOp::Except);
                assert_eq!(except.selects.len(), 2);
                assert!(matches!(except.selects[0], Statement::Select(_)));
                match &except.selects[1] {
                    Statement::SelectIntersectExcept(intersect) => {
                        assert_eq!(intersect.op, SetOp::Intersect);
                        assert_eq!(intersect.selects.len(), 2);
                    }
                    other => panic!("unexpected {other:?}"),
                }
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn except_chains_fold_left() {
        let (selects, _) =
            union_parts(single("SELECT 1 EXCEPT SELECT 2 EXCEPT SELECT 3"));
        assert_eq!(selects.len(), 1);
        match &selects[0] {
            Statement::SelectIntersectExcept(outer) => {
                assert_eq!(outer.op, SetOp::Except);
                assert!(matches!(
                    outer.selects[0],
                    Statement::SelectIntersectExcept(_)
                ));
                assert!(matches!(outer.selects[1], Statement::Select(_)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn consecutive_intersects_fuse() {
        let (selects, _) =
            union_parts(single("SELECT 1 INTERSECT SELECT 2 INTERSECT SELECT 3"));
        assert_eq!(selects.len(), 1);
        match &selects[0] {
            Statement::SelectIntersectExcept(node) => {
                assert_eq!(node.op, SetOp::Intersect);
                assert_eq!(node.selects.len(), 3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn join_prefix_accepts_either_order() {
        for input in [
            "SELECT 1 FROM a ANY LEFT JOIN b USING id",
            "SELECT 1 FROM a LEFT ANY JOIN b USING id",
        ] {
            let statement = single(input);
            let (selects, _) = union_parts(statement);
            match &selects[0] {
                Statement::Select(select) => {
                    let from = select.from.as_ref().unwrap();
                    let join = from.elements[1].join.as_ref().unwrap();
                    assert_eq!(join.kind, JoinKind::Left);
                    assert_eq!(join.strictness, JoinStrictness::Any);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }
}
