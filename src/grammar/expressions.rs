// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements the Pratt expression parser.
//!
//! Per-token prefix and infix dispatch with a fixed precedence ladder.
//! Keywords double as identifiers in every position that accepts a name;
//! the dedicated keyword handlers fall back to the identifier path when
//! no `(` (or other required token) follows.

//  The shape of the main loop follows
//    https://matklad.github.io/2020/04/13/simple-but-powerful-pratt-parsing.html

use crate::ast::*;
use crate::grammar::{self, query, statements};
use crate::lexer::{decode_text, TokenKind};
use crate::parser::Parser;

pub(crate) const PREC_LOWEST: u8 = 0;
pub(crate) const PREC_ALIAS: u8 = 1;
/// Lambda `->` binds here so a bare `x -> body` is not swallowed by a
/// surrounding `AS`.
pub(crate) const PREC_OR: u8 = 2;
const PREC_AND: u8 = 3;
const PREC_NOT: u8 = 4;
const PREC_COMPARE: u8 = 5;
const PREC_CONCAT: u8 = 6;
const PREC_ADD: u8 = 7;
pub(crate) const PREC_MUL: u8 = 8;
const PREC_UNARY: u8 = 9;
const PREC_CALL: u8 = 10;
const PREC_HIGHEST: u8 = 11;

pub(crate) fn parse_expr(p: &mut Parser) -> Option<Expr> {
    parse_subexpr(p, PREC_LOWEST)
}

pub(crate) fn parse_subexpr(p: &mut Parser, min_prec: u8) -> Option<Expr> {
    let mut expr = parse_prefix(p)?;
    loop {
        let prec = infix_precedence(p);
        if prec <= min_prec {
            break;
        }
        // If the handler declines without consuming a token, stop instead
        // of spinning.
        let before = p.pos().offset;
        expr = parse_infix(p, expr, prec)?;
        if p.pos().offset == before {
            break;
        }
    }
    Some(expr)
}

fn infix_precedence(p: &Parser) -> u8 {
    match p.kind() {
        TokenKind::AsKw => PREC_ALIAS,
        TokenKind::Arrow | TokenKind::OrKw => PREC_OR,
        TokenKind::AndKw => PREC_AND,
        TokenKind::Eq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::Gt
        | TokenKind::LtEq
        | TokenKind::GtEq
        | TokenKind::Spaceship
        | TokenKind::LikeKw
        | TokenKind::IlikeKw
        | TokenKind::RegexpKw
        | TokenKind::InKw
        | TokenKind::BetweenKw
        | TokenKind::IsKw
        | TokenKind::GlobalKw
        | TokenKind::NotKw
        | TokenKind::QuestionMark => PREC_COMPARE,
        TokenKind::Concat => PREC_CONCAT,
        TokenKind::Plus | TokenKind::Minus => PREC_ADD,
        TokenKind::Asterisk
        | TokenKind::Slash
        | TokenKind::Percent
        | TokenKind::DivKw
        | TokenKind::ModKw => PREC_MUL,
        TokenKind::LParen
        | TokenKind::LBracket
        | TokenKind::DoubleColon
        | TokenKind::ExceptKw
        | TokenKind::ReplaceKw
        | TokenKind::ApplyKw => PREC_CALL,
        TokenKind::Dot => PREC_HIGHEST,
        // A number that begins with '.' in infix position is tuple access.
        TokenKind::Number if p.current().text.starts_with('.') => PREC_HIGHEST,
        _ => PREC_LOWEST,
    }
}

fn parse_prefix(p: &mut Parser) -> Option<Expr> {
    let pos = p.pos();
    match p.kind() {
        TokenKind::Error => {
            p.unexpected("expression");
            None
        }
        TokenKind::Ident | TokenKind::QuotedIdent => {
            let part = grammar::parse_ident(p)?;
            Some(Expr::Identifier(Identifier {
                pos,
                parts: vec![part],
                alias: None,
            }))
        }
        TokenKind::Number => Some(parse_number_literal(p, false)),
        TokenKind::String => {
            let token = p.bump();
            Some(Expr::Literal(Literal {
                pos,
                value: LiteralValue::String(decode_text(token.text)),
            }))
        }
        TokenKind::TrueKw | TokenKind::FalseKw => {
            let value = p.at(TokenKind::TrueKw);
            p.bump();
            Some(Expr::Literal(Literal {
                pos,
                value: LiteralValue::Bool(value),
            }))
        }
        TokenKind::NullKw => {
            p.bump();
            Some(Expr::Literal(Literal {
                pos,
                value: LiteralValue::Null,
            }))
        }
        TokenKind::NanKw => {
            let token = p.bump();
            Some(Expr::Literal(Literal {
                pos,
                value: LiteralValue::Float {
                    value: f64::NAN,
                    source: Some(token.text.to_owned()),
                },
            }))
        }
        TokenKind::InfKw => {
            let token = p.bump();
            Some(Expr::Literal(Literal {
                pos,
                value: LiteralValue::Float {
                    value: f64::INFINITY,
                    source: Some(token.text.to_owned()),
                },
            }))
        }
        TokenKind::Minus => parse_negation(p, pos),
        TokenKind::Plus => {
            // Unary plus is a no-op and leaves no node behind.
            p.bump();
            parse_subexpr(p, PREC_UNARY)
        }
        TokenKind::NotKw => {
            p.bump();
            // `NOT (0) + 1` parses as `(NOT 0) + 1`.
            let prec = if p.at(TokenKind::LParen) {
                PREC_UNARY
            } else {
                PREC_NOT
            };
            let operand = parse_subexpr(p, prec)?;
            Some(Expr::Unary(UnaryExpr {
                pos,
                op: "NOT".to_owned(),
                operand: Box::new(operand),
            }))
        }
        TokenKind::LParen => parse_paren(p),
        TokenKind::LBracket => parse_array_literal(p, pos),
        TokenKind::Asterisk => {
            p.bump();
            Some(Expr::Asterisk(Asterisk {
                pos,
                qualifier: None,
                transformers: Vec::new(),
            }))
        }
        TokenKind::CaseKw => parse_case(p, pos),
        TokenKind::CastKw if p.peek().kind == TokenKind::LParen => parse_cast(p, pos),
        TokenKind::ExtractKw if p.peek().kind == TokenKind::LParen => parse_extract(p, pos),
        TokenKind::ExistsKw if p.peek().kind == TokenKind::LParen => parse_exists(p, pos),
        TokenKind::SubstringKw if p.peek().kind == TokenKind::LParen => parse_substring(p, pos),
        TokenKind::TrimKw if p.peek().kind == TokenKind::LParen => parse_trim(p, pos),
        TokenKind::ColumnsKw if p.peek().kind == TokenKind::LParen => {
            parse_columns_matcher(p, pos)
        }
        TokenKind::ArrayKw if p.peek().kind == TokenKind::LBracket => {
            p.bump();
            parse_array_literal(p, pos)
        }
        TokenKind::IntervalKw if starts_interval_operand(p.peek().kind) => {
            parse_interval(p, pos)
        }
        TokenKind::DateKw if p.peek().kind == TokenKind::String => {
            p.bump();
            let value = grammar::parse_string_literal(p)?;
            Some(typed_literal_call(pos, "toDate", value))
        }
        TokenKind::TimestampKw if p.peek().kind == TokenKind::String => {
            p.bump();
            let value = grammar::parse_string_literal(p)?;
            Some(typed_literal_call(pos, "toDateTime", value))
        }
        TokenKind::QueryParameter => {
            let token = p.bump();
            let inner = token.text.trim_start_matches('{').trim_end_matches('}');
            let (name, ty) = match inner.split_once(':') {
                Some((name, ty)) => (name.trim().to_owned(), Some(ty.trim().to_owned())),
                None => (inner.trim().to_owned(), None),
            };
            Some(Expr::Parameter(Parameter {
                pos,
                name: Some(name),
                ty,
                positional: false,
            }))
        }
        TokenKind::QuestionMark => {
            p.bump();
            Some(Expr::Parameter(Parameter {
                pos,
                name: None,
                ty: None,
                positional: true,
            }))
        }
        kind if kind.is_keyword() => {
            // Keyword as identifier; a following `(` turns it into a call
            // through the ordinary infix path.
            let part = grammar::parse_ident(p)?;
            Some(Expr::Identifier(Identifier {
                pos,
                parts: vec![part],
                alias: None,
            }))
        }
        _ => {
            p.unexpected("expression");
            None
        }
    }
}

fn starts_interval_operand(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Number
            | TokenKind::String
            | TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::LParen
            | TokenKind::Ident
            | TokenKind::QuotedIdent
            | TokenKind::CaseKw
            | TokenKind::CastKw
            | TokenKind::QueryParameter
    )
}

fn typed_literal_call(pos: Pos, name: &str, value: String) -> Expr {
    Expr::Function(FunctionCall {
        pos,
        name: name.to_owned(),
        parameters: None,
        arguments: vec![Expr::Literal(Literal {
            pos,
            value: LiteralValue::String(value),
        })],
        distinct: false,
        over: None,
        settings: None,
        alias: None,
    })
}

/// `-` folds into a following numeric literal, preserving explicit
/// negativity (`-0` vs `0`); anything else becomes a negation node.
fn parse_negation(p: &mut Parser, pos: Pos) -> Option<Expr> {
    p.bump();
    if p.at(TokenKind::Number) {
        return Some(parse_number_literal_at(p, pos, true));
    }
    if p.at(TokenKind::InfKw) {
        let token = p.bump();
        return Some(Expr::Literal(Literal {
            pos,
            value: LiteralValue::Float {
                value: f64::NEG_INFINITY,
                source: Some(format!("-{}", token.text)),
            },
        }));
    }
    let operand = parse_subexpr(p, PREC_UNARY)?;
    Some(Expr::Unary(UnaryExpr {
        pos,
        op: "-".to_owned(),
        operand: Box::new(operand),
    }))
}

fn parse_number_literal(p: &mut Parser, negative: bool) -> Expr {
    let pos = p.pos();
    parse_number_literal_at(p, pos, negative)
}

fn parse_number_literal_at(p: &mut Parser, pos: Pos, negative: bool) -> Expr {
    let token = p.bump();
    Expr::Literal(Literal {
        pos,
        value: classify_number(token.text, negative),
    })
}

/// Splits the numeric lexeme into the literal sum: integers keep their
/// magnitude and an explicit sign marker, floats keep the source lexeme.
fn classify_number(text: &str, negative: bool) -> LiteralValue {
    let float_source = || {
        Some(if negative {
            format!("-{text}")
        } else {
            text.to_owned()
        })
    };

    if let Some(rest) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        if rest.contains(['p', 'P', '.']) {
            let value = parse_hex_float(rest);
            let value = if negative { -value } else { value };
            return LiteralValue::Float {
                value,
                source: float_source(),
            };
        }
        return match u64::from_str_radix(rest, 16) {
            Ok(value) => LiteralValue::Int { value, negative },
            Err(_) => LiteralValue::Float {
                value: 0.0,
                source: float_source(),
            },
        };
    }
    if let Some(rest) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        return match u64::from_str_radix(rest, 2) {
            Ok(value) => LiteralValue::Int { value, negative },
            Err(_) => LiteralValue::Float {
                value: 0.0,
                source: float_source(),
            },
        };
    }
    if let Some(rest) = text.strip_prefix("0o").or_else(|| text.strip_prefix("0O")) {
        return match u64::from_str_radix(rest, 8) {
            Ok(value) => LiteralValue::Int { value, negative },
            Err(_) => LiteralValue::Float {
                value: 0.0,
                source: float_source(),
            },
        };
    }
    if text.contains(['.', 'e', 'E']) {
        let value: f64 = text.parse().unwrap_or(0.0);
        let value = if negative { -value } else { value };
        return LiteralValue::Float {
            value,
            source: float_source(),
        };
    }
    match text.parse::<u64>() {
        Ok(value) => LiteralValue::Int { value, negative },
        Err(_) => {
            // Magnitude beyond 64 bits degrades to a float, as the engine
            // does.
            let value: f64 = text.parse().unwrap_or(0.0);
            let value = if negative { -value } else { value };
            LiteralValue::Float {
                value,
                source: float_source(),
            }
        }
    }
}

/// `1.8p3`-style hex-float body (the `0x` prefix is already stripped).
fn parse_hex_float(body: &str) -> f64 {
    let (mantissa, exponent) = match body.split_once(['p', 'P']) {
        Some((mantissa, exp)) => (mantissa, exp.parse::<i32>().unwrap_or(0)),
        None => (body, 0),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (mantissa, ""),
    };

    let mut value = 0.0f64;
    for c in int_part.chars() {
        value = value * 16.0 + f64::from(c.to_digit(16).unwrap_or(0));
    }
    let mut scale = 1.0 / 16.0;
    for c in frac_part.chars() {
        value += f64::from(c.to_digit(16).unwrap_or(0)) * scale;
        scale /= 16.0;
    }
    value * 2f64.powi(exponent)
}

/// `(` in prefix position: subquery, empty tuple, tuple literal, or a
/// grouped expression (marked parenthesised).
fn parse_paren(p: &mut Parser) -> Option<Expr> {
    let pos = p.pos();
    p.bump();

    if matches!(
        p.kind(),
        TokenKind::SelectKw | TokenKind::WithKw | TokenKind::ExplainKw
    ) {
        let statement = if p.at(TokenKind::ExplainKw) {
            statements::parse_explain(p)?
        } else {
            query::parse_select_with_union(p)?
        };
        p.expect(TokenKind::RParen);
        return Some(Expr::Subquery(Subquery {
            pos,
            select: Box::new(statement),
            alias: None,
        }));
    }

    if p.eat(TokenKind::RParen) {
        return Some(Expr::Literal(Literal {
            pos,
            value: LiteralValue::Tuple(Vec::new()),
        }));
    }

    let first = parse_expr(p)?;
    if p.at(TokenKind::Comma) {
        let mut items = vec![first];
        while p.eat(TokenKind::Comma) {
            if p.at(TokenKind::RParen) {
                break;
            }
            items.push(parse_expr(p)?);
        }
        p.expect(TokenKind::RParen);
        return Some(Expr::Literal(Literal {
            pos,
            value: LiteralValue::Tuple(items),
        }));
    }

    p.expect(TokenKind::RParen);
    Some(match first {
        Expr::Binary(mut inner) => {
            inner.parenthesized = true;
            Expr::Binary(inner)
        }
        Expr::Lambda(mut inner) => {
            inner.parenthesized = true;
            Expr::Lambda(inner)
        }
        other => other,
    })
}

fn parse_array_literal(p: &mut Parser, pos: Pos) -> Option<Expr> {
    p.bump();
    let mut items = Vec::new();
    if !p.at(TokenKind::RBracket) {
        loop {
            items.push(parse_expr(p)?);
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
    }
    p.expect(TokenKind::RBracket);
    Some(Expr::Literal(Literal {
        pos,
        value: LiteralValue::Array(items),
    }))
}

fn parse_case(p: &mut Parser, pos: Pos) -> Option<Expr> {
    p.bump();
    let operand = if !p.at(TokenKind::WhenKw) {
        Some(Box::new(parse_expr(p)?))
    } else {
        None
    };

    let mut branches = Vec::new();
    while p.eat(TokenKind::WhenKw) {
        let condition = parse_expr(p)?;
        p.expect(TokenKind::ThenKw);
        let result = parse_expr(p)?;
        branches.push(CaseBranch { condition, result });
    }

    let else_branch = if p.eat(TokenKind::ElseKw) {
        Some(Box::new(parse_expr(p)?))
    } else {
        None
    };
    p.expect(TokenKind::EndKw);

    Some(Expr::Case(CaseExpr {
        pos,
        operand,
        branches,
        else_branch,
    }))
}

fn parse_cast(p: &mut Parser, pos: Pos) -> Option<Expr> {
    p.bump();
    p.expect(TokenKind::LParen);
    let expr = parse_subexpr(p, PREC_ALIAS)?;

    let (ty, type_expr, syntax) = if p.eat(TokenKind::AsKw) {
        let ty = parse_data_type(p)?;
        (Some(Box::new(ty)), None, CastSyntax::Keyword)
    } else {
        p.expect(TokenKind::Comma);
        let operand = parse_expr(p)?;
        match operand {
            literal @ Expr::Literal(Literal {
                value: LiteralValue::String(_),
                ..
            }) => (Some(Box::new(literal)), None, CastSyntax::Function),
            dynamic => (None, Some(Box::new(dynamic)), CastSyntax::Function),
        }
    };
    p.expect(TokenKind::RParen);

    Some(Expr::Cast(CastExpr {
        pos,
        expr: Box::new(expr),
        ty,
        type_expr,
        syntax,
    }))
}

fn parse_extract(p: &mut Parser, pos: Pos) -> Option<Expr> {
    p.bump();
    p.expect(TokenKind::LParen);
    let field = grammar::parse_ident(p)?.name.to_uppercase();
    p.expect(TokenKind::FromKw);
    let expr = parse_expr(p)?;
    p.expect(TokenKind::RParen);
    Some(Expr::Extract(ExtractExpr {
        pos,
        field,
        expr: Box::new(expr),
    }))
}

fn parse_exists(p: &mut Parser, pos: Pos) -> Option<Expr> {
    p.bump();
    p.bump(); // (
    if matches!(p.kind(), TokenKind::SelectKw | TokenKind::WithKw) {
        let statement = query::parse_select_with_union(p)?;
        p.expect(TokenKind::RParen);
        let subquery = Expr::Subquery(Subquery {
            pos,
            select: Box::new(statement),
            alias: None,
        });
        return Some(Expr::Exists(ExistsExpr {
            pos,
            subquery: Box::new(subquery),
        }));
    }

    // `exists(args)` as an ordinary call.
    let mut arguments = Vec::new();
    if !p.at(TokenKind::RParen) {
        loop {
            arguments.push(parse_expr(p)?);
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
    }
    p.expect(TokenKind::RParen);
    Some(Expr::Function(FunctionCall {
        pos,
        name: "exists".to_owned(),
        parameters: None,
        arguments,
        distinct: false,
        over: None,
        settings: None,
        alias: None,
    }))
}

fn parse_substring(p: &mut Parser, pos: Pos) -> Option<Expr> {
    p.bump();
    p.bump(); // (
    let mut arguments = vec![parse_subexpr(p, PREC_ALIAS)?];
    if p.eat(TokenKind::FromKw) {
        arguments.push(parse_subexpr(p, PREC_ALIAS)?);
        if p.eat(TokenKind::ForKw) {
            arguments.push(parse_subexpr(p, PREC_ALIAS)?);
        }
    } else {
        while p.eat(TokenKind::Comma) {
            arguments.push(parse_subexpr(p, PREC_ALIAS)?);
        }
    }
    p.expect(TokenKind::RParen);
    Some(Expr::Function(FunctionCall {
        pos,
        name: "substring".to_owned(),
        parameters: None,
        arguments,
        distinct: false,
        over: None,
        settings: None,
        alias: None,
    }))
}

fn parse_trim(p: &mut Parser, pos: Pos) -> Option<Expr> {
    p.bump();
    p.bump(); // (

    let name = match p.kind() {
        TokenKind::LeadingKw => {
            p.bump();
            "trimLeft"
        }
        TokenKind::TrailingKw => {
            p.bump();
            "trimRight"
        }
        TokenKind::BothKw => {
            p.bump();
            "trimBoth"
        }
        _ => {
            let expr = parse_expr(p)?;
            p.expect(TokenKind::RParen);
            return Some(Expr::Function(FunctionCall {
                pos,
                name: "trimBoth".to_owned(),
                parameters: None,
                arguments: vec![expr],
                distinct: false,
                over: None,
                settings: None,
                alias: None,
            }));
        }
    };

    let chars = if !p.at(TokenKind::FromKw) {
        Some(parse_subexpr(p, PREC_ALIAS)?)
    } else {
        None
    };
    p.expect(TokenKind::FromKw);
    let expr = parse_expr(p)?;
    p.expect(TokenKind::RParen);

    let mut arguments = vec![expr];
    arguments.extend(chars);
    Some(Expr::Function(FunctionCall {
        pos,
        name: name.to_owned(),
        parameters: None,
        arguments,
        distinct: false,
        over: None,
        settings: None,
        alias: None,
    }))
}

fn parse_columns_matcher(p: &mut Parser, pos: Pos) -> Option<Expr> {
    p.bump();
    p.bump(); // (

    let mut pattern = None;
    let mut columns = Vec::new();
    if p.at(TokenKind::String) {
        pattern = grammar::parse_string_literal(p);
    } else {
        loop {
            columns.push(grammar::parse_ident(p)?);
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
    }
    p.expect(TokenKind::RParen);

    Some(Expr::ColumnsMatcher(ColumnsMatcher {
        pos,
        pattern,
        columns,
        transformers: Vec::new(),
    }))
}

fn parse_interval(p: &mut Parser, pos: Pos) -> Option<Expr> {
    p.bump();
    let value = parse_subexpr(p, PREC_LOWEST)?;
    let unit = parse_interval_unit(p)?;
    Some(Expr::Interval(IntervalExpr {
        pos,
        value: Box::new(value),
        unit,
    }))
}

fn parse_interval_unit(p: &mut Parser) -> Option<String> {
    let known = matches!(
        p.kind(),
        TokenKind::SecondKw
            | TokenKind::MinuteKw
            | TokenKind::HourKw
            | TokenKind::DayKw
            | TokenKind::WeekKw
            | TokenKind::MonthKw
            | TokenKind::QuarterKw
            | TokenKind::YearKw
    ) || p.at_word("NANOSECOND")
        || p.at_word("MICROSECOND")
        || p.at_word("MILLISECOND");

    if !known {
        p.unexpected("INTERVAL unit");
        return None;
    }
    let token = p.bump();
    Some(token.text.to_uppercase())
}

fn parse_infix(p: &mut Parser, left: Expr, prec: u8) -> Option<Expr> {
    match p.kind() {
        TokenKind::AsKw => {
            p.bump();
            let alias = grammar::parse_ident(p)?;
            Some(left.with_alias(alias.name))
        }
        TokenKind::Arrow => parse_lambda(p, left),
        TokenKind::OrKw => parse_binary(p, left, "OR", prec),
        TokenKind::AndKw => parse_binary(p, left, "AND", prec),
        TokenKind::Eq => parse_comparison(p, left, "=", prec),
        TokenKind::NotEq => parse_comparison(p, left, "!=", prec),
        TokenKind::Lt => parse_comparison(p, left, "<", prec),
        TokenKind::Gt => parse_comparison(p, left, ">", prec),
        TokenKind::LtEq => parse_comparison(p, left, "<=", prec),
        TokenKind::GtEq => parse_comparison(p, left, ">=", prec),
        TokenKind::Spaceship => parse_comparison(p, left, "<=>", prec),
        TokenKind::Concat => parse_binary(p, left, "||", prec),
        TokenKind::Plus => parse_binary(p, left, "+", prec),
        TokenKind::Minus => parse_binary(p, left, "-", prec),
        TokenKind::Asterisk => parse_binary(p, left, "*", prec),
        TokenKind::Slash => parse_binary(p, left, "/", prec),
        TokenKind::Percent => parse_binary(p, left, "%", prec),
        TokenKind::DivKw => parse_binary(p, left, "DIV", prec),
        TokenKind::ModKw => parse_binary(p, left, "MOD", prec),
        TokenKind::QuestionMark => parse_ternary(p, left),
        TokenKind::LikeKw => parse_like(p, left, false, false),
        TokenKind::IlikeKw => parse_like(p, left, false, true),
        TokenKind::RegexpKw => parse_regexp(p, left, false),
        TokenKind::InKw => parse_in(p, left, false, false),
        TokenKind::BetweenKw => parse_between(p, left, false),
        TokenKind::IsKw => parse_is(p, left),
        TokenKind::NotKw => match p.peek().kind {
            TokenKind::LikeKw => {
                p.bump();
                parse_like(p, left, true, false)
            }
            TokenKind::IlikeKw => {
                p.bump();
                parse_like(p, left, true, true)
            }
            TokenKind::InKw => {
                p.bump();
                parse_in(p, left, true, false)
            }
            TokenKind::BetweenKw => {
                p.bump();
                parse_between(p, left, true)
            }
            TokenKind::RegexpKw => {
                p.bump();
                parse_regexp(p, left, true)
            }
            // Not an infix NOT; decline without consuming.
            _ => Some(left),
        },
        TokenKind::GlobalKw => match p.peek().kind {
            TokenKind::InKw => {
                p.bump();
                parse_in(p, left, false, true)
            }
            TokenKind::NotKw => {
                p.bump();
                p.bump();
                if !p.at(TokenKind::InKw) {
                    p.expected(TokenKind::InKw);
                    return None;
                }
                parse_in(p, left, true, true)
            }
            _ => Some(left),
        },
        TokenKind::LParen => parse_call(p, left),
        TokenKind::LBracket => parse_array_access(p, left),
        TokenKind::DoubleColon => {
            let pos = left.pos();
            p.bump();
            let ty = parse_data_type(p)?;
            Some(Expr::Cast(CastExpr {
                pos,
                expr: Box::new(left),
                ty: Some(Box::new(ty)),
                type_expr: None,
                syntax: CastSyntax::Operator,
            }))
        }
        TokenKind::Dot => parse_dot(p, left),
        TokenKind::Number => parse_dotted_number(p, left),
        TokenKind::ExceptKw | TokenKind::ReplaceKw | TokenKind::ApplyKw => {
            parse_transformer(p, left)
        }
        _ => Some(left),
    }
}

fn parse_binary(p: &mut Parser, left: Expr, op: &str, prec: u8) -> Option<Expr> {
    let pos = left.pos();
    p.bump();
    let right = parse_subexpr(p, prec)?;
    Some(Expr::Binary(BinaryExpr {
        pos,
        op: op.to_owned(),
        left: Box::new(left),
        right: Box::new(right),
        parenthesized: false,
    }))
}

/// Comparison operators additionally accept the `ANY`/`ALL` subquery
/// modifier; the whole expression is rewritten into a quantifier function
/// call (`>= ANY (…)` becomes `anyGreaterOrEquals`).
fn parse_comparison(p: &mut Parser, left: Expr, op: &str, prec: u8) -> Option<Expr> {
    let pos = left.pos();
    p.bump();

    if matches!(p.kind(), TokenKind::AnyKw | TokenKind::AllKw)
        && p.peek().kind == TokenKind::LParen
    {
        let any = p.at(TokenKind::AnyKw);
        p.bump();
        let sub_pos = p.pos();
        p.bump(); // (
        let statement = query::parse_select_with_union(p)?;
        p.expect(TokenKind::RParen);
        let subquery = Expr::Subquery(Subquery {
            pos: sub_pos,
            select: Box::new(statement),
            alias: None,
        });
        return Some(Expr::Function(FunctionCall {
            pos,
            name: quantifier_function(any, op),
            parameters: None,
            arguments: vec![left, subquery],
            distinct: false,
            over: None,
            settings: None,
            alias: None,
        }));
    }

    let right = parse_subexpr(p, prec)?;
    Some(Expr::Binary(BinaryExpr {
        pos,
        op: op.to_owned(),
        left: Box::new(left),
        right: Box::new(right),
        parenthesized: false,
    }))
}

fn quantifier_function(any: bool, op: &str) -> String {
    let base = match op {
        "=" => "Equals",
        "!=" | "<>" => "NotEquals",
        "<" => "Less",
        ">" => "Greater",
        "<=" => "LessOrEquals",
        ">=" => "GreaterOrEquals",
        _ => "Equals",
    };
    format!("{}{base}", if any { "any" } else { "all" })
}

fn parse_ternary(p: &mut Parser, left: Expr) -> Option<Expr> {
    let pos = left.pos();
    p.bump();
    // ALIAS precedence keeps a trailing `AS` out of the branches.
    let then_branch = parse_subexpr(p, PREC_ALIAS)?;
    p.expect(TokenKind::Colon);
    let else_branch = parse_subexpr(p, PREC_ALIAS)?;
    Some(Expr::Ternary(TernaryExpr {
        pos,
        condition: Box::new(left),
        then_branch: Box::new(then_branch),
        else_branch: Box::new(else_branch),
    }))
}

fn parse_like(p: &mut Parser, left: Expr, negated: bool, case_insensitive: bool) -> Option<Expr> {
    let pos = left.pos();
    p.bump();
    let pattern = parse_subexpr(p, PREC_COMPARE)?;
    Some(Expr::Like(LikeExpr {
        pos,
        negated,
        case_insensitive,
        expr: Box::new(left),
        pattern: Box::new(pattern),
    }))
}

/// `REGEXP` lowers to `match(x, pattern)`, `NOT REGEXP` to the negation of
/// it; the original operator spelling is not preserved.
fn parse_regexp(p: &mut Parser, left: Expr, negated: bool) -> Option<Expr> {
    let pos = left.pos();
    p.bump();
    let pattern = parse_subexpr(p, PREC_COMPARE)?;
    let call = Expr::Function(FunctionCall {
        pos,
        name: "match".to_owned(),
        parameters: None,
        arguments: vec![left, pattern],
        distinct: false,
        over: None,
        settings: None,
        alias: None,
    });
    if negated {
        Some(Expr::Unary(UnaryExpr {
            pos,
            op: "NOT".to_owned(),
            operand: Box::new(call),
        }))
    } else {
        Some(call)
    }
}

fn parse_in(p: &mut Parser, left: Expr, negated: bool, global: bool) -> Option<Expr> {
    let pos = left.pos();
    p.bump(); // IN
    let target = if p.at(TokenKind::LParen) {
        parse_paren(p)?
    } else {
        parse_subexpr(p, PREC_COMPARE)?
    };
    Some(Expr::In(InExpr {
        pos,
        negated,
        global,
        expr: Box::new(left),
        target: Box::new(target),
    }))
}

fn parse_between(p: &mut Parser, left: Expr, negated: bool) -> Option<Expr> {
    let pos = left.pos();
    p.bump();
    // Both bounds stop in front of `AND`.
    let low = parse_subexpr(p, PREC_AND)?;
    p.expect(TokenKind::AndKw);
    let high = parse_subexpr(p, PREC_AND)?;
    Some(Expr::Between(BetweenExpr {
        pos,
        negated,
        expr: Box::new(left),
        low: Box::new(low),
        high: Box::new(high),
    }))
}

fn parse_is(p: &mut Parser, left: Expr) -> Option<Expr> {
    let pos = left.pos();
    p.bump(); // IS
    let negated = p.eat(TokenKind::NotKw);

    if p.eat(TokenKind::NullKw) {
        return Some(Expr::IsNull(IsNullExpr {
            pos,
            negated,
            expr: Box::new(left),
        }));
    }

    if p.at(TokenKind::TrueKw) || p.at(TokenKind::FalseKw) {
        let literal_pos = p.pos();
        let value = p.at(TokenKind::TrueKw);
        p.bump();
        let op = if negated { "!=" } else { "=" };
        return Some(Expr::Binary(BinaryExpr {
            pos,
            op: op.to_owned(),
            left: Box::new(left),
            right: Box::new(Expr::Literal(Literal {
                pos: literal_pos,
                value: LiteralValue::Bool(value),
            })),
            parenthesized: false,
        }));
    }

    if p.eat(TokenKind::DistinctKw) {
        p.expect(TokenKind::FromKw);
        let right = parse_subexpr(p, PREC_COMPARE)?;
        let op = if negated { "=" } else { "!=" };
        return Some(Expr::Binary(BinaryExpr {
            pos,
            op: op.to_owned(),
            left: Box::new(left),
            right: Box::new(right),
            parenthesized: false,
        }));
    }

    p.unexpected("IS");
    None
}

fn parse_call(p: &mut Parser, left: Expr) -> Option<Expr> {
    match left {
        Expr::Identifier(id) if id.alias.is_none() => {
            let pos = id.pos;
            let name = id.name();
            parse_call_body(p, pos, name, None)
        }
        Expr::Function(call)
            if call.parameters.is_none() && call.over.is_none() && call.alias.is_none() =>
        {
            // Parametric aggregate: the first argument list becomes the
            // parameter list.
            let pos = call.pos;
            parse_call_body(p, pos, call.name, Some(call.arguments))
        }
        // `(` after something that cannot be called; decline.
        other => Some(other),
    }
}

pub(crate) fn parse_call_body(
    p: &mut Parser,
    pos: Pos,
    name: String,
    parameters: Option<Vec<Expr>>,
) -> Option<Expr> {
    p.bump(); // (
    let distinct = p.eat(TokenKind::DistinctKw);

    let mut arguments = Vec::new();
    if !p.at(TokenKind::RParen) {
        loop {
            arguments.push(parse_expr(p)?);
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
    }
    p.expect(TokenKind::RParen);
    merge_lambda_params(&mut arguments);

    let mut name = name;
    if matches!(p.kind(), TokenKind::IgnoreKw | TokenKind::RespectKw)
        && p.peek().kind == TokenKind::NullsKw
    {
        p.bump();
        p.bump();
    }
    if p.at(TokenKind::FilterKw) && p.peek().kind == TokenKind::LParen {
        p.bump();
        p.bump();
        p.expect(TokenKind::WhereKw);
        let condition = parse_expr(p)?;
        p.expect(TokenKind::RParen);
        name.push_str("If");
        arguments.push(condition);
    }

    let over = if p.eat(TokenKind::OverKw) {
        let over_pos = p.pos();
        if p.at(TokenKind::LParen) {
            let spec = query::parse_window_spec(p)?;
            Some(OverClause {
                pos: over_pos,
                window_name: None,
                spec: Some(spec),
            })
        } else {
            let window = grammar::parse_ident(p)?;
            Some(OverClause {
                pos: over_pos,
                window_name: Some(window.name),
                spec: None,
            })
        }
    } else {
        None
    };

    Some(Expr::Function(FunctionCall {
        pos,
        name,
        parameters,
        arguments,
        distinct,
        over,
        settings: None,
        alias: None,
    }))
}

/// Recovers `f(acc, x -> body)` as a two-parameter lambda: the initial run
/// of bare single-part identifiers immediately in front of a bare lambda
/// is stripped off and prepended to the lambda's parameter list. This is
/// the one place a node is rewritten after construction; re-running it is
/// a no-op.
fn merge_lambda_params(arguments: &mut Vec<Expr>) {
    let run = arguments
        .iter()
        .position(|arg| {
            !matches!(arg, Expr::Identifier(id) if id.parts.len() == 1 && id.alias.is_none())
        })
        .unwrap_or(arguments.len());
    if run == 0 || run >= arguments.len() {
        return;
    }
    match &arguments[run] {
        Expr::Lambda(lambda) if !lambda.parenthesized => {}
        _ => return,
    }

    let names: Vec<String> = arguments
        .drain(0..run)
        .map(|arg| match arg {
            Expr::Identifier(id) => id.parts.into_iter().next().unwrap().name,
            _ => unreachable!("run only covers bare identifiers"),
        })
        .collect();
    if let Expr::Lambda(lambda) = &mut arguments[0] {
        let mut params = names;
        params.append(&mut lambda.params);
        lambda.params = params;
    }
}

fn parse_array_access(p: &mut Parser, left: Expr) -> Option<Expr> {
    let pos = left.pos();
    p.bump(); // [
    if p.eat(TokenKind::RBracket) {
        // JSON array path `arr[]`.
        return Some(Expr::ArrayAccess(ArrayAccess {
            pos,
            object: Box::new(left),
            index: None,
        }));
    }
    let index = parse_expr(p)?;
    p.expect(TokenKind::RBracket);
    Some(Expr::ArrayAccess(ArrayAccess {
        pos,
        object: Box::new(left),
        index: Some(Box::new(index)),
    }))
}

fn parse_dot(p: &mut Parser, left: Expr) -> Option<Expr> {
    p.bump(); // .
    match left {
        Expr::Identifier(mut id) if id.alias.is_none() => {
            let pos = id.pos;
            if p.eat(TokenKind::Asterisk) {
                return Some(Expr::Asterisk(Asterisk {
                    pos,
                    qualifier: Some(id.parts),
                    transformers: Vec::new(),
                }));
            }
            if p.at(TokenKind::Number) {
                return parse_tuple_index(p, Expr::Identifier(id));
            }
            let part = grammar::parse_ident(p)?;
            id.parts.push(part);
            Some(Expr::Identifier(id))
        }
        other => {
            if p.at(TokenKind::Number) {
                return parse_tuple_index(p, other);
            }
            let pos = other.pos();
            let part = grammar::parse_ident(p)?;
            let name_literal = Expr::Literal(Literal {
                pos,
                value: LiteralValue::String(part.name),
            });
            Some(Expr::Function(FunctionCall {
                pos,
                name: "tupleElement".to_owned(),
                parameters: None,
                arguments: vec![other, name_literal],
                distinct: false,
                over: None,
                settings: None,
                alias: None,
            }))
        }
    }
}

fn parse_tuple_index(p: &mut Parser, object: Expr) -> Option<Expr> {
    let pos = object.pos();
    match p.current().text.parse::<u64>() {
        Ok(index) => {
            p.bump();
            Some(Expr::TupleAccess(TupleAccess {
                pos,
                object: Box::new(object),
                index,
            }))
        }
        Err(_) => {
            p.unexpected("tuple index");
            None
        }
    }
}

/// A NUMBER that begins with '.' right after an expression is tuple
/// access: `t.1` and `t .1` produce identical nodes.
fn parse_dotted_number(p: &mut Parser, left: Expr) -> Option<Expr> {
    let text = p.current().text;
    let digits = &text[1..];
    match digits.parse::<u64>() {
        Ok(index) => {
            let pos = left.pos();
            p.bump();
            Some(Expr::TupleAccess(TupleAccess {
                pos,
                object: Box::new(left),
                index,
            }))
        }
        // Not a plain `.N`; decline without consuming.
        Err(_) => Some(left),
    }
}

/// `EXCEPT`/`REPLACE`/`APPLY` attach to `*` and `COLUMNS(…)` only; on any
/// other operand the handler declines without consuming.
fn parse_transformer(p: &mut Parser, left: Expr) -> Option<Expr> {
    if !matches!(left, Expr::Asterisk(_) | Expr::ColumnsMatcher(_)) {
        return Some(left);
    }

    let pos = p.pos();
    let transformer = match p.kind() {
        TokenKind::ExceptKw => {
            // `EXCEPT` is also a set operator; only a parenthesised list or
            // a plain column name after it reads as a transformer.
            let next = p.peek().kind;
            if next != TokenKind::LParen
                && !(next.is_name() && !grammar::is_clause_keyword(next))
            {
                return Some(left);
            }
            p.bump();
            let mut columns = Vec::new();
            let mut pattern = None;
            if p.eat(TokenKind::LParen) {
                if p.at(TokenKind::String) {
                    pattern = grammar::parse_string_literal(p);
                } else {
                    loop {
                        columns.push(grammar::parse_ident(p)?);
                        if !p.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                p.expect(TokenKind::RParen);
            } else {
                columns.push(grammar::parse_ident(p)?);
            }
            ColumnsTransformer::Except {
                pos,
                columns,
                pattern,
            }
        }
        TokenKind::ReplaceKw => {
            p.bump();
            let parens = p.eat(TokenKind::LParen);
            let mut items = Vec::new();
            loop {
                let item_pos = p.pos();
                let expr = parse_subexpr(p, PREC_ALIAS)?;
                p.expect(TokenKind::AsKw);
                let column = grammar::parse_ident(p)?;
                items.push(ReplaceItem {
                    pos: item_pos,
                    expr: Box::new(expr),
                    column,
                });
                if !(parens && p.eat(TokenKind::Comma)) {
                    break;
                }
            }
            if parens {
                p.expect(TokenKind::RParen);
            }
            ColumnsTransformer::Replace { pos, items }
        }
        _ => {
            p.bump(); // APPLY
            let parens = p.eat(TokenKind::LParen);
            let func = grammar::parse_ident(p)?;
            if parens {
                p.expect(TokenKind::RParen);
            }
            ColumnsTransformer::Apply { pos, func }
        }
    };

    Some(match left {
        Expr::Asterisk(mut node) => {
            node.transformers.push(transformer);
            Expr::Asterisk(node)
        }
        Expr::ColumnsMatcher(mut node) => {
            node.transformers.push(transformer);
            Expr::ColumnsMatcher(node)
        }
        _ => unreachable!("guarded above"),
    })
}

fn parse_lambda(p: &mut Parser, left: Expr) -> Option<Expr> {
    let pos = left.pos();
    let params = match &left {
        Expr::Identifier(id) if id.parts.len() == 1 && id.alias.is_none() => {
            vec![id.parts[0].name.clone()]
        }
        Expr::Literal(Literal {
            value: LiteralValue::Tuple(items),
            ..
        }) => {
            let mut params = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Expr::Identifier(id) if id.parts.len() == 1 => {
                        params.push(id.parts[0].name.clone());
                    }
                    _ => {
                        p.unexpected("lambda parameters");
                        return None;
                    }
                }
            }
            params
        }
        _ => {
            p.unexpected("lambda parameters");
            return None;
        }
    };

    p.bump(); // ->
    let body = parse_subexpr(p, PREC_ALIAS)?;
    Some(Expr::Lambda(Lambda {
        pos,
        params,
        body: Box::new(body),
        parenthesized: false,
    }))
}

/// A type name with optional parameters: nested types, literal parameters
/// and `name Type` pairs. `Object`/`JSON` arguments get their dedicated
/// wrapper.
pub(crate) fn parse_data_type(p: &mut Parser) -> Option<Expr> {
    let pos = p.pos();
    if p.at(TokenKind::String) {
        let value = grammar::parse_string_literal(p)?;
        return Some(Expr::Literal(Literal {
            pos,
            value: LiteralValue::String(value),
        }));
    }

    let name = grammar::parse_ident(p)?;
    let object_like =
        name.name.eq_ignore_ascii_case("Object") || name.name.eq_ignore_ascii_case("JSON");

    let mut params = Vec::new();
    let mut has_parens = false;
    if p.at(TokenKind::LParen) {
        has_parens = true;
        p.bump();
        if !p.at(TokenKind::RParen) {
            loop {
                let param = parse_type_param(p)?;
                params.push(if object_like {
                    let param_pos = param.pos();
                    Expr::ObjectTypeArg(ObjectTypeArgument {
                        pos: param_pos,
                        arg: Box::new(param),
                    })
                } else {
                    param
                });
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        p.expect(TokenKind::RParen);
    }

    Some(Expr::DataType(DataType {
        pos,
        name,
        params,
        has_parens,
    }))
}

fn parse_type_param(p: &mut Parser) -> Option<Expr> {
    let pos = p.pos();
    if p.kind().is_name() && p.peek().kind.is_name() {
        let name = grammar::parse_ident(p)?;
        let ty = parse_data_type(p)?;
        return Some(Expr::NameTypePair(NameTypePair {
            pos,
            name,
            ty: Box::new(ty),
        }));
    }
    if p.kind().is_name() {
        return parse_data_type(p);
    }
    parse_subexpr(p, PREC_ALIAS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(input: &str) -> Expr {
        let mut parser = Parser::new(input);
        let expr = parse_expr(&mut parser).expect("expression parses");
        assert!(parser.errors.is_empty(), "{:?}", parser.errors);
        expr
    }

    #[test]
    fn precedence_mul_over_add() {
        let e = expr("1 + 2 * 3");
        match e {
            Expr::Binary(b) => {
                assert_eq!(b.op, "+");
                assert!(matches!(*b.right, Expr::Binary(ref inner) if inner.op == "*"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn negative_number_folds_into_literal() {
        let e = expr("-5");
        assert!(matches!(
            e,
            Expr::Literal(Literal {
                value: LiteralValue::Int {
                    value: 5,
                    negative: true
                },
                ..
            })
        ));
    }

    #[test]
    fn not_with_parens_binds_tight() {
        // `NOT (0) + 1` parses as `(NOT 0) + 1`.
        let e = expr("NOT (0) + 1");
        assert!(matches!(e, Expr::Binary(ref b) if b.op == "+"));

        // `NOT 0 + 1` parses as `NOT (0 + 1)`.
        let e = expr("NOT 0 + 1");
        assert!(matches!(e, Expr::Unary(ref u) if u.op == "NOT"));
    }

    #[test]
    fn lambda_merge_recovers_parameters() {
        let e = expr("arrayMap(acc, x -> acc + x, [1, 2, 3])");
        match e {
            Expr::Function(call) => {
                assert_eq!(call.arguments.len(), 2);
                match &call.arguments[0] {
                    Expr::Lambda(lambda) => {
                        assert_eq!(lambda.params, vec!["acc".to_owned(), "x".to_owned()]);
                    }
                    other => panic!("unexpected {other:?}"),
                }
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parenthesized_lambda_refuses_merge() {
        let e = expr("f(acc, (x -> x), 1)");
        match e {
            Expr::Function(call) => assert_eq!(call.arguments.len(), 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parametric_aggregate_reenters() {
        let e = expr("quantiles(0.5, 0.9)(x)");
        match e {
            Expr::Function(call) => {
                assert_eq!(call.name, "quantiles");
                assert_eq!(call.parameters.as_ref().map(Vec::len), Some(2));
                assert_eq!(call.arguments.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn tuple_access_with_and_without_space() {
        let a = expr("t.1");
        let b = expr("t .1");
        match (a, b) {
            (Expr::TupleAccess(a), Expr::TupleAccess(b)) => {
                assert_eq!(a.index, b.index);
                assert_eq!(a.index, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn any_subquery_comparison_is_rewritten() {
        let e = expr("x >= ANY (SELECT 1)");
        match e {
            Expr::Function(call) => assert_eq!(call.name, "anyGreaterOrEquals"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn keyword_as_identifier() {
        let e = expr("key");
        assert!(matches!(e, Expr::Identifier(ref id) if id.name() == "key"));
    }

    #[test]
    fn cast_operator_marks_syntax() {
        let e = expr("x::UInt8");
        match e {
            Expr::Cast(cast) => {
                assert_eq!(cast.syntax, CastSyntax::Operator);
                assert!(cast.ty.is_some());
                assert!(cast.type_expr.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
