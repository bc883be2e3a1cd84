// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

use clicksql::{explain_all, parse, CancelToken, ParseError};
use pretty_assertions::assert_eq;

#[test]
fn multi_statement_split() {
    let parse = parse("SELECT 1;; ;SELECT 2;", &CancelToken::new());
    assert!(parse.ok(), "{:?}", parse.errors);
    assert_eq!(parse.statements.len(), 2);
}

#[test]
fn cancellation_between_statements() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let parse = parse("SELECT 1", &cancel);
    assert!(parse.statements.is_empty());
    assert_eq!(parse.errors, vec![ParseError::Cancelled]);
}

#[test]
fn partial_result_carries_both_statements_and_errors() {
    let parse = parse("SELECT 1; SELECT (1; SELECT 2", &CancelToken::new());
    assert_eq!(parse.statements.len(), 3);
    assert!(!parse.ok());
    let rendered = parse.errors[0].to_string();
    assert!(rendered.contains("line 1"), "{rendered}");
}

#[test]
fn parse_is_deterministic() {
    let input = "SELECT a, b + 1 FROM t WHERE a BETWEEN 1 AND 2 ORDER BY b DESC LIMIT 3, 4";
    let first = parse(input, &CancelToken::new());
    let second = parse(input, &CancelToken::new());
    assert!(first.ok());
    assert_eq!(
        explain_all(&first.statements),
        explain_all(&second.statements)
    );
}

#[test]
fn special_floats_serialize_as_strings() {
    let parse = parse("SELECT NaN, Inf, -Inf", &CancelToken::new());
    assert!(parse.ok(), "{:?}", parse.errors);
    let json = serde_json::to_string(&parse.statements).expect("AST serialises");
    assert!(json.contains("\"NaN\""), "{json}");
    assert!(json.contains("\"+Inf\""), "{json}");
    assert!(json.contains("\"-Inf\""), "{json}");
}

#[test]
fn positions_stay_inside_the_source() {
    let input = "SELECT 1;\nSELECT 2";
    let parse = parse(input, &CancelToken::new());
    assert!(parse.ok());
    let positions: Vec<u32> = parse.statements.iter().map(|s| s.pos().offset).collect();
    assert_eq!(positions, vec![0, 10]);
    assert!(positions.iter().all(|&offset| (offset as usize) < input.len()));
    assert_eq!(parse.statements[1].pos().line, 2);
}

#[test]
fn limit_comma_canonicalisation() {
    let a = parse("SELECT 1 LIMIT 2, 3", &CancelToken::new());
    let b = parse("SELECT 1 LIMIT 3 OFFSET 2", &CancelToken::new());
    assert!(a.ok() && b.ok());
    assert_eq!(explain_all(&a.statements), explain_all(&b.statements));
}

#[test]
fn format_data_is_discarded() {
    let parse = parse(
        "INSERT INTO t FORMAT CSV\n1,\"a\"\n2,\"b\"\n;SELECT 1",
        &CancelToken::new(),
    );
    assert!(parse.ok(), "{:?}", parse.errors);
    assert_eq!(parse.statements.len(), 2);
}
