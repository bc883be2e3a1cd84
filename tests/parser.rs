// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Golden-file harness: every case directory under `tests/queries/` holds
//! a `query.sql`, the expected dump(s) in `explain.txt` /
//! `explain_<N>.txt`, and an optional `metadata.json` with the flags
//! `skip`, `explain`, `parse_error` and `explain_todo`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use clicksql::{explain, parse, CancelToken};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Metadata {
    skip: bool,
    explain: Option<bool>,
    parse_error: bool,
    explain_todo: HashMap<String, bool>,
    #[allow(dead_code)]
    source: Option<String>,
}

/// Case-insensitive comparison with per-line trimming; the generator
/// header and any trailing server-error sentinel are stripped.
fn normalize(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text
        .lines()
        .map(|line| line.trim().to_lowercase())
        .collect();
    if let Some(first) = lines.first() {
        if first.starts_with("-- generated by") {
            lines.remove(0);
        }
    }
    while let Some(last) = lines.last() {
        if last.is_empty() || last.starts_with("code:") {
            lines.pop();
        } else {
            break;
        }
    }
    lines
}

fn test_query(path: &Path) -> datatest_stable::Result<()> {
    let dir = path.parent().expect("query.sql lives in a case directory");
    let metadata: Metadata = match fs::read_to_string(dir.join("metadata.json")) {
        Ok(raw) => serde_json::from_str(&raw)?,
        Err(_) => Metadata::default(),
    };
    if metadata.skip {
        return Ok(());
    }

    let text = fs::read_to_string(path)?;
    let result = parse(&text, &CancelToken::new());

    if metadata.parse_error {
        assert!(
            !result.errors.is_empty(),
            "expected a parse failure for {}",
            path.display()
        );
        return Ok(());
    }
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert!(!result.statements.is_empty(), "no statements parsed");

    if metadata.explain == Some(false) {
        return Ok(());
    }

    for (index, statement) in result.statements.iter().enumerate() {
        let todo_key = format!("stmt{}", index + 1);
        if metadata.explain_todo.get(&todo_key).copied().unwrap_or(false) {
            continue;
        }

        let golden = if index == 0 {
            dir.join("explain.txt")
        } else {
            dir.join(format!("explain_{}.txt", index + 1))
        };
        if !golden.exists() {
            continue;
        }
        let expected = fs::read_to_string(&golden)?;
        let actual = explain(statement);
        assert_eq!(
            normalize(&expected),
            normalize(&actual),
            "statement {} of {} does not match {}",
            index + 1,
            path.display(),
            golden.display()
        );
    }
    Ok(())
}

datatest_stable::harness! {
    { test = test_query, root = "tests/queries", pattern = r"^(.*)query\.sql$" },
}
