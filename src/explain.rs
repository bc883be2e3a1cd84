// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements the `EXPLAIN AST` tree dump.
//!
//! A second traversal reshapes the AST into the reference engine's dump
//! conventions: binary operators become `Function <name>` nodes, `BETWEEN`
//! expands to a conjunction or disjunction, `CASE` splits into `multiIf`
//! and `caseWithExpression`, a lambda gains a synthetic `tuple` parameter
//! node, and so on. The dump is rebuilt as a small label/children tree
//! first so the `(children N)` counts always match what is printed.

use crate::ast::*;

/// Renders one statement in the reference dump format.
pub fn explain(statement: &Statement) -> String {
    let mut out = String::new();
    render(&statement_node(statement), 0, &mut out);
    out
}

/// Renders a statement sequence; dumps are concatenated in order.
pub fn explain_all(statements: &[Statement]) -> String {
    let mut out = String::new();
    for statement in statements {
        render(&statement_node(statement), 0, &mut out);
    }
    out
}

struct Node {
    label: String,
    children: Vec<Node>,
}

impl Node {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    fn with(label: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }
}

fn render(node: &Node, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push(' ');
    }
    out.push_str(&node.label);
    if !node.children.is_empty() {
        out.push_str(&format!(" (children {})", node.children.len()));
    }
    out.push('\n');
    for child in &node.children {
        render(child, depth + 1, out);
    }
}

fn expression_list(exprs: &[Expr]) -> Node {
    Node::with("ExpressionList", exprs.iter().map(expr_node).collect())
}

fn function(name: impl Into<String>, args: Vec<Node>) -> Node {
    Node::with(
        format!("Function {}", name.into()),
        vec![Node::with("ExpressionList", args)],
    )
}

fn alias_suffix(label: &mut String, alias: Option<&str>) {
    if let Some(alias) = alias {
        label.push_str(&format!(" (alias {alias})"));
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            other => out.push(other),
        }
    }
    out
}

fn quoted(s: &str) -> String {
    format!("\\'{}\\'", escape_string(s))
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        "nan".to_owned()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "inf".to_owned()
        } else {
            "-inf".to_owned()
        }
    } else {
        format!("{value}")
    }
}

/// The scalar dump text of a literal value, or `None` when an array/tuple
/// holds a non-constant element and must print as a function instead.
fn literal_text(value: &LiteralValue) -> Option<String> {
    match value {
        LiteralValue::String(s) => Some(quoted(s)),
        LiteralValue::Int { value, negative } => Some(if *negative {
            format!("Int64_-{value}")
        } else {
            format!("UInt64_{value}")
        }),
        LiteralValue::Float { value, source } => Some(format!(
            "Float64_{}",
            source.clone().unwrap_or_else(|| format_float(*value))
        )),
        LiteralValue::Bool(b) => Some(if *b { "Bool_1" } else { "Bool_0" }.to_owned()),
        LiteralValue::Null => Some("NULL".to_owned()),
        LiteralValue::Array(items) => {
            let inner = collect_literal_items(items)?;
            Some(format!("Array_[{}]", inner.join(", ")))
        }
        LiteralValue::Tuple(items) => {
            let inner = collect_literal_items(items)?;
            Some(format!("Tuple_({})", inner.join(", ")))
        }
    }
}

fn collect_literal_items(items: &[Expr]) -> Option<Vec<String>> {
    items
        .iter()
        .map(|item| match item {
            Expr::Literal(literal) => literal_text(&literal.value),
            _ => None,
        })
        .collect()
}

fn literal_node(literal: &Literal) -> Node {
    if let Some(text) = literal_text(&literal.value) {
        return Node::new(format!("Literal {text}"));
    }
    // Non-constant collection: print the constructor function.
    match &literal.value {
        LiteralValue::Array(items) => {
            function("array", items.iter().map(expr_node).collect())
        }
        LiteralValue::Tuple(items) => {
            function("tuple", items.iter().map(expr_node).collect())
        }
        _ => unreachable!("scalars always have a dump text"),
    }
}

fn binary_function_name(op: &str) -> &'static str {
    match op {
        "+" => "plus",
        "-" => "minus",
        "*" => "multiply",
        "/" => "divide",
        "%" | "MOD" => "modulo",
        "DIV" => "intDiv",
        "=" => "equals",
        "!=" | "<>" => "notEquals",
        "<" => "less",
        ">" => "greater",
        "<=" => "lessOrEquals",
        ">=" => "greaterOrEquals",
        "<=>" => "equals",
        "AND" => "and",
        "OR" => "or",
        "||" => "concat",
        _ => "equals",
    }
}

fn extract_function_name(field: &str) -> String {
    match field {
        "YEAR" => "toYear".to_owned(),
        "MONTH" => "toMonth".to_owned(),
        "DAY" => "toDayOfMonth".to_owned(),
        "HOUR" => "toHour".to_owned(),
        "MINUTE" => "toMinute".to_owned(),
        "SECOND" => "toSecond".to_owned(),
        other => format!("to{}", capitalize(other)),
    }
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Renders a data-type expression back to the textual form used inside the
/// quoted `CAST` type literal.
fn type_text(expr: &Expr) -> String {
    match expr {
        Expr::DataType(d) => {
            if d.params.is_empty() && !d.has_parens {
                d.name.name.clone()
            } else {
                let params: Vec<String> = d.params.iter().map(type_text).collect();
                format!("{}({})", d.name.name, params.join(", "))
            }
        }
        Expr::NameTypePair(pair) => format!("{} {}", pair.name.name, type_text(&pair.ty)),
        Expr::ObjectTypeArg(arg) => type_text(&arg.arg),
        Expr::Identifier(id) => id.name(),
        Expr::Literal(literal) => match &literal.value {
            LiteralValue::String(s) => quoted(s),
            LiteralValue::Int { value, negative } => {
                if *negative {
                    format!("-{value}")
                } else {
                    value.to_string()
                }
            }
            LiteralValue::Float { value, source } => {
                source.clone().unwrap_or_else(|| format_float(*value))
            }
            other => literal_text(other).unwrap_or_default(),
        },
        Expr::Binary(b) => format!("{} {} {}", type_text(&b.left), b.op, type_text(&b.right)),
        Expr::Function(f) => {
            let args: Vec<String> = f.arguments.iter().map(type_text).collect();
            format!("{}({})", f.name, args.join(", "))
        }
        other => format!("{:?}", other.kind()),
    }
}

fn expr_node(expr: &Expr) -> Node {
    match expr {
        Expr::Identifier(id) => {
            let mut label = format!("Identifier {}", id.name());
            alias_suffix(&mut label, id.alias.as_deref());
            Node::new(label)
        }
        Expr::TableIdentifier(t) => {
            let mut label = format!("TableIdentifier {}", t.name());
            alias_suffix(&mut label, t.alias.as_deref());
            Node::new(label)
        }
        Expr::Literal(literal) => literal_node(literal),
        Expr::Asterisk(asterisk) => asterisk_node(asterisk),
        Expr::ColumnsMatcher(matcher) => columns_matcher_node(matcher),
        Expr::Function(call) => function_call_node(call),
        Expr::Binary(b) => function(
            binary_function_name(&b.op),
            vec![expr_node(&b.left), expr_node(&b.right)],
        ),
        Expr::Unary(u) => {
            let name = match u.op.as_str() {
                "-" => "negate",
                "~" => "bitNot",
                _ => "not",
            };
            function(name, vec![expr_node(&u.operand)])
        }
        Expr::Ternary(t) => function(
            "if",
            vec![
                expr_node(&t.condition),
                expr_node(&t.then_branch),
                expr_node(&t.else_branch),
            ],
        ),
        Expr::Subquery(s) => {
            let mut label = "Subquery".to_owned();
            alias_suffix(&mut label, s.alias.as_deref());
            Node::with(label, vec![statement_node(&s.select)])
        }
        Expr::With(w) => {
            let label = match &w.name {
                Some(name) => format!("WithElement {name}"),
                None => "WithElement".to_owned(),
            };
            Node::with(label, vec![expr_node(&w.expr)])
        }
        Expr::Case(case) => case_node(case),
        Expr::Cast(cast) => cast_node(cast),
        Expr::Extract(extract) => function(
            extract_function_name(&extract.field),
            vec![expr_node(&extract.expr)],
        ),
        Expr::Interval(interval) => function(
            format!("toInterval{}", capitalize(&interval.unit)),
            vec![expr_node(&interval.value)],
        ),
        Expr::ArrayAccess(access) => match &access.index {
            Some(index) => function(
                "arrayElement",
                vec![expr_node(&access.object), expr_node(index)],
            ),
            // The JSON-array-path form prints transparently.
            None => expr_node(&access.object),
        },
        Expr::TupleAccess(access) => function(
            "tupleElement",
            vec![
                expr_node(&access.object),
                Node::new(format!("Literal UInt64_{}", access.index)),
            ],
        ),
        Expr::Lambda(lambda) => {
            let params: Vec<Node> = lambda
                .params
                .iter()
                .map(|name| Node::new(format!("Identifier {name}")))
                .collect();
            function("lambda", vec![function("tuple", params), expr_node(&lambda.body)])
        }
        Expr::Parameter(parameter) => {
            if parameter.positional {
                Node::new("QueryParameter ?")
            } else {
                let name = parameter.name.as_deref().unwrap_or_default();
                match &parameter.ty {
                    Some(ty) => Node::new(format!("QueryParameter {name}:{ty}")),
                    None => Node::new(format!("QueryParameter {name}")),
                }
            }
        }
        Expr::Aliased(aliased) => {
            let mut node = expr_node(&aliased.expr);
            alias_suffix(&mut node.label, Some(&aliased.alias));
            node
        }
        Expr::Between(between) => between_node(between),
        Expr::In(in_expr) => {
            let name = match (in_expr.global, in_expr.negated) {
                (false, false) => "in",
                (false, true) => "notIn",
                (true, false) => "globalIn",
                (true, true) => "globalNotIn",
            };
            function(name, vec![expr_node(&in_expr.expr), expr_node(&in_expr.target)])
        }
        Expr::IsNull(is_null) => function(
            if is_null.negated { "isNotNull" } else { "isNull" },
            vec![expr_node(&is_null.expr)],
        ),
        Expr::Like(like) => {
            let name = match (like.case_insensitive, like.negated) {
                (false, false) => "like",
                (false, true) => "notLike",
                (true, false) => "ilike",
                (true, true) => "notILike",
            };
            function(name, vec![expr_node(&like.expr), expr_node(&like.pattern)])
        }
        Expr::Exists(exists) => function("exists", vec![expr_node(&exists.subquery)]),
        Expr::DataType(_) | Expr::NameTypePair(_) | Expr::ObjectTypeArg(_) => {
            Node::new(format!("DataType {}", type_text(expr)))
        }
    }
}

fn function_call_node(call: &FunctionCall) -> Node {
    let mut name = call.name.clone();
    if call.distinct {
        name.push_str("Distinct");
    }
    let mut label = format!("Function {name}");
    alias_suffix(&mut label, call.alias.as_deref());

    let mut children = vec![expression_list(&call.arguments)];
    if let Some(parameters) = &call.parameters {
        children.push(expression_list(parameters));
    }
    if let Some(over) = &call.over {
        children.push(over_node(over));
    }
    Node::with(label, children)
}

fn over_node(over: &OverClause) -> Node {
    match (&over.window_name, &over.spec) {
        (Some(name), _) => Node::new(format!("Identifier {name}")),
        (None, Some(spec)) => window_spec_node(spec, "WindowDefinition"),
        (None, None) => Node::new("WindowDefinition"),
    }
}

fn window_spec_node(spec: &WindowSpec, label: impl Into<String>) -> Node {
    let mut children = Vec::new();
    if let Some(partition_by) = &spec.partition_by {
        children.push(expression_list(partition_by));
    }
    if let Some(order_by) = &spec.order_by {
        children.push(Node::with(
            "ExpressionList",
            order_by.iter().map(order_by_element).collect(),
        ));
    }
    if let Some(frame) = &spec.frame {
        children.push(window_frame_node(frame));
    }
    Node::with(label, children)
}

fn window_frame_node(frame: &WindowFrame) -> Node {
    let mut children = vec![frame_bound_node(&frame.begin)];
    if let Some(end) = &frame.end {
        children.push(frame_bound_node(end));
    }
    Node::with(format!("WindowFrame {}", frame.kind.as_str()), children)
}

fn frame_bound_node(bound: &FrameBound) -> Node {
    match bound {
        FrameBound::CurrentRow => Node::new("FrameBound CURRENT ROW"),
        FrameBound::UnboundedPreceding => Node::new("FrameBound UNBOUNDED PRECEDING"),
        FrameBound::UnboundedFollowing => Node::new("FrameBound UNBOUNDED FOLLOWING"),
        FrameBound::Preceding(expr) => Node::with("FrameBound PRECEDING", vec![expr_node(expr)]),
        FrameBound::Following(expr) => Node::with("FrameBound FOLLOWING", vec![expr_node(expr)]),
    }
}

fn asterisk_node(asterisk: &Asterisk) -> Node {
    let label = if asterisk.qualifier.is_some() {
        "QualifiedAsterisk"
    } else {
        "Asterisk"
    };
    let mut children = Vec::new();
    if let Some(qualifier) = &asterisk.qualifier {
        let name = qualifier
            .iter()
            .map(|part| part.name.as_str())
            .collect::<Vec<_>>()
            .join(".");
        children.push(Node::new(format!("Identifier {name}")));
    }
    if !asterisk.transformers.is_empty() {
        children.push(transformer_list(&asterisk.transformers));
    }
    Node::with(label, children)
}

fn columns_matcher_node(matcher: &ColumnsMatcher) -> Node {
    let mut children = Vec::new();
    let label = if let Some(pattern) = &matcher.pattern {
        children.push(Node::new(format!("Literal {}", quoted(pattern))));
        "ColumnsRegexpMatcher"
    } else {
        children.push(Node::with(
            "ExpressionList",
            matcher
                .columns
                .iter()
                .map(|part| Node::new(format!("Identifier {}", part.name)))
                .collect(),
        ));
        "ColumnsListMatcher"
    };
    if !matcher.transformers.is_empty() {
        children.push(transformer_list(&matcher.transformers));
    }
    Node::with(label, children)
}

fn transformer_list(transformers: &[ColumnsTransformer]) -> Node {
    Node::with(
        "ColumnsTransformerList",
        transformers.iter().map(transformer_node).collect(),
    )
}

fn transformer_node(transformer: &ColumnsTransformer) -> Node {
    match transformer {
        ColumnsTransformer::Except {
            columns, pattern, ..
        } => {
            let children = match pattern {
                Some(pattern) => vec![Node::new(format!("Literal {}", quoted(pattern)))],
                None => columns
                    .iter()
                    .map(|part| Node::new(format!("Identifier {}", part.name)))
                    .collect(),
            };
            Node::with("ColumnsExceptTransformer", children)
        }
        ColumnsTransformer::Replace { items, .. } => Node::with(
            "ColumnsReplaceTransformer",
            items
                .iter()
                .map(|item| {
                    let mut node = expr_node(&item.expr);
                    alias_suffix(&mut node.label, Some(&item.column.name));
                    node
                })
                .collect(),
        ),
        ColumnsTransformer::Apply { func, .. } => {
            Node::new(format!("ColumnsApplyTransformer {}", func.name))
        }
    }
}

fn case_node(case: &CaseExpr) -> Node {
    let mut args = Vec::new();
    let name = if let Some(operand) = &case.operand {
        args.push(expr_node(operand));
        "caseWithExpression"
    } else {
        "multiIf"
    };
    for branch in &case.branches {
        args.push(expr_node(&branch.condition));
        args.push(expr_node(&branch.result));
    }
    match &case.else_branch {
        Some(else_branch) => args.push(expr_node(else_branch)),
        // The engine supplies NULL for a missing ELSE.
        None => args.push(Node::new("Literal NULL")),
    }
    function(name, args)
}

fn cast_node(cast: &CastExpr) -> Node {
    let type_child = match (&cast.ty, &cast.type_expr) {
        (Some(ty), _) => {
            let text = match ty.as_ref() {
                Expr::Literal(Literal {
                    value: LiteralValue::String(s),
                    ..
                }) => s.clone(),
                other => type_text(other),
            };
            Node::new(format!("Literal {}", quoted(&text)))
        }
        (None, Some(dynamic)) => expr_node(dynamic),
        (None, None) => Node::new("Literal NULL"),
    };
    function("CAST", vec![expr_node(&cast.expr), type_child])
}

fn between_node(between: &BetweenExpr) -> Node {
    if between.negated {
        function(
            "or",
            vec![
                function("less", vec![expr_node(&between.expr), expr_node(&between.low)]),
                function(
                    "greater",
                    vec![expr_node(&between.expr), expr_node(&between.high)],
                ),
            ],
        )
    } else {
        function(
            "and",
            vec![
                function(
                    "greaterOrEquals",
                    vec![expr_node(&between.expr), expr_node(&between.low)],
                ),
                function(
                    "lessOrEquals",
                    vec![expr_node(&between.expr), expr_node(&between.high)],
                ),
            ],
        )
    }
}

fn order_by_element(order: &OrderExpr) -> Node {
    let mut children = vec![expr_node(&order.expr)];
    if let Some(collate) = &order.collate {
        children.push(Node::new(format!("Literal {}", quoted(collate))));
    }
    if let Some(fill) = &order.fill {
        if let Some(from) = &fill.from {
            children.push(expr_node(from));
        }
        if let Some(to) = &fill.to {
            children.push(expr_node(to));
        }
        if let Some(step) = &fill.step {
            children.push(expr_node(step));
        }
    }
    Node::with("OrderByElement", children)
}

fn tables_node(tables: &TablesInSelect) -> Node {
    Node::with(
        "TablesInSelectQuery",
        tables.elements.iter().map(tables_element_node).collect(),
    )
}

fn tables_element_node(element: &TablesElement) -> Node {
    let mut children = Vec::new();
    if let Some(array_join) = &element.array_join {
        let label = if array_join.left {
            "ArrayJoin LEFT"
        } else {
            "ArrayJoin"
        };
        children.push(Node::with(
            label,
            vec![expression_list(&array_join.expressions)],
        ));
    }
    if let Some(table) = &element.table {
        children.push(Node::with("TableExpression", vec![expr_node(&table.expr)]));
    }
    if let Some(join) = &element.join {
        children.push(table_join_node(join));
    }
    Node::with("TablesInSelectQueryElement", children)
}

fn table_join_node(join: &TableJoin) -> Node {
    let mut children = Vec::new();
    if let Some(on) = &join.on {
        children.push(expr_node(on));
    }
    if let Some(using) = &join.using {
        children.push(expression_list(using));
    }
    Node::with("TableJoin", children)
}

fn group_by_node(group_by: &GroupBy) -> Node {
    match group_by.kind {
        GroupByKind::Exprs | GroupByKind::All => expression_list(&group_by.exprs),
        GroupByKind::Rollup => function("rollup", group_by.exprs.iter().map(expr_node).collect()),
        GroupByKind::Cube => function("cube", group_by.exprs.iter().map(expr_node).collect()),
        GroupByKind::GroupingSets => Node::with(
            "ExpressionList",
            group_by
                .sets
                .iter()
                .map(|set| expression_list(set))
                .collect(),
        ),
    }
}

fn select_node(select: &Select) -> Node {
    let mut children = Vec::new();

    if let Some(with) = &select.with {
        children.push(expression_list(with));
    }
    children.push(expression_list(&select.columns));
    if let Some(from) = &select.from {
        children.push(tables_node(from));
    }
    if let Some(prewhere) = &select.prewhere {
        children.push(expr_node(prewhere));
    }
    if let Some(where_clause) = &select.where_clause {
        children.push(expr_node(where_clause));
    }
    if let Some(group_by) = &select.group_by {
        children.push(group_by_node(group_by));
    }
    if let Some(having) = &select.having {
        children.push(expr_node(having));
    }
    if let Some(qualify) = &select.qualify {
        children.push(expr_node(qualify));
    }
    if let Some(windows) = &select.windows {
        children.push(Node::with(
            "ExpressionList",
            windows
                .iter()
                .map(|def| window_spec_node(&def.spec, format!("WindowDefinition {}", def.name)))
                .collect(),
        ));
    }
    if let Some(order_by) = &select.order_by {
        children.push(Node::with(
            "ExpressionList",
            order_by.iter().map(order_by_element).collect(),
        ));
    }
    if let Some(limit_by) = &select.limit_by {
        if let Some(offset) = &limit_by.offset {
            children.push(expr_node(offset));
        }
        children.push(expr_node(&limit_by.limit));
        children.push(expression_list(&limit_by.by));
    }
    if let Some(limit) = &select.limit {
        if let Some(offset) = &limit.offset {
            children.push(expr_node(offset));
        }
        children.push(expr_node(&limit.limit));
    }
    if let Some(offset) = &select.offset {
        children.push(expr_node(offset));
    }
    if select.settings.is_some() {
        children.push(Node::new("SetQuery"));
    }
    if let Some(into_outfile) = &select.into_outfile {
        children.push(Node::new(format!("Literal {}", quoted(&into_outfile.path))));
    }
    if let Some(format) = &select.format {
        children.push(Node::new(format!("Identifier {}", format.name)));
    }

    Node::with("SelectQuery", children)
}

fn partition_node(partition: &Partition) -> Node {
    match partition {
        Partition::Expr { expr, .. } => expr_node(expr),
        Partition::Id { id, .. } => Node::new(format!("Literal {}", quoted(id))),
        Partition::All { .. } => Node::new("Identifier ALL"),
    }
}

fn column_decl_node(column: &ColumnDecl) -> Node {
    let mut children = Vec::new();
    if let Some(data_type) = &column.data_type {
        let rendered = match column.nullable {
            Some(true) => format!("Nullable({})", type_text(data_type)),
            _ => type_text(data_type),
        };
        children.push(Node::new(format!("DataType {rendered}")));
    }
    if let Some(default_expr) = &column.default_expr {
        let kind = column
            .default_kind
            .map(ColumnDefaultKind::as_str)
            .unwrap_or("DEFAULT");
        children.push(Node::with(
            format!("ColumnDefault {kind}"),
            vec![expr_node(default_expr)],
        ));
    }
    if let Some(codec) = &column.codec {
        children.push(expr_node(codec));
    }
    if let Some(ttl) = &column.ttl {
        children.push(expr_node(ttl));
    }
    if let Some(comment) = &column.comment {
        children.push(Node::new(format!("Literal {}", quoted(comment))));
    }
    Node::with(format!("ColumnDeclaration {}", column.name.name), children)
}

fn index_def_node(index: &IndexDef) -> Node {
    let mut children = vec![
        expr_node(&index.expr),
        Node::new(format!("DataType {}", type_text(&index.index_type))),
    ];
    if let Some(granularity) = &index.granularity {
        children.push(expr_node(granularity));
    }
    Node::with(format!("IndexDeclaration {}", index.name.name), children)
}

fn constraint_node(constraint: &ConstraintDef) -> Node {
    Node::with(
        format!("Constraint {}", constraint.name.name),
        vec![expr_node(&constraint.expr)],
    )
}

fn projection_node(projection: &ProjectionDef) -> Node {
    Node::with(
        format!("Projection {}", projection.name.name),
        vec![statement_node(&projection.select)],
    )
}

fn ttl_clause_node(ttl: &TtlClause) -> Node {
    let mut children = vec![expr_node(&ttl.expr)];
    if let Some(group_by) = &ttl.group_by {
        children.push(expression_list(group_by));
    }
    if let Some(set) = &ttl.set {
        for item in set {
            children.push(function(
                "equals",
                vec![
                    Node::new(format!("Identifier {}", item.column.name)),
                    expr_node(&item.value),
                ],
            ));
        }
    }
    if let Some(where_clause) = &ttl.where_clause {
        children.push(expr_node(where_clause));
    }
    Node::with("TTLElement", children)
}

fn storage_node(options: &TableOptions) -> Node {
    let mut children = Vec::new();
    if let Some(engine) = &options.engine {
        let engine_children = if engine.params.is_empty() {
            Vec::new()
        } else {
            vec![expression_list(&engine.params)]
        };
        children.push(Node::with(
            format!("Function {}", engine.name),
            engine_children,
        ));
    }
    if let Some(partition_by) = &options.partition_by {
        children.push(expr_node(partition_by));
    }
    if let Some(primary_key) = &options.primary_key {
        children.push(expr_node(primary_key));
    }
    if let Some(order_by) = &options.order_by {
        children.push(expr_node(order_by));
    }
    if let Some(sample_by) = &options.sample_by {
        children.push(expr_node(sample_by));
    }
    if let Some(ttl) = &options.ttl {
        children.push(ttl_clause_node(ttl));
    }
    if options.settings.is_some() {
        children.push(Node::new("SetQuery"));
    }
    Node::with("Storage", children)
}

fn create_node(create: &Create) -> Node {
    match create {
        Create::Table(table) => {
            let mut children = Vec::new();
            if !table.elements.is_empty() {
                children.push(Node::with(
                    "Columns",
                    table
                        .elements
                        .iter()
                        .map(|element| match element {
                            TableElement::Column(column) => column_decl_node(column),
                            TableElement::Index(index) => index_def_node(index),
                            TableElement::Constraint(constraint) => constraint_node(constraint),
                            TableElement::Projection(projection) => projection_node(projection),
                        })
                        .collect(),
                ));
            }
            if !table.options.is_empty() {
                children.push(storage_node(&table.options));
            }
            if let Some(as_select) = &table.as_select {
                children.push(statement_node(as_select));
            }
            if let Some(as_table) = &table.as_table {
                children.push(Node::new(format!("TableIdentifier {}", as_table.name())));
            }
            if let Some(as_function) = &table.as_function {
                children.push(expr_node(as_function));
            }
            Node::with(format!("CreateQuery {}", table.table.name()), children)
        }
        Create::Database(database) => {
            let mut children = Vec::new();
            if let Some(engine) = &database.engine {
                let engine_children = if engine.params.is_empty() {
                    Vec::new()
                } else {
                    vec![expression_list(&engine.params)]
                };
                children.push(Node::with(
                    format!("Function {}", engine.name),
                    engine_children,
                ));
            }
            Node::with(
                format!("CreateDatabaseQuery {}", database.name.name),
                children,
            )
        }
        Create::View(view) => {
            let mut children = Vec::new();
            if let Some(to) = &view.to {
                children.push(Node::new(format!("TableIdentifier {}", to.name())));
            }
            if !view.options.is_empty() {
                children.push(storage_node(&view.options));
            }
            if let Some(select) = &view.select {
                children.push(statement_node(select));
            }
            let label = if view.materialized {
                format!("CreateMaterializedViewQuery {}", view.table.name())
            } else {
                format!("CreateViewQuery {}", view.table.name())
            };
            Node::with(label, children)
        }
        Create::Dictionary(dictionary) => {
            let mut children = Vec::new();
            if !dictionary.attributes.is_empty() {
                children.push(Node::with(
                    "DictionaryAttributes",
                    dictionary
                        .attributes
                        .iter()
                        .map(|attribute| {
                            Node::with(
                                format!("DictionaryAttribute {}", attribute.name.name),
                                vec![Node::new(format!(
                                    "DataType {}",
                                    type_text(&attribute.data_type)
                                ))],
                            )
                        })
                        .collect(),
                ));
            }
            if let Some(primary_key) = &dictionary.primary_key {
                children.push(expression_list(primary_key));
            }
            for clause in [
                &dictionary.source,
                &dictionary.layout,
                &dictionary.lifetime,
                &dictionary.range,
            ]
            .into_iter()
            .flatten()
            {
                children.push(expr_node(clause));
            }
            Node::with(
                format!("CreateDictionaryQuery {}", dictionary.name.name()),
                children,
            )
        }
        Create::Function(func) => Node::with(
            format!("CreateFunctionQuery {}", func.name.name),
            vec![expr_node(&func.body)],
        ),
        Create::User(user) => {
            let names: Vec<&str> = user.names.iter().map(|n| n.name.as_str()).collect();
            Node::new(format!("CreateUserQuery {}", names.join(", ")))
        }
        Create::Index(index) => Node::with(
            format!("CreateIndexQuery {}", index.name.name),
            {
                let mut children = vec![
                    Node::new(format!("TableIdentifier {}", index.table.name())),
                    expr_node(&index.expr),
                ];
                if let Some(index_type) = &index.index_type {
                    children.push(Node::new(format!("DataType {}", type_text(index_type))));
                }
                children
            },
        ),
        Create::NamedCollection(collection) => Node::new(format!(
            "CreateNamedCollectionQuery {}",
            collection.name.name
        )),
    }
}

fn alter_command_node(command: &AlterCommand) -> Node {
    let mut children = Vec::new();
    match command {
        AlterCommand::AddColumn { column, after, .. } => {
            children.push(column_decl_node(column));
            if let Some(after) = after {
                children.push(Node::new(format!("Identifier {}", after.name)));
            }
        }
        AlterCommand::DropColumn { name, .. }
        | AlterCommand::DropIndex { name, .. }
        | AlterCommand::DropConstraint { name, .. }
        | AlterCommand::DropProjection { name, .. } => {
            children.push(Node::new(format!("Identifier {}", name.name)));
        }
        AlterCommand::ModifyColumn { column, .. } => children.push(column_decl_node(column)),
        AlterCommand::RenameColumn { from, to, .. } => {
            children.push(Node::new(format!("Identifier {}", from.name)));
            children.push(Node::new(format!("Identifier {}", to.name)));
        }
        AlterCommand::ClearColumn {
            name, partition, ..
        }
        | AlterCommand::MaterializeColumn {
            name, partition, ..
        }
        | AlterCommand::ClearIndex {
            name, partition, ..
        }
        | AlterCommand::MaterializeIndex {
            name, partition, ..
        }
        | AlterCommand::ClearProjection {
            name, partition, ..
        }
        | AlterCommand::MaterializeProjection {
            name, partition, ..
        } => {
            children.push(Node::new(format!("Identifier {}", name.name)));
            if let Some(partition) = partition {
                children.push(partition_node(partition));
            }
        }
        AlterCommand::CommentColumn { name, comment, .. } => {
            children.push(Node::new(format!("Identifier {}", name.name)));
            children.push(Node::new(format!("Literal {}", quoted(comment))));
        }
        AlterCommand::AddIndex { index, .. } => children.push(index_def_node(index)),
        AlterCommand::AddConstraint { constraint, .. } => {
            children.push(constraint_node(constraint));
        }
        AlterCommand::AddProjection { projection, .. } => {
            children.push(projection_node(projection));
        }
        AlterCommand::AddStatistics { columns, .. }
        | AlterCommand::ModifyStatistics { columns, .. }
        | AlterCommand::DropStatistics { columns, .. }
        | AlterCommand::ClearStatistics { columns, .. }
        | AlterCommand::MaterializeStatistics { columns, .. } => {
            for column in columns {
                children.push(Node::new(format!("Identifier {}", column.name)));
            }
        }
        AlterCommand::DetachPartition { partition, .. }
        | AlterCommand::DropPartition { partition, .. } => {
            children.push(partition_node(partition));
        }
        AlterCommand::AttachPartition {
            partition, from, ..
        } => {
            children.push(partition_node(partition));
            if let Some(from) = from {
                children.push(Node::new(format!("TableIdentifier {}", from.name())));
            }
        }
        AlterCommand::ReplacePartition {
            partition, from, ..
        } => {
            children.push(partition_node(partition));
            children.push(Node::new(format!("TableIdentifier {}", from.name())));
        }
        AlterCommand::FreezePartition { partition, .. } => {
            if let Some(partition) = partition {
                children.push(partition_node(partition));
            }
        }
        AlterCommand::FetchPartition {
            partition, from, ..
        } => {
            children.push(partition_node(partition));
            children.push(Node::new(format!("Literal {}", quoted(from))));
        }
        AlterCommand::Delete {
            in_partition,
            where_clause,
            ..
        } => {
            if let Some(partition) = in_partition {
                children.push(partition_node(partition));
            }
            children.push(expr_node(where_clause));
        }
        AlterCommand::Update {
            assignments,
            in_partition,
            where_clause,
            ..
        } => {
            for assignment in assignments {
                children.push(function(
                    "equals",
                    vec![
                        Node::new(format!("Identifier {}", assignment.column.name)),
                        expr_node(&assignment.value),
                    ],
                ));
            }
            if let Some(partition) = in_partition {
                children.push(partition_node(partition));
            }
            children.push(expr_node(where_clause));
        }
        AlterCommand::ModifyTtl { ttl, .. } => children.push(ttl_clause_node(ttl)),
        AlterCommand::RemoveTtl { .. } => {}
        AlterCommand::ModifySettings { .. } => children.push(Node::new("SetQuery")),
    }
    Node::with(format!("AlterCommand {}", command.kind()), children)
}

fn insert_node(insert: &Insert) -> Node {
    let mut children = Vec::new();
    if let Some(table) = &insert.table {
        children.push(Node::new(format!("TableIdentifier {}", table.name())));
    }
    if let Some(function_expr) = &insert.function {
        children.push(expr_node(function_expr));
    }
    match &insert.columns {
        Some(InsertColumns::Star) => children.push(Node::new("Asterisk")),
        Some(InsertColumns::List(columns)) => {
            children.push(Node::with(
                "ExpressionList",
                columns
                    .iter()
                    .map(|column| Node::new(format!("Identifier {}", column.name())))
                    .collect(),
            ));
        }
        None => {}
    }
    if let Some(partition_by) = &insert.partition_by {
        children.push(expr_node(partition_by));
    }
    if insert.settings.is_some() {
        children.push(Node::new("SetQuery"));
    }
    if let Some(infile) = &insert.infile {
        children.push(Node::new(format!("Literal {}", quoted(&infile.path))));
    }
    match &insert.source {
        InsertSource::Values { rows, .. } => {
            children.push(Node::with(
                "ExpressionList",
                rows.iter().map(|row| values_row_node(row)).collect(),
            ));
        }
        InsertSource::Select(statement) => children.push(statement_node(statement)),
        InsertSource::Format { name, .. } => {
            children.push(Node::new(format!("Identifier {}", name.name)));
        }
        InsertSource::None => {}
    }
    Node::with("InsertQuery", children)
}

fn values_row_node(row: &[Expr]) -> Node {
    if let Some(items) = collect_literal_items(row) {
        Node::new(format!("Literal Tuple_({})", items.join(", ")))
    } else {
        function("tuple", row.iter().map(expr_node).collect())
    }
}

fn show_node(show: &Show) -> Node {
    let mut children = Vec::new();
    if let Some(target) = &show.target {
        children.push(Node::new(format!("TableIdentifier {}", target.name())));
    }
    if let Some(from) = &show.from {
        children.push(Node::new(format!("Identifier {}", from.name)));
    }
    if let Some(like) = &show.like {
        children.push(Node::new(format!("Literal {}", quoted(&like.pattern))));
    }
    if let Some(where_clause) = &show.where_clause {
        children.push(expr_node(where_clause));
    }
    if let Some(limit) = &show.limit {
        children.push(expr_node(limit));
    }
    Node::with(format!("ShowQuery {}", show.ty.as_str()), children)
}

fn show_access_node(show: &ShowAccess) -> Node {
    let label = match show.kind {
        ShowAccessKind::Privileges => "ShowPrivilegesQuery".to_owned(),
        ShowAccessKind::Grants => "ShowGrantsQuery".to_owned(),
        ShowAccessKind::CreateUser => "ShowCreateUserQuery".to_owned(),
        ShowAccessKind::CreateRole => "ShowCreateRoleQuery".to_owned(),
        ShowAccessKind::CreateRowPolicy => "ShowCreateRowPolicyQuery".to_owned(),
        ShowAccessKind::CreateQuota => "ShowCreateQuotaQuery".to_owned(),
        ShowAccessKind::CreateSettingsProfile => "ShowCreateSettingsProfileQuery".to_owned(),
    };
    if show.names.is_empty() {
        Node::new(label)
    } else {
        Node::new(format!("{label} {}", show.names.join(", ")))
    }
}

fn access_control_node(access: &AccessControl) -> Node {
    let action = match access.action {
        AccessAction::Create => "Create",
        AccessAction::Alter => "Alter",
        AccessAction::Drop => "Drop",
    };
    let entity = match access.entity {
        AccessEntity::Role => "Role",
        AccessEntity::RowPolicy => "RowPolicy",
        AccessEntity::Quota => "Quota",
        AccessEntity::SettingsProfile => "SettingsProfile",
        AccessEntity::Resource => "Resource",
        AccessEntity::Workload => "Workload",
    };
    if access.names.is_empty() {
        Node::new(format!("{action}{entity}Query"))
    } else {
        Node::new(format!("{action}{entity}Query {}", access.names.join(", ")))
    }
}

fn statement_node(statement: &Statement) -> Node {
    match statement {
        Statement::SelectWithUnion(swu) => Node::with(
            "SelectWithUnionQuery",
            vec![Node::with(
                "ExpressionList",
                swu.selects.iter().map(statement_node).collect(),
            )],
        ),
        Statement::SelectIntersectExcept(sie) => Node::with(
            "SelectIntersectExceptQuery",
            sie.selects.iter().map(statement_node).collect(),
        ),
        Statement::Select(select) => select_node(select),
        Statement::Insert(insert) => insert_node(insert),
        Statement::Create(create) => create_node(create),
        Statement::Drop(drop) => Node::with(
            format!("DropQuery {}", drop.target.as_str()),
            drop.names
                .iter()
                .map(|name| Node::new(format!("TableIdentifier {}", name.name())))
                .collect(),
        ),
        Statement::Alter(alter) => Node::with(
            format!("AlterQuery {}", alter.table.name()),
            alter.commands.iter().map(alter_command_node).collect(),
        ),
        Statement::Truncate(truncate) => {
            let children = truncate
                .target
                .iter()
                .map(|target| Node::new(format!("TableIdentifier {}", target.name())))
                .collect();
            let label = if truncate.database {
                "TruncateQuery DATABASE"
            } else {
                "TruncateQuery TABLE"
            };
            Node::with(label, children)
        }
        Statement::Use(use_stmt) => Node::new(format!("UseQuery {}", use_stmt.database.name)),
        Statement::Describe(describe) => {
            let mut children = Vec::new();
            if let Some(table) = &describe.table {
                children.push(Node::new(format!("TableIdentifier {}", table.name())));
            }
            if let Some(function_expr) = &describe.function {
                children.push(expr_node(function_expr));
            }
            Node::with("DescribeQuery", children)
        }
        Statement::Show(show) => show_node(show),
        Statement::ShowAccess(show) => show_access_node(show),
        Statement::Explain(explain) => {
            let mut label = format!("ExplainQuery {}", explain.kind.as_str());
            if let Some(options) = &explain.options {
                label.push_str(&format!(" ({options})"));
            }
            let children = explain
                .statement
                .iter()
                .map(|inner| statement_node(inner))
                .collect();
            Node::with(label, children)
        }
        Statement::Set(_) => Node::new("SetQuery"),
        Statement::SetRole(set_role) => {
            let kind = match set_role.kind {
                SetRoleKind::Default => "DEFAULT",
                SetRoleKind::None => "NONE",
                SetRoleKind::All => "ALL",
                SetRoleKind::Roles => "ROLES",
            };
            Node::with(
                format!("SetRoleQuery {kind}"),
                set_role
                    .roles
                    .iter()
                    .map(|role| Node::new(format!("Identifier {}", role.name)))
                    .collect(),
            )
        }
        Statement::Optimize(optimize) => {
            let mut children = vec![Node::new(format!(
                "TableIdentifier {}",
                optimize.table.name()
            ))];
            if let Some(partition) = &optimize.partition {
                children.push(partition_node(partition));
            }
            if let Some(by) = &optimize.deduplicate_by {
                children.push(expression_list(by));
            }
            Node::with("OptimizeQuery", children)
        }
        Statement::System(system) => {
            let children = system
                .target
                .iter()
                .map(|target| Node::new(format!("TableIdentifier {}", target.name())))
                .collect();
            Node::with(format!("SystemQuery {}", system.command), children)
        }
        Statement::Rename(rename) => Node::with(
            "RenameQuery",
            rename
                .pairs
                .iter()
                .flat_map(|pair| {
                    [
                        Node::new(format!("TableIdentifier {}", pair.from.name())),
                        Node::new(format!("TableIdentifier {}", pair.to.name())),
                    ]
                })
                .collect(),
        ),
        Statement::Exchange(exchange) => Node::with(
            "ExchangeQuery",
            vec![
                Node::new(format!("TableIdentifier {}", exchange.left.name())),
                Node::new(format!("TableIdentifier {}", exchange.right.name())),
            ],
        ),
        Statement::Exists(exists) => Node::with(
            format!("ExistsQuery {}", exists.kind.as_str()),
            vec![Node::new(format!(
                "TableIdentifier {}",
                exists.target.name()
            ))],
        ),
        Statement::Detach(detach) => Node::with(
            format!("DetachQuery {}", detach.kind.as_str()),
            vec![Node::new(format!(
                "TableIdentifier {}",
                detach.target.name()
            ))],
        ),
        Statement::Attach(attach) => Node::with(
            format!("AttachQuery {}", attach.kind.as_str()),
            vec![Node::new(format!(
                "TableIdentifier {}",
                attach.target.name()
            ))],
        ),
        Statement::Check(check) => {
            let mut children = vec![Node::new(format!(
                "TableIdentifier {}",
                check.table.name()
            ))];
            if let Some(partition) = &check.partition {
                children.push(partition_node(partition));
            }
            Node::with("CheckQuery", children)
        }
        Statement::Grant(grant) => {
            let mut label = format!("GrantQuery {}", grant.privileges.join(", "));
            if let Some(on) = &grant.on {
                label.push_str(&format!(" ON {on}"));
            }
            Node::with(
                label,
                grant
                    .grantees
                    .iter()
                    .map(|grantee| Node::new(format!("Identifier {}", grantee.name)))
                    .collect(),
            )
        }
        Statement::Transaction(transaction) => {
            Node::new(format!("TransactionControl {}", transaction.kind.as_str()))
        }
        Statement::AccessControl(access) => access_control_node(access),
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{CancelToken, Parser};
    use expect_test::{expect, Expect};

    fn check(input: &str, expected: Expect) {
        let parse = Parser::new(input).parse_statements(&CancelToken::new());
        assert!(parse.errors.is_empty(), "{:?}", parse.errors);
        assert_eq!(parse.statements.len(), 1, "{:?}", parse.statements);
        expected.assert_eq(&super::explain(&parse.statements[0]));
    }

    #[test]
    fn select_literal() {
        check(
            "SELECT 1",
            expect![[r#"
                SelectWithUnionQuery (children 1)
                 ExpressionList (children 1)
                  SelectQuery (children 1)
                   ExpressionList (children 1)
                    Literal UInt64_1
            "#]],
        );
    }

    #[test]
    fn arithmetic_precedence() {
        check(
            "SELECT 1 + 2 * 3",
            expect![[r#"
                SelectWithUnionQuery (children 1)
                 ExpressionList (children 1)
                  SelectQuery (children 1)
                   ExpressionList (children 1)
                    Function plus (children 1)
                     ExpressionList (children 2)
                      Literal UInt64_1
                      Function multiply (children 1)
                       ExpressionList (children 2)
                        Literal UInt64_2
                        Literal UInt64_3
            "#]],
        );
    }

    #[test]
    fn where_in_tuple() {
        check(
            "SELECT * FROM t WHERE id IN (1,2,3)",
            expect![[r#"
                SelectWithUnionQuery (children 1)
                 ExpressionList (children 1)
                  SelectQuery (children 3)
                   ExpressionList (children 1)
                    Asterisk
                   TablesInSelectQuery (children 1)
                    TablesInSelectQueryElement (children 1)
                     TableExpression (children 1)
                      TableIdentifier t
                   Function in (children 1)
                    ExpressionList (children 2)
                     Identifier id
                     Literal Tuple_(UInt64_1, UInt64_2, UInt64_3)
            "#]],
        );
    }

    #[test]
    fn case_without_operand_is_multi_if() {
        check(
            "SELECT CASE WHEN x>0 THEN 'a' ELSE 'b' END",
            expect![[r#"
                SelectWithUnionQuery (children 1)
                 ExpressionList (children 1)
                  SelectQuery (children 1)
                   ExpressionList (children 1)
                    Function multiIf (children 1)
                     ExpressionList (children 3)
                      Function greater (children 1)
                       ExpressionList (children 2)
                        Identifier x
                        Literal UInt64_0
                      Literal \'a\'
                      Literal \'b\'
            "#]],
        );
    }

    #[test]
    fn union_all_with_intersect_grouping() {
        check(
            "SELECT 1 UNION ALL SELECT 2 INTERSECT SELECT 3",
            expect![[r#"
                SelectWithUnionQuery (children 1)
                 ExpressionList (children 2)
                  SelectQuery (children 1)
                   ExpressionList (children 1)
                    Literal UInt64_1
                  SelectIntersectExceptQuery (children 2)
                   SelectQuery (children 1)
                    ExpressionList (children 1)
                     Literal UInt64_2
                   SelectQuery (children 1)
                    ExpressionList (children 1)
                     Literal UInt64_3
            "#]],
        );
    }

    #[test]
    fn lambda_gains_tuple_parameter_node() {
        check(
            "SELECT arrayMap(acc, x -> acc + x, [1,2,3])",
            expect![[r#"
                SelectWithUnionQuery (children 1)
                 ExpressionList (children 1)
                  SelectQuery (children 1)
                   ExpressionList (children 1)
                    Function arrayMap (children 1)
                     ExpressionList (children 2)
                      Function lambda (children 1)
                       ExpressionList (children 2)
                        Function tuple (children 1)
                         ExpressionList (children 2)
                          Identifier acc
                          Identifier x
                        Function plus (children 1)
                         ExpressionList (children 2)
                          Identifier acc
                          Identifier x
                      Literal Array_[UInt64_1, UInt64_2, UInt64_3]
            "#]],
        );
    }

    #[test]
    fn between_expands_to_conjunction() {
        check(
            "SELECT x BETWEEN 1 AND 2",
            expect![[r#"
                SelectWithUnionQuery (children 1)
                 ExpressionList (children 1)
                  SelectQuery (children 1)
                   ExpressionList (children 1)
                    Function and (children 1)
                     ExpressionList (children 2)
                      Function greaterOrEquals (children 1)
                       ExpressionList (children 2)
                        Identifier x
                        Literal UInt64_1
                      Function lessOrEquals (children 1)
                       ExpressionList (children 2)
                        Identifier x
                        Literal UInt64_2
            "#]],
        );
    }

    #[test]
    fn extract_becomes_to_year() {
        check(
            "SELECT EXTRACT(YEAR FROM d)",
            expect![[r#"
                SelectWithUnionQuery (children 1)
                 ExpressionList (children 1)
                  SelectQuery (children 1)
                   ExpressionList (children 1)
                    Function toYear (children 1)
                     ExpressionList (children 1)
                      Identifier d
            "#]],
        );
    }

    #[test]
    fn cast_type_prints_as_quoted_string() {
        check(
            "SELECT CAST(x AS UInt8)",
            expect![[r#"
                SelectWithUnionQuery (children 1)
                 ExpressionList (children 1)
                  SelectQuery (children 1)
                   ExpressionList (children 1)
                    Function CAST (children 1)
                     ExpressionList (children 2)
                      Identifier x
                      Literal \'UInt8\'
            "#]],
        );
    }

    #[test]
    fn qualified_asterisk() {
        check(
            "SELECT t.* FROM t",
            expect![[r#"
                SelectWithUnionQuery (children 1)
                 ExpressionList (children 1)
                  SelectQuery (children 2)
                   ExpressionList (children 1)
                    QualifiedAsterisk (children 1)
                     Identifier t
                   TablesInSelectQuery (children 1)
                    TablesInSelectQueryElement (children 1)
                     TableExpression (children 1)
                      TableIdentifier t
            "#]],
        );
    }

    #[test]
    fn limit_with_comma_is_offset_and_limit() {
        let a = {
            let parse = Parser::new("SELECT 1 LIMIT 3, 5").parse_statements(&CancelToken::new());
            assert!(parse.errors.is_empty());
            super::explain(&parse.statements[0])
        };
        let b = {
            let parse =
                Parser::new("SELECT 1 LIMIT 5 OFFSET 3").parse_statements(&CancelToken::new());
            assert!(parse.errors.is_empty());
            super::explain(&parse.statements[0])
        };
        assert_eq!(a, b);
    }
}
