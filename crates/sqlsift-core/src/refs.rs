//! Reference extraction.
//!
//! Tables and columns follow different policies on purpose. Table
//! references come from the scope tree: CTE references are excluded (a
//! CTE is not a physical table) while the tables backing each CTE are
//! included, each table reported once at its first appearance. Column
//! references come straight from the AST in source order, without
//! de-duplication and spelled exactly as written.

use std::collections::HashSet;

use crate::ast::{
    Expr, InsertSource, Query, Select, SetExpr, Statement, TableRef,
};
use crate::scope::{ScopeId, ScopeTree, Source};

/// Collects every physical table a statement touches.
///
/// Names are schema-qualified where the statement qualifies them,
/// de-duplicated, in order of first appearance.
#[must_use]
pub fn table_references(statement: &Statement) -> Vec<String> {
    let tree = ScopeTree::build(statement);
    let mut collector = TableCollector {
        tree: &tree,
        visited: HashSet::new(),
        seen: HashSet::new(),
        out: Vec::new(),
    };
    collector.visit(ScopeTree::root());
    collector.out
}

struct TableCollector<'t, 'a> {
    tree: &'t ScopeTree<'a>,
    /// Guards against revisiting a scope reached through several
    /// bindings (a CTE referenced twice, or recursively).
    visited: HashSet<ScopeId>,
    seen: HashSet<String>,
    out: Vec<String>,
}

impl TableCollector<'_, '_> {
    fn visit(&mut self, id: ScopeId) {
        if !self.visited.insert(id) {
            return;
        }
        let scope = self.tree.scope(id);
        for binding in &scope.bindings {
            match binding.source {
                Source::Table { schema, name } => {
                    let qualified = match schema {
                        Some(schema) => format!("{schema}.{name}"),
                        None => String::from(name),
                    };
                    if self.seen.insert(qualified.clone()) {
                        self.out.push(qualified);
                    }
                }
                Source::Cte { scope } | Source::Derived { scope } => self.visit(scope),
            }
        }
        for subscope in &scope.subscopes {
            self.visit(*subscope);
        }
    }
}

/// Collects every column reference in a statement, in source order.
///
/// Duplicates are kept (each occurrence is its own reference) and each
/// name is spelled as written, qualifier included. Wildcards are not
/// column references.
#[must_use]
pub fn column_references(statement: &Statement) -> Vec<String> {
    let mut out = Vec::new();
    walk_statement(statement, &mut out);
    out
}

fn walk_statement(statement: &Statement, out: &mut Vec<String>) {
    match statement {
        Statement::Query(query) => walk_query(query, out),
        Statement::Insert(insert) => {
            out.extend(insert.columns.iter().cloned());
            match &insert.source {
                InsertSource::Values(rows) => {
                    for row in rows {
                        for expr in row {
                            walk_expr(expr, out);
                        }
                    }
                }
                InsertSource::Query(query) => walk_query(query, out),
                InsertSource::DefaultValues => {}
            }
        }
        Statement::Update(update) => {
            for assignment in &update.assignments {
                out.push(assignment.column.clone());
                walk_expr(&assignment.value, out);
            }
            for table_ref in &update.from {
                walk_table_ref(table_ref, out);
            }
            if let Some(expr) = &update.where_clause {
                walk_expr(expr, out);
            }
        }
        Statement::Delete(delete) => {
            if let Some(expr) = &delete.where_clause {
                walk_expr(expr, out);
            }
        }
    }
}

fn walk_query(query: &Query, out: &mut Vec<String>) {
    if let Some(with) = &query.with {
        for cte in &with.ctes {
            walk_query(&cte.query, out);
        }
    }
    walk_set_expr(&query.body, out);
    for entry in &query.order_by {
        walk_expr(&entry.expr, out);
    }
    if let Some(limit) = &query.limit {
        if let Some(expr) = &limit.limit {
            walk_expr(expr, out);
        }
        if let Some(expr) = &limit.offset {
            walk_expr(expr, out);
        }
    }
}

fn walk_set_expr(body: &SetExpr, out: &mut Vec<String>) {
    match body {
        SetExpr::Select(select) => walk_select(select, out),
        SetExpr::SetOp { left, right, .. } => {
            walk_set_expr(left, out);
            walk_set_expr(right, out);
        }
    }
}

fn walk_select(select: &Select, out: &mut Vec<String>) {
    for column in &select.columns {
        walk_expr(&column.expr, out);
    }
    for table_ref in &select.from {
        walk_table_ref(table_ref, out);
    }
    if let Some(expr) = &select.where_clause {
        walk_expr(expr, out);
    }
    for expr in &select.group_by {
        walk_expr(expr, out);
    }
    if let Some(expr) = &select.having {
        walk_expr(expr, out);
    }
}

fn walk_table_ref(table_ref: &TableRef, out: &mut Vec<String>) {
    match table_ref {
        TableRef::Table { .. } => {}
        TableRef::Derived { query, .. } => walk_query(query, out),
        TableRef::Join { left, join } => {
            walk_table_ref(left, out);
            walk_table_ref(&join.table, out);
            out.extend(join.using.iter().cloned());
            if let Some(on) = &join.on {
                walk_expr(on, out);
            }
        }
    }
}

fn walk_expr(expr: &Expr, out: &mut Vec<String>) {
    match expr {
        Expr::Column { table, name, .. } => {
            let reference = match table {
                Some(table) => format!("{table}.{name}"),
                None => name.clone(),
            };
            out.push(reference);
        }
        Expr::Literal(_) | Expr::Wildcard { .. } => {}
        Expr::Binary { left, right, .. } => {
            walk_expr(left, out);
            walk_expr(right, out);
        }
        Expr::Unary { operand, .. } => walk_expr(operand, out),
        Expr::IsNull { expr, .. } => walk_expr(expr, out),
        Expr::InList { expr, list, .. } => {
            walk_expr(expr, out);
            for item in list {
                walk_expr(item, out);
            }
        }
        Expr::InSubquery { expr, query, .. } => {
            walk_expr(expr, out);
            walk_query(query, out);
        }
        Expr::Between {
            expr, low, high, ..
        } => {
            walk_expr(expr, out);
            walk_expr(low, out);
            walk_expr(high, out);
        }
        Expr::Case {
            operand,
            when_clauses,
            else_clause,
        } => {
            if let Some(operand) = operand {
                walk_expr(operand, out);
            }
            for (condition, result) in when_clauses {
                walk_expr(condition, out);
                walk_expr(result, out);
            }
            if let Some(else_clause) = else_clause {
                walk_expr(else_clause, out);
            }
        }
        Expr::Cast { expr, .. } => walk_expr(expr, out),
        Expr::Function(call) => {
            for arg in &call.args {
                walk_expr(arg, out);
            }
        }
        Expr::Exists { query } => walk_query(query, out),
        Expr::Subquery(query) => walk_query(query, out),
        Expr::Paren(inner) => walk_expr(inner, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::GENERIC;
    use crate::parser::parse;

    fn tables(sql: &str) -> Vec<String> {
        table_references(&parse(sql, &GENERIC).unwrap())
    }

    fn columns(sql: &str) -> Vec<String> {
        column_references(&parse(sql, &GENERIC).unwrap())
    }

    #[test]
    fn test_tables_deduplicated_first_appearance() {
        assert_eq!(
            tables("SELECT * FROM users u JOIN orders o ON u.id = o.user_id JOIN users m ON m.id = o.manager_id"),
            vec!["users", "orders"]
        );
    }

    #[test]
    fn test_tables_keep_schema_qualifier() {
        assert_eq!(
            tables("SELECT * FROM app.users, users"),
            vec!["app.users", "users"]
        );
    }

    #[test]
    fn test_cte_is_not_a_table_but_its_backing_tables_are() {
        assert_eq!(
            tables(
                "WITH order_summary AS (SELECT p.category_id FROM products p \
                 JOIN categories c ON p.category_id = c.id) \
                 SELECT * FROM order_summary"
            ),
            vec!["products", "categories"]
        );
    }

    #[test]
    fn test_tables_in_subqueries_and_derived_tables() {
        assert_eq!(
            tables(
                "SELECT * FROM (SELECT id FROM a) d \
                 WHERE id IN (SELECT a_id FROM b) AND EXISTS (SELECT 1 FROM c)"
            ),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_dml_target_is_a_table() {
        assert_eq!(
            tables("INSERT INTO audit_log SELECT * FROM events"),
            vec!["audit_log", "events"]
        );
    }

    #[test]
    fn test_columns_source_order_no_dedup() {
        assert_eq!(
            columns(
                "SELECT u.id, o.order_date FROM users u \
                 JOIN orders o ON u.id = o.user_id"
            ),
            vec!["u.id", "o.order_date", "u.id", "o.user_id"]
        );
    }

    #[test]
    fn test_columns_spelled_as_written() {
        // Qualified and unqualified occurrences stay distinct entries.
        assert_eq!(
            columns("SELECT id, t.id FROM t WHERE id > 0"),
            vec!["id", "t.id", "id"]
        );
    }

    #[test]
    fn test_wildcards_are_not_columns() {
        assert_eq!(columns("SELECT *, t.* FROM t"), Vec::<String>::new());
    }

    #[test]
    fn test_using_columns_are_references() {
        assert_eq!(
            columns("SELECT a.x FROM a JOIN b USING (id)"),
            vec!["a.x", "id"]
        );
    }

    #[test]
    fn test_update_columns() {
        assert_eq!(
            columns("UPDATE t SET a = b + 1 WHERE c = 2"),
            vec!["a", "b", "c"]
        );
    }
}
