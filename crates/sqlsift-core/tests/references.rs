//! Table and column reference extraction.

use pretty_assertions::assert_eq;
use sqlsift_core::{column_references, table_references};

fn tables(sql: &str) -> Vec<String> {
    table_references(sql, "").unwrap_or_else(|status| panic!("{}", status.message))
}

fn columns(sql: &str) -> Vec<String> {
    column_references(sql, "").unwrap_or_else(|status| panic!("{}", status.message))
}

#[test]
fn join_query_worked_example() {
    let sql = "SELECT u.id, o.order_date FROM users u JOIN orders o ON u.id = o.user_id";
    assert_eq!(tables(sql), vec!["users", "orders"]);
    assert_eq!(
        columns(sql),
        vec!["u.id", "o.order_date", "u.id", "o.user_id"]
    );
}

#[test]
fn tables_are_deduplicated_by_first_appearance() {
    assert_eq!(
        tables("SELECT * FROM a JOIN b ON a.x = b.x JOIN a a2 ON a2.x = b.x"),
        vec!["a", "b"]
    );
}

#[test]
fn cte_names_are_not_tables_but_their_sources_are() {
    assert_eq!(
        tables(
            "WITH order_summary AS (\
               SELECT p.category_id, c.name FROM products p \
               JOIN categories c ON p.category_id = c.id) \
             SELECT name FROM order_summary"
        ),
        vec!["products", "categories"]
    );
}

#[test]
fn chained_ctes() {
    assert_eq!(
        tables(
            "WITH a AS (SELECT id FROM raw_events), \
                  b AS (SELECT id FROM a JOIN users ON a.id = users.id) \
             SELECT * FROM b"
        ),
        vec!["raw_events", "users"]
    );
}

#[test]
fn subqueries_contribute_tables() {
    assert_eq!(
        tables(
            "SELECT * FROM (SELECT id FROM inner_a) d \
             WHERE d.id IN (SELECT a_id FROM inner_b)"
        ),
        vec!["inner_a", "inner_b"]
    );
}

#[test]
fn schema_qualified_names_stay_qualified() {
    assert_eq!(
        tables("SELECT * FROM sales.orders o JOIN customers c ON o.customer_id = c.id"),
        vec!["sales.orders", "customers"]
    );
}

#[test]
fn dml_statements_have_references_too() {
    assert_eq!(
        tables("INSERT INTO archive SELECT * FROM events WHERE age > 90"),
        vec!["archive", "events"]
    );
    assert_eq!(
        columns("UPDATE t SET total = price * qty WHERE id = 7"),
        vec!["total", "price", "qty", "id"]
    );
}

#[test]
fn columns_keep_duplicates_and_spelling() {
    assert_eq!(
        columns("SELECT id, id, t.id FROM t WHERE id > 0"),
        vec!["id", "id", "t.id", "id"]
    );
}

#[test]
fn wildcards_are_not_column_references() {
    assert_eq!(columns("SELECT *, u.* FROM users u"), Vec::<String>::new());
}

#[test]
fn columns_inside_nested_expressions() {
    assert_eq!(
        columns(
            "SELECT CASE WHEN status = 'new' THEN created_at ELSE updated_at END \
             FROM tickets ORDER BY priority"
        ),
        vec!["status", "created_at", "updated_at", "priority"]
    );
}

#[test]
fn invalid_sql_reports_a_status() {
    let status = table_references("SELECT FROM", "").unwrap_err();
    assert!(!status.valid);
    assert_eq!((status.line, status.column), (Some(1), Some(8)));
}
