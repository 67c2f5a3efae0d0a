//! Linting behavior across dialects.

use pretty_assertions::assert_eq;
use sqlsift_core::lint_sql;

#[test]
fn valid_statements_report_no_syntax_errors() {
    for sql in [
        "SELECT 1",
        "SELECT * FROM users WHERE id = 1;",
        "WITH s AS (SELECT 1) SELECT * FROM s",
        "INSERT INTO t (a) VALUES (1)",
        "UPDATE t SET a = 1 WHERE b = 2",
        "DELETE FROM t",
    ] {
        let status = lint_sql(sql, "");
        assert!(status.valid, "expected {sql:?} to lint clean");
        assert_eq!(status.message, "No syntax errors");
    }
}

#[test]
fn truncated_statement_points_past_last_token() {
    let status = lint_sql("SELECT * FROM users WHERE", "");
    assert!(!status.valid);
    assert_eq!((status.line, status.column), (Some(1), Some(26)));
    assert_eq!(
        status.message,
        "Expected an expression, found end of input at line 1, column 26"
    );
}

#[test]
fn error_position_tracks_lines() {
    let status = lint_sql("SELECT id\nFROM users\nWHERE AND", "");
    assert!(!status.valid);
    assert_eq!((status.line, status.column), (Some(3), Some(7)));
}

#[test]
fn lex_errors_carry_positions_too() {
    let status = lint_sql("SELECT 'unterminated", "");
    assert!(!status.valid);
    assert_eq!((status.line, status.column), (Some(1), Some(8)));
    assert!(status.message.contains("Unterminated string literal"));
}

#[test]
fn trailing_semicolon_is_neutral() {
    assert_eq!(lint_sql("SELECT 1", ""), lint_sql("SELECT 1;", ""));
}

#[test]
fn dialect_grammar_is_enforced() {
    // ILIKE is a postgres extension.
    let sql = "SELECT * FROM t WHERE name ILIKE '%a%'";
    assert!(lint_sql(sql, "postgres").valid);
    assert!(!lint_sql(sql, "sqlite").valid);

    // The comma LIMIT form is a mysql extension.
    let sql = "SELECT * FROM t LIMIT 5, 10";
    assert!(lint_sql(sql, "mysql").valid);
    assert!(!lint_sql(sql, "postgres").valid);

    // RECURSIVE is gated off in the generic dialect.
    let sql = "WITH RECURSIVE r AS (SELECT 1) SELECT * FROM r";
    assert!(lint_sql(sql, "postgres").valid);
    assert!(!lint_sql(sql, "").valid);
}

#[test]
fn unknown_dialect_is_a_structured_failure() {
    let status = lint_sql("SELECT 1", "oracle");
    assert!(!status.valid);
    assert_eq!(status.message, "unknown dialect: oracle");
    assert_eq!(status.line, None);
}
