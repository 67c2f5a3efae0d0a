//! Shared helpers for integration tests.

use sqlsift_core::transpile_sql;

/// Transpiles and unwraps the rendered SQL, panicking with the engine's
/// message on failure.
pub fn transpile_ok(sql: &str, read: &str, write: &str) -> String {
    let outcome = transpile_sql(sql, read, write);
    assert!(
        outcome.valid,
        "transpile failed for {sql:?} ({read} -> {write}): {}",
        outcome.message
    );
    outcome.sql.expect("valid outcome carries sql")
}

/// Transpiles expecting failure and returns the failure message.
pub fn transpile_err(sql: &str, read: &str, write: &str) -> String {
    let outcome = transpile_sql(sql, read, write);
    assert!(
        !outcome.valid,
        "expected transpile to fail for {sql:?} ({read} -> {write})"
    );
    assert!(outcome.sql.is_none());
    outcome.message
}

/// Asserts that a statement renders back to itself in one dialect.
pub fn round_trip(sql: &str, dialect: &str) {
    assert_eq!(transpile_ok(sql, dialect, dialect), sql, "for {sql:?}");
}
