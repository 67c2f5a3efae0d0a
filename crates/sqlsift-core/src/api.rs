//! Engine operations: lint, transpile, and reference extraction.
//!
//! These are the calls a host (CLI, server, FFI) is expected to wire up.
//! Failures callers are expected to show to users come back as
//! serializable status values rather than bare errors, so a host can
//! forward them without re-formatting.

use serde::Serialize;

use crate::dialect::{self, Dialect};
use crate::error::Error;
use crate::parser::parse;
use crate::refs;
use crate::render::render;

/// Outcome of checking one statement's syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseStatus {
    /// Whether the statement parsed.
    pub valid: bool,
    /// `"No syntax errors"` or a description of the failure.
    pub message: String,
    /// 1-based line of the error, when one is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// 1-based column of the error, when one is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl ParseStatus {
    fn ok() -> Self {
        Self {
            valid: true,
            message: String::from("No syntax errors"),
            line: None,
            column: None,
        }
    }

    fn from_error(error: &Error) -> Self {
        let (line, column) = match error.position() {
            Some((line, column)) => (Some(line), Some(column)),
            None => (None, None),
        };
        Self {
            valid: false,
            message: error.to_string(),
            line,
            column,
        }
    }
}

/// Outcome of transpiling one statement between dialects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranspileOutcome {
    /// Whether parsing and rendering both succeeded.
    pub valid: bool,
    /// `"No syntax errors"` or a description of the failure.
    pub message: String,
    /// The dialect the input was parsed under.
    pub read_dialect: String,
    /// The dialect the output was rendered in.
    pub write_dialect: String,
    /// The rendered statement, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
}

impl TranspileOutcome {
    fn failure(message: String, read_dialect: &str, write_dialect: &str) -> Self {
        Self {
            valid: false,
            message,
            read_dialect: String::from(read_dialect),
            write_dialect: String::from(write_dialect),
            sql: None,
        }
    }
}

fn resolve_dialect(name: &str) -> Result<&'static Dialect, Error> {
    dialect::lookup(name).ok_or_else(|| Error::UnknownDialect(String::from(name)))
}

/// Checks one statement's syntax under a dialect.
///
/// The empty dialect name selects the generic dialect. An unknown
/// dialect name reports as an invalid status, not a panic.
#[must_use]
pub fn lint_sql(sql: &str, dialect_name: &str) -> ParseStatus {
    tracing::debug!(dialect = dialect_name, "lint");
    let result = resolve_dialect(dialect_name).and_then(|dialect| parse(sql, dialect));
    match result {
        Ok(_) => ParseStatus::ok(),
        Err(error) => ParseStatus::from_error(&error),
    }
}

/// Transpiles one statement from `read_dialect` to `write_dialect`.
///
/// A syntax error under the read dialect fails the operation before any
/// rendering is attempted; rendering failures report every unsupported
/// construct at once.
#[must_use]
pub fn transpile_sql(sql: &str, read_dialect: &str, write_dialect: &str) -> TranspileOutcome {
    tracing::debug!(read = read_dialect, write = write_dialect, "transpile");

    let read = match resolve_dialect(read_dialect) {
        Ok(dialect) => dialect,
        Err(error) => {
            return TranspileOutcome::failure(error.to_string(), read_dialect, write_dialect)
        }
    };
    let write = match resolve_dialect(write_dialect) {
        Ok(dialect) => dialect,
        Err(error) => {
            return TranspileOutcome::failure(error.to_string(), read_dialect, write_dialect)
        }
    };

    let statement = match parse(sql, read) {
        Ok(statement) => statement,
        Err(error) => {
            return TranspileOutcome::failure(error.to_string(), read_dialect, write_dialect)
        }
    };

    match render(&statement, write) {
        Ok(sql) => TranspileOutcome {
            valid: true,
            message: String::from("No syntax errors"),
            read_dialect: String::from(read_dialect),
            write_dialect: String::from(write_dialect),
            sql: Some(sql),
        },
        Err(error) => {
            TranspileOutcome::failure(error.describe(), read_dialect, write_dialect)
        }
    }
}

/// Lists the physical tables a statement touches: schema-qualified as
/// written, de-duplicated, in order of first appearance. CTE references
/// are excluded; the tables backing each CTE are included.
///
/// # Errors
///
/// Returns an invalid [`ParseStatus`] if the dialect is unknown or the
/// statement does not parse.
pub fn table_references(sql: &str, dialect_name: &str) -> Result<Vec<String>, ParseStatus> {
    tracing::debug!(dialect = dialect_name, "table references");
    let statement = resolve_dialect(dialect_name)
        .and_then(|dialect| parse(sql, dialect))
        .map_err(|error| ParseStatus::from_error(&error))?;
    Ok(refs::table_references(&statement))
}

/// Lists every column reference in a statement, spelled as written, in
/// source order, duplicates kept.
///
/// # Errors
///
/// Returns an invalid [`ParseStatus`] if the dialect is unknown or the
/// statement does not parse.
pub fn column_references(sql: &str, dialect_name: &str) -> Result<Vec<String>, ParseStatus> {
    tracing::debug!(dialect = dialect_name, "column references");
    let statement = resolve_dialect(dialect_name)
        .and_then(|dialect| parse(sql, dialect))
        .map_err(|error| ParseStatus::from_error(&error))?;
    Ok(refs::column_references(&statement))
}

/// Lists the selectable dialect names, lowercase, generic excluded.
#[must_use]
pub fn dialects() -> Vec<&'static str> {
    dialect::names()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lint_valid() {
        let status = lint_sql("SELECT * FROM users", "");
        assert!(status.valid);
        assert_eq!(status.message, "No syntax errors");
        assert_eq!(status.line, None);
    }

    #[test]
    fn test_lint_reports_position() {
        let status = lint_sql("SELECT * FROM users WHERE", "postgres");
        assert!(!status.valid);
        assert_eq!((status.line, status.column), (Some(1), Some(26)));
    }

    #[test]
    fn test_lint_unknown_dialect() {
        let status = lint_sql("SELECT 1", "db2");
        assert!(!status.valid);
        assert_eq!(status.message, "unknown dialect: db2");
        assert_eq!(status.line, None);
    }

    #[test]
    fn test_parse_status_serialization() {
        let status = lint_sql("SELECT * FROM users WHERE", "");
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["line"], 1);
        assert_eq!(json["column"], 26);

        // Positionless statuses omit the fields entirely.
        let ok = serde_json::to_value(lint_sql("SELECT 1", "")).unwrap();
        assert!(ok.get("line").is_none());
    }

    #[test]
    fn test_transpile_success() {
        let outcome = transpile_sql("SELECT a || b FROM t", "postgres", "mysql");
        assert!(outcome.valid);
        assert_eq!(outcome.sql.as_deref(), Some("SELECT CONCAT(a, b) FROM t"));
        assert_eq!(outcome.read_dialect, "postgres");
        assert_eq!(outcome.write_dialect, "mysql");
    }

    #[test]
    fn test_transpile_syntax_error_short_circuits() {
        let outcome = transpile_sql("SELECT FROM", "postgres", "mysql");
        assert!(!outcome.valid);
        assert!(outcome.sql.is_none());
        assert!(outcome.message.contains("line 1"));
    }

    #[test]
    fn test_transpile_unsupported_lists_constructs() {
        let outcome = transpile_sql(
            "SELECT * FROM a FULL JOIN b ON a.id = b.id",
            "postgres",
            "mysql",
        );
        assert!(!outcome.valid);
        assert!(outcome.sql.is_none());
        assert_eq!(
            outcome.message,
            "FULL JOIN: mysql does not support FULL OUTER JOIN"
        );
    }

    #[test]
    fn test_reference_extraction_worked_example() {
        let sql = "SELECT u.id, o.order_date FROM users u JOIN orders o ON u.id = o.user_id";
        assert_eq!(
            table_references(sql, "").unwrap(),
            vec!["users", "orders"]
        );
        assert_eq!(
            column_references(sql, "").unwrap(),
            vec!["u.id", "o.order_date", "u.id", "o.user_id"]
        );
    }

    #[test]
    fn test_references_reject_bad_sql() {
        let err = table_references("SELECT FROM", "").unwrap_err();
        assert!(!err.valid);
    }

    #[test]
    fn test_dialect_list_excludes_generic() {
        let names = dialects();
        assert!(names.contains(&"postgres"));
        assert!(!names.contains(&""));
        assert!(!names.contains(&"generic"));
    }
}
