//! Dialect-aware SQL front end.
//!
//! One hand-written lexer and parser serve every registered dialect;
//! dialect differences are data (quoting characters, extension keywords,
//! precedence overrides, rendering rules), not subclasses. On top of the
//! AST sit three analyses:
//!
//! - **Linting**: parse and report the first offending token's 1-based
//!   line and column ([`lint_sql`]).
//! - **Reference extraction**: the physical tables a statement touches
//!   ([`table_references`]) and every column reference as written
//!   ([`column_references`]).
//! - **Transpilation**: parse under one dialect, render under another
//!   ([`transpile_sql`]), reporting every construct the target cannot
//!   express.
//!
//! # Example
//!
//! ```
//! use sqlsift_core::{lint_sql, transpile_sql};
//!
//! let status = lint_sql("SELECT * FROM users WHERE active = TRUE", "postgres");
//! assert!(status.valid);
//!
//! let outcome = transpile_sql("SELECT a || b FROM t", "postgres", "mysql");
//! assert_eq!(outcome.sql.as_deref(), Some("SELECT CONCAT(a, b) FROM t"));
//! ```

pub mod api;
pub mod ast;
pub mod dialect;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod refs;
pub mod render;
pub mod scope;

pub use api::{
    column_references, dialects, lint_sql, table_references, transpile_sql, ParseStatus,
    TranspileOutcome,
};
pub use error::{Error, LexError, ParseError, UnsupportedConstruct, UnsupportedError};
