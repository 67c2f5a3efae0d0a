//! Error taxonomy for the engine.
//!
//! Two position-carrying errors can come out of analysis: [`LexError`] for
//! malformed tokens and [`ParseError`] for grammar violations. Transpilation
//! adds [`UnsupportedError`], which is only produced after a successful
//! parse. Scope resolution never fails; ambiguous or unresolvable names are
//! recorded in the scope tree instead.

use thiserror::Error;

/// A malformed token, e.g. an unterminated string literal.
///
/// Line and column are 1-based and point at the start of the offending
/// token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct LexError {
    /// Human-readable description of the problem.
    pub message: String,
    /// 1-based line of the offending token.
    pub line: u32,
    /// 1-based column of the offending token.
    pub column: u32,
}

impl LexError {
    /// Creates a new lex error.
    #[must_use]
    pub fn new(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

/// A grammar violation.
///
/// Points at the first token that could not be integrated into the grammar,
/// not a downstream symptom: `SELECT * FROM users WHERE` reports the
/// position immediately after `WHERE`, where an expression was expected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct ParseError {
    /// Human-readable description of the problem.
    pub message: String,
    /// 1-based line of the first unacceptable token.
    pub line: u32,
    /// 1-based column of the first unacceptable token.
    pub column: u32,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

/// An AST construct with no rendering rule in the target dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedConstruct {
    /// The node kind, e.g. `"FULL JOIN"`.
    pub construct: String,
    /// Why the target dialect cannot express it.
    pub reason: String,
}

/// Produced by the transpiler when one or more AST nodes have no rendering
/// rule in the target dialect. Rendering continues over the remainder of
/// the tree, so `items` holds every offending construct, not just the
/// first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} unsupported construct(s) for target dialect", items.len())]
pub struct UnsupportedError {
    /// Every construct without a rendering rule, in render order.
    pub items: Vec<UnsupportedConstruct>,
}

impl UnsupportedError {
    /// Formats the collected constructs as a single human-readable list.
    #[must_use]
    pub fn describe(&self) -> String {
        let parts: Vec<String> = self
            .items
            .iter()
            .map(|u| format!("{}: {}", u.construct, u.reason))
            .collect();
        parts.join("; ")
    }
}

/// Any failure an engine operation can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Tokenization failed.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// Parsing failed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Transpilation hit constructs the target dialect cannot express.
    #[error(transparent)]
    Unsupported(#[from] UnsupportedError),
    /// The caller named a dialect that is not in the registry.
    #[error("unknown dialect: {0}")]
    UnknownDialect(String),
}

impl Error {
    /// Returns the error position, if this error kind carries one.
    #[must_use]
    pub const fn position(&self) -> Option<(u32, u32)> {
        match self {
            Self::Lex(e) => Some((e.line, e.column)),
            Self::Parse(e) => Some((e.line, e.column)),
            Self::Unsupported(_) | Self::UnknownDialect(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("Expected an expression", 2, 7);
        assert_eq!(err.to_string(), "Expected an expression at line 2, column 7");
    }

    #[test]
    fn test_error_position() {
        let err = Error::Parse(ParseError::new("x", 1, 26));
        assert_eq!(err.position(), Some((1, 26)));
        assert_eq!(Error::UnknownDialect(String::from("db2")).position(), None);
    }

    #[test]
    fn test_unsupported_describe() {
        let err = UnsupportedError {
            items: vec![UnsupportedConstruct {
                construct: String::from("FULL JOIN"),
                reason: String::from("mysql has no FULL OUTER JOIN"),
            }],
        };
        assert_eq!(err.describe(), "FULL JOIN: mysql has no FULL OUTER JOIN");
    }
}
