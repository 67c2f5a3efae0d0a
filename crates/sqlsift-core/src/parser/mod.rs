//! SQL parsing.

mod pratt;
#[allow(clippy::module_inception)]
mod parser;

pub use parser::Parser;

use crate::ast::Statement;
use crate::dialect::Dialect;
use crate::error::Error;

/// Parses a single SQL statement under a dialect's grammar.
///
/// # Errors
///
/// Returns [`Error::Lex`] or [`Error::Parse`] with the 1-based position
/// of the first token that could not be accepted.
pub fn parse(sql: &str, dialect: &Dialect) -> Result<Statement, Error> {
    Parser::new(sql, dialect)?.parse_statement()
}
