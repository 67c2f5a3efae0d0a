//! SQL dialect support.
//!
//! A dialect is a plain data record of grammar and rendering parameters.
//! One parser and one renderer consume these records; there are no
//! per-dialect subclasses, so adding a dialect means adding a registry
//! entry, not forking any algorithm.

mod registry;

pub use registry::{lookup, names, GENERIC, MYSQL, POSTGRES, SQLITE};

use crate::lexer::Keyword;

/// Grammar extension flags consumed by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectFlags {
    /// Accept `WITH RECURSIVE`, making a CTE's own name visible inside
    /// its definition.
    pub recursive_ctes: bool,
    /// Accept the MySQL `LIMIT offset, count` form.
    pub limit_comma_offset: bool,
}

/// How a target dialect renders `ILIKE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IlikeStyle {
    /// Emit `ILIKE` as-is.
    Native,
    /// Rewrite to `LOWER(lhs) LIKE LOWER(rhs)`.
    LowerLike,
}

/// How a target dialect renders the string concatenation operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcatStyle {
    /// Emit `lhs || rhs`.
    Operator,
    /// Rewrite to `CONCAT(lhs, rhs)` (MySQL, where `||` is logical OR).
    Function,
}

/// Rendering rules consumed by the transpiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRules {
    /// Quote character used when an identifier needs quoting.
    pub ident_quote: char,
    /// Whether `RIGHT [OUTER] JOIN` has a rendering rule.
    pub right_join: bool,
    /// Whether `FULL [OUTER] JOIN` has a rendering rule.
    pub full_join: bool,
    /// `ILIKE` rendering.
    pub ilike: IlikeStyle,
    /// `||` rendering.
    pub concat: ConcatStyle,
    /// Function spelling overrides, `(source name, target name)`,
    /// matched on the uppercased call name.
    pub function_renames: &'static [(&'static str, &'static str)],
}

/// Classes of infix operators whose binding power a dialect may override.
///
/// This is the key of the dialect precedence table; the core table lives
/// in the Pratt parser and is consulted when no override matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixClass {
    /// `OR`
    Or,
    /// `AND`
    And,
    /// `=`, `!=`, `<`, `<=`, `>`, `>=`
    Comparison,
    /// `LIKE`, `ILIKE`, `IS`, `IN`, `BETWEEN`
    Predicate,
    /// `||`
    Concat,
    /// `+`, `-`
    Additive,
    /// `*`, `/`, `%`
    Multiplicative,
}

/// A named set of SQL grammar and rendering parameters.
///
/// Instances are immutable `'static` registry entries; the parser and
/// transpiler borrow them and never mutate or own them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// Lowercase dialect name as exposed by the registry.
    pub name: &'static str,
    /// Characters that open a quoted identifier.
    pub ident_quotes: &'static [char],
    /// Characters that open a string literal.
    pub string_quotes: &'static [char],
    /// Suffix letters tolerated after numeric literals (none in the
    /// registered dialects; the hook is exercised in tests).
    pub numeric_suffixes: &'static [char],
    /// Non-core keywords this dialect enables.
    pub extension_keywords: &'static [Keyword],
    /// Grammar extension flags.
    pub flags: DialectFlags,
    /// Operator precedence overrides, `(class, (left bp, right bp))`.
    pub infix_overrides: &'static [(InfixClass, (u8, u8))],
    /// Rendering rules.
    pub render: RenderRules,
}

impl Dialect {
    /// Resolves an identifier-or-keyword word under this dialect's
    /// keyword set.
    #[must_use]
    pub fn keyword(&self, word: &str) -> Option<Keyword> {
        let kw = Keyword::from_str(word)?;
        if kw.is_core() || self.extension_keywords.contains(&kw) {
            Some(kw)
        } else {
            None
        }
    }

    /// Returns the dialect's binding-power override for an operator
    /// class, if any.
    #[must_use]
    pub fn infix_override(&self, class: InfixClass) -> Option<(u8, u8)> {
        self.infix_overrides
            .iter()
            .find(|(c, _)| *c == class)
            .map(|(_, bp)| *bp)
    }

    /// Returns true if `c` opens a quoted identifier in this dialect.
    #[must_use]
    pub fn is_ident_quote(&self, c: char) -> bool {
        self.ident_quotes.contains(&c)
    }

    /// Returns true if `c` opens a string literal in this dialect.
    #[must_use]
    pub fn is_string_quote(&self, c: char) -> bool {
        self.string_quotes.contains(&c)
    }

    /// Looks up the target spelling for a function name, if this dialect
    /// renames it.
    #[must_use]
    pub fn rename_function(&self, upper_name: &str) -> Option<&'static str> {
        self.render
            .function_renames
            .iter()
            .find(|(from, _)| *from == upper_name)
            .map(|(_, to)| *to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_keyword_gating() {
        assert_eq!(GENERIC.keyword("SELECT"), Some(Keyword::Select));
        assert_eq!(GENERIC.keyword("ILIKE"), None);
        assert_eq!(POSTGRES.keyword("ilike"), Some(Keyword::Ilike));
    }

    #[test]
    fn test_quote_classification() {
        assert!(MYSQL.is_ident_quote('`'));
        assert!(!MYSQL.is_ident_quote('"'));
        assert!(MYSQL.is_string_quote('"'));
        assert!(POSTGRES.is_ident_quote('"'));
        assert!(!POSTGRES.is_string_quote('"'));
    }

    #[test]
    fn test_mysql_concat_precedence_override() {
        // In MySQL `||` is logical OR and binds at OR level.
        assert_eq!(MYSQL.infix_override(InfixClass::Concat), Some((1, 2)));
        assert_eq!(POSTGRES.infix_override(InfixClass::Concat), None);
    }
}
