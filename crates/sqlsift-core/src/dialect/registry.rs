//! The fixed dialect registry.
//!
//! Constructed once as `'static` data; every engine invocation borrows
//! entries from here, so concurrent calls need no locking.

use super::{ConcatStyle, Dialect, DialectFlags, IlikeStyle, InfixClass, RenderRules};
use crate::lexer::Keyword;

/// The base dialect: core grammar, no vendor extensions.
///
/// This is the internal sentinel used when a caller passes an empty
/// dialect name; it is excluded from [`names`].
pub static GENERIC: Dialect = Dialect {
    name: "generic",
    ident_quotes: &['"'],
    string_quotes: &['\''],
    numeric_suffixes: &[],
    extension_keywords: &[],
    flags: DialectFlags {
        recursive_ctes: false,
        limit_comma_offset: false,
    },
    infix_overrides: &[],
    render: RenderRules {
        ident_quote: '"',
        right_join: true,
        full_join: true,
        ilike: IlikeStyle::LowerLike,
        concat: ConcatStyle::Operator,
        function_renames: &[],
    },
};

/// PostgreSQL.
pub static POSTGRES: Dialect = Dialect {
    name: "postgres",
    ident_quotes: &['"'],
    string_quotes: &['\''],
    numeric_suffixes: &[],
    extension_keywords: &[Keyword::Ilike],
    flags: DialectFlags {
        recursive_ctes: true,
        limit_comma_offset: false,
    },
    infix_overrides: &[],
    render: RenderRules {
        ident_quote: '"',
        right_join: true,
        full_join: true,
        ilike: IlikeStyle::Native,
        concat: ConcatStyle::Operator,
        function_renames: &[],
    },
};

/// MySQL. Backtick identifiers, double-quoted strings, `LIMIT off, count`,
/// `||` as logical OR, no `FULL OUTER JOIN`.
pub static MYSQL: Dialect = Dialect {
    name: "mysql",
    ident_quotes: &['`'],
    string_quotes: &['\'', '"'],
    numeric_suffixes: &[],
    extension_keywords: &[],
    flags: DialectFlags {
        recursive_ctes: true,
        limit_comma_offset: true,
    },
    infix_overrides: &[(InfixClass::Concat, (1, 2))],
    render: RenderRules {
        ident_quote: '`',
        right_join: true,
        full_join: false,
        ilike: IlikeStyle::LowerLike,
        concat: ConcatStyle::Function,
        function_renames: &[("SUBSTR", "SUBSTRING")],
    },
};

/// SQLite. Accepts both `"` and `` ` `` around identifiers; renders
/// neither `RIGHT` nor `FULL` joins.
pub static SQLITE: Dialect = Dialect {
    name: "sqlite",
    ident_quotes: &['"', '`'],
    string_quotes: &['\''],
    numeric_suffixes: &[],
    extension_keywords: &[],
    flags: DialectFlags {
        recursive_ctes: true,
        limit_comma_offset: true,
    },
    infix_overrides: &[],
    render: RenderRules {
        ident_quote: '"',
        right_join: false,
        full_join: false,
        ilike: IlikeStyle::LowerLike,
        concat: ConcatStyle::Operator,
        function_renames: &[("SUBSTRING", "SUBSTR")],
    },
};

/// Registry order is also the order [`names`] reports.
static REGISTRY: &[&Dialect] = &[&GENERIC, &POSTGRES, &MYSQL, &SQLITE];

/// Looks up a dialect by name (case-insensitive).
///
/// The empty string maps to the base dialect.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static Dialect> {
    if name.is_empty() {
        return Some(&GENERIC);
    }
    let lower = name.to_ascii_lowercase();
    REGISTRY.iter().find(|d| d.name == lower).copied()
}

/// Returns the enumerable dialect names, lowercase, excluding the base
/// sentinel entry.
#[must_use]
pub fn names() -> Vec<&'static str> {
    REGISTRY
        .iter()
        .filter(|d| d.name != GENERIC.name)
        .map(|d| d.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_empty_is_generic() {
        assert_eq!(lookup("").unwrap().name, "generic");
    }

    #[test]
    fn test_lookup_case_insensitive() {
        assert_eq!(lookup("MySQL").unwrap().name, "mysql");
        assert!(lookup("oracle").is_none());
    }

    #[test]
    fn test_names_excludes_sentinel() {
        let names = names();
        assert_eq!(names, vec!["postgres", "mysql", "sqlite"]);
        assert!(!names.contains(&"generic"));
    }
}
