//! Pratt binding-power tables for expression parsing.
//!
//! The core table lives here; a dialect may override the binding power of
//! a whole operator class (e.g. MySQL demotes `||` to OR level). The
//! parser always goes through [`infix_binding_power`], which consults the
//! dialect first.

use crate::ast::{BinaryOp, UnaryOp};
use crate::dialect::{Dialect, InfixClass};
use crate::lexer::{Keyword, TokenKind};

/// Classifies a token as an infix operator class, if it is one.
#[must_use]
pub const fn classify_infix(kind: &TokenKind) -> Option<InfixClass> {
    match kind {
        TokenKind::Keyword(Keyword::Or) => Some(InfixClass::Or),
        TokenKind::Keyword(Keyword::And) => Some(InfixClass::And),
        TokenKind::Eq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq => Some(InfixClass::Comparison),
        TokenKind::Keyword(
            Keyword::Is
            | Keyword::In
            | Keyword::Between
            | Keyword::Like
            | Keyword::Ilike
            | Keyword::Not,
        ) => Some(InfixClass::Predicate),
        TokenKind::Concat => Some(InfixClass::Concat),
        TokenKind::Plus | TokenKind::Minus => Some(InfixClass::Additive),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some(InfixClass::Multiplicative),
        _ => None,
    }
}

/// Core binding powers per operator class.
///
/// `(left_bp, right_bp)` with left < right for left associativity;
/// higher binds tighter.
#[must_use]
pub const fn core_binding_power(class: InfixClass) -> (u8, u8) {
    match class {
        InfixClass::Or => (1, 2),
        InfixClass::And => (3, 4),
        InfixClass::Comparison | InfixClass::Predicate => (5, 6),
        InfixClass::Concat | InfixClass::Additive => (7, 8),
        InfixClass::Multiplicative => (9, 10),
    }
}

/// Returns the infix binding power for a token under a dialect.
#[must_use]
pub fn infix_binding_power(dialect: &Dialect, kind: &TokenKind) -> Option<(u8, u8)> {
    let class = classify_infix(kind)?;
    Some(
        dialect
            .infix_override(class)
            .unwrap_or_else(|| core_binding_power(class)),
    )
}

/// Returns the prefix binding power for a unary operator token.
///
/// `NOT` binds looser than comparisons so `NOT a = b` reads as
/// `NOT (a = b)`, but tighter than `AND`/`OR`.
#[must_use]
pub const fn prefix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Minus => Some(11),
        TokenKind::Keyword(Keyword::Not) => Some(4),
        _ => None,
    }
}

/// Converts a token to a binary operator.
#[must_use]
pub const fn token_to_binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Mod),
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        TokenKind::Concat => Some(BinaryOp::Concat),
        TokenKind::Keyword(Keyword::And) => Some(BinaryOp::And),
        TokenKind::Keyword(Keyword::Or) => Some(BinaryOp::Or),
        TokenKind::Keyword(Keyword::Like) => Some(BinaryOp::Like),
        TokenKind::Keyword(Keyword::Ilike) => Some(BinaryOp::ILike),
        _ => None,
    }
}

/// Converts a token to a unary operator.
#[must_use]
pub const fn token_to_unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Minus => Some(UnaryOp::Neg),
        TokenKind::Keyword(Keyword::Not) => Some(UnaryOp::Not),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{GENERIC, MYSQL};

    #[test]
    fn test_core_precedence_ordering() {
        let add = infix_binding_power(&GENERIC, &TokenKind::Plus).unwrap();
        let mul = infix_binding_power(&GENERIC, &TokenKind::Star).unwrap();
        assert!(mul.0 > add.0);

        let and = infix_binding_power(&GENERIC, &TokenKind::Keyword(Keyword::And)).unwrap();
        let or = infix_binding_power(&GENERIC, &TokenKind::Keyword(Keyword::Or)).unwrap();
        assert!(and.0 > or.0);
        assert!(infix_binding_power(&GENERIC, &TokenKind::Eq).unwrap().0 > and.0);
    }

    #[test]
    fn test_left_associativity() {
        let (left, right) = infix_binding_power(&GENERIC, &TokenKind::Plus).unwrap();
        assert!(left < right);
    }

    #[test]
    fn test_dialect_override_applies() {
        // Generic: || at additive level. MySQL: || demoted to OR level.
        assert_eq!(
            infix_binding_power(&GENERIC, &TokenKind::Concat),
            Some((7, 8))
        );
        assert_eq!(infix_binding_power(&MYSQL, &TokenKind::Concat), Some((1, 2)));
    }

    #[test]
    fn test_not_binds_looser_than_comparison() {
        let not_bp = prefix_binding_power(&TokenKind::Keyword(Keyword::Not)).unwrap();
        let (cmp_l, _) = infix_binding_power(&GENERIC, &TokenKind::Eq).unwrap();
        let (and_l, _) =
            infix_binding_power(&GENERIC, &TokenKind::Keyword(Keyword::And)).unwrap();
        assert!(cmp_l >= not_bp);
        assert!(and_l < not_bp);
    }
}
