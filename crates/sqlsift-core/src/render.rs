//! SQL rendering.
//!
//! One renderer serves every target dialect; per-dialect differences come
//! from the dialect's [`RenderRules`](crate::dialect::RenderRules).
//! Output is canonical: single spaces, uppercase keywords, identifiers
//! quoted only when needed, and `LIMIT n OFFSET m` regardless of how the
//! limit was written.
//!
//! A construct the target dialect cannot express does not stop the pass;
//! it is recorded and rendering continues, so the caller learns about
//! every offending construct at once.

use crate::ast::{
    Assignment, BinaryOp, Delete, Expr, FunctionCall, Insert, InsertSource, JoinType, Literal,
    OrderBy, OrderDirection, Query, Select, SetExpr, Statement, TableName, TableRef, UnaryOp,
};
use crate::dialect::{ConcatStyle, Dialect, IlikeStyle};
use crate::error::{UnsupportedConstruct, UnsupportedError};
use crate::lexer::Keyword;

/// Renders a statement in the target dialect.
///
/// # Errors
///
/// Returns [`UnsupportedError`] listing every construct the target
/// dialect cannot express; the error is only produced after the whole
/// tree has been visited.
pub fn render(statement: &Statement, dialect: &Dialect) -> Result<String, UnsupportedError> {
    let mut renderer = Renderer {
        dialect,
        out: String::new(),
        unsupported: Vec::new(),
    };
    renderer.statement(statement);
    if renderer.unsupported.is_empty() {
        Ok(renderer.out)
    } else {
        Err(UnsupportedError {
            items: renderer.unsupported,
        })
    }
}

struct Renderer<'a> {
    dialect: &'a Dialect,
    out: String,
    unsupported: Vec<UnsupportedConstruct>,
}

impl Renderer<'_> {
    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn unsupported(&mut self, construct: &str, reason: String) {
        self.unsupported.push(UnsupportedConstruct {
            construct: String::from(construct),
            reason,
        });
    }

    /// Writes an identifier, quoting it only when its spelling requires
    /// quoting in the target dialect.
    fn ident(&mut self, name: &str) {
        if needs_quoting(name) {
            let quote = self.dialect.render.ident_quote;
            self.out.push(quote);
            for c in name.chars() {
                if c == quote {
                    self.out.push(quote);
                }
                self.out.push(c);
            }
            self.out.push(quote);
        } else {
            self.push(name);
        }
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Query(query) => self.query(query),
            Statement::Insert(insert) => self.insert(insert),
            Statement::Update(update) => self.update(update),
            Statement::Delete(delete) => self.delete(delete),
        }
    }

    fn query(&mut self, query: &Query) {
        if let Some(with) = &query.with {
            self.push("WITH ");
            if with.recursive {
                if !self.dialect.flags.recursive_ctes {
                    self.unsupported(
                        "WITH RECURSIVE",
                        format!(
                            "the {} dialect has no RECURSIVE rendering",
                            self.dialect.name
                        ),
                    );
                }
                self.push("RECURSIVE ");
            }
            for (i, cte) in with.ctes.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.ident(&cte.name);
                if !cte.columns.is_empty() {
                    self.push("(");
                    for (j, column) in cte.columns.iter().enumerate() {
                        if j > 0 {
                            self.push(", ");
                        }
                        self.ident(column);
                    }
                    self.push(")");
                }
                self.push(" AS (");
                self.query(&cte.query);
                self.push(")");
            }
            self.push(" ");
        }

        self.set_expr(&query.body);

        if !query.order_by.is_empty() {
            self.push(" ORDER BY ");
            for (i, entry) in query.order_by.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.order_by(entry);
            }
        }

        if let Some(limit) = &query.limit {
            if let Some(expr) = &limit.limit {
                self.push(" LIMIT ");
                self.expr(expr);
            }
            if let Some(expr) = &limit.offset {
                self.push(" OFFSET ");
                self.expr(expr);
            }
        }
    }

    fn order_by(&mut self, entry: &OrderBy) {
        self.expr(&entry.expr);
        if entry.direction == OrderDirection::Desc {
            self.push(" DESC");
        }
        if let Some(nulls) = entry.nulls {
            self.push(" ");
            self.push(nulls.as_str());
        }
    }

    fn set_expr(&mut self, body: &SetExpr) {
        match body {
            SetExpr::Select(select) => self.select(select),
            SetExpr::SetOp {
                left,
                op,
                all,
                right,
            } => {
                self.set_expr(left);
                self.push(" ");
                self.push(op.as_str());
                if *all {
                    self.push(" ALL");
                }
                self.push(" ");
                self.set_expr(right);
            }
        }
    }

    fn select(&mut self, select: &Select) {
        self.push("SELECT ");
        if select.distinct {
            self.push("DISTINCT ");
        }
        for (i, column) in select.columns.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(&column.expr);
            if let Some(alias) = &column.alias {
                self.push(" AS ");
                self.ident(alias);
            }
        }
        if !select.from.is_empty() {
            self.push(" FROM ");
            for (i, table_ref) in select.from.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.table_ref(table_ref);
            }
        }
        if let Some(expr) = &select.where_clause {
            self.push(" WHERE ");
            self.expr(expr);
        }
        if !select.group_by.is_empty() {
            self.push(" GROUP BY ");
            for (i, expr) in select.group_by.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.expr(expr);
            }
        }
        if let Some(expr) = &select.having {
            self.push(" HAVING ");
            self.expr(expr);
        }
    }

    fn table_ref(&mut self, table_ref: &TableRef) {
        match table_ref {
            TableRef::Table {
                schema,
                name,
                alias,
                ..
            } => {
                if let Some(schema) = schema {
                    self.ident(schema);
                    self.push(".");
                }
                self.ident(name);
                if let Some(alias) = alias {
                    self.push(" AS ");
                    self.ident(alias);
                }
            }
            TableRef::Derived { query, alias, .. } => {
                self.push("(");
                self.query(query);
                self.push(")");
                if let Some(alias) = alias {
                    self.push(" AS ");
                    self.ident(alias);
                }
            }
            TableRef::Join { left, join } => {
                self.table_ref(left);

                match join.join_type {
                    JoinType::Full if !self.dialect.render.full_join => self.unsupported(
                        "FULL JOIN",
                        format!("{} does not support FULL OUTER JOIN", self.dialect.name),
                    ),
                    JoinType::Right if !self.dialect.render.right_join => self.unsupported(
                        "RIGHT JOIN",
                        format!("{} does not support RIGHT OUTER JOIN", self.dialect.name),
                    ),
                    _ => {}
                }

                self.push(" ");
                self.push(join.join_type.as_str());
                self.push(" ");
                self.table_ref(&join.table);

                if let Some(on) = &join.on {
                    self.push(" ON ");
                    self.expr(on);
                } else if !join.using.is_empty() {
                    self.push(" USING (");
                    for (i, column) in join.using.iter().enumerate() {
                        if i > 0 {
                            self.push(", ");
                        }
                        self.ident(column);
                    }
                    self.push(")");
                }
            }
        }
    }

    fn table_name(&mut self, table: &TableName) {
        if let Some(schema) = &table.schema {
            self.ident(schema);
            self.push(".");
        }
        self.ident(&table.name);
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(literal) => self.literal(literal),
            Expr::Column { table, name, .. } => {
                if let Some(table) = table {
                    self.ident(table);
                    self.push(".");
                }
                self.ident(name);
            }
            Expr::Wildcard { table } => {
                if let Some(table) = table {
                    self.ident(table);
                    self.push(".");
                }
                self.push("*");
            }
            Expr::Binary { left, op, right } => self.binary(left, *op, right),
            Expr::Unary { op, operand } => {
                match op {
                    UnaryOp::Not => self.push("NOT "),
                    UnaryOp::Neg => self.push("-"),
                }
                self.tight_operand(operand);
            }
            Expr::IsNull { expr, negated } => {
                self.operand(expr, PREDICATE_PRECEDENCE, false);
                self.push(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Expr::InList {
                expr,
                list,
                negated,
            } => {
                self.operand(expr, PREDICATE_PRECEDENCE, false);
                self.push(if *negated { " NOT IN (" } else { " IN (" });
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.expr(item);
                }
                self.push(")");
            }
            Expr::InSubquery {
                expr,
                query,
                negated,
            } => {
                self.operand(expr, PREDICATE_PRECEDENCE, false);
                self.push(if *negated { " NOT IN (" } else { " IN (" });
                self.query(query);
                self.push(")");
            }
            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                self.operand(expr, PREDICATE_PRECEDENCE, false);
                self.push(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
                self.operand(low, PREDICATE_PRECEDENCE, true);
                self.push(" AND ");
                self.operand(high, PREDICATE_PRECEDENCE, true);
            }
            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                self.push("CASE");
                if let Some(operand) = operand {
                    self.push(" ");
                    self.expr(operand);
                }
                for (condition, result) in when_clauses {
                    self.push(" WHEN ");
                    self.expr(condition);
                    self.push(" THEN ");
                    self.expr(result);
                }
                if let Some(else_clause) = else_clause {
                    self.push(" ELSE ");
                    self.expr(else_clause);
                }
                self.push(" END");
            }
            Expr::Cast { expr, data_type } => {
                self.push("CAST(");
                self.expr(expr);
                self.push(" AS ");
                self.push(&data_type.to_string());
                self.push(")");
            }
            Expr::Function(call) => self.function(call),
            Expr::Exists { query } => {
                self.push("EXISTS (");
                self.query(query);
                self.push(")");
            }
            Expr::Subquery(query) => {
                self.push("(");
                self.query(query);
                self.push(")");
            }
            Expr::Paren(inner) => {
                self.push("(");
                self.expr(inner);
                self.push(")");
            }
        }
    }

    fn binary(&mut self, left: &Expr, op: BinaryOp, right: &Expr) {
        match op {
            BinaryOp::Concat if self.dialect.render.concat == ConcatStyle::Function => {
                self.push("CONCAT(");
                let mut operands = Vec::new();
                collect_concat_operands(left, &mut operands);
                collect_concat_operands(right, &mut operands);
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.expr(operand);
                }
                self.push(")");
            }
            BinaryOp::ILike if self.dialect.render.ilike == IlikeStyle::LowerLike => {
                self.push("LOWER(");
                self.expr(left);
                self.push(") LIKE LOWER(");
                self.expr(right);
                self.push(")");
            }
            _ => {
                let precedence = op.precedence();
                self.operand(left, precedence, false);
                self.push(" ");
                self.push(op.as_str());
                self.push(" ");
                self.operand(right, precedence, true);
            }
        }
    }

    /// Writes a binary operand, adding parentheses when the operand binds
    /// looser than its parent (or equally, on the right of a
    /// left-associative operator).
    fn operand(&mut self, expr: &Expr, parent_precedence: u8, is_right: bool) {
        if let Expr::Binary { op, .. } = expr {
            let precedence = op.precedence();
            if precedence < parent_precedence || (precedence == parent_precedence && is_right) {
                self.push("(");
                self.expr(expr);
                self.push(")");
                return;
            }
        }
        self.expr(expr);
    }

    /// Writes a unary operand; any binary expression gets parentheses.
    fn tight_operand(&mut self, expr: &Expr) {
        if matches!(expr, Expr::Binary { .. }) {
            self.push("(");
            self.expr(expr);
            self.push(")");
        } else {
            self.expr(expr);
        }
    }

    fn function(&mut self, call: &FunctionCall) {
        let upper = call.name.to_ascii_uppercase();
        match self.dialect.rename_function(&upper) {
            Some(renamed) => self.push(renamed),
            None => self.push(&call.name),
        }
        self.push("(");
        if call.distinct {
            self.push("DISTINCT ");
        }
        if call.wildcard {
            self.push("*");
        } else {
            for (i, arg) in call.args.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.expr(arg);
            }
        }
        self.push(")");
    }

    fn literal(&mut self, literal: &Literal) {
        match literal {
            Literal::Integer(n) => self.push(&n.to_string()),
            Literal::Float(f) => {
                // Keep a decimal point so the literal stays a float.
                if f.fract() == 0.0 && f.is_finite() {
                    self.push(&format!("{f:.1}"));
                } else {
                    self.push(&f.to_string());
                }
            }
            Literal::String(s) => {
                self.push("'");
                self.push(&s.replace('\'', "''"));
                self.push("'");
            }
            Literal::Boolean(true) => self.push("TRUE"),
            Literal::Boolean(false) => self.push("FALSE"),
            Literal::Null => self.push("NULL"),
        }
    }

    // ------------------------------------------------------------------
    // DML
    // ------------------------------------------------------------------

    fn insert(&mut self, insert: &Insert) {
        self.push("INSERT INTO ");
        self.table_name(&insert.table);
        if !insert.columns.is_empty() {
            self.push(" (");
            for (i, column) in insert.columns.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.ident(column);
            }
            self.push(")");
        }
        match &insert.source {
            InsertSource::Values(rows) => {
                self.push(" VALUES ");
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.push("(");
                    for (j, expr) in row.iter().enumerate() {
                        if j > 0 {
                            self.push(", ");
                        }
                        self.expr(expr);
                    }
                    self.push(")");
                }
            }
            InsertSource::Query(query) => {
                self.push(" ");
                self.query(query);
            }
            InsertSource::DefaultValues => self.push(" DEFAULT VALUES"),
        }
    }

    fn update(&mut self, update: &crate::ast::Update) {
        self.push("UPDATE ");
        self.table_name(&update.table);
        if let Some(alias) = &update.alias {
            self.push(" AS ");
            self.ident(alias);
        }
        self.push(" SET ");
        for (i, Assignment { column, value }) in update.assignments.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.ident(column);
            self.push(" = ");
            self.expr(value);
        }
        if !update.from.is_empty() {
            self.push(" FROM ");
            for (i, table_ref) in update.from.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.table_ref(table_ref);
            }
        }
        if let Some(expr) = &update.where_clause {
            self.push(" WHERE ");
            self.expr(expr);
        }
    }

    fn delete(&mut self, delete: &Delete) {
        self.push("DELETE FROM ");
        self.table_name(&delete.table);
        if let Some(alias) = &delete.alias {
            self.push(" AS ");
            self.ident(alias);
        }
        if let Some(expr) = &delete.where_clause {
            self.push(" WHERE ");
            self.expr(expr);
        }
    }
}

const PREDICATE_PRECEDENCE: u8 = 4;

/// Flattens a left-associative concatenation chain so the function form
/// renders as one call.
fn collect_concat_operands<'e>(expr: &'e Expr, out: &mut Vec<&'e Expr>) {
    match expr {
        Expr::Binary {
            left,
            op: BinaryOp::Concat,
            right,
        } => {
            collect_concat_operands(left, out);
            collect_concat_operands(right, out);
        }
        _ => out.push(expr),
    }
}

/// Whether an identifier must be quoted: anything that does not lex as a
/// plain identifier, including reserved words.
fn needs_quoting(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return true;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return true;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return true;
    }
    Keyword::from_str(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{lookup, GENERIC, MYSQL, POSTGRES, SQLITE};
    use crate::parser::parse;

    fn transpile(sql: &str, read: &Dialect, write: &Dialect) -> Result<String, UnsupportedError> {
        render(&parse(sql, read).unwrap(), write)
    }

    fn round_trip(sql: &str, dialect: &str) {
        let dialect = lookup(dialect).unwrap();
        assert_eq!(transpile(sql, dialect, dialect).unwrap(), sql);
    }

    #[test]
    fn test_round_trips_canonical_text() {
        round_trip("SELECT id, name FROM users AS u WHERE u.active = TRUE", "");
        round_trip("SELECT DISTINCT a FROM t GROUP BY a HAVING COUNT(*) > 1", "");
        round_trip(
            "SELECT * FROM a INNER JOIN b ON a.id = b.a_id LEFT JOIN c USING (id)",
            "",
        );
        round_trip(
            "WITH s(x) AS (SELECT 1) SELECT x FROM s ORDER BY x DESC LIMIT 10 OFFSET 5",
            "",
        );
        round_trip("SELECT 1 UNION ALL SELECT 2", "");
        round_trip("INSERT INTO t (a, b) VALUES (1, 'x'), (2, 'y')", "");
        round_trip("UPDATE t SET a = a + 1 WHERE b IS NOT NULL", "");
        round_trip("DELETE FROM logs WHERE age > 30", "");
    }

    #[test]
    fn test_canonicalizes_spelling() {
        assert_eq!(
            transpile("select  1+2 from t;", &GENERIC, &GENERIC).unwrap(),
            "SELECT 1 + 2 FROM t"
        );
    }

    #[test]
    fn test_precedence_parentheses() {
        assert_eq!(
            transpile("SELECT (1 + 2) * 3", &GENERIC, &GENERIC).unwrap(),
            "SELECT (1 + 2) * 3"
        );
        assert_eq!(
            transpile("SELECT 1 - (2 - 3)", &GENERIC, &GENERIC).unwrap(),
            "SELECT 1 - (2 - 3)"
        );
    }

    #[test]
    fn test_reserved_words_are_quoted() {
        assert_eq!(
            transpile("SELECT \"order\" FROM \"select\"", &GENERIC, &GENERIC).unwrap(),
            "SELECT \"order\" FROM \"select\""
        );
        assert_eq!(
            transpile("SELECT \"order\" FROM t", &GENERIC, &MYSQL).unwrap(),
            "SELECT `order` FROM t"
        );
    }

    #[test]
    fn test_ilike_lowered_for_targets_without_it() {
        assert_eq!(
            transpile(
                "SELECT * FROM t WHERE name ILIKE '%a%'",
                &POSTGRES,
                &GENERIC
            )
            .unwrap(),
            "SELECT * FROM t WHERE LOWER(name) LIKE LOWER('%a%')"
        );
        // Postgres keeps it as written.
        assert_eq!(
            transpile(
                "SELECT * FROM t WHERE name ILIKE '%a%'",
                &POSTGRES,
                &POSTGRES
            )
            .unwrap(),
            "SELECT * FROM t WHERE name ILIKE '%a%'"
        );
    }

    #[test]
    fn test_concat_becomes_function_for_mysql() {
        assert_eq!(
            transpile("SELECT a || b || c FROM t", &POSTGRES, &MYSQL).unwrap(),
            "SELECT CONCAT(a, b, c) FROM t"
        );
    }

    #[test]
    fn test_function_renames() {
        assert_eq!(
            transpile("SELECT SUBSTRING(a, 1, 2) FROM t", &POSTGRES, &SQLITE).unwrap(),
            "SELECT SUBSTR(a, 1, 2) FROM t"
        );
        assert_eq!(
            transpile("SELECT SUBSTR(a, 1, 2) FROM t", &POSTGRES, &MYSQL).unwrap(),
            "SELECT SUBSTRING(a, 1, 2) FROM t"
        );
    }

    #[test]
    fn test_limit_comma_form_normalized() {
        assert_eq!(
            transpile("SELECT * FROM t LIMIT 5, 10", &MYSQL, &MYSQL).unwrap(),
            "SELECT * FROM t LIMIT 10 OFFSET 5"
        );
    }

    #[test]
    fn test_unsupported_joins_collected_not_first_only() {
        let err = transpile(
            "SELECT * FROM a FULL JOIN b ON a.id = b.id RIGHT JOIN c ON b.id = c.id",
            &GENERIC,
            &SQLITE,
        )
        .unwrap_err();
        let constructs: Vec<&str> = err.items.iter().map(|u| u.construct.as_str()).collect();
        assert_eq!(constructs, vec!["FULL JOIN", "RIGHT JOIN"]);
    }

    #[test]
    fn test_full_join_fine_for_postgres() {
        assert!(transpile(
            "SELECT * FROM a FULL JOIN b ON a.id = b.id",
            &GENERIC,
            &POSTGRES
        )
        .is_ok());
    }

    #[test]
    fn test_recursive_cte_unsupported_by_generic_target() {
        let err = transpile(
            "WITH RECURSIVE r AS (SELECT 1 UNION ALL SELECT n + 1 FROM r) SELECT * FROM r",
            &POSTGRES,
            &GENERIC,
        )
        .unwrap_err();
        assert_eq!(err.items.len(), 1);
        assert_eq!(err.items[0].construct, "WITH RECURSIVE");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(
            transpile("SELECT 'it''s'", &GENERIC, &GENERIC).unwrap(),
            "SELECT 'it''s'"
        );
    }

    #[test]
    fn test_float_keeps_decimal_point() {
        assert_eq!(
            transpile("SELECT 1.0, 2.5", &GENERIC, &GENERIC).unwrap(),
            "SELECT 1.0, 2.5"
        );
    }

    #[test]
    fn test_not_predicates() {
        assert_eq!(
            transpile(
                "SELECT * FROM t WHERE a NOT IN (1, 2) AND b NOT BETWEEN 1 AND 5",
                &GENERIC,
                &GENERIC
            )
            .unwrap(),
            "SELECT * FROM t WHERE a NOT IN (1, 2) AND b NOT BETWEEN 1 AND 5"
        );
    }
}
