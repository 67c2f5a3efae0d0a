//! Recursive descent parser with Pratt expression parsing.
//!
//! Statements and clauses are parsed by recursive descent; expressions go
//! through the binding-power loop in [`super::pratt`]. The parser holds a
//! single token of lookahead and reports the first token it cannot accept,
//! with that token's line and column.

use crate::ast::{
    Assignment, Cte, DataType, Delete, Expr, FunctionCall, Insert, InsertSource, JoinClause,
    JoinType, Limit, Literal, NullOrdering, OrderBy, OrderDirection, Query, Select, SelectColumn,
    SetExpr, SetOp, Statement, TableName, TableRef, Update, With,
};
use crate::dialect::Dialect;
use crate::error::{Error, ParseError};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};

use super::pratt::{infix_binding_power, prefix_binding_power, token_to_binary_op, token_to_unary_op};

/// A SQL parser over a streaming lexer.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    dialect: &'a Dialect,
    current: Token,
    previous: Token,
}

impl<'a> Parser<'a> {
    /// Creates a parser for `input` under `dialect` and primes the
    /// lookahead token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Lex`] if the first token is malformed.
    pub fn new(input: &'a str, dialect: &'a Dialect) -> Result<Self, Error> {
        let mut lexer = Lexer::new(input, dialect);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            dialect,
            current,
            previous: Token::new(TokenKind::Eof, Span::default(), 1, 1),
        })
    }

    fn advance(&mut self) -> Result<(), Error> {
        let next = self.lexer.next_token()?;
        self.previous = std::mem::replace(&mut self.current, next);
        Ok(())
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.current.kind == *kind
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.as_keyword() == Some(keyword)
    }

    fn eat(&mut self, kind: &TokenKind) -> Result<bool, Error> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> Result<bool, Error> {
        if self.check_keyword(keyword) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Builds an error pointing at the current (first unacceptable) token.
    fn expected(&self, what: &str) -> Error {
        ParseError::new(
            format!("Expected {what}, found {}", self.current.kind.describe()),
            self.current.line,
            self.current.column,
        )
        .into()
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<(), Error> {
        if self.eat(kind)? {
            Ok(())
        } else {
            Err(self.expected(what))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), Error> {
        if self.eat_keyword(keyword)? {
            Ok(())
        } else {
            Err(self.expected(keyword.as_str()))
        }
    }

    fn expect_identifier(&mut self, what: &str) -> Result<(String, Span), Error> {
        match &self.current.kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let span = self.current.span;
                self.advance()?;
                Ok((name, span))
            }
            _ => Err(self.expected(what)),
        }
    }

    fn expect_integer(&mut self, what: &str) -> Result<i64, Error> {
        match self.current.kind {
            TokenKind::Integer(n) => {
                self.advance()?;
                Ok(n)
            }
            _ => Err(self.expected(what)),
        }
    }

    /// Parses one complete statement and requires the input to end after
    /// it (an optional trailing semicolon is accepted).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Lex`] or [`Error::Parse`] pointing at the first
    /// token that could not be accepted.
    pub fn parse_statement(&mut self) -> Result<Statement, Error> {
        let statement = match self.current.as_keyword() {
            Some(Keyword::Select | Keyword::With) => Statement::Query(self.parse_query()?),
            Some(Keyword::Insert) => Statement::Insert(self.parse_insert()?),
            Some(Keyword::Update) => Statement::Update(self.parse_update()?),
            Some(Keyword::Delete) => Statement::Delete(self.parse_delete()?),
            _ => return Err(self.expected("a statement")),
        };

        if self.check(&TokenKind::Semicolon) {
            self.advance()?;
        }
        if !self.current.is_eof() {
            return Err(self.expected("end of statement"));
        }
        Ok(statement)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    fn parse_query(&mut self) -> Result<Query, Error> {
        let start = self.current.span;

        let with = if self.check_keyword(Keyword::With) {
            Some(self.parse_with()?)
        } else {
            None
        };

        let body = self.parse_set_expr()?;

        let order_by = if self.eat_keyword(Keyword::Order)? {
            self.expect_keyword(Keyword::By)?;
            self.parse_order_by_list()?
        } else {
            Vec::new()
        };

        let limit = self.parse_limit()?;

        Ok(Query {
            with,
            body,
            order_by,
            limit,
            span: start.merge(self.previous.span),
        })
    }

    fn parse_with(&mut self) -> Result<With, Error> {
        self.expect_keyword(Keyword::With)?;

        let recursive = if self.check_keyword(Keyword::Recursive) {
            if !self.dialect.flags.recursive_ctes {
                return Err(ParseError::new(
                    format!(
                        "RECURSIVE common table expressions are not supported by the {} dialect",
                        self.dialect.name
                    ),
                    self.current.line,
                    self.current.column,
                )
                .into());
            }
            self.advance()?;
            true
        } else {
            false
        };

        let mut ctes = Vec::new();
        loop {
            let (name, name_span) = self.expect_identifier("a common table expression name")?;

            let mut columns = Vec::new();
            if self.eat(&TokenKind::LeftParen)? {
                loop {
                    let (column, _) = self.expect_identifier("a column name")?;
                    columns.push(column);
                    if !self.eat(&TokenKind::Comma)? {
                        break;
                    }
                }
                self.expect(&TokenKind::RightParen, ")")?;
            }

            self.expect_keyword(Keyword::As)?;
            self.expect(&TokenKind::LeftParen, "(")?;
            let query = self.parse_query()?;
            self.expect(&TokenKind::RightParen, ")")?;

            ctes.push(Cte {
                name,
                columns,
                query: Box::new(query),
                span: name_span.merge(self.previous.span),
            });

            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }

        Ok(With { recursive, ctes })
    }

    fn parse_set_expr(&mut self) -> Result<SetExpr, Error> {
        let mut left = SetExpr::Select(Box::new(self.parse_select()?));

        loop {
            let op = match self.current.as_keyword() {
                Some(Keyword::Union) => SetOp::Union,
                Some(Keyword::Intersect) => SetOp::Intersect,
                Some(Keyword::Except) => SetOp::Except,
                _ => break,
            };
            self.advance()?;

            let all = self.eat_keyword(Keyword::All)?;
            if !all {
                // UNION DISTINCT is the default and carries no AST mark.
                self.eat_keyword(Keyword::Distinct)?;
            }

            if !self.check_keyword(Keyword::Select) {
                return Err(self.expected("SELECT"));
            }
            let right = SetExpr::Select(Box::new(self.parse_select()?));

            left = SetExpr::SetOp {
                left: Box::new(left),
                op,
                all,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_select(&mut self) -> Result<Select, Error> {
        let start = self.current.span;
        self.expect_keyword(Keyword::Select)?;

        let distinct = self.eat_keyword(Keyword::Distinct)?;
        if !distinct {
            // SELECT ALL is the default and carries no AST mark.
            self.eat_keyword(Keyword::All)?;
        }

        let mut columns = Vec::new();
        loop {
            let expr = self.parse_expression(0)?;
            let alias = self.parse_optional_alias()?;
            columns.push(SelectColumn { expr, alias });
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }

        let mut from = Vec::new();
        if self.eat_keyword(Keyword::From)? {
            loop {
                from.push(self.parse_table_ref()?);
                if !self.eat(&TokenKind::Comma)? {
                    break;
                }
            }
        }

        let where_clause = if self.eat_keyword(Keyword::Where)? {
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        let mut group_by = Vec::new();
        if self.eat_keyword(Keyword::Group)? {
            self.expect_keyword(Keyword::By)?;
            loop {
                group_by.push(self.parse_expression(0)?);
                if !self.eat(&TokenKind::Comma)? {
                    break;
                }
            }
        }

        let having = if self.eat_keyword(Keyword::Having)? {
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        Ok(Select {
            distinct,
            columns,
            from,
            where_clause,
            group_by,
            having,
            span: start.merge(self.previous.span),
        })
    }

    fn parse_order_by_list(&mut self) -> Result<Vec<OrderBy>, Error> {
        let mut entries = Vec::new();
        loop {
            let expr = self.parse_expression(0)?;

            let direction = if self.eat_keyword(Keyword::Asc)? {
                OrderDirection::Asc
            } else if self.eat_keyword(Keyword::Desc)? {
                OrderDirection::Desc
            } else {
                OrderDirection::default()
            };

            let nulls = if self.eat_keyword(Keyword::Nulls)? {
                if self.eat_keyword(Keyword::First)? {
                    Some(NullOrdering::First)
                } else if self.eat_keyword(Keyword::Last)? {
                    Some(NullOrdering::Last)
                } else {
                    return Err(self.expected("FIRST or LAST"));
                }
            } else {
                None
            };

            entries.push(OrderBy {
                expr,
                direction,
                nulls,
            });
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        Ok(entries)
    }

    fn parse_limit(&mut self) -> Result<Option<Limit>, Error> {
        if self.eat_keyword(Keyword::Limit)? {
            let first = self.parse_expression(0)?;

            // MySQL accepts `LIMIT offset, count`.
            if self.dialect.flags.limit_comma_offset && self.check(&TokenKind::Comma) {
                self.advance()?;
                let count = self.parse_expression(0)?;
                return Ok(Some(Limit {
                    limit: Some(count),
                    offset: Some(first),
                }));
            }

            let offset = if self.eat_keyword(Keyword::Offset)? {
                Some(self.parse_expression(0)?)
            } else {
                None
            };
            return Ok(Some(Limit {
                limit: Some(first),
                offset,
            }));
        }

        if self.eat_keyword(Keyword::Offset)? {
            let offset = self.parse_expression(0)?;
            return Ok(Some(Limit {
                limit: None,
                offset: Some(offset),
            }));
        }

        Ok(None)
    }

    // ------------------------------------------------------------------
    // Table references
    // ------------------------------------------------------------------

    fn parse_table_ref(&mut self) -> Result<TableRef, Error> {
        let mut table = self.parse_table_factor()?;

        loop {
            let join_type = if self.eat_keyword(Keyword::Inner)? {
                self.expect_keyword(Keyword::Join)?;
                JoinType::Inner
            } else if self.eat_keyword(Keyword::Left)? {
                self.eat_keyword(Keyword::Outer)?;
                self.expect_keyword(Keyword::Join)?;
                JoinType::Left
            } else if self.eat_keyword(Keyword::Right)? {
                self.eat_keyword(Keyword::Outer)?;
                self.expect_keyword(Keyword::Join)?;
                JoinType::Right
            } else if self.eat_keyword(Keyword::Full)? {
                self.eat_keyword(Keyword::Outer)?;
                self.expect_keyword(Keyword::Join)?;
                JoinType::Full
            } else if self.eat_keyword(Keyword::Cross)? {
                self.expect_keyword(Keyword::Join)?;
                JoinType::Cross
            } else if self.eat_keyword(Keyword::Join)? {
                JoinType::Inner
            } else {
                break;
            };

            let right = self.parse_table_factor()?;

            let (on, using) = if join_type == JoinType::Cross {
                (None, Vec::new())
            } else if self.eat_keyword(Keyword::On)? {
                (Some(self.parse_expression(0)?), Vec::new())
            } else if self.eat_keyword(Keyword::Using)? {
                self.expect(&TokenKind::LeftParen, "(")?;
                let mut names = Vec::new();
                loop {
                    let (name, _) = self.expect_identifier("a column name")?;
                    names.push(name);
                    if !self.eat(&TokenKind::Comma)? {
                        break;
                    }
                }
                self.expect(&TokenKind::RightParen, ")")?;
                (None, names)
            } else {
                return Err(self.expected("ON or USING"));
            };

            table = TableRef::Join {
                left: Box::new(table),
                join: Box::new(JoinClause {
                    join_type,
                    table: right,
                    on,
                    using,
                }),
            };
        }

        Ok(table)
    }

    /// Parses a single FROM item without trailing joins: a named table,
    /// a parenthesized subquery, or a parenthesized join tree.
    fn parse_table_factor(&mut self) -> Result<TableRef, Error> {
        if self.check(&TokenKind::LeftParen) {
            let start = self.current.span;
            self.advance()?;

            if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
                let query = self.parse_query()?;
                self.expect(&TokenKind::RightParen, ")")?;
                let span = start.merge(self.previous.span);
                let alias = self.parse_optional_alias()?;
                return Ok(TableRef::Derived {
                    query: Box::new(query),
                    alias,
                    span,
                });
            }

            let inner = self.parse_table_ref()?;
            self.expect(&TokenKind::RightParen, ")")?;
            return Ok(inner);
        }

        let (first, first_span) = self.expect_identifier("a table name")?;
        let (schema, name, span) = if self.eat(&TokenKind::Dot)? {
            let (second, second_span) = self.expect_identifier("a table name")?;
            (Some(first), second, first_span.merge(second_span))
        } else {
            (None, first, first_span)
        };
        let alias = self.parse_optional_alias()?;

        Ok(TableRef::Table {
            schema,
            name,
            alias,
            span,
        })
    }

    fn parse_table_name(&mut self) -> Result<TableName, Error> {
        let (first, first_span) = self.expect_identifier("a table name")?;
        if self.eat(&TokenKind::Dot)? {
            let (second, second_span) = self.expect_identifier("a table name")?;
            Ok(TableName {
                schema: Some(first),
                name: second,
                span: first_span.merge(second_span),
            })
        } else {
            Ok(TableName {
                schema: None,
                name: first,
                span: first_span,
            })
        }
    }

    /// Parses `AS alias` or a bare identifier alias. Keywords never form
    /// a bare alias, so clause boundaries stay unambiguous.
    fn parse_optional_alias(&mut self) -> Result<Option<String>, Error> {
        if self.eat_keyword(Keyword::As)? {
            let (name, _) = self.expect_identifier("an alias")?;
            return Ok(Some(name));
        }
        match &self.current.kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance()?;
                Ok(Some(name))
            }
            _ => Ok(None),
        }
    }

    // ------------------------------------------------------------------
    // DML
    // ------------------------------------------------------------------

    fn parse_insert(&mut self) -> Result<Insert, Error> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let table = self.parse_table_name()?;

        let mut columns = Vec::new();
        if self.check(&TokenKind::LeftParen) {
            self.advance()?;
            loop {
                let (name, _) = self.expect_identifier("a column name")?;
                columns.push(name);
                if !self.eat(&TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(&TokenKind::RightParen, ")")?;
        }

        let source = if self.eat_keyword(Keyword::Values)? {
            let mut rows = Vec::new();
            loop {
                self.expect(&TokenKind::LeftParen, "(")?;
                let mut row = Vec::new();
                loop {
                    row.push(self.parse_expression(0)?);
                    if !self.eat(&TokenKind::Comma)? {
                        break;
                    }
                }
                self.expect(&TokenKind::RightParen, ")")?;
                rows.push(row);
                if !self.eat(&TokenKind::Comma)? {
                    break;
                }
            }
            InsertSource::Values(rows)
        } else if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
            InsertSource::Query(Box::new(self.parse_query()?))
        } else if self.eat_keyword(Keyword::Default)? {
            self.expect_keyword(Keyword::Values)?;
            InsertSource::DefaultValues
        } else {
            return Err(self.expected("VALUES, SELECT or DEFAULT VALUES"));
        };

        Ok(Insert {
            table,
            columns,
            source,
        })
    }

    fn parse_update(&mut self) -> Result<Update, Error> {
        self.expect_keyword(Keyword::Update)?;
        let table = self.parse_table_name()?;
        let alias = self.parse_optional_alias()?;

        self.expect_keyword(Keyword::Set)?;
        let mut assignments = Vec::new();
        loop {
            let (column, _) = self.expect_identifier("a column name")?;
            self.expect(&TokenKind::Eq, "=")?;
            let value = self.parse_expression(0)?;
            assignments.push(Assignment { column, value });
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }

        let mut from = Vec::new();
        if self.eat_keyword(Keyword::From)? {
            loop {
                from.push(self.parse_table_ref()?);
                if !self.eat(&TokenKind::Comma)? {
                    break;
                }
            }
        }

        let where_clause = if self.eat_keyword(Keyword::Where)? {
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        Ok(Update {
            table,
            alias,
            assignments,
            from,
            where_clause,
        })
    }

    fn parse_delete(&mut self) -> Result<Delete, Error> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let table = self.parse_table_name()?;
        let alias = self.parse_optional_alias()?;

        let where_clause = if self.eat_keyword(Keyword::Where)? {
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        Ok(Delete {
            table,
            alias,
            where_clause,
        })
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn parse_expression(&mut self, min_bp: u8) -> Result<Expr, Error> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let Some((l_bp, r_bp)) = infix_binding_power(self.dialect, &self.current.kind) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }

            lhs = match self.current.as_keyword() {
                Some(Keyword::Is) => {
                    self.advance()?;
                    let negated = self.eat_keyword(Keyword::Not)?;
                    self.expect_keyword(Keyword::Null)?;
                    Expr::IsNull {
                        expr: Box::new(lhs),
                        negated,
                    }
                }
                Some(Keyword::In) => {
                    self.advance()?;
                    self.parse_in(lhs, false)?
                }
                Some(Keyword::Between) => {
                    self.advance()?;
                    self.parse_between(lhs, false, r_bp)?
                }
                Some(Keyword::Not) => {
                    self.advance()?;
                    if self.eat_keyword(Keyword::In)? {
                        self.parse_in(lhs, true)?
                    } else if self.eat_keyword(Keyword::Between)? {
                        self.parse_between(lhs, true, r_bp)?
                    } else if let Some(op) = self
                        .current
                        .as_keyword()
                        .filter(|kw| matches!(kw, Keyword::Like | Keyword::Ilike))
                        .and_then(|kw| token_to_binary_op(&TokenKind::Keyword(kw)))
                    {
                        self.advance()?;
                        let rhs = self.parse_expression(r_bp)?;
                        Expr::Unary {
                            op: crate::ast::UnaryOp::Not,
                            operand: Box::new(Expr::Binary {
                                left: Box::new(lhs),
                                op,
                                right: Box::new(rhs),
                            }),
                        }
                    } else {
                        return Err(self.expected("IN, BETWEEN or LIKE after NOT"));
                    }
                }
                _ => {
                    let Some(op) = token_to_binary_op(&self.current.kind) else {
                        break;
                    };
                    self.advance()?;
                    let rhs = self.parse_expression(r_bp)?;
                    Expr::Binary {
                        left: Box::new(lhs),
                        op,
                        right: Box::new(rhs),
                    }
                }
            };
        }

        Ok(lhs)
    }

    /// Parses the tail of `expr [NOT] IN ...`; the leading keyword has
    /// been consumed.
    fn parse_in(&mut self, expr: Expr, negated: bool) -> Result<Expr, Error> {
        self.expect(&TokenKind::LeftParen, "(")?;

        if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
            let query = self.parse_query()?;
            self.expect(&TokenKind::RightParen, ")")?;
            return Ok(Expr::InSubquery {
                expr: Box::new(expr),
                query: Box::new(query),
                negated,
            });
        }

        let mut list = Vec::new();
        loop {
            list.push(self.parse_expression(0)?);
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(&TokenKind::RightParen, ")")?;

        Ok(Expr::InList {
            expr: Box::new(expr),
            list,
            negated,
        })
    }

    /// Parses the tail of `expr [NOT] BETWEEN low AND high`. Bounds are
    /// parsed above AND's binding power so the separating AND is left for
    /// this rule to consume.
    fn parse_between(&mut self, expr: Expr, negated: bool, r_bp: u8) -> Result<Expr, Error> {
        let low = self.parse_expression(r_bp)?;
        self.expect_keyword(Keyword::And)?;
        let high = self.parse_expression(r_bp)?;
        Ok(Expr::Between {
            expr: Box::new(expr),
            low: Box::new(low),
            high: Box::new(high),
            negated,
        })
    }

    fn parse_prefix(&mut self) -> Result<Expr, Error> {
        if let (Some(op), Some(bp)) = (
            token_to_unary_op(&self.current.kind),
            prefix_binding_power(&self.current.kind),
        ) {
            self.advance()?;
            let operand = self.parse_expression(bp)?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, Error> {
        match self.current.kind.clone() {
            TokenKind::Integer(n) => {
                self.advance()?;
                Ok(Expr::Literal(Literal::Integer(n)))
            }
            TokenKind::Float(f) => {
                self.advance()?;
                Ok(Expr::Literal(Literal::Float(f)))
            }
            TokenKind::String(s) => {
                self.advance()?;
                Ok(Expr::Literal(Literal::String(s)))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance()?;
                Ok(Expr::Literal(Literal::Boolean(true)))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance()?;
                Ok(Expr::Literal(Literal::Boolean(false)))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance()?;
                Ok(Expr::Literal(Literal::Null))
            }
            TokenKind::Keyword(Keyword::Case) => self.parse_case(),
            TokenKind::Keyword(Keyword::Cast) => self.parse_cast(),
            TokenKind::Keyword(Keyword::Exists) => {
                self.advance()?;
                self.expect(&TokenKind::LeftParen, "(")?;
                let query = self.parse_query()?;
                self.expect(&TokenKind::RightParen, ")")?;
                Ok(Expr::Exists {
                    query: Box::new(query),
                })
            }
            TokenKind::Star => {
                self.advance()?;
                Ok(Expr::Wildcard { table: None })
            }
            TokenKind::LeftParen => {
                self.advance()?;
                if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
                    let query = self.parse_query()?;
                    self.expect(&TokenKind::RightParen, ")")?;
                    return Ok(Expr::Subquery(Box::new(query)));
                }
                let expr = self.parse_expression(0)?;
                self.expect(&TokenKind::RightParen, ")")?;
                Ok(Expr::Paren(Box::new(expr)))
            }
            TokenKind::Identifier(name) => {
                let name_span = self.current.span;
                self.advance()?;

                if self.check(&TokenKind::LeftParen) {
                    return self.parse_function_call(name);
                }

                if self.eat(&TokenKind::Dot)? {
                    if self.eat(&TokenKind::Star)? {
                        return Ok(Expr::Wildcard { table: Some(name) });
                    }
                    let (column, column_span) = self.expect_identifier("a column name")?;
                    return Ok(Expr::Column {
                        table: Some(name),
                        name: column,
                        span: name_span.merge(column_span),
                    });
                }

                Ok(Expr::Column {
                    table: None,
                    name,
                    span: name_span,
                })
            }
            _ => Err(self.expected("an expression")),
        }
    }

    fn parse_function_call(&mut self, name: String) -> Result<Expr, Error> {
        self.expect(&TokenKind::LeftParen, "(")?;

        let distinct = self.eat_keyword(Keyword::Distinct)?;
        let mut wildcard = false;
        let mut args = Vec::new();

        if self.eat(&TokenKind::Star)? {
            wildcard = true;
        } else if !self.check(&TokenKind::RightParen) {
            loop {
                args.push(self.parse_expression(0)?);
                if !self.eat(&TokenKind::Comma)? {
                    break;
                }
            }
        }

        self.expect(&TokenKind::RightParen, ")")?;
        Ok(Expr::Function(FunctionCall {
            name,
            args,
            distinct,
            wildcard,
        }))
    }

    fn parse_case(&mut self) -> Result<Expr, Error> {
        self.expect_keyword(Keyword::Case)?;

        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expression(0)?))
        };

        let mut when_clauses = Vec::new();
        while self.eat_keyword(Keyword::When)? {
            let condition = self.parse_expression(0)?;
            self.expect_keyword(Keyword::Then)?;
            let result = self.parse_expression(0)?;
            when_clauses.push((condition, result));
        }
        if when_clauses.is_empty() {
            return Err(self.expected("WHEN"));
        }

        let else_clause = if self.eat_keyword(Keyword::Else)? {
            Some(Box::new(self.parse_expression(0)?))
        } else {
            None
        };

        self.expect_keyword(Keyword::End)?;
        Ok(Expr::Case {
            operand,
            when_clauses,
            else_clause,
        })
    }

    fn parse_cast(&mut self) -> Result<Expr, Error> {
        self.expect_keyword(Keyword::Cast)?;
        self.expect(&TokenKind::LeftParen, "(")?;
        let expr = self.parse_expression(0)?;
        self.expect_keyword(Keyword::As)?;
        let data_type = self.parse_data_type()?;
        self.expect(&TokenKind::RightParen, ")")?;
        Ok(Expr::Cast {
            expr: Box::new(expr),
            data_type,
        })
    }

    fn parse_data_type(&mut self) -> Result<DataType, Error> {
        let data_type = match self.current.as_keyword() {
            Some(Keyword::Int | Keyword::Integer) => {
                self.advance()?;
                DataType::Integer
            }
            Some(Keyword::Smallint) => {
                self.advance()?;
                DataType::Smallint
            }
            Some(Keyword::Bigint) => {
                self.advance()?;
                DataType::Bigint
            }
            Some(Keyword::Real) => {
                self.advance()?;
                DataType::Real
            }
            Some(Keyword::Double | Keyword::Float) => {
                self.advance()?;
                // DOUBLE PRECISION; the second word is not a keyword.
                if matches!(&self.current.kind, TokenKind::Identifier(w) if w.eq_ignore_ascii_case("precision"))
                {
                    self.advance()?;
                }
                DataType::Double
            }
            Some(Keyword::Decimal) => {
                self.advance()?;
                let (precision, scale) = self.parse_precision_scale()?;
                DataType::Decimal { precision, scale }
            }
            Some(Keyword::Numeric) => {
                self.advance()?;
                let (precision, scale) = self.parse_precision_scale()?;
                DataType::Numeric { precision, scale }
            }
            Some(Keyword::Char) => {
                self.advance()?;
                DataType::Char(self.parse_type_length()?)
            }
            Some(Keyword::Varchar) => {
                self.advance()?;
                DataType::Varchar(self.parse_type_length()?)
            }
            Some(Keyword::Text) => {
                self.advance()?;
                DataType::Text
            }
            Some(Keyword::Boolean) => {
                self.advance()?;
                DataType::Boolean
            }
            Some(Keyword::Date) => {
                self.advance()?;
                DataType::Date
            }
            Some(Keyword::Time) => {
                self.advance()?;
                DataType::Time
            }
            Some(Keyword::Timestamp) => {
                self.advance()?;
                DataType::Timestamp
            }
            _ => match &self.current.kind {
                TokenKind::Identifier(name) => {
                    let name = name.clone();
                    self.advance()?;
                    DataType::Custom(name)
                }
                _ => return Err(self.expected("a data type")),
            },
        };
        Ok(data_type)
    }

    fn parse_precision_scale(&mut self) -> Result<(Option<u16>, Option<u16>), Error> {
        if !self.eat(&TokenKind::LeftParen)? {
            return Ok((None, None));
        }
        let precision = self.parse_type_number("a precision")?;
        let scale = if self.eat(&TokenKind::Comma)? {
            Some(self.parse_type_number("a scale")?)
        } else {
            None
        };
        self.expect(&TokenKind::RightParen, ")")?;
        Ok((Some(precision), scale))
    }

    fn parse_type_length(&mut self) -> Result<Option<u32>, Error> {
        if !self.eat(&TokenKind::LeftParen)? {
            return Ok(None);
        }
        let token = self.current.clone();
        let n = self.expect_integer("a length")?;
        let len = u32::try_from(n).map_err(|_| {
            Error::from(ParseError::new(
                format!("Invalid type length: {n}"),
                token.line,
                token.column,
            ))
        })?;
        self.expect(&TokenKind::RightParen, ")")?;
        Ok(Some(len))
    }

    fn parse_type_number<T: TryFrom<i64>>(&mut self, what: &str) -> Result<T, Error> {
        let token = self.current.clone();
        let n = self.expect_integer(what)?;
        T::try_from(n).map_err(|_| {
            Error::from(ParseError::new(
                format!("Invalid numeric type parameter: {n}"),
                token.line,
                token.column,
            ))
        })
    }
}
