//! Statement AST types.
//!
//! A [`Query`] is the unit CTEs and subqueries nest: an optional `WITH`
//! list, a set-operation body, and the trailing ORDER BY / LIMIT clauses
//! that apply to the whole body.

use super::expression::Expr;
use crate::lexer::Span;

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Null ordering for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    /// NULLS FIRST.
    First,
    /// NULLS LAST.
    Last,
}

impl NullOrdering {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "NULLS FIRST",
            Self::Last => "NULLS LAST",
        }
    }
}

/// An ORDER BY entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    /// The expression to order by.
    pub expr: Expr,
    /// The direction (ASC or DESC).
    pub direction: OrderDirection,
    /// Null ordering (optional).
    pub nulls: Option<NullOrdering>,
}

/// A LIMIT/OFFSET clause.
///
/// The MySQL `LIMIT offset, count` form parses into this same shape; the
/// renderer always emits `LIMIT n OFFSET m`.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    /// Row count cap (absent for a bare OFFSET).
    pub limit: Option<Expr>,
    /// Rows to skip.
    pub offset: Option<Expr>,
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// INNER JOIN.
    Inner,
    /// LEFT OUTER JOIN.
    Left,
    /// RIGHT OUTER JOIN.
    Right,
    /// FULL OUTER JOIN.
    Full,
    /// CROSS JOIN.
    Cross,
}

impl JoinType {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    /// The type of join.
    pub join_type: JoinType,
    /// The table being joined.
    pub table: TableRef,
    /// The join condition (for non-CROSS joins).
    pub on: Option<Expr>,
    /// USING columns (alternative to ON).
    pub using: Vec<String>,
}

/// A table reference in a FROM clause.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRef {
    /// A table (or CTE) name.
    Table {
        /// Schema qualifier (optional).
        schema: Option<String>,
        /// Table name.
        name: String,
        /// Alias.
        alias: Option<String>,
        /// Source span of the name.
        span: Span,
    },
    /// A derived table (subquery in FROM).
    Derived {
        /// The subquery.
        query: Box<Query>,
        /// Alias exposing the derived table's columns.
        alias: Option<String>,
        /// Source span of the subquery.
        span: Span,
    },
    /// A joined table.
    Join {
        /// Left side of the join.
        left: Box<TableRef>,
        /// The join clause.
        join: Box<JoinClause>,
    },
}

/// A schema-qualified table name (DML target).
#[derive(Debug, Clone, PartialEq)]
pub struct TableName {
    /// Schema qualifier (optional).
    pub schema: Option<String>,
    /// Table name.
    pub name: String,
    /// Source span of the name.
    pub span: Span,
}

impl TableName {
    /// Returns the qualified textual form, `schema.name` or `name`.
    #[must_use]
    pub fn qualified(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// One common table expression in a WITH list.
#[derive(Debug, Clone, PartialEq)]
pub struct Cte {
    /// The name later FROM clauses can reference.
    pub name: String,
    /// Optional explicit column list.
    pub columns: Vec<String>,
    /// The defining query.
    pub query: Box<Query>,
    /// Source span of the definition.
    pub span: Span,
}

/// A WITH clause.
///
/// CTEs are visible to later CTEs in the same list; under `RECURSIVE` a
/// CTE's own name is additionally visible inside its definition.
#[derive(Debug, Clone, PartialEq)]
pub struct With {
    /// Whether RECURSIVE was written.
    pub recursive: bool,
    /// The definitions, in source order.
    pub ctes: Vec<Cte>,
}

/// Set operations combining query blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    /// UNION.
    Union,
    /// INTERSECT.
    Intersect,
    /// EXCEPT.
    Except,
}

impl SetOp {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
        }
    }
}

/// The body of a query: a single SELECT or a set-operation tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SetExpr {
    /// A plain SELECT block.
    Select(Box<Select>),
    /// Two bodies combined with a set operation (left-associative).
    SetOp {
        /// Left operand.
        left: Box<SetExpr>,
        /// The operation.
        op: SetOp,
        /// Whether ALL was specified.
        all: bool,
        /// Right operand.
        right: Box<SetExpr>,
    },
}

/// One SELECT query block.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// The select list.
    pub columns: Vec<SelectColumn>,
    /// FROM items (comma-separated sources, each possibly a join tree).
    pub from: Vec<TableRef>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
    /// GROUP BY expressions.
    pub group_by: Vec<Expr>,
    /// HAVING clause.
    pub having: Option<Expr>,
    /// Source span of the block.
    pub span: Span,
}

/// One select-list item.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectColumn {
    /// The expression.
    pub expr: Expr,
    /// Column alias.
    pub alias: Option<String>,
}

/// A full query: WITH list, body, and trailing clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// The WITH clause, if any.
    pub with: Option<With>,
    /// The body.
    pub body: SetExpr,
    /// ORDER BY entries applying to the whole body.
    pub order_by: Vec<OrderBy>,
    /// LIMIT/OFFSET applying to the whole body.
    pub limit: Option<Limit>,
    /// Source span of the query.
    pub span: Span,
}

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    /// Target table.
    pub table: TableName,
    /// Explicit column list (may be empty).
    pub columns: Vec<String>,
    /// Row source.
    pub source: InsertSource,
}

/// Source of rows for INSERT.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// VALUES (...), (...), ...
    Values(Vec<Vec<Expr>>),
    /// INSERT ... SELECT.
    Query(Box<Query>),
    /// DEFAULT VALUES.
    DefaultValues,
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    /// Target table.
    pub table: TableName,
    /// Target alias.
    pub alias: Option<String>,
    /// SET assignments.
    pub assignments: Vec<Assignment>,
    /// FROM items (for joined updates).
    pub from: Vec<TableRef>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
}

/// One assignment in UPDATE SET.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Column name.
    pub column: String,
    /// Value expression.
    pub value: Expr,
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    /// Target table.
    pub table: TableName,
    /// Target alias.
    pub alias: Option<String>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
}

/// A SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A query (SELECT, possibly with CTEs and set operations).
    Query(Query),
    /// INSERT statement.
    Insert(Insert),
    /// UPDATE statement.
    Update(Update),
    /// DELETE statement.
    Delete(Delete),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_type_strings() {
        assert_eq!(JoinType::Inner.as_str(), "INNER JOIN");
        assert_eq!(JoinType::Full.as_str(), "FULL JOIN");
    }

    #[test]
    fn test_qualified_table_name() {
        let plain = TableName {
            schema: None,
            name: String::from("users"),
            span: Span::default(),
        };
        let qualified = TableName {
            schema: Some(String::from("app")),
            name: String::from("users"),
            span: Span::default(),
        };
        assert_eq!(plain.qualified(), "users");
        assert_eq!(qualified.qualified(), "app.users");
    }
}
