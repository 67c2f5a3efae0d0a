//! Abstract Syntax Tree (AST) types for SQL statements.
//!
//! Closed tagged-variant types with exhaustive matching: adding a node
//! kind makes every traversal and rendering rule a compile-time-checked
//! obligation. Every node owns its children exclusively (strict tree).

mod expression;
mod statement;
mod types;

pub use expression::{BinaryOp, Expr, FunctionCall, Literal, UnaryOp};
pub use statement::{
    Assignment, Cte, Delete, Insert, InsertSource, JoinClause, JoinType, Limit, NullOrdering,
    OrderBy, OrderDirection, Query, Select, SelectColumn, SetExpr, SetOp, Statement, TableName,
    TableRef, Update, With,
};
pub use types::DataType;
