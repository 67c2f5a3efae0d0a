//! Name scoping for queries.
//!
//! [`ScopeTree::build`] walks a parsed statement and records, for every
//! query block, which FROM sources are visible under which names. Scopes
//! live in an arena indexed by [`ScopeId`]; nodes borrow their names from
//! the AST, so building a tree allocates no strings.
//!
//! Scoping is total: it never fails. A qualifier that matches nothing
//! resolves to [`Resolution::Unresolved`], and a name bound twice in one
//! scope is recorded in [`ScopeTree::duplicate_aliases`] while lookups
//! keep finding the first binding.

use crate::ast::{
    Delete, Expr, Insert, InsertSource, Query, Select, SetExpr, Statement, TableRef, Update,
};

/// Index of a scope in the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// What a visible name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source<'a> {
    /// A physical table.
    Table {
        /// Schema qualifier, if written.
        schema: Option<&'a str>,
        /// Table name.
        name: &'a str,
    },
    /// A common table expression; `scope` is the scope of its definition.
    Cte {
        /// Scope of the defining query.
        scope: ScopeId,
    },
    /// A derived table; `scope` is the scope of the subquery.
    Derived {
        /// Scope of the subquery.
        scope: ScopeId,
    },
}

/// One name visible in a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding<'a> {
    /// The exposed name (the alias if one was written, else the table or
    /// CTE name).
    pub name: &'a str,
    /// What the name refers to.
    pub source: Source<'a>,
}

/// One scope: the names one query block can see directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope<'a> {
    /// Enclosing scope, if any. Lookups walk this chain.
    pub parent: Option<ScopeId>,
    /// Bindings in registration order.
    pub bindings: Vec<Binding<'a>>,
    /// Scopes of nested query blocks that no binding owns: SELECT bodies
    /// under a query scope, unaliased derived tables, and subqueries
    /// appearing in expressions.
    pub subscopes: Vec<ScopeId>,
}

/// Result of resolving a column's table qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'t, 'a> {
    /// The qualifier names this visible binding.
    Binding(&'t Binding<'a>),
    /// The column carried no qualifier; it is left unresolved by design.
    Unqualified,
    /// No visible binding matches the qualifier.
    Unresolved,
}

/// The scope tree of one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeTree<'a> {
    scopes: Vec<Scope<'a>>,
    /// Names bound more than once in a single scope, in discovery order.
    pub duplicate_aliases: Vec<&'a str>,
}

impl<'a> ScopeTree<'a> {
    /// Builds the scope tree of a statement. Never fails.
    #[must_use]
    pub fn build(statement: &'a Statement) -> Self {
        let mut tree = Self {
            scopes: Vec::new(),
            duplicate_aliases: Vec::new(),
        };
        let root = tree.alloc(None);
        match statement {
            Statement::Query(query) => tree.walk_query(query, root),
            Statement::Insert(insert) => tree.walk_insert(insert, root),
            Statement::Update(update) => tree.walk_update(update, root),
            Statement::Delete(delete) => tree.walk_delete(delete, root),
        }
        tree
    }

    /// The statement's outermost scope.
    #[must_use]
    pub const fn root() -> ScopeId {
        ScopeId(0)
    }

    /// Returns the scope at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this tree.
    #[must_use]
    pub fn scope(&self, id: ScopeId) -> &Scope<'a> {
        &self.scopes[id.0]
    }

    /// Number of scopes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Returns true if the tree holds no scopes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Resolves a column's table qualifier from `scope` outward.
    ///
    /// Unqualified columns are not resolved against source column sets;
    /// qualifier resolution is the part that needs no schema catalog.
    #[must_use]
    pub fn resolve<'t>(
        &'t self,
        scope: ScopeId,
        qualifier: Option<&str>,
    ) -> Resolution<'t, 'a> {
        let Some(qualifier) = qualifier else {
            return Resolution::Unqualified;
        };
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.0];
            if let Some(binding) = scope
                .bindings
                .iter()
                .find(|b| b.name.eq_ignore_ascii_case(qualifier))
            {
                return Resolution::Binding(binding);
            }
            current = scope.parent;
        }
        Resolution::Unresolved
    }

    fn alloc(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            parent,
            bindings: Vec::new(),
            subscopes: Vec::new(),
        });
        if let Some(parent) = parent {
            self.scopes[parent.0].subscopes.push(id);
        }
        id
    }

    /// Allocates a scope without listing it in the parent's subscopes;
    /// used when a binding owns the child scope.
    fn alloc_owned(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            parent: Some(parent),
            bindings: Vec::new(),
            subscopes: Vec::new(),
        });
        id
    }

    fn bind(&mut self, scope: ScopeId, name: &'a str, source: Source<'a>) {
        let bindings = &self.scopes[scope.0].bindings;
        if bindings.iter().any(|b| b.name.eq_ignore_ascii_case(name)) {
            self.duplicate_aliases.push(name);
        }
        self.scopes[scope.0].bindings.push(Binding { name, source });
    }

    /// Finds the defining scope of a visible CTE named `name`, if any.
    /// Only CTE bindings participate; table aliases never shadow a table
    /// name into a CTE reference.
    fn find_cte(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.0];
            for binding in &scope.bindings {
                if let Source::Cte { scope: cte_scope } = binding.source {
                    if binding.name.eq_ignore_ascii_case(name) {
                        return Some(cte_scope);
                    }
                }
            }
            current = scope.parent;
        }
        None
    }

    fn walk_query(&mut self, query: &'a Query, scope: ScopeId) {
        if let Some(with) = &query.with {
            for cte in &with.ctes {
                let cte_scope = self.alloc_owned(scope);
                // Under RECURSIVE the CTE sees its own name; otherwise the
                // name only becomes visible to what follows.
                if with.recursive {
                    self.bind(scope, &cte.name, Source::Cte { scope: cte_scope });
                }
                self.walk_query(&cte.query, cte_scope);
                if !with.recursive {
                    self.bind(scope, &cte.name, Source::Cte { scope: cte_scope });
                }
            }
        }

        self.walk_set_expr(&query.body, scope);

        for entry in &query.order_by {
            self.walk_expr(&entry.expr, scope);
        }
        if let Some(limit) = &query.limit {
            if let Some(expr) = &limit.limit {
                self.walk_expr(expr, scope);
            }
            if let Some(expr) = &limit.offset {
                self.walk_expr(expr, scope);
            }
        }
    }

    fn walk_set_expr(&mut self, body: &'a SetExpr, parent: ScopeId) {
        match body {
            SetExpr::Select(select) => {
                let scope = self.alloc(Some(parent));
                self.walk_select(select, scope);
            }
            SetExpr::SetOp { left, right, .. } => {
                self.walk_set_expr(left, parent);
                self.walk_set_expr(right, parent);
            }
        }
    }

    fn walk_select(&mut self, select: &'a Select, scope: ScopeId) {
        for table_ref in &select.from {
            self.register_table_ref(table_ref, scope);
        }
        for column in &select.columns {
            self.walk_expr(&column.expr, scope);
        }
        if let Some(expr) = &select.where_clause {
            self.walk_expr(expr, scope);
        }
        for expr in &select.group_by {
            self.walk_expr(expr, scope);
        }
        if let Some(expr) = &select.having {
            self.walk_expr(expr, scope);
        }
    }

    fn register_table_ref(&mut self, table_ref: &'a TableRef, scope: ScopeId) {
        match table_ref {
            TableRef::Table {
                schema,
                name,
                alias,
                ..
            } => {
                let exposed = alias.as_deref().unwrap_or(name);
                let source = if schema.is_none() {
                    self.find_cte(scope, name).map_or(
                        Source::Table { schema: None, name },
                        |cte_scope| Source::Cte { scope: cte_scope },
                    )
                } else {
                    Source::Table {
                        schema: schema.as_deref(),
                        name,
                    }
                };
                self.bind(scope, exposed, source);
            }
            TableRef::Derived { query, alias, .. } => match alias {
                Some(alias) => {
                    let derived = self.alloc_owned(scope);
                    self.walk_query(query, derived);
                    self.bind(scope, alias, Source::Derived { scope: derived });
                }
                None => {
                    // Unreachable by name, but its tables still exist.
                    let derived = self.alloc(Some(scope));
                    self.walk_query(query, derived);
                }
            },
            TableRef::Join { left, join } => {
                self.register_table_ref(left, scope);
                self.register_table_ref(&join.table, scope);
                if let Some(on) = &join.on {
                    self.walk_expr(on, scope);
                }
            }
        }
    }

    fn walk_expr(&mut self, expr: &'a Expr, scope: ScopeId) {
        match expr {
            Expr::Literal(_) | Expr::Column { .. } | Expr::Wildcard { .. } => {}
            Expr::Binary { left, right, .. } => {
                self.walk_expr(left, scope);
                self.walk_expr(right, scope);
            }
            Expr::Unary { operand, .. } => self.walk_expr(operand, scope),
            Expr::IsNull { expr, .. } => self.walk_expr(expr, scope),
            Expr::InList { expr, list, .. } => {
                self.walk_expr(expr, scope);
                for item in list {
                    self.walk_expr(item, scope);
                }
            }
            Expr::InSubquery { expr, query, .. } => {
                self.walk_expr(expr, scope);
                self.walk_subquery(query, scope);
            }
            Expr::Between {
                expr, low, high, ..
            } => {
                self.walk_expr(expr, scope);
                self.walk_expr(low, scope);
                self.walk_expr(high, scope);
            }
            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                if let Some(operand) = operand {
                    self.walk_expr(operand, scope);
                }
                for (condition, result) in when_clauses {
                    self.walk_expr(condition, scope);
                    self.walk_expr(result, scope);
                }
                if let Some(else_clause) = else_clause {
                    self.walk_expr(else_clause, scope);
                }
            }
            Expr::Cast { expr, .. } => self.walk_expr(expr, scope),
            Expr::Function(call) => {
                for arg in &call.args {
                    self.walk_expr(arg, scope);
                }
            }
            Expr::Exists { query } => self.walk_subquery(query, scope),
            Expr::Subquery(query) => self.walk_subquery(query, scope),
            Expr::Paren(inner) => self.walk_expr(inner, scope),
        }
    }

    fn walk_subquery(&mut self, query: &'a Query, parent: ScopeId) {
        let scope = self.alloc(Some(parent));
        self.walk_query(query, scope);
    }

    fn walk_insert(&mut self, insert: &'a Insert, scope: ScopeId) {
        self.bind(
            scope,
            &insert.table.name,
            Source::Table {
                schema: insert.table.schema.as_deref(),
                name: &insert.table.name,
            },
        );
        match &insert.source {
            InsertSource::Values(rows) => {
                for row in rows {
                    for expr in row {
                        self.walk_expr(expr, scope);
                    }
                }
            }
            InsertSource::Query(query) => self.walk_subquery(query, scope),
            InsertSource::DefaultValues => {}
        }
    }

    fn walk_update(&mut self, update: &'a Update, scope: ScopeId) {
        let exposed = update.alias.as_deref().unwrap_or(&update.table.name);
        self.bind(
            scope,
            exposed,
            Source::Table {
                schema: update.table.schema.as_deref(),
                name: &update.table.name,
            },
        );
        for table_ref in &update.from {
            self.register_table_ref(table_ref, scope);
        }
        for assignment in &update.assignments {
            self.walk_expr(&assignment.value, scope);
        }
        if let Some(expr) = &update.where_clause {
            self.walk_expr(expr, scope);
        }
    }

    fn walk_delete(&mut self, delete: &'a Delete, scope: ScopeId) {
        let exposed = delete.alias.as_deref().unwrap_or(&delete.table.name);
        self.bind(
            scope,
            exposed,
            Source::Table {
                schema: delete.table.schema.as_deref(),
                name: &delete.table.name,
            },
        );
        if let Some(expr) = &delete.where_clause {
            self.walk_expr(expr, scope);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{GENERIC, POSTGRES};
    use crate::parser::parse;

    fn tree_of(sql: &str) -> (Statement, usize) {
        let statement = parse(sql, &GENERIC).unwrap();
        let count = ScopeTree::build(&statement).len();
        (statement, count)
    }

    #[test]
    fn test_select_bindings_use_aliases() {
        let statement = parse("SELECT u.id FROM users u JOIN orders o ON u.id = o.user_id", &GENERIC)
            .unwrap();
        let tree = ScopeTree::build(&statement);

        // Root scope plus the SELECT block's scope.
        assert_eq!(tree.len(), 2);
        let select_scope = tree.scope(ScopeTree::root()).subscopes[0];
        let names: Vec<&str> = tree
            .scope(select_scope)
            .bindings
            .iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["u", "o"]);

        match tree.resolve(select_scope, Some("o")) {
            Resolution::Binding(binding) => {
                assert_eq!(
                    binding.source,
                    Source::Table {
                        schema: None,
                        name: "orders"
                    }
                );
            }
            other => panic!("expected a binding, got {other:?}"),
        }
        assert_eq!(
            tree.resolve(select_scope, Some("missing")),
            Resolution::Unresolved
        );
        assert_eq!(tree.resolve(select_scope, None), Resolution::Unqualified);
    }

    #[test]
    fn test_cte_reference_is_not_a_table() {
        let statement = parse(
            "WITH s AS (SELECT id FROM products) SELECT * FROM s",
            &GENERIC,
        )
        .unwrap();
        let tree = ScopeTree::build(&statement);

        let root = tree.scope(ScopeTree::root());
        assert!(matches!(root.bindings[0].source, Source::Cte { .. }));

        // The outer SELECT's `s` resolves to the CTE, not a table.
        let select_scope = *root.subscopes.last().unwrap();
        let Resolution::Binding(binding) = tree.resolve(select_scope, Some("s")) else {
            panic!("expected a binding");
        };
        assert!(matches!(binding.source, Source::Cte { .. }));
    }

    #[test]
    fn test_earlier_ctes_visible_to_later_ones() {
        let statement = parse(
            "WITH a AS (SELECT 1 AS x), b AS (SELECT x FROM a) SELECT * FROM b",
            &GENERIC,
        )
        .unwrap();
        let tree = ScopeTree::build(&statement);

        // `b`'s SELECT scope sits under `b`'s query scope under the root;
        // from there `a` must resolve through the parent chain.
        let root = tree.scope(ScopeTree::root());
        let Source::Cte { scope: b_scope } = root.bindings[1].source else {
            panic!("expected b to be a CTE binding");
        };
        let b_select = tree.scope(b_scope).subscopes[0];
        let Resolution::Binding(binding) = tree.resolve(b_select, Some("a")) else {
            panic!("expected a to be visible inside b");
        };
        assert!(matches!(binding.source, Source::Cte { .. }));
    }

    #[test]
    fn test_recursive_cte_sees_its_own_name() {
        let statement = parse(
            "WITH RECURSIVE r AS (SELECT 1 UNION ALL SELECT n + 1 FROM r) SELECT * FROM r",
            &POSTGRES,
        )
        .unwrap();
        let tree = ScopeTree::build(&statement);

        let root = tree.scope(ScopeTree::root());
        let Source::Cte { scope: r_scope } = root.bindings[0].source else {
            panic!("expected r to be a CTE binding");
        };
        // The recursive arm's SELECT scope resolves `r` via the root.
        let recursive_select = tree.scope(r_scope).subscopes[1];
        let Resolution::Binding(binding) = tree.resolve(recursive_select, Some("r")) else {
            panic!("expected r to be visible inside its own definition");
        };
        assert!(matches!(binding.source, Source::Cte { .. }));
    }

    #[test]
    fn test_duplicate_aliases_recorded_first_binding_wins() {
        let statement = parse("SELECT t.x FROM a t, b t", &GENERIC).unwrap();
        let tree = ScopeTree::build(&statement);
        assert_eq!(tree.duplicate_aliases, vec!["t"]);

        let select_scope = tree.scope(ScopeTree::root()).subscopes[0];
        let Resolution::Binding(binding) = tree.resolve(select_scope, Some("t")) else {
            panic!("expected a binding");
        };
        assert_eq!(
            binding.source,
            Source::Table {
                schema: None,
                name: "a"
            }
        );
    }

    #[test]
    fn test_subqueries_get_their_own_scopes() {
        let (_, with_subquery) =
            tree_of("SELECT * FROM t WHERE id IN (SELECT t_id FROM u)");
        let (_, without) = tree_of("SELECT * FROM t WHERE id IN (1, 2)");
        // One query scope and one SELECT scope more.
        assert_eq!(with_subquery, without + 2);
    }

    #[test]
    fn test_dml_targets_are_bound() {
        let statement = parse("DELETE FROM app.logs l WHERE l.old", &GENERIC).unwrap();
        let tree = ScopeTree::build(&statement);
        let root = tree.scope(ScopeTree::root());
        assert_eq!(root.bindings[0].name, "l");
        assert_eq!(
            root.bindings[0].source,
            Source::Table {
                schema: Some("app"),
                name: "logs"
            }
        );
    }
}
