//! SQL generation for the exploration engine.
//!
//! A small, strongly-typed SQL builder targeting SQLite:
//!
//! - **expr**: Expression AST (columns, functions, predicates, bound parameters)
//! - **query**: SELECT builder (joins, grouping, ordering, limit, derived tables)
//!
//! Caller-supplied values never appear in SQL text. They are collected as
//! positional parameters in a [`Statement`] and bound by the store.
//! Identifiers only ever come from the registry and are always quoted.

pub mod expr;
pub mod query;

pub use expr::{
    coalesce, col, count_distinct, count_star, func, ident, param, sum, BinaryOperator, Expr,
};
pub use query::{Join, OrderByExpr, Query, SelectExpr, SortDir, Source, TableRef};

/// A scalar SQL value, used both for bound parameters and fetched cells.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

/// A rendered SQL statement with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Accumulates SQL text and parameters while rendering.
#[derive(Debug, Default)]
pub(crate) struct SqlWriter {
    sql: String,
    params: Vec<Value>,
}

impl SqlWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, s: &str) -> &mut Self {
        self.sql.push_str(s);
        self
    }

    pub(crate) fn ident(&mut self, name: &str) -> &mut Self {
        self.sql.push('"');
        self.sql.push_str(&name.replace('"', "\"\""));
        self.sql.push('"');
        self
    }

    pub(crate) fn bind(&mut self, value: &Value) -> &mut Self {
        self.sql.push('?');
        self.params.push(value.clone());
        self
    }

    pub(crate) fn finish(self) -> Statement {
        Statement {
            sql: self.sql,
            params: self.params,
        }
    }
}
