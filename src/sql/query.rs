//! Query builder - construct SELECT statements with a fluent API.

use super::expr::Expr;
use super::{SqlWriter, Statement};

// =============================================================================
// Select Expression (expression with optional alias)
// =============================================================================

/// A SELECT list item: expression with optional alias.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct SelectExpr {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectExpr {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    fn write_to(&self, w: &mut SqlWriter) {
        self.expr.write_to(w);
        if let Some(alias) = &self.alias {
            w.push(" AS ").ident(alias);
        }
    }
}

impl From<Expr> for SelectExpr {
    fn from(expr: Expr) -> Self {
        SelectExpr::new(expr)
    }
}

// =============================================================================
// FROM sources
// =============================================================================

/// A table reference with optional alias.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct TableRef {
    pub table: String,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    fn write_to(&self, w: &mut SqlWriter) {
        w.ident(&self.table);
        if let Some(alias) = &self.alias {
            w.push(" AS ").ident(alias);
        }
    }
}

/// What a query reads from: a table or a derived table.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Table(TableRef),
    Derived { query: Box<Query>, alias: String },
}

impl Source {
    fn write_to(&self, w: &mut SqlWriter) {
        match self {
            Source::Table(table) => table.write_to(w),
            Source::Derived { query, alias } => {
                w.push("(");
                query.write_to(w);
                w.push(") AS ").ident(alias);
            }
        }
    }
}

// =============================================================================
// Joins
// =============================================================================

/// A LEFT JOIN clause.
///
/// Relationship hops may be missing (a species without a group,
/// a site without threats). Only left joins are emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: TableRef,
    pub on: Expr,
}

impl Join {
    fn write_to(&self, w: &mut SqlWriter) {
        w.push(" LEFT JOIN ");
        self.table.write_to(w);
        w.push(" ON ");
        self.on.write_to(w);
    }
}

// =============================================================================
// ORDER BY
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// An ORDER BY expression.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct OrderByExpr {
    pub expr: Expr,
    pub dir: SortDir,
}

impl OrderByExpr {
    pub fn asc(expr: Expr) -> Self {
        Self {
            expr,
            dir: SortDir::Asc,
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            expr,
            dir: SortDir::Desc,
        }
    }

    fn write_to(&self, w: &mut SqlWriter) {
        self.expr.write_to(w);
        w.push(match self.dir {
            SortDir::Asc => " ASC",
            SortDir::Desc => " DESC",
        });
    }
}

// =============================================================================
// Query Builder
// =============================================================================

/// A SELECT query.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Query has no effect until converted with to_statement()"]
pub struct Query {
    pub select: Vec<SelectExpr>,
    pub distinct: bool,
    pub from: Option<Source>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<u64>,
}

impl Query {
    /// Create a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SELECT list.
    pub fn select(mut self, exprs: Vec<impl Into<SelectExpr>>) -> Self {
        self.select = exprs.into_iter().map(|e| e.into()).collect();
        self
    }

    /// Add DISTINCT.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Set the FROM table.
    pub fn from(mut self, table: TableRef) -> Self {
        self.from = Some(Source::Table(table));
        self
    }

    /// Read from a derived table: `FROM (subquery) AS alias`.
    pub fn from_derived(mut self, query: Query, alias: &str) -> Self {
        self.from = Some(Source::Derived {
            query: Box::new(query),
            alias: alias.into(),
        });
        self
    }

    /// Add a LEFT JOIN.
    pub fn left_join(mut self, table: TableRef, on: Expr) -> Self {
        self.joins.push(Join { table, on });
        self
    }

    /// Add a WHERE condition (ANDed with existing conditions).
    pub fn filter(mut self, condition: Expr) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    /// Set the GROUP BY clause.
    pub fn group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.group_by = exprs;
        self
    }

    /// Set the ORDER BY clause.
    pub fn order_by(mut self, exprs: Vec<OrderByExpr>) -> Self {
        self.order_by = exprs;
        self
    }

    /// Set LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render to SQL text plus positional parameters.
    pub fn to_statement(&self) -> Statement {
        let mut w = SqlWriter::new();
        self.write_to(&mut w);
        w.finish()
    }

    fn write_to(&self, w: &mut SqlWriter) {
        w.push("SELECT ");
        if self.distinct {
            w.push("DISTINCT ");
        }
        for (i, item) in self.select.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            item.write_to(w);
        }

        if let Some(from) = &self.from {
            w.push(" FROM ");
            from.write_to(w);
        }

        for join in &self.joins {
            join.write_to(w);
        }

        if let Some(condition) = &self.where_clause {
            w.push(" WHERE ");
            condition.write_to(w);
        }

        if !self.group_by.is_empty() {
            w.push(" GROUP BY ");
            for (i, expr) in self.group_by.iter().enumerate() {
                if i > 0 {
                    w.push(", ");
                }
                expr.write_to(w);
            }
        }

        if !self.order_by.is_empty() {
            w.push(" ORDER BY ");
            for (i, item) in self.order_by.iter().enumerate() {
                if i > 0 {
                    w.push(", ");
                }
                item.write_to(w);
            }
        }

        if let Some(limit) = self.limit {
            w.push(" LIMIT ").push(&limit.to_string());
        }
    }
}
