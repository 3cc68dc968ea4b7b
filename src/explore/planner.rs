//! Aggregation Planner - turns a validated request into SQL statements.
//!
//! Planning is pure: it decides the aggregation, rejects unusable field
//! combinations and renders statements, but never runs them. Only the
//! relations that referenced fields actually need are joined.
//!
//! Chart statements return `(label, value)` rows ordered by value descending,
//! then label ascending. Table statements return one column per requested
//! field, capped at [`TABLE_ROW_CAP`] rows.

use std::collections::HashSet;

use super::error::{ExploreError, ExploreResult};
use super::filter::{field_expr, Predicate};
use super::request::ChartType;
use crate::registry::{AggregationKind, FieldAccess, FieldDescriptor, SourceDescriptor, ROOT_ALIAS};
use crate::sql::{
    coalesce, col, count_distinct, ident, sum, Expr, OrderByExpr, Query, SelectExpr, Statement,
    TableRef,
};

/// Hard ceiling on table-mode rows. There is no continuation.
pub const TABLE_ROW_CAP: u64 = 100;

const LABEL: &str = "label";
const VALUE: &str = "value";
const ROW_KEY: &str = "row_key";

/// A request whose source and fields have all been resolved.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedQuery<'r> {
    pub source: &'r SourceDescriptor,
    pub chart_type: ChartType,
    pub x: &'r FieldDescriptor,
    pub y: Option<&'r FieldDescriptor>,
    pub group_by: Option<&'r FieldDescriptor>,
}

/// How chart values are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// Distinct count of root records per group.
    Records,
    /// Distinct count of a registered count target per group.
    Count,
    /// Sum of a numeric field, missing values as zero.
    Sum,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlan {
    pub chart_type: ChartType,
    pub measure: Measure,
    pub label_field: FieldDescriptor,
    /// `(label, value)` rows.
    pub groups: Statement,
    /// Single row, single column: distinct root records after filtering.
    pub total: Statement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TablePlan {
    pub columns: Vec<FieldDescriptor>,
    /// Number of leading bookkeeping columns to drop from each row.
    pub skip: usize,
    pub statement: Statement,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Chart(ChartPlan),
    Table(TablePlan),
}

/// Plan `query` narrowed by `predicate`.
pub fn plan(query: &ResolvedQuery<'_>, predicate: &Predicate) -> ExploreResult<Plan> {
    if query.chart_type.is_table() {
        Ok(Plan::Table(plan_table(query, predicate)?))
    } else {
        Ok(Plan::Chart(plan_chart(query, predicate)?))
    }
}

fn plan_chart(query: &ResolvedQuery<'_>, predicate: &Predicate) -> ExploreResult<ChartPlan> {
    let x = query.x;
    if x.aggregation == AggregationKind::Count {
        return Err(ExploreError::aggregation(
            &x.id,
            "derived counts cannot be used as the grouping axis",
        ));
    }

    let measure = match query.y {
        None => Measure::Records,
        Some(y) => match y.aggregation {
            AggregationKind::Count => Measure::Count,
            AggregationKind::Sum => Measure::Sum,
            AggregationKind::None => {
                return Err(ExploreError::aggregation(
                    &y.id,
                    format!("a {} field cannot be summed", y.semantic_type.as_str()),
                ))
            }
        },
    };

    if let Some(group_by) = query.group_by {
        tracing::debug!(field = %group_by.id, "group_by has no effect in chart mode");
    }

    let accessed: Vec<&FieldAccess> = std::iter::once(&x.access)
        .chain(query.y.map(|y| &y.access))
        .collect();
    let scoped = scoped_query(query.source, &accessed, predicate)?;
    let label = field_expr(&x.access);

    let groups = match (measure, query.y) {
        (Measure::Sum, Some(y)) => {
            let y_row = match y.access.relation() {
                Some(prefix) => col(prefix, "id"),
                None => col(ROOT_ALIAS, "id"),
            };
            let rows = scoped
                .select(vec![
                    SelectExpr::new(col(ROOT_ALIAS, "id")).with_alias(ROW_KEY),
                    SelectExpr::new(y_row).with_alias("y_row"),
                    SelectExpr::new(label).with_alias(LABEL),
                    SelectExpr::new(field_expr(&y.access)).with_alias("amount"),
                ])
                .distinct();
            Query::new()
                .select(vec![
                    SelectExpr::new(ident(LABEL)).with_alias(LABEL),
                    SelectExpr::new(sum(coalesce(vec![ident("amount"), Expr::Integer(0)])))
                        .with_alias(VALUE),
                ])
                .from_derived(rows, "rows")
                .group_by(vec![ident(LABEL)])
        }
        (_, y) => {
            let value = match y {
                Some(y) => field_expr(&y.access),
                None => count_distinct(col(ROOT_ALIAS, "id")),
            };
            scoped
                .select(vec![
                    SelectExpr::new(label.clone()).with_alias(LABEL),
                    SelectExpr::new(value).with_alias(VALUE),
                ])
                .group_by(vec![label])
        }
    }
    .order_by(vec![OrderByExpr::desc(ident(VALUE)), OrderByExpr::asc(ident(LABEL))])
    .to_statement();

    let total = scoped_query(query.source, &[], predicate)?
        .select(vec![count_distinct(col(ROOT_ALIAS, "id"))])
        .to_statement();

    Ok(ChartPlan {
        chart_type: query.chart_type,
        measure,
        label_field: x.clone(),
        groups,
        total,
    })
}

fn plan_table(query: &ResolvedQuery<'_>, predicate: &Predicate) -> ExploreResult<TablePlan> {
    let mut columns: Vec<&FieldDescriptor> = vec![query.x];
    for field in [query.y, query.group_by].into_iter().flatten() {
        if !columns.iter().any(|c| c.id == field.id) {
            columns.push(field);
        }
    }

    let accessed: Vec<&FieldAccess> = columns.iter().map(|c| &c.access).collect();
    let scoped = scoped_query(query.source, &accessed, predicate)?;
    let projected = columns
        .iter()
        .map(|c| SelectExpr::new(field_expr(&c.access)).with_alias(&c.id));

    let grouped = columns.iter().any(|c| c.access.is_aggregate());
    let (statement, skip) = if grouped {
        let keys: Vec<Expr> = columns
            .iter()
            .filter(|c| !c.access.is_aggregate())
            .map(|c| field_expr(&c.access))
            .collect();
        let order = keys.iter().cloned().map(OrderByExpr::asc).collect();
        let statement = scoped
            .select(projected.collect::<Vec<_>>())
            .group_by(keys)
            .order_by(order)
            .limit(TABLE_ROW_CAP)
            .to_statement();
        (statement, 0)
    } else {
        // Rows are keyed by root id so filter joins cannot duplicate them.
        let select: Vec<SelectExpr> =
            std::iter::once(SelectExpr::new(col(ROOT_ALIAS, "id")).with_alias(ROW_KEY))
                .chain(projected)
                .collect();
        let statement = scoped
            .select(select)
            .distinct()
            .order_by(vec![OrderByExpr::asc(ident(ROW_KEY))])
            .limit(TABLE_ROW_CAP)
            .to_statement();
        (statement, 1)
    };

    Ok(TablePlan {
        columns: columns.into_iter().cloned().collect(),
        skip,
        statement,
    })
}

/// `FROM source AS root`, the joins needed by `accessed` and the predicate,
/// and the predicate's WHERE condition.
fn scoped_query(
    source: &SourceDescriptor,
    accessed: &[&FieldAccess],
    predicate: &Predicate,
) -> ExploreResult<Query> {
    let mut needed = HashSet::new();
    let prefixes = accessed
        .iter()
        .filter_map(|a| a.relation())
        .chain(predicate.relations());
    for prefix in prefixes {
        for hop in source.relation_chain(prefix)? {
            needed.insert(hop.prefix.as_str());
        }
    }

    let mut query = Query::new().from(TableRef::new(&source.table).with_alias(ROOT_ALIAS));
    // Registration order puts every parent hop before its children.
    for relation in source.relations.iter().filter(|r| needed.contains(r.prefix.as_str())) {
        query = query.left_join(
            TableRef::new(&relation.table).with_alias(&relation.prefix),
            col(&relation.prefix, &relation.remote_column)
                .eq(col(relation.parent_alias(), &relation.local_column)),
        );
    }

    if let Some(condition) = predicate.to_condition() {
        query = query.filter(condition);
    }
    Ok(query)
}
