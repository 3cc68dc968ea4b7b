//! Filter Compiler - turns request filters into a composable predicate.
//!
//! Compilation resolves every filtered field through the registry and
//! coerces its operand to the field's semantic type. It performs no I/O, so
//! a bad filter is rejected before the store is ever consulted.

use super::error::{ExploreError, ExploreResult};
use super::request::{FilterClause, FilterValue, ScalarValue};
use crate::registry::{AggregationKind, FieldAccess, FieldDescriptor, Registry, SemanticType, ROOT_ALIAS};
use crate::sql::{col, func, param, Expr, Value};

/// SQL expression reading a field's value from the joined row.
///
/// Aggregate accesses render as their aggregate; callers decide whether that
/// is meaningful where they place it.
pub(crate) fn field_expr(access: &FieldAccess) -> Expr {
    let alias = access.relation().unwrap_or(ROOT_ALIAS);
    let column = col(alias, access.column());
    match access {
        FieldAccess::Column { .. } => column,
        FieldAccess::Year { .. } => func("strftime", vec![Expr::Str("%Y".into()), column]),
        FieldAccess::CountDistinct { .. } => crate::sql::count_distinct(column),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Condition {
    Equals(Value),
    IsNull,
    OneOf { values: Vec<Value>, include_null: bool },
}

#[derive(Debug, Clone, PartialEq)]
struct Constraint {
    access: FieldAccess,
    condition: Condition,
}

impl Constraint {
    fn to_expr(&self) -> Expr {
        let target = field_expr(&self.access);
        match &self.condition {
            Condition::Equals(value) => target.eq(param(value.clone())),
            Condition::IsNull => target.is_null(),
            Condition::OneOf {
                values,
                include_null,
            } => match (values.is_empty(), include_null) {
                (true, false) => Expr::never(),
                (true, true) => target.is_null(),
                (false, false) => target.in_list(values.iter().cloned().map(param).collect()),
                (false, true) => target
                    .clone()
                    .in_list(values.iter().cloned().map(param).collect())
                    .or(target.is_null())
                    .paren(),
            },
        }
    }
}

/// Conjunction of compiled filter constraints over one source.
///
/// An empty predicate narrows nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    constraints: Vec<Constraint>,
}

impl Predicate {
    /// The identity predicate.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Relation prefixes the predicate reads from.
    pub fn relations(&self) -> impl Iterator<Item = &str> {
        self.constraints.iter().filter_map(|c| c.access.relation())
    }

    /// WHERE condition, or `None` for the identity predicate.
    pub fn to_condition(&self) -> Option<Expr> {
        Expr::conjunction(self.constraints.iter().map(Constraint::to_expr))
    }
}

/// Compile `filters` against `source_id`.
pub fn compile(
    registry: &Registry,
    source_id: &str,
    filters: &[FilterClause],
) -> ExploreResult<Predicate> {
    registry.source(source_id)?;

    let constraints = filters
        .iter()
        .map(|clause| {
            let field = registry.resolve(source_id, &clause.field)?;
            compile_clause(field, &clause.value)
        })
        .collect::<ExploreResult<Vec<_>>>()?;

    Ok(Predicate { constraints })
}

fn compile_clause(field: &FieldDescriptor, value: &FilterValue) -> ExploreResult<Constraint> {
    if field.aggregation == AggregationKind::Count {
        return Err(ExploreError::aggregation(
            &field.id,
            "derived counts cannot be used as filters",
        ));
    }

    let condition = match value {
        FilterValue::Scalar(ScalarValue::Null) => Condition::IsNull,
        FilterValue::Scalar(scalar) => Condition::Equals(coerce(field, scalar)?),
        FilterValue::Set(members) => {
            let mut values = Vec::with_capacity(members.len());
            let mut include_null = false;
            for member in members {
                match member {
                    ScalarValue::Null => include_null = true,
                    other => values.push(coerce(field, other)?),
                }
            }
            Condition::OneOf {
                values,
                include_null,
            }
        }
    };

    Ok(Constraint {
        access: field.access.clone(),
        condition,
    })
}

/// Coerce a non-null operand to the storage representation of `field`.
fn coerce(field: &FieldDescriptor, value: &ScalarValue) -> ExploreResult<Value> {
    let invalid = |expected: &str| {
        ExploreError::filter_value(&field.id, format!("expected {}, got {}", expected, describe(value)))
    };

    match field.semantic_type {
        SemanticType::Boolean => match value {
            ScalarValue::Bool(b) => Ok(Value::Integer(i64::from(*b))),
            ScalarValue::Integer(n @ (0 | 1)) => Ok(Value::Integer(*n)),
            ScalarValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Value::Integer(1)),
                "false" | "0" => Ok(Value::Integer(0)),
                _ => Err(invalid("a boolean")),
            },
            _ => Err(invalid("a boolean")),
        },
        SemanticType::Numeric => match value {
            ScalarValue::Integer(n) => Ok(Value::Integer(*n)),
            ScalarValue::Float(x) => Ok(Value::Real(*x)),
            ScalarValue::Text(s) => {
                let s = s.trim();
                if let Ok(n) = s.parse::<i64>() {
                    Ok(Value::Integer(n))
                } else {
                    s.parse::<f64>()
                        .ok()
                        .filter(|x| x.is_finite())
                        .map(Value::Real)
                        .ok_or_else(|| invalid("a number"))
                }
            }
            _ => Err(invalid("a number")),
        },
        SemanticType::Text | SemanticType::Categorical | SemanticType::Date => match value {
            ScalarValue::Text(s) => Ok(Value::Text(s.clone())),
            ScalarValue::Integer(n) => Ok(Value::Text(n.to_string())),
            ScalarValue::Float(x) => Ok(Value::Text(x.to_string())),
            ScalarValue::Bool(b) => Ok(Value::Text(b.to_string())),
            ScalarValue::Null => Err(invalid("a value")),
        },
    }
}

fn describe(value: &ScalarValue) -> String {
    match value {
        ScalarValue::Bool(b) => b.to_string(),
        ScalarValue::Integer(n) => n.to_string(),
        ScalarValue::Float(x) => x.to_string(),
        ScalarValue::Text(s) => format!("'{}'", s),
        ScalarValue::Null => "null".into(),
    }
}
