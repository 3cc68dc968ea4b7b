//! Result Encoder - shapes fetched rows into the response contract.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as JsonValue};

use super::planner::{ChartPlan, Measure, TablePlan};
use super::request::ChartType;
use crate::registry::{FieldDescriptor, SemanticType};
use crate::sql::Value;

/// Rows came back in a shape the plan did not ask for.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unexpected result shape: {0}")]
pub struct ShapeError(String);

/// A chart data point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesValue {
    Integer(i64),
    Decimal(f64),
}

impl SeriesValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            SeriesValue::Integer(n) => *n as f64,
            SeriesValue::Decimal(x) => *x,
        }
    }

    fn add(self, other: SeriesValue) -> SeriesValue {
        match (self, other) {
            (SeriesValue::Integer(a), SeriesValue::Integer(b)) => match a.checked_add(b) {
                Some(n) => SeriesValue::Integer(n),
                None => SeriesValue::Decimal(a as f64 + b as f64),
            },
            (a, b) => SeriesValue::Decimal(a.as_f64() + b.as_f64()),
        }
    }
}

/// `{chart_type, labels, data, total_records}`; `labels[i]` pairs with `data[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartResult {
    pub chart_type: ChartType,
    pub labels: Vec<JsonValue>,
    pub data: Vec<SeriesValue>,
    pub total_records: u64,
}

/// `{chart_type: "table", data, columns}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableResult {
    pub chart_type: ChartType,
    pub data: Vec<Map<String, JsonValue>>,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResult {
    Chart(ChartResult),
    Table(TableResult),
}

impl QueryResult {
    pub fn chart_type(&self) -> ChartType {
        match self {
            QueryResult::Chart(chart) => chart.chart_type,
            QueryResult::Table(table) => table.chart_type,
        }
    }

    /// Groups for a chart, rows for a table.
    pub(crate) fn len(&self) -> usize {
        match self {
            QueryResult::Chart(chart) => chart.labels.len(),
            QueryResult::Table(table) => table.data.len(),
        }
    }
}

/// Bound on chart groups; the tail folds into one labelled bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCap {
    pub max_groups: usize,
    pub other_label: String,
}

/// Encode `(label, value)` rows and the total-count row of a chart plan.
pub fn encode_chart(
    plan: &ChartPlan,
    groups: Vec<Vec<Value>>,
    total: Vec<Vec<Value>>,
    cap: Option<&GroupCap>,
) -> Result<ChartResult, ShapeError> {
    let mut labels = Vec::with_capacity(groups.len());
    let mut data = Vec::with_capacity(groups.len());

    for row in groups {
        let [label, value]: [Value; 2] = row
            .try_into()
            .map_err(|row: Vec<Value>| ShapeError(format!("expected 2 chart columns, got {}", row.len())))?;
        labels.push(cell_to_json(label, &plan.label_field));
        data.push(series_value(value, plan.measure)?);
    }

    if let Some(cap) = cap {
        fold_tail(&mut labels, &mut data, cap);
    }

    let total_records = match total.first().and_then(|row| row.first()) {
        Some(Value::Integer(n)) if *n >= 0 => *n as u64,
        other => return Err(ShapeError(format!("expected a record count, got {:?}", other))),
    };

    Ok(ChartResult {
        chart_type: plan.chart_type,
        labels,
        data,
        total_records,
    })
}

/// Encode the rows of a table plan as objects keyed by field id.
pub fn encode_table(plan: &TablePlan, rows: Vec<Vec<Value>>) -> Result<TableResult, ShapeError> {
    let width = plan.skip + plan.columns.len();
    let data = rows
        .into_iter()
        .map(|row| {
            if row.len() != width {
                return Err(ShapeError(format!(
                    "expected {} table columns, got {}",
                    width,
                    row.len()
                )));
            }
            Ok(plan
                .columns
                .iter()
                .zip(row.into_iter().skip(plan.skip))
                .map(|(field, cell)| (field.id.clone(), cell_to_json(cell, field)))
                .collect::<Map<String, JsonValue>>())
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TableResult {
        chart_type: ChartType::Table,
        data,
        columns: plan.columns.iter().map(|c| c.id.clone()).collect(),
    })
}

/// JSON rendering of a stored cell, typed by its field.
pub(crate) fn cell_to_json(cell: Value, field: &FieldDescriptor) -> JsonValue {
    match (cell, field.semantic_type) {
        (Value::Null, _) => JsonValue::Null,
        (Value::Integer(n), SemanticType::Boolean) => JsonValue::Bool(n != 0),
        (Value::Integer(n), _) => JsonValue::from(n),
        (Value::Real(x), _) => Number::from_f64(x).map_or(JsonValue::Null, JsonValue::Number),
        (Value::Text(s), _) => JsonValue::String(s),
    }
}

fn series_value(cell: Value, measure: Measure) -> Result<SeriesValue, ShapeError> {
    match (cell, measure) {
        (Value::Integer(n), Measure::Records | Measure::Count) if n >= 0 => {
            Ok(SeriesValue::Integer(n))
        }
        (Value::Integer(n), Measure::Sum) => Ok(SeriesValue::Integer(n)),
        (Value::Real(x), Measure::Sum) if x.is_finite() => Ok(whole_or_decimal(x)),
        (cell, _) => Err(ShapeError(format!("unexpected {:?} value {:?}", measure, cell))),
    }
}

fn whole_or_decimal(x: f64) -> SeriesValue {
    if x.fract() == 0.0 && x.abs() < 9.0e15 {
        SeriesValue::Integer(x as i64)
    } else {
        SeriesValue::Decimal(x)
    }
}

/// Keep the first `max_groups` entries and fold the rest into one trailing
/// bucket. Totals are preserved.
///
/// A group already labelled like the bucket is folded into it, so the label
/// appears once. The bucket is always last and is not ranked: the output is
/// not necessarily sorted by value once it is added.
fn fold_tail(labels: &mut Vec<JsonValue>, data: &mut Vec<SeriesValue>, cap: &GroupCap) {
    if cap.max_groups == 0 || labels.len() <= cap.max_groups {
        return;
    }
    let bucket = JsonValue::String(cap.other_label.clone());
    let mut kept_labels = Vec::with_capacity(cap.max_groups + 1);
    let mut kept_data = Vec::with_capacity(cap.max_groups + 1);
    let mut rest = SeriesValue::Integer(0);

    for (label, value) in labels.drain(..).zip(data.drain(..)) {
        if label != bucket && kept_labels.len() < cap.max_groups {
            kept_labels.push(label);
            kept_data.push(value);
        } else {
            rest = rest.add(value);
        }
    }

    kept_labels.push(bucket);
    kept_data.push(rest);
    *labels = kept_labels;
    *data = kept_data;
}
