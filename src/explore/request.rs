//! Query request types, as received from callers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Reserved y-field token meaning "count the records".
pub const COUNT_TOKEN: &str = "count";

/// Requested output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Pie,
    Table,
}

impl ChartType {
    pub fn is_table(&self) -> bool {
        matches!(self, ChartType::Table)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::Table => "table",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single filter operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::Text(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        ScalarValue::Text(s)
    }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self {
        ScalarValue::Bool(b)
    }
}

impl From<i64> for ScalarValue {
    fn from(n: i64) -> Self {
        ScalarValue::Integer(n)
    }
}

impl From<f64> for ScalarValue {
    fn from(x: f64) -> Self {
        ScalarValue::Float(x)
    }
}

/// Scalar for equality, list for set membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Set(Vec<ScalarValue>),
    Scalar(ScalarValue),
}

impl From<ScalarValue> for FilterValue {
    fn from(value: ScalarValue) -> Self {
        FilterValue::Scalar(value)
    }
}

macro_rules! scalar_filter_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FilterValue {
                fn from(value: $t) -> Self {
                    FilterValue::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_filter_from!(&str, String, bool, i64, f64);

impl<T: Into<ScalarValue>> FromIterator<T> for FilterValue {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        FilterValue::Set(iter.into_iter().map(Into::into).collect())
    }
}

/// One `field = value` or `field IN values` constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    pub field: String,
    pub value: FilterValue,
}

impl FilterClause {
    pub fn new(field: &str, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
        }
    }
}

/// A request against one source.
///
/// Wire format:
/// ```json
/// {"source": "wetland_sites", "x_field": "region", "y_field": "count",
///  "chart_type": "pie", "filters": {"is_ramsar_site": true}, "group_by": ""}
/// ```
/// A `y_field` of `""` or `"count"` and a `group_by` of `""` mean "none".
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryRequest {
    pub source: String,
    pub x_field: String,
    #[serde(default, deserialize_with = "y_field_from_wire")]
    pub y_field: Option<String>,
    #[serde(default)]
    pub chart_type: ChartType,
    #[serde(default, deserialize_with = "filters_from_map")]
    pub filters: Vec<FilterClause>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub group_by: Option<String>,
}

impl QueryRequest {
    pub fn new(source: &str, x_field: &str, chart_type: ChartType) -> Self {
        Self {
            source: source.to_string(),
            x_field: x_field.to_string(),
            y_field: None,
            chart_type,
            filters: Vec::new(),
            group_by: None,
        }
    }

    pub fn with_y_field(mut self, y_field: &str) -> Self {
        self.y_field = normalize_y_field(Some(y_field.to_string()));
        self
    }

    pub fn with_filter(mut self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.filters.push(FilterClause::new(field, value));
        self
    }

    pub fn with_group_by(mut self, group_by: &str) -> Self {
        self.group_by = Some(group_by.to_string()).filter(|g| !g.is_empty());
        self
    }

    /// Every field id the request references, in validation order:
    /// x, y, group_by, then filters.
    pub fn referenced_fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.x_field.as_str())
            .chain(self.y_field.as_deref())
            .chain(self.group_by.as_deref())
            .chain(self.filters.iter().map(|f| f.field.as_str()))
    }
}

fn normalize_y_field(y_field: Option<String>) -> Option<String> {
    y_field.filter(|y| !y.is_empty() && y != COUNT_TOKEN)
}

fn y_field_from_wire<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(normalize_y_field)
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

fn filters_from_map<'de, D>(deserializer: D) -> Result<Vec<FilterClause>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<BTreeMap<String, FilterValue>>::deserialize(deserializer)?;
    Ok(map
        .unwrap_or_default()
        .into_iter()
        .map(|(field, value)| FilterClause { field, value })
        .collect())
}
