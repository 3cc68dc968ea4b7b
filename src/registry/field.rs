//! Field Registry - which attributes each source exposes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{RegistryError, RegistryResult};

/// Semantic type of a field, as presented to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Text,
    Categorical,
    Numeric,
    Boolean,
    Date,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Text => "text",
            SemanticType::Categorical => "categorical",
            SemanticType::Numeric => "numeric",
            SemanticType::Boolean => "boolean",
            SemanticType::Date => "date",
        }
    }
}

/// How a field contributes a value when used as a chart's y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationKind {
    /// Derived quantity: distinct count of related records per group.
    Count,
    /// Numeric attribute summed per group.
    Sum,
    /// Not aggregatable.
    None,
}

/// Pre-registered access path from a source's root row to a value.
///
/// `relation` is the prefix of a [`Relation`](super::Relation) declared on
/// the same source, or `None` for a column of the root table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAccess {
    /// Plain column.
    Column {
        relation: Option<String>,
        column: String,
    },
    /// Calendar year of a date column, as text (`"2021"`).
    Year {
        relation: Option<String>,
        column: String,
    },
    /// Distinct count of a related column.
    CountDistinct {
        relation: Option<String>,
        column: String,
    },
}

impl FieldAccess {
    pub fn relation(&self) -> Option<&str> {
        match self {
            FieldAccess::Column { relation, .. }
            | FieldAccess::Year { relation, .. }
            | FieldAccess::CountDistinct { relation, .. } => relation.as_deref(),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            FieldAccess::Column { column, .. }
            | FieldAccess::Year { column, .. }
            | FieldAccess::CountDistinct { column, .. } => column,
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, FieldAccess::CountDistinct { .. })
    }
}

/// A queryable attribute of a source.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub id: String,
    pub display_name: String,
    pub semantic_type: SemanticType,
    pub aggregation: AggregationKind,
    pub access: FieldAccess,
}

impl FieldDescriptor {
    fn new(id: &str, display_name: &str, semantic_type: SemanticType, access: FieldAccess) -> Self {
        let aggregation = if semantic_type == SemanticType::Numeric {
            AggregationKind::Sum
        } else {
            AggregationKind::None
        };
        Self {
            id: id.into(),
            display_name: display_name.into(),
            semantic_type,
            aggregation,
            access,
        }
    }

    /// A column of the root table.
    pub fn column(id: &str, display_name: &str, semantic_type: SemanticType) -> Self {
        Self::new(
            id,
            display_name,
            semantic_type,
            FieldAccess::Column {
                relation: None,
                column: id.into(),
            },
        )
    }

    /// A column reached through a registered relation.
    pub fn related(
        id: &str,
        display_name: &str,
        semantic_type: SemanticType,
        relation: &str,
        column: &str,
    ) -> Self {
        Self::new(
            id,
            display_name,
            semantic_type,
            FieldAccess::Column {
                relation: Some(relation.into()),
                column: column.into(),
            },
        )
    }

    /// Calendar year of a date column, presented as a category.
    pub fn year_of(id: &str, display_name: &str, relation: Option<&str>, column: &str) -> Self {
        Self::new(
            id,
            display_name,
            SemanticType::Categorical,
            FieldAccess::Year {
                relation: relation.map(String::from),
                column: column.into(),
            },
        )
    }

    /// Distinct count of `column` on `relation` (root when `None`).
    pub fn count_of(id: &str, display_name: &str, relation: Option<&str>, column: &str) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            semantic_type: SemanticType::Numeric,
            aggregation: AggregationKind::Count,
            access: FieldAccess::CountDistinct {
                relation: relation.map(String::from),
                column: column.into(),
            },
        }
    }
}

/// Ordered field list of one source, indexed by id.
#[derive(Debug, Clone, Default)]
struct FieldTable {
    ordered: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
}

/// Field descriptors for every source.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    by_source: HashMap<String, FieldTable>,
}

impl FieldRegistry {
    /// Build the registry from `(source id, fields)` pairs.
    pub fn new(
        entries: impl IntoIterator<Item = (String, Vec<FieldDescriptor>)>,
    ) -> RegistryResult<Self> {
        let mut by_source = HashMap::new();

        for (source, fields) in entries {
            let mut table = FieldTable::default();
            for field in fields {
                check_field(&source, &field)?;
                if table.index.contains_key(&field.id) {
                    return Err(RegistryError::InvalidDefinition(format!(
                        "field '{}' declared twice on source '{}'",
                        field.id, source
                    )));
                }
                table.index.insert(field.id.clone(), table.ordered.len());
                table.ordered.push(field);
            }
            if by_source.insert(source.clone(), table).is_some() {
                return Err(RegistryError::InvalidDefinition(format!(
                    "fields for source '{}' declared twice",
                    source
                )));
            }
        }

        Ok(Self { by_source })
    }

    /// Fields of a source in display order. Empty for an unknown source.
    pub fn fields_for(&self, source_id: &str) -> &[FieldDescriptor] {
        self.by_source
            .get(source_id)
            .map(|t| t.ordered.as_slice())
            .unwrap_or(&[])
    }

    /// Look up a single field.
    pub fn resolve(&self, source_id: &str, field_id: &str) -> RegistryResult<&FieldDescriptor> {
        let table = self
            .by_source
            .get(source_id)
            .ok_or_else(|| RegistryError::UnknownSource(source_id.to_string()))?;
        table
            .index
            .get(field_id)
            .map(|&i| &table.ordered[i])
            .ok_or_else(|| RegistryError::UnknownField {
                source_id: source_id.to_string(),
                field: field_id.to_string(),
            })
    }

    pub(crate) fn sources(&self) -> impl Iterator<Item = &str> {
        self.by_source.keys().map(String::as_str)
    }
}

fn check_field(source: &str, field: &FieldDescriptor) -> RegistryResult<()> {
    let consistent = match field.aggregation {
        AggregationKind::Count => field.access.is_aggregate(),
        AggregationKind::Sum => {
            field.semantic_type == SemanticType::Numeric && !field.access.is_aggregate()
        }
        AggregationKind::None => !field.access.is_aggregate(),
    };
    if consistent {
        Ok(())
    } else {
        Err(RegistryError::InvalidDefinition(format!(
            "field '{}' on source '{}' has aggregation {:?} inconsistent with its type or access",
            field.id, source, field.aggregation
        )))
    }
}
