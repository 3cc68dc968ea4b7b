//! Error contract of the exploration engine.
//!
//! Validation errors are decided from the request and the registry alone.
//! `ExecutionFailed` is the only error that can originate in the store, and
//! it deliberately carries no store detail; that goes to the log.

use crate::registry::RegistryError;

/// Result type for engine operations.
pub type ExploreResult<T> = Result<T, ExploreError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExploreError {
    /// The requested source is not registered.
    #[error("Unknown data source '{0}'")]
    InvalidSource(String),

    /// A field referenced by the request is not registered on the source.
    #[error("Unknown field '{field}' for data source '{source_id}'")]
    InvalidField { source_id: String, field: String },

    /// The field cannot be used the way the request uses it.
    #[error("Field '{field}' cannot be used here: {reason}")]
    InvalidAggregation { field: String, reason: String },

    /// A filter value cannot be interpreted for its field's type.
    #[error("Invalid filter value for '{field}': {reason}")]
    InvalidFilterValue { field: String, reason: String },

    /// Anything that went wrong while running the query.
    #[error("Query execution failed")]
    ExecutionFailed,
}

impl ExploreError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ExploreError::InvalidSource(_) => "invalid_source",
            ExploreError::InvalidField { .. } => "invalid_field",
            ExploreError::InvalidAggregation { .. } => "invalid_aggregation",
            ExploreError::InvalidFilterValue { .. } => "invalid_filter_value",
            ExploreError::ExecutionFailed => "execution_failed",
        }
    }

    /// HTTP-equivalent status code.
    pub fn status_code(&self) -> u16 {
        match self {
            ExploreError::ExecutionFailed => 500,
            _ => 400,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.status_code() == 400
    }

    pub(crate) fn aggregation(field: &str, reason: impl Into<String>) -> Self {
        ExploreError::InvalidAggregation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn filter_value(field: &str, reason: impl Into<String>) -> Self {
        ExploreError::InvalidFilterValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<RegistryError> for ExploreError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownSource(source_id) => ExploreError::InvalidSource(source_id),
            RegistryError::UnknownField { source_id, field } => {
                ExploreError::InvalidField { source_id, field }
            }
            // The registry validates its own relations at construction.
            RegistryError::UnknownRelation { .. } | RegistryError::InvalidDefinition(_) => {
                tracing::error!(error = %err, "registry inconsistency reached the engine");
                ExploreError::ExecutionFailed
            }
        }
    }
}
