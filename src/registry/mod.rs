//! Declarative catalog of what can be explored.
//!
//! The [`Registry`] pairs the [`SourceRegistry`] (entity collections and the
//! relationship hops allowed from each) with the [`FieldRegistry`] (typed
//! attributes per source). It is the only way a caller-supplied identifier
//! turns into a data-access path: anything not registered here never reaches
//! the store.
//!
//! The registry is built once at startup and shared read-only.

mod catalog;
mod field;
mod source;

pub use field::{AggregationKind, FieldAccess, FieldDescriptor, FieldRegistry, SemanticType};
pub use source::{Relation, SourceDescriptor, SourceRegistry, ROOT_ALIAS};

/// Result type for registry lookups.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry lookup and definition errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("Unknown source: '{0}'")]
    UnknownSource(String),

    #[error("Unknown field '{field}' for source '{source_id}'")]
    UnknownField { source_id: String, field: String },

    #[error("Relation '{prefix}' is not registered on source '{source_id}'")]
    UnknownRelation { source_id: String, prefix: String },

    #[error("Invalid registry definition: {0}")]
    InvalidDefinition(String),
}

/// Sources and their fields.
#[derive(Debug, Clone)]
pub struct Registry {
    sources: SourceRegistry,
    fields: FieldRegistry,
}

impl Registry {
    /// Combine the two catalogs, checking that they agree.
    pub fn new(sources: SourceRegistry, fields: FieldRegistry) -> RegistryResult<Self> {
        for source_id in fields.sources() {
            sources.get(source_id).map_err(|_| {
                RegistryError::InvalidDefinition(format!(
                    "fields declared for unregistered source '{}'",
                    source_id
                ))
            })?;
        }

        for source in sources.iter() {
            for field in fields.fields_for(&source.id) {
                if let Some(prefix) = field.access.relation() {
                    source.relation_chain(prefix)?;
                }
            }
        }

        Ok(Self { sources, fields })
    }

    /// The catalog of the wetland data platform.
    pub fn builtin() -> RegistryResult<Self> {
        let sources = SourceRegistry::new(catalog::sources())?;
        let fields = FieldRegistry::new(catalog::fields())?;
        Self::new(sources, fields)
    }

    pub fn sources(&self) -> impl Iterator<Item = &SourceDescriptor> {
        self.sources.iter()
    }

    pub fn source(&self, source_id: &str) -> RegistryResult<&SourceDescriptor> {
        self.sources.get(source_id)
    }

    /// Fields of a source in display order; empty for an unknown source.
    pub fn fields_for(&self, source_id: &str) -> &[FieldDescriptor] {
        self.fields.fields_for(source_id)
    }

    pub fn resolve(&self, source_id: &str, field_id: &str) -> RegistryResult<&FieldDescriptor> {
        self.fields.resolve(source_id, field_id)
    }
}
