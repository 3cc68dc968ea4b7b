//! Source Registry - the entity collections and their relationship hops.

use std::collections::HashMap;

use super::{RegistryError, RegistryResult};

/// Alias of the root table in every generated query.
pub const ROOT_ALIAS: &str = "root";

/// A relationship hop reachable from a source.
///
/// Joined as `LEFT JOIN table AS prefix ON prefix.remote_column = parent.local_column`,
/// where `parent` is the parent hop's prefix or the root table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Traversal prefix; multi-hop prefixes join segments with `__`.
    pub prefix: String,
    pub table: String,
    pub parent: Option<String>,
    pub local_column: String,
    pub remote_column: String,
}

impl Relation {
    /// A hop from the root table.
    pub fn new(prefix: &str, table: &str, local_column: &str, remote_column: &str) -> Self {
        Self {
            prefix: prefix.into(),
            table: table.into(),
            parent: None,
            local_column: local_column.into(),
            remote_column: remote_column.into(),
        }
    }

    /// A hop continuing from another registered hop.
    pub fn through(mut self, parent: &str) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Alias of the table this hop joins from.
    pub fn parent_alias(&self) -> &str {
        self.parent.as_deref().unwrap_or(ROOT_ALIAS)
    }
}

/// A named entity collection exposed to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDescriptor {
    pub id: String,
    pub display_name: String,
    pub description: String,
    /// Presentation hint passed through to callers.
    pub icon: String,
    pub table: String,
    pub relations: Vec<Relation>,
}

impl SourceDescriptor {
    pub fn new(id: &str, display_name: &str, table: &str) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: String::new(),
            icon: String::new(),
            table: table.into(),
            relations: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn relation(&self, prefix: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.prefix == prefix)
    }

    /// Hops needed to reach `prefix`, outermost first.
    pub fn relation_chain(&self, prefix: &str) -> RegistryResult<Vec<&Relation>> {
        let mut chain = Vec::new();
        let mut current = Some(prefix);
        while let Some(p) = current {
            let relation = self.relation(p).ok_or_else(|| RegistryError::UnknownRelation {
                source_id: self.id.clone(),
                prefix: p.to_string(),
            })?;
            chain.push(relation);
            current = relation.parent.as_deref();
        }
        chain.reverse();
        Ok(chain)
    }

    fn validate(&self) -> RegistryResult<()> {
        for (i, relation) in self.relations.iter().enumerate() {
            if relation.prefix == ROOT_ALIAS {
                return Err(RegistryError::InvalidDefinition(format!(
                    "source '{}' uses reserved prefix '{}'",
                    self.id, ROOT_ALIAS
                )));
            }
            let earlier = &self.relations[..i];
            if earlier.iter().any(|r| r.prefix == relation.prefix) {
                return Err(RegistryError::InvalidDefinition(format!(
                    "relation '{}' declared twice on source '{}'",
                    relation.prefix, self.id
                )));
            }
            if let Some(parent) = &relation.parent {
                let parent_declared = earlier.iter().any(|r| &r.prefix == parent);
                let prefixed = relation.prefix.starts_with(&format!("{}__", parent));
                if !parent_declared || !prefixed {
                    return Err(RegistryError::InvalidDefinition(format!(
                        "relation '{}' on source '{}' must follow and extend its parent '{}'",
                        relation.prefix, self.id, parent
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Sources in presentation order, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<SourceDescriptor>,
    index: HashMap<String, usize>,
}

impl SourceRegistry {
    pub fn new(sources: Vec<SourceDescriptor>) -> RegistryResult<Self> {
        let mut index = HashMap::new();
        for (i, source) in sources.iter().enumerate() {
            source.validate()?;
            if index.insert(source.id.clone(), i).is_some() {
                return Err(RegistryError::InvalidDefinition(format!(
                    "source '{}' declared twice",
                    source.id
                )));
            }
        }
        Ok(Self { sources, index })
    }

    pub fn get(&self, id: &str) -> RegistryResult<&SourceDescriptor> {
        self.index
            .get(id)
            .map(|&i| &self.sources[i])
            .ok_or_else(|| RegistryError::UnknownSource(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceDescriptor> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
