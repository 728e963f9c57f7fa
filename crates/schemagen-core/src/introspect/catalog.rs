//! In-memory entity catalog, buildable in code or loaded from JSON.

use super::entity::EntityDecl;
use super::types::TypeRef;
use super::Introspector;
use crate::error::CatalogError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// On-disk layout of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    seeds: Vec<TypeRef>,
    entities: Vec<EntityDecl>,
}

/// A closed set of entity declarations plus the seeds to derive from.
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    entities: BTreeMap<String, EntityDecl>,
    seeds: Vec<TypeRef>,
}

impl EntityCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, replacing any previous declaration of the same name.
    pub fn with_entity(mut self, entity: EntityDecl) -> Self {
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    /// Parse a catalog from JSON text.
    ///
    /// ```json
    /// {
    ///   "seeds": ["User"],
    ///   "entities": [
    ///     {"name": "User", "fields": [
    ///       {"name": "id", "type": "uint64", "tags": ["primaryKey", "autoIncrement"]}
    ///     ]}
    ///   ]
    /// }
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;

        let mut entities = BTreeMap::new();
        for entity in file.entities {
            if entities.contains_key(&entity.name) {
                return Err(CatalogError::DuplicateEntity { name: entity.name });
            }
            entities.insert(entity.name.clone(), entity);
        }

        Ok(Self {
            entities,
            seeds: file.seeds,
        })
    }

    /// Read and parse a catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Seeds declared with the catalog.
    pub fn seeds(&self) -> &[TypeRef] {
        &self.seeds
    }

    /// Entity names in lexical order.
    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// Number of declared entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check whether the catalog has no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Introspector for EntityCatalog {
    fn entity(&self, kind: &str) -> Option<&EntityDecl> {
        self.entities.get(kind)
    }
}
