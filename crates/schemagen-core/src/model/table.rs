//! Table definitions.

use super::edge::{Edge, EdgeType};
use super::field::Field;
use super::foreign_key::ForeignKey;
use crate::error::{InvariantViolation, ValidationError};
use crate::introspect::KeyRole;
use serde::Serialize;
use std::collections::BTreeMap;

/// A storage table: columns, keys, and foreign keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Table name (unique across the schema).
    pub name: String,
    /// Columns in creation order.
    pub fields: Vec<Field>,
    /// Primary key column names.
    pub primary_keys: Vec<String>,
    /// Unique keys by group name.
    pub unique_keys: BTreeMap<String, Vec<String>>,
    /// Secondary (non-unique) keys by group name.
    pub composite_keys: BTreeMap<String, Vec<String>>,
    /// Foreign keys.
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            primary_keys: Vec::new(),
            unique_keys: BTreeMap::new(),
            composite_keys: BTreeMap::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Find a column by name.
    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Find a column that derivation has already guaranteed to exist.
    pub fn must_field(&self, name: &str) -> Result<&Field, InvariantViolation> {
        self.find_field(name)
            .ok_or_else(|| InvariantViolation::UnknownField {
                table: self.name.clone(),
                field: name.to_string(),
            })
    }

    /// Append a column, rejecting duplicate names.
    pub fn add_field(&mut self, field: Field) -> Result<(), ValidationError> {
        if self.find_field(&field.name).is_some() {
            return Err(ValidationError::ColumnCollision {
                table: self.name.clone(),
                column: field.name,
            });
        }
        self.fields.push(field);
        Ok(())
    }

    /// Add columns to the key named by `role`.
    pub fn add_to_key(&mut self, role: &KeyRole, columns: impl IntoIterator<Item = String>) {
        match role {
            KeyRole::Primary => self.primary_keys.extend(columns),
            KeyRole::Unique(group) => self
                .unique_keys
                .entry(group.clone())
                .or_default()
                .extend(columns),
            KeyRole::Composite(group) => self
                .composite_keys
                .entry(group.clone())
                .or_default()
                .extend(columns),
        }
    }

    /// Number of columns currently in the key named by `role`.
    pub fn key_len(&self, role: &KeyRole) -> usize {
        match role {
            KeyRole::Primary => self.primary_keys.len(),
            KeyRole::Unique(group) => self.unique_keys.get(group).map_or(0, Vec::len),
            KeyRole::Composite(group) => self.composite_keys.get(group).map_or(0, Vec::len),
        }
    }

    /// Insert columns into the key named by `role`, starting at position `at`
    /// (clamped to the key's length).
    pub fn insert_into_key(&mut self, role: &KeyRole, at: usize, columns: Vec<String>) {
        let key = match role {
            KeyRole::Primary => &mut self.primary_keys,
            KeyRole::Unique(group) => self.unique_keys.entry(group.clone()).or_default(),
            KeyRole::Composite(group) => self.composite_keys.entry(group.clone()).or_default(),
        };
        let at = at.min(key.len());
        key.splice(at..at, columns);
    }
}

/// A table derived from an entity kind, with its relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MainTable {
    /// Columns and keys.
    #[serde(flatten)]
    pub table: Table,
    /// Bridge tables generated for many-to-many edges.
    pub aux_tables: Vec<Table>,
    /// Relationships in declaration order; inferred parent edges come last.
    pub edges: Vec<Edge>,
    /// The table that embeds this one by value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known_parent: Option<String>,
    /// Whether the entity's fields have been classified.
    #[serde(skip)]
    pub classified: bool,
}

impl MainTable {
    /// Create an unclassified table for an entity kind.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: Table::new(name),
            aux_tables: Vec::new(),
            edges: Vec::new(),
            known_parent: None,
            classified: false,
        }
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.table.name
    }

    /// Find an edge by its name.
    pub fn find_edge_by_name(&self, name: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.name == name)
    }

    /// Find the first edge to a peer table.
    pub fn find_edge_by_peer(&self, peer_table: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.peer_table == peer_table)
    }

    /// Find the edge through which this table embeds a peer by value.
    pub fn find_embedding_edge(&self, peer_table: &str) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| e.peer_table == peer_table && e.edge_type.is_embedding())
    }

    /// Names of all tables this table depends on, in first-seen order.
    pub fn dependencies(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let candidates = self.known_parent.as_deref().into_iter().chain(
            self.edges
                .iter()
                .filter(|e| e.edge_type.places_columns())
                .map(|e| e.peer_table.as_str()),
        );
        for name in candidates {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Edges whose type is one of `types`.
    pub fn edges_of(&self, types: &[EdgeType]) -> impl Iterator<Item = &Edge> + '_ {
        let types = types.to_vec();
        self.edges
            .iter()
            .filter(move |e| types.contains(&e.edge_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_field_rejects_duplicates() {
        let mut table = Table::new("User");
        table.add_field(Field::new("id", "BIGINT")).unwrap();

        let err = table.add_field(Field::new("id", "INT")).unwrap_err();
        assert!(matches!(err, ValidationError::ColumnCollision { .. }));
        assert_eq!(table.fields.len(), 1);
    }

    #[test]
    fn test_must_field() {
        let mut table = Table::new("User");
        table.add_field(Field::new("id", "BIGINT")).unwrap();

        assert!(table.must_field("id").is_ok());
        assert!(matches!(
            table.must_field("email"),
            Err(InvariantViolation::UnknownField { .. })
        ));
    }

    #[test]
    fn test_key_groups() {
        let mut table = Table::new("User");
        table.add_to_key(&KeyRole::Primary, vec!["id".to_string()]);
        table.add_to_key(&KeyRole::Unique("login".into()), vec!["email".to_string()]);
        table.add_to_key(&KeyRole::Unique("login".into()), vec!["realm".to_string()]);
        table.add_to_key(&KeyRole::Composite("by_name".into()), vec!["name".to_string()]);

        assert_eq!(table.primary_keys, vec!["id"]);
        assert_eq!(table.unique_keys["login"], vec!["email", "realm"]);
        assert_eq!(table.composite_keys["by_name"], vec!["name"]);
    }

    #[test]
    fn test_insert_into_key() {
        let mut table = Table::new("Line");
        table.add_to_key(&KeyRole::Primary, vec!["position".to_string()]);
        assert_eq!(table.key_len(&KeyRole::Primary), 1);
        assert_eq!(table.key_len(&KeyRole::Unique("sku".into())), 0);

        table.insert_into_key(&KeyRole::Primary, 0, vec!["Order_id".to_string()]);
        table.insert_into_key(&KeyRole::Primary, 9, vec!["Shop_id".to_string()]);
        table.insert_into_key(&KeyRole::Unique("sku".into()), 0, vec!["sku".to_string()]);

        assert_eq!(table.primary_keys, vec!["Order_id", "position", "Shop_id"]);
        assert_eq!(table.unique_keys["sku"], vec!["sku"]);
    }

    #[test]
    fn test_dependencies() {
        let mut post = MainTable::new("Post");
        post.known_parent = Some("Blog".into());
        post.edges.push(Edge::new("author", "User", EdgeType::MultiOne));
        post.edges.push(Edge::new("comments", "Comment", EdgeType::OneMulti));
        post.edges.push(Edge::new("tags", "Tag", EdgeType::MultiMulti));
        post.edges.push(Edge::new("editor", "User", EdgeType::MultiOne));

        assert_eq!(post.dependencies(), vec!["Blog", "User", "Tag"]);
    }

    #[test]
    fn test_edge_lookup() {
        let mut user = MainTable::new("User");
        user.edges.push(Edge::new("manager", "Team", EdgeType::MultiOne));
        user.edges.push(Edge::new("profile", "Team", EdgeType::OneOne));

        assert_eq!(user.find_edge_by_peer("Team").unwrap().name, "manager");
        assert_eq!(user.find_embedding_edge("Team").unwrap().name, "profile");
        assert_eq!(
            user.find_edge_by_name("profile").unwrap().edge_type,
            EdgeType::OneOne
        );
        assert_eq!(user.edges_of(&[EdgeType::OneOne]).count(), 1);
    }
}
