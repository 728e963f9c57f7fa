//! Declared entities and their fields.

use super::tags::FieldTags;
use super::types::{PrimitiveKind, TypeRef};
use serde::{Deserialize, Serialize};

/// A declared field of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Field name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Role and column tags.
    #[serde(default, skip_serializing_if = "FieldTags::is_empty")]
    pub tags: FieldTags,
}

impl FieldDecl {
    /// Create a field with no tags.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            tags: FieldTags::new(),
        }
    }

    /// Create a primitive scalar field.
    pub fn scalar(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self::new(name, TypeRef::primitive(kind))
    }

    /// Add a flag tag.
    pub fn tag(mut self, name: impl Into<String>) -> Self {
        self.tags = self.tags.with(name);
        self
    }

    /// Add a tag with a value.
    pub fn tag_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags = self.tags.with_value(name, value);
        self
    }
}

/// A declared entity kind with its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDecl {
    /// Entity name (unique within a catalog).
    pub name: String,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

impl EntityDecl {
    /// Create an entity without fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    /// The first field that holds `kind` by value, alone or in a slice.
    pub fn embedding_of(&self, kind: &str) -> Option<&FieldDecl> {
        self.fields
            .iter()
            .find(|f| !f.ty.pointer && f.ty.complex_name() == Some(kind))
    }
}
