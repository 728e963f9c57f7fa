//! Entity introspection: declared fields, type descriptors, tags, and
//! column type mapping.

mod catalog;
mod column_types;
mod entity;
pub mod tags;
mod types;

pub use catalog::EntityCatalog;
pub use column_types::{ColumnTypeMapper, MysqlTypes};
pub use entity::{EntityDecl, FieldDecl};
pub use tags::{FieldTags, KeyRole};
pub use types::{PrimitiveKind, TypeKind, TypeRef};

/// Source of entity declarations.
pub trait Introspector {
    /// The declaration of an entity kind, or `None` if the kind is unknown.
    fn entity(&self, kind: &str) -> Option<&EntityDecl>;
}
