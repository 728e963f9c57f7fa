//! The entity graph model: tables, columns, edges, and keys.

mod edge;
mod field;
mod foreign_key;
mod schema;
mod table;

pub use edge::{Edge, EdgeType};
pub use field::Field;
pub use foreign_key::{ForeignKey, ReferenceOption};
pub use schema::{Schema, TableId};
pub use table::{MainTable, Table};

/// Separator for generated compound names such as `<table>_<field>`.
/// Declared field names must not contain it.
pub const SEPARATOR: char = '_';

/// Name of edges inferred from a known parent.
pub const PARENT_EDGE: &str = "_parent_";

/// Join `prefix` and `name` with [`SEPARATOR`].
pub fn compound_name(prefix: &str, name: &str) -> String {
    format!("{}{}{}", prefix, SEPARATOR, name)
}
