//! Core error types.
//!
//! Input problems surface as [`ValidationError`]; lookups that the derivation
//! pipeline itself should have guaranteed surface as [`InvariantViolation`].
//! The two classes are kept apart so callers can tell a bad entity graph from
//! a defect in this crate.

use std::path::PathBuf;
use thiserror::Error;

/// Crate-level result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for schema derivation.
#[derive(Debug, Error)]
pub enum Error {
    /// The entity graph is not derivable.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An internal lookup failed for data the pipeline should have produced.
    #[error("internal invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    /// The entity catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl Error {
    /// Whether this error is a defect rather than a problem with the input.
    pub fn is_defect(&self) -> bool {
        matches!(self, Error::Invariant(_))
    }
}

/// Validation failures in the entity graph.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A seed does not name a complex entity type.
    #[error("seed {seed} must be a complex entity type, optionally behind a pointer")]
    InvalidSeed {
        /// The offending seed, in type reference notation.
        seed: String,
    },

    /// A complex type was referenced but never declared.
    #[error("unknown entity type {kind} referenced by {referenced_by}")]
    UnknownEntity {
        /// The undeclared entity kind.
        kind: String,
        /// Where the reference came from (`Entity.field` or `seed`).
        referenced_by: String,
    },

    /// A field name contains the reserved separator.
    #[error(
        "field {entity}.{field} must not contain underscores to prevent collision with generated columns"
    )]
    UnderscoreInFieldName {
        /// Declaring entity.
        entity: String,
        /// Field name.
        field: String,
    },

    /// A pointer field refers to a primitive type.
    #[error("field {entity}.{field} must not be a pointer to non-complex type {ty}")]
    PointerToPrimitive {
        /// Declaring entity.
        entity: String,
        /// Field name.
        field: String,
        /// Declared type.
        ty: String,
    },

    /// A `parent` field is not a non-slice pointer to a complex type.
    #[error("parent field {entity}.{field} must be a pointer to a non-slice complex type, found {ty}")]
    InvalidParentField {
        /// Declaring entity.
        entity: String,
        /// Field name.
        field: String,
        /// Declared type.
        ty: String,
    },

    /// A `parent` field points at a type that does not embed the declaring entity.
    #[error(
        "type {peer} does not contain {entity} by value, but {entity}.{field} declares it as parent"
    )]
    ParentNotEmbedding {
        /// Declaring entity.
        entity: String,
        /// Field name.
        field: String,
        /// The declared parent.
        peer: String,
    },

    /// Two fields embed the same entity by value.
    #[error(
        "there can be only one field among all types containing {child} without pointers; both {existing} and {entity} contain it"
    )]
    DuplicateKnownParent {
        /// The embedded entity.
        child: String,
        /// The entity that embedded it first.
        existing: String,
        /// The entity embedding it again.
        entity: String,
    },

    /// `autoIncrement` on a column that is not part of the primary key.
    #[error("field {entity}.{field} is auto-increment but not a primary key")]
    AutoIncrementWithoutPrimaryKey {
        /// Declaring entity.
        entity: String,
        /// Field name.
        field: String,
    },

    /// A non-pointer slice of primitive values.
    #[error("field {entity}.{field} is a slice of {ty}; value-list tables are not supported")]
    PrimitiveSlice {
        /// Declaring entity.
        entity: String,
        /// Field name.
        field: String,
        /// Declared type.
        ty: String,
    },

    /// The column type mapper rejected a field's tags.
    #[error("{source} in {entity}.{field}")]
    ColumnType {
        /// Declaring entity.
        entity: String,
        /// Field name.
        field: String,
        /// Mapping failure.
        #[source]
        source: TypeMappingError,
    },

    /// A `MultiOneParent` edge whose peer does not hold the child in a slice.
    #[error(
        "type {peer} does not contain {entity} in a non-pointer slice, but is declared as slice parent in {entity}.{edge}"
    )]
    SliceParentMismatch {
        /// The child table.
        entity: String,
        /// Edge name on the child.
        edge: String,
        /// The declared parent.
        peer: String,
    },

    /// A `OneOneParent` edge whose peer does not hold the child directly.
    #[error(
        "type {peer} does not contain {entity} directly, but is declared as single parent in {entity}.{edge}"
    )]
    SingleParentMismatch {
        /// The child table.
        entity: String,
        /// Edge name on the child.
        edge: String,
        /// The declared parent.
        peer: String,
    },

    /// A pointer relation targets a table without primary keys.
    #[error(
        "cannot reference type {peer} by pointer in {entity}.{edge} because it does not have primary keys"
    )]
    MissingPrimaryKey {
        /// The referencing table.
        entity: String,
        /// Edge name on the referencing table.
        edge: String,
        /// The table lacking primary keys.
        peer: String,
    },

    /// Two columns of one table resolve to the same name.
    #[error("column {column} is defined twice in table {table}")]
    ColumnCollision {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// A generated table name is already used by another table.
    #[error("table name {table} is already taken")]
    TableNameCollision {
        /// Table name.
        table: String,
    },

    /// The foreign-key dependency graph contains a cycle.
    #[error("reference cycle detected: {}", .cycle.join(" -> "))]
    ReferenceCycle {
        /// Tables along the cycle; the first table is repeated at the end.
        cycle: Vec<String>,
    },
}

/// Lookups that must succeed once derivation has reached the calling stage.
#[derive(Debug, Error)]
pub enum InvariantViolation {
    /// A table name is not registered in the schema.
    #[error("table {name} does not exist")]
    UnknownTable {
        /// Table name.
        name: String,
    },

    /// A field is missing from a table.
    #[error("field {field} not found in {table}")]
    UnknownField {
        /// Table name.
        table: String,
        /// Field name.
        field: String,
    },

    /// A reciprocal edge expected on a table is missing.
    #[error("table {table} has no edge to {peer}")]
    UnknownEdge {
        /// Table name.
        table: String,
        /// Peer table name.
        peer: String,
    },
}

/// Failures mapping a primitive field to a storage column type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeMappingError {
    /// `text` combined with `fixed`.
    #[error("text columns cannot be fixed")]
    FixedText,

    /// `text:<size>` with an unknown size.
    #[error("unknown text type {size}")]
    UnknownTextSize {
        /// The declared size.
        size: String,
    },

    /// `width:<n>` with a non-numeric or zero width.
    #[error("invalid width {width}")]
    InvalidWidth {
        /// The declared width.
        width: String,
    },

    /// A string field without `width` or `text`.
    #[error("string declaration must have either the width or the text tag")]
    MissingStringWidth,
}

/// Failures loading an entity catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The catalog is not valid JSON or does not match the expected layout.
    #[error("invalid catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// A type reference could not be parsed.
    #[error("invalid type reference {text:?}: {reason}")]
    InvalidTypeRef {
        /// The text that failed to parse.
        text: String,
        /// Why it failed.
        reason: &'static str,
    },

    /// Two entities share a name.
    #[error("entity {name} is declared more than once")]
    DuplicateEntity {
        /// Entity name.
        name: String,
    },
}
