//! Schemagen Core - Relational schema derivation from entity graphs.
//!
//! Starting from seed entity kinds, the classifier walks declared fields and
//! turns them into columns and typed edges, discovering peer entities as it
//! goes. The sequencer orders tables so that every referenced table is created
//! first, and the synthesizer materializes foreign keys and many-to-many
//! bridge tables over that order. The result can be rendered as MySQL DDL or
//! exported as JSON.

pub mod classify;
pub mod config;
pub mod derive;
pub mod emit;
pub mod error;
pub mod introspect;
pub mod model;
pub mod sequence;
pub mod synthesize;

pub use classify::Classifier;
pub use config::GeneratorConfig;
pub use derive::{derive_schema, DerivedSchema};
pub use emit::{DdlEmitter, MysqlEmitter};
pub use error::{
    CatalogError, Error, InvariantViolation, Result, TypeMappingError, ValidationError,
};
pub use introspect::{
    ColumnTypeMapper, EntityCatalog, EntityDecl, FieldDecl, FieldTags, Introspector, KeyRole,
    MysqlTypes, PrimitiveKind, TypeKind, TypeRef,
};
pub use model::{
    Edge, EdgeType, Field, ForeignKey, MainTable, ReferenceOption, Schema, Table, TableId,
};
