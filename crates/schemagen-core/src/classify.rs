//! Field and edge classification.
//!
//! Walks every declared field of an entity and turns it into a column, an
//! edge to a peer table, or an embedding obligation on the peer. Peers are
//! registered as they are discovered; [`Classifier::run`] repeats until no
//! table is left unclassified.

use crate::error::{Error, Result, ValidationError};
use crate::introspect::tags::{AUTO_INCREMENT, NULLABLE, PARENT};
use crate::introspect::{
    ColumnTypeMapper, FieldDecl, Introspector, KeyRole, PrimitiveKind, TypeKind, TypeRef,
};
use crate::model::{compound_name, Edge, EdgeType, Field, Schema, TableId, SEPARATOR};
use tracing::{debug, trace};

/// Renamed peer key columns a parent pointer contributes to one of this
/// table's keys, inserted at `at` within that key.
struct ParentKeys {
    role: KeyRole,
    peer: String,
    at: usize,
}

/// Classifies entity declarations into tables and edges.
pub struct Classifier<'a, I: ?Sized, M: ?Sized> {
    introspector: &'a I,
    types: &'a M,
}

impl<'a, I, M> Classifier<'a, I, M>
where
    I: Introspector + ?Sized,
    M: ColumnTypeMapper + ?Sized,
{
    /// Create a classifier over an introspector and a column type mapper.
    pub fn new(introspector: &'a I, types: &'a M) -> Self {
        Self {
            introspector,
            types,
        }
    }

    /// Check that a seed names a declared complex entity held by value or
    /// pointer.
    pub fn validate_seed(&self, seed: &TypeRef) -> Result<()> {
        let Some(kind) = seed.complex_name().filter(|_| !seed.slice) else {
            return Err(ValidationError::InvalidSeed {
                seed: seed.to_string(),
            }
            .into());
        };
        if self.introspector.entity(kind).is_none() {
            return Err(ValidationError::UnknownEntity {
                kind: kind.to_string(),
                referenced_by: "seed".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Register a seed's table.
    pub fn register_seed(&self, schema: &mut Schema, seed: &TypeRef) -> Result<TableId> {
        self.validate_seed(seed)?;
        let kind = seed.complex_name().unwrap_or_default();
        Ok(schema.register(kind))
    }

    /// Classify tables until every registered table is classified.
    pub fn run(&self, schema: &mut Schema) -> Result<()> {
        let mut pass = 0;
        loop {
            let pending = schema.unclassified();
            if pending.is_empty() {
                break;
            }
            pass += 1;
            debug!(pass, pending = pending.len(), "classification pass");
            for id in pending {
                if !schema.table(id).classified {
                    self.classify_table(schema, id)?;
                }
            }
        }
        Ok(())
    }

    /// Classify one table's declared fields. A table is classified at most
    /// once; later calls return immediately.
    pub fn classify_table(&self, schema: &mut Schema, id: TableId) -> Result<()> {
        if schema.table(id).classified {
            return Ok(());
        }
        schema.table_mut(id).classified = true;

        let entity = schema.table(id).name().to_string();
        let decl = self
            .introspector
            .entity(&entity)
            .ok_or_else(|| ValidationError::UnknownEntity {
                kind: entity.clone(),
                referenced_by: "schema".to_string(),
            })?;

        let mut parent_keys = Vec::new();
        for field in &decl.fields {
            if let Some(keys) = self.classify_field(schema, id, &entity, field)? {
                parent_keys.push(keys);
            }
        }

        // Resolved after every field is seen, so a table that is its own
        // parent reads its complete primary key.
        for keys in parent_keys.into_iter().rev() {
            let renamed: Vec<String> = schema
                .must_table(&keys.peer)?
                .table
                .primary_keys
                .iter()
                .map(|key| compound_name(&keys.peer, key))
                .collect();
            schema
                .table_mut(id)
                .table
                .insert_into_key(&keys.role, keys.at, renamed);
        }
        Ok(())
    }

    /// Classify one field. A keyed parent pointer yields the key columns it
    /// contributes, to be filled in once the whole entity is classified.
    fn classify_field(
        &self,
        schema: &mut Schema,
        id: TableId,
        entity: &str,
        field: &FieldDecl,
    ) -> Result<Option<ParentKeys>> {
        if field.name.contains(SEPARATOR) {
            return Err(ValidationError::UnderscoreInFieldName {
                entity: entity.to_string(),
                field: field.name.clone(),
            }
            .into());
        }

        let ty = &field.ty;
        if field.tags.has(PARENT) {
            return match ty.complex_name() {
                Some(peer) if ty.pointer && !ty.slice => {
                    self.classify_parent_pointer(schema, id, entity, field, peer)
                }
                _ => Err(ValidationError::InvalidParentField {
                    entity: entity.to_string(),
                    field: field.name.clone(),
                    ty: ty.to_string(),
                }
                .into()),
            };
        }

        let classified = match &ty.kind {
            TypeKind::Complex(peer) if ty.pointer => {
                let edge_type = if ty.slice {
                    EdgeType::MultiMulti
                } else {
                    EdgeType::MultiOne
                };
                self.register_peer(schema, peer, entity, &field.name)?;
                self.push_edge(schema, id, Edge::new(&field.name, peer, edge_type));
                Ok(())
            }
            TypeKind::Complex(peer) => self.classify_embedding(schema, id, entity, field, peer),
            TypeKind::Primitive(_) if ty.pointer => Err(ValidationError::PointerToPrimitive {
                entity: entity.to_string(),
                field: field.name.clone(),
                ty: ty.to_string(),
            }
            .into()),
            TypeKind::Primitive(_) if ty.slice => Err(ValidationError::PrimitiveSlice {
                entity: entity.to_string(),
                field: field.name.clone(),
                ty: ty.to_string(),
            }
            .into()),
            TypeKind::Primitive(kind) => self.classify_column(schema, id, entity, field, *kind),
        };
        classified.map(|()| None)
    }

    /// A `parent` pointer: the peer must embed this entity by value, and the
    /// edge type follows that embedding field.
    ///
    /// The embedding is read from the peer's declaration rather than its
    /// classified edges, so the result does not depend on field order when
    /// the peer is still being classified (a table that is its own parent).
    fn classify_parent_pointer(
        &self,
        schema: &mut Schema,
        id: TableId,
        entity: &str,
        field: &FieldDecl,
        peer: &str,
    ) -> Result<Option<ParentKeys>> {
        let peer_id = self.register_peer(schema, peer, entity, &field.name)?;
        self.classify_table(schema, peer_id)?;

        let embedding = self
            .introspector
            .entity(peer)
            .and_then(|decl| decl.embedding_of(entity))
            .ok_or_else(|| ValidationError::ParentNotEmbedding {
                entity: entity.to_string(),
                field: field.name.clone(),
                peer: peer.to_string(),
            })?;
        let edge_type = if embedding.ty.slice {
            EdgeType::MultiOneParent
        } else {
            EdgeType::OneOneParent
        };

        let keys = field.tags.key_role().map(|role| ParentKeys {
            at: schema.table(id).table.key_len(&role),
            role,
            peer: peer.to_string(),
        });

        self.push_edge(schema, id, Edge::new(&field.name, peer, edge_type));
        Ok(keys)
    }

    /// A complex field held by value: this table becomes the peer's known
    /// parent.
    fn classify_embedding(
        &self,
        schema: &mut Schema,
        id: TableId,
        entity: &str,
        field: &FieldDecl,
        peer: &str,
    ) -> Result<()> {
        let child_id = self.register_peer(schema, peer, entity, &field.name)?;
        let child = schema.table_mut(child_id);
        if let Some(existing) = &child.known_parent {
            return Err(ValidationError::DuplicateKnownParent {
                child: peer.to_string(),
                existing: existing.clone(),
                entity: entity.to_string(),
            }
            .into());
        }
        child.known_parent = Some(entity.to_string());

        let edge_type = if field.ty.slice {
            EdgeType::OneMulti
        } else {
            EdgeType::OneOne
        };
        self.push_edge(schema, id, Edge::new(&field.name, peer, edge_type));
        Ok(())
    }

    /// A primitive scalar becomes a column.
    fn classify_column(
        &self,
        schema: &mut Schema,
        id: TableId,
        entity: &str,
        field: &FieldDecl,
        kind: PrimitiveKind,
    ) -> Result<()> {
        let column_type = self
            .types
            .column_type(kind, &field.tags)
            .map_err(|source| ValidationError::ColumnType {
                entity: entity.to_string(),
                field: field.name.clone(),
                source,
            })?;

        let mut column = Field::new(&field.name, column_type);
        if field.tags.has(NULLABLE) {
            column = column.nullable();
        }

        let role = field.tags.key_role();
        if field.tags.has(AUTO_INCREMENT) {
            if role != Some(KeyRole::Primary) {
                return Err(ValidationError::AutoIncrementWithoutPrimaryKey {
                    entity: entity.to_string(),
                    field: field.name.clone(),
                }
                .into());
            }
            column = column.auto_increment();
        }

        trace!(
            table = entity,
            column = %column.name,
            ty = %column.column_type,
            "classified column"
        );

        let table = &mut schema.table_mut(id).table;
        if let Some(role) = role {
            table.add_to_key(&role, [column.name.clone()]);
        }
        table.add_field(column)?;
        Ok(())
    }

    fn register_peer(
        &self,
        schema: &mut Schema,
        peer: &str,
        entity: &str,
        field: &str,
    ) -> Result<TableId> {
        if self.introspector.entity(peer).is_none() {
            return Err(Error::Validation(ValidationError::UnknownEntity {
                kind: peer.to_string(),
                referenced_by: format!("{}.{}", entity, field),
            }));
        }
        Ok(schema.register(peer))
    }

    fn push_edge(&self, schema: &mut Schema, id: TableId, edge: Edge) {
        debug!(
            table = schema.table(id).name(),
            edge = %edge.name,
            peer = %edge.peer_table,
            edge_type = %edge.edge_type,
            "classified edge"
        );
        schema.table_mut(id).edges.push(edge);
    }
}
