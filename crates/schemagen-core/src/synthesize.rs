//! Foreign-key and bridge-table synthesis.
//!
//! Runs over tables in creation order once classification is complete, so a
//! peer's key columns (including keys it copied from its own parent) exist
//! before any table copies them.

use crate::error::{InvariantViolation, Result, ValidationError};
use crate::model::{
    compound_name, Edge, EdgeType, Field, ForeignKey, ReferenceOption, Schema, Table, TableId,
    PARENT_EDGE,
};
use tracing::{debug, trace};

/// Materialize the foreign keys and bridge tables of every table.
pub fn synthesize(schema: &mut Schema) -> Result<()> {
    let order = schema.sorted_tables()?.to_vec();
    for id in order {
        synthesize_table(schema, id)?;
    }
    Ok(())
}

/// Materialize one table's foreign keys and bridge tables.
///
/// Parent edges are handled first so that key columns copied from a parent
/// exist before a bridge table copies this table's primary key.
pub fn synthesize_table(schema: &mut Schema, id: TableId) -> Result<()> {
    infer_parent_edge(schema, id)?;

    let table = schema.table(id);
    let edges: Vec<Edge> = table
        .edges_of(&[EdgeType::MultiOneParent, EdgeType::OneOneParent])
        .chain(table.edges_of(&[
            EdgeType::MultiMulti,
            EdgeType::MultiOne,
            EdgeType::OneMulti,
            EdgeType::OneOne,
        ]))
        .cloned()
        .collect();

    for edge in &edges {
        match edge.edge_type {
            EdgeType::MultiMulti => add_bridge_table(schema, id, edge)?,
            EdgeType::MultiOneParent => {
                expect_reciprocal(schema, id, edge, EdgeType::OneMulti)?;
                copy_peer_keys(schema, id, edge)?;
            }
            EdgeType::OneOneParent => {
                expect_reciprocal(schema, id, edge, EdgeType::OneOne)?;
                copy_peer_keys(schema, id, edge)?;
            }
            EdgeType::MultiOne => copy_peer_keys(schema, id, edge)?,
            // Realized by the peer's parent edge.
            EdgeType::OneMulti | EdgeType::OneOne => {}
        }
    }
    Ok(())
}

/// Add the `_parent_` edge for a table embedded by value whose entity does
/// not declare a pointer back to its parent.
fn infer_parent_edge(schema: &mut Schema, id: TableId) -> Result<()> {
    let table = schema.table(id);
    let Some(parent) = table.known_parent.clone() else {
        return Ok(());
    };
    if table.find_edge_by_peer(&parent).is_some() {
        return Ok(());
    }

    let name = table.name().to_string();
    let back = schema
        .must_table(&parent)?
        .find_embedding_edge(&name)
        .ok_or_else(|| InvariantViolation::UnknownEdge {
            table: parent.clone(),
            peer: name.clone(),
        })?;
    let edge_type = match back.edge_type {
        EdgeType::OneMulti => EdgeType::MultiOneParent,
        _ => EdgeType::OneOneParent,
    };

    debug!(table = %name, parent = %parent, %edge_type, "inferred parent edge");
    schema
        .table_mut(id)
        .edges
        .push(Edge::new(PARENT_EDGE, parent, edge_type));
    Ok(())
}

/// Check that the peer embeds this table with the expected edge type.
fn expect_reciprocal(schema: &Schema, id: TableId, edge: &Edge, expected: EdgeType) -> Result<()> {
    let name = schema.table(id).name();
    let reciprocal = schema
        .must_table(&edge.peer_table)?
        .find_embedding_edge(name)
        .map(|e| e.edge_type);

    if reciprocal == Some(expected) {
        return Ok(());
    }

    let (entity, edge_name, peer) = (name.to_string(), edge.name.clone(), edge.peer_table.clone());
    let err = if expected == EdgeType::OneMulti {
        ValidationError::SliceParentMismatch {
            entity,
            edge: edge_name,
            peer,
        }
    } else {
        ValidationError::SingleParentMismatch {
            entity,
            edge: edge_name,
            peer,
        }
    };
    Err(err.into())
}

/// Copy the peer's primary-key columns into this table as `<peer>_<key>` and
/// reference them with a foreign key.
///
/// Parent edges cascade. Other references null out when the copied columns
/// are nullable and restrict otherwise.
fn copy_peer_keys(schema: &mut Schema, id: TableId, edge: &Edge) -> Result<()> {
    let name = schema.table(id).name().to_string();
    let peer = &schema.must_table(&edge.peer_table)?.table;
    let columns = copied_keys(peer, &name, edge)?;

    let policy = if edge.edge_type.is_parent() {
        ReferenceOption::Cascade
    } else if columns.iter().any(|(field, _)| field.nullable) {
        ReferenceOption::SetNull
    } else {
        ReferenceOption::Restrict
    };

    let mut foreign = ForeignKey::new(&peer.name).with_policy(policy);
    let table = &mut schema.table_mut(id).table;
    for (field, key) in columns {
        trace!(table = %name, column = %field.name, "copied peer primary key");
        foreign.push_pair(&field.name, key);
        table.add_field(field)?;
    }
    table.foreign_keys.push(foreign);

    debug!(
        table = %name,
        peer = %edge.peer_table,
        on_delete = %policy,
        "synthesized foreign key"
    );
    Ok(())
}

/// Build the bridge table `<table>_<edge>` for a many-to-many edge.
fn add_bridge_table(schema: &mut Schema, id: TableId, edge: &Edge) -> Result<()> {
    let owner = &schema.table(id).table;
    let peer = &schema.must_table(&edge.peer_table)?.table;

    let bridge_name = compound_name(&owner.name, &edge.name);
    if schema.is_name_taken(&bridge_name) {
        return Err(ValidationError::TableNameCollision { table: bridge_name }.into());
    }

    let owner_columns = copied_keys(owner, &owner.name, edge)?;
    let peer_columns = copied_keys(peer, &owner.name, edge)?;

    let mut bridge = Table::new(&bridge_name);
    let mut owner_fk = ForeignKey::new(&owner.name);
    let mut peer_fk = ForeignKey::new(&peer.name).with_policy(ReferenceOption::Cascade);

    for (fk, columns) in [(&mut owner_fk, owner_columns), (&mut peer_fk, peer_columns)] {
        for (field, key) in columns {
            fk.push_pair(&field.name, key);
            bridge.primary_keys.push(field.name.clone());
            bridge.add_field(field)?;
        }
    }
    bridge.foreign_keys.push(owner_fk);
    bridge.foreign_keys.push(peer_fk);

    debug!(table = %bridge.name, peer = %edge.peer_table, "synthesized bridge table");
    schema.table_mut(id).aux_tables.push(bridge);
    Ok(())
}

/// `source`'s primary-key columns renamed for use in another table, paired
/// with the source key name. `referrer` and `edge` are error context.
fn copied_keys(source: &Table, referrer: &str, edge: &Edge) -> Result<Vec<(Field, String)>> {
    if source.primary_keys.is_empty() {
        return Err(ValidationError::MissingPrimaryKey {
            entity: referrer.to_string(),
            edge: edge.name.clone(),
            peer: source.name.clone(),
        }
        .into());
    }

    source
        .primary_keys
        .iter()
        .map(|key| {
            let field = source.must_field(key)?.copied_from(&source.name);
            Ok((field, key.clone()))
        })
        .collect()
}
