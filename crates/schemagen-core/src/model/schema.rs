//! The schema graph: an arena of tables addressed by name.

use super::table::MainTable;
use crate::error::{InvariantViolation, Result};
use crate::sequence;
use std::collections::HashMap;

/// Stable handle to a table in a [`Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(usize);

/// Accumulates tables for one derivation run.
///
/// Tables are never removed, so a [`TableId`] stays valid for the lifetime of
/// the schema. The creation order is computed on demand and cached until the
/// next registration.
#[derive(Debug, Default)]
pub struct Schema {
    tables: Vec<MainTable>,
    index: HashMap<String, TableId>,
    sorted: Option<Vec<TableId>>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a table by entity kind, creating it on first reference.
    pub fn register(&mut self, kind: &str) -> TableId {
        if let Some(&id) = self.index.get(kind) {
            return id;
        }
        let id = TableId(self.tables.len());
        self.tables.push(MainTable::new(kind));
        self.index.insert(kind.to_string(), id);
        self.sorted = None;
        id
    }

    /// Handle of a registered table.
    pub fn lookup(&self, name: &str) -> Option<TableId> {
        self.index.get(name).copied()
    }

    /// Handle of a table that must already be registered.
    pub fn must_lookup(&self, name: &str) -> std::result::Result<TableId, InvariantViolation> {
        self.lookup(name).ok_or_else(|| InvariantViolation::UnknownTable {
            name: name.to_string(),
        })
    }

    /// Table that must already be registered.
    pub fn must_table(&self, name: &str) -> std::result::Result<&MainTable, InvariantViolation> {
        self.must_lookup(name).map(|id| self.table(id))
    }

    /// Table by handle.
    pub fn table(&self, id: TableId) -> &MainTable {
        &self.tables[id.0]
    }

    /// Mutable table by handle.
    pub fn table_mut(&mut self, id: TableId) -> &mut MainTable {
        &mut self.tables[id.0]
    }

    /// Number of main tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check whether no table has been registered.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// All tables in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (TableId, &MainTable)> {
        self.tables
            .iter()
            .enumerate()
            .map(|(i, table)| (TableId(i), table))
    }

    /// Handles of tables whose fields have not been classified yet.
    pub fn unclassified(&self) -> Vec<TableId> {
        self.iter()
            .filter(|(_, table)| !table.classified)
            .map(|(id, _)| id)
            .collect()
    }

    /// Whether a main or bridge table already uses `name`.
    pub fn is_name_taken(&self, name: &str) -> bool {
        self.index.contains_key(name)
            || self
                .tables
                .iter()
                .any(|t| t.aux_tables.iter().any(|aux| aux.name == name))
    }

    /// Tables in creation order. See [`sequence::sequence`].
    pub fn sorted_tables(&mut self) -> Result<&[TableId]> {
        if self.sorted.is_none() {
            self.sorted = Some(sequence::sequence(self)?);
        }
        Ok(self.sorted.as_deref().unwrap_or_default())
    }

    /// Consume the schema, yielding tables in creation order.
    pub fn into_sorted(mut self) -> Result<Vec<MainTable>> {
        let order = self.sorted_tables()?.to_vec();
        let mut slots: Vec<Option<MainTable>> = self.tables.into_iter().map(Some).collect();
        Ok(order
            .into_iter()
            .filter_map(|id| slots[id.0].take())
            .collect())
    }
}
