//! The derivation pipeline: classify, sequence, synthesize.

use crate::classify::Classifier;
use crate::error::Result;
use crate::introspect::{ColumnTypeMapper, Introspector, TypeRef};
use crate::model::{MainTable, Schema, Table};
use crate::synthesize::synthesize;
use serde::Serialize;
use tracing::{info, instrument};

/// A fully derived schema: main tables in creation order, each carrying its
/// bridge tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedSchema {
    /// Main tables in creation order.
    pub tables: Vec<MainTable>,
}

impl DerivedSchema {
    /// Every table in creation order, each main table followed by its
    /// bridge tables.
    pub fn ordered_tables(&self) -> impl Iterator<Item = &Table> + '_ {
        self.tables
            .iter()
            .flat_map(|main| std::iter::once(&main.table).chain(main.aux_tables.iter()))
    }

    /// Find a main table by name.
    pub fn get(&self, name: &str) -> Option<&MainTable> {
        self.tables.iter().find(|t| t.name() == name)
    }

    /// Total number of tables, bridge tables included.
    pub fn table_count(&self) -> usize {
        self.tables.iter().map(|t| 1 + t.aux_tables.len()).sum()
    }

    /// Serialize the schema as indented JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Derive the relational schema reachable from `seeds`.
///
/// All seeds are validated before any table is registered. Derivation either
/// completes or fails as a whole; no partial schema is returned.
#[instrument(skip_all, fields(seeds = seeds.len()))]
pub fn derive_schema<I, M>(introspector: &I, types: &M, seeds: &[TypeRef]) -> Result<DerivedSchema>
where
    I: Introspector + ?Sized,
    M: ColumnTypeMapper + ?Sized,
{
    let classifier = Classifier::new(introspector, types);
    for seed in seeds {
        classifier.validate_seed(seed)?;
    }

    let mut schema = Schema::new();
    for seed in seeds {
        classifier.register_seed(&mut schema, seed)?;
    }
    classifier.run(&mut schema)?;

    synthesize(&mut schema)?;
    let tables = schema.into_sorted()?;

    let derived = DerivedSchema { tables };
    info!(
        main_tables = derived.tables.len(),
        total_tables = derived.table_count(),
        "derived schema"
    );
    Ok(derived)
}
