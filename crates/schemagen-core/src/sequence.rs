//! Table creation order.
//!
//! Tables are pre-sorted by name, then a stable topological sort repeatedly
//! emits the alphabetically first table whose dependencies have all been
//! emitted. A table referencing itself does not constrain the order.

use crate::error::{Result, ValidationError};
use crate::model::{Schema, TableId};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Compute the creation order of all tables in `schema`.
///
/// Fails with [`ValidationError::ReferenceCycle`] if the dependency graph has
/// a cycle.
pub fn sequence(schema: &Schema) -> Result<Vec<TableId>> {
    let mut ids: Vec<TableId> = schema.iter().map(|(id, _)| id).collect();
    ids.sort_by(|a, b| schema.table(*a).name().cmp(schema.table(*b).name()));

    let position: HashMap<TableId, usize> =
        ids.iter().enumerate().map(|(pos, id)| (*id, pos)).collect();

    let mut dependencies: Vec<Vec<usize>> = Vec::with_capacity(ids.len());
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
    for (pos, id) in ids.iter().enumerate() {
        let mut deps = Vec::new();
        for name in schema.table(*id).dependencies() {
            let dep = position[&schema.must_lookup(name)?];
            if dep != pos {
                deps.push(dep);
                dependents[dep].push(pos);
            }
        }
        dependencies.push(deps);
    }

    let mut pending: Vec<usize> = dependencies.iter().map(Vec::len).collect();
    let mut ready: BTreeSet<usize> = (0..ids.len()).filter(|&pos| pending[pos] == 0).collect();
    let mut order = Vec::with_capacity(ids.len());

    while let Some(pos) = ready.pop_first() {
        order.push(ids[pos]);
        for &dependent in &dependents[pos] {
            pending[dependent] -= 1;
            if pending[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }

    if order.len() < ids.len() {
        let cycle = find_cycle(&dependencies, &pending)
            .into_iter()
            .map(|pos| schema.table(ids[pos]).name().to_string())
            .collect();
        return Err(ValidationError::ReferenceCycle { cycle }.into());
    }

    debug!(tables = order.len(), "sequenced tables");
    Ok(order)
}

/// Walk unemitted dependencies from the first stuck table until a table
/// repeats. Every stuck table has at least one stuck dependency, so the walk
/// always closes a cycle.
fn find_cycle(dependencies: &[Vec<usize>], pending: &[usize]) -> Vec<usize> {
    let Some(start) = (0..pending.len()).find(|&pos| pending[pos] > 0) else {
        return Vec::new();
    };

    let mut path = Vec::new();
    let mut seen: HashMap<usize, usize> = HashMap::new();
    let mut current = start;

    loop {
        if let Some(&at) = seen.get(&current) {
            let mut cycle = path[at..].to_vec();
            cycle.push(current);
            return cycle;
        }
        seen.insert(current, path.len());
        path.push(current);

        match dependencies[current].iter().copied().find(|&dep| pending[dep] > 0) {
            Some(next) => current = next,
            None => return path,
        }
    }
}
