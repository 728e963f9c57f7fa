//! Foreign keys and referential actions.

use serde::Serialize;
use std::fmt;

/// Referential action on update or delete of the referenced row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReferenceOption {
    /// Block the change while referencing rows exist.
    #[serde(rename = "RESTRICT")]
    Restrict,
    /// Propagate the change to referencing rows.
    #[serde(rename = "CASCADE")]
    Cascade,
    /// Null out the referencing columns.
    #[serde(rename = "SET NULL")]
    SetNull,
}

impl fmt::Display for ReferenceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceOption::Restrict => write!(f, "RESTRICT"),
            ReferenceOption::Cascade => write!(f, "CASCADE"),
            ReferenceOption::SetNull => write!(f, "SET NULL"),
        }
    }
}

/// A foreign key: source columns paired by position with target columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    /// Columns on the referencing table.
    pub source_columns: Vec<String>,
    /// Referenced table.
    pub ref_table: String,
    /// Columns on the referenced table.
    pub ref_columns: Vec<String>,
    /// Action on update of the referenced row.
    pub on_update: ReferenceOption,
    /// Action on delete of the referenced row.
    pub on_delete: ReferenceOption,
}

impl ForeignKey {
    /// Create an empty foreign key to a table, restricting by default.
    pub fn new(ref_table: impl Into<String>) -> Self {
        Self {
            source_columns: Vec::new(),
            ref_table: ref_table.into(),
            ref_columns: Vec::new(),
            on_update: ReferenceOption::Restrict,
            on_delete: ReferenceOption::Restrict,
        }
    }

    /// Use the same action for update and delete.
    pub fn with_policy(mut self, option: ReferenceOption) -> Self {
        self.on_update = option;
        self.on_delete = option;
        self
    }

    /// Append a source/target column pair.
    pub fn push_pair(&mut self, source: impl Into<String>, target: impl Into<String>) {
        self.source_columns.push(source.into());
        self.ref_columns.push(target.into());
    }

    /// Number of column pairs.
    pub fn len(&self) -> usize {
        self.source_columns.len()
    }

    /// Check whether no columns have been paired.
    pub fn is_empty(&self) -> bool {
        self.source_columns.is_empty()
    }
}
