//! Directed relationships between tables.

use serde::Serialize;
use std::fmt;

/// Multiplicity and ownership of an edge, seen from its source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EdgeType {
    /// Many-to-many through a bridge table.
    MultiMulti,
    /// Many rows here reference one peer row; optional ownership.
    MultiOne,
    /// Many rows here are owned by one peer row (the peer embeds a slice of us).
    MultiOneParent,
    /// This table embeds a slice of the peer.
    OneMulti,
    /// This table embeds one peer by value.
    OneOne,
    /// One row here is owned by one peer row (the peer embeds us by value).
    OneOneParent,
}

impl EdgeType {
    /// Whether the edge places key columns (and a foreign key) on its source
    /// table, making the source depend on the peer.
    pub fn places_columns(&self) -> bool {
        !matches!(self, EdgeType::OneOne | EdgeType::OneMulti)
    }

    /// Whether the edge is an ownership edge whose foreign key cascades.
    pub fn is_parent(&self) -> bool {
        matches!(self, EdgeType::MultiOneParent | EdgeType::OneOneParent)
    }

    /// Whether the edge embeds the peer by value.
    pub fn is_embedding(&self) -> bool {
        matches!(self, EdgeType::OneOne | EdgeType::OneMulti)
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EdgeType::MultiMulti => "MultiMulti",
            EdgeType::MultiOne => "MultiOne",
            EdgeType::MultiOneParent => "MultiOneParent",
            EdgeType::OneMulti => "OneMulti",
            EdgeType::OneOne => "OneOne",
            EdgeType::OneOneParent => "OneOneParent",
        };
        f.write_str(name)
    }
}

/// A directed relationship from a table to a named peer table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    /// Field name, or the reserved parent marker for inferred edges.
    pub name: String,
    /// Peer table name.
    pub peer_table: String,
    /// Edge type.
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
}

impl Edge {
    /// Create an edge.
    pub fn new(
        name: impl Into<String>,
        peer_table: impl Into<String>,
        edge_type: EdgeType,
    ) -> Self {
        Self {
            name: name.into(),
            peer_table: peer_table.into(),
            edge_type,
        }
    }
}
