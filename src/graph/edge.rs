//! Edge records.

use crate::meta::Meta;

/// A directed edge between two nodes, identified by their ids.
///
/// After normalization, validity requires `row[to] == row[from] + 1`; the
/// graph does not enforce this at `add_edge` time, only at [validate].
///
/// [validate]: crate::graph::Graph::validate
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub(crate) from: String,
    pub(crate) to: String,
    pub(crate) meta: Meta,
}

impl Edge {
    /// Create a new edge with no metadata. Parallel edges are permitted.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            meta: Meta::new(),
        }
    }

    /// Attach metadata, builder-style.
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// The source node id.
    pub fn from(&self) -> &str {
        &self.from
    }

    /// The target node id.
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Opaque metadata attached to this edge. Never absent.
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Mutable access to this edge's metadata.
    pub fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}
