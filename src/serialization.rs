//! Portable (de)serialization of [`Graph`] and [`Layout`], gated behind the
//! `serde` feature.
//!
//! `Graph` itself cannot derive `Serialize`/`Deserialize` directly: its
//! arena keys are only stable within one process. [`SerializedGraph`] is the
//! wire format instead — nodes and edges by string id, in the same shape a
//! caller would hand to [`Graph::add_node`]/[`Graph::add_edge`] — and
//! round-trips through it.

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::graph::{Edge, Graph, Node};
use crate::layout::Layout;
use crate::meta::Meta;

/// A serializable snapshot of a [`Graph`]: every node (with its row and
/// kind) and every edge, in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub meta: Meta,
}

impl SerializedGraph {
    /// Snapshot `g` into a serializable, portable form.
    pub fn from_graph(g: &Graph) -> Self {
        let mut nodes = Vec::new();
        for row in g.row_ids() {
            for id in g.nodes_in_row(row) {
                if let Some(node) = g.node(&id) {
                    nodes.push(node.clone());
                }
            }
        }
        let edges = g.edges().collect();
        SerializedGraph {
            nodes,
            edges,
            meta: g.meta().clone(),
        }
    }

    /// Rebuild a [`Graph`] from this snapshot, replaying the recorded nodes
    /// and edges through [`Graph::add_node`]/[`Graph::add_edge`].
    ///
    /// Fails with the same [`GraphError`] variants `add_node`/`add_edge`
    /// would: a snapshot produced by `from_graph` never fails here, but a
    /// hand-edited or foreign one might (duplicate ids, dangling edge
    /// endpoints).
    pub fn into_graph(self) -> Result<Graph, GraphError> {
        let mut g = Graph::new();
        for node in self.nodes {
            g.add_node(node)?;
        }
        for edge in self.edges {
            g.add_edge(edge)?;
        }
        *g.meta_mut() = self.meta;
        Ok(g)
    }
}

impl Graph {
    /// Serialize this graph to a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&SerializedGraph::from_graph(self))
    }

    /// Deserialize a graph from a JSON string produced by [`Graph::to_json`].
    pub fn from_json(s: &str) -> Result<Graph, GraphDeserializeError> {
        let serialized: SerializedGraph = serde_json::from_str(s)?;
        Ok(serialized.into_graph()?)
    }
}

impl Layout {
    /// Serialize this layout to a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize a layout from a JSON string produced by
    /// [`Layout::to_json`].
    pub fn from_json(s: &str) -> serde_json::Result<Layout> {
        serde_json::from_str(s)
    }
}

/// Errors from [`Graph::from_json`]: either the JSON itself was malformed,
/// or it parsed but described an invalid graph (see [`GraphError`]).
#[derive(Debug, thiserror::Error)]
pub enum GraphDeserializeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Graph(#[from] GraphError),
}
