//! Error taxonomy for graph mutation and validation.

use thiserror::Error;

/// Errors produced by [`crate::graph::Graph`] mutation and validation.
///
/// Each variant carries the stable string representation used at API
/// boundaries (see the crate's external-interface documentation).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An empty id was given on node creation or rename.
    #[error("node ID must not be empty")]
    InvalidNodeID,

    /// The id already exists in the graph.
    #[error("duplicate node ID")]
    DuplicateNodeID,

    /// An edge referenced a source node that does not exist.
    #[error("unknown source node")]
    UnknownSourceNode,

    /// An edge referenced a target node that does not exist.
    #[error("unknown target node")]
    UnknownTargetNode,

    /// `validate` found an edge endpoint that is no longer a graph member.
    #[error("invalid edge endpoint")]
    InvalidEdgeEndpoint,

    /// `validate` found an edge whose endpoints are not on consecutive rows.
    #[error("edges must connect consecutive rows")]
    NonConsecutiveRows,

    /// `validate` found a cycle.
    #[error("graph contains a cycle")]
    GraphHasCycle,
}
