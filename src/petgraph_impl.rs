//! Implementation of the [`petgraph`] visitor traits over `&Graph`, so a
//! normalized graph can be handed to `petgraph::algo` routines (topological
//! sort, SCCs, shortest paths) without this crate reimplementing them.
//!
//! Node ids are arena [`NodeKey`]s, not the public string ids — callers
//! crossing this boundary go through [`Graph::node`]/[`Graph::id_of`]-style
//! lookups (via the data already exposed on `Graph`) to get back to strings.

mod edge_ref;

use petgraph::{
    visit::{Data, GraphBase, GraphRef, IntoEdgeReferences, IntoEdges, IntoEdgesDirected, IntoNeighbors, IntoNeighborsDirected},
    Direction,
};

use crate::graph::{Graph, Node, NodeKey};
use crate::meta::Meta;

pub use edge_ref::EdgeRef;

impl<'a> GraphBase for &'a Graph {
    type EdgeId = (NodeKey, NodeKey);
    type NodeId = NodeKey;
}

impl<'a> GraphRef for &'a Graph {}

impl<'a> Data for &'a Graph {
    type NodeWeight = Node;
    type EdgeWeight = Meta;
}

impl<'a> IntoNeighbors for &'a Graph {
    type Neighbors = std::iter::Copied<std::slice::Iter<'a, NodeKey>>;

    fn neighbors(self, n: Self::NodeId) -> Self::Neighbors {
        self.outgoing_keys(n).iter().copied()
    }
}

impl<'a> IntoNeighborsDirected for &'a Graph {
    type NeighborsDirected = std::iter::Copied<std::slice::Iter<'a, NodeKey>>;

    fn neighbors_directed(self, n: Self::NodeId, d: Direction) -> Self::NeighborsDirected {
        match d {
            Direction::Outgoing => self.outgoing_keys(n).iter().copied(),
            Direction::Incoming => self.incoming_keys(n).iter().copied(),
        }
    }
}

impl<'a> IntoEdgeReferences for &'a Graph {
    type EdgeRef = EdgeRef<'a>;
    type EdgeReferences = Box<dyn Iterator<Item = Self::EdgeRef> + 'a>;

    fn edge_references(self) -> Self::EdgeReferences {
        Box::new(self.edges_with_keys().map(|(from, to, meta)| EdgeRef::new(from, to, meta)))
    }
}

impl<'a> IntoEdges for &'a Graph {
    type Edges = Box<dyn Iterator<Item = Self::EdgeRef> + 'a>;

    fn edges(self, n: Self::NodeId) -> Self::Edges {
        Box::new(self.edges_with_keys().filter(move |&(from, _, _)| from == n).map(|(from, to, meta)| EdgeRef::new(from, to, meta)))
    }
}

impl<'a> IntoEdgesDirected for &'a Graph {
    type EdgesDirected = Box<dyn Iterator<Item = Self::EdgeRef> + 'a>;

    fn edges_directed(self, n: Self::NodeId, d: Direction) -> Self::EdgesDirected {
        Box::new(self.edges_with_keys().filter(move |&(from, to, _)| match d {
            Direction::Outgoing => from == n,
            Direction::Incoming => to == n,
        }).map(|(from, to, meta)| EdgeRef::new(from, to, meta)))
    }
}
