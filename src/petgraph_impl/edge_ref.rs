use petgraph::visit;

use crate::graph::NodeKey;
use crate::meta::Meta;

/// An edge reference into a [`crate::graph::Graph`], valid for as long as the
/// graph itself.
#[derive(Debug, Clone, Copy)]
pub struct EdgeRef<'a> {
    from: NodeKey,
    to: NodeKey,
    meta: &'a Meta,
}

impl<'a> EdgeRef<'a> {
    pub(super) fn new(from: NodeKey, to: NodeKey, meta: &'a Meta) -> Self {
        Self { from, to, meta }
    }
}

impl<'a> visit::EdgeRef for EdgeRef<'a> {
    type NodeId = NodeKey;
    type EdgeId = (NodeKey, NodeKey);
    type Weight = Meta;

    fn source(&self) -> Self::NodeId {
        self.from
    }

    fn target(&self) -> Self::NodeId {
        self.to
    }

    fn weight(&self) -> &Self::Weight {
        self.meta
    }

    fn id(&self) -> Self::EdgeId {
        (self.from, self.to)
    }
}
