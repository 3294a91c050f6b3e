//! Node records.

use crate::meta::Meta;

/// The role a node plays in a normalized graph.
///
/// A tagged variant rather than a class hierarchy: all three kinds share one
/// record and are told apart by `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// An original vertex from the caller's dependency data.
    Regular,
    /// Synthetic node splitting a long edge, or extending a sink to the
    /// bottom row. Carries a non-empty `master_id`.
    Subdivider,
    /// Synthetic separator beam inserted to factor an unavoidable K(2,2)
    /// crossing out of a row.
    Auxiliary,
}

impl NodeKind {
    /// `true` for any kind other than [`NodeKind::Regular`].
    pub fn is_synthetic(self) -> bool {
        !matches!(self, NodeKind::Regular)
    }
}

/// A single vertex of a [`crate::graph::Graph`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub(crate) id: String,
    pub(crate) row: u32,
    pub(crate) kind: NodeKind,
    /// Empty unless `kind != Regular`, in which case it names the
    /// [`NodeKind::Regular`] node this one represents.
    pub(crate) master_id: String,
    pub(crate) meta: Meta,
}

impl Node {
    /// Create a new Regular node with no metadata.
    pub fn new(id: impl Into<String>, row: u32) -> Self {
        Self {
            id: id.into(),
            row,
            kind: NodeKind::Regular,
            master_id: String::new(),
            meta: Meta::new(),
        }
    }

    /// Create a synthetic node of the given kind, naming its master.
    pub fn synthetic(id: impl Into<String>, row: u32, kind: NodeKind, master_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            row,
            kind,
            master_id: master_id.into(),
            meta: Meta::new(),
        }
    }

    /// Attach metadata, builder-style.
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// This node's graph-unique id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The row (layer) this node is assigned to. 0 is the top.
    pub fn row(&self) -> u32 {
        self.row
    }

    /// The node's kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The id of the [`NodeKind::Regular`] node this one represents, if any.
    pub fn master_id(&self) -> &str {
        &self.master_id
    }

    /// `true` if this node is not [`NodeKind::Regular`].
    pub fn is_synthetic(&self) -> bool {
        self.kind.is_synthetic()
    }

    /// The id this node should be attributed to when merging layouts:
    /// `master_id` if non-empty, else `id`.
    pub fn effective_id(&self) -> &str {
        if self.master_id.is_empty() {
            &self.id
        } else {
            &self.master_id
        }
    }

    /// Opaque metadata attached to this node. Never absent.
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Mutable access to this node's metadata.
    pub fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}
