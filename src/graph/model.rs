//! The mutable [`Graph`] model: nodes, edges, adjacency and row buckets.
//!
//! Nodes live in a [`slotmap::SlotMap`] arena; a `FxHashMap<String, NodeKey>`
//! resolves public string ids to arena keys in O(1).

use std::collections::VecDeque;

use fxhash::FxHashMap;
use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::error::GraphError;
use crate::graph::edge::Edge;
use crate::graph::node::{Node, NodeKind};
use crate::meta::Meta;

new_key_type! {
    /// Arena key for a node. Opaque, stable for the node's lifetime.
    pub struct NodeKey;
}

#[derive(Debug, Clone)]
struct EdgeRecord {
    from: NodeKey,
    to: NodeKey,
    meta: Meta,
}

/// A directed graph of [`Node`]s arranged into rows (layers).
///
/// See the crate-level documentation for the full invariants. `Graph` is
/// cheaply `Clone`-able so read-only consumers (orderers, layout) can each
/// work against their own copy per the concurrency model.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    arena: SlotMap<NodeKey, Node>,
    id_index: FxHashMap<String, NodeKey>,
    edges: Vec<EdgeRecord>,
    outgoing: SecondaryMap<NodeKey, Vec<NodeKey>>,
    incoming: SecondaryMap<NodeKey, Vec<NodeKey>>,
    rows: Vec<Vec<NodeKey>>,
    meta: Meta,
}

impl Graph {
    /// Create a new, empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_row(&mut self, row: u32) {
        let row = row as usize;
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
    }

    fn key_of(&self, id: &str) -> Option<NodeKey> {
        self.id_index.get(id).copied()
    }

    // -- mutation -----------------------------------------------------

    /// Add a node. Fails with [`GraphError::InvalidNodeID`] if `node.id()` is
    /// empty, or [`GraphError::DuplicateNodeID`] if the id already exists.
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if node.id().is_empty() {
            return Err(GraphError::InvalidNodeID);
        }
        if self.id_index.contains_key(node.id()) {
            return Err(GraphError::DuplicateNodeID);
        }
        let id = node.id().to_string();
        let row = node.row();
        self.ensure_row(row);
        let key = self.arena.insert(node);
        self.id_index.insert(id, key);
        self.outgoing.insert(key, Vec::new());
        self.incoming.insert(key, Vec::new());
        self.rows[row as usize].push(key);
        Ok(())
    }

    /// Add an edge. Fails with [`GraphError::UnknownSourceNode`] /
    /// [`GraphError::UnknownTargetNode`] if either endpoint is missing. Row
    /// adjacency is not enforced here; call [`Graph::validate`] for that.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        let from = self.key_of(edge.from()).ok_or(GraphError::UnknownSourceNode)?;
        let to = self.key_of(edge.to()).ok_or(GraphError::UnknownTargetNode)?;
        self.edges.push(EdgeRecord {
            from,
            to,
            meta: edge.meta().clone(),
        });
        self.outgoing[from].push(to);
        self.incoming[to].push(from);
        Ok(())
    }

    /// Remove the first edge matching `(from, to)`, if any. No error if
    /// absent.
    pub fn remove_edge(&mut self, from: &str, to: &str) {
        let (Some(from_key), Some(to_key)) = (self.key_of(from), self.key_of(to)) else {
            return;
        };
        if let Some(pos) = self
            .edges
            .iter()
            .position(|e| e.from == from_key && e.to == to_key)
        {
            self.edges.remove(pos);
        }
        if let Some(list) = self.outgoing.get_mut(from_key) {
            if let Some(pos) = list.iter().position(|&k| k == to_key) {
                list.remove(pos);
            }
        }
        if let Some(list) = self.incoming.get_mut(to_key) {
            if let Some(pos) = list.iter().position(|&k| k == from_key) {
                list.remove(pos);
            }
        }
    }

    /// Rewrite `old`'s id to `new` everywhere it is visible (the node's own
    /// id, and the id index). Adjacency and edges reference nodes by arena
    /// key, so they need no rewriting.
    pub fn rename_node(&mut self, old: &str, new: &str) -> Result<(), GraphError> {
        if new.is_empty() {
            return Err(GraphError::InvalidNodeID);
        }
        let key = self.key_of(old).ok_or(GraphError::UnknownSourceNode)?;
        if old != new && self.id_index.contains_key(new) {
            return Err(GraphError::DuplicateNodeID);
        }
        self.id_index.remove(old);
        self.id_index.insert(new.to_string(), key);
        self.arena[key].id = new.to_string();
        Ok(())
    }

    /// Overwrite the row of every node named in `rows`, then rebuild the
    /// `rows` buckets from scratch. Buckets are rebuilt in id-sorted order
    /// so the result is deterministic regardless of call order or the
    /// arena's internal iteration order (see the ordering guarantees in the
    /// concurrency model).
    pub fn set_rows<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = (String, u32)>,
    {
        for (id, row) in rows {
            if let Some(&key) = self.id_index.get(&id) {
                self.arena[key].row = row;
            }
        }
        self.rebuild_rows();
    }

    fn rebuild_rows(&mut self) {
        let max_row = self.arena.values().map(|n| n.row()).max().unwrap_or(0);
        self.rows = vec![Vec::new(); max_row as usize + 1];
        let mut ids: Vec<&str> = self.id_index.keys().map(String::as_str).collect();
        ids.sort_unstable();
        for id in ids {
            let key = self.id_index[id];
            let row = self.arena[key].row();
            self.rows[row as usize].push(key);
        }
    }

    // -- queries --------------------------------------------------------

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// `true` if a node with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.id_index.contains_key(id)
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.key_of(id).map(|k| &self.arena[k])
    }

    /// Mutable lookup of a node by id.
    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        let key = self.key_of(id)?;
        Some(&mut self.arena[key])
    }

    /// All node ids, in unspecified order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.id_index.keys().map(String::as_str)
    }

    /// All edges, as owned [`Edge`] values, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().map(move |e| {
            Edge::new(self.arena[e.from].id().to_string(), self.arena[e.to].id().to_string())
                .with_meta(e.meta.clone())
        })
    }

    /// Children (targets of outgoing edges) of `id`, in insertion order.
    pub fn children(&self, id: &str) -> Vec<String> {
        let Some(key) = self.key_of(id) else {
            return Vec::new();
        };
        self.outgoing
            .get(key)
            .map(|list| list.iter().map(|&k| self.arena[k].id().to_string()).collect())
            .unwrap_or_default()
    }

    /// Parents (sources of incoming edges) of `id`, in insertion order.
    pub fn parents(&self, id: &str) -> Vec<String> {
        let Some(key) = self.key_of(id) else {
            return Vec::new();
        };
        self.incoming
            .get(key)
            .map(|list| list.iter().map(|&k| self.arena[k].id().to_string()).collect())
            .unwrap_or_default()
    }

    /// Number of incoming edges to `id`.
    pub fn in_degree(&self, id: &str) -> usize {
        self.key_of(id).and_then(|k| self.incoming.get(k)).map_or(0, Vec::len)
    }

    /// Number of outgoing edges from `id`.
    pub fn out_degree(&self, id: &str) -> usize {
        self.key_of(id).and_then(|k| self.outgoing.get(k)).map_or(0, Vec::len)
    }

    /// Children of `id` that happen to be assigned to `row`.
    pub fn children_in_row(&self, id: &str, row: u32) -> Vec<String> {
        self.children(id)
            .into_iter()
            .filter(|c| self.node(c).map(Node::row) == Some(row))
            .collect()
    }

    /// Parents of `id` that happen to be assigned to `row`.
    pub fn parents_in_row(&self, id: &str, row: u32) -> Vec<String> {
        self.parents(id)
            .into_iter()
            .filter(|p| self.node(p).map(Node::row) == Some(row))
            .collect()
    }

    /// All node ids assigned to `row`, in bucket order.
    pub fn nodes_in_row(&self, row: u32) -> Vec<String> {
        self.rows
            .get(row as usize)
            .map(|bucket| bucket.iter().map(|&k| self.arena[k].id().to_string()).collect())
            .unwrap_or_default()
    }

    /// All row indices that have at least one node, sorted ascending.
    pub fn row_ids(&self) -> Vec<u32> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(r, _)| r as u32)
            .collect()
    }

    /// The largest row index with at least one node (0 if the graph is
    /// empty).
    pub fn max_row(&self) -> u32 {
        self.rows
            .iter()
            .enumerate()
            .rev()
            .find(|(_, bucket)| !bucket.is_empty())
            .map(|(r, _)| r as u32)
            .unwrap_or(0)
    }

    /// Nodes with no incoming edges, sorted by id.
    pub fn sources(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .arena
            .iter()
            .filter(|(k, _)| self.incoming.get(*k).map_or(true, Vec::is_empty))
            .map(|(_, n)| n.id().to_string())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Nodes with no outgoing edges, sorted by id.
    pub fn sinks(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .arena
            .iter()
            .filter(|(k, _)| self.outgoing.get(*k).map_or(true, Vec::is_empty))
            .map(|(_, n)| n.id().to_string())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Opaque graph-level metadata. Never absent.
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Mutable access to graph-level metadata.
    pub fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    // -- validation -------------------------------------------------------

    /// Check the invariants from the data model: every edge endpoint
    /// resolves to a live node, every edge connects consecutive rows, and
    /// the graph is acyclic.
    pub fn validate(&self) -> Result<(), GraphError> {
        for e in &self.edges {
            if !self.arena.contains_key(e.from) || !self.arena.contains_key(e.to) {
                return Err(GraphError::InvalidEdgeEndpoint);
            }
            let (from_row, to_row) = (self.arena[e.from].row(), self.arena[e.to].row());
            if to_row != from_row + 1 {
                return Err(GraphError::NonConsecutiveRows);
            }
        }
        if self.has_cycle() {
            return Err(GraphError::GraphHasCycle);
        }
        Ok(())
    }

    fn has_cycle(&self) -> bool {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Color {
            White,
            Gray,
            Black,
        }
        let mut color: SecondaryMap<NodeKey, Color> = SecondaryMap::new();
        for key in self.arena.keys() {
            color.insert(key, Color::White);
        }
        let mut order: Vec<NodeKey> = self.arena.keys().collect();
        order.sort_by_key(|&k| self.arena[k].id().to_string());

        for &start in &order {
            if color[start] != Color::White {
                continue;
            }
            // Explicit stack DFS: (node, next child index to visit).
            let mut stack: Vec<(NodeKey, usize)> = vec![(start, 0)];
            color[start] = Color::Gray;
            while let Some(&mut (node, ref mut idx)) = stack.last_mut() {
                let children = self.outgoing.get(node).map(Vec::as_slice).unwrap_or(&[]);
                if *idx < children.len() {
                    let child = children[*idx];
                    *idx += 1;
                    match color[child] {
                        Color::White => {
                            color[child] = Color::Gray;
                            stack.push((child, 0));
                        }
                        Color::Gray => return true,
                        Color::Black => {}
                    }
                } else {
                    color[node] = Color::Black;
                    stack.pop();
                }
            }
        }
        false
    }

    /// Node keys reachable from `start` are enumerated in BFS order; used
    /// internally by transitive reduction.
    pub(crate) fn bfs_reachable_excluding(&self, start: NodeKey, excluded_edge: (NodeKey, NodeKey)) -> Vec<NodeKey> {
        let mut visited = SecondaryMap::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        visited.insert(start, ());
        queue.push_back(start);
        while let Some(node) = queue.pop_front() {
            for &child in self.outgoing.get(node).map(Vec::as_slice).unwrap_or(&[]) {
                if (node, child) == excluded_edge {
                    continue;
                }
                if visited.contains_key(child) {
                    continue;
                }
                visited.insert(child, ());
                order.push(child);
                queue.push_back(child);
            }
        }
        order
    }

    pub(crate) fn key_of_pub(&self, id: &str) -> Option<NodeKey> {
        self.key_of(id)
    }

    pub(crate) fn id_of(&self, key: NodeKey) -> &str {
        self.arena[key].id()
    }

    pub(crate) fn arena_keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.arena.keys()
    }

    pub(crate) fn outgoing_keys(&self, key: NodeKey) -> &[NodeKey] {
        self.outgoing.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn incoming_keys(&self, key: NodeKey) -> &[NodeKey] {
        self.incoming.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn in_degree_key(&self, key: NodeKey) -> usize {
        self.incoming.get(key).map_or(0, Vec::len)
    }

    /// Every edge as an arena-key triple, in insertion order. Used by the
    /// `petgraph` trait impls, which walk the graph by `NodeKey` rather than
    /// by string id.
    pub(crate) fn edges_with_keys(&self) -> impl Iterator<Item = (NodeKey, NodeKey, &Meta)> {
        self.edges.iter().map(|e| (e.from, e.to, &e.meta))
    }

    pub(crate) fn node_by_key(&self, key: NodeKey) -> &Node {
        &self.arena[key]
    }

    pub(crate) fn node_by_key_mut(&mut self, key: NodeKey) -> &mut Node {
        &mut self.arena[key]
    }

    /// Metadata of the edge `from -> to`, if it exists. When parallel edges
    /// exist between the same pair, returns the first one recorded.
    pub(crate) fn edge_meta_keys(&self, from: NodeKey, to: NodeKey) -> Option<&Meta> {
        self.edges.iter().find(|e| e.from == from && e.to == to).map(|e| &e.meta)
    }

    /// Replace all edges targeting `old_targets` from `parent` with a single
    /// edge `parent -> new_target`, carrying no metadata (used by span-overlap
    /// resolution to route through a separator beam).
    pub(crate) fn reroute_edges(&mut self, parent: NodeKey, old_targets: &[NodeKey], new_target: NodeKey) {
        self.edges
            .retain(|e| !(e.from == parent && old_targets.contains(&e.to)));
        if let Some(list) = self.outgoing.get_mut(parent) {
            list.retain(|t| !old_targets.contains(t));
        }
        for &old in old_targets {
            if let Some(list) = self.incoming.get_mut(old) {
                if let Some(pos) = list.iter().position(|&k| k == parent) {
                    list.remove(pos);
                }
            }
        }
        self.add_edge_keys(parent, new_target, Meta::new());
    }

    pub(crate) fn add_edge_keys(&mut self, from: NodeKey, to: NodeKey, meta: Meta) {
        self.edges.push(EdgeRecord { from, to, meta });
        self.outgoing[from].push(to);
        self.incoming[to].push(from);
    }

    pub(crate) fn remove_edge_keys(&mut self, from: NodeKey, to: NodeKey) {
        if let Some(pos) = self.edges.iter().position(|e| e.from == from && e.to == to) {
            self.edges.remove(pos);
        }
        if let Some(list) = self.outgoing.get_mut(from) {
            if let Some(pos) = list.iter().position(|&k| k == to) {
                list.remove(pos);
            }
        }
        if let Some(list) = self.incoming.get_mut(to) {
            if let Some(pos) = list.iter().position(|&k| k == from) {
                list.remove(pos);
            }
        }
    }

    /// Insert a fresh node at `row` with the given kind/master, returning its
    /// key. Used internally by normalization; callers must ensure `id` is
    /// unique (normalization's id generator guarantees this, see
    /// `crate::normalize::subdivide`).
    pub(crate) fn insert_synthetic(&mut self, id: String, row: u32, kind: NodeKind, master_id: String) -> NodeKey {
        self.ensure_row(row);
        let key = self.arena.insert(Node::synthetic(id.clone(), row, kind, master_id));
        self.id_index.insert(id, key);
        self.outgoing.insert(key, Vec::new());
        self.incoming.insert(key, Vec::new());
        self.rows[row as usize].push(key);
        key
    }

    /// Shift every node in rows `>= from_row` down by one (new row = old +
    /// 1), and rebuild the `rows` buckets. Used by span-overlap resolution to
    /// make room for a separator row.
    pub(crate) fn shift_rows_from(&mut self, from_row: u32) {
        for node in self.arena.values_mut() {
            if node.row >= from_row {
                node.row += 1;
            }
        }
        self.rebuild_rows();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_node_populates_index_and_row_bucket() {
        let mut g = Graph::new();
        g.add_node(Node::new("a", 0)).unwrap();
        assert!(g.contains("a"));
        assert_eq!(g.nodes_in_row(0), vec!["a".to_string()]);
        assert!(g.node("a").unwrap().meta().is_empty());
    }

    #[test]
    fn add_node_rejects_empty_and_duplicate_ids() {
        let mut g = Graph::new();
        assert_eq!(g.add_node(Node::new("", 0)), Err(GraphError::InvalidNodeID));
        g.add_node(Node::new("a", 0)).unwrap();
        assert_eq!(g.add_node(Node::new("a", 1)), Err(GraphError::DuplicateNodeID));
    }

    #[test]
    fn add_edge_rejects_unknown_endpoints() {
        let mut g = Graph::new();
        g.add_node(Node::new("a", 0)).unwrap();
        assert_eq!(
            g.add_edge(Edge::new("a", "missing")),
            Err(GraphError::UnknownTargetNode)
        );
        assert_eq!(
            g.add_edge(Edge::new("missing", "a")),
            Err(GraphError::UnknownSourceNode)
        );
    }

    #[test]
    fn children_and_parents_are_symmetric() {
        let mut g = Graph::new();
        g.add_node(Node::new("a", 0)).unwrap();
        g.add_node(Node::new("b", 1)).unwrap();
        g.add_edge(Edge::new("a", "b")).unwrap();
        assert_eq!(g.children("a"), vec!["b".to_string()]);
        assert_eq!(g.parents("b"), vec!["a".to_string()]);
        assert_eq!(g.in_degree("b"), 1);
        assert_eq!(g.out_degree("a"), 1);
    }

    #[test]
    fn remove_edge_is_noop_when_absent() {
        let mut g = Graph::new();
        g.add_node(Node::new("a", 0)).unwrap();
        g.remove_edge("a", "b");
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn rename_node_updates_lookup_but_keeps_adjacency() {
        let mut g = Graph::new();
        g.add_node(Node::new("a", 0)).unwrap();
        g.add_node(Node::new("b", 1)).unwrap();
        g.add_edge(Edge::new("a", "b")).unwrap();
        g.rename_node("a", "a2").unwrap();
        assert!(!g.contains("a"));
        assert!(g.contains("a2"));
        assert_eq!(g.children("a2"), vec!["b".to_string()]);
    }

    #[test]
    fn rename_node_rejects_empty_and_duplicate() {
        let mut g = Graph::new();
        g.add_node(Node::new("a", 0)).unwrap();
        g.add_node(Node::new("b", 0)).unwrap();
        assert_eq!(g.rename_node("a", ""), Err(GraphError::InvalidNodeID));
        assert_eq!(g.rename_node("a", "b"), Err(GraphError::DuplicateNodeID));
    }

    #[test]
    fn validate_detects_non_consecutive_rows() {
        let mut g = Graph::new();
        g.add_node(Node::new("a", 0)).unwrap();
        g.add_node(Node::new("b", 2)).unwrap();
        g.add_edge(Edge::new("a", "b")).unwrap();
        assert_eq!(g.validate(), Err(GraphError::NonConsecutiveRows));
    }

    #[test]
    fn validate_detects_cycle() {
        // a->b and b->a both satisfy row adjacency once a,b share a row in a
        // 2-cycle sense is impossible under row constraints, so isolate cycle
        // detection from the row-adjacency graph entirely via `has_cycle`.
        let mut g = Graph::new();
        g.add_node(Node::new("a", 0)).unwrap();
        g.add_node(Node::new("b", 1)).unwrap();
        g.add_node(Node::new("c", 2)).unwrap();
        g.add_edge(Edge::new("a", "b")).unwrap();
        g.add_edge(Edge::new("b", "c")).unwrap();
        assert!(g.validate().is_ok());
        assert!(!g.has_cycle());

        g.add_edge(Edge::new("c", "a")).unwrap();
        assert!(g.has_cycle());
    }

    #[test]
    fn sources_and_sinks_are_sorted() {
        let mut g = Graph::new();
        g.add_node(Node::new("b", 0)).unwrap();
        g.add_node(Node::new("a", 0)).unwrap();
        g.add_node(Node::new("c", 1)).unwrap();
        g.add_edge(Edge::new("a", "c")).unwrap();
        g.add_edge(Edge::new("b", "c")).unwrap();
        assert_eq!(g.sources(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(g.sinks(), vec!["c".to_string()]);
    }

    #[test]
    fn set_rows_rebuilds_buckets_deterministically() {
        let mut g = Graph::new();
        g.add_node(Node::new("b", 0)).unwrap();
        g.add_node(Node::new("a", 0)).unwrap();
        g.set_rows([("a".to_string(), 1)]);
        assert_eq!(g.nodes_in_row(0), vec!["b".to_string()]);
        assert_eq!(g.nodes_in_row(1), vec!["a".to_string()]);
        assert_eq!(g.max_row(), 1);
        assert_eq!(g.row_ids(), vec![0, 1]);
    }
}
