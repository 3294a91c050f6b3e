//! Step 2: drop edges implied by a longer path between the same endpoints.

use tracing::debug;

use crate::graph::Graph;

/// For every edge `u -> v`, remove it if `v` is reachable from `u` by some
/// other path. `O(V*E)` per edge check (`O(V^2 * E)` overall), acceptable
/// for the graph sizes this crate targets.
///
/// Returns the number of edges removed.
pub(crate) fn transitive_reduction(g: &mut Graph) -> usize {
    let edges: Vec<(crate::graph::NodeKey, crate::graph::NodeKey)> = g
        .arena_keys()
        .flat_map(|u| g.outgoing_keys(u).iter().map(move |&v| (u, v)).collect::<Vec<_>>())
        .collect();

    let mut removed = 0usize;
    for (u, v) in edges {
        if g.bfs_reachable_excluding(u, (u, v)).contains(&v) {
            g.remove_edge_keys(u, v);
            removed += 1;
        }
    }
    debug!(removed_redundant_edges = removed, "transitive_reduction");
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};

    #[test]
    fn removes_shortcut_edge() {
        let mut g = Graph::new();
        for id in ["a", "b", "c"] {
            g.add_node(Node::new(id, 0)).unwrap();
        }
        g.add_edge(Edge::new("a", "b")).unwrap();
        g.add_edge(Edge::new("b", "c")).unwrap();
        g.add_edge(Edge::new("a", "c")).unwrap();

        let removed = transitive_reduction(&mut g);
        assert_eq!(removed, 1);
        assert_eq!(g.children("a"), vec!["b".to_string()]);
    }

    #[test]
    fn preserves_reachability() {
        let mut g = Graph::new();
        for id in ["a", "b", "c", "d"] {
            g.add_node(Node::new(id, 0)).unwrap();
        }
        g.add_edge(Edge::new("a", "b")).unwrap();
        g.add_edge(Edge::new("b", "c")).unwrap();
        g.add_edge(Edge::new("a", "c")).unwrap();
        g.add_edge(Edge::new("c", "d")).unwrap();

        transitive_reduction(&mut g);
        assert!(g.children("a").contains(&"b".to_string()));
        assert!(!g.children("a").contains(&"c".to_string()));
    }

    #[test]
    fn diamond_has_no_redundant_edges() {
        let mut g = Graph::new();
        for id in ["a", "b", "c", "d"] {
            g.add_node(Node::new(id, 0)).unwrap();
        }
        g.add_edge(Edge::new("a", "b")).unwrap();
        g.add_edge(Edge::new("a", "c")).unwrap();
        g.add_edge(Edge::new("b", "d")).unwrap();
        g.add_edge(Edge::new("c", "d")).unwrap();
        assert_eq!(transitive_reduction(&mut g), 0);
        assert_eq!(g.edge_count(), 4);
    }
}
