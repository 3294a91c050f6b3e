//! Step 3: assign each node a row via longest-path layering over a Kahn
//! topological order.

use std::collections::VecDeque;

use tracing::debug;

use crate::graph::Graph;

/// `row[v] = 0` initially; popping `u` off the topological queue, every
/// child `c` gets `row[c] = max(row[c], row[u] + 1)`. Assumes the graph is
/// acyclic (cycle breaking must run first); nodes stuck in an unbroken
/// cycle are left at row 0.
pub(crate) fn assign_layers(g: &mut Graph) {
    let keys: Vec<_> = g.arena_keys().collect();
    let mut in_degree: std::collections::HashMap<_, usize> =
        keys.iter().map(|&k| (k, g.in_degree_key(k))).collect();
    let mut row: std::collections::HashMap<_, u32> = keys.iter().map(|&k| (k, 0u32)).collect();

    let mut sorted_sources: Vec<_> = keys.iter().copied().filter(|&k| in_degree[&k] == 0).collect();
    sorted_sources.sort_by(|&a, &b| g.id_of(a).cmp(g.id_of(b)));
    let mut queue: VecDeque<_> = sorted_sources.into_iter().collect();

    while let Some(u) = queue.pop_front() {
        let ur = row[&u];
        let mut ready: Vec<_> = Vec::new();
        for &c in g.outgoing_keys(u).to_vec().iter() {
            let entry = row.get_mut(&c).unwrap();
            if ur + 1 > *entry {
                *entry = ur + 1;
            }
            let d = in_degree.get_mut(&c).unwrap();
            *d -= 1;
            if *d == 0 {
                ready.push(c);
            }
        }
        ready.sort_by(|&a, &b| g.id_of(a).cmp(g.id_of(b)));
        queue.extend(ready);
    }

    let rows: Vec<(String, u32)> = keys.iter().map(|&k| (g.id_of(k).to_string(), row[&k])).collect();
    g.set_rows(rows);
    debug!(rows = g.row_ids().len(), "assign_layers");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};

    #[test]
    fn chain_gets_sequential_rows() {
        let mut g = Graph::new();
        for id in ["a", "b", "c"] {
            g.add_node(Node::new(id, 0)).unwrap();
        }
        g.add_edge(Edge::new("a", "b")).unwrap();
        g.add_edge(Edge::new("b", "c")).unwrap();
        assign_layers(&mut g);
        assert_eq!(g.node("a").unwrap().row(), 0);
        assert_eq!(g.node("b").unwrap().row(), 1);
        assert_eq!(g.node("c").unwrap().row(), 2);
    }

    #[test]
    fn longest_path_wins_for_diamond_with_extra_hop() {
        let mut g = Graph::new();
        for id in ["a", "b", "c", "d", "e"] {
            g.add_node(Node::new(id, 0)).unwrap();
        }
        g.add_edge(Edge::new("a", "b")).unwrap();
        g.add_edge(Edge::new("b", "d")).unwrap();
        g.add_edge(Edge::new("a", "c")).unwrap();
        g.add_edge(Edge::new("c", "e")).unwrap();
        g.add_edge(Edge::new("e", "d")).unwrap();
        assign_layers(&mut g);
        // d's longest incoming path is a->c->e->d (length 3), not a->b->d (length 2).
        assert_eq!(g.node("d").unwrap().row(), 3);
    }
}
