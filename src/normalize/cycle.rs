//! Step 1: break cycles by discarding back-edges found during a DFS.

use tracing::debug;

use crate::graph::{Graph, NodeKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// DFS with white/gray/black coloring, starting from sources first (sorted
/// by id for determinism), then any remaining uncolored node (also in id
/// order). Every edge that closes a cycle (targets a gray node) is recorded
/// and removed once the traversal finishes. Self-loops count as back-edges.
///
/// Returns the number of edges removed.
pub(crate) fn break_cycles(g: &mut Graph) -> usize {
    let mut order: Vec<NodeKey> = g.arena_keys().collect();
    order.sort_by(|&a, &b| g.id_of(a).cmp(g.id_of(b)));

    let mut start_order: Vec<NodeKey> = order
        .iter()
        .copied()
        .filter(|&k| g.in_degree_key(k) == 0)
        .collect();
    let remaining: Vec<NodeKey> = order.iter().copied().filter(|&k| g.in_degree_key(k) != 0).collect();
    start_order.extend(remaining);

    let mut color: std::collections::HashMap<NodeKey, Color> =
        order.iter().map(|&k| (k, Color::White)).collect();
    let mut back_edges = Vec::new();

    for start in start_order {
        if color[&start] != Color::White {
            continue;
        }
        // iterative DFS with an explicit stack of (node, next child index)
        let mut stack: Vec<(NodeKey, usize)> = vec![(start, 0)];
        color.insert(start, Color::Gray);
        while let Some(&(node, child_idx)) = stack.last() {
            let children = g.outgoing_keys(node).to_vec();
            if child_idx < children.len() {
                let child = children[child_idx];
                stack.last_mut().unwrap().1 += 1;
                match color.get(&child).copied().unwrap_or(Color::White) {
                    Color::White => {
                        color.insert(child, Color::Gray);
                        stack.push((child, 0));
                    }
                    Color::Gray => back_edges.push((node, child)),
                    Color::Black => {}
                }
            } else {
                color.insert(node, Color::Black);
                stack.pop();
            }
        }
    }

    let removed = back_edges.len();
    for (from, to) in back_edges {
        g.remove_edge_keys(from, to);
    }
    debug!(removed_back_edges = removed, "break_cycles");
    removed
}
