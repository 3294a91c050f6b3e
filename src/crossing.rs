//! Crossing counting between adjacent rows.
//!
//! Two adjacent rows' edges are viewed as pairs `(pos_in_upper,
//! pos_in_lower)`; a crossing is an inversion between two such pairs. We
//! count inversions with a Fenwick tree in `O((E + V) log V)` rather than the
//! naive `O(E^2)` pairwise comparison.

use std::collections::HashMap;

use crate::fenwick::FenwickTree;
use crate::graph::Graph;

/// Caller-owned, reusable scratch space for [`count_crossings_idx`].
///
/// One workspace per task (see the crate's concurrency model) — it is not
/// safe to share a workspace across concurrent callers.
#[derive(Debug, Clone)]
pub struct CrossingWorkspace {
    fenwick: FenwickTree,
    /// Reused for "position of node X within the lower row's permutation"
    /// lookups, indexed by the lower row's local node ids.
    pos: Vec<i32>,
}

impl CrossingWorkspace {
    /// Preallocate for rows up to `max_width` wide. A call to
    /// [`count_crossings_idx`] with a wider lower row than this is a caller
    /// bug: it will panic (a safe failure mode, unlike the "wrong answer"
    /// UB this invites in an unchecked implementation).
    pub fn with_capacity(max_width: usize) -> Self {
        Self {
            fenwick: FenwickTree::with_capacity(max_width),
            pos: vec![-1; max_width],
        }
    }

    /// Grow the workspace (if needed) to cover rows up to `max_width` wide.
    pub fn ensure_capacity(&mut self, max_width: usize) {
        self.fenwick.ensure_capacity(max_width);
        if self.pos.len() < max_width {
            self.pos.resize(max_width, -1);
        }
    }
}

/// Count crossings between two adjacent rows identified by node id,
/// considering only the edges of `g` that run between them.
///
/// Returns 0 if either row is empty or there are at most 1 inter-row edges
/// (no pair of edges to cross).
pub fn count_layer_crossings(g: &Graph, upper: &[String], lower: &[String]) -> u64 {
    if upper.is_empty() || lower.is_empty() {
        return 0;
    }
    let lower_pos: HashMap<&str, usize> = lower.iter().map(|s| s.as_str()).zip(0..).collect();

    let mut edges: Vec<(usize, usize)> = Vec::new();
    for (u_idx, u) in upper.iter().enumerate() {
        for child in g.children(u) {
            if let Some(&l_idx) = lower_pos.get(child.as_str()) {
                edges.push((u_idx, l_idx));
            }
        }
    }
    if edges.len() <= 1 {
        return 0;
    }
    edges.sort_unstable();
    count_inversions(&edges, lower.len())
}

fn count_inversions(edges: &[(usize, usize)], lower_width: usize) -> u64 {
    let mut fenwick = FenwickTree::with_capacity(lower_width);
    let mut total = 0u64;
    for (seen, &(_, target)) in edges.iter().enumerate() {
        let seen = seen as i64;
        let not_after = fenwick.prefix_sum(target);
        total += (seen - not_after) as u64;
        fenwick.add(target, 1);
    }
    total
}

/// Sum [`count_layer_crossings`] over every pair of consecutive rows in the
/// sorted sequence of rows present in `orders`.
pub fn count_crossings(g: &Graph, orders: &[(u32, Vec<String>)]) -> u64 {
    let mut sorted: Vec<&(u32, Vec<String>)> = orders.iter().collect();
    sorted.sort_by_key(|(row, _)| *row);
    sorted
        .windows(2)
        .map(|w| count_layer_crossings(g, &w[0].1, &w[1].1))
        .sum()
}

/// Integer-indexed, allocation-free variant for hot loops (e.g. the optimal
/// orderer's branch-and-bound inner loop).
///
/// `edges_by_upper[u]` lists the lower-row local ids that upper-row local id
/// `u` connects to; this adjacency is structural (independent of ordering)
/// and should be built once per row pair and reused across many calls.
/// `upper_perm`/`lower_perm` give the current left-to-right order as
/// sequences of local ids. `ws` must have been sized with at least
/// `lower_perm.len()` capacity.
pub fn count_crossings_idx(
    edges_by_upper: &[Vec<u32>],
    upper_perm: &[u32],
    lower_perm: &[u32],
    ws: &mut CrossingWorkspace,
) -> u64 {
    debug_assert!(ws.pos.len() >= lower_perm.len());
    ws.fenwick.reset();
    for (pos, &node) in lower_perm.iter().enumerate() {
        ws.pos[node as usize] = pos as i32;
    }

    let mut total = 0u64;
    let mut seen = 0i64;
    for &u in upper_perm {
        let Some(neighbors) = edges_by_upper.get(u as usize) else {
            continue;
        };
        for &v in neighbors {
            let target = ws.pos[v as usize];
            debug_assert!(target >= 0, "lower_perm must cover every neighbor referenced by edges_by_upper");
            let target = target as usize;
            let not_after = ws.fenwick.prefix_sum(target);
            total += (seen - not_after) as u64;
            ws.fenwick.add(target, 1);
            seen += 1;
        }
    }
    total
}

/// Count the inversions that would exist between `left`'s and `right`'s
/// neighbor sets in `adjacent_row_order` (parents if `use_parents`, else
/// children) if `left` were placed immediately to the left of `right`.
///
/// Used by local-swap heuristics to decide whether swapping two adjacent
/// row members would reduce crossings, without recomputing the whole row.
pub fn count_pair_crossings(
    g: &Graph,
    left: &str,
    right: &str,
    adjacent_row_order: &[String],
    use_parents: bool,
) -> u64 {
    let pos: HashMap<&str, usize> = adjacent_row_order
        .iter()
        .map(|s| s.as_str())
        .zip(0..)
        .collect();
    let neighbors_of = |id: &str| -> Vec<usize> {
        let names = if use_parents { g.parents(id) } else { g.children(id) };
        names
            .into_iter()
            .filter_map(|n| pos.get(n.as_str()).copied())
            .collect()
    };
    let left_pos = neighbors_of(left);
    let right_pos = neighbors_of(right);

    let mut crossings = 0u64;
    for &lp in &left_pos {
        for &rp in &right_pos {
            if lp > rp {
                crossings += 1;
            }
        }
    }
    crossings
}

/// Naive `O(E^2)` crossing count, used to test [`count_layer_crossings`]
/// against its definition.
#[cfg(test)]
pub(crate) fn count_layer_crossings_naive(g: &Graph, upper: &[String], lower: &[String]) -> u64 {
    let lower_pos: HashMap<&str, usize> = lower.iter().map(|s| s.as_str()).zip(0..).collect();
    let mut edges: Vec<(usize, usize)> = Vec::new();
    for (u_idx, u) in upper.iter().enumerate() {
        for child in g.children(u) {
            if let Some(&l_idx) = lower_pos.get(child.as_str()) {
                edges.push((u_idx, l_idx));
            }
        }
    }
    let mut total = 0u64;
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            let (u1, l1) = edges[i];
            let (u2, l2) = edges[j];
            if (u1 < u2 && l1 > l2) || (u1 > u2 && l1 < l2) {
                total += 1;
            }
        }
    }
    total
}
