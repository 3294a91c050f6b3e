//! Step 5: resolve unavoidable K(2,2) crossings by routing shared children
//! through a separator beam instead of leaving every pair of parent edges to
//! cross.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::graph::{Graph, Node, NodeKind};

/// Bottom-up pass over row boundaries. Returns the number of Auxiliary
/// separator nodes inserted.
pub(crate) fn resolve_span_overlaps(g: &mut Graph) -> usize {
    let mut inserted = 0usize;
    let mut row = g.max_row();
    let mut guard = 0u32;
    loop {
        guard += 1;
        if guard > 100_000 {
            break;
        }
        if insert_one_separator(g, row) {
            inserted += 1;
            row += 1;
            if row > g.max_row() {
                row = g.max_row();
            }
            continue;
        }
        if row == 0 {
            break;
        }
        row -= 1;
    }
    debug!(inserted_separators = inserted, "resolve_span_overlaps");
    inserted
}

/// Try to resolve one run of unavoidable overlaps in `row`. Returns whether
/// a separator was inserted (the row shifted down as a result).
fn insert_one_separator(g: &mut Graph, row: u32) -> bool {
    let mut members = g.nodes_in_row(row);
    if members.len() < 2 {
        return false;
    }
    members.sort();
    let pos_of: HashMap<&str, usize> = members.iter().map(|s| s.as_str()).zip(0..).collect();

    let mut parent_ids: HashSet<String> = HashSet::new();
    for m in &members {
        parent_ids.extend(g.parents(m));
    }

    let mut spans: Vec<(usize, usize)> = Vec::new();
    for p in &parent_ids {
        let children = g.children(p);
        if children.len() < 2 {
            continue;
        }
        if !children.iter().all(|c| pos_of.contains_key(c.as_str())) {
            continue;
        }
        if children
            .iter()
            .any(|c| g.node(c).map(Node::kind) == Some(NodeKind::Subdivider))
        {
            continue;
        }
        let positions: Vec<usize> = children.iter().map(|c| pos_of[c.as_str()]).collect();
        spans.push((*positions.iter().min().unwrap(), *positions.iter().max().unwrap()));
    }
    if spans.is_empty() {
        return false;
    }

    let gap_count = members.len() - 1;
    let mut insertable = vec![true; gap_count];
    for gap in 0..gap_count {
        let left = g.node(&members[gap]).unwrap();
        let right = g.node(&members[gap + 1]).unwrap();
        if left.kind() == NodeKind::Subdivider
            && right.kind() == NodeKind::Subdivider
            && left.master_id() == right.master_id()
        {
            insertable[gap] = false;
        }
    }

    let mut overlap = vec![0u32; gap_count];
    for &(lo, hi) in &spans {
        for gap in lo..hi {
            if insertable[gap] {
                overlap[gap] += 1;
            }
        }
    }

    let Some((run_start, run_end)) = first_run(&overlap) else {
        return false;
    };
    let first_child = members[run_start].clone();
    let last_child = members[run_end + 1].clone();
    let run_children: Vec<String> = members[run_start..=run_end + 1].to_vec();

    let mut affected_parents: HashSet<String> = HashSet::new();
    for c in &run_children {
        affected_parents.extend(g.parents(c));
    }

    g.shift_rows_from(row);
    let sep_id = fresh_separator_id(g, row, &first_child, &last_child);
    let sep_key = g.insert_synthetic(sep_id, row, NodeKind::Auxiliary, String::new());

    for parent in &affected_parents {
        let Some(parent_key) = g.key_of_pub(parent) else { continue };
        let targets: Vec<_> = run_children
            .iter()
            .filter(|c| g.children(parent).contains(c))
            .filter_map(|c| g.key_of_pub(c))
            .collect();
        if targets.is_empty() {
            continue;
        }
        g.reroute_edges(parent_key, &targets, sep_key);
    }
    for child in &run_children {
        let Some(child_key) = g.key_of_pub(child) else { continue };
        g.add_edge_keys(sep_key, child_key, crate::meta::Meta::new());
    }

    true
}

/// First maximal contiguous run of indices where `overlap[i] >= 2`.
fn first_run(overlap: &[u32]) -> Option<(usize, usize)> {
    let start = overlap.iter().position(|&c| c >= 2)?;
    let mut end = start;
    while end + 1 < overlap.len() && overlap[end + 1] >= 2 {
        end += 1;
    }
    Some((start, end))
}

fn fresh_separator_id(g: &Graph, row: u32, first: &str, last: &str) -> String {
    let strip = |s: &str| s.replace('_', "");
    let base = format!("Sep_{row}_{}_{}", strip(first), strip(last));
    if !g.contains(&base) {
        return base;
    }
    let mut k = 1u32;
    loop {
        let candidate = format!("{base}__{k}");
        if !g.contains(&candidate) {
            return candidate;
        }
        k += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;

    #[test]
    fn s7_shared_children_get_one_separator() {
        let mut g = Graph::new();
        for id in ["p1", "p2", "c1", "c2"] {
            g.add_node(Node::new(id, 0)).unwrap();
        }
        g.set_rows([
            ("p1".to_string(), 0),
            ("p2".to_string(), 0),
            ("c1".to_string(), 1),
            ("c2".to_string(), 1),
        ]);
        g.add_edge(Edge::new("p1", "c1")).unwrap();
        g.add_edge(Edge::new("p1", "c2")).unwrap();
        g.add_edge(Edge::new("p2", "c1")).unwrap();
        g.add_edge(Edge::new("p2", "c2")).unwrap();

        let inserted = resolve_span_overlaps(&mut g);
        assert_eq!(inserted, 1);
        assert_eq!(g.children("p1").len(), 1);
        assert_eq!(g.children("p2").len(), 1);
        let sep = g.children("p1")[0].clone();
        assert_eq!(sep, g.children("p2")[0]);
        assert_eq!(g.node(&sep).unwrap().kind(), NodeKind::Auxiliary);
        assert_eq!(g.children(&sep).len(), 2);
    }

    #[test]
    fn no_overlap_no_separator() {
        let mut g = Graph::new();
        for id in ["p1", "p2", "c1", "c2"] {
            g.add_node(Node::new(id, 0)).unwrap();
        }
        g.set_rows([
            ("p1".to_string(), 0),
            ("p2".to_string(), 0),
            ("c1".to_string(), 1),
            ("c2".to_string(), 1),
        ]);
        g.add_edge(Edge::new("p1", "c1")).unwrap();
        g.add_edge(Edge::new("p2", "c2")).unwrap();
        assert_eq!(resolve_span_overlaps(&mut g), 0);
    }
}
