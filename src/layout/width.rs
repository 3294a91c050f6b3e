//! Width propagation, top-heavy and bottom-up.

use std::collections::BTreeMap;

use crate::graph::Graph;

const EPS: f64 = 1e-9;

/// Each parent's width is divided equally among its children in the row
/// below and accumulated there; rows are rescaled back to `width` whenever
/// drift exceeds `EPS`.
pub fn compute_widths(g: &Graph, width: f64) -> BTreeMap<String, f64> {
    let mut out = BTreeMap::new();
    let row_ids = g.row_ids();
    if row_ids.is_empty() {
        return out;
    }
    let max_row = *row_ids.last().unwrap();

    let top = g.nodes_in_row(0);
    if !top.is_empty() {
        let share = width / top.len() as f64;
        for id in &top {
            out.insert(id.clone(), share);
        }
    }

    for r in 0..max_row {
        let next_row = g.nodes_in_row(r + 1);
        let mut next: BTreeMap<String, f64> = next_row.iter().map(|id| (id.clone(), 0.0)).collect();

        for id in g.nodes_in_row(r) {
            let w = *out.get(&id).unwrap_or(&0.0);
            let children = g.children_in_row(&id, r + 1);
            if children.is_empty() {
                continue;
            }
            let share = w / children.len() as f64;
            for c in children {
                *next.entry(c).or_insert(0.0) += share;
            }
        }

        rescale(&mut next, width);
        out.extend(next);
    }

    out
}

/// Symmetric to [`compute_widths`]: the bottom row shares `width` equally,
/// and each row's width flows upward to parents divided by in-row parent
/// count.
pub fn compute_widths_bottom_up(g: &Graph, width: f64) -> BTreeMap<String, f64> {
    let mut out = BTreeMap::new();
    let row_ids = g.row_ids();
    if row_ids.is_empty() {
        return out;
    }
    let max_row = *row_ids.last().unwrap();

    let bottom = g.nodes_in_row(max_row);
    if !bottom.is_empty() {
        let share = width / bottom.len() as f64;
        for id in &bottom {
            out.insert(id.clone(), share);
        }
    }

    for r in (1..=max_row).rev() {
        let prev_row = g.nodes_in_row(r - 1);
        let mut prev: BTreeMap<String, f64> = prev_row.iter().map(|id| (id.clone(), 0.0)).collect();

        for id in g.nodes_in_row(r) {
            let w = *out.get(&id).unwrap_or(&0.0);
            let parents = g.parents_in_row(&id, r - 1);
            if parents.is_empty() {
                continue;
            }
            let share = w / parents.len() as f64;
            for p in parents {
                *prev.entry(p).or_insert(0.0) += share;
            }
        }

        rescale(&mut prev, width);
        out.extend(prev);
    }

    out
}

fn rescale(row: &mut BTreeMap<String, f64>, width: f64) {
    if row.is_empty() {
        return;
    }
    let sum: f64 = row.values().sum();
    if sum <= 0.0 {
        let share = width / row.len() as f64;
        for v in row.values_mut() {
            *v = share;
        }
        return;
    }
    if (sum - width).abs() > EPS {
        let factor = width / sum;
        for v in row.values_mut() {
            *v *= factor;
        }
    }
}
