//! Iterative barycentric sweeps with best-of retention.

use std::collections::HashMap;
use std::time::Instant;

use super::{CancellableOrderer, OptimalProgress, Orderer, RowOrders};
use crate::crossing::count_crossings;
use crate::graph::Graph;

/// Alternating down/up barycentric sweeps. Never returns an ordering worse
/// than its starting point, because the best ordering seen across all
/// sweeps (including the initial one) is what gets returned.
#[derive(Debug, Clone, Copy)]
pub struct Barycentric {
    passes: usize,
}

impl Default for Barycentric {
    fn default() -> Self {
        Self { passes: 16 }
    }
}

impl Barycentric {
    pub fn with_passes(passes: usize) -> Self {
        Self { passes }
    }
}

impl Orderer for Barycentric {
    fn order_rows(&self, g: &Graph) -> RowOrders {
        let row_ids = g.row_ids();
        if row_ids.is_empty() {
            return RowOrders::default();
        }
        let max_row = *row_ids.last().unwrap();

        let mut rows: Vec<Vec<String>> = (0..=max_row)
            .map(|r| {
                let mut v = g.nodes_in_row(r);
                v.sort();
                v
            })
            .collect();

        let mut best = rows.clone();
        let mut best_crossings = total_crossings(g, &rows);

        for pass in 0..self.passes {
            if pass % 2 == 0 {
                for r in 1..=max_row {
                    sweep_row(g, &mut rows, r, true);
                }
            } else if max_row > 0 {
                for r in (0..max_row).rev() {
                    sweep_row(g, &mut rows, r, false);
                }
            }
            let crossings = total_crossings(g, &rows);
            if crossings < best_crossings {
                best_crossings = crossings;
                best = rows.clone();
            }
        }

        RowOrders(best)
    }
}

impl CancellableOrderer for Barycentric {
    fn order_rows_with(
        &self,
        g: &Graph,
        _deadline: Instant,
        _progress: Option<&mut dyn FnMut(OptimalProgress)>,
    ) -> RowOrders {
        self.order_rows(g)
    }
}

fn sweep_row(g: &Graph, rows: &mut [Vec<String>], r: u32, down: bool) {
    let r = r as usize;
    let adjacent = if down { rows[r - 1].clone() } else { rows[r + 1].clone() };
    let adj_pos: HashMap<&str, usize> = adjacent.iter().map(|s| s.as_str()).zip(0..).collect();
    let current = rows[r].clone();
    let cur_pos: HashMap<&str, usize> = current.iter().map(|s| s.as_str()).zip(0..).collect();

    let mut scored: Vec<(f64, usize, String)> = current
        .iter()
        .map(|id| {
            let neighbors = if down { g.parents(id) } else { g.children(id) };
            let positions: Vec<usize> = neighbors.iter().filter_map(|n| adj_pos.get(n.as_str()).copied()).collect();
            let barycenter = if positions.is_empty() {
                cur_pos[id.as_str()] as f64
            } else {
                positions.iter().sum::<usize>() as f64 / positions.len() as f64
            };
            (barycenter, cur_pos[id.as_str()], id.clone())
        })
        .collect();

    scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap().then(a.1.cmp(&b.1)));
    rows[r] = scored.into_iter().map(|(_, _, id)| id).collect();
}

pub(super) fn total_crossings(g: &Graph, rows: &[Vec<String>]) -> u64 {
    let orders: Vec<(u32, Vec<String>)> = rows.iter().enumerate().map(|(i, r)| (i as u32, r.clone())).collect();
    count_crossings(g, &orders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};

    #[test]
    fn s8_two_by_two_converges_to_zero_crossings() {
        let mut g = Graph::new();
        g.add_node(Node::new("a", 0)).unwrap();
        g.add_node(Node::new("b", 0)).unwrap();
        g.add_node(Node::new("x", 1)).unwrap();
        g.add_node(Node::new("y", 1)).unwrap();
        g.add_edge(Edge::new("a", "y")).unwrap();
        g.add_edge(Edge::new("b", "x")).unwrap();
        g.set_rows([
            ("a".to_string(), 0),
            ("b".to_string(), 0),
            ("x".to_string(), 1),
            ("y".to_string(), 1),
        ]);

        let orders = Barycentric::default().order_rows(&g);
        assert_eq!(total_crossings(&g, &orders), 0);
    }

    #[test]
    fn never_worse_than_initial_ordering() {
        let mut g = Graph::new();
        for id in ["a", "b", "c"] {
            g.add_node(Node::new(id, 0)).unwrap();
        }
        for id in ["x", "y", "z"] {
            g.add_node(Node::new(id, 0)).unwrap();
        }
        g.add_edge(Edge::new("a", "z")).unwrap();
        g.add_edge(Edge::new("b", "y")).unwrap();
        g.add_edge(Edge::new("c", "x")).unwrap();
        g.set_rows([
            ("a".to_string(), 0),
            ("b".to_string(), 0),
            ("c".to_string(), 0),
            ("x".to_string(), 1),
            ("y".to_string(), 1),
            ("z".to_string(), 1),
        ]);

        let initial_rows = vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["x".to_string(), "y".to_string(), "z".to_string()],
        ];
        let initial_crossings = total_crossings(&g, &initial_rows);
        let orders = Barycentric::default().order_rows(&g);
        assert!(total_crossings(&g, &orders) <= initial_crossings);
    }
}
