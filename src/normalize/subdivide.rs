//! Step 4: split long edges into per-row chains and extend sinks to the
//! bottom row, so every edge connects consecutive rows and the tower has a
//! flat foundation.

use tracing::debug;

use crate::graph::{Graph, NodeKind};
use crate::meta::Meta;

/// Long-edge subdivision followed by sink extension. Returns the number of
/// Subdivider nodes inserted.
pub(crate) fn subdivide(g: &mut Graph) -> usize {
    let mut inserted = 0usize;
    inserted += subdivide_long_edges(g);
    inserted += extend_sinks(g);
    debug!(inserted_subdividers = inserted, "subdivide");
    inserted
}

fn subdivide_long_edges(g: &mut Graph) -> usize {
    let mut inserted = 0usize;
    let long_edges: Vec<(crate::graph::NodeKey, crate::graph::NodeKey)> = g
        .arena_keys()
        .flat_map(|u| {
            let u_row = g.node_by_key(u).row();
            g.outgoing_keys(u)
                .iter()
                .copied()
                .filter(move |&v| g.node_by_key(v).row() > u_row + 1)
                .map(move |v| (u, v))
                .collect::<Vec<_>>()
        })
        .collect();

    for (u, v) in long_edges {
        let master_id = g.id_of(u).to_string();
        let u_row = g.node_by_key(u).row();
        let v_row = g.node_by_key(v).row();
        let edge_meta = g.edge_meta_keys(u, v).cloned().unwrap_or_default();
        g.remove_edge_keys(u, v);

        let mut prev = u;
        for r in (u_row + 1)..v_row {
            let id = fresh_id(g, &master_id, r);
            let key = g.insert_synthetic(id, r, NodeKind::Subdivider, master_id.clone());
            g.add_edge_keys(prev, key, Meta::new());
            prev = key;
            inserted += 1;
        }
        g.add_edge_keys(prev, v, edge_meta);
    }
    inserted
}

fn extend_sinks(g: &mut Graph) -> usize {
    let max_row = g.max_row();
    let mut inserted = 0usize;
    let sinks: Vec<crate::graph::NodeKey> = g
        .arena_keys()
        .filter(|&k| g.outgoing_keys(k).is_empty() && g.node_by_key(k).row() < max_row)
        .collect();

    for sink in sinks {
        let master_id = g.node_by_key(sink).effective_id().to_string();
        let mut prev = sink;
        let start_row = g.node_by_key(sink).row();
        for r in (start_row + 1)..=max_row {
            let id = fresh_id(g, &master_id, r);
            let key = g.insert_synthetic(id, r, NodeKind::Subdivider, master_id.clone());
            g.add_edge_keys(prev, key, Meta::new());
            prev = key;
            inserted += 1;
        }
    }
    inserted
}

/// `"{master}_sub_{row}"`, with `__{k}` appended on collision.
fn fresh_id(g: &Graph, master: &str, row: u32) -> String {
    let base = format!("{master}_sub_{row}");
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
