//! MergeSubdividers — collapse a master node's subdivider chain back
//! into one continuous column.

use std::collections::BTreeMap;

use super::{Block, Layout};
use crate::graph::{Graph, NodeKind};
use crate::order::RowOrders;

/// Group nodes by `effectiveID`, further split by integer-rounded
/// `(left, right)`, and merge each partition into a single block spanning
/// the union of its members' `[bottom, top]`. The returned [`RowOrders`]
/// drops every Subdivider id.
pub fn merge_subdividers(g: &Graph, layout: &Layout) -> Layout {
    let mut groups: BTreeMap<(String, i64, i64), (String, bool, Block)> = BTreeMap::new();

    for (id, block) in &layout.blocks {
        let Some(node) = g.node(id) else { continue };
        let effective = node.effective_id().to_string();
        let key = (effective.clone(), block.left.round() as i64, block.right.round() as i64);
        let is_master = node.kind() != NodeKind::Subdivider && node.kind() != NodeKind::Auxiliary;

        let entry = groups.entry(key).or_insert_with(|| (effective.clone(), false, *block));
        entry.2.bottom = entry.2.bottom.min(block.bottom);
        entry.2.top = entry.2.top.max(block.top);
        if is_master {
            entry.0 = id.clone();
            entry.1 = true;
        }
    }

    let mut blocks = BTreeMap::new();
    for ((effective, left, _right), (keyed_by_master, has_master, block)) in groups {
        let key = if has_master {
            keyed_by_master
        } else {
            format!("{effective}@{left}")
        };
        blocks.insert(key, block);
    }

    let orders = RowOrders(
        layout
            .orders
            .iter()
            .map(|row| {
                row.iter()
                    .filter(|id| g.node(id).map(|n| n.kind() != NodeKind::Subdivider).unwrap_or(true))
                    .cloned()
                    .collect()
            })
            .collect(),
    );

    Layout {
        frame_width: layout.frame_width,
        frame_height: layout.frame_height,
        margin_x: layout.margin_x,
        margin_y: layout.margin_y,
        orders,
        blocks,
    }
}
