//! Row-by-row block placement.

use std::collections::BTreeMap;

use super::{Block, Layout};
use crate::order::RowOrders;

/// Place every row's nodes left to right in id order within the row, using
/// the precomputed width of each node; row baselines are spread evenly
/// across `[my, height - my]`.
pub fn assemble(orders: &RowOrders, widths: &BTreeMap<String, f64>, width: f64, height: f64, mx: f64, my: f64, gap: f64) -> Layout {
    let mut blocks = BTreeMap::new();
    let row_count = orders.len();
    let usable_height = (height - 2.0 * my).max(0.0);

    for (r, row) in orders.iter().enumerate() {
        let y = if row_count <= 1 {
            my
        } else {
            my + usable_height * (r as f64) / (row_count - 1) as f64
        };
        // Taller blocks occupy more vertical space than a point baseline
        // would: split the row band in half around y, symmetric top/bottom.
        let band = if row_count == 0 { usable_height } else { usable_height / row_count.max(1) as f64 };
        let bottom = y - band / 2.0;
        let top = y + band / 2.0;

        let total_width: f64 = row.iter().map(|id| widths.get(id).copied().unwrap_or(0.0)).sum();
        let total_gap = gap * row.len().saturating_sub(1) as f64;
        let mut x = mx + ((width - 2.0 * mx) - total_width - total_gap).max(0.0) / 2.0;

        for id in row {
            let w = widths.get(id).copied().unwrap_or(0.0);
            blocks.insert(
                id.clone(),
                Block {
                    left: x,
                    right: x + w,
                    bottom,
                    top,
                },
            );
            x += w + gap;
        }
    }

    Layout {
        frame_width: width,
        frame_height: height,
        margin_x: mx,
        margin_y: my,
        orders: orders.clone(),
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_rows_left_to_right_in_given_order() {
        let orders = RowOrders(vec![vec!["a".into(), "b".into()]]);
        let mut widths = BTreeMap::new();
        widths.insert("a".to_string(), 10.0);
        widths.insert("b".to_string(), 20.0);

        let layout = assemble(&orders, &widths, 200.0, 100.0, 0.0, 0.0, 5.0);
        let a = layout.blocks["a"];
        let b = layout.blocks["b"];
        assert!(a.right <= b.left);
        assert!((b.left - a.right - 5.0).abs() < 1e-9);
        assert!((a.width() - 10.0).abs() < 1e-9);
        assert!((b.width() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn no_rows_yields_no_blocks() {
        let orders = RowOrders::default();
        let layout = assemble(&orders, &BTreeMap::new(), 100.0, 100.0, 0.0, 0.0, 5.0);
        assert!(layout.blocks.is_empty());
    }
}
