//! Geometry & layout: turns row orderings into pixel blocks.

mod assemble;
mod merge;
mod randomize;
mod width;

use std::collections::BTreeMap;

pub use merge::merge_subdividers;
pub use randomize::{randomize, RandomizeOptions};
pub use width::{compute_widths, compute_widths_bottom_up};

use crate::order::RowOrders;

/// One node's placed rectangle, in pixel units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Block {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn center_x(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    pub fn center_y(&self) -> f64 {
        (self.bottom + self.top) / 2.0
    }
}

/// A bounding rectangle, used by [`Layout::bounding_box`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

/// The full geometric layout of a normalized graph: frame dimensions, row
/// orderings and a pixel rectangle per node.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    pub frame_width: f64,
    pub frame_height: f64,
    pub margin_x: f64,
    pub margin_y: f64,
    pub orders: RowOrders,
    pub blocks: BTreeMap<String, Block>,
}

impl Layout {
    /// The union of every block's rectangle.
    pub fn bounding_box(&self) -> Option<Rect> {
        self.blocks.values().fold(None, |acc, b| match acc {
            None => Some(Rect {
                left: b.left,
                right: b.right,
                bottom: b.bottom,
                top: b.top,
            }),
            Some(r) => Some(Rect {
                left: r.left.min(b.left),
                right: r.right.max(b.right),
                bottom: r.bottom.min(b.bottom),
                top: r.top.max(b.top),
            }),
        })
    }

    /// By-id block lookup.
    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.get(id)
    }

    /// By-row ordering lookup.
    pub fn row_order(&self, row: usize) -> Option<&[String]> {
        self.orders.get(row).map(Vec::as_slice)
    }
}

/// Row-by-row block placement from per-node widths and a row ordering.
///
/// `widths` maps node id to its computed horizontal width (see
/// [`compute_widths`]/[`compute_widths_bottom_up`]). Row baselines are
/// spread evenly across `(my, height - my)`; `gap` separates adjacent
/// blocks within a row.
pub fn assemble(orders: &RowOrders, widths: &BTreeMap<String, f64>, width: f64, height: f64, mx: f64, my: f64, gap: f64) -> Layout {
    assemble::assemble(orders, widths, width, height, mx, my, gap)
}
