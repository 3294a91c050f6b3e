//! Randomize — deterministic width jitter for a hand-drawn look.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::Layout;
use crate::graph::Graph;

/// Tunables for [`randomize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomizeOptions {
    pub width_shrink: f64,
    pub min_block_width: f64,
    pub min_gap: f64,
    pub min_overlap: f64,
}

impl Default for RandomizeOptions {
    fn default() -> Self {
        Self {
            width_shrink: 0.85,
            min_block_width: 30.0,
            min_gap: 5.0,
            min_overlap: 10.0,
        }
    }
}

const OVERLAP_FIXUP_PASSES: usize = 10;

/// Apply deterministic jitter: shrink odd-row blocks around their center,
/// then repeatedly widen whichever side of each parent-child edge is
/// narrower until every edge clears `min_overlap`, up to
/// [`OVERLAP_FIXUP_PASSES`] passes.
pub fn randomize(layout: &Layout, g: &Graph, seed: u64, options: RandomizeOptions) -> Layout {
    let mut rng = Pcg32::new(seed, seed ^ 0xdead_beef);
    let mut out = layout.clone();

    for (r, row) in out.orders.iter().enumerate() {
        if r == 0 || r % 2 == 0 {
            continue;
        }
        for id in row {
            if let Some(block) = out.blocks.get_mut(id) {
                let draw: f64 = rng.gen();
                let factor = 1.0 - draw * options.width_shrink;
                let center = block.center_x();
                let new_width = (block.width() * factor).max(options.min_block_width);
                block.left = center - new_width / 2.0;
                block.right = center + new_width / 2.0;
            }
        }
    }

    for _ in 0..OVERLAP_FIXUP_PASSES {
        let mut changed = false;
        for id in g.node_ids() {
            for child in g.children(&id) {
                let (Some(parent), Some(kid)) = (out.blocks.get(&id).copied(), out.blocks.get(&child).copied()) else {
                    continue;
                };
                let overlap = parent.right.min(kid.right) - parent.left.max(kid.left);
                if overlap >= options.min_overlap {
                    continue;
                }
                let deficit = options.min_overlap - overlap;
                if parent.width() <= kid.width() {
                    if let Some(p) = out.blocks.get_mut(&id) {
                        widen_toward(p, kid.center_x(), deficit);
                    }
                } else if let Some(c) = out.blocks.get_mut(&child) {
                    widen_toward(c, parent.center_x(), deficit);
                }
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    out
}

/// Widen `block` by `deficit`, extending toward `other_center` so its
/// position direction relative to the other endpoint is preserved.
fn widen_toward(block: &mut super::Block, other_center: f64, deficit: f64) {
    if other_center >= block.center_x() {
        block.right += deficit;
    } else {
        block.left -= deficit;
    }
}
