//! Row orderers: given a normalized graph, choose a left-to-right ordering
//! within each row that minimizes crossings.

mod barycentric;
mod optimal;

use std::time::{Duration, Instant};

use derive_more::{Deref, DerefMut, From};

use crate::graph::Graph;

pub use barycentric::Barycentric;
pub use optimal::OptimalOrderer;

/// Per-row orderings, indexed by row number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut, From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowOrders(pub Vec<Vec<String>>);

/// Common interface for anything that can order the rows of a graph.
pub trait Orderer {
    fn order_rows(&self, g: &Graph) -> RowOrders;
}

/// Progress reported by [`OptimalOrderer`] during a search, and (optionally)
/// surfaced to a caller-supplied callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimalProgress {
    pub explored: u64,
    pub pruned: u64,
    pub best_crossings: u64,
}

/// The result of a deadline-bounded search: the best ordering found, and
/// whether the search space was exhausted before the deadline (as opposed
/// to being cut off).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimalResult {
    pub orders: RowOrders,
    pub exhausted: bool,
}

/// An orderer that can suspend work at a deadline and report progress.
/// [`Barycentric`] never suspends (a single pass set always completes well
/// under any reasonable deadline); only [`OptimalOrderer`] actually uses the
/// deadline and progress callback.
pub trait CancellableOrderer {
    fn order_rows_with(
        &self,
        g: &Graph,
        deadline: Instant,
        progress: Option<&mut dyn FnMut(OptimalProgress)>,
    ) -> RowOrders;
}

/// Timeout presets for [`OptimalOrderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdererPreset {
    Fast,
    Balanced,
    Optimal,
}

impl OrdererPreset {
    pub fn duration(self) -> Duration {
        match self {
            OrdererPreset::Fast => Duration::from_millis(100),
            OrdererPreset::Balanced => Duration::from_secs(5),
            OrdererPreset::Optimal => Duration::from_secs(60),
        }
    }

    pub fn build(self) -> OptimalOrderer {
        OptimalOrderer::new(self.duration())
    }
}
