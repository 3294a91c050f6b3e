//! The normalization pipeline: turns an arbitrary DAG into a
//! graph where rows are assigned, every edge connects consecutive rows, and
//! no row has an unavoidable K(2,2) crossing left unresolved.

mod cycle;
mod layering;
mod separators;
mod subdivide;
mod transitive_reduction;

use crate::graph::Graph;

/// Which (skippable) normalization steps to omit. `assign_layers` and
/// `subdivide` always run: without rows nothing downstream makes sense, and
/// without subdivision edges would not connect consecutive rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    pub skip_cycle_breaking: bool,
    pub skip_transitive_reduction: bool,
    pub skip_span_overlap_resolution: bool,
}

/// Counts of what each normalization step changed, so callers and tests can
/// assert on them without re-deriving the numbers from the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub removed_back_edges: usize,
    pub removed_redundant_edges: usize,
    pub inserted_subdividers: usize,
    pub inserted_separators: usize,
}

/// Run the pipeline in order: break cycles, transitively reduce, assign
/// layers, subdivide long edges and extend sinks, resolve span overlaps.
pub fn normalize(g: &mut Graph, options: NormalizeOptions) -> NormalizeReport {
    let mut report = NormalizeReport::default();

    if !options.skip_cycle_breaking {
        report.removed_back_edges = cycle::break_cycles(g);
    }
    if !options.skip_transitive_reduction {
        report.removed_redundant_edges = transitive_reduction::transitive_reduction(g);
    }
    layering::assign_layers(g);
    report.inserted_subdividers = subdivide::subdivide(g);
    if !options.skip_span_overlap_resolution {
        report.inserted_separators = separators::resolve_span_overlaps(g);
    }

    report
}
