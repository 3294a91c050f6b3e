#![warn(missing_docs)]

//! A crossing-minimized, row-layered layout engine: given an arbitrary DAG
//! of dependencies, assign rows, break cycles, subdivide long edges,
//! minimize crossings within each row, and compute pixel geometry.

pub mod crossing;
pub mod error;
pub mod fenwick;
pub mod graph;
pub mod layout;
pub mod meta;
pub mod normalize;
pub mod order;
pub mod perm;
pub mod pqtree;

#[cfg(feature = "petgraph")]
pub mod petgraph_impl;
#[cfg(feature = "serde")]
pub mod serialization;

pub use crossing::{count_crossings, count_crossings_idx, count_layer_crossings, count_pair_crossings, CrossingWorkspace};
pub use error::GraphError;
pub use fenwick::FenwickTree;
pub use graph::{Edge, Graph, Node, NodeKey, NodeKind};
pub use layout::{assemble, merge_subdividers, randomize, Block, Layout, RandomizeOptions, Rect};
pub use meta::Meta;
pub use normalize::{normalize, NormalizeOptions, NormalizeReport};
pub use order::{Barycentric, CancellableOrderer, OptimalOrderer, OptimalProgress, OptimalResult, Orderer, OrdererPreset, RowOrders};
pub use perm::{generate_permutations, generate_permutations_with};
pub use pqtree::PqTree;
