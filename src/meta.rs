//! Opaque key-value metadata shared by [`crate::graph::Node`], edges and the
//! graph itself.
//!
//! The core never interprets `meta` — it is a pass-through payload for
//! external collaborators (dependency-data ingestion, rendering styles,
//! popup UIs). Using [`serde_json::Value`] as the value type means those
//! collaborators can stash arbitrary JSON-shaped data without this crate
//! depending on their schemas.

use std::collections::BTreeMap;

/// An opaque, never-null key-value map.
///
/// A freshly created [`Meta`] is always the empty map, never absent — the
/// data model guarantees `meta != null` for every node, edge and graph.
pub type Meta = BTreeMap<String, serde_json::Value>;
