// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! Connection strategy family
//!
//! A connection strategy defines the network's topology at setup and the
//! way connections change as epochs elapse. Static strategies establish
//! edges once and never touch them again; dynamic strategies create,
//! remove and reweigh edges as the network evolves.
//!
//! Every strategy exclusively owns one `EdgeCollection` and shares its
//! current `EdgeIndexMap` with any recorder holding a reference. Weight
//! updates execute through an [`EdgeMirror`](neuroweave_runtime::EdgeMirror)
//! so the host and accelerator paths stay interchangeable.

mod base;
mod growth;
mod static_connections;

pub use base::ConnectionsBase;
pub use growth::{GrowthConnections, GrowthParams};
pub use static_connections::StaticConnections;

use crate::error::Result;
use crate::layout::Layout;
use crate::vertices::Vertices;
use ndarray::Array2;
use neuroweave_graph::{EdgeCollection, EdgeIndexMap};
use neuroweave_runtime::EdgeMirror;
use std::sync::Arc;

/// Value kind of a registered graph property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Float,
    Integer,
    Boolean,
}

/// Edge properties a strategy exposes to external graph tooling
#[derive(Debug, Clone, Default)]
pub struct GraphProperties {
    edge_properties: Vec<(String, PropertyKind)>,
}

impl GraphProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_edge_property(&mut self, name: &str, kind: PropertyKind) {
        self.edge_properties.push((name.to_string(), kind));
    }

    pub fn edge_properties(&self) -> &[(String, PropertyKind)] {
        &self.edge_properties
    }
}

/// Lifecycle contract every connection strategy implements.
///
/// Per-epoch flow driven from outside: `update_connections` (topology may
/// change) → `rebuild_edge_index_map` if it did → `update_edge_weights`
/// (weight-only, backend-specific execution).
pub trait Connections: Send {
    /// Registered class name
    fn class_name(&self) -> &'static str;

    /// Allocate and initialize edge storage from the layout.
    ///
    /// Calling `setup` twice without an intervening teardown is a fatal
    /// usage error.
    fn setup(&mut self, layout: &dyn Layout) -> Result<()>;

    /// Load member variables from a configuration subtree
    fn load_parameters(&mut self, params: &serde_json::Value) -> Result<()>;

    /// Log all parameters
    fn print_parameters(&self);

    /// Expose edge properties to external graph tooling
    fn register_graph_properties(&self, properties: &mut GraphProperties);

    /// Apply the strategy's growth/pruning policy for one epoch.
    ///
    /// Returns whether topology actually changed, letting the driver skip
    /// an index rebuild when nothing did. A rebuild on an unchanged
    /// topology is a no-op in effect either way.
    fn update_connections(&mut self, vertices: &mut dyn Vertices) -> Result<bool>;

    /// Apply the strategy's weight-update rule to active edges through
    /// the given mirror. Never creates or removes edges; the numeric
    /// result is identical whichever mirror executes it.
    fn update_edge_weights(&mut self, mirror: &mut dyn EdgeMirror) -> Result<()>;

    /// Rebuild the adjacency index and replace the held map. Holders of
    /// the previous `Arc` keep a valid (stale) snapshot.
    fn rebuild_edge_index_map(&mut self) -> Result<Arc<EdgeIndexMap>>;

    /// Edge store view
    fn edges(&self) -> Result<&EdgeCollection>;

    /// Mutable edge store access
    fn edges_mut(&mut self) -> Result<&mut EdgeCollection>;

    /// The currently held index map, if one has been built
    fn edge_index_map(&self) -> Option<Arc<EdgeIndexMap>>;

    /// Dense weight matrix of the active topology (`[source, target]`,
    /// zero where no edge exists)
    fn save_weights(&self) -> Result<Array2<f32>>;

    /// Reconstruct edges from a previously saved weight matrix.
    ///
    /// The matrix shape is validated against the current vertex count and
    /// the nonzero count against capacity before any mutation; a mismatch
    /// leaves the collection completely unchanged.
    fn create_edges_from_weights(&mut self, weights: &Array2<f32>) -> Result<()>;

    /// Release edge storage and the held index map. A later `setup`
    /// starts the lifecycle over with fresh storage.
    fn teardown(&mut self) -> Result<()>;
}
