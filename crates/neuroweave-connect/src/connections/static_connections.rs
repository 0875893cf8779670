// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! Static connection strategy
//!
//! Topology is established at setup from the layout's seed edges and
//! never changes; weights are left alone as well. The cheapest strategy
//! and the baseline against which dynamic strategies are validated.

use super::base::ConnectionsBase;
use super::{Connections, GraphProperties, PropertyKind};
use crate::error::{ConnectError, Result};
use crate::layout::Layout;
use crate::vertices::Vertices;
use ndarray::Array2;
use neuroweave_graph::{EdgeCollection, EdgeIndexMap};
use neuroweave_runtime::EdgeMirror;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StaticParams {
    /// Scale applied to seed edge weights at setup
    weight_scale: f32,
}

impl Default for StaticParams {
    fn default() -> Self {
        Self { weight_scale: 1.0 }
    }
}

/// Connections fixed at initialization
#[derive(Debug, Default)]
pub struct StaticConnections {
    base: ConnectionsBase,
    params: StaticParams,
}

impl StaticConnections {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Connections for StaticConnections {
    fn class_name(&self) -> &'static str {
        "StaticConnections"
    }

    fn setup(&mut self, layout: &dyn Layout) -> Result<()> {
        self.base.setup_storage(layout)?;
        let scale = self.params.weight_scale;
        let edges = self.base.edges_mut()?;
        for seed in layout.initial_edges() {
            edges.create_edge(seed.source, seed.target, seed.weight * scale, seed.edge_type)?;
        }
        tracing::info!(
            edges = edges.active_edge_count(),
            "static topology established"
        );
        Ok(())
    }

    fn load_parameters(&mut self, params: &serde_json::Value) -> Result<()> {
        if params.is_null() {
            return Ok(());
        }
        self.params =
            serde_json::from_value(params.clone()).map_err(|e| ConnectError::Parameters {
                class: "StaticConnections",
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn print_parameters(&self) {
        tracing::info!(weight_scale = self.params.weight_scale, "StaticConnections parameters");
    }

    fn register_graph_properties(&self, properties: &mut GraphProperties) {
        properties.register_edge_property("weight", PropertyKind::Float);
        properties.register_edge_property("type", PropertyKind::Integer);
        properties.register_edge_property("active", PropertyKind::Boolean);
    }

    fn update_connections(&mut self, _vertices: &mut dyn Vertices) -> Result<bool> {
        // static topology: nothing ever changes
        Ok(false)
    }

    fn update_edge_weights(&mut self, _mirror: &mut dyn EdgeMirror) -> Result<()> {
        tracing::trace!("static connections: no weight update");
        Ok(())
    }

    fn rebuild_edge_index_map(&mut self) -> Result<Arc<EdgeIndexMap>> {
        self.base.rebuild_index_map()
    }

    fn edges(&self) -> Result<&EdgeCollection> {
        self.base.edges()
    }

    fn edges_mut(&mut self) -> Result<&mut EdgeCollection> {
        self.base.edges_mut()
    }

    fn edge_index_map(&self) -> Option<Arc<EdgeIndexMap>> {
        self.base.index_map()
    }

    fn save_weights(&self) -> Result<Array2<f32>> {
        self.base.save_weights()
    }

    fn create_edges_from_weights(&mut self, weights: &Array2<f32>) -> Result<()> {
        self.base.restore_from_weights(weights)
    }

    fn teardown(&mut self) -> Result<()> {
        self.base.teardown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::GridLayout;
    use crate::vertices::HomeostaticVertices;

    #[test]
    fn seeds_topology_from_layout() {
        let layout = GridLayout::with_dimensions(2, 2, 4).with_nearest_neighbors(1.0);
        let mut conn = StaticConnections::new();
        conn.setup(&layout).unwrap();
        assert_eq!(conn.edges().unwrap().active_edge_count(), 8);
    }

    #[test]
    fn update_reports_no_change() {
        let layout = GridLayout::with_dimensions(2, 2, 4).with_nearest_neighbors(1.0);
        let mut conn = StaticConnections::new();
        conn.setup(&layout).unwrap();
        let mut vertices = HomeostaticVertices::new();
        vertices.setup(&layout).unwrap();

        let map_before = conn.rebuild_edge_index_map().unwrap();
        let changed = conn.update_connections(&mut vertices).unwrap();
        assert!(!changed);
        let map_after = conn.rebuild_edge_index_map().unwrap();
        assert_eq!(*map_before, *map_after);
    }

    #[test]
    fn weight_scale_applies_at_setup() {
        let layout = GridLayout::with_dimensions(2, 1, 2).with_nearest_neighbors(2.0);
        let mut conn = StaticConnections::new();
        conn.load_parameters(&serde_json::json!({"weight_scale": 0.5}))
            .unwrap();
        conn.setup(&layout).unwrap();
        let edges = conn.edges().unwrap();
        assert!(edges.iter_active().all(|(_, _, _, w)| w == 1.0));
    }
}
