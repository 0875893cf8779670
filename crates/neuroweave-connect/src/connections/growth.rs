// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! Activity-driven growth strategy
//!
//! Each vertex carries a connectivity radius. Vertices firing below their
//! target rate grow the radius, overactive vertices shrink it; an edge
//! exists between two vertices exactly while their radius disks overlap,
//! with the desired weight proportional to the overlap area.
//!
//! `update_connections` moves radii and creates/prunes edges (topology
//! only; new edges start at weight zero). `update_edge_weights` then
//! steps every active edge toward its overlap-derived weight through the
//! mirror, so the host and device paths produce identical weights.

use super::base::ConnectionsBase;
use super::{Connections, GraphProperties, PropertyKind};
use crate::error::{ConnectError, Result};
use crate::layout::Layout;
use crate::vertices::Vertices;
use ahash::AHashMap;
use ndarray::Array2;
use neuroweave_graph::{EdgeCollection, EdgeId, EdgeIndexMap, EdgeType};
use neuroweave_runtime::EdgeMirror;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Growth-rule parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrowthParams {
    /// Activity ratio at which outgrowth is zero
    pub epsilon: f32,
    /// Sigmoid steepness of the outgrowth response
    pub beta: f32,
    /// Radius velocity per epoch
    pub rho: f32,
    /// Activity every vertex is pulled toward
    pub target_rate: f32,
    /// Radii never shrink below this
    pub min_radius: f32,
    /// Radius every vertex starts with
    pub start_radius: f32,
    /// Weight of one unit of overlap area
    pub max_weight: f32,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            epsilon: 0.6,
            beta: 0.1,
            rho: 0.1,
            target_rate: 1.0,
            min_radius: 0.1,
            start_radius: 0.4,
            max_weight: 1.0,
        }
    }
}

/// Dynamic connections grown and pruned from vertex activity
#[derive(Debug, Default)]
pub struct GrowthConnections {
    base: ConnectionsBase,
    params: GrowthParams,
    radii: Vec<f32>,
    positions: Vec<(f32, f32)>,
    /// Live edge per ordered vertex pair
    pair_index: AHashMap<(u32, u32), EdgeId>,
}

/// Intersection area of two disks with radii `r1`, `r2` at distance `d`
fn disk_overlap(r1: f32, r2: f32, d: f32) -> f32 {
    use std::f32::consts::PI;
    if d >= r1 + r2 {
        return 0.0;
    }
    if d <= (r1 - r2).abs() {
        let r = r1.min(r2);
        return PI * r * r;
    }
    let d2 = d * d;
    let a1 = r1 * r1 * (((d2 + r1 * r1 - r2 * r2) / (2.0 * d * r1)).clamp(-1.0, 1.0)).acos();
    let a2 = r2 * r2 * (((d2 + r2 * r2 - r1 * r1) / (2.0 * d * r2)).clamp(-1.0, 1.0)).acos();
    let k = (-d + r1 + r2) * (d + r1 - r2) * (d - r1 + r2) * (d + r1 + r2);
    a1 + a2 - 0.5 * k.max(0.0).sqrt()
}

impl GrowthConnections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current connectivity radius of a vertex
    pub fn radius(&self, vertex: u32) -> f32 {
        self.radii[vertex as usize]
    }

    fn overlap(&self, a: u32, b: u32) -> f32 {
        let (ax, ay) = self.positions[a as usize];
        let (bx, by) = self.positions[b as usize];
        let d = ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt();
        disk_overlap(self.radii[a as usize], self.radii[b as usize], d)
    }

    fn rebuild_pair_index(&mut self) -> Result<()> {
        let edges = self.base.edges()?;
        let mut pairs = AHashMap::new();
        for (slot, source, target, _) in edges.iter_active() {
            if let Some(id) = edges.id_at(slot) {
                pairs.insert((source, target), id);
            }
        }
        self.pair_index = pairs;
        Ok(())
    }
}

impl Connections for GrowthConnections {
    fn class_name(&self) -> &'static str {
        "GrowthConnections"
    }

    fn setup(&mut self, layout: &dyn Layout) -> Result<()> {
        self.base.setup_storage(layout)?;
        let n = layout.vertex_count();
        self.radii = vec![self.params.start_radius; n as usize];
        self.positions = (0..n).map(|v| layout.position(v)).collect();

        let edges = self.base.edges_mut()?;
        for seed in layout.initial_edges() {
            let id = edges.create_edge(seed.source, seed.target, seed.weight, seed.edge_type)?;
            self.pair_index.insert((seed.source, seed.target), id);
        }
        Ok(())
    }

    fn load_parameters(&mut self, params: &serde_json::Value) -> Result<()> {
        if params.is_null() {
            return Ok(());
        }
        self.params =
            serde_json::from_value(params.clone()).map_err(|e| ConnectError::Parameters {
                class: "GrowthConnections",
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn print_parameters(&self) {
        tracing::info!(
            epsilon = self.params.epsilon,
            beta = self.params.beta,
            rho = self.params.rho,
            target_rate = self.params.target_rate,
            min_radius = self.params.min_radius,
            start_radius = self.params.start_radius,
            max_weight = self.params.max_weight,
            "GrowthConnections parameters"
        );
    }

    fn register_graph_properties(&self, properties: &mut GraphProperties) {
        properties.register_edge_property("weight", PropertyKind::Float);
        properties.register_edge_property("type", PropertyKind::Integer);
        properties.register_edge_property("active", PropertyKind::Boolean);
    }

    fn update_connections(&mut self, vertices: &mut dyn Vertices) -> Result<bool> {
        let n = self.radii.len() as u32;

        // Radius dynamics: under-active vertices grow, over-active shrink.
        for v in 0..n as usize {
            let ratio = vertices.activity(v as u32) / self.params.target_rate;
            let outgrowth =
                1.0 - 2.0 / (1.0 + ((self.params.epsilon - ratio) / self.params.beta).exp());
            self.radii[v] = (self.radii[v] + self.params.rho * outgrowth).max(self.params.min_radius);
        }

        // Pair scan: create where disks overlap, prune where they no
        // longer do. New edges start at weight zero; the weight pass
        // brings them up to the overlap-derived value.
        let mut changed = false;
        for source in 0..n {
            for target in 0..n {
                if source == target {
                    continue;
                }
                let overlap = self.overlap(source, target);
                let existing = self.pair_index.get(&(source, target)).copied();
                match (overlap > 0.0, existing) {
                    (true, None) => {
                        let id = self.base.edges_mut()?.create_edge(
                            source,
                            target,
                            0.0,
                            EdgeType::Excitatory,
                        )?;
                        self.pair_index.insert((source, target), id);
                        changed = true;
                    }
                    (false, Some(id)) => {
                        self.base.edges_mut()?.remove_edge(id)?;
                        self.pair_index.remove(&(source, target));
                        changed = true;
                    }
                    _ => {}
                }
            }
        }
        if changed {
            tracing::debug!(
                edges = self.base.edges()?.active_edge_count(),
                "growth pass changed topology"
            );
        }
        Ok(changed)
    }

    fn update_edge_weights(&mut self, mirror: &mut dyn EdgeMirror) -> Result<()> {
        // Deltas are indexed by slot, so hash-map iteration order cannot
        // affect the result.
        let mut deltas = vec![0.0f32; self.base.edges()?.capacity()];
        {
            let edges = self.base.edges()?;
            for (&(source, target), id) in &self.pair_index {
                let desired = self.params.max_weight * self.overlap(source, target);
                let slot = id.slot() as usize;
                deltas[slot] = desired - edges.weights()[slot];
            }
        }
        mirror.apply_weight_deltas(self.base.edges_mut()?, &deltas)?;
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
        self.base.restore_from_weights(weights)?;
        // restored edges got fresh ids
        self.rebuild_pair_index()
    }

    fn teardown(&mut self) -> Result<()> {
        self.base.teardown()?;
        self.radii.clear();
        self.positions.clear();
        self.pair_index.clear();
        Ok(())
    }
}
