// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! Layout strategy family
//!
//! A layout supplies the initial shape of the network: vertex count, the
//! per-vertex fan-out bound that sizes the edge store, per-vertex
//! coordinates, and an optional seed edge list. Connection strategies
//! consume it once at setup.

use crate::error::{ConnectError, Result};
use neuroweave_graph::EdgeType;
use serde::{Deserialize, Serialize};

/// An edge supplied by the layout for initial topology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedEdge {
    pub source: u32,
    pub target: u32,
    pub weight: f32,
    #[serde(default = "default_edge_type")]
    pub edge_type: EdgeType,
}

fn default_edge_type() -> EdgeType {
    EdgeType::Excitatory
}

/// Layout strategy: initial vertex/edge counts and vertex geometry
pub trait Layout: Send {
    /// Registered class name
    fn class_name(&self) -> &'static str;

    /// Load member variables from a configuration subtree
    fn load_parameters(&mut self, params: &serde_json::Value) -> Result<()>;

    /// Number of vertices in the network
    fn vertex_count(&self) -> u32;

    /// Maximum outgoing edges per vertex; sizes the edge store
    fn max_edges_per_vertex(&self) -> usize;

    /// 2D coordinates of a vertex, used by distance-based growth rules
    fn position(&self, vertex: u32) -> (f32, f32);

    /// Edges to create at setup time
    fn initial_edges(&self) -> Vec<SeedEdge>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GridLayoutParams {
    width: u32,
    height: u32,
    max_edges_per_vertex: usize,
    /// Seed a directed edge to each 4-neighborhood grid neighbor
    nearest_neighbors: bool,
    initial_weight: f32,
    seed_edges: Vec<SeedEdge>,
}

impl Default for GridLayoutParams {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            max_edges_per_vertex: 10,
            nearest_neighbors: false,
            initial_weight: 1.0,
            seed_edges: Vec::new(),
        }
    }
}

/// Vertices on a unit-spaced rectangular grid
#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    params: GridLayoutParams,
}

impl GridLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid of `width x height` vertices with the given fan-out bound
    pub fn with_dimensions(width: u32, height: u32, max_edges_per_vertex: usize) -> Self {
        Self {
            params: GridLayoutParams {
                width,
                height,
                max_edges_per_vertex,
                ..GridLayoutParams::default()
            },
        }
    }

    /// Enable 4-neighborhood seed edges with the given weight
    pub fn with_nearest_neighbors(mut self, initial_weight: f32) -> Self {
        self.params.nearest_neighbors = true;
        self.params.initial_weight = initial_weight;
        self
    }
}

impl Layout for GridLayout {
    fn class_name(&self) -> &'static str {
        "GridLayout"
    }

    fn load_parameters(&mut self, params: &serde_json::Value) -> Result<()> {
        if params.is_null() {
            return Ok(());
        }
        self.params =
            serde_json::from_value(params.clone()).map_err(|e| ConnectError::Parameters {
                class: "GridLayout",
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn vertex_count(&self) -> u32 {
        self.params.width * self.params.height
    }

    fn max_edges_per_vertex(&self) -> usize {
        self.params.max_edges_per_vertex
    }

    fn position(&self, vertex: u32) -> (f32, f32) {
        let x = vertex % self.params.width;
        let y = vertex / self.params.width;
        (x as f32, y as f32)
    }

    fn initial_edges(&self) -> Vec<SeedEdge> {
        let mut edges = self.params.seed_edges.clone();
        if self.params.nearest_neighbors {
            let (w, h) = (self.params.width, self.params.height);
            for y in 0..h {
                for x in 0..w {
                    let v = y * w + x;
                    let mut push = |t: u32| {
                        edges.push(SeedEdge {
                            source: v,
                            target: t,
                            weight: self.params.initial_weight,
                            edge_type: EdgeType::Excitatory,
                        })
                    };
                    if x + 1 < w {
                        push(v + 1);
                    }
                    if x > 0 {
                        push(v - 1);
                    }
                    if y + 1 < h {
                        push(v + w);
                    }
                    if y > 0 {
                        push(v - w);
                    }
                }
            }
        }
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn grid_positions() {
        let layout = GridLayout::with_dimensions(3, 2, 4);
        assert_eq!(layout.vertex_count(), 6);
        assert_eq!(layout.position(0), (0.0, 0.0));
        assert_eq!(layout.position(4), (1.0, 1.0));
    }

    #[test]
    fn nearest_neighbor_seeding() {
        let layout = GridLayout::with_dimensions(2, 2, 4).with_nearest_neighbors(0.5);
        let edges = layout.initial_edges();
        // each vertex of a 2x2 grid has exactly two neighbors
        assert_eq!(edges.len(), 8);
        assert!(edges.iter().all(|e| e.weight == 0.5));
    }

    #[test]
    fn parameters_from_json() {
        let mut layout = GridLayout::new();
        layout
            .load_parameters(&json!({
                "width": 5,
                "height": 4,
                "max_edges_per_vertex": 3
            }))
            .unwrap();
        assert_eq!(layout.vertex_count(), 20);
        assert_eq!(layout.max_edges_per_vertex(), 3);
    }

    #[test]
    fn bad_parameters_are_reported() {
        let mut layout = GridLayout::new();
        let err = layout
            .load_parameters(&json!({"width": "wide"}))
            .unwrap_err();
        assert!(matches!(err, ConnectError::Parameters { .. }));
    }
}
