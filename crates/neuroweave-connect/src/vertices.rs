// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! Vertex-model strategy family
//!
//! The connectivity core only needs a per-vertex activity signal to drive
//! growth rules; the numeric integration of vertex state lives outside
//! this subsystem. A vertex model exposes that signal and advances it
//! once per epoch.

use crate::error::{ConnectError, Result};
use crate::layout::Layout;
use serde::{Deserialize, Serialize};

/// Vertex-model strategy: per-vertex activity over epochs
pub trait Vertices: Send {
    /// Registered class name
    fn class_name(&self) -> &'static str;

    /// Load member variables from a configuration subtree
    fn load_parameters(&mut self, params: &serde_json::Value) -> Result<()>;

    /// Allocate per-vertex state for the layout's vertex count
    fn setup(&mut self, layout: &dyn Layout) -> Result<()>;

    /// Number of vertices
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Activity level of a vertex for the current epoch
    fn activity(&self, vertex: u32) -> f32;

    /// Inject an externally computed activity level (driver/sensors)
    fn set_activity(&mut self, vertex: u32, value: f32);

    /// Advance the model one epoch
    fn advance_epoch(&mut self);
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct HomeostaticParams {
    /// Activity every vertex relaxes toward
    target_rate: f32,
    /// Per-epoch relaxation factor in (0, 1]
    decay: f32,
}

impl Default for HomeostaticParams {
    fn default() -> Self {
        Self {
            target_rate: 1.0,
            decay: 0.1,
        }
    }
}

/// Vertex model whose activity relaxes toward a homeostatic target rate
#[derive(Debug, Clone, Default)]
pub struct HomeostaticVertices {
    params: HomeostaticParams,
    activities: Vec<f32>,
}

impl HomeostaticVertices {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Vertices for HomeostaticVertices {
    fn class_name(&self) -> &'static str {
        "HomeostaticVertices"
    }

    fn load_parameters(&mut self, params: &serde_json::Value) -> Result<()> {
        if params.is_null() {
            return Ok(());
        }
        self.params =
            serde_json::from_value(params.clone()).map_err(|e| ConnectError::Parameters {
                class: "HomeostaticVertices",
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn setup(&mut self, layout: &dyn Layout) -> Result<()> {
        self.activities = vec![self.params.target_rate; layout.vertex_count() as usize];
        Ok(())
    }

    fn len(&self) -> usize {
        self.activities.len()
    }

    fn activity(&self, vertex: u32) -> f32 {
        self.activities[vertex as usize]
    }

    fn set_activity(&mut self, vertex: u32, value: f32) {
        self.activities[vertex as usize] = value;
    }

    fn advance_epoch(&mut self) {
        let target = self.params.target_rate;
        let decay = self.params.decay;
        for a in &mut self.activities {
            *a += decay * (target - *a);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::GridLayout;

    #[test]
    fn relaxes_toward_target() {
        let layout = GridLayout::with_dimensions(2, 2, 2);
        let mut vertices = HomeostaticVertices::new();
        vertices.setup(&layout).unwrap();
        vertices.set_activity(0, 3.0);

        let before = vertices.activity(0);
        vertices.advance_epoch();
        let after = vertices.activity(0);
        assert!(after < before);
        assert!(after > 1.0);
    }

    #[test]
    fn setup_sizes_from_layout() {
        let layout = GridLayout::with_dimensions(4, 3, 2);
        let mut vertices = HomeostaticVertices::new();
        vertices.setup(&layout).unwrap();
        assert_eq!(vertices.len(), 12);
    }
}
