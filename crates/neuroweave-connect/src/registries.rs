// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! Strategy registries and configuration resolution
//!
//! One registry per pluggable family, bundled in a single explicit
//! object constructed at startup and passed by reference. Configuration
//! supplies one class name per family; resolution instantiates the four
//! strategies and feeds each its parameter subtree. An unregistered name
//! is a fatal configuration error.

use crate::connections::{Connections, GrowthConnections, StaticConnections};
use crate::error::Result;
use crate::layout::{GridLayout, Layout};
use crate::recorder::{MemoryRecorder, NullRecorder, Recorder};
use crate::vertices::{HomeostaticVertices, Vertices};
use neuroweave_runtime::Registry;
use serde::{Deserialize, Serialize};

/// The four strategy-family registries
#[derive(Default)]
pub struct StrategyRegistries {
    pub connections: Registry<dyn Connections>,
    pub layouts: Registry<dyn Layout>,
    pub vertices: Registry<dyn Vertices>,
    pub recorders: Registry<dyn Recorder>,
}

impl StrategyRegistries {
    /// Empty registries, for tests that register their own classes
    pub fn new() -> Self {
        Self::default()
    }

    /// Registries pre-populated with the built-in strategy classes
    pub fn with_builtins() -> Self {
        let mut registries = Self::new();
        registries
            .connections
            .register("StaticConnections", || Box::new(StaticConnections::new()));
        registries
            .connections
            .register("GrowthConnections", || Box::new(GrowthConnections::new()));
        registries
            .layouts
            .register("GridLayout", || Box::new(GridLayout::new()));
        registries
            .vertices
            .register("HomeostaticVertices", || Box::new(HomeostaticVertices::new()));
        registries
            .recorders
            .register("NullRecorder", || Box::new(NullRecorder::new()));
        registries
            .recorders
            .register("MemoryRecorder", || Box::new(MemoryRecorder::new()));
        registries
    }
}

/// Top-level configuration surface: one class name per strategy family
/// plus per-strategy parameter subtrees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub connections_class: String,
    pub layout_class: String,
    pub vertices_class: String,
    pub recorder_class: String,

    #[serde(default)]
    pub connections_params: serde_json::Value,
    #[serde(default)]
    pub layout_params: serde_json::Value,
    #[serde(default)]
    pub vertices_params: serde_json::Value,
    #[serde(default)]
    pub recorder_params: serde_json::Value,
}

/// The four instantiated strategies, parameters loaded
pub struct ResolvedStrategies {
    pub connections: Box<dyn Connections>,
    pub layout: Box<dyn Layout>,
    pub vertices: Box<dyn Vertices>,
    pub recorder: Box<dyn Recorder>,
}

impl SimulationConfig {
    /// Instantiate every configured class and load its parameters.
    ///
    /// Fails on the first unknown class name; nothing is partially
    /// constructed for the caller.
    pub fn resolve(&self, registries: &StrategyRegistries) -> Result<ResolvedStrategies> {
        let mut connections = registries.connections.create(&self.connections_class)?;
        let mut layout = registries.layouts.create(&self.layout_class)?;
        let mut vertices = registries.vertices.create(&self.vertices_class)?;
        let mut recorder = registries.recorders.create(&self.recorder_class)?;

        connections.load_parameters(&self.connections_params)?;
        layout.load_parameters(&self.layout_params)?;
        vertices.load_parameters(&self.vertices_params)?;
        recorder.load_parameters(&self.recorder_params)?;

        tracing::info!(
            connections = %self.connections_class,
            layout = %self.layout_class,
            vertices = %self.vertices_class,
            recorder = %self.recorder_class,
            "strategies resolved"
        );

        Ok(ResolvedStrategies {
            connections,
            layout,
            vertices,
            recorder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuroweave_runtime::RuntimeError;
    use serde_json::json;

    fn config(connections_class: &str) -> SimulationConfig {
        serde_json::from_value(json!({
            "connections_class": connections_class,
            "layout_class": "GridLayout",
            "vertices_class": "HomeostaticVertices",
            "recorder_class": "NullRecorder"
        }))
        .unwrap()
    }

    #[test]
    fn builtins_resolve() {
        let registries = StrategyRegistries::with_builtins();
        let resolved = config("GrowthConnections").resolve(&registries).unwrap();
        assert_eq!(resolved.connections.class_name(), "GrowthConnections");
        assert_eq!(resolved.layout.class_name(), "GridLayout");
    }

    #[test]
    fn unknown_class_is_fatal() {
        let registries = StrategyRegistries::with_builtins();
        let err = config("FancyConnections").resolve(&registries).err().unwrap();
        match err {
            crate::error::ConnectError::Runtime(RuntimeError::UnknownClass(name)) => {
                assert_eq!(name, "FancyConnections");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parameter_subtrees_reach_strategies() {
        let registries = StrategyRegistries::with_builtins();
        let config: SimulationConfig = serde_json::from_value(json!({
            "connections_class": "StaticConnections",
            "layout_class": "GridLayout",
            "vertices_class": "HomeostaticVertices",
            "recorder_class": "NullRecorder",
            "layout_params": {"width": 7, "height": 2, "max_edges_per_vertex": 4}
        }))
        .unwrap();
        let resolved = config.resolve(&registries).unwrap();
        assert_eq!(resolved.layout.vertex_count(), 14);
    }
}
