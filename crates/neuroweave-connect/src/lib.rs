// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! # Neuroweave Connect
//!
//! Connection strategies for epoch-driven graph networks. A
//! [`Connections`] strategy exclusively owns the network's
//! `EdgeCollection`, coordinates index-map rebuilds, and stays agnostic
//! to the accelerator by reacting to lifecycle-operation broadcasts.
//!
//! The four pluggable strategy families (connections, layout, vertices,
//! recorder) are resolved by name through [`StrategyRegistries`] so the
//! rest of the simulator never names a concrete type.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod connections;
pub mod epoch;
pub mod error;
pub mod layout;
pub mod recorder;
pub mod registries;
pub mod vertices;

pub use connections::{
    Connections, ConnectionsBase, GraphProperties, GrowthConnections, GrowthParams,
    PropertyKind, StaticConnections,
};
pub use epoch::{ConnectionsLifecycle, EpochDriver};
pub use error::{ConnectError, Result};
pub use layout::{GridLayout, Layout, SeedEdge};
pub use recorder::{EpochSnapshot, MemoryRecorder, NullRecorder, Recorder};
pub use registries::{ResolvedStrategies, SimulationConfig, StrategyRegistries};
pub use vertices::{HomeostaticVertices, Vertices};
