//! # Neuroweave - Connectivity Core for Graph-Network Simulation
//!
//! Neuroweave simulates large graph-based networks whose topology and edge
//! weights evolve over discrete epochs, with optional offload of per-edge
//! numeric state to an accelerator. This umbrella crate re-exports the
//! connectivity and indexing subsystem:
//!
//! - **`neuroweave-graph`**: the fixed-capacity edge store
//!   ([`EdgeCollection`]) and the CSR-style adjacency index
//!   ([`EdgeIndexMap`]) derived from it
//! - **`neuroweave-runtime`**: the lifecycle-operation bus, the strategy
//!   registries and the host/device edge mirrors
//! - **`neuroweave-connect`**: the pluggable connection strategies and
//!   the per-epoch plumbing around them
//!
//! ## Quick Start
//!
//! ```rust
//! use neuroweave::prelude::*;
//!
//! let layout = GridLayout::with_dimensions(10, 10, 8).with_nearest_neighbors(1.0);
//! let mut driver = EpochDriver::new(
//!     Box::new(StaticConnections::new()),
//!     Box::new(layout),
//!     Box::new(HomeostaticVertices::new()),
//!     Box::new(MemoryRecorder::new()),
//!     Box::new(HostMirror::new()),
//! )
//! .unwrap();
//!
//! driver.run_epoch().unwrap();
//! driver.teardown().unwrap();
//! ```
//!
//! ## Feature Flags
//!
//! - **`gpu`**: WGPU-resident edge mirror (Metal/Vulkan/DirectX); the
//!   default build mirrors into a host shadow buffer instead

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use neuroweave_connect as connect;
pub use neuroweave_graph as graph;
pub use neuroweave_runtime as runtime;

// Re-export the primary types at the crate root
pub use neuroweave_connect::{
    Connections, ConnectionsBase, ConnectionsLifecycle, ConnectError, EpochDriver, EpochSnapshot,
    GraphProperties, GridLayout, GrowthConnections, GrowthParams, HomeostaticVertices, Layout,
    MemoryRecorder, NullRecorder, Recorder, ResolvedStrategies, SeedEdge, SimulationConfig,
    StaticConnections, StrategyRegistries, Vertices,
};
pub use neuroweave_graph::{EdgeCollection, EdgeId, EdgeIndexMap, EdgeType, GraphError};
#[cfg(feature = "gpu")]
pub use neuroweave_runtime::WgpuMirror;
pub use neuroweave_runtime::{
    EdgeMirror, HostMirror, Operation, OperationBus, OperationSubscriber, Registry, RuntimeError,
};

/// Common imports for simulator code
pub mod prelude {
    pub use crate::{
        ConnectError, Connections, EdgeCollection, EdgeId, EdgeIndexMap, EdgeMirror, EdgeType,
        EpochDriver, GraphError, GridLayout, GrowthConnections, HomeostaticVertices, HostMirror,
        Layout, MemoryRecorder, NullRecorder, Operation, OperationBus, Recorder, RuntimeError,
        SimulationConfig, StaticConnections, StrategyRegistries, Vertices,
    };
}
