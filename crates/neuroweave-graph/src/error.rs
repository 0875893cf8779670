// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! Error types for edge storage and indexing

use thiserror::Error;

/// Errors reported by the edge store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Edge creation past the reserved capacity. The store is never
    /// resized implicitly because device mirrors are fixed-size.
    #[error("edge capacity exceeded: all {capacity} reserved slots are in use")]
    CapacityExceeded {
        /// Reserved slot count, fixed at setup
        capacity: usize,
    },

    /// A vertex index outside `[0, vertex_count)`
    #[error("vertex {vertex} out of bounds (vertex count: {vertex_count})")]
    VertexOutOfBounds { vertex: u32, vertex_count: u32 },

    /// An `EdgeId` whose slot has been removed and possibly recycled
    /// since the id was handed out
    #[error("stale edge id: slot {slot} generation {generation} no longer valid")]
    StaleEdge { slot: u32, generation: u32 },
}

/// Result type for edge storage operations
pub type Result<T> = core::result::Result<T, GraphError>;
