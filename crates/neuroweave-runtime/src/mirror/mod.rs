// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! Host/device edge mirror contract
//!
//! An [`EdgeMirror`] holds the device-resident copy of an
//! `EdgeCollection`'s weight buffer and applies the backend-specific
//! execution of weight updates. Transfers are synchronous barriers: the
//! call does not return until the device buffer reflects (or has
//! supplied) host state. Transfer failure is fatal to the simulation.
//!
//! The weight-update rule itself is strategy-specific; strategies hand
//! the mirror a per-slot delta array and the mirror applies it. Both the
//! host path and the device path perform the same plain f32 addition per
//! active slot, so results are bitwise identical across backends.

mod host;
#[cfg(feature = "gpu")]
mod wgpu_mirror;

pub use host::HostMirror;
#[cfg(feature = "gpu")]
pub use wgpu_mirror::WgpuMirror;

use crate::error::Result;
use neuroweave_graph::EdgeCollection;

/// Device-mirror contract for an edge collection's numeric state
pub trait EdgeMirror: Send {
    /// Mirror name for logging
    fn name(&self) -> &'static str;

    /// Reserve mirror buffers sized to the collection's fixed capacity.
    /// Must be called before any transfer; re-allocating resizes.
    fn allocate(&mut self, edges: &EdgeCollection) -> Result<()>;

    /// Release mirror buffers
    fn deallocate(&mut self);

    /// Whether `allocate` has been called
    fn is_allocated(&self) -> bool;

    /// Push host weights to the device copy. Blocking barrier.
    fn copy_to_device(&mut self, edges: &EdgeCollection) -> Result<()>;

    /// Pull device weights back into the host collection. Blocking barrier.
    fn copy_from_device(&mut self, edges: &mut EdgeCollection) -> Result<()>;

    /// Apply a per-slot weight delta to every active edge, on this
    /// mirror's execution path. `deltas.len()` must equal the
    /// collection's capacity. Never creates or removes edges. On return
    /// the host collection and the device copy both hold the updated
    /// weights.
    fn apply_weight_deltas(&mut self, edges: &mut EdgeCollection, deltas: &[f32]) -> Result<()>;
}
