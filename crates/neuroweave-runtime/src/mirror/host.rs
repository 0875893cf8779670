// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! Host shadow mirror
//!
//! Always-available mirror whose "device" is a host-side shadow buffer.
//! Exercises the full transfer contract so the epoch flow is identical
//! with and without an accelerator, and serves as the reference for the
//! numeric contract the GPU path must match.

use super::EdgeMirror;
use crate::error::{Result, RuntimeError};
use neuroweave_graph::EdgeCollection;
use rayon::prelude::*;

/// CPU mirror with a shadow copy of the weight buffer
#[derive(Debug, Default)]
pub struct HostMirror {
    shadow_weights: Vec<f32>,
    allocated: bool,
}

impl HostMirror {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_sizes(&self, edges: &EdgeCollection) -> Result<()> {
        if !self.allocated {
            return Err(RuntimeError::MirrorNotAllocated(self.name()));
        }
        if self.shadow_weights.len() != edges.capacity() {
            return Err(RuntimeError::MirrorSizeMismatch {
                expected: edges.capacity(),
                got: self.shadow_weights.len(),
            });
        }
        Ok(())
    }
}

impl EdgeMirror for HostMirror {
    fn name(&self) -> &'static str {
        "HostMirror"
    }

    fn allocate(&mut self, edges: &EdgeCollection) -> Result<()> {
        self.shadow_weights = vec![0.0; edges.capacity()];
        self.allocated = true;
        tracing::debug!(capacity = edges.capacity(), "host mirror allocated");
        Ok(())
    }

    fn deallocate(&mut self) {
        self.shadow_weights = Vec::new();
        self.allocated = false;
        tracing::debug!("host mirror deallocated");
    }

    fn is_allocated(&self) -> bool {
        self.allocated
    }

    fn copy_to_device(&mut self, edges: &EdgeCollection) -> Result<()> {
        self.check_sizes(edges)?;
        self.shadow_weights.copy_from_slice(edges.weights());
        Ok(())
    }

    fn copy_from_device(&mut self, edges: &mut EdgeCollection) -> Result<()> {
        self.check_sizes(edges)?;
        edges.weights_mut().copy_from_slice(&self.shadow_weights);
        Ok(())
    }

    fn apply_weight_deltas(&mut self, edges: &mut EdgeCollection, deltas: &[f32]) -> Result<()> {
        self.check_sizes(edges)?;
        if deltas.len() != edges.capacity() {
            return Err(RuntimeError::MirrorSizeMismatch {
                expected: edges.capacity(),
                got: deltas.len(),
            });
        }

        // Active mask is cloned out so the weight buffer can be borrowed
        // mutably; the mask is small relative to the update itself.
        let active: Vec<bool> = edges.active_mask().to_vec();
        edges
            .weights_mut()
            .par_iter_mut()
            .zip(deltas.par_iter())
            .zip(active.par_iter())
            .for_each(|((w, d), is_active)| {
                if *is_active {
                    *w += d;
                }
            });
        // The update executes on the device copy too: the shadow must
        // hold the post-update weights, exactly as the GPU path leaves
        // its device buffer.
        self.shadow_weights.copy_from_slice(edges.weights());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuroweave_graph::EdgeType;

    #[test]
    fn transfer_requires_allocation() {
        let mut mirror = HostMirror::new();
        let edges = EdgeCollection::new(2, 2);
        let err = mirror.copy_to_device(&edges).unwrap_err();
        assert!(matches!(err, RuntimeError::MirrorNotAllocated(_)));
    }

    #[test]
    fn round_trip_preserves_weights() {
        let mut edges = EdgeCollection::new(2, 2);
        let id = edges.create_edge(0, 1, 0.25, EdgeType::Excitatory).unwrap();

        let mut mirror = HostMirror::new();
        mirror.allocate(&edges).unwrap();
        mirror.copy_to_device(&edges).unwrap();

        edges.set_weight(id, 9.0).unwrap();
        mirror.copy_from_device(&mut edges).unwrap();
        assert_eq!(edges.weight(id).unwrap(), 0.25);
    }

    #[test]
    fn deltas_touch_only_active_slots() {
        let mut edges = EdgeCollection::new(2, 4);
        let keep = edges.create_edge(0, 1, 1.0, EdgeType::Excitatory).unwrap();
        let gone = edges.create_edge(1, 0, 1.0, EdgeType::Excitatory).unwrap();
        edges.remove_edge(gone).unwrap();

        let mut mirror = HostMirror::new();
        mirror.allocate(&edges).unwrap();
        let deltas = vec![0.5; edges.capacity()];
        mirror.apply_weight_deltas(&mut edges, &deltas).unwrap();

        assert_eq!(edges.weight(keep).unwrap(), 1.5);
        // the removed slot's stored value is untouched
        assert_eq!(edges.weights()[gone.slot() as usize], 1.0);
    }

    #[test]
    fn applied_deltas_survive_a_device_pull() {
        let mut edges = EdgeCollection::new(2, 2);
        let id = edges.create_edge(0, 1, 1.0, EdgeType::Excitatory).unwrap();

        let mut mirror = HostMirror::new();
        mirror.allocate(&edges).unwrap();
        mirror.copy_to_device(&edges).unwrap();

        let deltas = vec![0.5; edges.capacity()];
        mirror.apply_weight_deltas(&mut edges, &deltas).unwrap();
        assert_eq!(edges.weight(id).unwrap(), 1.5);

        // the device copy was updated too; pulling it back must not
        // revert the weight pass
        mirror.copy_from_device(&mut edges).unwrap();
        assert_eq!(edges.weight(id).unwrap(), 1.5);
    }

    #[test]
    fn delta_length_is_validated() {
        let mut edges = EdgeCollection::new(2, 2);
        let mut mirror = HostMirror::new();
        mirror.allocate(&edges).unwrap();
        let err = mirror.apply_weight_deltas(&mut edges, &[0.0]).unwrap_err();
        assert!(matches!(err, RuntimeError::MirrorSizeMismatch { .. }));
    }
}
