// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! Shared state and plumbing embedded by every connection strategy
//!
//! Strategies compose [`ConnectionsBase`] and delegate the storage,
//! index-map and save/restore mechanics to it, keeping the concrete
//! files to their actual policy.

use crate::error::{ConnectError, Result};
use crate::layout::Layout;
use ndarray::Array2;
use neuroweave_graph::{EdgeCollection, EdgeIndexMap, EdgeType};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleState {
    Uninitialized,
    Ready,
    TornDown,
}

/// Edge storage, index map and lifecycle state common to all strategies
#[derive(Debug)]
pub struct ConnectionsBase {
    state: LifecycleState,
    edges: Option<EdgeCollection>,
    index_map: Option<Arc<EdgeIndexMap>>,
}

impl Default for ConnectionsBase {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionsBase {
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            edges: None,
            index_map: None,
        }
    }

    /// Reserve edge storage sized from the layout. Fails if called again
    /// without an intervening [`teardown`](Self::teardown).
    pub fn setup_storage(&mut self, layout: &dyn Layout) -> Result<()> {
        if self.state == LifecycleState::Ready {
            return Err(ConnectError::AlreadyInitialized);
        }
        let edges = EdgeCollection::new(layout.vertex_count(), layout.max_edges_per_vertex());
        tracing::info!(
            vertices = layout.vertex_count(),
            capacity = edges.capacity(),
            layout = layout.class_name(),
            "connections storage reserved"
        );
        self.edges = Some(edges);
        self.index_map = None;
        self.state = LifecycleState::Ready;
        Ok(())
    }

    pub fn edges(&self) -> Result<&EdgeCollection> {
        self.edges.as_ref().ok_or(ConnectError::NotInitialized)
    }

    pub fn edges_mut(&mut self) -> Result<&mut EdgeCollection> {
        self.edges.as_mut().ok_or(ConnectError::NotInitialized)
    }

    /// Total rebuild of the adjacency index. The previous `Arc` stays
    /// valid for any holder; this instance just stops handing it out.
    pub fn rebuild_index_map(&mut self) -> Result<Arc<EdgeIndexMap>> {
        let map = Arc::new(EdgeIndexMap::build(self.edges()?));
        self.index_map = Some(map.clone());
        Ok(map)
    }

    pub fn index_map(&self) -> Option<Arc<EdgeIndexMap>> {
        self.index_map.clone()
    }

    /// Dense `[source, target]` weight matrix of the active topology
    pub fn save_weights(&self) -> Result<Array2<f32>> {
        let edges = self.edges()?;
        let n = edges.vertex_count() as usize;
        let mut matrix = Array2::zeros((n, n));
        for (_, source, target, weight) in edges.iter_active() {
            matrix[[source as usize, target as usize]] = weight;
        }
        Ok(matrix)
    }

    /// All-or-nothing restore from a saved weight matrix.
    ///
    /// Shape and capacity are validated before the collection is touched.
    /// Edge type is recovered from the weight sign (negative weights are
    /// inhibitory, matching `save_weights` round-trips).
    pub fn restore_from_weights(&mut self, weights: &Array2<f32>) -> Result<()> {
        let edges = self.edges()?;
        let n = edges.vertex_count() as usize;
        if weights.nrows() != n || weights.ncols() != n {
            return Err(ConnectError::ShapeMismatch {
                expected_rows: n,
                expected_cols: n,
                rows: weights.nrows(),
                cols: weights.ncols(),
            });
        }
        let required = weights.iter().filter(|&&w| w != 0.0).count();
        if required > edges.capacity() {
            return Err(ConnectError::RestoreOverCapacity {
                required,
                capacity: edges.capacity(),
            });
        }

        let edges = self.edges_mut()?;
        edges.clear();
        for ((source, target), &weight) in weights.indexed_iter() {
            if weight == 0.0 {
                continue;
            }
            let edge_type = if weight < 0.0 {
                EdgeType::Inhibitory
            } else {
                EdgeType::Excitatory
            };
            edges.create_edge(source as u32, target as u32, weight, edge_type)?;
        }
        tracing::info!(edges = required, "edges restored from weight matrix");
        // map of the pre-restore topology is stale now
        self.index_map = None;
        Ok(())
    }

    /// Drop edge storage; [`setup_storage`](Self::setup_storage) may run
    /// again afterwards
    pub fn teardown(&mut self) -> Result<()> {
        if self.state != LifecycleState::Ready {
            return Err(ConnectError::NotInitialized);
        }
        self.edges = None;
        self.index_map = None;
        self.state = LifecycleState::TornDown;
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.state == LifecycleState::Ready
    }
}
