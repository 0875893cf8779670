// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! Recorder strategy family
//!
//! Recorders receive read-only views of edge state after every epoch.
//! They may hold on to an index-map `Arc`; the map is a possibly-stale
//! snapshot of the epoch it was handed out for and is never mutated
//! through the recorder. The persisted format is outside this core.

use crate::error::{ConnectError, Result};
use neuroweave_graph::{EdgeCollection, EdgeIndexMap};
use std::any::Any;
use std::sync::Arc;

/// Recorder strategy: per-epoch logging of edge state
pub trait Recorder: Send {
    /// Registered class name
    fn class_name(&self) -> &'static str;

    /// Downcast hook for callers that know the concrete recorder
    fn as_any(&self) -> &dyn Any;

    /// Load member variables from a configuration subtree
    fn load_parameters(&mut self, params: &serde_json::Value) -> Result<()>;

    /// Capture one epoch's edge state
    fn record_epoch(&mut self, epoch: u64, edges: &EdgeCollection, map: Arc<EdgeIndexMap>);

    /// Flush at simulation teardown
    fn finish(&mut self);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecorder;

impl NullRecorder {
    pub fn new() -> Self {
        Self
    }
}

impl Recorder for NullRecorder {
    fn class_name(&self) -> &'static str {
        "NullRecorder"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn load_parameters(&mut self, _params: &serde_json::Value) -> Result<()> {
        Ok(())
    }

    fn record_epoch(&mut self, _epoch: u64, _edges: &EdgeCollection, _map: Arc<EdgeIndexMap>) {}

    fn finish(&mut self) {}
}

/// One recorded epoch
#[derive(Debug, Clone)]
pub struct EpochSnapshot {
    pub epoch: u64,
    /// Active `(source, target, weight)` triples at record time
    pub edges: Vec<(u32, u32, f32)>,
    /// The index map current at record time (shared, read-only)
    pub index_map: Arc<EdgeIndexMap>,
}

/// Keeps every epoch snapshot in memory; the test and tooling recorder
#[derive(Debug, Clone, Default)]
pub struct MemoryRecorder {
    snapshots: Vec<EpochSnapshot>,
    max_epochs: Option<usize>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> &[EpochSnapshot] {
        &self.snapshots
    }
}

impl Recorder for MemoryRecorder {
    fn class_name(&self) -> &'static str {
        "MemoryRecorder"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn load_parameters(&mut self, params: &serde_json::Value) -> Result<()> {
        if params.is_null() {
            return Ok(());
        }
        #[derive(serde::Deserialize)]
        #[serde(default, deny_unknown_fields)]
        struct Params {
            max_epochs: Option<usize>,
        }
        impl Default for Params {
            fn default() -> Self {
                Self { max_epochs: None }
            }
        }
        let p: Params =
            serde_json::from_value(params.clone()).map_err(|e| ConnectError::Parameters {
                class: "MemoryRecorder",
                message: e.to_string(),
            })?;
        self.max_epochs = p.max_epochs;
        Ok(())
    }

    fn record_epoch(&mut self, epoch: u64, edges: &EdgeCollection, map: Arc<EdgeIndexMap>) {
        if let Some(limit) = self.max_epochs {
            if self.snapshots.len() >= limit {
                return;
            }
        }
        let triples = edges
            .iter_active()
            .map(|(_, s, t, w)| (s, t, w))
            .collect();
        self.snapshots.push(EpochSnapshot {
            epoch,
            edges: triples,
            index_map: map,
        });
    }

    fn finish(&mut self) {
        tracing::info!(epochs = self.snapshots.len(), "memory recorder finished");
    }
}
