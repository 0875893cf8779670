// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! Epoch plumbing
//!
//! [`ConnectionsLifecycle`] bridges a connection strategy and an edge
//! mirror onto the lifecycle-operation bus: the strategy never calls
//! device APIs, it reacts to broadcasts. [`EpochDriver`] encodes the
//! per-epoch control flow over the connectivity core; the surrounding
//! simulation loop, numeric integration and persistence stay external.
//!
//! Single-threaded driver model: one logical thread advances epochs, and
//! mirror transfers are blocking barriers inside the broadcast.

use crate::connections::Connections;
use crate::error::Result;
use crate::layout::Layout;
use crate::recorder::Recorder;
use crate::vertices::Vertices;
use neuroweave_runtime::{
    EdgeMirror, Operation, OperationBus, OperationSubscriber, RuntimeError,
};
use parking_lot::Mutex;
use std::sync::Arc;

type SharedConnections = Arc<Mutex<Box<dyn Connections>>>;
type SharedMirror = Arc<Mutex<Box<dyn EdgeMirror>>>;

/// Bus subscriber mirroring a strategy's edge buffers to a device
pub struct ConnectionsLifecycle {
    connections: SharedConnections,
    mirror: SharedMirror,
}

impl ConnectionsLifecycle {
    pub fn new(connections: SharedConnections, mirror: SharedMirror) -> Self {
        Self {
            connections,
            mirror,
        }
    }

    /// Subscribe one adapter to the four operations the connectivity
    /// core reacts to.
    pub fn subscribe(bus: &mut OperationBus, connections: SharedConnections, mirror: SharedMirror) {
        let adapter = Arc::new(Mutex::new(Self::new(connections, mirror)));
        for op in [
            Operation::AllocateMemory,
            Operation::DeallocateMemory,
            Operation::CopyToDevice,
            Operation::CopyFromDevice,
        ] {
            bus.subscribe(op, adapter.clone());
        }
    }
}

impl OperationSubscriber for ConnectionsLifecycle {
    fn name(&self) -> &str {
        "ConnectionsLifecycle"
    }

    fn handle_operation(&mut self, operation: Operation) -> neuroweave_runtime::Result<()> {
        let mut connections = self.connections.lock();
        let mut mirror = self.mirror.lock();
        match operation {
            Operation::AllocateMemory => {
                let edges = connections
                    .edges()
                    .map_err(|e| RuntimeError::MirrorTransfer(e.to_string()))?;
                mirror.allocate(edges)
            }
            Operation::DeallocateMemory => {
                mirror.deallocate();
                Ok(())
            }
            Operation::CopyToDevice => {
                let edges = connections
                    .edges()
                    .map_err(|e| RuntimeError::MirrorTransfer(e.to_string()))?;
                mirror.copy_to_device(edges)
            }
            Operation::CopyFromDevice => {
                let edges = connections
                    .edges_mut()
                    .map_err(|e| RuntimeError::MirrorTransfer(e.to_string()))?;
                mirror.copy_from_device(edges)
            }
            Operation::RestoreToDefault => Ok(()),
        }
    }
}

/// Drives the connectivity core through the documented per-epoch flow:
/// pull device changes, grow/prune, rebuild the index only when topology
/// changed, apply weight updates, push to device, hand the recorder its
/// read-only snapshot.
pub struct EpochDriver {
    bus: OperationBus,
    connections: SharedConnections,
    mirror: SharedMirror,
    vertices: Box<dyn Vertices>,
    recorder: Box<dyn Recorder>,
    epoch: u64,
}

impl EpochDriver {
    /// Set up strategies and storage and run the initial allocate/push
    /// broadcasts.
    pub fn new(
        mut connections: Box<dyn Connections>,
        layout: Box<dyn Layout>,
        mut vertices: Box<dyn Vertices>,
        recorder: Box<dyn Recorder>,
        mirror: Box<dyn EdgeMirror>,
    ) -> Result<Self> {
        connections.setup(layout.as_ref())?;
        vertices.setup(layout.as_ref())?;
        connections.rebuild_edge_index_map()?;

        let connections: SharedConnections = Arc::new(Mutex::new(connections));
        let mirror: SharedMirror = Arc::new(Mutex::new(mirror));

        let mut bus = OperationBus::new();
        ConnectionsLifecycle::subscribe(&mut bus, connections.clone(), mirror.clone());
        bus.broadcast(Operation::AllocateMemory)?;
        bus.broadcast(Operation::CopyToDevice)?;

        Ok(Self {
            bus,
            connections,
            mirror,
            vertices,
            recorder,
            epoch: 0,
        })
    }

    /// Advance the connectivity core one epoch.
    pub fn run_epoch(&mut self) -> Result<()> {
        self.bus.broadcast(Operation::CopyFromDevice)?;

        let changed = {
            let mut connections = self.connections.lock();
            connections.update_connections(self.vertices.as_mut())?
        };
        if changed {
            self.connections.lock().rebuild_edge_index_map()?;
        }

        {
            let mut connections = self.connections.lock();
            let mut mirror = self.mirror.lock();
            connections.update_edge_weights(mirror.as_mut())?;
        }

        self.bus.broadcast(Operation::CopyToDevice)?;

        {
            let connections = self.connections.lock();
            if let Some(map) = connections.edge_index_map() {
                self.recorder
                    .record_epoch(self.epoch, connections.edges()?, map);
            }
        }

        self.vertices.advance_epoch();
        self.epoch += 1;
        Ok(())
    }

    /// Broadcast teardown and finish the recorder; terminal.
    pub fn teardown(&mut self) -> Result<()> {
        self.bus.broadcast(Operation::DeallocateMemory)?;
        self.connections.lock().teardown()?;
        self.recorder.finish();
        Ok(())
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn connections(&self) -> SharedConnections {
        self.connections.clone()
    }

    pub fn bus(&self) -> &OperationBus {
        &self.bus
    }

    pub fn vertices_mut(&mut self) -> &mut dyn Vertices {
        self.vertices.as_mut()
    }

    pub fn recorder(&self) -> &dyn Recorder {
        self.recorder.as_ref()
    }

    pub fn recorder_mut(&mut self) -> &mut dyn Recorder {
        self.recorder.as_mut()
    }
}
