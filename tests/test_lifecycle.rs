// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! End-to-end lifecycle tests: configuration resolution, operation
//! broadcasts and the per-epoch flow driving a growth strategy.

use neuroweave::connect::{ConnectError, GrowthConnections, ResolvedStrategies};
use neuroweave::prelude::*;
use neuroweave::runtime::{OperationSubscriber, RuntimeError};
use parking_lot::Mutex;
use std::sync::Arc;

fn growth_config() -> SimulationConfig {
    serde_json::from_value(serde_json::json!({
        "connections_class": "GrowthConnections",
        "layout_class": "GridLayout",
        "vertices_class": "HomeostaticVertices",
        "recorder_class": "MemoryRecorder",
        "layout_params": {"width": 4, "height": 4, "max_edges_per_vertex": 15},
        "connections_params": {
            "epsilon": 0.6,
            "beta": 0.1,
            "rho": 0.5,
            "start_radius": 0.4,
            "max_weight": 1.0
        }
    }))
    .unwrap()
}

#[test]
fn resolved_config_drives_epochs() {
    let registries = StrategyRegistries::with_builtins();
    let ResolvedStrategies {
        connections,
        layout,
        vertices,
        recorder,
    } = growth_config().resolve(&registries).unwrap();

    let mut driver = EpochDriver::new(
        connections,
        layout,
        vertices,
        recorder,
        Box::new(HostMirror::new()),
    )
    .unwrap();

    // starve the vertices every epoch so radii expand and edges appear
    for _ in 0..10 {
        for v in 0..16u32 {
            driver.vertices_mut().set_activity(v, 0.0);
        }
        driver.run_epoch().unwrap();
    }
    assert_eq!(driver.epoch(), 10);

    {
        let connections = driver.connections();
        let guard = connections.lock();
        assert!(guard.edges().unwrap().active_edge_count() > 0);
        let map = guard.edge_index_map().unwrap();
        assert!(map.is_current(guard.edges().unwrap()));
    }

    let snapshots = driver
        .recorder()
        .as_any()
        .downcast_ref::<MemoryRecorder>()
        .unwrap()
        .snapshots()
        .len();
    assert_eq!(snapshots, 10);

    driver.teardown().unwrap();
}

#[test]
fn unknown_class_fails_the_same_way_every_time() {
    let registries = StrategyRegistries::with_builtins();
    let mut bad = growth_config();
    bad.vertices_class = "PoissonVertices".to_string();

    for _ in 0..3 {
        let err = bad.resolve(&registries).err().unwrap();
        assert_eq!(
            err.to_string(),
            ConnectError::Runtime(RuntimeError::UnknownClass("PoissonVertices".into()))
                .to_string()
        );
    }
}

struct OrderProbe {
    label: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
    fail: bool,
}

impl OperationSubscriber for OrderProbe {
    fn name(&self) -> &str {
        self.label
    }

    fn handle_operation(&mut self, _operation: Operation) -> neuroweave::runtime::Result<()> {
        self.log.lock().push(self.label);
        if self.fail {
            return Err(RuntimeError::MirrorTransfer("probe failure".into()));
        }
        Ok(())
    }
}

#[test]
fn broadcast_runs_subscribers_in_registration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut bus = OperationBus::new();
    for label in ["first", "second", "third"] {
        bus.subscribe(
            Operation::CopyToDevice,
            Arc::new(Mutex::new(OrderProbe {
                label,
                log: log.clone(),
                fail: false,
            })),
        );
    }

    bus.broadcast(Operation::CopyToDevice).unwrap();
    assert_eq!(*log.lock(), vec!["first", "second", "third"]);

    // other operations have no subscribers and broadcast cleanly
    log.lock().clear();
    bus.broadcast(Operation::RestoreToDefault).unwrap();
    assert!(log.lock().is_empty());
}

#[test]
fn broadcast_stops_at_first_failure() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut bus = OperationBus::new();
    bus.subscribe(
        Operation::AllocateMemory,
        Arc::new(Mutex::new(OrderProbe {
            label: "ok",
            log: log.clone(),
            fail: false,
        })),
    );
    bus.subscribe(
        Operation::AllocateMemory,
        Arc::new(Mutex::new(OrderProbe {
            label: "boom",
            log: log.clone(),
            fail: true,
        })),
    );
    bus.subscribe(
        Operation::AllocateMemory,
        Arc::new(Mutex::new(OrderProbe {
            label: "never",
            log: log.clone(),
            fail: false,
        })),
    );

    let err = bus.broadcast(Operation::AllocateMemory).unwrap_err();
    assert!(matches!(err, RuntimeError::OperationFailed { .. }));
    assert_eq!(*log.lock(), vec!["ok", "boom"]);
}

#[test]
fn growth_prunes_when_targets_are_met() {
    let layout = GridLayout::with_dimensions(2, 2, 3);
    let mut conn = GrowthConnections::new();
    conn.load_parameters(&serde_json::json!({
        "epsilon": 0.6,
        "beta": 0.1,
        "rho": 0.5,
        "start_radius": 0.9,
        "min_radius": 0.05
    }))
    .unwrap();
    conn.setup(&layout).unwrap();

    let mut vertices = HomeostaticVertices::new();
    vertices.setup(&layout).unwrap();

    // starved vertices grow disks until every pair connects
    for _ in 0..5 {
        for v in 0..vertices.len() as u32 {
            vertices.set_activity(v, 0.0);
        }
        conn.update_connections(&mut vertices).unwrap();
    }
    assert!(conn.edges().unwrap().active_edge_count() > 0);

    // overdriven vertices shrink their radii until disks stop touching
    for _ in 0..60 {
        for v in 0..vertices.len() as u32 {
            vertices.set_activity(v, 10.0);
        }
        conn.update_connections(&mut vertices).unwrap();
    }
    assert_eq!(conn.edges().unwrap().active_edge_count(), 0);

    conn.teardown().unwrap();
}
