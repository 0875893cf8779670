// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! Fixed-capacity storage and weight save/restore behavior across the
//! public API.

use ndarray::Array2;
use neuroweave::connect::ConnectError;
use neuroweave::prelude::*;

#[test]
fn capacity_is_vertex_count_times_fan_out() {
    let mut edges = EdgeCollection::new(100, 10);
    assert_eq!(edges.capacity(), 1000);

    for source in 0..100u32 {
        for k in 0..10u32 {
            edges
                .create_edge(source, (source + k + 1) % 100, 0.1, EdgeType::Excitatory)
                .unwrap();
        }
    }
    assert_eq!(edges.active_edge_count(), 1000);

    let err = edges
        .create_edge(0, 50, 0.1, EdgeType::Excitatory)
        .unwrap_err();
    assert!(matches!(err, GraphError::CapacityExceeded { capacity: 1000 }));
    assert_eq!(edges.active_edge_count(), 1000);

    // removal frees exactly one slot for reuse
    let id = edges.iter_active().next().map(|(slot, ..)| slot).unwrap();
    let id = edges.id_at(id).unwrap();
    edges.remove_edge(id).unwrap();
    edges.create_edge(0, 50, 0.1, EdgeType::Excitatory).unwrap();
    assert_eq!(edges.active_edge_count(), 1000);
}

#[test]
fn stale_ids_fail_after_recycling() {
    let mut edges = EdgeCollection::new(2, 1);
    let first = edges.create_edge(0, 1, 1.0, EdgeType::Excitatory).unwrap();
    edges.remove_edge(first).unwrap();
    let second = edges.create_edge(1, 0, 2.0, EdgeType::Inhibitory).unwrap();

    assert_eq!(first.slot(), second.slot());
    assert!(matches!(
        edges.weight(first),
        Err(GraphError::StaleEdge { .. })
    ));
    assert_eq!(edges.weight(second).unwrap(), 2.0);
}

#[test]
fn save_clear_restore_round_trip_through_strategy() {
    let layout = GridLayout::with_dimensions(4, 4, 8).with_nearest_neighbors(1.0);
    let mut conn = StaticConnections::new();
    conn.setup(&layout).unwrap();
    conn.rebuild_edge_index_map().unwrap();

    let mut before: Vec<_> = conn
        .edges()
        .unwrap()
        .iter_active()
        .map(|(_, s, t, w)| (s, t, w))
        .collect();
    before.sort_by_key(|&(s, t, _)| (s, t));
    let revision_before = conn.edges().unwrap().topology_revision();

    let saved = conn.save_weights().unwrap();
    conn.edges_mut().unwrap().clear();
    assert_eq!(conn.edges().unwrap().active_edge_count(), 0);

    conn.create_edges_from_weights(&saved).unwrap();

    let mut after: Vec<_> = conn
        .edges()
        .unwrap()
        .iter_active()
        .map(|(_, s, t, w)| (s, t, w))
        .collect();
    after.sort_by_key(|&(s, t, _)| (s, t));
    assert_eq!(before, after);
    // clear + recreate both count as topology changes
    assert!(conn.edges().unwrap().topology_revision() > revision_before);

    // restore invalidated the previous index map; a rebuild matches
    let map = conn.rebuild_edge_index_map().unwrap();
    assert!(map.is_current(conn.edges().unwrap()));
}

#[test]
fn restore_rejects_wrong_shape_without_mutating() {
    let layout = GridLayout::with_dimensions(3, 3, 4).with_nearest_neighbors(1.0);
    let mut conn = StaticConnections::new();
    conn.setup(&layout).unwrap();
    let count_before = conn.edges().unwrap().active_edge_count();

    let wrong = Array2::<f32>::zeros((4, 4));
    let err = conn.create_edges_from_weights(&wrong).unwrap_err();
    assert!(matches!(err, ConnectError::ShapeMismatch { .. }));
    assert_eq!(conn.edges().unwrap().active_edge_count(), count_before);
}

#[test]
fn host_mirror_matches_direct_weight_arithmetic() {
    let mut edges = EdgeCollection::new(8, 4);
    let mut ids = Vec::new();
    for i in 0..8u32 {
        ids.push(
            edges
                .create_edge(i, (i + 1) % 8, 0.1 * i as f32, EdgeType::Excitatory)
                .unwrap(),
        );
    }

    // expected result computed with plain f32 addition, the mirror
    // contract's numeric rule
    let deltas: Vec<f32> = (0..edges.capacity()).map(|s| 0.01 * s as f32).collect();
    let expected: Vec<f32> = edges
        .weights()
        .iter()
        .zip(&deltas)
        .zip(edges.active_mask())
        .map(|((w, d), &a)| if a { w + d } else { *w })
        .collect();

    let mut mirror = HostMirror::new();
    mirror.allocate(&edges).unwrap();
    mirror.copy_to_device(&edges).unwrap();
    mirror.apply_weight_deltas(&mut edges, &deltas).unwrap();

    assert_eq!(edges.weights(), expected.as_slice());
}
