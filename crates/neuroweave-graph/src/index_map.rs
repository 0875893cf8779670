// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! CSR-style adjacency index derived from an [`EdgeCollection`]
//!
//! For each vertex the map holds an ordered list of outgoing and incoming
//! edge slots, packed into four arrays (two offset arrays, two slot
//! arrays) so per-vertex neighbor iteration is an O(1) slice.
//!
//! The map is a snapshot: it reflects the collection as of the build and
//! goes stale on the next create/remove. Rebuilds are always total; a
//! counting pass keeps construction at O(V+E) with per-vertex lists in
//! ascending slot order.

use crate::edge_collection::EdgeCollection;

/// Derived per-vertex adjacency index over active edge slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeIndexMap {
    /// `outgoing_offsets[v]..outgoing_offsets[v+1]` slices `outgoing_edges`
    outgoing_offsets: Vec<u32>,
    outgoing_edges: Vec<u32>,

    /// `incoming_offsets[v]..incoming_offsets[v+1]` slices `incoming_edges`
    incoming_offsets: Vec<u32>,
    incoming_edges: Vec<u32>,

    /// Topology revision of the collection this map was built from
    built_revision: u64,
}

impl EdgeIndexMap {
    /// Build the index in a single counting pass over active edges.
    pub fn build(edges: &EdgeCollection) -> Self {
        let vertex_count = edges.vertex_count() as usize;
        let active = edges.active_edge_count();

        let mut outgoing_offsets = vec![0u32; vertex_count + 1];
        let mut incoming_offsets = vec![0u32; vertex_count + 1];

        // Pass 1: per-vertex degree counts, shifted by one for the
        // prefix-sum below.
        for (_, source, target, _) in edges.iter_active() {
            outgoing_offsets[source as usize + 1] += 1;
            incoming_offsets[target as usize + 1] += 1;
        }
        for v in 0..vertex_count {
            outgoing_offsets[v + 1] += outgoing_offsets[v];
            incoming_offsets[v + 1] += incoming_offsets[v];
        }

        // Pass 2: scatter slots. iter_active yields ascending slot order,
        // so per-vertex lists come out sorted by edge slot.
        let mut outgoing_edges = vec![0u32; active];
        let mut incoming_edges = vec![0u32; active];
        let mut out_cursor = outgoing_offsets.clone();
        let mut in_cursor = incoming_offsets.clone();
        for (slot, source, target, _) in edges.iter_active() {
            outgoing_edges[out_cursor[source as usize] as usize] = slot;
            out_cursor[source as usize] += 1;
            incoming_edges[in_cursor[target as usize] as usize] = slot;
            in_cursor[target as usize] += 1;
        }

        tracing::debug!(
            vertices = vertex_count,
            edges = active,
            revision = edges.topology_revision(),
            "rebuilt edge index map"
        );

        Self {
            outgoing_offsets,
            outgoing_edges,
            incoming_offsets,
            incoming_edges,
            built_revision: edges.topology_revision(),
        }
    }

    /// Slots of edges leaving `vertex`, ascending
    pub fn outgoing(&self, vertex: u32) -> &[u32] {
        let v = vertex as usize;
        let lo = self.outgoing_offsets[v] as usize;
        let hi = self.outgoing_offsets[v + 1] as usize;
        &self.outgoing_edges[lo..hi]
    }

    /// Slots of edges arriving at `vertex`, ascending
    pub fn incoming(&self, vertex: u32) -> &[u32] {
        let v = vertex as usize;
        let lo = self.incoming_offsets[v] as usize;
        let hi = self.incoming_offsets[v + 1] as usize;
        &self.incoming_edges[lo..hi]
    }

    /// Number of vertices the map was built over
    pub fn vertex_count(&self) -> usize {
        self.outgoing_offsets.len() - 1
    }

    /// Number of active edges indexed at build time
    pub fn edge_count(&self) -> usize {
        self.outgoing_edges.len()
    }

    /// Staleness check: true while the collection's topology has not
    /// changed since this map was built. Reading adjacency from a stale
    /// map is a caller contract violation; this is the hardening hook.
    pub fn is_current(&self, edges: &EdgeCollection) -> bool {
        self.built_revision == edges.topology_revision()
    }

    /// Topology revision the map was built against
    pub fn built_revision(&self) -> u64 {
        self.built_revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge_collection::EdgeType;

    fn collect(map: &EdgeIndexMap, edges: &EdgeCollection, v: u32) -> Vec<(u32, u32)> {
        map.outgoing(v)
            .iter()
            .map(|&slot| {
                let s = edges.sources()[slot as usize];
                let t = edges.targets()[slot as usize];
                (s, t)
            })
            .collect()
    }

    #[test]
    fn groups_by_source_and_target() {
        let mut edges = EdgeCollection::new(3, 4);
        edges.create_edge(0, 1, 1.0, EdgeType::Excitatory).unwrap();
        edges.create_edge(0, 2, 1.0, EdgeType::Excitatory).unwrap();
        edges.create_edge(1, 2, 1.0, EdgeType::Excitatory).unwrap();
        let map = EdgeIndexMap::build(&edges);

        assert_eq!(collect(&map, &edges, 0), vec![(0, 1), (0, 2)]);
        assert_eq!(collect(&map, &edges, 1), vec![(1, 2)]);
        assert!(map.outgoing(2).is_empty());
        assert_eq!(map.incoming(2).len(), 2);
        assert_eq!(map.incoming(0).len(), 0);
        assert_eq!(map.edge_count(), 3);
    }

    #[test]
    fn removal_leaves_map_stale_until_rebuild() {
        let mut edges = EdgeCollection::new(2, 2);
        let id = edges.create_edge(0, 1, 1.0, EdgeType::Excitatory).unwrap();
        let map = EdgeIndexMap::build(&edges);
        assert!(map.is_current(&edges));

        edges.remove_edge(id).unwrap();
        assert!(!map.is_current(&edges));

        let rebuilt = EdgeIndexMap::build(&edges);
        assert!(rebuilt.is_current(&edges));
        assert_eq!(rebuilt.edge_count(), 0);
    }

    #[test]
    fn weight_edit_keeps_map_current() {
        let mut edges = EdgeCollection::new(2, 2);
        let id = edges.create_edge(0, 1, 1.0, EdgeType::Excitatory).unwrap();
        let map = EdgeIndexMap::build(&edges);
        edges.set_weight(id, 7.0).unwrap();
        assert!(map.is_current(&edges));
    }

    #[test]
    fn rebuild_on_unchanged_topology_is_identical() {
        let mut edges = EdgeCollection::new(4, 4);
        edges.create_edge(3, 0, 1.0, EdgeType::Inhibitory).unwrap();
        edges.create_edge(1, 2, 0.5, EdgeType::Excitatory).unwrap();
        let a = EdgeIndexMap::build(&edges);
        let b = EdgeIndexMap::build(&edges);
        assert_eq!(a, b);
    }

    #[test]
    fn per_vertex_lists_are_slot_ascending() {
        let mut edges = EdgeCollection::new(2, 8);
        for _ in 0..5 {
            edges.create_edge(0, 1, 1.0, EdgeType::Excitatory).unwrap();
        }
        let map = EdgeIndexMap::build(&edges);
        let out = map.outgoing(0);
        assert!(out.windows(2).all(|w| w[0] < w[1]));
    }
}
