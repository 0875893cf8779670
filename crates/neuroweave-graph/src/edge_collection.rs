// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! Fixed-capacity edge store
//!
//! Struct-of-arrays layout: parallel buffers for sources, targets, weights,
//! types and the active mask. All buffers are allocated to full capacity at
//! construction and never grow, so a device mirror can bind them once.
//!
//! Slots of removed edges are recycled through a free list. Each slot
//! carries a generation counter; an [`EdgeId`] captured before a removal is
//! detected as stale instead of silently aliasing the slot's next tenant.

use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};

/// Directed edge classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum EdgeType {
    Excitatory = 0,
    Inhibitory = 1,
}

/// Stable handle to an edge: slot index plus the slot generation at
/// creation time. Invalidated by removal of the edge it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId {
    slot: u32,
    generation: u32,
}

impl EdgeId {
    /// Raw slot index into the collection's backing buffers.
    ///
    /// Only meaningful while the id is live; index-map entries use slots
    /// directly because a map is valid only as of its build revision.
    pub fn slot(&self) -> u32 {
        self.slot
    }
}

/// Fixed-capacity backing store for all edges of a simulated network
#[derive(Debug, Clone)]
pub struct EdgeCollection {
    vertex_count: u32,

    /// Source vertex per slot
    sources: Vec<u32>,

    /// Target vertex per slot
    targets: Vec<u32>,

    /// Edge weight per slot
    weights: Vec<f32>,

    /// Edge type per slot
    types: Vec<EdgeType>,

    /// Active flag per slot
    active: Vec<bool>,

    /// Generation counter per slot, bumped on removal
    generations: Vec<u32>,

    /// Recycled slots available for reuse
    free_slots: Vec<u32>,

    /// Number of slots that have ever held an edge
    high_water: usize,

    active_count: usize,

    /// Bumped on every create/remove; weight edits leave it untouched
    revision: u64,
}

impl EdgeCollection {
    /// Reserve a store for `vertex_count` vertices with at most
    /// `max_edges_per_vertex` outgoing edges each.
    ///
    /// Capacity is `vertex_count * max_edges_per_vertex` and is fixed for
    /// the lifetime of the collection.
    pub fn new(vertex_count: u32, max_edges_per_vertex: usize) -> Self {
        let capacity = vertex_count as usize * max_edges_per_vertex;
        tracing::debug!(
            vertex_count,
            max_edges_per_vertex,
            capacity,
            "reserving edge collection"
        );
        Self {
            vertex_count,
            sources: vec![0; capacity],
            targets: vec![0; capacity],
            weights: vec![0.0; capacity],
            types: vec![EdgeType::Excitatory; capacity],
            active: vec![false; capacity],
            generations: vec![0; capacity],
            free_slots: Vec::new(),
            high_water: 0,
            active_count: 0,
            revision: 0,
        }
    }

    /// Create an edge, recycling a removed slot when one is available.
    ///
    /// Fails with [`GraphError::CapacityExceeded`] once every reserved slot
    /// holds an active edge; prior state is left untouched.
    pub fn create_edge(
        &mut self,
        source: u32,
        target: u32,
        weight: f32,
        edge_type: EdgeType,
    ) -> Result<EdgeId> {
        self.check_vertex(source)?;
        self.check_vertex(target)?;

        let slot = match self.free_slots.pop() {
            Some(slot) => slot as usize,
            None => {
                if self.high_water == self.capacity() {
                    return Err(GraphError::CapacityExceeded {
                        capacity: self.capacity(),
                    });
                }
                let slot = self.high_water;
                self.high_water += 1;
                slot
            }
        };

        self.sources[slot] = source;
        self.targets[slot] = target;
        self.weights[slot] = weight;
        self.types[slot] = edge_type;
        self.active[slot] = true;
        self.active_count += 1;
        self.revision += 1;

        Ok(EdgeId {
            slot: slot as u32,
            generation: self.generations[slot],
        })
    }

    /// Mark an edge inactive and make its slot reusable.
    ///
    /// The slot generation is bumped so the removed id (and any cached
    /// copies of it) become stale immediately.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<()> {
        let slot = self.live_slot(id)?;
        self.active[slot] = false;
        self.generations[slot] += 1;
        self.free_slots.push(slot as u32);
        self.active_count -= 1;
        self.revision += 1;
        Ok(())
    }

    /// Set the weight of an active edge. Weight-only mutation: the
    /// topology revision is not bumped.
    pub fn set_weight(&mut self, id: EdgeId, weight: f32) -> Result<()> {
        let slot = self.live_slot(id)?;
        self.weights[slot] = weight;
        Ok(())
    }

    /// Weight of an active edge
    pub fn weight(&self, id: EdgeId) -> Result<f32> {
        Ok(self.weights[self.live_slot(id)?])
    }

    /// (source, target) of an active edge
    pub fn endpoints(&self, id: EdgeId) -> Result<(u32, u32)> {
        let slot = self.live_slot(id)?;
        Ok((self.sources[slot], self.targets[slot]))
    }

    /// Whether the id still names a live edge
    pub fn is_active(&self, id: EdgeId) -> bool {
        self.live_slot(id).is_ok()
    }

    /// Deactivate every edge. Generations of live slots are bumped so all
    /// outstanding ids turn stale.
    pub fn clear(&mut self) {
        for slot in 0..self.high_water {
            if self.active[slot] {
                self.active[slot] = false;
                self.generations[slot] += 1;
            }
        }
        self.free_slots.clear();
        self.high_water = 0;
        self.active_count = 0;
        self.revision += 1;
    }

    /// Number of vertices the store was sized for
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Reserved slot count, fixed at construction
    pub fn capacity(&self) -> usize {
        self.sources.len()
    }

    /// Number of currently active edges
    pub fn active_edge_count(&self) -> usize {
        self.active_count
    }

    /// Monotonic counter of topology changes (creates and removes)
    pub fn topology_revision(&self) -> u64 {
        self.revision
    }

    /// Highest slot ever used; slots beyond it have never held an edge
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    // Raw buffer views over the full fixed capacity, the payload the
    // device mirror binds.

    pub fn sources(&self) -> &[u32] {
        &self.sources
    }

    pub fn targets(&self) -> &[u32] {
        &self.targets
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn weights_mut(&mut self) -> &mut [f32] {
        &mut self.weights
    }

    pub fn active_mask(&self) -> &[bool] {
        &self.active
    }

    /// Iterate active edges as `(slot, source, target, weight)`, in
    /// ascending slot order.
    pub fn iter_active(&self) -> impl Iterator<Item = (u32, u32, u32, f32)> + '_ {
        (0..self.high_water).filter_map(move |slot| {
            if self.active[slot] {
                Some((
                    slot as u32,
                    self.sources[slot],
                    self.targets[slot],
                    self.weights[slot],
                ))
            } else {
                None
            }
        })
    }

    /// Type of the edge in `slot`; callers index through the index map
    pub fn edge_type_at(&self, slot: u32) -> EdgeType {
        self.types[slot as usize]
    }

    /// Live id of the edge occupying `slot`, if any
    pub fn id_at(&self, slot: u32) -> Option<EdgeId> {
        let s = slot as usize;
        if s < self.high_water && self.active[s] {
            Some(EdgeId {
                slot,
                generation: self.generations[s],
            })
        } else {
            None
        }
    }

    fn check_vertex(&self, vertex: u32) -> Result<()> {
        if vertex >= self.vertex_count {
            return Err(GraphError::VertexOutOfBounds {
                vertex,
                vertex_count: self.vertex_count,
            });
        }
        Ok(())
    }

    fn live_slot(&self, id: EdgeId) -> Result<usize> {
        let slot = id.slot as usize;
        if slot >= self.high_water
            || !self.active[slot]
            || self.generations[slot] != id.generation
        {
            return Err(GraphError::StaleEdge {
                slot: id.slot,
                generation: id.generation,
            });
        }
        Ok(slot)
    }
}
