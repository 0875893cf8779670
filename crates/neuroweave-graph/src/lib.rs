// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! # Neuroweave Graph Core
//!
//! Mutable edge storage and derived adjacency indexing for epoch-driven
//! graph-network simulation:
//! - [`EdgeCollection`]: fixed-capacity struct-of-arrays edge store, the
//!   unit of truth for network topology
//! - [`EdgeIndexMap`]: CSR-style per-vertex adjacency index derived from
//!   the collection, rebuilt on demand after topology changes
//!
//! The collection's backing buffers are fixed-size so device-resident
//! mirrors never need to reallocate.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod edge_collection;
pub mod error;
pub mod index_map;

pub use edge_collection::{EdgeCollection, EdgeId, EdgeType};
pub use error::{GraphError, Result};
pub use index_map::EdgeIndexMap;
