// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! Error types for connection strategies

use neuroweave_graph::GraphError;
use neuroweave_runtime::RuntimeError;
use thiserror::Error;

/// Errors reported by connection strategies and the epoch plumbing
#[derive(Debug, Error)]
pub enum ConnectError {
    /// `setup` called twice without an intervening teardown. A lifecycle
    /// violation in the calling code, treated as fatal.
    #[error("setup called twice without teardown")]
    AlreadyInitialized,

    /// Operation requiring edge storage before `setup` has run
    #[error("connections not initialized (setup has not run)")]
    NotInitialized,

    /// Saved weight matrix does not match the current vertex count.
    /// The restore is aborted before any edge is touched.
    #[error("weight matrix shape mismatch: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    /// Saved weight matrix holds more edges than the reserved capacity.
    /// Checked before any mutation so the restore stays all-or-nothing.
    #[error("weight matrix restore needs {required} edges but capacity is {capacity}")]
    RestoreOverCapacity { required: usize, capacity: usize },

    /// Malformed strategy parameters
    #[error("invalid parameters for {class}: {message}")]
    Parameters { class: &'static str, message: String },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Result type for connection strategy operations
pub type Result<T> = core::result::Result<T, ConnectError>;
