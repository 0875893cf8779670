// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! Error types for runtime operations

use thiserror::Error;

/// Runtime errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// A strategy class name that was never registered. Configuration
    /// error; the simulation does not proceed.
    #[error("unknown strategy class '{0}' (never registered)")]
    UnknownClass(String),

    /// Mirror used before `allocate` or after `deallocate`
    #[error("edge mirror '{0}' is not allocated")]
    MirrorNotAllocated(&'static str),

    /// Host buffer and mirror buffer sizes disagree
    #[error("mirror buffer size mismatch: expected {expected}, got {got}")]
    MirrorSizeMismatch { expected: usize, got: usize },

    /// Host/device transfer failed. Fatal: continuing with a possibly
    /// inconsistent device state is worse than stopping.
    #[error("mirror transfer failed: {0}")]
    MirrorTransfer(String),

    /// A lifecycle-operation handler reported a failure
    #[error("lifecycle operation {operation} failed in '{subscriber}': {message}")]
    OperationFailed {
        operation: crate::operations::Operation,
        subscriber: String,
        message: String,
    },
}

/// Result type for runtime operations
pub type Result<T> = core::result::Result<T, RuntimeError>;
