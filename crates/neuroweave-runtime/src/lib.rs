// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! # Neuroweave Runtime
//!
//! Execution substrate for the connectivity core:
//! - [`OperationBus`]: broadcast of cross-cutting lifecycle operations
//!   (allocate/deallocate/restore/copy-to-device/copy-from-device) to
//!   subscribed components, in registration order
//! - [`Registry`]: name-to-constructor table backing the pluggable
//!   strategy families, an explicit object rather than a process global
//! - [`EdgeMirror`]: the host/device synchronization contract for edge
//!   buffers, with a host shadow implementation and an optional
//!   WGPU-resident one behind the `gpu` feature

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod mirror;
pub mod operations;
pub mod registry;

pub use error::{Result, RuntimeError};
pub use mirror::{EdgeMirror, HostMirror};
#[cfg(feature = "gpu")]
pub use mirror::WgpuMirror;
pub use operations::{Operation, OperationBus, OperationSubscriber};
pub use registry::Registry;
