// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! Lifecycle-operation broadcast
//!
//! A fixed set of cross-cutting lifecycle operations plus a bus that
//! dispatches them to subscribed components. The epoch driver broadcasts
//! an operation; every subscriber registered for it runs synchronously,
//! in registration order. Components that own device-mirrored data react
//! to `CopyToDevice`/`CopyFromDevice` here instead of calling accelerator
//! APIs directly.

use crate::error::{Result, RuntimeError};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Operations the bus can broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AllocateMemory,
    DeallocateMemory,
    RestoreToDefault,
    CopyToDevice,
    CopyFromDevice,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::AllocateMemory => "AllocateMemory",
            Operation::DeallocateMemory => "DeallocateMemory",
            Operation::RestoreToDefault => "RestoreToDefault",
            Operation::CopyToDevice => "CopyToDevice",
            Operation::CopyFromDevice => "CopyFromDevice",
        };
        write!(f, "{}", name)
    }
}

/// A component reacting to broadcast lifecycle operations
pub trait OperationSubscriber: Send {
    /// Subscriber name for logs and error reports
    fn name(&self) -> &str;

    /// Execute the handler registered for `operation`
    fn handle_operation(&mut self, operation: Operation) -> Result<()>;
}

type SharedSubscriber = Arc<Mutex<dyn OperationSubscriber>>;

/// Dispatches lifecycle operations to subscribers in registration order.
///
/// An explicit object owned by the epoch driver, passed by reference to
/// whatever needs to broadcast or subscribe.
#[derive(Default)]
pub struct OperationBus {
    subscriptions: Vec<(Operation, SharedSubscriber)>,
}

impl OperationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `subscriber` for one operation. Subscribing the same
    /// component for several operations takes one call per operation and
    /// preserves overall registration order.
    pub fn subscribe(&mut self, operation: Operation, subscriber: SharedSubscriber) {
        tracing::debug!(%operation, subscriber = subscriber.lock().name(), "bus subscription");
        self.subscriptions.push((operation, subscriber));
    }

    /// Broadcast `operation` to every subscriber registered for it,
    /// synchronously and in registration order.
    ///
    /// The first handler failure aborts the broadcast; mirror transfer
    /// failures in particular must halt the simulation.
    pub fn broadcast(&self, operation: Operation) -> Result<()> {
        tracing::debug!(%operation, "broadcasting lifecycle operation");
        for (subscribed_op, subscriber) in &self.subscriptions {
            if *subscribed_op != operation {
                continue;
            }
            let mut guard = subscriber.lock();
            let name = guard.name().to_string();
            guard
                .handle_operation(operation)
                .map_err(|e| RuntimeError::OperationFailed {
                    operation,
                    subscriber: name,
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }

    /// Number of registered subscriptions across all operations
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl OperationSubscriber for Probe {
        fn name(&self) -> &str {
            self.label
        }

        fn handle_operation(&mut self, operation: Operation) -> Result<()> {
            if self.fail {
                return Err(RuntimeError::MirrorTransfer("probe failure".into()));
            }
            self.log.lock().push(format!("{}:{}", self.label, operation));
            Ok(())
        }
    }

    fn probe(label: &'static str, log: &Arc<Mutex<Vec<String>>>, fail: bool) -> SharedSubscriber {
        Arc::new(Mutex::new(Probe {
            label,
            log: log.clone(),
            fail,
        }))
    }

    #[test]
    fn dispatch_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = OperationBus::new();
        bus.subscribe(Operation::CopyToDevice, probe("a", &log, false));
        bus.subscribe(Operation::CopyFromDevice, probe("b", &log, false));
        bus.subscribe(Operation::CopyToDevice, probe("c", &log, false));

        bus.broadcast(Operation::CopyToDevice).unwrap();
        assert_eq!(
            *log.lock(),
            vec!["a:CopyToDevice".to_string(), "c:CopyToDevice".to_string()]
        );
    }

    #[test]
    fn handler_failure_aborts_broadcast() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = OperationBus::new();
        bus.subscribe(Operation::CopyFromDevice, probe("bad", &log, true));
        bus.subscribe(Operation::CopyFromDevice, probe("after", &log, false));

        let err = bus.broadcast(Operation::CopyFromDevice).unwrap_err();
        assert!(matches!(err, RuntimeError::OperationFailed { .. }));
        // the later subscriber never ran
        assert!(log.lock().is_empty());
    }

    #[test]
    fn broadcast_without_subscribers_is_a_noop() {
        let bus = OperationBus::new();
        bus.broadcast(Operation::RestoreToDefault).unwrap();
    }
}
