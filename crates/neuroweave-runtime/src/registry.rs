// Copyright 2025 Neuroweave Project
// SPDX-License-Identifier: Apache-2.0

//! Strategy registry
//!
//! Maps a configuration-supplied class name to a zero-argument
//! constructor, producing concrete strategy objects without compile-time
//! coupling. One registry instance per pluggable family; each is an
//! explicit object constructed at startup and passed by reference, so
//! tests can use a private registry instead of process-global state.
//!
//! Registration is expected to complete before any `create` call; the
//! name table is not designed for concurrent mutation.

use crate::error::{Result, RuntimeError};
use ahash::AHashMap;

/// Constructor function for a strategy object
pub type CreateFn<T> = fn() -> Box<T>;

/// Name-to-constructor table for one strategy family
pub struct Registry<T: ?Sized> {
    constructors: AHashMap<String, CreateFn<T>>,
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Registry<T> {
    pub fn new() -> Self {
        Self {
            constructors: AHashMap::new(),
        }
    }

    /// Associate `class_name` with a constructor. Re-registering a name
    /// replaces the previous constructor.
    pub fn register(&mut self, class_name: &str, create: CreateFn<T>) {
        tracing::debug!(class_name, "registering strategy class");
        self.constructors.insert(class_name.to_string(), create);
    }

    /// Instantiate the class registered under `class_name`.
    ///
    /// An unregistered name fails deterministically with
    /// [`RuntimeError::UnknownClass`] and no side effects; the caller
    /// treats it as a fatal configuration error.
    pub fn create(&self, class_name: &str) -> Result<Box<T>> {
        match self.constructors.get(class_name) {
            Some(create) => {
                tracing::debug!(class_name, "instantiating strategy class");
                Ok(create())
            }
            None => Err(RuntimeError::UnknownClass(class_name.to_string())),
        }
    }

    /// Whether `class_name` has been registered
    pub fn contains(&self, class_name: &str) -> bool {
        self.constructors.contains_key(class_name)
    }

    /// Registered class names, in no particular order
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }
}
