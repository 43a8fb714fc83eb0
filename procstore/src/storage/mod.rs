// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage layer
//!
//! This module provides:
//! - Value type system for callable arguments and results
//! - Graph entity structures carried inside values
//! - Pluggable key-value storage drivers (Sled, Memory)
//! - The storage manager that holds catalog blobs

pub mod persistent;
pub mod storage_manager;
pub mod types;
pub mod value;

pub use persistent::{
    BoxedStorageDriver, MemoryStorageDriver, StorageDriver, StorageDriverError, StorageResult,
    StorageTree, StorageType,
};
pub use storage_manager::StorageManager;
pub use types::{Edge, Node, StorageError};
pub use value::{PathElement, PathValue, Point, Value};
