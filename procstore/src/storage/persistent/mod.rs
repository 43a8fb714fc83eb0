// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Persistent storage backends
//!
//! Trait-based abstractions for persistent key-value storage, allowing Sled
//! and the in-memory driver to be used interchangeably.
//!
//! ```text
//! StorageManager (catalog blobs)
//!     ↓
//! StorageDriver (key-value abstraction)
//!     ↓
//! Concrete Implementations (Sled, Memory)
//! ```

pub mod factory;
pub mod traits;
pub mod types;

#[cfg(feature = "sled-backend")]
pub mod sled;
pub mod memory;

pub use factory::{create_storage_driver, BoxedStorageDriver};
pub use memory::MemoryStorageDriver;
pub use traits::{StorageDriver, StorageTree};
pub use types::{StorageDriverError, StorageResult, StorageType};
