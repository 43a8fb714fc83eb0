// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage driver factory

use super::traits::{StorageDriver, StorageTree};
use super::types::{StorageResult, StorageType};
use std::path::Path;

/// Boxed driver handle shared by the storage manager
pub type BoxedStorageDriver = Box<dyn StorageDriver<Tree = Box<dyn StorageTree>>>;

/// Create a storage driver based on configuration
///
/// # Arguments
/// * `storage_type` - The type of storage driver to create
/// * `path` - The filesystem path where the database should be stored
pub fn create_storage_driver<P: AsRef<Path>>(
    storage_type: StorageType,
    path: P,
) -> StorageResult<BoxedStorageDriver> {
    match storage_type {
        #[cfg(feature = "sled-backend")]
        StorageType::Sled => {
            use crate::storage::persistent::sled::SledDriver;
            let driver = SledDriver::open(path)?;
            Ok(Box::new(driver) as BoxedStorageDriver)
        }
        #[cfg(not(feature = "sled-backend"))]
        StorageType::Sled => {
            let _ = path;
            Err(super::types::StorageDriverError::Unavailable(StorageType::Sled))
        }
        StorageType::Memory => {
            use crate::storage::persistent::memory::MemoryStorageDriver;
            let driver = MemoryStorageDriver::open(path)?;
            Ok(Box::new(driver) as BoxedStorageDriver)
        }
    }
}
