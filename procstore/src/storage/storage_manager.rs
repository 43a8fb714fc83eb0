// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage Manager - database-level persistent storage
//!
//! Owns the single storage driver instance for a database directory and the
//! `catalog` tree where catalog providers keep their serialized state. Each
//! provider's state is one blob under one key; a save is written and flushed
//! before it returns, which makes a save the unit of durability.

use crate::storage::persistent::{
    create_storage_driver, BoxedStorageDriver, StorageTree, StorageType,
};
use crate::storage::StorageError;
use log::{debug, info};
use parking_lot::Mutex;
use std::path::Path;

/// Name of the tree holding catalog provider blobs
pub const CATALOG_TREE: &str = "catalog";

/// Storage manager over one storage driver
pub struct StorageManager {
    /// Single storage driver instance - created once at initialization
    driver: Mutex<BoxedStorageDriver>,

    /// Tree holding catalog provider state
    catalog_tree: Box<dyn StorageTree>,

    /// Storage type being used
    storage_type: StorageType,
}

impl StorageManager {
    /// Create a new storage manager for the database at `path`
    pub fn new<P: AsRef<Path>>(path: P, storage_type: StorageType) -> Result<Self, StorageError> {
        info!(
            "Initializing {} storage at path: {:?}",
            storage_type,
            path.as_ref()
        );
        let driver = create_storage_driver(storage_type, path.as_ref())?;
        Self::with_driver(driver)
    }

    /// Create a storage manager over an already opened driver
    pub fn with_driver(driver: BoxedStorageDriver) -> Result<Self, StorageError> {
        let storage_type = driver.storage_type();
        let catalog_tree = driver.open_tree(CATALOG_TREE)?;
        debug!("Pre-created tree: {}", CATALOG_TREE);

        Ok(Self {
            driver: Mutex::new(driver),
            catalog_tree,
            storage_type,
        })
    }

    /// Storage type backing this manager
    pub fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    /// Save catalog provider data, flushing before returning
    pub fn save_catalog_provider(&self, name: &str, data: &[u8]) -> Result<(), StorageError> {
        self.catalog_tree
            .insert(name.as_bytes(), data)
            .and_then(|_| self.catalog_tree.flush())
            .map_err(|e| {
                StorageError::PersistenceError(format!(
                    "Failed to save catalog provider '{}': {}",
                    name, e
                ))
            })?;
        debug!("Saved catalog provider '{}': {} bytes", name, data.len());
        Ok(())
    }

    /// Load catalog provider data
    ///
    /// Returns `Ok(None)` when nothing was ever saved under `name`; read
    /// failures are reported as errors, never as absence.
    pub fn load_catalog_provider(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let data = self.catalog_tree.get(name.as_bytes()).map_err(|e| {
            StorageError::PersistenceError(format!(
                "Failed to load catalog provider '{}': {}",
                name, e
            ))
        })?;
        match &data {
            Some(bytes) => debug!("Loaded catalog provider '{}': {} bytes", name, bytes.len()),
            None => debug!("No stored data found for catalog provider '{}'", name),
        }
        Ok(data)
    }

    /// Remove catalog provider data
    pub fn remove_catalog_provider(&self, name: &str) -> Result<(), StorageError> {
        self.catalog_tree
            .remove(name.as_bytes())
            .and_then(|_| self.catalog_tree.flush())
            .map_err(|e| {
                StorageError::PersistenceError(format!(
                    "Failed to remove catalog provider '{}': {}",
                    name, e
                ))
            })
    }

    /// List the names of all saved catalog providers
    pub fn list_catalog_providers(&self) -> Result<Vec<String>, StorageError> {
        Ok(self
            .catalog_tree
            .keys()?
            .into_iter()
            .map(|k| String::from_utf8_lossy(&k).to_string())
            .collect())
    }

    /// Flush the driver and release file locks where the backend supports it
    pub fn shutdown(&self) -> Result<(), StorageError> {
        self.driver.lock().shutdown()?;
        info!("Storage shut down ({})", self.storage_type);
        Ok(())
    }
}
