// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Definition store
//!
//! Owns the serialized catalog blob inside the database's catalog tree. The
//! store has no knowledge of what the bytes mean.

use crate::storage::StorageManager;
use std::sync::Arc;
use thiserror::Error;

/// I/O-level failure reading or writing the catalog blob
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceFault {
    #[error("Failed to read catalog blob '{key}': {reason}")]
    Read { key: String, reason: String },

    #[error("Failed to write catalog blob '{key}': {reason}")]
    Write { key: String, reason: String },
}

/// Durable home of the catalog blob
pub struct DefinitionStore {
    storage: Arc<StorageManager>,
    key: String,
}

impl DefinitionStore {
    /// Create a store for the blob under `key`
    ///
    /// # Arguments
    /// * `storage` - Storage manager holding the catalog tree
    /// * `key` - Key of the blob inside the catalog tree
    pub fn new(storage: Arc<StorageManager>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the blob
    ///
    /// # Returns
    /// * `Ok(Some(bytes))` if a blob is stored
    /// * `Ok(None)` for a fresh database
    /// * `Err(PersistenceFault::Read)` if the storage could not be read
    pub fn read(&self) -> Result<Option<Vec<u8>>, PersistenceFault> {
        let data = self
            .storage
            .load_catalog_provider(&self.key)
            .map_err(|e| PersistenceFault::Read {
                key: self.key.clone(),
                reason: e.to_string(),
            })?;
        if let Some(bytes) = &data {
            log::debug!("Read catalog blob '{}': {} bytes", self.key, bytes.len());
        }
        Ok(data)
    }

    /// Replace the blob; returns once the write is durable
    pub fn write(&self, bytes: &[u8]) -> Result<(), PersistenceFault> {
        self.storage
            .save_catalog_provider(&self.key, bytes)
            .map_err(|e| PersistenceFault::Write {
                key: self.key.clone(),
                reason: e.to_string(),
            })?;
        log::debug!("Wrote catalog blob '{}': {} bytes", self.key, bytes.len());
        Ok(())
    }
}
