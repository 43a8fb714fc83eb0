// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory storage driver implementation for testing
//!
//! Clones share the same trees, so a clone handed to a fresh
//! `StorageManager` behaves like reopening the same database.

use super::traits::{StorageDriver, StorageTree};
use super::types::{StorageResult, StorageType};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// In-memory storage driver for testing
#[derive(Clone, Default)]
pub struct MemoryStorageDriver {
    trees: Arc<RwLock<HashMap<String, Arc<RwLock<HashMap<Vec<u8>, Vec<u8>>>>>>>,
}

/// In-memory tree implementation
pub struct MemoryTree {
    data: Arc<RwLock<HashMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryStorageDriver {
    /// Create a new memory storage driver
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageTree for MemoryTree {
    fn insert(&self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        self.data.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn remove(&self, key: &[u8]) -> StorageResult<()> {
        self.data.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<Vec<u8>>> {
        Ok(self.data.read().keys().cloned().collect())
    }

    fn flush(&self) -> StorageResult<()> {
        Ok(())
    }
}

impl StorageDriver for MemoryStorageDriver {
    type Tree = Box<dyn StorageTree>;

    fn open<P: AsRef<Path>>(_path: P) -> StorageResult<Self> {
        Ok(Self::new())
    }

    fn open_tree(&self, name: &str) -> StorageResult<Self::Tree> {
        let data = self
            .trees
            .write()
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(HashMap::new())))
            .clone();
        Ok(Box::new(MemoryTree { data }) as Box<dyn StorageTree>)
    }

    fn list_trees(&self) -> StorageResult<Vec<String>> {
        Ok(self.trees.read().keys().cloned().collect())
    }

    fn flush(&self) -> StorageResult<()> {
        Ok(())
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Memory
    }
}
