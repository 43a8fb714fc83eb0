// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph entity structures and storage error types

use crate::storage::persistent::types::StorageDriverError;
use crate::storage::value::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Error types for storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage driver error: {0}")]
    Driver(#[from] StorageDriverError),

    #[error("Persistence error: {0}")]
    PersistenceError(String),
}

/// Graph node with id, labels, and properties
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub id: String,
    pub labels: Vec<String>,
    pub properties: BTreeMap<String, Value>,
}

impl Node {
    /// Create a new node with id and labels
    pub fn with_labels(id: String, labels: Vec<String>) -> Self {
        Self {
            id,
            labels,
            properties: BTreeMap::new(),
        }
    }
}

/// Graph edge with id, from/to nodes, label, and properties
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Edge {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
    pub label: String,
    pub properties: BTreeMap<String, Value>,
}

impl Edge {
    /// Create a new edge
    pub fn new(id: String, from_node: String, to_node: String, label: String) -> Self {
        Self {
            id,
            from_node,
            to_node,
            label,
            properties: BTreeMap::new(),
        }
    }
}
