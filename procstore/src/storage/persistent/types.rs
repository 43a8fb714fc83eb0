// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage driver types and error handling

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Storage driver type configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Sled - Pure Rust embedded database
    #[default]
    Sled,

    /// Memory - In-memory storage for testing
    Memory,
}

impl std::str::FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sled" => Ok(StorageType::Sled),
            "memory" => Ok(StorageType::Memory),
            _ => Err(format!(
                "Unknown storage type: {}. Valid options: sled, memory",
                s
            )),
        }
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StorageType::Sled => "sled",
            StorageType::Memory => "memory",
        };
        write!(f, "{}", name)
    }
}

/// Error type for storage driver operations
#[derive(Debug)]
pub enum StorageDriverError {
    /// I/O related errors (file system, etc.)
    IoError(std::io::Error),

    /// Driver-specific error (Sled, etc.)
    BackendSpecific(String),

    /// Backend not compiled into this build
    Unavailable(StorageType),
}

impl std::fmt::Display for StorageDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageDriverError::IoError(e) => write!(f, "I/O error: {}", e),
            StorageDriverError::BackendSpecific(e) => write!(f, "Storage driver error: {}", e),
            StorageDriverError::Unavailable(t) => {
                write!(f, "Storage backend '{}' is not enabled in this build", t)
            }
        }
    }
}

impl std::error::Error for StorageDriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageDriverError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageDriverError {
    fn from(e: std::io::Error) -> Self {
        StorageDriverError::IoError(e)
    }
}

/// Result type for storage driver operations
pub type StorageResult<T> = Result<T, StorageDriverError>;
