// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog configuration

use crate::storage::StorageType;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default namespace prefix for user-defined callables
pub const DEFAULT_NAMESPACE: &str = "custom";
/// Default key of the catalog blob in the database's catalog tree
pub const DEFAULT_BLOB_KEY: &str = "custom.callables";

static NAMESPACE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*)?$")
        .expect("namespace pattern is valid")
});

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Catalog configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Prefix under which callables are registered (`custom.answer`)
    pub namespace: String,

    /// Key of the persisted blob inside the catalog tree
    pub blob_key: String,

    /// Storage backend for the database directory
    pub storage_type: StorageType,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            blob_key: DEFAULT_BLOB_KEY.to_string(),
            storage_type: StorageType::default(),
        }
    }
}

impl CatalogConfig {
    /// Load a JSON config file; absent fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: CatalogConfig = serde_json::from_str(&text)?;
        config.validate()?;
        log::debug!("Loaded catalog config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !NAMESPACE_PATTERN.is_match(&self.namespace) {
            return Err(ConfigError::Invalid(format!(
                "namespace '{}' must be empty or dot-separated identifiers",
                self.namespace
            )));
        }
        if self.blob_key.trim().is_empty() {
            return Err(ConfigError::Invalid("blob_key must not be empty".to_string()));
        }
        Ok(())
    }
}
