// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog lifecycle
//!
//! `Uninitialized -> Loading -> Ready`, then `Ready -> Loading -> Ready` on
//! every reload. A persistence or codec fault while loading ends in `Failed`:
//! the catalog is empty and refuses mutations so that the unread blob is not
//! overwritten. Readers block while a reload is in progress.

use super::codec;
use super::definition::CallableKind;
use super::error::{CatalogError, CatalogResult};
use super::manager::Catalog;
use super::signature::SignatureCompiler;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Availability of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    Failed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Uninitialized => write!(f, "uninitialized"),
            LifecycleState::Loading => write!(f, "loading"),
            LifecycleState::Ready => write!(f, "ready"),
            LifecycleState::Failed => write!(f, "failed"),
        }
    }
}

/// A persisted record that did not survive reload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedRecord {
    pub name: String,
    pub kind: CallableKind,
    pub reason: String,
}

/// A persisted record that loaded with degraded fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradedRecord {
    pub name: String,
    pub kind: CallableKind,
    pub fields: Vec<String>,
}

/// Outcome of one reload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReloadReport {
    pub loaded_procedures: Vec<String>,
    pub loaded_functions: Vec<String>,
    pub dropped: Vec<DroppedRecord>,
    pub degraded: Vec<DegradedRecord>,
    /// No blob was stored: a fresh database
    pub blob_absent: bool,
}

impl ReloadReport {
    pub fn loaded(&self) -> usize {
        self.loaded_procedures.len() + self.loaded_functions.len()
    }
}

/// Drives the catalog through startup and reloads
pub struct LifecycleManager {
    catalog: Arc<Catalog>,
}

impl LifecycleManager {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn state(&self) -> LifecycleState {
        self.catalog.lifecycle_state()
    }

    /// Initial load at process start
    pub fn start(&self) -> CatalogResult<ReloadReport> {
        log::debug!("Starting catalog '{}'", self.catalog.namespace());
        self.reload()
    }

    /// Rebuild the catalog from the persisted blob
    ///
    /// Each record is recompiled independently; records that fail are dropped
    /// with a warning. Only an unreadable or unparseable blob is an error,
    /// and it leaves the catalog `Failed`.
    pub fn reload(&self) -> CatalogResult<ReloadReport> {
        let started = Instant::now();
        let mut guard = self.catalog.begin_reload();
        let mut report = ReloadReport::default();

        let bytes = match guard.read_blob() {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                log::info!("No persisted callables (fresh database)");
                report.blob_absent = true;
                guard.finish(LifecycleState::Ready);
                return Ok(report);
            }
            Err(fault) => {
                log::error!("Catalog unavailable: persistence fault: {}", fault);
                guard.finish(LifecycleState::Failed);
                return Err(CatalogError::Persistence(fault));
            }
        };

        let records = match codec::decode(&bytes) {
            Ok(records) => records,
            Err(e) => {
                log::error!("Catalog unavailable: {}", e);
                guard.finish(LifecycleState::Failed);
                return Err(CatalogError::Codec(e));
            }
        };

        for record in records {
            if record.outcome.is_partial() {
                log::warn!(
                    "Persisted {} '{}' has unusable fields: {}",
                    record.kind,
                    record.name,
                    record.outcome.gaps().join(", ")
                );
                report.degraded.push(DegradedRecord {
                    name: record.name.clone(),
                    kind: record.kind,
                    fields: record.outcome.gaps().to_vec(),
                });
            }

            let request = record.outcome.fields().to_request(&record.name);
            let installed = SignatureCompiler::compile(record.kind, &request)
                .map_err(CatalogError::from)
                .and_then(|definition| guard.install(definition));

            match installed {
                Ok(()) => match record.kind {
                    CallableKind::Procedure => report.loaded_procedures.push(record.name),
                    CallableKind::Function => report.loaded_functions.push(record.name),
                },
                Err(e) => {
                    log::warn!("Dropping persisted {} '{}': {}", record.kind, record.name, e);
                    report.dropped.push(DroppedRecord {
                        name: record.name,
                        kind: record.kind,
                        reason: e.to_string(),
                    });
                }
            }
        }

        guard.finish(LifecycleState::Ready);
        log::info!(
            "Catalog ready: {} procedures, {} functions, {} dropped in {:?}",
            report.loaded_procedures.len(),
            report.loaded_functions.len(),
            report.dropped.len(),
            started.elapsed()
        );
        Ok(report)
    }
}
