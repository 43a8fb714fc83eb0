// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Callable Coordinator - Simplified orchestration for user-defined callables
//!
//! Wires storage, the catalog, the lifecycle manager and the invocation
//! adapter together behind one handle.

use crate::catalog::{
    CallableInfo, CallableKind, CallableNamespace, Catalog, CatalogResult, Definition,
    DefinitionRequest, DefinitionStore, LifecycleManager, LifecycleState, NamespaceRegistry,
    ReloadReport,
};
use crate::config::CatalogConfig;
use crate::exec::{Arguments, CallOutput, InvocationContext, InvocationError, Invoker, QueryEngine};
use crate::storage::StorageManager;
use std::path::Path;
use std::sync::Arc;

/// Callable Coordinator - main entry point for defining and invoking callables
pub struct CallableCoordinator {
    catalog: Arc<Catalog>,
    lifecycle: LifecycleManager,
    invoker: Invoker,
    storage: Arc<StorageManager>,
}

impl CallableCoordinator {
    /// Create a coordinator from a database path (Simplified API)
    ///
    /// Opens sled storage with the default configuration and runs the
    /// startup reload. A reload failure is logged and leaves the catalog
    /// `Failed` rather than failing construction.
    ///
    /// # Arguments
    /// * `db_path` - Path to the database directory
    /// * `engine` - Host query engine that runs stored statements
    ///
    /// # Returns
    /// * `Ok(Arc<CallableCoordinator>)` - Initialized coordinator ready for use
    /// * `Err(String)` - Error message if storage could not be opened
    pub fn from_path(
        db_path: impl AsRef<Path>,
        engine: Arc<dyn QueryEngine>,
    ) -> Result<Arc<Self>, String> {
        Self::from_path_with_config(db_path, CatalogConfig::default(), engine)
    }

    /// Create a coordinator from a database path and an explicit configuration
    pub fn from_path_with_config(
        db_path: impl AsRef<Path>,
        config: CatalogConfig,
        engine: Arc<dyn QueryEngine>,
    ) -> Result<Arc<Self>, String> {
        config.validate().map_err(|e| e.to_string())?;
        let storage = Arc::new(
            StorageManager::new(db_path.as_ref(), config.storage_type)
                .map_err(|e| format!("Failed to initialize storage: {}", e))?,
        );
        Ok(Self::open(storage, config, engine))
    }

    /// Create a coordinator over existing storage (Advanced API)
    pub fn open(
        storage: Arc<StorageManager>,
        config: CatalogConfig,
        engine: Arc<dyn QueryEngine>,
    ) -> Arc<Self> {
        Self::open_with_namespace(storage, config, engine, Arc::new(NamespaceRegistry::new()))
    }

    /// Create a coordinator that mirrors callables into a host-provided namespace
    pub fn open_with_namespace(
        storage: Arc<StorageManager>,
        config: CatalogConfig,
        engine: Arc<dyn QueryEngine>,
        namespace: Arc<dyn CallableNamespace>,
    ) -> Arc<Self> {
        let store = DefinitionStore::new(storage.clone(), config.blob_key.clone());
        let catalog = Arc::new(Catalog::new(config.namespace.clone(), store, namespace));
        let lifecycle = LifecycleManager::new(catalog.clone());
        let invoker = Invoker::new(catalog.clone(), engine);

        if let Err(e) = lifecycle.start() {
            log::error!("Catalog failed to load at startup: {}", e);
        }

        Arc::new(Self {
            catalog,
            lifecycle,
            invoker,
            storage,
        })
    }

    /// Define or replace a procedure
    pub fn declare_procedure(&self, request: &DefinitionRequest) -> CatalogResult<Arc<Definition>> {
        self.catalog.declare(CallableKind::Procedure, request)
    }

    /// Define or replace a function
    pub fn declare_function(&self, request: &DefinitionRequest) -> CatalogResult<Arc<Definition>> {
        self.catalog.declare(CallableKind::Function, request)
    }

    /// Remove a callable
    pub fn remove(&self, kind: CallableKind, name: &str) -> CatalogResult<()> {
        self.catalog.remove(kind, name)
    }

    /// List all callables
    pub fn list(&self) -> Vec<CallableInfo> {
        self.catalog.list()
    }

    /// Invoke a callable
    pub fn invoke(
        &self,
        name: &str,
        kind: CallableKind,
        arguments: Arguments,
        context: &InvocationContext,
    ) -> Result<CallOutput, InvocationError> {
        self.invoker.invoke(name, kind, arguments, context)
    }

    /// Rebuild the catalog from the persisted blob
    pub fn reload(&self) -> CatalogResult<ReloadReport> {
        self.lifecycle.reload()
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Flush and release storage
    pub fn shutdown(&self) -> Result<(), String> {
        self.storage
            .shutdown()
            .map_err(|e| format!("Failed to shut down storage: {}", e))
    }
}
