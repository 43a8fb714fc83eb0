// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog of user-defined callables
//!
//! The [`Catalog`] owns the live set of definitions and mirrors each of them
//! into a [`CallableNamespace`]. Readers (`list`, `resolve`) take a shared
//! lock and never wait on each other. Writers (`define`, `remove`, reload)
//! serialize on a writer mutex, persist the full updated snapshot, and only
//! then take the exclusive lock to swap the in-memory entry and its
//! registration together.

use super::codec;
use super::definition::{qualify, CallableInfo, CallableKind, CatalogSnapshot, Definition};
use super::error::{CatalogError, CatalogResult};
use super::lifecycle::LifecycleState;
use super::signature::{DefinitionRequest, SignatureCompiler};
use super::store::{DefinitionStore, PersistenceFault};
use super::traits::CallableNamespace;
use parking_lot::{Mutex, MutexGuard, RwLock, RwLockWriteGuard};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Default)]
pub(crate) struct CatalogState {
    pub(crate) lifecycle: LifecycleState,
    procedures: BTreeMap<String, Arc<Definition>>,
    functions: BTreeMap<String, Arc<Definition>>,
}

impl CatalogState {
    fn entries(&self, kind: CallableKind) -> &BTreeMap<String, Arc<Definition>> {
        match kind {
            CallableKind::Procedure => &self.procedures,
            CallableKind::Function => &self.functions,
        }
    }

    fn entries_mut(&mut self, kind: CallableKind) -> &mut BTreeMap<String, Arc<Definition>> {
        match kind {
            CallableKind::Procedure => &mut self.procedures,
            CallableKind::Function => &mut self.functions,
        }
    }

    /// Kind currently registered under `name`, if any
    fn kind_of(&self, name: &str) -> Option<CallableKind> {
        if self.procedures.contains_key(name) {
            Some(CallableKind::Procedure)
        } else if self.functions.contains_key(name) {
            Some(CallableKind::Function)
        } else {
            None
        }
    }

    fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            definitions: self
                .procedures
                .values()
                .chain(self.functions.values())
                .cloned()
                .collect(),
        }
    }
}

/// Live registry of user-defined procedures and functions
pub struct Catalog {
    namespace: String,
    state: RwLock<CatalogState>,
    /// Serializes define/remove/reload
    writer: Mutex<()>,
    registry: Arc<dyn CallableNamespace>,
    store: DefinitionStore,
}

impl Catalog {
    /// Create an uninitialized catalog
    ///
    /// The catalog refuses mutations until a reload brings it to `Ready`.
    ///
    /// # Arguments
    /// * `namespace` - Prefix under which callables are registered
    /// * `store` - Durable home of the catalog blob
    /// * `registry` - Host namespace mirroring the live definitions
    pub fn new(
        namespace: impl Into<String>,
        store: DefinitionStore,
        registry: Arc<dyn CallableNamespace>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            state: RwLock::new(CatalogState::default()),
            writer: Mutex::new(()),
            registry,
            store,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn registry(&self) -> &Arc<dyn CallableNamespace> {
        &self.registry
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.state.read().lifecycle
    }

    /// Compile a request and define the result
    pub fn declare(
        &self,
        kind: CallableKind,
        request: &DefinitionRequest,
    ) -> CatalogResult<Arc<Definition>> {
        let definition = SignatureCompiler::compile(kind, request)?;
        self.define(definition)
    }

    /// Define or replace a callable
    ///
    /// # Returns
    /// * `Ok(Arc<Definition>)` with the live definition
    /// * `Err(CatalogError::NameConflict)` if the name belongs to the other kind
    /// * `Err(CatalogError::Persistence)` if the snapshot could not be written;
    ///   memory and registrations are unchanged
    /// * `Err(CatalogError::NotReady)` unless the catalog is `Ready`
    pub fn define(&self, definition: Definition) -> CatalogResult<Arc<Definition>> {
        let _writer = self.writer.lock();
        self.ensure_ready()?;

        let kind = definition.kind;
        let name = definition.name.clone();
        let definition = Arc::new(definition);

        let mut next = {
            let state = self.state.read();
            if let Some(existing) = state.kind_of(&name).filter(|k| *k != kind) {
                return Err(CatalogError::NameConflict { name, existing });
            }
            state.snapshot()
        };
        next.definitions.retain(|d| !(d.kind == kind && d.name == name));
        next.definitions.push(definition.clone());
        next.definitions.sort_by(|a, b| (a.kind, &a.name).cmp(&(b.kind, &b.name)));
        self.persist(&next)?;

        let qualified = qualify(&self.namespace, &name);
        {
            let mut state = self.state.write();
            let replaced = state
                .entries_mut(kind)
                .insert(name.clone(), definition.clone())
                .is_some();
            self.registry.register(&qualified, definition.clone());
            log::info!(
                "{} {} {}",
                if replaced { "Replaced" } else { "Defined" },
                kind,
                qualified
            );
        }
        Ok(definition)
    }

    /// Remove a callable
    pub fn remove(&self, kind: CallableKind, name: &str) -> CatalogResult<()> {
        let _writer = self.writer.lock();
        self.ensure_ready()?;

        let mut next = {
            let state = self.state.read();
            if !state.entries(kind).contains_key(name) {
                return Err(CatalogError::NotFound {
                    name: name.to_string(),
                    kind,
                });
            }
            state.snapshot()
        };
        next.definitions.retain(|d| !(d.kind == kind && d.name == name));
        self.persist(&next)?;

        let qualified = qualify(&self.namespace, name);
        {
            let mut state = self.state.write();
            state.entries_mut(kind).remove(name);
            self.registry.unregister(kind, &qualified);
        }
        log::info!("Removed {} {}", kind, qualified);
        Ok(())
    }

    /// Listing of all callables, procedures first, each ordered by name
    pub fn list(&self) -> Vec<CallableInfo> {
        let state = self.state.read();
        state
            .procedures
            .values()
            .chain(state.functions.values())
            .map(|d| CallableInfo::from_definition(d, &self.namespace))
            .collect()
    }

    /// Current full snapshot
    pub fn snapshot(&self) -> CatalogSnapshot {
        self.state.read().snapshot()
    }

    /// Live definition by unqualified name
    pub fn get(&self, kind: CallableKind, name: &str) -> Option<Arc<Definition>> {
        self.state.read().entries(kind).get(name).cloned()
    }

    /// Resolve a callable through the host namespace
    ///
    /// `name` may be given with or without the namespace prefix. Blocks while
    /// a reload is in progress.
    pub fn resolve(&self, kind: CallableKind, name: &str) -> CatalogResult<Arc<Definition>> {
        let state = self.state.read();
        if state.lifecycle != LifecycleState::Ready {
            return Err(CatalogError::NotReady(state.lifecycle));
        }
        self.registry
            .resolve(kind, &qualify(&self.namespace, name))
            .or_else(|| self.registry.resolve(kind, name))
            .ok_or_else(|| CatalogError::NotFound {
                name: name.to_string(),
                kind,
            })
    }

    /// Enter `Loading`: excludes writers and readers until the guard is finished
    ///
    /// The live set and the namespace registrations are cleared.
    pub(crate) fn begin_reload(&self) -> ReloadGuard<'_> {
        let writer = self.writer.lock();
        let mut state = self.state.write();
        state.lifecycle = LifecycleState::Loading;
        state.procedures.clear();
        state.functions.clear();
        self.registry.clear();
        ReloadGuard {
            catalog: self,
            _writer: writer,
            state,
        }
    }

    fn ensure_ready(&self) -> CatalogResult<()> {
        match self.state.read().lifecycle {
            LifecycleState::Ready => Ok(()),
            other => Err(CatalogError::NotReady(other)),
        }
    }

    fn persist(&self, snapshot: &CatalogSnapshot) -> CatalogResult<()> {
        let bytes = codec::encode(snapshot, &self.namespace)?;
        self.store.write(&bytes).map_err(|e| {
            log::error!("{}", e);
            CatalogError::from(e)
        })
    }
}

/// Exclusive access to the catalog for the duration of a reload
///
/// Dropping the guard without finishing leaves the catalog `Failed`.
pub(crate) struct ReloadGuard<'a> {
    catalog: &'a Catalog,
    _writer: MutexGuard<'a, ()>,
    state: RwLockWriteGuard<'a, CatalogState>,
}

impl ReloadGuard<'_> {
    pub(crate) fn read_blob(&self) -> Result<Option<Vec<u8>>, PersistenceFault> {
        self.catalog.store.read()
    }

    /// Register a reloaded definition, unless its name is already taken
    pub(crate) fn install(&mut self, definition: Definition) -> CatalogResult<()> {
        let name = definition.name.clone();
        if let Some(existing) = self.state.kind_of(&name) {
            return Err(CatalogError::NameConflict { name, existing });
        }
        let kind = definition.kind;
        let definition = Arc::new(definition);
        self.catalog
            .registry
            .register(&qualify(&self.catalog.namespace, &name), definition.clone());
        self.state.entries_mut(kind).insert(name, definition);
        Ok(())
    }

    pub(crate) fn finish(mut self, lifecycle: LifecycleState) {
        self.state.lifecycle = lifecycle;
    }
}

impl Drop for ReloadGuard<'_> {
    fn drop(&mut self) {
        if self.state.lifecycle == LifecycleState::Loading {
            self.state.procedures.clear();
            self.state.functions.clear();
            self.catalog.registry.clear();
            self.state.lifecycle = LifecycleState::Failed;
        }
    }
}
