// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Default in-process callable namespace

use super::definition::{CallableKind, Definition};
use super::traits::CallableNamespace;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Namespace registry keyed by kind and qualified name
#[derive(Default)]
pub struct NamespaceRegistry {
    entries: RwLock<HashMap<(CallableKind, String), Arc<Definition>>>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl CallableNamespace for NamespaceRegistry {
    fn register(&self, qualified_name: &str, definition: Arc<Definition>) {
        let key = (definition.kind, qualified_name.to_string());
        if self.entries.write().insert(key, definition).is_some() {
            log::debug!("Replaced registration: {}", qualified_name);
        } else {
            log::debug!("Registered callable: {}", qualified_name);
        }
    }

    fn unregister(&self, kind: CallableKind, qualified_name: &str) -> Option<Arc<Definition>> {
        self.entries
            .write()
            .remove(&(kind, qualified_name.to_string()))
    }

    fn clear(&self) {
        self.entries.write().clear();
    }

    fn resolve(&self, kind: CallableKind, qualified_name: &str) -> Option<Arc<Definition>> {
        self.entries
            .read()
            .get(&(kind, qualified_name.to_string()))
            .cloned()
    }

    fn registered(&self) -> Vec<(CallableKind, String)> {
        let mut names: Vec<_> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }
}
