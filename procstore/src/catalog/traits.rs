// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Host callable namespace
//!
//! The catalog mirrors every live definition into a namespace that the host
//! engine resolves calls against. Implementations use interior mutability:
//! the catalog calls them while holding its own write lock, so they are never
//! mutated concurrently by two catalog writers.

use super::definition::{CallableKind, Definition};
use std::sync::Arc;

/// Registrations of callables visible to the host engine
pub trait CallableNamespace: Send + Sync {
    /// Install or replace the registration for `qualified_name`
    fn register(&self, qualified_name: &str, definition: Arc<Definition>);

    /// Remove a registration, returning what was registered
    fn unregister(&self, kind: CallableKind, qualified_name: &str) -> Option<Arc<Definition>>;

    /// Remove every registration
    fn clear(&self);

    /// Look up a registration
    fn resolve(&self, kind: CallableKind, qualified_name: &str) -> Option<Arc<Definition>>;

    /// All registrations, ordered by kind then name
    fn registered(&self) -> Vec<(CallableKind, String)>;
}
