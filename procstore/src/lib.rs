// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! procstore - durable user-defined procedures and functions
//!
//! procstore lets users define callables whose behaviour is a parameterized
//! query statement, give them typed signatures, and keep them registered in
//! a host engine across restarts.
//!
//! # Features
//!
//! - **Typed Signatures**: Lenient type tokens (`"int"`, `"list of any"`) with
//!   typed parameter defaults
//! - **Durable Catalog**: The whole catalog persists as one blob in the
//!   database's catalog tree (Sled or in-memory)
//! - **Resilient Reload**: Each persisted record is revalidated on its own;
//!   corrupt records are dropped, the rest load
//! - **Invocation**: Argument binding, coercion and result reshaping around a
//!   pluggable query engine
//!
//! # Usage
//!
//! ```bash
//! # Define a function
//! procstore define-function --path ./mydb answer "RETURN 42 AS answer"
//!
//! # List callables
//! procstore list --path ./mydb
//! ```

// Public modules - exposed to external users
pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod exec;
pub mod storage;
pub mod types;

// Re-export the public API
pub use catalog::{
    CallableInfo, CallableKind, CatalogError, DefinitionRequest, InputDeclaration,
    LifecycleState, ReloadReport,
};
pub use config::CatalogConfig;
pub use coordinator::{CallOutput, CallableCoordinator, Row};
pub use exec::{
    Arguments, EngineError, EngineRequest, InvocationContext, InvocationError, QueryEngine,
};

// Re-export Value type (needed for arguments and results)
pub use storage::Value;

/// procstore version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// procstore crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
