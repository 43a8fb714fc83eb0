// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Callable invocation
//!
//! This module binds caller arguments to stored signatures, hands the stored
//! statement to the host query engine and reshapes the rows it returns.

pub mod context;
pub mod engine;
pub mod error;
pub mod invoker;
pub mod result;

// Re-export the main types for convenience
pub use context::{AccessMode, Arguments, InvocationContext};
pub use engine::{DetachedEngine, EngineError, EngineRequest, QueryEngine};
pub use error::InvocationError;
pub use invoker::Invoker;
pub use result::{CallOutput, Row};
