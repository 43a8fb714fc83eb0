// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Callable Coordinator - Central orchestration for user-defined callables
//!
//! The CallableCoordinator provides a unified entry point that coordinates
//! storage, the catalog, its lifecycle and invocation.

pub mod callable_coordinator;

pub use callable_coordinator::CallableCoordinator;

// Re-export types needed for the public API
pub use crate::exec::{CallOutput, Row};
