// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Boundary to the host query engine
//!
//! The catalog never interprets statements. At call time it hands the
//! stored statement, the bound parameters and the declared mode to a
//! [`QueryEngine`] and reshapes whatever rows come back.

use crate::catalog::Mode;
use crate::exec::result::Row;
use crate::storage::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Statement submitted to the engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineRequest {
    pub statement: String,
    pub parameters: BTreeMap<String, Value>,
    pub mode: Mode,
}

/// Errors raised by the host engine, surfaced unchanged to callers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Statement rejected: {0}")]
    Rejected(String),

    #[error("Write operation attempted in read-only mode")]
    WriteInReadOnly,

    #[error("Execution cancelled: {0}")]
    Cancelled(String),

    #[error("Execution failed: {0}")]
    Failed(String),
}

/// Host query engine
pub trait QueryEngine: Send + Sync {
    fn execute(&self, request: &EngineRequest) -> Result<Vec<Row>, EngineError>;
}

impl<F> QueryEngine for F
where
    F: Fn(&EngineRequest) -> Result<Vec<Row>, EngineError> + Send + Sync,
{
    fn execute(&self, request: &EngineRequest) -> Result<Vec<Row>, EngineError> {
        self(request)
    }
}

/// Engine for processes that administer the catalog without executing it
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedEngine;

impl QueryEngine for DetachedEngine {
    fn execute(&self, _request: &EngineRequest) -> Result<Vec<Row>, EngineError> {
        Err(EngineError::Rejected(
            "no query engine is attached to this catalog".to_string(),
        ))
    }
}
