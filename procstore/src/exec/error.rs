// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Invocation error types

use crate::catalog::{CallableKind, LifecycleState};
use crate::exec::engine::EngineError;
use crate::types::TypeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvocationError {
    #[error("Unknown {kind} '{name}'")]
    UnknownCallable { name: String, kind: CallableKind },

    #[error("Missing argument '{parameter}' for '{callable}'")]
    MissingArgument { callable: String, parameter: String },

    #[error("Type mismatch for '{parameter}' of '{callable}': {source}")]
    TypeMismatch {
        callable: String,
        parameter: String,
        #[source]
        source: TypeError,
    },

    #[error("'{callable}' writes and cannot run in a read-only context")]
    WriteInReadContext { callable: String },

    #[error("'{callable}' takes {expected} arguments, got {actual}")]
    TooManyArguments {
        callable: String,
        expected: usize,
        actual: usize,
    },

    #[error("'{callable}' has no parameter '{argument}'")]
    UnexpectedArgument { callable: String, argument: String },

    #[error(transparent)]
    Engine(EngineError),

    #[error("Catalog is not ready (state: {0})")]
    NotReady(LifecycleState),
}
