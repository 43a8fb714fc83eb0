// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for the callable catalog

use super::codec::CodecError;
use super::definition::CallableKind;
use super::lifecycle::LifecycleState;
use super::signature::SignatureError;
use super::store::PersistenceFault;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Name '{name}' is already registered as a {existing}")]
    NameConflict { name: String, existing: CallableKind },

    #[error("No {kind} named '{name}'")]
    NotFound { name: String, kind: CallableKind },

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Persistence(#[from] PersistenceFault),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Catalog is not ready (state: {0})")]
    NotReady(LifecycleState),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
