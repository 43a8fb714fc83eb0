// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog of user-defined procedures and functions
//!
//! Definition requests are compiled into typed definitions, persisted as a
//! single blob in the database's catalog tree, and mirrored into the host
//! callable namespace. On restart the blob is read back and each record is
//! recompiled independently, so one bad record never takes the rest down.

pub mod codec;
pub mod definition;
pub mod error;
pub mod lifecycle;
pub mod manager;
pub mod registry;
pub mod signature;
pub mod store;
pub mod traits;

pub use codec::{CodecError, DecodeOutcome, DecodedRecord, RecordFields};
pub use definition::{
    CallableInfo, CallableKind, CatalogSnapshot, DefaultValue, Definition, FieldSpec, Mode,
    OutputSpec, ParameterSpec, IMPLICIT_PARAMS,
};
pub use error::{CatalogError, CatalogResult};
pub use lifecycle::{DegradedRecord, DroppedRecord, LifecycleManager, LifecycleState, ReloadReport};
pub use manager::Catalog;
pub use registry::NamespaceRegistry;
pub use signature::{
    parse_signature, DefinitionRequest, InputDeclaration, OutputDeclaration, ParsedSignature,
    SignatureCompiler, SignatureError,
};
pub use store::{DefinitionStore, PersistenceFault};
pub use traits::CallableNamespace;
