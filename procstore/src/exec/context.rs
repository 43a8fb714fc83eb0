// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Invocation context and caller arguments

use crate::storage::Value;
use std::collections::BTreeMap;

/// Access mode of the calling transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    ReadOnly,
    #[default]
    ReadWrite,
}

/// Context the host supplies with each invocation
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
    pub access_mode: AccessMode,
}

impl InvocationContext {
    pub fn read_only() -> Self {
        Self {
            access_mode: AccessMode::ReadOnly,
        }
    }

    pub fn read_write() -> Self {
        Self {
            access_mode: AccessMode::ReadWrite,
        }
    }
}

/// Caller-supplied arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Arguments {
    Positional(Vec<Value>),
    Named(BTreeMap<String, Value>),
}

impl Arguments {
    /// No arguments at all
    pub fn none() -> Self {
        Arguments::Positional(Vec::new())
    }

    /// Named arguments from `(name, value)` pairs
    pub fn named<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Arguments::Named(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Default for Arguments {
    fn default() -> Self {
        Self::none()
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(values: Vec<Value>) -> Self {
        Arguments::Positional(values)
    }
}

impl From<BTreeMap<String, Value>> for Arguments {
    fn from(values: BTreeMap<String, Value>) -> Self {
        Arguments::Named(values)
    }
}
