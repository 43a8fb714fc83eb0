// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Callable definitions
//!
//! A [`Definition`] is the durable, typed description of one user-defined
//! procedure or function: the statement it runs, its mode, its input
//! parameters and its output shape.

use crate::storage::Value;
use crate::types::TypeTag;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Name of the implicit input that carries a parameter map
pub const IMPLICIT_PARAMS: &str = "params";

/// Kind of a callable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallableKind {
    /// Yields zero or more rows
    Procedure,
    /// Yields one value per call
    Function,
}

impl CallableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallableKind::Procedure => "procedure",
            CallableKind::Function => "function",
        }
    }
}

impl fmt::Display for CallableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallableKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "procedure" | "proc" => Ok(CallableKind::Procedure),
            "function" | "func" => Ok(CallableKind::Function),
            other => Err(format!("Unknown callable kind: {}", other)),
        }
    }
}

/// Access mode a callable's statement runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Read,
    Write,
}

impl Mode {
    /// Parse a mode token, case-insensitively
    pub fn parse(token: &str) -> Option<Mode> {
        match token.trim().to_lowercase().as_str() {
            "read" => Some(Mode::Read),
            "write" => Some(Mode::Write),
            _ => None,
        }
    }

    /// Lower-case token used in definition requests and persisted records
    pub fn as_token(&self) -> &'static str {
        match self {
            Mode::Read => "read",
            Mode::Write => "write",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Read => write!(f, "READ"),
            Mode::Write => write!(f, "WRITE"),
        }
    }
}

/// A parameter default: the literal as written and its typed value
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValue {
    pub literal: String,
    pub value: Value,
}

/// One declared input parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub type_tag: TypeTag,
    pub default: Option<DefaultValue>,
    /// Added by the compiler when no inputs were declared
    pub implicit: bool,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag,
            default: None,
            implicit: false,
        }
    }

    pub fn with_default(mut self, literal: impl Into<String>, value: Value) -> Self {
        self.default = Some(DefaultValue {
            literal: literal.into(),
            value,
        });
        self
    }

    /// The implicit `params :: MAP = {}` input
    pub fn implicit_map() -> Self {
        let mut spec = Self::new(IMPLICIT_PARAMS, TypeTag::Map)
            .with_default("{}", Value::Map(Default::default()));
        spec.implicit = true;
        spec
    }
}

/// One named output column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub type_tag: TypeTag,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag,
        }
    }
}

/// Declared output shape
#[derive(Debug, Clone, PartialEq)]
pub enum OutputSpec {
    /// Nothing declared; the shape is whatever the statement returns
    Inferred,
    /// A single value (functions only)
    Scalar(TypeTag),
    /// Named columns, in declared order
    Fields(Vec<FieldSpec>),
}

impl OutputSpec {
    pub fn is_inferred(&self) -> bool {
        matches!(self, OutputSpec::Inferred)
    }
}

/// A compiled callable definition
#[derive(Debug, Clone)]
pub struct Definition {
    pub name: String,
    pub kind: CallableKind,
    pub statement: String,
    pub mode: Mode,
    pub inputs: Vec<ParameterSpec>,
    pub output: OutputSpec,
    pub force_single: bool,
    pub description: Option<String>,
    /// Columns seen on first execution of an inferred-output callable
    observed: OnceCell<Vec<FieldSpec>>,
}

impl Definition {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        kind: CallableKind,
        statement: String,
        mode: Mode,
        inputs: Vec<ParameterSpec>,
        output: OutputSpec,
        force_single: bool,
        description: Option<String>,
    ) -> Self {
        Self {
            name,
            kind,
            statement,
            mode,
            inputs,
            output,
            force_single,
            description,
            observed: OnceCell::new(),
        }
    }

    /// Name under which the callable is registered in the host namespace
    pub fn qualified_name(&self, namespace: &str) -> String {
        qualify(namespace, &self.name)
    }

    /// Whether the caller's argument map is spread into the statement parameters
    ///
    /// Only the compiler-added map spreads; a declared `params :: MAP` input
    /// binds like any other parameter.
    pub fn spreads_parameter_map(&self) -> bool {
        matches!(self.inputs.as_slice(), [only] if only.implicit)
    }

    /// Output columns observed on first execution, if any
    pub fn observed_output(&self) -> Option<&[FieldSpec]> {
        self.observed.get().map(Vec::as_slice)
    }

    /// Record the observed output shape; only the first call has an effect
    pub(crate) fn record_observed(&self, fields: Vec<FieldSpec>) {
        if self.observed.set(fields).is_ok() {
            log::debug!("Recorded observed output shape for '{}'", self.name);
        }
    }

    /// Render the display signature
    pub fn signature(&self, namespace: &str) -> String {
        let inputs = self
            .inputs
            .iter()
            .map(|p| match &p.default {
                Some(default) => format!(
                    "{} :: {} = {}",
                    quote_name(&p.name),
                    p.type_tag,
                    default.literal
                ),
                None => format!("{} :: {}", quote_name(&p.name), p.type_tag),
            })
            .collect::<Vec<_>>()
            .join(", ");

        let name = self
            .qualified_name(namespace)
            .split('.')
            .map(quote_name)
            .collect::<Vec<_>>()
            .join(".");

        match &self.output {
            OutputSpec::Inferred => format!("{}({})", name, inputs),
            OutputSpec::Scalar(tag) => format!("{}({}) :: {}", name, inputs, tag),
            OutputSpec::Fields(fields) => format!(
                "{}({}) :: ({})",
                name,
                inputs,
                fields
                    .iter()
                    .map(|f| format!("{} :: {}", quote_name(&f.name), f.type_tag))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

impl PartialEq for Definition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.statement == other.statement
            && self.mode == other.mode
            && self.inputs == other.inputs
            && self.output == other.output
            && self.force_single == other.force_single
            && self.description == other.description
    }
}

pub(crate) fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}

fn quote_name(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("`{}`", name.replace('`', "``"))
    }
}

/// The full set of definitions at one instant; the unit of persistence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    /// Procedures first, then functions, each ordered by name
    pub definitions: Vec<Arc<Definition>>,
}

impl CatalogSnapshot {
    pub fn procedures(&self) -> impl Iterator<Item = &Arc<Definition>> {
        self.of_kind(CallableKind::Procedure)
    }

    pub fn functions(&self) -> impl Iterator<Item = &Arc<Definition>> {
        self.of_kind(CallableKind::Function)
    }

    fn of_kind(&self, kind: CallableKind) -> impl Iterator<Item = &Arc<Definition>> {
        self.definitions.iter().filter(move |d| d.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Listing entry for one callable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallableInfo {
    pub name: String,
    pub qualified_name: String,
    pub kind: CallableKind,
    pub mode: Mode,
    pub signature: String,
    /// `(name, type)` per input, in declared order
    pub inputs: Vec<(String, String)>,
    /// `(name, type)` per output column; a scalar result is named after the callable
    pub outputs: Vec<(String, String)>,
    /// Whether `outputs` was observed at runtime rather than declared
    pub inferred: bool,
    pub description: Option<String>,
}

impl CallableInfo {
    pub fn from_definition(definition: &Definition, namespace: &str) -> Self {
        let describe = |fields: &[FieldSpec]| {
            fields
                .iter()
                .map(|f| (f.name.clone(), f.type_tag.to_string()))
                .collect::<Vec<_>>()
        };
        let outputs = match &definition.output {
            OutputSpec::Inferred => definition.observed_output().map(describe).unwrap_or_default(),
            OutputSpec::Scalar(tag) => vec![(definition.name.clone(), tag.to_string())],
            OutputSpec::Fields(fields) => describe(fields),
        };

        Self {
            name: definition.name.clone(),
            qualified_name: definition.qualified_name(namespace),
            kind: definition.kind,
            mode: definition.mode,
            signature: definition.signature(namespace),
            inputs: definition
                .inputs
                .iter()
                .map(|p| (p.name.clone(), p.type_tag.to_string()))
                .collect(),
            outputs,
            inferred: definition.output.is_inferred(),
            description: definition.description.clone(),
        }
    }
}
