// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Type vocabulary for callable signatures
//!
//! Translates the external type tokens used in definitions (`"int"`,
//! `"list of any"`, `"map"`, `"date"`) into [`TypeTag`]s, coerces runtime
//! values into declared types, and parses literal syntax for parameter
//! defaults.

pub mod coercion;
pub mod inference;
pub mod literal;

use std::fmt;
use thiserror::Error;

pub use self::coercion::TypeCoercion;
pub use self::literal::{parse_default, parse_literal, parse_literal_prefix};

/// Closed set of types mirroring the engine's value domain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Any,
    Boolean,
    Integer,
    Float,
    String,
    Number,
    Map,
    ListOf(Box<TypeTag>),
    Node,
    Relationship,
    Path,
    Date,
    DateTime,
    Point,
}

impl TypeTag {
    /// Parse an external type token
    ///
    /// Total: unrecognized tokens fall back to [`TypeTag::Any`].
    pub fn parse(token: &str) -> TypeTag {
        let normalized = token
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let normalized = normalized.trim_end_matches('?').trim_end();

        if let Some(inner) = normalized
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            return TypeTag::ListOf(Box::new(TypeTag::parse(inner)));
        }
        if normalized == "list" {
            return TypeTag::ListOf(Box::new(TypeTag::Any));
        }
        if let Some(rest) = normalized.strip_prefix("list ") {
            let inner = rest.strip_prefix("of ").unwrap_or(rest);
            return TypeTag::ListOf(Box::new(TypeTag::parse(inner)));
        }

        match normalized {
            "bool" | "boolean" => TypeTag::Boolean,
            "int" | "integer" | "long" => TypeTag::Integer,
            "float" | "double" => TypeTag::Float,
            "string" | "str" | "text" => TypeTag::String,
            "number" | "numeric" => TypeTag::Number,
            "map" => TypeTag::Map,
            "node" => TypeTag::Node,
            "rel" | "relationship" | "edge" => TypeTag::Relationship,
            "path" => TypeTag::Path,
            "date" => TypeTag::Date,
            "datetime" | "localdatetime" | "zoneddatetime" => TypeTag::DateTime,
            "point" => TypeTag::Point,
            "any" => TypeTag::Any,
            other => {
                log::debug!("Unrecognized type token '{}', treating as ANY", other);
                TypeTag::Any
            }
        }
    }

    /// Whether a value of this type may carry several values at once
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, TypeTag::Any | TypeTag::ListOf(_))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Any => write!(f, "ANY"),
            TypeTag::Boolean => write!(f, "BOOLEAN"),
            TypeTag::Integer => write!(f, "INTEGER"),
            TypeTag::Float => write!(f, "FLOAT"),
            TypeTag::String => write!(f, "STRING"),
            TypeTag::Number => write!(f, "NUMBER"),
            TypeTag::Map => write!(f, "MAP"),
            TypeTag::ListOf(inner) => write!(f, "LIST OF {}", inner),
            TypeTag::Node => write!(f, "NODE"),
            TypeTag::Relationship => write!(f, "RELATIONSHIP"),
            TypeTag::Path => write!(f, "PATH"),
            TypeTag::Date => write!(f, "DATE"),
            TypeTag::DateTime => write!(f, "DATETIME"),
            TypeTag::Point => write!(f, "POINT"),
        }
    }
}

/// Type error for coercion and literal parsing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeError {
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: TypeTag, actual: String },

    #[error("Element {index} of list: {source}")]
    ElementMismatch {
        index: usize,
        #[source]
        source: Box<TypeError>,
    },

    #[error("Invalid literal '{literal}': {reason}")]
    InvalidLiteral { literal: String, reason: String },
}

/// Result type for type system operations
pub type TypeResult<T> = Result<T, TypeError>;
