// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Value coercion into declared types
//!
//! Implicit rules only: integer widening to float, integers and floats as
//! numbers, dates promoted to datetimes at midnight UTC. Narrowing (float to
//! integer) is never attempted.

use crate::storage::Value;
use crate::types::{TypeError, TypeResult, TypeTag};
use chrono::{FixedOffset, TimeZone};

/// Type coercion engine
#[derive(Debug)]
pub struct TypeCoercion;

impl TypeCoercion {
    /// Coerce a runtime value into the target type
    pub fn coerce(value: Value, target: &TypeTag) -> TypeResult<Value> {
        match (value, target) {
            // Null is a member of every type
            (Value::Null, _) => Ok(Value::Null),
            (value, TypeTag::Any) => Ok(value),

            (value @ Value::Boolean(_), TypeTag::Boolean) => Ok(value),
            (value @ Value::Integer(_), TypeTag::Integer) => Ok(value),
            (value @ Value::Float(_), TypeTag::Float) => Ok(value),
            (value @ Value::String(_), TypeTag::String) => Ok(value),
            (value @ Value::Map(_), TypeTag::Map) => Ok(value),
            (value @ Value::Node(_), TypeTag::Node) => Ok(value),
            (value @ Value::Relationship(_), TypeTag::Relationship) => Ok(value),
            (value @ Value::Path(_), TypeTag::Path) => Ok(value),
            (value @ Value::Date(_), TypeTag::Date) => Ok(value),
            (value @ Value::DateTime(_), TypeTag::DateTime) => Ok(value),
            (value @ Value::Point(_), TypeTag::Point) => Ok(value),

            // Numeric widening
            (Value::Integer(n), TypeTag::Float) => Ok(Value::Float(n as f64)),
            (value @ (Value::Integer(_) | Value::Float(_)), TypeTag::Number) => Ok(value),

            // Temporal promotion
            (Value::Date(d), TypeTag::DateTime) => {
                let utc = FixedOffset::east_opt(0).ok_or_else(|| TypeError::TypeMismatch {
                    expected: TypeTag::DateTime,
                    actual: "Date".to_string(),
                })?;
                let midnight = d.and_hms_opt(0, 0, 0).ok_or_else(|| TypeError::TypeMismatch {
                    expected: TypeTag::DateTime,
                    actual: "Date".to_string(),
                })?;
                utc.from_local_datetime(&midnight)
                    .single()
                    .map(Value::DateTime)
                    .ok_or_else(|| TypeError::TypeMismatch {
                        expected: TypeTag::DateTime,
                        actual: "Date".to_string(),
                    })
            }

            (Value::List(items), TypeTag::ListOf(element)) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    Self::coerce(item, element).map_err(|e| TypeError::ElementMismatch {
                        index,
                        source: Box::new(e),
                    })
                })
                .collect::<TypeResult<Vec<_>>>()
                .map(Value::List),

            (value, target) => Err(TypeError::TypeMismatch {
                expected: target.clone(),
                actual: value.type_name().to_string(),
            }),
        }
    }

    /// Check whether a value would coerce without producing it
    pub fn is_compatible(value: &Value, target: &TypeTag) -> bool {
        Self::coerce(value.clone(), target).is_ok()
    }
}
