// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Type inference for runtime values

use crate::storage::Value;
use crate::types::TypeTag;

impl TypeTag {
    /// Infer the tag of a runtime value
    ///
    /// Lists infer their element type from the elements when they agree,
    /// `LIST OF ANY` otherwise.
    pub fn of(value: &Value) -> TypeTag {
        match value {
            Value::Null => TypeTag::Any,
            Value::Boolean(_) => TypeTag::Boolean,
            Value::Integer(_) => TypeTag::Integer,
            Value::Float(_) => TypeTag::Float,
            Value::String(_) => TypeTag::String,
            Value::Date(_) => TypeTag::Date,
            Value::DateTime(_) => TypeTag::DateTime,
            Value::Point(_) => TypeTag::Point,
            Value::Map(_) => TypeTag::Map,
            Value::Node(_) => TypeTag::Node,
            Value::Relationship(_) => TypeTag::Relationship,
            Value::Path(_) => TypeTag::Path,
            Value::List(items) => {
                let mut element = None;
                for item in items.iter().filter(|v| !v.is_null()) {
                    let tag = TypeTag::of(item);
                    match &element {
                        None => element = Some(tag),
                        Some(seen) if *seen == tag => {}
                        Some(seen) => {
                            element = Some(Self::common_supertype(seen, &tag));
                        }
                    }
                }
                TypeTag::ListOf(Box::new(element.unwrap_or(TypeTag::Any)))
            }
        }
    }

    fn common_supertype(left: &TypeTag, right: &TypeTag) -> TypeTag {
        match (left, right) {
            (TypeTag::Integer | TypeTag::Float | TypeTag::Number, TypeTag::Integer)
            | (TypeTag::Integer | TypeTag::Float | TypeTag::Number, TypeTag::Float)
            | (TypeTag::Integer | TypeTag::Float | TypeTag::Number, TypeTag::Number) => {
                TypeTag::Number
            }
            _ => TypeTag::Any,
        }
    }
}
