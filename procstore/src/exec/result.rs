// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result rows and call outputs

use crate::storage::Value;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Single result row: named values plus their column order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Column names in result order
    pub columns: Vec<String>,
    /// Named values (e.g., "answer" -> 42)
    pub values: HashMap<String, Value>,
}

impl Row {
    /// Create a new empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row from ordered `(column, value)` pairs
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut row = Self::new();
        for (name, value) in pairs {
            row.add_value(name.into(), value);
        }
        row
    }

    /// Add or replace a column
    pub fn add_value(&mut self, name: String, value: Value) {
        if !self.values.contains_key(&name) {
            self.columns.push(name.clone());
        }
        self.values.insert(name, value);
    }

    /// Get a value by column name
    pub fn get_value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Get a value by column position
    pub fn get_value_at_position(&self, position: usize) -> Option<&Value> {
        self.columns
            .get(position)
            .and_then(|name| self.values.get(name))
    }

    /// Ordered `(column, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .filter_map(|name| self.values.get(name).map(|v| (name.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The row as a map value
    pub fn into_map(self) -> Value {
        Value::Map(self.values.into_iter().collect::<BTreeMap<_, _>>())
    }

    /// Value of the first column, `Null` for an empty row
    pub fn into_first(mut self) -> Value {
        self.columns
            .first()
            .and_then(|name| self.values.remove(name))
            .unwrap_or(Value::Null)
    }

    /// Take a named column, `None` if absent
    pub fn take(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }
}

/// Result of invoking a callable
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutput {
    /// Procedure rows
    Rows(Vec<Row>),
    /// Function value
    Value(Value),
}

impl CallOutput {
    pub fn into_rows(self) -> Option<Vec<Row>> {
        match self {
            CallOutput::Rows(rows) => Some(rows),
            CallOutput::Value(_) => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            CallOutput::Value(value) => Some(value),
            CallOutput::Rows(_) => None,
        }
    }
}
