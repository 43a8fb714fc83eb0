// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Value type system for callable arguments and results
//!
//! Mirrors the host engine's value domain:
//! - Scalars: Boolean, Integer, Float, String, Null
//! - Temporal: Date, DateTime
//! - Spatial: Point
//! - Collections: List, Map
//! - Graph entities: Node, Relationship, Path

use crate::storage::types::{Edge, Node};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Coordinate reference system id for 2D/3D cartesian points
pub const CARTESIAN_SRID: u32 = 7203;
/// Coordinate reference system id for geographic (WGS-84) points
pub const WGS84_SRID: u32 = 4326;

/// Spatial point value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub srid: u32,
}

impl Point {
    /// Create a 2D cartesian point
    pub fn cartesian(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            srid: CARTESIAN_SRID,
        }
    }

    /// Create a geographic point from longitude/latitude
    pub fn geographic(longitude: f64, latitude: f64) -> Self {
        Self {
            x: longitude,
            y: latitude,
            z: None,
            srid: WGS84_SRID,
        }
    }
}

/// Path element in a graph path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathElement {
    pub node_id: String,
    pub edge_id: Option<String>,
}

/// Path value representing a sequence of nodes and edges
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathValue {
    pub elements: Vec<PathElement>,
}

impl PathValue {
    /// Create a path from a list of elements
    pub fn from_elements(elements: Vec<PathElement>) -> Self {
        Self { elements }
    }

    /// Get the length of the path (number of edges)
    pub fn length(&self) -> usize {
        self.elements.iter().filter(|e| e.edge_id.is_some()).count()
    }
}

/// Runtime value exchanged with the query engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    Point(Point),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Node(Node),
    Relationship(Edge),
    Path(PathValue),
}

impl Value {
    /// Extract as integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract as float, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Extract as string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extract as boolean if possible
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract as list if possible
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Extract as map if possible
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Boolean(_) => "Boolean",
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Date(_) => "Date",
            Value::DateTime(_) => "DateTime",
            Value::Point(_) => "Point",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Node(_) => "Node",
            Value::Relationship(_) => "Relationship",
            Value::Path(_) => "Path",
        }
    }

    /// Convert to a JSON value for display and export
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => json!(b),
            Value::Integer(n) => json!(n),
            Value::Float(n) => json!(n),
            Value::String(s) => json!(s),
            Value::Date(d) => json!(d.format("%Y-%m-%d").to_string()),
            Value::DateTime(dt) => json!(dt.to_rfc3339()),
            Value::Point(p) => match p.z {
                Some(z) => json!({"x": p.x, "y": p.y, "z": z, "srid": p.srid}),
                None => json!({"x": p.x, "y": p.y, "srid": p.srid}),
            },
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::Node(node) => json!({"id": node.id, "labels": node.labels}),
            Value::Relationship(edge) => json!({
                "id": edge.id,
                "type": edge.label,
                "from": edge.from_node,
                "to": edge.to_node,
            }),
            Value::Path(path) => json!({"length": path.length()}),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::Point(p) => match p.z {
                Some(z) => write!(f, "POINT({} {} {}, srid={})", p.x, p.y, z, p.srid),
                None => write!(f, "POINT({} {}, srid={})", p.x, p.y, p.srid),
            },
            Value::List(list) => {
                write!(f, "[")?;
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Node(node) => write!(f, "NODE({}, [{}])", node.id, node.labels.join(", ")),
            Value::Relationship(edge) => write!(
                f,
                "EDGE({}, {}-[{}]->{})",
                edge.id, edge.from_node, edge.label, edge.to_node
            ),
            Value::Path(path) => {
                write!(f, "PATH[")?;
                for (i, element) in path.elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match &element.edge_id {
                        Some(edge_id) => write!(f, "({}, {})", element.node_id, edge_id)?,
                        None => write!(f, "{}", element.node_id)?,
                    }
                }
                write!(f, "]")
            }
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Point> for Value {
    fn from(p: Point) -> Self {
        Value::Point(p)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(vec: Vec<T>) -> Self {
        Value::List(vec.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}
