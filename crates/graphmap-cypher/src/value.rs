// Graphmap - Object graph mapping for property graph databases
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Native graph values.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::escape::{escape_name, quote_string};

/// A spatial point as stored by the database.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Coordinate reference system id (4326 = WGS-84, 7203 = cartesian).
    pub srid: u32,
    /// x coordinate (longitude for geographic points).
    pub x: f64,
    /// y coordinate (latitude for geographic points).
    pub y: f64,
    /// Optional z coordinate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Point {
    /// Create a two-dimensional point.
    pub fn new(srid: u32, x: f64, y: f64) -> Self {
        Self { srid, x, y, z: None }
    }

    /// Create a three-dimensional point.
    pub fn new_3d(srid: u32, x: f64, y: f64, z: f64) -> Self {
        Self {
            srid,
            x,
            y,
            z: Some(z),
        }
    }
}

/// A Cypher value: a parameter, a literal, or a property read from a record.
///
/// Temporal variants serialize to their ISO-8601 text, so they do not survive
/// a serde round trip as their own variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CypherValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// String value.
    String(String),
    /// List value.
    List(Vec<CypherValue>),
    /// Map/object value.
    Map(BTreeMap<String, CypherValue>),
    /// Byte array.
    Bytes(Vec<u8>),
    /// Date without time zone.
    Date(NaiveDate),
    /// Time without time zone.
    LocalTime(NaiveTime),
    /// Date and time without time zone.
    LocalDateTime(NaiveDateTime),
    /// Date and time with a fixed offset.
    DateTime(DateTime<FixedOffset>),
    /// Spatial point.
    Point(Point),
}

impl From<bool> for CypherValue {
    fn from(v: bool) -> Self {
        CypherValue::Bool(v)
    }
}

impl From<i64> for CypherValue {
    fn from(v: i64) -> Self {
        CypherValue::Int(v)
    }
}

impl From<i32> for CypherValue {
    fn from(v: i32) -> Self {
        CypherValue::Int(v as i64)
    }
}

impl From<f64> for CypherValue {
    fn from(v: f64) -> Self {
        CypherValue::Float(v)
    }
}

impl From<String> for CypherValue {
    fn from(v: String) -> Self {
        CypherValue::String(v)
    }
}

impl From<&str> for CypherValue {
    fn from(v: &str) -> Self {
        CypherValue::String(v.to_string())
    }
}

impl From<NaiveDate> for CypherValue {
    fn from(v: NaiveDate) -> Self {
        CypherValue::Date(v)
    }
}

impl From<NaiveDateTime> for CypherValue {
    fn from(v: NaiveDateTime) -> Self {
        CypherValue::LocalDateTime(v)
    }
}

impl From<DateTime<FixedOffset>> for CypherValue {
    fn from(v: DateTime<FixedOffset>) -> Self {
        CypherValue::DateTime(v)
    }
}

impl From<Point> for CypherValue {
    fn from(v: Point) -> Self {
        CypherValue::Point(v)
    }
}

impl From<BTreeMap<String, CypherValue>> for CypherValue {
    fn from(v: BTreeMap<String, CypherValue>) -> Self {
        CypherValue::Map(v)
    }
}

impl<T: Into<CypherValue>> From<Vec<T>> for CypherValue {
    fn from(v: Vec<T>) -> Self {
        CypherValue::List(v.into_iter().map(|x| x.into()).collect())
    }
}

impl<T: Into<CypherValue>> From<Option<T>> for CypherValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(x) => x.into(),
            None => CypherValue::Null,
        }
    }
}

fn float_literal(f: f64) -> String {
    if f.is_nan() {
        "0.0/0.0".to_string()
    } else if f.is_infinite() {
        if f > 0.0 {
            "1.0/0.0".to_string()
        } else {
            "-1.0/0.0".to_string()
        }
    } else {
        let s = f.to_string();
        if s.contains('.') || s.contains('e') || s.contains('E') {
            s
        } else {
            format!("{}.0", s)
        }
    }
}

impl CypherValue {
    /// Wrap raw bytes. `Vec<u8>` has no `From` impl because it would be
    /// ambiguous with a list of integers.
    pub fn bytes(v: impl Into<Vec<u8>>) -> Self {
        CypherValue::Bytes(v.into())
    }

    /// Convert to Cypher literal syntax.
    pub fn to_cypher_literal(&self) -> String {
        match self {
            CypherValue::Null => "null".to_string(),
            CypherValue::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            CypherValue::Int(i) => i.to_string(),
            CypherValue::Float(f) => float_literal(*f),
            CypherValue::String(s) => quote_string(s),
            CypherValue::List(items) => {
                let inner: Vec<String> = items.iter().map(|v| v.to_cypher_literal()).collect();
                format!("[{}]", inner.join(", "))
            }
            CypherValue::Map(map) => {
                let pairs: Vec<String> = map
                    .iter()
                    .map(|(k, v)| format!("{}: {}", escape_name(k), v.to_cypher_literal()))
                    .collect();
                format!("{{{}}}", pairs.join(", "))
            }
            CypherValue::Bytes(bytes) => {
                let inner: Vec<String> = bytes.iter().map(|b| (*b as i8).to_string()).collect();
                format!("[{}]", inner.join(", "))
            }
            CypherValue::Date(d) => format!("date('{}')", d.format("%Y-%m-%d")),
            CypherValue::LocalTime(t) => format!("localtime('{}')", t.format("%H:%M:%S%.f")),
            CypherValue::LocalDateTime(dt) => {
                format!("localdatetime('{}')", dt.format("%Y-%m-%dT%H:%M:%S%.f"))
            }
            CypherValue::DateTime(dt) => format!("datetime('{}')", dt.to_rfc3339()),
            CypherValue::Point(p) => match p.z {
                Some(z) => format!(
                    "point({{srid: {}, x: {}, y: {}, z: {}}})",
                    p.srid,
                    float_literal(p.x),
                    float_literal(p.y),
                    float_literal(z)
                ),
                None => format!(
                    "point({{srid: {}, x: {}, y: {}}})",
                    p.srid,
                    float_literal(p.x),
                    float_literal(p.y)
                ),
            },
        }
    }

    /// Short name of the value's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            CypherValue::Null => "null",
            CypherValue::Bool(_) => "boolean",
            CypherValue::Int(_) => "integer",
            CypherValue::Float(_) => "float",
            CypherValue::String(_) => "string",
            CypherValue::List(_) => "list",
            CypherValue::Map(_) => "map",
            CypherValue::Bytes(_) => "bytes",
            CypherValue::Date(_) => "date",
            CypherValue::LocalTime(_) => "localtime",
            CypherValue::LocalDateTime(_) => "localdatetime",
            CypherValue::DateTime(_) => "datetime",
            CypherValue::Point(_) => "point",
        }
    }

    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, CypherValue::Null)
    }

    /// Try to get as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CypherValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CypherValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CypherValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            CypherValue::Float(f) => Some(*f),
            CypherValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get as a list.
    pub fn as_list(&self) -> Option<&[CypherValue]> {
        match self {
            CypherValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get as a map.
    pub fn as_map(&self) -> Option<&BTreeMap<String, CypherValue>> {
        match self {
            CypherValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl fmt::Display for CypherValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cypher_literal())
    }
}
