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

//! Domain attribute values and their declared types.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use graphmap_cypher::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Declared type of a domain attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainType {
    /// `bool`
    Bool,
    /// 8-bit signed integer.
    Byte,
    /// 16-bit signed integer.
    Short,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Single character.
    Char,
    /// Text.
    String,
    /// Byte array.
    Bytes,
    /// UUID.
    Uuid,
    /// Enumeration with the given constant names.
    Enum {
        /// Enumeration type name.
        name: String,
        /// Constant names; an empty list accepts any name.
        constants: Vec<String>,
    },
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time without zone.
    LocalDateTime,
    /// Date and time with a fixed offset.
    DateTime,
    /// Point on the UTC time line.
    Instant,
    /// Spatial point.
    Point,
    /// Homogeneous list.
    List(Box<DomainType>),
    /// Value object stored through a registered converter.
    Custom(String),
    /// Reference to another entity type (an association).
    Entity(String),
}

impl DomainType {
    /// `List(element)`
    pub fn list_of(element: DomainType) -> Self {
        DomainType::List(Box::new(element))
    }

    /// `Enum` with the given constants.
    pub fn enumeration<S: Into<String>>(
        name: impl Into<String>,
        constants: impl IntoIterator<Item = S>,
    ) -> Self {
        DomainType::Enum {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    /// Target entity type of an association, and whether it is a collection.
    pub fn association_target(&self) -> Option<(&str, bool)> {
        match self {
            DomainType::Entity(name) => Some((name, false)),
            DomainType::List(inner) => match inner.as_ref() {
                DomainType::Entity(name) => Some((name, true)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Short name used in error messages.
    pub fn name(&self) -> String {
        match self {
            DomainType::Bool => "bool".to_string(),
            DomainType::Byte => "byte".to_string(),
            DomainType::Short => "short".to_string(),
            DomainType::Int => "int".to_string(),
            DomainType::Long => "long".to_string(),
            DomainType::Float => "float".to_string(),
            DomainType::Double => "double".to_string(),
            DomainType::Char => "char".to_string(),
            DomainType::String => "string".to_string(),
            DomainType::Bytes => "bytes".to_string(),
            DomainType::Uuid => "uuid".to_string(),
            DomainType::Enum { name, .. } => name.clone(),
            DomainType::Date => "date".to_string(),
            DomainType::Time => "time".to_string(),
            DomainType::LocalDateTime => "local date-time".to_string(),
            DomainType::DateTime => "date-time".to_string(),
            DomainType::Instant => "instant".to_string(),
            DomainType::Point => "point".to_string(),
            DomainType::List(inner) => format!("list of {}", inner.name()),
            DomainType::Custom(name) | DomainType::Entity(name) => name.clone(),
        }
    }
}

/// Value of a domain attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainValue {
    /// Absent value.
    Null,
    /// Boolean.
    Bool(bool),
    /// 8-bit integer.
    Byte(i8),
    /// 16-bit integer.
    Short(i16),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Character.
    Char(char),
    /// Text.
    String(String),
    /// Byte array.
    Bytes(Vec<u8>),
    /// UUID.
    Uuid(Uuid),
    /// Enumeration constant, by name.
    Enum(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// Date and time without zone.
    LocalDateTime(NaiveDateTime),
    /// Date and time with offset.
    DateTime(DateTime<FixedOffset>),
    /// UTC instant.
    Instant(DateTime<Utc>),
    /// Spatial point.
    Point(Point),
    /// List of values.
    List(Vec<DomainValue>),
    /// Value object, converted by a user converter.
    Object {
        /// Value object type name.
        type_name: String,
        /// Field values.
        fields: BTreeMap<String, DomainValue>,
    },
}

impl DomainValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, DomainValue::Null)
    }

    /// Widen any integer variant to `i64`.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            DomainValue::Byte(v) => Some(i64::from(*v)),
            DomainValue::Short(v) => Some(i64::from(*v)),
            DomainValue::Int(v) => Some(i64::from(*v)),
            DomainValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Borrow as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DomainValue::String(s) | DomainValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Variant name for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainValue::Null => "null",
            DomainValue::Bool(_) => "bool",
            DomainValue::Byte(_) => "byte",
            DomainValue::Short(_) => "short",
            DomainValue::Int(_) => "int",
            DomainValue::Long(_) => "long",
            DomainValue::Float(_) => "float",
            DomainValue::Double(_) => "double",
            DomainValue::Char(_) => "char",
            DomainValue::String(_) => "string",
            DomainValue::Bytes(_) => "bytes",
            DomainValue::Uuid(_) => "uuid",
            DomainValue::Enum(_) => "enum",
            DomainValue::Date(_) => "date",
            DomainValue::Time(_) => "time",
            DomainValue::LocalDateTime(_) => "local date-time",
            DomainValue::DateTime(_) => "date-time",
            DomainValue::Instant(_) => "instant",
            DomainValue::Point(_) => "point",
            DomainValue::List(_) => "list",
            DomainValue::Object { .. } => "object",
        }
    }
}

impl fmt::Display for DomainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainValue::Null => write!(f, "null"),
            DomainValue::Bool(v) => write!(f, "{}", v),
            DomainValue::Byte(v) => write!(f, "{}", v),
            DomainValue::Short(v) => write!(f, "{}", v),
            DomainValue::Int(v) => write!(f, "{}", v),
            DomainValue::Long(v) => write!(f, "{}", v),
            DomainValue::Float(v) => write!(f, "{}", v),
            DomainValue::Double(v) => write!(f, "{}", v),
            DomainValue::Char(v) => write!(f, "{}", v),
            DomainValue::String(v) | DomainValue::Enum(v) => write!(f, "{}", v),
            DomainValue::Bytes(v) => write!(f, "{:?}", v),
            DomainValue::Uuid(v) => write!(f, "{}", v),
            DomainValue::Date(v) => write!(f, "{}", v),
            DomainValue::Time(v) => write!(f, "{}", v),
            DomainValue::LocalDateTime(v) => write!(f, "{}", v),
            DomainValue::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            DomainValue::Instant(v) => write!(f, "{}", v.to_rfc3339()),
            DomainValue::Point(p) => write!(f, "point({}, {}, {})", p.srid, p.x, p.y),
            DomainValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            DomainValue::Object { type_name, .. } => write!(f, "{} {{..}}", type_name),
        }
    }
}

macro_rules! impl_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for DomainValue {
                fn from(v: $source) -> Self {
                    DomainValue::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
    String => String,
    Vec<u8> => Bytes,
    Uuid => Uuid,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => LocalDateTime,
    DateTime<FixedOffset> => DateTime,
    DateTime<Utc> => Instant,
    Point => Point,
}

impl From<&str> for DomainValue {
    fn from(v: &str) -> Self {
        DomainValue::String(v.to_string())
    }
}

impl<T: Into<DomainValue>> From<Option<T>> for DomainValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(DomainValue::Null, Into::into)
    }
}
