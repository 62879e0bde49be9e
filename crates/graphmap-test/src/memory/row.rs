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

//! Bindings produced while a statement runs.

use graphmap_cypher::CypherValue;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A value bound to a variable during execution. Nodes and relationships are
/// held by id and resolved against the store only when a record is built.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Bound {
    Null,
    Value(CypherValue),
    Node(i64),
    Relationship(i64),
    List(Vec<Bound>),
}

/// Variables of one intermediate row.
pub(crate) type Row = BTreeMap<String, Bound>;

impl Bound {
    pub(crate) fn from_value(value: CypherValue) -> Self {
        match value {
            CypherValue::Null => Bound::Null,
            other => Bound::Value(other),
        }
    }

    pub(crate) fn is_null(&self) -> bool {
        matches!(self, Bound::Null | Bound::Value(CypherValue::Null))
    }

    /// Elements of a list binding or a list value.
    pub(crate) fn items(&self) -> Option<Vec<Bound>> {
        match self {
            Bound::List(items) => Some(items.clone()),
            Bound::Value(CypherValue::List(items)) => {
                Some(items.iter().cloned().map(Bound::from_value).collect())
            }
            _ => None,
        }
    }

    /// Null-aware equality: `None` when either side is null.
    pub(crate) fn equals(&self, other: &Bound) -> Option<bool> {
        if self.is_null() || other.is_null() {
            return None;
        }
        match (self, other) {
            (Bound::Node(a), Bound::Node(b)) => Some(a == b),
            (Bound::Relationship(a), Bound::Relationship(b)) => Some(a == b),
            (Bound::Value(a), Bound::Value(b)) => Some(values_equal(a, b)),
            _ => match (self.items(), other.items()) {
                (Some(a), Some(b)) => {
                    if a.len() != b.len() {
                        return Some(false);
                    }
                    let mut result = Some(true);
                    for (x, y) in a.iter().zip(b.iter()) {
                        match x.equals(y) {
                            Some(false) => return Some(false),
                            None => result = None,
                            Some(true) => {}
                        }
                    }
                    result
                }
                _ => Some(false),
            },
        }
    }

    /// Order of comparable values, `None` for nulls and mixed kinds.
    pub(crate) fn compare(&self, other: &Bound) -> Option<Ordering> {
        match (self, other) {
            (Bound::Value(a), Bound::Value(b)) => compare_values(a, b),
            (Bound::Node(a), Bound::Node(b)) => Some(a.cmp(b)),
            (Bound::Relationship(a), Bound::Relationship(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// The plain value, for writing into a property map.
    pub(crate) fn into_value(self) -> Option<CypherValue> {
        match self {
            Bound::Null => Some(CypherValue::Null),
            Bound::Value(v) => Some(v),
            Bound::List(items) => items
                .into_iter()
                .map(Bound::into_value)
                .collect::<Option<Vec<_>>>()
                .map(CypherValue::List),
            Bound::Node(_) | Bound::Relationship(_) => None,
        }
    }
}

fn values_equal(a: &CypherValue, b: &CypherValue) -> bool {
    match (a, b) {
        (CypherValue::Int(x), CypherValue::Float(y)) | (CypherValue::Float(y), CypherValue::Int(x)) => {
            (*x as f64) == *y
        }
        _ => a == b,
    }
}

fn compare_values(a: &CypherValue, b: &CypherValue) -> Option<Ordering> {
    match (a, b) {
        (CypherValue::Int(x), CypherValue::Int(y)) => Some(x.cmp(y)),
        (CypherValue::Float(x), CypherValue::Float(y)) => x.partial_cmp(y),
        (CypherValue::Int(x), CypherValue::Float(y)) => (*x as f64).partial_cmp(y),
        (CypherValue::Float(x), CypherValue::Int(y)) => x.partial_cmp(&(*y as f64)),
        (CypherValue::String(x), CypherValue::String(y)) => Some(x.cmp(y)),
        (CypherValue::Bool(x), CypherValue::Bool(y)) => Some(x.cmp(y)),
        (CypherValue::Date(x), CypherValue::Date(y)) => Some(x.cmp(y)),
        (CypherValue::LocalTime(x), CypherValue::LocalTime(y)) => Some(x.cmp(y)),
        (CypherValue::LocalDateTime(x), CypherValue::LocalDateTime(y)) => Some(x.cmp(y)),
        (CypherValue::DateTime(x), CypherValue::DateTime(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_equality_is_unknown() {
        assert_eq!(Bound::Null.equals(&Bound::Null), None);
        assert_eq!(
            Bound::Value(CypherValue::Int(1)).equals(&Bound::Value(CypherValue::Null)),
            None
        );
    }

    #[test]
    fn test_numeric_equality_crosses_kinds() {
        assert_eq!(
            Bound::Value(CypherValue::Int(2)).equals(&Bound::Value(CypherValue::Float(2.0))),
            Some(true)
        );
    }

    #[test]
    fn test_list_value_and_list_binding_compare() {
        let value = Bound::Value(CypherValue::List(vec![CypherValue::Int(1)]));
        let binding = Bound::List(vec![Bound::Value(CypherValue::Int(1))]);
        assert_eq!(value.equals(&binding), Some(true));
    }

    #[test]
    fn test_entities_do_not_become_values() {
        assert_eq!(Bound::Node(1).into_value(), None);
        assert_eq!(
            Bound::List(vec![Bound::Value(CypherValue::Int(3))]).into_value(),
            Some(CypherValue::List(vec![CypherValue::Int(3)]))
        );
    }
}
