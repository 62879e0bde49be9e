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

//! Result records, the minimal driver surface.

use graphmap_cypher::CypherValue;
use std::collections::BTreeMap;
use std::fmt;

/// A node as returned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    /// Internal node id.
    pub id: i64,
    /// Labels.
    pub labels: Vec<String>,
    /// Properties.
    pub properties: BTreeMap<String, CypherValue>,
}

impl GraphNode {
    /// Create a node without properties.
    pub fn new<S: Into<String>>(id: i64, labels: impl IntoIterator<Item = S>) -> Self {
        Self {
            id,
            labels: labels.into_iter().map(Into::into).collect(),
            properties: BTreeMap::new(),
        }
    }

    /// Add a property to the node.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<CypherValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Get a property value.
    pub fn property(&self, name: &str) -> Option<&CypherValue> {
        self.properties.get(name)
    }

    /// Check if the node carries a label.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// A relationship as returned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphRelationship {
    /// Internal relationship id.
    pub id: i64,
    /// Internal id of the start node.
    pub start: i64,
    /// Internal id of the end node.
    pub end: i64,
    /// Relationship type.
    pub rel_type: String,
    /// Properties.
    pub properties: BTreeMap<String, CypherValue>,
}

impl GraphRelationship {
    /// Create a relationship without properties.
    pub fn new(id: i64, start: i64, end: i64, rel_type: impl Into<String>) -> Self {
        Self {
            id,
            start,
            end,
            rel_type: rel_type.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Add a property to the relationship.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<CypherValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// The node at the other end, if `node` is one of the ends.
    pub fn other_end(&self, node: i64) -> Option<i64> {
        if self.start == node {
            Some(self.end)
        } else if self.end == node {
            Some(self.start)
        } else {
            None
        }
    }
}

/// One value of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// Plain value.
    Value(CypherValue),
    /// Node.
    Node(GraphNode),
    /// Relationship.
    Relationship(GraphRelationship),
    /// List, possibly mixing nodes and relationships.
    List(Vec<RecordValue>),
}

impl RecordValue {
    /// Plain value, if this is one.
    pub fn as_value(&self) -> Option<&CypherValue> {
        match self {
            RecordValue::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Integer value, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        self.as_value().and_then(CypherValue::as_int)
    }

    /// Node, if this is one.
    pub fn as_node(&self) -> Option<&GraphNode> {
        match self {
            RecordValue::Node(n) => Some(n),
            _ => None,
        }
    }

    fn collect_nodes<'a>(&'a self, out: &mut Vec<&'a GraphNode>) {
        match self {
            RecordValue::Node(n) => out.push(n),
            RecordValue::List(items) => items.iter().for_each(|i| i.collect_nodes(out)),
            _ => {}
        }
    }

    fn collect_relationships<'a>(&'a self, out: &mut Vec<&'a GraphRelationship>) {
        match self {
            RecordValue::Relationship(r) => out.push(r),
            RecordValue::List(items) => items.iter().for_each(|i| i.collect_relationships(out)),
            _ => {}
        }
    }
}

impl From<CypherValue> for RecordValue {
    fn from(value: CypherValue) -> Self {
        RecordValue::Value(value)
    }
}

impl From<GraphNode> for RecordValue {
    fn from(node: GraphNode) -> Self {
        RecordValue::Node(node)
    }
}

impl From<GraphRelationship> for RecordValue {
    fn from(relationship: GraphRelationship) -> Self {
        RecordValue::Relationship(relationship)
    }
}

impl From<Vec<RecordValue>> for RecordValue {
    fn from(items: Vec<RecordValue>) -> Self {
        RecordValue::List(items)
    }
}

/// One row of a result: values by key, in return order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    keys: Vec<String>,
    values: Vec<RecordValue>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RecordValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Append a value.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<RecordValue>) {
        self.keys.push(key.into());
        self.values.push(value.into());
    }

    /// Value for a key.
    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        self.keys
            .iter()
            .position(|k| k == key)
            .and_then(|i| self.values.get(i))
    }

    /// Keys in return order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Values in return order.
    pub fn values(&self) -> &[RecordValue] {
        &self.values
    }

    /// Key/value pairs in return order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecordValue)> {
        self.keys.iter().map(String::as_str).zip(self.values.iter())
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the record has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every node in the record, in return order, lists depth first.
    pub fn nodes(&self) -> Vec<&GraphNode> {
        let mut out = Vec::new();
        self.values.iter().for_each(|v| v.collect_nodes(&mut out));
        out
    }

    /// Every relationship in the record, in return order, lists depth first.
    pub fn relationships(&self) -> Vec<&GraphRelationship> {
        let mut out = Vec::new();
        self.values
            .iter()
            .for_each(|v| v.collect_relationships(&mut out));
        out
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                RecordValue::Value(v) => write!(f, "{}: {}", key, v)?,
                RecordValue::Node(n) => write!(f, "{}: node {}:{}", key, n.id, n.labels.join(":"))?,
                RecordValue::Relationship(r) => write!(
                    f,
                    "{}: ({})-[{} {}]->({})",
                    key, r.start, r.id, r.rel_type, r.end
                )?,
                RecordValue::List(items) => write!(f, "{}: list of {}", key, items.len())?,
            }
        }
        write!(f, "}}")
    }
}
