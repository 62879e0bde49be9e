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

//! Node and relationship patterns.

use serde::{Deserialize, Serialize};

use super::expression::{Expression, FunctionInvocation};

/// Direction of a relationship relative to the node it is written from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// `(a)-[]->(b)`
    #[default]
    Outgoing,
    /// `(a)<-[]-(b)`
    Incoming,
    /// `(a)-[]-(b)`
    Undirected,
}

impl Direction {
    /// The direction seen from the other end.
    pub fn reverse(self) -> Self {
        match self {
            Direction::Outgoing => Direction::Incoming,
            Direction::Incoming => Direction::Outgoing,
            Direction::Undirected => Direction::Undirected,
        }
    }
}

/// A node pattern `(name:Label {props})`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: Option<String>,
    labels: Vec<String>,
    properties: Vec<(String, Expression)>,
}

impl Node {
    /// A node with a primary label.
    pub fn new(primary_label: impl Into<String>) -> Self {
        Self {
            name: None,
            labels: vec![primary_label.into()],
            properties: Vec::new(),
        }
    }

    /// A node with a primary label and additional labels.
    pub fn with_labels<S: Into<String>>(
        primary_label: impl Into<String>,
        additional_labels: impl IntoIterator<Item = S>,
    ) -> Self {
        let mut node = Self::new(primary_label);
        node.labels.extend(additional_labels.into_iter().map(Into::into));
        node
    }

    /// A node without labels.
    pub fn any() -> Self {
        Self {
            name: None,
            labels: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Bind the node to a symbolic name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add an inline property map, `(n:L {key: value})`.
    pub fn with_properties<K: Into<String>>(
        mut self,
        properties: impl IntoIterator<Item = (K, Expression)>,
    ) -> Self {
        self.properties
            .extend(properties.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// The symbolic name, if any.
    pub fn symbolic_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Labels in declaration order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Inline properties.
    pub fn properties(&self) -> &[(String, Expression)] {
        &self.properties
    }

    /// This node in expression position: its name when named, else the pattern.
    pub fn as_expression(&self) -> Expression {
        match &self.name {
            Some(name) => Expression::Variable(name.clone()),
            None => Expression::Pattern(self.clone()),
        }
    }

    /// Property `key` of this node.
    pub fn property(&self, key: impl Into<String>) -> Expression {
        self.as_expression().property(key)
    }

    /// `id(node)`
    pub fn internal_id(&self) -> Expression {
        Expression::Function(FunctionInvocation {
            name: "id".to_string(),
            distinct: false,
            arguments: vec![self.as_expression()],
        })
    }

    /// `(self)-[:TYPES]->(other)`
    pub fn relationship_to(&self, other: &Node, types: &[&str]) -> Relationship {
        Relationship::start(self.clone()).extend(other, types, Direction::Outgoing)
    }

    /// `(self)<-[:TYPES]-(other)`
    pub fn relationship_from(&self, other: &Node, types: &[&str]) -> Relationship {
        Relationship::start(self.clone()).extend(other, types, Direction::Incoming)
    }

    /// `(self)-[:TYPES]-(other)`
    pub fn relationship_between(&self, other: &Node, types: &[&str]) -> Relationship {
        Relationship::start(self.clone()).extend(other, types, Direction::Undirected)
    }
}

impl From<&Node> for Expression {
    fn from(node: &Node) -> Self {
        node.as_expression()
    }
}

impl From<Node> for Expression {
    fn from(node: Node) -> Self {
        node.as_expression()
    }
}

/// Variable length of a relationship, `*min..max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelationshipLength {
    /// Minimum number of hops.
    pub minimum: Option<u32>,
    /// Maximum number of hops.
    pub maximum: Option<u32>,
}

/// Everything between the two nodes of one hop: `-[name:TYPE*1..3 {props}]->`.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipDetail {
    /// Symbolic name.
    pub name: Option<String>,
    /// Alternative types, rendered `:A|B`.
    pub types: Vec<String>,
    /// Direction relative to the left node.
    pub direction: Direction,
    /// Optional variable length.
    pub length: Option<RelationshipLength>,
    /// Inline property map.
    pub properties: Vec<(String, Expression)>,
}

/// A path pattern: a start node followed by one or more hops.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    start: Node,
    segments: Vec<(RelationshipDetail, Node)>,
}

impl Relationship {
    fn start(start: Node) -> Self {
        Self {
            start,
            segments: Vec::new(),
        }
    }

    fn extend(mut self, end: &Node, types: &[&str], direction: Direction) -> Self {
        self.segments.push((
            RelationshipDetail {
                name: None,
                types: types.iter().map(|t| t.to_string()).collect(),
                direction,
                length: None,
                properties: Vec::new(),
            },
            end.clone(),
        ));
        self
    }

    fn last_detail(&mut self) -> Option<&mut RelationshipDetail> {
        self.segments.last_mut().map(|(detail, _)| detail)
    }

    /// Continue the path with an outgoing hop from its current end.
    pub fn relationship_to(self, other: &Node, types: &[&str]) -> Self {
        self.extend(other, types, Direction::Outgoing)
    }

    /// Continue the path with an incoming hop to its current end.
    pub fn relationship_from(self, other: &Node, types: &[&str]) -> Self {
        self.extend(other, types, Direction::Incoming)
    }

    /// Continue the path with an undirected hop.
    pub fn relationship_between(self, other: &Node, types: &[&str]) -> Self {
        self.extend(other, types, Direction::Undirected)
    }

    /// Name the most recently added hop.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        if let Some(detail) = self.last_detail() {
            detail.name = Some(name.into());
        }
        self
    }

    /// Give the most recently added hop a variable length `*min..max`.
    pub fn length(mut self, minimum: Option<u32>, maximum: Option<u32>) -> Self {
        if let Some(detail) = self.last_detail() {
            detail.length = Some(RelationshipLength { minimum, maximum });
        }
        self
    }

    /// Make the most recently added hop unbounded, `*`.
    pub fn unbounded(self) -> Self {
        self.length(None, None)
    }

    /// Inline properties on the most recently added hop.
    pub fn with_properties<K: Into<String>>(
        mut self,
        properties: impl IntoIterator<Item = (K, Expression)>,
    ) -> Self {
        if let Some(detail) = self.last_detail() {
            detail
                .properties
                .extend(properties.into_iter().map(|(k, v)| (k.into(), v)));
        }
        self
    }

    /// The node the path starts at.
    pub fn start_node(&self) -> &Node {
        &self.start
    }

    /// Hops in order.
    pub fn segments(&self) -> &[(RelationshipDetail, Node)] {
        &self.segments
    }

    /// Name of the most recently added hop.
    pub fn symbolic_name(&self) -> Option<&str> {
        self.segments.last().and_then(|(detail, _)| detail.name.as_deref())
    }

    /// The most recently added hop in expression position. An unnamed hop has
    /// no expression form, the path's start node stands in for it.
    pub fn as_expression(&self) -> Expression {
        match self.symbolic_name() {
            Some(name) => Expression::Variable(name.to_string()),
            None => self.start.as_expression(),
        }
    }

    /// Property `key` of the most recently added hop.
    pub fn property(&self, key: impl Into<String>) -> Expression {
        self.as_expression().property(key)
    }
}

impl From<&Relationship> for Expression {
    fn from(relationship: &Relationship) -> Self {
        relationship.as_expression()
    }
}

/// One comma-separated element of a MATCH, CREATE or MERGE clause.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternElement {
    /// A single node.
    Node(Node),
    /// A path.
    Relationship(Relationship),
}

impl From<Node> for PatternElement {
    fn from(node: Node) -> Self {
        PatternElement::Node(node)
    }
}

impl From<&Node> for PatternElement {
    fn from(node: &Node) -> Self {
        PatternElement::Node(node.clone())
    }
}

impl From<Relationship> for PatternElement {
    fn from(relationship: Relationship) -> Self {
        PatternElement::Relationship(relationship)
    }
}

impl From<&Relationship> for PatternElement {
    fn from(relationship: &Relationship) -> Self {
        PatternElement::Relationship(relationship.clone())
    }
}

/// A labelled node, `(:Label)` until named.
pub fn node(primary_label: impl Into<String>) -> Node {
    Node::new(primary_label)
}

/// A node without labels, `()` until named.
pub fn any_node() -> Node {
    Node::any()
}
