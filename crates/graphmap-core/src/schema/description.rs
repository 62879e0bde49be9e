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

//! Domain type descriptions, the input of the schema builder.
//!
//! A [`TypeDescription`] states what a discovery layer (annotations,
//! reflection, code generation) would otherwise infer: attribute names and
//! types, the identifier and its generation strategy, the version attribute
//! and mapping overrides.

use graphmap_cypher::Direction;

use crate::value::DomainType;

/// How the identifier of a type is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdStrategy {
    /// The database assigns the id; read back after the first write.
    Internal,
    /// A random UUID is generated before the first write.
    GeneratedUuid,
    /// The application assigns ids itself.
    Assigned,
    /// A named [`IdGenerator`](crate::IdGenerator) produces ids.
    Generator(String),
}

/// One attribute of a domain type.
#[derive(Debug, Clone)]
pub struct AttributeDescription {
    /// Attribute name in the domain type.
    pub name: String,
    /// Declared type.
    pub domain_type: DomainType,
    /// Property name override.
    pub property_name: Option<String>,
    /// Relationship type override, for associations.
    pub relationship_type: Option<String>,
    /// Relationship direction, for associations.
    pub direction: Direction,
    /// Whether saving re-saves changes on existing related entities.
    pub cascade_updates: bool,
    /// Chrono format string for instants.
    pub date_format: Option<String>,
}

impl AttributeDescription {
    /// Describe an attribute with default mapping.
    pub fn new(name: impl Into<String>, domain_type: DomainType) -> Self {
        Self {
            name: name.into(),
            domain_type,
            property_name: None,
            relationship_type: None,
            direction: Direction::Outgoing,
            cascade_updates: true,
            date_format: None,
        }
    }

    /// Store the attribute under a different property name.
    pub fn property_name(mut self, name: impl Into<String>) -> Self {
        self.property_name = Some(name.into());
        self
    }

    /// Use an explicit relationship type.
    pub fn relationship_type(mut self, rel_type: impl Into<String>) -> Self {
        self.relationship_type = Some(rel_type.into());
        self
    }

    /// Set the relationship direction.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Only insert new related entities, never update existing ones.
    pub fn without_cascade(mut self) -> Self {
        self.cascade_updates = false;
        self
    }

    /// Format instants with a chrono format string.
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }
}

/// Identifier attribute and its strategy.
#[derive(Debug, Clone)]
pub struct IdentifierDescription {
    /// Attribute holding the id.
    pub attribute: String,
    /// How ids are assigned.
    pub strategy: IdStrategy,
}

/// Description of one domain type.
#[derive(Debug, Clone)]
pub struct TypeDescription {
    /// Simple type name.
    pub name: String,
    /// Primary label override.
    pub label: Option<String>,
    /// Extra labels.
    pub additional_labels: Vec<String>,
    /// Attributes in declaration order.
    pub attributes: Vec<AttributeDescription>,
    /// Identifier.
    pub identifier: Option<IdentifierDescription>,
    /// Optimistic locking version attribute.
    pub version: Option<String>,
    /// Attributes passed to the constructor, in parameter order.
    pub constructor: Vec<String>,
}

impl TypeDescription {
    /// Describe a type with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            additional_labels: Vec::new(),
            attributes: Vec::new(),
            identifier: None,
            version: None,
            constructor: Vec::new(),
        }
    }

    /// Override the primary label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add an extra label.
    pub fn additional_label(mut self, label: impl Into<String>) -> Self {
        self.additional_labels.push(label.into());
        self
    }

    /// Add an attribute.
    pub fn attribute(mut self, attribute: AttributeDescription) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add an attribute with default mapping.
    pub fn field(self, name: impl Into<String>, domain_type: DomainType) -> Self {
        self.attribute(AttributeDescription::new(name, domain_type))
    }

    /// Declare the identifier attribute.
    pub fn id(mut self, attribute: impl Into<String>, strategy: IdStrategy) -> Self {
        self.identifier = Some(IdentifierDescription {
            attribute: attribute.into(),
            strategy,
        });
        self
    }

    /// Declare the version attribute.
    pub fn version(mut self, attribute: impl Into<String>) -> Self {
        self.version = Some(attribute.into());
        self
    }

    /// Declare constructor parameters.
    pub fn constructor<S: Into<String>>(mut self, parameters: impl IntoIterator<Item = S>) -> Self {
        self.constructor = parameters.into_iter().map(Into::into).collect();
        self
    }

    /// Primary label: the override, or the simple type name.
    pub fn primary_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Look up an attribute by name.
    pub fn find_attribute(&self, name: &str) -> Option<&AttributeDescription> {
        self.attributes.iter().find(|a| a.name == name)
    }
}
