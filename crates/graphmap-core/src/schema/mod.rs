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

//! Graph schema model: immutable descriptors derived from domain types.

mod builder;
mod description;

pub use builder::SchemaBuilder;
pub use description::{AttributeDescription, IdStrategy, IdentifierDescription, TypeDescription};

use graphmap_cypher::{Direction, Expression, Node};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::value::DomainType;

/// A stored property of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescription {
    /// Attribute name in the domain type.
    pub domain_name: String,
    /// Property key in the graph.
    pub graph_name: String,
    /// Declared type.
    pub domain_type: DomainType,
    /// Always false: associations are described by
    /// [`RelationshipDescription`].
    pub is_association: bool,
    /// Chrono format string for instants.
    pub date_format: Option<String>,
}

/// Application-side id generation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStrategy {
    /// Random UUID.
    Uuid,
}

/// How a node is identified.
#[derive(Debug, Clone, PartialEq)]
pub enum IdDescription {
    /// Database-assigned id, read back after the first write.
    InternalId {
        /// Attribute holding the id.
        attribute: String,
    },
    /// Id generated by a built-in strategy before the first write.
    GeneratedId {
        /// Attribute holding the id.
        attribute: String,
        /// Property key of the id.
        graph_property: String,
        /// Generation strategy.
        strategy: GenerationStrategy,
    },
    /// Id assigned by the application or a named generator.
    ExternallyAssignedId {
        /// Attribute holding the id.
        attribute: String,
        /// Property key of the id.
        graph_property: String,
        /// Name of the pluggable generator, `None` when the application
        /// assigns ids itself.
        generator: Option<String>,
    },
}

impl IdDescription {
    /// Attribute holding the id.
    pub fn attribute(&self) -> &str {
        match self {
            IdDescription::InternalId { attribute }
            | IdDescription::GeneratedId { attribute, .. }
            | IdDescription::ExternallyAssignedId { attribute, .. } => attribute,
        }
    }

    /// Property key of the id, `None` for internal ids.
    pub fn graph_property(&self) -> Option<&str> {
        match self {
            IdDescription::InternalId { .. } => None,
            IdDescription::GeneratedId { graph_property, .. }
            | IdDescription::ExternallyAssignedId { graph_property, .. } => Some(graph_property),
        }
    }

    /// Whether the database assigns the id.
    pub fn is_internal(&self) -> bool {
        matches!(self, IdDescription::InternalId { .. })
    }
}

/// An association between two node types.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipDescription {
    /// Attribute holding the related entity or entities.
    pub field_name: String,
    /// Relationship type.
    pub rel_type: String,
    /// Direction relative to the owning node.
    pub direction: Direction,
    /// Primary label of the related type.
    pub target_label: String,
    /// Related domain type name.
    pub target_type: String,
    /// Whether saving re-saves existing related entities.
    pub cascade_updates: bool,
    /// Whether the attribute holds a collection.
    pub is_collection: bool,
}

/// Everything the mapping layer knows about one domain type.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDescription {
    /// Primary label.
    pub primary_label: String,
    /// Extra labels.
    pub additional_labels: Vec<String>,
    /// Domain type name.
    pub type_name: String,
    /// Identifier.
    pub id_description: IdDescription,
    /// Stored properties in declaration order, including an application-side
    /// id and the version.
    pub properties: Vec<PropertyDescription>,
    /// Associations in declaration order.
    pub relationships: Vec<RelationshipDescription>,
    /// Domain name of the version attribute.
    pub version_property: Option<String>,
    /// Constructor parameters in order.
    pub constructor: Vec<String>,
}

impl NodeDescription {
    /// Primary label followed by the additional labels.
    pub fn labels(&self) -> Vec<&str> {
        std::iter::once(self.primary_label.as_str())
            .chain(self.additional_labels.iter().map(String::as_str))
            .collect()
    }

    /// Property by domain name.
    pub fn property(&self, domain_name: &str) -> Option<&PropertyDescription> {
        self.properties.iter().find(|p| p.domain_name == domain_name)
    }

    /// Property by graph name.
    pub fn property_by_graph_name(&self, graph_name: &str) -> Option<&PropertyDescription> {
        self.properties.iter().find(|p| p.graph_name == graph_name)
    }

    /// Association by attribute name.
    pub fn relationship(&self, field_name: &str) -> Option<&RelationshipDescription> {
        self.relationships.iter().find(|r| r.field_name == field_name)
    }

    /// The id property, `None` for internal ids.
    pub fn id_property(&self) -> Option<&PropertyDescription> {
        match &self.id_description {
            IdDescription::InternalId { .. } => None,
            other => self.property(other.attribute()),
        }
    }

    /// The version property.
    pub fn version(&self) -> Option<&PropertyDescription> {
        self.version_property
            .as_deref()
            .and_then(|name| self.property(name))
    }

    /// Whether writes are guarded by a version check.
    pub fn is_versioned(&self) -> bool {
        self.version_property.is_some()
    }

    /// Node pattern `(name:`Primary`:`Additional`)`.
    pub fn node_pattern(&self, name: &str) -> Node {
        Node::with_labels(&self.primary_label, &self.additional_labels).named(name)
    }

    /// Expression identifying a node bound to `name`: `id(name)` for internal
    /// ids, `name.idProperty` otherwise.
    pub fn id_expression(&self, name: &str) -> Expression {
        let node = Node::any().named(name);
        match self.id_description.graph_property() {
            Some(property) => node.property(property),
            None => node.internal_id(),
        }
    }
}

/// Immutable set of node descriptions, indexed by label and by type.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    by_label: BTreeMap<String, Arc<NodeDescription>>,
    label_by_type: BTreeMap<String, String>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, description: NodeDescription) {
        self.label_by_type.insert(
            description.type_name.clone(),
            description.primary_label.clone(),
        );
        self.by_label
            .insert(description.primary_label.clone(), Arc::new(description));
    }

    /// Description for a primary label.
    pub fn node_description(&self, label: &str) -> Option<&Arc<NodeDescription>> {
        self.by_label.get(label)
    }

    /// Description for a domain type name.
    pub fn description_for_type(&self, type_name: &str) -> Option<&Arc<NodeDescription>> {
        self.label_by_type
            .get(type_name)
            .and_then(|label| self.by_label.get(label))
    }

    /// Check if a domain type is described.
    pub fn contains_type(&self, type_name: &str) -> bool {
        self.label_by_type.contains_key(type_name)
    }

    /// All descriptions, ordered by primary label.
    pub fn descriptions(&self) -> impl Iterator<Item = &Arc<NodeDescription>> {
        self.by_label.values()
    }

    /// Number of described types.
    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    /// Check if no type is described.
    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

/// Relationship type derived from an attribute name: `hasBikes` becomes
/// `HAS_BIKES`.
pub fn default_relationship_type(field_name: &str) -> String {
    graphmap_cypher::escape::to_relationship_type(field_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphmap_cypher::render_expression;

    fn person() -> NodeDescription {
        NodeDescription {
            primary_label: "Person".to_string(),
            additional_labels: vec!["Mortal".to_string()],
            type_name: "Person".to_string(),
            id_description: IdDescription::GeneratedId {
                attribute: "id".to_string(),
                graph_property: "uuid".to_string(),
                strategy: GenerationStrategy::Uuid,
            },
            properties: vec![
                PropertyDescription {
                    domain_name: "id".to_string(),
                    graph_name: "uuid".to_string(),
                    domain_type: DomainType::Uuid,
                    is_association: false,
                    date_format: None,
                },
                PropertyDescription {
                    domain_name: "name".to_string(),
                    graph_name: "name".to_string(),
                    domain_type: DomainType::String,
                    is_association: false,
                    date_format: None,
                },
            ],
            relationships: Vec::new(),
            version_property: None,
            constructor: Vec::new(),
        }
    }

    #[test]
    fn test_labels_and_pattern() {
        let description = person();
        assert_eq!(description.labels(), vec!["Person", "Mortal"]);
        assert_eq!(
            render_expression(&description.node_pattern("n").as_expression()),
            "n"
        );
    }

    #[test]
    fn test_id_expression() {
        let mut description = person();
        assert_eq!(render_expression(&description.id_expression("n")), "n.uuid");
        assert_eq!(description.id_property().unwrap().domain_name, "id");

        description.id_description = IdDescription::InternalId {
            attribute: "id".to_string(),
        };
        assert_eq!(render_expression(&description.id_expression("n")), "id(n)");
        assert!(description.id_property().is_none());
    }

    #[test]
    fn test_schema_lookup() {
        let mut schema = Schema::new();
        assert!(schema.is_empty());
        schema.insert(person());
        assert_eq!(schema.len(), 1);
        assert!(schema.node_description("Person").is_some());
        assert!(schema.description_for_type("Person").is_some());
        assert!(schema.node_description("Mortal").is_none());
    }

    #[test]
    fn test_default_relationship_type() {
        assert_eq!(default_relationship_type("hasBikes"), "HAS_BIKES");
        assert_eq!(default_relationship_type("owner"), "OWNER");
    }
}
