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

//! Two-pass schema derivation from type descriptions.

use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use super::description::{IdStrategy, TypeDescription};
use super::{
    default_relationship_type, GenerationStrategy, IdDescription, NodeDescription,
    PropertyDescription, RelationshipDescription, Schema,
};
use crate::convert::ConversionRegistry;
use crate::error::{OgmError, Result};
use crate::value::DomainType;

/// Association found in the first pass, resolved in the second.
struct PendingAssociation {
    owner_label: String,
    field_name: String,
    rel_type: String,
    direction: graphmap_cypher::Direction,
    target_type: String,
    cascade_updates: bool,
    is_collection: bool,
}

/// Derives node descriptions on top of an existing schema.
pub struct SchemaBuilder<'a> {
    registry: &'a ConversionRegistry,
    base: &'a Schema,
}

impl<'a> SchemaBuilder<'a> {
    /// Create a builder that extends `base`.
    pub fn new(registry: &'a ConversionRegistry, base: &'a Schema) -> Self {
        Self { registry, base }
    }

    /// Describe a batch of types and return `base` extended by them.
    ///
    /// Pass one registers a shallow description per type. Pass two resolves
    /// every association against the batch and the base schema, so types may
    /// reference each other in any order.
    pub fn describe(&self, types: &[TypeDescription]) -> Result<Schema> {
        let mut schema = self.base.clone();
        let mut pending = Vec::new();

        for ty in types {
            let (description, associations) = self.describe_shallow(ty, &schema)?;
            debug!(
                "Describing type {} as :{} ({} properties, {} associations)",
                description.type_name,
                description.primary_label,
                description.properties.len(),
                associations.len()
            );
            schema.insert(description);
            pending.extend(associations);
        }

        let mut resolved: BTreeMap<String, Vec<RelationshipDescription>> = BTreeMap::new();
        for association in pending {
            let target = schema
                .description_for_type(&association.target_type)
                .ok_or_else(|| OgmError::UnknownEntity(association.target_type.clone()))?;
            resolved
                .entry(association.owner_label)
                .or_default()
                .push(RelationshipDescription {
                    field_name: association.field_name,
                    rel_type: association.rel_type,
                    direction: association.direction,
                    target_label: target.primary_label.clone(),
                    target_type: association.target_type,
                    cascade_updates: association.cascade_updates,
                    is_collection: association.is_collection,
                });
        }

        for (label, relationships) in resolved {
            if let Some(shallow) = schema.node_description(&label) {
                let mut description = NodeDescription::clone(shallow);
                description.relationships = relationships;
                schema.insert(description);
            }
        }

        Ok(schema)
    }

    fn describe_shallow(
        &self,
        ty: &TypeDescription,
        schema: &Schema,
    ) -> Result<(NodeDescription, Vec<PendingAssociation>)> {
        if schema.contains_type(&ty.name) {
            return Err(OgmError::DuplicateType(ty.name.clone()));
        }

        let label = ty.primary_label().to_string();
        if let Some(existing) = schema.node_description(&label) {
            return Err(OgmError::DuplicateLabel {
                label,
                type_name: ty.name.clone(),
                existing: existing.type_name.clone(),
            });
        }

        let identifier = ty
            .identifier
            .as_ref()
            .ok_or_else(|| OgmError::MissingIdentifier(ty.name.clone()))?;
        let id_attribute = ty
            .find_attribute(&identifier.attribute)
            .ok_or_else(|| OgmError::MissingIdentifier(ty.name.clone()))?;
        let invalid = |reason: &str| OgmError::InvalidIdentifier {
            type_name: ty.name.clone(),
            attribute: id_attribute.name.clone(),
            reason: reason.to_string(),
        };
        match identifier.strategy {
            IdStrategy::Internal if id_attribute.domain_type != DomainType::Long => {
                return Err(invalid("internal ids must be long"));
            }
            IdStrategy::Internal if id_attribute.property_name.is_some() => {
                return Err(invalid("internal ids cannot be mapped to a property"));
            }
            IdStrategy::GeneratedUuid if id_attribute.domain_type != DomainType::Uuid => {
                return Err(invalid("generated uuid ids must be uuid"));
            }
            _ => {}
        }
        let id_graph_property = id_attribute
            .property_name
            .clone()
            .unwrap_or_else(|| id_attribute.name.clone());
        let id_description = match &identifier.strategy {
            IdStrategy::Internal => IdDescription::InternalId {
                attribute: id_attribute.name.clone(),
            },
            IdStrategy::GeneratedUuid => IdDescription::GeneratedId {
                attribute: id_attribute.name.clone(),
                graph_property: id_graph_property,
                strategy: GenerationStrategy::Uuid,
            },
            IdStrategy::Assigned => IdDescription::ExternallyAssignedId {
                attribute: id_attribute.name.clone(),
                graph_property: id_graph_property,
                generator: None,
            },
            IdStrategy::Generator(name) => IdDescription::ExternallyAssignedId {
                attribute: id_attribute.name.clone(),
                graph_property: id_graph_property,
                generator: Some(name.clone()),
            },
        };

        for name in ty.version.iter().chain(ty.constructor.iter()) {
            if ty.find_attribute(name).is_none() {
                return Err(OgmError::UnknownAttribute {
                    type_name: ty.name.clone(),
                    attribute: name.clone(),
                });
            }
        }

        let mut domain_names = HashSet::new();
        let mut graph_names = HashSet::new();
        let mut properties = Vec::new();
        let mut associations = Vec::new();

        for attribute in &ty.attributes {
            if !domain_names.insert(attribute.name.as_str()) {
                return Err(OgmError::DuplicateProperty {
                    type_name: ty.name.clone(),
                    property: attribute.name.clone(),
                });
            }

            if self.registry.is_simple(&attribute.domain_type) {
                if id_description.is_internal() && attribute.name == id_description.attribute() {
                    continue;
                }
                let graph_name = attribute
                    .property_name
                    .clone()
                    .unwrap_or_else(|| attribute.name.clone());
                if !graph_names.insert(graph_name.clone()) {
                    return Err(OgmError::DuplicateProperty {
                        type_name: ty.name.clone(),
                        property: graph_name,
                    });
                }
                properties.push(PropertyDescription {
                    domain_name: attribute.name.clone(),
                    graph_name,
                    domain_type: attribute.domain_type.clone(),
                    is_association: false,
                    date_format: attribute.date_format.clone(),
                });
                continue;
            }

            let (target_type, is_collection) = match attribute.domain_type.association_target() {
                Some((target, is_collection)) => (target.to_string(), is_collection),
                // A value type without a converter is resolved like an entity
                // reference and fails in pass two if nothing describes it.
                None => (attribute.domain_type.name(), false),
            };
            associations.push(PendingAssociation {
                owner_label: label.clone(),
                field_name: attribute.name.clone(),
                rel_type: attribute
                    .relationship_type
                    .clone()
                    .unwrap_or_else(|| default_relationship_type(&attribute.name)),
                direction: attribute.direction,
                target_type,
                cascade_updates: attribute.cascade_updates,
                is_collection,
            });
        }

        let description = NodeDescription {
            primary_label: label,
            additional_labels: ty.additional_labels.clone(),
            type_name: ty.name.clone(),
            id_description,
            properties,
            relationships: Vec::new(),
            version_property: ty.version.clone(),
            constructor: ty.constructor.clone(),
        };
        Ok((description, associations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AttributeDescription;
    use crate::value::DomainType;
    use graphmap_cypher::Direction;

    fn user() -> TypeDescription {
        TypeDescription::new("User")
            .field("id", DomainType::Long)
            .field("name", DomainType::String)
            .field("bikes", DomainType::list_of(DomainType::Entity("Bike".to_string())))
            .id("id", IdStrategy::Internal)
    }

    fn bike() -> TypeDescription {
        TypeDescription::new("Bike")
            .field("serial", DomainType::String)
            .attribute(
                AttributeDescription::new("owner", DomainType::Entity("User".to_string()))
                    .relationship_type("OWNS")
                    .direction(Direction::Incoming),
            )
            .id("serial", IdStrategy::Assigned)
    }

    fn describe(types: &[TypeDescription]) -> Result<Schema> {
        let registry = ConversionRegistry::new();
        let base = Schema::new();
        SchemaBuilder::new(&registry, &base).describe(types)
    }

    #[test]
    fn test_forward_references_resolve() {
        let schema = describe(&[user(), bike()]).unwrap();

        let user = schema.node_description("User").unwrap();
        assert!(user.id_description.is_internal());
        assert_eq!(user.properties.len(), 1);
        let bikes = user.relationship("bikes").unwrap();
        assert_eq!(bikes.rel_type, "BIKES");
        assert_eq!(bikes.target_label, "Bike");
        assert!(bikes.is_collection);

        let bike = schema.node_description("Bike").unwrap();
        let owner = bike.relationship("owner").unwrap();
        assert_eq!(owner.rel_type, "OWNS");
        assert_eq!(owner.direction, Direction::Incoming);
        assert!(!owner.is_collection);
        assert_eq!(bike.id_property().unwrap().graph_name, "serial");
    }

    #[test]
    fn test_duplicate_label() {
        let customer = TypeDescription::new("Customer")
            .label("User")
            .field("id", DomainType::Long)
            .id("id", IdStrategy::Internal);
        let plain_user = TypeDescription::new("User")
            .field("id", DomainType::Long)
            .id("id", IdStrategy::Internal);

        let err = describe(&[plain_user, customer]).unwrap_err();
        assert!(matches!(err, OgmError::DuplicateLabel { ref existing, .. } if existing == "User"));
        assert!(err.is_schema_conflict());
    }

    #[test]
    fn test_duplicate_type() {
        let err = describe(&[bike(), bike()]).unwrap_err();
        assert!(matches!(err, OgmError::DuplicateType(name) if name == "Bike"));
    }

    #[test]
    fn test_missing_identifier() {
        let anonymous = TypeDescription::new("Anonymous").field("name", DomainType::String);
        assert!(matches!(
            describe(&[anonymous]),
            Err(OgmError::MissingIdentifier(name)) if name == "Anonymous"
        ));

        let dangling = TypeDescription::new("Dangling").id("id", IdStrategy::Assigned);
        assert!(matches!(
            describe(&[dangling]),
            Err(OgmError::MissingIdentifier(_))
        ));
    }

    #[test]
    fn test_internal_id_must_be_long() {
        let doc = TypeDescription::new("Doc")
            .field("id", DomainType::String)
            .id("id", IdStrategy::Internal);
        assert!(matches!(
            describe(&[doc]),
            Err(OgmError::InvalidIdentifier { type_name, attribute, .. })
                if type_name == "Doc" && attribute == "id"
        ));
    }

    #[test]
    fn test_internal_id_without_property_name() {
        let doc = TypeDescription::new("Doc")
            .attribute(AttributeDescription::new("id", DomainType::Long).property_name("doc_id"))
            .id("id", IdStrategy::Internal);
        assert!(matches!(
            describe(&[doc]),
            Err(OgmError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_generated_uuid_id_must_be_uuid() {
        let doc = TypeDescription::new("Doc")
            .field("id", DomainType::String)
            .id("id", IdStrategy::GeneratedUuid);
        assert!(matches!(
            describe(&[doc]),
            Err(OgmError::InvalidIdentifier { ref reason, .. }) if reason.contains("uuid")
        ));

        let doc = TypeDescription::new("Doc")
            .field("id", DomainType::Uuid)
            .id("id", IdStrategy::GeneratedUuid);
        assert!(describe(&[doc]).is_ok());
    }

    #[test]
    fn test_duplicate_property_graph_name() {
        let clash = TypeDescription::new("Clash")
            .field("id", DomainType::Long)
            .field("name", DomainType::String)
            .attribute(AttributeDescription::new("title", DomainType::String).property_name("name"))
            .id("id", IdStrategy::Internal);
        assert!(matches!(
            describe(&[clash]),
            Err(OgmError::DuplicateProperty { property, .. }) if property == "name"
        ));
    }

    #[test]
    fn test_unknown_association_target() {
        assert!(matches!(
            describe(&[user()]),
            Err(OgmError::UnknownEntity(name)) if name == "Bike"
        ));
    }

    #[test]
    fn test_unconverted_value_type_is_association() {
        let with_address = TypeDescription::new("Home")
            .field("id", DomainType::Long)
            .field("address", DomainType::Custom("Address".to_string()))
            .id("id", IdStrategy::Internal);
        assert!(matches!(
            describe(&[with_address]),
            Err(OgmError::UnknownEntity(name)) if name == "Address"
        ));
    }

    #[test]
    fn test_unknown_version_attribute() {
        let versioned = TypeDescription::new("Doc")
            .field("id", DomainType::Long)
            .id("id", IdStrategy::Internal)
            .version("version");
        assert!(matches!(
            describe(&[versioned]),
            Err(OgmError::UnknownAttribute { attribute, .. }) if attribute == "version"
        ));
    }

    #[test]
    fn test_extends_base_schema() {
        let registry = ConversionRegistry::new();
        let base = describe(&[user(), bike()]).unwrap();
        let trip = TypeDescription::new("Trip")
            .field("id", DomainType::Uuid)
            .field("bike", DomainType::Entity("Bike".to_string()))
            .id("id", IdStrategy::GeneratedUuid);

        let extended = SchemaBuilder::new(&registry, &base).describe(&[trip]).unwrap();
        assert_eq!(extended.len(), 3);
        assert_eq!(base.len(), 2);
        assert_eq!(
            extended
                .node_description("Trip")
                .and_then(|d| d.relationship("bike"))
                .map(|r| r.target_label.as_str()),
            Some("Bike")
        );
    }
}
