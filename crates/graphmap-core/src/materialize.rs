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

//! Turn records into entity graphs, and entities back into property maps.

use graphmap_cypher::{CypherValue, Direction};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::context::MappingContext;
use crate::entity::{Entity, EntityRef};
use crate::error::{OgmError, Result};
use crate::record::{GraphNode, GraphRelationship, Record};
use crate::schema::{NodeDescription, RelationshipDescription};
use crate::value::DomainValue;

/// Creates entity instances from constructor arguments.
pub trait Instantiator: Send + Sync {
    /// Create an instance of the described type. `arguments` holds the
    /// constructor parameters by attribute name.
    fn instantiate(
        &self,
        description: &NodeDescription,
        arguments: BTreeMap<String, DomainValue>,
    ) -> Result<Entity>;
}

/// Builds a plain [`Entity`] with the constructor arguments set.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInstantiator;

impl Instantiator for DefaultInstantiator {
    fn instantiate(
        &self,
        description: &NodeDescription,
        arguments: BTreeMap<String, DomainValue>,
    ) -> Result<Entity> {
        let mut entity = Entity::new(&description.type_name);
        for (name, value) in arguments {
            entity.set(name, value);
        }
        Ok(entity)
    }
}

static DEFAULT_INSTANTIATOR: DefaultInstantiator = DefaultInstantiator;

/// Nodes and relationships of one record, indexed for traversal.
struct RecordGraph<'r> {
    nodes: HashMap<i64, &'r GraphNode>,
    relationships: Vec<&'r GraphRelationship>,
}

impl<'r> RecordGraph<'r> {
    fn new(record: &'r Record) -> Self {
        let mut nodes = HashMap::new();
        for node in record.nodes() {
            nodes.entry(node.id).or_insert(node);
        }
        Self {
            nodes,
            relationships: record.relationships(),
        }
    }

    /// Nodes reached from `node` through `relationship`, in record order,
    /// each at most once.
    fn related(&self, node: i64, relationship: &RelationshipDescription) -> Vec<&'r GraphNode> {
        let mut found: Vec<&GraphNode> = Vec::new();
        for candidate in &self.relationships {
            if candidate.rel_type != relationship.rel_type {
                continue;
            }
            let other = match relationship.direction {
                Direction::Outgoing if candidate.start == node => Some(candidate.end),
                Direction::Incoming if candidate.end == node => Some(candidate.start),
                Direction::Undirected => candidate.other_end(node),
                _ => None,
            };
            let target = other
                .and_then(|id| self.nodes.get(&id).copied())
                .filter(|n| n.has_label(&relationship.target_label));
            if let Some(target) = target {
                if !found.iter().any(|f| f.id == target.id) {
                    found.push(target);
                }
            }
        }
        found
    }
}

/// Maps records to entities using the context's schema and conversions.
pub struct EntityMaterializer<'a> {
    context: &'a MappingContext,
    instantiator: &'a dyn Instantiator,
}

impl<'a> EntityMaterializer<'a> {
    /// Create a materializer with the default instantiator.
    pub fn new(context: &'a MappingContext) -> Self {
        Self {
            context,
            instantiator: &DEFAULT_INSTANTIATOR,
        }
    }

    /// Use a custom instantiator.
    pub fn with_instantiator(mut self, instantiator: &'a dyn Instantiator) -> Self {
        self.instantiator = instantiator;
        self
    }

    /// Materialize the root entity of a record.
    ///
    /// The root is the first node in record order that carries the primary
    /// label. Returns `Ok(None)` when the record holds no such node.
    pub fn materialize(
        &self,
        record: &Record,
        description: &NodeDescription,
    ) -> Result<Option<EntityRef>> {
        let graph = RecordGraph::new(record);
        let root = match record
            .nodes()
            .into_iter()
            .find(|n| n.has_label(&description.primary_label))
        {
            Some(root) => root,
            None => {
                debug!(
                    "No node labelled :{} in record {}",
                    description.primary_label, record
                );
                return Ok(None);
            }
        };

        let mut seen = HashMap::new();
        self.node_to_entity(root, description, &graph, &mut seen)
            .map(Some)
            .map_err(|e| e.into_mapping_failure(record.to_string(), &description.primary_label))
    }

    /// Materialize every record independently.
    pub fn materialize_all(
        &self,
        records: &[Record],
        description: &NodeDescription,
    ) -> Vec<Result<Option<EntityRef>>> {
        records
            .iter()
            .map(|record| self.materialize(record, description))
            .collect()
    }

    /// Stored property map of an entity, keyed by graph name. Unset
    /// attributes map to null.
    pub fn graph_properties(
        &self,
        entity: &Entity,
        description: &NodeDescription,
    ) -> Result<BTreeMap<String, CypherValue>> {
        let registry = self.context.registry();
        description
            .properties
            .iter()
            .map(|property| {
                let value = entity
                    .value(&property.domain_name)
                    .unwrap_or(&DomainValue::Null);
                Ok((
                    property.graph_name.clone(),
                    registry.to_graph_value(value, property)?,
                ))
            })
            .collect()
    }

    fn node_to_entity(
        &self,
        node: &GraphNode,
        description: &NodeDescription,
        graph: &RecordGraph<'_>,
        seen: &mut HashMap<i64, EntityRef>,
    ) -> Result<EntityRef> {
        if let Some(existing) = seen.get(&node.id) {
            return Ok(existing.clone());
        }

        let registry = self.context.registry();
        let internal_id = description
            .id_description
            .is_internal()
            .then(|| description.id_description.attribute());

        let read_property = |name: &str| -> Result<DomainValue> {
            if internal_id == Some(name) {
                return Ok(DomainValue::Long(node.id));
            }
            let property = description
                .property(name)
                .ok_or_else(|| OgmError::UnknownAttribute {
                    type_name: description.type_name.clone(),
                    attribute: name.to_string(),
                })?;
            match node.property(&property.graph_name) {
                Some(value) => registry.to_domain_value(value, property),
                None => Ok(DomainValue::Null),
            }
        };

        let mut arguments = BTreeMap::new();
        for name in &description.constructor {
            arguments.insert(name.clone(), read_property(name)?);
        }

        let mut entity = self.instantiator.instantiate(description, arguments)?;
        if let Some(id) = internal_id {
            if !description.constructor.iter().any(|c| c == id) {
                entity.set(id, DomainValue::Long(node.id));
            }
        }
        for property in &description.properties {
            if description.constructor.contains(&property.domain_name) {
                continue;
            }
            entity.set(
                property.domain_name.clone(),
                read_property(&property.domain_name)?,
            );
        }

        let entity = EntityRef::new(entity);
        seen.insert(node.id, entity.clone());

        for relationship in &description.relationships {
            let target = self
                .context
                .node_description(&relationship.target_label)
                .ok_or_else(|| OgmError::UnknownEntity(relationship.target_type.clone()))?;

            let mut related = Vec::new();
            for other in graph.related(node.id, relationship) {
                related.push(self.node_to_entity(other, &target, graph, seen)?);
            }

            if relationship.is_collection {
                entity
                    .write()
                    .set_entities(relationship.field_name.clone(), related);
            } else if let Some(first) = related.into_iter().next() {
                entity
                    .write()
                    .set_entity(relationship.field_name.clone(), first);
            }
        }

        Ok(entity)
    }
}
