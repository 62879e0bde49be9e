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

//! Node and relationship storage.

use graphmap_core::{GraphNode, GraphRelationship};
use graphmap_cypher::CypherValue;
use std::collections::BTreeMap;

/// Nodes and relationships keyed by internal id. Ids are never reused.
#[derive(Debug, Clone, Default)]
pub(crate) struct GraphStore {
    pub(crate) nodes: BTreeMap<i64, GraphNode>,
    pub(crate) relationships: BTreeMap<i64, GraphRelationship>,
    next_node_id: i64,
    next_relationship_id: i64,
}

impl GraphStore {
    pub(crate) fn create_node(
        &mut self,
        labels: &[String],
        properties: BTreeMap<String, CypherValue>,
    ) -> i64 {
        let id = self.next_node_id;
        self.next_node_id += 1;
        let mut node = GraphNode::new(id, labels.iter().cloned());
        node.properties = properties;
        self.nodes.insert(id, node);
        id
    }

    pub(crate) fn create_relationship(
        &mut self,
        start: i64,
        end: i64,
        rel_type: &str,
        properties: BTreeMap<String, CypherValue>,
    ) -> i64 {
        let id = self.next_relationship_id;
        self.next_relationship_id += 1;
        let mut relationship = GraphRelationship::new(id, start, end, rel_type);
        relationship.properties = properties;
        self.relationships.insert(id, relationship);
        id
    }

    /// Ids of relationships touching a node.
    pub(crate) fn attached(&self, node: i64) -> Vec<i64> {
        self.relationships
            .values()
            .filter(|r| r.start == node || r.end == node)
            .map(|r| r.id)
            .collect()
    }

    pub(crate) fn properties_mut(
        &mut self,
        entity: EntityId,
    ) -> Option<&mut BTreeMap<String, CypherValue>> {
        match entity {
            EntityId::Node(id) => self.nodes.get_mut(&id).map(|n| &mut n.properties),
            EntityId::Relationship(id) => {
                self.relationships.get_mut(&id).map(|r| &mut r.properties)
            }
        }
    }

    pub(crate) fn property(&self, entity: EntityId, key: &str) -> Option<&CypherValue> {
        match entity {
            EntityId::Node(id) => self.nodes.get(&id).and_then(|n| n.property(key)),
            EntityId::Relationship(id) => self
                .relationships
                .get(&id)
                .and_then(|r| r.properties.get(key)),
        }
    }
}

/// A node or relationship id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntityId {
    Node(i64),
    Relationship(i64),
}
