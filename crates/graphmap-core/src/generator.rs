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

//! Statements for loading, counting, deleting and saving mapped nodes.
//!
//! Every statement is built through the typed builder, so clause order is
//! checked at compile time. Values always travel as parameters; the names
//! below are the contract between the generator, the persistence engine and
//! runners that interpret statements.

use graphmap_cypher::functions::{collect, count};
use graphmap_cypher::{
    asterisk, match_, merge, name, node, optional_match, parameter, property, unwind, Condition,
    Direction, Expression, Node, OngoingReadingWithWhere, Relationship, SetItem, Statement,
};

use crate::config::MappingConfig;
use crate::schema::{NodeDescription, RelationshipDescription};

/// Id of a single entity.
pub const ID_PARAMETER: &str = "__id__";
/// Ids of several entities, or the ids returned by a batch save.
pub const IDS_PARAMETER: &str = "__ids__";
/// Property map written with `SET n += ...`.
pub const PROPERTIES_PARAMETER: &str = "__properties__";
/// Expected current version of a versioned entity.
pub const VERSION_PARAMETER: &str = "__version__";
/// List of `{__id__, __properties__}` maps of a batch save.
pub const ENTITIES_PARAMETER: &str = "__entities__";
/// Variable each batch element is bound to.
pub const ENTITY_VARIABLE: &str = "entity";
/// Alias of the internal id returned by a node save.
pub const INTERNAL_ID_ALIAS: &str = "__internal_id__";
/// Id of the start node of a relationship.
pub const FROM_ID_PARAMETER: &str = "__fromId__";
/// Id of the end node of a relationship.
pub const TO_ID_PARAMETER: &str = "__toId__";
/// Relationship variable of a find statement.
pub const RELATIONSHIP_NAME: &str = "__rel__";
/// Related node variable of a find statement.
pub const RELATED_NAME: &str = "__related__";
/// Alias of the collected relationships of a find statement.
pub const RELATIONSHIPS_ALIAS: &str = "__relationships__";
/// Alias of the collected related nodes of a find statement.
pub const RELATED_NODES_ALIAS: &str = "__related_nodes__";
/// Alias of counts returned by delete statements.
pub const COUNT_ALIAS: &str = "__count__";

const START_NODE_NAME: &str = "startNode";
const END_NODE_NAME: &str = "endNode";
const RELATIONSHIP_VARIABLE: &str = "rel";

/// Builds statements for node descriptions.
#[derive(Debug, Clone)]
pub struct CypherGenerator<'a> {
    config: &'a MappingConfig,
}

impl<'a> CypherGenerator<'a> {
    /// Create a generator.
    pub fn new(config: &'a MappingConfig) -> Self {
        Self { config }
    }

    fn root(&self, description: &NodeDescription) -> Node {
        description.node_pattern(&self.config.root_node_name)
    }

    fn root_variable(&self) -> Expression {
        name(&self.config.root_node_name)
    }

    /// Expression identifying the root node: `id(n)` or `n.<idProperty>`.
    pub fn id_expression(&self, description: &NodeDescription) -> Expression {
        description.id_expression(&self.config.root_node_name)
    }

    /// `MATCH (n:L) WHERE condition`, open for further clauses. A neutral
    /// condition renders no `WHERE`.
    pub fn prepare_match_of(
        &self,
        description: &NodeDescription,
        condition: Condition,
    ) -> OngoingReadingWithWhere {
        match_([self.root(description)]).where_(condition)
    }

    /// Load matching nodes with their relationships up to the configured
    /// fetch depth.
    pub fn prepare_find(&self, description: &NodeDescription, condition: Condition) -> Statement {
        let reading = self.prepare_match_of(description, condition);
        if self.config.fetch_depth == 0 {
            return reading.returning([self.root_variable()]).build();
        }

        let root = Node::any().named(&self.config.root_node_name);
        let related = Node::any().named(RELATED_NAME);
        let mut hop: Relationship = root
            .relationship_between(&related, &[])
            .named(RELATIONSHIP_NAME);
        if self.config.fetch_depth > 1 {
            hop = hop.length(Some(1), Some(self.config.fetch_depth));
        }

        reading
            .optional_match([hop])
            .returning([
                self.root_variable(),
                collect(name(RELATIONSHIP_NAME)).aliased(RELATIONSHIPS_ALIAS),
                collect(name(RELATED_NAME)).aliased(RELATED_NODES_ALIAS),
            ])
            .build()
    }

    /// Find one node by `$__id__`.
    pub fn prepare_find_by_id(&self, description: &NodeDescription) -> Statement {
        self.prepare_find(
            description,
            self.id_expression(description)
                .is_equal_to(parameter(ID_PARAMETER)),
        )
    }

    /// Find nodes whose id is in `$__ids__`.
    pub fn prepare_find_all_by_id(&self, description: &NodeDescription) -> Statement {
        self.prepare_find(
            description,
            self.id_expression(description).is_in(parameter(IDS_PARAMETER)),
        )
    }

    /// `MATCH (n:L) WHERE condition RETURN count(n)`
    pub fn prepare_count(&self, description: &NodeDescription, condition: Condition) -> Statement {
        self.prepare_match_of(description, condition)
            .returning([count(self.root_variable())])
            .build()
    }

    /// `MATCH (n:L) WHERE condition DETACH DELETE n`
    pub fn prepare_delete_of(
        &self,
        description: &NodeDescription,
        condition: Condition,
    ) -> Statement {
        self.prepare_match_of(description, condition)
            .detach_delete([self.root_variable()])
            .build()
    }

    /// Delete one node by id and expected version, returning how many nodes
    /// were deleted as `__count__`.
    pub fn prepare_delete_with_version(&self, description: &NodeDescription) -> Statement {
        let mut condition = self
            .id_expression(description)
            .is_equal_to(parameter(ID_PARAMETER));
        if let Some(version) = description.version() {
            condition = condition.and(
                property(&self.config.root_node_name, &version.graph_name)
                    .is_equal_to(parameter(VERSION_PARAMETER)),
            );
        }
        self.prepare_match_of(description, condition)
            .detach_delete([self.root_variable()])
            .returning([count(asterisk()).aliased(COUNT_ALIAS)])
            .build()
    }

    /// Write one node and return its internal id as `__internal_id__`.
    ///
    /// Unversioned types with application-side ids are merged on the id
    /// property. Internal-id and versioned types are created when new and
    /// matched by id (and by expected version) otherwise.
    pub fn prepare_save_of(&self, description: &NodeDescription, is_new: bool) -> Statement {
        let root = self.root(description);
        let set = SetItem::mutate(&root, parameter(PROPERTIES_PARAMETER));
        let returning = [self.root_node().internal_id().aliased(INTERNAL_ID_ALIAS)];

        match description.id_description.graph_property() {
            Some(id_property) if !description.is_versioned() => {
                let keyed = root.with_properties([(id_property, parameter(ID_PARAMETER))]);
                merge([keyed]).set([set]).returning(returning).build()
            }
            _ if is_new => graphmap_cypher::create([root])
                .set([set])
                .returning(returning)
                .build(),
            _ => {
                let mut condition = self
                    .id_expression(description)
                    .is_equal_to(parameter(ID_PARAMETER));
                if let Some(version) = description.version() {
                    condition = condition.and(
                        property(&self.config.root_node_name, &version.graph_name)
                            .is_equal_to(parameter(VERSION_PARAMETER)),
                    );
                }
                match_([root])
                    .where_(condition)
                    .set([set])
                    .returning(returning)
                    .build()
            }
        }
    }

    /// Write many nodes of one type with a single statement.
    ///
    /// Only unversioned types with an application-side id qualify; returns
    /// `None` otherwise. `$__entities__` is a list of maps with the keys
    /// `__id__` and `__properties__`.
    pub fn prepare_save_of_many(&self, description: &NodeDescription) -> Option<Statement> {
        let id_property = description.id_description.graph_property()?;
        if description.is_versioned() {
            return None;
        }

        let root = self
            .root(description)
            .with_properties([(id_property, property(ENTITY_VARIABLE, ID_PARAMETER))]);
        let set = SetItem::mutate(&root, property(ENTITY_VARIABLE, PROPERTIES_PARAMETER));
        Some(
            unwind(parameter(ENTITIES_PARAMETER), ENTITY_VARIABLE)
                .merge([root])
                .set([set])
                .returning([collect(
                    property(&self.config.root_node_name, id_property),
                )
                .aliased(IDS_PARAMETER)])
                .build(),
        )
    }

    /// Merge the relationship between two existing nodes, identified by
    /// `$__fromId__` and `$__toId__`.
    pub fn prepare_relationship_creation(
        &self,
        from: &NodeDescription,
        relationship: &RelationshipDescription,
        to: &NodeDescription,
    ) -> Statement {
        let start = from.node_pattern(START_NODE_NAME);
        let end = to.node_pattern(END_NODE_NAME);
        let condition = from
            .id_expression(START_NODE_NAME)
            .is_equal_to(parameter(FROM_ID_PARAMETER))
            .and(
                to.id_expression(END_NODE_NAME)
                    .is_equal_to(parameter(TO_ID_PARAMETER)),
            );

        let start_ref = Node::any().named(START_NODE_NAME);
        let end_ref = Node::any().named(END_NODE_NAME);
        let path = hop(&start_ref, &end_ref, relationship).named(RELATIONSHIP_VARIABLE);

        match_([start, end]).where_(condition).merge([path]).build()
    }

    /// Delete every relationship of one mapped type from the node identified
    /// by `$__fromId__`, returning how many were removed as `__count__`.
    pub fn prepare_relationship_removal(
        &self,
        from: &NodeDescription,
        relationship: &RelationshipDescription,
    ) -> Statement {
        let start = from.node_pattern(START_NODE_NAME);
        let target = node(&relationship.target_label);
        let path = hop(&start, &target, relationship).named(RELATIONSHIP_VARIABLE);

        match_([path])
            .where_(
                from.id_expression(START_NODE_NAME)
                    .is_equal_to(parameter(FROM_ID_PARAMETER)),
            )
            .delete([name(RELATIONSHIP_VARIABLE)])
            .returning([count(name(RELATIONSHIP_VARIABLE)).aliased(COUNT_ALIAS)])
            .build()
    }

    fn root_node(&self) -> Node {
        Node::any().named(&self.config.root_node_name)
    }
}

fn hop(start: &Node, end: &Node, relationship: &RelationshipDescription) -> Relationship {
    let types = [relationship.rel_type.as_str()];
    match relationship.direction {
        Direction::Outgoing => start.relationship_to(end, &types),
        Direction::Incoming => start.relationship_from(end, &types),
        Direction::Undirected => start.relationship_between(end, &types),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        GenerationStrategy, IdDescription, PropertyDescription, RelationshipDescription,
    };
    use crate::value::DomainType;
    use graphmap_cypher::no_condition;

    fn property_of(name: &str, domain_type: DomainType) -> PropertyDescription {
        PropertyDescription {
            domain_name: name.to_string(),
            graph_name: name.to_string(),
            domain_type,
            is_association: false,
            date_format: None,
        }
    }

    fn owns() -> RelationshipDescription {
        RelationshipDescription {
            field_name: "bikes".to_string(),
            rel_type: "OWNS".to_string(),
            direction: Direction::Outgoing,
            target_label: "Bike".to_string(),
            target_type: "Bike".to_string(),
            cascade_updates: true,
            is_collection: true,
        }
    }

    fn user() -> NodeDescription {
        NodeDescription {
            primary_label: "User".to_string(),
            additional_labels: Vec::new(),
            type_name: "User".to_string(),
            id_description: IdDescription::InternalId {
                attribute: "id".to_string(),
            },
            properties: vec![property_of("name", DomainType::String)],
            relationships: vec![owns()],
            version_property: None,
            constructor: Vec::new(),
        }
    }

    fn bike() -> NodeDescription {
        NodeDescription {
            primary_label: "Bike".to_string(),
            additional_labels: Vec::new(),
            type_name: "Bike".to_string(),
            id_description: IdDescription::GeneratedId {
                attribute: "id".to_string(),
                graph_property: "id".to_string(),
                strategy: GenerationStrategy::Uuid,
            },
            properties: vec![property_of("id", DomainType::Uuid)],
            relationships: Vec::new(),
            version_property: None,
            constructor: Vec::new(),
        }
    }

    fn document() -> NodeDescription {
        NodeDescription {
            primary_label: "Document".to_string(),
            additional_labels: vec!["Versioned".to_string()],
            type_name: "Document".to_string(),
            id_description: IdDescription::ExternallyAssignedId {
                attribute: "id".to_string(),
                graph_property: "id".to_string(),
                generator: None,
            },
            properties: vec![
                property_of("id", DomainType::String),
                property_of("version", DomainType::Long),
            ],
            relationships: Vec::new(),
            version_property: Some("version".to_string()),
            constructor: Vec::new(),
        }
    }

    #[test]
    fn test_find_by_id_depth_one() {
        let config = MappingConfig::default();
        let generator = CypherGenerator::new(&config);
        assert_eq!(
            generator.prepare_find_by_id(&user()).cypher(),
            "MATCH (n:`User`) WHERE id(n) = $__id__ \
             OPTIONAL MATCH (n)-[__rel__]-(__related__) \
             RETURN n, collect(__rel__) AS __relationships__, \
             collect(__related__) AS __related_nodes__"
        );
    }

    #[test]
    fn test_find_depth_zero_and_deep() {
        let shallow = MappingConfig::default().with_fetch_depth(0);
        assert_eq!(
            CypherGenerator::new(&shallow)
                .prepare_find(&user(), no_condition())
                .cypher(),
            "MATCH (n:`User`) RETURN n"
        );

        let deep = MappingConfig::default().with_fetch_depth(3);
        let text = CypherGenerator::new(&deep)
            .prepare_find_all_by_id(&bike())
            .cypher();
        assert!(text.starts_with("MATCH (n:`Bike`) WHERE n.id IN $__ids__ "));
        assert!(text.contains("OPTIONAL MATCH (n)-[__rel__*1..3]-(__related__)"));
    }

    #[test]
    fn test_count_and_delete() {
        let config = MappingConfig::default();
        let generator = CypherGenerator::new(&config);
        assert_eq!(
            generator.prepare_count(&user(), no_condition()).cypher(),
            "MATCH (n:`User`) RETURN count(n)"
        );
        let condition = generator
            .id_expression(&user())
            .is_equal_to(parameter(ID_PARAMETER));
        assert_eq!(
            generator.prepare_delete_of(&user(), condition).cypher(),
            "MATCH (n:`User`) WHERE id(n) = $__id__ DETACH DELETE n"
        );
    }

    #[test]
    fn test_delete_with_version() {
        let config = MappingConfig::default();
        assert_eq!(
            CypherGenerator::new(&config)
                .prepare_delete_with_version(&document())
                .cypher(),
            "MATCH (n:`Document`:`Versioned`) \
             WHERE (n.id = $__id__ AND n.version = $__version__) \
             DETACH DELETE n RETURN count(*) AS __count__"
        );
    }

    #[test]
    fn test_save_merges_on_assigned_id() {
        let config = MappingConfig::default();
        let generator = CypherGenerator::new(&config);
        let expected = "MERGE (n:`Bike` {id: $__id__}) SET n += $__properties__ \
                        RETURN id(n) AS __internal_id__";
        assert_eq!(generator.prepare_save_of(&bike(), true).cypher(), expected);
        assert_eq!(generator.prepare_save_of(&bike(), false).cypher(), expected);
    }

    #[test]
    fn test_save_internal_id() {
        let config = MappingConfig::default();
        let generator = CypherGenerator::new(&config);
        assert_eq!(
            generator.prepare_save_of(&user(), true).cypher(),
            "CREATE (n:`User`) SET n += $__properties__ RETURN id(n) AS __internal_id__"
        );
        assert_eq!(
            generator.prepare_save_of(&user(), false).cypher(),
            "MATCH (n:`User`) WHERE id(n) = $__id__ SET n += $__properties__ \
             RETURN id(n) AS __internal_id__"
        );
    }

    #[test]
    fn test_save_versioned() {
        let config = MappingConfig::default();
        let generator = CypherGenerator::new(&config);
        assert_eq!(
            generator.prepare_save_of(&document(), true).cypher(),
            "CREATE (n:`Document`:`Versioned`) SET n += $__properties__ \
             RETURN id(n) AS __internal_id__"
        );
        assert_eq!(
            generator.prepare_save_of(&document(), false).cypher(),
            "MATCH (n:`Document`:`Versioned`) \
             WHERE (n.id = $__id__ AND n.version = $__version__) \
             SET n += $__properties__ RETURN id(n) AS __internal_id__"
        );
    }

    #[test]
    fn test_save_many() {
        let config = MappingConfig::default();
        let generator = CypherGenerator::new(&config);
        assert_eq!(
            generator.prepare_save_of_many(&bike()).map(|s| s.cypher()),
            Some(
                "UNWIND $__entities__ AS entity \
                 MERGE (n:`Bike` {id: entity.__id__}) \
                 SET n += entity.__properties__ \
                 RETURN collect(n.id) AS __ids__"
                    .to_string()
            )
        );
        assert!(generator.prepare_save_of_many(&user()).is_none());
        assert!(generator.prepare_save_of_many(&document()).is_none());
    }

    #[test]
    fn test_relationship_creation() {
        let config = MappingConfig::default();
        assert_eq!(
            CypherGenerator::new(&config)
                .prepare_relationship_creation(&user(), &owns(), &bike())
                .cypher(),
            "MATCH (startNode:`User`), (endNode:`Bike`) \
             WHERE (id(startNode) = $__fromId__ AND endNode.id = $__toId__) \
             MERGE (startNode)-[rel:`OWNS`]->(endNode)"
        );
    }

    #[test]
    fn test_relationship_removal_incoming() {
        let config = MappingConfig::default();
        let mut owner = owns();
        owner.direction = Direction::Incoming;
        owner.target_label = "User".to_string();
        assert_eq!(
            CypherGenerator::new(&config)
                .prepare_relationship_removal(&bike(), &owner)
                .cypher(),
            "MATCH (startNode:`Bike`)<-[rel:`OWNS`]-(:`User`) \
             WHERE startNode.id = $__fromId__ DELETE rel RETURN count(rel) AS __count__"
        );
    }

    #[test]
    fn test_custom_root_name() {
        let config = MappingConfig::default()
            .with_root_node_name("u")
            .with_fetch_depth(0);
        assert_eq!(
            CypherGenerator::new(&config)
                .prepare_find_by_id(&user())
                .cypher(),
            "MATCH (u:`User`) WHERE id(u) = $__id__ RETURN u"
        );
    }
}
