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

//! Cascading save of entity graphs.
//!
//! One save call walks the graph reachable from its roots. An identity map
//! keyed by [`EntityRef`] identity makes every instance visit at most once,
//! which terminates cycles and writes shared instances a single time.
//! Relationship writes are collected during the walk and issued after all
//! nodes, so both ends of a relationship have ids by the time it is merged.
//!
//! The engine runs inside whatever transaction the runner provides and never
//! rolls back: on failure, earlier writes of the same call stay applied.

use graphmap_cypher::{CypherStatement, CypherValue, Direction, StatementType};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::config::MappingConfig;
use crate::context::MappingContext;
use crate::entity::EntityRef;
use crate::error::{OgmError, Result};
use crate::generator::{
    CypherGenerator, COUNT_ALIAS, ENTITIES_PARAMETER, FROM_ID_PARAMETER, ID_PARAMETER,
    INTERNAL_ID_ALIAS, PROPERTIES_PARAMETER, TO_ID_PARAMETER, VERSION_PARAMETER,
};
use crate::id::{IdGenerator, IdGeneratorRegistry, UuidGenerator};
use crate::materialize::EntityMaterializer;
use crate::record::Record;
use crate::runner::StatementRunner;
use crate::schema::{IdDescription, NodeDescription, RelationshipDescription};
use crate::value::DomainValue;

static NO_GENERATORS: Lazy<IdGeneratorRegistry> = Lazy::new(IdGeneratorRegistry::new);

/// What one save call wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    /// Node writes issued.
    pub nodes_written: usize,
    /// Relationships merged.
    pub relationships_written: usize,
    /// Stale relationships removed before re-writing.
    pub relationships_removed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveMode {
    /// Write the entity and cascade.
    Full,
    /// Write the entity only if it is new.
    InsertOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Visiting,
    Saved,
}

struct PendingRelationship {
    from: EntityRef,
    from_description: Arc<NodeDescription>,
    relationship: RelationshipDescription,
    to: EntityRef,
    to_description: Arc<NodeDescription>,
}

impl PendingRelationship {
    /// Type plus ends in storage direction, so both sides of one physical
    /// relationship produce the same key.
    fn key(&self) -> (String, usize, usize) {
        let from = self.from.identity();
        let to = self.to.identity();
        let (start, end) = match self.relationship.direction {
            Direction::Outgoing => (from, to),
            Direction::Incoming => (to, from),
            Direction::Undirected => (from.min(to), from.max(to)),
        };
        (self.relationship.rel_type.clone(), start, end)
    }
}

/// State of one save call.
#[derive(Default)]
struct SaveSession {
    states: HashMap<EntityRef, VisitState>,
    pending: Vec<PendingRelationship>,
    pending_keys: HashSet<(String, usize, usize)>,
    summary: SaveSummary,
}

impl SaveSession {
    fn queue(&mut self, relationship: PendingRelationship) {
        if self.pending_keys.insert(relationship.key()) {
            self.pending.push(relationship);
        }
    }
}

/// Writes entity graphs through a [`StatementRunner`].
pub struct PersistenceEngine<'a> {
    context: &'a MappingContext,
    config: &'a MappingConfig,
    id_generators: &'a IdGeneratorRegistry,
    runner: &'a mut dyn StatementRunner,
}

impl<'a> PersistenceEngine<'a> {
    /// Create an engine without named id generators.
    pub fn new(
        context: &'a MappingContext,
        config: &'a MappingConfig,
        runner: &'a mut dyn StatementRunner,
    ) -> Self {
        Self {
            context,
            config,
            id_generators: &NO_GENERATORS,
            runner,
        }
    }

    /// Use named id generators.
    pub fn with_id_generators(mut self, id_generators: &'a IdGeneratorRegistry) -> Self {
        self.id_generators = id_generators;
        self
    }

    /// Save one entity and everything reachable from it.
    pub fn save(&mut self, entity: &EntityRef) -> Result<SaveSummary> {
        self.save_all(std::slice::from_ref(entity))
    }

    /// Save several roots sharing one identity map.
    pub fn save_all(&mut self, entities: &[EntityRef]) -> Result<SaveSummary> {
        let mut session = SaveSession::default();

        match self.batch_description(entities)? {
            Some(description) => self.save_batch(entities, &description, &mut session)?,
            None => {
                for entity in entities {
                    self.save_entity(entity, SaveMode::Full, &mut session)?;
                }
            }
        }
        self.write_relationships(&mut session)?;

        let summary = session.summary;
        debug!(
            "Saved {} roots: {} nodes written, {} relationships written, {} removed",
            entities.len(),
            summary.nodes_written,
            summary.relationships_written,
            summary.relationships_removed
        );
        Ok(summary)
    }

    /// Whether an entity has not been stored yet. Versioned types are new
    /// while their version is unset, all others while their id is unset.
    pub fn is_new(entity: &EntityRef, description: &NodeDescription) -> bool {
        let entity = entity.read();
        match &description.version_property {
            Some(version) => entity.is_unset(version),
            None => entity.is_unset(description.id_description.attribute()),
        }
    }

    /// The description shared by all roots, when they can be written with
    /// one batch statement.
    fn batch_description(&self, entities: &[EntityRef]) -> Result<Option<Arc<NodeDescription>>> {
        if !self.config.batch_save || entities.len() < 2 {
            return Ok(None);
        }
        let type_name = entities[0].type_name();
        if entities.iter().any(|e| e.type_name() != type_name) {
            return Ok(None);
        }
        let description = self.context.required_description(&type_name)?;
        let generator = CypherGenerator::new(self.config);
        Ok(generator
            .prepare_save_of_many(&description)
            .map(|_| description))
    }

    fn save_entity(
        &mut self,
        entity: &EntityRef,
        mode: SaveMode,
        session: &mut SaveSession,
    ) -> Result<()> {
        if session.states.contains_key(entity) {
            return Ok(());
        }
        let description = self.context.required_description(&entity.type_name())?;
        let is_new = Self::is_new(entity, &description);
        if mode == SaveMode::InsertOnly && !is_new {
            return Ok(());
        }

        session.states.insert(entity.clone(), VisitState::Visiting);
        self.write_node(entity, &description, is_new, session)?;
        self.walk_relationships(entity, &description, session)?;
        session.states.insert(entity.clone(), VisitState::Saved);
        Ok(())
    }

    fn save_batch(
        &mut self,
        entities: &[EntityRef],
        description: &Arc<NodeDescription>,
        session: &mut SaveSession,
    ) -> Result<()> {
        let generator = CypherGenerator::new(self.config);
        let statement = match generator.prepare_save_of_many(description) {
            Some(statement) => statement,
            None => return Ok(()),
        };
        let materializer = EntityMaterializer::new(self.context);

        let mut roots = Vec::new();
        let mut rows = Vec::new();
        for entity in entities {
            if session.states.contains_key(entity) {
                continue;
            }
            let is_new = Self::is_new(entity, description);
            if is_new {
                self.assign_id(entity, description)?;
            }
            let properties = materializer.graph_properties(&entity.read(), description)?;
            let id = self.graph_id(entity, description)?;
            rows.push(CypherValue::Map(BTreeMap::from([
                (ID_PARAMETER.to_string(), id),
                (PROPERTIES_PARAMETER.to_string(), CypherValue::Map(properties)),
            ])));
            session.states.insert(entity.clone(), VisitState::Visiting);
            roots.push((entity.clone(), is_new));
        }

        let statement = CypherStatement::from_statement(statement, StatementType::SaveNode)
            .with_param(ENTITIES_PARAMETER, CypherValue::List(rows));
        self.execute(&statement)?;
        session.summary.nodes_written += roots.len();

        for (entity, is_new) in &roots {
            if !is_new {
                self.remove_stale_relationships(entity, description, session)?;
            }
        }
        for (entity, _) in roots {
            self.walk_relationships(&entity, description, session)?;
            session.states.insert(entity, VisitState::Saved);
        }
        Ok(())
    }

    fn write_node(
        &mut self,
        entity: &EntityRef,
        description: &NodeDescription,
        is_new: bool,
        session: &mut SaveSession,
    ) -> Result<()> {
        if is_new {
            self.assign_id(entity, description)?;
        }

        let mut properties =
            EntityMaterializer::new(self.context).graph_properties(&entity.read(), description)?;

        let mut current_version = None;
        let mut next_version = None;
        if let Some(version) = description.version() {
            let next = if is_new {
                0
            } else {
                let current = entity.value(&version.domain_name).as_long().ok_or_else(|| {
                    OgmError::Conversion(format!(
                        "version of '{}' must be an integer",
                        description.type_name
                    ))
                })?;
                current_version = Some(current);
                current + 1
            };
            properties.insert(version.graph_name.clone(), CypherValue::Int(next));
            next_version = Some(next);
        }

        let generator = CypherGenerator::new(self.config);
        let mut statement = CypherStatement::from_statement(
            generator.prepare_save_of(description, is_new),
            StatementType::SaveNode,
        )
        .with_param(PROPERTIES_PARAMETER, CypherValue::Map(properties));
        let id = self.graph_id(entity, description)?;
        if !id.is_null() {
            statement = statement.with_param(ID_PARAMETER, id);
        }
        if let Some(current) = current_version {
            statement = statement.with_param(VERSION_PARAMETER, CypherValue::Int(current));
        }

        let records = self.execute(&statement)?;
        let row = match records.into_iter().next() {
            Some(row) => row,
            None => {
                let id = entity.value(description.id_description.attribute()).to_string();
                if current_version.is_some() {
                    warn!(
                        "Optimistic locking failed for :{} with id {}",
                        description.primary_label, id
                    );
                    return Err(OgmError::OptimisticLockFailure {
                        label: description.primary_label.clone(),
                        id,
                    });
                }
                return Err(OgmError::NotFound {
                    label: description.primary_label.clone(),
                    id,
                });
            }
        };
        session.summary.nodes_written += 1;

        if let IdDescription::InternalId { attribute } = &description.id_description {
            let internal_id = row
                .get(INTERNAL_ID_ALIAS)
                .and_then(|v| v.as_int())
                .ok_or_else(|| {
                    OgmError::Conversion(format!(
                        "save of '{}' returned no internal id",
                        description.type_name
                    ))
                })?;
            entity.set(attribute.clone(), DomainValue::Long(internal_id));
        }
        if let (Some(version), Some(next)) = (description.version(), next_version) {
            let value =
                self.context
                    .registry()
                    .read_value(&CypherValue::Int(next), &version.domain_type, None)?;
            entity.set(version.domain_name.clone(), value);
        }

        if !is_new {
            self.remove_stale_relationships(entity, description, session)?;
        }
        Ok(())
    }

    /// Produce an application-side id for a new entity that has none.
    fn assign_id(&self, entity: &EntityRef, description: &NodeDescription) -> Result<()> {
        let attribute = description.id_description.attribute();
        if !entity.read().is_unset(attribute) {
            return Ok(());
        }
        let label = &description.primary_label;
        let id = match &description.id_description {
            IdDescription::InternalId { .. } => return Ok(()),
            IdDescription::GeneratedId { .. } => UuidGenerator.generate_id(label, &entity.read())?,
            IdDescription::ExternallyAssignedId {
                generator: Some(name),
                ..
            } => self
                .id_generators
                .required(name)?
                .generate_id(label, &entity.read())?,
            IdDescription::ExternallyAssignedId {
                generator: None, ..
            } => {
                return Err(OgmError::IdGeneration(format!(
                    "new '{}' has no assigned id",
                    description.type_name
                )))
            }
        };
        entity.set(attribute, id);
        Ok(())
    }

    /// The entity's id in graph form, null when unset.
    fn graph_id(&self, entity: &EntityRef, description: &NodeDescription) -> Result<CypherValue> {
        let id = entity.value(description.id_description.attribute());
        if id.is_null() {
            return Ok(CypherValue::Null);
        }
        self.context.id_to_graph_value(description, &id)
    }

    fn remove_stale_relationships(
        &mut self,
        entity: &EntityRef,
        description: &NodeDescription,
        session: &mut SaveSession,
    ) -> Result<()> {
        if !self.config.delete_stale_relationships || description.relationships.is_empty() {
            return Ok(());
        }
        let id = self.graph_id(entity, description)?;
        let generator = CypherGenerator::new(self.config);
        for relationship in &description.relationships {
            let statement = CypherStatement::from_statement(
                generator.prepare_relationship_removal(description, relationship),
                StatementType::DeleteRelationship,
            )
            .with_param(FROM_ID_PARAMETER, id.clone());
            let removed = self
                .execute(&statement)?
                .first()
                .and_then(|row| row.get(COUNT_ALIAS))
                .and_then(|v| v.as_int())
                .unwrap_or(0);
            session.summary.relationships_removed += usize::try_from(removed).unwrap_or(0);
        }
        Ok(())
    }

    fn walk_relationships(
        &mut self,
        entity: &EntityRef,
        description: &Arc<NodeDescription>,
        session: &mut SaveSession,
    ) -> Result<()> {
        for relationship in &description.relationships {
            let mode = if relationship.cascade_updates {
                SaveMode::Full
            } else {
                SaveMode::InsertOnly
            };
            for related in entity.related(&relationship.field_name) {
                let related_description = self.context.required_description(&related.type_name())?;
                self.save_entity(&related, mode, session)?;
                session.queue(PendingRelationship {
                    from: entity.clone(),
                    from_description: Arc::clone(description),
                    relationship: relationship.clone(),
                    to: related,
                    to_description: related_description,
                });
            }
        }
        Ok(())
    }

    fn write_relationships(&mut self, session: &mut SaveSession) -> Result<()> {
        let generator = CypherGenerator::new(self.config);
        for pending in std::mem::take(&mut session.pending) {
            let from = self.required_graph_id(&pending.from, &pending.from_description)?;
            let to = self.required_graph_id(&pending.to, &pending.to_description)?;
            let statement = CypherStatement::from_statement(
                generator.prepare_relationship_creation(
                    &pending.from_description,
                    &pending.relationship,
                    &pending.to_description,
                ),
                StatementType::CreateRelationship,
            )
            .with_param(FROM_ID_PARAMETER, from)
            .with_param(TO_ID_PARAMETER, to);
            self.execute(&statement)?;
            session.summary.relationships_written += 1;
        }
        Ok(())
    }

    fn required_graph_id(
        &self,
        entity: &EntityRef,
        description: &NodeDescription,
    ) -> Result<CypherValue> {
        let id = self.graph_id(entity, description)?;
        if id.is_null() {
            return Err(OgmError::UnsavedRelationshipEnd(description.type_name.clone()));
        }
        Ok(id)
    }

    fn execute(&mut self, statement: &CypherStatement) -> Result<Vec<Record>> {
        self.config.validate()?;
        statement.validate()?;
        trace!("Executing {:?}: {}", statement.statement_type, statement.query);
        self.runner.run(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::schema::{AttributeDescription, IdStrategy, TypeDescription};
    use crate::value::DomainType;

    /// Answers node saves with increasing internal ids and records every
    /// statement.
    #[derive(Default)]
    struct RecordingRunner {
        next_id: i64,
        executed: Vec<CypherStatement>,
        fail_matches: bool,
    }

    impl StatementRunner for RecordingRunner {
        fn run(&mut self, statement: &CypherStatement) -> Result<Vec<Record>> {
            self.executed.push(statement.clone());
            match statement.statement_type {
                StatementType::SaveNode if self.fail_matches && statement.query.starts_with("MATCH") => {
                    Ok(Vec::new())
                }
                StatementType::SaveNode => {
                    self.next_id += 1;
                    Ok(vec![Record::new().with(INTERNAL_ID_ALIAS, CypherValue::Int(self.next_id))])
                }
                StatementType::DeleteRelationship => {
                    Ok(vec![Record::new().with(COUNT_ALIAS, CypherValue::Int(1))])
                }
                _ => Ok(Vec::new()),
            }
        }
    }

    fn context() -> MappingContext {
        let context = MappingContext::new();
        context
            .register(&[
                TypeDescription::new("Person")
                    .field("id", DomainType::Long)
                    .field("name", DomainType::String)
                    .field("knows", DomainType::list_of(DomainType::Entity("Person".to_string())))
                    .attribute(
                        AttributeDescription::new("employer", DomainType::Entity("Company".to_string()))
                            .relationship_type("WORKS_AT")
                            .without_cascade(),
                    )
                    .id("id", IdStrategy::Internal),
                TypeDescription::new("Company")
                    .field("name", DomainType::String)
                    .id("name", IdStrategy::Assigned),
                TypeDescription::new("Note")
                    .field("id", DomainType::Uuid)
                    .field("version", DomainType::Int)
                    .id("id", IdStrategy::GeneratedUuid)
                    .version("version"),
            ])
            .unwrap();
        context
    }

    fn person(name: &str) -> EntityRef {
        EntityRef::new(Entity::new("Person").with("name", name))
    }

    #[test]
    fn test_cycle_writes_each_node_once() {
        let context = context();
        let config = MappingConfig::default();
        let mut runner = RecordingRunner::default();

        let a = person("A");
        let b = person("B");
        a.write().set_entities("knows", vec![b.clone()]);
        b.write().set_entities("knows", vec![a.clone()]);

        let summary = PersistenceEngine::new(&context, &config, &mut runner)
            .save(&a)
            .unwrap();
        assert_eq!(summary.nodes_written, 2);
        assert_eq!(summary.relationships_written, 2);
        assert_eq!(a.value("id"), DomainValue::Long(1));
        assert_eq!(b.value("id"), DomainValue::Long(2));

        let kinds: Vec<StatementType> = runner.executed.iter().map(|s| s.statement_type).collect();
        assert_eq!(
            kinds,
            vec![
                StatementType::SaveNode,
                StatementType::SaveNode,
                StatementType::CreateRelationship,
                StatementType::CreateRelationship,
            ]
        );
    }

    #[test]
    fn test_existing_non_cascaded_target_only_gets_pointer() {
        let context = context();
        let config = MappingConfig::default();
        let mut runner = RecordingRunner::default();

        let company = EntityRef::new(Entity::new("Company").with("name", "Acme"));
        let employee = EntityRef::new(Entity::new("Person").with("name", "E").with_entity("employer", &company));

        let summary = PersistenceEngine::new(&context, &config, &mut runner)
            .save(&employee)
            .unwrap();
        assert_eq!(summary.nodes_written, 1);
        assert_eq!(summary.relationships_written, 1);
        let relationship = runner.executed.last().unwrap();
        assert_eq!(relationship.parameters.get(TO_ID_PARAMETER), Some(&CypherValue::from("Acme")));
    }

    #[test]
    fn test_relationship_end_without_id() {
        let context = context();
        let config = MappingConfig::default();
        let mut runner = RecordingRunner::default();
        let description = context.required_description("Person").unwrap();

        let engine = PersistenceEngine::new(&context, &config, &mut runner);
        assert!(matches!(
            engine.required_graph_id(&person("Unsaved"), &description),
            Err(OgmError::UnsavedRelationshipEnd(name)) if name == "Person"
        ));
        let saved = EntityRef::new(Entity::new("Person").with("id", 7i64));
        assert_eq!(
            engine.required_graph_id(&saved, &description).unwrap(),
            CypherValue::Int(7)
        );
    }

    #[test]
    fn test_update_removes_stale_relationships() {
        let context = context();
        let config = MappingConfig::default();
        let mut runner = RecordingRunner::default();

        let existing = EntityRef::new(Entity::new("Person").with("id", 41i64).with("name", "Old"));
        let summary = PersistenceEngine::new(&context, &config, &mut runner)
            .save(&existing)
            .unwrap();
        assert_eq!(summary.relationships_removed, 2);
        assert!(runner.executed[0].query.starts_with("MATCH (n:`Person`) WHERE id(n) = $__id__"));
        assert_eq!(runner.executed[0].parameters.get(ID_PARAMETER), Some(&CypherValue::Int(41)));
    }

    #[test]
    fn test_versioned_lifecycle() {
        let context = context();
        let config = MappingConfig::default();
        let mut runner = RecordingRunner::default();

        let note = EntityRef::new(Entity::new("Note"));
        PersistenceEngine::new(&context, &config, &mut runner)
            .save(&note)
            .unwrap();
        assert_eq!(note.value("version"), DomainValue::Int(0));
        assert!(matches!(note.value("id"), DomainValue::Uuid(_)));

        PersistenceEngine::new(&context, &config, &mut runner)
            .save(&note)
            .unwrap();
        assert_eq!(note.value("version"), DomainValue::Int(1));
        let update = runner.executed.last().unwrap();
        assert_eq!(update.parameters.get(VERSION_PARAMETER), Some(&CypherValue::Int(0)));
    }

    #[test]
    fn test_stale_version_fails_without_applying() {
        let context = context();
        let config = MappingConfig::default();
        let mut runner = RecordingRunner {
            fail_matches: true,
            ..RecordingRunner::default()
        };

        let note = EntityRef::new(
            Entity::new("Note")
                .with("id", uuid::Uuid::new_v4())
                .with("version", 3i32),
        );
        let err = PersistenceEngine::new(&context, &config, &mut runner)
            .save(&note)
            .unwrap_err();
        assert!(matches!(err, OgmError::OptimisticLockFailure { ref label, .. } if label == "Note"));
        assert_eq!(note.value("version"), DomainValue::Int(3));
    }

    #[test]
    fn test_assigned_id_required() {
        let context = context();
        let config = MappingConfig::default();
        let mut runner = RecordingRunner::default();

        let nameless = EntityRef::new(Entity::new("Company"));
        assert!(matches!(
            PersistenceEngine::new(&context, &config, &mut runner).save(&nameless),
            Err(OgmError::IdGeneration(_))
        ));
        assert!(runner.executed.is_empty());
    }

    #[test]
    fn test_batch_save_uses_one_statement() {
        let context = context();
        let config = MappingConfig::default();
        let mut runner = RecordingRunner::default();

        let companies: Vec<EntityRef> = ["A", "B", "C"]
            .iter()
            .map(|name| EntityRef::new(Entity::new("Company").with("name", *name)))
            .collect();
        let summary = PersistenceEngine::new(&context, &config, &mut runner)
            .save_all(&companies)
            .unwrap();
        assert_eq!(summary.nodes_written, 3);
        assert_eq!(runner.executed.len(), 1);
        assert!(runner.executed[0].query.starts_with("UNWIND $__entities__ AS entity"));
        let rows = runner.executed[0]
            .parameters
            .get(ENTITIES_PARAMETER)
            .and_then(CypherValue::as_list)
            .map(<[CypherValue]>::len);
        assert_eq!(rows, Some(3));
    }
}
