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

//! High-level operations on mapped types.
//!
//! [`Template`] ties the mapping context, the generator, the materializer
//! and the persistence engine to one [`StatementRunner`].
//!
//! # Examples
//!
//! ```no_run
//! # use graphmap_core::{MappingContext, Template, StatementRunner, Entity, EntityRef, Result};
//! # fn demo<R: StatementRunner>(runner: R) -> Result<()> {
//! let context = MappingContext::global();
//! let mut template = Template::new(context, runner);
//!
//! let user = EntityRef::new(Entity::new("User").with("name", "Alice"));
//! template.save(&user)?;
//! let loaded = template.find_by_id("User", user.value("id"))?;
//! assert!(loaded.is_some());
//! # Ok(())
//! # }
//! ```

use graphmap_cypher::{parameter, Condition, CypherStatement, CypherValue, StatementType};
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::config::MappingConfig;
use crate::context::MappingContext;
use crate::entity::EntityRef;
use crate::error::{OgmError, Result};
use crate::generator::{
    CypherGenerator, COUNT_ALIAS, IDS_PARAMETER, ID_PARAMETER, VERSION_PARAMETER,
};
use crate::id::IdGeneratorRegistry;
use crate::materialize::EntityMaterializer;
use crate::persist::{PersistenceEngine, SaveSummary};
use crate::record::Record;
use crate::runner::StatementRunner;
use crate::schema::NodeDescription;
use crate::value::DomainValue;

/// Load, count, save and delete entities through one runner.
pub struct Template<'a, R: StatementRunner> {
    context: &'a MappingContext,
    config: MappingConfig,
    id_generators: IdGeneratorRegistry,
    runner: R,
}

impl<'a, R: StatementRunner> Template<'a, R> {
    /// Create a template with the default configuration.
    pub fn new(context: &'a MappingContext, runner: R) -> Self {
        Self {
            context,
            config: MappingConfig::default(),
            id_generators: IdGeneratorRegistry::new(),
            runner,
        }
    }

    /// Use a custom configuration.
    pub fn with_config(mut self, config: MappingConfig) -> Self {
        self.config = config;
        self
    }

    /// Use named id generators.
    pub fn with_id_generators(mut self, id_generators: IdGeneratorRegistry) -> Self {
        self.id_generators = id_generators;
        self
    }

    /// The configuration.
    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// The runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// The runner, mutably.
    pub fn runner_mut(&mut self) -> &mut R {
        &mut self.runner
    }

    /// Give back the runner.
    pub fn into_runner(self) -> R {
        self.runner
    }

    /// All entities of a type.
    pub fn find_all(&mut self, type_name: &str) -> Result<Vec<EntityRef>> {
        let description = self.context.required_description(type_name)?;
        let statement = CypherStatement::query(
            CypherGenerator::new(&self.config).prepare_find(&description, Condition::NoCondition),
        );
        self.load(&statement, &description)
    }

    /// The entity with the given id, if it exists.
    pub fn find_by_id(
        &mut self,
        type_name: &str,
        id: impl Into<DomainValue>,
    ) -> Result<Option<EntityRef>> {
        let description = self.context.required_description(type_name)?;
        let id = self.context.id_to_graph_value(&description, &id.into())?;
        let statement =
            CypherStatement::query(CypherGenerator::new(&self.config).prepare_find_by_id(&description))
                .with_param(ID_PARAMETER, id);
        Ok(self.load(&statement, &description)?.into_iter().next())
    }

    /// The entities with the given ids. Missing ids are skipped.
    pub fn find_all_by_id<I, V>(&mut self, type_name: &str, ids: I) -> Result<Vec<EntityRef>>
    where
        I: IntoIterator<Item = V>,
        V: Into<DomainValue>,
    {
        let description = self.context.required_description(type_name)?;
        let ids = self.graph_ids(&description, ids)?;
        let statement = CypherStatement::query(
            CypherGenerator::new(&self.config).prepare_find_all_by_id(&description),
        )
        .with_param(IDS_PARAMETER, ids);
        self.load(&statement, &description)
    }

    /// Number of stored entities of a type.
    pub fn count(&mut self, type_name: &str) -> Result<u64> {
        let description = self.context.required_description(type_name)?;
        let statement = CypherStatement::query(
            CypherGenerator::new(&self.config).prepare_count(&description, Condition::NoCondition),
        );
        self.run_count(&statement)
    }

    /// Whether an entity with the given id exists.
    pub fn exists_by_id(&mut self, type_name: &str, id: impl Into<DomainValue>) -> Result<bool> {
        let description = self.context.required_description(type_name)?;
        let id = self.context.id_to_graph_value(&description, &id.into())?;
        let generator = CypherGenerator::new(&self.config);
        let condition = generator
            .id_expression(&description)
            .is_equal_to(parameter(ID_PARAMETER));
        let statement = CypherStatement::query(generator.prepare_count(&description, condition))
            .with_param(ID_PARAMETER, id);
        Ok(self.run_count(&statement)? > 0)
    }

    /// Save an entity and everything reachable from it.
    pub fn save(&mut self, entity: &EntityRef) -> Result<SaveSummary> {
        self.save_all(std::slice::from_ref(entity))
    }

    /// Save several entities in one call.
    pub fn save_all(&mut self, entities: &[EntityRef]) -> Result<SaveSummary> {
        PersistenceEngine::new(self.context, &self.config, &mut self.runner)
            .with_id_generators(&self.id_generators)
            .save_all(entities)
    }

    /// Delete the entity with the given id and its relationships.
    pub fn delete_by_id(&mut self, type_name: &str, id: impl Into<DomainValue>) -> Result<()> {
        let description = self.context.required_description(type_name)?;
        let id = self.context.id_to_graph_value(&description, &id.into())?;
        let generator = CypherGenerator::new(&self.config);
        let condition = generator
            .id_expression(&description)
            .is_equal_to(parameter(ID_PARAMETER));
        let statement = CypherStatement::from_statement(
            generator.prepare_delete_of(&description, condition),
            StatementType::DeleteNode,
        )
        .with_param(ID_PARAMETER, id);
        self.execute(&statement)?;
        Ok(())
    }

    /// Delete the entities with the given ids.
    pub fn delete_all_by_id<I, V>(&mut self, type_name: &str, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<DomainValue>,
    {
        let description = self.context.required_description(type_name)?;
        let ids = self.graph_ids(&description, ids)?;
        let generator = CypherGenerator::new(&self.config);
        let condition = generator
            .id_expression(&description)
            .is_in(parameter(IDS_PARAMETER));
        let statement = CypherStatement::from_statement(
            generator.prepare_delete_of(&description, condition),
            StatementType::DeleteNode,
        )
        .with_param(IDS_PARAMETER, ids);
        self.execute(&statement)?;
        Ok(())
    }

    /// Delete every entity of a type.
    pub fn delete_all(&mut self, type_name: &str) -> Result<()> {
        let description = self.context.required_description(type_name)?;
        let statement = CypherStatement::from_statement(
            CypherGenerator::new(&self.config)
                .prepare_delete_of(&description, Condition::NoCondition),
            StatementType::DeleteNode,
        );
        self.execute(&statement)?;
        Ok(())
    }

    /// Delete the entity with the given id only if it still has the given
    /// version.
    pub fn delete_by_id_with_version(
        &mut self,
        type_name: &str,
        id: impl Into<DomainValue>,
        version: impl Into<DomainValue>,
    ) -> Result<()> {
        let description = self.context.required_description(type_name)?;
        let version_property =
            description
                .version()
                .ok_or_else(|| OgmError::UnknownAttribute {
                    type_name: description.type_name.clone(),
                    attribute: "version".to_string(),
                })?;
        let id = id.into();
        let graph_id = self.context.id_to_graph_value(&description, &id)?;
        let version = self
            .context
            .registry()
            .to_graph_value(&version.into(), version_property)?;

        let statement = CypherStatement::from_statement(
            CypherGenerator::new(&self.config).prepare_delete_with_version(&description),
            StatementType::DeleteNode,
        )
        .with_param(ID_PARAMETER, graph_id)
        .with_param(VERSION_PARAMETER, version);

        let deleted = self
            .execute(&statement)?
            .first()
            .and_then(|row| row.get(COUNT_ALIAS))
            .and_then(|v| v.as_int())
            .unwrap_or(0);
        if deleted == 0 {
            warn!(
                "Versioned delete of {} {} matched nothing",
                description.primary_label, id
            );
            return Err(OgmError::OptimisticLockFailure {
                label: description.primary_label.clone(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn graph_ids<I, V>(&self, description: &NodeDescription, ids: I) -> Result<CypherValue>
    where
        I: IntoIterator<Item = V>,
        V: Into<DomainValue>,
    {
        ids.into_iter()
            .map(|id| self.context.id_to_graph_value(description, &id.into()))
            .collect::<Result<Vec<_>>>()
            .map(CypherValue::List)
    }

    fn load(
        &mut self,
        statement: &CypherStatement,
        description: &Arc<NodeDescription>,
    ) -> Result<Vec<EntityRef>> {
        let records = self.execute(statement)?;
        debug!(
            "Materializing {} record(s) as {}",
            records.len(),
            description.primary_label
        );
        let materializer = EntityMaterializer::new(self.context);
        let mut entities = Vec::with_capacity(records.len());
        for entity in materializer.materialize_all(&records, description) {
            if let Some(entity) = entity? {
                entities.push(entity);
            }
        }
        Ok(entities)
    }

    fn run_count(&mut self, statement: &CypherStatement) -> Result<u64> {
        let records: Vec<Record> = self.execute(statement)?;
        let count = records
            .first()
            .and_then(|row| row.values().first())
            .and_then(|v| v.as_int())
            .unwrap_or(0);
        Ok(u64::try_from(count).unwrap_or(0))
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
    use crate::record::GraphNode;
    use crate::schema::{IdStrategy, TypeDescription};
    use crate::value::DomainType;
    use std::collections::VecDeque;

    /// Replays canned responses and records every statement.
    #[derive(Default)]
    struct ScriptedRunner {
        responses: VecDeque<Vec<Record>>,
        executed: Vec<CypherStatement>,
    }

    impl ScriptedRunner {
        fn answering(responses: impl IntoIterator<Item = Vec<Record>>) -> Self {
            Self {
                responses: responses.into_iter().collect(),
                executed: Vec::new(),
            }
        }
    }

    impl StatementRunner for ScriptedRunner {
        fn run(&mut self, statement: &CypherStatement) -> Result<Vec<Record>> {
            self.executed.push(statement.clone());
            Ok(self.responses.pop_front().unwrap_or_default())
        }
    }

    fn context() -> MappingContext {
        let context = MappingContext::new();
        context
            .register(&[
                TypeDescription::new("User")
                    .field("id", DomainType::Long)
                    .field("name", DomainType::String)
                    .id("id", IdStrategy::Internal),
                TypeDescription::new("Document")
                    .field("id", DomainType::String)
                    .field("version", DomainType::Long)
                    .id("id", IdStrategy::Assigned)
                    .version("version"),
            ])
            .unwrap();
        context
    }

    fn count_row(count: i64) -> Vec<Record> {
        vec![Record::new().with(COUNT_ALIAS, CypherValue::Int(count))]
    }

    #[test]
    fn test_find_by_id_materializes_root() {
        let context = context();
        let row = Record::new().with("n", GraphNode::new(7, ["User"]).with_property("name", "Alice"));
        let mut template = Template::new(&context, ScriptedRunner::answering([vec![row]]));

        let user = template.find_by_id("User", 7i64).unwrap().unwrap();
        assert_eq!(user.value("id"), DomainValue::Long(7));
        assert_eq!(user.value("name"), DomainValue::from("Alice"));

        let executed = &template.runner().executed[0];
        assert!(executed.query.starts_with("MATCH (n:`User`) WHERE id(n) = $__id__"));
        assert_eq!(executed.parameters.get(ID_PARAMETER), Some(&CypherValue::Int(7)));
    }

    #[test]
    fn test_find_by_id_without_rows() {
        let context = context();
        let mut template = Template::new(&context, ScriptedRunner::default());
        assert!(template.find_by_id("User", 1i64).unwrap().is_none());
    }

    #[test]
    fn test_find_all_by_id_sends_id_list() {
        let context = context();
        let mut template = Template::new(&context, ScriptedRunner::default());
        let found = template.find_all_by_id("Document", ["a", "b"]).unwrap();
        assert!(found.is_empty());

        let executed = &template.runner().executed[0];
        assert!(executed.query.contains("n.id IN $__ids__"));
        assert_eq!(
            executed.parameters.get(IDS_PARAMETER),
            Some(&CypherValue::List(vec![
                CypherValue::from("a"),
                CypherValue::from("b")
            ]))
        );
    }

    #[test]
    fn test_count_and_exists() {
        let context = context();
        let runner = ScriptedRunner::answering([count_row(3), count_row(0)]);
        let mut template = Template::new(&context, runner);

        assert_eq!(template.count("User").unwrap(), 3);
        assert!(!template.exists_by_id("User", 9i64).unwrap());
        assert_eq!(
            template.runner().executed[0].query,
            "MATCH (n:`User`) RETURN count(n)"
        );
    }

    #[test]
    fn test_unknown_type() {
        let context = context();
        let mut template = Template::new(&context, ScriptedRunner::default());
        assert!(matches!(
            template.count("Ghost"),
            Err(OgmError::UnknownEntity(name)) if name == "Ghost"
        ));
    }

    #[test]
    fn test_delete_statements_are_typed() {
        let context = context();
        let mut template = Template::new(&context, ScriptedRunner::default());
        template.delete_by_id("User", 4i64).unwrap();
        template.delete_all("User").unwrap();

        let executed = &template.runner().executed;
        assert!(executed
            .iter()
            .all(|s| s.statement_type == StatementType::DeleteNode));
        assert_eq!(
            executed[1].query,
            "MATCH (n:`User`) DETACH DELETE n"
        );
    }

    #[test]
    fn test_delete_with_version() {
        let context = context();
        let runner = ScriptedRunner::answering([count_row(1), count_row(0)]);
        let mut template = Template::new(&context, runner);

        template
            .delete_by_id_with_version("Document", "doc-1", 3i64)
            .unwrap();
        let executed = &template.runner().executed[0];
        assert_eq!(executed.parameters.get(VERSION_PARAMETER), Some(&CypherValue::Int(3)));

        assert!(matches!(
            template.delete_by_id_with_version("Document", "doc-1", 2i64),
            Err(OgmError::OptimisticLockFailure { label, .. }) if label == "Document"
        ));
    }

    #[test]
    fn test_delete_with_version_requires_versioned_type() {
        let context = context();
        let mut template = Template::new(&context, ScriptedRunner::default());
        assert!(matches!(
            template.delete_by_id_with_version("User", 1i64, 1i64),
            Err(OgmError::UnknownAttribute { .. })
        ));
        assert!(template.runner().executed.is_empty());
    }
}
