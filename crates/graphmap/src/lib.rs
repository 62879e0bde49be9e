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

//! # Graphmap
//!
//! Graphmap maps mutable, possibly cyclic entity graphs onto nodes and
//! relationships of a property graph, and builds the Cypher statements that
//! read and write them.
//!
//! ## Quick Start
//!
//! ```rust
//! use graphmap::{initialize, template, DomainType, Entity, EntityRef, IdStrategy, TypeDescription};
//! use graphmap_test::InMemoryGraph;
//!
//! initialize(&[TypeDescription::new("User")
//!     .field("id", DomainType::Long)
//!     .field("name", DomainType::String)
//!     .id("id", IdStrategy::Internal)])?;
//!
//! let mut graph = InMemoryGraph::new();
//! let mut users = template(&mut graph);
//!
//! let alice = EntityRef::new(Entity::new("User").with("name", "Alice"));
//! users.save(&alice)?;
//!
//! let loaded = users.find_by_id("User", alice.value("id"))?.expect("saved user");
//! assert_eq!(loaded.value("name").as_str(), Some("Alice"));
//! # Ok::<(), graphmap::OgmError>(())
//! ```
//!
//! ## Modules
//!
//! - [`cypher`]: statement AST, typed builder, renderer and values
//! - [`generator`]: statements the mapping layer issues, with their
//!   parameter names
//!
//! Everything else (schema, conversion, materialization, persistence and
//! the [`Template`]) is re-exported at the crate root.

pub use graphmap_core::{
    // Schema input
    AttributeDescription,
    // Values and entities
    AttributeValue,
    // Conversion
    ConversionRegistry,
    // Materialization
    DefaultInstantiator,
    DomainType,
    DomainValue,
    Entity,
    EntityMaterializer,
    EntityRef,
    GenerationStrategy,
    GraphConverter,
    // Records
    GraphNode,
    GraphRelationship,
    IdDescription,
    // Ids
    IdGenerator,
    IdGeneratorRegistry,
    IdStrategy,
    IdentifierDescription,
    Instantiator,
    // Configuration
    MappingConfig,
    MappingConfigBuilder,
    // Context
    MappingContext,
    // Schema model
    NodeDescription,
    // Errors
    OgmError,
    // Persistence
    PersistenceEngine,
    PropertyDescription,
    Record,
    RecordValue,
    RelationshipDescription,
    Result,
    SaveSummary,
    Schema,
    SchemaBuilder,
    StatementRunner,
    Template,
    TypeDescription,
    UuidGenerator,
    DEFAULT_ROOT_NODE_NAME,
};

/// Cypher statement construction and rendering.
pub mod cypher {
    pub use graphmap_cypher::*;
}

/// Statements issued by the mapping layer.
pub mod generator {
    pub use graphmap_core::generator::{
        CypherGenerator, COUNT_ALIAS, ENTITIES_PARAMETER, ENTITY_VARIABLE, FROM_ID_PARAMETER,
        IDS_PARAMETER, ID_PARAMETER, INTERNAL_ID_ALIAS, PROPERTIES_PARAMETER, RELATED_NAME,
        RELATED_NODES_ALIAS, RELATIONSHIPS_ALIAS, RELATIONSHIP_NAME, TO_ID_PARAMETER,
        VERSION_PARAMETER,
    };
}

/// Describe the initial domain types in the process-wide context.
///
/// Only the first call registers anything; later calls return `Ok(false)`.
/// Use [`MappingContext::register`] to add types afterwards.
pub fn initialize(types: &[TypeDescription]) -> Result<bool> {
    MappingContext::global().initialize(types)
}

/// A [`Template`] over the process-wide context.
///
/// # Examples
///
/// ```rust
/// use graphmap::template;
/// use graphmap_test::InMemoryGraph;
///
/// let mut graph = InMemoryGraph::new();
/// let template = template(&mut graph);
/// assert_eq!(template.config().fetch_depth, 1);
/// ```
pub fn template<R: StatementRunner>(runner: R) -> Template<'static, R> {
    Template::new(MappingContext::global(), runner)
}

/// Render a statement to Cypher text.
///
/// ```rust
/// use graphmap::{cypher::{match_, node}, render};
///
/// let user = node("User").named("u");
/// let statement = match_([user.clone()]).returning([user.as_expression()]).build();
/// assert_eq!(render(&statement), "MATCH (u:`User`) RETURN u");
/// ```
#[inline]
pub fn render(statement: &cypher::Statement) -> String {
    graphmap_cypher::render(statement)
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
