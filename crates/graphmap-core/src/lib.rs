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

//! Object graph mapping core for graphmap.
//!
//! This crate maps domain entities onto nodes and relationships of a
//! property graph:
//!
//! - [`schema`] turns [`TypeDescription`]s into validated node descriptions
//! - [`convert`] moves attribute values between domain and graph form
//! - [`materialize`] builds entity graphs from query records
//! - [`persist`] writes entity graphs back, following cascade rules
//! - [`template`] offers find, count, save and delete per domain type
//!
//! Statements are built with `graphmap-cypher` and executed through a
//! [`StatementRunner`], so any driver (or an in-memory graph) can sit
//! underneath.
//!
//! # Example
//!
//! ```rust
//! use graphmap_core::{DomainType, IdStrategy, MappingContext, TypeDescription};
//!
//! let context = MappingContext::new();
//! context
//!     .register(&[TypeDescription::new("User")
//!         .field("id", DomainType::Long)
//!         .field("name", DomainType::String)
//!         .id("id", IdStrategy::Internal)])
//!     .unwrap();
//!
//! let description = context.required_description("User").unwrap();
//! assert_eq!(description.primary_label, "User");
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod context;
pub mod convert;
pub mod entity;
pub mod error;
pub mod generator;
pub mod id;
pub mod materialize;
pub mod persist;
pub mod record;
pub mod runner;
pub mod schema;
pub mod template;
pub mod value;

pub use config::{MappingConfig, MappingConfigBuilder, DEFAULT_ROOT_NODE_NAME};
pub use context::MappingContext;
pub use convert::{ConversionRegistry, GraphConverter};
pub use entity::{AttributeValue, Entity, EntityRef};
pub use error::{OgmError, Result};
pub use generator::CypherGenerator;
pub use id::{IdGenerator, IdGeneratorRegistry, UuidGenerator};
pub use materialize::{DefaultInstantiator, EntityMaterializer, Instantiator};
pub use persist::{PersistenceEngine, SaveSummary};
pub use record::{GraphNode, GraphRelationship, Record, RecordValue};
pub use runner::StatementRunner;
pub use schema::{
    AttributeDescription, GenerationStrategy, IdDescription, IdStrategy, IdentifierDescription,
    NodeDescription, PropertyDescription, RelationshipDescription, Schema, SchemaBuilder,
    TypeDescription,
};
pub use template::Template;
pub use value::{DomainType, DomainValue};
