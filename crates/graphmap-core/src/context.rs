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

//! The mapping context: conversion registry plus the published schema.
//!
//! Readers take a cheap `Arc` clone of the current schema and never wait on
//! registration. Registration is serialized by one lock and publishes a new
//! schema by swapping the `Arc`.

use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::debug;

use crate::convert::ConversionRegistry;
use crate::error::{OgmError, Result};
use crate::schema::{NodeDescription, Schema, SchemaBuilder, TypeDescription};
use crate::value::DomainValue;
use graphmap_cypher::CypherValue;

static GLOBAL: Lazy<MappingContext> = Lazy::new(MappingContext::new);

/// Conversion registry and schema shared by all mapping operations.
#[derive(Debug)]
pub struct MappingContext {
    registry: ConversionRegistry,
    schema: RwLock<Arc<Schema>>,
    // Holds whether `initialize` has run.
    registration: Mutex<bool>,
}

impl Default for MappingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingContext {
    /// Create a context with the built-in conversions and an empty schema.
    pub fn new() -> Self {
        Self::with_registry(ConversionRegistry::new())
    }

    /// Create a context with a custom conversion registry.
    pub fn with_registry(registry: ConversionRegistry) -> Self {
        Self {
            registry,
            schema: RwLock::new(Arc::new(Schema::new())),
            registration: Mutex::new(false),
        }
    }

    /// The process-wide default context.
    pub fn global() -> &'static MappingContext {
        &GLOBAL
    }

    /// Describe the initial set of types.
    ///
    /// Returns `false` without touching the schema when the context was
    /// already initialized.
    pub fn initialize(&self, types: &[TypeDescription]) -> Result<bool> {
        let mut initialized = self.registration.lock();
        if *initialized {
            debug!("Mapping context already initialized, ignoring {} types", types.len());
            return Ok(false);
        }

        let current = self.schema();
        let next = SchemaBuilder::new(&self.registry, &current).describe(types)?;
        *self.schema.write() = Arc::new(next);
        *initialized = true;
        Ok(true)
    }

    /// Describe types not yet known to the context. Types that are already
    /// described are skipped.
    pub fn register(&self, types: &[TypeDescription]) -> Result<()> {
        let _registration = self.registration.lock();

        let current = self.schema();
        let missing: Vec<TypeDescription> = types
            .iter()
            .filter(|ty| !current.contains_type(&ty.name))
            .cloned()
            .collect();
        if missing.is_empty() {
            return Ok(());
        }

        let next = SchemaBuilder::new(&self.registry, &current).describe(&missing)?;
        *self.schema.write() = Arc::new(next);
        Ok(())
    }

    /// Snapshot of the current schema.
    pub fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema.read())
    }

    /// The conversion registry.
    pub fn registry(&self) -> &ConversionRegistry {
        &self.registry
    }

    /// Description for a primary label.
    pub fn node_description(&self, label: &str) -> Option<Arc<NodeDescription>> {
        self.schema.read().node_description(label).cloned()
    }

    /// Description for a domain type name.
    pub fn description_for_type(&self, type_name: &str) -> Option<Arc<NodeDescription>> {
        self.schema.read().description_for_type(type_name).cloned()
    }

    /// Description for a domain type name, failing for unknown types.
    pub fn required_description(&self, type_name: &str) -> Result<Arc<NodeDescription>> {
        self.description_for_type(type_name)
            .ok_or_else(|| OgmError::UnknownEntity(type_name.to_string()))
    }

    /// Convert an id value to its graph form: an integer for internal ids,
    /// the id property's stored form otherwise.
    pub fn id_to_graph_value(
        &self,
        description: &NodeDescription,
        id: &DomainValue,
    ) -> Result<CypherValue> {
        match description.id_property() {
            Some(property) => self.registry.to_graph_value(id, property),
            None => id.as_long().map(CypherValue::Int).ok_or_else(|| {
                OgmError::Conversion(format!(
                    "internal id of '{}' must be an integer, found {}",
                    description.primary_label,
                    id.kind()
                ))
            }),
        }
    }
}
