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

//! Application-side identifier generation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::entity::Entity;
use crate::error::{OgmError, Result};
use crate::value::DomainValue;

/// Produces identifiers for new entities before they are written.
pub trait IdGenerator: Send + Sync {
    /// Generate an id for a new entity with the given primary label.
    fn generate_id(&self, primary_label: &str, entity: &Entity) -> Result<DomainValue>;
}

/// Random version 4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate_id(&self, _primary_label: &str, _entity: &Entity) -> Result<DomainValue> {
        Ok(DomainValue::Uuid(uuid::Uuid::new_v4()))
    }
}

impl<F> IdGenerator for F
where
    F: Fn(&str, &Entity) -> Result<DomainValue> + Send + Sync,
{
    fn generate_id(&self, primary_label: &str, entity: &Entity) -> Result<DomainValue> {
        self(primary_label, entity)
    }
}

/// Named generators referenced by
/// [`IdStrategy::Generator`](crate::IdStrategy::Generator).
#[derive(Clone, Default)]
pub struct IdGeneratorRegistry {
    generators: HashMap<String, Arc<dyn IdGenerator>>,
}

impl IdGeneratorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generator, builder style.
    pub fn with_generator(
        mut self,
        name: impl Into<String>,
        generator: impl IdGenerator + 'static,
    ) -> Self {
        self.register(name, generator);
        self
    }

    /// Register a generator, replacing any previous one with that name.
    pub fn register(&mut self, name: impl Into<String>, generator: impl IdGenerator + 'static) {
        self.generators.insert(name.into(), Arc::new(generator));
    }

    /// Look up a generator.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn IdGenerator>> {
        self.generators.get(name)
    }

    /// Look up a generator, failing when none is registered.
    pub fn required(&self, name: &str) -> Result<&Arc<dyn IdGenerator>> {
        self.get(name)
            .ok_or_else(|| OgmError::IdGeneration(format!("no id generator named '{}'", name)))
    }
}

impl fmt::Debug for IdGeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.generators.keys().collect();
        names.sort();
        f.debug_struct("IdGeneratorRegistry")
            .field("generators", &names)
            .finish()
    }
}
