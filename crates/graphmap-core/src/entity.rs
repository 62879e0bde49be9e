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

//! Mutable, shareable domain entities.
//!
//! Entities form arbitrary graphs, cycles included. An [`EntityRef`] is a
//! shared handle to one entity; two handles are the same entity exactly when
//! they point at the same cell, regardless of attribute values.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::value::DomainValue;

/// Value held by one attribute of an entity.
#[derive(Debug, Clone)]
pub enum AttributeValue {
    /// Plain or value-object attribute.
    Value(DomainValue),
    /// Single related entity.
    Entity(EntityRef),
    /// Collection of related entities.
    Entities(Vec<EntityRef>),
}

/// An instance of a domain type.
#[derive(Debug, Clone)]
pub struct Entity {
    type_name: String,
    attributes: BTreeMap<String, AttributeValue>,
}

impl Entity {
    /// Create an entity with no attributes set.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Set a plain attribute, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<DomainValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a single association, builder style.
    pub fn with_entity(mut self, name: impl Into<String>, related: &EntityRef) -> Self {
        self.set_entity(name, related.clone());
        self
    }

    /// Set a collection association, builder style.
    pub fn with_entities<'a>(
        mut self,
        name: impl Into<String>,
        related: impl IntoIterator<Item = &'a EntityRef>,
    ) -> Self {
        self.set_entities(name, related.into_iter().cloned().collect());
        self
    }

    /// Domain type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// All attributes by name.
    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    /// Set a plain attribute.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<DomainValue>) {
        self.attributes
            .insert(name.into(), AttributeValue::Value(value.into()));
    }

    /// Set a single association.
    pub fn set_entity(&mut self, name: impl Into<String>, related: EntityRef) {
        self.attributes
            .insert(name.into(), AttributeValue::Entity(related));
    }

    /// Set a collection association.
    pub fn set_entities(&mut self, name: impl Into<String>, related: Vec<EntityRef>) {
        self.attributes
            .insert(name.into(), AttributeValue::Entities(related));
    }

    /// Clear an attribute.
    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.attributes.remove(name)
    }

    /// Raw attribute.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Plain attribute value; `None` when unset or an association.
    pub fn value(&self, name: &str) -> Option<&DomainValue> {
        match self.attributes.get(name) {
            Some(AttributeValue::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// Whether a plain attribute is unset or null.
    pub fn is_unset(&self, name: &str) -> bool {
        self.value(name).map_or(true, DomainValue::is_null)
    }

    /// Entities referenced by an association, in order. Single associations
    /// yield at most one element.
    pub fn related(&self, name: &str) -> Vec<EntityRef> {
        match self.attributes.get(name) {
            Some(AttributeValue::Entity(entity)) => vec![entity.clone()],
            Some(AttributeValue::Entities(entities)) => entities.clone(),
            _ => Vec::new(),
        }
    }
}

/// Shared handle to an [`Entity`] with pointer identity.
#[derive(Clone)]
pub struct EntityRef(Arc<RwLock<Entity>>);

impl EntityRef {
    /// Wrap an entity in a new shared cell.
    pub fn new(entity: Entity) -> Self {
        EntityRef(Arc::new(RwLock::new(entity)))
    }

    /// Lock for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, Entity> {
        self.0.read()
    }

    /// Lock for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, Entity> {
        self.0.write()
    }

    /// Whether both handles point at the same entity.
    pub fn ptr_eq(&self, other: &EntityRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared cell, stable for the lifetime of the entity.
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    /// Domain type name of the entity.
    pub fn type_name(&self) -> String {
        self.read().type_name().to_string()
    }

    /// Clone of a plain attribute value, `Null` when unset.
    pub fn value(&self, name: &str) -> DomainValue {
        self.read().value(name).cloned().unwrap_or(DomainValue::Null)
    }

    /// Set a plain attribute.
    pub fn set(&self, name: impl Into<String>, value: impl Into<DomainValue>) {
        self.write().set(name, value);
    }

    /// Entities referenced by an association.
    pub fn related(&self, name: &str) -> Vec<EntityRef> {
        self.read().related(name)
    }
}

impl From<Entity> for EntityRef {
    fn from(entity: Entity) -> Self {
        EntityRef::new(entity)
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for EntityRef {}

impl Hash for EntityRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

// Attributes are not printed: entity graphs may be cyclic.
impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_read() {
            Some(entity) => write!(f, "EntityRef({}@{:#x})", entity.type_name(), self.identity()),
            None => write!(f, "EntityRef(<locked>@{:#x})", self.identity()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_not_equality() {
        let a = EntityRef::new(Entity::new("User").with("name", "Alice"));
        let b = EntityRef::new(Entity::new("User").with("name", "Alice"));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());

        let set: HashSet<EntityRef> = [a.clone(), a.clone(), b].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_cyclic_debug_terminates() {
        let a = EntityRef::new(Entity::new("Person"));
        let b = EntityRef::new(Entity::new("Person").with_entity("knows", &a));
        a.write().set_entity("knows", b.clone());

        let printed = format!("{:?}", a.read());
        assert!(printed.contains("EntityRef(Person@"));
    }

    #[test]
    fn test_related() {
        let bike = EntityRef::new(Entity::new("Bike"));
        let user = Entity::new("User").with_entities("bikes", [&bike, &bike]);
        assert_eq!(user.related("bikes").len(), 2);
        assert!(user.related("missing").is_empty());
        assert!(user.value("bikes").is_none());
    }

    #[test]
    fn test_is_unset() {
        let entity = Entity::new("User").with("name", DomainValue::Null).with("age", 3i32);
        assert!(entity.is_unset("name"));
        assert!(entity.is_unset("email"));
        assert!(!entity.is_unset("age"));
    }
}
