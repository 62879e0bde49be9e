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

//! Conversion between domain attribute values and native graph values.
//!
//! Lookup order for a declared type:
//!
//! 1. null maps to null in both directions, never to a default;
//! 2. the built-in table ([`builtin`]);
//! 3. a [`GraphConverter`] registered for a custom type name;
//! 4. list decomposition, converting element by element.
//!
//! The only context-sensitive conversion is the per-property date format of
//! instants.

pub mod builtin;

use graphmap_cypher::CypherValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{OgmError, Result};
use crate::schema::PropertyDescription;
use crate::value::{DomainType, DomainValue};

/// User-supplied conversion for a value object type.
pub trait GraphConverter: Send + Sync {
    /// Domain value to graph value.
    fn to_graph(&self, value: &DomainValue) -> Result<CypherValue>;

    /// Graph value to domain value.
    fn to_domain(&self, value: &CypherValue) -> Result<DomainValue>;
}

/// Registry of built-in and user-supplied conversions.
#[derive(Clone, Default)]
pub struct ConversionRegistry {
    custom: HashMap<String, Arc<dyn GraphConverter>>,
}

impl ConversionRegistry {
    /// Create a registry with only the built-in conversions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter for a custom type name, builder style.
    pub fn with_converter(
        mut self,
        type_name: impl Into<String>,
        converter: impl GraphConverter + 'static,
    ) -> Self {
        self.register_converter(type_name, converter);
        self
    }

    /// Register a converter for a custom type name.
    pub fn register_converter(
        &mut self,
        type_name: impl Into<String>,
        converter: impl GraphConverter + 'static,
    ) {
        self.custom.insert(type_name.into(), Arc::new(converter));
    }

    /// Check if a converter is registered for a custom type name.
    pub fn has_converter(&self, type_name: &str) -> bool {
        self.custom.contains_key(type_name)
    }

    /// Whether values of this type are stored as node properties. Anything
    /// else is an association.
    pub fn is_simple(&self, ty: &DomainType) -> bool {
        match ty {
            DomainType::Entity(_) => false,
            DomainType::List(inner) => self.is_simple(inner),
            DomainType::Custom(name) => self.has_converter(name),
            _ => true,
        }
    }

    /// Convert a property value for writing.
    pub fn to_graph_value(
        &self,
        value: &DomainValue,
        property: &PropertyDescription,
    ) -> Result<CypherValue> {
        self.write_value(value, &property.domain_type, property.date_format.as_deref())
    }

    /// Convert a stored property value for reading.
    pub fn to_domain_value(
        &self,
        value: &CypherValue,
        property: &PropertyDescription,
    ) -> Result<DomainValue> {
        self.read_value(value, &property.domain_type, property.date_format.as_deref())
    }

    /// Convert a domain value of the given declared type.
    pub fn write_value(
        &self,
        value: &DomainValue,
        ty: &DomainType,
        date_format: Option<&str>,
    ) -> Result<CypherValue> {
        if value.is_null() {
            return Ok(CypherValue::Null);
        }
        if let Some(converted) = builtin::write_scalar(value, ty, date_format) {
            return converted;
        }
        match (ty, value) {
            (DomainType::Custom(name), _) => self.converter(name)?.to_graph(value),
            (DomainType::List(element), DomainValue::List(items)) => items
                .iter()
                .map(|item| self.write_value(item, element, date_format))
                .collect::<Result<Vec<_>>>()
                .map(CypherValue::List),
            _ => Err(OgmError::Conversion(format!(
                "expected {}, found {}",
                ty.name(),
                value.kind()
            ))),
        }
    }

    /// Convert a graph value to the given declared type.
    pub fn read_value(
        &self,
        value: &CypherValue,
        ty: &DomainType,
        date_format: Option<&str>,
    ) -> Result<DomainValue> {
        if value.is_null() {
            return Ok(DomainValue::Null);
        }
        if let Some(converted) = builtin::read_scalar(value, ty, date_format) {
            return converted;
        }
        match (ty, value) {
            (DomainType::Custom(name), _) => self.converter(name)?.to_domain(value),
            (DomainType::List(element), CypherValue::List(items)) => items
                .iter()
                .map(|item| self.read_value(item, element, date_format))
                .collect::<Result<Vec<_>>>()
                .map(DomainValue::List),
            _ => Err(OgmError::Conversion(format!(
                "expected {}, found {}",
                ty.name(),
                value.kind()
            ))),
        }
    }

    fn converter(&self, type_name: &str) -> Result<&Arc<dyn GraphConverter>> {
        self.custom.get(type_name).ok_or_else(|| {
            OgmError::Conversion(format!("no converter registered for '{}'", type_name))
        })
    }
}

impl fmt::Debug for ConversionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.custom.keys().collect();
        names.sort();
        f.debug_struct("ConversionRegistry")
            .field("custom", &names)
            .finish()
    }
}
