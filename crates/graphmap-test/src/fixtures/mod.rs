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

//! The fixture domain: users with bikes and trips, people, companies with
//! employees, and tagged articles.
//!
//! - **types**: [`TypeDescription`]s for every fixture type
//! - **builders**: fresh, unsaved entities
//!
//! [`mapping_context`] registers every type in a new context and
//! [`id_generators`] provides the named generator `Employee` needs.

pub mod builders;
mod types;

pub use types::*;

use graphmap_core::{DomainValue, Entity, IdGeneratorRegistry, MappingContext, Result};
use std::sync::atomic::{AtomicI64, Ordering};

/// A new context with every fixture type registered.
pub fn mapping_context() -> Result<MappingContext> {
    let context = MappingContext::new();
    context.register(&all_types())?;
    Ok(context)
}

/// Generators for the fixture types: `employee-sequence` yields `E-1`,
/// `E-2`, ... per registry.
pub fn id_generators() -> IdGeneratorRegistry {
    let sequence = AtomicI64::new(1);
    IdGeneratorRegistry::new().with_generator(
        EMPLOYEE_ID_GENERATOR,
        move |_label: &str, _entity: &Entity| -> Result<DomainValue> {
            Ok(DomainValue::String(format!(
                "E-{}",
                sequence.fetch_add(1, Ordering::SeqCst)
            )))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_types_register() {
        let context = mapping_context().unwrap();
        for ty in all_types() {
            let description = context.required_description(&ty.name).unwrap();
            assert_eq!(description.primary_label, ty.primary_label());
        }
    }

    #[test]
    fn test_tag_label_override() {
        let context = mapping_context().unwrap();
        assert!(context.node_description("Label").is_some());
        assert!(context.node_description("Tag").is_none());
        let tag = context.required_description("Tag").unwrap();
        assert_eq!(tag.property("weight").unwrap().graph_name, "tag_weight");
    }

    #[test]
    fn test_article_relationships() {
        let context = mapping_context().unwrap();
        let article = context.required_description("Article").unwrap();
        assert_eq!(article.labels(), vec!["Article", "Content"]);
        let tags = article.relationship("tags").unwrap();
        assert_eq!(tags.target_label, "Label");
        assert!(tags.is_collection);
        assert!(!article.relationship("author").unwrap().is_collection);
    }

    #[test]
    fn test_employee_sequence() {
        let generators = id_generators();
        let generator = generators.required(EMPLOYEE_ID_GENERATOR).unwrap();
        let entity = Entity::new("Employee");
        assert_eq!(
            generator.generate_id("Employee", &entity).unwrap(),
            DomainValue::from("E-1")
        );
        assert_eq!(
            generator.generate_id("Employee", &entity).unwrap(),
            DomainValue::from("E-2")
        );
    }
}
