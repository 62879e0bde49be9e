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

//! Tests for the graphmap facade crate.
//!
//! Test coverage:
//! - Process-wide initialization is idempotent
//! - The template over the global context saves and loads
//! - Cypher building through the `cypher` module
//! - Property: rendered parameter names survive in the statement text

use graphmap::cypher::{match_, node, parameter, CypherStatement};
use graphmap::{
    initialize, render, template, DomainType, DomainValue, Entity, EntityRef, IdStrategy,
    MappingContext, TypeDescription,
};
use graphmap_test::{fixtures, init_tracing, InMemoryGraph};
use proptest::prelude::*;

fn ensure_initialized() {
    let _ = initialize(&fixtures::all_types());
}

// =============================================================================
// Global context
// =============================================================================

#[test]
fn test_initialize_runs_once() {
    init_tracing();
    ensure_initialized();
    let again = initialize(&[TypeDescription::new("Ignored")
        .field("id", DomainType::Long)
        .id("id", IdStrategy::Internal)])
    .unwrap();
    assert!(!again);
    assert!(MappingContext::global().description_for_type("Ignored").is_none());
    assert!(MappingContext::global().description_for_type("User").is_some());
}

#[test]
fn test_template_over_global_context() {
    init_tracing();
    ensure_initialized();
    let mut graph = InMemoryGraph::new();
    let mut users = template(&mut graph);

    let user = EntityRef::new(Entity::new("User").with("name", "Grace"));
    users.save(&user).unwrap();

    let loaded = users.find_by_id("User", user.value("id")).unwrap().unwrap();
    assert_eq!(loaded.value("name"), DomainValue::from("Grace"));
    assert_eq!(users.count("User").unwrap(), 1);
}

// =============================================================================
// Cypher
// =============================================================================

#[test]
fn test_cypher_module() {
    let user = node("User").named("u");
    let statement = match_([&user])
        .where_(user.property("name").is_equal_to(parameter("name")))
        .returning([&user])
        .build();
    assert_eq!(
        render(&statement),
        "MATCH (u:`User`) WHERE u.name = $name RETURN u"
    );

    let bound = CypherStatement::query(statement).with_param("name", "Grace");
    assert!(bound.validate().is_ok());
}

proptest! {
    #[test]
    fn prop_parameter_names_rendered(name in "p_[a-z0-9_]{0,12}") {
        let user = node("User").named("u");
        let statement = match_([&user])
            .where_(user.property("id").is_equal_to(parameter(name.as_str())))
            .returning([&user])
            .build();
        let expected = format!("${}", name);
        prop_assert!(render(&statement).contains(&expected));
    }
}
