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

//! Rendering of complete statements built through the typed builder.

use graphmap_cypher::functions::{coalesce, count, id};
use graphmap_cypher::{
    any_node, literal_of, literal_of_display, match_, no_condition, node, optional_match,
    parameter, sort, Clause, CypherError, Statement, StatementBuilder,
};
use std::fmt;

// ============================================================================
// Match and return
// ============================================================================

#[test]
fn test_unrelated_nodes() {
    let bike = node("Bike").named("b");
    let user = node("User").named("u");
    let other = node("U").named("o");

    let statement = match_([&bike, &user, &other]).returning([&bike, &user]).build();

    assert_eq!(
        statement.cypher(),
        "MATCH (b:`Bike`), (u:`User`), (o:`U`) RETURN b, u"
    );
}

#[test]
fn test_aliased_expressions() {
    let unnamed = node("ANode");
    let named = node("AnotherNode").named("o");

    let statement = match_([&unnamed, &named])
        .returning([
            unnamed.as_expression().aliased("theNode"),
            named.as_expression().aliased("theOtherNode"),
        ])
        .build();

    assert_eq!(
        statement.cypher(),
        "MATCH (:`ANode`), (o:`AnotherNode`) RETURN (:`ANode`) AS theNode, o AS theOtherNode"
    );
}

#[test]
fn test_simple_relationship() {
    let user = node("User").named("u");
    let bike = node("Bike").named("b");

    let statement = match_([user.relationship_to(&bike, &["OWNS"])])
        .returning([&bike, &user])
        .build();

    assert_eq!(
        statement.cypher(),
        "MATCH (u:`User`)-[:`OWNS`]->(b:`Bike`) RETURN b, u"
    );
}

#[test]
fn test_named_relationship() {
    let user = node("User").named("u");
    let bike = node("Bike").named("b");
    let owns = user.relationship_to(&bike, &["OWNS"]).named("o");

    let statement = match_([&owns])
        .returning([bike.as_expression(), user.as_expression(), owns.as_expression()])
        .build();

    assert_eq!(
        statement.cypher(),
        "MATCH (u:`User`)-[o:`OWNS`]->(b:`Bike`) RETURN b, u, o"
    );
}

#[test]
fn test_relationship_chain_revisits_named_node() {
    let user = node("User").named("u");
    let bike = node("Bike").named("b");
    let trip = node("Trip").named("t");

    let path = user
        .relationship_to(&bike, &["OWNS"])
        .relationship_to(&trip, &["USED_ON"])
        .named("r2")
        .relationship_from(&user, &["WAS_ON"])
        .named("x")
        .relationship_between(&node("SOMETHING"), &[])
        .named("y");

    let statement = match_([path])
        .where_(user.property("name").matches(literal_of(".*aName")))
        .returning([&bike, &user])
        .build();

    assert_eq!(
        statement.cypher(),
        "MATCH (u:`User`)-[:`OWNS`]->(b:`Bike`)-[r2:`USED_ON`]->(t:`Trip`)<-[x:`WAS_ON`]-(u)-[y]-(:`SOMETHING`) \
         WHERE u.name =~ '.*aName' RETURN b, u"
    );
}

#[test]
fn test_variable_length_relationship() {
    let start = any_node().named("n");
    let path = start
        .relationship_between(&any_node().named("m"), &["KNOWS"])
        .named("r")
        .length(Some(1), Some(3));

    let statement = match_([path]).returning([name_of("m")]).build();
    assert_eq!(statement.cypher(), "MATCH (n)-[r:`KNOWS`*1..3]-(m) RETURN m");

    let unbounded = any_node()
        .named("n")
        .relationship_to(&any_node(), &[])
        .unbounded();
    let statement = match_([unbounded]).returning([name_of("n")]).build();
    assert_eq!(statement.cypher(), "MATCH (n)-[*]->() RETURN n");
}

fn name_of(symbolic_name: &str) -> graphmap_cypher::Expression {
    graphmap_cypher::name(symbolic_name)
}

#[test]
fn test_return_distinct() {
    let user = node("User").named("u");
    let statement = match_([&user]).returning_distinct([&user]).build();
    assert_eq!(statement.cypher(), "MATCH (u:`User`) RETURN DISTINCT u");
}

#[test]
fn test_label_escaping() {
    let odd = node("Odd`Label").named("n");
    let statement = match_([&odd]).returning([&odd]).build();
    assert_eq!(statement.cypher(), "MATCH (n:`Odd``Label`) RETURN n");
}

// ============================================================================
// Ordering and paging
// ============================================================================

#[test]
fn test_order_by() {
    let user = node("User").named("u");

    let unspecified = match_([&user])
        .returning([&user])
        .order_by([sort(user.property("name"))])
        .build();
    assert_eq!(unspecified.cypher(), "MATCH (u:`User`) RETURN u ORDER BY u.name");

    let ascending = match_([&user])
        .returning([&user])
        .order_by([user.property("name").ascending()])
        .build();
    assert_eq!(ascending.cypher(), "MATCH (u:`User`) RETURN u ORDER BY u.name ASC");

    let mixed = match_([&user])
        .returning([&user])
        .order_by([user.property("name").descending()])
        .and(user.property("age").ascending())
        .build();
    assert_eq!(
        mixed.cypher(),
        "MATCH (u:`User`) RETURN u ORDER BY u.name DESC, u.age ASC"
    );
}

#[test]
fn test_skip_and_limit() {
    let user = node("User").named("u");

    let skip = match_([&user]).returning([&user]).skip(1).build();
    assert_eq!(skip.cypher(), "MATCH (u:`User`) RETURN u SKIP 1");

    let limit = match_([&user]).returning([&user]).limit(1).build();
    assert_eq!(limit.cypher(), "MATCH (u:`User`) RETURN u LIMIT 1");

    let both = match_([&user]).returning([&user]).skip(1).limit(1).build();
    assert_eq!(both.cypher(), "MATCH (u:`User`) RETURN u SKIP 1 LIMIT 1");
}

// ============================================================================
// Multiple matches
// ============================================================================

#[test]
fn test_consecutive_matches_with_where() {
    let bike = node("Bike").named("b");
    let user = node("User").named("u");
    let other = node("U").named("o");

    let statement = match_([&bike])
        .match_([&user, &other])
        .where_(user.property("a").is_null())
        .returning([&bike])
        .build();
    assert_eq!(
        statement.cypher(),
        "MATCH (b:`Bike`) MATCH (u:`User`), (o:`U`) WHERE u.a IS NULL RETURN b"
    );

    let statement = match_([&bike])
        .where_(bike.property("a").is_not_null())
        .and(bike.property("b").is_null())
        .match_([&user, &other])
        .where_(user.property("a").is_null())
        .or(user.internal_id().is_equal_to(literal_of(4711)))
        .returning([&bike])
        .build();
    assert_eq!(
        statement.cypher(),
        "MATCH (b:`Bike`) WHERE (b.a IS NOT NULL AND b.b IS NULL) \
         MATCH (u:`User`), (o:`U`) WHERE (u.a IS NULL OR id(u) = 4711) RETURN b"
    );
}

#[test]
fn test_optional_match() {
    let bike = node("Bike").named("b");
    let user = node("User").named("u");
    let other = node("U").named("o");

    let leading = optional_match([&bike])
        .match_([&user, &other])
        .where_(user.property("a").is_null())
        .returning([&bike])
        .build();
    assert_eq!(
        leading.cypher(),
        "OPTIONAL MATCH (b:`Bike`) MATCH (u:`User`), (o:`U`) WHERE u.a IS NULL RETURN b"
    );

    let trailing = match_([&bike])
        .optional_match([&user, &other])
        .where_(user.property("a").is_null())
        .returning([&bike])
        .build();
    assert_eq!(
        trailing.cypher(),
        "MATCH (b:`Bike`) OPTIONAL MATCH (u:`User`), (o:`U`) WHERE u.a IS NULL RETURN b"
    );
}

// ============================================================================
// Functions and literals
// ============================================================================

#[test]
fn test_functions() {
    let user = node("User").named("u");

    let by_id = match_([&user])
        .where_(id(&user).is_equal_to(literal_of(1)))
        .returning([&user])
        .build();
    assert_eq!(by_id.cypher(), "MATCH (u:`User`) WHERE id(u) = 1 RETURN u");

    let counted = match_([&user]).returning([count(&user)]).build();
    assert_eq!(counted.cypher(), "MATCH (u:`User`) RETURN count(u)");

    let aliased = match_([&user])
        .returning([count(&user).aliased("cnt")])
        .build();
    assert_eq!(aliased.cypher(), "MATCH (u:`User`) RETURN count(u) AS cnt");

    let coalesced = match_([&user])
        .returning([coalesce([
            user.property("a"),
            user.property("b"),
            literal_of(r"¯\_(ツ)_/¯"),
        ])])
        .build();
    assert_eq!(
        coalesced.cypher(),
        r"MATCH (u:`User`) RETURN coalesce(u.a, u.b, '¯\\_(ツ)_/¯')"
    );
}

struct Opaque;

impl fmt::Display for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Value")
    }
}

#[test]
fn test_literals() {
    let user = node("User").named("u");

    let string = match_([&user])
        .where_(user.property("name").is_equal_to(literal_of("Test")))
        .returning([&user])
        .build();
    assert_eq!(string.cypher(), "MATCH (u:`User`) WHERE u.name = 'Test' RETURN u");

    let number = match_([&user])
        .where_(user.property("age").is_equal_to(literal_of(21)))
        .returning([&user])
        .build();
    assert_eq!(number.cypher(), "MATCH (u:`User`) WHERE u.age = 21 RETURN u");

    let display = match_([&user])
        .where_(user.property("field").is_equal_to(literal_of_display(&Opaque)))
        .returning([&user])
        .build();
    assert_eq!(display.cypher(), "MATCH (u:`User`) WHERE u.field = Value RETURN u");
}

// ============================================================================
// Condition chains
// ============================================================================

fn eq(key: &str, value: &str) -> graphmap_cypher::Condition {
    node("User")
        .named("u")
        .property(key)
        .is_equal_to(literal_of(value))
}

fn render_where(condition: graphmap_cypher::Condition) -> String {
    let user = node("User").named("u");
    match_([&user]).where_(condition).returning([&user]).build().cypher()
}

#[test]
fn test_logical_chains() {
    let user = node("User").named("u");
    let name = || user.property("name").is_equal_to(literal_of("Test"));
    let age = || user.property("age").is_equal_to(literal_of(21));

    assert_eq!(
        render_where(name().and(age())),
        "MATCH (u:`User`) WHERE (u.name = 'Test' AND u.age = 21) RETURN u"
    );
    assert_eq!(
        render_where(name().or(age())),
        "MATCH (u:`User`) WHERE (u.name = 'Test' OR u.age = 21) RETURN u"
    );
    assert_eq!(
        render_where(name().xor(age())),
        "MATCH (u:`User`) WHERE (u.name = 'Test' XOR u.age = 21) RETURN u"
    );
}

#[test]
fn test_mixed_chains_on_builder() {
    let user = node("User").named("u");
    let statement = match_([&user])
        .where_(eq("name", "Test"))
        .and(eq("name", "foobar"))
        .or(eq("name", "bazbar"))
        .and(eq("name", "x"))
        .returning([&user])
        .build();
    assert_eq!(
        statement.cypher(),
        "MATCH (u:`User`) WHERE (((u.name = 'Test' AND u.name = 'foobar') OR u.name = 'bazbar') AND u.name = 'x') RETURN u"
    );
}

#[test]
fn test_mixed_chains_on_conditions() {
    let condition = eq("name", "Test")
        .or(eq("name", "foobar"))
        .and(eq("name", "Test"))
        .and(eq("name", "Test"));
    assert_eq!(
        render_where(condition),
        "MATCH (u:`User`) WHERE ((u.name = 'Test' OR u.name = 'foobar') AND u.name = 'Test' AND u.name = 'Test') RETURN u"
    );
}

#[test]
fn test_nested_same_operator_flattens() {
    let user = node("User").named("u");
    let statement = match_([&user])
        .where_(eq("name", "Test"))
        .and(eq("name", "bazbar").and(eq("name", "foobar")))
        .returning([&user])
        .build();
    assert_eq!(
        statement.cypher(),
        "MATCH (u:`User`) WHERE (u.name = 'Test' AND u.name = 'bazbar' AND u.name = 'foobar') RETURN u"
    );
}

#[test]
fn test_chaining_combined_with_not() {
    let left = eq("name", "Test")
        .and(eq("name", "bazbar"))
        .or(eq("name", "foobar"))
        .or(eq("name", "foobar"));
    let right = eq("name", "bazbar")
        .and(eq("name", "foobar"))
        .or(eq("name", "Test"))
        .not();

    assert_eq!(
        render_where(left.and(right)),
        "MATCH (u:`User`) WHERE (((u.name = 'Test' AND u.name = 'bazbar') OR u.name = 'foobar' OR u.name = 'foobar') \
         AND NOT (((u.name = 'bazbar' AND u.name = 'foobar') OR u.name = 'Test'))) RETURN u"
    );
}

#[test]
fn test_not_wraps_leaf() {
    let user = node("User").named("u");
    assert_eq!(
        render_where(user.property("name").is_not_null().not()),
        "MATCH (u:`User`) WHERE NOT (u.name IS NOT NULL) RETURN u"
    );
}

#[test]
fn test_no_condition_is_omitted() {
    let user = node("User").named("u");

    let bare = match_([&user]).where_(no_condition()).returning([&user]).build();
    assert_eq!(bare.cypher(), "MATCH (u:`User`) RETURN u");

    let absorbed = match_([&user])
        .where_(eq("name", "test"))
        .and(no_condition())
        .or(no_condition())
        .returning([&user])
        .build();
    assert_eq!(absorbed.cypher(), "MATCH (u:`User`) WHERE u.name = 'test' RETURN u");
}

// ============================================================================
// Deletes and updates
// ============================================================================

#[test]
fn test_deletes() {
    let user = node("User").named("u");
    let bike = node("Bike").named("b");

    let detach = match_([&user]).detach_delete([&user]).build();
    assert_eq!(detach.cypher(), "MATCH (u:`User`) DETACH DELETE u");

    let filtered = match_([&user])
        .where_(user.property("a").is_not_null())
        .and(user.property("b").is_null())
        .delete([&user])
        .build();
    assert_eq!(
        filtered.cypher(),
        "MATCH (u:`User`) WHERE (u.a IS NOT NULL AND u.b IS NULL) DELETE u"
    );

    let several = match_([&user, &bike]).delete([&user, &bike]).build();
    assert_eq!(several.cypher(), "MATCH (u:`User`), (b:`Bike`) DELETE u, b");
}

#[test]
fn test_delete_then_return() {
    let user = node("User").named("u");

    let statement = match_([&user]).detach_delete([&user]).returning([&user]).build();
    assert_eq!(statement.cypher(), "MATCH (u:`User`) DETACH DELETE u RETURN u");

    let paged = match_([&user])
        .detach_delete([&user])
        .returning([&user])
        .order_by([user.property("a").ascending()])
        .skip(2)
        .limit(1)
        .build();
    assert_eq!(
        paged.cypher(),
        "MATCH (u:`User`) DETACH DELETE u RETURN u ORDER BY u.a ASC SKIP 2 LIMIT 1"
    );

    let parameterized = match_([&user])
        .where_(user.property("a").is_equal_to(parameter("aParameter")))
        .detach_delete([&user])
        .returning([&user])
        .build();
    assert_eq!(
        parameterized.cypher(),
        "MATCH (u:`User`) WHERE u.a = $aParameter DETACH DELETE u RETURN u"
    );
}

#[test]
fn test_delete_relationships_of_node() {
    let n = any_node().named("n");
    let hop = n.relationship_between(&any_node(), &[]).named("r0");

    let statement = match_([&n])
        .where_(n.internal_id().is_equal_to(literal_of(4711)))
        .optional_match([&hop])
        .delete([hop.as_expression(), n.as_expression()])
        .build();
    assert_eq!(
        statement.cypher(),
        "MATCH (n) WHERE id(n) = 4711 OPTIONAL MATCH (n)-[r0]-() DELETE r0, n"
    );
}

#[test]
fn test_merge_set_return() {
    use graphmap_cypher::{merge, SetItem};

    let n = node("Person")
        .named("n")
        .with_properties([("id", parameter("__id__"))]);
    let statement = merge([&n])
        .set([SetItem::mutate(&n, parameter("__properties__"))])
        .returning([id(&n).aliased("__internal_id__")])
        .build();
    assert_eq!(
        statement.cypher(),
        "MERGE (n:`Person` {id: $__id__}) SET n += $__properties__ RETURN id(n) AS __internal_id__"
    );
}

#[test]
fn test_unwind_merge() {
    use graphmap_cypher::{name, unwind, SetItem};
    use graphmap_cypher::functions::collect;

    let n = node("Person")
        .named("n")
        .with_properties([("id", name("entity").property("__id__"))]);
    let statement = unwind(parameter("__entities__"), "entity")
        .merge([&n])
        .set([SetItem::mutate(&n, name("entity").property("__properties__"))])
        .returning([collect(n.property("id")).aliased("__ids__")])
        .build();
    assert_eq!(
        statement.cypher(),
        "UNWIND $__entities__ AS entity MERGE (n:`Person` {id: entity.__id__}) \
         SET n += entity.__properties__ RETURN collect(n.id) AS __ids__"
    );
}

// ============================================================================
// Runtime clause validation
// ============================================================================

#[test]
fn test_runtime_builder_rejects_bad_order() {
    let user = node("User").named("u");

    let result = StatementBuilder::new()
        .clause(Clause::Match {
            optional: false,
            patterns: vec![user.clone().into()],
        })
        .and_then(|b| {
            b.clause(Clause::Return {
                distinct: false,
                items: vec![user.as_expression()],
            })
        })
        .and_then(|b| b.clause(Clause::Limit(1)))
        .and_then(|b| b.clause(Clause::OrderBy(vec![user.property("a").ascending()])));

    assert!(matches!(
        result,
        Err(CypherError::MalformedStatement {
            clause: "ORDER BY",
            ..
        })
    ));
}

#[test]
fn test_runtime_and_typed_builders_agree() {
    let user = node("User").named("u");
    let typed = match_([&user])
        .where_(user.property("a").is_null())
        .returning([&user])
        .build();
    let runtime = Statement::from_clauses(typed.clauses().to_vec()).unwrap();
    assert_eq!(typed, runtime);
    assert_eq!(typed.cypher(), runtime.cypher());
}
