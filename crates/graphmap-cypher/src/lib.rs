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

//! Cypher statement construction for the graphmap object graph mapper.
//!
//! Statements are built as an immutable abstract syntax tree and rendered to
//! query text deterministically. The same AST always renders to the same
//! text, and ASTs are `Send + Sync` so they can be rendered concurrently.
//!
//! # Building blocks
//!
//! | Concept | Type |
//! |---------|------|
//! | Node pattern `(u:User)` | [`Node`] |
//! | Path pattern `(u)-[:OWNS]->(b)` | [`Relationship`] |
//! | Boolean condition | [`Condition`] |
//! | Value expression | [`Expression`] |
//! | Clause | [`Clause`] |
//! | Validated statement | [`Statement`] |
//! | Text + parameters | [`CypherStatement`] |
//!
//! # Example
//!
//! ```rust
//! use graphmap_cypher::{match_, node, literal_of};
//!
//! let user = node("User").named("u");
//! let bike = node("Bike").named("b");
//!
//! let statement = match_([user.relationship_to(&bike, &["OWNS"])])
//!     .where_(user.property("name").is_equal_to(literal_of("Test")))
//!     .and(user.property("age").is_equal_to(literal_of(21)))
//!     .returning([&bike, &user])
//!     .build();
//!
//! assert_eq!(
//!     statement.cypher(),
//!     "MATCH (u:`User`)-[:`OWNS`]->(b:`Bike`) \
//!      WHERE (u.name = 'Test' AND u.age = 21) RETURN b, u"
//! );
//! ```
//!
//! # Clause order
//!
//! The typed builder ([`match_`], [`create`], [`merge`], [`unwind`] and the
//! `Ongoing*` types they return) only exposes clauses that may legally
//! follow. [`StatementBuilder`] checks the same grammar at runtime and fails
//! with [`CypherError::MalformedStatement`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod ast;
pub mod builder;
pub mod error;
pub mod escape;
pub mod functions;
pub mod renderer;
pub mod statements;
pub mod value;

pub use ast::{
    any_node, asterisk, list_of, literal_of, literal_of_display, map_of, name, no_condition, node,
    not, parameter, property, sort, Clause, ClauseState, Condition, Direction, Expression,
    FunctionInvocation, Literal, LogicalOperator, Node, Operator, PatternElement, Relationship,
    RelationshipDetail, RelationshipLength, SetItem, SortDirection, SortItem, Statement,
    StatementBuilder,
};
pub use builder::{
    create, match_, merge, optional_match, unwind, OngoingLimit, OngoingOrder, OngoingReading,
    OngoingReadingWithWhere, OngoingReturn, OngoingSkip, OngoingUpdate,
};
pub use error::{CypherError, Result};
pub use renderer::{render, render_condition, render_expression};
pub use statements::{CypherStatement, StatementType};
pub use value::{CypherValue, Point};
