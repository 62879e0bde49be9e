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

//! Statement abstract syntax tree.

pub mod clause;
pub mod condition;
pub mod expression;
pub mod pattern;

pub use clause::{Clause, ClauseState, SetItem, Statement, StatementBuilder};
pub use condition::{no_condition, not, Condition, LogicalOperator, Operator};
pub use expression::{
    asterisk, list_of, literal_of, literal_of_display, map_of, name, parameter, property, sort,
    Expression, FunctionInvocation, Literal, SortDirection, SortItem,
};
pub use pattern::{
    any_node, node, Direction, Node, PatternElement, Relationship, RelationshipDetail,
    RelationshipLength,
};
