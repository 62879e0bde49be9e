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

//! Built-in Cypher functions.

use crate::ast::{Expression, FunctionInvocation, Node};

fn call(name: &str, arguments: Vec<Expression>) -> Expression {
    Expression::Function(FunctionInvocation {
        name: name.to_string(),
        distinct: false,
        arguments,
    })
}

fn call_distinct(name: &str, argument: Expression) -> Expression {
    Expression::Function(FunctionInvocation {
        name: name.to_string(),
        distinct: true,
        arguments: vec![argument],
    })
}

/// `id(node)`
pub fn id(node: &Node) -> Expression {
    node.internal_id()
}

/// `id(expression)`, for relationships and other non-node subjects.
pub fn id_of(expression: impl Into<Expression>) -> Expression {
    call("id", vec![expression.into()])
}

/// `labels(node)`
pub fn labels(node: &Node) -> Expression {
    call("labels", vec![node.as_expression()])
}

/// `type(relationship)`
pub fn type_of(expression: impl Into<Expression>) -> Expression {
    call("type", vec![expression.into()])
}

/// `count(expression)`
pub fn count(expression: impl Into<Expression>) -> Expression {
    call("count", vec![expression.into()])
}

/// `count(DISTINCT expression)`
pub fn count_distinct(expression: impl Into<Expression>) -> Expression {
    call_distinct("count", expression.into())
}

/// `collect(expression)`
pub fn collect(expression: impl Into<Expression>) -> Expression {
    call("collect", vec![expression.into()])
}

/// `collect(DISTINCT expression)`
pub fn collect_distinct(expression: impl Into<Expression>) -> Expression {
    call_distinct("collect", expression.into())
}

/// `coalesce(a, b, ...)`
pub fn coalesce(expressions: impl IntoIterator<Item = Expression>) -> Expression {
    call("coalesce", expressions.into_iter().collect())
}

/// Whether an expression is an aggregating function call.
pub fn is_aggregate(expression: &Expression) -> bool {
    match expression {
        Expression::Function(function) => matches!(function.name.as_str(), "count" | "collect"),
        Expression::Aliased { expression, .. } => is_aggregate(expression),
        _ => false,
    }
}
