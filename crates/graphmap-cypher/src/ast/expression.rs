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

//! Expressions: everything that evaluates to a value inside a statement.

use std::fmt::Display;

use super::condition::{Condition, Operator};
use super::pattern::Node;
use crate::value::CypherValue;

/// A literal value written inline into the query text.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A value with a native Cypher literal form.
    Value(CypherValue),
    /// Any other object, written using its `Display` output.
    Display(String),
}

/// A function call such as `id(n)` or `count(DISTINCT x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionInvocation {
    /// Function name, written verbatim.
    pub name: String,
    /// Whether the single argument is prefixed with `DISTINCT`.
    pub distinct: bool,
    /// Arguments in call order.
    pub arguments: Vec<Expression>,
}

/// An expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A symbolic name bound earlier in the statement.
    Variable(String),
    /// Property lookup `subject.key`.
    Property {
        /// Expression the property is read from.
        subject: Box<Expression>,
        /// Property key.
        key: String,
    },
    /// Inline literal.
    Literal(Literal),
    /// Query parameter, rendered as `$name`.
    Parameter(String),
    /// Function call.
    Function(FunctionInvocation),
    /// List expression `[a, b]`.
    List(Vec<Expression>),
    /// Map expression `{k: v}`, entries kept in insertion order.
    Map(Vec<(String, Expression)>),
    /// `expression AS alias`.
    Aliased {
        /// Aliased expression.
        expression: Box<Expression>,
        /// Alias name.
        alias: String,
    },
    /// A node pattern used as an expression, for nodes without a name.
    Pattern(Node),
    /// `*` in a return list.
    Asterisk,
}

/// Sort direction of a single `ORDER BY` item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// No explicit direction.
    #[default]
    Unspecified,
    /// `ASC`
    Ascending,
    /// `DESC`
    Descending,
}

/// One item of an `ORDER BY` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct SortItem {
    /// Expression to sort by.
    pub expression: Expression,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortItem {
    /// Sort ascending.
    pub fn ascending(self) -> Self {
        Self {
            direction: SortDirection::Ascending,
            ..self
        }
    }

    /// Sort descending.
    pub fn descending(self) -> Self {
        Self {
            direction: SortDirection::Descending,
            ..self
        }
    }
}

impl Expression {
    /// Property `key` of this expression.
    pub fn property(self, key: impl Into<String>) -> Expression {
        Expression::Property {
            subject: Box::new(self),
            key: key.into(),
        }
    }

    /// `self AS alias`
    pub fn aliased(self, alias: impl Into<String>) -> Expression {
        Expression::Aliased {
            expression: Box::new(self),
            alias: alias.into(),
        }
    }

    fn compare(self, operator: Operator, right: impl Into<Expression>) -> Condition {
        Condition::Comparison {
            left: self,
            operator,
            right: Some(right.into()),
        }
    }

    /// `self = other`
    pub fn is_equal_to(self, other: impl Into<Expression>) -> Condition {
        self.compare(Operator::Equal, other)
    }

    /// `self <> other`
    pub fn is_not_equal_to(self, other: impl Into<Expression>) -> Condition {
        self.compare(Operator::NotEqual, other)
    }

    /// `self < other`
    pub fn lt(self, other: impl Into<Expression>) -> Condition {
        self.compare(Operator::LessThan, other)
    }

    /// `self <= other`
    pub fn lte(self, other: impl Into<Expression>) -> Condition {
        self.compare(Operator::LessThanOrEqual, other)
    }

    /// `self > other`
    pub fn gt(self, other: impl Into<Expression>) -> Condition {
        self.compare(Operator::GreaterThan, other)
    }

    /// `self >= other`
    pub fn gte(self, other: impl Into<Expression>) -> Condition {
        self.compare(Operator::GreaterThanOrEqual, other)
    }

    /// `self =~ regex`
    pub fn matches(self, regex: impl Into<Expression>) -> Condition {
        self.compare(Operator::Matches, regex)
    }

    /// `self IN list`
    pub fn is_in(self, list: impl Into<Expression>) -> Condition {
        self.compare(Operator::In, list)
    }

    /// `self STARTS WITH other`
    pub fn starts_with(self, other: impl Into<Expression>) -> Condition {
        self.compare(Operator::StartsWith, other)
    }

    /// `self ENDS WITH other`
    pub fn ends_with(self, other: impl Into<Expression>) -> Condition {
        self.compare(Operator::EndsWith, other)
    }

    /// `self CONTAINS other`
    pub fn contains(self, other: impl Into<Expression>) -> Condition {
        self.compare(Operator::Contains, other)
    }

    /// `self IS NULL`
    pub fn is_null(self) -> Condition {
        Condition::Comparison {
            left: self,
            operator: Operator::IsNull,
            right: None,
        }
    }

    /// `self IS NOT NULL`
    pub fn is_not_null(self) -> Condition {
        Condition::Comparison {
            left: self,
            operator: Operator::IsNotNull,
            right: None,
        }
    }

    /// Sort by this expression without an explicit direction.
    pub fn sorted(self) -> SortItem {
        SortItem {
            expression: self,
            direction: SortDirection::Unspecified,
        }
    }

    /// Sort ascending by this expression.
    pub fn ascending(self) -> SortItem {
        self.sorted().ascending()
    }

    /// Sort descending by this expression.
    pub fn descending(self) -> SortItem {
        self.sorted().descending()
    }
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        Expression::Literal(literal)
    }
}

impl From<CypherValue> for Expression {
    fn from(value: CypherValue) -> Self {
        Expression::Literal(Literal::Value(value))
    }
}

impl From<FunctionInvocation> for Expression {
    fn from(function: FunctionInvocation) -> Self {
        Expression::Function(function)
    }
}

impl From<&Expression> for Expression {
    fn from(expression: &Expression) -> Self {
        expression.clone()
    }
}

/// A literal with a native Cypher representation.
pub fn literal_of(value: impl Into<CypherValue>) -> Expression {
    Expression::Literal(Literal::Value(value.into()))
}

/// A literal written using the object's `Display` output.
pub fn literal_of_display(value: &impl Display) -> Expression {
    Expression::Literal(Literal::Display(value.to_string()))
}

/// A query parameter.
pub fn parameter(name: impl Into<String>) -> Expression {
    Expression::Parameter(name.into())
}

/// A reference to a symbolic name.
pub fn name(symbolic_name: impl Into<String>) -> Expression {
    Expression::Variable(symbolic_name.into())
}

/// Property `key` of the variable `symbolic_name`.
pub fn property(symbolic_name: impl Into<String>, key: impl Into<String>) -> Expression {
    name(symbolic_name).property(key)
}

/// A list expression.
pub fn list_of(items: impl IntoIterator<Item = Expression>) -> Expression {
    Expression::List(items.into_iter().collect())
}

/// A map expression.
pub fn map_of<K: Into<String>>(entries: impl IntoIterator<Item = (K, Expression)>) -> Expression {
    Expression::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
}

/// `*`
pub fn asterisk() -> Expression {
    Expression::Asterisk
}

/// Sort item for an expression.
pub fn sort(expression: impl Into<Expression>) -> SortItem {
    expression.into().sorted()
}
