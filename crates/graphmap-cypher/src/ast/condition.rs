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

//! Boolean condition algebra.
//!
//! Conditions combine left-associatively. Chaining the same operator extends
//! the existing group instead of nesting it, so `a.and(b).and(c)` holds a
//! single `AND` group of three. Mixing operators nests: the group built so
//! far becomes the first child of a new group, which the renderer then
//! parenthesizes. The neutral [`Condition::NoCondition`] is absorbed by every
//! combinator.

use super::expression::Expression;

/// Comparison operators of leaf conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`
    Equal,
    /// `<>`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `=~`
    Matches,
    /// `IN`
    In,
    /// `STARTS WITH`
    StartsWith,
    /// `ENDS WITH`
    EndsWith,
    /// `CONTAINS`
    Contains,
    /// `IS NULL`
    IsNull,
    /// `IS NOT NULL`
    IsNotNull,
}

impl Operator {
    /// Operator text as written in a query.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "<>",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::Matches => "=~",
            Operator::In => "IN",
            Operator::StartsWith => "STARTS WITH",
            Operator::EndsWith => "ENDS WITH",
            Operator::Contains => "CONTAINS",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }
}

/// Binary logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `XOR`
    Xor,
}

impl LogicalOperator {
    /// Operator text as written in a query.
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
            LogicalOperator::Xor => "XOR",
        }
    }
}

/// A boolean condition.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Condition {
    /// The neutral condition. Renders to nothing.
    #[default]
    NoCondition,
    /// A leaf comparison. `right` is `None` for the postfix null checks.
    Comparison {
        /// Left operand.
        left: Expression,
        /// Operator.
        operator: Operator,
        /// Right operand.
        right: Option<Expression>,
    },
    /// A flattened group of two or more conditions joined by one operator.
    Compound {
        /// Operator joining all children.
        operator: LogicalOperator,
        /// Children in order.
        conditions: Vec<Condition>,
    },
    /// Negation.
    Not(Box<Condition>),
    /// A boolean-valued expression used directly, e.g. a parameter.
    Expression(Expression),
}

impl Condition {
    /// Whether this is the neutral condition.
    pub fn is_neutral(&self) -> bool {
        matches!(self, Condition::NoCondition)
    }

    /// `self AND other`
    pub fn and(self, other: Condition) -> Condition {
        self.combine(LogicalOperator::And, other)
    }

    /// `self OR other`
    pub fn or(self, other: Condition) -> Condition {
        self.combine(LogicalOperator::Or, other)
    }

    /// `self XOR other`
    pub fn xor(self, other: Condition) -> Condition {
        self.combine(LogicalOperator::Xor, other)
    }

    /// `NOT (self)`. Negating the neutral condition keeps it neutral.
    pub fn not(self) -> Condition {
        if self.is_neutral() {
            self
        } else {
            Condition::Not(Box::new(self))
        }
    }

    fn combine(self, operator: LogicalOperator, other: Condition) -> Condition {
        if other.is_neutral() {
            return self;
        }
        if self.is_neutral() {
            return other;
        }

        let mut conditions = Vec::new();
        push_flattened(&mut conditions, operator, self);
        push_flattened(&mut conditions, operator, other);
        Condition::Compound {
            operator,
            conditions,
        }
    }
}

fn push_flattened(target: &mut Vec<Condition>, operator: LogicalOperator, condition: Condition) {
    match condition {
        Condition::Compound {
            operator: inner,
            conditions,
        } if inner == operator => target.extend(conditions),
        other => target.push(other),
    }
}

impl From<Expression> for Condition {
    fn from(expression: Expression) -> Self {
        Condition::Expression(expression)
    }
}

/// The neutral condition.
pub fn no_condition() -> Condition {
    Condition::NoCondition
}

/// `NOT (condition)`
pub fn not(condition: Condition) -> Condition {
    condition.not()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expression::{literal_of, property};

    fn eq(key: &str, value: &str) -> Condition {
        property("u", key).is_equal_to(literal_of(value))
    }

    fn shape(condition: &Condition) -> String {
        match condition {
            Condition::NoCondition => "-".to_string(),
            Condition::Comparison { .. } => "c".to_string(),
            Condition::Compound {
                operator,
                conditions,
            } => {
                let inner: Vec<String> = conditions.iter().map(shape).collect();
                format!("{}[{}]", operator.as_str(), inner.join(","))
            }
            Condition::Not(inner) => format!("NOT[{}]", shape(inner)),
            Condition::Expression(_) => "e".to_string(),
        }
    }

    #[test]
    fn test_same_operator_flattens() {
        let c = eq("a", "1").and(eq("b", "2")).and(eq("c", "3"));
        assert_eq!(shape(&c), "AND[c,c,c]");
    }

    #[test]
    fn test_right_operand_group_flattens() {
        let c = eq("a", "1").and(eq("b", "2").and(eq("c", "3")));
        assert_eq!(shape(&c), "AND[c,c,c]");
    }

    #[test]
    fn test_mixed_operators_nest_left() {
        let c = eq("a", "1").and(eq("b", "2")).or(eq("c", "3")).and(eq("d", "4"));
        assert_eq!(shape(&c), "AND[OR[AND[c,c],c],c]");
    }

    #[test]
    fn test_neutral_is_absorbed() {
        let c = eq("a", "1").and(no_condition()).or(no_condition());
        assert_eq!(shape(&c), "c");
        assert!(no_condition().and(no_condition()).is_neutral());
        assert_eq!(shape(&no_condition().xor(eq("a", "1"))), "c");
    }

    #[test]
    fn test_not_of_neutral_is_neutral() {
        assert!(no_condition().not().is_neutral());
        assert_eq!(shape(&not(eq("a", "1"))), "NOT[c]");
    }
}
