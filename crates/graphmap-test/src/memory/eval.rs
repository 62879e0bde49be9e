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

//! Expression and condition evaluation against one row.

use graphmap_core::{OgmError, Result};
use graphmap_cypher::{
    render_expression, Condition, CypherValue, Expression, FunctionInvocation, Literal,
    LogicalOperator, Operator,
};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::exec::Executor;
use super::row::{Bound, Row};
use super::store::EntityId;
use super::unsupported;

impl Executor<'_> {
    /// Evaluate a non-aggregating expression.
    pub(crate) fn eval(&self, expression: &Expression, row: &Row) -> Result<Bound> {
        match expression {
            Expression::Variable(name) => row
                .get(name)
                .cloned()
                .ok_or_else(|| OgmError::Transport(format!("variable '{}' is not defined", name))),
            Expression::Property { subject, key } => {
                let subject = self.eval(subject, row)?;
                self.property_of(&subject, key)
            }
            Expression::Literal(Literal::Value(value)) => Ok(Bound::from_value(value.clone())),
            Expression::Literal(Literal::Display(text)) => {
                Err(unsupported(format!("display literal {}", text)))
            }
            Expression::Parameter(name) => self
                .parameters
                .get(name)
                .cloned()
                .map(Bound::from_value)
                .ok_or_else(|| OgmError::Transport(format!("parameter '{}' has no value", name))),
            Expression::Function(function) => self.call(function, row),
            Expression::List(items) => items
                .iter()
                .map(|item| self.eval(item, row))
                .collect::<Result<Vec<_>>>()
                .map(Bound::List),
            Expression::Map(entries) => {
                let mut map = BTreeMap::new();
                for (key, value) in entries {
                    let value = self.eval(value, row)?.into_value().ok_or_else(|| {
                        unsupported(format!("a node or relationship in map entry '{}'", key))
                    })?;
                    map.insert(key.clone(), value);
                }
                Ok(Bound::Value(CypherValue::Map(map)))
            }
            Expression::Aliased { expression, .. } => self.eval(expression, row),
            Expression::Pattern(_) | Expression::Asterisk => Err(unsupported(format!(
                "'{}' in this position",
                render_expression(expression)
            ))),
        }
    }

    fn property_of(&self, subject: &Bound, key: &str) -> Result<Bound> {
        let entity = match subject {
            Bound::Null => return Ok(Bound::Null),
            Bound::Node(id) => EntityId::Node(*id),
            Bound::Relationship(id) => EntityId::Relationship(*id),
            Bound::Value(CypherValue::Map(map)) => {
                return Ok(map.get(key).cloned().map_or(Bound::Null, Bound::from_value))
            }
            other => {
                return Err(OgmError::Transport(format!(
                    "cannot read property '{}' of {:?}",
                    key, other
                )))
            }
        };
        Ok(self
            .store
            .property(entity, key)
            .cloned()
            .map_or(Bound::Null, Bound::from_value))
    }

    fn call(&self, function: &FunctionInvocation, row: &Row) -> Result<Bound> {
        let argument = |index: usize| -> Result<Bound> {
            function
                .arguments
                .get(index)
                .map(|a| self.eval(a, row))
                .unwrap_or_else(|| {
                    Err(OgmError::Transport(format!(
                        "{}() expects an argument",
                        function.name
                    )))
                })
        };

        match function.name.as_str() {
            "id" => Ok(match argument(0)? {
                Bound::Node(id) | Bound::Relationship(id) => Bound::Value(CypherValue::Int(id)),
                _ => Bound::Null,
            }),
            "labels" => Ok(match argument(0)? {
                Bound::Node(id) => self.store.nodes.get(&id).map_or(Bound::Null, |n| {
                    Bound::Value(CypherValue::List(
                        n.labels.iter().cloned().map(CypherValue::String).collect(),
                    ))
                }),
                _ => Bound::Null,
            }),
            "type" => Ok(match argument(0)? {
                Bound::Relationship(id) => self.store.relationships.get(&id).map_or(Bound::Null, |r| {
                    Bound::Value(CypherValue::String(r.rel_type.clone()))
                }),
                _ => Bound::Null,
            }),
            "coalesce" => {
                for candidate in &function.arguments {
                    let value = self.eval(candidate, row)?;
                    if !value.is_null() {
                        return Ok(value);
                    }
                }
                Ok(Bound::Null)
            }
            "count" | "collect" => Err(unsupported(format!(
                "{}() outside of RETURN",
                function.name
            ))),
            other => Err(unsupported(format!("function {}()", other))),
        }
    }

    /// Evaluate a condition with three-valued logic; `None` is unknown.
    pub(crate) fn test(&self, condition: &Condition, row: &Row) -> Result<Option<bool>> {
        match condition {
            Condition::NoCondition => Ok(Some(true)),
            Condition::Comparison {
                left,
                operator,
                right,
            } => {
                let left = self.eval(left, row)?;
                match operator {
                    Operator::IsNull => return Ok(Some(left.is_null())),
                    Operator::IsNotNull => return Ok(Some(!left.is_null())),
                    _ => {}
                }
                let right = match right {
                    Some(right) => self.eval(right, row)?,
                    None => {
                        return Err(OgmError::Transport(format!(
                            "{:?} needs a right operand",
                            operator
                        )))
                    }
                };
                compare(*operator, &left, &right)
            }
            Condition::Compound {
                operator,
                conditions,
            } => {
                let mut results = Vec::with_capacity(conditions.len());
                for condition in conditions {
                    results.push(self.test(condition, row)?);
                }
                Ok(combine(*operator, &results))
            }
            Condition::Not(inner) => Ok(self.test(inner, row)?.map(|b| !b)),
            Condition::Expression(expression) => match self.eval(expression, row)? {
                Bound::Value(CypherValue::Bool(b)) => Ok(Some(b)),
                b if b.is_null() => Ok(None),
                other => Err(OgmError::Transport(format!(
                    "{:?} is not a boolean",
                    other
                ))),
            },
        }
    }
}

fn compare(operator: Operator, left: &Bound, right: &Bound) -> Result<Option<bool>> {
    if left.is_null() || right.is_null() {
        return Ok(None);
    }
    let ordered = |accept: fn(Ordering) -> bool| left.compare(right).map(accept);
    Ok(match operator {
        Operator::Equal => left.equals(right),
        Operator::NotEqual => left.equals(right).map(|b| !b),
        Operator::LessThan => ordered(|o| o == Ordering::Less),
        Operator::LessThanOrEqual => ordered(|o| o != Ordering::Greater),
        Operator::GreaterThan => ordered(|o| o == Ordering::Greater),
        Operator::GreaterThanOrEqual => ordered(|o| o != Ordering::Less),
        Operator::In => {
            let items = right
                .items()
                .ok_or_else(|| OgmError::Transport("IN needs a list".to_string()))?;
            let mut result = Some(false);
            for item in &items {
                match left.equals(item) {
                    Some(true) => return Ok(Some(true)),
                    None => result = None,
                    Some(false) => {}
                }
            }
            result
        }
        Operator::StartsWith | Operator::EndsWith | Operator::Contains => {
            match (left, right) {
                (
                    Bound::Value(CypherValue::String(l)),
                    Bound::Value(CypherValue::String(r)),
                ) => Some(match operator {
                    Operator::StartsWith => l.starts_with(r.as_str()),
                    Operator::EndsWith => l.ends_with(r.as_str()),
                    _ => l.contains(r.as_str()),
                }),
                _ => None,
            }
        }
        Operator::Matches => return Err(unsupported("regular expression matching")),
        Operator::IsNull | Operator::IsNotNull => None,
    })
}

fn combine(operator: LogicalOperator, results: &[Option<bool>]) -> Option<bool> {
    match operator {
        LogicalOperator::And => {
            if results.contains(&Some(false)) {
                Some(false)
            } else if results.contains(&None) {
                None
            } else {
                Some(true)
            }
        }
        LogicalOperator::Or => {
            if results.contains(&Some(true)) {
                Some(true)
            } else if results.contains(&None) {
                None
            } else {
                Some(false)
            }
        }
        LogicalOperator::Xor => results
            .iter()
            .try_fold(false, |acc, r| r.map(|b| acc ^ b)),
    }
}
