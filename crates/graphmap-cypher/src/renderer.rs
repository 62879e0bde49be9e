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

//! Deterministic statement renderer.
//!
//! Rendering is a single pass over the clause list. The only state carried
//! between clauses is the set of node names already written with their
//! labels: a named node is written in full the first time it appears in a
//! pattern and as `(name)` afterwards.

use std::collections::HashSet;

use crate::ast::{
    Clause, Condition, Direction, Expression, Literal, Node, PatternElement, Relationship,
    RelationshipDetail, SetItem, SortDirection, SortItem, Statement,
};
use crate::escape::{escape_label, escape_name, escape_relationship_type};

/// Render a statement to query text.
pub fn render(statement: &Statement) -> String {
    let mut renderer = Renderer::default();
    let parts: Vec<String> = statement
        .clauses()
        .iter()
        .filter_map(|clause| renderer.clause(clause))
        .collect();
    parts.join(" ")
}

/// Render a single condition, as it would appear after `WHERE`.
pub fn render_condition(condition: &Condition) -> String {
    Renderer::default().condition(condition)
}

/// Render a single expression.
pub fn render_expression(expression: &Expression) -> String {
    Renderer::default().expression(expression)
}

#[derive(Default)]
struct Renderer {
    visited: HashSet<String>,
}

impl Renderer {
    fn clause(&mut self, clause: &Clause) -> Option<String> {
        let text = match clause {
            Clause::Match { optional, patterns } => {
                let keyword = if *optional { "OPTIONAL MATCH" } else { "MATCH" };
                format!("{} {}", keyword, self.patterns(patterns))
            }
            Clause::Where(condition) => {
                if condition.is_neutral() {
                    return None;
                }
                format!("WHERE {}", self.condition(condition))
            }
            Clause::Unwind {
                expression,
                variable,
            } => format!(
                "UNWIND {} AS {}",
                self.expression(expression),
                escape_name(variable)
            ),
            Clause::Create(patterns) => format!("CREATE {}", self.patterns(patterns)),
            Clause::Merge(patterns) => format!("MERGE {}", self.patterns(patterns)),
            Clause::Set(items) => {
                let items: Vec<String> = items.iter().map(|item| self.set_item(item)).collect();
                format!("SET {}", items.join(", "))
            }
            Clause::Delete {
                detach,
                expressions,
            } => {
                let keyword = if *detach { "DETACH DELETE" } else { "DELETE" };
                format!("{} {}", keyword, self.expressions(expressions))
            }
            Clause::Return { distinct, items } => {
                let keyword = if *distinct { "RETURN DISTINCT" } else { "RETURN" };
                format!("{} {}", keyword, self.expressions(items))
            }
            Clause::OrderBy(items) => {
                let items: Vec<String> = items.iter().map(|item| self.sort_item(item)).collect();
                format!("ORDER BY {}", items.join(", "))
            }
            Clause::Skip(n) => format!("SKIP {}", n),
            Clause::Limit(n) => format!("LIMIT {}", n),
        };
        Some(text)
    }

    fn patterns(&mut self, patterns: &[PatternElement]) -> String {
        let rendered: Vec<String> = patterns
            .iter()
            .map(|pattern| match pattern {
                PatternElement::Node(node) => self.node(node),
                PatternElement::Relationship(relationship) => self.relationship(relationship),
            })
            .collect();
        rendered.join(", ")
    }

    fn node(&mut self, node: &Node) -> String {
        let mut out = String::from("(");
        if let Some(name) = node.symbolic_name() {
            out.push_str(&escape_name(name));
            if !self.visited.insert(name.to_string()) {
                out.push(')');
                return out;
            }
        }
        for label in node.labels() {
            out.push(':');
            out.push_str(&escape_label(label));
        }
        if !node.properties().is_empty() {
            out.push(' ');
            out.push_str(&self.property_map(node.properties()));
        }
        out.push(')');
        out
    }

    fn relationship(&mut self, relationship: &Relationship) -> String {
        let mut out = self.node(relationship.start_node());
        for (detail, end) in relationship.segments() {
            out.push_str(&self.relationship_detail(detail));
            out.push_str(&self.node(end));
        }
        out
    }

    fn relationship_detail(&mut self, detail: &RelationshipDetail) -> String {
        let (left, right) = match detail.direction {
            Direction::Outgoing => ("-", "->"),
            Direction::Incoming => ("<-", "-"),
            Direction::Undirected => ("-", "-"),
        };

        let mut inner = String::new();
        if let Some(name) = &detail.name {
            inner.push_str(&escape_name(name));
        }
        if !detail.types.is_empty() {
            let types: Vec<String> = detail
                .types
                .iter()
                .map(|t| escape_relationship_type(t))
                .collect();
            inner.push(':');
            inner.push_str(&types.join("|"));
        }
        if let Some(length) = &detail.length {
            inner.push('*');
            match (length.minimum, length.maximum) {
                (None, None) => {}
                (Some(min), None) => inner.push_str(&format!("{}..", min)),
                (None, Some(max)) => inner.push_str(&format!("..{}", max)),
                (Some(min), Some(max)) => inner.push_str(&format!("{}..{}", min, max)),
            }
        }
        if !detail.properties.is_empty() {
            inner.push(' ');
            inner.push_str(&self.property_map(&detail.properties));
        }

        if inner.is_empty() {
            format!("{}{}", left, right)
        } else {
            format!("{}[{}]{}", left, inner, right)
        }
    }

    fn property_map(&mut self, entries: &[(String, Expression)]) -> String {
        let pairs: Vec<String> = entries
            .iter()
            .map(|(key, value)| format!("{}: {}", escape_name(key), self.expression(value)))
            .collect();
        format!("{{{}}}", pairs.join(", "))
    }

    fn set_item(&mut self, item: &SetItem) -> String {
        match item {
            SetItem::Property { property, value } => {
                format!("{} = {}", self.expression(property), self.expression(value))
            }
            SetItem::Mutate { variable, value } => {
                format!("{} += {}", escape_name(variable), self.expression(value))
            }
        }
    }

    fn sort_item(&mut self, item: &SortItem) -> String {
        let expression = self.expression(&item.expression);
        match item.direction {
            SortDirection::Unspecified => expression,
            SortDirection::Ascending => format!("{} ASC", expression),
            SortDirection::Descending => format!("{} DESC", expression),
        }
    }

    fn expressions(&mut self, expressions: &[Expression]) -> String {
        let rendered: Vec<String> = expressions.iter().map(|e| self.expression(e)).collect();
        rendered.join(", ")
    }

    fn expression(&mut self, expression: &Expression) -> String {
        match expression {
            Expression::Variable(name) => escape_name(name),
            Expression::Property { subject, key } => {
                format!("{}.{}", self.expression(subject), escape_name(key))
            }
            Expression::Literal(literal) => literal_text(literal),
            Expression::Parameter(name) => format!("${}", escape_name(name)),
            Expression::Function(function) => {
                let arguments = self.expressions(&function.arguments);
                if function.distinct {
                    format!("{}(DISTINCT {})", function.name, arguments)
                } else {
                    format!("{}({})", function.name, arguments)
                }
            }
            Expression::List(items) => format!("[{}]", self.expressions(items)),
            Expression::Map(entries) => self.property_map(entries),
            Expression::Aliased { expression, alias } => {
                format!("{} AS {}", self.expression(expression), escape_name(alias))
            }
            Expression::Pattern(node) => self.node(node),
            Expression::Asterisk => "*".to_string(),
        }
    }

    fn condition(&mut self, condition: &Condition) -> String {
        match condition {
            Condition::NoCondition => String::new(),
            Condition::Comparison {
                left,
                operator,
                right,
            } => {
                let left = self.expression(left);
                match right {
                    Some(right) => {
                        format!("{} {} {}", left, operator.as_str(), self.expression(right))
                    }
                    None => format!("{} {}", left, operator.as_str()),
                }
            }
            Condition::Compound {
                operator,
                conditions,
            } => {
                let parts: Vec<String> = conditions
                    .iter()
                    .filter(|c| !c.is_neutral())
                    .map(|c| self.condition(c))
                    .collect();
                match parts.len() {
                    0 => String::new(),
                    1 => parts.into_iter().next().unwrap_or_default(),
                    _ => format!(
                        "({})",
                        parts.join(&format!(" {} ", operator.as_str()))
                    ),
                }
            }
            Condition::Not(inner) => format!("NOT ({})", self.condition(inner)),
            Condition::Expression(expression) => self.expression(expression),
        }
    }
}

fn literal_text(literal: &Literal) -> String {
    match literal {
        Literal::Value(value) => value.to_cypher_literal(),
        Literal::Display(text) => text.clone(),
    }
}
