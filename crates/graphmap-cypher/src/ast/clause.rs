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

//! Clauses, the clause-order state machine, and [`Statement`].

use std::collections::BTreeSet;
use std::fmt;

use super::condition::Condition;
use super::expression::{Expression, SortItem};
use super::pattern::{Node, PatternElement};
use crate::error::{CypherError, Result};

/// One item of a `SET` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum SetItem {
    /// `n.key = value`
    Property {
        /// Property expression being assigned.
        property: Expression,
        /// New value.
        value: Expression,
    },
    /// `n += map`
    Mutate {
        /// Variable whose properties are merged.
        variable: String,
        /// Map expression, usually a parameter.
        value: Expression,
    },
}

impl SetItem {
    /// `property = value`
    pub fn property(property: Expression, value: impl Into<Expression>) -> Self {
        SetItem::Property {
            property,
            value: value.into(),
        }
    }

    /// `node += value`. The node is expected to be named.
    pub fn mutate(node: &Node, value: impl Into<Expression>) -> Self {
        SetItem::Mutate {
            variable: node.symbolic_name().unwrap_or_default().to_string(),
            value: value.into(),
        }
    }
}

/// A single clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `MATCH` or `OPTIONAL MATCH`.
    Match {
        /// `OPTIONAL MATCH` when true.
        optional: bool,
        /// Comma-separated patterns.
        patterns: Vec<PatternElement>,
    },
    /// `WHERE`, attached to the preceding match.
    Where(Condition),
    /// `UNWIND expression AS variable`
    Unwind {
        /// List expression.
        expression: Expression,
        /// Variable each element is bound to.
        variable: String,
    },
    /// `CREATE`
    Create(Vec<PatternElement>),
    /// `MERGE`
    Merge(Vec<PatternElement>),
    /// `SET`
    Set(Vec<SetItem>),
    /// `DELETE` or `DETACH DELETE`.
    Delete {
        /// `DETACH DELETE` when true.
        detach: bool,
        /// Deleted expressions.
        expressions: Vec<Expression>,
    },
    /// `RETURN` or `RETURN DISTINCT`.
    Return {
        /// `RETURN DISTINCT` when true.
        distinct: bool,
        /// Projected items.
        items: Vec<Expression>,
    },
    /// `ORDER BY`
    OrderBy(Vec<SortItem>),
    /// `SKIP n`
    Skip(u64),
    /// `LIMIT n`
    Limit(u64),
}

impl Clause {
    /// Keyword of this clause, for diagnostics.
    pub fn keyword(&self) -> &'static str {
        match self {
            Clause::Match { optional: false, .. } => "MATCH",
            Clause::Match { optional: true, .. } => "OPTIONAL MATCH",
            Clause::Where(_) => "WHERE",
            Clause::Unwind { .. } => "UNWIND",
            Clause::Create(_) => "CREATE",
            Clause::Merge(_) => "MERGE",
            Clause::Set(_) => "SET",
            Clause::Delete { detach: false, .. } => "DELETE",
            Clause::Delete { detach: true, .. } => "DETACH DELETE",
            Clause::Return { .. } => "RETURN",
            Clause::OrderBy(_) => "ORDER BY",
            Clause::Skip(_) => "SKIP",
            Clause::Limit(_) => "LIMIT",
        }
    }
}

/// Position in the clause grammar after the clauses seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseState {
    /// Nothing yet.
    Start,
    /// After `MATCH`, `OPTIONAL MATCH` or `UNWIND`.
    Reading,
    /// After `WHERE`.
    Filtered,
    /// After `CREATE`, `MERGE`, `SET`, `DELETE` or `DETACH DELETE`.
    Updating,
    /// After `RETURN`.
    Returning,
    /// After `ORDER BY`.
    Ordered,
    /// After `SKIP`.
    Skipped,
    /// After `LIMIT`.
    Limited,
}

impl ClauseState {
    /// The state after appending `clause`, or `None` if the grammar forbids it.
    pub fn accept(self, clause: &Clause) -> Option<ClauseState> {
        use ClauseState::*;

        match (self, clause) {
            (Start | Reading | Filtered, Clause::Match { .. }) => Some(Reading),
            (Start | Reading, Clause::Unwind { .. }) => Some(Reading),
            (Reading, Clause::Where(_)) => Some(Filtered),
            (
                Start | Reading | Filtered | Updating,
                Clause::Create(_) | Clause::Merge(_),
            ) => Some(Updating),
            (Reading | Filtered | Updating, Clause::Set(_) | Clause::Delete { .. }) => {
                Some(Updating)
            }
            (Reading | Filtered | Updating, Clause::Return { .. }) => Some(Returning),
            (Returning, Clause::OrderBy(_)) => Some(Ordered),
            (Returning | Ordered, Clause::Skip(_)) => Some(Skipped),
            (Returning | Ordered | Skipped, Clause::Limit(_)) => Some(Limited),
            _ => None,
        }
    }

    /// Whether a statement may end in this state.
    pub fn is_complete(self) -> bool {
        matches!(
            self,
            ClauseState::Updating
                | ClauseState::Returning
                | ClauseState::Ordered
                | ClauseState::Skipped
                | ClauseState::Limited
        )
    }
}

impl fmt::Display for ClauseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ClauseState::Start => "the start of the statement",
            ClauseState::Reading => "a MATCH clause",
            ClauseState::Filtered => "a WHERE clause",
            ClauseState::Updating => "an updating clause",
            ClauseState::Returning => "a RETURN clause",
            ClauseState::Ordered => "an ORDER BY clause",
            ClauseState::Skipped => "a SKIP clause",
            ClauseState::Limited => "a LIMIT clause",
        };
        f.write_str(text)
    }
}

/// Runtime statement builder that validates clause order on every append.
///
/// The typed builder in [`crate::builder`] rules out bad orderings at compile
/// time. This one serves callers that assemble clauses programmatically.
///
/// # Examples
///
/// ```
/// use graphmap_cypher::{node, Clause, StatementBuilder};
///
/// let user = node("User").named("u");
/// let result = StatementBuilder::new()
///     .clause(Clause::Return { distinct: false, items: vec![user.as_expression()] });
/// assert!(result.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct StatementBuilder {
    state: ClauseState,
    clauses: Vec<Clause>,
}

impl Default for StatementBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self {
            state: ClauseState::Start,
            clauses: Vec::new(),
        }
    }

    /// Append a clause, failing with `MalformedStatement` if it is out of order.
    pub fn clause(mut self, clause: Clause) -> Result<Self> {
        match self.state.accept(&clause) {
            Some(next) => {
                self.state = next;
                self.clauses.push(clause);
                Ok(self)
            }
            None => Err(CypherError::MalformedStatement {
                state: self.state,
                clause: clause.keyword(),
            }),
        }
    }

    /// Current grammar state.
    pub fn state(&self) -> ClauseState {
        self.state
    }

    /// Finish the statement.
    pub fn build(self) -> Result<Statement> {
        if self.clauses.is_empty() {
            return Err(CypherError::EmptyStatement);
        }
        if !self.state.is_complete() {
            return Err(CypherError::IncompleteStatement { state: self.state });
        }
        Ok(Statement {
            clauses: self.clauses,
        })
    }
}

/// An immutable, validated statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    clauses: Vec<Clause>,
}

impl Statement {
    /// Validate and wrap a clause sequence.
    pub fn from_clauses(clauses: impl IntoIterator<Item = Clause>) -> Result<Self> {
        clauses
            .into_iter()
            .try_fold(StatementBuilder::new(), StatementBuilder::clause)?
            .build()
    }

    pub(crate) fn from_valid_clauses(clauses: Vec<Clause>) -> Self {
        debug_assert!(
            Statement::from_clauses(clauses.clone()).is_ok(),
            "typed builder produced an invalid clause sequence"
        );
        Self { clauses }
    }

    /// Clauses in order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Render the statement to query text.
    pub fn cypher(&self) -> String {
        crate::renderer::render(self)
    }

    /// Names of all parameters the statement references.
    pub fn parameter_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for clause in &self.clauses {
            collect_clause_parameters(clause, &mut names);
        }
        names
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cypher())
    }
}

fn collect_clause_parameters(clause: &Clause, names: &mut BTreeSet<String>) {
    match clause {
        Clause::Match { patterns, .. } | Clause::Create(patterns) | Clause::Merge(patterns) => {
            for pattern in patterns {
                collect_pattern_parameters(pattern, names);
            }
        }
        Clause::Where(condition) => collect_condition_parameters(condition, names),
        Clause::Unwind { expression, .. } => collect_expression_parameters(expression, names),
        Clause::Set(items) => {
            for item in items {
                match item {
                    SetItem::Property { property, value } => {
                        collect_expression_parameters(property, names);
                        collect_expression_parameters(value, names);
                    }
                    SetItem::Mutate { value, .. } => collect_expression_parameters(value, names),
                }
            }
        }
        Clause::Delete { expressions, .. } | Clause::Return { items: expressions, .. } => {
            for expression in expressions {
                collect_expression_parameters(expression, names);
            }
        }
        Clause::OrderBy(items) => {
            for item in items {
                collect_expression_parameters(&item.expression, names);
            }
        }
        Clause::Skip(_) | Clause::Limit(_) => {}
    }
}

fn collect_node_parameters(node: &Node, names: &mut BTreeSet<String>) {
    for (_, value) in node.properties() {
        collect_expression_parameters(value, names);
    }
}

fn collect_pattern_parameters(pattern: &PatternElement, names: &mut BTreeSet<String>) {
    match pattern {
        PatternElement::Node(node) => collect_node_parameters(node, names),
        PatternElement::Relationship(relationship) => {
            collect_node_parameters(relationship.start_node(), names);
            for (detail, end) in relationship.segments() {
                for (_, value) in &detail.properties {
                    collect_expression_parameters(value, names);
                }
                collect_node_parameters(end, names);
            }
        }
    }
}

fn collect_condition_parameters(condition: &Condition, names: &mut BTreeSet<String>) {
    match condition {
        Condition::NoCondition => {}
        Condition::Comparison { left, right, .. } => {
            collect_expression_parameters(left, names);
            if let Some(right) = right {
                collect_expression_parameters(right, names);
            }
        }
        Condition::Compound { conditions, .. } => {
            for condition in conditions {
                collect_condition_parameters(condition, names);
            }
        }
        Condition::Not(inner) => collect_condition_parameters(inner, names),
        Condition::Expression(expression) => collect_expression_parameters(expression, names),
    }
}

fn collect_expression_parameters(expression: &Expression, names: &mut BTreeSet<String>) {
    match expression {
        Expression::Parameter(name) => {
            names.insert(name.clone());
        }
        Expression::Property { subject, .. } => collect_expression_parameters(subject, names),
        Expression::Function(function) => {
            for argument in &function.arguments {
                collect_expression_parameters(argument, names);
            }
        }
        Expression::List(items) => {
            for item in items {
                collect_expression_parameters(item, names);
            }
        }
        Expression::Map(entries) => {
            for (_, value) in entries {
                collect_expression_parameters(value, names);
            }
        }
        Expression::Aliased { expression, .. } => collect_expression_parameters(expression, names),
        Expression::Pattern(node) => collect_node_parameters(node, names),
        Expression::Variable(_) | Expression::Literal(_) | Expression::Asterisk => {}
    }
}
