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

//! An in-memory property graph that executes generated statements.
//!
//! [`InMemoryGraph`] implements [`StatementRunner`] by interpreting the AST
//! carried by each [`CypherStatement`]. It understands the statement shapes
//! the mapper generates: `MATCH`/`OPTIONAL MATCH` with variable-length hops,
//! `WHERE`, `UNWIND`, `CREATE`, `MERGE`, `SET`, `DELETE`/`DETACH DELETE` and
//! `RETURN` with `count` and `collect` aggregation. Each statement applies
//! atomically: a failing statement leaves the graph untouched.
//!
//! # Examples
//!
//! ```rust
//! use graphmap_core::StatementRunner;
//! use graphmap_cypher::{node, match_, CypherStatement};
//! use graphmap_test::InMemoryGraph;
//!
//! let mut graph = InMemoryGraph::new();
//! graph.add_node(&["User"], [("name", "Alice".into())]);
//!
//! let user = node("User").named("u");
//! let statement = CypherStatement::query(match_([user.clone()]).returning([&user]).build());
//! let records = graph.run(&statement).unwrap();
//! assert_eq!(records.len(), 1);
//! ```

mod eval;
mod exec;
mod row;
mod store;

use graphmap_core::{GraphNode, GraphRelationship, OgmError, Record, Result, StatementRunner};
use graphmap_cypher::{CypherStatement, CypherValue, StatementType};
use std::collections::BTreeMap;
use std::fmt::Display;
use tracing::debug;

use exec::Executor;
use store::GraphStore;

pub(crate) fn unsupported(what: impl Display) -> OgmError {
    OgmError::Transport(format!("in-memory graph does not support {}", what))
}

/// A property graph held in memory, with a log of executed statements.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraph {
    store: GraphStore,
    executed: Vec<CypherStatement>,
    failing: Vec<StatementType>,
}

impl InMemoryGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a node directly, bypassing statements. Returns its internal id.
    pub fn add_node<'k>(
        &mut self,
        labels: &[&str],
        properties: impl IntoIterator<Item = (&'k str, CypherValue)>,
    ) -> i64 {
        let labels: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
        let properties = properties
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        self.store.create_node(&labels, properties)
    }

    /// Seed a relationship directly. Returns its internal id.
    pub fn add_relationship(&mut self, start: i64, end: i64, rel_type: &str) -> i64 {
        self.store
            .create_relationship(start, end, rel_type, BTreeMap::new())
    }

    /// Node by internal id.
    pub fn node(&self, id: i64) -> Option<&GraphNode> {
        self.store.nodes.get(&id)
    }

    /// All nodes carrying a label, by ascending id.
    pub fn nodes_with_label(&self, label: &str) -> Vec<&GraphNode> {
        self.store
            .nodes
            .values()
            .filter(|n| n.has_label(label))
            .collect()
    }

    /// Node with a label and a property value, if exactly one exists.
    pub fn find_node(&self, label: &str, key: &str, value: impl Into<CypherValue>) -> Option<&GraphNode> {
        let value = value.into();
        let mut found = self
            .nodes_with_label(label)
            .into_iter()
            .filter(|n| n.property(key) == Some(&value));
        match (found.next(), found.next()) {
            (Some(node), None) => Some(node),
            _ => None,
        }
    }

    /// All relationships of a type, by ascending id.
    pub fn relationships_of_type(&self, rel_type: &str) -> Vec<&GraphRelationship> {
        self.store
            .relationships
            .values()
            .filter(|r| r.rel_type == rel_type)
            .collect()
    }

    /// Relationships leaving a node.
    pub fn outgoing(&self, node: i64) -> Vec<&GraphRelationship> {
        self.store
            .relationships
            .values()
            .filter(|r| r.start == node)
            .collect()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.store.nodes.len()
    }

    /// Number of relationships.
    pub fn relationship_count(&self) -> usize {
        self.store.relationships.len()
    }

    /// Every statement run so far, including failed ones.
    pub fn executed(&self) -> &[CypherStatement] {
        &self.executed
    }

    /// Forget the statement log.
    pub fn clear_log(&mut self) {
        self.executed.clear();
    }

    /// Fail every later statement of the given type with a transport error.
    pub fn fail_on(&mut self, statement_type: StatementType) {
        self.failing.push(statement_type);
    }
}

impl StatementRunner for InMemoryGraph {
    fn run(&mut self, statement: &CypherStatement) -> Result<Vec<Record>> {
        self.executed.push(statement.clone());
        if self.failing.contains(&statement.statement_type) {
            return Err(OgmError::Transport(format!(
                "injected failure for {:?} statement",
                statement.statement_type
            )));
        }

        let ast = statement
            .ast
            .as_ref()
            .ok_or_else(|| unsupported("statements without an AST"))?;
        statement.validate()?;

        let mut working = self.store.clone();
        let records = Executor::new(&mut working, &statement.parameters).execute(ast)?;
        self.store = working;

        debug!(
            "{:?} returned {} record(s), graph has {} node(s) and {} relationship(s)",
            statement.statement_type,
            records.len(),
            self.store.nodes.len(),
            self.store.relationships.len()
        );
        Ok(records)
    }
}
