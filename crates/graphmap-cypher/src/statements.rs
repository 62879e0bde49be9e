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

//! Rendered statements ready to hand to a driver.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::ast::Statement;
use crate::error::{CypherError, Result};
use crate::value::CypherValue;

/// What a statement does, for logging and for runners that route by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementType {
    /// Read-only query.
    Query,
    /// Node creation or update (CREATE, MERGE or MATCH ... SET).
    SaveNode,
    /// Node deletion.
    DeleteNode,
    /// Relationship creation.
    CreateRelationship,
    /// Relationship removal.
    DeleteRelationship,
}

/// Query text plus its parameter map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CypherStatement {
    /// The Cypher query text.
    pub query: String,
    /// Parameters, ordered by name.
    pub parameters: BTreeMap<String, CypherValue>,
    /// Type of statement.
    pub statement_type: StatementType,
    /// The AST the query text was rendered from, when there is one.
    #[serde(skip)]
    pub ast: Option<Arc<Statement>>,
}

impl CypherStatement {
    /// Create a statement from raw query text.
    pub fn new(query: impl Into<String>, statement_type: StatementType) -> Self {
        Self {
            query: query.into(),
            parameters: BTreeMap::new(),
            statement_type,
            ast: None,
        }
    }

    /// Render an AST and keep it alongside the text.
    pub fn from_statement(statement: Statement, statement_type: StatementType) -> Self {
        Self {
            query: statement.cypher(),
            parameters: BTreeMap::new(),
            statement_type,
            ast: Some(Arc::new(statement)),
        }
    }

    /// Create a read-only query statement.
    pub fn query(statement: Statement) -> Self {
        Self::from_statement(statement, StatementType::Query)
    }

    /// Add a parameter to this statement.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<CypherValue>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Check that every parameter the AST references has a value.
    ///
    /// Statements built from raw text have nothing to check against and
    /// always pass.
    pub fn validate(&self) -> Result<()> {
        if let Some(ast) = &self.ast {
            if let Some(missing) = ast
                .parameter_names()
                .into_iter()
                .find(|name| !self.parameters.contains_key(name))
            {
                return Err(CypherError::UnboundParameter(missing));
            }
        }
        Ok(())
    }

    /// The parameter map as JSON, for drivers that speak JSON.
    pub fn parameters_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(&self.parameters)?)
    }
}
