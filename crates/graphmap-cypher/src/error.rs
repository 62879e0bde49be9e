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

//! Error types for statement construction and rendering.

use crate::ast::ClauseState;
use thiserror::Error;

/// Error type for statement building operations.
#[derive(Debug, Error)]
pub enum CypherError {
    /// A clause was appended in a position the clause grammar does not allow.
    #[error("malformed statement: {clause} cannot follow {state}")]
    MalformedStatement {
        /// The state the statement was in.
        state: ClauseState,
        /// The clause that was rejected.
        clause: &'static str,
    },

    /// A statement without any clause.
    #[error("malformed statement: a statement needs at least one clause")]
    EmptyStatement,

    /// The clause sequence stops before it forms a runnable statement.
    #[error("malformed statement: statement cannot end after {state}")]
    IncompleteStatement {
        /// The state the statement ended in.
        state: ClauseState,
    },

    /// Invalid Cypher identifier.
    #[error("invalid Cypher identifier: '{0}'")]
    InvalidIdentifier(String),

    /// A parameter referenced by the query has no bound value.
    #[error("parameter '${0}' is referenced by the statement but has no value")]
    UnboundParameter(String),

    /// Serialization error from serde_json.
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for statement operations.
pub type Result<T> = std::result::Result<T, CypherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_malformed_statement() {
        let err = CypherError::MalformedStatement {
            state: ClauseState::Returning,
            clause: "MATCH",
        };
        let msg = err.to_string();
        assert!(msg.contains("MATCH"));
        assert!(msg.contains("RETURN"));
    }

    #[test]
    fn test_error_display_unbound_parameter() {
        let err = CypherError::UnboundParameter("__id__".to_string());
        assert!(err.to_string().contains("$__id__"));
    }

    #[test]
    fn test_error_from_json_error() {
        let json_err: serde_json::Error = serde_json::from_str::<i32>("invalid").unwrap_err();
        let err: CypherError = json_err.into();
        assert!(matches!(err, CypherError::JsonError(_)));
    }
}
