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

//! Error types for schema registration, mapping and persistence.

use graphmap_cypher::CypherError;
use thiserror::Error;

/// Error type for object graph mapping operations.
#[derive(Debug, Error)]
pub enum OgmError {
    /// Two domain types claim the same primary label.
    #[error("label '{label}' of type '{type_name}' is already used by type '{existing}'")]
    DuplicateLabel {
        /// The contested label.
        label: String,
        /// Type being registered.
        type_name: String,
        /// Type that already owns the label.
        existing: String,
    },

    /// A domain type is described twice.
    #[error("type '{0}' is already described")]
    DuplicateType(String),

    /// Two attributes of one type map to the same domain or graph name.
    #[error("property '{property}' is mapped twice in type '{type_name}'")]
    DuplicateProperty {
        /// Owning type.
        type_name: String,
        /// Duplicated name.
        property: String,
    },

    /// A domain type declares no identifier.
    #[error("type '{0}' has no identifier")]
    MissingIdentifier(String),

    /// The identifier declaration does not fit its attribute.
    #[error("invalid identifier '{attribute}' of type '{type_name}': {reason}")]
    InvalidIdentifier {
        /// Owning type.
        type_name: String,
        /// Identifier attribute.
        attribute: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A relationship end has no graph id at write time.
    #[error("'{0}' entity has no id to relate")]
    UnsavedRelationshipEnd(String),

    /// A referenced domain type has no node description.
    #[error("unknown entity type '{0}'")]
    UnknownEntity(String),

    /// A description references an attribute the type does not declare.
    #[error("type '{type_name}' has no attribute '{attribute}'")]
    UnknownAttribute {
        /// Owning type.
        type_name: String,
        /// Missing attribute name.
        attribute: String,
    },

    /// Statement construction or validation failed.
    #[error("statement error: {0}")]
    Statement(#[from] CypherError),

    /// A numeric value does not fit the target type.
    #[error("value {value} cannot be converted to {target} without loss")]
    LossyConversion {
        /// Rendered source value.
        value: String,
        /// Target type name.
        target: String,
    },

    /// A value has the wrong shape for its target type.
    #[error("type conversion error: {0}")]
    Conversion(String),

    /// A record could not be turned into an entity.
    #[error("failed to map record {record} to '{target}': {source}")]
    MappingFailure {
        /// Summary of the offending record.
        record: String,
        /// Primary label being materialized.
        target: String,
        /// Underlying error.
        source: Box<OgmError>,
    },

    /// A versioned write found no node with the expected id and version.
    #[error("optimistic locking failed for '{label}' with id {id}")]
    OptimisticLockFailure {
        /// Primary label of the entity.
        label: String,
        /// Rendered id of the entity.
        id: String,
    },

    /// An update targeted a node that does not exist.
    #[error("no '{label}' node with id {id}")]
    NotFound {
        /// Primary label of the entity.
        label: String,
        /// Rendered id of the entity.
        id: String,
    },

    /// An application-side identifier could not be produced.
    #[error("id generation failed: {0}")]
    IdGeneration(String),

    /// The statement runner reported a failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl OgmError {
    /// Whether this error is a schema conflict (duplicate label or type).
    pub fn is_schema_conflict(&self) -> bool {
        matches!(
            self,
            OgmError::DuplicateLabel { .. } | OgmError::DuplicateType(_)
        )
    }

    /// Wrap this error as the cause of a failed record mapping.
    pub fn into_mapping_failure(self, record: impl Into<String>, target: impl Into<String>) -> Self {
        match self {
            failure @ OgmError::MappingFailure { .. } => failure,
            other => OgmError::MappingFailure {
                record: record.into(),
                target: target.into(),
                source: Box::new(other),
            },
        }
    }
}

/// Result type alias for mapping operations.
pub type Result<T> = std::result::Result<T, OgmError>;

#[cfg(test)]
mod tests {
    use super::*;
    use graphmap_cypher::ClauseState;

    #[test]
    fn test_schema_conflict() {
        let label = OgmError::DuplicateLabel {
            label: "User".to_string(),
            type_name: "Customer".to_string(),
            existing: "User".to_string(),
        };
        assert!(label.is_schema_conflict());
        assert!(OgmError::DuplicateType("User".to_string()).is_schema_conflict());
        assert!(!OgmError::MissingIdentifier("User".to_string()).is_schema_conflict());
    }

    #[test]
    fn test_error_display_duplicate_label() {
        let err = OgmError::DuplicateLabel {
            label: "User".to_string(),
            type_name: "Customer".to_string(),
            existing: "Person".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("User"));
        assert!(msg.contains("Customer"));
        assert!(msg.contains("Person"));
    }

    #[test]
    fn test_error_from_cypher_error() {
        let err: OgmError = CypherError::MalformedStatement {
            state: ClauseState::Start,
            clause: "WHERE",
        }
        .into();
        assert!(matches!(err, OgmError::Statement(_)));
        assert!(err.to_string().contains("WHERE"));
    }

    #[test]
    fn test_mapping_failure_not_nested_twice() {
        let inner = OgmError::Conversion("bad".to_string());
        let once = inner.into_mapping_failure("{n}", "User");
        let twice = once.into_mapping_failure("{m}", "Bike");
        match twice {
            OgmError::MappingFailure { record, target, .. } => {
                assert_eq!(record, "{n}");
                assert_eq!(target, "User");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_lossy_conversion_display() {
        let err = OgmError::LossyConversion {
            value: "300".to_string(),
            target: "byte".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "value 300 cannot be converted to byte without loss"
        );
    }
}
