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

//! Configuration for statement generation and persistence.

use graphmap_cypher::escape::validate_identifier;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default symbolic name of the root node in generated statements.
pub const DEFAULT_ROOT_NODE_NAME: &str = "n";

/// Configuration shared by the generator, the persistence engine and the
/// template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Symbolic name of the root node (default: "n").
    pub root_node_name: String,

    /// Relationship hops loaded with an entity (default: 1).
    ///
    /// `0` loads the node alone, `1` adds one `OPTIONAL MATCH` hop, anything
    /// larger uses a variable-length pattern up to that many hops.
    pub fetch_depth: u32,

    /// Write the roots of a homogeneous `save_all` with a single `UNWIND`
    /// statement when their type allows it (default: true).
    pub batch_save: bool,

    /// Remove the stored relationships of an updated entity before writing
    /// its current ones (default: true).
    pub delete_stale_relationships: bool,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            root_node_name: DEFAULT_ROOT_NODE_NAME.to_string(),
            fetch_depth: 1,
            batch_save: true,
            delete_stale_relationships: true,
        }
    }
}

/// Builder for [`MappingConfig`].
///
/// # Examples
///
/// ```
/// # use graphmap_core::MappingConfig;
/// let config = MappingConfig::builder()
///     .fetch_depth(2)
///     .batch_save(false)
///     .build();
/// assert_eq!(config.fetch_depth, 2);
/// assert_eq!(config.root_node_name, "n");
/// ```
#[derive(Debug, Default)]
pub struct MappingConfigBuilder {
    root_node_name: Option<String>,
    fetch_depth: Option<u32>,
    batch_save: Option<bool>,
    delete_stale_relationships: Option<bool>,
}

impl MappingConfigBuilder {
    /// Create a new builder with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the symbolic name of the root node.
    pub fn root_node_name(mut self, name: impl Into<String>) -> Self {
        self.root_node_name = Some(name.into());
        self
    }

    /// Set the number of relationship hops loaded with an entity.
    pub fn fetch_depth(mut self, depth: u32) -> Self {
        self.fetch_depth = Some(depth);
        self
    }

    /// Set whether homogeneous batches are written with `UNWIND`.
    pub fn batch_save(mut self, batch: bool) -> Self {
        self.batch_save = Some(batch);
        self
    }

    /// Set whether stale relationships are removed on update.
    pub fn delete_stale_relationships(mut self, delete: bool) -> Self {
        self.delete_stale_relationships = Some(delete);
        self
    }

    /// Build the configuration. Unset fields use their defaults.
    pub fn build(self) -> MappingConfig {
        let defaults = MappingConfig::default();
        MappingConfig {
            root_node_name: self.root_node_name.unwrap_or(defaults.root_node_name),
            fetch_depth: self.fetch_depth.unwrap_or(defaults.fetch_depth),
            batch_save: self.batch_save.unwrap_or(defaults.batch_save),
            delete_stale_relationships: self
                .delete_stale_relationships
                .unwrap_or(defaults.delete_stale_relationships),
        }
    }
}

impl MappingConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder.
    pub fn builder() -> MappingConfigBuilder {
        MappingConfigBuilder::default()
    }

    /// Set the symbolic name of the root node.
    pub fn with_root_node_name(mut self, name: impl Into<String>) -> Self {
        self.root_node_name = name.into();
        self
    }

    /// Set the number of relationship hops loaded with an entity.
    pub fn with_fetch_depth(mut self, depth: u32) -> Self {
        self.fetch_depth = depth;
        self
    }

    /// Write every root with its own statement.
    pub fn without_batch_save(mut self) -> Self {
        self.batch_save = false;
        self
    }

    /// Keep stored relationships on update.
    pub fn keep_stale_relationships(mut self) -> Self {
        self.delete_stale_relationships = false;
        self
    }

    /// Check that the root node name is a bare Cypher identifier.
    pub fn validate(&self) -> Result<()> {
        validate_identifier(&self.root_node_name)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MappingConfig::default();
        assert_eq!(config.root_node_name, "n");
        assert_eq!(config.fetch_depth, 1);
        assert!(config.batch_save);
        assert!(config.delete_stale_relationships);
    }

    #[test]
    fn test_builder_partial() {
        let config = MappingConfig::builder()
            .root_node_name("root")
            .delete_stale_relationships(false)
            .build();
        assert_eq!(config.root_node_name, "root");
        assert_eq!(config.fetch_depth, 1);
        assert!(!config.delete_stale_relationships);
    }

    #[test]
    fn test_fluent_setters() {
        let config = MappingConfig::new()
            .with_fetch_depth(0)
            .without_batch_save()
            .keep_stale_relationships();
        assert_eq!(config.fetch_depth, 0);
        assert!(!config.batch_save);
        assert!(!config.delete_stale_relationships);
    }

    #[test]
    fn test_validate_root_node_name() {
        assert!(MappingConfig::default().validate().is_ok());
        assert!(MappingConfig::new().with_root_node_name("_root2").validate().is_ok());
        for bad in ["", "first name", "2n", "n-1"] {
            let err = MappingConfig::new().with_root_node_name(bad).validate().unwrap_err();
            assert!(matches!(
                err,
                crate::OgmError::Statement(graphmap_cypher::CypherError::InvalidIdentifier(ref name))
                    if name == bad
            ));
        }
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = MappingConfig::new().with_root_node_name("x");
        let json = serde_json::to_string(&config).unwrap();
        let back: MappingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
