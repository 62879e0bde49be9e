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

//! Shared fixtures and an in-memory statement runner for graphmap tests.
//!
//! This crate provides the fixture domain (type descriptions and entity
//! builders) and [`InMemoryGraph`], a [`StatementRunner`] that executes
//! the statements the mapper generates, so persistence and loading can be
//! tested end to end without a database.
//!
//! # Quick Start
//!
//! ```rust
//! use graphmap_core::Template;
//! use graphmap_test::fixtures::{self, builders};
//! use graphmap_test::InMemoryGraph;
//!
//! let context = fixtures::mapping_context().unwrap();
//! let mut graph = InMemoryGraph::new();
//! let mut template = Template::new(&context, &mut graph);
//!
//! let bike = builders::bike("b-1", "Roadster");
//! let user = builders::user("Alice", &[&bike]);
//! template.save(&user).unwrap();
//!
//! assert_eq!(template.count("Bike").unwrap(), 1);
//! ```
//!
//! [`StatementRunner`]: graphmap_core::StatementRunner

#![deny(missing_docs)]

/// The fixture domain.
pub mod fixtures;

/// The in-memory graph.
pub mod memory;

pub use memory::InMemoryGraph;

use tracing_subscriber::EnvFilter;

/// Install a test subscriber honouring `RUST_LOG` (default `warn`).
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
