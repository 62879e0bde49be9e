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

//! The seam between the mapping layer and a database driver.

use graphmap_cypher::CypherStatement;

use crate::error::Result;
use crate::record::Record;

/// Executes rendered statements, typically inside a caller-managed
/// transaction.
///
/// Implementations report driver failures as
/// [`OgmError::Transport`](crate::OgmError::Transport).
pub trait StatementRunner {
    /// Run one statement and return its records.
    fn run(&mut self, statement: &CypherStatement) -> Result<Vec<Record>>;

    /// Run one statement and return its first record, if any.
    fn run_single(&mut self, statement: &CypherStatement) -> Result<Option<Record>> {
        Ok(self.run(statement)?.into_iter().next())
    }
}

impl<R: StatementRunner + ?Sized> StatementRunner for &mut R {
    fn run(&mut self, statement: &CypherStatement) -> Result<Vec<Record>> {
        (**self).run(statement)
    }
}

impl<R: StatementRunner + ?Sized> StatementRunner for Box<R> {
    fn run(&mut self, statement: &CypherStatement) -> Result<Vec<Record>> {
        (**self).run(statement)
    }
}
