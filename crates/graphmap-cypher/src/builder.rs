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

//! Typed fluent statement builder.
//!
//! Each builder type stands for one position in the clause grammar and only
//! offers the clauses allowed from there, so an out-of-order statement does
//! not compile:
//!
//! ```compile_fail
//! use graphmap_cypher::{match_, node};
//!
//! let u = node("User").named("u");
//! // LIMIT is only reachable after RETURN.
//! let _ = match_([&u]).limit(1);
//! ```
//!
//! ```
//! use graphmap_cypher::{match_, node, literal_of};
//!
//! let u = node("User").named("u");
//! let statement = match_([&u])
//!     .where_(u.property("name").is_equal_to(literal_of("Test")))
//!     .returning([&u])
//!     .order_by([u.property("name").descending()])
//!     .limit(1)
//!     .build();
//!
//! assert_eq!(
//!     statement.cypher(),
//!     "MATCH (u:`User`) WHERE u.name = 'Test' RETURN u ORDER BY u.name DESC LIMIT 1"
//! );
//! ```

use crate::ast::{
    Clause, Condition, Expression, PatternElement, SetItem, SortItem, Statement,
};

fn patterns<I, P>(patterns: I) -> Vec<PatternElement>
where
    I: IntoIterator<Item = P>,
    P: Into<PatternElement>,
{
    patterns.into_iter().map(Into::into).collect()
}

fn expressions<I, E>(items: I) -> Vec<Expression>
where
    I: IntoIterator<Item = E>,
    E: Into<Expression>,
{
    items.into_iter().map(Into::into).collect()
}

/// `MATCH patterns`
pub fn match_<I, P>(pattern: I) -> OngoingReading
where
    I: IntoIterator<Item = P>,
    P: Into<PatternElement>,
{
    OngoingReading::empty().match_(pattern)
}

/// `OPTIONAL MATCH patterns`
pub fn optional_match<I, P>(pattern: I) -> OngoingReading
where
    I: IntoIterator<Item = P>,
    P: Into<PatternElement>,
{
    OngoingReading::empty().optional_match(pattern)
}

/// `UNWIND expression AS variable`
pub fn unwind(expression: impl Into<Expression>, variable: impl Into<String>) -> OngoingReading {
    OngoingReading::empty().unwind(expression, variable)
}

/// `CREATE patterns`
pub fn create<I, P>(pattern: I) -> OngoingUpdate
where
    I: IntoIterator<Item = P>,
    P: Into<PatternElement>,
{
    OngoingUpdate::from_clauses(Vec::new()).create(pattern)
}

/// `MERGE patterns`
pub fn merge<I, P>(pattern: I) -> OngoingUpdate
where
    I: IntoIterator<Item = P>,
    P: Into<PatternElement>,
{
    OngoingUpdate::from_clauses(Vec::new()).merge(pattern)
}

/// After a match-family clause, before its `WHERE`.
#[derive(Debug, Clone)]
pub struct OngoingReading {
    clauses: Vec<Clause>,
}

impl OngoingReading {
    fn empty() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// `MATCH patterns`
    pub fn match_<I, P>(mut self, pattern: I) -> OngoingReading
    where
        I: IntoIterator<Item = P>,
        P: Into<PatternElement>,
    {
        self.clauses.push(Clause::Match {
            optional: false,
            patterns: patterns(pattern),
        });
        self
    }

    /// `OPTIONAL MATCH patterns`
    pub fn optional_match<I, P>(mut self, pattern: I) -> OngoingReading
    where
        I: IntoIterator<Item = P>,
        P: Into<PatternElement>,
    {
        self.clauses.push(Clause::Match {
            optional: true,
            patterns: patterns(pattern),
        });
        self
    }

    /// `UNWIND expression AS variable`
    pub fn unwind(
        mut self,
        expression: impl Into<Expression>,
        variable: impl Into<String>,
    ) -> OngoingReading {
        self.clauses.push(Clause::Unwind {
            expression: expression.into(),
            variable: variable.into(),
        });
        self
    }

    /// `WHERE condition`. Further conditions can be chained with
    /// [`OngoingReadingWithWhere::and`] and friends.
    pub fn where_(self, condition: Condition) -> OngoingReadingWithWhere {
        OngoingReadingWithWhere {
            clauses: self.clauses,
            condition,
        }
    }

    /// `RETURN items`
    pub fn returning<I, E>(self, items: I) -> OngoingReturn
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        OngoingUpdate::from_clauses(self.clauses).returning(items)
    }

    /// `RETURN DISTINCT items`
    pub fn returning_distinct<I, E>(self, items: I) -> OngoingReturn
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        OngoingUpdate::from_clauses(self.clauses).returning_distinct(items)
    }

    /// `DELETE items`
    pub fn delete<I, E>(self, items: I) -> OngoingUpdate
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        OngoingUpdate::from_clauses(self.clauses).delete(items)
    }

    /// `DETACH DELETE items`
    pub fn detach_delete<I, E>(self, items: I) -> OngoingUpdate
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        OngoingUpdate::from_clauses(self.clauses).detach_delete(items)
    }

    /// `CREATE patterns`
    pub fn create<I, P>(self, pattern: I) -> OngoingUpdate
    where
        I: IntoIterator<Item = P>,
        P: Into<PatternElement>,
    {
        OngoingUpdate::from_clauses(self.clauses).create(pattern)
    }

    /// `MERGE patterns`
    pub fn merge<I, P>(self, pattern: I) -> OngoingUpdate
    where
        I: IntoIterator<Item = P>,
        P: Into<PatternElement>,
    {
        OngoingUpdate::from_clauses(self.clauses).merge(pattern)
    }

    /// `SET items`
    pub fn set(self, items: impl IntoIterator<Item = SetItem>) -> OngoingUpdate {
        OngoingUpdate::from_clauses(self.clauses).set(items)
    }
}

/// After `WHERE`. The condition stays open for chaining until the next clause.
#[derive(Debug, Clone)]
pub struct OngoingReadingWithWhere {
    clauses: Vec<Clause>,
    condition: Condition,
}

impl OngoingReadingWithWhere {
    /// `... AND condition`
    pub fn and(mut self, condition: Condition) -> Self {
        self.condition = self.condition.and(condition);
        self
    }

    /// `... OR condition`
    pub fn or(mut self, condition: Condition) -> Self {
        self.condition = self.condition.or(condition);
        self
    }

    /// `... XOR condition`
    pub fn xor(mut self, condition: Condition) -> Self {
        self.condition = self.condition.xor(condition);
        self
    }

    fn close(mut self) -> Vec<Clause> {
        self.clauses.push(Clause::Where(self.condition));
        self.clauses
    }

    /// `MATCH patterns`
    pub fn match_<I, P>(self, pattern: I) -> OngoingReading
    where
        I: IntoIterator<Item = P>,
        P: Into<PatternElement>,
    {
        OngoingReading {
            clauses: self.close(),
        }
        .match_(pattern)
    }

    /// `OPTIONAL MATCH patterns`
    pub fn optional_match<I, P>(self, pattern: I) -> OngoingReading
    where
        I: IntoIterator<Item = P>,
        P: Into<PatternElement>,
    {
        OngoingReading {
            clauses: self.close(),
        }
        .optional_match(pattern)
    }

    /// `RETURN items`
    pub fn returning<I, E>(self, items: I) -> OngoingReturn
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        OngoingUpdate::from_clauses(self.close()).returning(items)
    }

    /// `RETURN DISTINCT items`
    pub fn returning_distinct<I, E>(self, items: I) -> OngoingReturn
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        OngoingUpdate::from_clauses(self.close()).returning_distinct(items)
    }

    /// `DELETE items`
    pub fn delete<I, E>(self, items: I) -> OngoingUpdate
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        OngoingUpdate::from_clauses(self.close()).delete(items)
    }

    /// `DETACH DELETE items`
    pub fn detach_delete<I, E>(self, items: I) -> OngoingUpdate
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        OngoingUpdate::from_clauses(self.close()).detach_delete(items)
    }

    /// `CREATE patterns`
    pub fn create<I, P>(self, pattern: I) -> OngoingUpdate
    where
        I: IntoIterator<Item = P>,
        P: Into<PatternElement>,
    {
        OngoingUpdate::from_clauses(self.close()).create(pattern)
    }

    /// `MERGE patterns`
    pub fn merge<I, P>(self, pattern: I) -> OngoingUpdate
    where
        I: IntoIterator<Item = P>,
        P: Into<PatternElement>,
    {
        OngoingUpdate::from_clauses(self.close()).merge(pattern)
    }

    /// `SET items`
    pub fn set(self, items: impl IntoIterator<Item = SetItem>) -> OngoingUpdate {
        OngoingUpdate::from_clauses(self.close()).set(items)
    }
}

/// After an updating clause. Can be built as is.
#[derive(Debug, Clone)]
pub struct OngoingUpdate {
    clauses: Vec<Clause>,
}

impl OngoingUpdate {
    fn from_clauses(clauses: Vec<Clause>) -> Self {
        Self { clauses }
    }

    fn push(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// `CREATE patterns`
    pub fn create<I, P>(self, pattern: I) -> OngoingUpdate
    where
        I: IntoIterator<Item = P>,
        P: Into<PatternElement>,
    {
        self.push(Clause::Create(patterns(pattern)))
    }

    /// `MERGE patterns`
    pub fn merge<I, P>(self, pattern: I) -> OngoingUpdate
    where
        I: IntoIterator<Item = P>,
        P: Into<PatternElement>,
    {
        self.push(Clause::Merge(patterns(pattern)))
    }

    /// `SET items`
    pub fn set(self, items: impl IntoIterator<Item = SetItem>) -> OngoingUpdate {
        self.push(Clause::Set(items.into_iter().collect()))
    }

    /// `DELETE items`
    pub fn delete<I, E>(self, items: I) -> OngoingUpdate
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        self.push(Clause::Delete {
            detach: false,
            expressions: expressions(items),
        })
    }

    /// `DETACH DELETE items`
    pub fn detach_delete<I, E>(self, items: I) -> OngoingUpdate
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        self.push(Clause::Delete {
            detach: true,
            expressions: expressions(items),
        })
    }

    /// `RETURN items`
    pub fn returning<I, E>(self, items: I) -> OngoingReturn
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        OngoingReturn {
            clauses: self
                .push(Clause::Return {
                    distinct: false,
                    items: expressions(items),
                })
                .clauses,
        }
    }

    /// `RETURN DISTINCT items`
    pub fn returning_distinct<I, E>(self, items: I) -> OngoingReturn
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        OngoingReturn {
            clauses: self
                .push(Clause::Return {
                    distinct: true,
                    items: expressions(items),
                })
                .clauses,
        }
    }

    /// Finish the statement.
    pub fn build(self) -> Statement {
        Statement::from_valid_clauses(self.clauses)
    }
}

/// After `RETURN`.
#[derive(Debug, Clone)]
pub struct OngoingReturn {
    clauses: Vec<Clause>,
}

impl OngoingReturn {
    /// `ORDER BY items`
    pub fn order_by(mut self, items: impl IntoIterator<Item = SortItem>) -> OngoingOrder {
        self.clauses.push(Clause::OrderBy(items.into_iter().collect()));
        OngoingOrder {
            clauses: self.clauses,
        }
    }

    /// `SKIP n`
    pub fn skip(self, n: u64) -> OngoingSkip {
        OngoingSkip::new(self.clauses, n)
    }

    /// `LIMIT n`
    pub fn limit(self, n: u64) -> OngoingLimit {
        OngoingLimit::new(self.clauses, n)
    }

    /// Finish the statement.
    pub fn build(self) -> Statement {
        Statement::from_valid_clauses(self.clauses)
    }
}

/// After `ORDER BY`.
#[derive(Debug, Clone)]
pub struct OngoingOrder {
    clauses: Vec<Clause>,
}

impl OngoingOrder {
    /// Append another sort item to the same `ORDER BY`.
    pub fn and(mut self, item: SortItem) -> Self {
        if let Some(Clause::OrderBy(items)) = self.clauses.last_mut() {
            items.push(item);
        }
        self
    }

    /// `SKIP n`
    pub fn skip(self, n: u64) -> OngoingSkip {
        OngoingSkip::new(self.clauses, n)
    }

    /// `LIMIT n`
    pub fn limit(self, n: u64) -> OngoingLimit {
        OngoingLimit::new(self.clauses, n)
    }

    /// Finish the statement.
    pub fn build(self) -> Statement {
        Statement::from_valid_clauses(self.clauses)
    }
}

/// After `SKIP`.
#[derive(Debug, Clone)]
pub struct OngoingSkip {
    clauses: Vec<Clause>,
}

impl OngoingSkip {
    fn new(mut clauses: Vec<Clause>, n: u64) -> Self {
        clauses.push(Clause::Skip(n));
        Self { clauses }
    }

    /// `LIMIT n`
    pub fn limit(self, n: u64) -> OngoingLimit {
        OngoingLimit::new(self.clauses, n)
    }

    /// Finish the statement.
    pub fn build(self) -> Statement {
        Statement::from_valid_clauses(self.clauses)
    }
}

/// After `LIMIT`. Nothing may follow.
#[derive(Debug, Clone)]
pub struct OngoingLimit {
    clauses: Vec<Clause>,
}

impl OngoingLimit {
    fn new(mut clauses: Vec<Clause>, n: u64) -> Self {
        clauses.push(Clause::Limit(n));
        Self { clauses }
    }

    /// Finish the statement.
    pub fn build(self) -> Statement {
        Statement::from_valid_clauses(self.clauses)
    }
}
