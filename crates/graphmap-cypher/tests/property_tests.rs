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

//! Property-based tests for escaping and condition composition.
//!
//! Test coverage:
//! - Label and name escaping never leaks an unbalanced backtick
//! - String literals always round the quote characters
//! - Condition chains flatten and absorb the neutral condition
//! - Rendering is deterministic

use graphmap_cypher::escape::{
    escape_label, escape_name, escape_string, is_valid_identifier, quote_string,
    to_relationship_type,
};
use graphmap_cypher::{
    literal_of, match_, no_condition, node, property, render_condition, Condition,
    LogicalOperator,
};
use proptest::prelude::*;

fn leaf(index: usize) -> Condition {
    property("n", format!("p{}", index)).is_equal_to(literal_of(index as i64))
}

fn leaves(count: usize) -> Vec<Condition> {
    (0..count).map(leaf).collect()
}

// ============================================================================
// Escaping
// ============================================================================

proptest! {
    /// Labels are always wrapped in backticks with inner backticks doubled.
    #[test]
    fn prop_label_is_backticked(s in "[a-zA-Z0-9 _`]{1,20}") {
        let escaped = escape_label(&s);
        prop_assert!(escaped.starts_with('`'));
        prop_assert!(escaped.ends_with('`'));

        let inner = &escaped[1..escaped.len() - 1];
        prop_assert_eq!(inner.replace("``", ""), s.replace('`', ""));
    }

    /// Valid identifiers are left alone unless they collide with a keyword.
    #[test]
    fn prop_valid_name_unescaped(s in "[a-z_][a-zA-Z0-9_]{0,12}") {
        prop_assume!(!graphmap_cypher::escape::is_cypher_keyword(&s));
        prop_assert_eq!(escape_name(&s), s);
    }

    /// Anything that is not an identifier comes back backticked.
    #[test]
    fn prop_invalid_name_escaped(s in "[0-9 \\-.]{1}[a-zA-Z0-9 ]{0,8}") {
        prop_assert!(!is_valid_identifier(&s));
        let escaped = escape_name(&s);
        prop_assert!(escaped.starts_with('`') && escaped.ends_with('`'));
    }

    /// A quoted literal never contains an unescaped single quote.
    #[test]
    fn prop_quoted_literal_has_no_raw_quote(s in ".*") {
        let quoted = quote_string(&s);
        let inner = &quoted[1..quoted.len() - 1];

        let mut escaped = false;
        for c in inner.chars() {
            if c == '\'' {
                prop_assert!(escaped);
            }
            escaped = c == '\\' && !escaped;
        }
    }

    /// Plain text passes through string escaping unchanged.
    #[test]
    fn prop_plain_text_unchanged(s in "[a-zA-Z0-9 ]*") {
        let escaped = escape_string(&s);
        prop_assert_eq!(escaped.as_ref(), s.as_str());
    }

    /// Relationship type names are upper snake case.
    #[test]
    fn prop_relationship_type_upper(s in "[a-z][a-zA-Z]{0,16}") {
        let converted = to_relationship_type(&s);
        prop_assert!(converted.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        prop_assert_eq!(converted.replace('_', ""), s.to_uppercase());
    }
}

// ============================================================================
// Condition algebra
// ============================================================================

proptest! {
    /// Chaining with one operator yields one flat group holding every leaf.
    #[test]
    fn prop_same_operator_flattens(count in 2usize..12) {
        let combined = leaves(count)
            .into_iter()
            .reduce(Condition::and)
            .unwrap_or_default();

        match combined {
            Condition::Compound { operator, conditions } => {
                prop_assert_eq!(operator, LogicalOperator::And);
                prop_assert_eq!(conditions.len(), count);
            }
            other => prop_assert!(false, "expected a compound, got {:?}", other),
        }
    }

    /// The neutral condition disappears wherever it is mixed in.
    #[test]
    fn prop_neutral_absorbed(count in 1usize..8, positions in proptest::collection::vec(0usize..8, 0..6)) {
        let plain = leaves(count)
            .into_iter()
            .reduce(Condition::or)
            .unwrap_or_default();

        let mut mixed = Vec::new();
        for (index, condition) in leaves(count).into_iter().enumerate() {
            if positions.contains(&index) {
                mixed.push(no_condition());
            }
            mixed.push(condition);
        }
        let mixed = mixed.into_iter().fold(no_condition(), Condition::or);

        prop_assert_eq!(render_condition(&mixed), render_condition(&plain));
    }

    /// Parentheses always balance, however operators are mixed.
    #[test]
    fn prop_parentheses_balance(ops in proptest::collection::vec(0u8..4, 1..10)) {
        let mut condition = leaf(0);
        for (index, op) in ops.iter().enumerate() {
            let next = leaf(index + 1);
            condition = match op {
                0 => condition.and(next),
                1 => condition.or(next),
                2 => condition.xor(next),
                _ => condition.and(next).not(),
            };
        }

        let rendered = render_condition(&condition);
        let mut depth = 0i32;
        for c in rendered.chars() {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            prop_assert!(depth >= 0);
        }
        prop_assert_eq!(depth, 0);
    }

    /// The same statement renders to the same text every time.
    #[test]
    fn prop_rendering_deterministic(label in "[A-Z][a-zA-Z]{0,10}", key in "[a-z][a-z0-9]{0,8}", value in any::<i64>()) {
        let n = node(label.as_str()).named("n");
        let build = || {
            match_([&n])
                .where_(n.property(key.as_str()).is_equal_to(literal_of(value)))
                .returning([&n])
                .build()
        };

        let first = build().cypher();
        prop_assert_eq!(&first, &build().cypher());
        let expected_prefix = format!("MATCH (n:`{}`)", label);
        prop_assert!(first.starts_with(&expected_prefix));
    }
}
