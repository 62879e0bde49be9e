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

//! Cypher string escaping and identifier handling.
//!
//! Everything the renderer writes that did not come from the statement author
//! verbatim goes through this module: string literals, symbolic names,
//! property keys, labels and relationship types.

use crate::error::{CypherError, Result};
use std::borrow::Cow;
use unicode_normalization::UnicodeNormalization;

#[inline]
fn needs_escaping(s: &str) -> bool {
    s.chars().any(|ch| matches!(ch, '\\' | '\'' | '"' | '\n' | '\r' | '\t' | '\x00'))
}

/// Escape a string for use inside a single-quoted Cypher string literal.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
///
/// # Examples
///
/// ```
/// # use graphmap_cypher::escape::escape_string;
/// assert_eq!(escape_string("it's"), "it\\'s");
/// assert_eq!(escape_string(r"¯\_(ツ)_/¯"), r"¯\\_(ツ)_/¯");
/// ```
pub fn escape_string(s: &str) -> Cow<'_, str> {
    if !needs_escaping(s) {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 10);
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\x00' => escaped.push_str("\\u0000"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Quote a string as a Cypher string literal.
pub fn quote_string(s: &str) -> String {
    format!("'{}'", escape_string(s))
}

/// Check whether `s` can be written as a bare Cypher identifier.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };

    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate a bare identifier, returning it unchanged.
pub fn validate_identifier(s: &str) -> Result<&str> {
    if is_valid_identifier(s) {
        Ok(s)
    } else {
        Err(CypherError::InvalidIdentifier(s.to_string()))
    }
}

/// Normalize a string to Unicode NFC.
pub fn normalize_unicode(s: &str) -> String {
    s.nfc().collect()
}

fn is_dangerous_unicode(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            // Zero-width characters
            '\u{200B}'
            | '\u{200C}'
            | '\u{200D}'
            | '\u{FEFF}'
            // Directional formatting
            | '\u{202A}'
            | '\u{202B}'
            | '\u{202C}'
            | '\u{202D}'
            | '\u{202E}'
            | '\u{2066}'
            | '\u{2067}'
            | '\u{2068}'
            | '\u{2069}'
            // Other format characters
            | '\u{00AD}'
            | '\u{061C}'
            | '\u{180E}'
        )
}

fn sanitize(s: &str) -> String {
    normalize_unicode(s)
        .chars()
        .filter(|c| !is_dangerous_unicode(*c))
        .collect()
}

fn backtick(s: &str) -> String {
    format!("`{}`", s.replace('`', "``"))
}

/// Escape a symbolic name, property key, alias or map key.
///
/// Plain identifiers that are not reserved words are written as-is,
/// everything else is back-tick quoted with inner back-ticks doubled.
///
/// # Examples
///
/// ```
/// # use graphmap_cypher::escape::escape_name;
/// assert_eq!(escape_name("name"), "name");
/// assert_eq!(escape_name("first name"), "`first name`");
/// assert_eq!(escape_name("match"), "`match`");
/// ```
pub fn escape_name(s: &str) -> String {
    let sanitized = sanitize(s);
    if is_valid_identifier(&sanitized) && !is_cypher_keyword(&sanitized) {
        sanitized
    } else {
        backtick(&sanitized)
    }
}

/// Escape a node label. Labels are always back-tick quoted.
///
/// # Examples
///
/// ```
/// # use graphmap_cypher::escape::escape_label;
/// assert_eq!(escape_label("Bike"), "`Bike`");
/// assert_eq!(escape_label("Odd`Label"), "`Odd``Label`");
/// ```
pub fn escape_label(s: &str) -> String {
    backtick(&sanitize(s))
}

/// Escape a relationship type. Types are always back-tick quoted.
pub fn escape_relationship_type(s: &str) -> String {
    backtick(&sanitize(s))
}

/// Derive a relationship type from an attribute name.
///
/// Camel case boundaries become underscores and the result is upper-cased,
/// so `hasBikes` becomes `HAS_BIKES`.
///
/// # Examples
///
/// ```
/// # use graphmap_cypher::escape::to_relationship_type;
/// assert_eq!(to_relationship_type("hasBikes"), "HAS_BIKES");
/// assert_eq!(to_relationship_type("owner"), "OWNER");
/// assert_eq!(to_relationship_type("worksFor2Companies"), "WORKS_FOR2_COMPANIES");
/// ```
pub fn to_relationship_type(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 5);
    let mut prev_lower = false;

    for c in s.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            result.push('_');
        }
        if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c.to_ascii_uppercase());
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        } else {
            result.push('_');
            prev_lower = false;
        }
    }

    let mut collapsed = String::with_capacity(result.len());
    let mut prev_underscore = false;
    for c in result.chars() {
        if c == '_' {
            if !prev_underscore {
                collapsed.push(c);
            }
            prev_underscore = true;
        } else {
            collapsed.push(c);
            prev_underscore = false;
        }
    }

    collapsed.trim_matches('_').to_string()
}

/// Reserved words that cannot be used as bare names.
pub fn is_cypher_keyword(s: &str) -> bool {
    matches!(
        s.to_uppercase().as_str(),
        "ALL"
            | "AND"
            | "ANY"
            | "AS"
            | "ASC"
            | "ASCENDING"
            | "BY"
            | "CALL"
            | "CASE"
            | "CONTAINS"
            | "CREATE"
            | "DELETE"
            | "DESC"
            | "DESCENDING"
            | "DETACH"
            | "DISTINCT"
            | "DO"
            | "DROP"
            | "ELSE"
            | "END"
            | "ENDS"
            | "EXISTS"
            | "FALSE"
            | "FOREACH"
            | "IN"
            | "IS"
            | "LIMIT"
            | "MANDATORY"
            | "MATCH"
            | "MERGE"
            | "NONE"
            | "NOT"
            | "NULL"
            | "OF"
            | "ON"
            | "OPTIONAL"
            | "OR"
            | "ORDER"
            | "REMOVE"
            | "RETURN"
            | "SET"
            | "SKIP"
            | "STARTS"
            | "THEN"
            | "TRUE"
            | "UNION"
            | "UNIQUE"
            | "UNWIND"
            | "USING"
            | "WHEN"
            | "WHERE"
            | "WITH"
            | "XOR"
            | "YIELD"
    )
}
