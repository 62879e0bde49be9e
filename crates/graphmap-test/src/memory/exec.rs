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

//! Clause-by-clause execution over a row table.

use graphmap_core::{OgmError, Record, RecordValue, Result};
use graphmap_cypher::functions::is_aggregate;
use graphmap_cypher::{
    render_expression, Clause, CypherValue, Direction, Expression, Node, PatternElement,
    RelationshipDetail, SetItem, SortDirection, SortItem, Statement,
};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::row::{Bound, Row};
use super::store::{EntityId, GraphStore};
use super::unsupported;

/// One projected output row. `scope` keeps the variables visible to
/// `ORDER BY`.
struct Projected {
    scope: Row,
    columns: Vec<(String, Bound)>,
}

/// Runs one statement against a store.
pub(crate) struct Executor<'a> {
    pub(crate) store: &'a mut GraphStore,
    pub(crate) parameters: &'a BTreeMap<String, CypherValue>,
}

impl<'a> Executor<'a> {
    pub(crate) fn new(
        store: &'a mut GraphStore,
        parameters: &'a BTreeMap<String, CypherValue>,
    ) -> Self {
        Self { store, parameters }
    }

    pub(crate) fn execute(&mut self, statement: &Statement) -> Result<Vec<Record>> {
        let clauses = statement.clauses();
        let mut rows = vec![Row::new()];
        let mut projection: Option<Vec<Projected>> = None;

        let mut index = 0;
        while index < clauses.len() {
            match &clauses[index] {
                Clause::Match { optional, patterns } => {
                    let filter = match clauses.get(index + 1) {
                        Some(Clause::Where(condition)) => {
                            index += 1;
                            Some(condition)
                        }
                        _ => None,
                    };
                    rows = self.match_rows(rows, patterns, *optional, filter)?;
                }
                Clause::Where(condition) => {
                    let mut kept = Vec::with_capacity(rows.len());
                    for row in rows {
                        if self.test(condition, &row)? == Some(true) {
                            kept.push(row);
                        }
                    }
                    rows = kept;
                }
                Clause::Unwind {
                    expression,
                    variable,
                } => {
                    let mut unwound = Vec::new();
                    for row in rows {
                        let value = self.eval(expression, &row)?;
                        let items = match value {
                            Bound::Null => Vec::new(),
                            other => other.items().ok_or_else(|| {
                                OgmError::Transport(format!("cannot UNWIND {:?}", other))
                            })?,
                        };
                        for item in items {
                            let mut next = row.clone();
                            next.insert(variable.clone(), item);
                            unwound.push(next);
                        }
                    }
                    rows = unwound;
                }
                Clause::Create(patterns) => {
                    for row in rows.iter_mut() {
                        for pattern in patterns {
                            self.create_pattern(row, pattern)?;
                        }
                    }
                }
                Clause::Merge(patterns) => {
                    for pattern in patterns {
                        let mut merged = Vec::with_capacity(rows.len());
                        for row in rows {
                            merged.extend(self.merge_pattern(row, pattern)?);
                        }
                        rows = merged;
                    }
                }
                Clause::Set(items) => {
                    for row in &rows {
                        for item in items {
                            self.apply_set(row, item)?;
                        }
                    }
                }
                Clause::Delete {
                    detach,
                    expressions,
                } => {
                    for row in &rows {
                        for expression in expressions {
                            let target = self.eval(expression, row)?;
                            self.delete(target, *detach)?;
                        }
                    }
                }
                Clause::Return { distinct, items } => {
                    projection = Some(self.project(&rows, items, *distinct)?);
                }
                Clause::OrderBy(items) => {
                    if let Some(projected) = projection.as_mut() {
                        self.order(projected, items)?;
                    }
                }
                Clause::Skip(count) => {
                    if let Some(projected) = projection.as_mut() {
                        let count = usize::try_from(*count).unwrap_or(usize::MAX);
                        projected.drain(..count.min(projected.len()));
                    }
                }
                Clause::Limit(count) => {
                    if let Some(projected) = projection.as_mut() {
                        projected.truncate(usize::try_from(*count).unwrap_or(usize::MAX));
                    }
                }
            }
            index += 1;
        }

        Ok(projection
            .unwrap_or_default()
            .into_iter()
            .map(|projected| {
                let mut record = Record::new();
                for (key, value) in projected.columns {
                    record.push(key, self.to_record_value(value));
                }
                record
            })
            .collect())
    }

    fn match_rows(
        &self,
        rows: Vec<Row>,
        patterns: &[PatternElement],
        optional: bool,
        filter: Option<&graphmap_cypher::Condition>,
    ) -> Result<Vec<Row>> {
        let mut out = Vec::new();
        for row in rows {
            let mut matches = vec![row.clone()];
            for pattern in patterns {
                let mut extended = Vec::new();
                for candidate in &matches {
                    extended.extend(self.match_pattern(candidate, pattern)?);
                }
                matches = extended;
            }
            if let Some(condition) = filter {
                let mut kept = Vec::with_capacity(matches.len());
                for candidate in matches {
                    if self.test(condition, &candidate)? == Some(true) {
                        kept.push(candidate);
                    }
                }
                matches = kept;
            }

            if matches.is_empty() && optional {
                let mut padded = row;
                for pattern in patterns {
                    for variable in pattern_variables(pattern) {
                        padded.entry(variable).or_insert(Bound::Null);
                    }
                }
                out.push(padded);
            } else {
                out.extend(matches);
            }
        }
        Ok(out)
    }

    fn match_pattern(&self, row: &Row, pattern: &PatternElement) -> Result<Vec<Row>> {
        match pattern {
            PatternElement::Node(node) => Ok(self
                .match_node(row, node)?
                .into_iter()
                .map(|(row, _)| row)
                .collect()),
            PatternElement::Relationship(relationship) => {
                let mut partial: Vec<(Row, i64, Vec<i64>)> = self
                    .match_node(row, relationship.start_node())?
                    .into_iter()
                    .map(|(row, id)| (row, id, Vec::new()))
                    .collect();

                for (detail, end) in relationship.segments() {
                    let mut next = Vec::new();
                    for (row, at, used) in partial {
                        for (path, target) in self.expand(at, detail, &used, &row)? {
                            let Some(mut bound) = self.bind_node(row.clone(), end, target)? else {
                                continue;
                            };
                            if let Some(name) = &detail.name {
                                let value = if detail.length.is_some() {
                                    Bound::List(path.iter().map(|id| Bound::Relationship(*id)).collect())
                                } else {
                                    path.first().map_or(Bound::Null, |id| Bound::Relationship(*id))
                                };
                                match bound.get(name) {
                                    Some(existing) if existing != &value => continue,
                                    _ => {
                                        bound.insert(name.clone(), value);
                                    }
                                }
                            }
                            let mut used = used.clone();
                            used.extend(path);
                            next.push((bound, target, used));
                        }
                    }
                    partial = next;
                }
                Ok(partial.into_iter().map(|(row, _, _)| row).collect())
            }
        }
    }

    fn match_node(&self, row: &Row, node: &Node) -> Result<Vec<(Row, i64)>> {
        if let Some(name) = node.symbolic_name() {
            if let Some(bound) = row.get(name) {
                return Ok(match bound {
                    Bound::Node(id) if self.node_matches(*id, node, row)? => {
                        vec![(row.clone(), *id)]
                    }
                    _ => Vec::new(),
                });
            }
        }

        let mut out = Vec::new();
        for id in self.store.nodes.keys().copied() {
            if self.node_matches(id, node, row)? {
                let mut next = row.clone();
                if let Some(name) = node.symbolic_name() {
                    next.insert(name.to_string(), Bound::Node(id));
                }
                out.push((next, id));
            }
        }
        Ok(out)
    }

    fn bind_node(&self, mut row: Row, node: &Node, id: i64) -> Result<Option<Row>> {
        if !self.node_matches(id, node, &row)? {
            return Ok(None);
        }
        if let Some(name) = node.symbolic_name() {
            match row.get(name) {
                Some(Bound::Node(existing)) if *existing == id => {}
                Some(_) => return Ok(None),
                None => {
                    row.insert(name.to_string(), Bound::Node(id));
                }
            }
        }
        Ok(Some(row))
    }

    fn node_matches(&self, id: i64, node: &Node, row: &Row) -> Result<bool> {
        let Some(stored) = self.store.nodes.get(&id) else {
            return Ok(false);
        };
        if !node.labels().iter().all(|label| stored.has_label(label)) {
            return Ok(false);
        }
        self.properties_match(EntityId::Node(id), node.properties(), row)
    }

    fn properties_match(
        &self,
        entity: EntityId,
        properties: &[(String, Expression)],
        row: &Row,
    ) -> Result<bool> {
        for (key, expression) in properties {
            let expected = self.eval(expression, row)?;
            let actual = self
                .store
                .property(entity, key)
                .cloned()
                .map_or(Bound::Null, Bound::from_value);
            if actual.equals(&expected) != Some(true) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Paths leaving `start` that satisfy one hop, with the node each ends at.
    fn expand(
        &self,
        start: i64,
        detail: &RelationshipDetail,
        used: &[i64],
        row: &Row,
    ) -> Result<Vec<(Vec<i64>, i64)>> {
        let (minimum, maximum) = match detail.length {
            None => (1, 1),
            Some(length) => (
                length.minimum.unwrap_or(1) as usize,
                length
                    .maximum
                    .map_or(self.store.relationships.len(), |m| m as usize),
            ),
        };

        let mut out = Vec::new();
        let mut stack = vec![(start, Vec::<i64>::new())];
        while let Some((at, path)) = stack.pop() {
            if path.len() >= minimum {
                out.push((path.clone(), at));
            }
            if path.len() >= maximum {
                continue;
            }
            for relationship in self.store.relationships.values() {
                if used.contains(&relationship.id) || path.contains(&relationship.id) {
                    continue;
                }
                if !detail.types.is_empty() && !detail.types.contains(&relationship.rel_type) {
                    continue;
                }
                let next = match detail.direction {
                    Direction::Outgoing if relationship.start == at => relationship.end,
                    Direction::Incoming if relationship.end == at => relationship.start,
                    Direction::Undirected => match relationship.other_end(at) {
                        Some(other) => other,
                        None => continue,
                    },
                    _ => continue,
                };
                if !self.properties_match(
                    EntityId::Relationship(relationship.id),
                    &detail.properties,
                    row,
                )? {
                    continue;
                }
                let mut extended = path.clone();
                extended.push(relationship.id);
                stack.push((next, extended));
            }
        }
        // Depth-first search pops in reverse; restore id order.
        out.sort();
        Ok(out)
    }

    fn create_pattern(&mut self, row: &mut Row, pattern: &PatternElement) -> Result<()> {
        match pattern {
            PatternElement::Node(node) => {
                if let Some(name) = node.symbolic_name() {
                    if row.contains_key(name) {
                        return Err(OgmError::Transport(format!(
                            "variable '{}' is already bound",
                            name
                        )));
                    }
                }
                self.resolve_or_create(row, node)?;
            }
            PatternElement::Relationship(relationship) => {
                let mut at = self.resolve_or_create(row, relationship.start_node())?;
                for (detail, end) in relationship.segments() {
                    let target = self.resolve_or_create(row, end)?;
                    let rel_type = detail.types.first().ok_or_else(|| {
                        OgmError::Transport("a created relationship needs a type".to_string())
                    })?;
                    let properties = self.property_map(&detail.properties, row)?;
                    let (start, end) = match detail.direction {
                        Direction::Incoming => (target, at),
                        Direction::Outgoing | Direction::Undirected => (at, target),
                    };
                    let id = self
                        .store
                        .create_relationship(start, end, rel_type, properties);
                    if let Some(name) = &detail.name {
                        row.insert(name.clone(), Bound::Relationship(id));
                    }
                    at = target;
                }
            }
        }
        Ok(())
    }

    fn resolve_or_create(&mut self, row: &mut Row, node: &Node) -> Result<i64> {
        if let Some(name) = node.symbolic_name() {
            match row.get(name) {
                Some(Bound::Node(id)) => return Ok(*id),
                Some(other) => {
                    return Err(OgmError::Transport(format!(
                        "variable '{}' is bound to {:?}, not a node",
                        name, other
                    )))
                }
                None => {}
            }
        }
        let properties = self.property_map(node.properties(), row)?;
        let id = self.store.create_node(node.labels(), properties);
        if let Some(name) = node.symbolic_name() {
            row.insert(name.to_string(), Bound::Node(id));
        }
        Ok(id)
    }

    fn property_map(
        &self,
        properties: &[(String, Expression)],
        row: &Row,
    ) -> Result<BTreeMap<String, CypherValue>> {
        let mut map = BTreeMap::new();
        for (key, expression) in properties {
            let value = self.eval(expression, row)?.into_value().ok_or_else(|| {
                unsupported(format!("storing a node or relationship in '{}'", key))
            })?;
            if !value.is_null() {
                map.insert(key.clone(), value);
            }
        }
        Ok(map)
    }

    fn merge_pattern(&mut self, row: Row, pattern: &PatternElement) -> Result<Vec<Row>> {
        let matches = self.match_pattern(&row, pattern)?;
        if !matches.is_empty() {
            return Ok(matches);
        }
        let mut row = row;
        self.create_pattern(&mut row, pattern)?;
        Ok(vec![row])
    }

    fn apply_set(&mut self, row: &Row, item: &SetItem) -> Result<()> {
        match item {
            SetItem::Property { property, value } => {
                let Expression::Property { subject, key } = property else {
                    return Err(unsupported(format!(
                        "SET target {}",
                        render_expression(property)
                    )));
                };
                let Some(entity) = entity_of(&self.eval(subject, row)?) else {
                    return Ok(());
                };
                let value = self.eval(value, row)?.into_value().ok_or_else(|| {
                    unsupported(format!("storing a node or relationship in '{}'", key))
                })?;
                self.write_property(entity, key, value);
            }
            SetItem::Mutate { variable, value } => {
                let target = row.get(variable).cloned().ok_or_else(|| {
                    OgmError::Transport(format!("variable '{}' is not defined", variable))
                })?;
                let Some(entity) = entity_of(&target) else {
                    return Ok(());
                };
                match self.eval(value, row)? {
                    Bound::Value(CypherValue::Map(map)) => {
                        for (key, value) in map {
                            self.write_property(entity, &key, value);
                        }
                    }
                    Bound::Null => {}
                    other => {
                        return Err(OgmError::Transport(format!(
                            "SET {} += expects a map, got {:?}",
                            variable, other
                        )))
                    }
                }
            }
        }
        Ok(())
    }

    fn write_property(&mut self, entity: EntityId, key: &str, value: CypherValue) {
        if let Some(properties) = self.store.properties_mut(entity) {
            if value.is_null() {
                properties.remove(key);
            } else {
                properties.insert(key.to_string(), value);
            }
        }
    }

    fn delete(&mut self, target: Bound, detach: bool) -> Result<()> {
        match target {
            Bound::Node(id) => {
                if !self.store.nodes.contains_key(&id) {
                    return Ok(());
                }
                let attached = self.store.attached(id);
                if !attached.is_empty() && !detach {
                    return Err(OgmError::Transport(format!(
                        "node {} still has {} relationship(s)",
                        id,
                        attached.len()
                    )));
                }
                for relationship in attached {
                    self.store.relationships.remove(&relationship);
                }
                self.store.nodes.remove(&id);
            }
            Bound::Relationship(id) => {
                self.store.relationships.remove(&id);
            }
            Bound::List(items) => {
                for item in items {
                    self.delete(item, detach)?;
                }
            }
            Bound::Null => {}
            Bound::Value(value) => {
                return Err(OgmError::Transport(format!("cannot delete {}", value.kind())))
            }
        }
        Ok(())
    }

    fn project(&self, rows: &[Row], items: &[Expression], distinct: bool) -> Result<Vec<Projected>> {
        let keys: Vec<String> = items.iter().map(column_name).collect();
        let mut projected = Vec::new();

        if !items.iter().any(is_aggregate) {
            for row in rows {
                let mut scope = row.clone();
                let mut columns = Vec::with_capacity(items.len());
                for (key, item) in keys.iter().zip(items) {
                    let value = if matches!(unaliased(item), Expression::Asterisk) {
                        return Err(unsupported("RETURN *"));
                    } else {
                        self.eval(item, row)?
                    };
                    scope.insert(key.clone(), value.clone());
                    columns.push((key.clone(), value));
                }
                projected.push(Projected { scope, columns });
            }
        } else {
            // Grouping keys are the non-aggregating items, in first-seen order.
            let mut groups: Vec<(Vec<Bound>, Vec<&Row>)> = Vec::new();
            for row in rows {
                let mut group_key = Vec::new();
                for item in items.iter().filter(|i| !is_aggregate(i)) {
                    group_key.push(self.eval(item, row)?);
                }
                match groups.iter_mut().find(|(k, _)| *k == group_key) {
                    Some((_, members)) => members.push(row),
                    None => groups.push((group_key, vec![row])),
                }
            }
            if groups.is_empty() && items.iter().all(is_aggregate) {
                groups.push((Vec::new(), Vec::new()));
            }

            for (group_key, members) in groups {
                let mut group_values = group_key.into_iter();
                let mut scope = Row::new();
                let mut columns = Vec::with_capacity(items.len());
                for (key, item) in keys.iter().zip(items) {
                    let value = if is_aggregate(item) {
                        self.aggregate(unaliased(item), &members)?
                    } else {
                        group_values.next().unwrap_or(Bound::Null)
                    };
                    scope.insert(key.clone(), value.clone());
                    columns.push((key.clone(), value));
                }
                projected.push(Projected { scope, columns });
            }
        }

        if distinct {
            let mut unique: Vec<Projected> = Vec::with_capacity(projected.len());
            for candidate in projected {
                if !unique.iter().any(|u| u.columns == candidate.columns) {
                    unique.push(candidate);
                }
            }
            projected = unique;
        }
        Ok(projected)
    }

    fn aggregate(&self, expression: &Expression, rows: &[&Row]) -> Result<Bound> {
        let Expression::Function(function) = expression else {
            return Err(unsupported(render_expression(expression)));
        };
        let argument = function.arguments.first().ok_or_else(|| {
            OgmError::Transport(format!("{}() expects an argument", function.name))
        })?;

        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            let value = match argument {
                Expression::Asterisk => Bound::Value(CypherValue::Bool(true)),
                other => self.eval(other, row)?,
            };
            if value.is_null() {
                continue;
            }
            if function.distinct && values.contains(&value) {
                continue;
            }
            values.push(value);
        }

        match function.name.as_str() {
            "count" => Ok(Bound::Value(CypherValue::Int(values.len() as i64))),
            "collect" => Ok(Bound::List(values)),
            other => Err(unsupported(format!("aggregate {}()", other))),
        }
    }

    fn order(&self, projected: &mut Vec<Projected>, items: &[SortItem]) -> Result<()> {
        let mut sort_keys = Vec::with_capacity(projected.len());
        for entry in projected.iter() {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                let rendered = render_expression(&item.expression);
                let value = match entry.columns.iter().find(|(key, _)| *key == rendered) {
                    Some((_, value)) => value.clone(),
                    None => self.eval(&item.expression, &entry.scope)?,
                };
                values.push(value);
            }
            sort_keys.push(values);
        }

        let mut keyed: Vec<(Vec<Bound>, Projected)> =
            sort_keys.into_iter().zip(projected.drain(..)).collect();
        keyed.sort_by(|(a, _), (b, _)| {
            for ((x, y), item) in a.iter().zip(b).zip(items) {
                // Nulls sort last ascending.
                let ordering = match (x.is_null(), y.is_null()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    _ => x.compare(y).unwrap_or(Ordering::Equal),
                };
                let ordering = match item.direction {
                    SortDirection::Descending => ordering.reverse(),
                    _ => ordering,
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
        projected.extend(keyed.into_iter().map(|(_, entry)| entry));
        Ok(())
    }

    fn to_record_value(&self, value: Bound) -> RecordValue {
        match value {
            Bound::Null => RecordValue::Value(CypherValue::Null),
            Bound::Value(v) => RecordValue::Value(v),
            Bound::Node(id) => self
                .store
                .nodes
                .get(&id)
                .cloned()
                .map_or(RecordValue::Value(CypherValue::Null), RecordValue::Node),
            Bound::Relationship(id) => self
                .store
                .relationships
                .get(&id)
                .cloned()
                .map_or(RecordValue::Value(CypherValue::Null), RecordValue::Relationship),
            Bound::List(items) => {
                RecordValue::List(items.into_iter().map(|i| self.to_record_value(i)).collect())
            }
        }
    }
}

fn entity_of(bound: &Bound) -> Option<EntityId> {
    match bound {
        Bound::Node(id) => Some(EntityId::Node(*id)),
        Bound::Relationship(id) => Some(EntityId::Relationship(*id)),
        _ => None,
    }
}

fn unaliased(expression: &Expression) -> &Expression {
    match expression {
        Expression::Aliased { expression, .. } => unaliased(expression),
        other => other,
    }
}

fn column_name(expression: &Expression) -> String {
    match expression {
        Expression::Aliased { alias, .. } => alias.clone(),
        other => render_expression(other),
    }
}

fn pattern_variables(pattern: &PatternElement) -> Vec<String> {
    let mut names = Vec::new();
    match pattern {
        PatternElement::Node(node) => names.extend(node.symbolic_name().map(str::to_string)),
        PatternElement::Relationship(relationship) => {
            names.extend(relationship.start_node().symbolic_name().map(str::to_string));
            for (detail, end) in relationship.segments() {
                names.extend(detail.name.clone());
                names.extend(end.symbolic_name().map(str::to_string));
            }
        }
    }
    names
}
