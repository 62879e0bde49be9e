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

//! Entity builders for the fixture domain.
//!
//! Each builder returns a fresh, unsaved [`EntityRef`]. Ids are left unset
//! unless the type uses assigned ids.
//!
//! # Examples
//!
//! ```
//! use graphmap_test::fixtures::builders::{bike, user};
//!
//! let b = bike("b-1", "Roadster");
//! let u = user("Alice", &[&b]);
//! assert_eq!(u.related("bikes").len(), 1);
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use graphmap_core::{DomainValue, Entity, EntityRef};

/// Start of every fixture trip, 2024-05-01 08:30:00 UTC.
pub const TRIP_START_SECONDS: i64 = 1_714_552_200;

/// A `User` owning the given bikes.
pub fn user(name: &str, bikes: &[&EntityRef]) -> EntityRef {
    EntityRef::new(
        Entity::new("User")
            .with("name", name)
            .with_entities("bikes", bikes.iter().copied()),
    )
}

/// A red `Bike`.
pub fn bike(id: &str, model: &str) -> EntityRef {
    EntityRef::new(
        Entity::new("Bike")
            .with("id", id)
            .with("model", model)
            .with("color", DomainValue::Enum("RED".to_string())),
    )
}

/// A `Trip` on a bike.
pub fn trip(distance: f64, bike: &EntityRef) -> EntityRef {
    EntityRef::new(
        Entity::new("Trip")
            .with("distance", distance)
            .with("started", DateTime::<Utc>::from_timestamp(TRIP_START_SECONDS, 0))
            .with_entity("bike", bike),
    )
}

/// A `Person` with no acquaintances.
pub fn person(name: &str) -> EntityRef {
    EntityRef::new(Entity::new("Person").with("name", name))
}

/// A `Company` founded on 2001-09-01.
pub fn company(name: &str) -> EntityRef {
    EntityRef::new(
        Entity::new("Company")
            .with("name", name)
            .with("founded", NaiveDate::from_ymd_opt(2001, 9, 1)),
    )
}

/// An `Employee` working for a company.
pub fn employee(name: &str, employer: &EntityRef) -> EntityRef {
    EntityRef::new(
        Entity::new("Employee")
            .with("name", name)
            .with_entity("employer", employer),
    )
}

/// A `Tag`.
pub fn tag(name: &str, weight: i32) -> EntityRef {
    EntityRef::new(Entity::new("Tag").with("name", name).with("weight", weight))
}

/// An `Article` with tags and an author.
pub fn article(title: &str, author: &EntityRef, tags: &[&EntityRef]) -> EntityRef {
    EntityRef::new(
        Entity::new("Article")
            .with("title", title)
            .with(
                "keywords",
                DomainValue::List(vec![DomainValue::from("graph"), DomainValue::from("rust")]),
            )
            .with_entity("author", author)
            .with_entities("tags", tags.iter().copied()),
    )
}
