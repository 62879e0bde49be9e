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

//! Type descriptions of the fixture domain.
//!
//! | Type | Id | Notes |
//! |------|----|-------|
//! | `User` | internal | owns `Bike`s |
//! | `Bike` | assigned string | enum color |
//! | `Trip` | generated UUID | instant with a custom format, non-cascading bike |
//! | `Person` | internal | self-referencing `KNOWS` |
//! | `Company` | assigned name | date attribute |
//! | `Employee` | named generator | versioned, non-cascading employer, manager |
//! | `Tag` | assigned name | label override |
//! | `Article` | generated UUID | extra label, versioned, incoming author |

use graphmap_core::{AttributeDescription, DomainType, IdStrategy, TypeDescription};
use graphmap_cypher::Direction;

/// Name of the generator used by `Employee`.
pub const EMPLOYEE_ID_GENERATOR: &str = "employee-sequence";

fn entity(type_name: &str) -> DomainType {
    DomainType::Entity(type_name.to_string())
}

fn entities(type_name: &str) -> DomainType {
    DomainType::list_of(entity(type_name))
}

/// `User`: internal id, owns bikes.
pub fn user_type() -> TypeDescription {
    TypeDescription::new("User")
        .field("id", DomainType::Long)
        .field("name", DomainType::String)
        .attribute(AttributeDescription::new("bikes", entities("Bike")).relationship_type("OWNS"))
        .id("id", IdStrategy::Internal)
}

/// `Bike`: assigned string id.
pub fn bike_type() -> TypeDescription {
    TypeDescription::new("Bike")
        .field("id", DomainType::String)
        .field("model", DomainType::String)
        .field(
            "color",
            DomainType::enumeration("Color", ["RED", "GREEN", "BLUE"]),
        )
        .id("id", IdStrategy::Assigned)
}

/// `Trip`: generated UUID, references the bike without cascading.
pub fn trip_type() -> TypeDescription {
    TypeDescription::new("Trip")
        .field("id", DomainType::Uuid)
        .field("distance", DomainType::Double)
        .attribute(AttributeDescription::new("started", DomainType::Instant).date_format("%Y-%m-%d %H:%M:%S"))
        .attribute(
            AttributeDescription::new("bike", entity("Bike"))
                .relationship_type("RIDDEN_WITH")
                .without_cascade(),
        )
        .id("id", IdStrategy::GeneratedUuid)
}

/// `Person`: internal id, knows other people.
pub fn person_type() -> TypeDescription {
    TypeDescription::new("Person")
        .field("id", DomainType::Long)
        .field("name", DomainType::String)
        .attribute(AttributeDescription::new("knows", entities("Person")).relationship_type("KNOWS"))
        .id("id", IdStrategy::Internal)
}

/// `Company`: the name is the id; created through the constructor.
pub fn company_type() -> TypeDescription {
    TypeDescription::new("Company")
        .field("name", DomainType::String)
        .field("founded", DomainType::Date)
        .id("name", IdStrategy::Assigned)
        .constructor(["name"])
}

/// `Employee`: ids from [`EMPLOYEE_ID_GENERATOR`], versioned.
pub fn employee_type() -> TypeDescription {
    TypeDescription::new("Employee")
        .field("id", DomainType::String)
        .field("name", DomainType::String)
        .field("version", DomainType::Long)
        .attribute(
            AttributeDescription::new("employer", entity("Company"))
                .relationship_type("WORKS_AT")
                .without_cascade(),
        )
        .attribute(AttributeDescription::new("manager", entity("Employee")).relationship_type("REPORTS_TO"))
        .id("id", IdStrategy::Generator(EMPLOYEE_ID_GENERATOR.to_string()))
        .version("version")
}

/// `Tag`: stored under the `Label` label, keyed by name.
pub fn tag_type() -> TypeDescription {
    TypeDescription::new("Tag")
        .label("Label")
        .field("name", DomainType::String)
        .attribute(AttributeDescription::new("weight", DomainType::Int).property_name("tag_weight"))
        .id("name", IdStrategy::Assigned)
}

/// `Article`: extra label, versioned, tagged, author on an incoming hop.
pub fn article_type() -> TypeDescription {
    TypeDescription::new("Article")
        .additional_label("Content")
        .field("id", DomainType::Uuid)
        .field("title", DomainType::String)
        .field("version", DomainType::Long)
        .field("keywords", DomainType::list_of(DomainType::String))
        .attribute(AttributeDescription::new("tags", entities("Tag")).relationship_type("TAGGED"))
        .attribute(
            AttributeDescription::new("author", entity("Person"))
                .relationship_type("WROTE")
                .direction(Direction::Incoming),
        )
        .id("id", IdStrategy::GeneratedUuid)
        .version("version")
}

/// Every fixture type, in an order that registers cleanly.
pub fn all_types() -> Vec<TypeDescription> {
    vec![
        user_type(),
        bike_type(),
        trip_type(),
        person_type(),
        company_type(),
        employee_type(),
        tag_type(),
        article_type(),
    ]
}
