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

//! Built-in conversions between domain values and native graph values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use graphmap_cypher::CypherValue;

use crate::error::{OgmError, Result};
use crate::value::{DomainType, DomainValue};

/// Default textual form of an instant.
pub const DEFAULT_INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

fn mismatch(expected: &DomainType, found: &str) -> OgmError {
    OgmError::Conversion(format!("expected {}, found {}", expected.name(), found))
}

fn lossy(value: impl ToString, target: &str) -> OgmError {
    OgmError::LossyConversion {
        value: value.to_string(),
        target: target.to_string(),
    }
}

/// Write a scalar domain value. Lists and custom types are handled by the
/// registry; `None` means this table has no entry for the type.
pub(crate) fn write_scalar(
    value: &DomainValue,
    ty: &DomainType,
    date_format: Option<&str>,
) -> Option<Result<CypherValue>> {
    let converted = match (ty, value) {
        (DomainType::Bool, DomainValue::Bool(b)) => Ok(CypherValue::Bool(*b)),
        (DomainType::Byte, DomainValue::Byte(b)) => Ok(CypherValue::Bytes(vec![*b as u8])),
        (DomainType::Short, v) => match v.as_long() {
            Some(i) => i16::try_from(i)
                .map(|s| CypherValue::Int(i64::from(s)))
                .map_err(|_| lossy(i, "short")),
            None => Err(mismatch(ty, v.kind())),
        },
        (DomainType::Int, v) => match v.as_long() {
            Some(i) => i32::try_from(i)
                .map(|n| CypherValue::Int(i64::from(n)))
                .map_err(|_| lossy(i, "int")),
            None => Err(mismatch(ty, v.kind())),
        },
        (DomainType::Long, v) => match v.as_long() {
            Some(i) => Ok(CypherValue::Int(i)),
            None => Err(mismatch(ty, v.kind())),
        },
        (DomainType::Float, DomainValue::Float(f)) => Ok(CypherValue::String(f.to_string())),
        (DomainType::Double, DomainValue::Double(f)) => Ok(CypherValue::Float(*f)),
        (DomainType::Double, DomainValue::Float(f)) => Ok(CypherValue::Float(f64::from(*f))),
        (DomainType::Char, DomainValue::Char(c)) => Ok(CypherValue::String(c.to_string())),
        (DomainType::String, DomainValue::String(s)) => Ok(CypherValue::String(s.clone())),
        (DomainType::Bytes, DomainValue::Bytes(b)) => Ok(CypherValue::Bytes(b.clone())),
        (DomainType::Uuid, DomainValue::Uuid(u)) => Ok(CypherValue::String(u.to_string())),
        (DomainType::Enum { name, constants }, DomainValue::Enum(c)) => {
            if constants.is_empty() || constants.contains(c) {
                Ok(CypherValue::String(c.clone()))
            } else {
                Err(OgmError::Conversion(format!(
                    "'{}' is not a constant of {}",
                    c, name
                )))
            }
        }
        (DomainType::Date, DomainValue::Date(d)) => Ok(CypherValue::Date(*d)),
        (DomainType::Time, DomainValue::Time(t)) => Ok(CypherValue::LocalTime(*t)),
        (DomainType::LocalDateTime, DomainValue::LocalDateTime(dt)) => {
            Ok(CypherValue::LocalDateTime(*dt))
        }
        (DomainType::DateTime, DomainValue::DateTime(dt)) => Ok(CypherValue::DateTime(*dt)),
        (DomainType::Instant, DomainValue::Instant(instant)) => Ok(CypherValue::String(
            instant
                .format(date_format.unwrap_or(DEFAULT_INSTANT_FORMAT))
                .to_string(),
        )),
        (DomainType::Point, DomainValue::Point(p)) => Ok(CypherValue::Point(*p)),
        (DomainType::List(_) | DomainType::Custom(_), _) => return None,
        (DomainType::Entity(name), _) => Err(OgmError::Conversion(format!(
            "association to '{}' has no property form",
            name
        ))),
        (ty, v) => Err(mismatch(ty, v.kind())),
    };
    Some(converted)
}

/// Read a scalar graph value. Lists and custom types are handled by the
/// registry; `None` means this table has no entry for the type.
pub(crate) fn read_scalar(
    value: &CypherValue,
    ty: &DomainType,
    date_format: Option<&str>,
) -> Option<Result<DomainValue>> {
    let converted = match (ty, value) {
        (DomainType::Bool, CypherValue::Bool(b)) => Ok(DomainValue::Bool(*b)),
        (DomainType::Byte, CypherValue::Bytes(bytes)) => match bytes.as_slice() {
            [b] => Ok(DomainValue::Byte(*b as i8)),
            _ => Err(lossy(format!("{} bytes", bytes.len()), "byte")),
        },
        (DomainType::Byte, CypherValue::Int(i)) => i8::try_from(*i)
            .map(DomainValue::Byte)
            .map_err(|_| lossy(i, "byte")),
        (DomainType::Short, CypherValue::Int(i)) => i16::try_from(*i)
            .map(DomainValue::Short)
            .map_err(|_| lossy(i, "short")),
        (DomainType::Int, CypherValue::Int(i)) => i32::try_from(*i)
            .map(DomainValue::Int)
            .map_err(|_| lossy(i, "int")),
        (DomainType::Long, CypherValue::Int(i)) => Ok(DomainValue::Long(*i)),
        (DomainType::Float, CypherValue::String(s)) => s
            .parse::<f32>()
            .map(DomainValue::Float)
            .map_err(|_| OgmError::Conversion(format!("'{}' is not a float", s))),
        (DomainType::Float, CypherValue::Int(i)) => Ok(DomainValue::Float(*i as f32)),
        (DomainType::Float, CypherValue::Float(f)) => {
            let narrowed = *f as f32;
            if f.is_finite() && !narrowed.is_finite() {
                Err(lossy(f, "float"))
            } else {
                Ok(DomainValue::Float(narrowed))
            }
        }
        (DomainType::Double, CypherValue::Float(f)) => Ok(DomainValue::Double(*f)),
        (DomainType::Double, CypherValue::Int(i)) => Ok(DomainValue::Double(*i as f64)),
        (DomainType::Char, CypherValue::String(s)) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(DomainValue::Char(c)),
                _ => Err(OgmError::Conversion(format!(
                    "'{}' is not a single character",
                    s
                ))),
            }
        }
        (DomainType::String, CypherValue::String(s)) => Ok(DomainValue::String(s.clone())),
        (DomainType::Bytes, CypherValue::Bytes(b)) => Ok(DomainValue::Bytes(b.clone())),
        (DomainType::Uuid, CypherValue::String(s)) => uuid::Uuid::parse_str(s)
            .map(DomainValue::Uuid)
            .map_err(|e| OgmError::Conversion(format!("'{}' is not a UUID: {}", s, e))),
        (DomainType::Enum { name, constants }, CypherValue::String(s)) => {
            if constants.is_empty() || constants.contains(s) {
                Ok(DomainValue::Enum(s.clone()))
            } else {
                Err(OgmError::Conversion(format!(
                    "'{}' is not a constant of {}",
                    s, name
                )))
            }
        }
        (DomainType::Date, CypherValue::Date(d)) => Ok(DomainValue::Date(*d)),
        (DomainType::Time, CypherValue::LocalTime(t)) => Ok(DomainValue::Time(*t)),
        (DomainType::LocalDateTime, CypherValue::LocalDateTime(dt)) => {
            Ok(DomainValue::LocalDateTime(*dt))
        }
        (DomainType::DateTime, CypherValue::DateTime(dt)) => Ok(DomainValue::DateTime(*dt)),
        (DomainType::Instant, CypherValue::DateTime(dt)) => {
            Ok(DomainValue::Instant(dt.with_timezone(&Utc)))
        }
        (DomainType::Instant, CypherValue::String(s)) => {
            parse_instant(s, date_format.unwrap_or(DEFAULT_INSTANT_FORMAT))
                .map(DomainValue::Instant)
        }
        (DomainType::Point, CypherValue::Point(p)) => Ok(DomainValue::Point(*p)),
        (DomainType::List(_) | DomainType::Custom(_), _) => return None,
        (DomainType::Entity(name), _) => Err(OgmError::Conversion(format!(
            "association to '{}' has no property form",
            name
        ))),
        (ty, v) => Err(mismatch(ty, v.kind())),
    };
    Some(converted)
}

/// Parse an instant with a chrono format string. Formats without a time part
/// read as midnight UTC.
fn parse_instant(s: &str, format: &str) -> Result<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, format) {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| OgmError::Conversion(format!("'{}' does not match '{}'", s, format)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn write(value: DomainValue, ty: DomainType) -> Result<CypherValue> {
        write_scalar(&value, &ty, None).unwrap()
    }

    fn read(value: CypherValue, ty: DomainType) -> Result<DomainValue> {
        read_scalar(&value, &ty, None).unwrap()
    }

    #[test]
    fn test_integer_narrowing() {
        assert_eq!(read(CypherValue::Int(127), DomainType::Byte).unwrap(), DomainValue::Byte(127));
        assert!(matches!(
            read(CypherValue::Int(128), DomainType::Byte),
            Err(OgmError::LossyConversion { .. })
        ));
        assert!(matches!(
            read(CypherValue::Int(40_000), DomainType::Short),
            Err(OgmError::LossyConversion { .. })
        ));
        assert!(matches!(
            read(CypherValue::Int(i64::from(i32::MAX) + 1), DomainType::Int),
            Err(OgmError::LossyConversion { .. })
        ));
        assert_eq!(
            read(CypherValue::Int(i64::MAX), DomainType::Long).unwrap(),
            DomainValue::Long(i64::MAX)
        );
    }

    #[test]
    fn test_byte_as_single_byte_array() {
        assert_eq!(
            write(DomainValue::Byte(-1), DomainType::Byte).unwrap(),
            CypherValue::Bytes(vec![0xff])
        );
        assert_eq!(
            read(CypherValue::Bytes(vec![0xff]), DomainType::Byte).unwrap(),
            DomainValue::Byte(-1)
        );
        assert!(matches!(
            read(CypherValue::Bytes(vec![1, 2]), DomainType::Byte),
            Err(OgmError::LossyConversion { .. })
        ));
    }

    #[test]
    fn test_float_as_string() {
        assert_eq!(
            write(DomainValue::Float(1.5), DomainType::Float).unwrap(),
            CypherValue::String("1.5".to_string())
        );
        assert_eq!(
            read(CypherValue::String("1.5".to_string()), DomainType::Float).unwrap(),
            DomainValue::Float(1.5)
        );
        assert!(matches!(
            read(CypherValue::Float(1e300), DomainType::Float),
            Err(OgmError::LossyConversion { .. })
        ));
    }

    #[test]
    fn test_char() {
        assert_eq!(
            read(CypherValue::String("x".to_string()), DomainType::Char).unwrap(),
            DomainValue::Char('x')
        );
        assert!(read(CypherValue::String("xy".to_string()), DomainType::Char).is_err());
    }

    #[test]
    fn test_enum_by_name() {
        let ty = DomainType::enumeration("Color", ["RED", "GREEN"]);
        assert_eq!(
            write(DomainValue::Enum("RED".to_string()), ty.clone()).unwrap(),
            CypherValue::String("RED".to_string())
        );
        assert!(read(CypherValue::String("BLUE".to_string()), ty.clone()).is_err());
        assert!(read(CypherValue::Int(0), ty).is_err());
    }

    #[test]
    fn test_instant_formats() {
        let instant = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        let written = write(DomainValue::Instant(instant), DomainType::Instant).unwrap();
        assert_eq!(written, CypherValue::String("2020-01-02T03:04:05Z".to_string()));
        assert_eq!(
            read(written, DomainType::Instant).unwrap(),
            DomainValue::Instant(instant)
        );

        let custom = write_scalar(&DomainValue::Instant(instant), &DomainType::Instant, Some("%d.%m.%Y"))
            .unwrap()
            .unwrap();
        assert_eq!(custom, CypherValue::String("02.01.2020".to_string()));
        let midnight = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(
            read_scalar(&custom, &DomainType::Instant, Some("%d.%m.%Y"))
                .unwrap()
                .unwrap(),
            DomainValue::Instant(midnight)
        );
    }

    #[test]
    fn test_temporal_native() {
        let time = NaiveTime::from_hms_opt(10, 15, 0).unwrap();
        assert_eq!(
            write(DomainValue::Time(time), DomainType::Time).unwrap(),
            CypherValue::LocalTime(time)
        );
    }

    #[test]
    fn test_mismatch_is_conversion_error() {
        assert!(matches!(
            write(DomainValue::String("x".to_string()), DomainType::Bool),
            Err(OgmError::Conversion(_))
        ));
        assert!(write_scalar(&DomainValue::Null, &DomainType::list_of(DomainType::Int), None).is_none());
    }
}
