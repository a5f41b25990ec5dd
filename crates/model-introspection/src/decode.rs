// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Coercion of [`RawValue`]s into typed values.
//!
//! Every function takes a human-readable `context` naming what is being decoded (for example
//! `"field 'name' attribute 'required'"`), which ends up in the [`DecodeError`] on mismatch.

use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use odoo_rpc::{RawValue, ValueKind};

use crate::DecodeError;

/// The id of a record, as used to reference it from other records.
///
/// Deliberately not interchangeable with plain integer values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(i64);

impl RecordId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RecordId> for serde_json::Value {
    fn from(id: RecordId) -> Self {
        serde_json::Value::from(id.0)
    }
}

fn unexpected(expected: ValueKind, value: &RawValue, context: &str) -> DecodeError {
    DecodeError::UnexpectedKind {
        expected,
        actual: value.kind(),
        context: context.to_string(),
    }
}

pub fn as_string<'a>(value: &'a RawValue, context: &str) -> Result<&'a str, DecodeError> {
    match value {
        RawValue::String(s) => Ok(s),
        _ => Err(unexpected(ValueKind::String, value, context)),
    }
}

pub fn as_integer(value: &RawValue, context: &str) -> Result<i64, DecodeError> {
    match value {
        RawValue::Integer(i) => Ok(*i),
        _ => Err(unexpected(ValueKind::Integer, value, context)),
    }
}

/// Decode a boolean the way the server spells it: `true`, a positive integer or the string
/// `"true"` (in any case) are true; `false`, zero, negative integers and any other string are
/// false.
pub fn as_boolean(value: &RawValue, context: &str) -> Result<bool, DecodeError> {
    match value {
        RawValue::Boolean(b) => Ok(*b),
        RawValue::Integer(i) => Ok(*i > 0),
        RawValue::String(s) => Ok(s.eq_ignore_ascii_case("true")),
        _ => Err(unexpected(ValueKind::Boolean, value, context)),
    }
}

pub fn as_array<'a>(value: &'a RawValue, context: &str) -> Result<&'a [RawValue], DecodeError> {
    match value {
        RawValue::Array(elements) => Ok(elements),
        _ => Err(unexpected(ValueKind::Array, value, context)),
    }
}

/// Decode an array that holds an optional single value: empty is `None`, one element is that
/// element, anything longer is an error.
pub fn as_single_element_array<'a>(
    value: &'a RawValue,
    context: &str,
) -> Result<Option<&'a RawValue>, DecodeError> {
    match as_array(value, context)? {
        [] => Ok(None),
        [element] => Ok(Some(element)),
        elements => Err(DecodeError::MultipleElements {
            len: elements.len(),
            context: context.to_string(),
        }),
    }
}

pub fn as_map<'a>(
    value: &'a RawValue,
    context: &str,
) -> Result<&'a [(RawValue, RawValue)], DecodeError> {
    match value {
        RawValue::Map(entries) => Ok(entries),
        _ => Err(unexpected(ValueKind::Map, value, context)),
    }
}

pub fn as_foreign_key(value: &RawValue, context: &str) -> Result<RecordId, DecodeError> {
    match value {
        RawValue::Integer(i) => Ok(RecordId(*i)),
        _ => Err(unexpected(ValueKind::Integer, value, context)),
    }
}

/// Decode a local date-time, either ISO-8601 (`2024-05-01T13:45:00`) or the server's own
/// format (`2024-05-01 13:45:00`).
pub fn as_date_time(value: &RawValue, context: &str) -> Result<NaiveDateTime, DecodeError> {
    let text = as_string(value, context)?;

    text.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
        .map_err(|_| DecodeError::InvalidDateTime {
            value: text.to_string(),
            context: context.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawValue {
        RawValue::from(value)
    }

    #[test]
    fn boolean_accepts_booleans() {
        assert!(as_boolean(&raw(json!(true)), "test").unwrap());
        assert!(!as_boolean(&raw(json!(false)), "test").unwrap());
    }

    #[test]
    fn boolean_accepts_integers() {
        assert!(as_boolean(&raw(json!(1)), "test").unwrap());
        assert!(as_boolean(&raw(json!(7)), "test").unwrap());
        assert!(!as_boolean(&raw(json!(0)), "test").unwrap());
        assert!(!as_boolean(&raw(json!(-1)), "test").unwrap());
    }

    #[test]
    fn boolean_accepts_strings() {
        assert!(as_boolean(&raw(json!("TRUE")), "test").unwrap());
        assert!(as_boolean(&raw(json!("true")), "test").unwrap());
        assert!(as_boolean(&raw(json!("True")), "test").unwrap());
        assert!(!as_boolean(&raw(json!("false")), "test").unwrap());
        assert!(!as_boolean(&raw(json!("yes")), "test").unwrap());
        assert!(!as_boolean(&raw(json!("")), "test").unwrap());
    }

    #[test]
    fn boolean_rejects_maps_and_arrays() {
        assert_eq!(
            as_boolean(&raw(json!({"a": true})), "field 'active' attribute 'required'"),
            Err(DecodeError::UnexpectedKind {
                expected: ValueKind::Boolean,
                actual: ValueKind::Map,
                context: "field 'active' attribute 'required'".to_string(),
            })
        );
        assert!(matches!(
            as_boolean(&raw(json!([true])), "test"),
            Err(DecodeError::UnexpectedKind {
                actual: ValueKind::Array,
                ..
            })
        ));
        assert!(as_boolean(&RawValue::Null, "test").is_err());
    }

    #[test]
    fn string_and_integer_require_exact_kind() {
        assert_eq!(as_string(&raw(json!("abc")), "test"), Ok("abc"));
        assert_eq!(as_integer(&raw(json!(12)), "test"), Ok(12));

        assert!(as_string(&raw(json!(12)), "test").is_err());
        assert!(as_integer(&raw(json!("12")), "test").is_err());
        assert!(as_integer(&raw(json!(1.5)), "test").is_err());
    }

    #[test]
    fn single_element_array() {
        assert_eq!(as_single_element_array(&raw(json!([])), "test"), Ok(None));
        assert_eq!(
            as_single_element_array(&raw(json!([5])), "test"),
            Ok(Some(&RawValue::Integer(5)))
        );
        assert_eq!(
            as_single_element_array(&raw(json!([5, 6])), "ids"),
            Err(DecodeError::MultipleElements {
                len: 2,
                context: "ids".to_string()
            })
        );
        assert!(as_single_element_array(&raw(json!(5)), "test").is_err());
    }

    #[test]
    fn array_is_returned_untyped() {
        let value = raw(json!([1, "two", null]));
        let elements = as_array(&value, "test").unwrap();

        assert_eq!(
            elements,
            &[RawValue::Integer(1), RawValue::from("two"), RawValue::Null]
        );
    }

    #[test]
    fn map_requires_map() {
        let value = raw(json!({"type": "char"}));
        assert_eq!(as_map(&value, "test").unwrap().len(), 1);
        assert!(as_map(&raw(json!(["type", "char"])), "test").is_err());
    }

    #[test]
    fn foreign_key_wraps_integers() {
        assert_eq!(
            as_foreign_key(&raw(json!(42)), "test"),
            Ok(RecordId::new(42))
        );
        assert!(as_foreign_key(&raw(json!("42")), "test").is_err());
        assert!(as_foreign_key(&raw(json!(false)), "test").is_err());
    }

    #[test]
    fn date_time_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(13, 45, 0)
            .unwrap();

        assert_eq!(
            as_date_time(&raw(json!("2024-05-01T13:45:00")), "test"),
            Ok(expected)
        );
        assert_eq!(
            as_date_time(&raw(json!("2024-05-01 13:45:00")), "test"),
            Ok(expected)
        );
        assert!(matches!(
            as_date_time(&raw(json!("yesterday")), "test"),
            Err(DecodeError::InvalidDateTime { .. })
        ));
        assert!(as_date_time(&raw(json!(20240501)), "test").is_err());
    }
}
