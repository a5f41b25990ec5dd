// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{Display, Formatter};

use serde_json::Value;

/// An untyped value as received from the server, before any decoding.
///
/// The server is not consistent about representations (a boolean may arrive as `true`, `1` or
/// `"True"`), so nothing here is interpreted: decoding into typed values is the caller's job.
/// Maps keep the order in which the server sent their entries.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<RawValue>),
    Map(Vec<(RawValue, RawValue)>),
}

/// The shape of a [`RawValue`], used to report decoding mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Array,
    Map,
}

impl RawValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            RawValue::Null => ValueKind::Null,
            RawValue::Boolean(_) => ValueKind::Boolean,
            RawValue::Integer(_) => ValueKind::Integer,
            RawValue::Float(_) => ValueKind::Float,
            RawValue::String(_) => ValueKind::String,
            RawValue::Array(_) => ValueKind::Array,
            RawValue::Map(_) => ValueKind::Map,
        }
    }

    /// Look up the entry of a map whose key is the string `key`.
    ///
    /// Returns `None` for non-map values and for maps without such an entry.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        match self {
            RawValue::Map(entries) => entries.iter().find_map(|(k, v)| match k {
                RawValue::String(k) if k == key => Some(v),
                _ => None,
            }),
            _ => None,
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Map => "map",
        };
        write!(f, "{name}")
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Bool(b) => RawValue::Boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => RawValue::Integer(i),
                // u64 beyond i64::MAX and real numbers
                None => RawValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => RawValue::String(s),
            Value::Array(elements) => {
                RawValue::Array(elements.into_iter().map(RawValue::from).collect())
            }
            Value::Object(entries) => RawValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (RawValue::String(k), RawValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::String(value.to_string())
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Boolean(value)
    }
}
