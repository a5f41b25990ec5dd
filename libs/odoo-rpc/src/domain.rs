// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde_json::Value;

/// A search filter: conditions implicitly combined with "and".
///
/// Sent to the server in its nested-list form, e.g. `[["state", "=", "base"]]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domain {
    conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: String,
    pub value: Value,
}

impl Domain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        });
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn to_value(&self) -> Value {
        Value::Array(
            self.conditions
                .iter()
                .map(|condition| {
                    Value::Array(vec![
                        Value::String(condition.field.clone()),
                        Value::String(condition.operator.clone()),
                        condition.value.clone(),
                    ])
                })
                .collect(),
        )
    }
}
