// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use crate::{FieldMap, RecordId};

/// A model exposed by the server, with its fields.
///
/// `fields` is empty when the server's field list could not be obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessObjectType {
    /// Technical name (`res.partner`).
    pub name: String,
    /// Human-readable name (`Contact`).
    pub label: String,
    pub fields: Arc<FieldMap>,
}

impl BusinessObjectType {
    /// Names of the required fields, in field order.
    pub fn required_field_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .values()
            .filter(|field| field.flags.required)
            .map(|field| field.name.as_str())
    }
}

/// An `ir.model` record returned by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredModel {
    pub id: RecordId,
    pub name: String,
    pub label: String,
}
