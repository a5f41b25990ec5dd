// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! How each kind of field is represented in a schema.

use model_introspection::{FieldDescriptor, FieldKind};

use crate::openapi::JsonSchemaInline;

/// The primitive shape of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    DateTime,
    Date,
    Boolean,
    Number,
    Integer,
    String,
    Binary,
}

impl ScalarKind {
    pub fn to_schema(self) -> JsonSchemaInline {
        match self {
            ScalarKind::DateTime => JsonSchemaInline::string().with_format("date-time"),
            ScalarKind::Date => JsonSchemaInline::string().with_format("date"),
            ScalarKind::Boolean => JsonSchemaInline::boolean(),
            ScalarKind::Number => JsonSchemaInline::number(),
            ScalarKind::Integer => JsonSchemaInline::integer(),
            ScalarKind::String => JsonSchemaInline::string(),
            ScalarKind::Binary => JsonSchemaInline::string().with_format("binary"),
        }
    }
}

/// The schema shape of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSchema {
    Scalar(ScalarKind),
    /// A string restricted to the given values.
    Enum { values: Vec<String> },
    /// Ids of related records. Only the read shape is modeled, not the write commands.
    Array { items: ScalarKind },
}

impl FieldSchema {
    /// Whether a maximum length applies to values of this shape.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            FieldSchema::Scalar(ScalarKind::String) | FieldSchema::Enum { .. }
        )
    }

    pub fn to_schema(&self) -> JsonSchemaInline {
        match self {
            FieldSchema::Scalar(scalar) => scalar.to_schema(),
            FieldSchema::Enum { values } => JsonSchemaInline::string().with_enum_values(values.clone()),
            FieldSchema::Array { items } => JsonSchemaInline::array(items.to_schema().into()),
        }
    }
}

pub fn field_schema(field: &FieldDescriptor) -> FieldSchema {
    match field.kind {
        FieldKind::DateTime => FieldSchema::Scalar(ScalarKind::DateTime),
        FieldKind::Date => FieldSchema::Scalar(ScalarKind::Date),
        FieldKind::Boolean => FieldSchema::Scalar(ScalarKind::Boolean),
        FieldKind::Monetary | FieldKind::Float => FieldSchema::Scalar(ScalarKind::Number),
        FieldKind::Integer | FieldKind::ManyToOne => FieldSchema::Scalar(ScalarKind::Integer),
        FieldKind::Selection => match &field.selection_values {
            Some(values) if !values.is_empty() => FieldSchema::Enum {
                values: values.clone(),
            },
            // Dynamic selections report no values
            _ => FieldSchema::Scalar(ScalarKind::String),
        },
        FieldKind::ShortText
        | FieldKind::LongText
        | FieldKind::Html
        | FieldKind::Reference
        | FieldKind::ManyToOneReference => FieldSchema::Scalar(ScalarKind::String),
        FieldKind::Binary => FieldSchema::Scalar(ScalarKind::Binary),
        FieldKind::ManyToMany | FieldKind::OneToMany => FieldSchema::Array {
            items: ScalarKind::Integer,
        },
    }
}
