// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use odoo_rpc::{RawValue, TransportError, ValueKind};
use thiserror::Error;

use crate::RecordId;

/// A raw value did not have the shape the caller asked for.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Expected {expected}, got {actual} ({context})")]
    UnexpectedKind {
        expected: ValueKind,
        actual: ValueKind,
        context: String,
    },

    #[error("Expected at most one element, got {len} ({context})")]
    MultipleElements { len: usize, context: String },

    #[error("Expected {expected} elements, got {actual} ({context})")]
    UnexpectedArity {
        expected: usize,
        actual: usize,
        context: String,
    },

    #[error("Invalid date-time '{value}' ({context})")]
    InvalidDateTime { value: String, context: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldParseError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Unhandled field attribute '{attribute}' with value {value:?}")]
    UnhandledAttribute { attribute: String, value: RawValue },

    #[error("Unhandled field type '{0}'")]
    UnknownFieldKind(String),

    #[error("Missing 'type' attribute")]
    MissingKind,

    #[error("Attribute '{attribute}' is inconsistent with the field: {reason}")]
    InconsistentAttribute {
        attribute: &'static str,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum IntrospectionError {
    #[error("Unable to authenticate user '{user}' on database '{database}'")]
    Authentication {
        database: String,
        user: String,
        #[source]
        source: TransportError,
    },

    #[error("Authentication rejected for user '{user}' on database '{database}'")]
    AuthenticationRejected { database: String, user: String },

    #[error("Unexpected authentication response")]
    AuthenticationResponse(#[source] DecodeError),

    #[error("Remote call '{operation}' on '{model}' failed")]
    RemoteCall {
        operation: &'static str,
        model: String,
        #[source]
        source: TransportError,
    },

    #[error("Unable to decode the '{operation}' response for '{model}'")]
    Response {
        operation: &'static str,
        model: String,
        #[source]
        source: DecodeError,
    },

    #[error("Unable to parse field '{field}' of '{model}'")]
    Field {
        model: String,
        field: String,
        #[source]
        source: FieldParseError,
    },

    #[error("Reading {model} #{id} returned {count} records")]
    UnexpectedRecordCount {
        model: String,
        id: RecordId,
        count: usize,
    },
}

/// Render an error followed by all its causes, `outer: inner: innermost`.
pub(crate) fn render_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
