// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! OpenAPI generation from introspected Odoo models.
//!
//! This crate provides:
//! - OpenAPI document types ([`openapi`])
//! - The schema shape of each kind of field ([`schema`])
//! - Conversion of models to a document with CRUD paths ([`conversion`])
//!
//! No remote calls are made here: the input is already-introspected metadata.

pub mod conversion;
pub mod openapi;
pub mod schema;

pub use conversion::{document_title, to_openapi};
pub use openapi::OpenApiDocument;
pub use schema::{FieldSchema, ScalarKind, field_schema};
