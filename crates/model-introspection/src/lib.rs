// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Introspection of an Odoo server's data model.
//!
//! The server describes its models with loosely-typed values. This crate turns them into a
//! strongly-typed model:
//! - [`decode`]: coercion of [`odoo_rpc::RawValue`]s into typed values, failing loudly
//! - [`FieldDescriptor`]: closed-world parsing of `fields_get` attribute maps
//! - [`Session`]: authentication, model discovery and cached field lookups

pub mod decode;
mod error;
mod field;
mod field_kind;
mod model;
mod session;

pub use decode::RecordId;
pub use error::{DecodeError, FieldParseError, IntrospectionError};
pub use field::{FieldDescriptor, FieldMap, parse_field_map};
pub use field_kind::FieldKind;
pub use model::{BusinessObjectType, DiscoveredModel};
pub use session::{Credentials, DiscoveryOptions, ModelSession, Session};
