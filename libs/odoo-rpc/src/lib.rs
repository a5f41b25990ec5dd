// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Remote procedure call plumbing for talking to an Odoo server.
//!
//! This crate provides:
//! - [`RawValue`], the untyped value model of everything the server returns
//! - [`RpcTransport`], the call-and-response boundary used by the introspection layer
//! - [`JsonRpcTransport`], an implementation over the server's JSON-RPC endpoint
//! - [`Domain`], the search-filter expression understood by the server

pub mod constants;
mod domain;
mod error;
mod json_rpc;
mod raw_value;
mod transport;

#[cfg(any(feature = "test-support", test))]
pub mod test_support;

pub use domain::{Condition, Domain};
pub use error::TransportError;
pub use json_rpc::JsonRpcTransport;
pub use raw_value::{RawValue, ValueKind};
pub use transport::{ExecuteCall, RpcTransport, UserId};
