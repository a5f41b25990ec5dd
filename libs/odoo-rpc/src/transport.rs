// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{RawValue, TransportError};

/// The identity returned by a successful authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A method invocation on a model, as sent to the object execution endpoint.
#[derive(Debug, Clone)]
pub struct ExecuteCall<'a> {
    pub database: &'a str,
    pub identity: UserId,
    pub credential: &'a str,
    pub model: &'a str,
    pub method: &'a str,
    pub args: Vec<Value>,
    pub kwargs: Map<String, Value>,
}

/// The call-and-response primitive the introspection layer is built upon.
///
/// Implementations own connection handling, request encoding and any retry policy; callers
/// assume every call either returns the server's answer or fails.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Call `authenticate` on the common endpoint.
    async fn authenticate(
        &self,
        database: &str,
        user: &str,
        credential: &str,
        options: Map<String, Value>,
    ) -> Result<RawValue, TransportError>;

    /// Call `execute_kw` on the object endpoint.
    async fn execute(&self, call: ExecuteCall<'_>) -> Result<RawValue, TransportError>;
}
