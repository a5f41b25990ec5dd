// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! An in-memory [`RpcTransport`] answering from closures, for tests.

use std::sync::{Mutex, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{ExecuteCall, RawValue, RpcTransport, TransportError, UserId};

/// An `execute` call as observed by [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub identity: UserId,
    pub model: String,
    pub method: String,
    pub args: Vec<Value>,
    pub kwargs: Map<String, Value>,
}

type CallHandler = Box<dyn Fn(&RecordedCall) -> Result<RawValue, TransportError> + Send + Sync>;
type AuthenticationHandler = Box<dyn Fn() -> Result<RawValue, TransportError> + Send + Sync>;

pub struct ScriptedTransport {
    on_authenticate: AuthenticationHandler,
    on_execute: CallHandler,
    authentications: AtomicUsize,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    /// A transport that authenticates everyone as user 2 and answers `execute` with `handler`.
    pub fn new(
        handler: impl Fn(&RecordedCall) -> Result<RawValue, TransportError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            on_authenticate: Box::new(|| Ok(RawValue::Integer(2))),
            on_execute: Box::new(handler),
            authentications: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_authentication(
        mut self,
        handler: impl Fn() -> Result<RawValue, TransportError> + Send + Sync + 'static,
    ) -> Self {
        self.on_authenticate = Box::new(handler);
        self
    }

    pub fn authentication_count(&self) -> usize {
        self.authentications.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn call_count(&self, model: &str, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|call| call.model == model && call.method == method)
            .count()
    }
}

/// Build a transport-level fault, as the server reports errors.
pub fn fault(message: &str) -> TransportError {
    TransportError::Fault {
        code: 200,
        message: message.to_string(),
        data: None,
    }
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
    async fn authenticate(
        &self,
        _database: &str,
        _user: &str,
        _credential: &str,
        _options: Map<String, Value>,
    ) -> Result<RawValue, TransportError> {
        self.authentications.fetch_add(1, Ordering::SeqCst);
        // Give concurrent callers a chance to observe the in-flight attempt
        tokio::task::yield_now().await;
        (self.on_authenticate)()
    }

    async fn execute(&self, call: ExecuteCall<'_>) -> Result<RawValue, TransportError> {
        let recorded = RecordedCall {
            identity: call.identity,
            model: call.model.to_string(),
            method: call.method.to_string(),
            args: call.args,
            kwargs: call.kwargs,
        };
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(recorded.clone());
        tokio::task::yield_now().await;
        (self.on_execute)(&recorded)
    }
}
