// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::constants::{
    COMMON_METHOD_AUTHENTICATE, COMMON_SERVICE, JSONRPC_PATH, OBJECT_METHOD_EXECUTE,
    OBJECT_SERVICE,
};
use crate::{ExecuteCall, RawValue, RpcTransport, TransportError};

/// [`RpcTransport`] over the server's JSON-RPC endpoint (`{url}/jsonrpc`).
pub struct JsonRpcTransport {
    client: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: ServiceCall<'a>,
    id: u64,
}

#[derive(Serialize)]
struct ServiceCall<'a> {
    service: &'a str,
    method: &'a str,
    args: Vec<Value>,
}

#[derive(Deserialize, Debug)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcFault>,
}

#[derive(Deserialize, Debug)]
struct JsonRpcFault {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl JsonRpcTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let endpoint = format!("{}{JSONRPC_PATH}", base_url.trim_end_matches('/'));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| TransportError::Http {
                url: endpoint.clone(),
                source,
            })?;

        Ok(Self {
            client,
            endpoint,
            next_id: AtomicU64::new(1),
        })
    }

    async fn call(
        &self,
        service: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<RawValue, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: "call",
            params: ServiceCall {
                service,
                method,
                args,
            },
            id,
        };

        debug!(id, service, method, endpoint = %self.endpoint, "Sending JSON-RPC request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|source| TransportError::Http {
                url: self.endpoint.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(TransportError::Status {
                url: self.endpoint.clone(),
                status: response.status().as_u16(),
            });
        }

        let response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))?;

        into_result(response)
    }
}

fn into_result(response: JsonRpcResponse) -> Result<RawValue, TransportError> {
    match response.error {
        Some(fault) => Err(TransportError::Fault {
            code: fault.code,
            message: fault.message,
            data: fault.data.map(|data| match data.get("debug") {
                Some(Value::String(debug)) => debug.clone(),
                _ => data.to_string(),
            }),
        }),
        None => Ok(response.result.map(RawValue::from).unwrap_or(RawValue::Null)),
    }
}

#[async_trait]
impl RpcTransport for JsonRpcTransport {
    async fn authenticate(
        &self,
        database: &str,
        user: &str,
        credential: &str,
        options: Map<String, Value>,
    ) -> Result<RawValue, TransportError> {
        self.call(
            COMMON_SERVICE,
            COMMON_METHOD_AUTHENTICATE,
            vec![
                Value::from(database),
                Value::from(user),
                Value::from(credential),
                Value::Object(options),
            ],
        )
        .await
    }

    async fn execute(&self, call: ExecuteCall<'_>) -> Result<RawValue, TransportError> {
        self.call(
            OBJECT_SERVICE,
            OBJECT_METHOD_EXECUTE,
            vec![
                Value::from(call.database),
                Value::from(call.identity.0),
                Value::from(call.credential),
                Value::from(call.model),
                Value::from(call.method),
                Value::Array(call.args),
                Value::Object(call.kwargs),
            ],
        )
        .await
    }
}
