// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server at {url} returned HTTP status {status}")]
    Status { url: String, status: u16 },

    #[error("Remote fault {code}: {message}")]
    Fault {
        code: i64,
        message: String,
        /// Server-side details (exception name, traceback) when the server provides them
        data: Option<String>,
    },

    #[error("Malformed JSON-RPC response: {0}")]
    MalformedResponse(String),
}
