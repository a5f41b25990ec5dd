// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! # Tracing configuration setup.
//!
//! Calling the `init` function will initialize a global tracing subscriber based on the values of
//! the `ODOO_OPENAPI_LOG` environment variable which follows the same conventions as `RUST_LOG`.
//! Logs go to stderr, since stdout may carry the generated document.

use odoo_env::env_const::ODOO_OPENAPI_LOG;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*};

pub fn init() -> Result<(), tracing_subscriber::util::TryInitError> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .compact();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(ODOO_OPENAPI_LOG)
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
}
