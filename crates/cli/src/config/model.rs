// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

/// Settings read from `odoo-openapi.toml`. Everything is optional: flags and the environment
/// take precedence.
#[derive(Debug, PartialEq, Default)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub discovery: DiscoveryConfig,
}

#[derive(Debug, PartialEq, Default)]
pub struct ConnectionConfig {
    pub url: Option<String>,
    pub database: Option<String>,
    pub user: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, PartialEq, Default)]
pub struct DiscoveryConfig {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    pub models: Vec<String>,
}
