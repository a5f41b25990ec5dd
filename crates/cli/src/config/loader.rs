// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::Path;

use anyhow::{Result, anyhow, bail};
use serde::Deserialize;
use tracing::debug;

use super::model::{Config, ConnectionConfig, DiscoveryConfig};

const DEFAULT_CONFIG_FILE: &str = "odoo-openapi.toml";

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigSer {
    pub connection: Option<ConnectionSer>,
    pub discovery: Option<DiscoverySer>,
}

/// Credentials are deliberately absent: the API key is never read from a file.
#[derive(Deserialize, Debug, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConnectionSer {
    pub url: Option<String>,
    pub database: Option<String>,
    pub user: Option<String>,
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct DiscoverySer {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    pub models: Option<Vec<String>>,
}

impl TryFrom<ConfigSer> for Config {
    type Error = anyhow::Error;

    fn try_from(config: ConfigSer) -> Result<Self, Self::Error> {
        Ok(Config {
            connection: config
                .connection
                .map(ConnectionConfig::try_from)
                .transpose()?
                .unwrap_or_default(),
            discovery: config
                .discovery
                .map(DiscoveryConfig::try_from)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

impl TryFrom<ConnectionSer> for ConnectionConfig {
    type Error = anyhow::Error;

    fn try_from(config: ConnectionSer) -> Result<Self, Self::Error> {
        if let Some(url) = &config.url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            bail!("Invalid connection.url '{url}': expected an http:// or https:// URL");
        }
        if config.timeout_secs == Some(0) {
            bail!("Invalid connection.timeout-secs: must be greater than 0");
        }

        Ok(ConnectionConfig {
            url: config.url,
            database: config.database,
            user: config.user,
            timeout_secs: config.timeout_secs,
        })
    }
}

impl TryFrom<DiscoverySer> for DiscoveryConfig {
    type Error = anyhow::Error;

    fn try_from(config: DiscoverySer) -> Result<Self, Self::Error> {
        if config.limit == Some(0) {
            bail!("Invalid discovery.limit: must be greater than 0");
        }

        Ok(DiscoveryConfig {
            offset: config.offset,
            limit: config.limit,
            models: config.models.unwrap_or_default(),
        })
    }
}

fn load_config_from_file(path: &Path) -> Result<Config> {
    let toml_str = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read file '{}': {}", path.display(), e))?;
    let config: ConfigSer = toml::from_str(&toml_str)
        .map_err(|e| anyhow!("Failed to parse TOML file '{}': {}", path.display(), e))?;

    config.try_into()
}

/// Load the configuration from `path`, or from `odoo-openapi.toml` if present.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = match path {
        Some(path) => path,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if !default_path.exists() {
                return Ok(Config::default());
            }
            default_path
        }
    };

    debug!(path = %config_path.display(), "Loading configuration");
    load_config_from_file(config_path)
}
