// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Resolution of settings from flags, the environment and the configuration file, in that order
//! of precedence.

use std::time::Duration;

use anyhow::{Result, anyhow};
use model_introspection::{Credentials, DiscoveryOptions};
use odoo_env::Environment;
use odoo_env::env_const::{ODOO_API_KEY, ODOO_DATABASE, ODOO_TIMEOUT_SECS, ODOO_URL, ODOO_USER};

use super::model::{ConnectionConfig, DiscoveryConfig};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection flags as given on the command line.
#[derive(Debug, Default)]
pub struct ConnectionArgs {
    pub url: Option<String>,
    pub database: Option<String>,
    pub user: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug)]
pub struct ConnectionSettings {
    pub url: String,
    pub timeout: Duration,
    pub credentials: Credentials,
}

impl ConnectionSettings {
    pub fn resolve(
        args: ConnectionArgs,
        env: &impl Environment,
        config: &ConnectionConfig,
    ) -> Result<Self> {
        let url = required("server URL", "--url", ODOO_URL, args.url, env, &config.url)?;
        let database = required(
            "database",
            "--database",
            ODOO_DATABASE,
            args.database,
            env,
            &config.database,
        )?;
        let user = required("user", "--user", ODOO_USER, args.user, env, &config.user)?;
        let api_key = required("API key", "--api-key", ODOO_API_KEY, args.api_key, env, &None)?;

        let timeout_secs = match env.get_parsed::<u64>(ODOO_TIMEOUT_SECS)? {
            Some(0) => return Err(anyhow!("{ODOO_TIMEOUT_SECS} must be greater than 0")),
            Some(secs) => secs,
            None => config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            url,
            timeout: Duration::from_secs(timeout_secs),
            credentials: Credentials {
                database,
                user,
                api_key,
            },
        })
    }
}

fn required(
    description: &str,
    flag: &str,
    env_key: &'static str,
    flag_value: Option<String>,
    env: &impl Environment,
    config_value: &Option<String>,
) -> Result<String> {
    flag_value
        .filter(|value| !value.trim().is_empty())
        .or_else(|| env.get_non_empty(env_key))
        .or_else(|| config_value.clone())
        .ok_or_else(|| anyhow!("Missing {description}: pass `{flag}` or set {env_key}"))
}

/// Discovery flags as given on the command line.
#[derive(Debug, Default)]
pub struct DiscoveryArgs {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    pub models: Vec<String>,
}

pub fn discovery_options(args: DiscoveryArgs, config: &DiscoveryConfig) -> Result<DiscoveryOptions> {
    let defaults = DiscoveryOptions::default();

    let limit = args.limit.or(config.limit).unwrap_or(defaults.limit);
    if limit == 0 {
        return Err(anyhow!("`--limit` must be greater than 0"));
    }

    let models = if args.models.is_empty() {
        &config.models
    } else {
        &args.models
    };

    Ok(DiscoveryOptions {
        offset: args.offset.or(config.offset).unwrap_or(defaults.offset),
        limit,
        ..defaults
    }
    .restricted_to(models))
}
