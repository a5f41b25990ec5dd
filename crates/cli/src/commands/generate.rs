// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::{ArgMatches, Command};
use model_introspection::Session;
use odoo_env::SystemEnvironment;
use odoo_rpc::JsonRpcTransport;
use openapi_introspection::{document_title, to_openapi};
use tracing::info;

use crate::commands::command::{
    CommandDefinition, api_key_arg, api_version_arg, config_arg, database_arg, format_arg, get,
    get_many, limit_arg, model_arg, offset_arg, output_arg, url_arg, user_arg,
};
use crate::config::{
    ConnectionArgs, ConnectionSettings, DiscoveryArgs, discovery_options, load_config,
};
use crate::util::{OutputFormat, write_output};

pub(crate) struct GenerateCommandDefinition {}

#[async_trait]
impl CommandDefinition for GenerateCommandDefinition {
    fn command(&self) -> Command {
        Command::new("generate")
            .about("Introspect the server's models and write an OpenAPI document")
            .arg(url_arg())
            .arg(database_arg())
            .arg(user_arg())
            .arg(api_key_arg())
            .arg(offset_arg())
            .arg(limit_arg())
            .arg(model_arg())
            .arg(config_arg())
            .arg(output_arg())
            .arg(format_arg())
            .arg(api_version_arg())
    }

    /// Generate the document, writing it only once it is complete
    async fn execute(&self, matches: &ArgMatches) -> Result<()> {
        let config_path: Option<PathBuf> = get(matches, "config");
        let output: Option<PathBuf> = get(matches, "output");
        let format = OutputFormat::for_output(get(matches, "format"), output.as_deref());
        let api_version: String = get(matches, "api-version").unwrap_or_else(|| "1.0.0".into());

        let config = load_config(config_path.as_deref())?;

        let connection = ConnectionSettings::resolve(
            ConnectionArgs {
                url: get(matches, "url"),
                database: get(matches, "database"),
                user: get(matches, "user"),
                api_key: get(matches, "api-key"),
            },
            &SystemEnvironment,
            &config.connection,
        )?;
        let options = discovery_options(
            DiscoveryArgs {
                offset: get(matches, "offset"),
                limit: get(matches, "limit"),
                models: get_many(matches, "model"),
            },
            &config.discovery,
        )?;

        info!(url = %connection.url, database = %connection.credentials.database, "Connecting");

        let transport = JsonRpcTransport::new(&connection.url, connection.timeout)?;
        let session = Session::new(Arc::new(transport), connection.credentials);

        let types = session.introspect(&options).await?;
        let doc = to_openapi(&types, &document_title(session.database()), &api_version);
        let rendered = format.render(&doc)?;

        write_output(output.as_deref(), &rendered)?;

        if let Some(output) = &output {
            eprintln!(
                "OpenAPI document for {} models written to `{}`",
                types.len(),
                output.display()
            );
        }

        Ok(())
    }
}
