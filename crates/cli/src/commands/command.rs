// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::util::OutputFormat;

#[async_trait]
pub trait CommandDefinition: Send + Sync {
    fn command(&self) -> Command;

    async fn execute(&self, matches: &ArgMatches) -> Result<()>;
}

pub struct SubcommandDefinition {
    pub name: &'static str,
    pub about: &'static str,
    pub command_definitions: Vec<Box<dyn CommandDefinition>>,
}

impl SubcommandDefinition {
    pub fn new(
        name: &'static str,
        about: &'static str,
        command_definitions: Vec<Box<dyn CommandDefinition>>,
    ) -> Self {
        Self {
            name,
            about,
            command_definitions,
        }
    }
}

#[async_trait]
impl CommandDefinition for SubcommandDefinition {
    fn command(&self) -> Command {
        Command::new(self.name)
            .about(self.about)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .disable_help_subcommand(true)
            .subcommands(
                self.command_definitions
                    .iter()
                    .map(|command_definition| command_definition.command()),
            )
    }

    async fn execute(&self, matches: &ArgMatches) -> Result<()> {
        let (name, sub_matches) = matches
            .subcommand()
            .ok_or_else(|| anyhow!("No subcommand given"))?;

        for command_definition in &self.command_definitions {
            if command_definition.command().get_name() == name {
                return command_definition.execute(sub_matches).await;
            }
        }

        Err(anyhow!("Unknown subcommand: {}", name))
    }
}

pub fn get<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, arg_id: &str) -> Option<T> {
    matches.get_one::<T>(arg_id).cloned()
}

pub fn get_many<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, arg_id: &str) -> Vec<T> {
    matches
        .get_many::<T>(arg_id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

pub fn url_arg() -> Arg {
    Arg::new("url")
        .help("The base URL of the Odoo server. If not specified, the program will attempt to read it from the environment (`ODOO_URL`).")
        .long("url")
        .required(false)
        .num_args(1)
}

pub fn database_arg() -> Arg {
    Arg::new("database")
        .help("The Odoo database to introspect. If not specified, the program will attempt to read it from the environment (`ODOO_DATABASE`).")
        .long("database")
        .short('d')
        .required(false)
        .num_args(1)
}

pub fn user_arg() -> Arg {
    Arg::new("user")
        .help("The login to authenticate with. If not specified, the program will attempt to read it from the environment (`ODOO_USER`).")
        .long("user")
        .short('u')
        .required(false)
        .num_args(1)
}

pub fn api_key_arg() -> Arg {
    Arg::new("api-key")
        .help("The API key (or password) of the user. If not specified, the program will attempt to read it from the environment (`ODOO_API_KEY`).")
        .long("api-key")
        .required(false)
        .num_args(1)
}

pub fn offset_arg() -> Arg {
    Arg::new("offset")
        .help("Number of models to skip during discovery")
        .long("offset")
        .required(false)
        .value_parser(clap::value_parser!(usize))
        .num_args(1)
}

pub fn limit_arg() -> Arg {
    Arg::new("limit")
        .help("Maximum number of models to discover")
        .long("limit")
        .required(false)
        .value_parser(clap::value_parser!(usize))
        .num_args(1)
}

pub fn model_arg() -> Arg {
    Arg::new("model")
        .help("Only include the given model (technical name, for example `res.partner`). May be repeated.")
        .long("model")
        .short('m')
        .required(false)
        .action(ArgAction::Append)
}

pub fn config_arg() -> Arg {
    Arg::new("config")
        .help("Path to the configuration file")
        .long_help("Path to the configuration file. Defaults to `odoo-openapi.toml` in the current directory, if present.")
        .long("config")
        .short('c')
        .required(false)
        .value_parser(clap::value_parser!(PathBuf))
        .num_args(1)
}

pub fn output_arg() -> Arg {
    Arg::new("output")
        .help("Output file path")
        .long_help("If specified, the output will be written to this file path instead of stdout.")
        .short('o')
        .long("output")
        .required(false)
        .value_parser(clap::value_parser!(PathBuf))
        .num_args(1)
}

pub fn format_arg() -> Arg {
    Arg::new("format")
        .help("Output format")
        .long_help("Output format. Defaults to JSON for a `.json` output file and YAML otherwise.")
        .long("format")
        .short('f')
        .required(false)
        .value_parser(clap::value_parser!(OutputFormat))
        .num_args(1)
}

pub fn api_version_arg() -> Arg {
    Arg::new("api-version")
        .help("The version recorded in the document's metadata")
        .long("api-version")
        .required(false)
        .default_value("1.0.0")
        .num_args(1)
}
