// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use anyhow::Result;

use commands::{
    command::{CommandDefinition, SubcommandDefinition},
    generate::GenerateCommandDefinition,
};

mod commands;
mod config;
mod logging_tracing;
mod util;

#[tokio::main]
async fn main() -> Result<()> {
    logging_tracing::init()?;

    let subcommand_definition = SubcommandDefinition::new(
        "odoo-openapi",
        "Generate an OpenAPI document from the models of an Odoo server",
        vec![Box::new(GenerateCommandDefinition {})],
    );

    let command = subcommand_definition
        .command()
        .version(env!("CARGO_PKG_VERSION"));

    let matches = command.get_matches();

    subcommand_definition.execute(&matches).await
}
