// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::Path;

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use clap::builder::PossibleValue;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

impl OutputFormat {
    /// The explicitly requested format, or the one implied by the output file's extension.
    pub fn for_output(explicit: Option<Self>, output: Option<&Path>) -> Self {
        explicit.unwrap_or_else(|| {
            match output
                .and_then(|path| path.extension())
                .and_then(|extension| extension.to_str())
            {
                Some(extension) if extension.eq_ignore_ascii_case("json") => OutputFormat::Json,
                _ => OutputFormat::Yaml,
            }
        })
    }

    pub fn render<T: Serialize>(self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => {
                serde_saphyr::to_string(value).map_err(|e| anyhow!("Failed to render YAML: {e}"))
            }
        }
    }
}

impl ValueEnum for OutputFormat {
    fn value_variants<'a>() -> &'a [Self] {
        &[OutputFormat::Yaml, OutputFormat::Json]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            OutputFormat::Yaml => PossibleValue::new("yaml").alias("yml"),
            OutputFormat::Json => PossibleValue::new("json"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openapi_introspection::OpenApiDocument;
    use openapi_introspection::openapi::JsonSchemaInline;

    fn document() -> OpenApiDocument {
        let mut doc = OpenApiDocument::new("Test API", "1.0.0");
        doc.add_schema(
            "res.partner",
            JsonSchemaInline::object()
                .with_property("name", JsonSchemaInline::string().into())
                .with_required(vec!["name".to_string()])
                .into(),
        );
        doc
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            OutputFormat::for_output(None, Some(Path::new("openapi.json"))),
            OutputFormat::Json
        );
        assert_eq!(
            OutputFormat::for_output(None, Some(Path::new("openapi.JSON"))),
            OutputFormat::Json
        );
        assert_eq!(
            OutputFormat::for_output(None, Some(Path::new("openapi.yaml"))),
            OutputFormat::Yaml
        );
        assert_eq!(OutputFormat::for_output(None, None), OutputFormat::Yaml);
    }

    #[test]
    fn explicit_format_wins() {
        assert_eq!(
            OutputFormat::for_output(Some(OutputFormat::Yaml), Some(Path::new("openapi.json"))),
            OutputFormat::Yaml
        );
    }

    #[test]
    fn json_rendering() {
        let rendered = OutputFormat::Json.render(&document()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(parsed, serde_json::to_value(document()).unwrap());
    }

    #[test]
    fn yaml_rendering() {
        let rendered = OutputFormat::Yaml.render(&document()).unwrap();
        let parsed: serde_json::Value = serde_saphyr::from_str(&rendered).unwrap();

        assert_eq!(parsed, serde_json::to_value(document()).unwrap());
    }
}
