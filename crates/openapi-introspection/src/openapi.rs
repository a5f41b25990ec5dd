// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! OpenAPI specification types.
//!
//! The subset of OpenAPI 3.0.3 needed to describe CRUD endpoints over component schemas.
//! See: https://spec.openapis.org/oas/v3.0.3

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const OPENAPI_VERSION: &str = "3.0.3";
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// The root OpenAPI document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: InfoObject,
    pub paths: IndexMap<String, PathItem>,
    pub components: Components,
}

impl OpenApiDocument {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            openapi: OPENAPI_VERSION.to_string(),
            info: InfoObject {
                title: title.into(),
                version: version.into(),
            },
            paths: IndexMap::new(),
            components: Components::default(),
        }
    }

    /// Add a path. A path added twice keeps the later item.
    pub fn add_path(&mut self, path: impl Into<String>, item: PathItem) {
        self.paths.insert(path.into(), item);
    }

    pub fn add_schema(&mut self, name: impl Into<String>, schema: JsonSchema) {
        self.components.schemas.insert(name.into(), schema);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InfoObject {
    pub title: String,
    /// The version of the API (not the OpenAPI spec version)
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Components {
    pub schemas: IndexMap<String, JsonSchema>,
}

/// Operations available on one path, keyed by HTTP method.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
}

impl PathItem {
    pub fn with_get(mut self, operation: Operation) -> Self {
        self.get = Some(operation);
        self
    }

    pub fn with_put(mut self, operation: Operation) -> Self {
        self.put = Some(operation);
        self
    }

    pub fn with_post(mut self, operation: Operation) -> Self {
        self.post = Some(operation);
        self
    }

    pub fn with_delete(mut self, operation: Operation) -> Self {
        self.delete = Some(operation);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    pub responses: IndexMap<String, Response>,
}

impl Operation {
    pub fn new(operation_id: impl Into<String>) -> Self {
        Self {
            operation_id: operation_id.into(),
            description: None,
            parameters: Vec::new(),
            request_body: None,
            responses: IndexMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_request_body(mut self, body: RequestBody) -> Self {
        self.request_body = Some(body);
        self
    }

    pub fn with_response(mut self, status: impl Into<String>, response: Response) -> Self {
        self.responses.insert(status.into(), response);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    pub schema: JsonSchema,
}

impl Parameter {
    /// A path parameter; path parameters are always required.
    pub fn path(name: impl Into<String>, schema: JsonSchema) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Path,
            description: None,
            required: true,
            schema,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestBody {
    pub required: bool,
    pub content: IndexMap<String, MediaType>,
}

impl RequestBody {
    pub fn json(schema: JsonSchema) -> Self {
        Self {
            required: true,
            content: IndexMap::from([(JSON_MEDIA_TYPE.to_string(), MediaType { schema })]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Response {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaType>>,
}

impl Response {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            content: None,
        }
    }

    pub fn with_json(mut self, schema: JsonSchema) -> Self {
        self.content
            .get_or_insert_with(IndexMap::new)
            .insert(JSON_MEDIA_TYPE.to_string(), MediaType { schema });
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaType {
    pub schema: JsonSchema,
}

/// A schema object: either a reference or an inline definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
#[allow(clippy::large_enum_variant)]
pub enum JsonSchema {
    Ref(JsonSchemaRef),
    Inline(JsonSchemaInline),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonSchemaRef {
    #[serde(rename = "$ref")]
    pub ref_path: String,
}

impl JsonSchemaRef {
    /// Create a reference to a schema in the components section
    pub fn component(name: impl AsRef<str>) -> Self {
        Self {
            ref_path: format!("#/components/schemas/{}", name.as_ref()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JsonSchemaInline {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, JsonSchema>>,

    /// Omitted when empty: OpenAPI 3.0 requires a non-empty list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
}

impl JsonSchemaInline {
    pub fn new(schema_type: impl Into<String>) -> Self {
        Self {
            schema_type: Some(schema_type.into()),
            ..Default::default()
        }
    }

    pub fn integer() -> Self {
        Self::new("integer")
    }

    pub fn number() -> Self {
        Self::new("number")
    }

    pub fn string() -> Self {
        Self::new("string")
    }

    pub fn boolean() -> Self {
        Self::new("boolean")
    }

    pub fn array(items: JsonSchema) -> Self {
        Self {
            schema_type: Some("array".to_string()),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    /// An object with no properties yet.
    pub fn object() -> Self {
        Self {
            schema_type: Some("object".to_string()),
            properties: Some(IndexMap::new()),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_enum_values(mut self, values: Vec<String>) -> Self {
        self.enum_values = (!values.is_empty()).then_some(values);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, schema: JsonSchema) -> Self {
        self.properties
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), schema);
        self
    }

    pub fn with_required(mut self, required: Vec<String>) -> Self {
        self.required = (!required.is_empty()).then_some(required);
        self
    }

    pub fn with_read_only(mut self) -> Self {
        self.read_only = Some(true);
        self
    }

    pub fn with_max_length(mut self, max: u64) -> Self {
        self.max_length = Some(max);
        self
    }
}

impl From<JsonSchemaInline> for JsonSchema {
    fn from(inline: JsonSchemaInline) -> Self {
        JsonSchema::Inline(inline)
    }
}

impl From<JsonSchemaRef> for JsonSchema {
    fn from(ref_schema: JsonSchemaRef) -> Self {
        JsonSchema::Ref(ref_schema)
    }
}
