// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Conversion of introspected models to an OpenAPI document.

use model_introspection::{BusinessObjectType, FieldDescriptor};

use crate::openapi::{
    JsonSchema, JsonSchemaInline, JsonSchemaRef, OpenApiDocument, Operation, Parameter, PathItem,
    RequestBody, Response,
};
use crate::schema::field_schema;

const SUCCESS_STATUS: &str = "200";

pub fn document_title(database: &str) -> String {
    format!("Odoo REST API (db {database})")
}

/// Build a document with one component schema and CRUD paths per model, in the given order.
pub fn to_openapi(types: &[BusinessObjectType], title: &str, version: &str) -> OpenApiDocument {
    let mut doc = OpenApiDocument::new(title, version);

    for object_type in types {
        doc.add_schema(&object_type.name, convert_object_type(object_type));

        let (collection, item) = model_paths(&object_type.name);
        doc.add_path(collection, collection_path_item(object_type));
        doc.add_path(item, item_path_item(object_type));
    }

    doc
}

fn model_paths(name: &str) -> (String, String) {
    let collection = format!("/model/{name}");
    let item = format!("{collection}/{{id}}");
    (collection, item)
}

fn convert_object_type(object_type: &BusinessObjectType) -> JsonSchema {
    let schema = object_type
        .fields
        .values()
        .fold(JsonSchemaInline::object(), |schema, field| {
            schema.with_property(&field.name, convert_field(field))
        });

    schema
        .with_required(
            object_type
                .required_field_names()
                .map(str::to_string)
                .collect(),
        )
        .into()
}

fn convert_field(field: &FieldDescriptor) -> JsonSchema {
    let shape = field_schema(field);
    let mut schema = shape.to_schema().with_title(&field.label);

    if let Some(help) = &field.help {
        schema = schema.with_description(help);
    }
    if field.flags.read_only {
        schema = schema.with_read_only();
    }
    if shape.is_textual()
        && let Some(max) = field.max_size.and_then(|size| u64::try_from(size).ok())
        && max > 0
    {
        schema = schema.with_max_length(max);
    }

    schema.into()
}

fn component_ref(object_type: &BusinessObjectType) -> JsonSchema {
    JsonSchemaRef::component(&object_type.name).into()
}

fn id_parameter() -> Parameter {
    Parameter::path("id", JsonSchemaInline::integer().into()).with_description("Id of the record")
}

fn collection_path_item(object_type: &BusinessObjectType) -> PathItem {
    let BusinessObjectType { name, label, .. } = object_type;

    PathItem::default().with_post(
        Operation::new(format!("post_{name}"))
            .with_description(format!("Create a {label}"))
            .with_request_body(RequestBody::json(component_ref(object_type)))
            .with_response(
                SUCCESS_STATUS,
                Response::new(format!("The created {label}"))
                    .with_json(component_ref(object_type)),
            ),
    )
}

fn item_path_item(object_type: &BusinessObjectType) -> PathItem {
    let BusinessObjectType { name, label, .. } = object_type;

    PathItem::default()
        .with_get(
            Operation::new(format!("get_{name}"))
                .with_description(format!("Read a {label}"))
                .with_parameter(id_parameter())
                .with_response(
                    SUCCESS_STATUS,
                    Response::new(format!("The {label}")).with_json(component_ref(object_type)),
                ),
        )
        .with_put(
            Operation::new(format!("put_{name}"))
                .with_description(format!("Update a {label}"))
                .with_parameter(id_parameter())
                .with_request_body(RequestBody::json(component_ref(object_type)))
                .with_response(
                    SUCCESS_STATUS,
                    Response::new(format!("The updated {label}"))
                        .with_json(component_ref(object_type)),
                ),
        )
        .with_delete(
            Operation::new(format!("delete_{name}"))
                .with_description(format!("Delete a {label}"))
                .with_parameter(id_parameter())
                .with_response(SUCCESS_STATUS, Response::new(format!("{label} deleted"))),
        )
}
