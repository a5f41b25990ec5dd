// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use indexmap::IndexMap;
use odoo_rpc::RawValue;

use crate::decode::{as_array, as_boolean, as_integer, as_map, as_string};
use crate::{DecodeError, FieldKind, FieldParseError, IntrospectionError};

/// Fields of a model, in the order the server listed them.
pub type FieldMap = IndexMap<String, FieldDescriptor>;

/// Attributes the server reports that have no bearing on the schema.
const IGNORED_ATTRIBUTES: &[&str] = &[
    "domain",
    "related",
    "digits",
    "exportable",
    "deprecated",
    "selectable",
    "strip_classes",
    "strip_style",
    "sanitize_attributes",
    "sanitize_style",
    "sanitize",
    "sanitize_tags",
    "states",
    "reference",
    "many2one_reference",
    "context",
];

/// Normalized metadata of one field of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub flags: FieldFlags,
    /// Target model, only for relational kinds.
    pub related_model: Option<String>,
    /// Inverse field on the target model, only for one2many.
    pub related_field: Option<String>,
    /// Allowed values, in server order, only for selection.
    pub selection_values: Option<Vec<String>>,
    pub help: Option<String>,
    pub group_operator: Option<String>,
    pub groups: Option<String>,
    pub currency_field: Option<String>,
    pub max_size: Option<i64>,
    pub depends: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFlags {
    pub required: bool,
    pub read_only: bool,
    pub stored: bool,
    pub searchable: bool,
    pub sortable: bool,
    pub translatable: bool,
    pub manual: bool,
    pub company_dependent: bool,
    pub change_default: bool,
    pub trim: bool,
    pub attachment: bool,
}

impl FieldFlags {
    fn slot(&mut self, attribute: &str) -> Option<&mut bool> {
        let slot = match attribute {
            "required" => &mut self.required,
            "readonly" => &mut self.read_only,
            "store" => &mut self.stored,
            "searchable" => &mut self.searchable,
            "sortable" => &mut self.sortable,
            "translate" => &mut self.translatable,
            "manual" => &mut self.manual,
            "company_dependent" => &mut self.company_dependent,
            "change_default" => &mut self.change_default,
            "trim" => &mut self.trim,
            "attachment" => &mut self.attachment,
            _ => return None,
        };
        Some(slot)
    }
}

impl FieldDescriptor {
    /// Parse the attribute map `fields_get` returned for the field `name`.
    ///
    /// Every attribute must be known: either mapped onto the descriptor or explicitly ignored.
    /// Anything else rejects the whole field.
    pub fn parse(name: &str, attributes: &RawValue) -> Result<Self, FieldParseError> {
        let entries = as_map(attributes, &format!("attributes of field '{name}'"))?;

        let mut kind = None;
        let mut label = None;
        let mut flags = FieldFlags::default();
        let mut related_model = None;
        let mut related_field = None;
        let mut selection_values = None;
        let mut help = None;
        let mut group_operator = None;
        let mut groups = None;
        let mut currency_field = None;
        let mut max_size = None;
        let mut depends = Vec::new();

        for (key, value) in entries {
            let attribute = as_string(key, &format!("attribute name of field '{name}'"))?;
            let context = format!("field '{name}' attribute '{attribute}'");

            if let Some(slot) = flags.slot(attribute) {
                *slot = as_boolean(value, &context)?;
                continue;
            }

            match attribute {
                "type" => {
                    let type_name = as_string(value, &context)?;
                    kind = Some(
                        FieldKind::from_type_name(type_name)
                            .ok_or_else(|| FieldParseError::UnknownFieldKind(type_name.into()))?,
                    );
                }
                "string" => label = Some(as_string(value, &context)?.to_string()),
                "name" => {
                    let reported = as_string(value, &context)?;
                    if reported != name {
                        return Err(FieldParseError::InconsistentAttribute {
                            attribute: "name",
                            reason: format!("reported as '{reported}'"),
                        });
                    }
                }
                "relation" => related_model = Some(as_string(value, &context)?.to_string()),
                "relation_field" => related_field = Some(as_string(value, &context)?.to_string()),
                "selection" => selection_values = Some(parse_selection(value, &context)?),
                "help" => help = Some(as_string(value, &context)?.to_string()),
                "group_operator" => group_operator = Some(as_string(value, &context)?.to_string()),
                "groups" => groups = Some(as_string(value, &context)?.to_string()),
                "currency_field" => currency_field = Some(as_string(value, &context)?.to_string()),
                "size" => max_size = Some(as_integer(value, &context)?),
                "depends" => {
                    depends = as_array(value, &context)?
                        .iter()
                        .map(|dependency| as_string(dependency, &context).map(str::to_string))
                        .collect::<Result<Vec<_>, _>>()?;
                }
                _ if IGNORED_ATTRIBUTES.contains(&attribute) => {}
                _ => {
                    return Err(FieldParseError::UnhandledAttribute {
                        attribute: attribute.to_string(),
                        value: value.clone(),
                    });
                }
            }
        }

        let kind = kind.ok_or(FieldParseError::MissingKind)?;

        // A reference field reports the models it may point to as a selection; those are not
        // values of the field itself.
        let selection_values = match kind {
            FieldKind::Selection => selection_values,
            FieldKind::Reference => None,
            _ if selection_values.is_some() => {
                return Err(FieldParseError::InconsistentAttribute {
                    attribute: "selection",
                    reason: format!("not allowed for a '{kind}' field"),
                });
            }
            _ => None,
        };
        if related_model.is_some() && !kind.is_relational() {
            return Err(FieldParseError::InconsistentAttribute {
                attribute: "relation",
                reason: format!("not allowed for a '{kind}' field"),
            });
        }
        if related_field.is_some() && kind != FieldKind::OneToMany {
            return Err(FieldParseError::InconsistentAttribute {
                attribute: "relation_field",
                reason: format!("not allowed for a '{kind}' field"),
            });
        }

        Ok(Self {
            name: name.to_string(),
            label: label.unwrap_or_else(|| name.to_string()),
            kind,
            flags,
            related_model,
            related_field,
            selection_values,
            help,
            group_operator,
            groups,
            currency_field,
            max_size,
            depends,
        })
    }
}

/// Selections are `[value, label]` pairs; only the values are kept. Integer values are stringified.
fn parse_selection(value: &RawValue, context: &str) -> Result<Vec<String>, DecodeError> {
    as_array(value, context)?
        .iter()
        .map(|pair| match as_array(pair, context)? {
            [RawValue::Integer(key), _label] => Ok(key.to_string()),
            [key, _label] => as_string(key, context).map(str::to_string),
            elements => Err(DecodeError::UnexpectedArity {
                expected: 2,
                actual: elements.len(),
                context: context.to_string(),
            }),
        })
        .collect()
}

/// Parse a whole `fields_get` response for `model`.
pub fn parse_field_map(model: &str, response: &RawValue) -> Result<FieldMap, IntrospectionError> {
    let entries = as_map(response, "fields_get response").map_err(|source| {
        IntrospectionError::Response {
            operation: odoo_rpc::constants::METHOD_FIELDS_GET,
            model: model.to_string(),
            source,
        }
    })?;

    entries
        .iter()
        .map(|(key, attributes)| {
            let name = as_string(key, "field name").map_err(|source| {
                IntrospectionError::Response {
                    operation: odoo_rpc::constants::METHOD_FIELDS_GET,
                    model: model.to_string(),
                    source,
                }
            })?;

            let descriptor = FieldDescriptor::parse(name, attributes).map_err(|source| {
                IntrospectionError::Field {
                    model: model.to_string(),
                    field: name.to_string(),
                    source,
                }
            })?;

            Ok((name.to_string(), descriptor))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use odoo_rpc::ValueKind;
    use serde_json::json;

    fn parse(name: &str, attributes: serde_json::Value) -> Result<FieldDescriptor, FieldParseError> {
        FieldDescriptor::parse(name, &RawValue::from(attributes))
    }

    #[test]
    fn selection_field() {
        let descriptor = parse(
            "state",
            json!({
                "type": "selection",
                "string": "Status",
                "selection": [["draft", "Draft"], ["done", "Done"]],
                "required": true,
            }),
        )
        .unwrap();

        assert_eq!(descriptor.kind, FieldKind::Selection);
        assert_eq!(descriptor.label, "Status");
        assert_eq!(
            descriptor.selection_values,
            Some(vec!["draft".to_string(), "done".to_string()])
        );
        assert!(descriptor.flags.required);
        assert_eq!(descriptor.related_model, None);
    }

    #[test]
    fn integer_selection_values_are_stringified() {
        let descriptor = parse(
            "priority",
            json!({"type": "selection", "selection": [[0, "Low"], [1, "High"]]}),
        )
        .unwrap();

        assert_eq!(
            descriptor.selection_values,
            Some(vec!["0".to_string(), "1".to_string()])
        );
    }

    #[test]
    fn selection_pairs_must_have_two_elements() {
        let error = parse(
            "state",
            json!({"type": "selection", "selection": [["draft", "Draft", "extra"]]}),
        )
        .unwrap_err();

        assert!(matches!(
            error,
            FieldParseError::Decode(DecodeError::UnexpectedArity {
                expected: 2,
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn relational_field() {
        let descriptor = parse(
            "child_ids",
            json!({
                "type": "one2many",
                "string": "Contact",
                "relation": "res.partner",
                "relation_field": "parent_id",
                "readonly": 0,
                "store": "True",
                "sortable": false,
                "depends": [],
                "domain": [["active", "=", true]],
                "context": {"active_test": false},
            }),
        )
        .unwrap();

        assert_eq!(descriptor.kind, FieldKind::OneToMany);
        assert_eq!(descriptor.related_model.as_deref(), Some("res.partner"));
        assert_eq!(descriptor.related_field.as_deref(), Some("parent_id"));
        assert!(!descriptor.flags.read_only);
        assert!(descriptor.flags.stored);
        assert!(!descriptor.flags.sortable);
    }

    #[test]
    fn optional_attributes() {
        let descriptor = parse(
            "name",
            json!({
                "name": "name",
                "type": "char",
                "help": "Full name",
                "size": 64,
                "translate": true,
                "trim": true,
                "groups": "base.group_user",
                "depends": ["first_name", "last_name"],
            }),
        )
        .unwrap();

        assert_eq!(descriptor.label, "name");
        assert_eq!(descriptor.help.as_deref(), Some("Full name"));
        assert_eq!(descriptor.max_size, Some(64));
        assert_eq!(descriptor.groups.as_deref(), Some("base.group_user"));
        assert_eq!(descriptor.depends, vec!["first_name", "last_name"]);
        assert!(descriptor.flags.translatable);
        assert!(descriptor.flags.trim);
    }

    #[test]
    fn unknown_attribute_is_rejected() {
        let error = parse(
            "name",
            json!({"type": "char", "totally_new_flag": true}),
        )
        .unwrap_err();

        assert_eq!(
            error,
            FieldParseError::UnhandledAttribute {
                attribute: "totally_new_flag".to_string(),
                value: RawValue::Boolean(true),
            }
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let error = parse("props", json!({"type": "properties"})).unwrap_err();
        assert_eq!(
            error,
            FieldParseError::UnknownFieldKind("properties".to_string())
        );
    }

    #[test]
    fn missing_kind_is_rejected() {
        let error = parse("name", json!({"string": "Name"})).unwrap_err();
        assert_eq!(error, FieldParseError::MissingKind);
    }

    #[test]
    fn mistyped_attribute_is_rejected() {
        let error = parse("name", json!({"type": "char", "required": {"a": 1}})).unwrap_err();

        assert_eq!(
            error,
            FieldParseError::Decode(DecodeError::UnexpectedKind {
                expected: ValueKind::Boolean,
                actual: ValueKind::Map,
                context: "field 'name' attribute 'required'".to_string(),
            })
        );
    }

    #[test]
    fn attributes_must_match_the_kind() {
        assert!(matches!(
            parse("name", json!({"type": "char", "relation": "res.partner"})),
            Err(FieldParseError::InconsistentAttribute {
                attribute: "relation",
                ..
            })
        ));
        assert!(matches!(
            parse(
                "name",
                json!({"type": "char", "selection": [["a", "A"]]})
            ),
            Err(FieldParseError::InconsistentAttribute {
                attribute: "selection",
                ..
            })
        ));
        assert!(matches!(
            parse("name", json!({"name": "other", "type": "char"})),
            Err(FieldParseError::InconsistentAttribute {
                attribute: "name",
                ..
            })
        ));
    }

    #[test]
    fn reference_field_drops_its_target_models() {
        let field = parse(
            "action",
            json!({
                "type": "reference",
                "string": "Action",
                "selection": [
                    ["ir.actions.report", "ir.actions.report"],
                    ["ir.actions.act_window", "ir.actions.act_window"]
                ]
            }),
        )
        .unwrap();

        assert_eq!(field.kind, FieldKind::Reference);
        assert_eq!(field.selection_values, None);

        let fields = parse_field_map(
            "ir.ui.menu",
            &RawValue::from(json!({
                "name": {"type": "char", "string": "Menu"},
                "action": {"type": "reference", "selection": [["ir.actions.report", "Report"]]}
            })),
        )
        .unwrap();
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["name", "action"]);
    }

    #[test]
    fn field_map_keeps_server_order() {
        let fields = parse_field_map(
            "res.partner",
            &RawValue::from(json!({
                "name": {"type": "char", "required": true},
                "active": {"type": "boolean"},
                "parent_id": {"type": "many2one", "relation": "res.partner"},
            })),
        )
        .unwrap();

        assert_eq!(
            fields.keys().collect::<Vec<_>>(),
            vec!["name", "active", "parent_id"]
        );
        assert_eq!(fields["parent_id"].kind, FieldKind::ManyToOne);
    }

    #[test]
    fn field_map_reports_the_failing_field() {
        let error = parse_field_map(
            "res.partner",
            &RawValue::from(json!({
                "name": {"type": "char"},
                "props": {"type": "properties"},
            })),
        )
        .unwrap_err();

        match error {
            IntrospectionError::Field { model, field, .. } => {
                assert_eq!(model, "res.partner");
                assert_eq!(field, "props");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
