// Copyright 2026 Oxide Computer Company

//! Recursive comparison of a response body against schema fragments.
//!
//! The walk stops at the first mismatch. Arrays are sampled: only their first
//! element is checked against the item schema.

use serde_json::Value;
use tracing::trace;

use crate::{
    Error, Mismatch,
    context::{Context, Contextual},
    resolve::Properties,
    schema::{SchemaNode, SchemaType, value_kind},
};

/// Check that `actual` is an object carrying every property in `properties`,
/// each matching its schema.
///
/// An empty set of properties accepts any value.
pub(crate) fn validate_object(
    context: &Context<'_>,
    properties: &Properties<'_>,
    actual: &Value,
) -> Result<(), Error> {
    if properties.is_empty() {
        return Ok(());
    }

    let Some(object) = actual.as_object() else {
        return Err(context
            .assertion(Mismatch::Type {
                expected: SchemaType::Object,
                found: value_kind(actual),
            })
            .into());
    };

    for (name, schema) in properties {
        let schema = Contextual::new(schema.context().enter(name), **schema);
        let Some(value) = object.get(*name) else {
            return Err(schema.context().assertion(Mismatch::Missing).into());
        };

        trace!(location = %schema.context().body, "validating property");
        validate_value(&schema, value)?;
    }

    Ok(())
}

fn validate_value(schema: &Contextual<'_, SchemaNode<'_>>, actual: &Value) -> Result<(), Error> {
    let schema = schema.resolve()?;

    if actual.is_null() && schema.nullable() {
        return Ok(());
    }

    match schema.schema_type() {
        SchemaType::Array => {
            let Some(elements) = actual.as_array() else {
                return Err(mismatch(&schema, SchemaType::Array, actual));
            };

            let (Some(first), Some(items)) = (elements.first(), schema.items()) else {
                return Ok(());
            };

            let items = Contextual::new(
                schema.context().append("items").enter("0"),
                SchemaNode::new(items),
            )
            .resolve()?;

            // Primitive item schemas are not checked.
            match items.properties_to_check()? {
                Some(properties) => validate_object(items.context(), &properties, first),
                None => Ok(()),
            }
        }

        // An object schema with neither properties nor allOf constrains
        // nothing.
        SchemaType::Object => match schema.properties_to_check()? {
            Some(properties) => validate_object(schema.context(), &properties, actual),
            None => Ok(()),
        },

        SchemaType::Unknown => Ok(()),

        primitive @ (SchemaType::Integer
        | SchemaType::String
        | SchemaType::Boolean
        | SchemaType::Number) => {
            if primitive.matches_primitive(actual) {
                Ok(())
            } else {
                Err(mismatch(&schema, primitive, actual))
            }
        }
    }
}

fn mismatch(schema: &Contextual<'_, SchemaNode<'_>>, expected: SchemaType, actual: &Value) -> Error {
    schema
        .context()
        .assertion(Mismatch::Type {
            expected,
            found: value_kind(actual),
        })
        .into()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{AssertionError, RefError, path::SchemaPath};

    /// Validate `actual` against `schema` as the response schema of
    /// `GET /test`, within `document`.
    fn check(document: &Value, schema: &Value, actual: &Value) -> Result<(), Error> {
        let context =
            Context::new(document, SchemaPath::for_response("/test", "get", 200)).append("schema");
        let schema = Contextual::new(context, SchemaNode::new(schema)).resolve()?;
        let properties = schema.properties_to_check()?.unwrap_or_default();
        validate_object(schema.context(), &properties, actual)
    }

    fn assertion(result: Result<(), Error>) -> AssertionError {
        match result {
            Err(Error::Assertion(err)) => err,
            other => panic!("expected an assertion failure, got {other:?}"),
        }
    }

    #[test]
    fn missing_key_fails() {
        let schema = json!({ "properties": { "name": { "type": "string" } } });
        let err = assertion(check(&json!({}), &schema, &json!({})));
        assert_eq!(err.location, "#/name");
        assert_eq!(err.mismatch, Mismatch::Missing);
        assert_eq!(
            err.schema,
            "#/paths/~1test/get/responses/200/schema/properties/name"
        );
    }

    #[test]
    fn type_mismatch_fails() {
        let schema = json!({ "properties": { "age": { "type": "integer" } } });
        let err = assertion(check(&json!({}), &schema, &json!({ "age": "30" })));
        assert_eq!(
            err.mismatch,
            Mismatch::Type {
                expected: SchemaType::Integer,
                found: "string"
            }
        );
    }

    #[test]
    fn boolean_is_not_an_integer() {
        let schema = json!({ "properties": { "age": { "type": "integer" } } });
        assert!(check(&json!({}), &schema, &json!({ "age": true })).is_err());
    }

    #[test]
    fn integer_is_not_a_number() {
        let schema = json!({ "properties": { "ratio": { "type": "number" } } });
        assert!(check(&json!({}), &schema, &json!({ "ratio": 1 })).is_err());
        assert!(check(&json!({}), &schema, &json!({ "ratio": 1.0 })).is_ok());
    }

    #[test]
    fn nullable_accepts_null() {
        let schema = json!({
            "properties": { "age": { "type": "integer", "nullable": true } }
        });
        check(&json!({}), &schema, &json!({ "age": null })).unwrap();
        check(&json!({}), &schema, &json!({ "age": 3 })).unwrap();
        assert!(check(&json!({}), &schema, &json!({ "age": "3" })).is_err());
    }

    #[test]
    fn null_without_nullable_fails() {
        let schema = json!({ "properties": { "age": { "type": "integer" } } });
        let err = assertion(check(&json!({}), &schema, &json!({ "age": null })));
        assert_eq!(
            err.to_string(),
            "#/age: expected integer, found null \
             (schema #/paths/~1test/get/responses/200/schema/properties/age)"
        );
    }

    #[test]
    fn unknown_types_are_accepted() {
        let schema = json!({
            "properties": {
                "blob": { "type": "file" },
                "anything": {}
            }
        });
        check(
            &json!({}),
            &schema,
            &json!({ "blob": [1, 2], "anything": { "x": 1 } }),
        )
        .unwrap();
    }

    #[test]
    fn extra_keys_are_ignored() {
        let schema = json!({ "properties": { "id": { "type": "integer" } } });
        check(&json!({}), &schema, &json!({ "id": 1, "extra": "yes" })).unwrap();
    }

    #[test]
    fn array_checks_only_first_element() {
        let schema = json!({
            "properties": {
                "items": {
                    "type": "array",
                    "items": { "properties": { "id": { "type": "integer" } } }
                }
            }
        });
        check(
            &json!({}),
            &schema,
            &json!({ "items": [{ "id": 1 }, { "id": "bad" }] }),
        )
        .unwrap();

        let err = assertion(check(
            &json!({}),
            &schema,
            &json!({ "items": [{ "id": "bad" }, { "id": 1 }] }),
        ));
        assert_eq!(err.location, "#/items/0/id");
    }

    #[test]
    fn array_must_be_an_array() {
        let schema = json!({
            "properties": { "tags": { "type": "array", "items": { "type": "string" } } }
        });
        check(&json!({}), &schema, &json!({ "tags": [] })).unwrap();
        // Primitive items are not checked.
        check(&json!({}), &schema, &json!({ "tags": [1] })).unwrap();

        let err = assertion(check(&json!({}), &schema, &json!({ "tags": "a,b" })));
        assert_eq!(
            err.mismatch,
            Mismatch::Type {
                expected: SchemaType::Array,
                found: "string"
            }
        );
    }

    #[test]
    fn array_items_by_reference() {
        let document = json!({
            "definitions": {
                "Item": { "properties": { "id": { "type": "integer" } } }
            }
        });
        let schema = json!({
            "properties": {
                "items": { "type": "array", "items": { "$ref": "#/definitions/Item" } }
            }
        });
        let err = assertion(check(&document, &schema, &json!({ "items": [{}] })));
        assert_eq!(err.location, "#/items/0/id");
        assert_eq!(
            err.schema,
            "#/definitions/Item/properties/id -> \
             #/paths/~1test/get/responses/200/schema/properties/items/items/$ref"
        );
    }

    #[test]
    fn nested_objects() {
        let schema = json!({
            "properties": {
                "owner": {
                    "type": "object",
                    "properties": {
                        "address": {
                            "type": "object",
                            "properties": { "zip": { "type": "string" } }
                        }
                    }
                }
            }
        });
        check(
            &json!({}),
            &schema,
            &json!({ "owner": { "address": { "zip": "02139" } } }),
        )
        .unwrap();

        let err = assertion(check(
            &json!({}),
            &schema,
            &json!({ "owner": { "address": { "zip": 2139 } } }),
        ));
        assert_eq!(err.location, "#/owner/address/zip");

        let err = assertion(check(&json!({}), &schema, &json!({ "owner": "nobody" })));
        assert_eq!(err.location, "#/owner");
    }

    #[test]
    fn unconstrained_object_accepts_anything() {
        let schema = json!({ "properties": { "meta": { "type": "object" } } });
        check(&json!({}), &schema, &json!({ "meta": 5 })).unwrap();
    }

    #[test]
    fn property_by_reference() {
        let document = json!({
            "definitions": {
                "Owner": {
                    "type": "object",
                    "properties": { "name": { "type": "string" } }
                }
            }
        });
        let schema = json!({
            "properties": { "owner": { "$ref": "#/definitions/Owner" } }
        });
        check(&document, &schema, &json!({ "owner": { "name": "ada" } })).unwrap();
        let err = assertion(check(&document, &schema, &json!({ "owner": {} })));
        assert_eq!(err.location, "#/owner/name");
    }

    #[test]
    fn all_of_merges_reference_and_inline() {
        let document = json!({
            "definitions": {
                "A": { "properties": { "a": { "type": "string" } } }
            }
        });
        let schema = json!({
            "properties": {
                "both": {
                    "type": "object",
                    "allOf": [
                        { "$ref": "#/definitions/A" },
                        { "properties": { "b": { "type": "integer" } } }
                    ]
                }
            }
        });

        check(&document, &schema, &json!({ "both": { "a": "x", "b": 1 } })).unwrap();

        let err = assertion(check(&document, &schema, &json!({ "both": { "b": 1 } })));
        assert_eq!(err.location, "#/both/a");

        let err = assertion(check(
            &document,
            &schema,
            &json!({ "both": { "a": "x", "b": "1" } }),
        ));
        assert_eq!(err.location, "#/both/b");
    }

    #[test]
    fn array_items_with_all_of() {
        let document = json!({
            "definitions": {
                "Base": { "properties": { "id": { "type": "integer" } } }
            }
        });
        let schema = json!({
            "properties": {
                "list": {
                    "type": "array",
                    "items": {
                        "allOf": [
                            { "$ref": "#/definitions/Base" },
                            { "properties": { "label": { "type": "string" } } }
                        ]
                    }
                }
            }
        });
        check(&document, &schema, &json!({ "list": [{ "id": 1, "label": "x" }] })).unwrap();
        let err = assertion(check(&document, &schema, &json!({ "list": [{ "id": 1 }] })));
        assert_eq!(err.location, "#/list/0/label");
    }

    #[test]
    fn recursive_schema_follows_the_data() {
        let document = json!({
            "definitions": {
                "Node": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "children": {
                            "type": "array",
                            "items": { "$ref": "#/definitions/Node" }
                        }
                    }
                }
            }
        });
        let schema = json!({ "$ref": "#/definitions/Node" });
        let tree = json!({
            "name": "root",
            "children": [{ "name": "leaf", "children": [] }]
        });
        check(&document, &schema, &tree).unwrap();

        let tree = json!({
            "name": "root",
            "children": [{ "name": "leaf", "children": [{ "children": [] }] }]
        });
        let err = assertion(check(&document, &schema, &tree));
        assert_eq!(err.location, "#/children/0/children/0/name");
    }

    #[test]
    fn reference_cycle_is_rejected() {
        let document = json!({
            "definitions": {
                "A": { "$ref": "#/definitions/B" },
                "B": { "$ref": "#/definitions/A" }
            }
        });
        let schema = json!({ "properties": { "a": { "$ref": "#/definitions/A" } } });
        let result = check(&document, &schema, &json!({ "a": 1 }));
        assert!(matches!(
            result,
            Err(Error::Reference(RefError::Cycle { .. }))
        ));
    }

    #[test]
    fn dangling_reference_fails() {
        let schema = json!({ "properties": { "a": { "$ref": "#/definitions/Gone" } } });
        let result = check(&json!({ "definitions": {} }), &schema, &json!({ "a": 1 }));
        assert!(matches!(
            result,
            Err(Error::Reference(RefError::Unresolved { .. }))
        ));
    }

    #[test]
    fn empty_properties_accept_anything() {
        let schema = json!({ "properties": {} });
        check(&json!({}), &schema, &json!([1, 2, 3])).unwrap();
        check(&json!({}), &schema, &json!(null)).unwrap();
    }

    #[test]
    fn non_object_body_fails() {
        let schema = json!({ "properties": { "id": { "type": "integer" } } });
        let err = assertion(check(&json!({}), &schema, &json!([{ "id": 1 }])));
        assert_eq!(err.location, "#");
        assert_eq!(
            err.mismatch,
            Mismatch::Type {
                expected: SchemaType::Object,
                found: "array"
            }
        );
    }
}
