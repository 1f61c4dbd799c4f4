// Copyright 2026 Oxide Computer Company

use std::fmt;

use serde_json::{Map, Value};

/// The `type` of a schema fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaType {
    Integer,
    String,
    Boolean,
    Number,
    Object,
    Array,
    /// Missing or unrecognized; accepted without a type check.
    Unknown,
}

impl SchemaType {
    fn from_name(name: &str) -> Self {
        match name {
            "integer" => SchemaType::Integer,
            "string" => SchemaType::String,
            "boolean" => SchemaType::Boolean,
            "number" => SchemaType::Number,
            "object" => SchemaType::Object,
            "array" => SchemaType::Array,
            _ => SchemaType::Unknown,
        }
    }

    /// Check that `value` has exactly this primitive type.
    ///
    /// Numbers are distinguished by representation: `integer` takes only
    /// values stored as integers and `number` only values stored as floats,
    /// so `1` is not a `number` and `1.0` is not an `integer`.
    pub fn matches_primitive(self, value: &Value) -> bool {
        match (self, value) {
            (SchemaType::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (SchemaType::Number, Value::Number(n)) => n.is_f64(),
            (SchemaType::String, Value::String(_)) => true,
            (SchemaType::Boolean, Value::Bool(_)) => true,
            (SchemaType::Integer | SchemaType::Number, _)
            | (SchemaType::String | SchemaType::Boolean, _) => false,
            (SchemaType::Object | SchemaType::Array | SchemaType::Unknown, _) => true,
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaType::Integer => "integer",
            SchemaType::String => "string",
            SchemaType::Boolean => "boolean",
            SchemaType::Number => "number",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Name of the JSON type of `value`, for messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Read-only view of a schema fragment within the document.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SchemaNode<'a> {
    raw: &'a Value,
}

impl<'a> SchemaNode<'a> {
    pub fn new(raw: &'a Value) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &'a Value {
        self.raw
    }

    pub fn reference(&self) -> Option<&'a str> {
        self.raw.get("$ref").and_then(Value::as_str)
    }

    pub fn properties(&self) -> Option<&'a Map<String, Value>> {
        self.raw.get("properties").and_then(Value::as_object)
    }

    pub fn all_of(&self) -> Option<&'a Vec<Value>> {
        self.raw.get("allOf").and_then(Value::as_array)
    }

    pub fn items(&self) -> Option<&'a Value> {
        self.raw.get("items")
    }

    /// `nullable` (OpenAPI 3) or the Swagger 2 `x-nullable` extension.
    pub fn nullable(&self) -> bool {
        ["nullable", "x-nullable"]
            .iter()
            .any(|key| self.raw.get(*key).and_then(Value::as_bool) == Some(true))
    }

    /// The declared type. A fragment that omits `type` but carries
    /// `properties` or `allOf` describes an object.
    pub fn schema_type(&self) -> SchemaType {
        match self.raw.get("type").and_then(Value::as_str) {
            Some(name) => SchemaType::from_name(name),
            None if self.properties().is_some() || self.all_of().is_some() => SchemaType::Object,
            None => SchemaType::Unknown,
        }
    }
}
