// Copyright 2026 Oxide Computer Company

use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    Error, LookupError, SpecProvider, ValidatorConfig,
    context::{Context, Contextual},
    path::SchemaPath,
    resolve::Properties,
    resolver::{PathEntry, SpecResolver},
    schema::SchemaNode,
    validate::validate_object,
};

/// Checks response bodies against the response schemas of an OpenAPI
/// document.
///
/// ```
/// use conform::ResponseValidator;
/// use serde_json::json;
///
/// let document = json!({
///     "paths": {
///         "/users/{id}": {
///             "get": {
///                 "responses": {
///                     "200": {
///                         "description": "a user",
///                         "schema": {
///                             "properties": { "id": { "type": "integer" } }
///                         }
///                     }
///                 }
///             }
///         }
///     }
/// });
///
/// let validator = ResponseValidator::new(document);
/// validator.validate_get("/users/7?verbose=1", &json!({ "id": 7 })).unwrap();
/// assert!(validator.validate_get("/users/7", &json!({ "id": "7" })).is_err());
/// ```
pub struct ResponseValidator<P> {
    resolver: SpecResolver<P>,
    config: ValidatorConfig,
}

impl<P: SpecProvider> ResponseValidator<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, ValidatorConfig::default())
    }

    pub fn with_config(provider: P, config: ValidatorConfig) -> Self {
        Self {
            resolver: SpecResolver::new(provider),
            config,
        }
    }

    pub fn resolver(&self) -> &SpecResolver<P> {
        &self.resolver
    }

    /// Validate the body of a `200` response to a `GET`.
    pub fn validate_get(&self, url: &str, response: &Value) -> Result<(), Error> {
        self.validate_response(url, response, "get", 200)
    }

    /// Validate `response` as the body returned with status `code` by
    /// `method` on `url`.
    ///
    /// Fails on the first mismatch, or if the document declares no schema
    /// for the request.
    pub fn validate_response(
        &self,
        url: &str,
        response: &Value,
        method: &str,
        code: u16,
    ) -> Result<(), Error> {
        let entry = self
            .resolver
            .resolve_path_entry(url)?
            .ok_or_else(|| LookupError::UnmatchedPath {
                url: url.to_string(),
            })?;

        let method = method.to_ascii_lowercase();
        debug!(
            url,
            template = entry.template,
            method = method.as_str(),
            code,
            "validating response"
        );

        let (context, properties) = response_schema(&entry, &method, code, &self.config)?;
        validate_object(&context, &properties, response)
    }
}

/// The properties the body of a `code` response to `method` must carry.
///
/// A response declared as nothing but `{"description": "OK"}` has no schema
/// and yields no properties.
pub(crate) fn response_schema<'a>(
    entry: &PathEntry<'a>,
    method: &str,
    code: u16,
    config: &ValidatorConfig,
) -> Result<(Context<'a>, Properties<'a>), Error> {
    let operation = entry
        .item
        .get(method)
        .ok_or_else(|| LookupError::MissingOperation {
            template: entry.template.to_string(),
            method: method.to_string(),
        })?;

    let response = operation
        .get("responses")
        .and_then(|responses| responses.get(code.to_string()))
        .ok_or_else(|| LookupError::MissingResponse {
            template: entry.template.to_string(),
            method: method.to_string(),
            code,
        })?;

    let context = Context::new(
        entry.document,
        SchemaPath::for_response(entry.template, method, code),
    );
    let response = Contextual::new(context, SchemaNode::new(response)).resolve()?;

    let schema = match response.raw().get("schema") {
        Some(schema) => Some(Contextual::new(
            response.context().append("schema"),
            SchemaNode::new(schema),
        )),
        None => response
            .raw()
            .get("content")
            .and_then(Value::as_object)
            .and_then(|content| media_schema(&response, content, &config.media_type)),
    };

    let Some(schema) = schema else {
        if is_bare_ok(response.raw()) {
            return Ok((response.context().clone(), Properties::new()));
        }
        return Err(LookupError::MissingSchema {
            template: entry.template.to_string(),
            method: method.to_string(),
            code,
        }
        .into());
    };

    let schema = schema.resolve()?;
    match schema.properties_to_check()? {
        Some(properties) => Ok((schema.context().clone(), properties)),
        None => Err(LookupError::MalformedSchema {
            pointer: schema.context().schema.current_pointer().to_string(),
        }
        .into()),
    }
}

/// The schema of an OpenAPI 3 response, preferring `media_type` and falling
/// back to the first declared media type.
fn media_schema<'a>(
    response: &Contextual<'a, SchemaNode<'a>>,
    content: &'a Map<String, Value>,
    media_type: &str,
) -> Option<Contextual<'a, SchemaNode<'a>>> {
    let (media_type, media) = content
        .get_key_value(media_type)
        .or_else(|| content.iter().next())?;
    let schema = media.get("schema")?;

    Some(Contextual::new(
        response
            .context()
            .append("content")
            .append(media_type)
            .append("schema"),
        SchemaNode::new(schema),
    ))
}

fn is_bare_ok(response: &Value) -> bool {
    response.as_object().is_some_and(|response| {
        response.len() == 1 && response.get("description").and_then(Value::as_str) == Some("OK")
    })
}
