// Copyright 2026 Oxide Computer Company

use std::ops::Deref;

use serde_json::Value;

use crate::{
    AssertionError, Mismatch, RefError,
    path::{BodyPath, SchemaPath},
};

/// Where a validation step is: the document being read, the location in the
/// response body, and the location in the document.
#[derive(Clone, Debug)]
pub struct Context<'a> {
    pub document: &'a Value,
    pub body: BodyPath,
    pub schema: SchemaPath,
}

impl<'a> Context<'a> {
    pub(crate) fn new(document: &'a Value, schema: SchemaPath) -> Self {
        Self {
            document,
            body: BodyPath::root(),
            schema,
        }
    }

    /// Move within the document without moving within the body.
    pub(crate) fn append(&self, segment: &str) -> Context<'a> {
        Self {
            document: self.document,
            body: self.body.clone(),
            schema: self.schema.append(segment),
        }
    }

    /// Descend into a child of the current body value. References followed
    /// from here on start a new resolution.
    pub(crate) fn enter(&self, body_segment: &str) -> Context<'a> {
        Self {
            document: self.document,
            body: self.body.append(body_segment),
            schema: self.schema.enter_value(),
        }
    }

    pub(crate) fn push(&self, reference: &str) -> Result<Context<'a>, RefError> {
        Ok(Self {
            document: self.document,
            body: self.body.clone(),
            schema: self.schema.push(reference)?,
        })
    }

    pub(crate) fn assertion(&self, mismatch: Mismatch) -> AssertionError {
        AssertionError {
            location: self.body.to_string(),
            schema: self.schema.to_string(),
            mismatch,
        }
    }
}

/// A value paired with the context it was found in.
#[derive(Clone, Debug)]
pub struct Contextual<'a, T> {
    context: Context<'a>,
    value: T,
}

impl<'a, T> Contextual<'a, T> {
    pub fn new(context: Context<'a>, value: T) -> Self {
        Self { context, value }
    }

    pub fn context(&self) -> &Context<'a> {
        &self.context
    }
}

impl<T> Deref for Contextual<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}
