// Copyright 2026 Oxide Computer Company

use std::fmt;

use thiserror::Error;

use crate::schema::SchemaType;

/// Any failure produced while validating a response.
#[derive(Debug, Error)]
pub enum Error {
    /// The specification provider failed.
    #[error("failed to load specification")]
    Load(#[source] anyhow::Error),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Reference(#[from] RefError),
    #[error(transparent)]
    Assertion(#[from] AssertionError),
}

/// The request could not be mapped to a response schema.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no path template matches {url:?}")]
    UnmatchedPath { url: String },

    #[error("path {template:?} has no {method:?} operation")]
    MissingOperation { template: String, method: String },

    #[error("operation {method} {template:?} declares no response for status {code}")]
    MissingResponse {
        template: String,
        method: String,
        code: u16,
    },

    #[error("response {code} of {method} {template:?} declares no schema")]
    MissingSchema {
        template: String,
        method: String,
        code: u16,
    },

    #[error("schema at {pointer} has neither properties nor allOf")]
    MalformedSchema { pointer: String },

    #[error("path template {template:?} cannot be compiled")]
    InvalidTemplate {
        template: String,
        #[source]
        source: regex::Error,
    },
}

/// A `$ref` could not be followed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RefError {
    #[error("invalid reference {reference:?}: expected JSON pointer starting with #/")]
    Unsupported { reference: String },

    #[error("reference {reference:?} does not resolve")]
    Unresolved { reference: String },

    #[error("reference cycle: {chain}")]
    Cycle { chain: String },
}

/// The response body does not match its schema.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{location}: {mismatch} (schema {schema})")]
pub struct AssertionError {
    /// JSON pointer into the response body.
    pub location: String,
    /// The schema being applied, with the chain of references that led to it.
    pub schema: String,
    pub mismatch: Mismatch,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mismatch {
    /// A declared key is absent.
    Missing,
    /// The value has the wrong JSON type.
    Type {
        expected: SchemaType,
        found: &'static str,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Missing => write!(f, "required key is missing"),
            Mismatch::Type { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
        }
    }
}
