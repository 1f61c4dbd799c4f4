// Copyright 2026 Oxide Computer Company

//! Conform
//!
//! Check HTTP response bodies against the response schemas declared in an
//! OpenAPI (Swagger 2 or OpenAPI 3) document.
//!
//! A [`ResponseValidator`] maps a request URL to a path template of the
//! document, finds the schema for the operation and status code, and walks
//! the response body against it, following local `$ref`s and flattening
//! `allOf` compositions. The first mismatch is reported as an
//! [`AssertionError`] carrying the location in the body and the chain of
//! schema fragments that produced the expectation.

mod config;
mod context;
mod error;
mod path;
mod provider;
mod resolve;
mod resolver;
mod routes;
mod schema;
mod validate;
mod validator;

pub use config::ValidatorConfig;
pub use error::{AssertionError, Error, LookupError, Mismatch, RefError};
pub use path::{BodyPath, SchemaPath};
pub use provider::{SpecFile, SpecProvider};
pub use resolver::{PathEntry, SpecResolver};
pub use routes::{PathTemplate, normalize_url};
pub use schema::SchemaType;
pub use validator::ResponseValidator;
