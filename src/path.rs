// Copyright 2026 Oxide Computer Company

//! JSON pointer tracking for both sides of a validation.
//!
//! A [`BodyPath`] records where we are in the response body; a [`SchemaPath`]
//! records where we are in the OpenAPI document, including the chain of
//! `$ref`s followed to get there.
//!
//! ## Reference cycles
//!
//! Recursive schemas are legitimate: a `Node` whose `children` are `Node`s is
//! bounded by the depth of the response. What must be rejected is a chain of
//! references that revisits a fragment *without* descending into the
//! response, such as `A -> B -> A` or an `allOf` that includes itself. Each
//! time validation moves into a child value, [`SchemaPath::enter_value`]
//! starts a new resolution, and only references followed since then take part
//! in cycle detection.

use std::fmt;

use crate::RefError;

/// Location within the response body, as a JSON pointer rooted at `#`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BodyPath {
    path: String,
}

impl BodyPath {
    pub(crate) fn root() -> Self {
        Self {
            path: "#".to_string(),
        }
    }

    /// Append a key or array index, escaping special characters per RFC 6901.
    pub(crate) fn append(&self, segment: &str) -> Self {
        Self {
            path: format!("{}/{}", self.path, escape_json_pointer_segment(segment)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for BodyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Location within the OpenAPI document, with the reference chain.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SchemaPath {
    current: String,
    /// Every `$ref` site followed so far, each with `/$ref` appended, oldest
    /// first.
    refs: Vec<String>,
    /// Index into `refs` of the first reference followed since the last
    /// descent into the response body.
    resolution_start: usize,
}

impl SchemaPath {
    /// The response object of an operation: `#/paths/<template>/<method>/responses/<code>`.
    pub(crate) fn for_response(template: &str, method: &str, code: u16) -> Self {
        Self {
            current: format!(
                "#/paths/{}/{}/responses/{}",
                escape_json_pointer_segment(template),
                method,
                code
            ),
            refs: Vec::new(),
            resolution_start: 0,
        }
    }

    /// Append a path segment, escaping special characters per RFC 6901.
    pub(crate) fn append(&self, segment: &str) -> Self {
        Self {
            current: format!("{}/{}", self.current, escape_json_pointer_segment(segment)),
            refs: self.refs.clone(),
            resolution_start: self.resolution_start,
        }
    }

    /// Follow a reference from the current location.
    ///
    /// Returns an error if `reference` is not a local JSON pointer (`#/...`).
    pub(crate) fn push(&self, reference: &str) -> Result<Self, RefError> {
        if !reference.starts_with("#/") {
            return Err(RefError::Unsupported {
                reference: reference.to_string(),
            });
        }

        let mut refs = self.refs.clone();
        refs.push(format!("{}/$ref", self.current));
        Ok(Self {
            current: reference.to_string(),
            refs,
            resolution_start: self.resolution_start,
        })
    }

    /// Start a new resolution: called when validation descends into a child
    /// of the response body.
    pub(crate) fn enter_value(&self) -> Self {
        Self {
            current: self.current.clone(),
            refs: self.refs.clone(),
            resolution_start: self.refs.len(),
        }
    }

    pub fn current_pointer(&self) -> &str {
        &self.current
    }

    /// Check whether the current resolution has looped.
    ///
    /// The first reference of a resolution is where the walk through the
    /// response led us, so it can legitimately live inside its own target.
    /// Any later reference site that lies within the current location means
    /// that fragment was already being resolved.
    pub fn contains_cycle(&self) -> bool {
        self.refs
            .iter()
            .skip(self.resolution_start + 1)
            .any(|site| is_path_ancestor_of(&self.current, site))
    }

    /// Iterate from the current location back through the reference chain
    /// (most recent reference first).
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.current.as_str()).chain(self.refs.iter().rev().map(String::as_str))
    }
}

impl fmt::Debug for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for path in self.iter() {
            if !first {
                write!(f, " -> ")?;
            }
            write!(f, "{}", path)?;
            first = false;
        }
        Ok(())
    }
}

/// Escape a segment for use in a JSON pointer per RFC 6901.
fn escape_json_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Check if `ancestor` is a path-segment-aligned prefix of `path`.
///
/// Returns `true` if `path` starts with `ancestor` and the character
/// immediately following the prefix (if any) is `/`, so that `User` is not
/// mistaken for an ancestor of `UserProfile`.
fn is_path_ancestor_of(ancestor: &str, path: &str) -> bool {
    path.starts_with(ancestor)
        && path
            .as_bytes()
            .get(ancestor.len())
            .is_none_or(|&b| b == b'/')
}
