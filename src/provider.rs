// Copyright 2026 Oxide Computer Company

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde_json::Value;

/// Source of the parsed OpenAPI document.
///
/// A resolver asks its provider at most once, on first use.
pub trait SpecProvider {
    fn specification(&self) -> anyhow::Result<Value>;
}

/// An in-memory document.
impl SpecProvider for Value {
    fn specification(&self) -> anyhow::Result<Value> {
        Ok(self.clone())
    }
}

impl<T: SpecProvider + ?Sized> SpecProvider for &T {
    fn specification(&self) -> anyhow::Result<Value> {
        (**self).specification()
    }
}

/// A JSON document on disk.
#[derive(Clone, Debug)]
pub struct SpecFile {
    path: PathBuf,
}

impl SpecFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SpecProvider for SpecFile {
    fn specification(&self) -> anyhow::Result<Value> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("error reading {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("error parsing {} as JSON", self.path.display()))
    }
}
