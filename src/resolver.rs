// Copyright 2026 Oxide Computer Company

use std::{
    cell::{Cell, OnceCell, RefCell},
    collections::HashMap,
};

use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    Error, LookupError, SpecProvider,
    routes::{PathTemplate, normalize_url},
};

/// A path item of the document along with the template it is declared under.
#[derive(Clone, Copy, Debug)]
pub struct PathEntry<'a> {
    pub template: &'a str,
    pub item: &'a Value,
    pub document: &'a Value,
}

/// Maps request URLs to the path items of an OpenAPI document.
///
/// The document is fetched from the provider on first use and kept for the
/// lifetime of the resolver, as are compiled templates and URL matches. The
/// caches use unsynchronized interior mutability: a resolver is meant to be
/// used from one thread.
pub struct SpecResolver<P> {
    provider: P,
    document: OnceCell<Value>,
    /// Template string to compiled matcher.
    templates: RefCell<HashMap<String, PathTemplate>>,
    /// Normalized URL to the template that matched it.
    matched: RefCell<HashMap<String, String>>,
    compilations: Cell<usize>,
}

impl<P: SpecProvider> SpecResolver<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            document: OnceCell::new(),
            templates: RefCell::new(HashMap::new()),
            matched: RefCell::new(HashMap::new()),
            compilations: Cell::new(0),
        }
    }

    /// The document, fetched from the provider on the first call.
    ///
    /// A provider failure is returned as-is and nothing is cached.
    pub fn specification(&self) -> Result<&Value, Error> {
        if let Some(document) = self.document.get() {
            return Ok(document);
        }

        let document = self.provider.specification().map_err(Error::Load)?;
        debug!("loaded specification");
        Ok(self.document.get_or_init(|| document))
    }

    /// Number of path templates compiled so far.
    pub fn matcher_compilations(&self) -> usize {
        self.compilations.get()
    }

    /// Find the path item whose template matches `url`.
    ///
    /// Templates are tried in document order and the first match wins.
    /// Returns `None` if no template matches.
    pub fn resolve_path_entry(&self, url: &str) -> Result<Option<PathEntry<'_>>, Error> {
        let document = self.specification()?;
        let url = normalize_url(url);

        let Some(paths) = document.get("paths").and_then(Value::as_object) else {
            return Ok(None);
        };

        if let Some(template) = self.matched.borrow().get(&*url) {
            if let Some(entry) = path_entry(document, paths, template) {
                debug!(url = %url, template = entry.template, "path cache hit");
                return Ok(Some(entry));
            }
        }

        let mut templates = self.templates.borrow_mut();
        for (template, item) in paths {
            if !templates.contains_key(template) {
                let compiled = PathTemplate::compile(template).map_err(|source| {
                    LookupError::InvalidTemplate {
                        template: template.clone(),
                        source,
                    }
                })?;
                self.compilations.set(self.compilations.get() + 1);
                debug!(
                    template = template.as_str(),
                    pattern = compiled.as_str(),
                    "compiled path template"
                );
                templates.insert(template.clone(), compiled);
            }

            let compiled = &templates[template];
            if compiled.is_match(&url) {
                debug!(url = %url, template = template.as_str(), "matched path template");
                self.matched
                    .borrow_mut()
                    .insert(url.into_owned(), template.clone());
                return Ok(Some(PathEntry {
                    template,
                    item,
                    document,
                }));
            }
        }

        debug!(url = %url, "no path template matches");
        Ok(None)
    }
}

fn path_entry<'a>(
    document: &'a Value,
    paths: &'a Map<String, Value>,
    template: &str,
) -> Option<PathEntry<'a>> {
    paths
        .get_key_value(template)
        .map(|(template, item)| PathEntry {
            template,
            item,
            document,
        })
}
