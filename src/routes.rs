// Copyright 2026 Oxide Computer Company

use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

/// Strip the query string and make sure the path starts with `/`.
pub fn normalize_url(url: &str) -> Cow<'_, str> {
    let path = match url.find('?') {
        Some(idx) => &url[..idx],
        None => url,
    };

    if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    }
}

/// A compiled path template such as `/users/{id}/items`.
///
/// Each `{...}` placeholder matches one or more non-slash characters. The
/// match is anchored at the end of the URL only, so a URL that carries a
/// base path in front of the template still matches.
#[derive(Clone, Debug)]
pub struct PathTemplate {
    matcher: Regex,
}

impl PathTemplate {
    pub fn compile(template: &str) -> Result<Self, regex::Error> {
        static PLACEHOLDER: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\{[^/]*\}").unwrap());

        let mut pattern = String::with_capacity(template.len() + 8);
        let mut literal_start = 0;
        for placeholder in PLACEHOLDER.find_iter(template) {
            pattern.push_str(&regex::escape(&template[literal_start..placeholder.start()]));
            pattern.push_str("[^/]+?");
            literal_start = placeholder.end();
        }
        pattern.push_str(&regex::escape(&template[literal_start..]));
        pattern.push('$');

        Ok(Self {
            matcher: Regex::new(&pattern)?,
        })
    }

    pub fn is_match(&self, url: &str) -> bool {
        self.matcher.is_match(url)
    }

    pub fn as_str(&self) -> &str {
        self.matcher.as_str()
    }
}
