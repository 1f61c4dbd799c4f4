// Copyright 2026 Oxide Computer Company

use serde::Deserialize;

/// Knobs for a [`ResponseValidator`](crate::ResponseValidator).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Media type whose schema is checked for OpenAPI 3 responses. When an
    /// operation does not declare it, the first declared media type is used.
    pub media_type: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            media_type: "application/json".to_string(),
        }
    }
}
