//! Fragment — a self-contained piece of markup pulled from a content endpoint.
//!
//! The core never looks inside a fragment: it is inserted into a region
//! verbatim, so malformed markup simply renders incorrectly.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque markup string meant for direct insertion into a region.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fragment(String);

impl Fragment {
    #[must_use]
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Fragment {
    fn from(markup: String) -> Self {
        Self(markup)
    }
}

impl From<&str> for Fragment {
    fn from(markup: &str) -> Self {
        Self(markup.to_string())
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
