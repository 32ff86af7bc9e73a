//! Schema reference extraction.
//!
//! Schemas are addressed externally by full URI
//! (`https://designtokens.org/schemas/2025.10/format.json`) and registered
//! internally under the trailing `schemas/<version>/<name>.json` segment.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const SCHEMA_ID_PATTERN: &str = r"schemas/[\d.]+/[\w-]+\.json$";

/// Normalized registry key for a schema document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaId(String);

impl SchemaId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors from schema id extraction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaIdError {
    #[error("invalid schema URL format: {uri} (expected a trailing schemas/<version>/<name>.json)")]
    Malformed { uri: String },
}

fn schema_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SCHEMA_ID_PATTERN).expect("schema id pattern is valid"))
}

/// Extract the registry key from a schema URI.
///
/// Fails on any URI without a well-formed trailing
/// `schemas/<digits-and-dots>/<word-or-hyphen>.json` segment.
pub fn extract_schema_id(uri: &str) -> Result<SchemaId, SchemaIdError> {
    schema_id_regex()
        .find(uri)
        .map(|m| SchemaId(m.as_str().to_string()))
        .ok_or_else(|| SchemaIdError::Malformed {
            uri: uri.to_string(),
        })
}
