//! Harness configuration.

use std::path::PathBuf;

use dtcg_schema::DEFAULT_SCHEMA_EXTENSIONS;
use glob::Pattern;

use crate::types::{TestCase, PREPROCESSING_REQUIRED};

/// Default root manifest path, relative to the repository root.
pub const DEFAULT_TESTS_MANIFEST: &str = "tests/manifest.json";

/// Default directory holding versioned schema documents.
pub const DEFAULT_SCHEMA_ROOT: &str = "schemas";

/// Errors from configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid case pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("at least one schema extension is required")]
    NoSchemaExtensions,
}

/// Configuration for one conformance run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub tests_manifest: PathBuf,
    pub schema_root: PathBuf,
    pub schema_extensions: Vec<String>,
    /// Sub-manifest ids to run; empty means all.
    pub manifests: Vec<String>,
    /// Case selectors matched against `<manifest-id>/<case-id>`; empty means all.
    pub include: Vec<Pattern>,
    /// Cases carrying any of these features are skipped without evaluation.
    pub skip_features: Vec<String>,
    /// Stop after the first failed or errored case.
    pub fail_fast: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tests_manifest: PathBuf::from(DEFAULT_TESTS_MANIFEST),
            schema_root: PathBuf::from(DEFAULT_SCHEMA_ROOT),
            schema_extensions: DEFAULT_SCHEMA_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            manifests: Vec::new(),
            include: Vec::new(),
            skip_features: vec![PREPROCESSING_REQUIRED.to_string()],
            fail_fast: false,
        }
    }
}

impl RunConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the root manifest path.
    pub fn with_tests_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.tests_manifest = path.into();
        self
    }

    /// Builder: set the schema root directory.
    pub fn with_schema_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema_root = path.into();
        self
    }

    /// Builder: set recognized schema file extensions.
    pub fn with_schema_extensions(mut self, extensions: Vec<String>) -> Result<Self, ConfigError> {
        if extensions.is_empty() {
            return Err(ConfigError::NoSchemaExtensions);
        }
        self.schema_extensions = extensions;
        Ok(self)
    }

    /// Builder: restrict the run to these sub-manifest ids.
    pub fn with_manifests(mut self, ids: Vec<String>) -> Self {
        self.manifests = ids;
        self
    }

    /// Builder: restrict the run to cases matching any of these globs.
    pub fn with_include_patterns(mut self, patterns: &[String]) -> Result<Self, ConfigError> {
        self.include = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| ConfigError::InvalidPattern {
                    pattern: p.clone(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self)
    }

    /// Builder: set fail-fast.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Schema extensions as string slices, as the store expects them.
    pub fn schema_extension_refs(&self) -> Vec<&str> {
        self.schema_extensions.iter().map(String::as_str).collect()
    }

    /// Whether a sub-manifest id is selected.
    pub fn selects_manifest(&self, id: &str) -> bool {
        self.manifests.is_empty() || self.manifests.iter().any(|m| m == id)
    }

    /// Whether a case is selected by the include patterns.
    pub fn selects_case(&self, manifest_id: &str, case: &TestCase) -> bool {
        if self.include.is_empty() {
            return true;
        }
        let qualified = format!("{}/{}", manifest_id, case.id);
        self.include
            .iter()
            .any(|p| p.matches(&qualified) || p.matches(&case.id))
    }

    /// The first configured skip feature the case carries, if any.
    pub fn skip_feature<'a>(&'a self, case: &TestCase) -> Option<&'a str> {
        self.skip_features
            .iter()
            .find(|f| case.has_feature(f))
            .map(String::as_str)
    }
}
