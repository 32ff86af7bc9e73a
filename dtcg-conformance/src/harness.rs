//! Load phase and run phase wired together.

use dtcg_fs::Filesystem;
use dtcg_schema::{EvaluatorError, JsonSchemaEvaluator, SchemaStore, StoreError};

use crate::config::RunConfig;
use crate::loader::{load_suite, LoadError};
use crate::runner::{run, SuiteRun};
use crate::types::LoadedSuite;

/// Errors that prevent a run from starting.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("failed to load schemas: {0}")]
    Store(#[from] StoreError),

    #[error("failed to prepare schema evaluator: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("failed to load manifests: {0}")]
    Load(#[from] LoadError),

    #[error("unknown sub-manifest id {0:?}")]
    UnknownManifest(String),
}

/// Everything loaded before the first case runs.
///
/// The store, evaluator and manifests are read-only from here on.
#[derive(Debug)]
pub struct Harness {
    pub store: SchemaStore,
    pub evaluator: JsonSchemaEvaluator,
    pub suite: LoadedSuite,
}

impl Harness {
    /// Load schemas, compile validators and load the manifest tree.
    pub fn load(fs: &dyn Filesystem, config: &RunConfig) -> Result<Self, HarnessError> {
        let store = SchemaStore::load(fs, &config.schema_root, &config.schema_extension_refs())?;
        let evaluator = JsonSchemaEvaluator::from_store(&store)?;
        let suite = load_suite(fs, &config.tests_manifest)?;

        for id in &config.manifests {
            if suite.manifest(id).is_none() {
                return Err(HarnessError::UnknownManifest(id.clone()));
            }
        }

        Ok(Self {
            store,
            evaluator,
            suite,
        })
    }

    /// Run every selected case.
    pub fn run(&self, fs: &dyn Filesystem, config: &RunConfig) -> SuiteRun {
        run(&self.suite, &self.store, &self.evaluator, fs, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtcg_fs::MockFilesystem;
    use serde_json::json;

    fn repo_fs() -> MockFilesystem {
        let fs = MockFilesystem::new();
        fs.add_file(
            "/repo/schemas/2025.10/format.json",
            json!({
                "$schema": "https://json-schema.org/draft/2020-12/schema",
                "$id": "https://designtokens.org/schemas/2025.10/format.json",
                "type": "object",
                "required": ["$value"]
            })
            .to_string(),
        );
        fs.add_file(
            "/repo/tests/manifest.json",
            json!({
                "name": "DTCG", "description": "", "version": "2025.10",
                "manifests": [{"id": "format", "file": "format/manifest.json", "description": ""}]
            })
            .to_string(),
        );
        fs.add_file(
            "/repo/tests/format/manifest.json",
            json!({
                "name": "Format", "description": "", "version": "2025.10",
                "schema": "https://designtokens.org/schemas/2025.10/format.json",
                "tests": [
                    {"id": "has-value", "type": "PositiveEvaluationTest", "name": "Has value",
                     "purpose": "p", "input": "positive/has-value.json"},
                    {"id": "no-value", "type": "NegativeEvaluationTest", "name": "No value",
                     "purpose": "p", "input": "negative/no-value.json"}
                ]
            })
            .to_string(),
        );
        fs.add_file("/repo/tests/format/positive/has-value.json", r#"{"$value": 1}"#);
        fs.add_file("/repo/tests/format/negative/no-value.json", r#"{"$type": "number"}"#);
        fs
    }

    fn config() -> RunConfig {
        RunConfig::new()
            .with_tests_manifest("/repo/tests/manifest.json")
            .with_schema_root("/repo/schemas")
    }

    #[test]
    fn test_load_and_run() {
        let fs = repo_fs();
        let harness = Harness::load(&fs, &config()).unwrap();
        assert_eq!(harness.store.len(), 1);

        let run = harness.run(&fs, &config());
        assert!(run.is_success());
        assert_eq!(run.cases().count(), 2);
    }

    #[test]
    fn test_unknown_manifest_selection() {
        let fs = repo_fs();
        let config = config().with_manifests(vec!["tokens".to_string()]);

        let result = Harness::load(&fs, &config);
        assert!(matches!(result, Err(HarnessError::UnknownManifest(id)) if id == "tokens"));
    }

    #[test]
    fn test_missing_schema_root() {
        let fs = repo_fs();
        let config = config().with_schema_root("/repo/nope");

        let result = Harness::load(&fs, &config);
        assert!(matches!(result, Err(HarnessError::Store(_))));
    }

    #[test]
    fn test_missing_root_manifest() {
        let fs = repo_fs();
        let config = config().with_tests_manifest("/repo/tests/missing.json");

        let result = Harness::load(&fs, &config);
        assert!(matches!(result, Err(HarnessError::Load(LoadError::Read { .. }))));
    }
}
