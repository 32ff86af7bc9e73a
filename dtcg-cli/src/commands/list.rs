//! List command: show declared cases without evaluating anything.

use dtcg_conformance::{load_suite, RunConfig, TestType};
use dtcg_fs::Filesystem;

use crate::cli::ListArgs;
use crate::logger::Logger;

use super::{CommandError, CommandResult};

/// One declared case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedCase {
    pub manifest_id: String,
    pub case_id: String,
    pub test_type: TestType,
    pub input: String,
    /// Feature that excludes the case from schema-only runs.
    pub skipped_by: Option<String>,
}

/// Result of list command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResult {
    pub suite: String,
    pub version: String,
    pub cases: Vec<ListedCase>,
}

impl ListResult {
    /// Number of cases a run would evaluate.
    pub fn runnable(&self) -> usize {
        self.cases.iter().filter(|c| c.skipped_by.is_none()).count()
    }
}

/// Execute the list command.
pub fn execute_list<F, L>(args: &ListArgs, fs: &F, logger: &L) -> CommandResult<ListResult>
where
    F: Filesystem,
    L: Logger,
{
    args.validate()?;
    let config = RunConfig::new().with_manifests(args.manifests.clone());

    logger.debug(&format!("loading manifests from {}", args.tests.display()));
    let suite = load_suite(fs, &args.tests)?;

    for id in &config.manifests {
        if suite.manifest(id).is_none() {
            return Err(CommandError::UnknownManifest(id.clone()));
        }
    }

    let mut cases = Vec::new();
    for loaded in &suite.manifests {
        let manifest_id = &loaded.descriptor.id;
        if !config.selects_manifest(manifest_id) {
            continue;
        }
        logger.verbose(&format!(
            "{}: {} cases against {}",
            manifest_id,
            loaded.manifest.tests.len(),
            loaded.manifest.schema
        ));
        for case in &loaded.manifest.tests {
            cases.push(ListedCase {
                manifest_id: manifest_id.clone(),
                case_id: case.id.clone(),
                test_type: case.test_type,
                input: case.input.clone(),
                skipped_by: config.skip_feature(case).map(str::to_string),
            });
        }
    }

    Ok(ListResult {
        suite: suite.root.name,
        version: suite.root.version,
        cases,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{parse_from, Command};
    use crate::logger::MockLogger;
    use dtcg_fs::MockFilesystem;
    use serde_json::json;

    fn suite_fs() -> MockFilesystem {
        let fs = MockFilesystem::new();
        fs.add_file(
            "/repo/tests/manifest.json",
            json!({
                "name": "DTCG", "description": "", "version": "2025.10",
                "manifests": [
                    {"id": "format", "file": "format/manifest.json", "description": ""},
                    {"id": "resolver", "file": "resolver/manifest.json", "description": ""}
                ]
            })
            .to_string(),
        );
        fs.add_file(
            "/repo/tests/format/manifest.json",
            json!({
                "name": "Format", "description": "", "version": "2025.10",
                "schema": "https://designtokens.org/schemas/2025.10/format.json",
                "tests": [
                    {"id": "color", "type": "PositiveEvaluationTest", "name": "Color",
                     "purpose": "p", "input": "positive/color.json"},
                    {"id": "alias", "type": "PositiveEvaluationTest", "name": "Alias",
                     "purpose": "p", "input": "positive/alias.json",
                     "features": ["preprocessing-required"]}
                ]
            })
            .to_string(),
        );
        fs.add_file(
            "/repo/tests/resolver/manifest.json",
            json!({
                "name": "Resolver", "description": "", "version": "2025.10",
                "schema": "https://designtokens.org/schemas/2025.10/resolver.json",
                "tests": [
                    {"id": "no-version", "type": "NegativeEvaluationTest", "name": "No version",
                     "purpose": "p", "input": "negative/no-version.json"}
                ]
            })
            .to_string(),
        );
        fs
    }

    fn args(extra: &[&str]) -> ListArgs {
        let mut argv = vec!["dtcg-conform", "list", "--tests", "/repo/tests/manifest.json"];
        argv.extend_from_slice(extra);
        match parse_from(argv).unwrap().command {
            Command::List(args) => args,
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_execute_list_all() {
        let result = execute_list(&args(&[]), &suite_fs(), &MockLogger::new()).unwrap();

        assert_eq!(result.suite, "DTCG");
        assert_eq!(result.cases.len(), 3);
        assert_eq!(result.runnable(), 2);

        let alias = result.cases.iter().find(|c| c.case_id == "alias").unwrap();
        assert_eq!(alias.skipped_by.as_deref(), Some("preprocessing-required"));
        assert_eq!(result.cases[2].test_type, TestType::Negative);
    }

    #[test]
    fn test_execute_list_single_manifest() {
        let logger = MockLogger::new();
        let result = execute_list(&args(&["-m", "resolver"]), &suite_fs(), &logger).unwrap();
        assert_eq!(result.cases.len(), 1);
        assert_eq!(result.cases[0].manifest_id, "resolver");
        assert!(logger.contains("resolver: 1 cases"));
    }

    #[test]
    fn test_execute_list_unknown_manifest() {
        let result = execute_list(&args(&["-m", "tokens"]), &suite_fs(), &MockLogger::new());
        assert!(matches!(result, Err(CommandError::UnknownManifest(id)) if id == "tokens"));
    }

    #[test]
    fn test_execute_list_missing_root() {
        let fs = MockFilesystem::new();
        let result = execute_list(&args(&[]), &fs, &MockLogger::new());
        assert!(matches!(result, Err(CommandError::Load(_))));
    }
}
