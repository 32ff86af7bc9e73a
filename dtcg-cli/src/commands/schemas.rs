//! Schemas command: load the schema store and report what it holds.

use dtcg_fs::Filesystem;
use dtcg_schema::{JsonSchemaEvaluator, SchemaId, SchemaStore};

use crate::cli::SchemasArgs;
use crate::logger::Logger;

use super::CommandResult;

/// One registered schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedSchema {
    pub id: SchemaId,
    pub uri: String,
    pub path: String,
}

/// Result of schemas command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemasResult {
    pub schemas: Vec<ListedSchema>,
    /// True when `--compile` was given and every schema compiled.
    pub compiled: bool,
}

/// Execute the schemas command.
pub fn execute_schemas<F, L>(args: &SchemasArgs, fs: &F, logger: &L) -> CommandResult<SchemasResult>
where
    F: Filesystem,
    L: Logger,
{
    args.validate()?;
    let extensions: Vec<&str> = args.schema_extensions.iter().map(String::as_str).collect();

    logger.debug(&format!("walking {}", args.schemas.display()));
    let store = SchemaStore::load(fs, &args.schemas, &extensions)?;

    if args.compile {
        let evaluator = JsonSchemaEvaluator::from_store(&store)?;
        logger.verbose(&format!("compiled {} validators", evaluator.len()));
    }

    let schemas = store
        .documents()
        .map(|doc| ListedSchema {
            id: doc.id.clone(),
            uri: doc.uri.clone(),
            path: doc.path.display().to_string(),
        })
        .collect();

    Ok(SchemasResult {
        schemas,
        compiled: args.compile,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{parse_from, Command};
    use crate::commands::CommandError;
    use crate::logger::MockLogger;
    use dtcg_fs::MockFilesystem;
    use serde_json::json;

    fn args(extra: &[&str]) -> SchemasArgs {
        let mut argv = vec!["dtcg-conform", "schemas", "--schemas", "/repo/schemas"];
        argv.extend_from_slice(extra);
        match parse_from(argv).unwrap().command {
            Command::Schemas(args) => args,
            other => panic!("expected schemas, got {:?}", other),
        }
    }

    fn schema(name: &str, body: serde_json::Value) -> String {
        let mut doc = json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "$id": format!("https://designtokens.org/schemas/2025.10/{}.json", name),
        });
        if let (Some(doc), Some(body)) = (doc.as_object_mut(), body.as_object()) {
            doc.extend(body.clone());
        }
        doc.to_string()
    }

    #[test]
    fn test_execute_schemas_lists_ids_in_order() {
        let fs = MockFilesystem::new();
        fs.add_file("/repo/schemas/2025.10/resolver.json", schema("resolver", json!({})));
        fs.add_file("/repo/schemas/2025.10/format.json", schema("format", json!({})));
        fs.add_file("/repo/schemas/README.md", "not a schema");

        let result = execute_schemas(&args(&[]), &fs, &MockLogger::new()).unwrap();
        let ids: Vec<&str> = result.schemas.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["schemas/2025.10/format.json", "schemas/2025.10/resolver.json"]);
        assert!(!result.compiled);
    }

    #[test]
    fn test_execute_schemas_compile() {
        let fs = MockFilesystem::new();
        fs.add_file(
            "/repo/schemas/2025.10/format.json",
            schema("format", json!({"$ref": "color.json"})),
        );
        fs.add_file(
            "/repo/schemas/2025.10/color.json",
            schema("color", json!({"type": "object"})),
        );
        let logger = MockLogger::new();

        let result = execute_schemas(&args(&["--compile"]), &fs, &logger).unwrap();
        assert!(result.compiled);
        assert!(logger.contains("compiled 2 validators"));
    }

    #[test]
    fn test_execute_schemas_duplicate_id() {
        let fs = MockFilesystem::new();
        fs.add_file("/repo/schemas/2025.10/format.json", schema("format", json!({})));
        fs.add_file("/repo/schemas/copy/format.json", schema("format", json!({})));

        let result = execute_schemas(&args(&[]), &fs, &MockLogger::new());
        assert!(matches!(result, Err(CommandError::Store(_))));
    }
}
