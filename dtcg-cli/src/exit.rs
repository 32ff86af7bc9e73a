//! Exit codes for the `dtcg-conform` CLI.

use dtcg_conformance::HarnessError;

use crate::commands::CommandError;

/// Exit code constants.
pub mod codes {
    /// Successful execution, no failing cases.
    pub const SUCCESS: i32 = 0;
    /// Invalid arguments.
    pub const INVALID_ARGS: i32 = 1;
    /// Manifest, fixture or report IO error.
    pub const LOAD_ERROR: i32 = 2;
    /// Schema store or evaluator error.
    pub const SCHEMA_ERROR: i32 = 3;
    /// The run completed with failed or errored cases.
    pub const CONFORMANCE_FAILURES: i32 = 4;
}

/// Map a CommandError to an exit code.
pub fn exit_code(error: &CommandError) -> i32 {
    match error {
        CommandError::InvalidArgument(_) => codes::INVALID_ARGS,
        CommandError::UnknownManifest(_) => codes::INVALID_ARGS,
        CommandError::Harness(HarnessError::UnknownManifest(_)) => codes::INVALID_ARGS,
        CommandError::Harness(HarnessError::Load(_)) => codes::LOAD_ERROR,
        CommandError::Harness(HarnessError::Store(_) | HarnessError::Evaluator(_)) => {
            codes::SCHEMA_ERROR
        }
        CommandError::Load(_) => codes::LOAD_ERROR,
        CommandError::Store(_) | CommandError::Evaluator(_) => codes::SCHEMA_ERROR,
        CommandError::Report { .. } => codes::LOAD_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliError;
    use dtcg_conformance::LoadError;
    use dtcg_fs::FsError;
    use dtcg_schema::{extract_schema_id, EvaluatorError, StoreError};

    fn fs_error() -> FsError {
        FsError::Path("test".to_string())
    }

    fn load_error() -> LoadError {
        LoadError::Read {
            what: "root manifest".to_string(),
            path: "tests/manifest.json".to_string(),
            source: fs_error(),
        }
    }

    #[test]
    fn test_exit_code_invalid_argument() {
        let error = CommandError::InvalidArgument(CliError::EmptyManifestId);
        assert_eq!(exit_code(&error), codes::INVALID_ARGS);
    }

    #[test]
    fn test_exit_code_unknown_manifest() {
        assert_eq!(
            exit_code(&CommandError::UnknownManifest("x".to_string())),
            codes::INVALID_ARGS
        );
        let error = CommandError::Harness(HarnessError::UnknownManifest("x".to_string()));
        assert_eq!(exit_code(&error), codes::INVALID_ARGS);
    }

    #[test]
    fn test_exit_code_load() {
        assert_eq!(exit_code(&CommandError::Load(load_error())), codes::LOAD_ERROR);
        let error = CommandError::Harness(HarnessError::Load(load_error()));
        assert_eq!(exit_code(&error), codes::LOAD_ERROR);
    }

    #[test]
    fn test_exit_code_store() {
        let error = CommandError::Store(StoreError::MissingId {
            path: "schemas/x.json".to_string(),
        });
        assert_eq!(exit_code(&error), codes::SCHEMA_ERROR);
    }

    #[test]
    fn test_exit_code_evaluator() {
        let id = extract_schema_id("schemas/2025.10/format.json").unwrap();
        let error = CommandError::Harness(HarnessError::Evaluator(EvaluatorError::NotCompiled(id)));
        assert_eq!(exit_code(&error), codes::SCHEMA_ERROR);
    }

    #[test]
    fn test_exit_code_report() {
        let error = CommandError::Report {
            path: "out/report.json".to_string(),
            source: fs_error(),
        };
        assert_eq!(exit_code(&error), codes::LOAD_ERROR);
    }

    #[test]
    fn test_codes_are_distinct() {
        let all = [
            codes::SUCCESS,
            codes::INVALID_ARGS,
            codes::LOAD_ERROR,
            codes::SCHEMA_ERROR,
            codes::CONFORMANCE_FAILURES,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
