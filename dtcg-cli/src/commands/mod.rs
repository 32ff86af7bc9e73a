//! Command orchestration for CLI subcommands.
//!
//! Provides execute functions for:
//! - `run` - Run the conformance suite
//! - `list` - List declared cases
//! - `schemas` - List (and optionally compile) registered schemas

pub mod list;
pub mod run;
pub mod schemas;

pub use list::execute_list;
pub use run::execute_run;
pub use schemas::execute_schemas;

use dtcg_conformance::{HarnessError, LoadError};
use dtcg_fs::FsError;
use dtcg_schema::{EvaluatorError, StoreError};
use thiserror::Error;

use crate::cli::CliError;

/// Errors from command execution.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] CliError),

    #[error(transparent)]
    Harness(#[from] HarnessError),

    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("failed to load schemas: {0}")]
    Store(#[from] StoreError),

    #[error("failed to compile schemas: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("unknown sub-manifest id {0:?}")]
    UnknownManifest(String),

    #[error("failed to write report {path}: {source}")]
    Report {
        path: String,
        #[source]
        source: FsError,
    },
}

/// Result of command execution.
pub type CommandResult<T> = Result<T, CommandError>;
