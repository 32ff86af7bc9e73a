//! Design-token conformance CLI.
//!
//! Argument parsing, logging, command orchestration and exit codes for the
//! `dtcg-conform` binary.

pub mod cli;
pub mod commands;
pub mod exit;
pub mod logger;

pub use cli::{
    parse_from, Cli, CliError, Command, ListArgs, RunArgs, SchemasArgs,
};
pub use commands::{
    execute_list, execute_run, execute_schemas, CommandError, CommandResult,
};
pub use commands::list::{ListResult, ListedCase};
pub use commands::run::RunResult;
pub use commands::schemas::{ListedSchema, SchemasResult};
pub use logger::{LogEntry, Logger, MockLogger, NullLogger, StderrLogger, Verbosity, WriterLogger};
