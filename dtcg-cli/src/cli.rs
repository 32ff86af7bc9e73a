//! CLI argument parsing for the conformance runner.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use dtcg_conformance::{ConfigError, RunConfig, DEFAULT_SCHEMA_ROOT, DEFAULT_TESTS_MANIFEST};
use dtcg_schema::DEFAULT_SCHEMA_EXTENSIONS;
use thiserror::Error;

/// Errors from CLI argument validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("manifest id must not be empty")]
    EmptyManifestId,

    #[error("--quiet cannot be combined with --verbose")]
    QuietWithVerbose,

    #[error("schema extension must not be empty or start with '.', got {0:?}")]
    InvalidSchemaExtension(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Design-token conformance runner - validates suite fixtures against the published schemas.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "dtcg-conform")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for passing cases, -vv for load details)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors and the final summary
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Validate the global flags.
    ///
    /// Both flags are global, so clap cannot see a conflict when they are
    /// given on different sides of the subcommand.
    pub fn validate(&self) -> Result<(), CliError> {
        if self.quiet && self.verbose > 0 {
            return Err(CliError::QuietWithVerbose);
        }
        Ok(())
    }
}

/// Available commands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the conformance suite.
    Run(RunArgs),
    /// List the cases declared by the manifests.
    List(ListArgs),
    /// List the registered schema ids.
    Schemas(SchemasArgs),
}

/// Arguments for the run command.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Path to the root manifest.
    #[arg(long, default_value = DEFAULT_TESTS_MANIFEST)]
    pub tests: PathBuf,

    /// Directory holding the versioned schema documents.
    #[arg(long, default_value = DEFAULT_SCHEMA_ROOT)]
    pub schemas: PathBuf,

    /// Recognized schema file extensions (comma-separated).
    #[arg(long = "schema-ext", value_delimiter = ',', default_values_t = default_schema_extensions())]
    pub schema_extensions: Vec<String>,

    /// Only run these sub-manifests (repeatable).
    #[arg(short = 'm', long = "manifest")]
    pub manifests: Vec<String>,

    /// Only run cases matching this glob, against `<manifest>/<case>` or `<case>` (repeatable).
    #[arg(long)]
    pub only: Vec<String>,

    /// Stop after the first failing case.
    #[arg(long)]
    pub fail_fast: bool,

    /// Write a JSON run report to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl RunArgs {
    /// Validate the arguments.
    pub fn validate(&self) -> Result<(), CliError> {
        validate_manifest_ids(&self.manifests)?;
        validate_extensions(&self.schema_extensions)
    }

    /// Build the run configuration.
    pub fn to_config(&self) -> Result<RunConfig, CliError> {
        self.validate()?;
        let config = RunConfig::new()
            .with_tests_manifest(&self.tests)
            .with_schema_root(&self.schemas)
            .with_schema_extensions(self.schema_extensions.clone())?
            .with_manifests(self.manifests.clone())
            .with_include_patterns(&self.only)?
            .with_fail_fast(self.fail_fast);
        Ok(config)
    }
}

/// Arguments for the list command.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct ListArgs {
    /// Path to the root manifest.
    #[arg(long, default_value = DEFAULT_TESTS_MANIFEST)]
    pub tests: PathBuf,

    /// Only list these sub-manifests (repeatable).
    #[arg(short = 'm', long = "manifest")]
    pub manifests: Vec<String>,
}

impl ListArgs {
    /// Validate the arguments.
    pub fn validate(&self) -> Result<(), CliError> {
        validate_manifest_ids(&self.manifests)
    }
}

/// Arguments for the schemas command.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct SchemasArgs {
    /// Directory holding the versioned schema documents.
    #[arg(long, default_value = DEFAULT_SCHEMA_ROOT)]
    pub schemas: PathBuf,

    /// Recognized schema file extensions (comma-separated).
    #[arg(long = "schema-ext", value_delimiter = ',', default_values_t = default_schema_extensions())]
    pub schema_extensions: Vec<String>,

    /// Also compile every schema to check cross-references resolve.
    #[arg(long)]
    pub compile: bool,
}

impl SchemasArgs {
    /// Validate the arguments.
    pub fn validate(&self) -> Result<(), CliError> {
        validate_extensions(&self.schema_extensions)
    }
}

fn default_schema_extensions() -> Vec<String> {
    DEFAULT_SCHEMA_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

fn validate_manifest_ids(ids: &[String]) -> Result<(), CliError> {
    if ids.iter().any(|id| id.trim().is_empty()) {
        return Err(CliError::EmptyManifestId);
    }
    Ok(())
}

fn validate_extensions(extensions: &[String]) -> Result<(), CliError> {
    for ext in extensions {
        if ext.is_empty() || ext.starts_with('.') {
            return Err(CliError::InvalidSchemaExtension(ext.clone()));
        }
    }
    Ok(())
}

/// Parse CLI arguments from an iterator (for testing).
pub fn parse_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
