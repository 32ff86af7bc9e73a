//! `dtcg-conform` binary.
//!
//! Entry point for the design-token conformance runner.

use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use dtcg_cli::exit::{codes, exit_code};
use dtcg_cli::{
    execute_list, execute_run, execute_schemas, Cli, Command, CommandError, ListArgs, RunArgs,
    SchemasArgs, StderrLogger, Verbosity,
};
use dtcg_fs::RealFilesystem;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are reported as errors too
            if !e.use_stderr() {
                e.exit();
            }
            let _ = e.print();
            return ExitCode::from(codes::INVALID_ARGS as u8);
        }
    };
    if let Err(e) = cli.validate() {
        eprintln!("error: {}", e);
        return ExitCode::from(codes::INVALID_ARGS as u8);
    }

    let logger = StderrLogger::stderr(Verbosity::from_flags(cli.quiet, cli.verbose));

    let result = match cli.command {
        Command::Run(args) => run_run(args, &logger),
        Command::List(args) => run_list(args, &logger),
        Command::Schemas(args) => run_schemas(args, &logger),
    };

    match result {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(exit_code(&e) as u8)
        }
    }
}

/// Run the conformance suite.
fn run_run(args: RunArgs, logger: &StderrLogger) -> Result<i32, CommandError> {
    let fs = RealFilesystem;
    let result = execute_run(&args, &fs, logger, Utc::now())?;
    let summary = &result.summary;

    println!("{} {}", result.run.name, result.run.version);
    println!("  Total: {}", summary.total);
    println!("  Passed: {}", summary.passed);
    println!("  Failed: {}", summary.failed);
    println!("  Skipped: {}", summary.skipped);
    println!("  Errors: {}", summary.errors);
    if summary.manifest_errors > 0 {
        println!("  Sub-manifests not run: {}", summary.manifest_errors);
    }
    if let Some(path) = &result.report_path {
        println!("  Report: {}", path.display());
    }

    if summary.is_success() {
        Ok(codes::SUCCESS)
    } else {
        Ok(codes::CONFORMANCE_FAILURES)
    }
}

/// List declared cases.
fn run_list(args: ListArgs, logger: &StderrLogger) -> Result<i32, CommandError> {
    let fs = RealFilesystem;
    let result = execute_list(&args, &fs, logger)?;

    println!("{} {}", result.suite, result.version);
    for case in &result.cases {
        let note = match &case.skipped_by {
            Some(feature) => format!("  (skipped: {})", feature),
            None => String::new(),
        };
        println!(
            "  {}/{}  {}  {}{}",
            case.manifest_id,
            case.case_id,
            case.test_type.as_str(),
            case.input,
            note
        );
    }
    println!("{} cases, {} runnable", result.cases.len(), result.runnable());

    Ok(codes::SUCCESS)
}

/// List registered schemas.
fn run_schemas(args: SchemasArgs, logger: &StderrLogger) -> Result<i32, CommandError> {
    let fs = RealFilesystem;
    let result = execute_schemas(&args, &fs, logger)?;

    for schema in &result.schemas {
        println!("{}  {}  {}", schema.id, schema.uri, schema.path);
    }
    if result.compiled {
        println!("{} schemas compiled", result.schemas.len());
    }

    Ok(codes::SUCCESS)
}
