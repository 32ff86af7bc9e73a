//! Run command orchestration.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use dtcg_conformance::{CaseOutcome, Harness, RunReport, RunSummary, SuiteRun};
use dtcg_fs::Filesystem;

use crate::cli::RunArgs;
use crate::logger::Logger;

use super::{CommandError, CommandResult};

/// Result of run command execution.
#[derive(Debug)]
pub struct RunResult {
    pub run: SuiteRun,
    pub summary: RunSummary,
    /// Where the JSON report was written, if requested.
    pub report_path: Option<PathBuf>,
}

/// Execute the run command.
///
/// Conformance failures are not an error here; callers inspect
/// `summary.is_success()`.
pub fn execute_run<F, L>(
    args: &RunArgs,
    fs: &F,
    logger: &L,
    now: DateTime<Utc>,
) -> CommandResult<RunResult>
where
    F: Filesystem,
    L: Logger,
{
    let config = args.to_config()?;

    logger.debug(&format!("loading schemas from {}", config.schema_root.display()));
    logger.debug(&format!("loading manifests from {}", config.tests_manifest.display()));
    let harness = Harness::load(fs, &config)?;
    logger.verbose(&format!(
        "loaded {} schemas and {} cases in {} sub-manifests",
        harness.store.len(),
        harness.suite.case_count(),
        harness.suite.manifests.len()
    ));

    let run = harness.run(fs, &config);
    log_run(&run, logger);

    let summary = RunSummary::from_run(&run);

    let report_path = match &args.report {
        Some(path) => {
            RunReport::new(&run, now)
                .write(fs, path)
                .map_err(|e| CommandError::Report {
                    path: path.display().to_string(),
                    source: e,
                })?;
            logger.verbose(&format!("wrote report to {}", path.display()));
            Some(path.clone())
        }
        None => None,
    };

    Ok(RunResult {
        run,
        summary,
        report_path,
    })
}

/// Log one line per case; failures also get their diagnostic.
fn log_run<L: Logger>(run: &SuiteRun, logger: &L) {
    for manifest in &run.manifests {
        if let Some(error) = &manifest.error {
            logger.error(&format!("ERROR {}: {}", manifest.id, error));
            continue;
        }

        for case in &manifest.cases {
            let label = format!("{}/{}", case.manifest_id, case.case_id);
            match &case.outcome {
                CaseOutcome::Passed => logger.verbose(&format!("PASS  {}", label)),
                CaseOutcome::Skipped(reason) => {
                    logger.verbose(&format!("SKIP  {} ({})", label, reason))
                }
                CaseOutcome::Mismatch(diagnostic) => {
                    logger.info(&format!("FAIL  {}: {}", label, diagnostic.headline()));
                    for line in diagnostic.to_string().lines() {
                        logger.info(&format!("      {}", line));
                    }
                }
                CaseOutcome::Error(error) => logger.error(&format!("ERROR {}: {}", label, error)),
            }
        }
    }

    if run.stopped_early {
        logger.info("stopped after first failure (--fail-fast)");
    }
}
