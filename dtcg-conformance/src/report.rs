//! Machine-readable run report (`--report`).

use std::path::Path;

use chrono::{DateTime, Utc};
use dtcg_fs::{Filesystem, FsError};
use dtcg_schema::Violation;
use serde::{Deserialize, Serialize};

use crate::runner::{CaseOutcome, CaseResult, ManifestRun, SuiteRun};

/// Current report format version.
pub const REPORT_VERSION: u32 = 1;

/// Case counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Case-level integrity errors.
    pub errors: usize,
    /// Sub-manifests that could not run at all.
    pub manifest_errors: usize,
}

impl RunSummary {
    pub fn from_run(run: &SuiteRun) -> Self {
        let mut summary = Self::default();
        for manifest in &run.manifests {
            if manifest.error.is_some() {
                summary.manifest_errors += 1;
            }
            for case in &manifest.cases {
                summary.total += 1;
                match case.outcome {
                    CaseOutcome::Passed => summary.passed += 1,
                    CaseOutcome::Mismatch(_) => summary.failed += 1,
                    CaseOutcome::Skipped(_) => summary.skipped += 1,
                    CaseOutcome::Error(_) => summary.errors += 1,
                }
            }
        }
        summary
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errors == 0 && self.manifest_errors == 0
    }
}

/// Serializable report of a whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub report_version: u32,
    pub tool: String,
    pub tool_version: String,
    pub suite: String,
    pub suite_version: String,
    pub generated_at: String,
    pub summary: RunSummary,
    pub stopped_early: bool,
    pub manifests: Vec<ManifestReport>,
}

/// Report entry for one sub-manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestReport {
    pub id: String,
    pub name: String,
    pub schema: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub cases: Vec<CaseReport>,
}

/// Report entry for one case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub test_type: String,
    pub input: String,
    /// `passed`, `failed`, `skipped` or `error`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixture_sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub violations: Vec<Violation>,
}

impl RunReport {
    /// Build a report stamped with `generated_at`.
    pub fn new(run: &SuiteRun, generated_at: DateTime<Utc>) -> Self {
        Self {
            report_version: REPORT_VERSION,
            tool: env!("CARGO_PKG_NAME").to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            suite: run.name.clone(),
            suite_version: run.version.clone(),
            generated_at: generated_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            summary: RunSummary::from_run(run),
            stopped_early: run.stopped_early,
            manifests: run.manifests.iter().map(ManifestReport::from_run).collect(),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("RunReport serialization cannot fail")
    }

    /// Write the report, creating the parent directory if needed.
    pub fn write(&self, fs: &dyn Filesystem, path: &Path) -> Result<(), FsError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs.create_dir_all(parent)?;
            }
        }
        let mut json = self.to_json();
        json.push('\n');
        fs.write_atomic(path, json.as_bytes())
    }
}

impl ManifestReport {
    fn from_run(run: &ManifestRun) -> Self {
        Self {
            id: run.id.clone(),
            name: run.name.clone(),
            schema: run.schema.clone(),
            schema_id: run.schema_id.as_ref().map(ToString::to_string),
            error: run.error.as_ref().map(ToString::to_string),
            cases: run.cases.iter().map(CaseReport::from_result).collect(),
        }
    }
}

impl CaseReport {
    fn from_result(result: &CaseResult) -> Self {
        let (status, detail, violations) = match &result.outcome {
            CaseOutcome::Passed => ("passed", None, vec![]),
            CaseOutcome::Mismatch(diagnostic) => (
                "failed",
                Some(diagnostic.headline()),
                diagnostic.violations.clone(),
            ),
            CaseOutcome::Skipped(reason) => ("skipped", Some(reason.to_string()), vec![]),
            CaseOutcome::Error(error) => ("error", Some(error.to_string()), vec![]),
        };

        Self {
            id: result.case_id.clone(),
            name: result.name.clone(),
            test_type: result.test_type.as_str().to_string(),
            input: result.input.clone(),
            status: status.to_string(),
            fixture_sha256: result.fixture_sha256.clone(),
            detail,
            violations,
        }
    }
}
