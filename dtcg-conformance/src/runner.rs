//! Conformance runner: evaluates every selected case and compares the
//! verdict with its declared expectation.

use std::fmt;

use dtcg_fs::Filesystem;
use dtcg_schema::{
    extract_schema_id, EvaluatorError, SchemaDocument, SchemaEvaluator, SchemaId, SchemaIdError,
    SchemaStore, Verdict, Violation,
};
use serde_json::Value;

use crate::config::RunConfig;
use crate::loader::{resolve_fixture, LoadError};
use crate::types::{LoadedManifest, LoadedSuite, TestCase, TestType};

/// Suite-integrity defects: the harness could not evaluate a case (or a
/// whole sub-manifest) at all. Distinct from expectation mismatches.
#[derive(Debug, thiserror::Error)]
pub enum IntegrityError {
    #[error(transparent)]
    SchemaId(#[from] SchemaIdError),

    #[error("Schema not found: {0}")]
    SchemaNotFound(SchemaId),

    #[error(transparent)]
    Fixture(#[from] LoadError),

    #[error("evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),
}

/// Why a case was not evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The case carries a feature excluded from pure-schema runs.
    Feature(String),
    /// The case did not match the configured include patterns.
    Filtered,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Feature(feature) => write!(f, "requires {}", feature),
            SkipReason::Filtered => f.write_str("not selected"),
        }
    }
}

/// Which part of the expectation a failing case violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    /// Observed validity differs from the declared test type.
    Verdict,
    /// A negative case was rejected but no violation was reported.
    NoViolations,
}

/// Everything needed to understand one expectation mismatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: MismatchKind,
    pub test_name: String,
    pub purpose: String,
    pub schema_id: SchemaId,
    pub expected_valid: bool,
    pub actual_valid: bool,
    /// Pretty-printed fixture document.
    pub fixture: String,
    pub violations: Vec<Violation>,
}

impl Diagnostic {
    fn new(case: &TestCase, schema_id: &SchemaId, document: &Value, verdict: Verdict, kind: MismatchKind) -> Self {
        Self {
            kind,
            test_name: case.name.clone(),
            purpose: case.purpose.clone(),
            schema_id: schema_id.clone(),
            expected_valid: case.test_type.expects_valid(),
            actual_valid: verdict.valid,
            fixture: serde_json::to_string_pretty(document).unwrap_or_else(|_| document.to_string()),
            violations: verdict.violations,
        }
    }

    /// One-line summary of the mismatch.
    pub fn headline(&self) -> String {
        match self.kind {
            MismatchKind::Verdict => format!(
                "expected {} but schema reported {}",
                verdict_word(self.expected_valid),
                verdict_word(self.actual_valid)
            ),
            MismatchKind::NoViolations => {
                "expected invalid with violations, but schema reported invalid with no violations"
                    .to_string()
            }
        }
    }
}

fn verdict_word(valid: bool) -> &'static str {
    if valid {
        "valid"
    } else {
        "invalid"
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Test: {}", self.test_name)?;
        writeln!(f, "Purpose: {}", self.purpose)?;
        writeln!(f, "Schema: {}", self.schema_id)?;
        writeln!(f, "Expected: {}", verdict_word(self.expected_valid))?;
        writeln!(f, "Actual: {}", verdict_word(self.actual_valid))?;
        writeln!(f, "Reason: {}", self.headline())?;
        writeln!(f, "Fixture:")?;
        for line in self.fixture.lines() {
            writeln!(f, "  {}", line)?;
        }
        if self.violations.is_empty() {
            write!(f, "Violations: none")
        } else {
            write!(f, "Violations:")?;
            for violation in &self.violations {
                write!(f, "\n  - {}", violation)?;
            }
            Ok(())
        }
    }
}

/// Outcome of one case.
#[derive(Debug)]
pub enum CaseOutcome {
    Passed,
    Mismatch(Box<Diagnostic>),
    Skipped(SkipReason),
    Error(IntegrityError),
}

/// Result of one case.
#[derive(Debug)]
pub struct CaseResult {
    pub manifest_id: String,
    pub case_id: String,
    pub name: String,
    pub test_type: TestType,
    pub input: String,
    /// Present whenever the fixture was read.
    pub fixture_sha256: Option<String>,
    pub outcome: CaseOutcome,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, CaseOutcome::Passed)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, CaseOutcome::Skipped(_))
    }

    /// Failed or errored.
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, CaseOutcome::Mismatch(_) | CaseOutcome::Error(_))
    }
}

/// Result of one sub-manifest.
#[derive(Debug)]
pub struct ManifestRun {
    pub id: String,
    pub name: String,
    pub schema: String,
    /// Set once the schema URI was extracted.
    pub schema_id: Option<SchemaId>,
    /// Set when the sub-manifest could not run at all; `cases` is then empty.
    pub error: Option<IntegrityError>,
    pub cases: Vec<CaseResult>,
}

impl ManifestRun {
    fn has_failure(&self) -> bool {
        self.error.is_some() || self.cases.iter().any(CaseResult::is_failure)
    }
}

/// Result of a whole run.
#[derive(Debug)]
pub struct SuiteRun {
    pub name: String,
    pub version: String,
    pub manifests: Vec<ManifestRun>,
    /// True when fail-fast stopped the run before every case was visited.
    pub stopped_early: bool,
}

impl SuiteRun {
    /// Every case result in run order.
    pub fn cases(&self) -> impl Iterator<Item = &CaseResult> {
        self.manifests.iter().flat_map(|m| m.cases.iter())
    }

    /// True when nothing failed or errored.
    pub fn is_success(&self) -> bool {
        !self.manifests.iter().any(ManifestRun::has_failure)
    }
}

/// Run every selected case of `suite`.
///
/// Sub-manifest level integrity errors (bad schema URI, unknown schema) are
/// recorded on that [`ManifestRun`] and its cases are not run. Case failures
/// never stop sibling cases unless `config.fail_fast` is set.
pub fn run(
    suite: &LoadedSuite,
    store: &SchemaStore,
    evaluator: &dyn SchemaEvaluator,
    fs: &dyn Filesystem,
    config: &RunConfig,
) -> SuiteRun {
    let mut manifests = Vec::new();
    let mut stopped_early = false;

    for loaded in &suite.manifests {
        if !config.selects_manifest(&loaded.descriptor.id) {
            continue;
        }

        let manifest_run = run_manifest(loaded, store, evaluator, fs, config);
        let failed = manifest_run.has_failure();
        manifests.push(manifest_run);

        if failed && config.fail_fast {
            stopped_early = true;
            break;
        }
    }

    SuiteRun {
        name: suite.root.name.clone(),
        version: suite.root.version.clone(),
        manifests,
        stopped_early,
    }
}

/// Run one sub-manifest.
pub fn run_manifest(
    loaded: &LoadedManifest,
    store: &SchemaStore,
    evaluator: &dyn SchemaEvaluator,
    fs: &dyn Filesystem,
    config: &RunConfig,
) -> ManifestRun {
    let mut manifest_run = ManifestRun {
        id: loaded.descriptor.id.clone(),
        name: loaded.manifest.name.clone(),
        schema: loaded.manifest.schema.clone(),
        schema_id: None,
        error: None,
        cases: Vec::new(),
    };

    // Resolve the schema before any case runs
    let schema_id = match extract_schema_id(&loaded.manifest.schema) {
        Ok(id) => id,
        Err(e) => {
            manifest_run.error = Some(e.into());
            return manifest_run;
        }
    };
    manifest_run.schema_id = Some(schema_id.clone());

    let Some(schema) = store.lookup(&schema_id) else {
        manifest_run.error = Some(IntegrityError::SchemaNotFound(schema_id));
        return manifest_run;
    };

    for case in &loaded.manifest.tests {
        let result = run_case(loaded, case, schema, evaluator, fs, config);
        let failed = result.is_failure();
        manifest_run.cases.push(result);

        if failed && config.fail_fast {
            break;
        }
    }

    manifest_run
}

/// Run one case against an already-resolved schema.
pub fn run_case(
    loaded: &LoadedManifest,
    case: &TestCase,
    schema: &SchemaDocument,
    evaluator: &dyn SchemaEvaluator,
    fs: &dyn Filesystem,
    config: &RunConfig,
) -> CaseResult {
    let mut result = CaseResult {
        manifest_id: loaded.descriptor.id.clone(),
        case_id: case.id.clone(),
        name: case.name.clone(),
        test_type: case.test_type,
        input: case.input.clone(),
        fixture_sha256: None,
        outcome: CaseOutcome::Passed,
    };

    if let Some(feature) = config.skip_feature(case) {
        result.outcome = CaseOutcome::Skipped(SkipReason::Feature(feature.to_string()));
        return result;
    }
    if !config.selects_case(&loaded.descriptor.id, case) {
        result.outcome = CaseOutcome::Skipped(SkipReason::Filtered);
        return result;
    }

    let fixture = match resolve_fixture(fs, &loaded.dir, &case.input) {
        Ok(fixture) => fixture,
        Err(e) => {
            result.outcome = CaseOutcome::Error(e.into());
            return result;
        }
    };
    result.fixture_sha256 = Some(fixture.sha256.clone());

    let verdict = match evaluator.evaluate(schema, &fixture.document) {
        Ok(verdict) => verdict,
        Err(e) => {
            result.outcome = CaseOutcome::Error(e.into());
            return result;
        }
    };

    result.outcome = match check_verdict(case.test_type, &verdict) {
        None => CaseOutcome::Passed,
        Some(kind) => CaseOutcome::Mismatch(Box::new(Diagnostic::new(
            case,
            &schema.id,
            &fixture.document,
            verdict,
            kind,
        ))),
    };
    result
}

/// Compare a verdict with the declared expectation.
///
/// Negative cases must be rejected with at least one violation.
pub fn check_verdict(test_type: TestType, verdict: &Verdict) -> Option<MismatchKind> {
    if verdict.valid != test_type.expects_valid() {
        return Some(MismatchKind::Verdict);
    }
    match test_type {
        TestType::Positive => None,
        TestType::Negative if verdict.violations.is_empty() => Some(MismatchKind::NoViolations),
        TestType::Negative => None,
    }
}
