//! Design-token conformance harness.
//!
//! This crate drives the conformance suite for the design-token format and
//! resolver specifications.
//!
//! # Overview
//!
//! 1. Load every schema document into an immutable [`SchemaStore`](dtcg_schema::SchemaStore)
//! 2. Load the root manifest and each sub-manifest it lists
//! 3. For every case, resolve its fixture, evaluate it against the
//!    sub-manifest's schema and compare the verdict with the declared type
//!
//! # Layout
//!
//! - `tests/manifest.json` - root manifest
//! - `tests/<suite-id>/manifest.json` - sub-manifest
//! - `tests/<suite-id>/positive/*.json` - fixtures expected valid
//! - `tests/<suite-id>/negative/*.json` - fixtures expected invalid
//! - `schemas/<version>/*.json` - schema documents, keyed by their `$id`
//!
//! Cases marked `preprocessing-required` are skipped: they only make sense
//! after alias resolution, type inheritance or `$extends` expansion.

pub mod config;
pub mod harness;
pub mod loader;
pub mod report;
pub mod runner;
pub mod types;

pub use config::{ConfigError, RunConfig, DEFAULT_SCHEMA_ROOT, DEFAULT_TESTS_MANIFEST};
pub use harness::{Harness, HarnessError};
pub use loader::{load_root, load_sub, load_suite, resolve_fixture, LoadError};
pub use report::{RunReport, RunSummary, REPORT_VERSION};
pub use runner::{
    check_verdict, run, run_case, run_manifest, CaseOutcome, CaseResult, Diagnostic,
    IntegrityError, ManifestRun, MismatchKind, SkipReason, SuiteRun,
};
pub use types::{
    Fixture, LoadedManifest, LoadedSuite, ManifestDescriptor, RootManifest, SubManifest, TestCase,
    TestType, PREPROCESSING_REQUIRED,
};
