//! Manifest and fixture types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Feature marker for cases that need reference resolution, type
/// inheritance or `$extends` expansion before schema validation is meaningful.
pub const PREPROCESSING_REQUIRED: &str = "preprocessing-required";

/// Top-level manifest enumerating the sub-specification suites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootManifest {
    pub name: String,
    pub description: String,
    pub version: String,
    pub manifests: Vec<ManifestDescriptor>,
}

/// Pointer from the root manifest to one sub-manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDescriptor {
    pub id: String,
    /// Path relative to the root manifest's directory.
    pub file: String,
    pub description: String,
}

/// Suite manifest for one sub-specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubManifest {
    pub name: String,
    pub description: String,
    pub version: String,
    /// Absolute schema URI, e.g. `https://designtokens.org/schemas/2025.10/format.json`.
    pub schema: String,
    pub tests: Vec<TestCase>,
}

/// Declared expectation of a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestType {
    #[serde(rename = "PositiveEvaluationTest")]
    Positive,
    #[serde(rename = "NegativeEvaluationTest")]
    Negative,
}

impl TestType {
    /// Whether the fixture is expected to validate.
    pub fn expects_valid(self) -> bool {
        match self {
            TestType::Positive => true,
            TestType::Negative => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TestType::Positive => "PositiveEvaluationTest",
            TestType::Negative => "NegativeEvaluationTest",
        }
    }
}

/// One conformance case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    #[serde(rename = "type")]
    pub test_type: TestType,
    pub name: String,
    pub purpose: String,
    /// Fixture path relative to the owning sub-manifest's directory.
    pub input: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl TestCase {
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    pub fn requires_preprocessing(&self) -> bool {
        self.has_feature(PREPROCESSING_REQUIRED)
    }
}

/// A sub-manifest together with where it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedManifest {
    pub descriptor: ManifestDescriptor,
    pub manifest: SubManifest,
    pub path: PathBuf,
    /// Base directory for the manifest's fixture paths.
    pub dir: PathBuf,
}

/// The full manifest tree for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSuite {
    pub root: RootManifest,
    pub root_path: PathBuf,
    pub manifests: Vec<LoadedManifest>,
}

impl LoadedSuite {
    /// Find a loaded sub-manifest by its root-manifest id.
    pub fn manifest(&self, id: &str) -> Option<&LoadedManifest> {
        self.manifests.iter().find(|m| m.descriptor.id == id)
    }

    /// Total number of declared cases across all sub-manifests.
    pub fn case_count(&self) -> usize {
        self.manifests.iter().map(|m| m.manifest.tests.len()).sum()
    }
}

/// A parsed fixture document.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub path: PathBuf,
    pub document: Value,
    /// Hex SHA-256 of the raw fixture bytes.
    pub sha256: String,
}
