//! Manifest loading and fixture resolution.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use dtcg_fs::{Filesystem, FsError};
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use crate::types::{Fixture, LoadedManifest, LoadedSuite, RootManifest, SubManifest};

/// Errors that can occur when loading manifests or fixtures.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {what} {path}: {source}")]
    Read {
        what: String,
        path: String,
        #[source]
        source: FsError,
    },

    #[error("failed to parse {what} {path}: {source}")]
    Json {
        what: String,
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate manifest id {id:?} in {path}")]
    DuplicateManifestId { id: String, path: String },
}

impl LoadError {
    /// The file the error refers to.
    pub fn path(&self) -> &str {
        match self {
            LoadError::Read { path, .. }
            | LoadError::Json { path, .. }
            | LoadError::DuplicateManifestId { path, .. } => path,
        }
    }
}

/// Load the root manifest.
pub fn load_root(fs: &dyn Filesystem, path: &Path) -> Result<RootManifest, LoadError> {
    let root: RootManifest = load_json(fs, path, "root manifest")?;

    let mut seen = HashSet::new();
    for descriptor in &root.manifests {
        if !seen.insert(descriptor.id.as_str()) {
            return Err(LoadError::DuplicateManifestId {
                id: descriptor.id.clone(),
                path: path.display().to_string(),
            });
        }
    }

    Ok(root)
}

/// Load one sub-manifest.
pub fn load_sub(fs: &dyn Filesystem, path: &Path) -> Result<SubManifest, LoadError> {
    load_sub_as(fs, path, "sub-manifest")
}

/// Load a sub-manifest, naming it `what` in errors.
fn load_sub_as(fs: &dyn Filesystem, path: &Path, what: &str) -> Result<SubManifest, LoadError> {
    load_json(fs, path, what)
}

/// Load the root manifest and every sub-manifest it references.
///
/// Sub-manifest `file` paths are resolved against the root manifest's
/// directory. Any failure aborts the whole load.
pub fn load_suite(fs: &dyn Filesystem, root_path: &Path) -> Result<LoadedSuite, LoadError> {
    let root = load_root(fs, root_path)?;
    let root_dir = parent_dir(root_path);

    let mut manifests = Vec::with_capacity(root.manifests.len());
    for descriptor in &root.manifests {
        let path = root_dir.join(&descriptor.file);
        let manifest = load_sub_as(fs, &path, &format!("sub-manifest {:?}", descriptor.id))?;
        let dir = parent_dir(&path);

        manifests.push(LoadedManifest {
            descriptor: descriptor.clone(),
            manifest,
            path,
            dir,
        });
    }

    Ok(LoadedSuite {
        root,
        root_path: root_path.to_path_buf(),
        manifests,
    })
}

/// Resolve a fixture path relative to `base_dir` and parse it.
///
/// The fixture's shape is not checked here; that is the evaluator's job.
pub fn resolve_fixture(
    fs: &dyn Filesystem,
    base_dir: &Path,
    relative: &str,
) -> Result<Fixture, LoadError> {
    let path = base_dir.join(relative);
    let bytes = fs.read_bytes(&path).map_err(|e| LoadError::Read {
        what: "fixture".to_string(),
        path: path.display().to_string(),
        source: e,
    })?;

    let document = serde_json::from_slice(&bytes).map_err(|e| LoadError::Json {
        what: "fixture".to_string(),
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(Fixture {
        sha256: compute_sha256(&bytes),
        path,
        document,
    })
}

fn load_json<T: DeserializeOwned>(fs: &dyn Filesystem, path: &Path, what: &str) -> Result<T, LoadError> {
    let content = fs.read_file(path).map_err(|e| LoadError::Read {
        what: what.to_string(),
        path: path.display().to_string(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| LoadError::Json {
        what: what.to_string(),
        path: path.display().to_string(),
        source: e,
    })
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Compute SHA256 hash of data, returning hex string.
fn compute_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
