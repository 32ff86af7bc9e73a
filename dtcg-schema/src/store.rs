//! Schema Store: the immutable registry of schema documents.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dtcg_fs::{Filesystem, FsError};
use serde_json::Value;

use crate::id::{extract_schema_id, SchemaId, SchemaIdError};

/// File extensions recognized as schema documents by default.
pub const DEFAULT_SCHEMA_EXTENSIONS: &[&str] = &["json"];

/// Errors that can occur while building the schema store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to walk schema directory {dir}: {source}")]
    Walk {
        dir: String,
        #[source]
        source: FsError,
    },

    #[error("failed to read schema document {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: FsError,
    },

    #[error("failed to parse schema document {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("schema document {path} has no string \"$id\"")]
    MissingId { path: String },

    #[error("schema document {path} declares an unusable \"$id\": {source}")]
    InvalidId {
        path: String,
        #[source]
        source: SchemaIdError,
    },

    #[error("duplicate schema id {id}: declared by {first} and {second}")]
    DuplicateId {
        id: SchemaId,
        first: String,
        second: String,
    },
}

/// A registered schema document.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    /// Registry key derived from `uri`.
    pub id: SchemaId,
    /// The document's own `$id`.
    pub uri: String,
    /// Where the document was loaded from.
    pub path: PathBuf,
    pub contents: Value,
}

/// Registry of schema documents keyed by [`SchemaId`].
///
/// Built once and never mutated afterwards, so a shared reference can be
/// handed to any number of readers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaStore {
    documents: BTreeMap<SchemaId, SchemaDocument>,
}

impl SchemaStore {
    /// Load every schema document below `root_dir`.
    ///
    /// Files whose extension is not in `extensions` are ignored. Each
    /// document is keyed by the id extracted from its embedded `$id`, not by
    /// its file name.
    pub fn load(
        fs: &dyn Filesystem,
        root_dir: &Path,
        extensions: &[&str],
    ) -> Result<Self, StoreError> {
        let files = fs.walk_files(root_dir).map_err(|e| StoreError::Walk {
            dir: root_dir.display().to_string(),
            source: e,
        })?;

        let mut documents = Vec::new();
        for path in files {
            let recognized = path
                .extension()
                .and_then(|e| e.to_str())
                .map_or(false, |e| extensions.contains(&e));
            if !recognized {
                continue;
            }

            let content = fs.read_file(&path).map_err(|e| StoreError::Read {
                path: path.display().to_string(),
                source: e,
            })?;
            let contents: Value =
                serde_json::from_str(&content).map_err(|e| StoreError::Parse {
                    path: path.display().to_string(),
                    source: e,
                })?;
            documents.push((path, contents));
        }

        Self::from_documents(documents)
    }

    /// Build a store from already-parsed documents.
    pub fn from_documents(
        documents: impl IntoIterator<Item = (PathBuf, Value)>,
    ) -> Result<Self, StoreError> {
        let mut store = Self::default();
        for (path, contents) in documents {
            store.register(path, contents)?;
        }
        Ok(store)
    }

    fn register(&mut self, path: PathBuf, contents: Value) -> Result<(), StoreError> {
        let uri = contents
            .get("$id")
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::MissingId {
                path: path.display().to_string(),
            })?
            .to_string();

        let id = extract_schema_id(&uri).map_err(|e| StoreError::InvalidId {
            path: path.display().to_string(),
            source: e,
        })?;

        if let Some(existing) = self.documents.get(&id) {
            return Err(StoreError::DuplicateId {
                id,
                first: existing.path.display().to_string(),
                second: path.display().to_string(),
            });
        }

        self.documents.insert(
            id.clone(),
            SchemaDocument {
                id,
                uri,
                path,
                contents,
            },
        );
        Ok(())
    }

    /// Look up a schema by registry key.
    pub fn lookup(&self, id: &SchemaId) -> Option<&SchemaDocument> {
        self.documents.get(id)
    }

    /// Iterate over all documents in id order.
    pub fn documents(&self) -> impl Iterator<Item = &SchemaDocument> {
        self.documents.values()
    }

    /// All registered ids in order.
    pub fn ids(&self) -> Vec<&SchemaId> {
        self.documents.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtcg_fs::MockFilesystem;
    use serde_json::json;

    fn schema_fs() -> MockFilesystem {
        let fs = MockFilesystem::new();
        fs.add_file(
            "/schemas/2025.10/format.json",
            json!({"$id": "https://designtokens.org/schemas/2025.10/format.json", "type": "object"})
                .to_string(),
        );
        fs.add_file(
            "/schemas/2025.10/color.json",
            json!({"$id": "https://designtokens.org/schemas/2025.10/color.json", "type": "object"})
                .to_string(),
        );
        fs
    }

    fn id(s: &str) -> SchemaId {
        extract_schema_id(s).unwrap()
    }

    #[test]
    fn test_load_registers_by_embedded_id() {
        let fs = schema_fs();
        // File name disagrees with $id; the $id wins
        fs.add_file(
            "/schemas/2025.10/renamed-file.json",
            json!({"$id": "https://designtokens.org/schemas/2025.10/resolver.json"}).to_string(),
        );

        let store = SchemaStore::load(&fs, Path::new("/schemas"), DEFAULT_SCHEMA_EXTENSIONS).unwrap();
        assert_eq!(store.len(), 3);

        let doc = store.lookup(&id("schemas/2025.10/resolver.json")).unwrap();
        assert_eq!(doc.path, PathBuf::from("/schemas/2025.10/renamed-file.json"));
        assert_eq!(doc.uri, "https://designtokens.org/schemas/2025.10/resolver.json");
    }

    #[test]
    fn test_lookup_unknown_id() {
        let store = SchemaStore::load(&schema_fs(), Path::new("/schemas"), DEFAULT_SCHEMA_EXTENSIONS).unwrap();
        assert!(store.lookup(&id("schemas/2025.10/missing.json")).is_none());
    }

    #[test]
    fn test_load_ignores_unrecognized_extensions() {
        let fs = schema_fs();
        fs.add_file("/schemas/README.md", "# schemas");
        fs.add_file("/schemas/2025.10/notes.txt", "not json");

        let store = SchemaStore::load(&fs, Path::new("/schemas"), DEFAULT_SCHEMA_EXTENSIONS).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_load_duplicate_id_fails() {
        let fs = schema_fs();
        fs.add_file(
            "/schemas/2025.10/zz-copy.json",
            json!({"$id": "https://mirror.example/schemas/2025.10/format.json"}).to_string(),
        );

        let result = SchemaStore::load(&fs, Path::new("/schemas"), DEFAULT_SCHEMA_EXTENSIONS);
        match result {
            Err(StoreError::DuplicateId { id, first, second }) => {
                assert_eq!(id.as_str(), "schemas/2025.10/format.json");
                assert_eq!(first, "/schemas/2025.10/format.json");
                assert_eq!(second, "/schemas/2025.10/zz-copy.json");
            }
            other => panic!("expected DuplicateId, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_id_fails() {
        let fs = schema_fs();
        fs.add_file("/schemas/2025.10/anon.json", r#"{"type":"string"}"#);

        let result = SchemaStore::load(&fs, Path::new("/schemas"), DEFAULT_SCHEMA_EXTENSIONS);
        assert!(matches!(result, Err(StoreError::MissingId { path }) if path.contains("anon.json")));
    }

    #[test]
    fn test_load_malformed_id_fails() {
        let fs = schema_fs();
        fs.add_file("/schemas/2025.10/odd.json", r#"{"$id":"urn:odd"}"#);

        let result = SchemaStore::load(&fs, Path::new("/schemas"), DEFAULT_SCHEMA_EXTENSIONS);
        assert!(matches!(result, Err(StoreError::InvalidId { .. })));
    }

    #[test]
    fn test_load_invalid_json_names_path() {
        let fs = schema_fs();
        fs.add_file("/schemas/2025.10/broken.json", "{ nope");

        let err = SchemaStore::load(&fs, Path::new("/schemas"), DEFAULT_SCHEMA_EXTENSIONS).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert!(err.to_string().contains("/schemas/2025.10/broken.json"));
    }

    #[test]
    fn test_load_missing_root_dir() {
        let result = SchemaStore::load(&MockFilesystem::new(), Path::new("/nowhere"), DEFAULT_SCHEMA_EXTENSIONS);
        assert!(matches!(result, Err(StoreError::Walk { .. })));
    }

    #[test]
    fn test_load_twice_is_idempotent() {
        let fs = schema_fs();
        let a = SchemaStore::load(&fs, Path::new("/schemas"), DEFAULT_SCHEMA_EXTENSIONS).unwrap();
        let b = SchemaStore::load(&fs, Path::new("/schemas"), DEFAULT_SCHEMA_EXTENSIONS).unwrap();

        assert_eq!(a.ids(), b.ids());
        for doc in a.documents() {
            assert_eq!(Some(doc), b.lookup(&doc.id));
        }
    }

    #[test]
    fn test_ids_are_sorted() {
        let store = SchemaStore::load(&schema_fs(), Path::new("/schemas"), DEFAULT_SCHEMA_EXTENSIONS).unwrap();
        let ids: Vec<&str> = store.ids().into_iter().map(SchemaId::as_str).collect();
        assert_eq!(ids, vec!["schemas/2025.10/color.json", "schemas/2025.10/format.json"]);
    }
}
