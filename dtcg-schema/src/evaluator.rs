//! Schema Evaluator seam and its `jsonschema` implementation.
//!
//! The harness never evaluates JSON Schema itself. It asks a
//! [`SchemaEvaluator`] for a [`Verdict`], and the default implementation
//! delegates to the `jsonschema` crate (draft 2020-12, format assertions on).

use std::collections::BTreeMap;
use std::fmt;

use jsonschema::{Resource, Validator};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::SchemaId;
use crate::store::{SchemaDocument, SchemaStore};

/// Errors raised by the evaluation capability itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluatorError {
    #[error("failed to register schema resource {uri}: {message}")]
    Resource { uri: String, message: String },

    #[error("failed to compile schema {id}: {message}")]
    Compile { id: SchemaId, message: String },

    #[error("no compiled validator for schema {0}")]
    NotCompiled(SchemaId),
}

/// One reason a document failed evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// JSON pointer into the instance; empty for the document root.
    pub instance_path: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.instance_path.is_empty() {
            "(root)"
        } else {
            self.instance_path.as_str()
        };
        write!(f, "{}: {}", path, self.message)?;
        if let Some(params) = &self.params {
            write!(f, " {}", Value::Object(params.clone()))?;
        }
        Ok(())
    }
}

/// Outcome of evaluating one document against one schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

impl Verdict {
    pub fn valid() -> Self {
        Self {
            valid: true,
            violations: vec![],
        }
    }

    pub fn invalid(violations: Vec<Violation>) -> Self {
        Self {
            valid: false,
            violations,
        }
    }
}

/// Trait for schema evaluation.
/// Abstracted so the runner can be tested against scripted verdicts.
pub trait SchemaEvaluator: Send + Sync {
    /// Evaluate `instance` against `schema`.
    fn evaluate(&self, schema: &SchemaDocument, instance: &Value) -> Result<Verdict, EvaluatorError>;
}

/// [`SchemaEvaluator`] backed by compiled `jsonschema` validators.
///
/// Every store document is registered as a resource under its `$id` before
/// any validator is compiled, so cross-document `$ref`s resolve without
/// network access.
pub struct JsonSchemaEvaluator {
    validators: BTreeMap<SchemaId, Validator>,
}

impl JsonSchemaEvaluator {
    /// Compile one validator per document in `store`.
    pub fn from_store(store: &SchemaStore) -> Result<Self, EvaluatorError> {
        let shared = resources(store)?;
        let mut validators = BTreeMap::new();
        for doc in store.documents() {
            let validator = jsonschema::draft202012::options()
                .should_validate_formats(true)
                .with_resources(shared.iter().cloned())
                .build(&doc.contents)
                .map_err(|e| EvaluatorError::Compile {
                    id: doc.id.clone(),
                    message: e.to_string(),
                })?;
            validators.insert(doc.id.clone(), validator);
        }
        Ok(Self { validators })
    }

    /// Number of compiled validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for JsonSchemaEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaEvaluator")
            .field("schemas", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SchemaEvaluator for JsonSchemaEvaluator {
    fn evaluate(&self, schema: &SchemaDocument, instance: &Value) -> Result<Verdict, EvaluatorError> {
        let validator = self
            .validators
            .get(&schema.id)
            .ok_or_else(|| EvaluatorError::NotCompiled(schema.id.clone()))?;

        let violations: Vec<Violation> = validator
            .iter_errors(instance)
            .map(|error| {
                let schema_path = error.schema_path.to_string();
                let keyword = schema_path.rsplit('/').next().unwrap_or_default().to_string();

                let mut params = Map::new();
                if !keyword.is_empty() {
                    params.insert("keyword".to_string(), Value::String(keyword));
                }
                params.insert("schemaPath".to_string(), Value::String(schema_path));

                Violation {
                    instance_path: error.instance_path.to_string(),
                    message: error.to_string(),
                    params: Some(params),
                }
            })
            .collect();

        if violations.is_empty() {
            Ok(Verdict::valid())
        } else {
            Ok(Verdict::invalid(violations))
        }
    }
}

/// Every store document as a `jsonschema` resource keyed by its `$id`.
fn resources(store: &SchemaStore) -> Result<Vec<(String, Resource)>, EvaluatorError> {
    store
        .documents()
        .map(|doc| {
            Resource::from_contents(doc.contents.clone())
                .map(|resource| (doc.uri.clone(), resource))
                .map_err(|e| EvaluatorError::Resource {
                    uri: doc.uri.clone(),
                    message: e.to_string(),
                })
        })
        .collect()
}
