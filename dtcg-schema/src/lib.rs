//! Design-token schema registry.
//!
//! Loads the versioned schema documents into an immutable [`SchemaStore`],
//! maps external schema URIs to registry keys, and defines the
//! [`SchemaEvaluator`] seam that the conformance runner validates through.

mod evaluator;
mod id;
mod store;

pub use evaluator::{EvaluatorError, JsonSchemaEvaluator, SchemaEvaluator, Verdict, Violation};
pub use id::{extract_schema_id, SchemaId, SchemaIdError};
pub use store::{SchemaDocument, SchemaStore, StoreError, DEFAULT_SCHEMA_EXTENSIONS};
