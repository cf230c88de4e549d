// file: src/client/documents.rs
// description: loads the document collection posted to /indexing

use crate::error::{HarnessError, Result};
use crate::utils::Validator;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads a JSON array of documents. Items are returned verbatim, in file order.
pub fn load_documents(path: &Path) -> Result<Vec<Value>> {
    Validator::validate_file_path(path)?;

    let content = fs::read_to_string(path).map_err(|e| HarnessError::FileOperation {
        path: path.to_path_buf(),
        source: e,
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|e| {
        HarnessError::Parse(format!("Invalid JSON in {}: {}", path.display(), e))
    })?;

    match value {
        Value::Array(documents) => {
            debug!("Loaded {} documents from {}", documents.len(), path.display());
            Ok(documents)
        }
        other => Err(HarnessError::Parse(format!(
            "Expected a JSON array of documents in {}, found {}",
            path.display(),
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
