// file: src/utils/validation.rs
// description: input validation helpers for config, documents and model ids
// reference: input validation patterns

use crate::error::{HarnessError, Result};
use std::fs;
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| HarnessError::FileOperation {
            path: path.to_path_buf(),
            source: e,
        })?;

        if !canonical.is_file() {
            return Err(HarnessError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    /// An existing path must be a directory; a missing one is created later.
    pub fn validate_output_dir(path: &Path) -> Result<()> {
        if path.exists() && !path.is_dir() {
            return Err(HarnessError::Validation(format!(
                "Output path exists and is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn validate_port(port: u16) -> Result<()> {
        if port == 0 {
            return Err(HarnessError::Validation("Port cannot be 0".to_string()));
        }
        Ok(())
    }

    pub fn validate_top_k(top_k: u16) -> Result<()> {
        if top_k == 0 {
            return Err(HarnessError::Validation(
                "top_k must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Hub ids are `name` or `owner/name`.
    pub fn validate_model_id(model_id: &str) -> Result<()> {
        let trimmed = model_id.trim();
        if trimmed.is_empty() {
            return Err(HarnessError::Validation(
                "Model id must not be empty".to_string(),
            ));
        }

        if trimmed != model_id || trimmed.chars().any(char::is_whitespace) {
            return Err(HarnessError::Validation(format!(
                "Model id contains whitespace: {:?}",
                model_id
            )));
        }

        let parts: Vec<&str> = model_id.split('/').collect();
        if parts.len() > 2 || parts.iter().any(|p| p.is_empty()) {
            return Err(HarnessError::Validation(format!(
                "Invalid model id format: {}",
                model_id
            )));
        }

        Ok(())
    }

    pub fn validate_content_not_empty(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(HarnessError::Validation("Content is empty".to_string()));
        }
        Ok(())
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((idx, _)) => format!("{}...", &text[..idx]),
            None => text.to_string(),
        }
    }
}
