// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A service endpoint answered with something other than 200 OK.
    #[error("{message} (POST {endpoint} returned {status})")]
    StatusAssertion {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Registry unreachable: {0}")]
    Network(String),

    #[error("Registry rejected credentials: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// True for failures of the 200 OK check against the service.
    pub fn is_status_assertion(&self) -> bool {
        matches!(self, HarnessError::StatusAssertion { .. })
    }
}
