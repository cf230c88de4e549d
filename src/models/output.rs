// file: src/models/output.rs
// description: HTTP response wrapper and typed views of service outputs
// reference: service wire format for /indexing, /search and /delete

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status, raw text and parsed body of one service call.
#[derive(Debug, Clone)]
pub struct ServiceResponse {
    pub status: u16,
    pub text: String,
    pub body: Value,
}

impl ServiceResponse {
    /// Body with 2-space indent, non-ASCII kept as-is.
    pub fn pretty_body(&self) -> String {
        serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| self.text.clone())
    }

    /// Best-effort typed view; `None` when the service answers another shape.
    pub fn decode<T: for<'de> Deserialize<'de>>(&self) -> Option<T> {
        serde_json::from_value(self.body.clone()).ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingOutput {
    pub group_id: String,
    pub user_id: String,
    pub session_id: String,
    pub save_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedDocument {
    pub document_id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutput {
    pub group_id: String,
    pub user_id: String,
    pub session_id: String,
    #[serde(default)]
    pub related_documents: Vec<RelatedDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteOutput {
    pub group_id: String,
    pub user_id: String,
    pub session_id: String,
    pub deleted: bool,
}
