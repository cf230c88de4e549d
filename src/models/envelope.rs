// file: src/models/envelope.rs
// description: JSON request bodies posted to the search service
// reference: service wire format for /indexing, /search and /delete

use crate::config::{EnvelopeConfig, QueryConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Session identifiers shared by every request of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub group_id: String,
    pub user_id: String,
    pub session_id: String,
}

impl From<&EnvelopeConfig> for Envelope {
    fn from(config: &EnvelopeConfig) -> Self {
        Self {
            group_id: config.group_id.clone(),
            user_id: config.user_id.clone(),
            session_id: config.session_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingRequest {
    #[serde(flatten)]
    pub envelope: Envelope,

    /// Passed through untouched; the service owns the document schema.
    pub documents: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub query_id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(flatten)]
    pub envelope: Envelope,
    pub query: Query,
    pub top_k: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    #[serde(flatten)]
    pub envelope: Envelope,
    pub document_id: String,
}

impl IndexingRequest {
    pub fn new(envelope: Envelope, documents: Vec<Value>) -> Self {
        Self {
            envelope,
            documents,
        }
    }
}

impl SearchRequest {
    pub fn new(envelope: Envelope, query: &QueryConfig) -> Self {
        Self {
            envelope,
            query: Query {
                query_id: query.query_id.clone(),
                text: query.text.clone(),
            },
            top_k: query.top_k,
        }
    }
}

impl DeleteRequest {
    pub fn new(envelope: Envelope, document_id: impl Into<String>) -> Self {
        Self {
            envelope,
            document_id: document_id.into(),
        }
    }
}
