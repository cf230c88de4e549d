// file: src/models/mod.rs
// description: request envelopes and service response models
// reference: internal module structure

pub mod envelope;
pub mod output;

pub use envelope::{DeleteRequest, Envelope, IndexingRequest, Query, SearchRequest};
pub use output::{DeleteOutput, IndexingOutput, RelatedDocument, SearchOutput, ServiceResponse};
