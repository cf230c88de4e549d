// file: src/client/mod.rs
// description: integration-test client for the search service
// reference: internal module structure

pub mod documents;
pub mod service;

pub use documents::load_documents;
pub use service::{ServiceClient, run_delete, run_indexing, run_search};
