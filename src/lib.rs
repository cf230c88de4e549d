// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod client;
pub mod config;
pub mod error;
pub mod hub;
pub mod models;
pub mod utils;

pub use client::{ServiceClient, load_documents, run_delete, run_indexing, run_search};
pub use config::{Config, EnvelopeConfig, ModelConfig, QueryConfig, ServiceConfig};
pub use error::{HarnessError, Result};
pub use hub::{ArtifactKind, FetchReport, ModelFetcher};
pub use models::{Envelope, ServiceResponse};
pub use utils::Validator;
