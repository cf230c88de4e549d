// file: src/hub/mod.rs
// description: model hub provisioning module exports
// reference: internal module structure

pub mod artifacts;
pub mod fetcher;
pub mod progress;

pub use artifacts::{Artifact, ArtifactKind, select_artifacts};
pub use fetcher::{FetchReport, ModelFetcher, SavedArtifact, copy_artifact};
pub use progress::DownloadProgress;
