// file: src/hub/fetcher.rs
// description: downloads a tokenizer and embedding model from the Hugging Face Hub
// reference: https://docs.rs/hf-hub

use crate::config::ModelConfig;
use crate::error::{HarnessError, Result};
use crate::hub::artifacts::{ArtifactKind, select_artifacts};
use crate::hub::progress::{DownloadProgress, format_size};
use crate::utils::Validator;
use hf_hub::api::tokio::{Api, ApiBuilder, ApiError};
use hf_hub::{Repo, RepoType};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize)]
pub struct SavedArtifact {
    pub filename: String,
    pub kind: ArtifactKind,
    pub bytes: u64,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchReport {
    pub model_id: String,
    pub revision: String,
    pub commit_sha: String,
    pub output_dir: PathBuf,
    pub files: Vec<SavedArtifact>,
}

impl FetchReport {
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.bytes).sum()
    }

    pub fn count(&self, kind: ArtifactKind) -> usize {
        self.files.iter().filter(|f| f.kind == kind).count()
    }
}

pub struct ModelFetcher {
    api: Api,
    authenticated: bool,
    show_progress: bool,
    colored: bool,
}

impl ModelFetcher {
    /// Without a token the hub client falls back to the locally cached login.
    pub fn new(token: Option<String>, cache_dir: Option<PathBuf>) -> Result<Self> {
        let mut builder = ApiBuilder::new().with_progress(false);

        let token = token.filter(|t| !t.trim().is_empty());
        let authenticated = token.is_some();
        if authenticated {
            builder = builder.with_token(token);
        }

        if let Some(cache_dir) = cache_dir {
            builder = builder.with_cache_dir(cache_dir);
        }

        let api = builder
            .build()
            .map_err(|e| HarnessError::Config(format!("Cannot build hub client: {}", e)))?;

        Ok(Self {
            api,
            authenticated,
            show_progress: true,
            colored: true,
        })
    }

    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        Self::new(config.token.clone(), config.cache_dir.clone())
    }

    pub fn with_progress(mut self, show_progress: bool, colored: bool) -> Self {
        self.show_progress = show_progress;
        self.colored = colored;
        self
    }

    /// Saves the tokenizer and model files of `model_id` into `output_dir`.
    ///
    /// Existing files are overwritten, so running it twice is safe.
    pub async fn fetch_and_save(
        &self,
        model_id: &str,
        revision: &str,
        output_dir: &Path,
    ) -> Result<FetchReport> {
        Validator::validate_model_id(model_id)?;
        Validator::validate_output_dir(output_dir)?;

        fs::create_dir_all(output_dir).map_err(|e| HarnessError::FileOperation {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

        let repo = self.api.repo(Repo::with_revision(
            model_id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));

        info!("Resolving {} at revision {}", model_id, revision);
        let repo_info = repo
            .info()
            .await
            .map_err(|e| classify_api_error(model_id, e, self.authenticated))?;

        let listing: Vec<&str> = repo_info
            .siblings
            .iter()
            .map(|s| s.rfilename.as_str())
            .collect();
        debug!("{} lists {} files", model_id, listing.len());

        let artifacts = select_artifacts(model_id, &listing)?;

        let progress = if self.show_progress {
            DownloadProgress::new(artifacts.len(), self.colored)
        } else {
            DownloadProgress::hidden(artifacts.len())
        };

        let mut files = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            progress.start_file(&artifact.filename);

            let cached = repo
                .get(&artifact.filename)
                .await
                .map_err(|e| classify_api_error(model_id, e, self.authenticated))?;

            let bytes = copy_artifact(&cached, output_dir, &artifact.filename)?;
            progress.file_saved(bytes);
            debug!("Saved {} ({})", artifact.filename, artifact.kind);

            files.push(SavedArtifact {
                path: output_dir.join(&artifact.filename),
                filename: artifact.filename,
                kind: artifact.kind,
                bytes,
            });
        }

        progress.finish();
        let stats = progress.get_stats();
        info!(
            "Saved {} files of {} to {} in {}s ({}/s)",
            stats.files_saved,
            model_id,
            output_dir.display(),
            stats.duration_secs,
            format_size(stats.bytes_per_second() as u64)
        );

        Ok(FetchReport {
            model_id: model_id.to_string(),
            revision: revision.to_string(),
            commit_sha: repo_info.sha,
            output_dir: output_dir.to_path_buf(),
            files,
        })
    }
}

/// Copies a cached hub file to `output_dir/filename`, replacing any old copy.
pub fn copy_artifact(source: &Path, output_dir: &Path, filename: &str) -> Result<u64> {
    let dest = output_dir.join(filename);
    fs::copy(source, &dest).map_err(|e| HarnessError::FileOperation {
        path: dest,
        source: e,
    })
}

fn classify_api_error(model_id: &str, err: ApiError, authenticated: bool) -> HarnessError {
    match err {
        ApiError::RequestError(e) => match e.status() {
            Some(status) => {
                classify_status(model_id, status.as_u16(), authenticated, &e.to_string())
            }
            None => HarnessError::Network(e.to_string()),
        },
        ApiError::IoError(e) => HarnessError::Io(e),
        other => HarnessError::Network(other.to_string()),
    }
}

/// The hub answers 401 rather than 404 for a missing repository when the
/// request carries no token, so that case names both causes.
fn classify_status(
    model_id: &str,
    status: u16,
    authenticated: bool,
    detail: &str,
) -> HarnessError {
    match status {
        401 if !authenticated => HarnessError::Auth(format!(
            "{} is private, gated or does not exist; set HF_TOKEN or --token to tell them apart ({})",
            model_id, detail
        )),
        401 | 403 => HarnessError::Auth(format!("Access to {} denied: {}", model_id, detail)),
        404 => HarnessError::NotFound(format!("Model {} does not exist", model_id)),
        _ => HarnessError::Network(detail.to_string()),
    }
}
