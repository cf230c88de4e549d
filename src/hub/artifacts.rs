// file: src/hub/artifacts.rs
// description: picks the tokenizer and model files out of a hub repository listing

use crate::error::{HarnessError, Result};
use serde::Serialize;
use std::fmt;

const TOKENIZER_FILES: &[&str] = &[
    "tokenizer.json",
    "tokenizer_config.json",
    "special_tokens_map.json",
    "added_tokens.json",
    "vocab.txt",
    "vocab.json",
    "merges.txt",
    "sentencepiece.bpe.model",
    "spiece.model",
];

const MODEL_CONFIG_FILES: &[&str] = &["config.json", "generation_config.json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Tokenizer,
    ModelConfig,
    ModelWeights,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Tokenizer => "tokenizer",
            ArtifactKind::ModelConfig => "model config",
            ArtifactKind::ModelWeights => "model weights",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub kind: ArtifactKind,
}

impl ArtifactKind {
    /// Only top-level files count; subfolders hold alternate exports.
    pub fn classify(filename: &str) -> Option<Self> {
        if filename.contains('/') {
            return None;
        }

        if TOKENIZER_FILES.contains(&filename) {
            return Some(ArtifactKind::Tokenizer);
        }

        if MODEL_CONFIG_FILES.contains(&filename) {
            return Some(ArtifactKind::ModelConfig);
        }

        if is_safetensors_weight(filename) || is_pytorch_weight(filename) {
            return Some(ArtifactKind::ModelWeights);
        }

        None
    }
}

fn is_safetensors_weight(filename: &str) -> bool {
    filename.starts_with("model")
        && (filename.ends_with(".safetensors") || filename == "model.safetensors.index.json")
}

fn is_pytorch_weight(filename: &str) -> bool {
    filename.starts_with("pytorch_model")
        && (filename.ends_with(".bin") || filename == "pytorch_model.bin.index.json")
}

/// Selects what a local load needs: tokenizer files, the model config and
/// one weight format. Safetensors wins over pytorch `.bin` when both exist.
pub fn select_artifacts<S: AsRef<str>>(model_id: &str, files: &[S]) -> Result<Vec<Artifact>> {
    let has_safetensors = files.iter().any(|f| is_safetensors_weight(f.as_ref()));

    let artifacts: Vec<Artifact> = files
        .iter()
        .map(|f| f.as_ref())
        .filter(|name| !(has_safetensors && is_pytorch_weight(name)))
        .filter_map(|name| {
            ArtifactKind::classify(name).map(|kind| Artifact {
                filename: name.to_string(),
                kind,
            })
        })
        .collect();

    for required in [ArtifactKind::Tokenizer, ArtifactKind::ModelWeights] {
        if !artifacts.iter().any(|a| a.kind == required) {
            return Err(HarnessError::NotFound(format!(
                "{} has no {} files",
                model_id, required
            )));
        }
    }

    Ok(artifacts)
}
