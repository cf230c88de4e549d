// file: src/config.rs
// description: application configuration management with toml and env support
// reference: https://docs.rs/config

use crate::error::{HarnessError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "SEARCH_HARNESS";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub envelope: EnvelopeConfig,
    pub query: QueryConfig,
    pub model: ModelConfig,
}

/// Location of the search service under test.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub document_path: PathBuf,
    pub timeout_secs: u64,
}

/// Identifiers stamped on every request envelope of a run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnvelopeConfig {
    pub group_id: String,
    pub user_id: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryConfig {
    pub query_id: String,
    pub text: String,
    pub top_k: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    pub model_id: String,
    pub revision: String,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    #[serde(default)]
    pub token: Option<String>,
}

impl ServiceConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Layers built-in defaults, the TOML file and `SEARCH_HARNESS__*` variables.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| HarnessError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path)),
            None => builder
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false)),
        };

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| HarnessError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| HarnessError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            service: ServiceConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                document_path: PathBuf::from("test/sample_document.json"),
                timeout_secs: 60,
            },
            envelope: EnvelopeConfig {
                group_id: "001".to_string(),
                user_id: "001".to_string(),
                session_id: "001".to_string(),
            },
            query: QueryConfig {
                query_id: "0001".to_string(),
                text: "바클레이즈로부터 투자의견-하향으로 평가 받은 기업은?".to_string(),
                top_k: 3,
            },
            model: ModelConfig {
                model_id: "psyche/klue-single-embedding-25000".to_string(),
                revision: "main".to_string(),
                output_dir: PathBuf::from("model/"),
                cache_dir: None,
                token: None,
            },
        }
    }

    /// Re-run after command-line overrides are applied.
    pub fn validate(&self) -> Result<()> {
        if self.service.host.trim().is_empty() {
            return Err(HarnessError::Config("host must not be empty".to_string()));
        }

        Validator::validate_port(self.service.port)
            .map_err(|e| HarnessError::Config(e.to_string()))?;

        if self.service.timeout_secs == 0 {
            return Err(HarnessError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Validator::validate_top_k(self.query.top_k)
            .map_err(|e| HarnessError::Config(e.to_string()))?;

        Validator::validate_model_id(&self.model.model_id)
            .map_err(|e| HarnessError::Config(e.to_string()))?;

        Ok(())
    }
}
