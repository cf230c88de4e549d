// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use search_harness::hub::progress::format_size;
use search_harness::utils::logging::{self, format_error, format_step, format_success};
use search_harness::{
    ArtifactKind, Config, ModelFetcher, ServiceClient, run_delete, run_indexing, run_search,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "search_harness")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(
    about = "Model provisioning and integration tests for a BM25 search service",
    long_about = None
)]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Service host [default: 0.0.0.0]
    #[arg(long, global = true)]
    host: Option<String>,

    /// Service port [default: 3000]
    #[arg(long, global = true)]
    port: Option<u16>,

    /// JSON array of documents to index [default: test/sample_document.json]
    #[arg(long = "file_path", alias = "file-path", value_name = "FILE", global = true)]
    file_path: Option<PathBuf>,

    #[arg(long, global = true)]
    group_id: Option<String>,

    #[arg(long, global = true)]
    user_id: Option<String>,

    #[arg(long, global = true)]
    session_id: Option<String>,

    /// Defaults to `smoke`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a tokenizer and embedding model into a local directory
    FetchModel {
        #[arg(long)]
        model_id: Option<String>,

        #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
        token: Option<String>,

        #[arg(long)]
        revision: Option<String>,

        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,

        #[arg(long)]
        no_progress: bool,
    },

    /// Post the document file to /indexing
    Index,

    /// Index the document file, then post the query to /search
    Search {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Post a document id to /delete
    Delete {
        #[arg(long)]
        document_id: String,
    },

    /// Index once, then search (which indexes again)
    Smoke {
        #[command(flatten)]
        query: QueryArgs,
    },
}

#[derive(Args, Default)]
struct QueryArgs {
    /// Query text sent to /search
    #[arg(long)]
    query: Option<String>,

    #[arg(long)]
    query_id: Option<String>,

    #[arg(long)]
    top_k: Option<u16>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.service.host = host.clone();
        }
        if let Some(port) = self.port {
            config.service.port = port;
        }
        if let Some(path) = &self.file_path {
            config.service.document_path = path.clone();
        }
        if let Some(group_id) = &self.group_id {
            config.envelope.group_id = group_id.clone();
        }
        if let Some(user_id) = &self.user_id {
            config.envelope.user_id = user_id.clone();
        }
        if let Some(session_id) = &self.session_id {
            config.envelope.session_id = session_id.clone();
        }
    }
}

impl QueryArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(text) = &self.query {
            config.query.text = text.clone();
        }
        if let Some(query_id) = &self.query_id {
            config.query.query_id = query_id.clone();
        }
        if let Some(top_k) = self.top_k {
            config.query.top_k = top_k;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logger(cli.color, cli.verbose);
    logging::set_color_output(cli.color);

    let result = run(cli).await;
    if let Err(e) = &result {
        error!("{}", format_error(&format!("{:#}", e)));
    }
    result
}

async fn run(cli: Cli) -> Result<()> {
    if let Some(path) = &cli.config {
        info!("Loading configuration from: {}", path.display());
    }
    let mut config =
        Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    cli.apply_overrides(&mut config);

    match cli.command.unwrap_or(Commands::Smoke {
        query: QueryArgs::default(),
    }) {
        Commands::FetchModel {
            model_id,
            token,
            revision,
            output_dir,
            cache_dir,
            no_progress,
        } => {
            if let Some(model_id) = model_id {
                config.model.model_id = model_id;
            }
            if token.is_some() {
                config.model.token = token;
            }
            if let Some(revision) = revision {
                config.model.revision = revision;
            }
            if let Some(output_dir) = output_dir {
                config.model.output_dir = output_dir;
            }
            if cache_dir.is_some() {
                config.model.cache_dir = cache_dir;
            }
            config.validate().context("Invalid configuration")?;
            cmd_fetch_model(&config, !no_progress, cli.color).await?;
        }
        Commands::Index => {
            config.validate().context("Invalid configuration")?;
            cmd_index(&config).await?;
        }
        Commands::Search { query } => {
            query.apply(&mut config);
            config.validate().context("Invalid configuration")?;
            cmd_search(&config).await?;
        }
        Commands::Delete { document_id } => {
            config.validate().context("Invalid configuration")?;
            cmd_delete(&config, &document_id).await?;
        }
        Commands::Smoke { query } => {
            query.apply(&mut config);
            config.validate().context("Invalid configuration")?;
            cmd_smoke(&config).await?;
        }
    }

    Ok(())
}

async fn cmd_fetch_model(config: &Config, show_progress: bool, colored: bool) -> Result<()> {
    let model = &config.model;
    info!(
        "Fetching {} ({}) into {}",
        model.model_id,
        model.revision,
        model.output_dir.display()
    );

    if model.token.is_none() {
        warn!("No hub token configured, relying on cached credentials");
    }

    let fetcher = ModelFetcher::from_config(model)
        .context("Failed to create hub client")?
        .with_progress(show_progress, colored);

    let report = fetcher
        .fetch_and_save(&model.model_id, &model.revision, &model.output_dir)
        .await
        .with_context(|| format!("Failed to fetch {}", model.model_id))?;

    for file in &report.files {
        info!("  - {} [{}] {}", file.filename, file.kind, format_size(file.bytes));
    }

    info!(
        "{}",
        format_success(&format!(
            "{} tokenizer, {} config and {} weight files ({}) saved to {} at commit {}",
            report.count(ArtifactKind::Tokenizer),
            report.count(ArtifactKind::ModelConfig),
            report.count(ArtifactKind::ModelWeights),
            format_size(report.total_bytes()),
            report.output_dir.display(),
            report.commit_sha
        ))
    );

    Ok(())
}

fn service_client(config: &Config) -> Result<ServiceClient> {
    ServiceClient::new(&config.service, &config.envelope).context("Failed to create HTTP client")
}

async fn cmd_index(config: &Config) -> Result<()> {
    let client = service_client(config)?;
    let mut stdout = std::io::stdout();

    run_indexing(&client, &config.service.document_path, &mut stdout)
        .await
        .context("Indexing failed")?;

    Ok(())
}

async fn cmd_search(config: &Config) -> Result<()> {
    let client = service_client(config)?;
    let mut stdout = std::io::stdout();

    run_search(
        &client,
        &config.service.document_path,
        &config.query,
        &mut stdout,
    )
    .await
    .context("Search failed")?;

    Ok(())
}

async fn cmd_delete(config: &Config, document_id: &str) -> Result<()> {
    let client = service_client(config)?;
    let mut stdout = std::io::stdout();

    run_delete(&client, document_id, &mut stdout)
        .await
        .context("Delete failed")?;

    Ok(())
}

async fn cmd_smoke(config: &Config) -> Result<()> {
    let start_time = Instant::now();
    let client = service_client(config)?;
    let mut stdout = std::io::stdout();

    info!("{}", format_step(1, 2, "indexing"));
    run_indexing(&client, &config.service.document_path, &mut stdout)
        .await
        .context("Indexing failed")?;

    info!("{}", format_step(2, 2, "search"));
    run_search(
        &client,
        &config.service.document_path,
        &config.query,
        &mut stdout,
    )
    .await
    .context("Search failed")?;

    info!(
        "{}",
        format_success(&format!(
            "Smoke test passed in {:.2}s",
            start_time.elapsed().as_secs_f64()
        ))
    );

    Ok(())
}
