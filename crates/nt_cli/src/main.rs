use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use nt_core::{ExtractionConfig, SimilarityConfig, SimilarityRanker};
use nt_inference::{Config, EmbeddingConfig, ModelKind};
use nt_scrappers::{ArticlePipeline, Extractor, HttpFetcher};
use nt_web::{AppState, DEFAULT_ALLOWED_ORIGINS};
use serde::Serialize;
use tracing::{info, warn};

mod logging;

#[derive(Parser, Debug)]
#[command(name = "nt", author, version, about = "Ingest news articles, analyze them and find similar ones", long_about = None)]
pub struct Cli {
    /// Storage backend: memory or sqlite
    #[arg(long, env = "NT_STORAGE", default_value = "sqlite", global = true)]
    storage: String,

    /// SQLite database file
    #[arg(long, env = "NT_DB_PATH", default_value = nt_storage::DEFAULT_DB_PATH, global = true)]
    db_path: PathBuf,

    #[arg(long, default_value = "openrouter", global = true, help = "Model to use for inference. Available models: openrouter (default), dummy")]
    model: String,

    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    #[arg(long, env = "OPENROUTER_BASE_URL", default_value = nt_inference::DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Chat model used for analysis
    #[arg(long, default_value = nt_inference::DEFAULT_CHAT_MODEL, global = true)]
    chat_model: String,

    /// OpenAI-compatible embeddings endpoint
    #[arg(long, env = "EMBEDDING_URL", default_value = nt_inference::DEFAULT_EMBEDDING_URL, global = true)]
    embedding_url: String,

    #[arg(long, env = "EMBEDDING_MODEL", default_value = nt_inference::DEFAULT_EMBEDDING_MODEL, global = true)]
    embedding_model: String,

    /// Paragraphs shorter than this many characters are dropped
    #[arg(long, default_value_t = 40, global = true)]
    min_paragraph_chars: usize,

    /// Pages with less body text than this fail extraction
    #[arg(long, default_value_t = 300, global = true)]
    min_body_chars: usize,

    /// Number of similar articles returned
    #[arg(long, default_value_t = 3, global = true)]
    top_k: usize,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "NT_BIND", default_value = "127.0.0.1:8000")]
        bind: String,
        /// Allowed CORS origin (repeatable). Defaults to the dashboard dev server.
        #[arg(long = "allow-origin")]
        allow_origins: Vec<String>,
    },
    /// Fetch, analyze and store one article
    Ingest { url: String },
    /// List stored articles, newest first
    List,
    /// Show one stored article
    Show { id: i64 },
    /// Show the articles most similar to one stored article
    Similar { id: i64 },
}

impl Cli {
    fn extraction_config(&self) -> ExtractionConfig {
        ExtractionConfig {
            min_paragraph_chars: self.min_paragraph_chars,
            min_body_chars: self.min_body_chars,
            ..ExtractionConfig::default()
        }
    }

    fn similarity_config(&self) -> SimilarityConfig {
        SimilarityConfig { top_k: self.top_k }
    }

    fn inference_config(&self) -> nt_core::Result<Config> {
        Ok(Config {
            model: self.model.parse::<ModelKind>()?,
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model_name: self.chat_model.clone(),
            embedding: EmbeddingConfig {
                url: self.embedding_url.clone(),
                model_name: self.embedding_model.clone(),
                api_key: None,
            },
            ..Config::default()
        })
    }
}

async fn build_pipeline(cli: &Cli) -> anyhow::Result<ArticlePipeline> {
    let storage = nt_storage::create_storage(&cli.storage, Some(cli.db_path.as_path()))
        .await
        .context("failed to open storage")?;
    if cli.storage.eq_ignore_ascii_case("memory") && !matches!(cli.command, Commands::Serve { .. }) {
        warn!("⚠️ In-memory storage does not outlive this command");
    }

    let inference = nt_inference::create_model(Some(cli.inference_config()?))
        .await
        .context("failed to initialize inference model")?;
    info!("🧠 Inference model initialized (using {})", inference.name());

    Ok(ArticlePipeline::new(
        Arc::new(HttpFetcher::new()?),
        Extractor::new(cli.extraction_config())?,
        inference,
        storage,
        SimilarityRanker::new(&cli.similarity_config()),
    ))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn serve(pipeline: ArticlePipeline, bind: &str, allow_origins: Vec<String>) -> anyhow::Result<()> {
    let origins = if allow_origins.is_empty() {
        DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect()
    } else {
        allow_origins
    };

    let app = nt_web::create_app(AppState::new(Arc::new(pipeline)), &origins).await;
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    info!("🚀 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let pipeline = build_pipeline(&cli).await?;

    match cli.command {
        Commands::Serve { bind, allow_origins } => serve(pipeline, &bind, allow_origins).await?,
        Commands::Ingest { url } => print_json(&pipeline.create_from_url(url.trim()).await?)?,
        Commands::List => print_json(&pipeline.list().await?)?,
        Commands::Show { id } => print_json(&pipeline.get(id).await?)?,
        Commands::Similar { id } => print_json(&pipeline.similar(id).await?)?,
    }

    Ok(())
}
