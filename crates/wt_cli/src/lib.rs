use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use wt_core::{AppConfig, EmbeddingModel, Result, TokenCounter};
use wt_fetcher::WikipediaFetcher;
use wt_inference::{create_chat_model, create_embedding_model, ChatBackend, ChunkingConfig, EmbeddingBackend, Indexer};
use wt_storage::{create_storage, BackendConfig, StorageKind};

pub mod pipeline;

pub use pipeline::{check_output_directory, failure_message, topic_file_stem, Pipeline, RunOutcome, RunRequest};

/// Runs slower than this get a warning.
pub const MAX_EXECUTION_TIME: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy)]
pub struct Backends {
    pub storage: StorageKind,
    pub chat: ChatBackend,
    pub embedding: EmbeddingBackend,
}

/// Opens the configured collection. Embedding keys are checked before any
/// connection is made.
pub async fn open_indexer(config: &AppConfig, backends: &Backends, tokens: Arc<TokenCounter>) -> Result<Indexer> {
    let embedder = create_embedding_model(backends.embedding, config)?;
    open_collection(config, backends.storage, embedder, tokens).await
}

async fn open_collection(
    config: &AppConfig,
    storage: StorageKind,
    embedder: Arc<dyn EmbeddingModel>,
    tokens: Arc<TokenCounter>,
) -> Result<Indexer> {
    let storage_config = BackendConfig::from_app_config(config, embedder.dimensions() as u64);
    let store = create_storage(storage, storage_config).await?;
    info!("🏦 Storage initialized (using {})", storage);
    Indexer::open(
        store,
        embedder,
        tokens,
        ChunkingConfig::new(config.chunk_size, config.chunk_overlap),
    )
    .await
}

/// Wires the Wikipedia fetcher and the selected backends into a pipeline.
/// Keys and `output_dir` are checked before storage is touched, since opening
/// a remote collection may create it.
pub async fn build_pipeline(config: &AppConfig, backends: &Backends, output_dir: &Path) -> Result<Pipeline> {
    let chat = create_chat_model(backends.chat, config)?;
    info!("🧠 Chat model initialized (using {})", chat.name());
    let embedder = create_embedding_model(backends.embedding, config)?;
    check_output_directory(output_dir)?;

    let tokens = Arc::new(TokenCounter::new());
    let indexer = open_collection(config, backends.storage, embedder, tokens.clone()).await?;
    let source = Arc::new(WikipediaFetcher::new(&config.wikipedia_language)?);
    Ok(Pipeline::new(source, indexer, chat, tokens))
}

pub fn elapsed_report(elapsed: Duration) -> Vec<String> {
    let mut lines = vec![format!("Total execution time: {:.2} seconds", elapsed.as_secs_f64())];
    if elapsed >= MAX_EXECUTION_TIME {
        lines.push("Script execution took longer than expected. Please check the log file for details.".to_string());
    }
    lines
}
