//! One end-to-end run: fetch, index, analyze, write and critique.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use chrono::Local;
use tracing::{info, warn};
use wt_core::persist::{save_json, save_text};
use wt_core::types::format_retrieval_date;
use wt_core::{
    ChatModel, ContentSource, CostReport, EngagementReport, Error, ErrorCategory, Result, ScriptMetadata,
    TokenCounter,
};
use wt_inference::{script, ContentAnalyzer, Indexer, ScriptGenerator};

const WRITE_CHECK_FILE: &str = ".wt_write_check";

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub topic: String,
    pub audience: String,
    pub output_dir: PathBuf,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub content_path: Option<PathBuf>,
    pub script_path: Option<PathBuf>,
    pub script_json_path: Option<PathBuf>,
    pub script: String,
    pub engagement: EngagementReport,
}

/// Creates `dir` when absent and makes sure files can be written into it.
pub fn check_output_directory(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return fs::create_dir_all(dir).map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => Error::PermissionDenied(format!(
                "Unable to create output directory: {}. Please check permissions.",
                dir.display()
            )),
            _ => Error::Io(e),
        });
    }
    if !dir.is_dir() {
        return Err(Error::Config(format!("Output path is not a directory: {}", dir.display())));
    }

    let marker = dir.join(WRITE_CHECK_FILE);
    fs::write(&marker, b"").map_err(|_| {
        Error::PermissionDenied(format!(
            "Output directory is not writable: {}. Please check permissions.",
            dir.display()
        ))
    })?;
    let _ = fs::remove_file(&marker);
    Ok(())
}

/// Spaces and path separators become `_`.
pub fn topic_file_stem(topic: &str) -> String {
    topic
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect()
}

pub struct Pipeline {
    source: Arc<dyn ContentSource>,
    indexer: Indexer,
    analyzer: ContentAnalyzer,
    generator: ScriptGenerator,
    tokens: Arc<TokenCounter>,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn ContentSource>,
        indexer: Indexer,
        chat: Arc<dyn ChatModel>,
        tokens: Arc<TokenCounter>,
    ) -> Self {
        Self {
            source,
            indexer,
            analyzer: ContentAnalyzer::new(chat.clone(), tokens.clone()),
            generator: ScriptGenerator::new(chat, tokens.clone()),
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenCounter {
        &self.tokens
    }

    pub fn cost_report(&self) -> Result<CostReport> {
        CostReport::compute(
            &self.tokens,
            self.indexer.embedding_model(),
            self.generator.model_name(),
        )
    }

    pub async fn run(&mut self, request: &RunRequest) -> Result<RunOutcome> {
        info!("📁 Checking output directory {}", request.output_dir.display());
        check_output_directory(&request.output_dir)?;
        let content_dir = request.output_dir.join("content");
        let script_dir = request.output_dir.join("scripts");
        fs::create_dir_all(&content_dir)?;
        fs::create_dir_all(&script_dir)?;
        let stem = topic_file_stem(&request.topic);

        info!("🌐 Fetching {} content for topic: {}", self.source.name(), request.topic);
        let record = self.source.fetch(&request.topic).await?;
        let content_path = save_json(&record, &content_dir.join(format!("{}.json", stem))).ok();

        self.indexer.index(&record).await?;
        info!("✅ Content indexing completed");

        let analysis = self
            .analyzer
            .analyze(&record.content, &request.topic, &request.audience)
            .await?;

        let script = self.generator.generate(&analysis, &request.audience).await?;
        let script_path = save_text(&script, &script_dir.join(format!("{}_script.txt", stem))).ok();
        if let Some(path) = &script_path {
            info!("📝 Script saved to {}", path.display());
        }

        let metadata = ScriptMetadata {
            topic: request.topic.clone(),
            audience: request.audience.clone(),
            model: self.generator.model_name().to_string(),
            source_url: record.url.clone(),
            generated_at: format_retrieval_date(Local::now()),
        };
        let script_json_path = script::persist(
            &script,
            Some(&metadata),
            &script_dir.join(format!("{}_script.json", stem)),
        )
        .ok();

        let engagement = self.generator.critique(&script).await?;
        Ok(RunOutcome {
            content_path,
            script_path,
            script_json_path,
            script,
            engagement,
        })
    }
}

/// The single line shown when a run fails.
pub fn failure_message(err: &Error) -> String {
    if let Error::Config(message) = err {
        return format!("Error: {}", message);
    }
    match err.category() {
        ErrorCategory::Network => {
            "A network error occurred. Please check your internet connection and try again.".to_string()
        }
        ErrorCategory::NotFound => format!("Error: {}", err),
        ErrorCategory::PermissionDenied => format!("Permission error: {}", err),
        ErrorCategory::Backend | ErrorCategory::Other => format!("An unexpected error occurred: {}", err),
    }
}

/// Printed after the engagement report.
pub fn usage_summary(pipeline: &Pipeline) -> String {
    match pipeline.cost_report() {
        Ok(costs) => format!("{}\n{}", pipeline.tokens(), costs),
        Err(e) => {
            warn!("⚠️ Cost unavailable: {}", e);
            pipeline.tokens().to_string()
        }
    }
}
