pub mod analyzer;
mod completion;
pub mod indexer;
pub mod models;
pub mod script;

pub use analyzer::{parse_analysis, AnalysisParser, AnalysisSection, ContentAnalyzer};
pub use indexer::{ChunkingConfig, Indexer, DEFAULT_TOP_K};
pub use models::{create_chat_model, create_embedding_model, ChatBackend, EmbeddingBackend};
pub use script::ScriptGenerator;

pub mod prelude {
    pub use super::analyzer::ContentAnalyzer;
    pub use super::indexer::{ChunkingConfig, Indexer};
    pub use super::models::{create_chat_model, create_embedding_model, ChatBackend, EmbeddingBackend};
    pub use super::script::ScriptGenerator;
    pub use wt_core::{AnalysisRecord, ArticleRecord, EngagementReport, Error, Result, TokenCounter};
}
