pub mod config;
pub mod error;
pub mod models;
pub mod persist;
pub mod source;
pub mod storage;
pub mod tokens;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, ErrorCategory, Result};
pub use models::{ChatModel, CompletionRequest, EmbeddingModel, HUMAN_TURN};
pub use persist::Persisted;
pub use source::ContentSource;
pub use storage::VectorStore;
pub use tokens::{CostReport, TokenCounter};
pub use types::*;
