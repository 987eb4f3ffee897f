use std::str::FromStr;
use std::sync::Arc;
use wt_core::{AppConfig, ChatModel, EmbeddingModel, Error, Result};

pub mod anthropic;
pub mod dummy;
pub mod openai;

pub use anthropic::AnthropicModel;
pub use dummy::DummyModel;
pub use openai::{OpenAiChatModel, OpenAiEmbeddingModel};

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-latest";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-3-small";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatBackend {
    Anthropic,
    OpenAi,
    Dummy,
}

impl FromStr for ChatBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAi),
            "dummy" => Ok(Self::Dummy),
            other => Err(Error::Config(format!(
                "Unknown model backend '{}'. Available: anthropic, openai, dummy",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    OpenAi,
    Dummy,
}

impl FromStr for EmbeddingBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "dummy" => Ok(Self::Dummy),
            other => Err(Error::Config(format!(
                "Unknown embedding backend '{}'. Available: openai, dummy",
                other
            ))),
        }
    }
}

fn require_key(key: &Option<String>, name: &str) -> Result<String> {
    key.clone().ok_or_else(|| {
        Error::Config(format!("{} is missing. Please set the {} environment variable.", name, name))
    })
}

pub fn embedding_dimensions(model: &str) -> usize {
    match model {
        "text-embedding-3-large" => 3072,
        _ => 1536,
    }
}

pub fn create_chat_model(backend: ChatBackend, config: &AppConfig) -> Result<Arc<dyn ChatModel>> {
    let model: Arc<dyn ChatModel> = match backend {
        ChatBackend::Anthropic => Arc::new(AnthropicModel::new(
            require_key(&config.anthropic_api_key, "ANTHROPIC_API_KEY")?,
            config.llm_model.as_deref().unwrap_or(DEFAULT_ANTHROPIC_MODEL),
        )),
        ChatBackend::OpenAi => Arc::new(OpenAiChatModel::new(
            require_key(&config.openai_api_key, "OPENAI_API_KEY")?,
            config.openai_base_url.as_str(),
            config.llm_model.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL),
        )),
        ChatBackend::Dummy => Arc::new(DummyModel::default()),
    };
    Ok(model)
}

pub fn create_embedding_model(backend: EmbeddingBackend, config: &AppConfig) -> Result<Arc<dyn EmbeddingModel>> {
    let model: Arc<dyn EmbeddingModel> = match backend {
        EmbeddingBackend::OpenAi => {
            let name = config
                .embedding_model
                .as_deref()
                .unwrap_or(DEFAULT_OPENAI_EMBEDDING_MODEL);
            Arc::new(OpenAiEmbeddingModel::new(
                require_key(&config.openai_api_key, "OPENAI_API_KEY")?,
                config.openai_base_url.as_str(),
                name,
                embedding_dimensions(name),
            ))
        }
        EmbeddingBackend::Dummy => Arc::new(DummyModel::default()),
    };
    Ok(model)
}
