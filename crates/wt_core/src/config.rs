use std::env;
use crate::{Error, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 512;
pub const DEFAULT_CHUNK_OVERLAP: usize = 20;

/// Settings read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub llm_model: Option<String>,
    pub embedding_model: Option<String>,
    pub qdrant_host: String,
    pub qdrant_port: u16,
    pub qdrant_collection: String,
    pub wikipedia_language: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            openai_api_key: None,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            llm_model: None,
            embedding_model: None,
            qdrant_host: "localhost".to_string(),
            qdrant_port: 6334,
            qdrant_collection: "wikipedia".to_string(),
            wikipedia_language: "en".to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            llm_model: get("LLM_MODEL"),
            embedding_model: get("EMBEDDING_MODEL"),
            qdrant_host: get("QDRANT_HOST").unwrap_or(defaults.qdrant_host),
            qdrant_port: parse_or(get("QDRANT_PORT"), "QDRANT_PORT", defaults.qdrant_port)?,
            qdrant_collection: get("QDRANT_COLLECTION_NAME").unwrap_or(defaults.qdrant_collection),
            wikipedia_language: get("WIKIPEDIA_LANGUAGE").unwrap_or(defaults.wikipedia_language),
            chunk_size: parse_or(get("CHUNK_SIZE"), "CHUNK_SIZE", defaults.chunk_size)?,
            chunk_overlap: parse_or(get("CHUNK_OVERLAP"), "CHUNK_OVERLAP", defaults.chunk_overlap)?,
        };

        if config.chunk_size == 0 || config.chunk_overlap >= config.chunk_size {
            return Err(Error::Config(format!(
                "CHUNK_OVERLAP ({}) must be smaller than a non-zero CHUNK_SIZE ({})",
                config.chunk_overlap, config.chunk_size
            )));
        }
        Ok(config)
    }

    pub fn qdrant_url(&self) -> String {
        format!("http://{}:{}", self.qdrant_host, self.qdrant_port)
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> Result<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}
