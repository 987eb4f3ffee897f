use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use tiktoken_rs::CoreBPE;
use tracing::warn;
use crate::{Error, Result};

/// Whitespace word count, the estimate charged for prompts and replies.
pub fn count_words(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// Rough token count, ~4 characters per token.
pub fn approx_tokens(text: &str) -> u64 {
    (text.chars().count() as u64 + 3) / 4
}

fn encoder() -> Option<&'static CoreBPE> {
    static ENCODER: OnceLock<Option<CoreBPE>> = OnceLock::new();
    ENCODER
        .get_or_init(|| match tiktoken_rs::cl100k_base() {
            Ok(bpe) => Some(bpe),
            Err(e) => {
                warn!("cl100k_base tokenizer unavailable, estimating tokens: {}", e);
                None
            }
        })
        .as_ref()
}

/// BPE token count under cl100k_base, the encoding of the OpenAI chat and
/// embedding models. Charged for embedded documents and queries.
pub fn count_tokens(text: &str) -> u64 {
    match encoder() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len() as u64,
        None => approx_tokens(text),
    }
}

/// Usage counters for one run. Counters only ever grow.
#[derive(Debug, Default)]
pub struct TokenCounter {
    embedding: AtomicU64,
    prompt: AtomicU64,
    completion: AtomicU64,
}

impl TokenCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_embedding_tokens(&self, count: u64) {
        self.embedding.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_prompt_tokens(&self, count: u64) {
        self.prompt.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_completion_tokens(&self, count: u64) {
        self.completion.fetch_add(count, Ordering::Relaxed);
    }

    pub fn total_embedding_token_count(&self) -> u64 {
        self.embedding.load(Ordering::Relaxed)
    }

    pub fn prompt_llm_token_count(&self) -> u64 {
        self.prompt.load(Ordering::Relaxed)
    }

    pub fn completion_llm_token_count(&self) -> u64 {
        self.completion.load(Ordering::Relaxed)
    }

    pub fn total_llm_token_count(&self) -> u64 {
        self.prompt_llm_token_count() + self.completion_llm_token_count()
    }
}

impl fmt::Display for TokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Embedding Tokens: {}", self.total_embedding_token_count())?;
        writeln!(f, "LLM Prompt Tokens: {}", self.prompt_llm_token_count())?;
        writeln!(f, "LLM Completion Tokens: {}", self.completion_llm_token_count())?;
        write!(f, "Total LLM Token Count: {}", self.total_llm_token_count())
    }
}

/// USD per 1000 tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatPrice {
    pub prompt: f64,
    pub completion: f64,
}

const CHAT_PRICES: &[(&str, ChatPrice)] = &[
    ("gpt-3.5-turbo", ChatPrice { prompt: 0.0015, completion: 0.002 }),
    ("gpt-3.5-turbo-16k", ChatPrice { prompt: 0.003, completion: 0.004 }),
    ("gpt-4-0613", ChatPrice { prompt: 0.03, completion: 0.06 }),
    ("gpt-4-32k", ChatPrice { prompt: 0.06, completion: 0.12 }),
    ("claude-2.1", ChatPrice { prompt: 0.008, completion: 0.024 }),
    ("claude-3-5-haiku-latest", ChatPrice { prompt: 0.0008, completion: 0.004 }),
    ("claude-3-5-sonnet-latest", ChatPrice { prompt: 0.003, completion: 0.015 }),
    ("dummy", ChatPrice { prompt: 0.0, completion: 0.0 }),
];

const EMBEDDING_PRICES: &[(&str, f64)] = &[
    ("hugging_face", 0.0),
    ("text-embedding-ada-002", 0.0001),
    ("text-embedding-3-small", 0.00002),
    ("dummy", 0.0),
];

pub fn chat_price(model: &str) -> Result<ChatPrice> {
    CHAT_PRICES
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, price)| *price)
        .ok_or_else(|| Error::UnknownModel(model.to_string()))
}

pub fn embedding_price(model: &str) -> Result<f64> {
    EMBEDDING_PRICES
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, price)| *price)
        .ok_or_else(|| Error::UnknownModel(model.to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostReport {
    pub embedding_cost: f64,
    pub prompt_cost: f64,
    pub completion_cost: f64,
}

impl CostReport {
    /// Prices `counter` with exact model-name lookups; an unknown name is an error.
    pub fn compute(counter: &TokenCounter, embedding_model: &str, chat_model: &str) -> Result<Self> {
        let embedding = embedding_price(embedding_model)?;
        let chat = chat_price(chat_model)?;
        Ok(Self {
            embedding_cost: embedding * counter.total_embedding_token_count() as f64 / 1000.0,
            prompt_cost: chat.prompt * counter.prompt_llm_token_count() as f64 / 1000.0,
            completion_cost: chat.completion * counter.completion_llm_token_count() as f64 / 1000.0,
        })
    }

    pub fn llm_cost(&self) -> f64 {
        self.prompt_cost + self.completion_cost
    }

    pub fn total_cost(&self) -> f64 {
        self.embedding_cost + self.llm_cost()
    }
}

impl fmt::Display for CostReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Embedding Cost: {:.6}", self.embedding_cost)?;
        writeln!(f, "LLM Prompt Cost: {:.6}", self.prompt_cost)?;
        writeln!(f, "LLM Completion Cost: {:.6}", self.completion_cost)?;
        writeln!(f, "Total LLM Cost: {:.6}", self.llm_cost())?;
        write!(f, "Total cost: {:.6}", self.total_cost())
    }
}
