use async_trait::async_trait;
use std::fmt;
use crate::Result;

/// Marks the start of the next human turn. Used as the stop sequence for
/// every completion so the model does not continue the conversation.
pub const HUMAN_TURN: &str = "\n\nHuman:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub stop: Vec<String>,
    /// Opening words of the assistant reply, for backends that accept them.
    pub prefill: Option<String>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
            stop: vec![HUMAN_TURN.to_string()],
            prefill: None,
        }
    }

    pub fn with_prefill(mut self, prefill: impl Into<String>) -> Self {
        self.prefill = Some(prefill.into());
        self
    }
}

#[async_trait]
pub trait ChatModel: Send + Sync + fmt::Debug {
    /// Model identifier, also used as the pricing key.
    fn name(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

#[async_trait]
pub trait EmbeddingModel: Send + Sync + fmt::Debug {
    /// Model identifier, also used as the pricing key.
    fn name(&self) -> &str;

    fn dimensions(&self) -> usize;

    /// Generate embeddings for a piece of text
    async fn generate_embeddings(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate one embedding per input, in input order.
    async fn generate_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.generate_embeddings(text).await?);
        }
        Ok(embeddings)
    }
}
