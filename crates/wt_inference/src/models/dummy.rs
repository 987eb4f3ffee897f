use std::fmt;
use async_trait::async_trait;
use wt_core::{ChatModel, CompletionRequest, EmbeddingModel, Result};

pub const DUMMY_DIMENSIONS: usize = 384;

/// Offline stand-in for both backends. Completions echo the start of the
/// prompt; embeddings are hashed bags of words.
pub struct DummyModel {
    dimensions: usize,
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").field("dimensions", &self.dimensions).finish()
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new(DUMMY_DIMENSIONS)
    }
}

impl DummyModel {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }
}

// FNV-1a, stable across runs and platforms.
fn bucket(word: &str, buckets: usize) -> usize {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in word.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    (hash % buckets as u64) as usize
}

#[async_trait]
impl ChatModel for DummyModel {
    fn name(&self) -> &str {
        "dummy"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let words: Vec<&str> = request
            .prompt
            .split_whitespace()
            .take(request.max_tokens.min(20) as usize)
            .collect();
        Ok(words.join(" "))
    }
}

#[async_trait]
impl EmbeddingModel for DummyModel {
    fn name(&self) -> &str {
        "dummy"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn generate_embeddings(&self, text: &str) -> Result<Vec<f32>> {
        let mut embedding = vec![0.0f32; self.dimensions];
        for word in text.split_whitespace() {
            let word: String = word
                .chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect();
            if !word.is_empty() {
                embedding[bucket(&word, self.dimensions)] += 1.0;
            }
        }

        let norm = embedding.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            embedding.iter_mut().for_each(|v| *v /= norm);
        }
        Ok(embedding)
    }
}
