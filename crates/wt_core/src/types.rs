use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Format used for `ArticleRecord::retrieval_date`.
pub const RETRIEVAL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One fetched Wikipedia page. Field order is the on-disk key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub url: String,
    pub retrieval_date: String,
}

impl ArticleRecord {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.content.is_empty() && self.url.is_empty()
    }
}

pub fn format_retrieval_date(at: DateTime<Local>) -> String {
    at.format(RETRIEVAL_DATE_FORMAT).to_string()
}

/// A node of a page's section tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub text: String,
    pub sections: Vec<Section>,
}

impl Section {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            sections: Vec::new(),
        }
    }

    pub fn with_sections(mut self, sections: Vec<Section>) -> Self {
        self.sections = sections;
        self
    }
}

/// What the content analyzer pulls out of the model's reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub summary: String,
    pub key_facts: Vec<String>,
    pub hooks: Vec<String>,
    pub simplified_content: String,
    pub anecdote: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptMetadata {
    pub topic: String,
    pub audience: String,
    pub model: String,
    pub source_url: String,
    pub generated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptResult {
    pub script: String,
    pub metadata: Option<ScriptMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementReport {
    pub engagement_analysis: String,
}

/// A chunk ready to be written to a vector collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkPoint {
    pub text: String,
    pub title: String,
    pub url: String,
    pub chunk_title: String,
    pub ordinal: usize,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub score: f32,
    pub text: String,
    pub title: String,
    pub url: String,
    pub chunk_title: String,
    pub ordinal: usize,
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
