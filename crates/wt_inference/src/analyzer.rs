use std::sync::Arc;
use tracing::info;
use wt_core::{AnalysisRecord, ChatModel, CompletionRequest, Result, TokenCounter};
use crate::completion::complete_counted;

pub const ANALYSIS_MAX_TOKENS: u32 = 500;
const ANALYSIS_PREFILL: &str = "Here's my analysis:";

pub fn analysis_prompt(content: &str, topic: &str, audience: &str) -> String {
    format!(
        "Analyze the following content about '{topic}' for a TikTok video targeted at {audience}:\n\
         \n\
         Content: {content}\n\
         \n\
         Provide the following:\n\
         1. A brief summary (2-3 sentences)\n\
         2. 5 key facts\n\
         3. 3 attention-grabbing hooks\n\
         4. A simplified explanation of any complex concepts\n\
         5. A short, relatable anecdote or example"
    )
}

/// The five numbered parts of an analysis reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSection {
    Summary,
    KeyFacts,
    Hooks,
    SimplifiedContent,
    Anecdote,
}

impl AnalysisSection {
    pub const ALL: [AnalysisSection; 5] = [
        Self::Summary,
        Self::KeyFacts,
        Self::Hooks,
        Self::SimplifiedContent,
        Self::Anecdote,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::KeyFacts => "key facts",
            Self::Hooks => "hooks",
            Self::SimplifiedContent => "simplified",
            Self::Anecdote => "anecdote",
        }
    }

    /// Whether each line becomes its own entry rather than running prose.
    pub fn is_list(self) -> bool {
        matches!(self, Self::KeyFacts | Self::Hooks)
    }

    /// Position in the requested list; a marker must carry this number.
    pub fn number(self) -> usize {
        match self {
            Self::Summary => 1,
            Self::KeyFacts => 2,
            Self::Hooks => 3,
            Self::SimplifiedContent => 4,
            Self::Anecdote => 5,
        }
    }

    /// A marker is `<N>.` followed somewhere by the keyword of section N, so a
    /// numbered list item inside a section does not switch sections unless it
    /// also names the section its number belongs to.
    pub fn detect(line: &str) -> Option<Self> {
        let line = line.trim();
        let lower = line.to_lowercase();
        Self::ALL.iter().copied().find(|section| {
            lower
                .strip_prefix(&format!("{}.", section.number()))
                .is_some_and(|rest| rest.contains(section.keyword()))
        })
    }
}

/// Line-at-a-time parser for analysis replies. Never fails; sections that
/// never appear stay empty.
#[derive(Debug, Default)]
pub struct AnalysisParser {
    current: Option<AnalysisSection>,
    record: AnalysisRecord,
}

impl AnalysisParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<AnalysisSection> {
        self.current
    }

    pub fn feed_line(&mut self, line: &str) {
        let line = line.trim();
        if let Some(section) = AnalysisSection::detect(line) {
            self.current = Some(section);
            return;
        }
        let Some(section) = self.current else {
            return;
        };
        if line.is_empty() {
            return;
        }

        let record = &mut self.record;
        match section {
            AnalysisSection::KeyFacts => record.key_facts.push(line.to_string()),
            AnalysisSection::Hooks => record.hooks.push(line.to_string()),
            AnalysisSection::Summary => push_prose(&mut record.summary, line),
            AnalysisSection::SimplifiedContent => push_prose(&mut record.simplified_content, line),
            AnalysisSection::Anecdote => push_prose(&mut record.anecdote, line),
        }
    }

    pub fn finish(self) -> AnalysisRecord {
        self.record
    }
}

fn push_prose(field: &mut String, line: &str) {
    field.push_str(line);
    field.push(' ');
}

pub fn parse_analysis(reply: &str) -> AnalysisRecord {
    let mut parser = AnalysisParser::new();
    for line in reply.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}

pub struct ContentAnalyzer {
    model: Arc<dyn ChatModel>,
    tokens: Arc<TokenCounter>,
}

impl ContentAnalyzer {
    pub fn new(model: Arc<dyn ChatModel>, tokens: Arc<TokenCounter>) -> Self {
        Self { model, tokens }
    }

    pub async fn analyze(&self, content: &str, topic: &str, audience: &str) -> Result<AnalysisRecord> {
        info!("🔬 Analyzing content about '{}' for {}", topic, audience);
        let request = CompletionRequest::new(analysis_prompt(content, topic, audience), ANALYSIS_MAX_TOKENS)
            .with_prefill(ANALYSIS_PREFILL);
        let reply = complete_counted(
            self.model.as_ref(),
            &self.tokens,
            request,
            "Error in content analysis",
        )
        .await?;

        let analysis = parse_analysis(&reply);
        info!(
            "✨ Analysis parsed: {} facts, {} hooks",
            analysis.key_facts.len(),
            analysis.hooks.len()
        );
        Ok(analysis)
    }
}
