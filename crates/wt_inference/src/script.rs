use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use wt_core::persist::{save_json, Persisted};
use wt_core::{
    AnalysisRecord, ChatModel, CompletionRequest, EngagementReport, Result, ScriptMetadata, ScriptResult,
    TokenCounter,
};
use crate::completion::complete_counted;

pub const SCRIPT_MAX_TOKENS: u32 = 300;
pub const CRITIQUE_MAX_TOKENS: u32 = 500;
const SCRIPT_PREFILL: &str = "Here's an engaging TikTok script based on the provided content and guidelines:";
const CRITIQUE_PREFILL: &str = "Here's my analysis of the TikTok script's engagement factors:";

pub fn script_prompt(analysis: &AnalysisRecord, audience: &str) -> String {
    format!(
        "Create an engaging TikTok script based on the following content and guidelines:\n\
         \n\
         Content Summary: {summary}\n\
         Key Facts: {facts}\n\
         Hooks: {hooks}\n\
         Simplified Content: {simplified}\n\
         Anecdote: {anecdote}\n\
         Target Audience: {audience}\n\
         \n\
         Guidelines:\n\
         1. Start with a strong hook that grabs attention immediately.\n\
         2. Keep the script short and simple, suitable for a 60-second video.\n\
         3. Use natural, conversational language as if speaking to a friend.\n\
         4. Tailor the content and language to the target audience.\n\
         5. Include at least one key fact or interesting tidbit.\n\
         6. End with a memorable conclusion or call-to-action.",
        summary = analysis.summary.trim_end(),
        facts = analysis.key_facts.join(", "),
        hooks = analysis.hooks.join(", "),
        simplified = analysis.simplified_content.trim_end(),
        anecdote = analysis.anecdote.trim_end(),
    )
}

pub fn engagement_prompt(script: &str) -> String {
    format!(
        "Analyze the following TikTok script for potential engagement factors:\n\
         \n\
         Script: {script}\n\
         \n\
         Please provide ratings (1-10) and brief explanations for the following aspects:\n\
         1. Hook Strength\n\
         2. Clarity and Simplicity\n\
         3. Audience Appropriateness\n\
         4. Information Value\n\
         5. Entertainment Factor\n\
         6. Call-to-Action Effectiveness"
    )
}

/// Turns an analysis into a short-video script and rates the result.
pub struct ScriptGenerator {
    model: Arc<dyn ChatModel>,
    tokens: Arc<TokenCounter>,
}

impl ScriptGenerator {
    pub fn new(model: Arc<dyn ChatModel>, tokens: Arc<TokenCounter>) -> Self {
        Self { model, tokens }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// The raw reply is returned as the script.
    pub async fn generate(&self, analysis: &AnalysisRecord, audience: &str) -> Result<String> {
        info!("🎬 Generating TikTok script for {}", audience);
        let request = CompletionRequest::new(script_prompt(analysis, audience), SCRIPT_MAX_TOKENS)
            .with_prefill(SCRIPT_PREFILL);
        complete_counted(self.model.as_ref(), &self.tokens, request, "Error in script generation").await
    }

    pub async fn critique(&self, script: &str) -> Result<EngagementReport> {
        info!("📊 Analyzing script engagement");
        let request = CompletionRequest::new(engagement_prompt(script), CRITIQUE_MAX_TOKENS)
            .with_prefill(CRITIQUE_PREFILL);
        let engagement_analysis = complete_counted(
            self.model.as_ref(),
            &self.tokens,
            request,
            "Error in script engagement analysis",
        )
        .await?;
        Ok(EngagementReport { engagement_analysis })
    }
}

/// Write `{script, metadata}` as JSON. Failures are logged, never raised.
pub fn persist(script: &str, metadata: Option<&ScriptMetadata>, path: &Path) -> Persisted<PathBuf> {
    let output = ScriptResult {
        script: script.to_string(),
        metadata: metadata.cloned(),
    };
    save_json(&output, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use wt_core::persist::load_json;
    use wt_core::Error;

    #[derive(Debug, Default)]
    struct Recorder {
        seen: Mutex<Vec<CompletionRequest>>,
        fail: bool,
    }

    #[async_trait]
    impl ChatModel for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.seen.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(Error::External(anyhow::anyhow!("overloaded")));
            }
            Ok("one two three".to_string())
        }
    }

    fn analysis() -> AnalysisRecord {
        AnalysisRecord {
            summary: "Python is a language. ".into(),
            key_facts: vec!["Made in 1991".into(), "Named after Monty Python".into()],
            hooks: vec!["Ever heard of a snake that codes?".into()],
            simplified_content: "Code reads like English. ".into(),
            anecdote: "My first program printed hello. ".into(),
        }
    }

    #[test]
    fn test_script_prompt_layout() {
        let prompt = script_prompt(&analysis(), "teens 13-17");
        assert!(prompt.contains("Content Summary: Python is a language.\n"));
        assert!(prompt.contains("Key Facts: Made in 1991, Named after Monty Python\n"));
        assert!(prompt.contains("Hooks: Ever heard of a snake that codes?\n"));
        assert!(prompt.contains("Target Audience: teens 13-17\n"));
        let guidelines = prompt.lines().skip_while(|l| *l != "Guidelines:").skip(1).count();
        assert_eq!(guidelines, 6);
    }

    #[test]
    fn test_engagement_prompt_lists_dimensions() {
        let prompt = engagement_prompt("SCRIPT");
        assert!(prompt.contains("Script: SCRIPT\n"));
        for dimension in [
            "Hook Strength",
            "Clarity and Simplicity",
            "Audience Appropriateness",
            "Information Value",
            "Entertainment Factor",
            "Call-to-Action Effectiveness",
        ] {
            assert!(prompt.contains(dimension), "missing {}", dimension);
        }
    }

    #[tokio::test]
    async fn test_generate_and_critique_budgets() {
        let model = Arc::new(Recorder::default());
        let tokens = Arc::new(TokenCounter::new());
        let generator = ScriptGenerator::new(model.clone(), tokens.clone());

        let script = generator.generate(&analysis(), "adults").await.unwrap();
        let report = generator.critique(&script).await.unwrap();
        assert_eq!(script, "one two three");
        assert_eq!(report.engagement_analysis, "one two three");

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen[0].max_tokens, SCRIPT_MAX_TOKENS);
        assert_eq!(seen[1].max_tokens, CRITIQUE_MAX_TOKENS);
        assert!(seen.iter().all(|r| r.stop == vec![wt_core::HUMAN_TURN.to_string()]));
        assert_eq!(tokens.completion_llm_token_count(), 6);
        assert!(tokens.prompt_llm_token_count() > 0);
    }

    #[tokio::test]
    async fn test_failure_carries_stage() {
        let model = Arc::new(Recorder {
            fail: true,
            ..Recorder::default()
        });
        let generator = ScriptGenerator::new(model, Arc::new(TokenCounter::new()));
        let err = generator.critique("x").await.unwrap_err();
        assert!(err.to_string().starts_with("Error in script engagement analysis"));
    }

    #[test]
    fn test_persist_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scripts").join("Python_script.json");
        let metadata = ScriptMetadata {
            topic: "Python".into(),
            audience: "teens 13-17".into(),
            model: "dummy".into(),
            source_url: "https://en.wikipedia.org/wiki/Python".into(),
            generated_at: "2024-01-01 00:00:00".into(),
        };
        assert!(persist("Hi 👋", Some(&metadata), &path).is_done());
        let loaded: ScriptResult = load_json(&path).unwrap_or_default();
        assert_eq!(loaded.script, "Hi 👋");
        assert_eq!(loaded.metadata, Some(metadata));

        let blocked = dir.path().join("scripts").join("Python_script.json").join("x.json");
        assert!(!persist("Hi", None, &blocked).is_done());
    }
}
