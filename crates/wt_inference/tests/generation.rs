use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use wt_core::tokens::count_words;
use wt_core::{ChatModel, CompletionRequest, Error, ErrorCategory, Result, TokenCounter};
use wt_inference::{ContentAnalyzer, ScriptGenerator};

/// Replays replies in order and remembers every request.
#[derive(Debug)]
struct Scripted {
    replies: Mutex<Vec<Result<String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl Scripted {
    fn new(replies: Vec<Result<String>>) -> Arc<Self> {
        let mut replies = replies;
        replies.reverse();
        Arc::new(Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ChatModel for Scripted {
    fn name(&self) -> &str {
        "gpt-3.5-turbo"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

const ANALYSIS: &str = "\n1. Summary\nBees make honey.\nThey live in hives.\n\
2. Key facts\nQueens lay eggs\nWorkers forage\n\
3. Hooks\nBuzz!\n\
4. Simplified content\nBees are tiny farmers.\n\
5. Anecdote\nA bee landed on my sandwich.\n";

#[tokio::test]
async fn test_analysis_feeds_script_prompt() {
    let model = Scripted::new(vec![
        Ok(ANALYSIS.to_string()),
        Ok("Did you know bees farm?".to_string()),
        Ok("Hook Strength: 7".to_string()),
    ]);
    let tokens = Arc::new(TokenCounter::new());
    let analyzer = ContentAnalyzer::new(model.clone(), tokens.clone());
    let generator = ScriptGenerator::new(model.clone(), tokens.clone());

    let analysis = analyzer.analyze("Bees are insects.", "Bee", "kids").await.unwrap();
    assert_eq!(analysis.summary, "Bees make honey. They live in hives. ");
    assert_eq!(analysis.key_facts, vec!["Queens lay eggs", "Workers forage"]);
    assert_eq!(analysis.hooks, vec!["Buzz!"]);

    let script = generator.generate(&analysis, "kids").await.unwrap();
    let report = generator.critique(&script).await.unwrap();
    assert_eq!(report.engagement_analysis, "Hook Strength: 7");

    let requests = model.requests.lock().unwrap();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].prefill.as_deref(), Some("Here's my analysis:"));
    assert!(requests[1].prompt.contains("Key Facts: Queens lay eggs, Workers forage"));
    assert!(requests[2].prompt.contains("Did you know bees farm?"));

    let prompt_words: u64 = requests
        .iter()
        .map(|r| count_words(&r.prompt) + r.prefill.as_deref().map(count_words).unwrap_or(0))
        .sum();
    assert_eq!(tokens.prompt_llm_token_count(), prompt_words);
    assert_eq!(
        tokens.completion_llm_token_count(),
        count_words(ANALYSIS) + count_words("Did you know bees farm?") + count_words("Hook Strength: 7")
    );
}

#[tokio::test]
async fn test_backend_failure_is_tagged_with_stage() {
    let model = Scripted::new(vec![Err(Error::backend("openai", "rate limited"))]);
    let analyzer = ContentAnalyzer::new(model, Arc::new(TokenCounter::new()));

    let err = analyzer.analyze("text", "Bee", "kids").await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Backend);
    assert_eq!(err.to_string(), "Error in content analysis: rate limited");
}

#[tokio::test]
async fn test_unstructured_reply_gives_empty_analysis() {
    let model = Scripted::new(vec![Ok("I cannot help with that.".to_string())]);
    let analyzer = ContentAnalyzer::new(model, Arc::new(TokenCounter::new()));

    let analysis = analyzer.analyze("text", "Bee", "kids").await.unwrap();
    assert!(analysis.summary.is_empty());
    assert!(analysis.key_facts.is_empty());
    assert!(analysis.anecdote.is_empty());
}
