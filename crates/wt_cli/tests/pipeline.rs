use async_trait::async_trait;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wt_cli::{failure_message, Pipeline, RunRequest};
use wt_core::{ArticleRecord, ChatModel, CompletionRequest, ContentSource, EmbeddingModel, Error, Result, TokenCounter};
use wt_inference::models::DummyModel;
use wt_inference::{ChunkingConfig, Indexer};
use wt_storage::{BackendConfig, MemoryStorage};

const TOPIC: &str = "Python (programming language)";
const AUDIENCE: &str = "teens 13-17";

struct FakeWikipedia {
    calls: AtomicUsize,
}

#[async_trait]
impl ContentSource for FakeWikipedia {
    fn name(&self) -> &str {
        "fake wikipedia"
    }

    async fn fetch(&self, topic: &str) -> Result<ArticleRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if topic != TOPIC {
            return Err(Error::NotFound(topic.to_string()));
        }
        Ok(ArticleRecord {
            title: TOPIC.to_string(),
            summary: "Python is a high-level, general-purpose programming language.".to_string(),
            content: "# History\n\nPython was conceived in the late 1980s by Guido van Rossum.\n\n\
                      # Design philosophy\n\nPython is dynamically typed and garbage-collected.\n\n\
                      ## Indentation\n\nPython uses whitespace indentation to delimit blocks.\n\n"
                .to_string(),
            url: "https://en.wikipedia.org/wiki/Python_(programming_language)".to_string(),
            retrieval_date: "2024-05-01 10:00:00".to_string(),
        })
    }
}

/// Answers each prompt kind with a canned reply.
#[derive(Debug)]
struct ScriptedModel;

#[async_trait]
impl ChatModel for ScriptedModel {
    fn name(&self) -> &str {
        "claude-3-5-haiku-latest"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let reply = if request.prompt.starts_with("Analyze the following content") {
            "1. Summary:\nPython is a popular language.\n\n\
             2. Key Facts:\n- Created by Guido van Rossum\n- Uses indentation\n\n\
             3. Hooks:\n- What if code read like English?\n\n\
             4. Simplified Explanation:\nYou tell the computer what to do in plain words.\n\n\
             5. Anecdote:\nMy friend built a game in a weekend."
        } else if request.prompt.starts_with("Create an engaging TikTok script") {
            "What if code read like English? Meet Python! Follow for more."
        } else {
            "Hook Strength: 8/10. Strong opener."
        };
        Ok(reply.to_string())
    }
}

fn pipeline(source: Arc<FakeWikipedia>) -> (Pipeline, Arc<TokenCounter>) {
    let tokens = Arc::new(TokenCounter::new());
    let embedder: Arc<dyn EmbeddingModel> = Arc::new(DummyModel::default());
    let store = Arc::new(MemoryStorage::new(BackendConfig::new(
        "memory://".to_string(),
        "wikipedia".to_string(),
        embedder.dimensions() as u64,
    )));
    let indexer = Indexer::new(store, embedder, tokens.clone(), ChunkingConfig::new(12, 2));
    (Pipeline::new(source, indexer, Arc::new(ScriptedModel), tokens.clone()), tokens)
}

fn fake_source() -> Arc<FakeWikipedia> {
    Arc::new(FakeWikipedia {
        calls: AtomicUsize::new(0),
    })
}

#[tokio::test]
async fn test_end_to_end_run() {
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("output");
    let (mut pipeline, tokens) = pipeline(fake_source());

    let outcome = pipeline
        .run(&RunRequest {
            topic: TOPIC.to_string(),
            audience: AUDIENCE.to_string(),
            output_dir: output_dir.clone(),
        })
        .await
        .unwrap();

    let content_path = output_dir.join("content").join("Python_(programming_language).json");
    assert_eq!(outcome.content_path.as_deref(), Some(content_path.as_path()));
    let saved: ArticleRecord = serde_json::from_str(&fs::read_to_string(&content_path).unwrap()).unwrap();
    assert!(!saved.content.is_empty());
    assert_eq!(saved.title, TOPIC);

    let script_path = output_dir.join("scripts").join("Python_(programming_language)_script.txt");
    let script = fs::read_to_string(&script_path).unwrap();
    assert!(!script.is_empty());
    assert_eq!(script, outcome.script);

    let json_path = output_dir.join("scripts").join("Python_(programming_language)_script.json");
    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(saved["script"], script.as_str());
    assert_eq!(saved["metadata"]["audience"], AUDIENCE);
    assert_eq!(saved["metadata"]["model"], "claude-3-5-haiku-latest");

    assert!(outcome.engagement.engagement_analysis.contains("Hook Strength"));
    assert!(tokens.total_embedding_token_count() > 0);
    assert!(tokens.prompt_llm_token_count() > 0);
    assert_eq!(
        tokens.total_llm_token_count(),
        tokens.prompt_llm_token_count() + tokens.completion_llm_token_count()
    );
    let costs = pipeline.cost_report().unwrap();
    assert!(costs.total_cost() > 0.0);
    assert!(costs.embedding_cost >= 0.0);
}

#[tokio::test]
async fn test_missing_page_is_reported_as_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (mut pipeline, tokens) = pipeline(fake_source());

    let err = pipeline
        .run(&RunRequest {
            topic: "Xyzzy Nonexistent".to_string(),
            audience: AUDIENCE.to_string(),
            output_dir: dir.path().to_path_buf(),
        })
        .await
        .unwrap_err();

    assert_eq!(failure_message(&err), "Error: No Wikipedia page found for 'Xyzzy Nonexistent'.");
    assert_eq!(tokens.total_llm_token_count(), 0);
    assert!(!dir.path().join("scripts").join("Xyzzy_Nonexistent_script.txt").exists());
}

#[tokio::test]
async fn test_unusable_output_dir_aborts_before_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let blocked = dir.path().join("not-a-dir");
    fs::write(&blocked, "x").unwrap();
    let source = fake_source();
    let (mut pipeline, _) = pipeline(source.clone());

    let result = pipeline
        .run(&RunRequest {
            topic: TOPIC.to_string(),
            audience: AUDIENCE.to_string(),
            output_dir: blocked,
        })
        .await;

    assert!(result.is_err());
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}
