use tracing::debug;
use wt_core::tokens::count_words;
use wt_core::{ChatModel, CompletionRequest, Result, TokenCounter};

/// Sends `request`, charging word-count estimates for the prompt and reply.
pub(crate) async fn complete_counted(
    model: &dyn ChatModel,
    tokens: &TokenCounter,
    request: CompletionRequest,
    stage: &str,
) -> Result<String> {
    let prefill_words = request.prefill.as_deref().map(count_words).unwrap_or(0);
    tokens.add_prompt_tokens(count_words(&request.prompt) + prefill_words);

    debug!("{} ({}), max_tokens={}", stage, model.name(), request.max_tokens);
    let reply = model
        .complete(&request)
        .await
        .map_err(|e| e.in_stage(stage))?;

    tokens.add_completion_tokens(count_words(&reply));
    Ok(reply)
}
