use std::fmt;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use wt_core::{ChatModel, CompletionRequest, Error, Result};

const API_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Turn<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<&'a str>,
}

#[derive(Serialize)]
struct Turn<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct AnthropicModel {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicModel {
    pub fn new(api_key: String, model: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, model)
    }

    pub fn with_base_url(api_key: String, base_url: &str, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn build_request<'a>(&'a self, request: &'a CompletionRequest) -> MessagesRequest<'a> {
        let mut messages = vec![Turn {
            role: "user",
            content: &request.prompt,
        }];
        // The API rejects an assistant turn ending in whitespace.
        if let Some(prefill) = request.prefill.as_deref().map(str::trim_end).filter(|p| !p.is_empty()) {
            messages.push(Turn {
                role: "assistant",
                content: prefill,
            });
        }
        MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            messages,
            stop_sequences: request.stop.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Debug for AnthropicModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl ChatModel for AnthropicModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = self.build_request(request);
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Err(Error::backend("Anthropic", format!("HTTP {}: {}", status, message)));
        }

        let response: MessagesResponse = response
            .json()
            .await
            .map_err(|e| Error::from_http("Anthropic", e))?;
        debug!("Anthropic stop reason: {:?}", response.stop_reason);
        Ok(collect_text(response))
    }
}

fn collect_text(response: MessagesResponse) -> String {
    response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .map(|block| block.text)
        .collect()
}
