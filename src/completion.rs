use async_trait::async_trait;
use log::debug;
use serde::Serialize;

use crate::{Result, TimestampError};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 1024;

pub const DEFAULT_MODEL: &str = "gpt-4";

/// A single-turn chat request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

/// Anything that can turn a chat request into generated text
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    pub fn for_model(model: &str) -> Self {
        if model.starts_with("claude") {
            Provider::Anthropic
        } else {
            Provider::OpenAi
        }
    }

    fn api_key_var(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::OpenAi => write!(f, "openai"),
            Provider::Anthropic => write!(f, "anthropic"),
        }
    }
}

fn failure(msg: impl Into<String>) -> TimestampError {
    TimestampError::CompletionServiceFailure(msg.into())
}

/// Authenticated HTTP client for one completion provider
pub struct LlmClient {
    http: reqwest::Client,
    provider: Provider,
    api_key: String,
}

impl LlmClient {
    pub fn new(http: reqwest::Client, provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            http,
            provider,
            api_key: api_key.into(),
        }
    }

    /// Build a client for `model`, reading its API key from the environment
    pub fn from_env(http: reqwest::Client, model: &str) -> Result<Self> {
        let provider = Provider::for_model(model);
        let var = provider.api_key_var();
        let api_key = std::env::var(var).map_err(|_| failure(format!("{var} environment variable not set")))?;
        Ok(Self::new(http, provider, api_key))
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    async fn post(&self, builder: reqwest::RequestBuilder, body: &serde_json::Value) -> Result<serde_json::Value> {
        let resp = builder
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| failure(format!("{} request failed: {e}", self.provider)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(failure(format!("{} API returned {status}: {body}", self.provider)));
        }

        resp.json()
            .await
            .map_err(|e| failure(format!("invalid {} response body: {e}", self.provider)))
    }

    async fn complete_openai(&self, request: &CompletionRequest) -> Result<String> {
        let builder = self.http.post(OPENAI_URL).bearer_auth(&self.api_key);
        let json = self.post(builder, &openai_body(request)).await?;
        extract_openai_text(&json)
    }

    async fn complete_anthropic(&self, request: &CompletionRequest) -> Result<String> {
        let builder = self
            .http
            .post(ANTHROPIC_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION);
        let json = self.post(builder, &anthropic_body(request)).await?;
        extract_anthropic_text(&json)
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        debug!("Requesting completion via {} with model {}", self.provider, request.model);
        match self.provider {
            Provider::OpenAi => self.complete_openai(request).await,
            Provider::Anthropic => self.complete_anthropic(request).await,
        }
    }
}

fn openai_body(request: &CompletionRequest) -> serde_json::Value {
    serde_json::json!({
        "model": request.model,
        "temperature": request.temperature,
        "messages": [
            {
                "role": "system",
                "content": request.system
            },
            {
                "role": "user",
                "content": request.user
            }
        ]
    })
}

fn anthropic_body(request: &CompletionRequest) -> serde_json::Value {
    serde_json::json!({
        "model": request.model,
        "max_tokens": ANTHROPIC_MAX_TOKENS,
        "temperature": request.temperature,
        "system": request.system,
        "messages": [
            {
                "role": "user",
                "content": request.user
            }
        ]
    })
}

fn extract_anthropic_text(json: &serde_json::Value) -> Result<String> {
    if let Some(content) = json.get("content").and_then(|c| c.as_array()) {
        let text: String = content
            .iter()
            .filter_map(|block| {
                if block.get("type")?.as_str()? == "text" {
                    block.get("text")?.as_str().map(|s| s.to_string())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }
    Err(failure("unexpected Anthropic API response format"))
}

fn extract_openai_text(json: &serde_json::Value) -> Result<String> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
        .map(|t| t.to_string())
        .ok_or_else(|| failure("unexpected OpenAI API response format"))
}
