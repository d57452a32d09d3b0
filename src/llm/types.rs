//! Rust types for an OpenAI-compatible chat-completions API.
//!
//! The Hugging Face router speaks this dialect, as do most self-hosted
//! inference servers. Serde-serializable to JSON for HTTP calls.

use serde::{Deserialize, Serialize};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-3.1-8B-Instruct";

/// Provider prefix accepted in model names (`huggingface/org/model`).
const PROVIDER_PREFIX: &str = "huggingface/";

/// Resolve short aliases and provider-prefixed names to router model IDs.
pub fn resolve_model(alias: &str) -> &str {
    let name = alias.strip_prefix(PROVIDER_PREFIX).unwrap_or(alias);
    match name {
        "llama-8b" => "meta-llama/Llama-3.1-8B-Instruct",
        "llama-70b" => "meta-llama/Llama-3.3-70B-Instruct",
        "qwen-coder" => "Qwen/Qwen2.5-Coder-32B-Instruct",
        _ => name,
    }
}

/// Request body for `POST {base}/chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Response from the chat-completions API.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

/// One generated alternative.
#[derive(Debug, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

/// Assistant message inside a choice. Some servers send `content: null`.
#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: String,
    pub content: Option<String>,
}

/// Token usage from the API response.
#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}
