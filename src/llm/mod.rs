//! Shared model client: one chat client plus the sampling settings every
//! agent uses.
//!
//! Built once at startup from [`Config`](crate::config::Config) and shared
//! read-only between requests.

pub mod client;
pub mod types;

use tracing::debug;

use crate::config::Config;
use client::{ChatClient, LlmError};
use types::{resolve_model, ChatMessage, ChatRequest};

/// Chat client bound to a model and its sampling parameters.
#[derive(Debug)]
pub struct ModelClient {
    client: ChatClient,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ModelClient {
    /// Create a model client with an explicit key and API root.
    pub fn new(
        api_key: String,
        base_url: String,
        model: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: ChatClient::new(api_key, base_url)?,
            model: resolve_model(model).to_string(),
            temperature,
            max_tokens,
        })
    }

    /// Create the model client described by the process configuration.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        Self::new(
            config.api_key.clone(),
            config.base_url.clone(),
            &config.model,
            config.temperature,
            config.max_tokens,
        )
    }

    /// Send a conversation and return the completion text.
    ///
    /// A reply without any text is an [`LlmError::EmptyCompletion`].
    pub async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
        };

        let response = self.client.chat(&request).await?;
        if let Some(usage) = &response.usage {
            debug!(
                model = %self.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion received"
            );
        }

        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyCompletion)
    }

    /// Resolved model ID.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Endpoint root the client posts to.
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn model_alias_resolved_at_construction() {
        let client = ModelClient::new(
            "k".into(),
            "http://localhost:1".into(),
            "huggingface/llama-8b",
            0.7,
            512,
        )
        .unwrap();
        assert_eq!(client.model(), types::DEFAULT_MODEL);
        assert_eq!(client.max_tokens(), 512);
    }

    #[test]
    fn from_config_uses_settings() {
        let config = Config::for_tests("hf_test");
        let client = ModelClient::from_config(&config).unwrap();
        assert_eq!(client.model(), config.model);
        assert!((client.temperature() - 0.7).abs() < f32::EPSILON);
        assert_eq!(client.base_url(), config.base_url);
    }

    #[tokio::test]
    async fn complete_sends_sampling_settings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"model": "org/m", "max_tokens": 128})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "done"},
                    "finish_reason": "stop"
                }]
            })))
            .mount(&server)
            .await;

        let client = ModelClient::new("k".into(), server.uri(), "org/m", 0.2, 128).unwrap();
        let text = client.complete(vec![ChatMessage::user("go")]).await.unwrap();
        assert_eq!(text, "done");
    }

    #[tokio::test]
    async fn complete_without_text_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = ModelClient::new("k".into(), server.uri(), "org/m", 0.2, 128).unwrap();
        let err = client.complete(vec![ChatMessage::user("go")]).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyCompletion));
    }
}
