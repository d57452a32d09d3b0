//! Agent runtime. Executes tasks against their agents.
//!
//! `AgentRuntime` is the seam between orchestration and inference. The
//! production `LlmRuntime` calls the shared model client; tests plug in
//! fakes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{AgentError, Task, TaskOutput};
use crate::config::Config;
use crate::llm::client::LlmError;
use crate::llm::types::ChatMessage;
use crate::llm::ModelClient;

/// Upper bound on a server-requested retry delay.
const MAX_RETRY_DELAY_SECS: u64 = 30;

/// Executes one task at a time.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Run `task` with its assigned agent. `context` is upstream output the
    /// agent should build on.
    async fn execute(&self, task: &Task, context: Option<&str>) -> Result<TaskOutput, AgentError>;
}

/// Runtime backed by a chat-completions model.
///
/// Owns the execution budget: each task gets `timeout` of wall-clock time,
/// retries included. Only rate-limit responses are retried.
#[derive(Debug)]
pub struct LlmRuntime {
    model: Arc<ModelClient>,
    timeout: Duration,
    max_retries: u32,
}

impl LlmRuntime {
    pub fn new(model: Arc<ModelClient>, timeout: Duration, max_retries: u32) -> Self {
        Self {
            model,
            timeout,
            max_retries,
        }
    }

    /// Build the model client and runtime from configuration.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let model = ModelClient::from_config(config)?;
        Ok(Self::new(
            Arc::new(model),
            Duration::from_secs(config.request_timeout_secs),
            config.max_retries,
        ))
    }

    pub fn model(&self) -> &ModelClient {
        &self.model
    }

    async fn complete_with_retries(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        let mut attempt = 0;
        loop {
            match self.model.complete(messages.clone()).await {
                Err(LlmError::RateLimited { retry_after }) if attempt < self.max_retries => {
                    attempt += 1;
                    let delay = retry_after.unwrap_or(1).min(MAX_RETRY_DELAY_SECS);
                    warn!(attempt, delay_secs = delay, "rate limited, retrying");
                    tokio::time::sleep(Duration::from_secs(delay)).await;
                }
                other => return other,
            }
        }
    }
}

#[async_trait]
impl AgentRuntime for LlmRuntime {
    async fn execute(&self, task: &Task, context: Option<&str>) -> Result<TaskOutput, AgentError> {
        let messages = vec![
            ChatMessage::system(task.agent.system_prompt(&task.expected_output)),
            ChatMessage::user(task.prompt(context)),
        ];
        debug!(role = %task.agent.role, has_context = context.is_some(), "executing task");

        match tokio::time::timeout(self.timeout, self.complete_with_retries(messages)).await {
            Ok(result) => Ok(TaskOutput::Text(result?)),
            Err(_) => Err(AgentError::Timeout {
                stage: task.agent.role.clone(),
                secs: self.timeout.as_secs(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn reply(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }]
        }))
    }

    fn runtime(server: &MockServer, timeout: Duration, max_retries: u32) -> LlmRuntime {
        let model = ModelClient::new("k".into(), server.uri(), "org/m", 0.7, 64).unwrap();
        LlmRuntime::new(Arc::new(model), timeout, max_retries)
    }

    fn task() -> Task {
        Task::frontend("a counter button", Arc::new(Agent::frontend()))
    }

    #[tokio::test]
    async fn execute_sends_persona_and_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("Senior Next.js frontend developer"))
            .and(body_string_contains("a counter button"))
            .and(body_string_contains("upstream code"))
            .respond_with(reply("() => <button/>"))
            .expect(1)
            .mount(&server)
            .await;

        let rt = runtime(&server, Duration::from_secs(5), 0);
        let out = rt.execute(&task(), Some("upstream code")).await.unwrap();
        assert_eq!(out, TaskOutput::Text("() => <button/>".into()));
    }

    #[tokio::test]
    async fn retries_after_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(reply("ok"))
            .mount(&server)
            .await;

        let rt = runtime(&server, Duration::from_secs(5), 1);
        let out = rt.execute(&task(), None).await.unwrap();
        assert_eq!(out.payload(), "ok");
    }

    #[tokio::test]
    async fn gives_up_when_retries_exhausted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
            .expect(2)
            .mount(&server)
            .await;

        let rt = runtime(&server, Duration::from_secs(5), 1);
        let err = rt.execute(&task(), None).await.unwrap_err();
        assert!(matches!(err, AgentError::Llm(LlmError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn api_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let rt = runtime(&server, Duration::from_secs(5), 3);
        let err = rt.execute(&task(), None).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn slow_model_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(reply("late").set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let rt = runtime(&server, Duration::from_millis(100), 0);
        let err = rt.execute(&task(), None).await.unwrap_err();
        match err {
            AgentError::Timeout { stage, secs } => {
                assert_eq!(stage, Agent::frontend().role);
                assert_eq!(secs, 0);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
