//! Generation agents: personas, tasks, and the runtime that executes them.
//!
//! ## Architecture
//!
//! - `prompts`: Persona text, rule sets, system prompt builder
//! - `task`: Task descriptors for the frontend and backend stages
//! - `output`: `TaskOutput`, the boundary type for whatever a runtime returns
//! - `runtime`: `AgentRuntime` trait and the LLM-backed `LlmRuntime`

pub mod output;
pub mod prompts;
pub mod runtime;
pub mod task;

pub use output::TaskOutput;
pub use runtime::{AgentRuntime, LlmRuntime};
pub use task::Task;

use crate::llm::client::LlmError;

/// Errors from executing a task.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("{stage} exceeded {secs}s")]
    Timeout { stage: String, secs: u64 },

    #[error("agent runtime unavailable: {0}")]
    Unavailable(String),
}

/// A configured persona. The model client lives in the runtime, so one
/// agent definition can be shared by any number of tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl Agent {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
        }
    }

    /// The React component author.
    pub fn frontend() -> Self {
        Self::new(
            prompts::FRONTEND_ROLE,
            prompts::FRONTEND_GOAL,
            prompts::FRONTEND_BACKSTORY,
        )
    }

    /// The API author.
    pub fn backend() -> Self {
        Self::new(
            prompts::BACKEND_ROLE,
            prompts::BACKEND_GOAL,
            prompts::BACKEND_BACKSTORY,
        )
    }

    /// System prompt for this persona working towards `expected_output`.
    pub fn system_prompt(&self, expected_output: &str) -> String {
        prompts::build_system_prompt(&self.role, &self.goal, &self.backstory, expected_output)
    }
}
