//! Task descriptors. One unit of work for one agent.

use std::sync::Arc;

use super::{prompts, Agent};

/// Instruction, expected-output hint, and the agent that executes it.
#[derive(Debug, Clone)]
pub struct Task {
    pub description: String,
    /// Shown to the model as a hint; never checked against the result.
    pub expected_output: String,
    pub agent: Arc<Agent>,
}

impl Task {
    pub fn new(
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: Arc<Agent>,
    ) -> Self {
        Self {
            description: description.into(),
            expected_output: expected_output.into(),
            agent,
        }
    }

    /// Frontend stage: the user's description plus the strict rule set.
    pub fn frontend(ui_description: &str, agent: Arc<Agent>) -> Self {
        Self::new(
            format!(
                "Frontend component for: {}\n\n{}",
                ui_description.trim(),
                prompts::FRONTEND_RULES
            ),
            prompts::FRONTEND_EXPECTED,
            agent,
        )
    }

    /// Backend stage. Describes the frontend abstractly; the generated
    /// component, if any, is supplied as execution context.
    pub fn backend(agent: Arc<Agent>) -> Self {
        Self::new(prompts::BACKEND_INSTRUCTION, prompts::BACKEND_EXPECTED, agent)
    }

    /// User-facing prompt, with upstream output appended when present.
    pub fn prompt(&self, context: Option<&str>) -> String {
        match context.map(str::trim).filter(|c| !c.is_empty()) {
            Some(ctx) => format!(
                "{}\n\n{}\n\n{}",
                self.description,
                prompts::CONTEXT_HEADER,
                ctx
            ),
            None => self.description.clone(),
        }
    }
}
