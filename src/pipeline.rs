//! GenerationPipeline: two-stage orchestration from a UI description to
//! frontend and backend code.
//!
//! Stage 1 asks the frontend agent for a React component. Stage 2 asks the
//! backend agent for an API, with stage 1's sanitized code as context when
//! there is some. Each stage's output goes through [`sanitize`].
//!
//! A failed stage never fails the run: its artifact is replaced by a fixed
//! placeholder and the other stage's result is kept.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{error, info};

use crate::agent::{Agent, AgentRuntime, Task};
use crate::sanitize::{sanitize, NO_CODE_PLACEHOLDER};

/// Project-relative path of the generated component.
pub const FRONTEND_PATH: &str = "src/pages/index.tsx";
/// Project-relative path of the generated API.
pub const BACKEND_PATH: &str = "backend/main.py";

pub const FRONTEND_ERROR_PLACEHOLDER: &str = "() => (<div>Error generating UI</div>)";
pub const BACKEND_ERROR_PLACEHOLDER: &str = "# Error generating backend";

/// Pipeline stage, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Frontend,
    Backend,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Frontend => write!(f, "frontend"),
            Stage::Backend => write!(f, "backend"),
        }
    }
}

/// Final output of one run. Both fields are always non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifactSet {
    pub frontend_code: String,
    pub backend_code: String,
}

impl GeneratedArtifactSet {
    /// The pair returned when nothing could be generated.
    #[cfg(test)]
    pub(crate) fn placeholders() -> Self {
        Self {
            frontend_code: FRONTEND_ERROR_PLACEHOLDER.to_string(),
            backend_code: BACKEND_ERROR_PLACEHOLDER.to_string(),
        }
    }

    /// Artifacts keyed by project-relative path.
    pub fn into_files(self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (FRONTEND_PATH.to_string(), self.frontend_code),
            (BACKEND_PATH.to_string(), self.backend_code),
        ])
    }
}

/// Sequences the frontend and backend agents over one runtime.
pub struct GenerationPipeline {
    runtime: Arc<dyn AgentRuntime>,
    frontend: Arc<Agent>,
    backend: Arc<Agent>,
}

impl GenerationPipeline {
    /// Pipeline with the default frontend and backend personas.
    pub fn new(runtime: Arc<dyn AgentRuntime>) -> Self {
        Self::with_agents(runtime, Agent::frontend(), Agent::backend())
    }

    pub fn with_agents(runtime: Arc<dyn AgentRuntime>, frontend: Agent, backend: Agent) -> Self {
        Self {
            runtime,
            frontend: Arc::new(frontend),
            backend: Arc::new(backend),
        }
    }

    /// Generate both artifacts for `ui_description`.
    pub async fn run(&self, ui_description: &str) -> GeneratedArtifactSet {
        let frontend_task = Task::frontend(ui_description, self.frontend.clone());
        let backend_task = Task::backend(self.backend.clone());

        let frontend = self.run_stage(Stage::Frontend, &frontend_task, None).await;

        // Placeholder output tells the backend agent nothing.
        let context = frontend
            .as_deref()
            .filter(|code| *code != NO_CODE_PLACEHOLDER);
        let backend = self.run_stage(Stage::Backend, &backend_task, context).await;

        GeneratedArtifactSet {
            frontend_code: frontend.unwrap_or_else(|| FRONTEND_ERROR_PLACEHOLDER.to_string()),
            backend_code: backend.unwrap_or_else(|| BACKEND_ERROR_PLACEHOLDER.to_string()),
        }
    }

    /// Execute one stage and sanitize its payload. `None` on failure.
    async fn run_stage(&self, stage: Stage, task: &Task, context: Option<&str>) -> Option<String> {
        info!(%stage, has_context = context.is_some(), "stage started");

        match self.runtime.execute(task, context).await {
            Ok(output) => {
                let code = sanitize(&output.payload());
                info!(%stage, chars = code.len(), "stage finished");
                Some(code)
            }
            Err(e) => {
                error!(%stage, error = %e, "stage failed");
                None
            }
        }
    }
}
