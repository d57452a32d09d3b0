//! Prompt templates for the two generation agents.
//!
//! - Personas: role, goal and backstory for each agent
//! - Rule sets: appended to task instructions
//! - Expected-output hints: shown to the model, never used for validation

/// Frontend persona.
pub const FRONTEND_ROLE: &str = "Senior Next.js frontend developer";
pub const FRONTEND_GOAL: &str = "Generate clean React components based on UI prompts";
pub const FRONTEND_BACKSTORY: &str =
    "10 years of experience in building production-grade frontend apps with Next.js and React.";

/// Backend persona.
pub const BACKEND_ROLE: &str = "Senior backend developer";
pub const BACKEND_GOAL: &str = "Generate minimal FastAPI endpoints supporting the frontend UI";
pub const BACKEND_BACKSTORY: &str =
    "10 years of experience building scalable APIs and databases using FastAPI and PostgreSQL.";

/// Strict rules for the frontend instruction.
pub const FRONTEND_RULES: &str = "\
Rules:
- Output ONLY a single anonymous zero-argument function expression starting with: () => {...}
- The component must run directly inside react-live.
- NO imports, exports, or markdown.
- NO explanations or commentary.
- Use React.useState for state when needed.";

/// Instruction for the backend stage. The frontend code, when available,
/// arrives as task context rather than being spliced in here.
pub const BACKEND_INSTRUCTION: &str = "\
Create a backend API to support the above frontend functionality.

Rules:
- Output a minimal FastAPI application exposing the endpoints the component needs.
- Output only the API code: NO markdown fences and NO explanations.";

/// Expected-output hint for the frontend task.
pub const FRONTEND_EXPECTED: &str = "\
A FULL React functional component written as `() => { ... }` that can run directly \
inside react-live, with no imports, exports, markdown or commentary.";

/// Expected-output hint for the backend task.
pub const BACKEND_EXPECTED: &str = "\
A minimal FastAPI endpoint module that supports the frontend component's functionality. \
Only the API code, no explanations.";

/// Header placed before upstream output in a task prompt.
pub const CONTEXT_HEADER: &str = "This is the context you're working with:";

/// Build the system prompt for an agent persona and an expected-output hint.
pub fn build_system_prompt(
    role: &str,
    goal: &str,
    backstory: &str,
    expected_output: &str,
) -> String {
    let mut prompt = format!("You are a {role}. {backstory}\n\nYour personal goal is: {goal}");

    if !expected_output.is_empty() {
        prompt.push_str("\n\nThis is the expected criteria for your final answer:\n");
        prompt.push_str(expected_output);
    }

    prompt
}
