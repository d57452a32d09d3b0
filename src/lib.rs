//! webagent turns a natural-language UI description into a React
//! component and a matching FastAPI backend.
//!
//! `server` receives the description, `pipeline` runs the frontend and
//! backend agents in order through an `agent::AgentRuntime`, and `sanitize`
//! reduces each completion to embeddable code.

pub mod agent;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod sanitize;
pub mod server;
