//! Task output: the boundary type for whatever an agent runtime returns.
//!
//! Runtimes that only produce text use `Text`. Runtimes that hand back a
//! result object use `Structured`, and [`TaskOutput::payload`] digs the
//! text out of it without assuming a fixed schema.

use serde_json::Value;

/// Result-holder fields, in lookup priority order.
pub const RESULT_FIELDS: [&str; 4] = ["output", "raw_output", "final_output", "result"];

/// Key read from a mapping-valued result field.
const CONTENT_KEY: &str = "content";

/// Raw output of one executed task.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutput {
    Text(String),
    Structured(Value),
}

impl TaskOutput {
    /// Textual payload of the output.
    ///
    /// For `Structured`, the first of [`RESULT_FIELDS`] present wins. A
    /// mapping value yields its `content` key, or the mapping's JSON form
    /// when that key is missing. With no known field the whole value is
    /// rendered.
    pub fn payload(&self) -> String {
        match self {
            TaskOutput::Text(text) => text.clone(),
            TaskOutput::Structured(value) => extract(value),
        }
    }
}

impl From<String> for TaskOutput {
    fn from(text: String) -> Self {
        TaskOutput::Text(text)
    }
}

fn extract(value: &Value) -> String {
    let held = value
        .as_object()
        .and_then(|obj| RESULT_FIELDS.iter().find_map(|field| obj.get(*field)));

    match held {
        Some(inner) => match inner {
            Value::Object(map) => map
                .get(CONTENT_KEY)
                .map(render)
                .unwrap_or_else(|| inner.to_string()),
            other => render(other),
        },
        None => render(value),
    }
}

/// Strings unquoted, everything else as compact JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
