//! Route handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::AppContext;
use crate::pipeline::GeneratedArtifactSet;

/// Response header naming the wire protocol of `/api/generate-ui`.
pub const PROTOCOL_HEADER: &str = "x-webagent-protocol";
/// Path-keyed `files` mapping.
pub const PROTOCOL_VERSION: &str = "files/1";

/// Body of `POST /api/generate-ui`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
}

/// Successful (or in-band failed) generation.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateResponse {
    pub files: BTreeMap<String, String>,
}

impl From<GeneratedArtifactSet> for GenerateResponse {
    fn from(set: GeneratedArtifactSet) -> Self {
        Self {
            files: set.into_files(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

/// `POST /api/generate-ui`: always 200 once the prompt is accepted;
/// generation failures come back as placeholder artifacts.
pub async fn generate_ui(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<GenerationRequest>,
) -> Response {
    let span = info_span!("generate_ui", request_id = %Uuid::new_v4());

    async move {
        let prompt = request.prompt.trim();
        if prompt.is_empty() {
            warn!("rejected empty prompt");
            return (
                StatusCode::BAD_REQUEST,
                [(PROTOCOL_HEADER, PROTOCOL_VERSION)],
                Json(ErrorBody {
                    error: "prompt must not be empty",
                }),
            )
                .into_response();
        }

        info!(prompt_len = prompt.len(), "generation requested");
        let artifacts = ctx.pipeline.run(prompt).await;

        (
            [(PROTOCOL_HEADER, PROTOCOL_VERSION)],
            Json(GenerateResponse::from(artifacts)),
        )
            .into_response()
    }
    .instrument(span)
    .await
}

/// `GET /health`
pub async fn health(State(ctx): State<Arc<AppContext>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "model": ctx.model,
    }))
}
