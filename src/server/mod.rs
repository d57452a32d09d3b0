//! HTTP surface: router, CORS, and the application context shared by handlers.

pub mod routes;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::agent::{AgentRuntime, LlmRuntime};
use crate::config::Config;
use crate::llm::client::LlmError;
use crate::pipeline::GenerationPipeline;

/// Errors that stop the server from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid CORS origin: '{0}'")]
    InvalidOrigin(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a request needs. Built once at startup, read-only afterwards.
pub struct AppContext {
    pub pipeline: GenerationPipeline,
    /// Model ID reported by `/health`.
    pub model: String,
}

impl AppContext {
    pub fn new(runtime: Arc<dyn AgentRuntime>, model: impl Into<String>) -> Self {
        Self {
            pipeline: GenerationPipeline::new(runtime),
            model: model.into(),
        }
    }

    /// Build the model client, runtime and pipeline from configuration.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let runtime = LlmRuntime::from_config(config)?;
        let client = runtime.model();
        info!(
            model = client.model(),
            base_url = client.base_url(),
            temperature = client.temperature(),
            max_tokens = client.max_tokens(),
            "model client initialised"
        );
        let model = client.model().to_string();
        Ok(Self::new(Arc::new(runtime), model))
    }
}

/// Build the application router.
pub fn router(ctx: Arc<AppContext>, allowed_origins: &[String]) -> Result<Router, ServerError> {
    Ok(Router::new()
        .route("/api/generate-ui", post(routes::generate_ui))
        .route("/health", get(routes::health))
        .with_state(ctx)
        .layer(cors_layer(allowed_origins)?)
        .layer(TraceLayer::new_for_http()))
}

/// Listed origins only, with credentials. Methods and headers are mirrored
/// from the preflight, since wildcards are not allowed alongside credentials.
fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, ServerError> {
    let origins = allowed_origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).map_err(|_| ServerError::InvalidOrigin(o.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .expose_headers([HeaderName::from_static(routes::PROTOCOL_HEADER)]))
}

/// Bind and serve until Ctrl-C.
pub async fn serve(ctx: Arc<AppContext>, config: &Config) -> Result<(), ServerError> {
    let app = router(ctx, &config.allowed_origins)?;
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!(addr = %listener.local_addr()?, origins = ?config.allowed_origins, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler; run until the process is killed.
        std::future::pending::<()>().await;
    }
}
