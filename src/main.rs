use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use webagent::config::{self, Config};
use webagent::server::{self, routes::GenerateResponse, AppContext};

#[derive(Parser)]
#[command(name = "webagent", version, about = "AI web agent backend")]
struct Cli {
    /// Optional YAML config file. Environment variables take precedence.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API.
    Serve {
        /// Listen address, e.g. 127.0.0.1:8000.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run one generation and print the files as JSON.
    Generate {
        /// UI description.
        prompt: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = config::load_dotenv(None).context("loading .env")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("webagent=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = env_file {
        info!(path = %path.display(), "loaded .env");
    }

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    let ctx = AppContext::from_config(&config).context("initialising model client")?;
    let ctx = Arc::new(ctx);

    match cli.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            info!(model = %ctx.model, "starting webagent");
            server::serve(ctx, &config).await?;
        }
        Command::Generate { prompt } => {
            if prompt.trim().is_empty() {
                anyhow::bail!("prompt must not be empty");
            }
            let artifacts = ctx.pipeline.run(&prompt).await;
            let response = GenerateResponse::from(artifacts);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
