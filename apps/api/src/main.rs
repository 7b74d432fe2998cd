mod config;
mod documents;
mod errors;
mod llm_client;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::InferenceClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting docqa v{}", env!("CARGO_PKG_VERSION"));

    let llm = InferenceClient::new(&config).context("Failed to build inference HTTP client")?;
    info!(
        "Inference client initialized (model: {}, endpoint: {})",
        llm.model(),
        config.inference_url
    );

    let state = AppState::new(config.clone(), llm);
    state.uploads.ensure_dir().with_context(|| {
        format!(
            "Failed to create upload directory '{}'",
            state.uploads.dir().display()
        )
    })?;
    info!("Upload directory: {}", state.uploads.dir().display());

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
