mod config;
mod export;
mod invoker;
mod llm;
mod models;
mod orchestrator;
mod pdf;
mod prompt;
mod routes;

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::AppConfig;
use crate::invoker::ModelInvoker;
use crate::llm::{ChatBackend, DemoBackend, OpenAiClient};
use crate::orchestrator::Orchestrator;
use crate::routes::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    let backend: Arc<dyn ChatBackend> = if config.is_demo() {
        tracing::warn!("OPENAI_API_KEY not set, running in demo mode");
        Arc::new(DemoBackend)
    } else {
        tracing::info!("🔑 API key configured");
        Arc::new(OpenAiClient::new(config.api_key.clone(), config.api_base.clone()))
    };

    let orchestrator = Orchestrator::new(
        ModelInvoker::new(backend, config.temperature),
        config.candidates(),
        config.faq_model.clone(),
    );
    tracing::info!(
        preferred = %config.preferred_model,
        fallback = %config.fallback_model,
        faq = %config.faq_model,
        "Model candidates configured"
    );

    let app = router(AppState { orchestrator: Arc::new(orchestrator) });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
