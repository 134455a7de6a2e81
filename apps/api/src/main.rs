mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;
mod tailoring;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::OllamaClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::ResumeStore;
use crate::tailoring::filler::GenericFiller;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize model client
    let llm = OllamaClient::new(
        config.ollama_url.clone(),
        config.ollama_model.clone(),
        config.model_timeout,
    )
    .context("Failed to build the model HTTP client")?;
    info!(
        "Model client initialized (model: {}, url: {}, timeout: {:?})",
        llm.model(),
        config.ollama_url,
        config.model_timeout
    );

    // Base resume is read per request; only warn here so the file can be added later
    let store = ResumeStore::new(config.base_resume_path.clone());
    match store.load().await {
        Ok(resume) => info!(
            "Base resume found at {} ({} experience entries)",
            store.path().display(),
            resume.experience.len()
        ),
        Err(e) => warn!("{e}"),
    }
    info!("Tailor mode: {:?}", config.tailor_mode);

    let state = AppState {
        llm: Arc::new(llm),
        store,
        filler: Arc::new(GenericFiller),
        config: config.clone(),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
