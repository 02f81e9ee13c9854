mod analytics;
mod ats_client;
mod classify;
mod config;
mod dashboard;
mod errors;
mod generation;
mod llm_client;
mod models;
mod practice;
mod profile;
mod routes;
mod session;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ats_client::AtsClient;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::MemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Prepwise API v{}", env!("CARGO_PKG_VERSION"));

    // Document store seam — in-memory backing until an external store is wired in
    let store = Arc::new(MemoryStore::new());
    info!("Document store initialized (in-memory)");

    // Text generator
    let generator = Arc::new(LlmClient::new(config.anthropic_api_key.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Resume match client
    let ats = AtsClient::new(config.ats_base_url.clone());
    match &config.ats_base_url {
        Some(base) => info!("ATS match client initialized ({base})"),
        None => info!("ATS base URL not configured — resume matching disabled"),
    }

    // Build app state
    let state = AppState {
        store,
        generator,
        ats,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
