mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod optimization;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::Gateway;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars or an unknown backend)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the generation gateway
    let gateway = Gateway::from_config(&config)?;
    let available = gateway.available_backends();
    if gateway.default_available() {
        info!(
            "Generation gateway ready (default: {}, available: {:?}, spacing: {:?})",
            gateway.default_backend(),
            available,
            config.min_call_interval
        );
    } else {
        warn!(
            "Default backend '{}' has no API key; generative paths will use rule-based fallbacks",
            gateway.default_backend()
        );
    }

    info!("Job records under {}", config.jobs_dir.display());

    // Build app state
    let state = AppState::new(config.clone(), gateway);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
