mod config;
mod documents;
mod errors;
mod generation;
mod layout;
mod llm_client;
mod render;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::layout::a4_letter_layout;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::{Orchestrator, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // .env may carry RUST_LOG, so it is read before the subscriber is installed
    dotenvy::dotenv().ok();
    init_tracing();

    // Secrets-file diagnostics are logged from here on
    let config = Config::from_env()?;

    info!("Starting Letterdesk API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::from_config(&config)?;
    info!(
        "LLM client initialized (model: {}, max attempts: {})",
        llm.model(),
        config.llm_max_attempts
    );

    let layout = a4_letter_layout();
    info!(
        "PDF layout: {:.0}x{:.0}pt, Helvetica {}pt",
        layout.page_width_pt, layout.page_height_pt, layout.font_size_pt
    );

    // Build app state
    let state = AppState {
        sessions: SessionStore::new(Duration::from_secs(config.session_idle_ttl_secs)),
        orchestrator: Orchestrator::new(Arc::new(llm), layout),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={default_level}", env!("CARGO_PKG_NAME")))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
