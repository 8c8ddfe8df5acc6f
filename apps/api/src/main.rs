mod article;
mod config;
mod errors;
mod layout;
mod llm_client;
mod render;
mod routes;
mod scheduler;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::article::store::ArticleStore;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Daily Reading API v{}", env!("CARGO_PKG_VERSION"));

    // Article directory is created up front so the static service can serve it.
    let store = ArticleStore::new(config.articles_dir.clone());
    store.ensure_dir().await?;
    info!("Article store at {}", store.dir().display());

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_api_base_url.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Build app state
    let state = AppState {
        store,
        writer: Arc::new(llm),
    };

    if config.enable_scheduler {
        scheduler::spawn_daily_job(state.clone(), config.daily_generation_hour);
        info!(
            "Daily article generation scheduled at {:02}:00",
            config.daily_generation_hour
        );
    }

    // Build router
    let app = build_router(state, &config.public_dir)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
