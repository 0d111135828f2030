//! Download Events Server - Binary Entry Point
//!
//! Serves the events of a JSONL export over HTTP.

use std::sync::Arc;

use tracing::info;

use download_events::api::{create_router, AppState};
use download_events::config::ServerConfig;
use download_events::event_store::JsonlEventStore;
use download_events::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing()?;

    let config = ServerConfig::from_env();
    let store = JsonlEventStore::with_config(config.store.clone()).load()?;
    let state = Arc::new(AppState::with_store(store, config.limits));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(
        addr = %config.bind,
        version = download_events::VERSION,
        max_per_page = config.limits.ceiling(),
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
