// Pokemon Coach - Web Server
// REST API with Axum over the fetch/save/history pipeline

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use pokemon_coach::{api, logging, CoachConfig, PokeApiClient, RecordService, SqliteStore};

fn main() -> Result<()> {
    logging::init("pokemon_coach=info,tower_http=info");

    let config = CoachConfig::from_env().context("Failed to load configuration")?;

    let store = Arc::new(
        SqliteStore::open(&config.db_path)
            .with_context(|| format!("Failed to open database {}", config.db_path.display()))?,
    );
    info!(path = %config.db_path.display(), "database opened");

    // The blocking HTTP client must be built and dropped outside the async runtime
    let source = Arc::new(
        PokeApiClient::new(config.base_url.as_str(), config.http_timeout)
            .context("Failed to build provider client")?,
    );
    let service = Arc::new(RecordService::new(source, store));

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(serve(&config.bind_addr, service.clone()))?;
    drop(runtime);

    Ok(())
}

async fn serve(addr: &str, service: Arc<RecordService>) -> Result<()> {
    let app = api::router(service);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(%addr, "server running");
    info!("   API: http://{}/pokemon/{{identifier}}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
