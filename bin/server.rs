// Agricultural Records - Web Server
// REST API with Axum over SQLite (or an in-memory store with --memory)

use agro_records::api::{router, AppState};
use agro_records::config::ServerConfig;
use agro_records::{logging, MemoryStore, SqliteStore};
use anyhow::{Context, Result};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let config = ServerConfig::parse();

    tracing::info!("🌾 Agricultural Records - Web Server v{}", agro_records::VERSION);

    let app = if config.memory {
        tracing::warn!("using in-memory store, records are lost on exit");
        router(AppState::new(MemoryStore::new(), config.labels.clone()))
    } else {
        let store = SqliteStore::open(&config.database)?;
        tracing::info!(database = %config.database.display(), "✓ Database opened");
        router(AppState::new(store, config.labels.clone()))
    };

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    tracing::info!("🚀 Server running on http://{}", config.bind);

    axum::serve(listener, app)
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}
