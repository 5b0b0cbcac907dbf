use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use bookmarks_api::config::{self, LoggingConfig, StoreBackend, StoreConfig};
use bookmarks_api::store::{BookmarkStore, MemoryStore, PostgresStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up API_TOKEN, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    init_tracing(&config.logging);
    tracing::info!("Starting Bookmarks API in {:?} mode", config.environment);

    config.validate().context("invalid configuration")?;

    let store = open_store(&config.store).await?;
    tracing::info!("Using {} bookmark store", store.backend());
    if bookmarks_api::is_production!() && config.store.backend == StoreBackend::Memory {
        tracing::warn!("Memory store in production: bookmarks are lost on restart");
    }

    let app = bookmarks_api::app(config, store);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Bookmarks API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Bookmarks API stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn open_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn BookmarkStore>> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Postgres => {
            let store = PostgresStore::connect(config)
                .await
                .context("failed to connect to database")?;
            store
                .ensure_schema()
                .await
                .context("failed to create bookmarks table")?;
            Ok(Arc::new(store))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
