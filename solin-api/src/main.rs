//! # Solin API Server
//!
//! Book-tracking backend: accounts, reading lists, favorites and comments,
//! with book metadata served live from Open Library.
//!
//! ## Usage
//!
//! ```bash
//! SECRET_KEY=... DATABASE_URL=postgresql://localhost/solin cargo run -p solin-api
//! ```
//!
//! Without `DATABASE_URL` the server runs against an in-memory store.

use anyhow::Context;
use solin_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat},
};
use solin_shared::{
    catalog::OpenLibraryClient,
    db::{migrations, pool},
    store::{MemoryStore, PgStore, Store},
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    init_tracing(config.log_format);

    tracing::info!(
        "Solin API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let (store, pg_pool) = open_store(&config).await?;
    tracing::info!(backend = store.backend(), "Store ready");

    let catalog = OpenLibraryClient::new(config.catalog_config())
        .context("Failed to build catalog client")?;

    let bind_address = config.bind_address();
    let state = AppState::new(store, Arc::new(catalog), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(pg_pool) = pg_pool {
        pool::close_pool(pg_pool).await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "solin_api=debug,solin_shared=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// PostgreSQL when a database is configured, the in-memory store otherwise
async fn open_store(config: &Config) -> anyhow::Result<(Arc<dyn Store>, Option<PgPool>)> {
    let Some(database) = &config.database else {
        tracing::warn!("DATABASE_URL not set, data will not survive a restart");
        return Ok((Arc::new(MemoryStore::new()), None));
    };

    migrations::ensure_database_exists(&database.url)
        .await
        .context("Failed to create database")?;

    let pg_pool = pool::create_pool(pool::DatabaseConfig {
        url: database.url.clone(),
        max_connections: database.max_connections,
        ..Default::default()
    })
    .await
    .context("Failed to connect to database")?;

    migrations::run_migrations(&pg_pool)
        .await
        .context("Failed to run migrations")?;

    let status = migrations::get_migration_status(&pg_pool).await?;
    tracing::info!(
        applied = status.applied,
        known = status.known,
        latest = ?status.latest_version,
        "Database schema ready"
    );

    Ok((Arc::new(PgStore::new(pg_pool.clone())), Some(pg_pool)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
