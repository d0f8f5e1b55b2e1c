use std::sync::Arc;

use anyhow::{anyhow, Context};
use tracing_subscriber::EnvFilter;

use bilemo_api::auth::hash_password;
use bilemo_api::config::AppConfig;
use bilemo_api::database::fixtures::DEFAULT_PASSWORD;
use bilemo_api::database::{DatabaseManager, Fixtures, MemoryStore, PgStore, Repositories};
use bilemo_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, JWT_SECRET, etc. are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bilemo_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting BileMo API in {:?} mode", config.environment);

    let (repos, database) = match config.database.url {
        Some(_) => {
            let database = DatabaseManager::connect(&config.database).await?;
            if config.database.run_migrations {
                database.migrate().await?;
            }
            let store = Arc::new(PgStore::new(database.pool().clone()));
            (Repositories::from_store(store), Some(database))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, serving the seeded in-memory data set");
            let hash = hash_password(DEFAULT_PASSWORD).map_err(|e| anyhow!("failed to hash fixture password: {}", e))?;
            let store = Arc::new(MemoryStore::seeded(Fixtures::generate(&hash)));
            (Repositories::from_store(store), None)
        }
    };

    let bind_addr = config.server.bind_address();
    let state = AppState::new(config, repos).context("failed to build application state")?;
    let app = bilemo_api::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("BileMo API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(database) = database {
        database.close().await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
