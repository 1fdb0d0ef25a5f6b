use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use coupond::api;
use coupond::config::{Config, DatabaseBackend};
use coupond::storage::{CouponStore, PostgresStorage, SqliteStorage};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    let store: Arc<dyn CouponStore> = match config.database.backend {
        DatabaseBackend::Sqlite => {
            info!("Using SQLite storage: {}", config.database.url);
            Arc::new(
                SqliteStorage::new(&config.database.url, config.database.max_connections).await?,
            )
        }
        DatabaseBackend::Postgres => {
            info!("Using PostgreSQL storage: {}", config.database.url);
            Arc::new(
                PostgresStorage::new(&config.database.url, config.database.max_connections).await?,
            )
        }
    };

    // Ensure the schema exists before accepting any traffic
    info!("Initializing database...");
    store.init().await?;
    info!("Database initialized successfully");

    let router = api::create_api_router(Arc::clone(&store), &config.api);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 API server listening on http://{}", addr);
    info!(
        "   - Coupon endpoints available at http://{}{}/{}/coupon",
        addr, config.api.base_path, config.api.version
    );

    axum::serve(listener, router).await?;

    Ok(())
}
