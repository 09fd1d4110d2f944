use std::time::Duration;

use anyhow::Result;
use tracing::info;

use fleettrack_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics();

    info!("Starting FleetTrack API v{}", env!("CARGO_PKG_VERSION"));

    // Create database pool
    let pool_settings = persistence::db::PoolSettings {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        acquire_timeout: Duration::from_secs(config.database.connect_timeout_secs),
        idle_timeout: Duration::from_secs(config.database.idle_timeout_secs),
    };
    let pool = persistence::db::create_pool(&pool_settings).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    let addr = config.socket_addr()?;

    // Build application
    let app = app::create_app(config, pool);

    // Start server
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
