//! parkswap server entry point.
//!
//! Starts the Axum HTTP server after connecting to PostgreSQL and
//! applying migrations.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use parkswap::api;
use parkswap::app_state::AppState;
use parkswap::config::ServiceConfig;
use parkswap::persistence::PgSwapStore;
use parkswap::service::SwapCoordinator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = ServiceConfig::from_env()
        .map_err(|e| anyhow::anyhow!("loading configuration: {e}"))?;
    tracing::info!(addr = %config.listen_addr, "starting parkswap");

    // Connect to PostgreSQL and apply migrations
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await
        .context("connecting to PostgreSQL")?;
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("applying migrations")?;

    // Build service layer
    let store = Arc::new(PgSwapStore::new(pool));
    let coordinator = Arc::new(SwapCoordinator::new(store));

    // Build application state
    let app_state = AppState { coordinator };

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
