//! attestboard-backend
//!
//! HTTP service for the attestation dashboard.

use std::{env, net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use attestboard_backend::{app_router, AppState};
use attestboard_core::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "attestboard_backend=debug,attestboard_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Arc::new(AppConfig::from_env()?);

    tracing::info!(
        "Active chain: {} (id {})",
        config.chain.display_name,
        config.chain.chain_id
    );
    tracing::info!("GraphQL endpoint: {}", config.graphql_url);
    tracing::info!("Indexer endpoint: {}", config.indexer_url);
    tracing::info!("Indexer wait enabled: {}", config.enable_indexer_wait);

    let state = AppState::from_config(config);

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Attestation dashboard service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app_router(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C signal handler");
    tracing::info!("Shutdown signal received");
}
