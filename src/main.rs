//! kv-cache - A concurrent, bounded, time-aware key-value cache server
//!
//! Combines LRU eviction, a memory ceiling and TTL expiration behind a
//! small HTTP/WebSocket API.

mod api;
mod cache;
mod config;
mod error;
mod models;
mod tasks;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use cache::Cache;
use config::Config;

/// Main entry point for the kv-cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache, which starts its own background sweeper
/// 4. Create Axum router with all endpoints
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM, stopping the sweeper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kv_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting kv-cache server");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, max_memory_bytes={}, default_ttl={}s, port={}, sweep_interval={}s",
        config.capacity,
        config.max_memory_bytes,
        config.default_ttl_seconds,
        config.server_port,
        config.sweep_interval_seconds
    );

    // Create application state; the cache owns its sweeper
    let state = AppState::from_config(&config)?;
    let cache = state.cache.clone();
    info!("Cache initialized, sweeper started");

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cache))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, stops the cache's sweeper and allows graceful shutdown.
async fn shutdown_signal(cache: Arc<Cache>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    cache.shutdown();
    warn!("Sweeper stopped");
}
