//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, get_handler, health_handler, list_handler, set_handler, ws_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /api/cache` - Store a key-value pair
/// - `GET /api/cache` - List all non-expired entries, MRU first
/// - `GET /api/cache/:key` - Retrieve a value by key
/// - `DELETE /api/cache/:key` - Delete a key (idempotent)
/// - `GET /ws` - WebSocket stream of cache snapshots
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/api/cache", post(set_handler).get(list_handler))
        .route(
            "/api/cache/:key",
            get(get_handler).delete(delete_handler),
        )
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
