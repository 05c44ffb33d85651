//! API Module
//!
//! HTTP handlers, WebSocket fan-out and routing for the cache server.
//!
//! # Endpoints
//! - `POST /api/cache` - Store a key-value pair
//! - `GET /api/cache` - List all non-expired entries, MRU first
//! - `GET /api/cache/:key` - Retrieve a value by key
//! - `DELETE /api/cache/:key` - Delete a key
//! - `GET /ws` - WebSocket stream of cache snapshots
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
