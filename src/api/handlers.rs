//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint, plus the
//! WebSocket subscription that streams cache snapshots to clients.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
    Json,
};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::cache::{Cache, CacheItem};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse};

/// Application state shared across all handlers.
///
/// The cache handle is internally synchronized; the state only adds the
/// HTTP-layer default TTL.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache handle
    pub cache: Arc<Cache>,
    /// TTL applied when a SET request omits one
    pub default_ttl_seconds: i64,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: Cache, default_ttl_seconds: i64) -> Self {
        Self {
            cache: Arc::new(cache),
            default_ttl_seconds,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// # Errors
    /// Fails if the configured bounds are invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = Cache::from_config(config)?;
        Ok(Self::new(cache, config.default_ttl_seconds))
    }
}

/// Handler for POST /api/cache
///
/// Stores a key-value pair with an optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl_seconds = req.ttl_seconds.unwrap_or(state.default_ttl_seconds);
    state.cache.set(req.key.clone(), req.value, ttl_seconds).await;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /api/cache/:key
///
/// Retrieves a value from the cache by key; 404 when absent or expired.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key).await {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /api/cache/:key
///
/// Deletes a key. Idempotent: deleting an absent key still returns 200.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    state.cache.delete(&key).await;
    Json(DeleteResponse::new(key))
}

/// Handler for GET /api/cache
///
/// Returns all non-expired entries, most-recently-used first.
pub async fn list_handler(State(state): State<AppState>) -> Json<Vec<CacheItem>> {
    Json(state.cache.list_all().await)
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /ws
///
/// Upgrades to a WebSocket that receives the current snapshot on connect
/// and a fresh snapshot after every observed cache change.
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let rx = state.cache.subscribe();
    let initial = state.cache.list_all().await;
    ws.on_upgrade(move |socket| stream_changes(socket, initial, rx))
}

/// Pushes snapshots to one WebSocket client until it disconnects.
async fn stream_changes(
    mut socket: WebSocket,
    initial: Vec<CacheItem>,
    mut rx: watch::Receiver<Vec<CacheItem>>,
) {
    if send_snapshot(&mut socket, &initial).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    // Cache handle dropped; nothing more to stream
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                if send_snapshot(&mut socket, &snapshot).await.is_err() {
                    break;
                }
            }
            msg = socket.recv() => {
                match msg {
                    // Inbound messages are ignored; the socket is push-only
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        debug!("WebSocket read error: {}", err);
                        break;
                    }
                    None => break,
                }
            }
        }
    }
}

async fn send_snapshot(
    socket: &mut WebSocket,
    snapshot: &[CacheItem],
) -> std::result::Result<(), axum::Error> {
    match serde_json::to_string(snapshot) {
        Ok(json) => socket.send(Message::Text(json)).await,
        Err(err) => {
            warn!("Failed to encode snapshot: {}", err);
            Ok(())
        }
    }
}
