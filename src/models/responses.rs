//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies. The list and
//! WebSocket payloads reuse [`crate::cache::CacheItem`] directly.

use serde::Serialize;

/// Response body for the GET operation (GET /api/cache/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for the SET operation (POST /api/cache)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for the DELETE operation (DELETE /api/cache/:key)
///
/// Returned whether or not the key existed; delete is idempotent.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
