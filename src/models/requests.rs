//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for the SET operation (POST /api/cache)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: The value to store
/// - `ttl_seconds`: Optional TTL in seconds (server default applied if
///   absent; zero or negative stores an already-expired entry)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: String,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl_seconds: Option<i64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        None
    }
}
