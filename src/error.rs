//! Error types for the cache server
//!
//! Provides unified error handling using thiserror.
//!
//! The cache core itself is error-free in normal operation: missing keys
//! are `Option`/`bool` results, expiry and eviction are policies rather
//! than failures. Errors exist for invalid construction parameters and
//! for the HTTP layer's request validation.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache server.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache (HTTP-layer translation of an absent result)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid construction parameters (zero capacity or memory ceiling)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::InvalidConfig(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            CacheError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(ErrorResponse::new(message));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;
