//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Maximum total size contribution of live entries, in bytes
    pub max_memory_bytes: usize,
    /// TTL in seconds applied when a request omits one
    pub default_ttl_seconds: i64,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds
    pub sweep_interval_seconds: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1024)
    /// - `MAX_MEMORY_BYTES` - Memory ceiling in bytes (default: 64 MiB)
    /// - `DEFAULT_TTL_SECONDS` - TTL when a request omits one (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `SWEEP_INTERVAL_SECONDS` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        Self {
            capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024),
            max_memory_bytes: env::var("MAX_MEMORY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(64 * 1024 * 1024),
            default_ttl_seconds: env::var("DEFAULT_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            sweep_interval_seconds: env::var("SWEEP_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1024,
            max_memory_bytes: 64 * 1024 * 1024,
            default_ttl_seconds: 300,
            server_port: 8080,
            sweep_interval_seconds: 60,
        }
    }
}
