//! Cache Module
//!
//! Provides a bounded, time-aware key-value cache: LRU eviction at a fixed
//! entry capacity, a byte-size memory ceiling, and per-entry TTL expiration.
//! [`CacheStore`] is the single-threaded core; [`Cache`] is the shared
//! handle that serializes concurrent access and owns the background sweeper.

use std::time::Duration;

mod entry;
mod expiry;
mod handle;
mod recency;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry, CacheItem};
pub use expiry::{ExpirationIndex, ExpiryToken};
pub use handle::Cache;
pub use recency::RecencyIndex;
pub use store::CacheStore;

// == Public Constants ==
/// Default interval between background sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
