//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

// == Cache Entry ==
/// Represents a single cache entry with value and expiration metadata.
///
/// Entries are immutable once read; an update replaces value and
/// expiration wholesale.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The key this entry is stored under
    pub key: String,
    /// The stored value
    pub value: String,
    /// Absolute expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry whose expiration is `now + ttl_seconds`.
    ///
    /// A zero or negative TTL produces an entry that is already expired
    /// and reads as absent on the very next access.
    pub fn new(key: String, value: String, ttl_seconds: i64) -> Self {
        let expires_at = expiration_from_ttl(current_timestamp_ms(), ttl_seconds);
        Self {
            key,
            value,
            expires_at,
        }
    }

    // == Size ==
    /// Size contribution in bytes: key length plus value length.
    ///
    /// An approximation of the entry's footprint, not an exact measure.
    pub fn size_bytes(&self) -> usize {
        self.key.len() + self.value.len()
    }

    // == Is Expired ==
    /// Checks whether the entry has expired as of `now_ms`.
    ///
    /// Boundary condition: an entry is expired when the current time is
    /// greater than or equal to its expiration time.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    /// Checks whether the entry has expired as of the wall clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    // == Snapshot ==
    /// Copies the entry into its snapshot representation.
    pub fn to_item(&self) -> CacheItem {
        CacheItem {
            key: self.key.clone(),
            value: self.value.clone(),
            expires_at: self.expires_at,
        }
    }
}

// == Cache Item ==
/// Snapshot representation of an entry, as exposed by `list_all` and the
/// change-notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheItem {
    /// The entry's key
    pub key: String,
    /// The entry's value
    pub value: String,
    /// Absolute expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

/// Computes the absolute expiration instant for a TTL applied at `now_ms`.
///
/// A zero or negative TTL clamps to `now_ms`, which is already expired
/// under the `now >= expires_at` boundary rule. A TTL too large to
/// represent in milliseconds saturates to the far future; the TTL is
/// caller-supplied, so the multiplication must not overflow.
pub fn expiration_from_ttl(now_ms: u64, ttl_seconds: i64) -> u64 {
    if ttl_seconds <= 0 {
        now_ms
    } else {
        now_ms.saturating_add((ttl_seconds as u64).saturating_mul(1000))
    }
}
