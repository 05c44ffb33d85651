//! Expiration Index Module
//!
//! Ordered structure keyed by absolute expiration instant, used by the
//! background sweeper and by read-time lazy eviction.
//!
//! Entries live in a `BTreeMap` keyed by `(expires_at, seq)`, where `seq` is
//! a monotonic counter breaking ties between entries expiring at the same
//! instant. The map is therefore always sorted ascending by expiration, and
//! a sweep drains the expired prefix without visiting live entries.

use std::collections::BTreeMap;

// == Expiry Token ==
/// Stable handle to an entry's position in the expiration order.
///
/// Returned by [`ExpirationIndex::insert`] and required to remove or
/// re-position the entry later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExpiryToken {
    /// Absolute expiration timestamp (Unix milliseconds)
    expires_at: u64,
    /// Insertion tie-breaker for identical instants
    seq: u64,
}

// == Expiration Index ==
/// Keys ordered ascending by expiration instant.
#[derive(Debug, Default)]
pub struct ExpirationIndex {
    queue: BTreeMap<ExpiryToken, String>,
    next_seq: u64,
}

impl ExpirationIndex {
    // == Constructor ==
    /// Creates a new empty expiration index.
    pub fn new() -> Self {
        Self {
            queue: BTreeMap::new(),
            next_seq: 0,
        }
    }

    // == Insert ==
    /// Inserts a key at its sorted position and returns its token.
    pub fn insert(&mut self, expires_at: u64, key: String) -> ExpiryToken {
        let token = ExpiryToken {
            expires_at,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.queue.insert(token, key);
        token
    }

    // == Remove ==
    /// Removes the entry a token points at, returning its key.
    ///
    /// Returns None if the token was already removed.
    pub fn remove(&mut self, token: &ExpiryToken) -> Option<String> {
        self.queue.remove(token)
    }

    // == Pop Expired ==
    /// Removes and returns every key whose expiration is at or before
    /// `now_ms`, in expiration order.
    ///
    /// Stops at the first unexpired entry, so the cost is proportional to
    /// the number of expired entries.
    pub fn pop_expired(&mut self, now_ms: u64) -> Vec<String> {
        let split = ExpiryToken {
            expires_at: now_ms.saturating_add(1),
            seq: 0,
        };
        let live = self.queue.split_off(&split);
        let expired = std::mem::replace(&mut self.queue, live);
        expired.into_values().collect()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
