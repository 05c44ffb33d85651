//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with recency tracking for
//! LRU eviction, an expiration index for TTL sweeps, and a byte-size
//! memory ceiling.

use std::collections::HashMap;

use crate::cache::entry::{current_timestamp_ms, expiration_from_ttl};
use crate::cache::{CacheEntry, CacheItem, ExpirationIndex, ExpiryToken, RecencyIndex};
use crate::error::{CacheError, Result};

/// An entry plus its positions in the recency and expiration structures.
///
/// Invariant: a key present in the map has exactly one live recency node
/// and one live expiration node; removal drops all three together.
#[derive(Debug)]
struct Slot {
    entry: CacheEntry,
    lru: usize,
    exp: ExpiryToken,
}

// == Cache Store ==
/// Bounded, time-aware key-value store.
///
/// Enforces three limits at every quiescent point: at most `capacity` live
/// entries, at most `max_memory_bytes` total size contribution (a single
/// oversized entry excepted, see [`CacheStore::set`]), and per-entry TTL
/// expiration. Not internally synchronized; callers serialize access
/// (see [`crate::cache::Cache`]).
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, Slot>,
    /// Access-order tracker for LRU eviction
    recency: RecencyIndex,
    /// Entries ordered by expiration instant
    expiry: ExpirationIndex,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Maximum total size contribution in bytes
    max_memory_bytes: usize,
    /// Running total of live entries' size contributions
    current_bytes: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with the given entry capacity and memory
    /// ceiling.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidConfig` if either bound is zero.
    pub fn new(capacity: usize, max_memory_bytes: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be greater than zero".to_string(),
            ));
        }
        if max_memory_bytes == 0 {
            return Err(CacheError::InvalidConfig(
                "max_memory_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            entries: HashMap::new(),
            recency: RecencyIndex::new(),
            expiry: ExpirationIndex::new(),
            capacity,
            max_memory_bytes,
            current_bytes: 0,
        })
    }

    // == Get ==
    /// Retrieves a value by key, marking the entry most recently used.
    ///
    /// An expired entry is removed on the spot (lazy expiry) and reported
    /// as absent. The expiry check happens before any recency touch, both
    /// within this single exclusive operation.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let now = current_timestamp_ms();

        let expired = self.entries.get(key)?.entry.is_expired_at(now);
        if expired {
            self.remove_entry(key);
            return None;
        }

        let slot = self.entries.get(key)?;
        let value = slot.entry.value.clone();
        self.recency.touch(slot.lru);
        Some(value)
    }

    // == Set ==
    /// Stores a key-value pair with the given TTL in seconds.
    ///
    /// An existing key is updated in place: value and expiration replaced,
    /// the running byte total adjusted by the value-length delta, the entry
    /// moved to the recency front and re-sorted in the expiration index.
    ///
    /// A new key first evicts least-recently-used entries until its size
    /// contribution fits under the memory ceiling (or the cache is empty),
    /// then evicts one more if the cache is at capacity. The incoming write
    /// is never dropped: a single entry larger than the ceiling is still
    /// inserted after everything else has been evicted.
    pub fn set(&mut self, key: String, value: String, ttl_seconds: i64) {
        let expires_at = expiration_from_ttl(current_timestamp_ms(), ttl_seconds);

        if let Some(slot) = self.entries.get_mut(&key) {
            self.current_bytes -= slot.entry.value.len();
            self.current_bytes += value.len();
            slot.entry.value = value;
            slot.entry.expires_at = expires_at;
            self.recency.touch(slot.lru);
            self.expiry.remove(&slot.exp);
            slot.exp = self.expiry.insert(expires_at, key);

            // A grown value can push the total over the ceiling; reclaim
            // from the LRU tail, never evicting the just-written entry
            // (it sits at the recency front).
            while self.current_bytes > self.max_memory_bytes && self.entries.len() > 1 {
                self.evict_lru();
            }
            return;
        }

        let incoming = key.len() + value.len();
        while self.current_bytes + incoming > self.max_memory_bytes && !self.entries.is_empty() {
            self.evict_lru();
        }
        if self.entries.len() >= self.capacity {
            self.evict_lru();
        }

        let entry = CacheEntry {
            key: key.clone(),
            value,
            expires_at,
        };
        self.current_bytes += entry.size_bytes();
        let lru = self.recency.push_front(key.clone());
        let exp = self.expiry.insert(expires_at, key.clone());
        self.entries.insert(key, Slot { entry, lru, exp });
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns whether an entry was actually removed; deleting an absent
    /// key is a no-op, not an error.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == List All ==
    /// Snapshot of all non-expired entries, most-recently-used first.
    ///
    /// Pure read: expired-but-unswept entries are filtered out without
    /// being removed.
    pub fn list_all(&self) -> Vec<CacheItem> {
        let now = current_timestamp_ms();
        self.recency
            .iter()
            .filter_map(|key| self.entries.get(key))
            .filter(|slot| !slot.entry.is_expired_at(now))
            .map(|slot| slot.entry.to_item())
            .collect()
    }

    // == Sweep ==
    /// Removes every entry whose expiration is at or before `now_ms`.
    ///
    /// Walks only the expired prefix of the expiration index. Returns the
    /// number of entries removed.
    pub fn sweep(&mut self, now_ms: u64) -> usize {
        let expired = self.expiry.pop_expired(now_ms);
        let count = expired.len();
        for key in expired {
            // The expiration node is already drained; drop the map entry
            // and recency node.
            if let Some(slot) = self.entries.remove(&key) {
                self.current_bytes -= slot.entry.size_bytes();
                self.recency.remove(slot.lru);
            }
        }
        count
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Current Bytes ==
    /// Running total of live entries' size contributions.
    pub fn current_bytes(&self) -> usize {
        self.current_bytes
    }

    /// Evicts the least-recently-used entry, keeping all structures in sync.
    fn evict_lru(&mut self) -> Option<String> {
        let key = self.recency.pop_back()?;
        if let Some(slot) = self.entries.remove(&key) {
            self.current_bytes -= slot.entry.size_bytes();
            self.expiry.remove(&slot.exp);
        }
        Some(key)
    }

    /// Removes an entry from all three structures.
    fn remove_entry(&mut self, key: &str) -> bool {
        if let Some(slot) = self.entries.remove(key) {
            self.current_bytes -= slot.entry.size_bytes();
            self.recency.remove(slot.lru);
            self.expiry.remove(&slot.exp);
            true
        } else {
            false
        }
    }

    /// Node counts of the key map, recency index and expiration index.
    #[cfg(test)]
    pub(crate) fn structure_lens(&self) -> (usize, usize, usize) {
        (self.entries.len(), self.recency.len(), self.expiry.len())
    }
}
