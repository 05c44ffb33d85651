//! Cache Handle Module
//!
//! The shared, concurrency-safe face of the cache. A [`Cache`] owns the
//! store behind an `Arc<RwLock<_>>`, the change-notification channel, and
//! the background sweeper's lifecycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;

use crate::cache::{CacheItem, CacheStore, DEFAULT_SWEEP_INTERVAL};
use crate::config::Config;
use crate::error::Result;
use crate::tasks::spawn_sweeper_task;

// == Cache ==
/// Concurrent handle over a [`CacheStore`].
///
/// Mutating operations (`set`, `delete`, and `get`, which touches recency
/// and may lazily expire) take the write lock for their full duration;
/// `list_all` takes the read lock. After any mutation that changes
/// observable state, the full snapshot is published on a watch channel
/// while the write lock is still held, so subscribers never observe stale
/// or torn state.
///
/// Construction spawns the sweeper; [`Cache::shutdown`] (or dropping the
/// handle) aborts it.
#[derive(Debug)]
pub struct Cache {
    /// Exclusivity-guarded store shared with the sweeper
    store: Arc<RwLock<CacheStore>>,
    /// Change-notification fan-out; payload is the `list_all` snapshot
    changes: watch::Sender<Vec<CacheItem>>,
    /// Owned background sweeper
    sweeper: JoinHandle<()>,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache with the default sweep interval.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidConfig` if either bound is zero.
    pub fn new(capacity: usize, max_memory_bytes: usize) -> Result<Self> {
        Self::with_sweep_interval(capacity, max_memory_bytes, DEFAULT_SWEEP_INTERVAL)
    }

    /// Creates a cache and starts its sweeper at the given interval.
    ///
    /// Must be called within a tokio runtime.
    pub fn with_sweep_interval(
        capacity: usize,
        max_memory_bytes: usize,
        sweep_interval: Duration,
    ) -> Result<Self> {
        let store = Arc::new(RwLock::new(CacheStore::new(capacity, max_memory_bytes)?));
        let (changes, _) = watch::channel(Vec::new());
        let sweeper = spawn_sweeper_task(store.clone(), changes.clone(), sweep_interval);
        Ok(Self {
            store,
            changes,
            sweeper,
        })
    }

    /// Creates a cache from server configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_sweep_interval(
            config.capacity,
            config.max_memory_bytes,
            Duration::from_secs(config.sweep_interval_seconds),
        )
    }

    // == Get ==
    /// Retrieves a value by key, marking it most recently used.
    ///
    /// Takes the write lock: a get can reorder recency and lazily remove
    /// an expired entry.
    pub async fn get(&self, key: &str) -> Option<String> {
        let mut store = self.store.write().await;
        let len_before = store.len();
        let value = store.get(key);
        // Lazy expiry changed observable state even though the caller
        // sees "absent"
        if value.is_none() && store.len() < len_before {
            self.publish(&store);
        }
        value
    }

    // == Set ==
    /// Stores a key-value pair with a TTL in seconds, then publishes the
    /// updated snapshot.
    pub async fn set(&self, key: String, value: String, ttl_seconds: i64) {
        let mut store = self.store.write().await;
        store.set(key, value, ttl_seconds);
        self.publish(&store);
    }

    // == Delete ==
    /// Removes a key. Returns whether an entry existed; absent keys are a
    /// no-op and publish nothing.
    pub async fn delete(&self, key: &str) -> bool {
        let mut store = self.store.write().await;
        let removed = store.delete(key);
        if removed {
            self.publish(&store);
        }
        removed
    }

    // == List All ==
    /// Snapshot of all non-expired entries, most-recently-used first.
    pub async fn list_all(&self) -> Vec<CacheItem> {
        self.store.read().await.list_all()
    }

    // == Length ==
    /// Current number of entries, including expired-but-unswept ones.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    // == Subscribe ==
    /// Returns a receiver for change notifications.
    ///
    /// The receiver holds the latest snapshot; delivery policy (push per
    /// change, periodic broadcast) is the subscriber's concern.
    pub fn subscribe(&self) -> watch::Receiver<Vec<CacheItem>> {
        self.changes.subscribe()
    }

    // == Shutdown ==
    /// Stops the background sweeper.
    pub fn shutdown(&self) {
        self.sweeper.abort();
    }

    /// Publishes the current snapshot while the caller still holds the
    /// write lock.
    fn publish(&self, store: &CacheStore) {
        self.changes.send_replace(store.list_all());
    }
}

impl Drop for Cache {
    fn drop(&mut self) {
        self.sweeper.abort();
    }
}
