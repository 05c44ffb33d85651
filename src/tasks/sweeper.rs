//! TTL Sweeper Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{current_timestamp_ms, CacheItem, CacheStore};

/// Spawns a background task that periodically sweeps expired entries.
///
/// Each tick takes the store's write lock, removes every entry whose
/// expiration has passed, and publishes the updated snapshot on the change
/// channel when anything was removed. A sweep never fails; lock contention
/// only delays the tick.
///
/// The returned JoinHandle is owned by [`crate::cache::Cache`], which
/// aborts it on shutdown.
pub fn spawn_sweeper_task(
    store: Arc<RwLock<CacheStore>>,
    changes: watch::Sender<Vec<CacheItem>>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting TTL sweeper with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            // Remove expired entries and snapshot under one write lock
            let (removed, snapshot) = {
                let mut store_guard = store.write().await;
                let removed = store_guard.sweep(current_timestamp_ms());
                let snapshot = (removed > 0).then(|| store_guard.list_all());
                (removed, snapshot)
            };

            if let Some(snapshot) = snapshot {
                info!("Sweep removed {} expired entries", removed);
                changes.send_replace(snapshot);
            } else {
                debug!("Sweep found no expired entries");
            }
        }
    })
}
