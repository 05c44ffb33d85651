//! kv-cache - A concurrent, bounded, time-aware key-value cache server
//!
//! Combines LRU eviction at a fixed entry capacity, a byte-size memory
//! ceiling and per-entry TTL expiration, with change notifications fanned
//! out to subscribers.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::Cache;
pub use config::Config;
pub use tasks::spawn_sweeper_task;
