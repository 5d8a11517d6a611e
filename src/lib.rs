//! Sweep Cache - an in-process key-value cache with per-entry TTL
//!
//! Every entry carries an absolute expiration timestamp. Expired entries are
//! reclaimed lazily on read and by a throttled background sweep that rides
//! along on normal cache traffic; there is no dedicated scheduler thread.
//!
//! Sweeps are dispatched with `tokio::spawn`, so a [`Cache`] must live inside
//! a Tokio runtime.
//!
//! ```no_run
//! use chrono::TimeDelta;
//! use sweep_cache::Cache;
//!
//! # async fn demo() {
//! let cache: Cache<String> = Cache::new(TimeDelta::seconds(1));
//! cache.set("user:42", "alice".to_string(), TimeDelta::seconds(30)).await;
//! assert_eq!(cache.get("user:42").await.as_deref(), Some("alice"));
//! # }
//! ```

pub mod cache;

pub use cache::{Cache, CacheBuilder, CacheEntry, CacheStats, StatsSnapshot};
