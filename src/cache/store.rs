//! Cache Store Module
//!
//! The core cache engine: a lock-guarded map of timestamped entries with lazy
//! expiry on reads and a throttled, caller-driven background sweep.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::TimeDelta;
use tokio::sync::RwLock;

use crate::cache::entry::{current_timestamp_ns, ttl_nanos, CacheEntry};
use crate::cache::stats::{CacheStats, StatsSnapshot};
use crate::cache::sweep::{self, SweepState};

// == Cache Inner ==
/// State shared between cache handles and detached sweep tasks.
#[derive(Debug)]
pub(crate) struct CacheInner<V> {
    /// Key-value storage, guarded by a reader/writer lock
    pub(crate) entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// Sweep throttle state, independent of the map lock
    pub(crate) sweep: SweepState,
    /// Performance statistics
    pub(crate) stats: CacheStats,
}

// == Cache ==
/// Concurrency-safe key-value cache with per-entry TTL.
///
/// The handle is cheap to clone; clones share the same map. Values are
/// opaque to the cache and leave the map only as clones, so callers wanting
/// share-not-copy semantics should store `Arc<T>`.
///
/// Expired entries are reclaimed lazily when a read observes them, and in
/// bulk by a sweep that every operation attempts to trigger, throttled to at
/// most one dispatch per sweep interval. Sweeps run as detached tasks, so
/// the cache must be used inside a Tokio runtime.
#[derive(Debug)]
pub struct Cache<V> {
    inner: Arc<CacheInner<V>>,
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// `sweep_interval` is the minimum spacing between sweep dispatches. A
    /// zero or negative interval disables throttling, so a sweep is
    /// dispatched on nearly every call.
    pub fn new(sweep_interval: TimeDelta) -> Self {
        Self::with_settings(sweep_interval, 0)
    }

    pub(crate) fn with_settings(sweep_interval: TimeDelta, initial_capacity: usize) -> Self {
        let now = current_timestamp_ns();
        Self {
            inner: Arc::new(CacheInner {
                entries: RwLock::new(HashMap::with_capacity(initial_capacity)),
                sweep: SweepState::new(ttl_nanos(sweep_interval), now),
                stats: CacheStats::new(),
            }),
        }
    }

    // == Get ==
    /// Retrieves a clone of the value stored under `key`.
    ///
    /// Returns `None` when the key is absent or its entry has expired. An
    /// expired entry observed here is removed as a side effect (lazy
    /// deletion), independent of the periodic sweep.
    pub async fn get(&self, key: &str) -> Option<V> {
        let now = current_timestamp_ns();

        let lookup = {
            let entries = self.inner.entries.read().await;
            entries.get(key).map(|entry| {
                if entry.is_expired_at(now) {
                    None
                } else {
                    Some(entry.value.clone())
                }
            })
        };

        let value = match lookup {
            // Present and live
            Some(Some(value)) => {
                self.inner.stats.record_hit();
                Some(value)
            }
            // Present but expired: remove it, re-checking under the write
            // lock because a concurrent set may have refreshed the key
            Some(None) => {
                let mut entries = self.inner.entries.write().await;
                if entries.get(key).is_some_and(|e| e.is_expired_at(now)) {
                    entries.remove(key);
                    self.inner.stats.record_expired_removed(1);
                }
                drop(entries);
                self.inner.stats.record_miss();
                None
            }
            None => {
                self.inner.stats.record_miss();
                None
            }
        };

        self.maybe_sweep();
        value
    }

    // == Set ==
    /// Stores `value` under `key`, expiring `ttl` from now.
    ///
    /// Replaces any prior entry for the key entirely. `ttl` is signed; a
    /// non-positive ttl deliberately stores a pre-expired entry.
    pub async fn set(&self, key: impl Into<String>, value: V, ttl: TimeDelta) {
        let entry = CacheEntry::new(value, ttl);
        {
            let mut entries = self.inner.entries.write().await;
            entries.insert(key.into(), entry);
        }
        self.maybe_sweep();
    }

    // == Delete ==
    /// Removes `key` unconditionally. Idempotent: deleting an absent key is
    /// a no-op.
    pub async fn delete(&self, key: &str) {
        {
            let mut entries = self.inner.entries.write().await;
            entries.remove(key);
        }
        self.maybe_sweep();
    }

    // == Items ==
    /// Returns a point-in-time copy of all live entries.
    ///
    /// Liveness is judged against a single timestamp captured at the start
    /// of the call. Mutating the returned map does not affect the cache.
    ///
    /// Expired entries observed by the scan are scheduled for asynchronous
    /// deletion only when the sweep throttle permits; otherwise the call is
    /// read-only so a hot `items` loop never takes the write lock.
    pub async fn items(&self) -> HashMap<String, V> {
        let now = current_timestamp_ns();

        let (live, expired) = {
            let entries = self.inner.entries.read().await;
            let mut live = HashMap::with_capacity(entries.len());
            let mut expired = Vec::new();
            for (key, entry) in entries.iter() {
                if entry.is_expired_at(now) {
                    expired.push(key.clone());
                } else {
                    live.insert(key.clone(), entry.value.clone());
                }
            }
            (live, expired)
        };

        if !expired.is_empty() && self.inner.sweep.try_claim(now) {
            self.inner.stats.record_sweep();
            sweep::spawn_remove_keys(Arc::clone(&self.inner), expired, now);
        }

        live
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included until a
    /// removal path reclaims them.
    pub async fn len(&self) -> usize {
        self.inner.entries.read().await.len()
    }

    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.inner.entries.read().await.is_empty()
    }

    // == Stats ==
    /// Returns a snapshot of cache statistics.
    pub async fn stats(&self) -> StatsSnapshot {
        let entries = self.inner.entries.read().await.len();
        self.inner
            .stats
            .snapshot(entries, self.inner.sweep.last_sweep_at_ns())
    }

    // == Maybe Sweep ==
    /// Makes a throttled sweep attempt; dispatches a detached sweep task if
    /// this caller claims the slot.
    fn maybe_sweep(&self) {
        let now = current_timestamp_ns();
        if !self.inner.sweep.try_claim(now) {
            return;
        }
        self.inner.stats.record_sweep();
        sweep::spawn_sweep(Arc::clone(&self.inner), now);
    }
}
