//! Cache Statistics Module
//!
//! Tracks cache performance metrics: hits, misses, sweep claims, and expired
//! entries reclaimed. Counters are atomic because the cache handle is shared
//! across tasks and hits are recorded under the read lock.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Cache Stats ==
/// Shared atomic counters owned by the cache.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sweeps: AtomicU64,
    expired_removed: AtomicU64,
}

impl CacheStats {
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful retrieval.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a failed retrieval (key absent or expired).
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a claimed sweep slot.
    pub fn record_sweep(&self) {
        self.sweeps.fetch_add(1, Ordering::Relaxed);
    }

    /// Records entries removed by any expiry path.
    pub fn record_expired_removed(&self, count: usize) {
        self.expired_removed
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Captures a point-in-time copy of the counters.
    ///
    /// # Arguments
    /// * `entries` - current number of entries in the map
    /// * `last_sweep_at_ns` - last sweep claim timestamp (Unix nanoseconds)
    pub fn snapshot(&self, entries: usize, last_sweep_at_ns: i64) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sweeps: self.sweeps.load(Ordering::Relaxed),
            expired_removed: self.expired_removed.load(Ordering::Relaxed),
            entries,
            last_sweep_at: DateTime::from_timestamp_nanos(last_sweep_at_ns),
        }
    }
}

// == Stats Snapshot ==
/// Point-in-time view of cache performance metrics.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of sweep slots claimed
    pub sweeps: u64,
    /// Number of entries removed because they expired
    pub expired_removed: u64,
    /// Current number of entries in the cache
    pub entries: usize,
    /// Timestamp of the last sweep claim
    pub last_sweep_at: DateTime<Utc>,
}

impl StatsSnapshot {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
