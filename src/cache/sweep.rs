//! Throttled Sweep Module
//!
//! Cleanup rides along on normal cache traffic: each public operation makes a
//! throttled attempt to claim a sweep slot. The "may I sweep now" decision is
//! a single atomic compare-exchange on the last-sweep timestamp, decoupled
//! from the map-wide write lock that performs the deletions. A claimed sweep
//! runs as a detached task which the caller never awaits.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::cache::store::CacheInner;

// == Sweep State ==
/// Throttle state for sweep dispatch.
#[derive(Debug)]
pub(crate) struct SweepState {
    /// Minimum spacing between sweep claims (nanoseconds); zero or negative
    /// disables throttling
    interval_ns: i64,
    /// Timestamp of the last claimed sweep (Unix nanoseconds)
    last_sweep_at: AtomicI64,
}

impl SweepState {
    pub(crate) fn new(interval_ns: i64, now_ns: i64) -> Self {
        Self {
            interval_ns,
            last_sweep_at: AtomicI64::new(now_ns),
        }
    }

    // == Try Claim ==
    /// Attempts to claim the sweep slot for the current window.
    ///
    /// With a positive interval, exactly one caller per window sees `true`:
    /// the timestamp is advanced with a compare-exchange, so callers racing
    /// on the same window cannot both win. The timestamp never moves
    /// backward.
    pub(crate) fn try_claim(&self, now_ns: i64) -> bool {
        let last = self.last_sweep_at.load(Ordering::Acquire);
        if now_ns.saturating_sub(last) < self.interval_ns {
            return false;
        }
        self.last_sweep_at
            .compare_exchange(last, now_ns.max(last), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn last_sweep_at_ns(&self) -> i64 {
        self.last_sweep_at.load(Ordering::Acquire)
    }
}

// == Sweep Dispatch ==
/// Dispatches a detached full-map sweep deleting every entry already expired
/// at the claim time `now_ns`. No handle is retained; the task runs to
/// completion on its own.
pub(crate) fn spawn_sweep<V>(inner: Arc<CacheInner<V>>, now_ns: i64)
where
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut entries = inner.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now_ns));
        let removed = before - entries.len();
        drop(entries);

        if removed > 0 {
            inner.stats.record_expired_removed(removed);
            debug!(removed, "sweep removed expired entries");
        } else {
            trace!("sweep found no expired entries");
        }
    });
}

/// Dispatches a detached deletion of keys a snapshot scan observed expired.
/// Each key's expiry is re-checked against the scan time under the write
/// lock, so an entry refreshed by a concurrent set survives.
pub(crate) fn spawn_remove_keys<V>(inner: Arc<CacheInner<V>>, keys: Vec<String>, now_ns: i64)
where
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut entries = inner.entries.write().await;
        let mut removed = 0usize;
        for key in &keys {
            if entries.get(key).is_some_and(|e| e.is_expired_at(now_ns)) {
                entries.remove(key);
                removed += 1;
            }
        }
        drop(entries);

        if removed > 0 {
            inner.stats.record_expired_removed(removed);
            debug!(removed, "snapshot scan removed expired entries");
        }
    });
}
