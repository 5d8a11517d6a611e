//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::TimeDelta;

// == Cache Entry ==
/// A stored value paired with its absolute expiration time.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Expiration timestamp (Unix nanoseconds)
    pub expires_at: i64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now.
    ///
    /// `ttl` is signed: a zero or negative duration produces an entry that is
    /// already expired, which is a valid way to insert a pre-expired
    /// placeholder.
    pub fn new(value: V, ttl: TimeDelta) -> Self {
        let now = current_timestamp_ns();
        Self {
            value,
            expires_at: now.saturating_add(ttl_nanos(ttl)),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is expired at the given timestamp.
    ///
    /// Boundary condition: an entry counts as expired once the observed time
    /// reaches or passes `expires_at`.
    #[inline]
    pub fn is_expired_at(&self, now_ns: i64) -> bool {
        now_ns >= self.expires_at
    }

    /// Checks whether the entry has expired as of the current time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ns())
    }

    // == Time To Live ==
    /// Returns the remaining time to live, or zero once the entry has
    /// expired. Useful for debugging and statistics.
    pub fn ttl_remaining(&self) -> TimeDelta {
        let now = current_timestamp_ns();
        if self.expires_at > now {
            TimeDelta::nanoseconds(self.expires_at - now)
        } else {
            TimeDelta::zero()
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in nanoseconds.
pub(crate) fn current_timestamp_ns() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_nanos() as i64
}

/// Converts a signed duration to nanoseconds, saturating at the i64 range.
pub(crate) fn ttl_nanos(ttl: TimeDelta) -> i64 {
    ttl.num_nanoseconds().unwrap_or_else(|| {
        if ttl < TimeDelta::zero() {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}
