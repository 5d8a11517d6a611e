//! Cache Builder Module
//!
//! Fluent construction-time configuration for [`Cache`].

use chrono::TimeDelta;

use crate::cache::store::Cache;

/// Builder for configuring a [`Cache`].
///
/// # Example
///
/// ```no_run
/// use chrono::TimeDelta;
/// use sweep_cache::CacheBuilder;
///
/// let cache = CacheBuilder::new()
///     .sweep_interval(TimeDelta::seconds(5))
///     .initial_capacity(1024)
///     .build::<String>();
/// ```
#[derive(Debug, Clone)]
pub struct CacheBuilder {
    sweep_interval: TimeDelta,
    initial_capacity: usize,
}

impl CacheBuilder {
    /// Creates a builder with a one second sweep interval and no
    /// pre-allocated capacity.
    pub fn new() -> Self {
        Self {
            sweep_interval: TimeDelta::seconds(1),
            initial_capacity: 0,
        }
    }

    /// Sets the minimum spacing between sweep dispatches.
    ///
    /// A zero or negative interval disables throttling, so a sweep is
    /// dispatched on nearly every call. No value is rejected.
    pub fn sweep_interval(mut self, interval: TimeDelta) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Pre-allocates map capacity for the expected number of entries.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Builds the cache with the configured settings.
    pub fn build<V>(self) -> Cache<V>
    where
        V: Clone + Send + Sync + 'static,
    {
        Cache::with_settings(self.sweep_interval, self.initial_capacity)
    }
}

impl Default for CacheBuilder {
    fn default() -> Self {
        Self::new()
    }
}
