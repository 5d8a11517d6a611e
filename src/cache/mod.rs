//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and a throttled,
//! caller-driven background sweep.

mod builder;
mod entry;
mod stats;
mod store;
mod sweep;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use builder::CacheBuilder;
pub use entry::CacheEntry;
pub use stats::{CacheStats, StatsSnapshot};
pub use store::Cache;
