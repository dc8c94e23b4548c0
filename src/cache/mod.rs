//! Cache Module
//!
//! Provides in-memory caching with two-generation LRU eviction and lazy
//! TTL expiration.

mod entry;
mod generations;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use generations::Generations;
pub use stats::CacheStats;
pub use store::{CacheStore, EvictionListener};
