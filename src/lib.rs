//! gencache - A bounded in-memory key/value cache
//!
//! Approximates LRU eviction with two insertion-ordered generations instead
//! of per-access reordering, supports optional per-entry TTL checked lazily
//! on access, and reports involuntary removals through an eviction listener.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheEntry, CacheStats, CacheStore, EvictionListener};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
