//! Configuration Module
//!
//! Construction options for the cache, with validation.

use std::time::Duration;

use crate::error::{CacheError, Result};

// == Cache Config ==
/// Construction options for a [`CacheStore`](crate::cache::CacheStore).
///
/// `max_size` bounds each *generation*, not the total entry count: the
/// two-generation design can legitimately hold up to `2 * max_size - 1`
/// live entries between rollovers.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries per generation (must be >= 1)
    pub max_size: usize,
    /// Default TTL applied to entries stored without an explicit TTL.
    /// `None` means entries never expire unless given a per-entry TTL.
    pub max_age: Option<Duration>,
}

impl CacheConfig {
    // == Constructor ==
    /// Creates a config with the given capacity and no default TTL.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            max_age: None,
        }
    }

    // == Default TTL ==
    /// Sets the cache-wide default TTL.
    ///
    /// A zero duration is rejected by [`validate`](Self::validate): a
    /// zero-length TTL would make every entry dead on arrival, so it must
    /// be omitted instead.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    // == Validation ==
    /// Checks the configuration for out-of-range values.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidArgument`] if `max_size` is zero or
    /// `max_age` is present but zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_size < 1 {
            return Err(CacheError::InvalidArgument(
                "max_size must be at least 1".to_string(),
            ));
        }

        if let Some(max_age) = self.max_age {
            if max_age.is_zero() {
                return Err(CacheError::InvalidArgument(
                    "max_age must be a positive duration".to_string(),
                ));
            }
        }

        Ok(())
    }
}
