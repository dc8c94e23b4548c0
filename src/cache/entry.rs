//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A stored value paired with an optional absolute expiry instant.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Absolute expiry instant, None = never expires
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry with an optional TTL.
    ///
    /// The expiry instant is computed at creation time as `now + ttl`, so
    /// two entries stored with the same nominal TTL at different times
    /// expire independently.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Optional time-to-live
    pub fn new(value: V, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired when the current time is
    /// greater than or equal to the expiry instant.
    ///
    /// # Returns
    /// - `true` if the entry has a TTL and the current time >= expiry instant
    /// - `false` if the entry has no TTL (never expires) or TTL hasn't elapsed
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Checks if the entry is expired as of the given instant.
    ///
    /// Used by enumeration so that one traversal evaluates every entry
    /// against a single consistent snapshot of the clock.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining TTL, or None if no expiry is set.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has expired
    /// - `Some(remaining)` if the entry has a TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new("test_value", None);

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new("test_value", Some(Duration::from_secs(60)));

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value", Some(Duration::from_millis(50)));

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(80));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new("test_value", Some(Duration::from_secs(10)));

        let remaining = entry.ttl_remaining().unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_ttl_remaining_no_expiration() {
        let entry = CacheEntry::new("test_value", None);

        assert!(entry.ttl_remaining().is_none());
    }

    #[test]
    fn test_ttl_remaining_expired() {
        let entry = CacheEntry::new("test_value", Some(Duration::from_millis(20)));

        sleep(Duration::from_millis(50));

        assert_eq!(entry.ttl_remaining().unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry {
            value: "test",
            expires_at: Some(now),
        };

        // Expired when current time >= expires_at
        assert!(entry.is_expired_at(now), "Entry should be expired at boundary");
    }

    #[test]
    fn test_expiry_does_not_depend_on_value() {
        // An entry holding an "empty" payload still tracks its TTL
        let entry: CacheEntry<Option<&str>> =
            CacheEntry::new(None, Some(Duration::from_millis(20)));

        assert!(!entry.is_expired());
        sleep(Duration::from_millis(50));
        assert!(entry.is_expired());
    }
}
