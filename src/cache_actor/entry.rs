use std::time::Duration;

use tokio::time::Instant;

use crate::messages::CachedValue;

/// A stored value and the moment it was written. Replaced whole on every
/// write, never patched.
#[derive(Clone)]
pub struct CacheEntry {
    pub value: CachedValue,
    pub written_at: Instant,
}

impl CacheEntry {
    pub fn new(value: CachedValue, written_at: Instant) -> Self {
        Self { value, written_at }
    }

    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.written_at)
    }

    /// Fresh while `now - written_at <= ttl`.
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) <= ttl
    }
}
