use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A stored value plus the instant (epoch ms) it stops being fresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub items: T,
    /// Expiry timestamp in milliseconds
    pub expiry: i64,
}

impl<T> CacheEntry<T> {
    /// Entry that stays fresh for `ttl` from `now_ms`.
    pub fn new(items: T, now_ms: i64, ttl: Duration) -> Self {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        Self {
            items,
            expiry: now_ms.saturating_add(ttl_ms),
        }
    }

    /// Fresh up to and including the expiry instant.
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms <= self.expiry
    }

    /// Items if still fresh, otherwise nothing.
    pub fn into_fresh(self, now_ms: i64) -> Option<T> {
        if self.is_fresh(now_ms) {
            Some(self.items)
        } else {
            None
        }
    }
}
