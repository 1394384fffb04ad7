//! Persistent key-value storage with caller-side TTL.
//!
//! The backing [`KvStore`] only moves strings around. [`TtlStore`] adds the
//! JSON encoding of [`CacheEntry`] values on top. Freshness is never
//! enforced here; callers compare `expiry` against their own clock.

mod entry;
mod file;
mod memory;

pub use entry::CacheEntry;
pub use file::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Keys used by the popup.
pub const EVENTS_KEY: &str = "events";
pub const SESSION_KEY: &str = "session";
pub const PENDING_KEY: &str = "pending";

/// Raw string storage shared by every popup instance. Writes replace the
/// whole value; the last writer wins.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

/// Typed view over a [`KvStore`].
#[derive(Clone)]
pub struct TtlStore {
    inner: Arc<dyn KvStore>,
}

impl TtlStore {
    pub fn new(inner: Arc<dyn KvStore>) -> Self {
        Self { inner }
    }

    /// Read an entry. Missing or unparsable values both come back as `None`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        let raw = self.inner.get(key)?;
        match serde_json::from_str::<CacheEntry<T>>(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Ignoring corrupt cache value under {:?}: {}", key, e);
                None
            }
        }
    }

    pub fn write<T: Serialize>(&self, key: &str, entry: &CacheEntry<T>) {
        match serde_json::to_string(entry) {
            Ok(json) => self.inner.set(key, json),
            Err(e) => warn!("Failed to encode cache value for {:?}: {}", key, e),
        }
    }
}
