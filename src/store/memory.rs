use std::collections::HashMap;
use std::sync::Mutex;

use super::KvStore;

/// In-process store. Lives as long as the process does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let guard = self.values.lock().ok()?;
        guard.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        if let Ok(mut guard) = self.values.lock() {
            guard.insert(key.to_string(), value);
        }
    }
}
