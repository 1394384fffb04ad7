use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::KvStore;

/// Disk-backed store: one `<key>.json` file per key under `dir`.
///
/// Several processes may share a directory. Every write replaces the whole
/// file, so concurrent writers resolve to whichever wrote last.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(_) => {
                debug!("No stored value at {:?}", path);
                None
            }
        }
    }

    fn set(&self, key: &str, value: String) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            warn!("Failed to create store dir {:?}: {}", self.dir, e);
            return;
        }
        let path = self.path_for(key);
        if let Err(e) = std::fs::write(&path, value) {
            warn!("Failed to write {:?}: {}", path, e);
        }
    }
}
