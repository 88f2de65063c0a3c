//! Key-value persistence for calibration data.
//!
//! The tracker only needs `get`/`put` of opaque blobs, so tests use the
//! in-memory `MemoryStore` and the binary uses a `FileStore` rooted at the
//! configured data directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info, warn};

use facetype_core::error::{FacetypeError, Result};

use crate::calibration::Calibration;

/// Key under which the calibration blob is stored.
pub const CALIBRATION_KEY: &str = "calibration";

/// Blob store keyed by short ASCII names.
pub trait KeyValueStore: Send + Sync {
    /// Returns `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn put(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// In-process store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| FacetypeError::Storage(format!("Store mutex poisoned: {}", e)))?;
        Ok(guard.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| FacetypeError::Storage(format!("Store mutex poisoned: {}", e)))?;
        guard.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(FacetypeError::Storage(format!("Invalid store key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        // Readers only ever see a complete blob.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), bytes = value.len(), "Store entry written");
        Ok(())
    }
}

/// Read the stored calibration, `Ok(None)` if nothing has been saved yet.
pub fn try_load_calibration(store: &dyn KeyValueStore) -> Result<Option<Calibration>> {
    match store.get(CALIBRATION_KEY)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Load the stored calibration, falling back to `defaults` when nothing is
/// stored or the blob is unreadable.
pub fn load_calibration(store: &dyn KeyValueStore, defaults: &Calibration, floor: f32) -> Calibration {
    match try_load_calibration(store) {
        Ok(Some(calibration)) => {
            let calibration = calibration.sanitized(floor);
            info!(
                left_max = calibration.left_max,
                right_max = calibration.right_max,
                back_max = calibration.back_max,
                trigger_factor = calibration.trigger_factor,
                "Calibration restored"
            );
            calibration
        }
        Ok(None) => {
            debug!("No saved calibration, using defaults");
            defaults.clone()
        }
        Err(e) => {
            warn!(error = %e, "Saved calibration unreadable, using defaults");
            defaults.clone()
        }
    }
}

pub fn save_calibration(store: &dyn KeyValueStore, calibration: &Calibration) -> Result<()> {
    let bytes = serde_json::to_vec(calibration)?;
    store.put(CALIBRATION_KEY, &bytes)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::MIN_VALID_MAX;
    use facetype_core::types::Channel;

    #[test]
    fn test_memory_store_get_missing() {
        let store = MemoryStore::new();
        assert!(store.get("anything").unwrap().is_none());
    }

    #[test]
    fn test_memory_store_put_get() {
        let store = MemoryStore::new();
        store.put("k", b"value").unwrap();
        assert_eq!(store.get("k").unwrap().unwrap(), b"value");
        store.put("k", b"other").unwrap();
        assert_eq!(store.get("k").unwrap().unwrap(), b"other");
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("data"));

        assert!(store.get("calibration").unwrap().is_none());
        store.put("calibration", b"{}").unwrap();
        assert_eq!(store.get("calibration").unwrap().unwrap(), b"{}");
        assert!(dir.path().join("data").join("calibration.json").exists());
        assert!(!dir.path().join("data").join("calibration.json.tmp").exists());
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.put("../escape", b"x"),
            Err(FacetypeError::Storage(_))
        ));
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_load_calibration_absent_uses_defaults() {
        let store = MemoryStore::new();
        let cal = load_calibration(&store, &Calibration::default(), MIN_VALID_MAX);
        assert_eq!(cal, Calibration::default());
    }

    #[test]
    fn test_load_calibration_malformed_uses_defaults() {
        let store = MemoryStore::new();
        store.put(CALIBRATION_KEY, b"not json at all").unwrap();

        assert!(try_load_calibration(&store).is_err());
        let cal = load_calibration(&store, &Calibration::default(), MIN_VALID_MAX);
        assert_eq!(cal, Calibration::default());
    }

    #[test]
    fn test_save_and_load_calibration() {
        let store = MemoryStore::new();
        let mut cal = Calibration::default();
        cal.set_max(Channel::Back, 0.8, MIN_VALID_MAX);
        save_calibration(&store, &cal).unwrap();

        let loaded = load_calibration(&store, &Calibration::default(), MIN_VALID_MAX);
        assert_eq!(loaded.back_max, 0.8);
        assert_eq!(loaded.updated_at, cal.updated_at);
    }

    #[test]
    fn test_load_calibration_sanitizes_values() {
        let store = MemoryStore::new();
        store
            .put(CALIBRATION_KEY, br#"{"leftMax": 0.0, "triggerFactor": 0.7}"#)
            .unwrap();
        let cal = load_calibration(&store, &Calibration::default(), MIN_VALID_MAX);
        assert_eq!(cal.left_max, MIN_VALID_MAX);
        assert_eq!(cal.trigger_factor, 0.7);
    }
}
