use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::Result;

/// Key under which the volume preference is stored.
pub const VOLUME_KEY: &str = "ambientSoundVolume";

/// Volume used when no usable preference is stored.
pub const DEFAULT_VOLUME: f64 = 0.5;

/// A string key-value store for user preferences.
///
/// Writes are best effort: callers log failures and carry on.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Reads the volume preference, falling back to [`DEFAULT_VOLUME`] when it is
/// missing, unparsable or outside `0.0..=1.0`.
pub fn load_volume(store: &impl PreferenceStore) -> f64 {
    store
        .get(VOLUME_KEY)
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|volume| (0.0..=1.0).contains(volume))
        .unwrap_or(DEFAULT_VOLUME)
}

/// Preferences kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Preferences persisted as a flat JSON object in a single file.
///
/// The file is read on every `get` and rewritten on every `set`, so separate
/// stores pointing at the same path observe each other's writes.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> HashMap<String, String> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return HashMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!("ignoring unreadable preferences at {:?}: {}", self.path, e);
                HashMap::new()
            }
        }
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read_all().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read_all();
        values.insert(key.to_owned(), value.to_owned());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn volume_defaults_when_missing_or_garbage() {
        let store = MemoryStore::new();
        assert_eq!(load_volume(&store), DEFAULT_VOLUME);

        for raw in ["loud", "", "NaN", "1.5", "-0.1"] {
            store.set(VOLUME_KEY, raw).unwrap();
            assert_eq!(load_volume(&store), DEFAULT_VOLUME, "raw value {raw:?}");
        }

        store.set(VOLUME_KEY, "0.25").unwrap();
        assert_eq!(load_volume(&store), 0.25);
    }

    #[test]
    fn json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let store = JsonFileStore::new(&path);
        assert_eq!(store.get(VOLUME_KEY), None);
        store.set(VOLUME_KEY, "0.73").unwrap();
        store.set("other", "x").unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get(VOLUME_KEY).as_deref(), Some("0.73"));
        assert_eq!(reopened.get("other").as_deref(), Some("x"));
        assert_eq!(load_volume(&reopened), 0.73);
    }

    #[test]
    fn json_store_tolerates_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert_eq!(store.get(VOLUME_KEY), None);
        store.set(VOLUME_KEY, "0.1").unwrap();
        assert_eq!(store.get(VOLUME_KEY).as_deref(), Some("0.1"));
    }
}
