//! Preference store - durable string key-value persistence
//!
//! The session layer reads and writes its preferences through the
//! [`KeyValueStore`] trait. Reads never fail: a missing key, a missing file or
//! an unreadable file all mean "no prior value". Write failures are logged
//! and otherwise ignored.
//!
//! # Example
//!
//! ```rust,no_run
//! use theme_workbench::core::store::{JsonFileStore, KeyValueStore};
//!
//! let mut store = JsonFileStore::open("preferences.json");
//! store.set("selectedTheme", "maritime");
//! assert_eq!(store.get("selectedTheme").as_deref(), Some("maritime"));
//! ```

use log::{debug, warn};
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Key holding the active theme id
pub const THEME_KEY: &str = "selectedTheme";
/// Key holding the last theme chosen while in light mode
pub const LIGHT_THEME_KEY: &str = "selectedLightTheme";
/// Key holding the last theme chosen while in dark mode
pub const DARK_THEME_KEY: &str = "selectedDarkTheme";
/// Key holding the active font id
pub const FONT_KEY: &str = "selectedFont";

/// Synchronous string key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory store; contents are lost when dropped
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            writes: 0,
        }
    }

    /// Number of `set` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.writes += 1;
        self.values.insert(key.to_string(), value.to_string());
    }
}

// =============================================================================
// JsonFileStore
// =============================================================================

/// Store persisted as a flat JSON object, rewritten on every change
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open a store, loading any existing file
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = Self::read(&path);
        debug!(
            "Opened preference store {} ({} keys)",
            path.display(),
            values.len()
        );
        Self { path, values }
    }

    fn read(path: &Path) -> BTreeMap<String, String> {
        if !path.exists() {
            return BTreeMap::new();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read preference store {}: {}", path.display(), e);
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(
                "Ignoring unreadable preference store {}: {}",
                path.display(),
                e
            );
            BTreeMap::new()
        })
    }

    fn write(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, content)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored pairs, sorted by key
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        if self.values.get(key).map(String::as_str) == Some(value) {
            return;
        }
        self.values.insert(key.to_string(), value.to_string());
        if let Err(e) = self.write() {
            warn!(
                "Failed to write preference store {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(THEME_KEY), None);
        store.set(THEME_KEY, "dark");
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_memory_store_with_values() {
        let store = MemoryStore::with_values([(FONT_KEY, "fira")]);
        assert_eq!(store.get(FONT_KEY).as_deref(), Some("fira"));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_json_store_persists_across_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut store = JsonFileStore::open(&path);
        store.set(LIGHT_THEME_KEY, "maritime");
        store.set(DARK_THEME_KEY, "midnight");

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get(LIGHT_THEME_KEY).as_deref(), Some("maritime"));
        assert_eq!(reopened.get(DARK_THEME_KEY).as_deref(), Some("midnight"));
        assert_eq!(reopened.entries().count(), 2);
    }

    #[test]
    fn test_json_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("absent.json"));
        assert_eq!(store.get(THEME_KEY), None);
    }

    #[test]
    fn test_json_store_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut store = JsonFileStore::open(&path);
        assert_eq!(store.get(THEME_KEY), None);

        // first write replaces the corrupt file
        store.set(THEME_KEY, "dark");
        assert_eq!(
            JsonFileStore::open(&path).get(THEME_KEY).as_deref(),
            Some("dark")
        );
    }

    #[test]
    fn test_store_through_mut_reference() {
        fn remember_font<S: KeyValueStore>(mut store: S) {
            store.set(FONT_KEY, "inter");
        }

        let mut store = MemoryStore::new();
        remember_font(&mut store);
        assert_eq!(store.get(FONT_KEY).as_deref(), Some("inter"));
    }
}
