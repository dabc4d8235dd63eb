//! Durable per-user preference storage.
//!
//! Preferences are simple key → string values. Two namespaced keys are used:
//!
//! - `<namespace>.theme`: JSON `{ "preset": "...", "custom": { ...layer... } }`
//! - `<namespace>.fontScale`: a font scale preset id
//!
//! [`MemoryStorage`] keeps values for the process lifetime (tests, embedded
//! hosts); [`JsonFileStorage`] writes them to a JSON file under the platform
//! config directory.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use crate::error::{Result, ThemeError};

/// Key/value preference storage.
pub trait PreferenceStorage {
    /// Reads a value.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes a value durably.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Deletes a value. Missing keys are not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Storage shared between the stores that persist preferences.
pub type SharedStorage = Rc<RefCell<dyn PreferenceStorage>>;

/// Wraps a storage backend for sharing.
pub fn shared<S: PreferenceStorage + 'static>(storage: S) -> SharedStorage {
    Rc::new(RefCell::new(storage))
}

/// Namespaced preference keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceKeys {
    namespace: String,
}

impl PreferenceKeys {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Key holding the theme preset and custom override.
    pub fn theme(&self) -> String {
        format!("{}.theme", self.namespace)
    }

    /// Key holding the font scale preset id.
    pub fn font_scale(&self) -> String {
        format!("{}.fontScale", self.namespace)
    }
}

impl Default for PreferenceKeys {
    fn default() -> Self {
        Self::new("vitrine")
    }
}

/// In-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a value, returning `self` for chaining.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Storage backed by a single JSON object file.
///
/// The file is read once on open and rewritten on every change.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStorage {
    /// Opens (or prepares to create) the preference file at `path`.
    ///
    /// A missing or empty file yields empty storage.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Storage`] if the file exists but cannot be read
    /// or is not a JSON object of strings.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                ThemeError::storage(format!("Failed to parse {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(ThemeError::storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        debug!(path = %path.display(), entries = values.len(), "opened preference file");
        Ok(Self { path, values })
    }

    /// Opens the file at [`default_path`](Self::default_path).
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Default preference file location.
    ///
    /// - Linux: `~/.config/vitrine/preferences.json`
    /// - macOS: `~/Library/Application Support/vitrine/preferences.json`
    /// - Windows: `%APPDATA%\vitrine\preferences.json`
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| ThemeError::storage("could not determine config directory"))?;
        Ok(base.join("vitrine").join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ThemeError::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, content).map_err(|e| {
            ThemeError::storage(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

impl PreferenceStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let previous = self.values.insert(key.to_string(), value.to_string());
        if let Err(err) = self.flush() {
            match previous {
                Some(old) => self.values.insert(key.to_string(), old),
                None => self.values.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let Some(previous) = self.values.remove(key) else {
            return Ok(());
        };
        if let Err(err) = self.flush() {
            self.values.insert(key.to_string(), previous);
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_keys_are_namespaced() {
        let keys = PreferenceKeys::new("portal");
        assert_eq!(keys.theme(), "portal.theme");
        assert_eq!(keys.font_scale(), "portal.fontScale");
        assert_eq!(PreferenceKeys::default().theme(), "vitrine.theme");
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new().with("a", "1");
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("1"));
        storage.set("a", "2").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("2"));
        storage.remove("a").unwrap();
        assert_eq!(storage.get("a").unwrap(), None);
    }

    #[test]
    fn test_file_storage_persists_across_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut storage = JsonFileStorage::open(&path).unwrap();
        assert_eq!(storage.get("vitrine.fontScale").unwrap(), None);
        storage.set("vitrine.fontScale", "large").unwrap();

        let reopened = JsonFileStorage::open(&path).unwrap();
        assert_eq!(
            reopened.get("vitrine.fontScale").unwrap().as_deref(),
            Some("large")
        );
    }

    #[test]
    fn test_file_storage_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "").unwrap();
        let storage = JsonFileStorage::open(&path).unwrap();
        assert_eq!(storage.get("x").unwrap(), None);
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(
            JsonFileStorage::open(&path),
            Err(ThemeError::Storage(_))
        ));
    }

    #[test]
    fn test_file_storage_remove() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        let mut storage = JsonFileStorage::open(&path).unwrap();
        storage.set("k", "v").unwrap();
        storage.remove("k").unwrap();
        let reopened = JsonFileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap(), None);
    }

    #[test]
    fn test_file_storage_failed_remove_keeps_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        let mut storage = JsonFileStorage::open(&path).unwrap();
        storage.set("k", "v").unwrap();

        // A directory in place of the file makes the rewrite fail.
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(matches!(storage.remove("k"), Err(ThemeError::Storage(_))));
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
    }
}
