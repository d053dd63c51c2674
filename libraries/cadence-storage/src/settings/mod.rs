//! User settings
//!
//! Settings live in a small JSON object on disk (`settings.json`), one key
//! per preference. The only preference today is whether the built-in
//! fallback tracks may be used.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_storage::SettingsStore;
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = SettingsStore::open("settings.json")?;
//! settings.set_built_in_music_enabled(false)?;
//! assert!(!settings.built_in_music_enabled());
//! # Ok(())
//! # }
//! ```

use crate::error::StorageError;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Whether the built-in tracks may stand in for an empty device library
pub const SETTING_BUILT_IN_MUSIC_ENABLED: &str = "built_in_music_enabled";

/// Default file name inside the data directory
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// JSON-file-backed settings with change notification
///
/// Cloning shares the same underlying state.
#[derive(Clone)]
pub struct SettingsStore {
    path: PathBuf,
    values: Arc<Mutex<Map<String, Value>>>,
    built_in_music: Arc<watch::Sender<bool>>,
}

impl SettingsStore {
    /// Load settings from `path`, or start from defaults if it does not exist
    ///
    /// Unknown keys are preserved on the next write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a JSON object.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let values = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                Map::new()
            } else {
                match serde_json::from_str::<Value>(&text)
                    .map_err(|e| StorageError::SerializationError(e.to_string()))?
                {
                    Value::Object(map) => map,
                    other => {
                        return Err(StorageError::SerializationError(format!(
                            "expected a JSON object in {}, found {other}",
                            path.display()
                        )))
                    }
                }
            }
        } else {
            Map::new()
        };

        let built_in_music = values
            .get(SETTING_BUILT_IN_MUSIC_ENABLED)
            .and_then(Value::as_bool)
            .unwrap_or(true);

        tracing::debug!(path = %path.display(), built_in_music, "Loaded settings");

        let (sender, _) = watch::channel(built_in_music);
        Ok(Self {
            path,
            values: Arc::new(Mutex::new(values)),
            built_in_music: Arc::new(sender),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current value of the built-in music preference (default `true`)
    pub fn built_in_music_enabled(&self) -> bool {
        *self.built_in_music.borrow()
    }

    /// Observe the built-in music preference
    ///
    /// The receiver starts at the current value and sees every later change.
    pub fn subscribe_built_in_music(&self) -> watch::Receiver<bool> {
        self.built_in_music.subscribe()
    }

    /// Persist the built-in music preference
    ///
    /// Observers are notified only after the file has been written.
    pub fn set_built_in_music_enabled(&self, enabled: bool) -> Result<()> {
        self.set_value(SETTING_BUILT_IN_MUSIC_ENABLED, Value::Bool(enabled))?;
        self.built_in_music.send_if_modified(|current| {
            let changed = *current != enabled;
            *current = enabled;
            changed
        });
        Ok(())
    }

    /// Read a raw setting value
    pub fn get_value(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    fn set_value(&self, key: &str, value: Value) -> Result<()> {
        // Held across the write so concurrent setters cannot interleave
        let mut values = self.lock();
        let mut updated = values.clone();
        updated.insert(key.to_string(), value);

        let text = serde_json::to_string_pretty(&updated)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, text)?;
        *values = updated;

        tracing::debug!(key, path = %self.path.display(), "Saved setting");
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Map<String, Value>> {
        self.values.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_defaults_to_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsStore::open(dir.path().join(SETTINGS_FILE_NAME)).unwrap();
        assert!(settings.built_in_music_enabled());
        assert_eq!(settings.get_value(SETTING_BUILT_IN_MUSIC_ENABLED), None);
    }

    #[test]
    fn toggle_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);

        let settings = SettingsStore::open(&path).unwrap();
        settings.set_built_in_music_enabled(false).unwrap();

        let reopened = SettingsStore::open(&path).unwrap();
        assert!(!reopened.built_in_music_enabled());
    }

    #[test]
    fn unknown_keys_survive_a_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let settings = SettingsStore::open(&path).unwrap();
        settings.set_built_in_music_enabled(false).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let json: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["theme"], "dark");
        assert_eq!(json[SETTING_BUILT_IN_MUSIC_ENABLED], false);
    }

    #[test]
    fn failed_write_leaves_setting_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        // The settings file's parent is a plain file, so every write fails
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "").unwrap();
        let settings = SettingsStore::open(blocker.join(SETTINGS_FILE_NAME)).unwrap();
        let rx = settings.subscribe_built_in_music();

        assert!(settings.set_built_in_music_enabled(false).is_err());
        assert_eq!(settings.get_value(SETTING_BUILT_IN_MUSIC_ENABLED), None);
        assert!(settings.built_in_music_enabled());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn non_object_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "[1, 2]").unwrap();

        assert!(matches!(
            SettingsStore::open(&path),
            Err(StorageError::SerializationError(_))
        ));
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsStore::open(dir.path().join(SETTINGS_FILE_NAME)).unwrap();
        let mut rx = settings.subscribe_built_in_music();
        assert!(*rx.borrow_and_update());

        settings.set_built_in_music_enabled(false).unwrap();
        rx.changed().await.unwrap();
        assert!(!*rx.borrow_and_update());
    }

    #[tokio::test]
    async fn setting_same_value_does_not_notify() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsStore::open(dir.path().join(SETTINGS_FILE_NAME)).unwrap();
        let rx = settings.subscribe_built_in_music();

        settings.set_built_in_music_enabled(true).unwrap();
        assert!(!rx.has_changed().unwrap());
    }
}
