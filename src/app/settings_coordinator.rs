//! Typed access to eframe's persistent storage.
//!
//! eframe stores plain strings; every setting here is kept as a JSON value so
//! structured settings (the panel layout, for instance) round-trip as a whole.

use serde::{Deserialize, Serialize};

/// Loads and saves JSON-encoded settings.
pub struct SettingsCoordinator;

impl SettingsCoordinator {
    /// Loads `key`, falling back to `default` when the key is missing or does
    /// not decode as `T`.
    pub fn load_setting_or<T>(storage: Option<&dyn eframe::Storage>, key: &str, default: T) -> T
    where
        T: for<'de> Deserialize<'de>,
    {
        Self::try_load_setting(storage, key).unwrap_or(default)
    }

    /// Loads `key`, returning `None` when it is missing or malformed.
    pub fn try_load_setting<T>(storage: Option<&dyn eframe::Storage>, key: &str) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let json = storage?.get_string(key)?;
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("Ignoring malformed setting '{}': {}", key, err);
                None
            }
        }
    }

    /// Stores `value` under `key`. Serialization failures are logged and dropped.
    ///
    /// # Arguments
    /// * `storage` - The eframe storage interface
    /// * `key` - The storage key for this setting
    /// * `value` - The value to serialize and save
    pub fn save_setting<T>(storage: &mut dyn eframe::Storage, key: &str, value: &T)
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_string(value) {
            Ok(json) => storage.set_string(key, json),
            Err(err) => log::warn!("Could not store setting '{}': {}", key, err),
        }
    }

    /// Removes a setting by storing JSON `null`, which every `Option` loads as `None`.
    pub fn clear_setting(storage: &mut dyn eframe::Storage, key: &str) {
        storage.set_string(key, "null".to_string());
    }
}
