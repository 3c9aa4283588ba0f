// JGChat Settings Engine
// Manages chatbot settings: loading, saving, updating individual values, and
// resetting to defaults. Settings are stored as a JSON file in the data
// directory; the cached model catalog lives inside the same document.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::errors::SettingsError;
use crate::types::model::ModelDescriptor;
use crate::types::settings::ChatSettings;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<ChatSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &ChatSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn replace_models(&mut self, models: Vec<ModelDescriptor>) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: ChatSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses `JGCHAT_DATA_DIR` (falling back to the current
    /// directory) with `settings.json`.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => Self::default_config_path().to_string_lossy().to_string(),
        };

        Self {
            config_path,
            settings: ChatSettings::default(),
        }
    }

    fn default_config_path() -> PathBuf {
        let dir = std::env::var("JGCHAT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        dir.join("settings.json")
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// If the file does not exist, returns default settings.
    /// If the file exists but is malformed, returns a serialization error.
    fn load(&mut self) -> Result<ChatSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            self.settings = ChatSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        let settings: ChatSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Saves the current settings to the JSON config file.
    ///
    /// Creates parent directories if they don't exist.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Returns a reference to the current in-memory settings.
    fn get_settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Updates an individual setting by dot-notation key path.
    ///
    /// Converts the current settings to a `serde_json::Value`, navigates the
    /// dot-separated key path, updates the target value, then deserializes
    /// back into `ChatSettings` to validate it. Saves to disk after a
    /// successful update.
    ///
    /// # Examples
    /// - `"chat.name"` → updates `settings.chat.name`
    /// - `"api.api_key"` → updates `settings.api.api_key`
    /// - `"widget.theme"` → updates `settings.widget.theme`
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let parts: Vec<&str> = key.split('.').collect();

        let mut json_value = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        // Navigate to the target location and set the value
        {
            let mut current = &mut json_value;
            for (i, part) in parts.iter().enumerate() {
                if i == parts.len() - 1 {
                    match current {
                        serde_json::Value::Object(map) => {
                            if !map.contains_key(*part) {
                                return Err(SettingsError::InvalidKey(format!(
                                    "Key '{}' not found in settings",
                                    key
                                )));
                            }
                            map.insert(part.to_string(), value.clone());
                        }
                        _ => {
                            return Err(SettingsError::InvalidKey(format!(
                                "Cannot navigate to key '{}': intermediate value is not an object",
                                key
                            )));
                        }
                    }
                } else {
                    current = match current.get_mut(*part) {
                        Some(v) => v,
                        None => {
                            return Err(SettingsError::InvalidKey(format!(
                                "Key '{}' not found in settings",
                                key
                            )));
                        }
                    };
                }
            }
        }

        // Deserialize back into ChatSettings to validate the new value
        let new_settings: ChatSettings = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        self.settings = new_settings;
        self.save()?;

        Ok(())
    }

    /// Fully replaces the cached model catalog and persists it.
    ///
    /// Callers must only invoke this after a successful refresh; a failed
    /// refresh leaves the previous catalog untouched.
    fn replace_models(&mut self, models: Vec<ModelDescriptor>) -> Result<(), SettingsError> {
        self.settings.models = models;
        self.save()
    }

    /// Resets all settings to defaults and saves to disk.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = ChatSettings::default();
        self.save()?;
        Ok(())
    }

    /// Returns the path to the config file.
    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
