//! TOML-based user preferences.
//!
//! Stores what the settings panel toggles but the timer itself does not own:
//! - Completion feedback (notify, sound, haptics, sound id)
//! - Log filter for the host binary
//!
//! Stored at `<data_dir>/settings.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::StorageError;
use crate::notify::CompletionFeedback;

/// User preferences, serialized to/from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub feedback: CompletionFeedback,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "warn".into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feedback: CompletionFeedback::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), String> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err("settings key is empty".into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current
                    .get_mut(part)
                    .ok_or_else(|| format!("unknown settings key: {key}"))?;
                continue;
            }

            let obj = current
                .as_object_mut()
                .ok_or_else(|| format!("unknown settings key: {key}"))?;
            let existing = obj
                .get(part)
                .ok_or_else(|| format!("unknown settings key: {key}"))?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|_| format!("cannot parse '{value}' as bool"))?,
                ),
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| format!("cannot parse '{value}' as number"))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(format!("settings key {key} is not a leaf"));
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(format!("unknown settings key: {key}"))
    }

    pub fn default_path() -> Result<PathBuf, StorageError> {
        Ok(data_dir()?.join("settings.toml"))
    }

    /// Load from the default location, writing defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed,
    /// or if the defaults cannot be written.
    pub fn load() -> Result<Self, StorageError> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, StorageError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| StorageError::File {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let settings = Self::default();
                settings.save_to(path)?;
                Ok(settings)
            }
            Err(e) => Err(StorageError::File {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Load, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default settings");
            Self::default()
        })
    }

    pub fn save(&self) -> Result<(), StorageError> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), StorageError> {
        let to_file_error = |message: String| StorageError::File {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| to_file_error(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| to_file_error(e.to_string()))
    }

    /// Get a value as string by dot-separated key (e.g. `feedback.sound`).
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key. Does not persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value has the wrong type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let mut json = serde_json::to_value(&*self).map_err(|e| e.to_string())?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Every leaf key with its current value, for listing.
    pub fn entries(&self) -> Vec<(String, String)> {
        let Ok(json) = serde_json::to_value(self) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        collect_leaves(&json, String::new(), &mut out);
        out
    }
}

fn collect_leaves(value: &serde_json::Value, prefix: String, out: &mut Vec<(String, String)>) {
    match value {
        serde_json::Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                collect_leaves(v, key, out);
            }
        }
        serde_json::Value::String(s) => out.push((prefix, s.clone())),
        other => out.push((prefix, other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_roundtrip() {
        let settings = Settings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let settings = Settings::default();
        assert_eq!(settings.get("feedback.sound").as_deref(), Some("true"));
        assert_eq!(settings.get("feedback.sound_id").as_deref(), Some("default"));
        assert_eq!(settings.get("log_filter").as_deref(), Some("warn"));
        assert!(settings.get("feedback.missing").is_none());
        assert!(settings.get("feedback").is_none());
    }

    #[test]
    fn set_updates_nested_bool_and_string() {
        let mut settings = Settings::default();
        settings.set("feedback.haptics", "false").unwrap();
        settings.set("feedback.sound_id", "bell").unwrap();
        assert!(!settings.feedback.haptics);
        assert_eq!(settings.feedback.sound_id, "bell");
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_type() {
        let mut settings = Settings::default();
        assert!(settings.set("feedback.volume", "3").is_err());
        assert!(settings.set("feedback.sound", "loud").is_err());
        assert!(settings.set("", "x").is_err());
        assert!(settings.set("feedback", "x").is_err());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut settings = Settings::default();
        settings.set("log_filter", "pomocycle_core=debug").unwrap();
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "feedback = [").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(StorageError::File { .. })));
    }

    #[test]
    fn entries_lists_leaves() {
        let entries = Settings::default().entries();
        assert!(entries.iter().any(|(k, v)| k == "feedback.notify" && v == "true"));
        assert!(entries.iter().any(|(k, _)| k == "log_filter"));
    }
}
