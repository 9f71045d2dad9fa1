//! Plugin settings
//!
//! Settings live inside the vault at `.autotemplate/data.json`, so each vault
//! carries its own template configuration. Every key is optional: partial or
//! older data is merged under the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

use crate::error::SettingsError;
use crate::path::normalize_path;
use crate::storage::Storage;

/// Location of the settings file, relative to the vault root
pub const SETTINGS_PATH: &str = ".autotemplate/data.json";

/// Template configuration for a vault
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Fallback template; empty means none configured
    pub default_template: String,
    /// Folder path to template path overrides
    pub folder_templates: BTreeMap<String, String>,
    /// Path prefixes where templates are never applied
    pub ignore_paths: Vec<String>,
}

impl Settings {
    /// Parse settings from JSON, filling in defaults for missing keys
    pub fn from_json(content: &str) -> std::result::Result<Self, SettingsError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load settings from storage
    ///
    /// A vault without a settings file gets the defaults.
    pub fn load(storage: &dyn Storage) -> Result<Self> {
        let path = Path::new(SETTINGS_PATH);
        if !storage.exists(path) {
            return Ok(Self::default());
        }

        let content = storage.read_to_string(path)?;
        Self::from_json(&content).with_context(|| format!("Failed to parse {}", SETTINGS_PATH))
    }

    /// Load settings or fall back to defaults if they cannot be read
    pub fn load_or_default(storage: &dyn Storage) -> Self {
        Self::load(storage).unwrap_or_else(|e| {
            warn!(error = %e, "using default settings");
            Self::default()
        })
    }

    /// Write the whole settings object back to storage
    pub fn save(&self, storage: &dyn Storage) -> Result<()> {
        let path = Path::new(SETTINGS_PATH);
        if let Some(dir) = path.parent() {
            storage.create_dir_all(dir)?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        storage.write(path, &content)
    }

    pub fn set_default_template(&mut self, template: &str) {
        self.default_template = normalize_path(template);
    }

    /// Point `folder` at `template`, replacing any existing override
    pub fn set_folder_template(&mut self, folder: &str, template: &str) {
        self.folder_templates
            .insert(normalize_path(folder), normalize_path(template));
    }

    /// Add the blank row a new override starts from
    pub fn add_folder_placeholder(&mut self) {
        self.folder_templates.entry(String::new()).or_default();
    }

    /// Move an override to a different folder, keeping its template
    ///
    /// Renaming to an empty folder drops the override.
    pub fn rename_folder(&mut self, old: &str, new: &str) -> std::result::Result<(), SettingsError> {
        let new = normalize_path(new);
        if new == old {
            return Ok(());
        }

        let template = self
            .folder_templates
            .remove(old)
            .ok_or_else(|| SettingsError::UnknownFolder(old.to_string()))?;
        if !new.is_empty() {
            self.folder_templates.insert(new, template);
        }
        Ok(())
    }

    pub fn remove_folder_template(&mut self, folder: &str) -> std::result::Result<(), SettingsError> {
        self.folder_templates
            .remove(folder)
            .map(|_| ())
            .ok_or_else(|| SettingsError::UnknownFolder(folder.to_string()))
    }

    /// Ignore everything under `path`
    pub fn add_ignore_path(&mut self, path: &str) -> std::result::Result<(), SettingsError> {
        let path = normalize_path(path);
        if self.ignore_paths.contains(&path) {
            return Err(SettingsError::DuplicateIgnorePath(path));
        }
        self.ignore_paths.push(path);
        Ok(())
    }

    /// Replace an ignored path in place; an empty replacement removes it
    pub fn update_ignore_path(&mut self, old: &str, new: &str) -> std::result::Result<(), SettingsError> {
        let index = self
            .ignore_paths
            .iter()
            .position(|p| p == old)
            .ok_or_else(|| SettingsError::UnknownIgnorePath(old.to_string()))?;

        let new = normalize_path(new);
        if new.is_empty() {
            self.ignore_paths.remove(index);
            return Ok(());
        }
        if new != old && self.ignore_paths.contains(&new) {
            return Err(SettingsError::DuplicateIgnorePath(new));
        }
        self.ignore_paths[index] = new;
        Ok(())
    }

    pub fn remove_ignore_path(&mut self, path: &str) -> std::result::Result<(), SettingsError> {
        let index = self
            .ignore_paths
            .iter()
            .position(|p| p == path)
            .ok_or_else(|| SettingsError::UnknownIgnorePath(path.to_string()))?;
        self.ignore_paths.remove(index);
        Ok(())
    }
}
