//! User settings persistence.
//!
//! Remembers the preferred timeframe and column selection between runs.
//! The analysis core never reads these; callers turn them into a
//! [`ViewRequest`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analysis::resample::Timeframe;
use crate::session::{Dashboard, ViewRequest};

const SETTINGS_VERSION: u32 = 1;
const SETTINGS_FILE: &str = "settings.json";

/// User settings that persist across sessions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Settings file version for migration support
    #[serde(default = "default_version")]
    pub version: u32,
    /// Timeframe applied when none is chosen
    #[serde(default)]
    pub default_timeframe: Timeframe,
    /// Columns selected last time
    #[serde(default)]
    pub selected_columns: Vec<String>,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            default_timeframe: Timeframe::default(),
            selected_columns: Vec::new(),
        }
    }
}

impl UserSettings {
    /// Get the config directory path for anodelog
    pub fn get_config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::data_dir().map(|p| p.join("AnodeLog"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|p| p.join("AnodeLog"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            dirs::config_dir().map(|p| p.join("anodelog"))
        }
    }

    /// Get the path to the settings JSON file
    pub fn get_settings_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|p| p.join(SETTINGS_FILE))
    }

    /// Load settings from the config directory, falling back to defaults
    pub fn load() -> Self {
        match Self::get_settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from a specific file. Missing or corrupt files give defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable settings {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to the config directory
    pub fn save(&self) -> Result<(), String> {
        let path = Self::get_settings_path()
            .ok_or_else(|| "Could not determine config directory".to_string())?;
        self.save_to(&path)
    }

    /// Save settings to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write settings file: {}", e))?;

        Ok(())
    }

    /// Remember the timeframe of a pass and the selections it accepted
    pub fn remember(&mut self, request: &ViewRequest, dashboard: &Dashboard) {
        self.default_timeframe = request.timeframe;
        self.selected_columns = dashboard
            .selected_summaries
            .iter()
            .map(|s| s.column.clone())
            .collect();
    }

    /// View request over the full data range with the remembered choices
    pub fn to_request(&self) -> ViewRequest {
        ViewRequest::default()
            .with_timeframe(self.default_timeframe)
            .with_selected(self.selected_columns.iter().cloned())
    }
}
