//! Layered user settings persisted as JSON.
//!
//! Three layers are merged in order: built-in defaults, the shipped sample
//! file, then the user's own file. Only the user file is ever written.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;

pub const BRIEF: &str = "brief";
pub const SHOW_VNUM: &str = "show_vnum";
pub const USE_TERRAIN_SYMBOLS: &str = "use_terrain_symbols";
pub const LAST_VNUM: &str = "last_vnum";

const SAMPLE_FILE: &str = "settings.json.sample";
const USER_FILE: &str = "settings.json";

/// A single option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Text(String),
    /// Anything else found in a settings file; kept so it round-trips.
    Other(serde_json::Value),
}

/// The merged option mapping. Keys are kept sorted so saving is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    values: BTreeMap<String, SettingValue>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut values = BTreeMap::new();
        values.insert(BRIEF.to_string(), SettingValue::Bool(true));
        values.insert(SHOW_VNUM.to_string(), SettingValue::Bool(true));
        values.insert(USE_TERRAIN_SYMBOLS.to_string(), SettingValue::Bool(false));
        Settings { values }
    }
}

impl Settings {
    /// Settings with no keys at all, not even the defaults.
    pub fn empty() -> Self {
        Settings {
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.values.get(name)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(SettingValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// A boolean option, treating absent or non-boolean values as off.
    pub fn enabled(&self, name: &str) -> bool {
        self.get_bool(name).unwrap_or(false)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(SettingValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: SettingValue) {
        self.values.insert(name.into(), value);
    }

    /// Flips a boolean option and returns the new value. An absent option
    /// counts as `true` before the flip.
    pub fn toggle(&mut self, name: &str) -> bool {
        let new = !self.get_bool(name).unwrap_or(true);
        self.set(name, SettingValue::Bool(new));
        new
    }

    /// Overlays another layer; its keys win.
    pub fn merge(&mut self, layer: BTreeMap<String, SettingValue>) {
        self.values.extend(layer);
    }

    /// Key-sorted JSON with two-space indentation.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.values)
    }
}

/// Knows where the sample and user settings files live.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    sample_path: PathBuf,
    user_path: PathBuf,
}

impl SettingsStore {
    /// Uses the standard file names inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(SAMPLE_FILE), data_dir.join(USER_FILE))
    }

    pub fn new(sample_path: impl Into<PathBuf>, user_path: impl Into<PathBuf>) -> Self {
        SettingsStore {
            sample_path: sample_path.into(),
            user_path: user_path.into(),
        }
    }

    pub fn user_path(&self) -> &Path {
        &self.user_path
    }

    /// Merges defaults, sample and user layers. A layer that cannot be used
    /// contributes nothing; its error is handed back as a warning.
    pub fn load(&self) -> (Settings, Vec<SettingsError>) {
        let mut settings = Settings::default();
        let mut warnings = Vec::new();

        for path in [&self.sample_path, &self.user_path] {
            match read_layer(path) {
                Ok(layer) => settings.merge(layer),
                Err(e) => {
                    log::warn!("{e}");
                    warnings.push(e);
                }
            }
        }

        (settings, warnings)
    }

    /// Writes every current value to the user file.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let io_err = |source: io::Error| SettingsError::Io {
            path: self.user_path.clone(),
            source,
        };

        let text = settings.to_json().map_err(|e| io_err(e.into()))?;
        if let Some(parent) = self.user_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        fs::write(&self.user_path, text).map_err(io_err)?;
        log::info!("saved settings to {}", self.user_path.display());
        Ok(())
    }
}

/// Reads one JSON object layer. A missing file is an empty layer.
fn read_layer(path: &Path) -> Result<BTreeMap<String, SettingValue>, SettingsError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    if path.is_dir() {
        return Err(SettingsError::IsDirectory(path.to_path_buf()));
    }

    let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| SettingsError::Corrupted {
        path: path.to_path_buf(),
        source,
    })
}
