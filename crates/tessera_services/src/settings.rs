//! Settings management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings")]
    Parse(#[from] serde_json::Error),
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scene: SceneSettings,
    pub simulation: SimulationSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Script that drives the scene.
    pub script: PathBuf,
    /// Directory textures and other assets are resolved against.
    pub asset_root: PathBuf,
    /// Optional texture manifest, loaded before the script runs. Relative
    /// paths resolve against `asset_root`.
    pub texture_manifest: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub tick_rate_hz: u32,
    /// Ticks to run before the headless runtime exits.
    pub max_ticks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            script: PathBuf::from("assets/scripts/main.js"),
            asset_root: PathBuf::from("assets"),
            texture_manifest: None,
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_rate_hz: tessera_core::time::TICK_RATE_HZ,
            max_ticks: 120,
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn to_json_pretty(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
