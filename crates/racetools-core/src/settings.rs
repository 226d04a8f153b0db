//! Application settings stored in settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calculator::CalculatorInputs;
use crate::reaction::{TreeTiming, DEFAULT_TOP_LIMIT};

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Directory name under the platform config/data directories
pub const APP_DIR_NAME: &str = "RaceTools";

/// Errors from loading or saving settings
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Settings file could not be read or written
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Settings file is not valid JSON
    #[error("Invalid settings file: {0}")]
    InvalidData(#[from] serde_json::Error),

    /// Neither a config nor a home directory is available
    #[error("Could not determine the user config directory")]
    NoConfigDir,
}

/// User settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Settings version for migrations
    #[serde(default = "default_version")]
    pub version: String,

    /// Where saved configurations live (platform data dir when unset)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Entries shown on the reaction leaderboard
    #[serde(default = "default_leaderboard_limit")]
    pub leaderboard_limit: usize,

    /// Lamp schedule for the reaction tree
    #[serde(default)]
    pub tree_timing: TreeTiming,

    /// Inputs the calculator starts with
    #[serde(default)]
    pub calculator: CalculatorInputs,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_leaderboard_limit() -> usize {
    DEFAULT_TOP_LIMIT
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            data_dir: None,
            leaderboard_limit: default_leaderboard_limit(),
            tree_timing: TreeTiming::default(),
            calculator: CalculatorInputs::default(),
        }
    }
}

impl AppSettings {
    /// Default settings directory (`<config dir>/RaceTools`)
    pub fn settings_dir() -> Result<PathBuf, SettingsError> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or(SettingsError::NoConfigDir)?;
        Ok(base.join(APP_DIR_NAME))
    }

    /// Default settings file path
    pub fn settings_path() -> Result<PathBuf, SettingsError> {
        Ok(Self::settings_dir()?.join(SETTINGS_FILE_NAME))
    }

    /// Load settings from `path`, falling back to defaults if the file is missing
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write settings to `path`, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Directory for saved configurations
    pub fn resolved_data_dir(&self) -> Result<PathBuf, SettingsError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(SettingsError::NoConfigDir)?;
        Ok(base.join(APP_DIR_NAME))
    }
}
