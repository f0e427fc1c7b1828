//! Import settings, read from an optional JSON file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::app_meta::{APP_CONFIG_DIR_NAME, DEFAULT_AUTHOR, SETTINGS_FILE_NAME};
use crate::assets::{BrushParams, DEFAULT_PREVIEW_SIZE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImportSettings {
    /// Delay between two conversion ticks
    pub tick_interval_ms: u64,
    /// Author tag stamped on every generated asset
    pub author: String,
    /// Longest side of stored previews, in pixels
    pub preview_size: u32,
    pub brush: BrushParams,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            author: DEFAULT_AUTHOR.to_string(),
            preview_size: DEFAULT_PREVIEW_SIZE,
            brush: BrushParams::default(),
        }
    }
}

impl ImportSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// An explicit path must exist; the per-user file is only read when present.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_settings_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_CONFIG_DIR_NAME).join(SETTINGS_FILE_NAME))
}
