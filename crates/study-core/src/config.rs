use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_DIR_NAME, DEFAULT_LOCALE, DEFAULT_MAX_TITLE_WIDTH, HOVER_GROUP_DELAY_MS,
};

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to write config to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// User preferences. Every field falls back to its default when missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    pub locale: String,
    pub hover_group_delay_ms: u64,
    pub max_title_width: usize,
    pub seed_demo_studies: bool,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            hover_group_delay_ms: HOVER_GROUP_DELAY_MS,
            max_title_width: DEFAULT_MAX_TITLE_WIDTH,
            seed_demo_studies: true,
        }
    }
}

impl StudyConfig {
    pub fn hover_group_delay(&self) -> Duration {
        Duration::from_millis(self.hover_group_delay_ms)
    }
}

pub struct ConfigStorage {
    path: PathBuf,
    pub config: StudyConfig,
}

impl ConfigStorage {
    /// Loads `config.json` from `dir`, or defaults when it is missing or unreadable.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::from_file(dir.as_ref().join(CONFIG_FILE_NAME))
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = Self::load_from_file(&path).unwrap_or_default();
        Self { path, config }
    }

    /// Storage under the platform config directory.
    pub fn open_default() -> Self {
        let dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME);
        Self::new(dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_file(path: &Path) -> Option<StudyConfig> {
        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                None
            }
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(&self.config)?;
        let io_err = |source| ConfigError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&self.path, json).map_err(io_err)
    }
}
