use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::SessionConfig;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "WORDWISE_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Word catalog used when `--catalog` is not given
    pub catalog_path: Option<PathBuf>,
    pub daily_goal: usize,
    pub starting_hearts: u32,
    /// Correct words between "set complete" breaks
    pub set_size: usize,
    pub points_per_word: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            catalog_path: None,
            daily_goal: session.daily_goal,
            starting_hearts: session.starting_hearts,
            set_size: session.set_size,
            points_per_word: session.points_per_word,
        }
    }
}

impl AppConfig {
    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn session_config(&self) -> SessionConfig {
        let set_size = if self.set_size == 0 {
            warn!("set_size of 0 in config, using default");
            SessionConfig::default().set_size
        } else {
            self.set_size
        };
        SessionConfig {
            daily_goal: self.daily_goal,
            starting_hearts: self.starting_hearts,
            set_size,
            points_per_word: self.points_per_word,
        }
    }
}

pub fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }

    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wordwise")
        .join(CONFIG_FILE_NAME)
}
