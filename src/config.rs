use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::error::ConfigError;
use crate::session::{
    EngagementConfig, DEFAULT_FAILURE_SECS, DEFAULT_GOAL_WORDS, DEFAULT_TICK_SECS,
    DEFAULT_WARNING_SECS,
};

pub const DEFAULT_MAX_ROW_CHARACTERS: u16 = 45;

/// Persisted user settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub goal_words: u32,
    pub warning_secs: f64,
    pub failure_secs: f64,
    pub tick_ms: u64,
    pub max_row_characters: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            goal_words: DEFAULT_GOAL_WORDS,
            warning_secs: DEFAULT_WARNING_SECS,
            failure_secs: DEFAULT_FAILURE_SECS,
            tick_ms: (DEFAULT_TICK_SECS * 1000.0) as u64,
            max_row_characters: DEFAULT_MAX_ROW_CHARACTERS,
        }
    }
}

impl TryFrom<&Config> for EngagementConfig {
    type Error = ConfigError;

    fn try_from(cfg: &Config) -> Result<Self, Self::Error> {
        if cfg.tick_ms == 0 {
            return Err(ConfigError::invalid("tick_ms", "must be at least 1"));
        }
        let engagement = EngagementConfig {
            goal_words: cfg.goal_words,
            warning_threshold_seconds: cfg.warning_secs,
            failure_threshold_seconds: cfg.failure_secs,
            tick_period_seconds: cfg.tick_ms as f64 / 1000.0,
        };
        engagement.validate()?;
        Ok(engagement)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_load(&self) -> Result<Config, ConfigError> {
        let bytes = fs::read(&self.path).map_err(|e| ConfigError::LoadFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        serde_json::from_slice::<Config>(&bytes).map_err(|e| ConfigError::LoadFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if !self.path.exists() {
            return Config::default();
        }
        match self.try_load() {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(target: "config", error = %err, "config_load_failed_using_defaults");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: self.path.clone(),
            message,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(|e| save_failed(e.to_string()))?;
        fs::write(&self.path, data).map_err(|e| save_failed(e.to_string()))
    }
}
