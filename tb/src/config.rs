//! Taskboard configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{DEFAULT_COLUMN_ID, DEFAULT_COLUMN_TITLE};
use crate::recycle::{DEFAULT_CAPACITY, MAX_CAPACITY};

/// Main Taskboard configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Recycle bin configuration
    pub recycle: RecycleConfig,

    /// Write-through persistence configuration
    pub persistence: PersistenceConfig,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        if self.storage.store_dir.trim().is_empty() {
            return Err(eyre::eyre!("storage.store-dir must not be empty"));
        }
        if self.recycle.capacity == 0 {
            return Err(eyre::eyre!("recycle.capacity must be at least 1"));
        }
        if self.recycle.capacity > MAX_CAPACITY {
            return Err(eyre::eyre!(
                "recycle.capacity must be at most {}, got {}",
                MAX_CAPACITY,
                self.recycle.capacity
            ));
        }
        if self.recycle.fallback_column.trim().is_empty() {
            return Err(eyre::eyre!("recycle.fallback-column must not be empty"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::search_paths() {
            if candidate.exists() {
                match Self::load_from_file(&candidate) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level, before logging is set up
    ///
    /// Errors are swallowed; the full load later reports them.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(path) => path.clone(),
            None => Self::search_paths().into_iter().find(|p| p.exists())?,
        };
        let content = fs::read_to_string(path).ok()?;
        let config: Self = serde_yaml::from_str(&content).ok()?;
        config.log_level
    }

    /// Project-local `.taskboard.yml`, then `~/.config/taskboard/taskboard.yml`
    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".taskboard.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("taskboard").join("taskboard.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the board and bin snapshots
    #[serde(rename = "store-dir")]
    pub store_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/taskboard on Linux)
        let store_dir = dirs::data_dir()
            .map(|p| p.join("taskboard"))
            .unwrap_or_else(|| PathBuf::from(".taskboard"))
            .to_string_lossy()
            .into_owned();
        Self { store_dir }
    }
}

/// Recycle bin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecycleConfig {
    /// Maximum soft-deleted tasks kept before the oldest is evicted
    pub capacity: usize,

    /// Column that receives restored tasks whose origin column is gone
    #[serde(rename = "fallback-column")]
    pub fallback_column: String,

    /// Title used when the fallback column has to be recreated
    #[serde(rename = "fallback-title")]
    pub fallback_title: String,
}

impl Default for RecycleConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            fallback_column: DEFAULT_COLUMN_ID.to_string(),
            fallback_title: DEFAULT_COLUMN_TITLE.to_string(),
        }
    }
}

/// Write-through persistence configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Quiet period before a burst of changes is written; 0 writes right away
    #[serde(rename = "debounce-ms")]
    pub debounce_ms: u64,
}

impl PersistenceConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
