//! Application configuration for kubetriage

use crate::error::{KtError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration stored in ~/.kubetriage/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub diagnose: DiagnoseConfig,

    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Defaults for one-shot diagnosis, overridable per invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnoseConfig {
    /// Log tail length per container
    #[serde(default = "default_tail_lines")]
    pub tail_lines: i64,

    /// Event recency window in seconds
    #[serde(default = "default_event_window_secs")]
    pub event_window_secs: i64,

    /// Maximum number of events in a report
    #[serde(default = "default_event_limit")]
    pub event_limit: usize,
}

/// Defaults for the watch loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Minimum seconds between two diagnoses of the same pod
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Watch resync interval in seconds
    #[serde(default = "default_resync_secs")]
    pub resync_secs: u64,

    /// Concurrent diagnosis cap
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Directory reports are written into
    #[serde(default = "default_report_dir")]
    pub report_dir: String,
}

fn default_tail_lines() -> i64 {
    50
}

fn default_event_window_secs() -> i64 {
    3600
}

fn default_event_limit() -> usize {
    5
}

fn default_cooldown_secs() -> u64 {
    60
}

fn default_resync_secs() -> u64 {
    600
}

fn default_max_concurrent() -> usize {
    8
}

fn default_report_dir() -> String {
    "reports".to_string()
}

impl Default for DiagnoseConfig {
    fn default() -> Self {
        Self {
            tail_lines: default_tail_lines(),
            event_window_secs: default_event_window_secs(),
            event_limit: default_event_limit(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
            resync_secs: default_resync_secs(),
            max_concurrent: default_max_concurrent(),
            report_dir: default_report_dir(),
        }
    }
}

/// Get the kubetriage config directory (~/.kubetriage)
pub fn config_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|h| h.join(".kubetriage"))
        .ok_or_else(|| KtError::Config("Could not determine home directory".to_string()))
}

/// Load application config from ~/.kubetriage/config.toml
pub fn load_config() -> Result<AppConfig> {
    let path = config_dir()?.join("config.toml");
    if path.exists() {
        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| KtError::Config(e.to_string()))
    } else {
        Ok(AppConfig::default())
    }
}
