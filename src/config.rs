//! Application configuration.
//!
//! Values are resolved in order: built-in defaults, then the optional TOML
//! file named by `ENERGY_ASSISTANT_CONFIG` (default `energy-assistant.toml`),
//! then environment variables. CLI flags are applied on top by the binary.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "energy-assistant.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub consumption_path: PathBuf,
    pub outage_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            consumption_path: PathBuf::from("data/consumption_logs.csv"),
            outage_path: PathBuf::from("data/outage_reports.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub plot_path: PathBuf,
    pub log_file_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            plot_path: PathBuf::from("demand_plot.csv"),
            log_file_path: PathBuf::from("logs/energy_assistant.log"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Loads the config file (if present) and applies environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("ENERGY_ASSISTANT_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut cfg = Self::from_file(Path::new(&path))?;
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Parses `path` as TOML. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("CONSUMPTION_PATH") {
            self.data.consumption_path = v.into();
        }
        if let Some(v) = lookup("OUTAGE_PATH") {
            self.data.outage_path = v.into();
        }
        if let Some(v) = lookup("PLOT_OUTPUT_PATH") {
            self.output.plot_path = v.into();
        }
        if let Some(v) = lookup("LOG_FILE_PATH") {
            self.output.log_file_path = v.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [data]
            consumption_path = "fixtures/consumption.csv"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.data.consumption_path, PathBuf::from("fixtures/consumption.csv"));
        assert_eq!(cfg.data.outage_path, PathBuf::from("data/outage_reports.csv"));
        assert_eq!(cfg.output, OutputConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(AppConfig::from_toml("[data\nconsumption_path = 3").is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let cfg = AppConfig::from_file(Path::new("/nonexistent/energy-assistant.toml")).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(|key| match key {
            "OUTAGE_PATH" => Some("other/outages.csv".to_string()),
            "LOG_FILE_PATH" => Some("/tmp/ea.log".to_string()),
            _ => None,
        });

        assert_eq!(cfg.data.outage_path, PathBuf::from("other/outages.csv"));
        assert_eq!(cfg.output.log_file_path, PathBuf::from("/tmp/ea.log"));
        assert_eq!(
            cfg.data.consumption_path,
            DataConfig::default().consumption_path
        );
    }
}
