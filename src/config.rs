//! Configuration management for the predictor

use crate::models::loader::DEFAULT_MODEL_PATH;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Location of the optional configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path of the XGBoost JSON artifact
    #[serde(default = "default_model_path")]
    pub path: String,
}

fn default_model_path() -> String {
    DEFAULT_MODEL_PATH.to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

/// Interactive form configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FormConfig {
    /// Show the caveat note after each successful prediction
    #[serde(default = "default_true")]
    pub show_note: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FormConfig {
    fn default() -> Self {
        Self { show_note: true }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty, json)
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location, falling back to
    /// defaults when the file is absent
    pub fn load() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load_from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.model.path, "xgb_strategic_optuna.json");
        assert!(config.form.show_note);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_load_from_path() {
        let file = write_toml(
            r#"
            [model]
            path = "models/methane.json"

            [form]
            show_note = false

            [logging]
            level = "debug"
            format = "json"
            "#,
        );

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.model.path, "models/methane.json");
        assert!(!config.form.show_note);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_toml("[logging]\nlevel = \"warn\"\n");

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.model.path, "xgb_strategic_optuna.json");
        assert!(config.form.show_note);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_bad_format_is_rejected() {
        let file = write_toml("[logging]\nformat = \"xml\"\n");
        assert!(AppConfig::load_from_path(file.path()).is_err());
    }
}
