//! Inference configuration
//!
//! A small TOML file tunes the inference pass, diagnostics collection and
//! logging. Every field has a default, so an empty file (or no file at all)
//! is a valid configuration.
//!
//! ```toml
//! [inference]
//! generalize_functions = true
//!
//! [diagnostics]
//! limit = 50
//!
//! [log]
//! level = "debug"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::util::logger::LogLevel;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Inference pass settings
    #[serde(default)]
    pub inference: InferenceSettings,
    /// Diagnostic collection settings
    #[serde(default)]
    pub diagnostics: DiagnosticSettings,
    /// Logging settings
    #[serde(default)]
    pub log: LogSettings,
}

/// Inference pass settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InferenceSettings {
    /// Generalize function types after their bodies are inferred
    #[serde(default = "default_generalize_functions")]
    pub generalize_functions: bool,
}

fn default_generalize_functions() -> bool {
    true
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            generalize_functions: true,
        }
    }
}

/// Diagnostic collection settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DiagnosticSettings {
    /// Maximum number of diagnostics kept; the rest are only counted
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogSettings {
    /// Log level name (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LogSettings {
    /// Parsed log level
    pub fn level(&self) -> Result<LogLevel, ConfigError> {
        self.level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(self.level.clone()))
    }
}

impl Config {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.log.level()?;
        Ok(config)
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    Config::from_toml_str(&content)
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}
