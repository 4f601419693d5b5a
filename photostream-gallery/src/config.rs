//! Configuration management for the PhotoStream gallery module
//!
//! All configuration is bootstrap-only: the module reads its TOML file once
//! at startup and must restart to pick up changes.
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments (--port, --root-folder, --analysis-endpoint)
//! 2. Environment variables (PHOTOSTREAM_PORT, PHOTOSTREAM_ROOT_FOLDER, ...)
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)
//!
//! Command-line and environment tiers are merged by the clap layer in main
//! and arrive here as `ConfigOverrides`.

use photostream_common::config::{default_module_config_path, RootFolderResolver};
use photostream_common::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Bootstrap configuration loaded from the TOML file
///
/// Every field has a built-in default, so the module starts with no
/// config file at all.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Root folder for gallery data (optional)
    ///
    /// If not specified, resolution falls through environment and the
    /// OS-dependent default.
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Photo analysis service configuration (optional)
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            root_folder: None,
            logging: LoggingConfig::default(),
            analysis: AnalysisSettings::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    ///
    /// Applied only when RUST_LOG is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    /// EnvFilter directive derived from the configured level
    pub fn directive(&self) -> String {
        format!(
            "photostream_gallery={level},tower_http={level}",
            level = self.level
        )
    }
}

/// Photo analysis service configuration
///
/// The gallery delegates tag and capture date suggestion to an external
/// HTTP service; these settings locate it and bound each request.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSettings {
    /// Analysis endpoint URL
    #[serde(default = "default_analysis_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_analysis_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            endpoint: default_analysis_endpoint(),
            timeout_seconds: default_analysis_timeout_seconds(),
        }
    }
}

impl AnalysisSettings {
    /// Per-request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_port() -> u16 {
    5726
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_analysis_endpoint() -> String {
    "http://127.0.0.1:3400/analyze-photo".to_string()
}

fn default_analysis_timeout_seconds() -> u64 {
    30
}

/// Complete application configuration after override resolution
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub port: u16,

    /// Root folder for gallery data
    pub root_folder: PathBuf,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Photo analysis service configuration
    pub analysis: AnalysisSettings,
}

impl Config {
    /// Load configuration from the TOML file and apply overrides
    ///
    /// An explicitly named config file must exist and parse; the default
    /// location is optional and silently skipped when absent.
    pub fn load(toml_path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let toml_config = match toml_path {
            Some(path) => read_toml(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => read_toml(&path)?,
                _ => TomlConfig::default(),
            },
        };

        let port = overrides.port.unwrap_or(toml_config.port);

        // Root folder priority: overrides (CLI/env) > TOML > shared resolver
        let root_folder = if let Some(path) = overrides.root_folder {
            path
        } else if let Some(path) = toml_config.root_folder {
            path
        } else {
            RootFolderResolver::new("gallery").resolve()
        };

        let mut analysis = toml_config.analysis;
        if let Some(endpoint) = overrides.analysis_endpoint {
            analysis.endpoint = endpoint;
        }

        Ok(Config {
            port,
            root_folder,
            logging: toml_config.logging,
            analysis,
        })
    }
}

/// Command-line and environment configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub root_folder: Option<PathBuf>,
    pub analysis_endpoint: Option<String>,
}

/// Default config file location for this module
/// (e.g. ~/.config/photostream/gallery.toml on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    default_module_config_path("gallery")
}

fn read_toml(path: &Path) -> Result<TomlConfig> {
    let toml_str = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

    let toml_config: TomlConfig = toml::from_str(&toml_str)
        .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

    info!("Loaded TOML configuration from {:?}", path);
    Ok(toml_config)
}
