//! Configuration management for `DisasterWatch`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::DisasterWatchError;
use crate::risk::ModelPaths;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix for environment variable overrides, e.g. `DISASTERWATCH_SERVER__PORT`
pub const ENV_PREFIX: &str = "DISASTERWATCH";

/// Root configuration structure for the `DisasterWatch` service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisasterWatchConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Reference dataset locations
    pub data: DataConfig,
    /// Model artifact locations
    pub models: ModelsConfig,
    /// Synthetic telemetry configuration
    pub telemetry: TelemetryConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Default request settings
    pub defaults: DefaultsConfig,
}

/// HTTP server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,
    pub port: u16,
    /// Per-request timeout in seconds
    pub request_timeout_seconds: u32,
}

/// GeoJSON reference dataset paths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub regions: PathBuf,
    pub shelters: PathBuf,
    pub routes: PathBuf,
}

/// Model artifact paths, one per disaster type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub earthquake: PathBuf,
    pub flood: PathBuf,
    pub wildfire: PathBuf,
    pub hurricane: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Seed for the deterministic telemetry generator
    pub seed: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
    /// OTLP/HTTP collector endpoint; spans are exported only when set
    pub otlp_endpoint: Option<String>,
}

/// Default request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Forecast window used when a request omits one
    pub time_window_days: u32,
    /// Largest accepted forecast window
    pub max_time_window_days: u32,
    /// Number of alternate shelters in an evacuation plan
    pub max_alternates: usize,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_time_window() -> u32 {
    crate::models::risk::DEFAULT_TIME_WINDOW_DAYS
}

fn default_max_time_window() -> u32 {
    30
}

fn default_max_alternates() -> usize {
    crate::evacuation::DEFAULT_MAX_ALTERNATES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            regions: PathBuf::from("data/regions.geojson"),
            shelters: PathBuf::from("data/shelters.geojson"),
            routes: PathBuf::from("data/evacuation_routes.geojson"),
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            earthquake: PathBuf::from("models/earthquake.json"),
            flood: PathBuf::from("models/flood.json"),
            wildfire: PathBuf::from("models/wildfire.json"),
            hurricane: PathBuf::from("models/hurricane.json"),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            otlp_endpoint: None,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            time_window_days: default_time_window(),
            max_time_window_days: default_max_time_window(),
            max_alternates: default_max_alternates(),
        }
    }
}

impl ModelsConfig {
    #[must_use]
    pub fn paths(&self) -> ModelPaths {
        ModelPaths {
            earthquake: self.earthquake.clone(),
            flood: self.flood.clone(),
            wildfire: self.wildfire.clone(),
            hurricane: self.hurricane.clone(),
        }
    }
}

impl DisasterWatchConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        Self::load_with(&config_file, Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load_with(config_file: &Path, environment: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(environment);

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: DisasterWatchConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("disasterwatch").join("config.toml"))
    }

    /// Replace zero or empty values with their defaults
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.logging.otlp_endpoint.as_deref().is_some_and(str::is_empty) {
            self.logging.otlp_endpoint = None;
        }
        if self.defaults.time_window_days == 0 {
            self.defaults.time_window_days = default_time_window();
        }
        if self.defaults.max_time_window_days == 0 {
            self.defaults.max_time_window_days = default_max_time_window();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.request_timeout_seconds > 300 {
            return Err(DisasterWatchError::config("Request timeout cannot exceed 300 seconds").into());
        }

        if self.defaults.max_time_window_days > 365 {
            return Err(DisasterWatchError::config("Maximum time window cannot exceed 365 days").into());
        }

        if self.defaults.time_window_days > self.defaults.max_time_window_days {
            return Err(DisasterWatchError::config(format!(
                "Default time window ({} days) exceeds the maximum of {} days",
                self.defaults.time_window_days, self.defaults.max_time_window_days
            ))
            .into());
        }

        if self.defaults.max_alternates > 10 {
            return Err(DisasterWatchError::config("Maximum alternates cannot exceed 10").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DisasterWatchError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(DisasterWatchError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if let Some(endpoint) = &self.logging.otlp_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(DisasterWatchError::config(
                    "OTLP endpoint must be a valid HTTP or HTTPS URL",
                )
                .into());
            }
        }

        Ok(())
    }
}
