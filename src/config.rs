//! Configuration management for Nettleie
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files.

use crate::error::{NettleieError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Production authentication endpoint of the Norgesnett grid tariff API
pub const DEFAULT_AUTH_URL: &str = "https://gridtariff-api.norgesnett.no/api/v1.01/Auth/Generate";

/// Production tariff query endpoint of the Norgesnett grid tariff API
pub const DEFAULT_TARIFFS_URL: &str =
    "https://gridtariff-api.norgesnett.no/api/v1.01/TariffQuery/MeteringPointsGridTariffs";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Customer credentials for the tariff API
    pub credentials: CredentialsConfig,

    /// API endpoint configuration
    pub api: ApiConfig,

    /// HTTP executor configuration
    pub http: HttpConfig,

    /// Refresh scheduling configuration
    pub refresh: RefreshConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Customer credentials, supplied externally and immutable once configured
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Customer id as registered with the grid operator
    pub customer_id: String,

    /// Metering point id (målepunkt-id) of the installation
    pub metering_point_id: String,
}

/// API endpoint URLs, overridable for test servers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Authentication endpoint
    pub auth_url: String,

    /// Tariff query endpoint
    pub tariffs_url: String,
}

/// HTTP executor parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-attempt request timeout in seconds
    pub timeout_secs: u64,

    /// Max attempts per call, including the first
    pub max_attempts: u32,

    /// Initial backoff delay in milliseconds, doubled after each attempt
    pub backoff_base_ms: u64,
}

/// Refresh scheduling parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Interval between scheduled fetches in seconds
    pub interval_secs: u64,

    /// Interval between derived-value republications in seconds
    pub republish_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Whether to emit JSON-formatted log lines
    pub json_format: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            tariffs_url: DEFAULT_TARIFFS_URL.to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_attempts: 3,
            backoff_base_ms: 1000,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            // Tariff structures change rarely; one fetch per day matches the
            // upstream publication cadence.
            interval_secs: 86_400,
            republish_secs: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: CredentialsConfig::default(),
            api: ApiConfig::default(),
            http: HttpConfig::default(),
            refresh: RefreshConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the default locations
    pub fn load() -> Result<Self> {
        let default_paths = [
            "nettleie_config.yaml",
            "/data/nettleie_config.yaml",
            "/etc/nettleie/config.yaml",
        ];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        // Fall back to default configuration
        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.credentials.customer_id.trim().is_empty() {
            return Err(NettleieError::validation(
                "credentials.customer_id",
                "Customer id cannot be empty",
            ));
        }

        if self.credentials.metering_point_id.trim().is_empty() {
            return Err(NettleieError::validation(
                "credentials.metering_point_id",
                "Metering point id cannot be empty",
            ));
        }

        if self.api.auth_url.is_empty() {
            return Err(NettleieError::validation(
                "api.auth_url",
                "Auth URL cannot be empty",
            ));
        }

        if self.api.tariffs_url.is_empty() {
            return Err(NettleieError::validation(
                "api.tariffs_url",
                "Tariffs URL cannot be empty",
            ));
        }

        if self.http.max_attempts == 0 {
            return Err(NettleieError::validation(
                "http.max_attempts",
                "Must be at least 1",
            ));
        }

        if self.http.timeout_secs == 0 {
            return Err(NettleieError::validation(
                "http.timeout_secs",
                "Must be greater than 0",
            ));
        }

        if self.refresh.interval_secs == 0 {
            return Err(NettleieError::validation(
                "refresh.interval_secs",
                "Must be greater than 0",
            ));
        }

        if self.refresh.republish_secs == 0 {
            return Err(NettleieError::validation(
                "refresh.republish_secs",
                "Must be greater than 0",
            ));
        }

        Ok(())
    }
}
