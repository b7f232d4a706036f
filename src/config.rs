//! Configuration management for `WeatherBack`
//!
//! Handles loading configuration from an optional TOML file, a `.env` file
//! and environment variables, and validates the result before the server
//! starts.

use crate::WeatherBackError;
use ::config::{Config, Environment, File, FileFormat};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable the provider documents for its API key
pub const PROVIDER_KEY_ENV: &str = "OW_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherBackConfig {
    /// Upstream provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Upstream weather/geocoding provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider API key, sent as `appid` on every call
    pub api_key: Option<String>,
    /// Base URL of the geocoding API
    #[serde(default = "default_geo_base_url")]
    pub geo_base_url: String,
    /// Base URL of the one-call data API
    #[serde(default = "default_data_base_url")]
    pub data_base_url: String,
    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Country appended to "city, region" queries
    #[serde(default = "default_country_qualifier")]
    pub country_qualifier: String,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Testing mode builds the bare router without the CORS layer
    #[serde(default)]
    pub testing: bool,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_geo_base_url() -> String {
    "http://api.openweathermap.org/geo/1.0".to_string()
}

fn default_data_base_url() -> String {
    "https://api.openweathermap.org/data/3.0".to_string()
}

fn default_timeout() -> u32 {
    5
}

fn default_country_qualifier() -> String {
    "US".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            geo_base_url: default_geo_base_url(),
            data_base_url: default_data_base_url(),
            timeout_seconds: default_timeout(),
            country_qualifier: default_country_qualifier(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            testing: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ProviderConfig {
    /// Provider settings pointing both APIs at a single base URL (mock servers)
    #[must_use]
    pub fn with_base_url(base_url: &str, api_key: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            api_key: Some(api_key.to_string()),
            geo_base_url: format!("{base_url}/geo/1.0"),
            data_base_url: format!("{base_url}/data/3.0"),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl ServerConfig {
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl WeatherBackConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();

        if let Ok(key) = std::env::var(PROVIDER_KEY_ENV) {
            builder = builder
                .set_default("provider.api_key", key)
                .with_context(|| format!("Failed to read {PROVIDER_KEY_ENV}"))?;
        }

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("weatherback.toml"));
        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        // WEATHERBACK_PROVIDER__API_KEY -> provider.api_key
        builder = builder.add_source(
            Environment::with_prefix("WEATHERBACK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: WeatherBackConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_provider()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_provider(&self) -> Result<()> {
        if let Some(api_key) = &self.provider.api_key
            && api_key.trim().is_empty()
        {
            return Err(WeatherBackError::config(
                "Provider API key cannot be empty if provided",
            )
            .into());
        }

        if !(1..=60).contains(&self.provider.timeout_seconds) {
            return Err(WeatherBackError::config(
                "Provider timeout must be between 1 and 60 seconds",
            )
            .into());
        }

        for (name, url) in [
            ("geo_base_url", &self.provider.geo_base_url),
            ("data_base_url", &self.provider.data_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WeatherBackError::config(format!(
                    "Provider {name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherBackError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherBackError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}
