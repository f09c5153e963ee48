use crate::error::{Result, SoilcheckError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Default inference service endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8787";

/// Default per-request timeout for inference calls, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "soilcheck.toml";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the inference boundary
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Base URL of the inference service
    pub endpoint: ConfigValue<String>,
    pub api_key: ConfigValue<Option<String>>,
    pub timeout_secs: ConfigValue<u64>,
    /// Extra failure markers treated as rate limiting, on top of the built-in ones
    pub rate_limit_markers: ConfigValue<Vec<String>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            endpoint: ConfigValue::new(DEFAULT_ENDPOINT.to_string(), ConfigSource::Default),
            api_key: ConfigValue::new(None, ConfigSource::Default),
            timeout_secs: ConfigValue::new(DEFAULT_TIMEOUT_SECS, ConfigSource::Default),
            rate_limit_markers: ConfigValue::new(Vec::new(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| SoilcheckError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| SoilcheckError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(endpoint) = file_config.endpoint {
            self.endpoint.update(parse_endpoint(&endpoint)?, ConfigSource::File);
        }

        if let Some(api_key) = file_config.api_key {
            self.api_key.update(Some(api_key), ConfigSource::File);
        }

        if let Some(timeout_secs) = file_config.timeout_secs {
            self.timeout_secs.update(validate_timeout(timeout_secs)?, ConfigSource::File);
        }

        if let Some(markers) = file_config.rate_limit_markers {
            self.rate_limit_markers.update(normalize_markers(markers), ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from a TOML file if it exists
    pub fn load_from_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        if path.as_ref().exists() {
            self.load_from_file(path)
        } else {
            tracing::debug!(path = %path.as_ref().display(), "No config file found, skipping");
            Ok(self)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // SOILCHECK_ENDPOINT
        if let Ok(endpoint) = env::var("SOILCHECK_ENDPOINT") {
            match parse_endpoint(&endpoint) {
                Ok(endpoint) => self.endpoint.update(endpoint, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid SOILCHECK_ENDPOINT value '{}': expected an http(s) URL",
                    endpoint
                ),
            }
        }

        // SOILCHECK_API_KEY
        if let Ok(api_key) = env::var("SOILCHECK_API_KEY") {
            if !api_key.trim().is_empty() {
                self.api_key.update(Some(api_key), ConfigSource::Environment);
            }
        }

        // SOILCHECK_TIMEOUT_SECS
        if let Ok(timeout_str) = env::var("SOILCHECK_TIMEOUT_SECS") {
            match timeout_str.parse::<u64>().ok().filter(|t| *t > 0) {
                Some(timeout) => self.timeout_secs.update(timeout, ConfigSource::Environment),
                None => tracing::warn!(
                    "Invalid SOILCHECK_TIMEOUT_SECS value '{}': expected a positive integer",
                    timeout_str
                ),
            }
        }

        // SOILCHECK_RATE_LIMIT_MARKERS
        if let Ok(markers_str) = env::var("SOILCHECK_RATE_LIMIT_MARKERS") {
            let markers = parse_markers(&markers_str);
            self.rate_limit_markers.update(markers, ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint.update(endpoint, ConfigSource::Cli);
        }

        if let Some(api_key) = overrides.api_key {
            self.api_key.update(Some(api_key), ConfigSource::Cli);
        }

        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs.update(timeout_secs, ConfigSource::Cli);
        }

        if let Some(markers) = overrides.rate_limit_markers {
            self.rate_limit_markers.update(normalize_markers(markers), ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    ///
    /// The API key is redacted.
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert("endpoint".to_string(), (self.endpoint.value.clone(), self.endpoint.source));

        let api_key = match &self.api_key.value {
            Some(_) => "********".to_string(),
            None => "(not set)".to_string(),
        };
        map.insert("api_key".to_string(), (api_key, self.api_key.source));

        map.insert(
            "timeout_secs".to_string(),
            (self.timeout_secs.value.to_string(), self.timeout_secs.source),
        );

        map.insert(
            "rate_limit_markers".to_string(),
            (self.rate_limit_markers.value.join(","), self.rate_limit_markers.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    endpoint: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
    rate_limit_markers: Option<Vec<String>>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub rate_limit_markers: Option<Vec<String>>,
}

/// Validate an endpoint URL and strip any trailing slash
pub fn parse_endpoint(s: &str) -> Result<String> {
    let trimmed = s.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(SoilcheckError::ConfigInvalid {
            key: "endpoint".to_string(),
            reason: format!("Invalid endpoint: {}. Expected an http:// or https:// URL", s),
        })
    }
}

/// Split a comma-separated marker list
pub fn parse_markers(s: &str) -> Vec<String> {
    normalize_markers(s.split(',').map(str::to_string).collect())
}

fn normalize_markers(markers: Vec<String>) -> Vec<String> {
    markers
        .into_iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect()
}

fn validate_timeout(timeout_secs: u64) -> Result<u64> {
    if timeout_secs == 0 {
        return Err(SoilcheckError::ConfigInvalid {
            key: "timeout_secs".to_string(),
            reason: "Timeout must be at least one second".to_string(),
        });
    }
    Ok(timeout_secs)
}
