use soilcheck_core::config::{LayeredConfig, DEFAULT_CONFIG_FILE};
use soilcheck_core::Result;
use std::env;

use crate::state::DEFAULT_MAX_SESSIONS;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    /// Live sessions kept before idle ones are evicted
    pub max_sessions: usize,
    /// Inference settings, layered from `soilcheck.toml` and the environment
    pub inference: LayeredConfig,
}

impl ApiConfig {
    /// Load configuration from the optional config file and environment variables
    pub fn from_env() -> Result<Self> {
        let port = env::var("SOILCHECK_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let cors_origin =
            env::var("SOILCHECK_CORS_ORIGIN").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());

        let max_sessions = env::var("SOILCHECK_MAX_SESSIONS")
            .ok()
            .and_then(|n| n.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_SESSIONS);

        let inference = LayeredConfig::with_defaults()
            .load_from_optional_file(DEFAULT_CONFIG_FILE)?
            .load_from_env();

        Ok(Self {
            port,
            cors_origin,
            max_sessions,
            inference,
        })
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
