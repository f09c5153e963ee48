//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use soilcheck_core::config::{parse_endpoint, CliConfigOverrides, LayeredConfig, DEFAULT_CONFIG_FILE};
use std::path::Path;

use crate::cli::Cli;

/// Load layered configuration: defaults, config file, environment, then flags
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let config = match &cli.config {
        Some(path) => LayeredConfig::with_defaults()
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?,
        None => LayeredConfig::with_defaults()
            .load_from_optional_file(Path::new(DEFAULT_CONFIG_FILE))
            .context("Failed to load configuration file")?,
    };

    let mut config = config.load_from_env();
    config.update_from_cli(overrides_from(cli)?);
    Ok(config)
}

fn overrides_from(cli: &Cli) -> Result<CliConfigOverrides> {
    let endpoint = cli.endpoint.as_deref().map(parse_endpoint).transpose()?;

    Ok(CliConfigOverrides {
        endpoint,
        timeout_secs: cli.timeout_secs,
        ..Default::default()
    })
}
