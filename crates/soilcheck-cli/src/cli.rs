use clap::{Parser, Subcommand};
use soilcheck_core::models::{parse_moisture, parse_soil_category, Moisture, SoilCategory};
use std::path::PathBuf;

/// Soilcheck - soil analysis and fertilizer planning
#[derive(Parser, Debug)]
#[command(name = "soilcheck")]
#[command(about = "Soil analysis and fertilizer planning", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a config file (defaults to ./soilcheck.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Inference service base URL
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze typed soil test parameters
    Analyze(AnalyzeArgs),

    /// Analyze a photo of a soil sample
    Image(ImageArgs),

    /// List known crops and soil categories
    Crops,

    /// Show the effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Soil category, English or local name (e.g., "Loamy" or "Maira")
    #[arg(long, value_parser = parse_soil_category)]
    pub soil: SoilCategory,

    /// Crop name, English or local name
    #[arg(long)]
    pub crop: String,

    /// Nitrogen sufficiency, 0-100
    #[arg(long, short = 'n', value_name = "LEVEL")]
    pub nitrogen: Option<f64>,

    /// Phosphorus sufficiency, 0-100
    #[arg(long, short = 'p', value_name = "LEVEL")]
    pub phosphorus: Option<f64>,

    /// Potassium sufficiency, 0-100
    #[arg(long, short = 'k', value_name = "LEVEL")]
    pub potassium: Option<f64>,

    /// Soil pH, 0-14
    #[arg(long)]
    pub ph: Option<f64>,

    /// Moisture reading (dry, moist or wet)
    #[arg(long, value_parser = parse_moisture)]
    pub moisture: Option<Moisture>,

    /// Save the completed report as JSON
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ImageArgs {
    /// Path to the soil photo (JPEG, PNG, WebP, HEIC or HEIF)
    pub path: PathBuf,

    /// Crop the recommendations should target
    #[arg(long)]
    pub crop: Option<String>,

    /// Image MIME type; inferred from the file extension when omitted
    #[arg(long, value_name = "TYPE")]
    pub mime: Option<String>,

    /// Save the completed report as JSON
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_args() {
        let cli = Cli::try_parse_from([
            "soilcheck", "analyze", "--soil", "maira", "--crop", "Wheat", "-n", "20", "--ph", "6.5",
            "--moisture", "wet", "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.soil, SoilCategory::Loamy);
                assert_eq!(args.nitrogen, Some(20.0));
                assert_eq!(args.ph, Some(6.5));
                assert_eq!(args.moisture, Some(Moisture::Wet));
                assert!(args.save.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_soil_is_rejected() {
        let result =
            Cli::try_parse_from(["soilcheck", "analyze", "--soil", "marble", "--crop", "Wheat"]);
        assert!(result.is_err());
    }
}
