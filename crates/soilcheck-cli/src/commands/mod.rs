//! Command implementations

mod analyze;
mod config;
mod crops;
mod image;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::{AnalysisOutput, FertilizerRow};
use crate::progress::create_spinner;
use anyhow::{Context, Result};
use soilcheck_core::config::LayeredConfig;
use soilcheck_core::models::{AnalysisOutcome, AnalysisResult, SavedReport, SoilInput};
use soilcheck_llm::HttpInferenceClient;
use soilcheck_orchestrator::{AnalysisOrchestrator, FailureClassifier};
use std::future::Future;
use std::path::Path;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Analyze(args) => analyze::execute(args, &config, &output).await,
        Commands::Image(args) => image::execute(args, &config, &output).await,
        Commands::Crops => crops::execute(&output),
        Commands::Config => config::execute(&config, &output),
    }
}

/// Build an orchestrator backed by the configured inference service
fn build_orchestrator(config: &LayeredConfig) -> Result<AnalysisOrchestrator<HttpInferenceClient>> {
    let client = HttpInferenceClient::from_config(config).context("Failed to create inference client")?;
    Ok(AnalysisOrchestrator::new(client).with_classifier(FailureClassifier::from_config(config)))
}

/// Run one analysis behind a spinner and report its outcome
async fn run_with_spinner<F>(output: &OutputWriter, message: &str, run: F) -> AnalysisOutcome
where
    F: Future<Output = AnalysisOutcome>,
{
    let spinner = create_spinner(message, output.is_json());
    let outcome = run.await;
    spinner.finish_and_clear();
    outcome
}

/// Print the outcome, save the report on success, and fail on a failed outcome
fn report_outcome(
    draft: SoilInput,
    outcome: AnalysisOutcome,
    save: Option<&Path>,
    output: &OutputWriter,
) -> Result<()> {
    match &outcome {
        AnalysisOutcome::Succeeded { result } => {
            let saved_to = match save {
                Some(path) => Some(save_report(path, &draft, result)?),
                None => None,
            };

            if output.is_json() {
                output.result(AnalysisOutput {
                    draft,
                    outcome: outcome.clone(),
                    retryable: None,
                    saved_to,
                })?;
            } else {
                print_result(result, output);
                if let Some(path) = saved_to {
                    output.success(format!("Report saved to {}", path));
                }
            }
            Ok(())
        }
        AnalysisOutcome::Failed { class, message } => {
            output.envelope(
                "error",
                AnalysisOutput {
                    draft,
                    outcome: outcome.clone(),
                    retryable: Some(class.is_retryable()),
                    saved_to: None,
                },
            )?;
            Err(errors::analysis_failed(*class, message).into())
        }
        // A fresh orchestrator has nothing else in flight
        AnalysisOutcome::Idle | AnalysisOutcome::InProgress => {
            anyhow::bail!("Analysis did not complete (state: {})", outcome.state_name())
        }
    }
}

fn save_report(path: &Path, draft: &SoilInput, result: &AnalysisResult) -> Result<String> {
    let report = SavedReport::new(draft.clone(), result.clone());
    report
        .write_to(path)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    tracing::debug!(path = %path.display(), report_id = %report.id, "Saved analysis report");
    Ok(path.display().to_string())
}

fn print_result(result: &AnalysisResult, output: &OutputWriter) {
    output.section("Soil Health");
    output.kv("Score", format!("{:.0}/100", result.soil_health_score));
    if let Some(mode) = result.analysis_type {
        output.kv("Analysis", mode);
    }

    output.section("Nutrients");
    let status = &result.nutrient_status;
    output.kv("Nitrogen", with_level(&status.nitrogen_status, status.nitrogen_level));
    output.kv("Phosphorus", with_level(&status.phosphorus_status, status.phosphorus_level));
    output.kv("Potassium", with_level(&status.potassium_status, status.potassium_level));
    output.paragraph("Deficiencies", &result.deficiency_analysis);

    output.section("Fertilizer Plan");
    output.table(
        result
            .fertilizer_recommendations
            .iter()
            .enumerate()
            .map(|(i, plan)| FertilizerRow::from_plan(i + 1, plan))
            .collect(),
    );

    output.section("Advice");
    output.paragraph("Crop", &result.crop_advice);
    output.paragraph("Local context", &result.local_context);
}

fn with_level(status: &str, level: Option<f64>) -> String {
    match level {
        Some(level) => format!("{} ({:.0}%)", status, level),
        None => status.to_string(),
    }
}
