//! Example demonstrating the HTTP inference client
//!
//! This example sends a manual soil analysis to the configured inference
//! service and prints the fertilizer plan.
//!
//! Note: This example requires an inference service listening at
//! SOILCHECK_ENDPOINT (default http://localhost:8787).
//! To run: cargo run --example http_inference_example

use soilcheck_core::config::LayeredConfig;
use soilcheck_core::models::{DraftPatch, Moisture, SoilCategory, SoilInput};
use soilcheck_core::ports::InferenceCapability;
use soilcheck_llm::HttpInferenceClient;

#[tokio::main]
async fn main() {
    println!("Soilcheck LLM - HTTP Inference Example");
    println!("======================================\n");

    let config = LayeredConfig::with_defaults().load_from_env();
    let client = match HttpInferenceClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            println!("✗ Failed to create client: {}", e);
            return;
        }
    };

    println!("Client Configuration:");
    println!("  Endpoint: {}", client.endpoint());
    println!("  Timeout: {}s", config.timeout_secs.value);
    println!();

    let mut input = SoilInput::default();
    input.apply(
        DraftPatch::default()
            .soil_category(SoilCategory::Loamy)
            .crop_label("Wheat")
            .nitrogen(20.0)
            .phosphorus(50.0)
            .potassium(70.0)
            .ph_level(6.5)
            .moisture(Moisture::Moist),
    );

    println!("Requesting analysis for {} / {}...", input.soil_category, input.crop_label);
    println!("(This will fail if no inference service is running)\n");

    match client.analyze_from_parameters(&input).await {
        Ok(result) => {
            println!("✓ Soil health score: {}", result.soil_health_score);
            for (i, plan) in result.fertilizer_recommendations.iter().enumerate() {
                println!("  {}. {} - {} ({}, {})", i + 1, plan.name, plan.dosage, plan.application_method, plan.timing);
            }
        }
        Err(e) => {
            println!("✗ Analysis failed:");
            println!("  {}", e);
            println!("\nTo run this example successfully:");
            println!("  1. Start an inference service implementing /v1/analyze/parameters");
            println!("  2. export SOILCHECK_ENDPOINT=http://host:port");
            println!("  3. Run this example again");
        }
    }
}
