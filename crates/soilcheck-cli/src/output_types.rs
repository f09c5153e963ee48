use serde::Serialize;
use soilcheck_core::models::{AnalysisOutcome, FertilizerPlan, SoilInput};
use std::collections::BTreeMap;
use tabled::Tabled;

/// Output for the analyze and image commands
#[derive(Debug, Serialize)]
pub struct AnalysisOutput {
    pub draft: SoilInput,
    pub outcome: AnalysisOutcome,
    /// Whether running the same request again may succeed; set on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<String>,
}

/// Output for the crops command
#[derive(Debug, Serialize)]
pub struct CropsOutput {
    pub crops: Vec<CatalogEntry>,
    pub soil_categories: Vec<CatalogEntry>,
}

#[derive(Debug, Serialize, Tabled)]
pub struct CatalogEntry {
    #[tabled(rename = "Name")]
    pub name: &'static str,
    #[tabled(rename = "Local name")]
    pub local_name: &'static str,
}

/// Output for the config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub values: BTreeMap<String, ConfigEntry>,
}

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub value: String,
    pub source: String,
}

/// One row of the fertilizer program table
#[derive(Debug, Tabled)]
pub struct FertilizerRow {
    #[tabled(rename = "#")]
    pub step: usize,
    #[tabled(rename = "Fertilizer")]
    pub name: String,
    #[tabled(rename = "Dosage")]
    pub dosage: String,
    #[tabled(rename = "Method")]
    pub method: String,
    #[tabled(rename = "Timing")]
    pub timing: String,
}

impl FertilizerRow {
    pub fn from_plan(step: usize, plan: &FertilizerPlan) -> Self {
        Self {
            step,
            name: plan.name.clone(),
            dosage: plan.dosage.clone(),
            method: plan.application_method.clone(),
            timing: plan.timing.clone(),
        }
    }
}
