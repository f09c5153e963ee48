use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which analysis mode produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    /// Typed soil parameters
    Manual,
    /// Soil photo
    Image,
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisType::Manual => write!(f, "manual"),
            AnalysisType::Image => write!(f, "image"),
        }
    }
}

/// Per-nutrient qualitative status with optional estimated levels
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientStatus {
    pub nitrogen_status: String,

    /// Estimated percentage, 0-100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nitrogen_level: Option<f64>,

    pub phosphorus_status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phosphorus_level: Option<f64>,

    pub potassium_status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potassium_level: Option<f64>,
}

/// One step of a fertilizer program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilizerPlan {
    pub name: String,
    pub dosage: String,
    pub application_method: String,
    pub timing: String,
}

/// Recommendation returned by the inference service.
///
/// Recommendations are ordered by priority of application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub soil_health_score: f64,
    pub nutrient_status: NutrientStatus,
    pub deficiency_analysis: String,
    pub fertilizer_recommendations: Vec<FertilizerPlan>,
    pub crop_advice: String,

    /// Region-specific advice
    pub local_context: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<AnalysisType>,
}

impl AnalysisResult {
    /// Record where and when this result was produced.
    ///
    /// The analysis type is always overwritten; an existing result date is kept.
    pub fn with_provenance(mut self, analysis_type: AnalysisType, produced_at: DateTime<Utc>) -> Self {
        self.analysis_type = Some(analysis_type);
        if self.result_date.is_none() {
            self.result_date = Some(produced_at);
        }
        self
    }
}
