use serde::Serialize;
use soilcheck_core::models::{AnalysisOutcome, CropType, SoilCategory, SoilInput};
use uuid::Uuid;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "soilcheck-api" }
    }
}

/// A crop in the taxonomy
#[derive(Debug, Serialize)]
pub struct CropInfo {
    pub name: &'static str,
    pub local_name: &'static str,
}

/// A selectable soil category
#[derive(Debug, Serialize)]
pub struct SoilCategoryInfo {
    pub name: &'static str,
    pub local_name: &'static str,
}

/// Crop taxonomy and soil categories
#[derive(Debug, Serialize)]
pub struct CropsResponse {
    pub crops: Vec<CropInfo>,
    pub soil_categories: Vec<SoilCategoryInfo>,
}

impl CropsResponse {
    pub fn catalog() -> Self {
        Self {
            crops: CropType::ALL
                .iter()
                .map(|c| CropInfo { name: c.name(), local_name: c.local_name() })
                .collect(),
            soil_categories: SoilCategory::ALL
                .iter()
                .map(|s| SoilCategoryInfo { name: s.name(), local_name: s.local_name() })
                .collect(),
        }
    }
}

/// Snapshot of a session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub draft: SoilInput,
    pub outcome: AnalysisOutcome,
}

/// Delete operation response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

impl DeleteResponse {
    pub fn success(entity: &str, id: &str) -> Self {
        Self {
            success: true,
            message: format!("Successfully deleted {} {}", entity, id),
        }
    }
}
