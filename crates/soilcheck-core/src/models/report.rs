use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

use super::{AnalysisResult, SoilInput};
use crate::error::Result;

/// A completed analysis archived together with the input that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedReport {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub soil_data: SoilInput,
    pub result: AnalysisResult,
}

impl SavedReport {
    pub fn new(soil_data: SoilInput, result: AnalysisResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: result.result_date.unwrap_or_else(Utc::now),
            soil_data,
            result,
        }
    }

    /// Write the report as pretty-printed JSON
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read a report previously written with [`SavedReport::write_to`]
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
