pub mod analysis;
pub mod outcome;
pub mod report;
pub mod soil;

pub use analysis::{AnalysisResult, AnalysisType, FertilizerPlan, NutrientStatus};
pub use outcome::{AnalysisOutcome, ErrorClass};
pub use report::SavedReport;
pub use soil::{
    parse_moisture, parse_soil_category, CropType, DraftPatch, Moisture, SoilCategory, SoilInput,
};
