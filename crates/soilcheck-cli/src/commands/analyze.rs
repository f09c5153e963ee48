//! Analyze command implementation

use crate::cli::AnalyzeArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use soilcheck_core::config::LayeredConfig;
use soilcheck_core::models::DraftPatch;

use super::{build_orchestrator, report_outcome, run_with_spinner};

pub async fn execute(args: AnalyzeArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let orchestrator = build_orchestrator(config)?;
    orchestrator.update_draft(draft_patch(&args));

    let draft = orchestrator.draft();
    output.info(format!("Analyzing {} soil for {}", draft.soil_category, draft.crop_label));

    let outcome =
        run_with_spinner(output, "Running soil analysis...", orchestrator.run_manual_analysis())
            .await;

    report_outcome(draft, outcome, args.save.as_deref(), output)
}

fn draft_patch(args: &AnalyzeArgs) -> DraftPatch {
    DraftPatch {
        soil_category: Some(args.soil),
        crop_label: Some(args.crop.clone()),
        nitrogen: args.nitrogen,
        phosphorus: args.phosphorus,
        potassium: args.potassium,
        ph_level: args.ph,
        moisture: args.moisture,
    }
}
