//! Image command implementation

use crate::cli::ImageArgs;
use crate::errors;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use soilcheck_core::config::LayeredConfig;
use soilcheck_core::models::DraftPatch;
use soilcheck_llm::is_supported_mime_type;
use std::fs;
use std::path::Path;

use super::{build_orchestrator, report_outcome, run_with_spinner};

pub async fn execute(args: ImageArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    if !args.path.exists() {
        return Err(errors::image_not_found(&args.path).into());
    }

    let mime_type = match &args.mime {
        Some(mime) => mime.trim().to_lowercase(),
        None => mime_from_extension(&args.path)
            .ok_or_else(|| errors::unsupported_image_type(&args.path, None))?
            .to_string(),
    };
    if !is_supported_mime_type(&mime_type) {
        return Err(errors::unsupported_image_type(&args.path, Some(&mime_type)).into());
    }

    let image = fs::read(&args.path)
        .with_context(|| format!("Failed to read image {}", args.path.display()))?;

    let orchestrator = build_orchestrator(config)?;
    if let Some(crop) = &args.crop {
        orchestrator.update_draft(DraftPatch::default().crop_label(crop.clone()));
    }
    let draft = orchestrator.draft();

    output.info(format!("Analyzing {} ({} bytes)", args.path.display(), image.len()));

    let outcome = run_with_spinner(
        output,
        "Analyzing soil photo...",
        orchestrator.run_image_analysis(&image, &mime_type),
    )
    .await;

    report_outcome(draft, outcome, args.save.as_deref(), output)
}

/// Guess an image MIME type from the file extension
fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}
