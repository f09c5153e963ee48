use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use soilcheck_core::models::AnalysisOutcome;
use uuid::Uuid;

use super::sessions::find_session;
use crate::dto::ImageUpload;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn run_manual_analysis(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AnalysisOutcome>, ApiError> {
    let session = find_session(&state, session_id).await?;

    tracing::info!(session_id = %session_id, "Running manual analysis");
    settled(session.run_manual_analysis().await)
}

pub async fn run_image_analysis(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisOutcome>, ApiError> {
    let session = find_session(&state, session_id).await?;

    let upload = extract_image(&mut multipart).await?;

    tracing::info!(
        session_id = %session_id,
        mime_type = %upload.mime_type,
        size = upload.bytes.len(),
        "Running image analysis"
    );
    settled(session.run_image_analysis(&upload.bytes, &upload.mime_type).await)
}

/// A run that returns `InProgress` was rejected because another one is active
fn settled(outcome: AnalysisOutcome) -> Result<Json<AnalysisOutcome>, ApiError> {
    if outcome.is_in_progress() {
        return Err(ApiError::conflict("Analysis already in progress")
            .with_details("Wait for the current analysis to finish before starting another"));
    }
    Ok(Json(outcome))
}

async fn extract_image(multipart: &mut Multipart) -> Result<ImageUpload, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::bad_request("Failed to parse multipart form").with_details(e.to_string())
    })? {
        if field.name() != Some("image") {
            continue;
        }

        let mime_type = field
            .content_type()
            .map(str::to_string)
            .ok_or_else(|| {
                ApiError::bad_request("Missing image content type")
                    .with_details("The 'image' field must declare a Content-Type such as image/jpeg")
            })?;

        let bytes = field.bytes().await.map_err(|e| {
            ApiError::bad_request("Failed to read image data").with_details(e.to_string())
        })?;

        return Ok(ImageUpload {
            bytes: bytes.to_vec(),
            mime_type,
        });
    }

    Err(ApiError::bad_request("No image provided")
        .with_details("Expected an 'image' field in the multipart form"))
}
