use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use soilcheck_core::models::{AnalysisOutcome, DraftPatch, SoilInput};
use uuid::Uuid;

use crate::dto::{DeleteResponse, SessionResponse};
use crate::error::ApiError;
use crate::state::{AppState, Session};

pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let (session_id, session) = state.create_session().await.ok_or_else(|| {
        tracing::warn!("Session limit reached with every session busy");
        ApiError::service_unavailable("Too many active sessions")
            .with_details("Every session has an analysis in progress; try again shortly")
    })?;
    tracing::info!(session_id = %session_id, "Created analysis session");

    let response = SessionResponse {
        session_id,
        draft: session.draft(),
        outcome: session.current_outcome(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if !state.remove_session(session_id).await {
        return Err(ApiError::session_not_found(session_id));
    }

    tracing::info!(session_id = %session_id, "Deleted analysis session");
    Ok(Json(DeleteResponse::success("session", &session_id.to_string())))
}

pub async fn get_draft(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SoilInput>, ApiError> {
    let session = find_session(&state, session_id).await?;
    Ok(Json(session.draft()))
}

pub async fn update_draft(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    patch: Result<Json<DraftPatch>, JsonRejection>,
) -> Result<Json<SoilInput>, ApiError> {
    let session = find_session(&state, session_id).await?;

    let Json(patch) = patch.map_err(|e| {
        ApiError::bad_request("Invalid draft update").with_details(e.body_text())
    })?;

    session.update_draft(patch);
    Ok(Json(session.draft()))
}

pub async fn get_outcome(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AnalysisOutcome>, ApiError> {
    let session = find_session(&state, session_id).await?;
    Ok(Json(session.current_outcome()))
}

pub async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AnalysisOutcome>, ApiError> {
    let session = find_session(&state, session_id).await?;
    session.reset();

    let outcome = session.current_outcome();
    if outcome.is_in_progress() {
        return Err(ApiError::conflict("Analysis in progress")
            .with_details("A session cannot be reset while its analysis is running"));
    }
    Ok(Json(outcome))
}

pub(crate) async fn find_session(state: &AppState, id: Uuid) -> Result<Arc<Session>, ApiError> {
    state.session(id).await.ok_or_else(|| ApiError::session_not_found(id))
}
