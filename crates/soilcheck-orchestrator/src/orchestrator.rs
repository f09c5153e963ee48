use chrono::Utc;
use soilcheck_core::models::{
    AnalysisOutcome, AnalysisResult, AnalysisType, DraftPatch, ErrorClass, SoilInput,
};
use soilcheck_core::ports::{InferenceCapability, InferenceResult};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::classify::FailureClassifier;

/// Shown when an image analysis is started without image bytes
pub const MISSING_IMAGE_MESSAGE: &str =
    "No image data provided. Please select a photo of the soil sample.";

/// Shown when an in-flight request is dropped before the service answered
pub const INTERRUPTED_MESSAGE: &str = "Analysis was interrupted before it completed. Please try again.";

/// Draft and outcome of one orchestrator, guarded together
#[derive(Debug, Default)]
struct SessionState {
    draft: SoilInput,
    outcome: AnalysisOutcome,
}

/// Drives soil analyses through an inference capability.
///
/// The orchestrator owns the draft and a single outcome slot. At most one
/// request is in flight: starting an analysis (or resetting) while one is
/// running is a no-op that reports [`AnalysisOutcome::InProgress`]. A request
/// that completes never returns `InProgress`, so callers can tell the two
/// apart.
///
/// All methods take `&self`; wrap the orchestrator in an `Arc` to observe it
/// from several tasks.
pub struct AnalysisOrchestrator<C: InferenceCapability> {
    inference: C,
    classifier: FailureClassifier,
    state: Mutex<SessionState>,
}

impl<C: InferenceCapability> AnalysisOrchestrator<C> {
    /// Create an idle orchestrator with a default draft
    pub fn new(inference: C) -> Self {
        Self {
            inference,
            classifier: FailureClassifier::default(),
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Replace the failure classifier
    pub fn with_classifier(mut self, classifier: FailureClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Merge a partial edit into the draft
    pub fn update_draft(&self, patch: DraftPatch) {
        self.lock().draft.apply(patch);
    }

    /// Snapshot of the current draft
    pub fn draft(&self) -> SoilInput {
        self.lock().draft.clone()
    }

    /// Snapshot of the current outcome
    pub fn current_outcome(&self) -> AnalysisOutcome {
        self.lock().outcome.clone()
    }

    /// Clear the last result or error and return to `Idle`.
    ///
    /// The draft is left untouched. Ignored while a request is in flight.
    pub fn reset(&self) {
        let mut state = self.lock();
        if state.outcome.is_in_progress() {
            tracing::warn!("Reset requested while an analysis is in progress, ignoring");
            return;
        }
        state.outcome = AnalysisOutcome::Idle;
    }

    /// Analyze the typed soil parameters in the current draft
    pub async fn run_manual_analysis(&self) -> AnalysisOutcome {
        let draft = match self.begin(AnalysisType::Manual, validate_draft) {
            Ok(draft) => draft,
            Err(outcome) => return outcome,
        };

        tracing::info!(
            soil = draft.soil_category.name(),
            crop = %draft.crop_label,
            "Dispatching manual soil analysis"
        );

        let guard = InFlight::new(&self.state);
        let result = self.inference.analyze_from_parameters(&draft).await;
        guard.complete(self.settle(AnalysisType::Manual, result))
    }

    /// Analyze a soil photo, using the draft's crop label as a hint
    pub async fn run_image_analysis(&self, image: &[u8], mime_type: &str) -> AnalysisOutcome {
        let check = |_: &SoilInput| {
            if image.is_empty() {
                Err(MISSING_IMAGE_MESSAGE)
            } else {
                Ok(())
            }
        };

        let draft = match self.begin(AnalysisType::Image, check) {
            Ok(draft) => draft,
            Err(outcome) => return outcome,
        };

        tracing::info!(
            mime_type = %mime_type,
            size = image.len(),
            crop_hint = %draft.crop_label,
            "Dispatching image soil analysis"
        );

        let guard = InFlight::new(&self.state);
        let result = self.inference.analyze_from_image(image, mime_type, &draft.crop_label).await;
        guard.complete(self.settle(AnalysisType::Image, result))
    }

    /// Enter `InProgress` and snapshot the draft, or explain why not.
    fn begin<F>(&self, mode: AnalysisType, check: F) -> Result<SoilInput, AnalysisOutcome>
    where
        F: FnOnce(&SoilInput) -> Result<(), &'static str>,
    {
        let mut state = self.lock();

        if state.outcome.is_in_progress() {
            tracing::warn!(mode = %mode, "Analysis already in progress, ignoring new request");
            return Err(AnalysisOutcome::InProgress);
        }

        if let Err(message) = check(&state.draft) {
            tracing::warn!(mode = %mode, reason = message, "Analysis input rejected");
            state.outcome = AnalysisOutcome::failed(ErrorClass::InvalidInput, message);
            return Err(state.outcome.clone());
        }

        state.outcome = AnalysisOutcome::InProgress;
        Ok(state.draft.clone())
    }

    /// Turn an inference result into a terminal outcome
    fn settle(&self, mode: AnalysisType, result: InferenceResult<AnalysisResult>) -> AnalysisOutcome {
        match result {
            Ok(result) => {
                let result = result.with_provenance(mode, Utc::now());
                tracing::info!(
                    mode = %mode,
                    score = result.soil_health_score,
                    recommendations = result.fertilizer_recommendations.len(),
                    "Soil analysis completed"
                );
                AnalysisOutcome::Succeeded { result }
            }
            Err(failure) => {
                let (class, message) = self.classifier.classify(&failure);
                tracing::error!(mode = %mode, class = %class, error = %failure, "Soil analysis failed");
                AnalysisOutcome::failed(class, message)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    // The state is replaced wholesale on every transition, so a poisoned lock
    // still holds a consistent value.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Manual analysis needs a soil category and a crop
fn validate_draft(draft: &SoilInput) -> Result<(), &'static str> {
    if !draft.soil_category.is_selected() {
        return Err("Please select a soil type before running the analysis.");
    }
    if !draft.has_crop() {
        return Err("Please select or enter a crop before running the analysis.");
    }
    Ok(())
}

/// Marks a request as in flight. If the request future is dropped before
/// completing, the outcome moves to `Failed` instead of staying `InProgress`.
struct InFlight<'a> {
    state: &'a Mutex<SessionState>,
    completed: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a Mutex<SessionState>) -> Self {
        Self {
            state,
            completed: false,
        }
    }

    fn complete(mut self, outcome: AnalysisOutcome) -> AnalysisOutcome {
        self.completed = true;
        lock_state(self.state).outcome = outcome.clone();
        outcome
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.completed {
            tracing::warn!("Analysis request dropped before completion");
            lock_state(self.state).outcome =
                AnalysisOutcome::failed(ErrorClass::Unknown, INTERRUPTED_MESSAGE);
        }
    }
}
