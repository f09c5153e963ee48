//! Soilcheck Orchestrator - Analysis state machine
//!
//! This crate drives a soil analysis request through the inference port and
//! exposes the result as a single observable [`AnalysisOutcome`].
//!
//! [`AnalysisOutcome`]: soilcheck_core::models::AnalysisOutcome

pub mod classify;
pub mod orchestrator;

pub use classify::{FailureClassifier, RATE_LIMITED_MESSAGE, UNKNOWN_FAILURE_MESSAGE};
pub use orchestrator::{AnalysisOrchestrator, INTERRUPTED_MESSAGE, MISSING_IMAGE_MESSAGE};
