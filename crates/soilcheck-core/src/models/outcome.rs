use serde::{Deserialize, Serialize};
use std::fmt;

use super::AnalysisResult;

/// Failure taxonomy exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Caller-supplied data failed a local precondition; nothing was sent
    InvalidInput,
    /// The inference service is throttling or out of quota; retry later
    RateLimited,
    /// Anything else: network, credentials, malformed response
    Unknown,
}

impl ErrorClass {
    /// Whether calling the analysis again later may succeed without changes
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorClass::RateLimited | ErrorClass::Unknown)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorClass::InvalidInput => write!(f, "invalid input"),
            ErrorClass::RateLimited => write!(f, "rate limited"),
            ErrorClass::Unknown => write!(f, "unknown"),
        }
    }
}

/// Observable state of an analysis orchestrator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    #[default]
    Idle,
    InProgress,
    Succeeded { result: AnalysisResult },
    Failed { class: ErrorClass, message: String },
}

impl AnalysisOutcome {
    pub fn failed(class: ErrorClass, message: impl Into<String>) -> Self {
        AnalysisOutcome::Failed {
            class,
            message: message.into(),
        }
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, AnalysisOutcome::InProgress)
    }

    /// The result, if the last request succeeded
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisOutcome::Succeeded { result } => Some(result),
            _ => None,
        }
    }

    /// The error class and message, if the last request failed
    pub fn error(&self) -> Option<(ErrorClass, &str)> {
        match self {
            AnalysisOutcome::Failed { class, message } => Some((*class, message.as_str())),
            _ => None,
        }
    }

    pub fn state_name(&self) -> &'static str {
        match self {
            AnalysisOutcome::Idle => "idle",
            AnalysisOutcome::InProgress => "in_progress",
            AnalysisOutcome::Succeeded { .. } => "succeeded",
            AnalysisOutcome::Failed { .. } => "failed",
        }
    }
}
