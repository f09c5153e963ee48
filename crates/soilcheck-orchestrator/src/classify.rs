//! Failure classification for inference errors
//!
//! Classification is best-effort: the failure comes from a collaborator whose
//! error schema this crate does not control, so it only looks at an optional
//! status code and the serialized description.

use soilcheck_core::config::LayeredConfig;
use soilcheck_core::models::ErrorClass;
use soilcheck_core::ports::InferenceFailure;

/// Shown when the inference service is throttling or out of quota
pub const RATE_LIMITED_MESSAGE: &str =
    "High traffic or daily limit reached (Error 429). Please wait a moment and try again.";

/// Shown for every other inference failure
pub const UNKNOWN_FAILURE_MESSAGE: &str =
    "Unable to complete analysis. Please check your internet connection or API key.";

const TOO_MANY_REQUESTS: u16 = 429;

/// Status code as it appears in error text; only counts as a standalone number
const TOO_MANY_REQUESTS_CODE: &str = "429";

/// Lowercase tokens that mark a failure as rate limiting
const BUILTIN_MARKERS: [&str; 2] = ["quota", "resource_exhausted"];

/// Maps inference failures onto [`ErrorClass`]
#[derive(Debug, Clone, Default)]
pub struct FailureClassifier {
    extra_markers: Vec<String>,
}

impl FailureClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add provider-specific markers on top of the built-in ones
    pub fn with_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_markers.extend(
            markers
                .into_iter()
                .map(|m| m.into().trim().to_lowercase())
                .filter(|m| !m.is_empty()),
        );
        self
    }

    /// Build a classifier using the configured `rate_limit_markers`
    pub fn from_config(config: &LayeredConfig) -> Self {
        Self::new().with_markers(config.rate_limit_markers.value.iter().cloned())
    }

    /// Whether the failure signals throttling or quota exhaustion
    pub fn is_rate_limited(&self, failure: &InferenceFailure) -> bool {
        if failure.status == Some(TOO_MANY_REQUESTS) {
            return true;
        }

        let haystack = failure.serialized().to_lowercase();
        contains_standalone_number(&haystack, TOO_MANY_REQUESTS_CODE)
            || BUILTIN_MARKERS.iter().any(|marker| haystack.contains(marker))
            || self.extra_markers.iter().any(|marker| haystack.contains(marker.as_str()))
    }

    /// Classify a failure and pick the user-facing message
    pub fn classify(&self, failure: &InferenceFailure) -> (ErrorClass, &'static str) {
        if self.is_rate_limited(failure) {
            (ErrorClass::RateLimited, RATE_LIMITED_MESSAGE)
        } else {
            (ErrorClass::Unknown, UNKNOWN_FAILURE_MESSAGE)
        }
    }
}

/// Whether `number` occurs with no digit directly before or after it
fn contains_standalone_number(haystack: &str, number: &str) -> bool {
    haystack.match_indices(number).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + number.len()..].chars().next();
        !before.is_some_and(|c| c.is_ascii_digit()) && !after.is_some_and(|c| c.is_ascii_digit())
    })
}
